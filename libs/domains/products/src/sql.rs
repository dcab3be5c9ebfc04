//! SeaORM-backed product storage

use async_trait::async_trait;
use database::sql::{DatabaseConfig, DatabaseConnection, connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select,
};
use tracing::instrument;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::Product,
    query::{ProductPredicate, ProductQuery},
    repository::ProductRepository,
};

/// Connect to the configured store and bring the schema up to date.
///
/// Call once at process start; the returned handle is what repositories
/// are built from.
#[instrument(skip(config), fields(in_memory = config.is_in_memory()))]
pub async fn init_db(config: &DatabaseConfig) -> ProductResult<DatabaseConnection> {
    let db = connect_from_config_with_retry(config.clone(), None).await?;
    run_migrations::<Migrator>(&db, env!("CARGO_PKG_NAME")).await?;
    Ok(db)
}

#[derive(Clone)]
pub struct SqlProductRepository {
    db: DatabaseConnection,
}

impl SqlProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Compile a query into a SeaORM select, ordered by id.
pub fn select(query: &ProductQuery) -> Select<entity::Entity> {
    query
        .predicates()
        .iter()
        .fold(entity::Entity::find(), |select, predicate| match predicate {
            ProductPredicate::Name(name) => select.filter(entity::Column::Name.eq(name.as_str())),
            ProductPredicate::Category(category) => {
                select.filter(entity::Column::Category.eq(*category))
            }
            ProductPredicate::Available(available) => {
                select.filter(entity::Column::Available.eq(*available))
            }
        })
        .order_by_asc(entity::Column::Id)
}

fn active_model(product: &Product) -> ProductResult<entity::ActiveModel> {
    Ok(entity::ActiveModel {
        id: match product.id {
            Some(id) => Set(id),
            None => NotSet,
        },
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price_cents()?),
        available: Set(product.available),
        category: Set(product.category),
    })
}

#[async_trait]
impl ProductRepository for SqlProductRepository {
    async fn create(&self, product: &Product) -> ProductResult<Product> {
        let model = entity::ActiveModel {
            id: NotSet,
            ..active_model(product)?
        }
        .insert(&self.db)
        .await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn find(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, product: &Product) -> ProductResult<Product> {
        let id = product.id.ok_or_else(|| {
            ProductError::Validation("called update on empty id field".into())
        })?;

        if entity::Entity::find_by_id(id).one(&self.db).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        let model = active_model(product)?
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => ProductError::NotFound(id),
                other => other.into(),
            })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn fetch(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let models = select(query).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, query: &ProductQuery) -> ProductResult<u64> {
        Ok(select(query).count(&self.db).await?)
    }
}
