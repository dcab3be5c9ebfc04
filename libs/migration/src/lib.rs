pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_products::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

    #[tokio::test]
    async fn test_up_is_idempotent_and_down_drops_table() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("products").await.unwrap());

        db.execute_unprepared("INSERT INTO products (name, price) VALUES ('Fedora', 1250)")
            .await
            .unwrap();

        let row = db
            .query_one_raw(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT available, category FROM products WHERE name = 'Fedora'".to_owned(),
            ))
            .await
            .unwrap()
            .unwrap();
        assert!(row.try_get::<bool>("", "available").unwrap());
        assert_eq!(row.try_get::<String>("", "category").unwrap(), "UNKNOWN");

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("products").await.unwrap());
    }
}
