//! Lazy product queries
//!
//! A [`ProductQuery`] is a conjunction of predicates. Building one touches no
//! storage; it is evaluated each time it is handed to a repository, so the
//! same value can be fetched again after the data changed.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ProductError, ProductResult};
use crate::models::{Category, Product};
use crate::repository::ProductRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductPredicate {
    /// Exact, case-sensitive
    Name(String),
    Category(Category),
    Available(bool),
}

impl ProductPredicate {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductPredicate::Name(name) => product.name == *name,
            ProductPredicate::Category(category) => product.category == *category,
            ProductPredicate::Available(available) => product.available == *available,
        }
    }
}

/// Composable filter over stored products; empty means every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    predicates: Vec<ProductPredicate>,
}

impl ProductQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: ProductPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn and_name(self, name: impl Into<String>) -> Self {
        self.and(ProductPredicate::Name(name.into()))
    }

    pub fn and_category(self, category: Category) -> Self {
        self.and(ProductPredicate::Category(category))
    }

    pub fn and_available(self, available: bool) -> Self {
        self.and(ProductPredicate::Available(available))
    }

    pub fn predicates(&self) -> &[ProductPredicate] {
        &self.predicates
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }

    /// Run the query; results are ordered by id.
    pub async fn fetch<R>(&self, repo: &R) -> ProductResult<Vec<Product>>
    where
        R: ProductRepository + ?Sized,
    {
        repo.fetch(self).await
    }

    pub async fn count<R>(&self, repo: &R) -> ProductResult<u64>
    where
        R: ProductRepository + ?Sized,
    {
        repo.count(self).await
    }
}

/// Query parameters of `GET /products`
///
/// At most one filter applies, picked in the order `name`, `category`,
/// `available`; the rest are ignored.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Exact product name
    pub name: Option<String>,
    /// Category label, case-insensitive
    #[param(example = "CLOTHS")]
    pub category: Option<String>,
    /// true/false (also yes/no, 1/0)
    #[param(example = "true")]
    pub available: Option<String>,
}

impl ProductFilter {
    pub fn into_query(self) -> ProductResult<ProductQuery> {
        if let Some(name) = self.name {
            return Ok(Product::find_by_name(name));
        }
        if let Some(category) = self.category {
            return Ok(Product::find_by_category(Category::from_label_ignore_case(
                &category,
            )?));
        }
        if let Some(available) = self.available {
            return Ok(Product::find_by_availability(parse_flag(&available)?));
        }
        Ok(ProductQuery::all())
    }
}

fn parse_flag(raw: &str) -> ProductResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ProductError::Validation(format!(
            "Invalid value for available: {}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, category: Category, available: bool) -> Product {
        Product::new(name, Decimal::ONE)
            .with_category(category)
            .with_available(available)
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(ProductQuery::all().matches(&product("Hat", Category::Cloths, false)));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let query = Product::find_by_category(Category::Food).and_available(true);

        assert!(query.matches(&product("Apple", Category::Food, true)));
        assert!(!query.matches(&product("Apple", Category::Food, false)));
        assert!(!query.matches(&product("Pots", Category::Housewares, true)));
    }

    #[test]
    fn test_name_is_case_sensitive() {
        let query = Product::find_by_name("Hat");
        assert!(query.matches(&product("Hat", Category::Cloths, true)));
        assert!(!query.matches(&product("hat", Category::Cloths, true)));
    }

    #[test]
    fn test_filter_precedence() {
        let filter = ProductFilter {
            name: Some("Hat".into()),
            category: Some("FOOD".into()),
            available: Some("false".into()),
        };
        assert_eq!(filter.into_query().unwrap(), Product::find_by_name("Hat"));

        let filter = ProductFilter {
            name: None,
            category: Some("food".into()),
            available: Some("false".into()),
        };
        assert_eq!(
            filter.into_query().unwrap(),
            Product::find_by_category(Category::Food)
        );

        assert_eq!(
            ProductFilter::default().into_query().unwrap(),
            ProductQuery::all()
        );
    }

    #[test]
    fn test_available_flag_spellings() {
        for raw in ["true", "True", "YES", "1"] {
            assert!(parse_flag(raw).unwrap(), "{}", raw);
        }
        for raw in ["false", "False", "no", "0"] {
            assert!(!parse_flag(raw).unwrap(), "{}", raw);
        }
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let filter = ProductFilter {
            category: Some("hats".into()),
            ..Default::default()
        };
        assert!(matches!(
            filter.into_query(),
            Err(ProductError::Validation(_))
        ));
    }
}
