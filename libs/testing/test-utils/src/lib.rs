//! Shared test utilities for the catalog crates
//!
//! - `TestDatabase`: migrated database, in-memory SQLite by default or a
//!   PostgreSQL container with the `postgres` feature
//! - `TestDataBuilder`: deterministic product payloads
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let payload = builder.product_payload();
//!     let name = builder.name("product", "main");
//! }
//! ```

use serde_json::{Value, json};

mod database;

pub use database::TestDatabase;

const PRODUCT_NAMES: [&str; 8] = [
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford",
];
const CATEGORIES: [&str; 6] = [
    "UNKNOWN",
    "CLOTHS",
    "FOOD",
    "HOUSEWARES",
    "AUTOMOTIVE",
    "TOOLS",
];

/// Builder for test data with deterministic randomization
///
/// The same seed always yields the same payloads, so failures reproduce.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Product JSON payload as a client would POST it (no id).
    pub fn product_payload(&self) -> Value {
        self.product_payload_at(0)
    }

    /// `count` distinct product payloads.
    pub fn product_payloads(&self, count: usize) -> Vec<Value> {
        (0..count as u64).map(|i| self.product_payload_at(i)).collect()
    }

    fn product_payload_at(&self, index: u64) -> Value {
        let n = self.mix(index);
        let name = PRODUCT_NAMES[(n % PRODUCT_NAMES.len() as u64) as usize];
        let category = CATEGORIES[((n >> 8) % CATEGORIES.len() as u64) as usize];
        let cents = (n >> 16) % 100_000;

        json!({
            "name": name,
            "description": format!("{} #{}", name, index),
            "price": format!("{}.{:02}", cents / 100, cents % 100),
            "available": (n >> 32) % 2 == 0,
            "category": category,
        })
    }

    // splitmix64
    fn mix(&self, index: u64) -> u64 {
        let mut z = self
            .seed
            .wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.product_payloads(5), builder2.product_payloads(5));
        assert_eq!(
            builder1.name("product", "test"),
            builder2.name("product", "test")
        );
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.name("p", "s"), builder2.name("p", "s"));
    }

    #[test]
    fn test_product_payload_shape() {
        let builder = TestDataBuilder::from_test_name("shape");

        for payload in builder.product_payloads(20) {
            assert!(payload.get("id").is_none());
            assert!(PRODUCT_NAMES.contains(&payload["name"].as_str().unwrap()));
            assert!(CATEGORIES.contains(&payload["category"].as_str().unwrap()));
            assert!(payload["available"].is_boolean());

            let price = payload["price"].as_str().unwrap();
            let (whole, frac) = price.split_once('.').unwrap();
            assert!(whole.parse::<u64>().is_ok());
            assert_eq!(frac.len(), 2);
        }
    }
}
