use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{ProductError, ProductResult};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;

/// Currency precision of [`Product::price`].
pub const PRICE_SCALE: u32 = 2;

/// Product category
///
/// The label (`CLOTHS`, `FOOD`, ...) is the only representation that leaves
/// the process: JSON bodies, query strings and the `category` column all use it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    #[sea_orm(string_value = "UNKNOWN")]
    Unknown,
    #[sea_orm(string_value = "CLOTHS")]
    Cloths,
    #[sea_orm(string_value = "FOOD")]
    Food,
    #[sea_orm(string_value = "HOUSEWARES")]
    Housewares,
    #[sea_orm(string_value = "AUTOMOTIVE")]
    Automotive,
    #[sea_orm(string_value = "TOOLS")]
    Tools,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }

    /// Exact label match, as required in request bodies.
    pub fn from_label(label: &str) -> ProductResult<Self> {
        Category::from_str(label).map_err(|_| {
            ProductError::Validation(format!(
                "Invalid attribute: category '{}' is not one of {}",
                label,
                Category::VARIANTS.join(", ")
            ))
        })
    }

    /// Case-insensitive match, for query strings (`?category=cloths`).
    pub fn from_label_ignore_case(label: &str) -> ProductResult<Self> {
        Self::from_label(&label.trim().to_ascii_uppercase())
    }
}

/// A catalog item.
///
/// A product without an `id` has never been stored. Persistence goes through
/// the active-record methods ([`Product::create`], [`Product::update`],
/// [`Product::delete`]), which take the repository explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate, ToSchema)]
pub struct Product {
    /// Assigned by the store on create
    #[schema(example = 1)]
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    #[schema(example = "Fedora")]
    pub name: String,
    #[schema(example = "A red hat")]
    pub description: Option<String>,
    /// Decimal amount with two fractional digits, as a string
    #[validate(custom(function = "validate_price"))]
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            price: normalize_price(Decimal::ZERO),
            available: true,
            category: Category::Unknown,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price")
            .with_message("price must not be negative".into()));
    }
    if price_to_cents(*price).is_none() {
        return Err(ValidationError::new("price_out_of_range")
            .with_message("price is too large".into()));
    }
    Ok(())
}

/// Round half away from zero to [`PRICE_SCALE`] digits and pin the scale,
/// so `12.5` and `12.50` are the same value and both print as `12.50`.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut price =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(PRICE_SCALE);
    price
}

pub(crate) fn price_to_cents(price: Decimal) -> Option<i64> {
    normalize_price(price)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

pub(crate) fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price: normalize_price(price),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Price in integer cents, as stored.
    pub fn price_cents(&self) -> ProductResult<i64> {
        price_to_cents(self.price)
            .ok_or_else(|| ProductError::Validation("price is too large".to_string()))
    }

    /// Field checks that must pass before anything is written.
    pub fn check(&self) -> ProductResult<()> {
        self.validate()
            .map_err(|e| ProductError::Validation(e.to_string()))
    }

    /// Wire representation: `id`, `name`, `description`, `price` (decimal
    /// string), `available`, `category` (label).
    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.as_str(),
        })
    }

    /// Overwrite every field except `id` from a JSON object.
    ///
    /// Either all fields are applied or, on error, none are.
    pub fn deserialize(&mut self, data: &Value) -> ProductResult<&mut Self> {
        let object = data.as_object().ok_or_else(|| {
            ProductError::Validation("Invalid product: body of request contained bad or no data".into())
        })?;

        let name = required_str(object, "name")?;
        if name.is_empty() {
            return Err(ProductError::Validation(
                "Invalid product: name must not be empty".into(),
            ));
        }
        let description = optional_str(object, "description")?;
        let price = parse_price(object)?;
        let available = match object.get("available") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(invalid_type("available", "boolean", other));
            }
        };
        let category = match object.get("category") {
            None | Some(Value::Null) => Category::Unknown,
            Some(Value::String(label)) => Category::from_label(label)?,
            Some(other) => return Err(invalid_type("category", "string", other)),
        };

        self.name = name.to_string();
        self.description = description.map(str::to_string);
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(self)
    }

    /// New transient product from a JSON object. Any `id` in `data` is ignored.
    pub fn from_json(data: &Value) -> ProductResult<Self> {
        let mut product = Product::default();
        product.deserialize(data)?;
        Ok(product)
    }

    /// Store a transient product and record the id the store assigned.
    pub async fn create<R>(&mut self, repo: &R) -> ProductResult<()>
    where
        R: ProductRepository + ?Sized,
    {
        if self.id.is_some() {
            return Err(ProductError::Validation(
                "called create on a product that already has an id".into(),
            ));
        }
        self.check()?;

        let created = repo.create(self).await?;
        tracing::info!(product_id = ?created.id, name = %created.name, "Created product");
        self.id = created.id;
        Ok(())
    }

    /// Write every field over the stored row with the same id.
    pub async fn update<R>(&self, repo: &R) -> ProductResult<()>
    where
        R: ProductRepository + ?Sized,
    {
        if self.id.is_none() {
            return Err(ProductError::Validation(
                "called update on empty id field".into(),
            ));
        }
        self.check()?;

        repo.update(self).await?;
        Ok(())
    }

    /// Remove the stored row. The in-memory value keeps its id but no longer
    /// refers to anything.
    pub async fn delete<R>(&self, repo: &R) -> ProductResult<()>
    where
        R: ProductRepository + ?Sized,
    {
        let id = self.id.ok_or_else(|| {
            ProductError::Validation("called delete on empty id field".into())
        })?;

        if repo.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound(id))
        }
    }

    /// `None` when no product has this id.
    pub async fn find<R>(repo: &R, id: i32) -> ProductResult<Option<Product>>
    where
        R: ProductRepository + ?Sized,
    {
        repo.find(id).await
    }

    /// Every stored product, ascending by id.
    pub async fn all<R>(repo: &R) -> ProductResult<Vec<Product>>
    where
        R: ProductRepository + ?Sized,
    {
        ProductQuery::all().fetch(repo).await
    }

    pub fn find_by_name(name: impl Into<String>) -> ProductQuery {
        ProductQuery::all().and_name(name)
    }

    pub fn find_by_availability(available: bool) -> ProductQuery {
        ProductQuery::all().and_available(available)
    }

    pub fn find_by_category(category: Category) -> ProductQuery {
        ProductQuery::all().and_category(category)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn missing(key: &str) -> ProductError {
    ProductError::Validation(format!("Invalid product: missing {}", key))
}

fn invalid_type(key: &str, expected: &str, found: &Value) -> ProductError {
    ProductError::Validation(format!(
        "Invalid type for {}: expected {}, found {}",
        key,
        expected,
        type_name(found)
    ))
}

fn required_str<'a>(object: &'a Map<String, Value>, key: &str) -> ProductResult<&'a str> {
    match object.get(key) {
        None | Some(Value::Null) => Err(missing(key)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(invalid_type(key, "string", other)),
    }
}

fn optional_str<'a>(object: &'a Map<String, Value>, key: &str) -> ProductResult<Option<&'a str>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(invalid_type(key, "string", other)),
    }
}

fn parse_price(object: &Map<String, Value>) -> ProductResult<Decimal> {
    let raw = match object.get("price") {
        None | Some(Value::Null) => return Err(missing("price")),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(invalid_type("price", "decimal string or number", other)),
    };

    let price = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| {
            ProductError::Validation(format!("Invalid product: price '{}' is not a decimal", raw))
        })?;

    Ok(normalize_price(price))
}
