use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Sort orders accepted by `GET /products`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOption {
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Best rated first
    RatingDesc,
    /// Most recently created first
    #[default]
    Newest,
}

impl SortOption {
    /// Every accepted value, in documentation order.
    pub fn all() -> Vec<SortOption> {
        SortOption::iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Stable identifier, e.g. `electronic`
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Exact price with 2 fractional digits
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub category_id: i64,
    pub in_stock: bool,
    /// 0.0 to 5.0
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product row with its eagerly loaded category.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category: Option<Category>,
}

/// Input for seeding the in-memory repository.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category_id: i64,
    pub in_stock: bool,
    pub rating: f64,
    /// Defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, category_id: i64) -> Self {
        Self {
            name: name.into(),
            price,
            category_id,
            in_stock: true,
            rating: 0.0,
            created_at: None,
        }
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// One page of a paginated result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows matching the filters across all pages
    pub total: u64,
    /// 1-based
    pub page: u64,
    pub per_page: u64,
    /// Never below 1, even when `total` is 0
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let last_page = total.div_ceil(per_page.max(1)).max(1);
        Self {
            items,
            total,
            page,
            per_page,
            last_page,
        }
    }

    /// 1-based position of the first item on this page, `None` when the page is empty.
    pub fn from(&self) -> Option<u64> {
        (!self.items.is_empty()).then(|| (self.page - 1) * self.per_page + 1)
    }

    /// 1-based position of the last item on this page, `None` when the page is empty.
    pub fn to(&self) -> Option<u64> {
        self.from().map(|from| from + self.items.len() as u64 - 1)
    }
}
