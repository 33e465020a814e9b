//! Filter/sort compiler.
//!
//! Turns a validated [`ProductSearch`] into a storage-agnostic
//! [`ProductQuery`]: a list of ANDed predicates, one ordering and the page
//! window. Repositories apply it; nothing here touches a store.

use rust_decimal::Decimal;
use std::cmp;
use std::str::FromStr;

use crate::models::{Product, SortOption};
use crate::search::ProductSearch;

/// A single filter condition. A product matches a query when it matches
/// every predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring of the name, matched literally
    NameContains(String),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
    CategoryIs(i64),
    InStock(bool),
    RatingAtLeast(f64),
}

impl Predicate {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::NameContains(needle) => product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::PriceAtLeast(min) => product.price >= *min,
            Predicate::PriceAtMost(max) => product.price <= *max,
            Predicate::CategoryIs(id) => product.category_id == *id,
            Predicate::InStock(in_stock) => product.in_stock == *in_stock,
            Predicate::RatingAtLeast(min) => product.rating >= *min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Rating,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Primary sort key plus direction. Ties are broken by `id` in the same
/// direction so that pages never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub key: SortKey,
    pub direction: Direction,
}

impl Ordering {
    pub fn compare(&self, a: &Product, b: &Product) -> cmp::Ordering {
        let primary = match self.key {
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Rating => a.rating.total_cmp(&b.rating),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));

        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl From<SortOption> for Ordering {
    fn from(sort: SortOption) -> Self {
        let (key, direction) = match sort {
            SortOption::PriceAsc => (SortKey::Price, Direction::Asc),
            SortOption::PriceDesc => (SortKey::Price, Direction::Desc),
            SortOption::RatingDesc => (SortKey::Rating, Direction::Desc),
            SortOption::Newest => (SortKey::CreatedAt, Direction::Desc),
        };
        Self { key, direction }
    }
}

/// Everything a repository needs to run one search.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub predicates: Vec<Predicate>,
    pub ordering: Ordering,
    /// 1-based
    pub page: u64,
    pub per_page: u64,
}

impl ProductQuery {
    pub fn compile(search: &ProductSearch) -> Self {
        let mut predicates = Vec::new();

        if let Some(q) = &search.q {
            predicates.push(Predicate::NameContains(q.clone()));
        }
        if let Some(price_from) = search.price_from {
            predicates.push(Predicate::PriceAtLeast(price_bound(price_from)));
        }
        if let Some(price_to) = search.price_to {
            predicates.push(Predicate::PriceAtMost(price_bound(price_to)));
        }
        if let Some(category_id) = search.category_id {
            predicates.push(Predicate::CategoryIs(category_id));
        }
        if let Some(in_stock) = search.in_stock {
            predicates.push(Predicate::InStock(in_stock));
        }
        if let Some(rating_from) = search.rating_from {
            predicates.push(Predicate::RatingAtLeast(rating_from));
        }

        Self {
            predicates,
            ordering: search.sort.into(),
            page: u64::try_from(search.page).unwrap_or(1).max(1),
            per_page: u64::try_from(search.per_page).unwrap_or(1).max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }
}

/// Converts a validated price bound through its shortest decimal
/// representation, so `899.99` compares equal to a stored `899.99`.
/// Bounds beyond the decimal range saturate.
fn price_bound(value: f64) -> Decimal {
    Decimal::from_str(&value.to_string()).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Escapes `LIKE` wildcards so the needle is matched literally.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
