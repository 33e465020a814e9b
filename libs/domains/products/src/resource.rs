//! JSON shaping for product listings.
//!
//! A [`ProductCollection`] is `data` (one [`ProductResource`] per row),
//! `links` (first/last/prev/next page URLs) and `meta` (pagination plus the
//! filters and sort that were applied). Building it is a pure function of
//! the search result, the request path/query and the supplied timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, ProductWithCategory, SortOption};
use crate::service::ProductSearchResult;

pub const API_VERSION: &str = "1.0";

/// Field names of [`ProductResource`], as advertised in `meta.product_fields`.
pub const PRODUCT_FIELDS: [&str; 9] = [
    "id",
    "name",
    "price",
    "category_id",
    "in_stock",
    "rating",
    "created_at",
    "updated_at",
    "category",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductResource {
    pub id: i64,
    pub name: String,
    /// Two fractional digits at most
    pub price: f64,
    pub category_id: i64,
    pub in_stock: bool,
    /// Rounded to one decimal
    pub rating: f64,
    /// UTC, `YYYY-MM-DD HH:MM:SS`
    #[schema(example = "2026-01-16 09:30:00")]
    pub created_at: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`
    #[schema(example = "2026-01-16 09:30:00")]
    pub updated_at: String,
    /// Present only when the category was loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

impl From<&ProductWithCategory> for ProductResource {
    fn from(row: &ProductWithCategory) -> Self {
        let product = &row.product;
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.round_dp(2).to_f64().unwrap_or_default(),
            category_id: product.category_id,
            in_stock: product.in_stock,
            rating: (product.rating * 10.0).round() / 10.0,
            created_at: product.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: product.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            category: row.category.as_ref().map(CategorySummary::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginationLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CollectionMeta {
    pub current_page: u64,
    /// 1-based position of the first item, null on an empty page
    pub from: Option<u64>,
    pub last_page: u64,
    pub path: String,
    pub per_page: u64,
    /// 1-based position of the last item, null on an empty page
    pub to: Option<u64>,
    pub total: u64,
    /// Filter keys present in the request
    pub filters_applied: Vec<String>,
    pub sort_applied: SortOption,
    pub available_sorts: Vec<SortOption>,
    #[schema(example = "1.0")]
    pub api_version: String,
    pub product_fields: Vec<String>,
    /// RFC 3339, time the response was built
    pub timestamp: String,
}

/// Response body of `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductCollection {
    pub data: Vec<ProductResource>,
    pub links: PaginationLinks,
    pub meta: CollectionMeta,
}

/// Where the request came from, used to build pagination links.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request path, e.g. `/api/products`
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, query: Option<&str>) -> Self {
        Self {
            path: path.into(),
            query: query.map(str::to_owned),
        }
    }

    /// URL of `page`, keeping every other query parameter as sent.
    pub fn page_url(&self, page: u64) -> String {
        let mut params: Vec<&str> = self
            .query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty() && !is_page_param(pair))
            .collect();
        let page_param = format!("page={page}");
        params.push(&page_param);

        format!("{}?{}", self.path, params.join("&"))
    }
}

fn is_page_param(pair: &str) -> bool {
    let key = pair.split_once('=').map_or(pair, |(key, _)| key);
    urlencoding::decode(key).is_ok_and(|key| key == "page")
}

impl ProductCollection {
    pub fn new(
        result: &ProductSearchResult,
        context: &RequestContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let page = &result.page;

        let links = PaginationLinks {
            first: context.page_url(1),
            last: context.page_url(page.last_page),
            prev: (page.page > 1).then(|| context.page_url(page.page - 1)),
            next: (page.page < page.last_page).then(|| context.page_url(page.page + 1)),
        };

        let meta = CollectionMeta {
            current_page: page.page,
            from: page.from(),
            last_page: page.last_page,
            path: context.path.clone(),
            per_page: page.per_page,
            to: page.to(),
            total: page.total,
            filters_applied: result
                .search
                .filters_applied()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            sort_applied: result.search.sort,
            available_sorts: SortOption::all(),
            api_version: API_VERSION.to_string(),
            product_fields: PRODUCT_FIELDS.iter().map(|f| f.to_string()).collect(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        Self {
            data: page.items.iter().map(ProductResource::from).collect(),
            links,
            meta,
        }
    }
}
