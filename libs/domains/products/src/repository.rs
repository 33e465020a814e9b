use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{Category, NewProduct, Page, Product, ProductWithCategory};
use crate::query::ProductQuery;

/// Repository trait for the product catalog
///
/// Read-only: the endpoint never writes. Implementations apply a compiled
/// [`ProductQuery`] and eager-load each product's category.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Check whether a category with this id exists
    async fn category_exists(&self, id: i64) -> ProductResult<bool>;

    /// Run a filtered, sorted and paginated search
    async fn search(&self, query: &ProductQuery) -> ProductResult<Page<ProductWithCategory>>;
}

#[derive(Default)]
struct Catalog {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    next_category_id: i64,
    next_product_id: i64,
}

/// In-memory catalog for tests and running the API without PostgreSQL.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same seven categories and five products the seed migration inserts.
    pub fn with_seed_data() -> Self {
        let mut catalog = Catalog::default();

        let electronic = catalog.add_category("Electronics", "electronic");
        let clothing = catalog.add_category("Clothing", "clothing");
        catalog.add_category("Shoes", "shoes");
        let books = catalog.add_category("Books", "books");
        catalog.add_category("Home & Garden", "garden");
        catalog.add_category("Beauty & Health", "health");
        let sport = catalog.add_category("Sports & Outdoors", "sport");

        let seed = [
            ("iPhone 15", "99999.99", electronic, true, 4.8),
            ("MacBook", "124999.99", electronic, true, 0.0),
            ("Jeans", "4999.99", clothing, true, 0.0),
            ("War and Peace", "899.99", books, true, 4.7),
            ("Treadmill", "45999.99", sport, false, 4.3),
        ];
        for (name, price, category_id, in_stock, rating) in seed {
            let price = Decimal::from_str(price).unwrap_or_default();
            catalog.add_product(
                NewProduct::new(name, price, category_id)
                    .in_stock(in_stock)
                    .rating(rating),
            );
        }

        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    pub async fn insert_category(&self, name: &str, slug: &str) -> Category {
        let mut catalog = self.catalog.write().await;
        let id = catalog.add_category(name, slug);
        catalog.categories[&id].clone()
    }

    pub async fn insert_product(&self, input: NewProduct) -> Product {
        let mut catalog = self.catalog.write().await;
        let id = catalog.add_product(input);
        catalog.products[&id].clone()
    }
}

impl Catalog {
    fn add_category(&mut self, name: &str, slug: &str) -> i64 {
        self.next_category_id += 1;
        let id = self.next_category_id;
        let now = Utc::now();
        self.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                description: None,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    fn add_product(&mut self, input: NewProduct) -> i64 {
        self.next_product_id += 1;
        let id = self.next_product_id;
        let created_at = input.created_at.unwrap_or_else(Utc::now);
        self.products.insert(
            id,
            Product {
                id,
                name: input.name,
                price: input.price.round_dp(2),
                category_id: input.category_id,
                in_stock: input.in_stock,
                rating: input.rating,
                created_at,
                updated_at: created_at,
            },
        );
        id
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn category_exists(&self, id: i64) -> ProductResult<bool> {
        Ok(self.catalog.read().await.categories.contains_key(&id))
    }

    async fn search(&self, query: &ProductQuery) -> ProductResult<Page<ProductWithCategory>> {
        let catalog = self.catalog.read().await;

        let mut matching: Vec<&Product> = catalog
            .products
            .values()
            .filter(|product| query.matches(product))
            .collect();
        matching.sort_by(|a, b| query.ordering.compare(a, b));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.per_page).unwrap_or(usize::MAX))
            .map(|product| ProductWithCategory {
                product: product.clone(),
                category: catalog.categories.get(&product.category_id).cloned(),
            })
            .collect();

        Ok(Page::new(items, total, query.page, query.per_page))
    }
}
