use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::{
    entity::{category, product},
    error::ProductResult,
    models::{Page, ProductWithCategory},
    query::{Direction, Predicate, ProductQuery, SortKey, escape_like},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// ANDs the predicates into one condition on the `products` table.
fn condition(predicates: &[Predicate]) -> Condition {
    predicates
        .iter()
        .fold(Condition::all(), |condition, predicate| match predicate {
            Predicate::NameContains(needle) => condition.add(Expr::cust_with_values(
                r#""products"."name" ILIKE $1"#,
                [format!("%{}%", escape_like(needle))],
            )),
            Predicate::PriceAtLeast(min) => condition.add(product::Column::Price.gte(*min)),
            Predicate::PriceAtMost(max) => condition.add(product::Column::Price.lte(*max)),
            Predicate::CategoryIs(id) => condition.add(product::Column::CategoryId.eq(*id)),
            Predicate::InStock(in_stock) => condition.add(product::Column::InStock.eq(*in_stock)),
            Predicate::RatingAtLeast(min) => condition.add(product::Column::Rating.gte(*min)),
        })
}

/// Row offset of the requested page, `None` when it starts past the last row.
///
/// Checked here so an oversized `page` never reaches the driver, which only
/// binds offsets that fit in an `i64`.
fn page_offset(query: &ProductQuery, total: u64) -> Option<u64> {
    let offset = query.offset();
    (offset < total).then_some(offset)
}

fn sort_column(key: SortKey) -> product::Column {
    match key {
        SortKey::Price => product::Column::Price,
        SortKey::Rating => product::Column::Rating,
        SortKey::CreatedAt => product::Column::CreatedAt,
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn category_exists(&self, id: i64) -> ProductResult<bool> {
        let count = category::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn search(&self, query: &ProductQuery) -> ProductResult<Page<ProductWithCategory>> {
        let order = match query.ordering.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };

        let filter = condition(&query.predicates);
        let total = product::Entity::find()
            .filter(filter.clone())
            .count(&self.db)
            .await?;

        let Some(offset) = page_offset(query, total) else {
            tracing::debug!(total, page = query.page, "Requested page is past the end");
            return Ok(Page::new(Vec::new(), total, query.page, query.per_page));
        };

        let rows = product::Entity::find()
            .filter(filter)
            .order_by(sort_column(query.ordering.key), order.clone())
            .order_by(product::Column::Id, order)
            .find_also_related(category::Entity)
            .offset(offset)
            .limit(query.per_page)
            .all(&self.db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(product, category)| ProductWithCategory {
                product: product.into(),
                category: category.map(Into::into),
            })
            .collect();

        tracing::debug!(total, page = query.page, "Fetched product page");
        Ok(Page::new(items, total, query.page, query.per_page))
    }
}
