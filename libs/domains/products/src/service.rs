//! Product Service - search orchestration

use std::borrow::Cow;
use std::sync::Arc;
use tracing::instrument;
use validator::{ValidationError, ValidationErrors};

use crate::error::{ProductError, ProductResult};
use crate::models::{Page, ProductWithCategory};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;
use crate::search::{ProductSearch, ProductSearchQuery};

/// A page of products together with the parameters that produced it.
#[derive(Debug, Clone)]
pub struct ProductSearchResult {
    pub search: ProductSearch,
    pub page: Page<ProductWithCategory>,
}

/// Product service
///
/// Validates the request, checks that a filtered category exists and runs
/// the compiled query against the repository. Invalid requests never reach
/// the store's product table.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, raw))]
    pub async fn search(&self, raw: &ProductSearchQuery) -> ProductResult<ProductSearchResult> {
        let search = ProductSearch::from_query(raw).inspect_err(|errors| {
            let fields: Vec<_> = errors.field_errors().into_keys().collect();
            tracing::info!(?fields, "Rejected product search");
        })?;

        if let Some(category_id) = search.category_id
            && !self.repository.category_exists(category_id).await?
        {
            tracing::info!(category_id, "Rejected product search for unknown category");
            return Err(ProductError::Validation(unknown_category(category_id)));
        }

        let query = ProductQuery::compile(&search);
        let page = self.repository.search(&query).await.inspect_err(|e| {
            tracing::error!(error = %e, "Product search failed");
        })?;

        tracing::info!(
            filters = ?search.filters_applied(),
            sort = %search.sort,
            page = query.page,
            per_page = query.per_page,
            total = page.total,
            "Product search"
        );

        Ok(ProductSearchResult { search, page })
    }
}

fn unknown_category(category_id: i64) -> ValidationErrors {
    let mut error = ValidationError::new("exists")
        .with_message(Cow::Borrowed("The selected category id is invalid."));
    error.add_param(Cow::Borrowed("value"), &category_id);

    let mut errors = ValidationErrors::new();
    errors.add("category_id", error);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOption;
    use crate::query::{Predicate, SortKey};
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    fn raw(category_id: Option<&str>, rating_from: Option<&str>) -> ProductSearchQuery {
        ProductSearchQuery {
            category_id: category_id.map(str::to_string),
            rating_from: rating_from.map(str::to_string),
            ..ProductSearchQuery::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_request_never_touches_the_store() {
        let mut mock = MockProductRepository::new();
        mock.expect_category_exists().never();
        mock.expect_search().never();

        let service = ProductService::new(mock);
        let err = service.search(&raw(Some("1"), Some("6"))).await.unwrap_err();

        match err {
            ProductError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("rating_from"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_category_is_a_validation_error() {
        let mut mock = MockProductRepository::new();
        mock.expect_category_exists()
            .with(eq(99))
            .times(1)
            .returning(|_| Ok(false));
        mock.expect_search().never();

        let service = ProductService::new(mock);
        let err = service.search(&raw(Some("99"), None)).await.unwrap_err();

        match err {
            ProductError::Validation(errors) => {
                let field_errors = errors.field_errors();
                assert_eq!(field_errors["category_id"][0].code, "exists");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_existing_category_is_searched() {
        let mut mock = MockProductRepository::new();
        mock.expect_category_exists()
            .with(eq(1))
            .returning(|_| Ok(true));
        mock.expect_search()
            .withf(|query| {
                query.predicates == vec![Predicate::CategoryIs(1)]
                    && query.ordering.key == SortKey::CreatedAt
                    && query.per_page == 15
            })
            .times(1)
            .returning(|query| Ok(Page::new(vec![], 0, query.page, query.per_page)));

        let service = ProductService::new(mock);
        let result = service.search(&raw(Some("1"), None)).await.unwrap();

        assert_eq!(result.search.sort, SortOption::Newest);
        assert_eq!(result.search.category_id, Some(1));
        assert_eq!(result.page.total, 0);
    }

    #[tokio::test]
    async fn test_no_category_filter_skips_existence_check() {
        let mut mock = MockProductRepository::new();
        mock.expect_category_exists().never();
        mock.expect_search()
            .times(1)
            .returning(|query| Ok(Page::new(vec![], 0, query.page, query.per_page)));

        let service = ProductService::new(mock);
        assert!(service.search(&ProductSearchQuery::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock = MockProductRepository::new();
        mock.expect_search()
            .returning(|_| Err(ProductError::Database(DbErr::Custom("connection reset".into()))));

        let service = ProductService::new(mock);
        let err = service.search(&ProductSearchQuery::default()).await.unwrap_err();
        assert!(matches!(err, ProductError::Database(_)));
    }
}
