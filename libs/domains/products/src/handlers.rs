//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    routing::get,
};
use axum_helpers::errors::responses::{
    BadRequestResponse, InternalServerErrorResponse, ValidationErrorResponse,
};
use chrono::Utc;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::SortOption;
use crate::repository::ProductRepository;
use crate::resource::{
    CategorySummary, CollectionMeta, PaginationLinks, ProductCollection, ProductResource,
    RequestContext,
};
use crate::search::ProductSearchQuery;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products),
    components(
        schemas(
            ProductCollection, ProductResource, CategorySummary,
            PaginationLinks, CollectionMeta, SortOption
        ),
        responses(
            ValidationErrorResponse,
            BadRequestResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog listing")
    )
)]
pub struct ApiDoc;

/// Create the products router: `GET /products`
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products))
        .with_state(shared_service)
}

/// List products with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductSearchQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductCollection),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ProductSearchQuery>, QueryRejection>,
) -> ProductResult<Json<ProductCollection>> {
    let Query(raw) = query?;
    let result = service.search(&raw).await?;

    let context = RequestContext::new(uri.path(), uri.query());
    Ok(Json(ProductCollection::new(&result, &context, Utc::now())))
}
