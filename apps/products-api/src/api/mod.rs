//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().merge(products::router(state))
}

/// Readiness route, mounted at the root next to `/health`
pub fn ready_router(state: AppState) -> Router {
    health::router(state)
}

#[cfg(test)]
mod tests {
    use crate::openapi::ApiDoc;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use domain_products::{InMemoryProductRepository, ProductService, handlers};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let service = ProductService::new(InMemoryProductRepository::with_seed_data());
        axum_helpers::with_common_layers::<ApiDoc>(handlers::router(service))
    }

    #[tokio::test]
    async fn test_products_are_served_under_api_prefix() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/products?per_page=2&sort=price_asc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["meta"]["path"], "/api/products");
        assert_eq!(
            body["links"]["next"],
            "/api/products?per_page=2&sort=price_asc&page=2"
        );
        assert_eq!(body["data"][0]["name"], "War and Peace");
    }

    #[tokio::test]
    async fn test_products_reject_other_methods_with_json_405() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "METHOD_NOT_ALLOWED");
    }
}
