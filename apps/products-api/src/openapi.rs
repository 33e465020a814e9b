//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "0.1.0",
        description = "Read-only product catalog: filtering, sorting and pagination",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_products::handlers::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog listing")
    )
)]
pub struct ApiDoc;
