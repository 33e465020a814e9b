//! Products Domain
//!
//! Read-only product catalog: `GET /products` with filtering, sorting and
//! pagination over products and their categories.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoint, OpenAPI
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, category existence, search orchestration
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Query    │  ← Pure filter/sort compiler (predicates + ordering)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! Responses are shaped by [`resource`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let repository = InMemoryProductRepository::with_seed_data();
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod resource;
pub mod search;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{Category, NewProduct, Page, Product, ProductWithCategory, SortOption};
pub use postgres::PgProductRepository;
pub use query::{Direction, Ordering, Predicate, ProductQuery, SortKey};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use resource::{ProductCollection, ProductResource, RequestContext};
pub use search::{ProductSearch, ProductSearchQuery};
pub use service::{ProductSearchResult, ProductService};
