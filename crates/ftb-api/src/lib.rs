//! # ftb-api
//!
//! HTTP composition layer for the FTB dataset catalog.
//!
//! This crate provides the read-only API surface, handling:
//!
//! - **Visibility**: resolving whether a request sees published data only or
//!   the latest drafts as well
//! - **Routing**: the dataset → edition → version → dimension hierarchy
//! - **Error Mapping**: catalog failures to stable HTTP status codes
//! - **Observability**: Metrics, tracing, request ids and health checks
//!
//! ## Design Principles
//!
//! This crate is a **thin composition layer** with no domain policy.
//! Variant selection, state validation and metadata composition live in
//! `ftb-catalog`.
//!
//! ## Endpoints
//!
//! ```text
//!   GET /health                                   - Health check
//!   GET /ready                                    - Readiness check (store ping)
//!   GET /metrics                                  - Prometheus metrics
//!   GET /openapi.json                             - OpenAPI document
//!   GET /datasets[/{id}]                          - Datasets
//!   GET /datasets/{id}/editions[/{edition}]       - Editions
//!   GET .../editions/{edition}/versions[/{n}]     - Versions
//!   GET .../versions/{n}/metadata                 - Composed metadata
//!   GET .../versions/{n}/dimensions               - Dimensions
//!   GET .../dimensions/{name}/options             - Dimension options (paged)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ftb_api::server::Server;
//!
//! let server = Server::builder()
//!     .bind_addr("127.0.0.1:10400".parse()?)
//!     .enable_private_endpoints(true)
//!     .build();
//!
//! server.serve().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod server;
