//! # inventory-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api/0.1.0` (`POST /devices`, `GET /devices/{id}`)
//! - Hand raw request bodies to the domain decoder, so payload validation
//!   and its error messages are owned by the domain, not by an extractor
//! - Map application results into HTTP status codes and `{"error": …}` bodies
//! - Tag every request/response pair with an `x-request-id` and log it
//!
//! ## Dependency rule
//! Depends on `inventory-app` (for port traits and services) and
//! `inventory-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
