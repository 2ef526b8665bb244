//! pathcors - path-scoped CORS rules for axum services.
//!
//! A Corsfile holds one `cors` directive per rule:
//!
//! ```text
//! cors http://a.com,http://b.com /api {
//!     methods "GET, POST"
//!     allow_credentials true
//!     max_age 600
//! }
//! cors /
//! ```
//!
//! [`rules::parse_str`] / [`rules::load_rules`] turn that into an ordered
//! list of [`rules::CorsRule`], and [`middleware::CorsDispatcher`] applies
//! the first rule whose path prefix matches each request.

pub mod config;
pub mod cors;
pub mod dispenser;
pub mod error;
pub mod lexer;
pub mod middleware;
pub mod routes;
pub mod rules;
pub mod server;
pub mod state;
