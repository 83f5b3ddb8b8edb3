//! # personae
//!
//! A small HTTP API for person records whose every input is validated
//! against a declared schema before a handler runs.
//!
//! ## Layers
//!
//! - [`schema`] — `Person`, `Location`, `LoginOut` and their field rules
//! - [`validation`] — structured, exhaustive failure reports (`422`)
//! - [`extract`] — binds path, query, header, cookie, JSON, form and file inputs
//! - [`routes`] — one handler per endpoint
//! - [`Router`] / [`Server`] — radix-tree dispatch over hyper, graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use personae::{Server, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), personae::Error> {
//!     let addr = "127.0.0.1:8000".parse().unwrap();
//!     Server::bind(addr).serve(routes::router()).await
//! }
//! ```
//!
//! Requests can also be driven without a socket, which is how the tests
//! exercise the API:
//!
//! ```rust
//! # async fn demo() {
//! let res = personae::routes::router()
//!     .handle(http::Request::get("/").body(bytes::Bytes::new()).unwrap())
//!     .await;
//! assert_eq!(res.body(), br#"{"message":"Hello World!"}"#);
//! # }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod extract;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod validation;

pub use config::Config;
pub use error::{ApiError, Error};
pub use extract::Extract;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
