//! Client core for the task service.
//!
//! # Overview
//! Two layers sit on top of the REST backend:
//! - the task client: `TaskClient` builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network, and `TaskApi`
//!   runs that round-trip over a `Transport` (reqwest in production);
//! - the task store: `TaskStore` owns the in-memory collection a UI renders,
//!   fetches it with fixed-interval retry at startup and applies writes only
//!   once the server has confirmed them.
//!
//! # Design
//! - `TaskClient` is stateless; it holds only `base_url`.
//! - The base address is resolved once from `ClientConfig` and never
//!   re-evaluated per request.
//! - All failures collapse into `ApiError`, which always carries a message.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod types;

pub use api::{TaskApi, TaskService};
pub use client::TaskClient;
pub use config::{ClientConfig, ConfigError, HostMode};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use store::{RetryPolicy, TaskStore};
pub use types::{DeleteConfirmation, NewTask, Priority, PriorityBuckets, RootInfo, Task, TaskFilter};
