//! Synchronous client core for the student records service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `StudentClient` is stateless; it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `RecordStore` and `Session` run those operations over a `Transport`
//!   supplied by the host.
//! - `StudentView` is the view controller: list, draft, error banner and
//!   per-action request state, with every mutation followed by a full list
//!   re-fetch.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use client::{StudentClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ViewError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use session::Session;
pub use store::RecordStore;
pub use types::{Draft, Field, Student, StudentId, StudentInput};
pub use view::{ActionKind, Completion, Mode, PendingRequest, RequestState, StudentView, Ticket};
