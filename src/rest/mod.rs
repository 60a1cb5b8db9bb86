//! Framework-agnostic REST surface.
//!
//! Handlers take the request's [`ResolutionContext`](crate::ResolutionContext)
//! plus already-decoded path/query/body values and return typed results.
//! [`ApiResponse::from_result`] turns those into a status code and JSON body,
//! leaving routing and wire handling to whatever HTTP framework hosts them.
//!
//! # Integration Flow
//!
//! ```text
//! HTTP request
//!   ↓
//! framework builds ResolutionContext (request id + security context)
//!   ↓
//! ProjectRestService::<operation>(&mut ctx, ...)
//!   ↓ permission check, payload validation, service call
//! Result<T, Error>
//!   ↓
//! ApiResponse::from_result -> (status, JSON body)
//! ```

mod project;
mod response;

pub use project::ProjectRestService;
pub use response::{ApiResponse, ErrorResponse, IdResponse};
