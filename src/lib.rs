//! Project entities for a content-aggregation API.
//!
//! This crate provides:
//! - **Identity resolution**: turning a request's security context into an
//!   authenticated provider or contributor, with the contributor id cached
//!   for the lifetime of one request
//! - **Store/index pairing**: a project service that writes to the primary
//!   entity store and mirrors every change into a search index
//! - **REST handlers**: framework-agnostic project endpoints with payload
//!   validation and HTTP status mapping
//!
//! # Core Types
//!
//! - [`SecurityContext`]: capability view of the caller's security information
//! - [`ResolutionContext`]: per-request context carrying the contributor cache
//! - [`AuthenticationResolver`]: provider/contributor resolution and permission checks
//! - [`EntityStore`] / [`SearchIndex`]: the two persistence collaborators
//! - [`ProjectService`]: store + index pairing for projects
//! - [`rest::ProjectRestService`]: the project endpoints
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use content_aggregator::{
//!     AuthenticationResolver, ContributorProfileService, ContributorSecurityContext,
//!     Principal, ProfileError, ResolutionContext,
//! };
//!
//! struct Directory;
//!
//! impl ContributorProfileService for Directory {
//!     fn contributor_id(&self, _: &str, principal: &str, _: bool) -> Result<Option<String>, ProfileError> {
//!         Ok(Some(format!("{} <{}@example.org>", principal, principal)))
//!     }
//!     fn create_or_update_profile(&self, _: &str, _: &str) -> Result<(), ProfileError> {
//!         Ok(())
//!     }
//! }
//!
//! let resolver = AuthenticationResolver::new(Arc::new(Directory));
//! let security = ContributorSecurityContext::new(Some(Principal::new("alice")), "sso");
//! let mut ctx = ResolutionContext::new("req-42", Arc::new(security));
//!
//! let id = resolver.resolve_contributor(&mut ctx, true).expect("authenticated");
//! assert_eq!(id.as_deref(), Some("alice <alice@example.org>"));
//! // cached for the rest of this request
//! assert!(ctx.cached_contributor().is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod context;
mod error;
mod logging;
mod request;
pub mod rest;
mod search;
mod security;
mod service;
mod store;

pub use auth::{AuthenticatedIdentity, AuthenticationResolver, ContributorProfileService, Permission};
pub use config::{
    ApiConfig, IndexConfig, RestConfig, ENV_DEFAULT_PAGE_SIZE, ENV_MAX_PAGE_SIZE,
    ENV_PROJECT_INDEX_NAME, ENV_PROJECT_INDEX_TYPE,
};
pub use context::{CachedContributor, ResolutionContext};
pub use error::{
    Error, IndexError, ProfileError, StoreError, StoreErrorKind, Violation, ViolationKind,
};
pub use logging::RequestLog;
pub use request::Principal;
pub use search::{MemorySearchIndex, SearchIndex};
pub use security::{ContributorSecurityContext, ProviderSecurityContext, SecurityContext};
pub use service::{ProjectService, CODE};
pub use store::{Entity, EntityStore, MemoryEntityStore};
