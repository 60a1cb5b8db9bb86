use std::fmt;
use std::sync::Arc;

use crate::logging::RequestLog;
use crate::request::Principal;
use crate::security::SecurityContext;

/// Contributor id resolved earlier in the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedContributor {
    /// Resolved contributor id
    pub contributor_id: String,
    /// Whether the lookup that produced the id was allowed to create a profile
    pub force_create: bool,
}

/// Per-request resolution context.
///
/// One `ResolutionContext` lives exactly as long as one inbound request. It
/// carries the request ID, the security context supplied by the transport and
/// the contributor id cache, which is why it is passed by `&mut` into
/// contributor resolution instead of living inside a shared component.
///
/// # Lifecycle
///
/// ```text
/// NoAttempt --resolve--> Resolving --id--> Cached(id)
///                                  \--none/err--> NoAttempt (next call resolves again)
/// ```
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use content_aggregator::{ContributorSecurityContext, Principal, ResolutionContext};
///
/// let security = ContributorSecurityContext::new(Some(Principal::new("alice")), "sso");
/// let ctx = ResolutionContext::new("req-123", Arc::new(security));
///
/// assert_eq!(ctx.request_id(), "req-123");
/// assert!(ctx.cached_contributor().is_none());
/// ```
#[derive(Clone)]
pub struct ResolutionContext {
    request_id: String,
    security: Option<Arc<dyn SecurityContext>>,
    contributor: Option<CachedContributor>,
}

impl ResolutionContext {
    /// Creates a context for a request that carries security information.
    pub fn new(request_id: impl Into<String>, security: Arc<dyn SecurityContext>) -> Self {
        Self {
            request_id: request_id.into(),
            security: Some(security),
            contributor: None,
        }
    }

    /// Creates a context for a request without any security information.
    pub fn anonymous(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            security: None,
            contributor: None,
        }
    }

    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the security context, if the transport supplied one.
    pub fn security(&self) -> Option<&dyn SecurityContext> {
        self.security.as_deref()
    }

    /// Returns the caller principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        self.security().and_then(|s| s.principal())
    }

    /// Returns the contributor id cached for this request, if any.
    pub fn cached_contributor(&self) -> Option<&CachedContributor> {
        self.contributor.as_ref()
    }

    pub(crate) fn cache_contributor(&mut self, contributor_id: String, force_create: bool) {
        self.contributor = Some(CachedContributor {
            contributor_id,
            force_create,
        });
    }

    /// Returns a logger that tags every message with this request's ID.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id)
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("request_id", &self.request_id)
            .field("principal", &self.principal())
            .field("contributor", &self.contributor)
            .finish()
    }
}
