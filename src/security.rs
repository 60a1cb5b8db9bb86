//! Security contexts handed over by the transport layer.
//!
//! Resolution never inspects the concrete type of a context. Callers are
//! identified purely through the capability queries on [`SecurityContext`],
//! so a context that is wrapped, proxied or decorated by the hosting
//! framework authenticates exactly like the original.

use std::sync::Arc;

use crate::request::Principal;

/// Capability view of the security information attached to one request.
///
/// Both capability flags default to `false`, so a plain framework context
/// that only knows a principal never authenticates as provider or contributor.
///
/// # Examples
///
/// ```
/// use content_aggregator::{Principal, SecurityContext};
///
/// // A framework-level context that only knows the user principal.
/// struct PlainContext(Principal);
///
/// impl SecurityContext for PlainContext {
///     fn principal(&self) -> Option<&Principal> {
///         Some(&self.0)
///     }
///     fn auth_scheme(&self) -> &str {
///         "basic"
///     }
/// }
///
/// let ctx = PlainContext(Principal::new("alice"));
/// assert!(!ctx.has_provider_capability());
/// assert!(!ctx.has_contributor_capability());
/// ```
pub trait SecurityContext: Send + Sync {
    /// Returns `true` if the caller authenticated as a trusted provider.
    fn has_provider_capability(&self) -> bool {
        false
    }

    /// Returns `true` if the caller authenticated as an end-user contributor.
    fn has_contributor_capability(&self) -> bool {
        false
    }

    /// Returns `true` if the provider is allowed to manage global configuration.
    ///
    /// Only meaningful together with the provider capability.
    fn is_super_provider(&self) -> bool {
        false
    }

    /// The caller principal, if the transport supplied one.
    fn principal(&self) -> Option<&Principal>;

    /// Raw string describing how the caller authenticated.
    ///
    /// Passed verbatim to the contributor profile lookup.
    fn auth_scheme(&self) -> &str;
}

impl<T: SecurityContext + ?Sized> SecurityContext for Arc<T> {
    fn has_provider_capability(&self) -> bool {
        (**self).has_provider_capability()
    }

    fn has_contributor_capability(&self) -> bool {
        (**self).has_contributor_capability()
    }

    fn is_super_provider(&self) -> bool {
        (**self).is_super_provider()
    }

    fn principal(&self) -> Option<&Principal> {
        (**self).principal()
    }

    fn auth_scheme(&self) -> &str {
        (**self).auth_scheme()
    }
}

impl<T: SecurityContext + ?Sized> SecurityContext for Box<T> {
    fn has_provider_capability(&self) -> bool {
        (**self).has_provider_capability()
    }

    fn has_contributor_capability(&self) -> bool {
        (**self).has_contributor_capability()
    }

    fn is_super_provider(&self) -> bool {
        (**self).is_super_provider()
    }

    fn principal(&self) -> Option<&Principal> {
        (**self).principal()
    }

    fn auth_scheme(&self) -> &str {
        (**self).auth_scheme()
    }
}

/// Security context established for an authenticated provider.
#[derive(Debug, Clone)]
pub struct ProviderSecurityContext {
    principal: Option<Principal>,
    super_provider: bool,
    auth_scheme: String,
}

impl ProviderSecurityContext {
    /// Creates a provider context.
    pub fn new(
        principal: Option<Principal>,
        super_provider: bool,
        auth_scheme: impl Into<String>,
    ) -> Self {
        Self {
            principal,
            super_provider,
            auth_scheme: auth_scheme.into(),
        }
    }
}

impl SecurityContext for ProviderSecurityContext {
    fn has_provider_capability(&self) -> bool {
        true
    }

    fn is_super_provider(&self) -> bool {
        self.super_provider
    }

    fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    fn auth_scheme(&self) -> &str {
        &self.auth_scheme
    }
}

/// Security context established for an authenticated contributor.
#[derive(Debug, Clone)]
pub struct ContributorSecurityContext {
    principal: Option<Principal>,
    auth_scheme: String,
}

impl ContributorSecurityContext {
    /// Creates a contributor context.
    pub fn new(principal: Option<Principal>, auth_scheme: impl Into<String>) -> Self {
        Self {
            principal,
            auth_scheme: auth_scheme.into(),
        }
    }
}

impl SecurityContext for ContributorSecurityContext {
    fn has_contributor_capability(&self) -> bool {
        true
    }

    fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    fn auth_scheme(&self) -> &str {
        &self.auth_scheme
    }
}
