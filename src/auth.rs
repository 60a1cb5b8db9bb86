//! Resolution of the calling identity from a request's security context.
//!
//! [`AuthenticationResolver`] is stateless. Everything request-scoped, the
//! contributor id cache included, lives in the [`ResolutionContext`] the
//! caller threads through.

use std::sync::Arc;

use crate::context::ResolutionContext;
use crate::error::{Error, ProfileError, Violation, ViolationKind};
use crate::request::Principal;
use crate::security::SecurityContext;

/// Contributor profile directory consulted during contributor resolution.
pub trait ContributorProfileService: Send + Sync {
    /// Looks up the contributor id for an authenticated end user.
    ///
    /// With `force_create` set the service must create a contributor record
    /// when none exists yet; otherwise an unknown user yields `Ok(None)`.
    fn contributor_id(
        &self,
        auth_scheme: &str,
        principal: &str,
        force_create: bool,
    ) -> Result<Option<String>, ProfileError>;

    /// Creates or refreshes the stored profile of an authenticated end user.
    fn create_or_update_profile(&self, auth_scheme: &str, principal: &str)
        -> Result<(), ProfileError>;
}

/// Access level an operation demands from its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Anyone, authenticated or not
    Guest,
    /// Any authenticated provider
    Provider,
    /// A provider flagged as super provider
    SuperProvider,
    /// An authenticated contributor
    Contributor,
}

impl Permission {
    fn action(self) -> &'static str {
        match self {
            Permission::Guest => "guest",
            Permission::Provider => "provider",
            Permission::SuperProvider => "super_provider",
            Permission::Contributor => "contributor",
        }
    }
}

/// Identity established by a successful permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatedIdentity {
    /// No identity was required
    Anonymous,
    /// An authenticated provider, by name
    Provider(String),
    /// An authenticated contributor; the id is absent when no profile exists yet
    Contributor(Option<String>),
}

/// Resolves provider and contributor identities.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use content_aggregator::{
///     AuthenticationResolver, ContributorProfileService, ProfileError, Principal,
///     ProviderSecurityContext, ResolutionContext,
/// };
///
/// struct NoProfiles;
///
/// impl ContributorProfileService for NoProfiles {
///     fn contributor_id(&self, _: &str, _: &str, _: bool) -> Result<Option<String>, ProfileError> {
///         Ok(None)
///     }
///     fn create_or_update_profile(&self, _: &str, _: &str) -> Result<(), ProfileError> {
///         Ok(())
///     }
/// }
///
/// let resolver = AuthenticationResolver::new(Arc::new(NoProfiles));
/// let security = ProviderSecurityContext::new(Some(Principal::new("jbossorg")), false, "provider");
/// let ctx = ResolutionContext::new("req-1", Arc::new(security));
///
/// assert_eq!(resolver.resolve_provider(&ctx).unwrap(), "jbossorg");
/// ```
#[derive(Clone)]
pub struct AuthenticationResolver {
    profiles: Arc<dyn ContributorProfileService>,
}

impl AuthenticationResolver {
    /// Creates a resolver backed by the given profile service.
    pub fn new(profiles: Arc<dyn ContributorProfileService>) -> Self {
        Self { profiles }
    }

    /// Returns the name of the authenticated provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] when the request has no security
    /// context, the context lacks the provider capability, or the principal
    /// is missing or empty.
    pub fn resolve_provider(&self, ctx: &ResolutionContext) -> Result<String, Error> {
        let security = ctx
            .security()
            .ok_or_else(|| Error::not_authenticated("no security context"))?;

        if !security.has_provider_capability() {
            return Err(Error::not_authenticated(
                "security context is not a provider context",
            ));
        }

        Ok(non_empty_principal(security)?.name.clone())
    }

    /// Returns the contributor id of the authenticated end user.
    ///
    /// A concrete id cached earlier in the same request is returned without
    /// consulting the profile service, whatever `force_create` says. An
    /// absent id is never cached, so a later call (for example with
    /// `force_create` set) resolves again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] for a missing context, a context
    /// without the contributor capability or an empty principal, and
    /// [`Error::ProfileLookup`] when the profile service fails.
    pub fn resolve_contributor(
        &self,
        ctx: &mut ResolutionContext,
        force_create: bool,
    ) -> Result<Option<String>, Error> {
        let (auth_scheme, principal) = {
            let security = ctx
                .security()
                .ok_or_else(|| Error::not_authenticated("no security context"))?;

            if !security.has_contributor_capability() {
                return Err(Error::not_authenticated(
                    "security context is not a contributor context",
                ));
            }

            let principal = non_empty_principal(security)?;
            (security.auth_scheme().to_string(), principal.name.clone())
        };

        if let Some(cached) = ctx.cached_contributor() {
            ctx.log().debug(format_args!(
                "contributor id for '{}' served from request cache",
                principal
            ));
            return Ok(Some(cached.contributor_id.clone()));
        }

        let resolved = self
            .profiles
            .contributor_id(&auth_scheme, &principal, force_create)?;

        if let Some(id) = &resolved {
            ctx.cache_contributor(id.clone(), force_create);
        }

        Ok(resolved)
    }

    /// Creates or refreshes the profile of the authenticated contributor.
    ///
    /// Does nothing unless the request carries a contributor context with a
    /// principal. Failures of the profile service are logged and dropped; this
    /// call never fails the surrounding request.
    pub fn refresh_contributor_profile(&self, ctx: &ResolutionContext) {
        let Some(security) = ctx.security() else {
            return;
        };
        if !security.has_contributor_capability() {
            return;
        }
        let Ok(principal) = non_empty_principal(security) else {
            return;
        };

        if let Err(e) = self
            .profiles
            .create_or_update_profile(security.auth_scheme(), &principal.name)
        {
            ctx.log().warn(format_args!(
                "contributor profile refresh for '{}' failed: {}",
                principal.name, e
            ));
        }
    }

    /// Checks that the caller satisfies `permission`.
    ///
    /// Contributor checks resolve the id without forcing profile creation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] when the required identity cannot be
    /// established and [`Error::Forbidden`] when an authenticated provider is
    /// not a super provider.
    pub fn check_permission(
        &self,
        ctx: &mut ResolutionContext,
        permission: Permission,
    ) -> Result<AuthenticatedIdentity, Error> {
        match permission {
            Permission::Guest => Ok(AuthenticatedIdentity::Anonymous),
            Permission::Provider => self
                .resolve_provider(ctx)
                .map(AuthenticatedIdentity::Provider),
            Permission::SuperProvider => {
                let provider = self.resolve_provider(ctx)?;
                let is_super = ctx.security().is_some_and(|s| s.is_super_provider());
                if !is_super {
                    ctx.log().warn(format_args!(
                        "provider '{}' denied: super provider required",
                        provider
                    ));
                    return Err(Error::Forbidden(Violation::new(
                        ViolationKind::Unauthorized {
                            action: permission.action(),
                        },
                        format!("provider '{}' is not a super provider", provider),
                    )));
                }
                Ok(AuthenticatedIdentity::Provider(provider))
            }
            Permission::Contributor => self
                .resolve_contributor(ctx, false)
                .map(AuthenticatedIdentity::Contributor),
        }
    }
}

fn non_empty_principal(security: &dyn SecurityContext) -> Result<&Principal, Error> {
    match security.principal() {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(Error::not_authenticated("principal is empty")),
    }
}
