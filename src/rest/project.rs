use std::sync::Arc;

use serde_json::Value;

use super::IdResponse;
use crate::auth::{AuthenticationResolver, Permission};
use crate::config::RestConfig;
use crate::context::ResolutionContext;
use crate::error::Error;
use crate::service::CODE;
use crate::store::{Entity, EntityStore};

/// REST operations on project entities.
///
/// Reads are open to everyone; creating and deleting projects requires a
/// super provider. Payload validation runs before anything is written.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use content_aggregator::rest::ProjectRestService;
/// use content_aggregator::{
///     AuthenticationResolver, ContributorProfileService, Entity, IndexConfig,
///     MemoryEntityStore, MemorySearchIndex, Principal, ProfileError, ProjectService,
///     ProviderSecurityContext, ResolutionContext, RestConfig,
/// };
/// use serde_json::json;
///
/// # struct NoProfiles;
/// # impl ContributorProfileService for NoProfiles {
/// #     fn contributor_id(&self, _: &str, _: &str, _: bool) -> Result<Option<String>, ProfileError> { Ok(None) }
/// #     fn create_or_update_profile(&self, _: &str, _: &str) -> Result<(), ProfileError> { Ok(()) }
/// # }
/// let service = ProjectService::new(
///     Arc::new(MemoryEntityStore::new()),
///     Arc::new(MemorySearchIndex::new()),
///     IndexConfig::default(),
/// );
/// let rest = ProjectRestService::new(
///     Arc::new(service),
///     AuthenticationResolver::new(Arc::new(NoProfiles)),
///     RestConfig::default(),
/// );
///
/// let admin = ProviderSecurityContext::new(Some(Principal::new("admin")), true, "provider");
/// let mut ctx = ResolutionContext::new("req-1", Arc::new(admin));
///
/// let mut project = Entity::new();
/// project.insert("code".to_string(), json!("hibernate"));
/// let created = rest.create(&mut ctx, project).unwrap();
/// assert_eq!(created.id, "hibernate");
/// ```
#[derive(Clone)]
pub struct ProjectRestService {
    service: Arc<dyn EntityStore>,
    auth: AuthenticationResolver,
    config: RestConfig,
}

impl ProjectRestService {
    /// Creates the REST service over a project entity service.
    pub fn new(
        service: Arc<dyn EntityStore>,
        auth: AuthenticationResolver,
        config: RestConfig,
    ) -> Self {
        Self {
            service,
            auth,
            config,
        }
    }

    /// Lists projects, `size` clamped to the configured maximum.
    pub fn get_all(
        &self,
        ctx: &mut ResolutionContext,
        from: Option<usize>,
        size: Option<usize>,
    ) -> Result<Vec<Entity>, Error> {
        self.auth.check_permission(ctx, Permission::Guest)?;

        let size = size
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        ctx.log()
            .debug(format_args!("listing projects from {:?} size {}", from, size));

        self.service
            .get_all(from, Some(size), &self.config.fields_to_remove)
    }

    /// Returns one project.
    ///
    /// # Errors
    ///
    /// [`Error::RequiredFieldMissing`] for an empty id and [`Error::NotFound`]
    /// when no such project exists.
    pub fn get(&self, ctx: &mut ResolutionContext, id: &str) -> Result<Entity, Error> {
        self.auth.check_permission(ctx, Permission::Guest)?;
        let id = required_id(id)?;

        self.service.get(id)?.ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Creates a project identified by its `code` field.
    ///
    /// Without a `code` the store assigns the id, which the project service
    /// writes back into `code`. Surrounding whitespace is trimmed from a
    /// supplied `code`.
    ///
    /// # Errors
    ///
    /// [`Error::RequiredFieldMissing`] when `code` is present but empty or not a
    /// string; otherwise as [`create_with_id`](Self::create_with_id).
    pub fn create(
        &self,
        ctx: &mut ResolutionContext,
        mut entity: Entity,
    ) -> Result<IdResponse, Error> {
        self.auth.check_permission(ctx, Permission::SuperProvider)?;

        let code = match entity.get(CODE) {
            None | Some(Value::Null) => None,
            Some(Value::String(code)) if !code.trim().is_empty() => Some(code.trim().to_string()),
            Some(_) => return Err(Error::required_field(CODE)),
        };
        let Some(id) = code else {
            return self.store_new(ctx, entity);
        };
        entity.insert(CODE.to_string(), Value::String(id.clone()));

        self.store(ctx, &id, entity)
    }

    /// Creates or replaces the project stored under `id`.
    ///
    /// A missing `code` is set to `id`.
    ///
    /// # Errors
    ///
    /// [`Error::RequiredFieldMissing`] for an empty `id` and
    /// [`Error::FieldMismatch`] when `code` differs from `id`. Nothing is
    /// written in either case.
    pub fn create_with_id(
        &self,
        ctx: &mut ResolutionContext,
        id: &str,
        mut entity: Entity,
    ) -> Result<IdResponse, Error> {
        self.auth.check_permission(ctx, Permission::SuperProvider)?;
        let id = required_id(id)?;

        match entity.get(CODE) {
            None | Some(Value::Null) => {
                entity.insert(CODE.to_string(), Value::String(id.to_string()));
            }
            Some(Value::String(code)) if code == id => {}
            Some(other) => {
                return Err(Error::FieldMismatch {
                    field: CODE.to_string(),
                    expected: id.to_string(),
                    actual: match other {
                        Value::String(s) => s.clone(),
                        v => v.to_string(),
                    },
                });
            }
        }

        self.store(ctx, id, entity)
    }

    /// Deletes the project stored under `id`.
    pub fn delete(&self, ctx: &mut ResolutionContext, id: &str) -> Result<(), Error> {
        self.auth.check_permission(ctx, Permission::SuperProvider)?;
        let id = required_id(id)?;

        ctx.log().info(format_args!("deleting project '{}'", id));
        self.service.delete(id)
    }

    fn store(
        &self,
        ctx: &ResolutionContext,
        id: &str,
        entity: Entity,
    ) -> Result<IdResponse, Error> {
        ctx.log().info(format_args!("storing project '{}'", id));
        if let Err(e) = self.service.create_with_id(id, entity) {
            ctx.log()
                .error(format_args!("storing project '{}' failed: {}", id, e));
            return Err(e);
        }
        Ok(IdResponse::new(id))
    }

    fn store_new(&self, ctx: &ResolutionContext, entity: Entity) -> Result<IdResponse, Error> {
        match self.service.create(entity) {
            Ok(id) => {
                ctx.log().info(format_args!("stored project under assigned id '{}'", id));
                Ok(IdResponse::new(id))
            }
            Err(e) => {
                ctx.log()
                    .error(format_args!("storing project without code failed: {}", e));
                Err(e)
            }
        }
    }
}

/// Trims the id and rejects it when nothing is left.
fn required_id(id: &str) -> Result<&str, Error> {
    let id = id.trim();
    if id.is_empty() {
        Err(Error::required_field("id"))
    } else {
        Ok(id)
    }
}
