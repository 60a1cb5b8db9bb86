/// An opaque caller identity as handed over by the transport layer.
///
/// The name is whatever the authentication mechanism put there: a provider
/// name for trusted integrations, a username for end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Identity token of the caller
    pub name: String,
}

impl Principal {
    /// Creates a principal with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns `true` when the principal carries no usable identity.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }
}
