use std::convert::Infallible;
use std::sync::Arc;

use crate::component::{Component, Instantiate, Upcast};
use crate::key::LookupKey;
use crate::provider::{Binding, InjectionTarget, Provider};
use crate::scope::Scope;
use crate::util::any::OwnedAny;
use crate::ServiceError;

/// The provider used when none is configured.
///
/// It declines every lookup, so every resolution falls through to the basic
/// factory. Bindings are dropped with a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProvider;

impl NoopProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Component for NoopProvider {
    const NAME: &'static str = "locator.provider.NoopProvider";
    const SCOPE: Scope = Scope::Singleton;
}

impl Instantiate for NoopProvider {
    type Error = Infallible;

    fn instantiate() -> Result<Self, Self::Error> {
        Ok(Self::new())
    }
}

impl Upcast<dyn Provider> for NoopProvider {
    fn upcast(this: Arc<Self>) -> Arc<dyn Provider> {
        this
    }
}

impl Provider for NoopProvider {
    fn dyn_get_service(&self, _key: &LookupKey) -> Result<Option<OwnedAny>, ServiceError> {
        Ok(None)
    }

    fn dyn_create_and_inject(&self, target: &InjectionTarget) -> Result<OwnedAny, ServiceError> {
        target.build(self)
    }

    fn dyn_bind(&self, binding: Binding) {
        tracing::warn!(
            key = %binding.key(),
            name = binding.name(),
            "binding dropped since no injection provider is configured"
        );
    }
}
