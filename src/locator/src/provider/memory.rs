use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::component::{Component, Instantiate, Upcast};
use crate::factory::SingletonCache;
use crate::key::LookupKey;
use crate::provider::trace::ResolutionGuard;
use crate::provider::{Binding, InjectionTarget, Provider};
use crate::scope::Scope;
use crate::util::any::OwnedAny;
use crate::ServiceError;

/// A complete injection provider keeping its bindings in memory.
///
/// Bindings are registered through [`Provider::dyn_bind`], usually by
/// [`Binder`]s at process start, and the last binding for a key wins.
/// Singleton-scoped bindings share one instance per implementation type in
/// the provider's own [`SingletonCache`]. A binding whose construction
/// needs its own implementation type again, whatever its scope, fails with
/// [`ServiceError::CyclicDependency`].
///
/// [`Binder`]: crate::binder::Binder
#[derive(Debug, Default)]
pub struct MemoryProvider {
    bindings: RwLock<HashMap<LookupKey, Binding>>,
    singletons: SingletonCache,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            singletons: SingletonCache::new(),
        }
    }

    pub fn contains(&self, key: &LookupKey) -> bool {
        self.bindings.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    fn binding(&self, key: &LookupKey) -> Option<Binding> {
        self.bindings.read().get(key).cloned()
    }
}

impl Component for MemoryProvider {
    const NAME: &'static str = "locator.provider.MemoryProvider";
    const SCOPE: Scope = Scope::Singleton;
}

impl Instantiate for MemoryProvider {
    type Error = Infallible;

    fn instantiate() -> Result<Self, Self::Error> {
        Ok(Self::new())
    }
}

impl Upcast<dyn Provider> for MemoryProvider {
    fn upcast(this: Arc<Self>) -> Arc<dyn Provider> {
        this
    }
}

impl Provider for MemoryProvider {
    fn dyn_get_service(&self, key: &LookupKey) -> Result<Option<OwnedAny>, ServiceError> {
        let Some(binding) = self.binding(key) else {
            return Ok(None);
        };

        let owner = self as *const Self as usize;
        let _guard = ResolutionGuard::enter(owner, binding.type_id(), binding.name())?;
        let object = if binding.scope().is_singleton() {
            self.singletons
                .get_or_create(binding.type_id(), binding.name(), || {
                    binding.construct(self)
                })?
        } else {
            binding.construct(self)?
        };

        match binding.upcast(object) {
            Some(object) => Ok(Some(object)),
            None => Err(ServiceError::TypeResolution {
                name: String::from(binding.name()),
                contract: binding.contract(),
            }),
        }
    }

    fn dyn_create_and_inject(&self, target: &InjectionTarget) -> Result<OwnedAny, ServiceError> {
        target.build(self)
    }

    fn dyn_bind(&self, binding: Binding) {
        tracing::debug!(key = %binding.key(), name = binding.name(), scope = %binding.scope(), "binding registered");
        self.bindings.write().insert(binding.key().clone(), binding);
    }
}
