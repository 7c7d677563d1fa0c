mod singleton;
mod types;

use std::any::TypeId;
use std::sync::Arc;

use crate::component::{self, Instantiate, Upcast};
use crate::config::{ConfigStore, FactoryOptions};
use crate::key::{Contract, LookupKey, Qualifiers};
use crate::util::any::SharedAny;
use crate::ServiceError;

pub use singleton::SingletonCache;
pub use types::{RegistryError, TypeEntry, TypeRegistry, Types};

/// The basic factory, which resolves implementations purely from
/// configuration.
///
/// For a contract and its qualifiers, the factory builds a [`LookupKey`],
/// prefixes it with [`FactoryOptions::prefix`] and reads implementation
/// names from the [`ConfigStore`]. Each name is looked up in [`Types`] and
/// instantiated, through the factory's own [`SingletonCache`] if the
/// implementation is singleton-scoped.
pub struct Factory {
    config: Arc<dyn ConfigStore>,
    types: Arc<Types>,
    singletons: SingletonCache,
    options: FactoryOptions,
}

impl Factory {
    pub fn new(config: Arc<dyn ConfigStore>, types: Arc<Types>) -> Self {
        Self::with_options(config, types, FactoryOptions::default())
    }

    pub fn with_options(
        config: Arc<dyn ConfigStore>,
        types: Arc<Types>,
        options: FactoryOptions,
    ) -> Self {
        Self {
            config,
            types,
            singletons: SingletonCache::new(),
            options,
        }
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    pub fn types(&self) -> &Types {
        &self.types
    }

    /// Creates the configured implementation of `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UnresolvedContract`] if no implementation is
    /// configured, [`ServiceError::TypeResolution`] if the configured name is
    /// unknown or doesn't provide `C`, or [`ServiceError::Instantiation`] if
    /// the construction fails.
    pub fn resolve<C>(&self, qualifiers: &Qualifiers) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        self.resolve_key(&LookupKey::of::<C>(qualifiers))
    }

    /// Same as [`Factory::resolve`], but with an already built key.
    ///
    /// # Errors
    ///
    /// See [`Factory::resolve`].
    pub fn resolve_key<C>(&self, key: &LookupKey) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        let config_key = key.config_key(self.options.prefix());
        match self.configured_name(&config_key) {
            Some(name) => self.instantiate_named(&name),
            None => {
                tracing::debug!(key = %config_key, "no implementation configured");
                Err(ServiceError::UnresolvedContract { key: config_key })
            }
        }
    }

    /// Creates the configured implementation of `C`, or `D` if nothing is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured implementation can't be resolved
    /// or the construction fails. A missing entry is never an error.
    pub fn resolve_or_default<C, D>(&self, qualifiers: &Qualifiers) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
        D: Instantiate + Upcast<C>,
    {
        let config_key = LookupKey::of::<C>(qualifiers).config_key(self.options.prefix());
        match self.configured_name(&config_key) {
            Some(name) => self.instantiate_named(&name),
            None => {
                tracing::debug!(key = %config_key, default = D::NAME, "using default implementation");
                self.instantiate_for::<D>(C::NAME).map(D::upcast)
            }
        }
    }

    /// Creates every configured implementation of `C` in configuration
    /// order. An empty list is returned if nothing is configured.
    ///
    /// # Errors
    ///
    /// Returns the first error met while resolving or creating any of them.
    pub fn resolve_multiple<C>(&self, qualifiers: &Qualifiers) -> Result<Vec<Arc<C>>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        let config_key = LookupKey::of::<C>(qualifiers).config_key(self.options.prefix());
        self.config
            .get_string_array(&config_key)
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| self.instantiate_named(name))
            .collect()
    }

    /// Returns whether an implementation of `C` is configured. Nothing is
    /// instantiated.
    pub fn exists<C>(&self, qualifiers: &Qualifiers) -> bool
    where
        C: Contract + ?Sized,
    {
        self.exists_key(&LookupKey::of::<C>(qualifiers))
    }

    /// Returns the implementation name configured for `C`, if any.
    pub fn implementation_name<C>(&self, qualifiers: &Qualifiers) -> Option<String>
    where
        C: Contract + ?Sized,
    {
        self.configured_name(&LookupKey::of::<C>(qualifiers).config_key(self.options.prefix()))
    }

    pub fn exists_key(&self, key: &LookupKey) -> bool {
        self.configured_name(&key.config_key(self.options.prefix()))
            .is_some()
    }

    /// Creates an object of `T` honoring its declared scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the construction fails.
    pub fn instantiate<T>(&self) -> Result<Arc<T>, ServiceError>
    where
        T: Instantiate,
    {
        self.instantiate_for::<T>(std::any::type_name::<T>())
    }

    fn instantiate_for<T>(&self, contract: &'static str) -> Result<Arc<T>, ServiceError>
    where
        T: Instantiate,
    {
        if !T::SCOPE.is_singleton() {
            return T::instantiate()
                .map(Arc::new)
                .map_err(|err| ServiceError::instantiation(T::NAME, err));
        }

        self.singletons
            .get_or_create(TypeId::of::<T>(), T::NAME, component::instantiate_erased::<T>)?
            .downcast::<T>()
            .map_err(|_| ServiceError::TypeResolution {
                name: String::from(T::NAME),
                contract,
            })
    }

    fn configured_name(&self, config_key: &str) -> Option<String> {
        self.config
            .get_string(config_key)
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
    }

    fn instantiate_named<C>(&self, name: &str) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        let entry = match self.types.get(name) {
            Some(entry) if entry.provides::<C>() => entry,
            _ => {
                return Err(ServiceError::TypeResolution {
                    name: String::from(name),
                    contract: C::NAME,
                });
            }
        };

        let object = self.instantiate_entry(entry)?;
        entry
            .upcast::<C>(object)
            .ok_or_else(|| ServiceError::TypeResolution {
                name: String::from(name),
                contract: C::NAME,
            })
    }

    fn instantiate_entry(&self, entry: &TypeEntry) -> Result<SharedAny, ServiceError> {
        if entry.scope().is_singleton() {
            self.singletons
                .get_or_create(entry.type_id(), entry.name(), || entry.construct())
        } else {
            entry.construct()
        }
    }
}
