use std::sync::Arc;

use crate::binder::Binder;
use crate::component::{Component, Injectable, Instantiate, Upcast};
use crate::config::{ConfigStore, FactoryOptions};
use crate::container::core::ContainerCore;
use crate::factory::{Factory, Types};
use crate::key::{Contract, Qualifiers};
use crate::provider::{NoopProvider, Provider};
use crate::ServiceError;

/// The entry point of service resolution.
///
/// Every lookup asks the active [`Provider`] first and falls back to the
/// basic [`Factory`] only if the provider declines. A [`Container`] is cheap
/// to clone, and all clones share the same provider and singleton cache.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use locator::prelude::*;
/// trait Greeter: Send + Sync + 'static {
///     fn greet(&self) -> String;
/// }
///
/// contract!(dyn Greeter, "com.example.Greeter");
///
/// struct PoliteGreeter;
///
/// #[component(name = "com.example.PoliteGreeter", provides(dyn Greeter))]
/// impl PoliteGreeter {
///     #[inject]
///     fn new() -> Self {
///         Self
///     }
/// }
///
/// impl Greeter for PoliteGreeter {
///     fn greet(&self) -> String {
///         String::from("Good day")
///     }
/// }
///
/// let config = MemoryConfig::from_pairs([(
///     "locator.factory.impl.com.example.Greeter",
///     "com.example.PoliteGreeter",
/// )]);
/// let mut registry = TypeRegistry::new();
/// registry.register::<dyn Greeter, PoliteGreeter>();
///
/// let container = Container::init(Arc::new(config), registry.finish().unwrap()).unwrap();
/// let greeter = container.get_service::<dyn Greeter>(&qualifiers![]).unwrap();
/// assert_eq!(greeter.greet(), "Good day");
/// ```
#[derive(Clone)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    /// Builds a container with the default [`FactoryOptions`].
    ///
    /// # Errors
    ///
    /// See [`Container::init_with_options`].
    pub fn init(config: Arc<dyn ConfigStore>, types: Types) -> Result<Self, ServiceError> {
        Self::init_with_options(config, types, FactoryOptions::default())
    }

    /// Builds a container from configuration.
    ///
    /// The provider configured for contract `dyn Provider` becomes the
    /// active one, or [`NoopProvider`] if none is configured. Then every
    /// binder configured for contract `dyn Binder` registers its bindings on
    /// the provider, in configuration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured provider or any configured binder
    /// can't be resolved or created.
    pub fn init_with_options(
        config: Arc<dyn ConfigStore>,
        types: Types,
        options: FactoryOptions,
    ) -> Result<Self, ServiceError> {
        let factory = Factory::with_options(config, Arc::new(types), options);
        let provider = factory.resolve_or_default::<dyn Provider, NoopProvider>(&Qualifiers::none())?;
        let binders = factory.resolve_multiple::<dyn Binder>(&Qualifiers::none())?;

        for binder in &binders {
            binder.config_bindings(&*provider);
        }
        tracing::info!(
            provider = factory
                .implementation_name::<dyn Provider>(&Qualifiers::none())
                .as_deref()
                .unwrap_or(NoopProvider::NAME),
            binders = binders.len(),
            "container initialized"
        );

        Ok(Self::with_provider(factory, provider))
    }

    /// Builds a container from an explicit factory and provider. No binder
    /// is discovered.
    pub fn with_provider(factory: Factory, provider: Arc<dyn Provider>) -> Self {
        Self {
            core: Arc::new(ContainerCore::new(factory, provider)),
        }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        self.core.provider()
    }

    pub fn factory(&self) -> &Factory {
        self.core.factory()
    }

    /// Returns whether either the provider or the basic factory has an
    /// implementation of `C` with `qualifiers`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails while looking up its binding.
    pub fn has_service<C>(&self, qualifiers: &Qualifiers) -> Result<bool, ServiceError>
    where
        C: Contract + ?Sized,
    {
        self.core.has_service::<C>(qualifiers)
    }

    /// Returns the implementation of `C` with `qualifiers`, from the provider
    /// or else from the basic factory.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UnresolvedContract`] if neither has one, or
    /// any error raised while creating it.
    pub fn get_service<C>(&self, qualifiers: &Qualifiers) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        self.core.get_service::<C>(qualifiers)
    }

    /// Same as [`Container::get_service`], but creates `D` if neither tier
    /// has an implementation.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved implementation fails to be created.
    pub fn get_service_or<C, D>(&self, qualifiers: &Qualifiers) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
        D: Instantiate + Upcast<C>,
    {
        self.core.get_service_or::<C, D>(qualifiers)
    }

    /// Returns all implementations of `C` configured for the basic factory.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while creating any of them.
    pub fn get_services<C>(&self, qualifiers: &Qualifiers) -> Result<Vec<Arc<C>>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        self.core.get_services::<C>(qualifiers)
    }

    /// Creates a new `T` with its dependencies retrieved from the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Injection`] if a required dependency is not
    /// bound.
    pub fn create_and_inject<T>(&self) -> Result<T, ServiceError>
    where
        T: Injectable,
    {
        self.core.create_and_inject::<T>()
    }

    /// Binds `T` to `C` with `qualifiers` on the provider as a singleton.
    pub fn bind<C, T>(&self, qualifiers: &Qualifiers)
    where
        C: Contract + ?Sized,
        T: Injectable + Upcast<C>,
    {
        self.core.bind::<C, T>(true, qualifiers);
    }

    pub fn bind_with_scope<C, T>(&self, singleton: bool, qualifiers: &Qualifiers)
    where
        C: Contract + ?Sized,
        T: Injectable + Upcast<C>,
    {
        self.core.bind::<C, T>(singleton, qualifiers);
    }
}
