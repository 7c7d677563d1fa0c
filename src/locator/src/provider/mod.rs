mod memory;
mod noop;
mod trace;

use std::any::TypeId;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::component::{self, Injectable, Upcast};
use crate::key::{Contract, LookupKey, Qualifiers};
use crate::scope::Scope;
use crate::util::any::{self, OwnedAny, SharedAny};
use crate::ServiceError;

pub use memory::MemoryProvider;
pub use noop::NoopProvider;

/// A pluggable injection provider consulted before the basic factory.
///
/// A [`Provider`] holds explicit bindings from [`LookupKey`]s to
/// implementations and is able to construct an [`Injectable`] by filling its
/// dependencies from those bindings. Declining a lookup is signalled by
/// `Ok(None)` and is not an error.
///
/// Usually, you don't need to call the `dyn_*` methods directly, since
/// [`TypedProvider`] wraps them with type-safe counterparts for every
/// [`Provider`].
#[cfg_attr(test, mockall::automock)]
pub trait Provider: Send + Sync + 'static {
    /// Returns the type-erased `Arc<C>` bound to `key`, or [`None`] if there
    /// is no such binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound implementation fails to construct.
    fn dyn_get_service(&self, key: &LookupKey) -> Result<Option<OwnedAny>, ServiceError>;

    /// Creates a new object described by `target`, with its dependencies
    /// retrieved from this provider.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Injection`] if a required dependency has no
    /// binding, or any error raised while constructing the object.
    fn dyn_create_and_inject(&self, target: &InjectionTarget) -> Result<OwnedAny, ServiceError>;

    /// Registers `binding`, replacing any binding with the same key.
    fn dyn_bind(&self, binding: Binding);
}

crate::contract!(dyn Provider, "locator.Provider");

/// A static variant of the [`Provider`] trait, leveraging static dispatch and
/// type-safety.
pub trait TypedProvider: Provider {
    /// Returns the object bound to contract `C` with `qualifiers`, or
    /// [`None`] if there is no such binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound implementation fails to construct or
    /// doesn't produce an `Arc<C>`.
    fn get_service<C>(&self, qualifiers: &Qualifiers) -> Result<Option<Arc<C>>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        let key = LookupKey::of::<C>(qualifiers);
        match self.dyn_get_service(&key)? {
            Some(object) => any::unbox::<Arc<C>>(object).map(Some).map_err(|_| {
                ServiceError::TypeResolution {
                    name: key.to_string(),
                    contract: C::NAME,
                }
            }),
            None => Ok(None),
        }
    }

    /// Creates a new `T` with its dependencies retrieved from this provider.
    ///
    /// # Errors
    ///
    /// See [`Provider::dyn_create_and_inject`].
    fn create_and_inject<T>(&self) -> Result<T, ServiceError>
    where
        T: Injectable,
    {
        let object = self.dyn_create_and_inject(&InjectionTarget::of::<T>())?;
        any::unbox::<T>(object).map_err(|_| ServiceError::TypeResolution {
            name: String::from(T::NAME),
            contract: T::NAME,
        })
    }

    /// Binds implementation `T` to contract `C` with `qualifiers`.
    fn bind<C, T>(&self, singleton: bool, qualifiers: &Qualifiers)
    where
        C: Contract + ?Sized,
        T: Injectable + Upcast<C>,
    {
        let scope = Scope::from_singleton_flag(singleton);
        self.dyn_bind(Binding::new::<C, T>(scope, qualifiers));
    }
}

impl<P: Provider + ?Sized> TypedProvider for P {}

type Build = fn(&dyn Provider) -> Result<OwnedAny, ServiceError>;

/// A type-erased description of an [`Injectable`] to be created by a
/// [`Provider`].
#[derive(Clone, Copy)]
pub struct InjectionTarget {
    name: &'static str,
    build: Build,
}

impl InjectionTarget {
    pub fn of<T>() -> Self
    where
        T: Injectable,
    {
        Self {
            name: T::NAME,
            build: component::inject_owned::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Creates the object, retrieving its dependencies from `provider`.
    ///
    /// # Errors
    ///
    /// See [`Injectable::inject`].
    pub fn build(&self, provider: &dyn Provider) -> Result<OwnedAny, ServiceError> {
        (self.build)(provider)
    }
}

impl Debug for InjectionTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InjectionTarget")
            .field("name", &self.name)
            .finish()
    }
}

type Construct = fn(&dyn Provider) -> Result<SharedAny, ServiceError>;
type UpcastOwned = fn(SharedAny) -> Option<OwnedAny>;

/// A type-erased binding from a [`LookupKey`] to an implementation.
#[derive(Clone)]
pub struct Binding {
    key: LookupKey,
    contract: &'static str,
    name: &'static str,
    type_id: TypeId,
    scope: Scope,
    construct: Construct,
    upcast: UpcastOwned,
}

impl Binding {
    /// Creates a binding of implementation `T` to contract `C`.
    pub fn new<C, T>(scope: Scope, qualifiers: &Qualifiers) -> Self
    where
        C: Contract + ?Sized,
        T: Injectable + Upcast<C>,
    {
        Self {
            key: LookupKey::of::<C>(qualifiers),
            contract: C::NAME,
            name: T::NAME,
            type_id: TypeId::of::<T>(),
            scope,
            construct: component::inject_shared::<T>,
            upcast: component::upcast_owned::<C, T>,
        }
    }

    pub fn key(&self) -> &LookupKey {
        &self.key
    }

    pub fn contract(&self) -> &'static str {
        self.contract
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Creates a new object, retrieving its dependencies from `provider`.
    ///
    /// # Errors
    ///
    /// See [`Injectable::inject`].
    pub fn construct(&self, provider: &dyn Provider) -> Result<SharedAny, ServiceError> {
        (self.construct)(provider)
    }

    /// Converts an object created by this binding into a type-erased
    /// `Arc<C>` of the bound contract.
    pub fn upcast(&self, object: SharedAny) -> Option<OwnedAny> {
        (self.upcast)(object)
    }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}
