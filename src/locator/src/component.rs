use std::error::Error;
use std::sync::Arc;

use crate::key::{Contract, LookupKey, Qualifiers};
use crate::provider::{Provider, TypedProvider};
use crate::scope::Scope;
use crate::util::any::{OwnedAny, SharedAny};
use crate::ServiceError;

/// A concrete implementation type known to this crate by a stable name.
///
/// [`Component::NAME`] is what configuration entries refer to when they
/// select an implementation, and [`Component::SCOPE`] declares whether the
/// basic factory shares a single instance of the type. Usually you don't need
/// to implement this trait and its companions manually, since the
/// [`component`] attribute does it:
///
/// ```rust
/// # use std::sync::Arc;
/// # use locator::prelude::*;
/// trait Clock: Send + Sync + 'static {
///     fn now(&self) -> u64;
/// }
///
/// contract!(dyn Clock, "com.example.Clock");
///
/// struct SystemClock;
///
/// #[component(name = "com.example.SystemClock", singleton, provides(dyn Clock))]
/// impl SystemClock {
///     #[inject]
///     fn new() -> Self {
///         Self
///     }
/// }
///
/// impl Clock for SystemClock {
///     fn now(&self) -> u64 {
///         0
///     }
/// }
///
/// assert_eq!(SystemClock::NAME, "com.example.SystemClock");
/// assert_eq!(SystemClock::SCOPE, Scope::Singleton);
/// ```
///
/// [`component`]: crate::component
pub trait Component: Send + Sync + Sized + 'static {
    /// The stable identity of the implementation.
    const NAME: &'static str;

    /// The declared scope, honored whenever no explicit scope is given.
    const SCOPE: Scope = Scope::Transient;
}

/// A [`Component`] constructible without any dependency, which is what the
/// basic factory requires.
pub trait Instantiate: Component {
    /// The error occurred in object construction.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Creates a new object.
    ///
    /// # Errors
    ///
    /// Returns [`Instantiate::Error`] if the object construction fails.
    fn instantiate() -> Result<Self, Self::Error>;
}

/// A [`Component`] whose dependencies are retrieved from a [`Provider`] when
/// it's constructed.
pub trait Injectable: Component {
    /// Retrieves all dependencies from `provider` and creates the object.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Injection`] if a required dependency has no
    /// binding, or [`ServiceError::Instantiation`] if the construction fails
    /// after all dependencies are retrieved.
    fn inject(provider: &dyn Provider) -> Result<Self, ServiceError>;
}

/// Converts a shared component into a shared contract object. Typically
/// this is an unsizing coercion such as `Arc<Impl>` to `Arc<dyn Trait>`.
pub trait Upcast<C>: Component
where
    C: Contract + ?Sized,
{
    fn upcast(this: Arc<Self>) -> Arc<C>;
}

/// A value that an [`Injectable`] constructor can receive from a provider.
///
/// `Arc<C>` is a required dependency and `Option<Arc<C>>` an optional one.
pub trait Dependency: Sized {
    /// Resolves the dependency for `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required dependency has no binding or the
    /// provider fails to construct it.
    fn resolve(
        provider: &dyn Provider,
        target: &'static str,
        qualifiers: &Qualifiers,
    ) -> Result<Self, ServiceError>;
}

impl<C> Dependency for Arc<C>
where
    C: Contract + ?Sized,
{
    fn resolve(
        provider: &dyn Provider,
        target: &'static str,
        qualifiers: &Qualifiers,
    ) -> Result<Self, ServiceError> {
        match provider.get_service::<C>(qualifiers)? {
            Some(object) => Ok(object),
            None => Err(ServiceError::Injection {
                key: LookupKey::of::<C>(qualifiers).to_string(),
                target,
            }),
        }
    }
}

impl<C> Dependency for Option<Arc<C>>
where
    C: Contract + ?Sized,
{
    fn resolve(
        provider: &dyn Provider,
        _target: &'static str,
        qualifiers: &Qualifiers,
    ) -> Result<Self, ServiceError> {
        provider.get_service::<C>(qualifiers)
    }
}

pub(crate) fn instantiate_erased<T>() -> Result<SharedAny, ServiceError>
where
    T: Instantiate,
{
    match T::instantiate() {
        Ok(object) => Ok(Arc::new(object) as SharedAny),
        Err(err) => Err(ServiceError::instantiation(T::NAME, err)),
    }
}

pub(crate) fn inject_shared<T>(provider: &dyn Provider) -> Result<SharedAny, ServiceError>
where
    T: Injectable,
{
    T::inject(provider).map(|object| -> SharedAny { Arc::new(object) })
}

pub(crate) fn inject_owned<T>(provider: &dyn Provider) -> Result<OwnedAny, ServiceError>
where
    T: Injectable,
{
    T::inject(provider).map(|object| -> OwnedAny { Box::new(object) })
}

pub(crate) fn upcast_shared<C, T>(object: SharedAny) -> Option<Arc<C>>
where
    C: Contract + ?Sized,
    T: Upcast<C>,
{
    object.downcast::<T>().ok().map(T::upcast)
}

pub(crate) fn upcast_owned<C, T>(object: SharedAny) -> Option<OwnedAny>
where
    C: Contract + ?Sized,
    T: Upcast<C>,
{
    upcast_shared::<C, T>(object).map(|object| -> OwnedAny { Box::new(object) })
}
