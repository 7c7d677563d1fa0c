use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use snafu::prelude::*;

use crate::component::{self, Instantiate, Upcast};
use crate::key::Contract;
use crate::provider::{MemoryProvider, NoopProvider, Provider};
use crate::scope::Scope;
use crate::util::any::SharedAny;
use crate::ServiceError;

type Construct = fn() -> Result<SharedAny, ServiceError>;

/// Collects the implementations the basic factory is able to create, keyed
/// by [`Component::NAME`].
///
/// Configuration entries can only name implementations registered here.
/// Registration problems are collected and reported all at once by
/// [`TypeRegistry::finish`].
///
/// [`Component::NAME`]: crate::component::Component::NAME
pub struct TypeRegistry {
    entries: HashMap<&'static str, TypeEntry>,
    errors: Vec<RegistryError>,
}

impl TypeRegistry {
    /// Creates a registry which already knows [`NoopProvider`] and
    /// [`MemoryProvider`] as implementations of `dyn Provider`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<dyn Provider, NoopProvider>()
            .register::<dyn Provider, MemoryProvider>();
        registry
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Registers `T` as an implementation of contract `C`.
    ///
    /// Registering the same type for several contracts is allowed. Using the
    /// name of `T` for a different type is reported on
    /// [`TypeRegistry::finish`].
    pub fn register<C, T>(&mut self) -> &mut Self
    where
        C: Contract + ?Sized,
        T: Instantiate + Upcast<C>,
    {
        let upcast: fn(SharedAny) -> Option<Arc<C>> = component::upcast_shared::<C, T>;

        match self.entries.get_mut(T::NAME) {
            Some(entry) if entry.type_id == TypeId::of::<T>() => {
                entry.upcasts.insert(TypeId::of::<C>(), Box::new(upcast));
            }
            Some(_) => {
                self.errors
                    .push(RegistryError::NameDuplicated { name: T::NAME });
            }
            None => {
                let mut entry = TypeEntry::new::<T>();
                entry.upcasts.insert(TypeId::of::<C>(), Box::new(upcast));
                self.entries.insert(T::NAME, entry);
            }
        }
        self
    }

    /// Completes the registration.
    ///
    /// # Errors
    ///
    /// Returns an error if any registration failed. Several failures are
    /// wrapped in [`RegistryError::Aggregated`].
    pub fn finish(mut self) -> Result<Types, RegistryError> {
        match self.errors.len() {
            0 => Ok(Types {
                entries: self.entries,
            }),
            1 => Err(self.errors.remove(0)),
            _ => Err(RegistryError::Aggregated {
                errors: self.errors,
            }),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The immutable result of a [`TypeRegistry`].
#[derive(Debug)]
pub struct Types {
    entries: HashMap<&'static str, TypeEntry>,
}

impl Types {
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A registered implementation with its type-erased constructor and the
/// contracts it provides.
pub struct TypeEntry {
    name: &'static str,
    type_id: TypeId,
    scope: Scope,
    construct: Construct,
    upcasts: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TypeEntry {
    fn new<T>() -> Self
    where
        T: Instantiate,
    {
        Self {
            name: T::NAME,
            type_id: TypeId::of::<T>(),
            scope: T::SCOPE,
            construct: component::instantiate_erased::<T>,
            upcasts: HashMap::new(),
        }
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

    pub fn provides<C>(&self) -> bool
    where
        C: Contract + ?Sized,
    {
        self.upcasts.contains_key(&TypeId::of::<C>())
    }

    /// Creates a new object without consulting any cache.
    pub fn construct(&self) -> Result<SharedAny, ServiceError> {
        (self.construct)()
    }

    /// Converts an object created by this entry into contract `C`.
    pub fn upcast<C>(&self, object: SharedAny) -> Option<Arc<C>>
    where
        C: Contract + ?Sized,
    {
        self.upcasts
            .get(&TypeId::of::<C>())?
            .downcast_ref::<fn(SharedAny) -> Option<Arc<C>>>()
            .and_then(|upcast| upcast(object))
    }
}

impl Debug for TypeEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("contracts", &self.upcasts.len())
            .finish()
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("the name {name} is already used by another type"))]
    #[non_exhaustive]
    NameDuplicated { name: &'static str },
    #[snafu(display("aggregated registry errors:\n{}", AggregatedDisplayer::new(errors)))]
    Aggregated { errors: Vec<RegistryError> },
}

struct AggregatedDisplayer<'a> {
    errors: &'a [RegistryError],
}

impl<'a> AggregatedDisplayer<'a> {
    fn new(errors: &'a [RegistryError]) -> Self {
        Self { errors }
    }
}

impl Display for AggregatedDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{:4}: {}", i + 1, error)?;
        }
        Ok(())
    }
}
