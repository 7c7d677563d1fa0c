#![allow(clippy::new_without_default)]

pub mod binder;
pub mod component;
pub mod config;
pub mod container;
mod error;
pub mod factory;
pub mod global;
pub mod key;
pub mod provider;
pub mod scope;
mod util;

pub use error::ServiceError;
pub use util::any::{OwnedAny, SharedAny};
pub use locator_derive::component;

pub mod prelude {
    pub use crate::binder::Binder;
    pub use crate::component;
    pub use crate::component::{Component, Dependency, Injectable, Instantiate, Upcast};
    pub use crate::config::{ConfigStore, FactoryOptions, MemoryConfig};
    pub use crate::container::Container;
    pub use crate::factory::{RegistryError, TypeRegistry, Types};
    pub use crate::key::{Contract, LookupKey, Qualifiers};
    pub use crate::provider::{MemoryProvider, NoopProvider, Provider, TypedProvider};
    pub use crate::scope::Scope;
    pub use crate::ServiceError;
    pub use crate::{contract, qualifiers};
}
