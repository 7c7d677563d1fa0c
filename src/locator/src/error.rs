use std::error::Error;

use snafu::prelude::*;

/// Failures surfaced by resolution, instantiation and injection.
///
/// A provider declining to resolve a contract is not an error; it is how the
/// fallback to the basic factory is triggered. Every variant here is fatal to
/// the call that produced it and carries the key or type name needed to fix
/// the configuration.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ServiceError {
    #[snafu(display("there needs to be a configuration entry defined for {key}"))]
    #[non_exhaustive]
    UnresolvedContract { key: String },
    #[snafu(display("could not resolve implementation {name} for contract {contract}"))]
    #[non_exhaustive]
    TypeResolution {
        name: String,
        contract: &'static str,
    },
    #[snafu(display("failed to instantiate an object of {name}"))]
    #[non_exhaustive]
    Instantiation {
        name: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display("could not inject dependency {key} into {target}"))]
    #[non_exhaustive]
    Injection { key: String, target: &'static str },
    #[snafu(display("could not construct {name} which depends on itself somehow"))]
    #[non_exhaustive]
    CyclicDependency { name: &'static str },
}

impl ServiceError {
    /// Wraps an error raised by the constructor of `name`.
    pub fn instantiation<E>(name: &'static str, err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::Instantiation {
            name,
            source: err.into(),
        }
    }
}
