use std::sync::Arc;

use crate::component::{Injectable, Instantiate, Upcast};
use crate::factory::Factory;
use crate::key::{Contract, Qualifiers};
use crate::provider::{Provider, TypedProvider};
use crate::ServiceError;

pub struct ContainerCore {
    provider: Arc<dyn Provider>,
    factory: Factory,
}

impl ContainerCore {
    pub fn new(factory: Factory, provider: Arc<dyn Provider>) -> Self {
        Self { provider, factory }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn has_service<C>(&self, qualifiers: &Qualifiers) -> Result<bool, ServiceError>
    where
        C: Contract + ?Sized,
    {
        if self.try_get_service_from_provider::<C>(qualifiers)?.is_some() {
            Ok(true)
        } else {
            Ok(self.factory.exists::<C>(qualifiers))
        }
    }

    pub fn get_service<C>(&self, qualifiers: &Qualifiers) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        match self.try_get_service_from_provider::<C>(qualifiers)? {
            Some(object) => Ok(object),
            None => self.factory.resolve::<C>(qualifiers),
        }
    }

    pub fn get_service_or<C, D>(&self, qualifiers: &Qualifiers) -> Result<Arc<C>, ServiceError>
    where
        C: Contract + ?Sized,
        D: Instantiate + Upcast<C>,
    {
        match self.try_get_service_from_provider::<C>(qualifiers)? {
            Some(object) => Ok(object),
            None => self.factory.resolve_or_default::<C, D>(qualifiers),
        }
    }

    pub fn get_services<C>(&self, qualifiers: &Qualifiers) -> Result<Vec<Arc<C>>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        self.factory.resolve_multiple::<C>(qualifiers)
    }

    pub fn create_and_inject<T>(&self) -> Result<T, ServiceError>
    where
        T: Injectable,
    {
        self.provider.create_and_inject::<T>()
    }

    pub fn bind<C, T>(&self, singleton: bool, qualifiers: &Qualifiers)
    where
        C: Contract + ?Sized,
        T: Injectable + Upcast<C>,
    {
        self.provider.bind::<C, T>(singleton, qualifiers);
    }

    fn try_get_service_from_provider<C>(
        &self,
        qualifiers: &Qualifiers,
    ) -> Result<Option<Arc<C>>, ServiceError>
    where
        C: Contract + ?Sized,
    {
        let object = self.provider.get_service::<C>(qualifiers)?;
        if object.is_none() {
            tracing::debug!(contract = C::NAME, "provider declined, falling back to factory");
        }
        Ok(object)
    }
}
