use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use parking_lot::ReentrantMutex;

use crate::util::any::SharedAny;
use crate::ServiceError;

/// A process-lifetime map from a concrete type to its only instance.
///
/// One lock guards the whole cache and is held while an instance is being
/// constructed, so concurrent first requests for a type see exactly one
/// construction. The lock is re-entrant, which lets a constructor resolve
/// other singletons of the same cache on the same thread.
pub struct SingletonCache {
    state: ReentrantMutex<RefCell<CacheState>>,
}

struct CacheState {
    objects: HashMap<TypeId, SharedAny>,
    constructing: HashSet<TypeId>,
}

impl SingletonCache {
    pub fn new() -> Self {
        Self {
            state: ReentrantMutex::new(RefCell::new(CacheState {
                objects: HashMap::new(),
                constructing: HashSet::new(),
            })),
        }
    }

    /// Returns the cached instance of `type_id`, calling `create` to build it
    /// on the first request.
    ///
    /// A failed construction is not cached, so a later request tries again.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::CyclicDependency`] if `create` (transitively)
    /// requests `type_id` itself, or whatever error `create` returns.
    pub fn get_or_create<F>(
        &self,
        type_id: TypeId,
        name: &'static str,
        create: F,
    ) -> Result<SharedAny, ServiceError>
    where
        F: FnOnce() -> Result<SharedAny, ServiceError>,
    {
        let guard = self.state.lock();

        {
            let mut state = guard.borrow_mut();
            if let Some(object) = state.objects.get(&type_id) {
                return Ok(Arc::clone(object));
            }
            if !state.constructing.insert(type_id) {
                return Err(ServiceError::CyclicDependency { name });
            }
        }

        let constructing = ConstructingGuard {
            state: &*guard,
            type_id,
        };
        let object = create()?;
        drop(constructing);

        guard
            .borrow_mut()
            .objects
            .insert(type_id, Arc::clone(&object));
        tracing::debug!(name, "singleton created");
        Ok(object)
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.state.lock().borrow().objects.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.state.lock().borrow().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SingletonCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SingletonCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SingletonCache")
            .field("len", &self.len())
            .finish()
    }
}

// Clears the in-construction mark even when the constructor fails or panics.
struct ConstructingGuard<'a> {
    state: &'a RefCell<CacheState>,
    type_id: TypeId,
}

impl Drop for ConstructingGuard<'_> {
    fn drop(&mut self) {
        self.state.borrow_mut().constructing.remove(&self.type_id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    struct Counted;

    struct Outer;

    #[test]
    fn singleton_cache_get_or_create_succeeds() {
        let cache = SingletonCache::new();
        let first = cache
            .get_or_create(TypeId::of::<Counted>(), "test.Counted", || {
                Ok(Arc::new(Counted) as SharedAny)
            })
            .unwrap();
        let second = cache
            .get_or_create(TypeId::of::<Counted>(), "test.Counted", || {
                unreachable!("the cached object should be returned")
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains(TypeId::of::<Counted>()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn singleton_cache_get_or_create_succeeds_when_constructor_is_reentrant() {
        let cache = SingletonCache::new();
        let object = cache
            .get_or_create(TypeId::of::<Outer>(), "test.Outer", || {
                cache.get_or_create(TypeId::of::<Counted>(), "test.Counted", || {
                    Ok(Arc::new(Counted) as SharedAny)
                })?;
                Ok(Arc::new(Outer) as SharedAny)
            })
            .unwrap();

        assert!(object.is::<Outer>());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn singleton_cache_get_or_create_fails_when_dependency_is_cyclic() {
        let cache = SingletonCache::new();
        let res = cache.get_or_create(TypeId::of::<Outer>(), "test.Outer", || {
            cache.get_or_create(TypeId::of::<Outer>(), "test.Outer", || {
                unreachable!("construction should not be re-entered")
            })
        });

        assert!(matches!(
            res,
            Err(ServiceError::CyclicDependency { name: "test.Outer" })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn singleton_cache_get_or_create_retries_after_failure() {
        let cache = SingletonCache::new();
        let res = cache.get_or_create(TypeId::of::<Counted>(), "test.Counted", || {
            Err(ServiceError::instantiation("test.Counted", "boom"))
        });
        assert!(res.is_err());
        assert!(!cache.contains(TypeId::of::<Counted>()));

        let res = cache.get_or_create(TypeId::of::<Counted>(), "test.Counted", || {
            Ok(Arc::new(Counted) as SharedAny)
        });
        assert!(res.is_ok());
    }

    #[test]
    fn singleton_cache_get_or_create_constructs_once_across_threads() {
        let cache = Arc::new(SingletonCache::new());
        let count = Arc::new(AtomicUsize::new(0));

        let handles = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let count = Arc::clone(&count);
                thread::spawn(move || {
                    cache
                        .get_or_create(TypeId::of::<Counted>(), "test.Counted", || {
                            count.fetch_add(1, Ordering::SeqCst);
                            thread::yield_now();
                            Ok(Arc::new(Counted) as SharedAny)
                        })
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();
        let objects = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(objects.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }
}
