use std::any::Any;
use std::sync::Arc;

/// A type-erased object which may be shared between threads, as stored in
/// singleton caches.
pub type SharedAny = Arc<dyn Any + Send + Sync>;

/// A type-erased object handed across object-safe provider boundaries.
pub type OwnedAny = Box<dyn Any + Send>;

/// Recovers a value of type `T` from an [`OwnedAny`], giving the object back
/// when it has a different type.
pub fn unbox<T: Any>(object: OwnedAny) -> Result<T, OwnedAny> {
    object.downcast::<T>().map(|object| *object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbox_succeeds_when_type_matches() {
        let object: OwnedAny = Box::new(Arc::new(42i32));
        assert_eq!(*unbox::<Arc<i32>>(object).unwrap(), 42);
    }

    #[test]
    fn unbox_fails_when_type_differs() {
        let object: OwnedAny = Box::new(42i32);
        let object = unbox::<i64>(object).unwrap_err();
        assert!(object.is::<i32>());
    }
}
