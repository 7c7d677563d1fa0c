use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use locator::prelude::*;
use tracing_subscriber::EnvFilter;

pub trait Foo: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

contract!(dyn Foo, "com.example.Foo");

macro_rules! foo {
    ($ty:ident, $name:tt) => {
        pub struct $ty;

        #[component(name = $name, provides(dyn Foo))]
        impl $ty {
            #[inject]
            pub fn new() -> Self {
                Self
            }
        }

        impl Foo for $ty {
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

foo!(FooImpl, "com.example.FooImpl");
foo!(FooImpl2, "com.example.FooImpl2");
foo!(FooImplDefault, "com.example.FooImplDefault");

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

pub struct SharedFoo;

#[component(name = "com.example.SharedFoo", singleton, provides(dyn Foo))]
impl SharedFoo {
    #[inject]
    pub fn new() -> Self {
        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        thread::yield_now();
        Self
    }
}

impl Foo for SharedFoo {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn types() -> Types {
    let mut registry = TypeRegistry::new();
    registry
        .register::<dyn Foo, FooImpl>()
        .register::<dyn Foo, FooImpl2>()
        .register::<dyn Foo, FooImplDefault>()
        .register::<dyn Foo, SharedFoo>();
    registry.finish().unwrap()
}

fn container(config: &Arc<MemoryConfig>) -> Container {
    init_tracing();
    let config: Arc<dyn ConfigStore> = config.clone();
    Container::init(config, types()).unwrap()
}

fn container_with_memory_provider(config: &Arc<MemoryConfig>) -> Container {
    config.set("locator.factory.impl.locator.Provider", MemoryProvider::NAME);
    container(config)
}

#[test]
fn configuration_entry_alone_resolves_service() {
    let config = Arc::new(MemoryConfig::from_pairs([(
        "locator.factory.impl.com.example.Foo",
        "com.example.FooImpl",
    )]));
    let container = container(&config);

    let foo = container.get_service::<dyn Foo>(&qualifiers![]).unwrap();
    assert!(foo.as_any().is::<FooImpl>());
    assert!(container.has_service::<dyn Foo>(&qualifiers![]).unwrap());
}

#[test]
fn provider_binding_wins_over_configuration() {
    let config = Arc::new(MemoryConfig::from_pairs([(
        "locator.factory.impl.com.example.Foo",
        "com.example.FooImpl",
    )]));
    let container = container_with_memory_provider(&config);
    container.bind_with_scope::<dyn Foo, FooImpl2>(false, &qualifiers![]);

    let foo = container.get_service::<dyn Foo>(&qualifiers![]).unwrap();
    assert!(foo.as_any().is::<FooImpl2>());
}

#[test]
fn default_implementation_is_used_without_configuration() {
    let container = container(&Arc::new(MemoryConfig::new()));

    let foo = container
        .get_service_or::<dyn Foo, FooImplDefault>(&qualifiers![])
        .unwrap();
    assert!(foo.as_any().is::<FooImplDefault>());
}

#[test]
fn missing_service_fails_without_default() {
    let container = container(&Arc::new(MemoryConfig::new()));

    let err = container.get_service::<dyn Foo>(&qualifiers![]).err().unwrap();
    assert!(matches!(err, ServiceError::UnresolvedContract { .. }));
    assert_eq!(
        err.to_string(),
        "there needs to be a configuration entry defined for locator.factory.impl.com.example.Foo"
    );
}

#[test]
fn has_service_turns_true_after_configuration_entry_is_added() {
    let config = Arc::new(MemoryConfig::new());
    let container = container(&config);
    assert!(!container.has_service::<dyn Foo>(&qualifiers!["late"]).unwrap());

    config.set("locator.factory.impl.com.example.Foo.late", "com.example.FooImpl");
    assert!(container.has_service::<dyn Foo>(&qualifiers!["late"]).unwrap());
}

#[test]
fn has_service_turns_true_after_binding_is_added() {
    let container = container_with_memory_provider(&Arc::new(MemoryConfig::new()));
    assert!(!container.has_service::<dyn Foo>(&qualifiers![]).unwrap());

    container.bind::<dyn Foo, FooImpl>(&qualifiers![]);
    assert!(container.has_service::<dyn Foo>(&qualifiers![]).unwrap());
}

#[test]
fn qualified_binding_is_isolated() {
    let container = container_with_memory_provider(&Arc::new(MemoryConfig::new()));
    container.bind::<dyn Foo, FooImpl>(&qualifiers!["A"]);

    assert!(container.has_service::<dyn Foo>(&qualifiers!["A"]).unwrap());
    assert!(!container.has_service::<dyn Foo>(&qualifiers!["B"]).unwrap());
    assert!(!container.has_service::<dyn Foo>(&qualifiers![]).unwrap());
    assert!(!container.has_service::<dyn Foo>(&qualifiers!["A", "B"]).unwrap());
}

#[test]
fn qualified_configuration_entry_is_isolated() {
    let config = Arc::new(MemoryConfig::from_pairs([(
        "locator.factory.impl.com.example.Foo.A",
        "com.example.FooImpl",
    )]));
    let container = container(&config);

    assert!(container.get_service::<dyn Foo>(&qualifiers!["A"]).is_ok());
    assert!(container.get_service::<dyn Foo>(&qualifiers!["B"]).is_err());
    assert!(container.get_service::<dyn Foo>(&qualifiers![]).is_err());
}

#[test]
fn transient_service_is_created_anew() {
    let config = Arc::new(MemoryConfig::from_pairs([(
        "locator.factory.impl.com.example.Foo",
        "com.example.FooImpl",
    )]));
    let container = container(&config);

    let first = container.get_service::<dyn Foo>(&qualifiers![]).unwrap();
    let second = container.get_service::<dyn Foo>(&qualifiers![]).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn singleton_service_is_created_once_under_concurrency() {
    let config = Arc::new(MemoryConfig::from_pairs([(
        "locator.factory.impl.com.example.Foo.shared",
        "com.example.SharedFoo",
    )]));
    let container = container(&config);
    let before = CONSTRUCTED.load(Ordering::SeqCst);

    let handles = (0..32)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.get_service::<dyn Foo>(&qualifiers!["shared"]).unwrap())
        })
        .collect::<Vec<_>>();
    let objects = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();

    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst) - before, 1);
    assert!(objects.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn multiple_implementations_are_resolved_in_order() {
    let config = Arc::new(MemoryConfig::new());
    config.append("locator.factory.impl.com.example.Foo", "com.example.FooImpl2");
    config.append("locator.factory.impl.com.example.Foo", "com.example.FooImpl");
    let container = container(&config);

    let foos = container.get_services::<dyn Foo>(&qualifiers![]).unwrap();
    assert_eq!(foos.len(), 2);
    assert!(foos[0].as_any().is::<FooImpl2>());
    assert!(foos[1].as_any().is::<FooImpl>());
    assert!(container
        .get_services::<dyn Foo>(&qualifiers!["none"])
        .unwrap()
        .is_empty());
}

#[test]
fn installed_global_container_is_reachable() {
    let container = container(&Arc::new(MemoryConfig::from_pairs([(
        "locator.factory.impl.com.example.Foo",
        "com.example.FooImpl",
    )])));
    let installed = locator::global::install(container).ok().unwrap();

    let foo = locator::global::get()
        .unwrap()
        .get_service::<dyn Foo>(&qualifiers![])
        .unwrap();
    assert!(foo.as_any().is::<FooImpl>());
    assert!(std::ptr::eq(installed, locator::global::get().unwrap()));
}
