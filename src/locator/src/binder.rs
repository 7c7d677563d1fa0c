use crate::provider::Provider;

/// Registers bindings on the active provider at process start.
///
/// Binders are listed in configuration under the key of contract
/// `dyn Binder`, resolved through the basic factory and invoked in
/// configuration order by [`Container::init`], before the container is handed
/// out to anyone.
///
/// # Examples
///
/// ```rust
/// # use locator::prelude::*;
/// trait Greeter: Send + Sync + 'static {
///     fn greet(&self) -> String;
/// }
///
/// contract!(dyn Greeter, "com.example.Greeter");
///
/// struct EnglishGreeter;
///
/// #[component(provides(dyn Greeter))]
/// impl EnglishGreeter {
///     #[inject]
///     fn new() -> Self {
///         Self
///     }
/// }
///
/// impl Greeter for EnglishGreeter {
///     fn greet(&self) -> String {
///         String::from("Hello")
///     }
/// }
///
/// struct AppBinder;
///
/// impl Binder for AppBinder {
///     fn config_bindings(&self, provider: &dyn Provider) {
///         provider.bind::<dyn Greeter, EnglishGreeter>(true, &qualifiers!["en"]);
///     }
/// }
///
/// let provider = MemoryProvider::new();
/// AppBinder.config_bindings(&provider);
/// let greeter = provider.get_service::<dyn Greeter>(&qualifiers!["en"]).unwrap();
/// assert_eq!(greeter.unwrap().greet(), "Hello");
/// ```
///
/// [`Container::init`]: crate::container::Container::init
pub trait Binder: Send + Sync + 'static {
    fn config_bindings(&self, provider: &dyn Provider);
}

crate::contract!(dyn Binder, "locator.Binder");
