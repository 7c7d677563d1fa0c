use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use locator::prelude::*;
use tracing_subscriber::EnvFilter;

trait Logger: Send + Sync + 'static {
    fn log(&self, msg: &str);
}

contract!(dyn Logger, "example.Logger");

struct StdoutLogger;

#[component(name = "example.StdoutLogger", singleton, provides(dyn Logger))]
impl StdoutLogger {
    #[inject]
    fn new() -> Self {
        Self
    }
}

impl Logger for StdoutLogger {
    fn log(&self, msg: &str) {
        println!("{msg}");
    }
}

trait Greeter: Send + Sync + 'static {
    fn greet(&self);
}

contract!(dyn Greeter, "example.Greeter");

#[derive(Debug, Clone, Copy)]
enum Language {
    English,
    Chinese,
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::English => write!(f, "en"),
            Self::Chinese => write!(f, "zh"),
        }
    }
}

struct EnglishGreeter {
    logger: Arc<dyn Logger>,
}

#[component(name = "example.EnglishGreeter", provides(dyn Greeter))]
impl EnglishGreeter {
    #[inject]
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.logger.log("Hello World!");
    }
}

struct ChineseGreeter {
    logger: Arc<dyn Logger>,
}

#[component(name = "example.ChineseGreeter", provides(dyn Greeter))]
impl ChineseGreeter {
    #[inject]
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for ChineseGreeter {
    fn greet(&self) {
        self.logger.log("你好世界!");
    }
}

struct GreeterBinder;

#[component(name = "example.GreeterBinder", provides(dyn Binder))]
impl GreeterBinder {
    #[inject]
    fn new() -> Self {
        Self
    }
}

impl Binder for GreeterBinder {
    fn config_bindings(&self, provider: &dyn Provider) {
        provider.bind::<dyn Logger, StdoutLogger>(true, &qualifiers![]);
        provider.bind::<dyn Greeter, EnglishGreeter>(true, &qualifiers![Language::English]);
        provider.bind::<dyn Greeter, ChineseGreeter>(true, &qualifiers![Language::Chinese]);
    }
}

struct App {
    logger: Arc<dyn Logger>,
    english: Arc<dyn Greeter>,
    chinese: Option<Arc<dyn Greeter>>,
}

#[component(name = "example.App")]
impl App {
    #[inject]
    fn new(
        logger: Arc<dyn Logger>,
        #[qualified(Language::English)] english: Arc<dyn Greeter>,
        #[qualified(Language::Chinese)] chinese: Option<Arc<dyn Greeter>>,
    ) -> Self {
        Self {
            logger,
            english,
            chinese,
        }
    }

    fn run(&self) {
        self.logger.log("Greeting from located services:");
        self.english.greet();
        if let Some(chinese) = &self.chinese {
            chinese.greet();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = TypeRegistry::new();
    registry.register::<dyn Binder, GreeterBinder>();
    let types = registry.finish()?;

    let config = MemoryConfig::from_pairs([
        ("locator.factory.impl.locator.Provider", MemoryProvider::NAME),
        ("locator.factory.impl.locator.Binder", GreeterBinder::NAME),
    ]);
    let container = Container::init(Arc::new(config), types)?;

    let app = container.create_and_inject::<App>()?;
    app.run();

    let greeter = container.get_service::<dyn Greeter>(&qualifiers![Language::Chinese])?;
    greeter.greet();

    Ok(())
}
