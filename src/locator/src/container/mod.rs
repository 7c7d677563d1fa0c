mod core;
mod handle;

pub use handle::Container;
