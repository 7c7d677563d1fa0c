//! An optional process-wide [`Container`].
//!
//! Applications that prefer a static entry point may install one container
//! at startup and reach it from anywhere afterwards. Nothing else in this
//! crate depends on it, so tests can keep building fresh containers.

use once_cell::sync::OnceCell;

use crate::container::Container;
use crate::ServiceError;

static CONTAINER: OnceCell<Container> = OnceCell::new();

/// Installs `container` as the process-wide container.
///
/// # Errors
///
/// Gives `container` back if another one is already installed.
pub fn install(container: Container) -> Result<&'static Container, Container> {
    CONTAINER
        .try_insert(container)
        .map_err(|(_, container)| container)
}

/// Returns the process-wide container, if one is installed.
pub fn get() -> Option<&'static Container> {
    CONTAINER.get()
}

/// Returns the process-wide container, installing the one built by `init`
/// if none is installed yet.
///
/// # Errors
///
/// Returns the error of `init`, in which case nothing is installed.
pub fn get_or_init<F>(init: F) -> Result<&'static Container, ServiceError>
where
    F: FnOnce() -> Result<Container, ServiceError>,
{
    CONTAINER.get_or_try_init(init)
}
