use std::sync::Arc;

use locator::prelude::*;

pub trait Store: Send + Sync + 'static {}

pub trait Index: Send + Sync + 'static {}

contract!(dyn Store, "ui.Store");
contract!(dyn Index);

pub struct Disk;

#[component(name = "ui.Disk", singleton, provides(dyn Store, dyn Index))]
impl Disk {
    #[inject]
    fn create() -> Self {
        Self
    }
}

impl Store for Disk {}

impl Index for Disk {}

pub struct Catalog {
    _store: Arc<dyn Store>,
    _index: Option<Arc<dyn Index>>,
}

#[component(provides(dyn Index))]
impl Catalog {
    #[inject]
    pub fn new(
        #[qualified("primary", 2)] store: Arc<dyn Store>,
        index: Option<Arc<dyn Index>>,
    ) -> Self {
        Self {
            _store: store,
            _index: index,
        }
    }
}

impl Index for Catalog {}

fn main() {}
