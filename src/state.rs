use juniper::Context as JuniperContext;

use crate::store::TutorialStore;

/// Request context handed to every resolver.
#[derive(Clone, Debug, Default)]
pub struct AppData {
    pub store: TutorialStore,
}

impl JuniperContext for AppData {}

impl AppData {
    pub fn new(store: TutorialStore) -> Self {
        Self { store }
    }
}
