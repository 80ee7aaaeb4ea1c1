mod component;
pub mod constants;
pub mod container;
pub mod provider;
pub mod types;

pub use component::Component;
pub use constants::DEFAULT_ENTRY_NAME;
pub use container::ComponentContainer;
pub use provider::Provider;
pub use types::{ComponentError, InstanceFactory, InstanceFactoryOptions, InstantiationMode};

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};


static GLOBAL_COMPONENTS: LazyLock<Mutex<HashMap<Arc<str>, Component>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

pub(crate) fn global_components() -> MutexGuard<'static, HashMap<Arc<str>, Component>> {
    GLOBAL_COMPONENTS
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Records a component so every app initialized afterwards receives it.
///
/// Returns `false` when a component with the same name was already registered.
pub fn register_component(component: Component) -> bool {
    let mut guard = global_components();
    if guard.contains_key(component.name()) {
        return false;
    }
    guard.insert(Arc::from(component.name()), component);
    true
}
