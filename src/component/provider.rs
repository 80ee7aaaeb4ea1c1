use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;

use crate::component::component::Component;
use crate::component::constants::DEFAULT_ENTRY_NAME;
use crate::component::container::{ComponentContainer, ComponentContainerInner};
use crate::component::types::{
    ComponentError, DynService, InstanceFactoryOptions, InstantiationMode,
};

/// Lazily builds and caches the service instances of one component.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    name: Arc<str>,
    container: Weak<ComponentContainerInner>,
    state: Mutex<ProviderState>,
}

#[derive(Default)]
struct ProviderState {
    component: Option<Component>,
    instances: HashMap<Arc<str>, DynService>,
    instance_options: HashMap<Arc<str>, Value>,
}

impl Provider {
    pub(crate) fn new(name: &str, container: &ComponentContainer) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                name: Arc::from(name),
                container: Arc::downgrade(&container.inner),
                state: Mutex::new(ProviderState::default()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn state(&self) -> MutexGuard<'_, ProviderState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn is_component_set(&self) -> bool {
        self.state().component.is_some()
    }

    pub fn is_initialized(&self, identifier: Option<&str>) -> bool {
        let state = self.state();
        let id = normalize_identifier(&state, identifier);
        state.instances.contains_key(&id)
    }

    pub fn clear_instance(&self, identifier: &str) {
        let mut state = self.state();
        state.instances.remove(identifier);
        state.instance_options.remove(identifier);
    }

    pub fn delete(&self) {
        let mut state = self.state();
        state.instances.clear();
        state.instance_options.clear();
    }

    pub fn get_immediate<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync + 'static,
    {
        self.get_immediate_with_options::<T>(None, true)
            .ok()
            .flatten()
    }

    /// Returns the instance for `identifier`, building it when the component is lazy.
    ///
    /// With `optional` set, initialization failures are reported as `Ok(None)`.
    pub fn get_immediate_with_options<T>(
        &self,
        identifier: Option<&str>,
        optional: bool,
    ) -> Result<Option<Arc<T>>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        match self.get_or_initialize(identifier, Value::Null, false) {
            Ok(service) => Ok(service.and_then(|service| service.downcast::<T>().ok())),
            Err(_) if optional => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn initialize<T>(
        &self,
        options: Value,
        identifier: Option<&str>,
    ) -> Result<Arc<T>, ComponentError>
    where
        T: Any + Send + Sync + 'static,
    {
        if self.is_initialized(identifier) {
            return Err(ComponentError::InstanceAlreadyInitialized {
                name: self.name().to_string(),
                identifier: identifier.unwrap_or(DEFAULT_ENTRY_NAME).to_string(),
            });
        }

        self.get_or_initialize(identifier, options, true)?
            .and_then(|service| service.downcast::<T>().ok())
            .ok_or_else(|| ComponentError::InstanceUnavailable {
                name: self.name().to_string(),
            })
    }

    pub fn get_options(&self, identifier: Option<&str>) -> Value {
        let state = self.state();
        let id = normalize_identifier(&state, identifier);
        state
            .instance_options
            .get(&id)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn set_component(&self, component: Component) -> Result<(), ComponentError> {
        if component.name() != self.name() {
            return Err(ComponentError::MismatchingComponent {
                expected: self.name().to_string(),
                found: component.name().to_string(),
            });
        }

        let mut state = self.state();
        if state.component.is_some() {
            return Err(ComponentError::ComponentAlreadyProvided {
                name: self.name().to_string(),
            });
        }
        state.component = Some(component);
        Ok(())
    }

    fn get_or_initialize(
        &self,
        identifier: Option<&str>,
        options: Value,
        force: bool,
    ) -> Result<Option<DynService>, ComponentError> {
        let (id, component) = {
            let state = self.state();
            let id = normalize_identifier(&state, identifier);
            if let Some(instance) = state.instances.get(&id) {
                return Ok(Some(instance.clone()));
            }
            match state.component.clone() {
                Some(component) => (id, component),
                None => return Ok(None),
            }
        };

        if !force && component.instantiation_mode() == InstantiationMode::Explicit {
            return Ok(None);
        }

        let container = match self.inner.container.upgrade() {
            Some(inner) => ComponentContainer { inner },
            None => {
                return Err(ComponentError::InitializationFailed {
                    name: self.name().to_string(),
                    reason: "container dropped".into(),
                });
            }
        };

        let factory_options = InstanceFactoryOptions::new(
            (id.as_ref() != DEFAULT_ENTRY_NAME).then(|| id.to_string()),
            options.clone(),
        );
        // The factory runs unlocked so it may resolve sibling providers.
        let instance = (component.instance_factory)(&container, factory_options).map_err(|err| {
            ComponentError::InitializationFailed {
                name: self.name().to_string(),
                reason: err.to_string(),
            }
        })?;

        let mut state = self.state();
        if let Some(existing) = state.instances.get(&id) {
            return Ok(Some(existing.clone()));
        }
        state.instances.insert(id.clone(), instance.clone());
        state.instance_options.insert(id, options);
        Ok(Some(instance))
    }
}

fn normalize_identifier(state: &ProviderState, identifier: Option<&str>) -> Arc<str> {
    let multiple = state
        .component
        .as_ref()
        .map(Component::multiple_instances)
        .unwrap_or(false);
    if multiple {
        Arc::from(identifier.unwrap_or(DEFAULT_ENTRY_NAME))
    } else {
        Arc::from(DEFAULT_ENTRY_NAME)
    }
}
