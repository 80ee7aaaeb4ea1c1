use std::sync::Arc;

use crate::component::types::{InstanceFactory, InstantiationMode};

/// Named service factory attached to every app container.
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    pub(crate) instance_factory: InstanceFactory,
    instantiation_mode: InstantiationMode,
    multiple_instances: bool,
}

impl Component {
    pub fn new(name: impl Into<String>, instance_factory: InstanceFactory) -> Self {
        Self {
            name: Arc::from(name.into()),
            instance_factory,
            instantiation_mode: InstantiationMode::Lazy,
            multiple_instances: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiation_mode(&self) -> InstantiationMode {
        self.instantiation_mode
    }

    /// Whether the provider keeps one instance per identifier instead of a single default.
    pub fn multiple_instances(&self) -> bool {
        self.multiple_instances
    }

    pub fn with_instantiation_mode(mut self, mode: InstantiationMode) -> Self {
        self.instantiation_mode = mode;
        self
    }

    pub fn with_multiple_instances(mut self, multiple: bool) -> Self {
        self.multiple_instances = multiple;
        self
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("instantiation_mode", &self.instantiation_mode)
            .field("multiple_instances", &self.multiple_instances)
            .finish()
    }
}
