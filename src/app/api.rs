use std::sync::Arc;

use crate::app::constants::DEFAULT_ENTRY_NAME;
use crate::app::errors::{AppError, AppResult};
use crate::app::registry::{self, apps_guard};
use crate::app::types::{FirebaseApp, FirebaseAppConfig, FirebaseAppSettings, FirebaseOptions};
use crate::component::types::{DynService, InstanceFactory};
use crate::component::{self, Component, ComponentContainer};

pub static SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

fn normalize_name(settings: &FirebaseAppSettings) -> AppResult<String> {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_ENTRY_NAME.to_string());
    if name.trim().is_empty() {
        return Err(AppError::BadAppName { app_name: name });
    }
    Ok(name)
}

/// Creates (or returns the identical existing) app registered under the settings' name.
pub fn initialize_app(
    options: FirebaseOptions,
    settings: Option<FirebaseAppSettings>,
) -> AppResult<FirebaseApp> {
    let settings = settings.unwrap_or_default();
    let name = normalize_name(&settings)?;
    if !options.is_defined() {
        return Err(AppError::NoOptions);
    }
    let config = FirebaseAppConfig::new(
        name.clone(),
        settings.automatic_data_collection_enabled.unwrap_or(true),
    );

    let mut apps = apps_guard();
    if let Some(existing) = apps.get(&name) {
        if existing.options() == options && existing.config() == config {
            return Ok(existing.clone());
        }
        return Err(AppError::DuplicateApp { app_name: name });
    }

    let container = ComponentContainer::new(name.clone());
    let app = FirebaseApp::new(options, config, container.clone());

    let app_for_factory = app.clone();
    let app_factory: InstanceFactory =
        Arc::new(move |_container, _options| Ok(Arc::new(app_for_factory.clone()) as DynService));
    container.add_component(Component::new("app", app_factory))?;

    let components: Vec<Component> = component::global_components().values().cloned().collect();
    for component in &components {
        registry::add_component(&app, component);
    }

    apps.insert(name.clone(), app.clone());
    log::debug!("Initialized Firebase app '{name}'");
    Ok(app)
}

pub fn get_app(name: Option<&str>) -> AppResult<FirebaseApp> {
    let lookup = name.unwrap_or(DEFAULT_ENTRY_NAME);
    apps_guard()
        .get(lookup)
        .cloned()
        .ok_or_else(|| AppError::NoApp {
            app_name: lookup.to_string(),
        })
}

pub fn get_apps() -> Vec<FirebaseApp> {
    apps_guard().values().cloned().collect()
}

/// Removes the app from the registry and drops every service instance it owns.
pub fn delete_app(app: &FirebaseApp) -> AppResult<()> {
    let removed = apps_guard().remove(app.name());
    if removed.is_some() {
        for provider in app.container().get_providers() {
            provider.delete();
        }
        app.set_is_deleted(true);
        log::debug!("Deleted Firebase app '{}'", app.name());
    }
    Ok(())
}
