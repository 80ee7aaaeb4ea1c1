use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app::{initialize_app, FirebaseApp, FirebaseAppSettings, FirebaseOptions};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn unique_settings(prefix: &str) -> FirebaseAppSettings {
    FirebaseAppSettings {
        name: Some(format!(
            "{prefix}-{}",
            COUNTER.fetch_add(1, Ordering::SeqCst)
        )),
        ..Default::default()
    }
}

/// Build a uniquely named app for the `demo-project` project.
///
/// Each call registers a new app so tests stay isolated with respect to the
/// service instances attached to it.
pub fn test_app(prefix: &str) -> FirebaseApp {
    let options = FirebaseOptions {
        api_key: Some("test-api-key".into()),
        project_id: Some("demo-project".into()),
        app_id: Some("1:123:web:abc".into()),
        ..Default::default()
    };
    initialize_app(options, Some(unique_settings(prefix))).expect("test app")
}

pub fn test_app_without_project(prefix: &str) -> FirebaseApp {
    let options = FirebaseOptions {
        api_key: Some("test-api-key".into()),
        ..Default::default()
    };
    initialize_app(options, Some(unique_settings(prefix))).expect("test app")
}
