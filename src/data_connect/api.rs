use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use async_lock::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app;
use crate::app::FirebaseApp;
use crate::component::types::{DynService, InstanceFactoryOptions};
use crate::component::{Component, ComponentContainer, ComponentError, InstantiationMode};
use crate::data_connect::config::{
    emulator_from_env, ConnectorConfig, DataConnectOptions, TransportOptions,
};
use crate::data_connect::constants::DATA_CONNECT_COMPONENT_NAME;
use crate::data_connect::error::{
    already_initialized, internal_error, invalid_argument, not_initialized, DataConnectError,
    DataConnectResult,
};
use crate::data_connect::mutation::MutationManager;
use crate::data_connect::query::QueryManager;
use crate::data_connect::reference::{
    MutationRef, MutationResult, OperationRef, OperationType, QueryRef, QueryResult,
};
use crate::data_connect::transport::{DataConnectTransport, RestTransport};

/// Client for one connector of one Firebase app.
///
/// The transport is created on first execution; until then the instance can still
/// be pointed at an emulator or given a custom transport.
pub struct DataConnect {
    app: FirebaseApp,
    connector: ConnectorConfig,
    emulator: Mutex<Option<TransportOptions>>,
    generated_sdk: AtomicBool,
    runtime: OnceCell<OperationRuntime>,
}

struct OperationRuntime {
    transport: Arc<dyn DataConnectTransport>,
    /// Emulator route last handed to `transport`.
    routed_to: Mutex<Option<TransportOptions>>,
    queries: QueryManager,
    mutations: MutationManager,
}

impl OperationRuntime {
    fn new(transport: Arc<dyn DataConnectTransport>, routed_to: Option<TransportOptions>) -> Self {
        Self {
            queries: QueryManager::new(transport.clone()),
            mutations: MutationManager::new(transport.clone()),
            routed_to: Mutex::new(routed_to),
            transport,
        }
    }
}

impl DataConnect {
    fn new(app: FirebaseApp, connector: ConnectorConfig) -> Self {
        let emulator = match emulator_from_env() {
            Ok(emulator) => emulator,
            Err(err) => {
                log::warn!("Ignoring invalid Data Connect emulator host: {err}");
                None
            }
        };
        Self {
            app,
            connector,
            emulator: Mutex::new(emulator),
            generated_sdk: AtomicBool::new(false),
            runtime: OnceCell::new(),
        }
    }

    pub fn app(&self) -> &FirebaseApp {
        &self.app
    }

    pub fn connector_config(&self) -> &ConnectorConfig {
        &self.connector
    }

    /// Connector plus the app's project; fails when the app has no project ID.
    pub fn options(&self) -> DataConnectResult<DataConnectOptions> {
        DataConnectOptions::new(self.connector.clone(), self.app.options().project_id)
    }

    fn emulator(&self) -> MutexGuard<'_, Option<TransportOptions>> {
        self.emulator
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn is_emulator(&self) -> bool {
        self.emulator().is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.get().is_some()
    }

    /// Marks this instance as driven by generated bindings; reported to the backend.
    pub fn use_generated_sdk(&self) {
        self.generated_sdk.store(true, Ordering::SeqCst);
        if let Some(runtime) = self.runtime.get() {
            runtime.transport.set_generated_sdk(true);
        }
    }

    pub fn is_generated_sdk(&self) -> bool {
        self.generated_sdk.load(Ordering::SeqCst)
    }

    /// Routes requests to an emulator instead of the production host.
    ///
    /// Once the transport exists only a repeat of the current settings is accepted.
    pub fn connect_emulator(&self, options: TransportOptions) -> DataConnectResult<()> {
        let mut emulator = self.emulator();
        if self.is_initialized() {
            if emulator.as_ref() == Some(&options) {
                return Ok(());
            }
            return Err(already_initialized(
                "DataConnect instance already initialized!",
            ));
        }
        log::debug!(
            "Connecting Data Connect {} to emulator at {}",
            self.connector,
            options.base_url()
        );
        *emulator = Some(options);
        Ok(())
    }

    /// Installs a custom transport; only possible before the first request.
    pub async fn set_transport(
        &self,
        transport: Arc<dyn DataConnectTransport>,
    ) -> DataConnectResult<()> {
        if self.is_generated_sdk() {
            transport.set_generated_sdk(true);
        }
        let emulator = self.emulator().clone();
        if let Some(emulator) = emulator.clone() {
            transport.use_emulator(emulator);
        }
        let runtime = self
            .runtime
            .set(OperationRuntime::new(transport, emulator))
            .await
            .map_err(|_| already_initialized("DataConnect instance already initialized!"))?;
        self.sync_runtime(runtime);
        Ok(())
    }

    async fn runtime(&self) -> DataConnectResult<&OperationRuntime> {
        let runtime = self
            .runtime
            .get_or_try_init(|| async {
                let (transport, emulator) = self.build_transport()?;
                Ok::<_, DataConnectError>(OperationRuntime::new(transport, emulator))
            })
            .await?;
        self.sync_runtime(runtime);
        Ok(runtime)
    }

    /// Re-applies settings that changed while the runtime was being installed.
    fn sync_runtime(&self, runtime: &OperationRuntime) {
        if self.is_generated_sdk() {
            runtime.transport.set_generated_sdk(true);
        }
        let emulator = self.emulator();
        let mut routed_to = runtime
            .routed_to
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        if *routed_to != *emulator {
            if let Some(options) = emulator.clone() {
                runtime.transport.use_emulator(options);
            }
            *routed_to = emulator.clone();
        }
    }

    fn build_transport(
        &self,
    ) -> DataConnectResult<(Arc<dyn DataConnectTransport>, Option<TransportOptions>)> {
        self.app
            .check_destroyed()
            .map_err(|err| not_initialized(err.to_string()))?;
        let options = self.options()?;
        let app_options = self.app.options();
        let transport = RestTransport::new(options, app_options.api_key, app_options.app_id);
        let emulator = self.emulator().clone();
        if let Some(emulator) = emulator.clone() {
            transport.use_emulator(emulator);
        }
        transport.set_generated_sdk(self.is_generated_sdk());
        log::debug!(
            "Initialized Data Connect transport for {} on app '{}'",
            self.connector,
            self.app.name()
        );
        Ok((Arc::new(transport), emulator))
    }
}

impl fmt::Debug for DataConnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataConnect")
            .field("app", &self.app.name())
            .field("connector", &self.connector)
            .field("emulator", &*self.emulator())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

static DATA_CONNECT_COMPONENT: LazyLock<()> = LazyLock::new(|| {
    let component = Component::new(DATA_CONNECT_COMPONENT_NAME, Arc::new(data_connect_factory))
        .with_instantiation_mode(InstantiationMode::Explicit)
        .with_multiple_instances(true);
    let _ = app::register_component(component);
});

fn data_connect_factory(
    container: &ComponentContainer,
    options: InstanceFactoryOptions,
) -> Result<DynService, ComponentError> {
    let init_failed = |reason: String| ComponentError::InitializationFailed {
        name: DATA_CONNECT_COMPONENT_NAME.to_string(),
        reason,
    };
    let app = container
        .root_service::<FirebaseApp>()
        .ok_or_else(|| init_failed("Firebase app not attached to component container".into()))?;

    let connector: ConnectorConfig = if options.options.is_null() {
        let identifier = options
            .instance_identifier
            .ok_or_else(|| init_failed("connector config is required".into()))?;
        serde_json::from_str(&identifier).map_err(|err| init_failed(err.to_string()))?
    } else {
        serde_json::from_value(options.options).map_err(|err| init_failed(err.to_string()))?
    };
    connector
        .validate()
        .map_err(|err| init_failed(err.to_string()))?;

    Ok(Arc::new(DataConnect::new((*app).clone(), connector)) as DynService)
}

pub fn register_data_connect_component() {
    LazyLock::force(&DATA_CONNECT_COMPONENT);
}

/// Returns the shared `DataConnect` for `connector` on `app` (or the default app).
pub fn get_data_connect(
    app: Option<FirebaseApp>,
    connector: ConnectorConfig,
) -> DataConnectResult<Arc<DataConnect>> {
    register_data_connect_component();
    let app = match app {
        Some(app) => app,
        None => app::get_app(None).map_err(|err| not_initialized(err.to_string()))?,
    };
    app.check_destroyed()
        .map_err(|err| not_initialized(err.to_string()))?;
    connector.validate()?;

    let identifier = connector.identifier();
    let provider = app::get_provider(&app, DATA_CONNECT_COMPONENT_NAME);
    if let Some(existing) = provider
        .get_immediate_with_options::<DataConnect>(Some(&identifier), true)
        .unwrap_or(None)
    {
        return Ok(existing);
    }

    let options =
        serde_json::to_value(&connector).map_err(|err| internal_error(err.to_string()))?;
    match provider.initialize::<DataConnect>(options, Some(&identifier)) {
        Ok(service) => Ok(service),
        Err(ComponentError::InstanceAlreadyInitialized { .. }) => provider
            .get_immediate_with_options::<DataConnect>(Some(&identifier), true)
            .unwrap_or(None)
            .ok_or_else(|| internal_error("Data Connect instance unavailable")),
        Err(err) => Err(internal_error(err.to_string())),
    }
}

pub fn connect_data_connect_emulator(
    data_connect: &DataConnect,
    host: &str,
    port: Option<u16>,
    ssl_enabled: bool,
) -> DataConnectResult<()> {
    if host.trim().is_empty() {
        return Err(invalid_argument("Host is required for emulator connections"));
    }
    data_connect.connect_emulator(TransportOptions::new(host, port, ssl_enabled))
}

/// Drops the cached instance so the next `get_data_connect` builds a new one.
pub fn terminate(data_connect: &DataConnect) {
    data_connect.app().remove_service_instance(
        DATA_CONNECT_COMPONENT_NAME,
        Some(&data_connect.connector_config().identifier()),
    );
}

pub fn query_ref<Data, Variables>(
    data_connect: &Arc<DataConnect>,
    operation_name: &str,
    variables: Variables,
) -> DataConnectResult<QueryRef<Data, Variables>>
where
    Variables: Serialize,
{
    OperationRef::new(
        data_connect.clone(),
        operation_name,
        variables,
        OperationType::Query,
    )
    .map(QueryRef)
}

pub fn mutation_ref<Data, Variables>(
    data_connect: &Arc<DataConnect>,
    operation_name: &str,
    variables: Variables,
) -> DataConnectResult<MutationRef<Data, Variables>>
where
    Variables: Serialize,
{
    OperationRef::new(
        data_connect.clone(),
        operation_name,
        variables,
        OperationType::Mutation,
    )
    .map(MutationRef)
}

pub async fn execute_query<Data, Variables>(
    query_ref: &QueryRef<Data, Variables>,
) -> DataConnectResult<QueryResult<Data, Variables>>
where
    Data: DeserializeOwned,
    Variables: Clone,
{
    let runtime = query_ref.service().runtime().await?;
    runtime.queries.execute_query(query_ref.clone()).await
}

pub async fn execute_mutation<Data, Variables>(
    mutation_ref: &MutationRef<Data, Variables>,
) -> DataConnectResult<MutationResult<Data, Variables>>
where
    Data: DeserializeOwned,
    Variables: Clone,
{
    let runtime = mutation_ref.service().runtime().await?;
    runtime.mutations.execute_mutation(mutation_ref.clone()).await
}
