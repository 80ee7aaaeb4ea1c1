use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::data_connect::config::{DataConnectOptions, TransportOptions};
use crate::data_connect::error::{
    internal_error, operation_error, other_error, unauthorized, DataConnectErrorPathSegment,
    DataConnectOperationFailureResponse, DataConnectOperationFailureResponseErrorInfo,
    DataConnectResult,
};

/// Executes named operations against a Data Connect backend.
///
/// `variables` is `Value::Null` for operations that take none.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DataConnectTransport: Send + Sync {
    async fn invoke_query(&self, operation: &str, variables: &Value) -> DataConnectResult<Value>;
    async fn invoke_mutation(&self, operation: &str, variables: &Value)
        -> DataConnectResult<Value>;
    fn use_emulator(&self, options: TransportOptions);
    fn set_generated_sdk(&self, enabled: bool);
}

/// JSON-over-HTTPS transport for the `executeQuery` / `executeMutation` endpoints.
pub struct RestTransport {
    client: reqwest::Client,
    options: DataConnectOptions,
    api_key: Option<String>,
    app_id: Option<String>,
    state: Mutex<TransportState>,
    generated_sdk: AtomicBool,
}

struct TransportState {
    transport: TransportOptions,
    is_emulator: bool,
}

impl RestTransport {
    pub fn new(
        options: DataConnectOptions,
        api_key: Option<String>,
        app_id: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
            api_key,
            app_id,
            state: Mutex::new(TransportState {
                transport: TransportOptions::default(),
                is_emulator: false,
            }),
            generated_sdk: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn is_emulator(&self) -> bool {
        self.state().is_emulator
    }

    fn endpoint_url(&self, action: &str) -> DataConnectResult<Url> {
        let base = self.state().transport.base_url();
        let path = format!("{base}/v1/{}:{action}", self.options.resource_path());
        let mut url = Url::parse(&path).map_err(|err| internal_error(err.to_string()))?;
        if let Some(key) = self.api_key.as_deref().filter(|key| !key.is_empty()) {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn goog_api_client_header(&self) -> String {
        let mut header = format!("gl-rs/ fire/{}", env!("CARGO_PKG_VERSION"));
        if self.generated_sdk.load(Ordering::SeqCst) {
            header.push_str(" rs/gen");
        }
        header
    }

    fn request_body(&self, operation: &str, variables: &Value) -> Value {
        let mut body = Map::new();
        body.insert(
            "name".to_string(),
            Value::String(self.options.resource_path()),
        );
        body.insert(
            "operationName".to_string(),
            Value::String(operation.to_string()),
        );
        if !variables.is_null() {
            body.insert("variables".to_string(), variables.clone());
        }
        Value::Object(body)
    }

    fn headers(&self) -> DataConnectResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Goog-Api-Client",
            HeaderValue::from_str(&self.goog_api_client_header())
                .map_err(|err| internal_error(err.to_string()))?,
        );
        if let Some(app_id) = self.app_id.as_deref().filter(|id| !id.is_empty()) {
            headers.insert(
                "X-Firebase-GMPID",
                HeaderValue::from_str(app_id).map_err(|err| internal_error(err.to_string()))?,
            );
        }
        Ok(headers)
    }

    async fn perform_request(
        &self,
        action: &str,
        operation: &str,
        variables: &Value,
    ) -> DataConnectResult<Value> {
        let url = self.endpoint_url(action)?;
        log::debug!("Data Connect {action} '{operation}' -> {url}");

        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(&self.request_body(operation, variables))
            .send()
            .await
            .map_err(|err| other_error(format!("Data Connect request failed: {err}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(unauthorized("Request unauthorized"));
        }
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    log::debug!("Could not read Data Connect error body: {err}");
                    String::new()
                }
            };
            log::warn!("Data Connect {action} '{operation}' failed with status {status}");
            return Err(other_error(format!(
                "Data Connect error while performing request ({status}): {body}"
            )));
        }

        let graph_response: GraphQlResponse = response
            .json()
            .await
            .map_err(|err| internal_error(format!("Invalid Data Connect response: {err}")))?;
        if !graph_response.errors.is_empty() {
            let failure = graph_response.into_failure();
            let messages = failure
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(operation_error(
                format!("Data Connect error executing {operation}: {messages}"),
                failure,
            ));
        }

        Ok(graph_response.data.unwrap_or(Value::Null))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DataConnectTransport for RestTransport {
    async fn invoke_query(&self, operation: &str, variables: &Value) -> DataConnectResult<Value> {
        self.perform_request("executeQuery", operation, variables)
            .await
    }

    async fn invoke_mutation(
        &self,
        operation: &str,
        variables: &Value,
    ) -> DataConnectResult<Value> {
        self.perform_request("executeMutation", operation, variables)
            .await
    }

    fn use_emulator(&self, options: TransportOptions) {
        let mut state = self.state();
        state.transport = options;
        state.is_emulator = true;
    }

    fn set_generated_sdk(&self, enabled: bool) {
        self.generated_sdk.store(enabled, Ordering::SeqCst);
    }
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: Option<String>,
    path: Option<Vec<Value>>,
}

impl GraphQlResponse {
    fn into_failure(self) -> DataConnectOperationFailureResponse {
        DataConnectOperationFailureResponse {
            data: self.data,
            errors: self
                .errors
                .into_iter()
                .map(|error| DataConnectOperationFailureResponseErrorInfo {
                    message: error
                        .message
                        .unwrap_or_else(|| "Unknown Data Connect error".to_string()),
                    path: error
                        .path
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|segment| match segment {
                            Value::String(field) => Some(DataConnectErrorPathSegment::Field(field)),
                            Value::Number(num) => num.as_i64().map(DataConnectErrorPathSegment::Index),
                            _ => None,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::data_connect::config::ConnectorConfig;
    use crate::data_connect::error::DataConnectErrorCode;
    use crate::test_support::start_mock_server;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    const QUERY_PATH: &str =
        "/v1/projects/demo/locations/us-east4/services/svc/connectors/goals:executeQuery";
    const MUTATION_PATH: &str =
        "/v1/projects/demo/locations/us-east4/services/svc/connectors/goals:executeMutation";
    const RESOURCE: &str = "projects/demo/locations/us-east4/services/svc/connectors/goals";

    fn transport_for(server: &MockServer) -> RestTransport {
        let connector = ConnectorConfig::new("us-east4", "goals", "svc").unwrap();
        let options = DataConnectOptions::new(connector, Some("demo".into())).unwrap();
        let transport = RestTransport::new(options, Some("api-key".into()), Some("1:1:web:1".into()));
        transport.use_emulator(TransportOptions::new(server.host(), Some(server.port()), false));
        transport
    }

    #[tokio::test(flavor = "current_thread")]
    async fn query_posts_operation_without_variables() {
        let server = start_mock_server().await;
        let client_header = format!("gl-rs/ fire/{}", env!("CARGO_PKG_VERSION"));
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(QUERY_PATH)
                    .query_param("key", "api-key")
                    .header("x-firebase-gmpid", "1:1:web:1")
                    .header("x-goog-api-client", client_header.as_str())
                    .json_body(json!({ "name": RESOURCE, "operationName": "getGoals" }));
                then.status(200).json_body(json!({ "data": { "goals": [] } }));
            })
            .await;

        let transport = transport_for(&server);
        assert!(transport.is_emulator());
        let data = transport.invoke_query("getGoals", &Value::Null).await.unwrap();
        assert_eq!(data, json!({ "goals": [] }));
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn mutation_sends_variables_and_generated_marker() {
        let server = start_mock_server().await;
        let client_header = format!("gl-rs/ fire/{} rs/gen", env!("CARGO_PKG_VERSION"));
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(MUTATION_PATH)
                    .header("x-goog-api-client", client_header.as_str())
                    .json_body(json!({
                        "name": RESOURCE,
                        "operationName": "updateTask",
                        "variables": { "id": "t-1", "isCompleted": true }
                    }));
                then.status(200)
                    .json_body(json!({ "data": { "task_update": null } }));
            })
            .await;

        let transport = transport_for(&server);
        transport.set_generated_sdk(true);
        let data = transport
            .invoke_mutation("updateTask", &json!({ "id": "t-1", "isCompleted": true }))
            .await
            .unwrap();
        assert_eq!(data, json!({ "task_update": null }));
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unauthorized_status_maps_to_code() {
        let server = start_mock_server().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(QUERY_PATH);
                then.status(401);
            })
            .await;

        let err = transport_for(&server)
            .invoke_query("getGoals", &Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.code, DataConnectErrorCode::Unauthorized);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn server_failure_maps_to_other() {
        let server = start_mock_server().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(QUERY_PATH);
                then.status(500).body("boom");
            })
            .await;

        let err = transport_for(&server)
            .invoke_query("getGoals", &Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.code, DataConnectErrorCode::Other);
        assert!(err.message().contains("boom"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn graphql_errors_map_to_partial_error() {
        let server = start_mock_server().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(MUTATION_PATH);
                then.status(200).json_body(json!({
                    "data": { "goal_insert": null },
                    "errors": [{ "message": "status is required", "path": ["goal_insert", 0] }]
                }));
            })
            .await;

        let err = transport_for(&server)
            .invoke_mutation("createGoal", &json!({ "title": "x" }))
            .await
            .unwrap_err();
        assert_eq!(err.code, DataConnectErrorCode::PartialError);
        let response = err.operation_response().expect("failure response");
        assert_eq!(response.data, Some(json!({ "goal_insert": null })));
        assert_eq!(
            response.errors[0].path,
            vec![
                DataConnectErrorPathSegment::Field("goal_insert".into()),
                DataConnectErrorPathSegment::Index(0)
            ]
        );
    }
}
