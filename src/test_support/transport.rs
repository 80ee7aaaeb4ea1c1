use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::data_connect::{
    internal_error, DataConnectError, DataConnectResult, DataConnectTransport, OperationType,
    TransportOptions,
};

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub kind: OperationType,
    pub operation: String,
    pub variables: Value,
}

/// In-memory transport that records every call and answers from a script.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<HashMap<String, Result<Value, DataConnectError>>>,
    generated_sdk: AtomicBool,
    emulator: Mutex<Option<TransportOptions>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, operation: &str, data: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(operation.to_string(), Ok(data));
    }

    pub fn fail_with(&self, operation: &str, error: DataConnectError) {
        self.responses
            .lock()
            .unwrap()
            .insert(operation.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn generated_sdk(&self) -> bool {
        self.generated_sdk.load(Ordering::SeqCst)
    }

    pub fn emulator(&self) -> Option<TransportOptions> {
        self.emulator.lock().unwrap().clone()
    }

    fn answer(&self, kind: OperationType, operation: &str, variables: &Value) -> DataConnectResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            operation: operation.to_string(),
            variables: variables.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .get(operation)
            .cloned()
            .unwrap_or_else(|| Err(internal_error(format!("no response scripted for {operation}"))))
    }
}

#[async_trait]
impl DataConnectTransport for RecordingTransport {
    async fn invoke_query(&self, operation: &str, variables: &Value) -> DataConnectResult<Value> {
        self.answer(OperationType::Query, operation, variables)
    }

    async fn invoke_mutation(&self, operation: &str, variables: &Value) -> DataConnectResult<Value> {
        self.answer(OperationType::Mutation, operation, variables)
    }

    fn use_emulator(&self, options: TransportOptions) {
        *self.emulator.lock().unwrap() = Some(options);
    }

    fn set_generated_sdk(&self, enabled: bool) {
        self.generated_sdk.store(enabled, Ordering::SeqCst);
    }
}
