use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data_connect::api::DataConnect;
use crate::data_connect::error::{internal_error, invalid_argument, DataConnectResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
}

/// Shared state of query and mutation references.
///
/// Variables are serialized once, when the reference is built, so a reference that
/// exists is always sendable.
pub struct OperationRef<Data, Variables> {
    service: Arc<DataConnect>,
    name: Arc<str>,
    variables: Variables,
    serialized_variables: Value,
    op_type: OperationType,
    _data: PhantomData<fn() -> Data>,
}

impl<Data, Variables> OperationRef<Data, Variables>
where
    Variables: Serialize,
{
    pub(crate) fn new(
        service: Arc<DataConnect>,
        name: &str,
        variables: Variables,
        op_type: OperationType,
    ) -> DataConnectResult<Self> {
        if name.trim().is_empty() {
            return Err(invalid_argument("Operation name must not be empty"));
        }
        let serialized_variables = serde_json::to_value(&variables).map_err(|err| {
            invalid_argument(format!("Failed to serialize variables for {name}: {err}"))
        })?;
        Ok(Self {
            service,
            name: Arc::from(name),
            variables,
            serialized_variables,
            op_type,
            _data: PhantomData,
        })
    }
}

impl<Data, Variables> OperationRef<Data, Variables> {
    pub fn operation_name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Wire form of the variables; `Value::Null` when the operation takes none.
    pub fn serialized_variables(&self) -> &Value {
        &self.serialized_variables
    }

    pub fn operation_type(&self) -> OperationType {
        self.op_type
    }

    pub fn service(&self) -> &Arc<DataConnect> {
        &self.service
    }
}

impl<Data, Variables: Clone> Clone for OperationRef<Data, Variables> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            name: self.name.clone(),
            variables: self.variables.clone(),
            serialized_variables: self.serialized_variables.clone(),
            op_type: self.op_type,
            _data: PhantomData,
        }
    }
}

impl<Data, Variables> fmt::Debug for OperationRef<Data, Variables> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRef")
            .field("name", &self.name)
            .field("op_type", &self.op_type)
            .field("variables", &self.serialized_variables)
            .field("connector", self.service.connector_config())
            .finish()
    }
}

/// Unexecuted query bound to a connector.
pub struct QueryRef<Data, Variables = ()>(pub(crate) OperationRef<Data, Variables>);

/// Unexecuted mutation bound to a connector.
pub struct MutationRef<Data, Variables = ()>(pub(crate) OperationRef<Data, Variables>);

macro_rules! delegate_ref {
    ($ty:ident) => {
        impl<Data, Variables> $ty<Data, Variables> {
            pub fn operation_name(&self) -> &str {
                self.0.operation_name()
            }

            pub fn variables(&self) -> &Variables {
                self.0.variables()
            }

            pub fn serialized_variables(&self) -> &Value {
                self.0.serialized_variables()
            }

            pub fn service(&self) -> &Arc<DataConnect> {
                self.0.service()
            }
        }

        impl<Data, Variables: Clone> Clone for $ty<Data, Variables> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<Data, Variables> fmt::Debug for $ty<Data, Variables> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($ty)).field(&self.0).finish()
            }
        }
    };
}

delegate_ref!(QueryRef);
delegate_ref!(MutationRef);

/// Decoded response of an executed query.
#[derive(Clone, Debug)]
pub struct QueryResult<Data, Variables = ()> {
    pub data: Data,
    pub fetch_time: SystemTime,
    pub query_ref: QueryRef<Data, Variables>,
}

/// Decoded response of an executed mutation.
#[derive(Clone, Debug)]
pub struct MutationResult<Data, Variables = ()> {
    pub data: Data,
    pub fetch_time: SystemTime,
    pub mutation_ref: MutationRef<Data, Variables>,
}

impl<Data, Variables> QueryResult<Data, Variables> {
    pub fn fetch_time_rfc3339(&self) -> String {
        system_time_to_string(self.fetch_time)
    }
}

impl<Data, Variables> MutationResult<Data, Variables> {
    pub fn fetch_time_rfc3339(&self) -> String {
        system_time_to_string(self.fetch_time)
    }
}

pub(crate) fn system_time_to_string(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decodes the `data` payload of a response into the operation's result type.
pub(crate) fn decode_data<Data>(operation: &str, data: Value) -> DataConnectResult<Data>
where
    Data: DeserializeOwned,
{
    serde_json::from_value(data).map_err(|err| {
        internal_error(format!(
            "Failed to decode the response of {operation}: {err}"
        ))
    })
}
