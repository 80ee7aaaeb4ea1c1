#![doc = include_str!("README.md")]
mod api;
mod config;
mod constants;
mod error;
mod mutation;
pub mod nullable;
mod query;
mod reference;
mod transport;

pub use api::{
    connect_data_connect_emulator, execute_mutation, execute_query, get_data_connect,
    mutation_ref, query_ref, register_data_connect_component, terminate, DataConnect,
};
pub use config::{
    emulator_from_env, parse_transport_options, ConnectorConfig, DataConnectOptions,
    TransportOptions, DEFAULT_DATA_CONNECT_HOST,
};
pub use constants::{DATA_CONNECT_COMPONENT_NAME, EMULATOR_HOST_ENV_VAR};
pub use error::{
    already_initialized, internal_error, invalid_argument, not_initialized, operation_error,
    other_error, unauthorized, DataConnectError, DataConnectErrorCode,
    DataConnectErrorPathSegment, DataConnectOperationFailureResponse,
    DataConnectOperationFailureResponseErrorInfo, DataConnectResult,
};
pub use reference::{
    MutationRef, MutationResult, OperationRef, OperationType, QueryRef, QueryResult,
};
pub use transport::{DataConnectTransport, RestTransport};
