use std::sync::Arc;
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use crate::data_connect::error::DataConnectResult;
use crate::data_connect::reference::{decode_data, QueryRef, QueryResult};
use crate::data_connect::transport::DataConnectTransport;

/// Runs queries through the connector's transport.
#[derive(Clone)]
pub struct QueryManager {
    transport: Arc<dyn DataConnectTransport>,
}

impl QueryManager {
    pub fn new(transport: Arc<dyn DataConnectTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute_query<Data, Variables>(
        &self,
        query_ref: QueryRef<Data, Variables>,
    ) -> DataConnectResult<QueryResult<Data, Variables>>
    where
        Data: DeserializeOwned,
    {
        let raw = self
            .transport
            .invoke_query(query_ref.operation_name(), query_ref.serialized_variables())
            .await
            .inspect_err(|err| {
                log::debug!("query {} failed: {err}", query_ref.operation_name());
            })?;
        Ok(QueryResult {
            data: decode_data(query_ref.operation_name(), raw)?,
            fetch_time: SystemTime::now(),
            query_ref,
        })
    }
}
