use std::sync::Arc;
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use crate::data_connect::error::DataConnectResult;
use crate::data_connect::reference::{decode_data, MutationRef, MutationResult};
use crate::data_connect::transport::DataConnectTransport;

#[derive(Clone)]
pub struct MutationManager {
    transport: Arc<dyn DataConnectTransport>,
}

impl MutationManager {
    pub fn new(transport: Arc<dyn DataConnectTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute_mutation<Data, Variables>(
        &self,
        mutation_ref: MutationRef<Data, Variables>,
    ) -> DataConnectResult<MutationResult<Data, Variables>>
    where
        Data: DeserializeOwned,
    {
        let raw = self
            .transport
            .invoke_mutation(
                mutation_ref.operation_name(),
                mutation_ref.serialized_variables(),
            )
            .await
            .inspect_err(|err| {
                log::debug!("mutation {} failed: {err}", mutation_ref.operation_name());
            })?;
        Ok(MutationResult {
            data: decode_data(mutation_ref.operation_name(), raw)?,
            fetch_time: SystemTime::now(),
            mutation_ref,
        })
    }
}
