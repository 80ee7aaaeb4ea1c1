use std::sync::{Arc, LazyLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::data_connect::{
    get_data_connect, mutation_ref, query_ref, ConnectorConfig, DataConnect, DataConnectResult,
    MutationRef, OperationType, QueryRef,
};
use crate::dataconnect_generated::types::{
    CreateGoalData, CreateGoalVariables, CreateUserData, CreateUserVariables, GetGoalsData,
    UpdateTaskData, UpdateTaskVariables,
};

static CONNECTOR_CONFIG: LazyLock<ConnectorConfig> = LazyLock::new(|| ConnectorConfig {
    location: "us-east4".to_string(),
    connector: "goals".to_string(),
    service: "goals-service".to_string(),
});

/// Location, service and connector the bindings were generated against.
pub fn connector_config() -> &'static ConnectorConfig {
    &CONNECTOR_CONFIG
}

/// A named operation of the connector together with its payload types.
pub trait Operation {
    const NAME: &'static str;
    const KIND: OperationType;
    type Data: DeserializeOwned;
    type Variables: Serialize + Clone;
}

/// Operations executed through `:executeQuery`.
pub trait QueryOperation: Operation {}

/// Operations executed through `:executeMutation`.
pub trait MutationOperation: Operation {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub kind: OperationType,
}

impl OperationDescriptor {
    fn of<Op: Operation>() -> Self {
        Self {
            name: Op::NAME,
            kind: Op::KIND,
        }
    }
}

macro_rules! operation {
    (@kind Query, $marker:ident) => {
        impl QueryOperation for $marker {}
    };
    (@kind Mutation, $marker:ident) => {
        impl MutationOperation for $marker {}
    };
    ($marker:ident, $name:literal, $kind:ident, $data:ty, $vars:ty) => {
        #[derive(Clone, Copy, Debug)]
        pub struct $marker;

        impl Operation for $marker {
            const NAME: &'static str = $name;
            const KIND: OperationType = OperationType::$kind;
            type Data = $data;
            type Variables = $vars;
        }

        operation!(@kind $kind, $marker);
    };
}

operation!(CreateGoal, "createGoal", Mutation, CreateGoalData, CreateGoalVariables);
operation!(CreateUser, "createUser", Mutation, CreateUserData, CreateUserVariables);
operation!(GetGoals, "getGoals", Query, GetGoalsData, ());
operation!(UpdateTask, "updateTask", Mutation, UpdateTaskData, UpdateTaskVariables);

/// Every operation the connector exposes, in declaration order.
pub fn operations() -> [OperationDescriptor; 4] {
    [
        OperationDescriptor::of::<CreateGoal>(),
        OperationDescriptor::of::<CreateUser>(),
        OperationDescriptor::of::<GetGoals>(),
        OperationDescriptor::of::<UpdateTask>(),
    ]
}

fn resolve_connector(dc: Option<Arc<DataConnect>>) -> DataConnectResult<Arc<DataConnect>> {
    let dc = match dc {
        Some(dc) => dc,
        None => get_data_connect(None, connector_config().clone())?,
    };
    dc.use_generated_sdk();
    Ok(dc)
}

/// Builds a query reference for `Op` on `dc`, or on the default app's goals connector.
pub fn query_ref_for<Op: QueryOperation>(
    dc: Option<Arc<DataConnect>>,
    variables: Op::Variables,
) -> DataConnectResult<QueryRef<Op::Data, Op::Variables>> {
    let dc = resolve_connector(dc)?;
    query_ref(&dc, Op::NAME, variables)
}

pub fn mutation_ref_for<Op: MutationOperation>(
    dc: Option<Arc<DataConnect>>,
    variables: Op::Variables,
) -> DataConnectResult<MutationRef<Op::Data, Op::Variables>> {
    let dc = resolve_connector(dc)?;
    mutation_ref(&dc, Op::NAME, variables)
}
