//! Reference and execution entry points for each operation of the goals connector.
//!
//! Every function takes an optional [`DataConnect`] first; `None` targets the goals
//! connector of the default app.

use std::sync::Arc;

use crate::data_connect::{
    execute_mutation, execute_query, DataConnect, DataConnectResult, MutationRef, MutationResult,
    QueryRef, QueryResult,
};
use crate::dataconnect_generated::registry::{
    mutation_ref_for, query_ref_for, CreateGoal, CreateUser, GetGoals, UpdateTask,
};
use crate::dataconnect_generated::types::{
    CreateGoalData, CreateGoalVariables, CreateUserData, CreateUserVariables, GetGoalsData,
    UpdateTaskData, UpdateTaskVariables,
};

pub fn create_goal_ref(
    dc: Option<Arc<DataConnect>>,
    variables: CreateGoalVariables,
) -> DataConnectResult<MutationRef<CreateGoalData, CreateGoalVariables>> {
    mutation_ref_for::<CreateGoal>(dc, variables)
}

/// Inserts a goal and resolves to its key.
pub async fn create_goal(
    dc: Option<Arc<DataConnect>>,
    variables: CreateGoalVariables,
) -> DataConnectResult<MutationResult<CreateGoalData, CreateGoalVariables>> {
    execute_mutation(&create_goal_ref(dc, variables)?).await
}

pub fn create_user_ref(
    dc: Option<Arc<DataConnect>>,
    variables: CreateUserVariables,
) -> DataConnectResult<MutationRef<CreateUserData, CreateUserVariables>> {
    mutation_ref_for::<CreateUser>(dc, variables)
}

pub async fn create_user(
    dc: Option<Arc<DataConnect>>,
    variables: CreateUserVariables,
) -> DataConnectResult<MutationResult<CreateUserData, CreateUserVariables>> {
    execute_mutation(&create_user_ref(dc, variables)?).await
}

pub fn get_goals_ref(dc: Option<Arc<DataConnect>>) -> DataConnectResult<QueryRef<GetGoalsData>> {
    query_ref_for::<GetGoals>(dc, ())
}

/// Fetches every goal visible to the caller; an empty list is a normal result.
pub async fn get_goals(
    dc: Option<Arc<DataConnect>>,
) -> DataConnectResult<QueryResult<GetGoalsData>> {
    execute_query(&get_goals_ref(dc)?).await
}

pub fn update_task_ref(
    dc: Option<Arc<DataConnect>>,
    variables: UpdateTaskVariables,
) -> DataConnectResult<MutationRef<UpdateTaskData, UpdateTaskVariables>> {
    mutation_ref_for::<UpdateTask>(dc, variables)
}

/// Sets a task's completion flag. `task_update` is `None` when no task has that id.
pub async fn update_task(
    dc: Option<Arc<DataConnect>>,
    variables: UpdateTaskVariables,
) -> DataConnectResult<MutationResult<UpdateTaskData, UpdateTaskVariables>> {
    execute_mutation(&update_task_ref(dc, variables)?).await
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::data_connect::{get_data_connect, DataConnectErrorCode, OperationType};
    use crate::dataconnect_generated::keys::{GoalKey, TaskKey, UserKey};
    use crate::dataconnect_generated::registry::connector_config;
    use crate::test_support::{test_app, RecordingTransport};
    use serde_json::json;

    async fn connector_with_transport(prefix: &str) -> (Arc<DataConnect>, Arc<RecordingTransport>) {
        let dc = get_data_connect(Some(test_app(prefix)), connector_config().clone()).unwrap();
        let transport = RecordingTransport::new();
        dc.set_transport(transport.clone()).await.unwrap();
        (dc, transport)
    }

    #[test]
    fn refs_carry_operation_names_and_variables() {
        let dc = get_data_connect(Some(test_app("gen-refs")), connector_config().clone()).unwrap();

        let goal = create_goal_ref(
            Some(dc.clone()),
            CreateGoalVariables::new("Run 5k", "active", "2024-01-01"),
        )
        .unwrap();
        assert_eq!(goal.operation_name(), "createGoal");
        assert_eq!(
            goal.serialized_variables(),
            &json!({ "title": "Run 5k", "status": "active", "targetDate": "2024-01-01" })
        );

        let user = create_user_ref(Some(dc.clone()), CreateUserVariables::new("Ada")).unwrap();
        assert_eq!(user.operation_name(), "createUser");

        let goals = get_goals_ref(Some(dc.clone())).unwrap();
        assert_eq!(goals.operation_name(), "getGoals");
        assert_eq!(goals.serialized_variables(), &serde_json::Value::Null);

        let task = update_task_ref(Some(dc.clone()), UpdateTaskVariables::new("t-1", true)).unwrap();
        assert_eq!(task.operation_name(), "updateTask");
        assert_eq!(
            task.serialized_variables(),
            &json!({ "id": "t-1", "isCompleted": true })
        );
        assert!(Arc::ptr_eq(task.service(), &dc));
        assert!(dc.is_generated_sdk());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_goal_returns_inserted_key() {
        let (dc, transport) = connector_with_transport("gen-create-goal").await;
        transport.respond_with("createGoal", json!({ "goal_insert": { "id": "g-1" } }));

        let result = create_goal(
            Some(dc),
            CreateGoalVariables::new("Run 5k", "active", "2024-01-01"),
        )
        .await
        .unwrap();

        assert_eq!(result.data.goal_insert, GoalKey::new("g-1"));
        assert_eq!(result.mutation_ref.operation_name(), "createGoal");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, OperationType::Mutation);
        assert_eq!(
            calls[0].variables,
            json!({ "title": "Run 5k", "status": "active", "targetDate": "2024-01-01" })
        );
        assert!(transport.generated_sdk());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn explicit_nulls_reach_the_transport() {
        let (dc, transport) = connector_with_transport("gen-nulls").await;
        transport.respond_with("createGoal", json!({ "goal_insert": { "id": "g-2" } }));
        transport.respond_with(
            "createUser",
            json!({ "user_insert": { "id": "u-1", "__typename": "User_Key" } }),
        );

        create_goal(
            Some(dc.clone()),
            CreateGoalVariables::new("Read", "active", "2024-02-01")
                .with_null_description()
                .with_null_priority(),
        )
        .await
        .unwrap();
        let user = create_user(Some(dc), CreateUserVariables::new("Ada").with_null_email())
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].variables["description"], serde_json::Value::Null);
        assert!(calls[0].variables.as_object().unwrap().contains_key("priority"));
        assert_eq!(
            calls[1].variables,
            json!({ "displayName": "Ada", "email": null })
        );
        assert_eq!(user.data.user_insert, UserKey::tagged("u-1"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn update_task_without_match_resolves_to_none() {
        let (dc, transport) = connector_with_transport("gen-update-miss").await;
        transport.respond_with("updateTask", json!({ "task_update": null }));

        let result = update_task(Some(dc.clone()), UpdateTaskVariables::new("missing", true))
            .await
            .unwrap();
        assert_eq!(result.data.task_update, None);

        transport.respond_with("updateTask", json!({ "task_update": { "id": "t-1" } }));
        let result = update_task(Some(dc), UpdateTaskVariables::new("t-1", false))
            .await
            .unwrap();
        assert_eq!(result.data.task_update, Some(TaskKey::new("t-1")));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn get_goals_returns_projections_with_keys() {
        let (dc, transport) = connector_with_transport("gen-get-goals").await;
        transport.respond_with("getGoals", json!({ "goals": [] }));
        let empty = get_goals(Some(dc.clone())).await.unwrap();
        assert!(empty.data.goals.is_empty());

        transport.respond_with(
            "getGoals",
            json!({
                "goals": [{
                    "id": "g-1",
                    "title": "Run 5k",
                    "priority": "high",
                    "status": "active",
                    "targetDate": "2024-01-01",
                    "__typename": "Goal_Key"
                }]
            }),
        );
        let result = get_goals(Some(dc)).await.unwrap();
        let goal = &result.data.goals[0];
        assert_eq!(goal.title, "Run 5k");
        assert_eq!(goal.description, None);
        assert_eq!(goal.priority(), Some("high"));
        assert_eq!(goal.key(), GoalKey::tagged("g-1"));

        let calls = transport.calls();
        assert_eq!(calls[1].kind, OperationType::Query);
        assert_eq!(calls[1].variables, serde_json::Value::Null);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_calls_share_one_connector() {
        let (dc, transport) = connector_with_transport("gen-concurrent").await;
        transport.respond_with("getGoals", json!({ "goals": [] }));
        transport.respond_with("updateTask", json!({ "task_update": null }));

        let (goals, task) = futures::future::join(
            get_goals(Some(dc.clone())),
            update_task(Some(dc), UpdateTaskVariables::new("t-9", true)),
        )
        .await;
        assert!(goals.unwrap().data.goals.is_empty());
        assert_eq!(task.unwrap().data.task_update, None);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn connector_failures_are_surfaced_unchanged() {
        let (dc, transport) = connector_with_transport("gen-failure").await;
        transport.fail_with(
            "createUser",
            crate::data_connect::unauthorized("Request unauthorized"),
        );
        let err = create_user(Some(dc), CreateUserVariables::new("Ada"))
            .await
            .unwrap_err();
        assert_eq!(err.code, DataConnectErrorCode::Unauthorized);
    }
}
