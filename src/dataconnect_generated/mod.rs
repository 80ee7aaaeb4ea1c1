#![doc = include_str!("README.md")]
mod keys;
mod operations;
mod registry;
mod types;

pub use keys::{GoalKey, KeyKind, ReminderKey, TaskKey, Typename, UserKey};
pub use operations::{
    create_goal, create_goal_ref, create_user, create_user_ref, get_goals, get_goals_ref,
    update_task, update_task_ref,
};
pub use registry::{
    connector_config, mutation_ref_for, operations, query_ref_for, CreateGoal, CreateUser,
    GetGoals, MutationOperation, Operation, OperationDescriptor, QueryOperation, UpdateTask,
};
pub use types::{
    date_string, int64_string, timestamp_string, CreateGoalData, CreateGoalVariables,
    CreateUserData, CreateUserVariables, DateString, GetGoalsData, Goal, Int64String,
    TimestampString, UpdateTaskData, UpdateTaskVariables, UuidString,
};
