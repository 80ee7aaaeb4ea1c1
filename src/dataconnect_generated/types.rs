use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::data_connect::nullable;
use crate::dataconnect_generated::keys::{GoalKey, TaskKey, Typename, UserKey};

/// RFC 3339 timestamp, e.g. `2024-01-01T08:30:00.000Z`.
pub type TimestampString = String;
pub type UuidString = String;
/// 64-bit integer carried as a decimal string.
pub type Int64String = String;
/// Calendar date, `YYYY-MM-DD`.
pub type DateString = String;

pub fn date_string(date: NaiveDate) -> DateString {
    date.format("%Y-%m-%d").to_string()
}

pub fn timestamp_string(timestamp: DateTime<Utc>) -> TimestampString {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn int64_string(value: i64) -> Int64String {
    value.to_string()
}

/// Input of `createGoal`.
///
/// `description` and `priority` are tri-state: `None` leaves them out of the
/// request, `Some(None)` sends an explicit `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalVariables {
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    pub priority: Option<Option<String>>,
    pub status: String,
    pub target_date: DateString,
}

impl CreateGoalVariables {
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        target_date: impl Into<DateString>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            status: status.into(),
            target_date: target_date.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn with_null_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(Some(priority.into()));
        self
    }

    pub fn with_null_priority(mut self) -> Self {
        self.priority = Some(None);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGoalData {
    pub goal_insert: GoalKey,
}

/// Input of `createUser`; `email` is tri-state like the goal's optional fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserVariables {
    pub display_name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    pub email: Option<Option<String>>,
}

impl CreateUserVariables {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(Some(email.into()));
        self
    }

    pub fn with_null_email(mut self) -> Self {
        self.email = Some(None);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserData {
    pub user_insert: UserKey,
}

/// One row of `getGoals`: the projected fields plus the goal's key discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: UuidString,
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "nullable::deserialize"
    )]
    pub priority: Option<Option<String>>,
    pub status: String,
    pub target_date: DateString,
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<Typename<GoalKey>>,
}

impl Goal {
    pub fn key(&self) -> GoalKey {
        GoalKey {
            id: self.id.clone(),
            typename: self.typename,
        }
    }

    pub fn description(&self) -> Option<&str> {
        nullable::flatten_ref(&self.description).map(String::as_str)
    }

    pub fn priority(&self) -> Option<&str> {
        nullable::flatten_ref(&self.priority).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGoalsData {
    pub goals: Vec<Goal>,
}

/// Input of `updateTask`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskVariables {
    pub id: UuidString,
    pub is_completed: bool,
}

impl UpdateTaskVariables {
    pub fn new(id: impl Into<UuidString>, is_completed: bool) -> Self {
        Self {
            id: id.into(),
            is_completed,
        }
    }
}

/// `task_update` is `None` when no task matched the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskData {
    #[serde(default)]
    pub task_update: Option<TaskKey>,
}
