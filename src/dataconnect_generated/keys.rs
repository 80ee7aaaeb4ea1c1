use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dataconnect_generated::types::UuidString;

/// Entity kinds that carry a `__typename` discriminant on the wire.
pub trait KeyKind {
    const TYPENAME: &'static str;
}

/// The `__typename` tag of a key; serializes as `K::TYPENAME` and rejects any other tag.
pub struct Typename<K>(PhantomData<fn() -> K>);

impl<K: KeyKind> Typename<K> {
    pub fn new() -> Self {
        Self(PhantomData)
    }

    pub fn as_str(&self) -> &'static str {
        K::TYPENAME
    }
}

impl<K: KeyKind> Default for Typename<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for Typename<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Typename<K> {}

impl<K> PartialEq for Typename<K> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<K> Eq for Typename<K> {}

impl<K> Hash for Typename<K> {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl<K: KeyKind> fmt::Debug for Typename<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(K::TYPENAME)
    }
}

impl<K: KeyKind> Serialize for Typename<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(K::TYPENAME)
    }
}

impl<'de, K: KeyKind> Deserialize<'de> for Typename<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag != K::TYPENAME {
            return Err(D::Error::custom(format!(
                "expected __typename {}, found {tag}",
                K::TYPENAME
            )));
        }
        Ok(Self::new())
    }
}

macro_rules! entity_key {
    ($(#[$meta:meta])* $name:ident => $typename:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub id: UuidString,
            #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
            pub typename: Option<Typename<$name>>,
        }

        impl KeyKind for $name {
            const TYPENAME: &'static str = $typename;
        }

        impl $name {
            pub fn new(id: impl Into<UuidString>) -> Self {
                Self {
                    id: id.into(),
                    typename: None,
                }
            }

            /// Key carrying its `__typename` discriminant.
            pub fn tagged(id: impl Into<UuidString>) -> Self {
                Self {
                    id: id.into(),
                    typename: Some(Typename::new()),
                }
            }
        }
    };
}

entity_key!(
    /// Reference to a `Goal` row.
    GoalKey => "Goal_Key"
);
entity_key!(
    /// Reference to a `Reminder` row.
    ReminderKey => "Reminder_Key"
);
entity_key!(
    /// Reference to a `Task` row.
    TaskKey => "Task_Key"
);
entity_key!(
    /// Reference to a `User` row.
    UserKey => "User_Key"
);
