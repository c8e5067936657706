//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the competition document has a strongly-typed ID so a
//! team id can never be handed to a stage lookup by accident. New ids use
//! UUID v7 (time-ordered), which keeps timeline entries created in one
//! session roughly in creation order when listed by key.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a stage (a physical competition area).
    StageId
}

define_id! {
    /// Unique identifier for an entry in a stage timeline (rotation or pause).
    TimelineEventId
}

define_id! {
    /// Unique identifier for a registered team.
    TeamId
}

define_id! {
    /// Unique identifier for a registered player (gymnast).
    PlayerId
}

define_id! {
    /// Unique identifier for a competition category.
    CategoryId
}

define_id! {
    /// Unique identifier for an item on the bar menu.
    MenuItemId
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn ids_are_distinct_values() {
        let a = TeamId::new();
        let b = TeamId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_serializes_as_plain_uuid_string() {
        let id = StageId::from(Uuid::nil());
        let json = serde_json::to_string(&id).ok();
        assert_eq!(
            json.as_deref(),
            Some("\"00000000-0000-0000-0000-000000000000\"")
        );
    }

    #[test]
    fn ids_work_as_json_map_keys() {
        let mut map = BTreeMap::new();
        let id = TimelineEventId::new();
        map.insert(id, 3_u32);
        let json = serde_json::to_string(&map).unwrap_or_default();
        let restored: Result<BTreeMap<TimelineEventId, u32>, _> = serde_json::from_str(&json);
        assert!(restored.is_ok());
        assert_eq!(
            restored.ok().and_then(|m| m.get(&id).copied()),
            Some(3)
        );
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = PlayerId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
