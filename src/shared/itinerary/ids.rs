//! Typed identifiers
//!
//! Every row kind gets its own newtype over the database key so a day id
//! can never be passed where an entry id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// A shared trip plan
    PlanId,
    "plan"
);
id_type!(
    /// One day of a plan's itinerary
    DayScheduleId,
    "day schedule"
);
id_type!(
    /// One visit entry inside a day
    DayPlaceId,
    "day place"
);
id_type!(
    /// A visitable place referenced by entries
    PlaceId,
    "place"
);
id_type!(
    /// A collaborator
    UserId,
    "user"
);
