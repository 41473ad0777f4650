use std::fmt;

use crate::shared::itinerary::{DayScheduleId, PlanId};

/// A list whose positions are protected by one lock
///
/// The derived `Ord` is the global acquisition order: every plan's day list
/// sorts before every day's entry list, and ids ascend within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeId {
    /// The days of a plan
    PlanDays(PlanId),
    /// The entries of a day
    DayPlaces(DayScheduleId),
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanDays(plan) => write!(f, "days of {plan}"),
            Self::DayPlaces(day) => write!(f, "entries of {day}"),
        }
    }
}
