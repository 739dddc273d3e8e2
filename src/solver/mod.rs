pub mod backtrack;
pub mod greedy;

pub use backtrack::backtracking_resolve;
pub use greedy::greedy_resolve;

use crate::data::{CourseAssignment, DayOfWeek, RoomId, TimeInterval};
use std::collections::HashMap;

/// Hard configuration errors. Unresolvable courses are a normal outcome and
/// never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("room pool must not be empty")]
    EmptyRoomPool,
}

/// Sorts clones of the input by (day order, start time), stable so that ties
/// keep input order. This ordering decides which course wins a contested slot.
pub(crate) fn sorted_by_day_and_start(courses: &[CourseAssignment]) -> Vec<CourseAssignment> {
    let mut ordered = courses.to_vec();
    ordered.sort_by_key(|c| (c.day_of_week, c.interval.start));
    ordered
}

/// Occupied intervals per (day, room) slot.
#[derive(Debug, Default)]
pub(crate) struct Occupancy {
    slots: HashMap<(DayOfWeek, RoomId), Vec<TimeInterval>>,
}

impl Occupancy {
    pub(crate) fn is_free(&self, day: DayOfWeek, room: RoomId, interval: &TimeInterval) -> bool {
        self.slots
            .get(&(day, room))
            .is_none_or(|taken| taken.iter().all(|t| !t.overlaps(interval)))
    }

    pub(crate) fn commit(&mut self, day: DayOfWeek, room: RoomId, interval: TimeInterval) {
        self.slots.entry((day, room)).or_default().push(interval);
    }
}
