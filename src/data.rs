use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Type aliases for clarity
pub type RoomId = u32;
pub type CourseId = u32;

/// A time of day stored as minutes since midnight.
///
/// Serialized as an "HH:MM" string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(pub u16);

impl TimeOfDay {
    pub fn from_hm(hour: u16, minute: u16) -> Self {
        TimeOfDay(hour * 60 + minute)
    }

    /// Returns this time moved `minutes` later in the day.
    pub fn plus(self, minutes: u16) -> Self {
        TimeOfDay(self.0 + minutes)
    }

    /// Like [`plus`](Self::plus) but `None` when the sum does not fit,
    /// for callers whose offset is not already known to be in range.
    pub fn checked_plus(self, minutes: u16) -> Option<Self> {
        self.0.checked_add(minutes).map(TimeOfDay)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time format, expected HH:MM")]
pub struct ParseTimeError;

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.split_once(':').ok_or(ParseTimeError)?;
        let hour: u16 = h.parse().map_err(|_| ParseTimeError)?;
        let minute: u16 = m.parse().map_err(|_| ParseTimeError)?;
        if hour > 23 || minute > 59 || m.len() != 2 {
            return Err(ParseTimeError);
        }
        Ok(TimeOfDay::from_hm(hour, minute))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open time range `[start, end)` within a single day.
///
/// Invariant: `start < end`, enforced by input validation before any
/// interval reaches the resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeInterval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        debug_assert!(start < end);
        TimeInterval { start, end }
    }

    /// Two half-open intervals overlap iff each starts before the other ends.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns this interval shifted later by `minutes`.
    pub fn shifted(&self, minutes: u16) -> Self {
        TimeInterval {
            start: self.start.plus(minutes),
            end: self.end.plus(minutes),
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Day of the week; the declaration order (Monday first) is the sort order
/// used by both resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// A course section bound to a day, time interval and room.
///
/// Resolvers treat the input set as immutable and only ever rewrite the
/// `room` and `interval` fields of their own clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    pub id: CourseId,
    pub teacher_name: String,
    pub course_code: String,
    pub course_title: String,
    pub day_of_week: DayOfWeek,
    pub interval: TimeInterval,
    pub room: RoomId,
}

/// Step size and end-of-day bound for the backtracking time-shift repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeShiftConfig {
    pub step_minutes: u16,
    pub latest_end: TimeOfDay,
}

impl Default for TimeShiftConfig {
    fn default() -> Self {
        TimeShiftConfig {
            step_minutes: 30,
            latest_end: TimeOfDay::from_hm(18, 0),
        }
    }
}

/// The default pool of interchangeable rooms.
pub fn default_room_pool() -> Vec<RoomId> {
    (1..=5).collect()
}

/// A course the resolver gave up on, with the reason it could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedCourse {
    pub course: CourseAssignment,
    pub conflict: String,
}

/// Raw resolver result: every input course ends up in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub resolved: Vec<CourseAssignment>,
    pub unresolved: Vec<UnresolvedCourse>,
}
