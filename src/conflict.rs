use crate::data::{CourseAssignment, CourseId, DayOfWeek};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why two course assignments clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Same teacher, overlapping time, different rooms.
    Time,
    /// Same room, overlapping time, different teachers.
    Room,
    /// Same teacher and same room with overlapping time.
    TimeAndRoom,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ConflictKind::Time => "time",
            ConflictKind::Room => "room",
            ConflictKind::TimeAndRoom => "time and room",
        };
        f.write_str(reason)
    }
}

/// Classifies the clash between two assignments, `None` if they are
/// compatible. Pure and symmetric; assignments on different days never
/// conflict.
pub fn conflict_between(a: &CourseAssignment, b: &CourseAssignment) -> Option<ConflictKind> {
    if a.day_of_week != b.day_of_week || !a.interval.overlaps(&b.interval) {
        return None;
    }
    let same_teacher = a.teacher_name == b.teacher_name;
    let same_room = a.room == b.room;
    match (same_teacher, same_room) {
        (true, true) => Some(ConflictKind::TimeAndRoom),
        (true, false) => Some(ConflictKind::Time),
        (false, true) => Some(ConflictKind::Room),
        (false, false) => None,
    }
}

/// One clashing pair out of a selected set of courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub course_id: CourseId,
    pub course_title: String,
    pub other_course_id: CourseId,
    pub other_course_title: String,
    pub day_of_week: DayOfWeek,
    pub kind: ConflictKind,
    pub description: String,
}

/// Reports every clashing unordered pair in `courses` exactly once.
pub fn detect_conflicts(courses: &[CourseAssignment]) -> Vec<ConflictRecord> {
    courses
        .iter()
        .tuple_combinations()
        .filter_map(|(a, b)| {
            conflict_between(a, b).map(|kind| ConflictRecord {
                course_id: a.id,
                course_title: a.course_title.clone(),
                other_course_id: b.id,
                other_course_title: b.course_title.clone(),
                day_of_week: a.day_of_week,
                kind,
                description: format!(
                    "{} ({}, {} {}) clashes with {} ({}, {} {}): {} conflict",
                    a.course_title,
                    a.teacher_name,
                    a.day_of_week,
                    a.interval,
                    b.course_title,
                    b.teacher_name,
                    b.day_of_week,
                    b.interval,
                    kind
                ),
            })
        })
        .collect()
}
