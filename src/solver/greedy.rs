use crate::data::{CourseAssignment, ResolutionOutcome, RoomId, UnresolvedCourse};
use crate::solver::{Occupancy, ResolveError, sorted_by_day_and_start};
use log::{debug, info};

const NO_ROOM_REASON: &str = "no available room for this time slot";

/// Resolves conflicts in a single left-to-right pass over the courses sorted
/// by (day, start time).
///
/// A course keeps its own room when free; otherwise the first free room in
/// `room_pool` order takes it. Commitments are never revisited, so an early
/// placement can block a later course even when swapping would fit both.
pub fn greedy_resolve(
    courses: &[CourseAssignment],
    room_pool: &[RoomId],
) -> Result<ResolutionOutcome, ResolveError> {
    if room_pool.is_empty() {
        return Err(ResolveError::EmptyRoomPool);
    }

    info!(
        "Greedy pass over {} courses with {} rooms...",
        courses.len(),
        room_pool.len()
    );

    let mut occupancy = Occupancy::default();
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for course in sorted_by_day_and_start(courses) {
        let day = course.day_of_week;
        if occupancy.is_free(day, course.room, &course.interval) {
            occupancy.commit(day, course.room, course.interval);
            resolved.push(course);
            continue;
        }

        // First free alternative in pool order, skipping the booked room.
        let alternative = room_pool
            .iter()
            .copied()
            .filter(|&r| r != course.room)
            .find(|&r| occupancy.is_free(day, r, &course.interval));

        match alternative {
            Some(room) => {
                debug!(
                    "Course {} moved from room {} to room {} ({} {})",
                    course.id, course.room, room, day, course.interval
                );
                occupancy.commit(day, room, course.interval);
                resolved.push(CourseAssignment { room, ..course });
            }
            None => {
                debug!(
                    "Course {} left unresolved ({} {}, room {})",
                    course.id, day, course.interval, course.room
                );
                unresolved.push(UnresolvedCourse {
                    course,
                    conflict: NO_ROOM_REASON.to_string(),
                });
            }
        }
    }

    info!(
        "Greedy pass placed {} courses, {} unresolved",
        resolved.len(),
        unresolved.len()
    );
    Ok(ResolutionOutcome {
        resolved,
        unresolved,
    })
}
