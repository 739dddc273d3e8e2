use crate::conflict::conflict_between;
use crate::data::{
    CourseAssignment, ResolutionOutcome, RoomId, TimeShiftConfig, UnresolvedCourse,
};
use crate::solver::{ResolveError, sorted_by_day_and_start};
use log::{debug, info, trace};

/// Resolves conflicts by recursive search with undo.
///
/// Courses are placed in (day, start time) order. Each course is tried at its
/// original slot, then in every alternate room at the original time, then in
/// its original room shifted later in `step_minutes` increments while the
/// shifted end stays within `latest_end`. A placement is admissible only if it
/// conflicts with no already-placed course, teacher and room alike. When a
/// branch cannot be completed the placement is undone and the next candidate
/// is tried.
///
/// A course with no workable candidate is skipped and reported unresolved
/// while the search continues for the rest. The driver retries with an
/// increasing skip allowance, so the returned outcome always carries the
/// fewest skips the search could achieve.
pub fn backtracking_resolve(
    courses: &[CourseAssignment],
    room_pool: &[RoomId],
    shift: &TimeShiftConfig,
) -> Result<ResolutionOutcome, ResolveError> {
    if room_pool.is_empty() {
        return Err(ResolveError::EmptyRoomPool);
    }

    let ordered = sorted_by_day_and_start(courses);
    info!(
        "Backtracking search over {} courses with {} rooms, {}-minute shifts until {}...",
        ordered.len(),
        room_pool.len(),
        shift.step_minutes,
        shift.latest_end
    );

    for budget in 0..=ordered.len() {
        let mut search = Search {
            room_pool,
            shift,
            placed: Vec::new(),
            skipped: Vec::new(),
        };
        if search.place(&ordered, 0, budget) {
            info!(
                "Search finished with {} placed, {} unresolved (skip budget {})",
                search.placed.len(),
                search.skipped.len(),
                budget
            );
            return Ok(ResolutionOutcome {
                resolved: search.placed,
                unresolved: search.skipped,
            });
        }
        trace!("No solution within skip budget {budget}, widening");
    }

    // A budget equal to the course count admits skipping everything, so the
    // loop above cannot fall through; this keeps the function total.
    Ok(ResolutionOutcome {
        resolved: Vec::new(),
        unresolved: ordered
            .into_iter()
            .map(|course| UnresolvedCourse {
                course,
                conflict: "no available room or time slot".to_string(),
            })
            .collect(),
    })
}

struct Search<'a> {
    room_pool: &'a [RoomId],
    shift: &'a TimeShiftConfig,
    placed: Vec<CourseAssignment>,
    skipped: Vec<UnresolvedCourse>,
}

impl Search<'_> {
    /// Places courses from `idx` onward, allowing at most `skips_left`
    /// courses to stay unresolved. Commit and undo are symmetric: every push
    /// onto `placed`/`skipped` is popped before the next candidate.
    fn place(&mut self, ordered: &[CourseAssignment], idx: usize, skips_left: usize) -> bool {
        if idx == ordered.len() {
            return true;
        }
        let course = &ordered[idx];

        for candidate in self.candidates(course) {
            if !self.admissible(&candidate) {
                continue;
            }
            trace!(
                "Course {} placed in room {} at {} {}",
                candidate.id, candidate.room, candidate.day_of_week, candidate.interval
            );
            self.placed.push(candidate);
            if self.place(ordered, idx + 1, skips_left) {
                return true;
            }
            self.placed.pop();
        }

        if skips_left > 0 {
            let conflict = self.explain(course);
            debug!("Course {} skipped: {}", course.id, conflict);
            self.skipped.push(UnresolvedCourse {
                course: course.clone(),
                conflict,
            });
            if self.place(ordered, idx + 1, skips_left - 1) {
                return true;
            }
            self.skipped.pop();
        }

        false
    }

    /// Candidate placements in repair order: original slot, alternate rooms
    /// at the original time, then the original room at later start times.
    fn candidates(&self, course: &CourseAssignment) -> Vec<CourseAssignment> {
        let mut out = vec![course.clone()];
        for &room in self.room_pool.iter().filter(|&&r| r != course.room) {
            out.push(CourseAssignment {
                room,
                ..course.clone()
            });
        }
        if self.shift.step_minutes > 0 {
            // Checked addition: step_minutes comes from the request body and
            // may be arbitrarily large, so the shifted end can exceed u16.
            let mut delta = self.shift.step_minutes;
            while let Some(end) = course.interval.end.checked_plus(delta) {
                if end > self.shift.latest_end {
                    break;
                }
                out.push(CourseAssignment {
                    interval: course.interval.shifted(delta),
                    ..course.clone()
                });
                delta += self.shift.step_minutes;
            }
        }
        out
    }

    fn admissible(&self, candidate: &CourseAssignment) -> bool {
        self.placed
            .iter()
            .all(|p| conflict_between(candidate, p).is_none())
    }

    /// Best-known explanation for giving a course up: the first placed
    /// neighbor clashing with its original slot.
    fn explain(&self, course: &CourseAssignment) -> String {
        self.placed
            .iter()
            .find_map(|p| {
                conflict_between(course, p).map(|kind| {
                    format!(
                        "{} conflict with {} ({}, {} {}, room {})",
                        kind, p.course_title, p.teacher_name, p.day_of_week, p.interval, p.room
                    )
                })
            })
            .unwrap_or_else(|| "no available room or time slot".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DayOfWeek, TimeInterval, TimeOfDay};
    use std::collections::BTreeSet;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn course(
        id: u32,
        teacher: &str,
        day: DayOfWeek,
        start: &str,
        end: &str,
        room: u32,
    ) -> CourseAssignment {
        CourseAssignment {
            id,
            teacher_name: teacher.to_string(),
            course_code: format!("C{id:03}"),
            course_title: format!("Course {id}"),
            day_of_week: day,
            interval: TimeInterval::new(t(start), t(end)),
            room,
        }
    }

    fn shift(step: u16, latest: &str) -> TimeShiftConfig {
        TimeShiftConfig {
            step_minutes: step,
            latest_end: t(latest),
        }
    }

    #[test]
    fn empty_input_yields_empty_lists() {
        let outcome = backtracking_resolve(&[], &[1], &shift(30, "18:00")).unwrap();
        assert_eq!(outcome, ResolutionOutcome::default());
    }

    #[test]
    fn empty_room_pool_is_a_hard_error() {
        let courses = [course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1)];
        assert_eq!(
            backtracking_resolve(&courses, &[], &shift(30, "18:00")),
            Err(ResolveError::EmptyRoomPool)
        );
    }

    #[test]
    fn disjoint_courses_keep_their_original_slots() {
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. Y", DayOfWeek::Monday, "10:00", "11:00", 1),
            course(3, "Dr. X", DayOfWeek::Wednesday, "09:00", "10:00", 2),
        ];
        let outcome = backtracking_resolve(&courses, &[1, 2], &shift(30, "18:00")).unwrap();
        assert!(outcome.unresolved.is_empty());
        assert_eq!(outcome.resolved.len(), 3);
        for (resolved, original) in outcome.resolved.iter().zip(&courses) {
            assert_eq!(resolved, original);
        }
    }

    #[test]
    fn repaired_schedule_passes_the_conflict_predicate() {
        // Same teacher, same room, overlapping. A room move cannot fix the
        // teacher overlap, so the second course must be shifted.
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. X", DayOfWeek::Monday, "09:30", "10:30", 1),
        ];
        let outcome = backtracking_resolve(&courses, &[1, 2], &shift(60, "18:00")).unwrap();
        assert!(outcome.unresolved.is_empty());
        assert_eq!(outcome.resolved.len(), 2);
        assert_eq!(conflict_between(&outcome.resolved[0], &outcome.resolved[1]), None);

        let moved = outcome.resolved.iter().find(|c| c.id == 2).unwrap();
        assert_eq!(moved.interval, TimeInterval::new(t("10:30"), t("11:30")));
    }

    #[test]
    fn relocation_never_introduces_a_teacher_double_booking() {
        // Plenty of free rooms, but every room at 09:30 still collides with
        // the teacher's other class.
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. X", DayOfWeek::Monday, "09:30", "10:30", 2),
        ];
        let outcome =
            backtracking_resolve(&courses, &[1, 2, 3, 4, 5], &shift(30, "18:00")).unwrap();
        assert!(outcome.unresolved.is_empty());
        assert_eq!(conflict_between(&outcome.resolved[0], &outcome.resolved[1]), None);
    }

    #[test]
    fn undoes_a_placement_that_blocks_a_later_course() {
        // Course 3 only fits its original slot. Course 2's first repair
        // (room 2) takes that slot, so the search must back out of it and
        // shift course 2 instead.
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. Y", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(3, "Dr. Z", DayOfWeek::Monday, "09:00", "11:30", 2),
        ];
        let outcome = backtracking_resolve(&courses, &[1, 2], &shift(60, "12:00")).unwrap();
        assert!(outcome.unresolved.is_empty());

        let second = outcome.resolved.iter().find(|c| c.id == 2).unwrap();
        let third = outcome.resolved.iter().find(|c| c.id == 3).unwrap();
        assert_eq!(second.room, 1);
        assert_eq!(second.interval, TimeInterval::new(t("10:00"), t("11:00")));
        assert_eq!(third.room, 2);
        assert_eq!(third.interval, TimeInterval::new(t("09:00"), t("11:30")));

        // Greedy cannot solve this one: it commits course 2 to room 2 and
        // never looks back.
        let greedy = crate::solver::greedy_resolve(&courses, &[1, 2]).unwrap();
        assert_eq!(greedy.unresolved.len(), 1);
    }

    #[test]
    fn exhausted_course_is_skipped_with_an_explanation() {
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
        ];
        // One room and no shift headroom: the duplicate cannot be repaired.
        let outcome = backtracking_resolve(&courses, &[1], &shift(60, "10:00")).unwrap();
        assert_eq!(outcome.resolved.len(), 1);
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(outcome.unresolved[0].course.id, 2);
        assert!(outcome.unresolved[0].conflict.contains("time and room"));
        assert!(outcome.unresolved[0].conflict.contains("Course 1"));
    }

    #[test]
    fn skips_are_minimized() {
        // Three courses contest one room-hour; two of them fit by shifting,
        // so only one may be given up.
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. Y", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(3, "Dr. Z", DayOfWeek::Monday, "09:00", "10:00", 1),
        ];
        let outcome = backtracking_resolve(&courses, &[1], &shift(60, "11:00")).unwrap();
        assert_eq!(outcome.resolved.len(), 2);
        assert_eq!(outcome.unresolved.len(), 1);
    }

    #[test]
    fn every_input_id_lands_in_exactly_one_list() {
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. Y", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(3, "Dr. Z", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(4, "Dr. W", DayOfWeek::Monday, "09:00", "10:00", 1),
        ];
        let outcome = backtracking_resolve(&courses, &[1], &shift(60, "10:30")).unwrap();
        let mut seen = BTreeSet::new();
        for c in &outcome.resolved {
            assert!(seen.insert(c.id));
        }
        for u in &outcome.unresolved {
            assert!(seen.insert(u.course.id));
        }
        assert_eq!(seen, BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn unresolved_courses_keep_their_original_slot() {
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
        ];
        let outcome = backtracking_resolve(&courses, &[1], &shift(60, "10:00")).unwrap();
        assert_eq!(outcome.unresolved[0].course, courses[1]);
    }

    #[test]
    fn oversized_shift_step_cannot_wrap_the_day() {
        // A step near u16::MAX must simply produce no shift candidates, not
        // wrap around into a bogus interval.
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
        ];
        let outcome = backtracking_resolve(&courses, &[1], &shift(65000, "18:00")).unwrap();
        assert_eq!(outcome.resolved.len(), 1);
        assert_eq!(outcome.unresolved.len(), 1);
        for c in &outcome.resolved {
            assert!(c.interval.start < c.interval.end);
        }
    }

    #[test]
    fn zero_step_disables_time_shifting() {
        let courses = [
            course(1, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
            course(2, "Dr. X", DayOfWeek::Monday, "09:00", "10:00", 1),
        ];
        let outcome = backtracking_resolve(&courses, &[1], &shift(0, "18:00")).unwrap();
        assert_eq!(outcome.resolved.len(), 1);
        assert_eq!(outcome.unresolved.len(), 1);
    }
}
