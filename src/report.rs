use crate::data::{CourseAssignment, ResolutionOutcome, UnresolvedCourse};
use serde::{Deserialize, Serialize};

/// A resolver outcome dressed up with summary texts for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub resolved: Vec<CourseAssignment>,
    pub unresolved: Vec<UnresolvedCourse>,
    pub resolved_message: String,
    pub unresolved_message: String,
}

impl ResolutionReport {
    /// Attaches the fixed per-algorithm summary messages to an outcome.
    pub fn from_outcome(algorithm: &str, outcome: ResolutionOutcome) -> Self {
        let resolved_message = if outcome.resolved.is_empty() {
            format!("The {algorithm} algorithm couldn't resolve any conflicts.")
        } else {
            format!("Conflicts were resolved successfully by the {algorithm} algorithm.")
        };
        let unresolved_message = if outcome.unresolved.is_empty() {
            format!("No unresolved conflicts were found after applying the {algorithm} algorithm.")
        } else {
            format!("Some unresolved conflicts exist after applying the {algorithm} algorithm.")
        };
        ResolutionReport {
            resolved: outcome.resolved,
            unresolved: outcome.unresolved,
            resolved_message,
            unresolved_message,
        }
    }
}
