use crate::conflict::{ConflictRecord, detect_conflicts};
use crate::data::{
    CourseAssignment, CourseId, DayOfWeek, RoomId, TimeInterval, TimeOfDay, TimeShiftConfig,
    default_room_pool,
};
use crate::report::ResolutionReport;
use crate::solver;
use axum::{Json, Router, routing::post};
use log::warn;
use serde::{Deserialize, Serialize};

/// At most this many courses may be selected per request.
const MAX_SELECTED: usize = 6;

/// A course as submitted by the client, times still unparsed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseForm {
    pub id: CourseId,
    pub teacher_name: String,
    pub course_code: String,
    pub course_title: String,
    pub day_of_week: DayOfWeek,
    pub class_start_time: String,
    pub class_end_time: String,
    pub room: RoomId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub courses: Vec<CourseForm>,
    #[serde(default)]
    pub room_pool: Option<Vec<RoomId>>,
    #[serde(default)]
    pub time_shift: Option<TimeShiftConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub greedy: ResolutionReport,
    pub backtracking: ResolutionReport,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictsRequest {
    pub courses: Vec<CourseForm>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictsResponse {
    pub conflicts: Vec<ConflictRecord>,
}

/// Input problems caught before the resolvers run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please select at least one course")]
    NoCoursesSelected,
    #[error("you can only select up to {MAX_SELECTED} courses")]
    TooManyCourses,
    #[error("course {0}: all fields are required")]
    MissingField(CourseId),
    #[error("course {0}: invalid time format, please use HH:MM")]
    InvalidTimeFormat(CourseId),
    #[error("course {0}: end time must be after start time")]
    EndNotAfterStart(CourseId),
}

/// Validates one submitted course and converts it into a core assignment.
fn validate_course(form: &CourseForm) -> Result<CourseAssignment, ValidationError> {
    let required = [
        &form.teacher_name,
        &form.course_code,
        &form.course_title,
        &form.class_start_time,
        &form.class_end_time,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ValidationError::MissingField(form.id));
    }
    let start: TimeOfDay = form
        .class_start_time
        .parse()
        .map_err(|_| ValidationError::InvalidTimeFormat(form.id))?;
    let end: TimeOfDay = form
        .class_end_time
        .parse()
        .map_err(|_| ValidationError::InvalidTimeFormat(form.id))?;
    if start >= end {
        return Err(ValidationError::EndNotAfterStart(form.id));
    }
    Ok(CourseAssignment {
        id: form.id,
        teacher_name: form.teacher_name.trim().to_string(),
        course_code: form.course_code.trim().to_string(),
        course_title: form.course_title.trim().to_string(),
        day_of_week: form.day_of_week,
        interval: TimeInterval::new(start, end),
        room: form.room,
    })
}

fn validate_selection(forms: &[CourseForm]) -> Result<Vec<CourseAssignment>, ValidationError> {
    if forms.is_empty() {
        return Err(ValidationError::NoCoursesSelected);
    }
    if forms.len() > MAX_SELECTED {
        return Err(ValidationError::TooManyCourses);
    }
    forms.iter().map(validate_course).collect()
}

type ApiError = (axum::http::StatusCode, String);

fn bad_request(message: impl ToString) -> ApiError {
    let message = message.to_string();
    warn!("Rejecting request: {message}");
    (axum::http::StatusCode::BAD_REQUEST, message)
}

/// Runs both resolvers independently on the same selection and returns the
/// two reports side by side.
async fn resolve_handler(Json(request): Json<ResolveRequest>) -> Result<Json<ResolveResponse>, ApiError> {
    let courses = validate_selection(&request.courses).map_err(bad_request)?;
    let room_pool = request.room_pool.unwrap_or_else(default_room_pool);
    let time_shift = request.time_shift.unwrap_or_default();

    let greedy = solver::greedy_resolve(&courses, &room_pool).map_err(bad_request)?;
    let backtracking = solver::backtracking_resolve(&courses, &room_pool, &time_shift)
        .map_err(bad_request)?;

    Ok(Json(ResolveResponse {
        greedy: ResolutionReport::from_outcome("greedy", greedy),
        backtracking: ResolutionReport::from_outcome("backtracking", backtracking),
    }))
}

async fn conflicts_handler(
    Json(request): Json<ConflictsRequest>,
) -> Result<Json<ConflictsResponse>, ApiError> {
    let courses = validate_selection(&request.courses).map_err(bad_request)?;
    Ok(Json(ConflictsResponse {
        conflicts: detect_conflicts(&courses),
    }))
}

pub async fn run_server() {
    let app = Router::new()
        .route("/v1/timetable/resolve", post(resolve_handler))
        .route("/v1/timetable/conflicts", post(conflicts_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
