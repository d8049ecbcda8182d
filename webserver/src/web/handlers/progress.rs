//! Progress tracking endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::json;
use shared::{CourseId, EnrollmentId, ProgressId, Role, UserId};

use super::{JsonResult, ok, success};
use crate::error::WebServerError;
use crate::web::ApiState;
use crate::web::auth::{CallerId, authorize};

#[derive(Debug, Deserialize)]
pub struct ProgressUpdateRequest {
    pub is_completed: bool,
}

/// Per-student summary for one course
pub async fn course_progress(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(course_id): Path<CourseId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    let course = state
        .services
        .courses
        .get_course(course_id)
        .await?
        .ok_or_else(|| WebServerError::not_found("course", course_id))?;
    let students = state.services.progress.course_progress(course_id).await?;

    ok(json!({ "course": course, "students": students }))
}

/// Create any missing progress rows for the course
pub async fn initialize_progress(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(course_id): Path<CourseId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    let created = state.services.progress.initialize(course_id).await?;
    success(
        format!("Progress tracking initialized ({created} new rows)."),
        json!({ "course_id": course_id, "progress_rows_created": created }),
    )
}

pub async fn student_assignments(
    State(state): State<ApiState>,
    caller: CallerId,
    Path((course_id, user_id)): Path<(CourseId, UserId)>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    let items = state
        .services
        .progress
        .student_assignments(course_id, &user_id)
        .await?;
    if items.is_empty() {
        return Err(WebServerError::NotFound {
            entity: "assignments",
            id: format!("for student {user_id} in course {course_id}"),
        });
    }
    ok(items)
}

pub async fn update_progress(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<ProgressId>,
    Json(request): Json<ProgressUpdateRequest>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    let record = state
        .services
        .progress
        .update_progress(id, request.is_completed)
        .await?
        .ok_or_else(|| WebServerError::not_found("progress record", id))?;
    success("Progress updated.", record)
}

/// An enrollment's rows and percentage; students only see their own
pub async fn enrollment_progress(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(enrollment_id): Path<EnrollmentId>,
) -> JsonResult {
    let caller = authorize(
        state.services.access.as_ref(),
        caller,
        &[Role::Instructor, Role::Student],
    )
    .await?;
    let enrollment = state
        .services
        .enrollments
        .get_enrollment(enrollment_id)
        .await?
        .ok_or_else(|| WebServerError::not_found("enrollment", enrollment_id))?;
    if !caller.has_role(Role::Instructor) && enrollment.user_id != caller.id {
        return Err(WebServerError::Forbidden {
            required: Role::Instructor.to_string(),
        });
    }

    let calculated = state.services.progress.calculate_progress(enrollment_id).await?;
    let items = state
        .services
        .progress
        .progress_for_enrollment(enrollment_id)
        .await?;

    ok(json!({
        "enrollment": enrollment,
        "calculated_percentage": calculated,
        "items": items,
    }))
}
