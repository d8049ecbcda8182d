//! Assignment management endpoints (instructors only)

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{AssignmentId, AssignmentUpdate, CourseId, NewAssignment, Role};

use super::{JsonResult, ok, success};
use crate::error::{WebServerError, WebServerResult};
use crate::web::ApiState;
use crate::web::auth::{CallerId, authorize};

#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

async fn require_course(state: &ApiState, id: CourseId) -> WebServerResult<()> {
    match state.services.courses.get_course(id).await? {
        Some(_) => Ok(()),
        None => Err(WebServerError::not_found("course", id)),
    }
}

pub async fn list_assignments(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(course_id): Path<CourseId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    require_course(&state, course_id).await?;
    ok(state.services.assignments.assignments_for_course(course_id).await?)
}

/// Add an assignment along with a progress row for every enrolled student
pub async fn add_assignment(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(course_id): Path<CourseId>,
    Json(request): Json<AssignmentRequest>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;

    let added = state
        .services
        .assignments
        .add_assignment(NewAssignment {
            course_id,
            title: request.title,
            description: request.description,
            due_date: request.due_date,
        })
        .await?;
    success("Assignment added.", added)
}

pub async fn get_assignment(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<AssignmentId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    let assignment = state
        .services
        .assignments
        .get_assignment(id)
        .await?
        .ok_or_else(|| WebServerError::not_found("assignment", id))?;
    ok(assignment)
}

pub async fn update_assignment(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<AssignmentId>,
    Json(request): Json<AssignmentRequest>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    let assignment = state
        .services
        .assignments
        .update_assignment(
            id,
            AssignmentUpdate {
                title: request.title,
                description: request.description,
                due_date: request.due_date,
            },
        )
        .await?
        .ok_or_else(|| WebServerError::not_found("assignment", id))?;
    success("Assignment updated.", assignment)
}

pub async fn delete_assignment(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<AssignmentId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    if !state.services.assignments.delete_assignment(id).await? {
        return Err(WebServerError::not_found("assignment", id));
    }
    success("Assignment deleted.", id)
}
