//! Course catalogue endpoints

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{CourseId, NewCourse, Role, UserId};

use super::{JsonResult, ok, success};
use crate::error::WebServerError;
use crate::web::ApiState;
use crate::web::auth::{CallerId, authorize};

const COURSE_EDITORS: [Role; 2] = [Role::Instructor, Role::Admin];

/// Body of course create and edit requests
#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Defaults to the caller on create and to the current instructor on edit
    pub instructor_id: Option<UserId>,
}

impl CourseRequest {
    fn into_new_course(self, default_instructor: UserId) -> NewCourse {
        NewCourse {
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            instructor_id: self.instructor_id.unwrap_or(default_instructor),
        }
    }
}

pub async fn list_courses(State(state): State<ApiState>) -> JsonResult {
    ok(state.services.courses.list_courses().await?)
}

pub async fn get_course(State(state): State<ApiState>, Path(id): Path<CourseId>) -> JsonResult {
    let course = state
        .services
        .courses
        .get_course(id)
        .await?
        .ok_or_else(|| WebServerError::not_found("course", id))?;
    ok(course)
}

pub async fn create_course(
    State(state): State<ApiState>,
    caller: CallerId,
    Json(request): Json<CourseRequest>,
) -> JsonResult {
    let caller = authorize(state.services.access.as_ref(), caller, &COURSE_EDITORS).await?;
    let course = state
        .services
        .courses
        .create_course(request.into_new_course(caller.id.clone()))
        .await?;
    success("Course created.", course)
}

pub async fn update_course(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<CourseId>,
    Json(request): Json<CourseRequest>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &COURSE_EDITORS).await?;
    let existing = state
        .services
        .courses
        .get_course(id)
        .await?
        .ok_or_else(|| WebServerError::not_found("course", id))?;

    let course = state
        .services
        .courses
        .update_course(id, request.into_new_course(existing.instructor_id))
        .await?
        .ok_or_else(|| WebServerError::not_found("course", id))?;
    success("Course updated.", course)
}

pub async fn delete_course(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(id): Path<CourseId>,
) -> JsonResult {
    authorize(state.services.access.as_ref(), caller, &COURSE_EDITORS).await?;
    if !state.services.courses.delete_course(id).await? {
        return Err(WebServerError::not_found("course", id));
    }
    success("Course deleted.", id)
}

/// The caller's own courses with student counts
pub async fn instructor_courses(State(state): State<ApiState>, caller: CallerId) -> JsonResult {
    let caller = authorize(state.services.access.as_ref(), caller, &[Role::Instructor]).await?;
    ok(state
        .services
        .courses
        .courses_with_enrollment_count(&caller.id)
        .await?)
}
