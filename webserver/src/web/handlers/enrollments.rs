//! Student catalogue and enrollment endpoints

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;
use shared::{CourseId, Role};

use super::{JsonResult, ok, success};
use crate::error::WebServerError;
use crate::web::ApiState;
use crate::web::auth::{CallerId, authorize};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
}

/// Searchable course list, marking the courses the caller already takes
pub async fn catalog(
    State(state): State<ApiState>,
    caller: CallerId,
    Query(query): Query<CatalogQuery>,
) -> JsonResult {
    let caller = authorize(state.services.access.as_ref(), caller, &[Role::Student]).await?;
    let term = query.search.unwrap_or_default();

    let courses = state.services.courses.search_courses(&term).await?;
    let enrolled = state.services.enrollments.enrolled_course_ids(&caller.id).await?;

    ok(json!({
        "search": term,
        "courses": courses,
        "enrolled_course_ids": enrolled,
    }))
}

pub async fn enroll(
    State(state): State<ApiState>,
    caller: CallerId,
    Path(course_id): Path<CourseId>,
) -> JsonResult {
    let caller = authorize(state.services.access.as_ref(), caller, &[Role::Student]).await?;
    if !state.services.enrollments.enroll(&caller.id, course_id).await? {
        return Err(WebServerError::Conflict(
            "You are already enrolled in this course.".to_string(),
        ));
    }
    success(
        "You have successfully enrolled in the course.",
        json!({ "course_id": course_id, "user_id": caller.id }),
    )
}

pub async fn my_courses(State(state): State<ApiState>, caller: CallerId) -> JsonResult {
    let caller = authorize(state.services.access.as_ref(), caller, &[Role::Student]).await?;
    ok(state.services.enrollments.enrolled_courses(&caller.id).await?)
}
