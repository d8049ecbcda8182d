//! HTTP surface: shared handler state, routing and middleware

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::AppServices;
use crate::state::WebServerState;
use handlers::{assignments, courses, enrollments, health, progress, users};

/// State handed to every handler
#[derive(Clone)]
pub struct ApiState {
    pub services: AppServices,
    pub server: Arc<WebServerState>,
}

async fn count_requests(State(state): State<ApiState>, request: Request, next: Next) -> Response {
    state.server.record_request();
    next.run(request).await
}

/// Build the Axum router with all routes
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Courses
        .route("/api/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/api/courses/:id",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/api/instructor/courses", get(courses::instructor_courses))
        // Assignments
        .route(
            "/api/courses/:id/assignments",
            get(assignments::list_assignments).post(assignments::add_assignment),
        )
        .route(
            "/api/assignments/:id",
            get(assignments::get_assignment)
                .put(assignments::update_assignment)
                .delete(assignments::delete_assignment),
        )
        // Progress
        .route("/api/courses/:id/progress", get(progress::course_progress))
        .route(
            "/api/courses/:id/progress/initialize",
            post(progress::initialize_progress),
        )
        .route(
            "/api/courses/:id/students/:user_id/assignments",
            get(progress::student_assignments),
        )
        .route("/api/progress/:id", put(progress::update_progress))
        .route("/api/enrollments/:id/progress", get(progress::enrollment_progress))
        // Student catalogue
        .route("/api/catalog", get(enrollments::catalog))
        .route("/api/catalog/:course_id/enroll", post(enrollments::enroll))
        .route("/api/my/courses", get(enrollments::my_courses))
        // User administration
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/:id/roles", put(users::set_roles))
        .route("/api/instructors", get(users::list_instructors))
        .route_layer(middleware::from_fn_with_state(state.clone(), count_requests))
        // Health check
        .route("/health", get(health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}
