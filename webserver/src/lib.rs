//! Learning portal web server
//!
//! Courses, assignments, enrollments and per-student progress served as a
//! JSON API over a SQLite store.

pub mod bootstrap;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod traits;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use config::{DatabaseLocation, ServerConfig};
pub use error::{WebServerError, WebServerResult};
pub use services::AppServices;
pub use state::WebServerState;
pub use storage::Database;
pub use webserver_impl::WebServer;

// Re-export trait definitions
pub use traits::{
    AccessControl, AssignmentService, CourseService, EnrollmentService, ProgressTrackingService,
    UserService,
};
