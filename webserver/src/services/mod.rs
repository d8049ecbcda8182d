//! Service implementations
//!
//! Real implementations of all service traits for production use

pub mod access_control;
pub mod assignment_service;
pub mod course_service;
pub mod enrollment_service;
pub mod progress_service;
pub mod user_service;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::storage::Database;
use crate::traits::{
    AccessControl, AssignmentService, CourseService, EnrollmentService, ProgressTrackingService,
    UserService,
};

// Re-export service implementations
pub use access_control::RealAccessControl;
pub use assignment_service::RealAssignmentService;
pub use course_service::RealCourseService;
pub use enrollment_service::RealEnrollmentService;
pub use progress_service::RealProgressTrackingService;
pub use user_service::RealUserService;

/// Every service the HTTP layer depends on
#[derive(Clone)]
pub struct AppServices {
    pub courses: Arc<dyn CourseService>,
    pub assignments: Arc<dyn AssignmentService>,
    pub enrollments: Arc<dyn EnrollmentService>,
    pub progress: Arc<dyn ProgressTrackingService>,
    pub users: Arc<dyn UserService>,
    pub access: Arc<dyn AccessControl>,
}

impl AppServices {
    /// Wire the real implementations over one database
    pub fn from_database(db: Database) -> Self {
        Self {
            courses: Arc::new(RealCourseService::new(db.clone())),
            assignments: Arc::new(RealAssignmentService::new(db.clone())),
            enrollments: Arc::new(RealEnrollmentService::new(db.clone())),
            progress: Arc::new(RealProgressTrackingService::new(db.clone())),
            users: Arc::new(RealUserService::new(db.clone())),
            access: Arc::new(RealAccessControl::new(db)),
        }
    }
}
