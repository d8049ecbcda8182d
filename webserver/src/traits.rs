//! Service trait definitions for dependency injection
//!
//! Handlers only see these traits, so every endpoint can be exercised with
//! the generated mocks instead of a database.

use async_trait::async_trait;

use shared::{
    AddedAssignment, Assignment, AssignmentId, AssignmentProgress, AssignmentUpdate, Course,
    CourseEnrollmentCount, CourseId, CourseProgressSummary, Enrollment, EnrollmentId, NewAssignment,
    NewCourse, NewUser,
    ProgressId, ProgressRecord, Role, User, UserId, UserProfileUpdate,
};

use crate::error::WebServerResult;

/// Course catalogue management
#[mockall::automock]
#[async_trait]
pub trait CourseService: Send + Sync {
    /// All courses with their instructor's name
    async fn list_courses(&self) -> WebServerResult<Vec<Course>>;

    async fn get_course(&self, id: CourseId) -> WebServerResult<Option<Course>>;

    /// Create a course taught by an existing instructor
    async fn create_course(&self, course: NewCourse) -> WebServerResult<Course>;

    /// Replace a course's fields; `None` when the course does not exist
    async fn update_course(&self, id: CourseId, course: NewCourse) -> WebServerResult<Option<Course>>;

    /// Delete a course and everything hanging off it; `false` when missing
    async fn delete_course(&self, id: CourseId) -> WebServerResult<bool>;

    /// Case-insensitive substring match over title and description.
    /// A blank term returns every course.
    async fn search_courses(&self, term: &str) -> WebServerResult<Vec<Course>>;

    /// Courses taught by `instructor_id` with their student counts
    async fn courses_with_enrollment_count(
        &self,
        instructor_id: &UserId,
    ) -> WebServerResult<Vec<CourseEnrollmentCount>>;
}

/// Assignments belonging to courses
#[mockall::automock]
#[async_trait]
pub trait AssignmentService: Send + Sync {
    async fn assignments_for_course(&self, course_id: CourseId) -> WebServerResult<Vec<Assignment>>;

    async fn get_assignment(&self, id: AssignmentId) -> WebServerResult<Option<Assignment>>;

    /// Insert the assignment and the progress rows of every enrolled student
    /// in one transaction
    async fn add_assignment(&self, assignment: NewAssignment) -> WebServerResult<AddedAssignment>;

    async fn update_assignment(
        &self,
        id: AssignmentId,
        update: AssignmentUpdate,
    ) -> WebServerResult<Option<Assignment>>;

    /// Delete an assignment and its progress rows; `false` when missing
    async fn delete_assignment(&self, id: AssignmentId) -> WebServerResult<bool>;
}

/// Student enrollment
#[mockall::automock]
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll a user; `false` when the user is already enrolled
    async fn enroll(&self, user_id: &UserId, course_id: CourseId) -> WebServerResult<bool>;

    async fn enrolled_course_ids(&self, user_id: &UserId) -> WebServerResult<Vec<CourseId>>;

    async fn enrolled_courses(&self, user_id: &UserId) -> WebServerResult<Vec<Course>>;

    async fn get_enrollment(&self, id: EnrollmentId) -> WebServerResult<Option<Enrollment>>;
}

/// Per-assignment completion tracking and its aggregates
#[mockall::automock]
#[async_trait]
pub trait ProgressTrackingService: Send + Sync {
    /// Ensure one progress row per (enrollment, assignment) pair of the
    /// course. Returns the number of rows created.
    async fn initialize(&self, course_id: CourseId) -> WebServerResult<usize>;

    /// Set one row's completion flag and recompute its enrollment's
    /// percentage. `None` when the row does not exist.
    async fn update_progress(
        &self,
        progress_id: ProgressId,
        is_completed: bool,
    ) -> WebServerResult<Option<ProgressRecord>>;

    /// Integer completion percentage of an enrollment over its course's
    /// assignment count
    async fn calculate_progress(&self, enrollment_id: EnrollmentId) -> WebServerResult<u32>;

    /// One summary per enrolled user of the course
    async fn course_progress(&self, course_id: CourseId) -> WebServerResult<Vec<CourseProgressSummary>>;

    async fn student_assignments(
        &self,
        course_id: CourseId,
        user_id: &UserId,
    ) -> WebServerResult<Vec<AssignmentProgress>>;

    async fn progress_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> WebServerResult<Vec<ProgressRecord>>;
}

/// User profiles and role membership
#[mockall::automock]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self) -> WebServerResult<Vec<User>>;

    async fn get_user(&self, id: &UserId) -> WebServerResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> WebServerResult<Option<User>>;

    async fn create_user(&self, user: NewUser) -> WebServerResult<User>;

    async fn update_profile(
        &self,
        id: &UserId,
        update: UserProfileUpdate,
    ) -> WebServerResult<Option<User>>;

    /// Replace the user's role set
    async fn set_roles(&self, id: &UserId, roles: Vec<Role>) -> WebServerResult<Option<User>>;

    async fn list_instructors(&self) -> WebServerResult<Vec<User>>;

    /// Delete a user; fails with a conflict while the user teaches a course
    /// or holds an enrollment. `false` when missing.
    async fn delete_user(&self, id: &UserId) -> WebServerResult<bool>;
}

/// Role lookup for the authenticated caller
#[mockall::automock]
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Roles held by `user_id`; `None` when the user is unknown
    async fn roles_for(&self, user_id: &UserId) -> WebServerResult<Option<Vec<Role>>>;
}
