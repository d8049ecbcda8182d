//! Entity records and the drafts used to create or change them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentId, CourseId, EnrollmentId, ProgressId, Role, UserId};

/// A portal user. Identity and credentials live with the external
/// authentication provider; this is the profile plus role membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<Vec<u8>>,
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Data required to register a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub major: Option<String>,
    pub roles: Vec<Role>,
}

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub instructor_id: UserId,
    /// Instructor's full name, joined in on reads
    pub instructor_name: Option<String>,
}

/// Course fields supplied on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub instructor_id: UserId,
}

/// A student's participation in a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub enrolled_at: DateTime<Utc>,
    /// Share of the enrollment's tracked assignments that are complete,
    /// rounded to two decimals
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub course_id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentUpdate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// One (enrollment, assignment) completion record.
///
/// `completion_percentage` is the owning enrollment's percentage, so every
/// record of the same enrollment reads the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: ProgressId,
    pub enrollment_id: EnrollmentId,
    pub assignment_id: AssignmentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub is_completed: bool,
    pub completion_percentage: f64,
}
