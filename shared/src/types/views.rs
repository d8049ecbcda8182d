//! Read models assembled from several tables

use serde::{Deserialize, Serialize};

use super::{Assignment, CourseId, ProgressId, UserId};

/// An instructor's course with the number of enrolled students
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEnrollmentCount {
    pub course_id: CourseId,
    pub course_title: String,
    pub student_count: u32,
}

/// Per-student progress summary within one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgressSummary {
    /// First progress row of the student, used as a link target
    pub id: ProgressId,
    pub user_id: UserId,
    pub user_name: String,
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub course_id: CourseId,
}

/// One assignment of a student together with its completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentProgress {
    pub progress_id: ProgressId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub assignment_title: String,
    pub description: String,
    pub is_completed: bool,
}

/// A newly added assignment and the progress rows created alongside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedAssignment {
    pub assignment: Assignment,
    pub progress_rows_created: usize,
}
