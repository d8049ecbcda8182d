//! Enrollment service implementation
//!
//! Uniqueness of (user, course) is enforced by the table's UNIQUE
//! constraint; the insert skips conflicting rows, so two concurrent
//! requests for the same pair cannot both report success.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use shared::{Course, CourseId, Enrollment, EnrollmentId, ProcessId, UserId, process_info};

use crate::error::{WebServerError, WebServerResult};
use crate::storage::Database;
use crate::storage::rows::{
    COURSE_COLUMNS, COURSE_FROM, ENROLLMENT_COLUMNS, course_from_row, enrollment_from_row,
};
use crate::traits::EnrollmentService;

/// Real enrollment service backed by SQLite
#[derive(Clone)]
pub struct RealEnrollmentService {
    db: Database,
}

impl RealEnrollmentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl EnrollmentService for RealEnrollmentService {
    async fn enroll(&self, user_id: &UserId, course_id: CourseId) -> WebServerResult<bool> {
        let user_id = user_id.clone();
        let log_user = user_id.clone();

        let enrolled = self
            .db
            .call("enrollments.enroll", move |conn| {
                let course_exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)",
                    params![course_id.0],
                    |row| row.get(0),
                )?;
                if !course_exists {
                    return Err(WebServerError::not_found("course", course_id));
                }
                let user_exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                    params![user_id.as_str()],
                    |row| row.get(0),
                )?;
                if !user_exists {
                    return Err(WebServerError::not_found("user", &user_id));
                }

                let inserted = conn.execute(
                    "INSERT INTO enrollments (course_id, user_id, enrolled_at, completion_percentage)
                     VALUES (?1, ?2, ?3, 0)
                     ON CONFLICT (user_id, course_id) DO NOTHING",
                    params![course_id.0, user_id.as_str(), Utc::now()],
                )?;
                Ok(inserted == 1)
            })
            .await?;

        if enrolled {
            process_info!(ProcessId::current(), "🎓 User {} enrolled in course {}", log_user, course_id);
        } else {
            process_info!(ProcessId::current(), "User {} already enrolled in course {}", log_user, course_id);
        }
        Ok(enrolled)
    }

    async fn enrolled_course_ids(&self, user_id: &UserId) -> WebServerResult<Vec<CourseId>> {
        let user_id = user_id.clone();
        self.db
            .call("enrollments.course_ids", move |conn| {
                let mut stmt =
                    conn.prepare("SELECT course_id FROM enrollments WHERE user_id = ?1 ORDER BY course_id")?;
                let ids = stmt
                    .query_map(params![user_id.as_str()], |row| Ok(CourseId(row.get(0)?)))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(ids)
            })
            .await
    }

    async fn enrolled_courses(&self, user_id: &UserId) -> WebServerResult<Vec<Course>> {
        let user_id = user_id.clone();
        self.db
            .call("enrollments.courses", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COURSE_COLUMNS} FROM {COURSE_FROM}
                     JOIN enrollments e ON e.course_id = c.id
                     WHERE e.user_id = ?1
                     ORDER BY e.enrolled_at, c.id"
                ))?;
                let courses = stmt
                    .query_map(params![user_id.as_str()], course_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(courses)
            })
            .await
    }

    async fn get_enrollment(&self, id: EnrollmentId) -> WebServerResult<Option<Enrollment>> {
        self.db
            .call("enrollments.get", move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ?1"),
                        params![id.0],
                        enrollment_from_row,
                    )
                    .optional()?)
            })
            .await
    }
}
