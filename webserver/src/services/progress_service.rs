//! Progress tracking service implementation
//!
//! The completion percentage lives on the enrollment. Every path that
//! changes an enrollment's progress rows (flag updates, new rows, deleted
//! assignments) recomputes it in the same transaction.

use rusqlite::{Connection, OptionalExtension, params};
use shared::{
    AssignmentProgress, CourseId, CourseProgressSummary, EnrollmentId, ProcessId, ProgressId,
    ProgressRecord, UserId, process_debug, process_info,
};

use crate::core::{rounded_percentage, truncated_percentage};
use crate::error::{WebServerError, WebServerResult};
use crate::storage::Database;
use crate::storage::rows::{PROGRESS_SELECT, progress_from_row};
use crate::traits::ProgressTrackingService;

/// Real progress tracking service backed by SQLite
#[derive(Clone)]
pub struct RealProgressTrackingService {
    db: Database,
}

impl RealProgressTrackingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn count(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<u32> {
    conn.query_row(sql, params![id], |row| row.get::<_, i64>(0))
        .map(|n| n as u32)
}

/// Recompute and store one enrollment's percentage from its progress rows
pub(crate) fn recompute_enrollment_percentage(
    conn: &Connection,
    enrollment_id: i64,
) -> rusqlite::Result<f64> {
    let total = count(
        conn,
        "SELECT COUNT(*) FROM progress_tracking WHERE enrollment_id = ?1",
        enrollment_id,
    )?;
    let completed = count(
        conn,
        "SELECT COUNT(*) FROM progress_tracking WHERE enrollment_id = ?1 AND is_completed = 1",
        enrollment_id,
    )?;

    let percentage = rounded_percentage(completed, total);
    conn.execute(
        "UPDATE enrollments SET completion_percentage = ?2 WHERE id = ?1",
        params![enrollment_id, percentage],
    )?;
    Ok(percentage)
}

/// Recompute the percentage of every enrollment in a course
pub(crate) fn recompute_course_percentages(conn: &Connection, course_id: i64) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("SELECT id FROM enrollments WHERE course_id = ?1")?;
    let enrollment_ids = stmt
        .query_map(params![course_id], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for enrollment_id in enrollment_ids {
        recompute_enrollment_percentage(conn, enrollment_id)?;
    }
    Ok(())
}

/// Insert the missing (enrollment, assignment) rows of a course and refresh
/// its percentages. Returns the number of rows created.
pub(crate) fn fill_course_progress(conn: &Connection, course_id: i64) -> rusqlite::Result<usize> {
    let created = conn.execute(
        "INSERT INTO progress_tracking (enrollment_id, assignment_id, course_id, user_id, is_completed)
         SELECT e.id, a.id, e.course_id, e.user_id, 0
         FROM enrollments e JOIN assignments a ON a.course_id = e.course_id
         WHERE e.course_id = ?1
         ON CONFLICT (enrollment_id, assignment_id) DO NOTHING",
        params![course_id],
    )?;
    if created > 0 {
        recompute_course_percentages(conn, course_id)?;
    }
    Ok(created)
}

fn load_progress(conn: &Connection, id: ProgressId) -> rusqlite::Result<Option<ProgressRecord>> {
    conn.query_row(
        &format!("{PROGRESS_SELECT} WHERE p.id = ?1"),
        params![id.0],
        progress_from_row,
    )
    .optional()
}

#[async_trait::async_trait]
impl ProgressTrackingService for RealProgressTrackingService {
    async fn initialize(&self, course_id: CourseId) -> WebServerResult<usize> {
        let created = self
            .db
            .call("progress.initialize", move |conn| {
                let tx = conn.transaction()?;
                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)",
                    params![course_id.0],
                    |row| row.get(0),
                )?;
                if !exists {
                    return Err(WebServerError::not_found("course", course_id));
                }

                let created = fill_course_progress(&tx, course_id.0)?;
                tx.commit()?;
                Ok(created)
            })
            .await?;

        process_info!(
            ProcessId::current(),
            "📋 Initialized progress tracking for course {}: {} new rows",
            course_id,
            created
        );
        Ok(created)
    }

    async fn update_progress(
        &self,
        progress_id: ProgressId,
        is_completed: bool,
    ) -> WebServerResult<Option<ProgressRecord>> {
        self.db
            .call("progress.update", move |conn| {
                let tx = conn.transaction()?;
                let enrollment_id: Option<i64> = tx
                    .query_row(
                        "SELECT enrollment_id FROM progress_tracking WHERE id = ?1",
                        params![progress_id.0],
                        |row| row.get(0),
                    )
                    .optional()?;
                let Some(enrollment_id) = enrollment_id else {
                    process_debug!(ProcessId::current(), "Progress row {} not found, nothing updated", progress_id);
                    return Ok(None);
                };

                tx.execute(
                    "UPDATE progress_tracking SET is_completed = ?2 WHERE id = ?1",
                    params![progress_id.0, is_completed],
                )?;
                let percentage = recompute_enrollment_percentage(&tx, enrollment_id)?;
                let record = load_progress(&tx, progress_id)?;
                tx.commit()?;

                process_info!(
                    ProcessId::current(),
                    "✅ Progress {} set to {} (enrollment {} now {:.2}%)",
                    progress_id,
                    is_completed,
                    enrollment_id,
                    percentage
                );
                Ok(record)
            })
            .await
    }

    async fn calculate_progress(&self, enrollment_id: EnrollmentId) -> WebServerResult<u32> {
        self.db
            .call("progress.calculate", move |conn| {
                let total = count(
                    conn,
                    "SELECT COUNT(*) FROM assignments
                     WHERE course_id = (SELECT course_id FROM enrollments WHERE id = ?1)",
                    enrollment_id.0,
                )?;
                let completed = count(
                    conn,
                    "SELECT COUNT(*) FROM progress_tracking WHERE enrollment_id = ?1 AND is_completed = 1",
                    enrollment_id.0,
                )?;
                Ok(truncated_percentage(completed, total))
            })
            .await
    }

    async fn course_progress(&self, course_id: CourseId) -> WebServerResult<Vec<CourseProgressSummary>> {
        self.db
            .call("progress.course", move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT MIN(p.id), p.user_id, u.full_name,
                            AVG(e.completion_percentage), MIN(p.is_completed)
                     FROM progress_tracking p
                     JOIN enrollments e ON e.id = p.enrollment_id
                     JOIN users u ON u.id = p.user_id
                     WHERE p.course_id = ?1
                     GROUP BY p.user_id, u.full_name
                     ORDER BY u.full_name, p.user_id",
                )?;
                let summaries = stmt
                    .query_map(params![course_id.0], |row| {
                        Ok(CourseProgressSummary {
                            id: ProgressId(row.get(0)?),
                            user_id: UserId::from(row.get::<_, String>(1)?),
                            user_name: row.get(2)?,
                            progress_percentage: row.get(3)?,
                            is_completed: row.get(4)?,
                            course_id,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(summaries)
            })
            .await
    }

    async fn student_assignments(
        &self,
        course_id: CourseId,
        user_id: &UserId,
    ) -> WebServerResult<Vec<AssignmentProgress>> {
        let user_id = user_id.clone();
        self.db
            .call("progress.student_assignments", move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT p.id, p.course_id, p.user_id, a.title, a.description, p.is_completed
                     FROM progress_tracking p JOIN assignments a ON a.id = p.assignment_id
                     WHERE p.course_id = ?1 AND p.user_id = ?2
                     ORDER BY a.id",
                )?;
                let rows = stmt
                    .query_map(params![course_id.0, user_id.as_str()], |row| {
                        Ok(AssignmentProgress {
                            progress_id: ProgressId(row.get(0)?),
                            course_id: CourseId(row.get(1)?),
                            user_id: UserId::from(row.get::<_, String>(2)?),
                            assignment_title: row.get(3)?,
                            description: row.get(4)?,
                            is_completed: row.get(5)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    async fn progress_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> WebServerResult<Vec<ProgressRecord>> {
        self.db
            .call("progress.enrollment", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{PROGRESS_SELECT} WHERE p.enrollment_id = ?1 ORDER BY p.assignment_id"
                ))?;
                let records = stmt
                    .query_map(params![enrollment_id.0], progress_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await
    }
}
