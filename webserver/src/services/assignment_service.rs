//! Assignment service implementation

use rusqlite::{OptionalExtension, params};
use shared::{
    AddedAssignment, Assignment, AssignmentId, AssignmentUpdate, CourseId, NewAssignment, ProcessId,
    process_info,
};

use crate::core::validation::{validate_assignment_update, validate_new_assignment};
use crate::error::{WebServerError, WebServerResult};
use crate::services::progress_service::{fill_course_progress, recompute_course_percentages};
use crate::storage::Database;
use crate::storage::rows::{ASSIGNMENT_COLUMNS, assignment_from_row};
use crate::traits::AssignmentService;

/// Real assignment service backed by SQLite
#[derive(Clone)]
pub struct RealAssignmentService {
    db: Database,
}

impl RealAssignmentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn load_assignment(conn: &rusqlite::Connection, id: AssignmentId) -> rusqlite::Result<Option<Assignment>> {
    conn.query_row(
        &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?1"),
        params![id.0],
        assignment_from_row,
    )
    .optional()
}

#[async_trait::async_trait]
impl AssignmentService for RealAssignmentService {
    async fn assignments_for_course(&self, course_id: CourseId) -> WebServerResult<Vec<Assignment>> {
        self.db
            .call("assignments.for_course", move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE course_id = ?1 ORDER BY id"
                ))?;
                let assignments = stmt
                    .query_map(params![course_id.0], assignment_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(assignments)
            })
            .await
    }

    async fn get_assignment(&self, id: AssignmentId) -> WebServerResult<Option<Assignment>> {
        self.db
            .call("assignments.get", move |conn| Ok(load_assignment(conn, id)?))
            .await
    }

    async fn add_assignment(&self, assignment: NewAssignment) -> WebServerResult<AddedAssignment> {
        validate_new_assignment(&assignment)?;

        let added = self
            .db
            .call("assignments.add", move |conn| {
                let tx = conn.transaction()?;
                let course_exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)",
                    params![assignment.course_id.0],
                    |row| row.get(0),
                )?;
                if !course_exists {
                    return Err(WebServerError::not_found("course", assignment.course_id));
                }

                tx.execute(
                    "INSERT INTO assignments (course_id, title, description, due_date)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        assignment.course_id.0,
                        assignment.title.trim(),
                        assignment.description,
                        assignment.due_date
                    ],
                )?;
                let id = AssignmentId(tx.last_insert_rowid());
                let created = load_assignment(&tx, id)?
                    .ok_or_else(|| WebServerError::not_found("assignment", id))?;
                // enrolled students get their row with the assignment, or neither is kept
                let progress_rows_created = fill_course_progress(&tx, assignment.course_id.0)?;
                tx.commit()?;
                Ok(AddedAssignment {
                    assignment: created,
                    progress_rows_created,
                })
            })
            .await?;

        process_info!(
            ProcessId::current(),
            "📝 Added assignment {} '{}' to course {} ({} progress rows)",
            added.assignment.id,
            added.assignment.title,
            added.assignment.course_id,
            added.progress_rows_created
        );
        Ok(added)
    }

    async fn update_assignment(
        &self,
        id: AssignmentId,
        update: AssignmentUpdate,
    ) -> WebServerResult<Option<Assignment>> {
        validate_assignment_update(&update)?;

        self.db
            .call("assignments.update", move |conn| {
                let changed = conn.execute(
                    "UPDATE assignments SET title = ?2, description = ?3, due_date = ?4 WHERE id = ?1",
                    params![id.0, update.title.trim(), update.description, update.due_date],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                Ok(load_assignment(conn, id)?)
            })
            .await
    }

    async fn delete_assignment(&self, id: AssignmentId) -> WebServerResult<bool> {
        let deleted = self
            .db
            .call("assignments.delete", move |conn| {
                let tx = conn.transaction()?;
                let Some(assignment) = load_assignment(&tx, id)? else {
                    return Ok(false);
                };
                tx.execute("DELETE FROM assignments WHERE id = ?1", params![id.0])?;
                // progress rows went with the assignment
                recompute_course_percentages(&tx, assignment.course_id.0)?;
                tx.commit()?;
                Ok(true)
            })
            .await?;

        if deleted {
            process_info!(ProcessId::current(), "🗑️ Deleted assignment {}", id);
        }
        Ok(deleted)
    }
}
