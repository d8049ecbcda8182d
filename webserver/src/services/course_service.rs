//! Course service implementation

use rusqlite::{OptionalExtension, params};
use shared::{Course, CourseEnrollmentCount, CourseId, NewCourse, ProcessId, Role, UserId, process_info};

use crate::core::validation::validate_course;
use crate::error::{WebServerError, WebServerResult};
use crate::storage::Database;
use crate::storage::db::FOLD_CASE;
use crate::storage::rows::{COURSE_COLUMNS, COURSE_FROM, course_from_row, roles_for_user};
use crate::traits::CourseService;

/// Real course service backed by SQLite
#[derive(Clone)]
pub struct RealCourseService {
    db: Database,
}

impl RealCourseService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn load_course(conn: &rusqlite::Connection, id: CourseId) -> rusqlite::Result<Option<Course>> {
    conn.query_row(
        &format!("SELECT {COURSE_COLUMNS} FROM {COURSE_FROM} WHERE c.id = ?1"),
        params![id.0],
        course_from_row,
    )
    .optional()
}

/// The instructor must exist and hold the Instructor role
fn ensure_instructor(conn: &rusqlite::Connection, instructor_id: &UserId) -> WebServerResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        params![instructor_id.as_str()],
        |row| row.get(0),
    )?;
    if !exists || !roles_for_user(conn, instructor_id)?.contains(&Role::Instructor) {
        return Err(WebServerError::validation(
            "instructor_id",
            "Instructor is required.",
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl CourseService for RealCourseService {
    async fn list_courses(&self) -> WebServerResult<Vec<Course>> {
        self.db
            .call("courses.list", |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COURSE_COLUMNS} FROM {COURSE_FROM} ORDER BY c.start_date, c.id"
                ))?;
                let courses = stmt
                    .query_map([], course_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(courses)
            })
            .await
    }

    async fn get_course(&self, id: CourseId) -> WebServerResult<Option<Course>> {
        self.db
            .call("courses.get", move |conn| Ok(load_course(conn, id)?))
            .await
    }

    async fn create_course(&self, course: NewCourse) -> WebServerResult<Course> {
        validate_course(&course)?;

        let created = self
            .db
            .call("courses.create", move |conn| {
                let tx = conn.transaction()?;
                ensure_instructor(&tx, &course.instructor_id)?;
                tx.execute(
                    "INSERT INTO courses (title, description, start_date, end_date, instructor_id)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        course.title.trim(),
                        course.description,
                        course.start_date,
                        course.end_date,
                        course.instructor_id.as_str()
                    ],
                )?;
                let id = CourseId(tx.last_insert_rowid());
                let created = load_course(&tx, id)?
                    .ok_or_else(|| WebServerError::not_found("course", id))?;
                tx.commit()?;
                Ok(created)
            })
            .await?;

        process_info!(ProcessId::current(), "📚 Created course {} '{}'", created.id, created.title);
        Ok(created)
    }

    async fn update_course(&self, id: CourseId, course: NewCourse) -> WebServerResult<Option<Course>> {
        validate_course(&course)?;

        self.db
            .call("courses.update", move |conn| {
                let tx = conn.transaction()?;
                let Some(existing) = load_course(&tx, id)? else {
                    return Ok(None);
                };
                // a course keeps its instructor even after that user loses the role
                if existing.instructor_id != course.instructor_id {
                    ensure_instructor(&tx, &course.instructor_id)?;
                }
                tx.execute(
                    "UPDATE courses
                     SET title = ?2, description = ?3, start_date = ?4, end_date = ?5, instructor_id = ?6
                     WHERE id = ?1",
                    params![
                        id.0,
                        course.title.trim(),
                        course.description,
                        course.start_date,
                        course.end_date,
                        course.instructor_id.as_str()
                    ],
                )?;
                let updated = load_course(&tx, id)?;
                tx.commit()?;
                Ok(updated)
            })
            .await
    }

    async fn delete_course(&self, id: CourseId) -> WebServerResult<bool> {
        let deleted = self
            .db
            .call("courses.delete", move |conn| {
                Ok(conn.execute("DELETE FROM courses WHERE id = ?1", params![id.0])? > 0)
            })
            .await?;

        if deleted {
            process_info!(ProcessId::current(), "🗑️ Deleted course {}", id);
        }
        Ok(deleted)
    }

    async fn search_courses(&self, term: &str) -> WebServerResult<Vec<Course>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.list_courses().await;
        }

        self.db
            .call("courses.search", move |conn| {
                // instr() keeps LIKE wildcards in the term literal
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COURSE_COLUMNS} FROM {COURSE_FROM}
                     WHERE instr({FOLD_CASE}(c.title), ?1) > 0
                        OR instr({FOLD_CASE}(c.description), ?1) > 0
                     ORDER BY c.start_date, c.id"
                ))?;
                let courses = stmt
                    .query_map(params![term], course_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(courses)
            })
            .await
    }

    async fn courses_with_enrollment_count(
        &self,
        instructor_id: &UserId,
    ) -> WebServerResult<Vec<CourseEnrollmentCount>> {
        let instructor_id = instructor_id.clone();
        self.db
            .call("courses.enrollment_counts", move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT c.id, c.title, COUNT(e.id)
                     FROM courses c LEFT JOIN enrollments e ON e.course_id = c.id
                     WHERE c.instructor_id = ?1
                     GROUP BY c.id, c.title
                     ORDER BY c.id",
                )?;
                let counts = stmt
                    .query_map(params![instructor_id.as_str()], |row| {
                        Ok(CourseEnrollmentCount {
                            course_id: CourseId(row.get(0)?),
                            course_title: row.get(1)?,
                            student_count: row.get::<_, i64>(2)? as u32,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(counts)
            })
            .await
    }
}
