//! Relational schema
//!
//! Delete behavior is declared on the foreign keys:
//! - deleting a course removes its enrollments, assignments and progress rows
//! - deleting an assignment removes its progress rows
//! - a user who teaches a course or holds an enrollment cannot be deleted

use rusqlite::{Connection, params};
use shared::Role;

pub const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS roles (
        name TEXT PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        user_name TEXT NOT NULL,
        normalized_user_name TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        normalized_email TEXT NOT NULL UNIQUE,
        full_name TEXT NOT NULL CHECK (length(full_name) <= 100),
        major TEXT,
        profile_picture BLOB
    );

    CREATE TABLE IF NOT EXISTS user_roles (
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        role TEXT NOT NULL REFERENCES roles(name),
        PRIMARY KEY (user_id, role)
    );

    CREATE TABLE IF NOT EXISTS courses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(title) <= 200),
        description TEXT NOT NULL DEFAULT '' CHECK (length(description) <= 1000),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        instructor_id TEXT NOT NULL REFERENCES users(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_courses_instructor ON courses(instructor_id);

    CREATE TABLE IF NOT EXISTS enrollments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
        enrolled_at TEXT NOT NULL,
        completion_percentage REAL NOT NULL DEFAULT 0,
        UNIQUE (user_id, course_id)
    );
    CREATE INDEX IF NOT EXISTS idx_enrollments_course ON enrollments(course_id);

    CREATE TABLE IF NOT EXISTS assignments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        due_date TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_assignments_course ON assignments(course_id);

    CREATE TABLE IF NOT EXISTS progress_tracking (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        enrollment_id INTEGER NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
        assignment_id INTEGER NOT NULL REFERENCES assignments(id) ON DELETE CASCADE,
        course_id INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL REFERENCES users(id),
        is_completed INTEGER NOT NULL DEFAULT 0,
        UNIQUE (enrollment_id, assignment_id)
    );
    CREATE INDEX IF NOT EXISTS idx_progress_course_user ON progress_tracking(course_id, user_id);
"#;

/// Create all tables (idempotent) and seed the fixed role set
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;
    seed_roles(conn)
}

fn seed_roles(conn: &Connection) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO roles (name) VALUES (?1)")?;
    for role in Role::ALL {
        stmt.execute(params![role.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        let roles: i64 = conn
            .query_row("SELECT COUNT(*) FROM roles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(roles, 3);
    }
}
