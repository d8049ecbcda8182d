//! Row mappers and the column lists they expect

use std::collections::HashMap;
use std::str::FromStr;

use rusqlite::{Connection, Row, params};
use shared::{
    Assignment, AssignmentId, Course, CourseId, Enrollment, EnrollmentId, ProgressId,
    ProgressRecord, Role, User, UserId,
};

pub const COURSE_COLUMNS: &str = "c.id, c.title, c.description, c.start_date, c.end_date, \
     c.instructor_id, u.full_name";

/// `FROM` clause matching [`COURSE_COLUMNS`]
pub const COURSE_FROM: &str = "courses c LEFT JOIN users u ON u.id = c.instructor_id";

pub fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: CourseId(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        instructor_id: UserId::from(row.get::<_, String>(5)?),
        instructor_name: row.get(6)?,
    })
}

pub const ASSIGNMENT_COLUMNS: &str = "id, course_id, title, description, due_date";

pub fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: AssignmentId(row.get(0)?),
        course_id: CourseId(row.get(1)?),
        title: row.get(2)?,
        description: row.get(3)?,
        due_date: row.get(4)?,
    })
}

pub const ENROLLMENT_COLUMNS: &str = "id, course_id, user_id, enrolled_at, completion_percentage";

pub fn enrollment_from_row(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: EnrollmentId(row.get(0)?),
        course_id: CourseId(row.get(1)?),
        user_id: UserId::from(row.get::<_, String>(2)?),
        enrolled_at: row.get(3)?,
        completion_percentage: row.get(4)?,
    })
}

/// Progress rows read the percentage stored on their enrollment
pub const PROGRESS_SELECT: &str = "SELECT p.id, p.enrollment_id, p.assignment_id, p.course_id, \
     p.user_id, p.is_completed, e.completion_percentage \
     FROM progress_tracking p JOIN enrollments e ON e.id = p.enrollment_id";

pub fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<ProgressRecord> {
    Ok(ProgressRecord {
        id: ProgressId(row.get(0)?),
        enrollment_id: EnrollmentId(row.get(1)?),
        assignment_id: AssignmentId(row.get(2)?),
        course_id: CourseId(row.get(3)?),
        user_id: UserId::from(row.get::<_, String>(4)?),
        is_completed: row.get(5)?,
        completion_percentage: row.get(6)?,
    })
}

pub const USER_COLUMNS: &str = "id, user_name, email, full_name, major, profile_picture";

/// Map a user row; roles are attached separately
pub fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::from(row.get::<_, String>(0)?),
        user_name: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        major: row.get(4)?,
        profile_picture: row.get(5)?,
        roles: Vec::new(),
    })
}

/// Roles of one user, sorted
pub fn roles_for_user(conn: &Connection, user_id: &UserId) -> rusqlite::Result<Vec<Role>> {
    let mut stmt = conn.prepare("SELECT role FROM user_roles WHERE user_id = ?1")?;
    let names = stmt
        .query_map(params![user_id.as_str()], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut roles: Vec<Role> = names.iter().filter_map(|name| Role::from_str(name).ok()).collect();
    roles.sort();
    Ok(roles)
}

/// Role membership of every user, keyed by user id
pub fn all_user_roles(conn: &Connection) -> rusqlite::Result<HashMap<String, Vec<Role>>> {
    let mut stmt = conn.prepare("SELECT user_id, role FROM user_roles")?;
    let pairs = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut by_user: HashMap<String, Vec<Role>> = HashMap::new();
    for (user_id, name) in pairs {
        if let Ok(role) = Role::from_str(&name) {
            by_user.entry(user_id).or_default().push(role);
        }
    }
    for roles in by_user.values_mut() {
        roles.sort();
    }
    Ok(by_user)
}
