//! User service implementation

use rusqlite::{Connection, OptionalExtension, params};
use shared::{NewUser, ProcessId, Role, User, UserId, UserProfileUpdate, process_info};

use crate::core::validation::{normalize, validate_new_user, validate_profile_update};
use crate::error::{WebServerError, WebServerResult};
use crate::storage::Database;
use crate::storage::rows::{USER_COLUMNS, all_user_roles, roles_for_user, user_from_row};
use crate::traits::UserService;

/// Real user service backed by SQLite
#[derive(Clone)]
pub struct RealUserService {
    db: Database,
}

impl RealUserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn load_user(conn: &Connection, id: &UserId) -> rusqlite::Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.as_str()],
            user_from_row,
        )
        .optional()?;

    match user {
        Some(mut user) => {
            user.roles = roles_for_user(conn, &user.id)?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Fail when another user already owns the email or user name
fn ensure_unique(
    conn: &Connection,
    user_name: &str,
    email: &str,
    except: Option<&UserId>,
) -> WebServerResult<()> {
    let except = except.map(UserId::as_str).unwrap_or("");

    let email_taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE normalized_email = ?1 AND id <> ?2)",
        params![normalize(email), except],
        |row| row.get(0),
    )?;
    if email_taken {
        return Err(WebServerError::validation("email", "Email already exists."));
    }

    let name_taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE normalized_user_name = ?1 AND id <> ?2)",
        params![normalize(user_name), except],
        |row| row.get(0),
    )?;
    if name_taken {
        return Err(WebServerError::validation("user_name", "Username already exists."));
    }
    Ok(())
}

fn replace_roles(conn: &Connection, id: &UserId, roles: &[Role]) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM user_roles WHERE user_id = ?1", params![id.as_str()])?;
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?1, ?2)")?;
    for role in roles {
        stmt.execute(params![id.as_str(), role.as_str()])?;
    }
    Ok(())
}

fn select_users(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<User>> {
    let mut roles = all_user_roles(conn)?;
    let mut stmt = conn.prepare(sql)?;
    let mut users = stmt
        .query_map([], user_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for user in &mut users {
        user.roles = roles.remove(user.id.as_str()).unwrap_or_default();
    }
    Ok(users)
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn list_users(&self) -> WebServerResult<Vec<User>> {
        self.db
            .call("users.list", |conn| {
                Ok(select_users(
                    conn,
                    &format!("SELECT {USER_COLUMNS} FROM users ORDER BY full_name, user_name"),
                )?)
            })
            .await
    }

    async fn get_user(&self, id: &UserId) -> WebServerResult<Option<User>> {
        let id = id.clone();
        self.db
            .call("users.get", move |conn| Ok(load_user(conn, &id)?))
            .await
    }

    async fn find_by_email(&self, email: &str) -> WebServerResult<Option<User>> {
        let normalized = normalize(email);
        self.db
            .call("users.find_by_email", move |conn| {
                let id: Option<String> = conn
                    .query_row(
                        "SELECT id FROM users WHERE normalized_email = ?1",
                        params![normalized],
                        |row| row.get(0),
                    )
                    .optional()?;
                match id {
                    Some(id) => Ok(load_user(conn, &UserId::from(id))?),
                    None => Ok(None),
                }
            })
            .await
    }

    async fn create_user(&self, user: NewUser) -> WebServerResult<User> {
        validate_new_user(&user)?;

        let created = self
            .db
            .call("users.create", move |conn| {
                let tx = conn.transaction()?;
                ensure_unique(&tx, &user.user_name, &user.email, None)?;

                let id = UserId::new();
                tx.execute(
                    "INSERT INTO users (id, user_name, normalized_user_name, email, normalized_email, full_name, major)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        id.as_str(),
                        user.user_name.trim(),
                        normalize(&user.user_name),
                        user.email.trim(),
                        normalize(&user.email),
                        user.full_name.trim(),
                        user.major
                    ],
                )?;
                replace_roles(&tx, &id, &user.roles)?;
                let created = load_user(&tx, &id)?.ok_or_else(|| WebServerError::not_found("user", &id))?;
                tx.commit()?;
                Ok(created)
            })
            .await?;

        process_info!(
            ProcessId::current(),
            "👤 Created user {} ({}) with roles {:?}",
            created.user_name,
            created.id,
            created.roles
        );
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: UserProfileUpdate,
    ) -> WebServerResult<Option<User>> {
        validate_profile_update(&update)?;
        let id = id.clone();

        self.db
            .call("users.update_profile", move |conn| {
                let tx = conn.transaction()?;
                if load_user(&tx, &id)?.is_none() {
                    return Ok(None);
                }
                ensure_unique(&tx, &update.user_name, &update.email, Some(&id))?;

                tx.execute(
                    "UPDATE users
                     SET user_name = ?2, normalized_user_name = ?3, email = ?4, normalized_email = ?5,
                         full_name = ?6, major = ?7, profile_picture = ?8
                     WHERE id = ?1",
                    params![
                        id.as_str(),
                        update.user_name.trim(),
                        normalize(&update.user_name),
                        update.email.trim(),
                        normalize(&update.email),
                        update.full_name.trim(),
                        update.major,
                        update.profile_picture
                    ],
                )?;
                let updated = load_user(&tx, &id)?;
                tx.commit()?;
                Ok(updated)
            })
            .await
    }

    async fn set_roles(&self, id: &UserId, roles: Vec<Role>) -> WebServerResult<Option<User>> {
        let id = id.clone();
        let updated = self
            .db
            .call("users.set_roles", move |conn| {
                let tx = conn.transaction()?;
                if load_user(&tx, &id)?.is_none() {
                    return Ok(None);
                }
                replace_roles(&tx, &id, &roles)?;
                let updated = load_user(&tx, &id)?;
                tx.commit()?;
                Ok(updated)
            })
            .await?;

        if let Some(user) = &updated {
            process_info!(ProcessId::current(), "🔑 User {} roles now {:?}", user.id, user.roles);
        }
        Ok(updated)
    }

    async fn list_instructors(&self) -> WebServerResult<Vec<User>> {
        self.db
            .call("users.instructors", |conn| {
                Ok(select_users(
                    conn,
                    &format!(
                        "SELECT {USER_COLUMNS} FROM users
                         WHERE id IN (SELECT user_id FROM user_roles WHERE role = 'Instructor')
                         ORDER BY full_name, user_name"
                    ),
                )?)
            })
            .await
    }

    async fn delete_user(&self, id: &UserId) -> WebServerResult<bool> {
        let id = id.clone();
        let log_id = id.clone();

        let deleted = self
            .db
            .call("users.delete", move |conn| {
                let tx = conn.transaction()?;
                if load_user(&tx, &id)?.is_none() {
                    return Ok(false);
                }

                let taught: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM courses WHERE instructor_id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )?;
                let enrolled: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM enrollments WHERE user_id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )?;
                if taught > 0 || enrolled > 0 {
                    return Err(WebServerError::Conflict(format!(
                        "User {id} still teaches {taught} course(s) and holds {enrolled} enrollment(s)"
                    )));
                }

                tx.execute("DELETE FROM users WHERE id = ?1", params![id.as_str()])?;
                tx.commit()?;
                Ok(true)
            })
            .await?;

        if deleted {
            process_info!(ProcessId::current(), "🗑️ Deleted user {}", log_id);
        }
        Ok(deleted)
    }
}
