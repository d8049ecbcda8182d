//! Role lookup backed by the user store

use rusqlite::params;
use shared::{Role, UserId};

use crate::error::WebServerResult;
use crate::storage::Database;
use crate::storage::rows::roles_for_user;
use crate::traits::AccessControl;

#[derive(Clone)]
pub struct RealAccessControl {
    db: Database,
}

impl RealAccessControl {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl AccessControl for RealAccessControl {
    async fn roles_for(&self, user_id: &UserId) -> WebServerResult<Option<Vec<Role>>> {
        let user_id = user_id.clone();
        self.db
            .call("access.roles_for", move |conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                    params![user_id.as_str()],
                    |row| row.get(0),
                )?;
                if !exists {
                    return Ok(None);
                }
                Ok(Some(roles_for_user(conn, &user_id)?))
            })
            .await
    }
}
