//! Startup administration: granting the Admin role to a bootstrap account

use shared::{NewUser, ProcessId, Role, User, process_info, process_warn};

use crate::error::{WebServerError, WebServerResult};
use crate::traits::UserService;

/// Add `role` to an existing user, returning the updated user
async fn grant(users: &dyn UserService, user: User, role: Role) -> WebServerResult<User> {
    if user.has_role(role) {
        return Ok(user);
    }
    let mut roles = user.roles.clone();
    roles.push(role);
    users
        .set_roles(&user.id, roles)
        .await?
        .ok_or_else(|| WebServerError::not_found("user", &user.id))
}

/// Make the user registered under `email` an Admin.
///
/// Returns `false` and logs a warning when nobody has that email yet.
pub async fn seed_admin(users: &dyn UserService, email: &str) -> WebServerResult<bool> {
    let Some(user) = users.find_by_email(email).await? else {
        process_warn!(ProcessId::current(), "⚠️ Seed admin {} has no account yet", email);
        return Ok(false);
    };

    let admin = grant(users, user, Role::Admin).await?;
    process_info!(ProcessId::current(), "🔑 {} ({}) holds the Admin role", admin.email, admin.id);
    Ok(true)
}

/// Create an Admin account, or grant Admin to the account owning `email`
pub async fn add_admin(
    users: &dyn UserService,
    email: &str,
    user_name: &str,
    full_name: &str,
) -> WebServerResult<User> {
    if let Some(existing) = users.find_by_email(email).await? {
        return grant(users, existing, Role::Admin).await;
    }

    users
        .create_user(NewUser {
            user_name: user_name.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            major: None,
            roles: vec![Role::Admin],
        })
        .await
}
