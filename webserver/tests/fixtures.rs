//! Test fixtures for webserver integration tests

#![allow(dead_code)]

use serde_json::{Value, json};
use shared::{NewUser, Role, User};

use learning_server::AppServices;

/// Register a user directly through the user service
pub async fn create_user(services: &AppServices, user_name: &str, roles: Vec<Role>) -> User {
    services
        .users
        .create_user(NewUser {
            user_name: user_name.to_string(),
            email: format!("{user_name}@school.test"),
            full_name: format!("{user_name} person"),
            major: None,
            roles,
        })
        .await
        .expect("create user")
}

pub fn course_body(title: &str, description: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "start_date": "2026-09-01T08:00:00Z",
        "end_date": "2026-12-18T17:00:00Z",
    })
}

pub fn assignment_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{title} instructions"),
        "due_date": "2026-10-01T23:59:00Z",
    })
}
