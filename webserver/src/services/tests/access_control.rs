use shared::{Role, UserId};

use super::fixtures::*;
use crate::traits::{AccessControl, UserService};

#[tokio::test]
async fn test_roles_for_known_user() {
    let services = services();
    let user = create_user(&services, "ada", vec![Role::Admin, Role::Instructor]).await;

    let roles = services.access.roles_for(&user.id).await.unwrap().unwrap();
    assert!(roles.contains(&Role::Admin));
    assert!(roles.contains(&Role::Instructor));
    assert!(!roles.contains(&Role::Student));
}

#[tokio::test]
async fn test_roles_for_unknown_user_is_none() {
    let services = services();
    assert!(services.access.roles_for(&UserId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_roles_follow_role_changes() {
    let services = services();
    let user = create_student(&services, "ada").await;
    services.users.set_roles(&user.id, vec![Role::Instructor]).await.unwrap();

    let roles = services.access.roles_for(&user.id).await.unwrap().unwrap();
    assert_eq!(roles, vec![Role::Instructor]);
}
