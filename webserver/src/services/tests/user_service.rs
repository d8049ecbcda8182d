//! Tests for RealUserService

use shared::{Role, UserId, UserProfileUpdate};

use super::fixtures::*;
use crate::error::WebServerError;
use crate::traits::UserService;

fn field_of<T: std::fmt::Debug>(result: Result<T, WebServerError>) -> String {
    match result {
        Err(WebServerError::Validation { field, .. }) => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn profile(user_name: &str, email: &str) -> UserProfileUpdate {
    UserProfileUpdate {
        user_name: user_name.to_string(),
        email: email.to_string(),
        full_name: "Renamed Tester".to_string(),
        major: Some("Mathematics".to_string()),
        profile_picture: None,
    }
}

#[tokio::test]
async fn test_create_user_stores_roles() {
    let services = services();
    let user = create_user(&services, "ada", vec![Role::Instructor, Role::Student]).await;

    let fetched = services.users.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, "ada@example.com");
    assert!(fetched.has_role(Role::Instructor));
    assert!(fetched.has_role(Role::Student));
    assert!(!fetched.has_role(Role::Admin));
}

#[tokio::test]
async fn test_email_and_user_name_are_unique_ignoring_case() {
    let services = services();
    create_student(&services, "ada").await;

    let mut dup_email = new_user("other", vec![Role::Student]);
    dup_email.email = "ADA@Example.com".to_string();
    assert_eq!(field_of(services.users.create_user(dup_email).await), "email");

    let mut dup_name = new_user("ADA", vec![Role::Student]);
    dup_name.email = "fresh@example.com".to_string();
    assert_eq!(field_of(services.users.create_user(dup_name).await), "user_name");
}

#[tokio::test]
async fn test_create_user_requires_a_role() {
    let services = services();
    let result = services.users.create_user(new_user("ada", Vec::new())).await;
    assert_eq!(field_of(result), "roles");
}

#[tokio::test]
async fn test_find_by_email_ignores_case() {
    let services = services();
    let user = create_student(&services, "ada").await;

    let found = services.users.find_by_email(" Ada@EXAMPLE.com ").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(services.users.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_profile() {
    let services = services();
    let user = create_student(&services, "ada").await;
    create_student(&services, "bob").await;

    let updated = services
        .users
        .update_profile(&user.id, profile("ada", "ada@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.full_name, "Renamed Tester");
    assert_eq!(updated.major.as_deref(), Some("Mathematics"));

    let taken = services
        .users
        .update_profile(&user.id, profile("ada", "bob@example.com"))
        .await;
    assert_eq!(field_of(taken), "email");

    let missing = services
        .users
        .update_profile(&UserId::new(), profile("ghost", "ghost@example.com"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_set_roles_replaces_the_set() {
    let services = services();
    let user = create_student(&services, "ada").await;

    let updated = services
        .users
        .set_roles(&user.id, vec![Role::Admin])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.roles, vec![Role::Admin]);

    assert!(services.users.set_roles(&UserId::new(), vec![Role::Admin]).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_instructors_only_returns_instructors() {
    let services = services();
    create_instructor(&services, "grace").await;
    create_student(&services, "ann").await;
    create_user(&services, "alan", vec![Role::Instructor, Role::Admin]).await;

    let instructors = services.users.list_instructors().await.unwrap();
    let names: Vec<_> = instructors.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, vec!["alan", "grace"]);
    assert_eq!(services.users.list_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_user_restricted_while_teaching_or_enrolled() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let idle = create_student(&services, "bob").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    enroll(&services, &student, &course).await;

    let teaching = services.users.delete_user(&instructor.id).await;
    assert!(matches!(teaching, Err(WebServerError::Conflict(_))));
    let enrolled = services.users.delete_user(&student.id).await;
    assert!(matches!(enrolled, Err(WebServerError::Conflict(_))));

    assert!(services.users.delete_user(&idle.id).await.unwrap());
    assert!(services.users.get_user(&idle.id).await.unwrap().is_none());
    assert!(!services.users.delete_user(&idle.id).await.unwrap());
}
