//! Tests for RealAssignmentService

use chrono::{TimeZone, Utc};
use shared::{AssignmentId, AssignmentUpdate, CourseId, NewAssignment};

use super::fixtures::*;
use crate::error::WebServerError;
use crate::traits::{AssignmentService, CourseService, ProgressTrackingService};

#[tokio::test]
async fn test_add_and_list_assignments_in_order() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    let other = create_course(&services, "Databases", &instructor).await;
    add_assignments(&services, &course, 3).await;
    add_assignments(&services, &other, 1).await;

    let listed = services.assignments.assignments_for_course(course.id).await.unwrap();
    let titles: Vec<_> = listed.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Problem set 1", "Problem set 2", "Problem set 3"]);
    assert!(listed.iter().all(|a| a.course_id == course.id));
}

#[tokio::test]
async fn test_add_assignment_to_missing_course_is_not_found() {
    let services = services();
    let result = services
        .assignments
        .add_assignment(NewAssignment {
            course_id: CourseId(31),
            title: "Lab".to_string(),
            description: String::new(),
            due_date: None,
        })
        .await;
    assert!(matches!(result, Err(WebServerError::NotFound { entity: "course", .. })));
}

#[tokio::test]
async fn test_add_assignment_requires_title() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let course = create_course(&services, "Compilers", &instructor).await;

    let result = services
        .assignments
        .add_assignment(NewAssignment {
            course_id: course.id,
            title: "   ".to_string(),
            description: "Blank".to_string(),
            due_date: None,
        })
        .await;
    assert!(matches!(result, Err(WebServerError::Validation { .. })));
}

#[tokio::test]
async fn test_add_assignment_creates_rows_for_enrolled_students() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    for name in ["ann", "bob"] {
        let student = create_student(&services, name).await;
        enroll(&services, &student, &course).await;
    }

    let added = services
        .assignments
        .add_assignment(NewAssignment {
            course_id: course.id,
            title: "Parser".to_string(),
            description: String::new(),
            due_date: None,
        })
        .await
        .unwrap();
    assert_eq!(added.progress_rows_created, 2);
    assert_eq!(added.assignment.title, "Parser");
    assert_eq!(count_rows(&services, "progress_tracking").await, 2);
    assert_eq!(services.progress.initialize(course.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_progress_fill_keeps_no_assignment() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    enroll(&services, &student, &course).await;
    services
        .db
        .call("trigger", |conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_progress BEFORE INSERT ON progress_tracking
                 BEGIN SELECT RAISE(ABORT, 'progress rejected'); END;",
            )?;
            Ok(())
        })
        .await
        .unwrap();

    let result = services
        .assignments
        .add_assignment(NewAssignment {
            course_id: course.id,
            title: "Parser".to_string(),
            description: String::new(),
            due_date: None,
        })
        .await;
    assert!(matches!(result, Err(WebServerError::Database(_))), "{result:?}");
    assert_eq!(count_rows(&services, "assignments").await, 0);
}

#[tokio::test]
async fn test_update_assignment() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    let assignment = add_assignments(&services, &course, 1).await.remove(0);
    let due = Utc.with_ymd_and_hms(2026, 2, 1, 23, 59, 0).unwrap();

    let updated = services
        .assignments
        .update_assignment(
            assignment.id,
            AssignmentUpdate {
                title: "Lexer".to_string(),
                description: "Tokenize the input".to_string(),
                due_date: Some(due),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Lexer");
    assert_eq!(updated.due_date, Some(due));
    assert_eq!(updated.course_id, course.id);

    let missing = services
        .assignments
        .update_assignment(
            AssignmentId(500),
            AssignmentUpdate {
                title: "Nothing".to_string(),
                description: String::new(),
                due_date: None,
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_assignment_removes_its_progress_rows() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    let assignments = add_assignments(&services, &course, 2).await;
    enroll(&services, &student, &course).await;
    services.progress.initialize(course.id).await.unwrap();
    assert_eq!(count_rows(&services, "progress_tracking").await, 2);

    assert!(services.assignments.delete_assignment(assignments[0].id).await.unwrap());
    assert_eq!(count_rows(&services, "progress_tracking").await, 1);
    assert!(services.assignments.get_assignment(assignments[0].id).await.unwrap().is_none());
    assert!(!services.assignments.delete_assignment(assignments[0].id).await.unwrap());
}

#[tokio::test]
async fn test_assignments_go_with_their_course() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    add_assignments(&services, &course, 2).await;

    services.courses.delete_course(course.id).await.unwrap();
    assert_eq!(count_rows(&services, "assignments").await, 0);
}
