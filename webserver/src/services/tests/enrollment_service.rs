//! Tests for RealEnrollmentService

use shared::{CourseId, UserId};

use super::fixtures::*;
use crate::error::WebServerError;
use crate::traits::EnrollmentService;

#[tokio::test]
async fn test_second_enrollment_is_rejected() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let course = create_course(&services, "Compilers", &instructor).await;

    assert!(services.enrollments.enroll(&student.id, course.id).await.unwrap());
    assert!(!services.enrollments.enroll(&student.id, course.id).await.unwrap());

    let ids = services.enrollments.enrolled_course_ids(&student.id).await.unwrap();
    assert_eq!(ids, vec![course.id]);
}

#[tokio::test]
async fn test_concurrent_duplicate_enrollments_yield_one_row() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let course = create_course(&services, "Compilers", &instructor).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let enrollments = services.enrollments.clone();
        let user_id = student.id.clone();
        handles.push(tokio::spawn(async move {
            enrollments.enroll(&user_id, course.id).await.unwrap()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let rows: i64 = services
        .db
        .call("count", |conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM enrollments", [], |row| row.get(0))?)
        })
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_enroll_in_missing_course_is_not_found() {
    let services = services();
    let student = create_student(&services, "ann").await;

    let result = services.enrollments.enroll(&student.id, CourseId(77)).await;
    assert!(matches!(result, Err(WebServerError::NotFound { entity: "course", .. })));
}

#[tokio::test]
async fn test_enroll_unknown_user_is_not_found() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let course = create_course(&services, "Compilers", &instructor).await;

    let result = services.enrollments.enroll(&UserId::new(), course.id).await;
    assert!(matches!(result, Err(WebServerError::NotFound { entity: "user", .. })));
}

#[tokio::test]
async fn test_enrolled_courses_include_instructor() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let first = create_course(&services, "Compilers", &instructor).await;
    let second = create_course(&services, "Databases", &instructor).await;
    create_course(&services, "Networks", &instructor).await;

    services.enrollments.enroll(&student.id, first.id).await.unwrap();
    services.enrollments.enroll(&student.id, second.id).await.unwrap();

    let courses = services.enrollments.enrolled_courses(&student.id).await.unwrap();
    assert_eq!(courses.len(), 2);
    assert!(courses.iter().all(|c| c.instructor_name.as_deref() == Some("Grace Tester")));
}

#[tokio::test]
async fn test_new_enrollment_starts_at_zero_percent() {
    let services = services();
    let instructor = create_instructor(&services, "grace").await;
    let student = create_student(&services, "ann").await;
    let course = create_course(&services, "Compilers", &instructor).await;
    services.enrollments.enroll(&student.id, course.id).await.unwrap();

    let enrollment_id: i64 = services
        .db
        .call("id", |conn| {
            Ok(conn.query_row("SELECT id FROM enrollments", [], |row| row.get(0))?)
        })
        .await
        .unwrap();
    let enrollment = services
        .enrollments
        .get_enrollment(enrollment_id.into())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(enrollment.user_id, student.id);
    assert_eq!(enrollment.course_id, course.id);
    assert_eq!(enrollment.completion_percentage, 0.0);
}
