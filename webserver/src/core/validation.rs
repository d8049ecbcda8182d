//! Input validation for drafts coming from clients

use shared::{AssignmentUpdate, NewAssignment, NewCourse, NewUser, UserProfileUpdate};

use crate::error::{WebServerError, WebServerResult};

pub const MAX_COURSE_TITLE: usize = 200;
pub const MAX_COURSE_DESCRIPTION: usize = 1000;
pub const MAX_ASSIGNMENT_TITLE: usize = 200;
pub const MAX_FULL_NAME: usize = 100;

fn required(field: &str, value: &str, label: &str, max: usize) -> WebServerResult<()> {
    if value.trim().is_empty() {
        return Err(WebServerError::validation(field, format!("{label} is required.")));
    }
    if value.chars().count() > max {
        return Err(WebServerError::validation(
            field,
            format!("{label} must be at most {max} characters."),
        ));
    }
    Ok(())
}

pub fn validate_course(course: &NewCourse) -> WebServerResult<()> {
    required("title", &course.title, "Title", MAX_COURSE_TITLE)?;
    if course.description.chars().count() > MAX_COURSE_DESCRIPTION {
        return Err(WebServerError::validation(
            "description",
            format!("Description must be at most {MAX_COURSE_DESCRIPTION} characters."),
        ));
    }
    if course.end_date < course.start_date {
        return Err(WebServerError::validation(
            "end_date",
            "End date must not be before the start date.",
        ));
    }
    Ok(())
}

pub fn validate_new_assignment(assignment: &NewAssignment) -> WebServerResult<()> {
    required("title", &assignment.title, "Title", MAX_ASSIGNMENT_TITLE)
}

pub fn validate_assignment_update(update: &AssignmentUpdate) -> WebServerResult<()> {
    required("title", &update.title, "Title", MAX_ASSIGNMENT_TITLE)
}

fn validate_email(email: &str) -> WebServerResult<()> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(WebServerError::validation("email", "Email address is not valid."));
    }
    Ok(())
}

fn validate_profile_fields(user_name: &str, email: &str, full_name: &str) -> WebServerResult<()> {
    required("full_name", full_name, "Full Name", MAX_FULL_NAME)?;
    required("user_name", user_name, "User Name", 256)?;
    validate_email(email)
}

pub fn validate_new_user(user: &NewUser) -> WebServerResult<()> {
    if user.roles.is_empty() {
        return Err(WebServerError::validation("roles", "Please select at least one role."));
    }
    validate_profile_fields(&user.user_name, &user.email, &user.full_name)
}

pub fn validate_profile_update(update: &UserProfileUpdate) -> WebServerResult<()> {
    validate_profile_fields(&update.user_name, &update.email, &update.full_name)
}

/// Case-insensitive key used for uniqueness of user names and emails
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}
