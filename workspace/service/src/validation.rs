//! Input rules applied before anything touches the database. Checks run in a
//! fixed order and the first failure is reported.

use validator::{Validate, ValidationErrors};

use crate::error::{Result, ServiceError};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 80;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_ITEM_TITLE_LEN: usize = 200;
pub const MAX_ITEM_DESCRIPTION_LEN: usize = 2000;

pub fn validate_username(username: &str) -> Result<()> {
    let length = username.trim().chars().count();
    if length < MIN_USERNAME_LEN {
        return Err(ServiceError::Validation(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_LEN
        )));
    }
    if length > MAX_USERNAME_LEN {
        return Err(ServiceError::Validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn ensure_passwords_match(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(ServiceError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

/// Signup checks: username, then password, then confirmation.
pub fn validate_signup(username: &str, password: &str, confirmation: Option<&str>) -> Result<()> {
    validate_username(username)?;
    validate_password(password)?;
    if let Some(confirmation) = confirmation {
        ensure_passwords_match(password, confirmation)?;
    }
    Ok(())
}

/// Password change checks after the old password has been verified.
pub fn validate_new_password(new_password: &str, confirmation: &str) -> Result<()> {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "New password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    ensure_passwords_match(new_password, confirmation)
}

pub fn validate_item(title: &str, description: Option<&str>) -> Result<()> {
    let title_len = title.trim().chars().count();
    if title_len == 0 {
        return Err(ServiceError::Validation("Title is required".to_string()));
    }
    if title_len > MAX_ITEM_TITLE_LEN {
        return Err(ServiceError::Validation(format!(
            "Title must be at most {} characters",
            MAX_ITEM_TITLE_LEN
        )));
    }
    if description.is_some_and(|d| d.chars().count() > MAX_ITEM_DESCRIPTION_LEN) {
        return Err(ServiceError::Validation(format!(
            "Description must be at most {} characters",
            MAX_ITEM_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

/// Runs the `validator` rules of a request and folds the failures into one
/// message. Fields are reported in name order.
pub fn validate_request<T: Validate>(request: &T) -> Result<()> {
    request
        .validate()
        .map_err(|errors| ServiceError::Validation(describe_errors(&errors)))
}

/// Joins the failed rule messages, fields in name order.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}", field),
            })
        })
        .collect();

    if messages.is_empty() {
        "Invalid request".to_string()
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        match result {
            Err(ServiceError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_username_rejected_regardless_of_password() {
        for password in ["", "short", "long enough password"] {
            assert_eq!(
                message(validate_signup("ab", password, Some(password))),
                "Username must be at least 3 characters"
            );
        }
    }

    #[test]
    fn test_username_is_trimmed_before_counting() {
        assert!(validate_username("  ab  ").is_err());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn test_signup_check_order() {
        assert_eq!(
            message(validate_signup("alice", "12345", Some("nope"))),
            "Password must be at least 6 characters"
        );
        assert_eq!(
            message(validate_signup("alice", "123456", Some("1234567"))),
            "Passwords do not match"
        );
        assert!(validate_signup("alice", "123456", Some("123456")).is_ok());
        assert!(validate_signup("alice", "123456", None).is_ok());
    }

    #[test]
    fn test_new_password_rules() {
        assert_eq!(
            message(validate_new_password("abc", "abc")),
            "New password must be at least 6 characters"
        );
        assert_eq!(message(validate_new_password("abcdef", "abcdeg")), "Passwords do not match");
        assert!(validate_new_password("abcdef", "abcdef").is_ok());
    }

    #[test]
    fn test_item_rules() {
        assert_eq!(message(validate_item("   ", None)), "Title is required");
        assert!(validate_item("Groceries", Some("milk, eggs")).is_ok());
        let long = "x".repeat(MAX_ITEM_DESCRIPTION_LEN + 1);
        assert!(validate_item("Groceries", Some(&long)).is_err());
    }

    #[test]
    fn test_validate_request_joins_messages_in_field_order() {
        let request = common::CreateCourseRequest {
            course_code: String::new(),
            title: String::new(),
            description: None,
            credits: None,
            professor_id: None,
            department: "Math".to_string(),
            semester: common::Semester::Fall,
            year: 2024,
            max_enrollment: None,
        };
        assert_eq!(
            message(validate_request(&request)),
            "Course code must be 1 to 20 characters; Title must be 1 to 200 characters"
        );
    }
}
