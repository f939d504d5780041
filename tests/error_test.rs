use rive::error::AppError;

const GENERIC: &str = "Something went wrong. Please try again.";

#[test]
fn test_validation_message_is_shown() {
    let notice = AppError::Validation("Please enter a workout name".to_string()).notice();

    assert_eq!(notice.title, "Error");
    assert_eq!(notice.message, "Please enter a workout name");
}

#[test]
fn test_not_found_message_is_shown() {
    let notice = AppError::NotFound("Workout not found".to_string()).notice();

    assert_eq!(notice.message, "Workout not found");
}

#[test]
fn test_unauthorized_notice() {
    let notice = AppError::Unauthorized.notice();

    assert_eq!(notice.message, "Invalid email or password");
}

#[test]
fn test_internal_detail_is_hidden() {
    let notice = AppError::Internal("connection reset".to_string()).notice();

    assert_eq!(notice.message, GENERIC);
}

#[test]
fn test_database_detail_is_hidden() {
    let notice = AppError::Database(rusqlite::Error::QueryReturnedNoRows).notice();

    assert_eq!(notice.message, GENERIC);
}

#[test]
fn test_serialization_detail_is_hidden() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let notice = AppError::from(err).notice();

    assert_eq!(notice.message, GENERIC);
}
