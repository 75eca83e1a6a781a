use smartstudy_lib::auth::AuthError;
use smartstudy_lib::error::StudyError;

#[test]
fn test_error_creation() {
    let error = StudyError::new("Test error", "test_stage");
    assert_eq!(error.message, "Test error");
    assert_eq!(error.stage, "test_stage");
    assert!(error.context.is_none());
}

#[test]
fn test_error_with_context() {
    let error = StudyError::new("Test error", "test_stage")
        .with_context("Additional context");
    assert_eq!(error.context.as_deref(), Some("Additional context"));
}

#[test]
fn test_error_display() {
    let error = StudyError::new("Test error", "test_stage")
        .with_context("context")
        .with_source("source");
    assert_eq!(
        format!("{}", error),
        "[test_stage] Test error (context: context) (source: source)"
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: StudyError = io.into();
    assert_eq!(error.stage, "io");
    assert!(error.message.contains("denied"));
}

#[test]
fn test_json_error_conversion() {
    let parse = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
    let error: StudyError = parse.into();
    assert_eq!(error.stage, "json_parse");
}

#[test]
fn test_auth_error_conversion() {
    let error: StudyError = AuthError::InvalidCredentials.into();
    assert_eq!(error.stage, "auth");
    assert_eq!(error.message, "Invalid email or password");
}

#[test]
fn test_invalid_grade_is_rejected() {
    let error = smartstudy_lib::records::Grade::new("math", "Exam", 120.0, 100.0, 0).unwrap_err();
    assert_eq!(error.stage, "validation");
}
