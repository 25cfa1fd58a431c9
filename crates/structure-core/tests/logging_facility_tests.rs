//! Logging facility tests
//!
//! All tests in this binary share one capture subscriber, so each test uses
//! a distinct op name and filters on it.

use structure_core::errors::{ExError, ExErrorKind, StructureError};
use structure_core::logging_facility::init_test_capture;
use structure_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_start_and_end_events() {
    let capture = init_test_capture();

    log_op_start!("test_start_end_op", routine_name = "PPL");
    log_op_end!("test_start_end_op", duration_ms = 5u64, workout_count = 2usize);

    assert_eq!(capture.lifecycle("test_start_end_op"), vec!["start", "end"]);

    let events = capture.events_for("test_start_end_op");
    assert_eq!(events[0].field("routine_name"), Some("PPL"));
    assert_eq!(events[1].duration_ms(), Some(5));
    assert_eq!(events[1].field("workout_count"), Some("2"));
    assert!(events[0]
        .component()
        .is_some_and(|c| c.ends_with("logging_facility_tests")));
}

#[test]
fn test_error_event_carries_code_and_entity() {
    let capture = init_test_capture();

    let err = ExError::new(ExErrorKind::NotFound)
        .with_entity_id("Ghost")
        .with_message("no such routine");
    log_op_start!("test_error_op");
    log_op_error!("test_error_op", &err, duration_ms = 1u64);

    capture.assert_event_exists("test_error_op", "end_error");
    let events = capture.events_for("test_error_op");
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].err_code(), Some("ERR_NOT_FOUND"));
    assert_eq!(events[1].field("entity_id"), Some("Ghost"));
    assert_eq!(events[1].field("err_message"), Some("no such routine"));
}

#[test]
fn test_error_macro_accepts_domain_error() {
    let capture = init_test_capture();

    let err = StructureError::MissingTimestamp { id: 9 };
    log_op_error!("test_domain_error_op", &err, duration_ms = 0u64);

    let events = capture.events_for("test_domain_error_op");
    assert_eq!(events[0].err_code(), Some("ERR_MISSING_TIMESTAMP"));
}

#[test]
fn test_display_sigil_fields_pass_through() {
    let capture = init_test_capture();

    let request_id = structure_core::structure_core_types::RequestId::new();
    log_op_start!("test_sigil_op", request_id = %request_id);

    let events = capture.events_for("test_sigil_op");
    let expected = request_id.to_string();
    assert_eq!(events[0].request_id(), Some(expected.as_str()));
}
