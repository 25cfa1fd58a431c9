use structure_core::errors::{ExError, ExErrorKind, StructureError};
use structure_core_types::RequestId;

#[test]
fn test_missing_skeleton_maps_to_missing_mapping() {
    let err = StructureError::MissingSkeleton {
        skeleton: "Bench Press".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingMapping);
    assert_eq!(ex_err.code(), "ERR_MISSING_MAPPING");
    assert_eq!(ex_err.entity_id(), Some("Bench Press"));
}

#[test]
fn test_missing_set_carries_movement_id() {
    let ex_err: ExError = StructureError::MissingSet {
        movement_id: 42,
        set_index: 3,
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingMapping);
    assert_eq!(ex_err.entity_id(), Some("42"));
    assert!(ex_err.message().contains('3'));
}

#[test]
fn test_invalid_name_structured_fields() {
    let ex_err: ExError = StructureError::InvalidName {
        reason: "Routine name cannot be empty".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidName);
    assert!(ex_err.message().contains("Invalid name"));
}

#[test]
fn test_not_selected_is_not_found() {
    let ex_err: ExError = StructureError::NotSelected {
        what: "workout".to_string(),
    }
    .into();
    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_request_id_context() {
    let request_id = RequestId::new();
    let err = ExError::new(ExErrorKind::Persistence)
        .with_op("insert_routine")
        .with_request_id(request_id);
    assert_eq!(err.request_id(), Some(&request_id));
    assert_eq!(err.op(), Some("insert_routine"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::MissingTimestamp, "ERR_MISSING_TIMESTAMP"),
        (ExErrorKind::SchemaMismatch, "ERR_SCHEMA_MISMATCH"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
