use gloat_core::errors::{ExError, ExErrorKind, GloatError};

#[test]
fn test_irreversible_carries_version() {
    let ex_err: ExError = GloatError::Irreversible { version: 100 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Irreversible);
    assert_eq!(ex_err.code(), "ERR_IRREVERSIBLE");
    assert_eq!(ex_err.version(), Some(100));
    assert_eq!(ex_err.op(), Some("revert"));
}

#[test]
fn test_collaborator_errors_keep_message() {
    let ex_err: ExError = GloatError::Store {
        message: "no such table: schema_migrations".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::StoreUnavailable);
    assert_eq!(ex_err.message(), "no such table: schema_migrations");
}

#[test]
fn test_rollback_keeps_primary_as_source() {
    let err = GloatError::Execution {
        message: "syntax error".to_string(),
    }
    .with_rollback_failure("connection reset");

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Rollback);
    let source = ex_err.source_error().expect("primary cause kept");
    assert_eq!(source.kind(), ExErrorKind::Execution);
    assert_eq!(source.message(), "syntax error");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::SourceUnavailable, "ERR_SOURCE_UNAVAILABLE"),
        (ExErrorKind::StoreUnavailable, "ERR_STORE_UNAVAILABLE"),
        (ExErrorKind::Connection, "ERR_CONNECTION"),
        (ExErrorKind::Execution, "ERR_EXECUTION"),
        (ExErrorKind::Irreversible, "ERR_IRREVERSIBLE"),
        (ExErrorKind::Commit, "ERR_COMMIT"),
        (ExErrorKind::Rollback, "ERR_ROLLBACK"),
        (ExErrorKind::Cancelled, "ERR_CANCELLED"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_invalid_version_carries_path() {
    let ex_err: ExError = GloatError::InvalidVersion {
        path: "db/migrations/create_users".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidVersion);
    assert_eq!(ex_err.path(), Some("db/migrations/create_users"));
}
