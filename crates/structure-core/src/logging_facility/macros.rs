//! Operation logging macros
//!
//! Store and engine operations bracket their work with a start event and
//! exactly one of end / end_error. All three expand through `__log_op!`, so
//! `component`, `op` and `event` are always present and spelled the same way.
//! Extra `key = value` fields (including `%`/`?` sigils) pass through to
//! `tracing`.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {{
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        );
    }};
}

/// Operation started
///
/// ```
/// # use structure_core::log_op_start;
/// log_op_start!("materialize_draft");
/// log_op_start!("materialize_draft", routine_name = "Upper/Lower");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op!(
            info,
            $op,
            $crate::structure_core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Operation committed after `duration_ms`
///
/// ```
/// # use structure_core::log_op_end;
/// log_op_end!("delete_routine_cascade", duration_ms = 3u64, workout_count = 2usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op!(
            info,
            $op,
            $crate::structure_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Operation failed after `duration_ms`
///
/// `$err` is a reference to an `ExError` or to anything that converts into
/// one, such as `StructureError`; its kind, code and message are logged.
///
/// ```
/// # use structure_core::{log_op_error, errors::{ExError, ExErrorKind}};
/// let err = ExError::new(ExErrorKind::NotFound).with_entity_id("PPL");
/// log_op_error!("set_current_routine", &err, duration_ms = 1u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = ::std::clone::Clone::clone($err).into();
        $crate::__log_op!(
            error,
            $op,
            $crate::structure_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            entity_id = ex_err.entity_id().unwrap_or_default()
            $(, $($field)*)?
        )
    }};
}
