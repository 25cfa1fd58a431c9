//! Field keys and event names shared by the logging macros and the test
//! capture layer

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_ERR_CODE: &str = "err_code";

/// Operation began
pub const EVENT_START: &str = "start";

/// Operation committed
pub const EVENT_END: &str = "end";

/// Operation failed; nothing was committed
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        let events = [EVENT_START, EVENT_END, EVENT_END_ERROR];
        for (i, a) in events.iter().enumerate() {
            assert!(events[i + 1..].iter().all(|b| a != b));
        }
    }
}
