//! Task-local trace id for the request currently being served.
//!
//! `RequestTrace` opens the scope; error responses and security logs read it
//! back so a client-visible `trace_id` always matches the server logs.

use std::cell::RefCell;
use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

pub const TRACE_HEADER: &str = "x-trace-id";

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Fresh id for a request that arrived without one.
pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current trace id, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_outside_scope() {
        assert_eq!(trace_id(), "unknown");
    }

    #[tokio::test]
    async fn test_scope_is_visible_and_restored() {
        let id = new_trace_id();
        let seen = with_trace_id(id.clone(), async { trace_id() }).await;
        assert_eq!(seen, id);
        assert_eq!(trace_id(), "unknown");
    }

    #[test]
    fn test_new_trace_ids_are_distinct_uuids() {
        let a = new_trace_id();
        let b = new_trace_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
