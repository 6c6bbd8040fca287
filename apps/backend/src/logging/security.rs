use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A request was turned away by the session authenticator.
///
/// `kind` separates `token_expired` from `token_invalid` here even though
/// the client sees the same message for both.
pub fn auth_rejected(kind: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_AUTH_REJECTED",
        %trace_id,
        kind,
        path,
        "Session authentication rejected"
    );
}

/// Log a security-relevant login failure event.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email.unwrap_or("")),
        reason,
        "Authentication failure"
    );
}
