//! Fault boundary around chain execution.
//!
//! # Responsibilities
//! - Catch a handler panic once per request, at a single boundary
//! - Turn the panic payload into a [`Fault`] for the recover handler
//!
//! # Design Decisions
//! - Recovery is chain-wide; the boundary does not know which handler panicked
//! - The recover handler runs behind its own boundary, so a panicking recover
//!   handler still degrades to a plain 500

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::StatusCode;

use crate::dispatch::Context;

/// Replaceable handler invoked after a contained panic.
pub type RecoverHandler = Arc<dyn Fn(&mut Context, &Fault) + Send + Sync + 'static>;

/// A contained handler panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: String,
}

impl Fault {
    /// Extract a message from a panic payload.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler panicked: {}", self.message)
    }
}

/// Run `f`, converting a panic into a [`Fault`].
pub fn guard<T, F: FnOnce() -> T>(f: F) -> Result<T, Fault> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(Fault::from_payload)
}

/// Default recover handler: log, answer 500, drop any partial body.
pub fn default_recover(ctx: &mut Context, fault: &Fault) {
    tracing::error!(
        method = %ctx.method(),
        path = %ctx.path(),
        panic = %fault.message(),
        "Recovered from handler panic"
    );
    ctx.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    ctx.set_body(Vec::new());
}

/// Invoke `recover` behind its own boundary.
pub(crate) fn run_recover(recover: &RecoverHandler, ctx: &mut Context, fault: &Fault) {
    if let Err(nested) = guard(|| recover(ctx, fault)) {
        tracing::error!(
            path = %ctx.path(),
            panic = %nested.message(),
            "Recover handler panicked; falling back to default"
        );
        default_recover(ctx, fault);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Exchange;

    #[test]
    fn test_guard_passes_value_through() {
        assert_eq!(guard(|| 7), Ok(7));
    }

    #[test]
    fn test_guard_extracts_str_and_string_messages() {
        let fault = guard(|| panic!("boom")).unwrap_err();
        assert_eq!(fault.message(), "boom");

        let code = 3;
        let fault = guard(|| panic!("bad code {code}")).unwrap_err();
        assert_eq!(fault.message(), "bad code 3");

        let fault = guard(|| std::panic::panic_any(12u8)).unwrap_err();
        assert_eq!(fault.message(), "unknown panic");
    }

    #[test]
    fn test_default_recover_sets_500() {
        let mut ctx = Context::new(Exchange::default());
        ctx.set_body("partial");
        default_recover(&mut ctx, &Fault { message: "x".into() });
        assert_eq!(ctx.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(ctx.response_body().is_empty());
    }

    #[test]
    fn test_panicking_recover_handler_is_contained() {
        let recover: RecoverHandler =
            Arc::new(|_ctx: &mut Context, _fault: &Fault| panic!("recover failed"));
        let mut ctx = Context::new(Exchange::default());
        run_recover(&recover, &mut ctx, &Fault { message: "x".into() });
        assert_eq!(ctx.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
