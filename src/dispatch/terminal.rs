//! Default terminal handlers.

use axum::http::StatusCode;

use crate::dispatch::Context;

/// Default "route not found" handler: 404 with an empty body.
pub fn not_found(ctx: &mut Context) {
    ctx.set_status(StatusCode::NOT_FOUND);
}

/// Default "method not allowed" handler: 405, headers written by earlier middleware kept.
pub fn method_not_allowed(ctx: &mut Context) {
    ctx.set_status(StatusCode::METHOD_NOT_ALLOWED);
}
