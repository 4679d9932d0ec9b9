//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ai;
pub mod budget;
pub mod expenses;
pub mod health;

// Re-export all handlers for use in router
pub use ai::*;
pub use budget::*;
pub use expenses::*;
pub use health::*;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::AppError;

/// Fallback for methods a route does not serve
///
/// `OPTIONS` always succeeds so bare preflight probes get a 200.
pub async fn method_not_allowed(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        AppError::method_not_allowed().into_response()
    }
}
