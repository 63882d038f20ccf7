//! Request extractors

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

use crate::utils::AppError;

/// JSON body extractor whose rejection speaks the error envelope
///
/// axum's own `Json` rejection is a plain-text 422; routing it through
/// [`AppError`] keeps malformed bodies on the `{success:false,error}`
/// wire contract like every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
