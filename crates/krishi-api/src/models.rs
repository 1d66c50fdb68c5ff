//! Request and response shapes for the REST surface.
//!
//! Wrapped routes use a `{success, ...}` envelope. The notices route
//! intentionally returns a bare array instead — that inconsistency is part
//! of the published API shape and is preserved as-is.

use actix_web::HttpResponse;
use krishi_commons::User;
use krishi_core::messages::MessageView;
use krishi_core::CoreError;
use serde::{Deserialize, Serialize};

/// POST /v1/api/messages body.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub receiver: String,
    pub text: String,
}

/// Envelope for single-record responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// GET /v1/api/messages/{user_id} response.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub success: bool,
    pub count: usize,
    pub messages: Vec<MessageView>,
}

impl ConversationResponse {
    pub fn new(messages: Vec<MessageView>) -> Self {
        Self {
            success: true,
            count: messages.len(),
            messages,
        }
    }
}

/// Farmer directory response.
#[derive(Debug, Serialize)]
pub struct FarmersResponse {
    pub success: bool,
    pub count: usize,
    pub farmers: Vec<User>,
}

impl FarmersResponse {
    pub fn new(farmers: Vec<User>) -> Self {
        Self {
            success: true,
            count: farmers.len(),
            farmers,
        }
    }
}

/// Uniform failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Maps a core error onto the HTTP failure taxonomy.
///
/// Expected failures carry their message; unexpected ones are logged and
/// collapse to a generic server error.
pub fn error_response(err: CoreError) -> HttpResponse {
    match err {
        CoreError::Validation(msg) => HttpResponse::BadRequest().json(ErrorResponse::new(msg)),
        CoreError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse::new(msg)),
        CoreError::Conflict(msg) => HttpResponse::Conflict().json(ErrorResponse::new(msg)),
        CoreError::Storage(e) => {
            log::error!("storage failure: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Server Error"))
        }
        CoreError::Internal(e) => {
            log::error!("internal failure: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Server Error"))
        }
    }
}
