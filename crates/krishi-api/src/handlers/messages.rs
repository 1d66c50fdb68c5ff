//! Messaging handlers.
//!
//! POST /v1/api/messages - send a message (auth required)
//! GET  /v1/api/messages/{user_id} - conversation with a user (auth required)

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use krishi_commons::UserId;
use krishi_core::AppContext;

use super::caller_id;
use crate::models::{error_response, ConversationResponse, DataResponse, ErrorResponse, SendMessageRequest};

pub async fn send_message(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    body: web::Json<SendMessageRequest>,
) -> HttpResponse {
    let Some(sender) = caller_id(&req) else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("Not authorized to access this route"));
    };

    let receiver = match UserId::try_new(body.receiver.trim()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Please provide receiver and text"));
        }
    };

    match ctx.messages().send(sender, receiver, &body.text).await {
        Ok(view) => HttpResponse::Created().json(DataResponse::new(view)),
        Err(e) => error_response(e),
    }
}

pub async fn get_conversation(
    req: HttpRequest,
    ctx: web::Data<Arc<AppContext>>,
    path: web::Path<String>,
) -> HttpResponse {
    let Some(me) = caller_id(&req) else {
        return HttpResponse::Unauthorized()
            .json(ErrorResponse::new("Not authorized to access this route"));
    };

    let other = match UserId::try_new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string())),
    };

    match ctx.messages().conversation(me, other).await {
        Ok(messages) => HttpResponse::Ok().json(ConversationResponse::new(messages)),
        Err(e) => error_response(e),
    }
}
