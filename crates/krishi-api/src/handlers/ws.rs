//! Websocket endpoint for live message notifications.
//!
//! GET /v1/ws - upgrade to a websocket bound to the authenticated user
//!
//! The JWT is validated *before* the upgrade and the connection is bound to
//! the token's user id. There is no client-supplied "join" event: the
//! handshake is the join, so a connection can never claim another user's
//! room.
//!
//! Server → client frames are JSON `{"event": "newMessage", "data": ...}`.
//! Client text frames are ignored; ping/pong and close are honored.

use std::sync::Arc;

use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_ws::Message;
use futures_util::StreamExt;
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::sync::mpsc;

use krishi_commons::UserId;
use krishi_core::presence::{PresenceRegistry, ServerEvent};
use krishi_core::AppContext;

use crate::auth::JwtAuth;
use crate::models::ErrorResponse;

#[derive(Debug, Deserialize)]
struct WsQuery {
    token: Option<String>,
}

/// Resolves the caller's token from the `token` query parameter or the
/// Authorization header (browsers cannot set headers on websocket upgrades).
fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Ok(query) = web::Query::<WsQuery>::from_query(req.query_string()) {
        if let Some(token) = &query.token {
            if !token.is_empty() {
                return Some(token.clone());
            }
        }
    }
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| JwtAuth::bearer_token(h).ok())
        .map(str::to_string)
}

#[get("/ws")]
pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    ctx: web::Data<Arc<AppContext>>,
    jwt: web::Data<Arc<JwtAuth>>,
) -> Result<HttpResponse, Error> {
    let user_id = match extract_token(&req)
        .ok_or(crate::auth::JwtError::MissingToken)
        .and_then(|token| jwt.validate(&token))
        .and_then(|claims| claims.user_id())
    {
        Ok(id) => id,
        Err(e) => {
            warn!("websocket connection rejected: {}", e);
            return Ok(HttpResponse::Unauthorized()
                .json(ErrorResponse::new("Not authorized to access this route")));
        }
    };

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let presence = ctx.presence().clone();
    let nonce = presence.register(user_id.clone(), tx);
    info!("User {} connected", user_id);

    actix_web::rt::spawn(handle_socket(
        session, msg_stream, rx, presence, user_id, nonce,
    ));

    Ok(response)
}

/// Connection loop: forwards presence events to the socket and honors the
/// client's control frames until either side goes away.
async fn handle_socket(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    presence: Arc<PresenceRegistry>,
    user_id: UserId,
    nonce: u64,
) {
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("dropping undeliverable event for {}: {}", user_id, e);
                        continue;
                    }
                };
                if session.text(payload).await.is_err() {
                    break;
                }
            }
            frame = msg_stream.next() => {
                match frame {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        debug!("User {} sent close: {:?}", user_id, reason);
                        break;
                    }
                    // Client text/binary frames carry no protocol meaning
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    presence.unregister(&user_id, nonce);
    info!("User {} disconnected", user_id);
    let _ = session.close(None).await;
}
