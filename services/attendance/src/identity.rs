//! Caller identity forwarded by the chat front end.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;

pub const CHAT_ID_HEADER: &str = "x-rollcall-chat-id";

/// Stable chat id of the caller, taken from the `x-rollcall-chat-id` header.
///
/// Returns 401 if the header is absent or not an integer.
#[derive(Debug, Clone, Copy)]
pub struct ChatIdentity {
    pub chat_id: i64,
}

impl<S> FromRequestParts<S> for ChatIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Read the header synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let chat_id = parts
            .headers
            .get(CHAT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i64>().ok());

        async move {
            let chat_id = chat_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { chat_id })
        }
    }
}
