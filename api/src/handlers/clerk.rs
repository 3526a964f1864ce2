//! `POST /api/webhooks/clerk`: keeps the `users` table in sync with Clerk.
//!
//! Verifies the Svix signature over the raw body, then applies at most one
//! statement per request depending on the event type.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    db::UserRepository,
    error::AppError,
    models::event::{ClerkEvent, DeletedPayload, UserPayload, WebhookEvent},
    models::user::UserProfile,
    svix::SvixHeaders,
    AppState,
};

#[instrument(skip_all, fields(svix_id = tracing::field::Empty))]
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let Some(svix_headers) = SvixHeaders::from_header_map(&headers) else {
        warn!("Request is missing svix headers");
        return Err(AppError::MissingHeaders);
    };
    tracing::Span::current().record("svix_id", svix_headers.id);

    if let Err(e) = state.webhook.verify(&body, &svix_headers) {
        warn!(error = %e, "Error verifying webhook");
        return Err(e.into());
    }

    let envelope: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Verified webhook body is not an event envelope");
        AppError::MalformedEvent(e.to_string())
    })?;
    let event_type = envelope.event_type.clone();
    let event = envelope.into_event().map_err(|e| {
        warn!(error = %e, event_type = %event_type, "Event data does not match its type");
        AppError::MalformedEvent(e.to_string())
    })?;

    match event {
        ClerkEvent::UserCreated(user) => {
            let profile = require_profile(&user)?;
            UserRepository::create(&state.db, &user.id, &profile, Utc::now())
                .await
                .map_err(|e| {
                    error!(error = %e, user_id = %user.id, "Error creating user in database");
                    AppError::persistence("creating user", e)
                })?;
            info!(user_id = %user.id, "User created in database");
        }
        ClerkEvent::UserUpdated(user) => {
            let profile = require_profile(&user)?;
            let rows = UserRepository::update(&state.db, &user.id, &profile, Utc::now())
                .await
                .map_err(|e| {
                    error!(error = %e, user_id = %user.id, "Error updating user in database");
                    AppError::persistence("updating user", e)
                })?;
            if rows == 0 {
                debug!(user_id = %user.id, "No local row for updated user");
            }
            info!(user_id = %user.id, "User updated in database");
        }
        ClerkEvent::UserDeleted(DeletedPayload { id: Some(id) }) => {
            let rows = UserRepository::delete(&state.db, &id).await.map_err(|e| {
                error!(error = %e, user_id = %id, "Error deleting user from database");
                AppError::persistence("deleting user", e)
            })?;
            info!(user_id = %id, rows, "User deleted from database");
        }
        ClerkEvent::UserDeleted(DeletedPayload { id: None }) => {
            warn!("user.deleted event has no user id");
            return Err(AppError::MalformedEvent("user.deleted without id".into()));
        }
        ClerkEvent::Other(event_type) => {
            debug!(event_type = %event_type, "Ignoring unhandled event type");
        }
    }

    Ok(StatusCode::OK)
}

fn require_profile(user: &UserPayload) -> Result<UserProfile, AppError> {
    user.profile().ok_or_else(|| {
        warn!(user_id = %user.id, "User event has no email address");
        AppError::MalformedEvent(format!("user {} has no email address", user.id))
    })
}
