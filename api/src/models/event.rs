//! Clerk webhook event envelope.
//!
//! Only the user lifecycle events are typed; every other event type is
//! carried through as [`ClerkEvent::Other`] and ignored by the handler.

use serde::Deserialize;
use serde_json::Value;

use super::user::UserProfile;

pub const USER_CREATED: &str = "user.created";
pub const USER_UPDATED: &str = "user.updated";
pub const USER_DELETED: &str = "user.deleted";

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug)]
pub enum ClerkEvent {
    UserCreated(UserPayload),
    UserUpdated(UserPayload),
    UserDeleted(DeletedPayload),
    Other(String),
}

impl WebhookEvent {
    /// Decodes `data` according to `type`.
    pub fn into_event(self) -> Result<ClerkEvent, serde_json::Error> {
        let event = match self.event_type.as_str() {
            USER_CREATED => ClerkEvent::UserCreated(serde_json::from_value(self.data)?),
            USER_UPDATED => ClerkEvent::UserUpdated(serde_json::from_value(self.data)?),
            USER_DELETED => ClerkEvent::UserDeleted(serde_json::from_value(self.data)?),
            _ => ClerkEvent::Other(self.event_type),
        };
        Ok(event)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// `data` of `user.created` and `user.updated`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl UserPayload {
    /// Builds the stored profile. `None` when the user has no email address.
    ///
    /// The email is taken from the first entry; empty optional strings
    /// are stored as NULL.
    pub fn profile(&self) -> Option<UserProfile> {
        let email = self.email_addresses.first()?.email_address.clone();

        Some(UserProfile {
            email,
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            image_url: non_empty(&self.image_url),
        })
    }
}

/// `data` of `user.deleted`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedPayload {
    pub id: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> ClerkEvent {
        serde_json::from_value::<WebhookEvent>(value)
            .unwrap()
            .into_event()
            .unwrap()
    }

    #[test]
    fn user_created_uses_first_email_and_nulls_blanks() {
        let event = parse(json!({
            "object": "event",
            "type": "user.created",
            "data": {
                "id": "user_1",
                "email_addresses": [
                    { "id": "idn_1", "email_address": "a@example.com" },
                    { "id": "idn_2", "email_address": "b@example.com" }
                ],
                "first_name": "Ada",
                "last_name": "",
                "image_url": null
            }
        }));

        let ClerkEvent::UserCreated(user) = event else {
            panic!("expected user.created");
        };
        assert_eq!(user.id, "user_1");
        assert_eq!(
            user.profile().unwrap(),
            UserProfile {
                email: "a@example.com".into(),
                first_name: Some("Ada".into()),
                last_name: None,
                image_url: None,
            }
        );
    }

    #[test]
    fn user_without_email_has_no_profile() {
        let event = parse(json!({
            "type": "user.updated",
            "data": { "id": "user_1", "email_addresses": [] }
        }));

        let ClerkEvent::UserUpdated(user) = event else {
            panic!("expected user.updated");
        };
        assert!(user.profile().is_none());
    }

    #[test]
    fn user_deleted_id_is_optional() {
        let event = parse(json!({
            "type": "user.deleted",
            "data": { "id": "user_1", "deleted": true, "object": "user" }
        }));
        let ClerkEvent::UserDeleted(deleted) = event else {
            panic!("expected user.deleted");
        };
        assert_eq!(deleted.id.as_deref(), Some("user_1"));

        let event = parse(json!({ "type": "user.deleted", "data": { "deleted": true } }));
        assert!(matches!(event, ClerkEvent::UserDeleted(DeletedPayload { id: None })));
    }

    #[test]
    fn unknown_types_are_not_decoded() {
        let event = parse(json!({
            "type": "session.created",
            "data": { "anything": ["goes", 1] }
        }));
        assert!(matches!(event, ClerkEvent::Other(ref t) if t == "session.created"));
    }

    #[test]
    fn user_payload_without_id_is_an_error() {
        let envelope: WebhookEvent = serde_json::from_value(json!({
            "type": "user.created",
            "data": { "email_addresses": [] }
        }))
        .unwrap();
        assert!(envelope.into_event().is_err());
    }
}
