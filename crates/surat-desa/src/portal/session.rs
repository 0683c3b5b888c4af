use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accounts::{User, UserId};
use super::letters::{LetterRequestId, LetterType};

/// Opaque bearer token identifying a login session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-login state carried between the steps of the letter request wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub letter_type: Option<LetterType>,
    pub draft: Option<serde_json::Value>,
    pub last_request_id: Option<LetterRequestId>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            letter_type: None,
            draft: None,
            last_request_id: None,
        }
    }
}

/// A resolved session: the token, the account behind it and its wizard state.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SessionToken,
    pub user: User,
    pub session: Session,
}
