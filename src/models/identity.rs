use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const GUEST_NAME: &str = "Guest";

/// The user record as exposed by the host platform's unauthenticated-safe
/// init data.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct HostUser {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// Who is using the mini app. Fixed for the lifetime of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub id: Option<i64>,
    pub display_name: String,
}

impl Identity {
    pub fn guest() -> Self {
        Self {
            id: None,
            display_name: GUEST_NAME.to_string(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }

    pub fn require_id(&self) -> Result<i64, ClientError> {
        self.id.ok_or(ClientError::Unauthenticated)
    }
}
