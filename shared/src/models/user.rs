//! Actor attribution models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user who triggered a transaction, as stored on audit records.
/// The name is resolved at read time and may be absent if the account
/// was removed from the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
