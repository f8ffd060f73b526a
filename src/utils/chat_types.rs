// This file contains the chat record and its in-memory store.
#![forbid(unsafe_code)]

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::errors::ChatError;

// ---------------------------------------------------------------------------
// ChatRecord:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: i32,
    pub message: String,
    #[serde(rename = "IsRead")]
    pub is_read: bool,
}

impl ChatRecord {
    pub fn new(id: i32, message: &str, is_read: bool) -> Self {
        ChatRecord { id, message: message.to_string(), is_read }
    }
}

// ---------------------------------------------------------------------------
// ChatStore:
// ---------------------------------------------------------------------------
/** The fixed, ordered collection of chat records.  A store is built once at
 * startup and never mutated afterwards, so concurrent requests share it
 * without locking.
 */
#[derive(Debug, Clone)]
pub struct ChatStore {
    chats: Vec<ChatRecord>,
}

impl ChatStore {
    /// Build a store, rejecting any collection in which an id repeats.
    pub fn new(chats: Vec<ChatRecord>) -> Result<Self, ChatError> {
        let mut seen = HashSet::with_capacity(chats.len());
        for chat in &chats {
            if !seen.insert(chat.id) {
                return Err(ChatError::DuplicateId(chat.id));
            }
        }
        Ok(ChatStore { chats })
    }

    /// The records every server instance starts with.
    pub fn seeded() -> Result<Self, ChatError> {
        Self::new(vec![
            ChatRecord::new(0, "Chat-1!", false),
            ChatRecord::new(1, "Chat-2", true),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatRecord> {
        self.chats.iter()
    }

    // -----------------------------------------------------------------------
    // lookup:
    // -----------------------------------------------------------------------
    /** Resolve the raw path token to a chat record.  The token must parse
     * as a signed 32-bit integer; malformed input is rejected rather than
     * defaulted.  Records are matched by value using a linear scan in
     * storage order, so no relationship between id and position is assumed.
     */
    pub fn lookup(&self, raw_id: &str) -> Result<&ChatRecord, ChatError> {
        let id: i32 = raw_id.parse().map_err(|_| ChatError::Parse(raw_id.to_string()))?;
        self.chats
            .iter()
            .find(|c| c.id == id)
            .ok_or(ChatError::NotFound(id))
    }
}
