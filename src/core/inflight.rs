use std::sync::Arc;

use dashmap::DashSet;

/// Registry of operations currently running, keyed by operation name and owner.
///
/// A second acquire for a key that is still held is refused instead of letting
/// two calls race on the same list state.
#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<DashSet<String>>,
}

/// Held for the duration of one operation; releases its key on drop.
pub struct InFlightToken {
    key: String,
    keys: Arc<DashSet<String>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, key: &str) -> Option<InFlightToken> {
        if !self.keys.insert(key.to_string()) {
            return None;
        }
        Some(InFlightToken {
            key: key.to_string(),
            keys: self.keys.clone(),
        })
    }
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}

/// Key used by the facades: `{operation}:{user id or "anonymous"}`.
pub fn operation_key(operation: &str, owner: Option<&uuid::Uuid>) -> String {
    match owner {
        Some(id) => format!("{}:{}", operation, id),
        None => format!("{}:anonymous", operation),
    }
}
