//! Presence registry: which user identity currently holds which live connection.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Opaque user identifier, supplied by the client on `add-user`.
pub type UserId = String;
/// Opaque connection identifier, assigned by the hub at upgrade time.
pub type ConnectionId = String;

/// Process-wide map of online users.
///
/// At most one connection per user; a re-registration overwrites the previous
/// mapping. State is memory-resident only and empty at process start.
#[derive(Default)]
pub struct PresenceRegistry {
    online: RwLock<HashMap<UserId, ConnectionId>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the mapping for `user_id`.
    pub fn set(&self, user_id: impl Into<UserId>, connection_id: impl Into<ConnectionId>) {
        self.online.write().insert(user_id.into(), connection_id.into());
    }

    /// Delete the mapping for `user_id`. No-op when absent.
    pub fn remove(&self, user_id: &str) {
        self.online.write().remove(user_id);
    }

    pub fn lookup(&self, user_id: &str) -> Option<ConnectionId> {
        self.online.read().get(user_id).cloned()
    }

    /// Point-in-time copy of all registered user ids. Ordering is unspecified.
    pub fn snapshot(&self) -> Vec<UserId> {
        self.online.read().keys().cloned().collect()
    }

    /// Remove every entry mapped to `connection_id` and return the affected
    /// users. Used for cleanup when a transport closes without a `signout`.
    pub fn remove_connection(&self, connection_id: &str) -> Vec<UserId> {
        let mut online = self.online.write();
        let stale: Vec<UserId> = online
            .iter()
            .filter(|(_, conn)| conn.as_str() == connection_id)
            .map(|(user, _)| user.clone())
            .collect();
        for user in &stale {
            online.remove(user);
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_tracks_last_set() {
        let registry = PresenceRegistry::new();
        registry.set("alice", "s1");
        assert_eq!(registry.lookup("alice").as_deref(), Some("s1"));

        registry.set("alice", "s2");
        assert_eq!(registry.lookup("alice").as_deref(), Some("s2"));

        registry.remove("alice");
        assert_eq!(registry.lookup("alice"), None);
    }

    #[test]
    fn remove_absent_key_is_idempotent() {
        let registry = PresenceRegistry::new();
        registry.remove("ghost");
        registry.remove("ghost");
        assert_eq!(registry.lookup("ghost"), None);
    }

    #[test]
    fn snapshot_contains_all_registered_users() {
        let registry = PresenceRegistry::new();
        registry.set("alice", "s1");
        registry.set("bob", "s2");

        let mut snapshot = registry.snapshot();
        snapshot.sort();
        assert_eq!(snapshot, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn remove_connection_clears_only_matching_entries() {
        let registry = PresenceRegistry::new();
        registry.set("alice", "s1");
        registry.set("bob", "s2");

        let stale = registry.remove_connection("s1");
        assert_eq!(stale, vec!["alice".to_string()]);
        assert_eq!(registry.lookup("alice"), None);
        assert_eq!(registry.lookup("bob").as_deref(), Some("s2"));

        assert!(registry.remove_connection("s1").is_empty());
    }
}
