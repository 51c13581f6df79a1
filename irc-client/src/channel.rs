//! A tracked channel: member set and per-member channel-user mode.
//!
//! Grounded on `libtiny_client::state::Chan`, extended with the nick→mode map the teacher never
//! builds — the teacher has no concept of channel-user privilege.

use std::collections::HashMap;

/// Canonical ownership of `User` records lives in the `Tracker`'s arena; a `Channel` stores only
/// nick keys (case-insensitive lowercased) and, for each, its current privilege mode character.
/// Membership is an insertion-ordered set: `order` carries join order (the same pattern
/// `User::channels` uses, a plain `Vec`), `modes` is the key -> mode lookup.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Name as the server cased it, e.g. `"#Rust"`.
    name: String,
    /// Lowercased nick keys in join order.
    order: Vec<String>,
    /// Lowercased nick -> highest channel-user prefix character currently held (if any).
    modes: HashMap<String, Option<char>>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Channel {
            name,
            order: Vec::new(),
            modes: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_member(&mut self, nick_key: &str) {
        if !self.modes.contains_key(nick_key) {
            self.modes.insert(nick_key.to_owned(), None);
            self.order.push(nick_key.to_owned());
        }
    }

    pub fn remove_member(&mut self, nick_key: &str) {
        if self.modes.remove(nick_key).is_some() {
            self.order.retain(|k| k != nick_key);
        }
    }

    pub fn has_member(&self, nick_key: &str) -> bool {
        self.modes.contains_key(nick_key)
    }

    /// Member keys in join order.
    pub fn member_keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn member_count(&self) -> usize {
        self.order.len()
    }

    pub fn mode(&self, nick_key: &str) -> Option<char> {
        self.modes.get(nick_key).copied().flatten()
    }

    pub fn set_mode(&mut self, nick_key: &str, mode: Option<char>) {
        if let Some(entry) = self.modes.get_mut(nick_key) {
            *entry = mode;
        }
    }

    /// Moves a member's entry (and mode), preserving its position, from `old_key` to `new_key`,
    /// e.g. on a NICK rename.
    pub fn rename_member(&mut self, old_key: &str, new_key: &str) {
        if let Some(mode) = self.modes.remove(old_key) {
            self.modes.insert(new_key.to_owned(), mode);
            if let Some(slot) = self.order.iter_mut().find(|k| k.as_str() == old_key) {
                *slot = new_key.to_owned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_query_member() {
        let mut c = Channel::new("#test".to_owned());
        c.add_member("alice");
        assert!(c.has_member("alice"));
        assert_eq!(c.mode("alice"), None);
    }

    #[test]
    fn set_and_read_mode() {
        let mut c = Channel::new("#test".to_owned());
        c.add_member("alice");
        c.set_mode("alice", Some('@'));
        assert_eq!(c.mode("alice"), Some('@'));
    }

    #[test]
    fn rename_member_carries_mode() {
        let mut c = Channel::new("#test".to_owned());
        c.add_member("alice");
        c.set_mode("alice", Some('@'));
        c.rename_member("alice", "bob");
        assert!(!c.has_member("alice"));
        assert_eq!(c.mode("bob"), Some('@'));
    }

    #[test]
    fn remove_member() {
        let mut c = Channel::new("#test".to_owned());
        c.add_member("alice");
        c.remove_member("alice");
        assert!(!c.has_member("alice"));
    }

    #[test]
    fn member_keys_preserve_join_order() {
        let mut c = Channel::new("#test".to_owned());
        c.add_member("carol");
        c.add_member("alice");
        c.add_member("bob");
        c.add_member("alice"); // re-join is a no-op, must not move carol/bob
        assert_eq!(
            c.member_keys().collect::<Vec<_>>(),
            vec!["carol", "alice", "bob"]
        );
    }

    #[test]
    fn rename_member_keeps_position() {
        let mut c = Channel::new("#test".to_owned());
        c.add_member("alice");
        c.add_member("bob");
        c.rename_member("alice", "alice2");
        assert_eq!(
            c.member_keys().collect::<Vec<_>>(),
            vec!["alice2", "bob"]
        );
    }
}
