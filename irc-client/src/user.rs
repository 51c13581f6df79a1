//! A tracked user: identity, channel membership, and idle time.
//!
//! Grounded on `libtiny_client::state`'s per-user bookkeeping (nick/channel membership tracked on
//! `Chan`/`StateInner`), generalized into its own owned record — the teacher keeps only bare nick
//! `String`s in a `HashSet`, never a user/host/real/idle record.

use irc_common::Nick;
use std::time::{Duration, Instant};

/// A user visible somewhere on the network: either the local client (self) or a peer.
#[derive(Debug, Clone)]
pub struct User {
    nick: Nick,
    user: String,
    host: String,
    real_name: String,
    /// Channel names (as the server cased them) this user has been observed in.
    channels: Vec<String>,
    last_action_time: Instant,
}

impl User {
    pub fn new(nick: Nick, now: Instant) -> Self {
        User {
            nick,
            user: String::new(),
            host: String::new(),
            real_name: String::new(),
            channels: Vec::new(),
            last_action_time: now,
        }
    }

    pub fn nick(&self) -> &Nick {
        &self.nick
    }

    pub fn set_nick(&mut self, nick: Nick) {
        self.nick = nick;
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn set_user(&mut self, user: String) {
        self.user = user;
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: String) {
        self.host = host;
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn set_real_name(&mut self, real_name: String) {
        self.real_name = real_name;
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn add_channel(&mut self, chan: &str) {
        if !self
            .channels
            .iter()
            .any(|c| c.eq_ignore_ascii_case(chan))
        {
            self.channels.push(chan.to_owned());
        }
    }

    pub fn remove_channel(&mut self, chan: &str) {
        self.channels.retain(|c| !c.eq_ignore_ascii_case(chan));
    }

    pub fn reset_action_time(&mut self, now: Instant) {
        self.last_action_time = now;
    }

    pub fn is_idle(&self, now: Instant, d: Duration) -> bool {
        now.saturating_duration_since(self.last_action_time) >= d
    }

    pub fn idle_time(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_action_time)
    }

    /// `"nick!user@host"`.
    pub fn to_mask_string(&self) -> String {
        format!("{}!{}@{}", self.nick.display(), self.user, self.host)
    }

    /// Partitions a raw IRC prefix at `!` (nick) and `@` (user, host). Missing pieces become
    /// empty strings. A prefix with no `!` is a bare server name.
    pub fn from_prefix(s: &str, now: Instant) -> User {
        let (nick, user, host) = match s.find('!') {
            None => (s.to_owned(), String::new(), String::new()),
            Some(excl_idx) => {
                let nick = s[..excl_idx].to_owned();
                let rest = &s[excl_idx + 1..];
                match rest.find('@') {
                    Some(at_idx) => (nick, rest[..at_idx].to_owned(), rest[at_idx + 1..].to_owned()),
                    None => (nick, rest.to_owned(), String::new()),
                }
            }
        };

        User {
            nick: Nick::new(nick),
            user,
            host,
            real_name: String::new(),
            channels: Vec::new(),
            last_action_time: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_prefix_full() {
        let now = Instant::now();
        let u = User::from_prefix("nick!user@host", now);
        assert_eq!(u.to_mask_string(), "nick!user@host");
    }

    #[test]
    fn from_prefix_bare_server() {
        let now = Instant::now();
        let u = User::from_prefix("irc.server.net", now);
        assert_eq!(u.nick().display(), "irc.server.net");
        assert_eq!(u.user(), "");
        assert_eq!(u.host(), "");
    }

    #[test]
    fn channel_add_is_idempotent_case_insensitively() {
        let now = Instant::now();
        let mut u = User::new(Nick::new("a".to_owned()), now);
        u.add_channel("#Rust");
        u.add_channel("#rust");
        assert_eq!(u.channels(), &["#Rust".to_owned()]);
    }

    #[test]
    fn idle_detection() {
        let now = Instant::now();
        let u = User::new(Nick::new("a".to_owned()), now);
        assert!(!u.is_idle(now, Duration::from_secs(30)));
        let later = now + Duration::from_secs(31);
        assert!(u.is_idle(later, Duration::from_secs(30)));
    }
}
