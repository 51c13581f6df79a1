//! Owns the tracked users and channels, and the ISUPPORT-negotiated network info.
//!
//! Grounded on `libtiny_client::state::StateInner`, restructured so that `User`s are owned in one
//! arena (the teacher keeps bare nick strings per-channel instead of shared user objects — see
//! SPEC_FULL.md §3 "Ownership"). ISUPPORT parsing has no teacher counterpart and is grounded on
//! `sid3xyz-slirc-proto::isupport` (`PrefixSpec::parse`, `ChanModes::parse`).

use crate::channel::Channel;
use crate::error::EngineError;
use crate::user::User;
use irc_common::{ChanName, ChanNameRef, Nick, NickRef};
use irc_wire::isupport::{ChanModes, PrefixSpec};
use std::collections::HashMap;
use std::time::Instant;

/// Negotiated server capabilities that affect how mode strings and membership lists are
/// interpreted. Defaults match RFC 2812's assumed-safe values when the server sends no `005`.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    /// Channel-user mode characters, most privileged first (default `['o', 'v']`).
    pub channel_user_modes: Vec<char>,
    /// Display prefixes, index-aligned with `channel_user_modes` (default `['@', '+']`).
    pub channel_user_prefixes: Vec<char>,
    pub chanmodes: ChanModes,
    /// 0 means unlimited.
    pub max_nick_length: u32,
    pub network_name: Option<String>,
}

impl Default for NetworkInfo {
    fn default() -> Self {
        NetworkInfo {
            channel_user_modes: vec!['o', 'v'],
            channel_user_prefixes: vec!['@', '+'],
            chanmodes: ChanModes {
                list: "b".to_owned(),
                always_param: String::new(),
                param_when_set: String::new(),
                never_param: String::new(),
            },
            max_nick_length: 0,
            network_name: None,
        }
    }
}

impl NetworkInfo {
    /// Index of `c` in `channel_user_modes`, if it is a channel-user mode at all.
    pub fn mode_index(&self, c: char) -> Option<usize> {
        self.channel_user_modes.iter().position(|&m| m == c)
    }

    pub fn prefix_for_mode(&self, c: char) -> Option<char> {
        self.mode_index(c).map(|i| self.channel_user_prefixes[i])
    }
}

pub struct Tracker {
    self_user: User,
    /// Keyed case-insensitively (RFC 2812 casemap) via `Nick`'s `Hash`/`Eq`.
    users: HashMap<Nick, User>,
    /// Keyed case-insensitively via `ChanName`'s `Hash`/`Eq`; the `Channel` itself remembers the
    /// original casing.
    channels: HashMap<ChanName, Channel>,
    pub network_info: NetworkInfo,
}

impl Tracker {
    pub fn new(self_nick: Nick, now: Instant) -> Self {
        Tracker {
            self_user: User::new(self_nick, now),
            users: HashMap::new(),
            channels: HashMap::new(),
            network_info: NetworkInfo::default(),
        }
    }

    pub fn self_user(&self) -> &User {
        &self.self_user
    }

    pub fn self_user_mut(&mut self) -> &mut User {
        &mut self.self_user
    }

    pub fn is_self(&self, nick: &str) -> bool {
        self.self_user.nick().eq(NickRef::new(nick))
    }

    /// Drops all tracked channels and users and resets self's host, as on disconnect.
    pub fn reset(&mut self) {
        self.users.clear();
        self.channels.clear();
        self.self_user.set_host(String::new());
    }

    pub fn get_user(&self, nick: &str) -> Option<&User> {
        if self.is_self(nick) {
            Some(&self.self_user)
        } else {
            self.users.get(NickRef::new(nick))
        }
    }

    pub fn get_user_mut(&mut self, nick: &str) -> Option<&mut User> {
        if self.is_self(nick) {
            Some(&mut self.self_user)
        } else {
            self.users.get_mut(NickRef::new(nick))
        }
    }

    /// Looks up a tracked user by nick, creating an empty record (identity only) if none exists
    /// yet. Refreshes `last_action_time` on every call, including lookups of an existing user, so
    /// idle tracking reflects the most recent sighting rather than just user creation. Never
    /// creates a duplicate of self.
    pub fn get_or_create_user(&mut self, nick: &str, now: Instant) -> &mut User {
        if self.is_self(nick) {
            return &mut self.self_user;
        }
        let user = self
            .users
            .entry(Nick::new(nick.to_owned()))
            .or_insert_with(|| User::new(Nick::new(nick.to_owned()), now));
        user.reset_action_time(now);
        user
    }

    /// Patches richer prefix fields (user/host) onto an existing or freshly created user.
    pub fn upsert_from_prefix(&mut self, pfx: &irc_wire::Pfx, now: Instant) {
        if let irc_wire::Pfx::User { nick, user, host } = pfx {
            let u = self.get_or_create_user(nick, now);
            if !user.is_empty() {
                u.set_user(user.clone());
            }
            if !host.is_empty() {
                u.set_host(host.clone());
            }
        }
    }

    pub fn get_channel(&self, chan: &str) -> Option<&Channel> {
        self.channels.get(ChanNameRef::new(chan))
    }

    pub fn get_channel_mut(&mut self, chan: &str) -> Option<&mut Channel> {
        self.channels.get_mut(ChanNameRef::new(chan))
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.values().map(|c| c.name())
    }

    /// Creates the channel if it doesn't already exist (self just joined it).
    pub fn create_channel(&mut self, chan: &str) {
        self.channels
            .entry(ChanName::new(chan.to_owned()))
            .or_insert_with(|| Channel::new(chan.to_owned()));
    }

    pub fn destroy_channel(&mut self, chan: &str) {
        self.channels.remove(ChanNameRef::new(chan));
    }

    /// Tracks `nick` as a member of `chan`, creating the user record if needed. Keeps the user's
    /// channel set and the channel's member set in lockstep (the tracker-consistency invariant).
    pub fn add_to_channel(&mut self, chan: &str, nick: &str, now: Instant) {
        let nick_key = NickRef::new(nick).normalized();
        if let Some(channel) = self.channels.get_mut(ChanNameRef::new(chan)) {
            channel.add_member(&nick_key);
        }
        if !self.is_self(nick) {
            let u = self.get_or_create_user(nick, now);
            u.add_channel(chan);
        }
    }

    /// Removes `nick` from `chan`'s membership and from the user's channel set. Destroys the
    /// user record entirely if it now belongs to no tracked channel.
    pub fn remove_from_channel(&mut self, chan: &str, nick: &str) {
        let nick_key = NickRef::new(nick).normalized();
        if let Some(channel) = self.channels.get_mut(ChanNameRef::new(chan)) {
            channel.remove_member(&nick_key);
        }
        if !self.is_self(nick) {
            if let Some(u) = self.users.get_mut(NickRef::new(nick)) {
                u.remove_channel(chan);
                if u.channels().is_empty() {
                    self.users.remove(NickRef::new(nick));
                }
            }
        }
    }

    /// Removes `nick` from every channel it is tracked in (QUIT).
    pub fn remove_from_all_channels(&mut self, nick: &str) -> Vec<String> {
        let nick_key = NickRef::new(nick).normalized();
        let mut left = Vec::new();
        for channel in self.channels.values_mut() {
            if channel.has_member(&nick_key) {
                channel.remove_member(&nick_key);
                left.push(channel.name().to_owned());
            }
        }
        self.users.remove(NickRef::new(nick));
        left
    }

    /// Renames a tracked user across every channel it appears in, carrying its mode. Per the
    /// specification's merge resolution: if the new nick collides with an already-tracked user,
    /// that user's fields are kept and the old entry is merged into it rather than rejected.
    pub fn rename_user(&mut self, old_nick: &str, new_nick: &str) {
        if self.is_self(old_nick) {
            self.self_user.set_nick(Nick::new(new_nick.to_owned()));
            return;
        }

        let old_key = NickRef::new(old_nick).normalized();
        let new_key = NickRef::new(new_nick).normalized();

        for channel in self.channels.values_mut() {
            if channel.has_member(&old_key) {
                channel.rename_member(&old_key, &new_key);
            }
        }

        if let Some(mut u) = self.users.remove(NickRef::new(old_nick)) {
            u.set_nick(Nick::new(new_nick.to_owned()));
            if let Some(existing) = self.users.get_mut(NickRef::new(new_nick)) {
                if !u.user().is_empty() {
                    existing.set_user(u.user().to_owned());
                }
                if !u.host().is_empty() {
                    existing.set_host(u.host().to_owned());
                }
                for chan in u.channels() {
                    existing.add_channel(chan);
                }
            } else {
                self.users.insert(Nick::new(new_nick.to_owned()), u);
            }
        }
    }

    /// Applies one `005 RPL_BOUNCE` token (`KEY` or `KEY=VALUE`).
    pub fn apply_isupport_token(&mut self, key: &str, value: Option<&str>) -> Result<(), EngineError> {
        match key.to_ascii_uppercase().as_str() {
            "PREFIX" => {
                if let Some(value) = value {
                    if value.is_empty() {
                        return Ok(());
                    }
                    let spec = PrefixSpec::parse(value)?;
                    self.network_info.channel_user_modes = spec.modes.chars().collect();
                    self.network_info.channel_user_prefixes = spec.prefixes.chars().collect();
                }
            }
            "CHANMODES" => {
                if let Some(value) = value {
                    self.network_info.chanmodes = ChanModes::parse(value)?;
                }
            }
            "NICKLEN" => {
                if let Some(value) = value {
                    if let Ok(n) = value.parse() {
                        self.network_info.max_nick_length = n;
                    }
                }
            }
            "NETWORK" => {
                if let Some(value) = value {
                    self.network_info.network_name = Some(value.to_owned());
                }
            }
            _ => {}
        }
        Ok(())
    }
}
