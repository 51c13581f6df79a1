//! The event surface: one ordered, typed callback list per event kind.
//!
//! Grounded on `libtiny_client::Event` (the teacher's single `mpsc::Sender<Event>` channel),
//! generalized into N narrow sinks — static typing forecloses one generic registry serving
//! callback signatures that differ per event (see SPEC_FULL.md §4.7).

use crate::user::User;
use std::panic::{catch_unwind, AssertUnwindSafe};

type Cb<A> = Box<dyn FnMut(A) + 'static>;

macro_rules! event_list {
    ($field:ident, $register:ident, $fire:ident, $arg:ty) => {
        pub fn $register(&mut self, cb: impl FnMut($arg) + 'static) {
            self.$field.push(Box::new(cb));
        }

        pub(crate) fn $fire(&mut self, arg: $arg)
        where
            $arg: Clone,
        {
            for cb in self.$field.iter_mut() {
                cb(arg.clone());
            }
        }
    };
}

/// A message sent or received over a channel or privately.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub from: User,
    pub target: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CtcpEvent {
    pub from: User,
    pub target: String,
    pub tag: String,
    pub data: String,
}

#[derive(Debug, Clone)]
pub struct JoinEvent {
    pub user: User,
    pub chan: String,
}

#[derive(Debug, Clone)]
pub struct PartEvent {
    pub user: User,
    pub chan: String,
}

#[derive(Debug, Clone)]
pub struct QuitEvent {
    pub user: User,
    pub msg: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KickEvent {
    pub kicker: User,
    pub chan: String,
    pub kicked_nick: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ModeEvent {
    pub user: User,
    pub target: String,
    pub modestring: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NickChangeEvent {
    pub user: User,
    pub new_nick: String,
}

#[derive(Debug, Clone)]
pub struct InviteEvent {
    pub from: User,
    pub invited_nick: String,
    pub chan: String,
}

#[derive(Debug, Clone)]
pub struct TopicEvent {
    pub chan: String,
    pub topic: String,
}

#[derive(Debug, Clone)]
pub struct TopicChangeEvent {
    pub user: User,
    pub chan: String,
    pub topic: String,
}

#[derive(Debug, Clone)]
pub struct TopicInfoEvent {
    pub chan: String,
    pub setter: String,
    pub set_at: String,
}

#[derive(Debug, Clone)]
pub struct JoinTooSoonEvent {
    pub chan: String,
    pub seconds: u32,
}

#[derive(Debug, Clone)]
pub struct WhoisReplyEvent {
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct WhoisServerReplyEvent {
    pub nick: String,
    pub server: String,
    pub server_info: String,
}

#[derive(Debug, Clone)]
pub struct WhoisOperatorReplyEvent {
    pub nick: String,
}

#[derive(Debug, Clone)]
pub struct WhoisIdleEvent {
    pub nick: String,
    pub idle_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct WhoisAccountReplyEvent {
    pub nick: String,
    pub account: String,
}

#[derive(Debug, Clone)]
pub struct WhoisChannelsEvent {
    pub nick: String,
    pub channels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NameListEvent {
    pub chan: String,
    pub nicks: Vec<String>,
}

/// Owns one typed callback list per event kind. `fire_*` methods invoke callbacks in registration
/// order; only `onNickInUse` short-circuits on a `true` return and swallows a panicking callback.
#[derive(Default)]
pub struct Events {
    on_connect: Vec<Cb<()>>,
    on_message: Vec<Cb<MessageEvent>>,
    on_notice: Vec<Cb<MessageEvent>>,
    on_ctcp_query: Vec<Cb<CtcpEvent>>,
    on_ctcp_reply: Vec<Cb<CtcpEvent>>,
    on_join: Vec<Cb<JoinEvent>>,
    on_successful_join: Vec<Cb<String>>,
    on_join_too_soon: Vec<Cb<JoinTooSoonEvent>>,
    on_part: Vec<Cb<PartEvent>>,
    on_quit: Vec<Cb<QuitEvent>>,
    on_kick: Vec<Cb<KickEvent>>,
    on_mode: Vec<Cb<ModeEvent>>,
    on_nick_change: Vec<Cb<NickChangeEvent>>,
    on_nick_in_use: Vec<Box<dyn FnMut(&str) -> bool + 'static>>,
    on_invite: Vec<Cb<InviteEvent>>,
    on_motd_start: Vec<Cb<String>>,
    on_motd_line: Vec<Cb<String>>,
    on_motd_end: Vec<Cb<String>>,
    on_name_list: Vec<Cb<NameListEvent>>,
    on_name_list_end: Vec<Cb<String>>,
    on_topic: Vec<Cb<TopicEvent>>,
    on_topic_change: Vec<Cb<TopicChangeEvent>>,
    on_topic_info: Vec<Cb<TopicInfoEvent>>,
    on_whois_reply: Vec<Cb<WhoisReplyEvent>>,
    on_whois_server_reply: Vec<Cb<WhoisServerReplyEvent>>,
    on_whois_operator_reply: Vec<Cb<WhoisOperatorReplyEvent>>,
    on_whois_idle_reply: Vec<Cb<WhoisIdleEvent>>,
    on_whois_channels_reply: Vec<Cb<WhoisChannelsEvent>>,
    on_whois_account_reply: Vec<Cb<WhoisAccountReplyEvent>>,
    on_whois_end: Vec<Cb<String>>,
}

impl Events {
    pub fn new() -> Self {
        Events::default()
    }

    event_list!(on_connect, register_on_connect, fire_on_connect, ());
    event_list!(on_message, register_on_message, fire_on_message, MessageEvent);
    event_list!(on_notice, register_on_notice, fire_on_notice, MessageEvent);
    event_list!(on_ctcp_query, register_on_ctcp_query, fire_on_ctcp_query, CtcpEvent);
    event_list!(on_ctcp_reply, register_on_ctcp_reply, fire_on_ctcp_reply, CtcpEvent);
    event_list!(on_join, register_on_join, fire_on_join, JoinEvent);
    event_list!(
        on_successful_join,
        register_on_successful_join,
        fire_on_successful_join,
        String
    );
    event_list!(
        on_join_too_soon,
        register_on_join_too_soon,
        fire_on_join_too_soon,
        JoinTooSoonEvent
    );
    event_list!(on_part, register_on_part, fire_on_part, PartEvent);
    event_list!(on_quit, register_on_quit, fire_on_quit, QuitEvent);
    event_list!(on_kick, register_on_kick, fire_on_kick, KickEvent);
    event_list!(on_mode, register_on_mode, fire_on_mode, ModeEvent);
    event_list!(
        on_nick_change,
        register_on_nick_change,
        fire_on_nick_change,
        NickChangeEvent
    );
    event_list!(on_invite, register_on_invite, fire_on_invite, InviteEvent);
    event_list!(on_motd_start, register_on_motd_start, fire_on_motd_start, String);
    event_list!(on_motd_line, register_on_motd_line, fire_on_motd_line, String);
    event_list!(on_motd_end, register_on_motd_end, fire_on_motd_end, String);
    event_list!(on_name_list, register_on_name_list, fire_on_name_list, NameListEvent);
    event_list!(
        on_name_list_end,
        register_on_name_list_end,
        fire_on_name_list_end,
        String
    );
    event_list!(on_topic, register_on_topic, fire_on_topic, TopicEvent);
    event_list!(
        on_topic_change,
        register_on_topic_change,
        fire_on_topic_change,
        TopicChangeEvent
    );
    event_list!(
        on_topic_info,
        register_on_topic_info,
        fire_on_topic_info,
        TopicInfoEvent
    );
    event_list!(
        on_whois_reply,
        register_on_whois_reply,
        fire_on_whois_reply,
        WhoisReplyEvent
    );
    event_list!(
        on_whois_server_reply,
        register_on_whois_server_reply,
        fire_on_whois_server_reply,
        WhoisServerReplyEvent
    );
    event_list!(
        on_whois_operator_reply,
        register_on_whois_operator_reply,
        fire_on_whois_operator_reply,
        WhoisOperatorReplyEvent
    );
    event_list!(
        on_whois_idle_reply,
        register_on_whois_idle_reply,
        fire_on_whois_idle_reply,
        WhoisIdleEvent
    );
    event_list!(
        on_whois_channels_reply,
        register_on_whois_channels_reply,
        fire_on_whois_channels_reply,
        WhoisChannelsEvent
    );
    event_list!(
        on_whois_account_reply,
        register_on_whois_account_reply,
        fire_on_whois_account_reply,
        WhoisAccountReplyEvent
    );
    event_list!(on_whois_end, register_on_whois_end, fire_on_whois_end, String);

    pub fn register_on_nick_in_use(&mut self, cb: impl FnMut(&str) -> bool + 'static) {
        self.on_nick_in_use.push(Box::new(cb));
    }

    /// Invokes `onNickInUse` callbacks in order; stops at the first that returns `true`. A
    /// callback that panics is treated the same as a `false` return (not handled).
    pub(crate) fn fire_on_nick_in_use(&mut self, old_nick: &str) -> bool {
        for cb in self.on_nick_in_use.iter_mut() {
            let handled = catch_unwind(AssertUnwindSafe(|| cb(old_nick))).unwrap_or(false);
            if handled {
                return true;
            }
        }
        false
    }
}
