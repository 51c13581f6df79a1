//! Turns one parsed line into state mutations and event callback invocations.
//!
//! Grounded on `libtiny_client::state::StateInner::update`'s `match` over `wire::Cmd` variants
//! (PING, JOIN, PART, QUIT, NICK, numeric replies), extended with every branch the teacher's
//! `update` does not implement (PRIVMSG/NOTICE/CTCP, KICK, MODE with channel-mode application,
//! TOPIC, INVITE, 332/333/352/353/495, WHOIS numerics). Channel mode Give/Take has no teacher
//! counterpart; grounded on `sid3xyz-slirc-proto::mode::parse::parse_modes`'s plus/minus-state
//! traversal and arg-consumption pattern.

use crate::error::EngineError;
use crate::events::*;
use crate::tracker::Tracker;
use irc_common::NickRef;
use irc_wire::message::split_nick_prefix;
use irc_wire::{commands, Cmd, Msg, ProtocolError};
use std::time::Instant;

/// Dispatches one parsed message. Lines to send back out (PONG, WHO, WHOIS resync) are appended
/// to `outbound`. Returns `Err` only for `ERROR` and malformed `MODE`/`005` lines; all other
/// unrecognized input is logged and ignored.
pub fn dispatch(
    tracker: &mut Tracker,
    events: &mut Events,
    now: Instant,
    msg: Msg,
    outbound: &mut Vec<String>,
) -> Result<(), EngineError> {
    let sender_nick = msg.pfx.as_ref().map(|p| p.nick().to_owned());

    if let Some(pfx) = &msg.pfx {
        tracker.upsert_from_prefix(pfx, now);
    }

    match msg.cmd {
        Cmd::Ping { arg } => {
            outbound.push(commands::pong(&arg));
        }

        Cmd::Pong { .. } => {}

        Cmd::Error { msg } => {
            return Err(EngineError::ServerError(msg));
        }

        Cmd::Privmsg {
            target,
            msg: text,
            is_notice,
            ctcp,
        } => {
            let nick = sender_nick.unwrap_or_default();
            let user = tracker.get_or_create_user(&nick, now).clone();

            match (is_notice, ctcp) {
                (false, Some(ctcp)) => {
                    events.fire_on_ctcp_query(CtcpEvent {
                        from: user,
                        target: target.as_str().to_owned(),
                        tag: ctcp.tag().to_owned(),
                        data: text,
                    });
                }
                (true, Some(ctcp)) => {
                    events.fire_on_ctcp_reply(CtcpEvent {
                        from: user,
                        target: target.as_str().to_owned(),
                        tag: ctcp.tag().to_owned(),
                        data: text,
                    });
                }
                (false, None) => {
                    events.fire_on_message(MessageEvent {
                        from: user,
                        target: target.as_str().to_owned(),
                        text,
                    });
                }
                (true, None) => {
                    events.fire_on_notice(MessageEvent {
                        from: user,
                        target: target.as_str().to_owned(),
                        text,
                    });
                }
            }
        }

        Cmd::Join { chan } => {
            let nick = sender_nick.unwrap_or_default();
            if tracker.is_self(&nick) {
                tracker.create_channel(&chan);
                tracker.add_to_channel(&chan, &nick, now);
                events.fire_on_successful_join(chan);
            } else {
                tracker.add_to_channel(&chan, &nick, now);
                let user = tracker.get_or_create_user(&nick, now).clone();
                events.fire_on_join(JoinEvent { user, chan });
            }
        }

        Cmd::Part { chan, msg: _ } => {
            let nick = sender_nick.unwrap_or_default();
            let user = tracker.get_or_create_user(&nick, now).clone();
            events.fire_on_part(PartEvent {
                user,
                chan: chan.clone(),
            });
            if tracker.is_self(&nick) {
                tracker.destroy_channel(&chan);
            } else {
                tracker.remove_from_channel(&chan, &nick);
            }
        }

        Cmd::Kick {
            chan,
            nick: kicked_nick,
            msg: reason,
        } => {
            let kicker_nick = sender_nick.unwrap_or_default();
            let kicker = tracker.get_or_create_user(&kicker_nick, now).clone();
            events.fire_on_kick(KickEvent {
                kicker,
                chan: chan.clone(),
                kicked_nick: kicked_nick.clone(),
                reason,
            });
            if tracker.is_self(&kicked_nick) {
                tracker.destroy_channel(&chan);
            } else {
                tracker.remove_from_channel(&chan, &kicked_nick);
            }
        }

        Cmd::Quit { msg: quit_msg } => {
            let nick = sender_nick.unwrap_or_default();
            let user = tracker.get_or_create_user(&nick, now).clone();
            events.fire_on_quit(QuitEvent {
                user,
                msg: quit_msg,
            });
            tracker.remove_from_all_channels(&nick);
        }

        Cmd::Nick { nick: new_nick } => {
            let old_nick = sender_nick.unwrap_or_default();
            let user = tracker.get_or_create_user(&old_nick, now).clone();
            events.fire_on_nick_change(NickChangeEvent {
                user,
                new_nick: new_nick.clone(),
            });
            tracker.rename_user(&old_nick, &new_nick);
        }

        Cmd::Mode {
            target,
            modestring,
            args,
        } => {
            let nick = sender_nick.unwrap_or_default();
            let user = tracker.get_or_create_user(&nick, now).clone();
            events.fire_on_mode(ModeEvent {
                user,
                target: target.clone(),
                modestring: modestring.clone(),
                args: args.clone(),
            });
            if target.starts_with('#') {
                apply_channel_mode(tracker, &target, &modestring, &args, outbound)?;
            }
        }

        Cmd::Topic { chan, topic } => {
            if let Some(topic) = topic {
                let nick = sender_nick.unwrap_or_default();
                let user = tracker.get_or_create_user(&nick, now).clone();
                events.fire_on_topic_change(TopicChangeEvent { user, chan, topic });
            }
        }

        Cmd::Invite {
            nick: invited_nick,
            chan,
        } => {
            let nick = sender_nick.unwrap_or_default();
            let from = tracker.get_or_create_user(&nick, now).clone();
            events.fire_on_invite(InviteEvent {
                from,
                invited_nick,
                chan,
            });
        }

        Cmd::Reply { num, params } => {
            dispatch_numeric(tracker, events, now, num, params, outbound)?;
        }

        Cmd::Other { cmd, .. } => {
            log::debug!("ignoring unrecognized command {}", cmd);
        }
    }

    Ok(())
}

fn dispatch_numeric(
    tracker: &mut Tracker,
    events: &mut Events,
    now: Instant,
    num: u16,
    params: Vec<String>,
    outbound: &mut Vec<String>,
) -> Result<(), EngineError> {
    match num {
        1 => {
            events.fire_on_connect(());
        }

        5 => {
            // params[0] is our own nick; the last param is a human-readable trailer.
            let tokens = if params.len() > 2 {
                &params[1..params.len() - 1]
            } else {
                &params[..]
            };
            for token in tokens {
                let (key, value) = match token.find('=') {
                    Some(i) => (&token[..i], Some(&token[i + 1..])),
                    None => (token.as_str(), None),
                };
                tracker.apply_isupport_token(key, value)?;
            }
        }

        332 => {
            if params.len() >= 2 {
                events.fire_on_topic(TopicEvent {
                    chan: params[1].clone(),
                    topic: params.get(2).cloned().unwrap_or_default(),
                });
            }
        }

        333 => {
            if params.len() >= 3 {
                events.fire_on_topic_info(TopicInfoEvent {
                    chan: params[1].clone(),
                    setter: params[2].clone(),
                    set_at: params.get(3).cloned().unwrap_or_default(),
                });
            }
        }

        352 => {
            // RPL_WHOREPLY: me chan user host server nick flags :hopcount realname
            if params.len() >= 8 {
                let chan = &params[1];
                let user = &params[2];
                let host = &params[3];
                let nick = &params[5];
                let flags = &params[6];
                let hopcount_realname = &params[7];
                let real_name = hopcount_realname
                    .find(' ')
                    .map(|i| &hopcount_realname[i + 1..])
                    .unwrap_or("");

                let u = tracker.get_or_create_user(nick, now);
                u.set_user(user.clone());
                u.set_host(host.clone());
                u.set_real_name(real_name.to_owned());

                let prefixes = tracker.network_info.channel_user_prefixes.clone();
                let prefix_char = flags.chars().find(|c| prefixes.contains(c));
                if let Some(pc) = prefix_char {
                    if let Some(channel) = tracker.get_channel_mut(chan) {
                        let key = NickRef::new(nick).normalized();
                        if channel.has_member(&key) {
                            channel.set_mode(&key, Some(pc));
                        }
                    }
                }
            }
        }

        353 => {
            // RPL_NAMREPLY: me sym chan :nick1 nick2 ...
            if params.len() >= 4 {
                let chan = params[2].clone();
                let mut nicks = Vec::new();
                for token in params[3].split_whitespace() {
                    let (prefix_char, bare_nick) = split_nick_prefix(token);
                    nicks.push(bare_nick.to_owned());
                    if !tracker.is_self(bare_nick) {
                        tracker.add_to_channel(&chan, bare_nick, now);
                    }
                    if let Some(pc) = prefix_char {
                        let key = NickRef::new(bare_nick).normalized();
                        if let Some(channel) = tracker.get_channel_mut(&chan) {
                            if channel.has_member(&key) {
                                channel.set_mode(&key, Some(pc));
                            }
                        }
                    }
                }
                events.fire_on_name_list(NameListEvent { chan, nicks });
            }
        }

        366 => {
            if params.len() >= 2 {
                let chan = params[1].clone();
                events.fire_on_name_list_end(chan.clone());
                outbound.push(commands::who(&chan));
            }
        }

        375 => {
            if let Some(p) = params.get(1) {
                events.fire_on_motd_start(p.clone());
            }
        }

        372 => {
            if let Some(p) = params.get(1) {
                events.fire_on_motd_line(p.clone());
            }
        }

        376 => {
            if let Some(p) = params.get(1) {
                events.fire_on_motd_end(p.clone());
            }
        }

        396 => {
            if let Some(host) = params.get(1) {
                tracker.self_user_mut().set_host(host.clone());
            }
        }

        433 => {
            if let Some(old_nick) = params.get(1) {
                if !events.fire_on_nick_in_use(old_nick) {
                    return Err(EngineError::NickInUseUnhandled);
                }
            }
        }

        311 => {
            // me nick user host * :real name
            if params.len() >= 6 {
                let nick = &params[1];
                let u = tracker.get_or_create_user(nick, now);
                u.set_user(params[2].clone());
                u.set_host(params[3].clone());
                u.set_real_name(params[5].clone());
                let user = tracker.get_or_create_user(nick, now).clone();
                events.fire_on_whois_reply(WhoisReplyEvent { user });
            }
        }

        312 => {
            // me nick server :server info
            if params.len() >= 4 {
                events.fire_on_whois_server_reply(WhoisServerReplyEvent {
                    nick: params[1].clone(),
                    server: params[2].clone(),
                    server_info: params[3].clone(),
                });
            }
        }

        313 => {
            // me nick :is an IRC operator
            if let Some(nick) = params.get(1) {
                events.fire_on_whois_operator_reply(WhoisOperatorReplyEvent { nick: nick.clone() });
            }
        }

        317 => {
            // me nick idle_seconds [signon] :seconds idle
            if params.len() >= 3 {
                if let Ok(idle_seconds) = params[2].parse::<u64>() {
                    events.fire_on_whois_idle_reply(WhoisIdleEvent {
                        nick: params[1].clone(),
                        idle_seconds,
                    });
                }
            }
        }

        318 => {
            // me nick :End of WHOIS list
            if let Some(nick) = params.get(1) {
                events.fire_on_whois_end(nick.clone());
            }
        }

        330 => {
            // me nick account :is logged in as
            if params.len() >= 3 {
                events.fire_on_whois_account_reply(WhoisAccountReplyEvent {
                    nick: params[1].clone(),
                    account: params[2].clone(),
                });
            }
        }

        307 => {
            // me nick :is a registered nick (no account name carried)
            if let Some(nick) = params.get(1) {
                events.fire_on_whois_account_reply(WhoisAccountReplyEvent {
                    nick: nick.clone(),
                    account: String::new(),
                });
            }
        }

        319 => {
            if params.len() >= 3 {
                let nick = params[1].clone();
                let channels: Vec<String> = params[2]
                    .split_whitespace()
                    .map(|s| split_nick_prefix(s).1.to_owned())
                    .collect();
                events.fire_on_whois_channels_reply(WhoisChannelsEvent { nick, channels });
            }
        }

        495 => {
            if params.len() >= 3 {
                let chan = params[1].clone();
                let reason = &params[2];
                let seconds = reason
                    .split_whitespace()
                    .find_map(|tok| tok.parse::<u32>().ok())
                    .unwrap_or(0);
                events.fire_on_join_too_soon(JoinTooSoonEvent { chan, seconds });
            }
        }

        _ => {
            log::debug!("ignoring numeric reply {}", num);
        }
    }

    Ok(())
}

/// Applies a `+`/`-` channel mode string to a channel's member privileges (SPEC_FULL.md §4.6).
fn apply_channel_mode(
    tracker: &mut Tracker,
    chan: &str,
    modestring: &str,
    args: &[String],
    outbound: &mut Vec<String>,
) -> Result<(), EngineError> {
    #[derive(Clone, Copy)]
    enum Op {
        Give,
        Take,
    }

    let user_modes = tracker.network_info.channel_user_modes.clone();
    let prefixes = tracker.network_info.channel_user_prefixes.clone();
    let chanmodes = tracker.network_info.chanmodes.clone();

    let mut op: Option<Op> = None;
    let mut args_iter = args.iter();

    for c in modestring.chars() {
        match c {
            '+' => op = Some(Op::Give),
            '-' => op = Some(Op::Take),
            c if user_modes.contains(&c) => {
                let op = op.ok_or_else(|| {
                    EngineError::ProtocolError(ProtocolError::MalformedLine(modestring.to_owned()))
                })?;
                let nick = match args_iter.next() {
                    Some(n) => n.clone(),
                    None => continue,
                };
                let idx = user_modes.iter().position(|&m| m == c).unwrap();
                let nick_key = NickRef::new(&nick).normalized();

                match op {
                    Op::Give => {
                        if let Some(channel) = tracker.get_channel_mut(chan) {
                            if channel.has_member(&nick_key) {
                                let current_idx = channel
                                    .mode(&nick_key)
                                    .and_then(|pc| prefixes.iter().position(|&p| p == pc));
                                let should_set = match current_idx {
                                    Some(ci) => idx < ci,
                                    None => true,
                                };
                                if should_set {
                                    channel.set_mode(&nick_key, Some(prefixes[idx]));
                                }
                            }
                        }
                    }
                    Op::Take => {
                        if let Some(channel) = tracker.get_channel_mut(chan) {
                            if channel.has_member(&nick_key) {
                                channel.set_mode(&nick_key, None);
                            }
                        }
                        outbound.push(commands::whois(&nick));
                    }
                }
            }
            c if chanmodes.list.contains(c) || chanmodes.always_param.contains(c) => {
                let _ = args_iter.next();
            }
            c if chanmodes.param_when_set.contains(c) => {
                if let Some(Op::Give) = op {
                    let _ = args_iter.next();
                }
            }
            _ => {}
        }
    }

    Ok(())
}
