//! Line parser: tags / prefix / command / arguments.
//!
//! Grounded on `libtiny_wire::{parse_irc_msg, parse_pfx, parse_reply_num, parse_params}`; tag
//! handling has no teacher counterpart and is grounded on `sid3xyz-slirc-proto`'s message-tag
//! conventions (`;`-separated, no escape processing).

use crate::error::ProtocolError;
use std::str;

/// A single `key` or `key=value` IRCv3 message tag.
pub type Tag = (String, Option<String>);

/// Sender of a message.
///
/// `<prefix> ::= <servername> | <nick> [ '!' <user> ] [ '@' <host> ]`
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Pfx {
    Server(String),
    User {
        nick: String,
        user: String,
        host: String,
    },
}

impl Pfx {
    /// Partitions a raw prefix string at the first `!` (nick) and first `@` (user, host). A
    /// prefix with no `!` is a bare server name.
    pub fn parse(s: &str) -> Pfx {
        match s.find('!') {
            None => Pfx::Server(s.to_owned()),
            Some(excl_idx) => {
                let nick = &s[..excl_idx];
                let rest = &s[excl_idx + 1..];
                let (user, host) = match rest.find('@') {
                    Some(at_idx) => (&rest[..at_idx], &rest[at_idx + 1..]),
                    None => (rest, ""),
                };
                Pfx::User {
                    nick: nick.to_owned(),
                    user: user.to_owned(),
                    host: host.to_owned(),
                }
            }
        }
    }

    pub fn nick(&self) -> &str {
        match self {
            Pfx::Server(s) => s,
            Pfx::User { nick, .. } => nick,
        }
    }
}

/// Target of a PRIVMSG/NOTICE.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MsgTarget {
    Chan(String),
    User(String),
}

impl MsgTarget {
    pub fn from_str(s: &str) -> MsgTarget {
        if s.starts_with('#') {
            MsgTarget::Chan(s.to_owned())
        } else {
            MsgTarget::User(s.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MsgTarget::Chan(s) => s,
            MsgTarget::User(s) => s,
        }
    }
}

/// A client-to-client protocol message. See https://defs.ircdocs.horse/defs/ctcp.html
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Ctcp {
    Version,
    Action,
    Other(String),
}

impl Ctcp {
    pub fn parse(s: &str) -> Ctcp {
        match s {
            "VERSION" => Ctcp::Version,
            "ACTION" => Ctcp::Action,
            _ => Ctcp::Other(s.to_owned()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Ctcp::Version => "VERSION",
            Ctcp::Action => "ACTION",
            Ctcp::Other(s) => s,
        }
    }
}

/// An IRC command or numeric reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Cmd {
    Privmsg {
        target: MsgTarget,
        msg: String,
        is_notice: bool,
        ctcp: Option<Ctcp>,
    },

    Join {
        chan: String,
    },

    Part {
        chan: String,
        msg: Option<String>,
    },

    Quit {
        msg: Option<String>,
    },

    Nick {
        nick: String,
    },

    Ping {
        arg: String,
    },

    Pong {
        arg: String,
    },

    Error {
        msg: String,
    },

    Topic {
        chan: String,
        topic: Option<String>,
    },

    Kick {
        chan: String,
        nick: String,
        msg: Option<String>,
    },

    Mode {
        target: String,
        modestring: String,
        args: Vec<String>,
    },

    Invite {
        nick: String,
        chan: String,
    },

    /// An IRC command other than the ones listed above.
    Other {
        cmd: String,
        params: Vec<String>,
    },

    /// Numeric replies are kept generic; there are too many to enumerate and most code only
    /// cares about a handful of them.
    Reply {
        num: u16,
        params: Vec<String>,
    },
}

/// A fully parsed IRC line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Msg {
    pub tags: Vec<Tag>,
    pub pfx: Option<Pfx>,
    pub cmd: Cmd,
}

enum MsgType<'a> {
    Cmd(&'a str),
    Num(u16),
}

/// Parses one complete line (no CRLF) into a `Msg`.
pub fn parse_message(line: &str) -> Result<Msg, ProtocolError> {
    let (tags, rest) = parse_tags(line)?;

    let mut slice = rest;

    let pfx: Option<Pfx> = if let Some(stripped) = slice.strip_prefix(':') {
        let ws_idx = stripped
            .find(' ')
            .ok_or_else(|| ProtocolError::MalformedLine(line.to_owned()))?;
        let (pfx_str, rest) = stripped.split_at(ws_idx);
        slice = &rest[1..]; // drop the space
        Some(Pfx::parse(pfx_str))
    } else {
        None
    };

    let ws_idx = slice
        .find(' ')
        .unwrap_or_else(|| slice.len());
    let (cmd_str, rest) = slice.split_at(ws_idx);
    slice = rest.strip_prefix(' ').unwrap_or(rest);

    let msg_ty = match parse_reply_num(cmd_str) {
        Some(num) => MsgType::Num(num),
        None => MsgType::Cmd(cmd_str),
    };

    let params = parse_params(slice);

    let cmd = build_cmd(msg_ty, &params, line)?;

    Ok(Msg { tags, pfx, cmd })
}

fn parse_tags(line: &str) -> Result<(Vec<Tag>, &str), ProtocolError> {
    if let Some(stripped) = line.strip_prefix('@') {
        let space_idx = stripped.find(' ').ok_or(ProtocolError::MalformedTags)?;
        let (tag_block, rest) = stripped.split_at(space_idx);
        let rest = &rest[1..]; // drop the space
        let tags = tag_block
            .split(';')
            .filter(|s| !s.is_empty())
            .map(|kv| match kv.find('=') {
                Some(eq_idx) => (kv[..eq_idx].to_owned(), Some(kv[eq_idx + 1..].to_owned())),
                None => (kv.to_owned(), None),
            })
            .collect();
        Ok((tags, rest))
    } else {
        Ok((Vec::new(), line))
    }
}

fn build_cmd(msg_ty: MsgType, params: &[&str], line: &str) -> Result<Cmd, ProtocolError> {
    let malformed = || ProtocolError::MalformedLine(line.to_owned());

    Ok(match msg_ty {
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("PRIVMSG") || c.eq_ignore_ascii_case("NOTICE") => {
            if params.len() != 2 {
                return Err(malformed());
            }
            let is_notice = c.eq_ignore_ascii_case("NOTICE");
            let target = MsgTarget::from_str(params[0]);
            let mut msg = params[1];

            let mut ctcp: Option<Ctcp> = None;
            if !msg.is_empty() && msg.as_bytes()[0] == 0x01 {
                msg = &msg[1..];
                for (byte_idx, byte) in msg.as_bytes().iter().enumerate() {
                    if *byte == 0x01 {
                        ctcp = Some(Ctcp::parse(&msg[0..byte_idx]));
                        msg = &msg[byte_idx + 1..];
                        break;
                    } else if *byte == b' ' {
                        ctcp = Some(Ctcp::parse(&msg[0..byte_idx]));
                        msg = &msg[byte_idx + 1..];
                        if !msg.is_empty() && msg.as_bytes()[msg.len() - 1] == 0x01 {
                            msg = &msg[..msg.len() - 1];
                        }
                        break;
                    }
                }
                if ctcp.is_none() {
                    // Lone 0x01 with no terminator and no space: whole remainder is the tag.
                    ctcp = Some(Ctcp::parse(msg));
                    msg = "";
                }
            }

            Cmd::Privmsg {
                target,
                msg: msg.to_owned(),
                is_notice,
                ctcp,
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("JOIN") => {
            if params.is_empty() {
                return Err(malformed());
            }
            Cmd::Join {
                chan: params[0].to_owned(),
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("PART") => {
            if params.is_empty() {
                return Err(malformed());
            }
            Cmd::Part {
                chan: params[0].to_owned(),
                msg: params.get(1).map(|s| (*s).to_owned()),
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("QUIT") => Cmd::Quit {
            msg: params.first().map(|s| (*s).to_owned()),
        },
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("NICK") => {
            if params.is_empty() {
                return Err(malformed());
            }
            Cmd::Nick {
                nick: params[0].to_owned(),
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("PING") => Cmd::Ping {
            arg: params.first().copied().unwrap_or("").to_owned(),
        },
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("PONG") => Cmd::Pong {
            arg: params.first().copied().unwrap_or("").to_owned(),
        },
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("ERROR") => Cmd::Error {
            msg: params.first().copied().unwrap_or("").to_owned(),
        },
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("TOPIC") => {
            if params.is_empty() {
                return Err(malformed());
            }
            Cmd::Topic {
                chan: params[0].to_owned(),
                topic: params.get(1).map(|s| (*s).to_owned()),
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("KICK") => {
            if params.len() < 2 {
                return Err(malformed());
            }
            Cmd::Kick {
                chan: params[0].to_owned(),
                nick: params[1].to_owned(),
                msg: params.get(2).map(|s| (*s).to_owned()),
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("MODE") => {
            if params.len() < 2 {
                return Err(malformed());
            }
            Cmd::Mode {
                target: params[0].to_owned(),
                modestring: params[1].to_owned(),
                args: params[2..].iter().map(|s| (*s).to_owned()).collect(),
            }
        }
        MsgType::Cmd(c) if c.eq_ignore_ascii_case("INVITE") => {
            if params.len() < 2 {
                return Err(malformed());
            }
            Cmd::Invite {
                nick: params[0].to_owned(),
                chan: params[1].to_owned(),
            }
        }
        MsgType::Num(n) => Cmd::Reply {
            num: n,
            params: params.iter().map(|s| (*s).to_owned()).collect(),
        },
        MsgType::Cmd(cmd) => Cmd::Other {
            cmd: cmd.to_owned(),
            params: params.iter().map(|s| (*s).to_owned()).collect(),
        },
    })
}

fn parse_reply_num(bs: &str) -> Option<u16> {
    if bs.len() == 3 && bs.bytes().all(|b| b.is_ascii_digit()) {
        bs.parse().ok()
    } else {
        None
    }
}

fn parse_params(chrs: &str) -> Vec<&str> {
    let mut ret: Vec<&str> = Vec::new();
    if chrs.is_empty() {
        return ret;
    }

    let mut slice_begins = 0;
    for (char_idx, char) in chrs.char_indices() {
        if char == ':' && (char_idx == 0 || chrs.as_bytes()[char_idx - 1] == b' ') {
            ret.push(&chrs[char_idx + 1..]);
            return ret;
        } else if char == ' ' {
            if char_idx > slice_begins {
                ret.push(&chrs[slice_begins..char_idx]);
            }
            slice_begins = char_idx + 1;
        }
    }

    if slice_begins != chrs.len() {
        ret.push(&chrs[slice_begins..chrs.len()]);
    }

    ret
}

/// Nicks may have channel-membership prefixes attached (e.g. in `NAMES` replies). Returns the
/// nick without a leading prefix character, and the stripped prefix character if there was one.
pub fn split_nick_prefix(nick: &str) -> (Option<char>, &str) {
    static PREFIXES: [char; 5] = ['~', '&', '@', '%', '+'];
    match nick.chars().next() {
        Some(c) if PREFIXES.contains(&c) => (Some(c), &nick[c.len_utf8()..]),
        _ => (None, nick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_params_basic() {
        assert_eq!(parse_params("p1 p2 p3"), vec!["p1", "p2", "p3"]);
        let v: Vec<&str> = vec![];
        assert_eq!(parse_params(""), v);
        assert_eq!(parse_params(":foo bar baz "), vec!["foo bar baz "]);
        assert_eq!(parse_params(":"), vec![""]);
    }

    #[test]
    fn privmsg_parsing() {
        let msg = parse_message(":nick!~nick@unaffiliated/nick PRIVMSG tiny :a b c").unwrap();
        assert_eq!(
            msg,
            Msg {
                tags: vec![],
                pfx: Some(Pfx::User {
                    nick: "nick".to_owned(),
                    user: "~nick".to_owned(),
                    host: "unaffiliated/nick".to_owned(),
                }),
                cmd: Cmd::Privmsg {
                    target: MsgTarget::User("tiny".to_owned()),
                    msg: "a b c".to_owned(),
                    is_notice: false,
                    ctcp: None,
                },
            }
        );
    }

    #[test]
    fn notice_parsing() {
        let msg =
            parse_message(":barjavel.freenode.net NOTICE * :*** Looking up your hostname...")
                .unwrap();
        assert_eq!(
            msg,
            Msg {
                tags: vec![],
                pfx: Some(Pfx::Server("barjavel.freenode.net".to_owned())),
                cmd: Cmd::Privmsg {
                    target: MsgTarget::User("*".to_owned()),
                    msg: "*** Looking up your hostname...".to_owned(),
                    is_notice: true,
                    ctcp: None,
                },
            }
        );
    }

    #[test]
    fn numeric_parsing() {
        let msg = parse_message(
            ":barjavel.freenode.net 001 tiny :Welcome to the freenode Internet Relay Chat Network tiny",
        )
        .unwrap();
        assert_eq!(
            msg.cmd,
            Cmd::Reply {
                num: 1,
                params: vec![
                    "tiny".to_owned(),
                    "Welcome to the freenode Internet Relay Chat Network tiny".to_owned(),
                ],
            }
        );
    }

    #[test]
    fn part_parsing() {
        let msg = parse_message(":tiny!~tiny@123.123.123.123 PART #haskell").unwrap();
        assert_eq!(
            msg,
            Msg {
                tags: vec![],
                pfx: Some(Pfx::User {
                    nick: "tiny".to_owned(),
                    user: "~tiny".to_owned(),
                    host: "123.123.123.123".to_owned(),
                }),
                cmd: Cmd::Part {
                    chan: "#haskell".to_owned(),
                    msg: None,
                },
            }
        );
    }

    #[test]
    fn join_parsing() {
        let msg = parse_message(":tiny!~tiny@192.168.0.1 JOIN #haskell").unwrap();
        assert_eq!(
            msg,
            Msg {
                tags: vec![],
                pfx: Some(Pfx::User {
                    nick: "tiny".to_owned(),
                    user: "~tiny".to_owned(),
                    host: "192.168.0.1".to_owned(),
                }),
                cmd: Cmd::Join {
                    chan: "#haskell".to_owned(),
                },
            }
        );
    }

    #[test]
    fn ctcp_action_parsing() {
        let msg =
            parse_message(":dan!u@localhost PRIVMSG #ircv3 :\x01ACTION writes some specs!\x01")
                .unwrap();
        assert_eq!(
            msg.cmd,
            Cmd::Privmsg {
                target: MsgTarget::Chan("#ircv3".to_owned()),
                msg: "writes some specs!".to_owned(),
                is_notice: false,
                ctcp: Some(Ctcp::Action),
            }
        );
    }

    #[test]
    fn ctcp_action_missing_terminator() {
        let msg = parse_message(":a!b@c PRIVMSG target :\x01ACTION msg contents").unwrap();
        assert_eq!(
            msg.cmd,
            Cmd::Privmsg {
                target: MsgTarget::User("target".to_owned()),
                msg: "msg contents".to_owned(),
                is_notice: false,
                ctcp: Some(Ctcp::Action),
            }
        );
    }

    #[test]
    fn ctcp_version_parsing() {
        let msg = parse_message(":a!b@c PRIVMSG target :\x01VERSION\x01").unwrap();
        assert_eq!(
            msg.cmd,
            Cmd::Privmsg {
                target: MsgTarget::User("target".to_owned()),
                msg: "".to_owned(),
                is_notice: false,
                ctcp: Some(Ctcp::Version),
            }
        );
    }

    #[test]
    fn other_ctcp_parsing() {
        let msg = parse_message(":a!b@c PRIVMSG target :\x01blah blah \x01").unwrap();
        assert_eq!(
            msg.cmd,
            Cmd::Privmsg {
                target: MsgTarget::User("target".to_owned()),
                msg: "blah ".to_owned(),
                is_notice: false,
                ctcp: Some(Ctcp::Other("blah".to_owned())),
            }
        );
    }

    #[test]
    fn error_parsing() {
        let msg = parse_message("ERROR :Closing Link: 212.252.143.51 (Excess Flood)").unwrap();
        assert_eq!(
            msg,
            Msg {
                tags: vec![],
                pfx: None,
                cmd: Cmd::Error {
                    msg: "Closing Link: 212.252.143.51 (Excess Flood)".to_owned(),
                },
            }
        );
    }

    #[test]
    fn tags_parsing() {
        let msg = parse_message("@id=123;account=bob :nick!u@h PRIVMSG #x :hi").unwrap();
        assert_eq!(
            msg.tags,
            vec![
                ("id".to_owned(), Some("123".to_owned())),
                ("account".to_owned(), Some("bob".to_owned())),
            ]
        );
    }

    #[test]
    fn tags_without_value() {
        let msg = parse_message("@away :nick!u@h PRIVMSG #x :hi").unwrap();
        assert_eq!(msg.tags, vec![("away".to_owned(), None)]);
    }

    #[test]
    fn malformed_tags_only_line_errors() {
        assert!(parse_message("@justtags").is_err());
    }

    /// A tagged line with no prefix has no space-preceded colon until the trailing parameter;
    /// the tag block must still end at the first space, not swallow the command and middle args.
    #[test]
    fn tagged_line_without_prefix_does_not_swallow_command() {
        let msg = parse_message("@id=1 PRIVMSG #chan :hi").unwrap();
        assert_eq!(msg.tags, vec![("id".to_owned(), Some("1".to_owned()))]);
        assert_eq!(
            msg.cmd,
            Cmd::Privmsg {
                target: MsgTarget::from_str("#chan"),
                msg: "hi".to_owned(),
                is_notice: false,
                ctcp: None,
            }
        );
    }

    #[test]
    fn server_prefix_no_bang() {
        let pfx = Pfx::parse("irc.server.net");
        assert_eq!(pfx, Pfx::Server("irc.server.net".to_owned()));
    }

    #[test]
    fn split_nick_prefix_strips_known_prefix() {
        assert_eq!(split_nick_prefix("@alice"), (Some('@'), "alice"));
        assert_eq!(split_nick_prefix("bob"), (None, "bob"));
    }
}
