//! Formatters for outgoing commands.
//!
//! Grounded on `libtiny_wire`'s free functions of the same shape (`pass`, `nick`, `user`, `join`,
//! `part`, `quit`, `privmsg`, `pong`), extended with the remaining operations the engine needs
//! that the teacher never implements (`kick`, `invite`, `topic`, `who`, `whois`, generic `mode`).

pub fn pass(pass: &str) -> String {
    format!("PASS {}\r\n", pass)
}

pub fn user(hostname: &str, realname: &str) -> String {
    format!("USER {} 8 * :{}\r\n", hostname, realname)
}

pub fn nick(nick: &str) -> String {
    format!("NICK {}\r\n", nick)
}

pub fn ping(arg: &str) -> String {
    format!("PING {}\r\n", arg)
}

pub fn pong(arg: &str) -> String {
    format!("PONG :{}\r\n", arg)
}

pub fn join(chan: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("JOIN {} {}\r\n", chan, key),
        None => format!("JOIN {}\r\n", chan),
    }
}

pub fn part(chan: &str, msg: Option<&str>) -> String {
    match msg {
        Some(msg) => format!("PART {} :{}\r\n", chan, msg),
        None => format!("PART {}\r\n", chan),
    }
}

pub fn quit(msg: Option<&str>) -> String {
    match msg {
        None => "QUIT\r\n".to_string(),
        Some(msg) => format!("QUIT :{}\r\n", msg),
    }
}

/// Raw `PRIVMSG`/`NOTICE` line for one already-budgeted fragment.
pub fn privmsg(target: &str, fragment: &str) -> String {
    format!("PRIVMSG {} :{}\r\n", target, fragment)
}

pub fn notice(target: &str, fragment: &str) -> String {
    format!("NOTICE {} :{}\r\n", target, fragment)
}

pub fn topic(chan: &str, topic: Option<&str>) -> String {
    match topic {
        Some(topic) => format!("TOPIC {} :{}\r\n", chan, topic),
        None => format!("TOPIC {}\r\n", chan),
    }
}

pub fn kick(chan: &str, nick: &str, msg: Option<&str>) -> String {
    match msg {
        Some(msg) => format!("KICK {} {} :{}\r\n", chan, nick, msg),
        None => format!("KICK {} {}\r\n", chan, nick),
    }
}

pub fn invite(nick: &str, chan: &str) -> String {
    format!("INVITE {} {}\r\n", nick, chan)
}

pub fn mode(target: &str, modestring: &str, args: &[&str]) -> String {
    if args.is_empty() {
        format!("MODE {} {}\r\n", target, modestring)
    } else {
        format!("MODE {} {} {}\r\n", target, modestring, args.join(" "))
    }
}

pub fn who(mask: &str) -> String {
    format!("WHO {}\r\n", mask)
}

pub fn whois(target: &str) -> String {
    format!("WHOIS {}\r\n", target)
}

pub fn raw(line: &str) -> String {
    format!("{}\r\n", line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_without_key() {
        assert_eq!(join("#rust", None), "JOIN #rust\r\n");
    }

    #[test]
    fn join_with_key() {
        assert_eq!(join("#rust", Some("s3cr3t")), "JOIN #rust s3cr3t\r\n");
    }

    #[test]
    fn mode_with_args() {
        assert_eq!(
            mode("#rust", "+ov", &["alice", "bob"]),
            "MODE #rust +ov alice bob\r\n"
        );
    }

    #[test]
    fn mode_without_args() {
        assert_eq!(mode("alice", "+i", &[]), "MODE alice +i\r\n");
    }

    #[test]
    fn kick_with_reason() {
        assert_eq!(
            kick("#rust", "alice", Some("bye")),
            "KICK #rust alice :bye\r\n"
        );
    }
}
