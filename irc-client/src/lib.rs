//! A synchronous, single-threaded IRC client engine: connect, drive `poll()`, register callbacks.
//!
//! Grounded on `libtiny_client::Client`'s method surface (`new`, `get_nick`, `raw_msg`, `privmsg`,
//! `join`, `part`, `nick`, `quit`), with the async `connect()` task-loop-plus-`select!` replaced
//! by a synchronous `poll()` per SPEC_FULL.md §5, and extended with every operation §6 lists that
//! the teacher lacks.

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod pinger;
pub mod socket;
pub mod tracker;
pub mod user;

pub use channel::Channel;
pub use error::EngineError;
pub use events::*;
pub use socket::{IrcSocket, TcpIrcSocket};
pub use tracker::{NetworkInfo, Tracker};
pub use user::User;

use irc_common::{Clock, Nick, SystemClock};
use irc_wire::{commands, LineFramer};
use pinger::{Pinger, PingerAction};
use std::io;
use std::net::ToSocketAddrs;
use std::time::Instant;

/// Configuration for the identity the engine introduces to the server with.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub nick: String,
    pub user: String,
    pub real_name: String,
}

/// The IRC client engine. Owns the tracked state, the event surface, the keep-alive FSM, and (once
/// connected) a transport. Single-threaded; `poll()` is the only operation that touches the
/// network.
pub struct Engine<S: IrcSocket = TcpIrcSocket, C: Clock = SystemClock> {
    config: EngineConfig,
    socket: Option<S>,
    clock: C,
    framer: LineFramer,
    tracker: Tracker,
    events: Events,
    pinger: Option<Pinger>,
}

impl Engine<TcpIrcSocket, SystemClock> {
    /// Creates a disconnected engine for the given identity, using the real system clock and a
    /// TCP transport.
    pub fn new(nick: &str, user: &str, real_name: &str) -> Self {
        Engine::with_clock(nick, user, real_name, SystemClock)
    }

    /// Connects over plain TCP to `address`, introducing self with an optional server password.
    pub fn connect(&mut self, address: &str, password: Option<&str>) -> Result<(), EngineError> {
        if self.socket.is_some() {
            return Err(EngineError::AlreadyConnected);
        }
        let mut addrs = address
            .to_socket_addrs()
            .map_err(|e| EngineError::Io(e.to_string()))?;
        let addr = addrs
            .next()
            .ok_or_else(|| EngineError::Io("could not resolve address".to_owned()))?;
        let socket = TcpIrcSocket::connect(addr)?;
        self.connect_with(socket, password)
    }
}

impl<S: IrcSocket, C: Clock> Engine<S, C> {
    /// Creates a disconnected engine using the given clock, with the socket type left to be
    /// determined by the first call to `connect_with`. Used directly by tests with a fake clock
    /// and/or fake socket.
    pub fn with_clock(nick: &str, user: &str, real_name: &str, clock: C) -> Self {
        let now = clock.now();
        Engine {
            config: EngineConfig {
                nick: nick.to_owned(),
                user: user.to_owned(),
                real_name: real_name.to_owned(),
            },
            socket: None,
            clock,
            framer: LineFramer::new(),
            tracker: Tracker::new(Nick::new(nick.to_owned()), now),
            events: Events::new(),
            pinger: None,
        }
    }

    /// Takes over an already-connected socket and sends the login sequence
    /// (`PASS`/`NICK`/`USER`). Used by `connect` and directly by tests with a fake socket.
    pub fn connect_with(&mut self, mut socket: S, password: Option<&str>) -> Result<(), EngineError> {
        if self.socket.is_some() {
            return Err(EngineError::AlreadyConnected);
        }
        let now = self.clock.now();

        if let Some(pass) = password {
            socket.send(commands::pass(pass).as_bytes())?;
        }
        socket.send(commands::nick(&self.config.nick).as_bytes())?;
        socket.send(commands::user(&self.config.user, &self.config.real_name).as_bytes())?;

        self.socket = Some(socket);
        self.pinger = Some(Pinger::new(now));
        Ok(())
    }

    /// Current nick.
    pub fn nick(&self) -> &str {
        self.tracker.self_user().nick().display()
    }

    /// Requests a nick change. Sends `NICK` immediately if connected; otherwise only updates the
    /// identity that will be used on the next `connect`.
    pub fn set_nick(&mut self, new_nick: &str) -> Result<(), EngineError> {
        if new_nick.is_empty() {
            return Err(EngineError::InvalidArgument("nick".to_owned()));
        }
        let max_len = self.tracker.network_info.max_nick_length;
        if max_len != 0 && new_nick.len() as u32 > max_len {
            return Err(EngineError::NickTooLong(new_nick.to_owned(), max_len));
        }
        self.config.nick = new_nick.to_owned();
        if let Some(socket) = &mut self.socket {
            socket.send(commands::nick(new_nick).as_bytes())?;
        } else {
            self.tracker.self_user_mut().set_nick(Nick::new(new_nick.to_owned()));
        }
        Ok(())
    }

    pub fn user(&self) -> &str {
        self.tracker.self_user().user()
    }

    pub fn set_user(&mut self, user: &str) -> Result<(), EngineError> {
        if self.socket.is_some() {
            return Err(EngineError::InUseWhileConnected);
        }
        self.config.user = user.to_owned();
        Ok(())
    }

    pub fn real_name(&self) -> &str {
        self.tracker.self_user().real_name()
    }

    pub fn set_real_name(&mut self, real_name: &str) -> Result<(), EngineError> {
        if self.socket.is_some() {
            return Err(EngineError::InUseWhileConnected);
        }
        self.config.real_name = real_name.to_owned();
        Ok(())
    }

    pub fn get_user(&self, nick: &str) -> Option<&User> {
        self.tracker.get_user(nick)
    }

    pub fn network_info(&self) -> &NetworkInfo {
        &self.tracker.network_info
    }

    fn require_connected(&mut self) -> Result<&mut S, EngineError> {
        self.socket.as_mut().ok_or(EngineError::NotConnected)
    }

    fn send_line(&mut self, line: &str) -> Result<(), EngineError> {
        let socket = self.require_connected()?;
        socket.send(line.as_bytes())?;
        Ok(())
    }

    pub fn join(&mut self, chan: &str, key: Option<&str>) -> Result<(), EngineError> {
        if !chan.starts_with('#') {
            return Err(EngineError::NotAChannel(chan.to_owned()));
        }
        self.send_line(&commands::join(chan, key))
    }

    pub fn part(&mut self, chan: &str, msg: Option<&str>) -> Result<(), EngineError> {
        self.send_line(&commands::part(chan, msg))
    }

    /// Sends `QUIT`, shuts the socket down, and clears all tracked state. Idempotent: calling
    /// `quit` while already disconnected is a no-op, never an error.
    pub fn quit(&mut self, msg: Option<&str>) -> Result<(), EngineError> {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.send(commands::quit(msg).as_bytes());
            socket.shutdown();
        }
        self.tracker.reset();
        self.pinger = None;
        self.framer = LineFramer::new();
        Ok(())
    }

    pub fn kick(&mut self, chan: &str, who: &str, msg: Option<&str>) -> Result<(), EngineError> {
        self.send_line(&commands::kick(chan, who, msg))
    }

    pub fn ban(&mut self, chan: &str, mask: &str) -> Result<(), EngineError> {
        self.send_line(&commands::mode(chan, "+b", &[mask]))
    }

    pub fn unban(&mut self, chan: &str, mask: &str) -> Result<(), EngineError> {
        self.send_line(&commands::mode(chan, "-b", &[mask]))
    }

    pub fn kick_ban(&mut self, chan: &str, who: &str, mask: &str, msg: Option<&str>) -> Result<(), EngineError> {
        self.ban(chan, mask)?;
        self.kick(chan, who, msg)
    }

    pub fn mode(&mut self, target: &str, modestring: &str, args: &[&str]) -> Result<(), EngineError> {
        self.send_line(&commands::mode(target, modestring, args))
    }

    pub fn add_user_modes(&mut self, nick: &str, modes: &str) -> Result<(), EngineError> {
        self.mode(nick, &format!("+{}", modes), &[])
    }

    pub fn remove_user_modes(&mut self, nick: &str, modes: &str) -> Result<(), EngineError> {
        self.mode(nick, &format!("-{}", modes), &[])
    }

    pub fn add_channel_modes(&mut self, chan: &str, modes: &str, args: &[&str]) -> Result<(), EngineError> {
        self.mode(chan, &format!("+{}", modes), args)
    }

    pub fn remove_channel_modes(&mut self, chan: &str, modes: &str, args: &[&str]) -> Result<(), EngineError> {
        self.mode(chan, &format!("-{}", modes), args)
    }

    pub fn add_to_channel_list(&mut self, chan: &str, list_mode: char, mask: &str) -> Result<(), EngineError> {
        self.mode(chan, &format!("+{}", list_mode), &[mask])
    }

    pub fn remove_from_channel_list(&mut self, chan: &str, list_mode: char, mask: &str) -> Result<(), EngineError> {
        self.mode(chan, &format!("-{}", list_mode), &[mask])
    }

    pub fn whois(&mut self, target: &str) -> Result<(), EngineError> {
        self.send_line(&commands::whois(target))
    }

    pub fn who(&mut self, mask: &str) -> Result<(), EngineError> {
        self.send_line(&commands::who(mask))
    }

    pub fn send(&mut self, target: &str, msg: &str) -> Result<(), EngineError> {
        if target.is_empty() || msg.is_empty() {
            return Err(EngineError::InvalidArgument("target/msg".to_owned()));
        }
        for fragment in irc_wire::splitter::split_privmsg("PRIVMSG", target, msg) {
            self.send_line(&commands::privmsg(target, fragment))?;
        }
        Ok(())
    }

    pub fn notice(&mut self, target: &str, msg: &str) -> Result<(), EngineError> {
        if target.is_empty() || msg.is_empty() {
            return Err(EngineError::InvalidArgument("target/msg".to_owned()));
        }
        for fragment in irc_wire::splitter::split_privmsg("NOTICE", target, msg) {
            self.send_line(&commands::notice(target, fragment))?;
        }
        Ok(())
    }

    pub fn ctcp_query(&mut self, target: &str, tag: &str, msg: Option<&str>) -> Result<(), EngineError> {
        for fragment in irc_wire::splitter::split_ctcp("PRIVMSG", target, tag, msg.unwrap_or("")) {
            self.send_line(&commands::privmsg(target, &fragment))?;
        }
        Ok(())
    }

    pub fn ctcp_reply(&mut self, target: &str, tag: &str, msg: Option<&str>) -> Result<(), EngineError> {
        for fragment in irc_wire::splitter::split_ctcp("NOTICE", target, tag, msg.unwrap_or("")) {
            self.send_line(&commands::notice(target, &fragment))?;
        }
        Ok(())
    }

    pub fn raw(&mut self, line: &str) -> Result<(), EngineError> {
        self.send_line(&commands::raw(line))
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.tracker.channel_names().collect()
    }

    pub fn get_channel(&self, chan: &str) -> Option<&Channel> {
        self.tracker.get_channel(chan)
    }

    // Event registration -- one passthrough per event kind.
    pub fn on_connect(&mut self, cb: impl FnMut(()) + 'static) {
        self.events.register_on_connect(cb);
    }
    pub fn on_message(&mut self, cb: impl FnMut(MessageEvent) + 'static) {
        self.events.register_on_message(cb);
    }
    pub fn on_notice(&mut self, cb: impl FnMut(MessageEvent) + 'static) {
        self.events.register_on_notice(cb);
    }
    pub fn on_ctcp_query(&mut self, cb: impl FnMut(CtcpEvent) + 'static) {
        self.events.register_on_ctcp_query(cb);
    }
    pub fn on_ctcp_reply(&mut self, cb: impl FnMut(CtcpEvent) + 'static) {
        self.events.register_on_ctcp_reply(cb);
    }
    pub fn on_join(&mut self, cb: impl FnMut(JoinEvent) + 'static) {
        self.events.register_on_join(cb);
    }
    pub fn on_successful_join(&mut self, cb: impl FnMut(String) + 'static) {
        self.events.register_on_successful_join(cb);
    }
    pub fn on_join_too_soon(&mut self, cb: impl FnMut(JoinTooSoonEvent) + 'static) {
        self.events.register_on_join_too_soon(cb);
    }
    pub fn on_part(&mut self, cb: impl FnMut(PartEvent) + 'static) {
        self.events.register_on_part(cb);
    }
    pub fn on_quit(&mut self, cb: impl FnMut(QuitEvent) + 'static) {
        self.events.register_on_quit(cb);
    }
    pub fn on_kick(&mut self, cb: impl FnMut(KickEvent) + 'static) {
        self.events.register_on_kick(cb);
    }
    pub fn on_mode(&mut self, cb: impl FnMut(ModeEvent) + 'static) {
        self.events.register_on_mode(cb);
    }
    pub fn on_nick_change(&mut self, cb: impl FnMut(NickChangeEvent) + 'static) {
        self.events.register_on_nick_change(cb);
    }
    pub fn on_nick_in_use(&mut self, cb: impl FnMut(&str) -> bool + 'static) {
        self.events.register_on_nick_in_use(cb);
    }
    pub fn on_invite(&mut self, cb: impl FnMut(InviteEvent) + 'static) {
        self.events.register_on_invite(cb);
    }
    pub fn on_name_list(&mut self, cb: impl FnMut(NameListEvent) + 'static) {
        self.events.register_on_name_list(cb);
    }
    pub fn on_name_list_end(&mut self, cb: impl FnMut(String) + 'static) {
        self.events.register_on_name_list_end(cb);
    }
    pub fn on_topic(&mut self, cb: impl FnMut(TopicEvent) + 'static) {
        self.events.register_on_topic(cb);
    }
    pub fn on_topic_change(&mut self, cb: impl FnMut(TopicChangeEvent) + 'static) {
        self.events.register_on_topic_change(cb);
    }
    pub fn on_whois_reply(&mut self, cb: impl FnMut(WhoisReplyEvent) + 'static) {
        self.events.register_on_whois_reply(cb);
    }
    pub fn on_whois_server_reply(&mut self, cb: impl FnMut(WhoisServerReplyEvent) + 'static) {
        self.events.register_on_whois_server_reply(cb);
    }
    pub fn on_whois_operator_reply(&mut self, cb: impl FnMut(WhoisOperatorReplyEvent) + 'static) {
        self.events.register_on_whois_operator_reply(cb);
    }
    pub fn on_whois_idle_reply(&mut self, cb: impl FnMut(WhoisIdleEvent) + 'static) {
        self.events.register_on_whois_idle_reply(cb);
    }
    pub fn on_whois_channels_reply(&mut self, cb: impl FnMut(WhoisChannelsEvent) + 'static) {
        self.events.register_on_whois_channels_reply(cb);
    }
    pub fn on_whois_account_reply(&mut self, cb: impl FnMut(WhoisAccountReplyEvent) + 'static) {
        self.events.register_on_whois_account_reply(cb);
    }
    pub fn on_whois_end(&mut self, cb: impl FnMut(String) + 'static) {
        self.events.register_on_whois_end(cb);
    }
    pub fn on_topic_info(&mut self, cb: impl FnMut(TopicInfoEvent) + 'static) {
        self.events.register_on_topic_info(cb);
    }
    pub fn on_motd_start(&mut self, cb: impl FnMut(String) + 'static) {
        self.events.register_on_motd_start(cb);
    }
    pub fn on_motd_line(&mut self, cb: impl FnMut(String) + 'static) {
        self.events.register_on_motd_line(cb);
    }
    pub fn on_motd_end(&mut self, cb: impl FnMut(String) + 'static) {
        self.events.register_on_motd_end(cb);
    }

    /// Reads as much as is available (non-blocking) and dispatches every complete line. Returns
    /// `Ok(true)` while connected, `Ok(false)` once the connection has ended (clean or forced) —
    /// the caller should stop polling until `connect_with` is called again.
    pub fn poll(&mut self) -> Result<bool, EngineError> {
        let now = self.clock.now();

        let mut buf = [0u8; irc_wire::framer::MAX_LINE_LEN];
        let mut had_traffic = false;
        let mut outbound: Vec<String> = Vec::new();
        let mut disconnected = false;

        loop {
            let socket = match &mut self.socket {
                Some(s) => s,
                None => return Ok(false),
            };

            let read_len = irc_wire::framer::MAX_LINE_LEN.saturating_sub(self.framer.carry_len());
            if read_len == 0 {
                break;
            }

            match socket.try_recv(&mut buf[..read_len]) {
                Ok(0) => {
                    disconnected = true;
                    break;
                }
                Ok(n) => {
                    had_traffic = true;
                    let lines = self
                        .framer
                        .feed(&buf[..n])
                        .map_err(EngineError::ProtocolError)?;
                    for line in lines {
                        match irc_wire::parse_message(&line) {
                            Ok(msg) => {
                                if let Err(e) =
                                    dispatcher::dispatch(&mut self.tracker, &mut self.events, now, msg, &mut outbound)
                                {
                                    match e {
                                        EngineError::ServerError(_) | EngineError::NickInUseUnhandled => {
                                            disconnected = true;
                                        }
                                        other => return Err(other),
                                    }
                                }
                            }
                            Err(err) => {
                                log::debug!("dropping malformed line {:?}: {}", line, err);
                            }
                        }
                        if disconnected {
                            break;
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    return Err(EngineError::Io(e.to_string()));
                }
            }

            if disconnected {
                break;
            }
        }

        if had_traffic {
            if let Some(pinger) = &mut self.pinger {
                pinger.reset(now);
            }
        } else if !disconnected {
            if let Some(pinger) = &mut self.pinger {
                match pinger.check(now) {
                    PingerAction::SendPing => outbound.push(commands::ping(Pinger::ping_token())),
                    PingerAction::Disconnect => disconnected = true,
                    PingerAction::None => {}
                }
            }
        }

        let mut write_err = None;
        for line in &outbound {
            if let Some(socket) = &mut self.socket {
                if let Err(e) = socket.send(line.as_bytes()) {
                    write_err = Some(e);
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            if let Some(mut socket) = self.socket.take() {
                socket.shutdown();
            }
            self.tracker.reset();
            self.pinger = None;
            self.framer = LineFramer::new();
            if let Some(e) = write_err {
                return Err(EngineError::Io(e.to_string()));
            }
            return Ok(false);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    /// A fake, fully in-memory `IrcSocket` for driving the engine in tests without real network
    /// I/O. `inbox` holds pre-queued bytes to be handed back from `try_recv`.
    #[derive(Default)]
    struct FakeSocket {
        alive: bool,
        inbox: VecDeque<u8>,
        sent: Rc<RefCell<Vec<u8>>>,
        fail_send: Rc<Cell<bool>>,
    }

    impl FakeSocket {
        fn new() -> Self {
            FakeSocket {
                alive: true,
                inbox: VecDeque::new(),
                sent: Rc::new(RefCell::new(Vec::new())),
                fail_send: Rc::new(Cell::new(false)),
            }
        }

        fn push_line(&mut self, line: &str) {
            self.inbox.extend(line.as_bytes());
            self.inbox.extend(b"\r\n");
        }

        fn sent_lines(&self) -> Vec<String> {
            let data = self.sent.borrow();
            String::from_utf8_lossy(&data)
                .split("\r\n")
                .filter(|s| !s.is_empty())
                .map(|s| s.to_owned())
                .collect()
        }
    }

    impl IrcSocket for FakeSocket {
        fn send(&mut self, data: &[u8]) -> io::Result<()> {
            if self.fail_send.get() {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
            }
            self.sent.borrow_mut().extend_from_slice(data);
            Ok(())
        }

        fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.inbox.is_empty() {
                return Err(io::Error::new(io::ErrorKind::WouldBlock, "no data"));
            }
            let mut n = 0;
            while n < buf.len() {
                match self.inbox.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }

        fn is_alive(&self) -> bool {
            self.alive
        }

        fn shutdown(&mut self) {
            self.alive = false;
        }
    }

    #[derive(Clone)]
    struct FixedClock(Instant);
    impl Clock for FixedClock {
        fn now(&self) -> Instant {
            self.0
        }
    }

    fn engine() -> Engine<FakeSocket, FixedClock> {
        Engine::with_clock("Neko", "neko", "Neko The Cat", FixedClock(Instant::now()))
    }

    #[test]
    fn connect_sends_login_sequence() {
        let mut e = engine();
        let sock = FakeSocket::new();
        let sent_ref = sock.sent.clone();
        e.connect_with(sock, None).unwrap();
        let sent = String::from_utf8_lossy(&sent_ref.borrow()).into_owned();
        assert!(sent.contains("NICK Neko\r\n"));
        assert!(sent.contains("USER neko 8 * :Neko The Cat\r\n"));
    }

    #[test]
    fn double_connect_fails() {
        let mut e = engine();
        e.connect_with(FakeSocket::new(), None).unwrap();
        assert!(matches!(
            e.connect_with(FakeSocket::new(), None),
            Err(EngineError::AlreadyConnected)
        ));
    }

    #[test]
    fn poll_without_connection_returns_false() {
        let mut e = engine();
        assert_eq!(e.poll().unwrap(), false);
    }

    #[test]
    fn ping_is_answered_via_poll() {
        let mut e = engine();
        let mut sock = FakeSocket::new();
        sock.push_line("PING :abc");
        let sent_ref = sock.sent.clone();
        e.connect_with(sock, None).unwrap();
        assert_eq!(e.poll().unwrap(), true);
        let sent = String::from_utf8_lossy(&sent_ref.borrow()).into_owned();
        assert!(sent.contains("PONG :abc\r\n"));
    }

    #[test]
    fn successful_join_fires_callback() {
        let mut e = engine();
        let joined = Rc::new(RefCell::new(None));
        let joined_clone = joined.clone();
        e.on_successful_join(move |chan| *joined_clone.borrow_mut() = Some(chan));

        let mut sock = FakeSocket::new();
        sock.push_line(":Neko!u@h JOIN #test");
        e.connect_with(sock, None).unwrap();
        e.poll().unwrap();

        assert_eq!(*joined.borrow(), Some("#test".to_owned()));
    }

    #[test]
    fn quit_is_idempotent() {
        let mut e = engine();
        e.connect_with(FakeSocket::new(), None).unwrap();
        e.quit(None).unwrap();
        e.quit(None).unwrap();
        assert_eq!(e.poll().unwrap(), false);
    }

    #[test]
    fn join_rejects_non_channel_target() {
        let mut e = engine();
        e.connect_with(FakeSocket::new(), None).unwrap();
        assert!(matches!(
            e.join("not-a-channel", None),
            Err(EngineError::NotAChannel(_))
        ));
    }

    #[test]
    fn operations_fail_when_not_connected() {
        let mut e = engine();
        assert!(matches!(e.join("#test", None), Err(EngineError::NotConnected)));
    }

    #[test]
    fn idle_timeout_sends_ping_then_disconnects() {
        let t0 = Instant::now();
        let mut e = Engine::with_clock("Neko", "neko", "Neko", FixedClock(t0));
        let sock = FakeSocket::new();
        let sent_ref = sock.sent.clone();
        e.connect_with(sock, None).unwrap();

        e.clock = FixedClock(t0 + std::time::Duration::from_secs(30));
        assert_eq!(e.poll().unwrap(), true);
        assert!(String::from_utf8_lossy(&sent_ref.borrow()).contains("PING "));

        e.clock = FixedClock(t0 + std::time::Duration::from_secs(60));
        assert_eq!(e.poll().unwrap(), false);
    }

    #[test]
    fn write_failure_during_poll_surfaces_io_error() {
        let mut e = engine();
        let mut sock = FakeSocket::new();
        sock.push_line("PING :abc");
        let fail_send = sock.fail_send.clone();
        e.connect_with(sock, None).unwrap();
        fail_send.set(true);

        assert!(matches!(e.poll(), Err(EngineError::Io(_))));
        // The engine treats the failed write as a disconnect: tracked state is torn down and
        // subsequent polls report no connection rather than erroring forever.
        assert_eq!(e.poll().unwrap(), false);
    }
}
