//! Keep-alive / idle-detection state machine.
//!
//! Grounded on `libtiny_client::pinger::{Pinger, PingerState}`, with the `tokio::time::sleep` /
//! `select!` task body replaced by a `Clock`-driven `check` method polled by the engine, and the
//! timeout changed from the teacher's 60s to the specification's 30s.

use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(30);
const PING_TOKEN: &str = "12345";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PingerState {
    Alive,
    AwaitingPong,
    Dead,
}

/// What the engine should do as a result of a `Pinger::check` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingerAction {
    /// Nothing to do.
    None,
    /// Send a PING with this token.
    SendPing,
    /// The connection has timed out; disconnect.
    Disconnect,
}

#[derive(Debug)]
pub struct Pinger {
    state: PingerState,
    last_net_time: Instant,
}

impl Pinger {
    pub fn new(now: Instant) -> Self {
        Pinger {
            state: PingerState::Alive,
            last_net_time: now,
        }
    }

    pub fn ping_token() -> &'static str {
        PING_TOKEN
    }

    /// Any inbound traffic (including a PONG) resets the FSM to `Alive`.
    pub fn reset(&mut self, now: Instant) {
        self.state = PingerState::Alive;
        self.last_net_time = now;
    }

    /// Call on every poll where the socket had nothing to read. Returns the action the engine
    /// should take, if any.
    pub fn check(&mut self, now: Instant) -> PingerAction {
        let elapsed = now.saturating_duration_since(self.last_net_time);
        match self.state {
            PingerState::Alive if elapsed >= TIMEOUT => {
                self.state = PingerState::AwaitingPong;
                PingerAction::SendPing
            }
            PingerState::AwaitingPong if elapsed >= TIMEOUT => {
                self.state = PingerState::Dead;
                PingerAction::Disconnect
            }
            _ => PingerAction::None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == PingerState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_until_timeout() {
        let t0 = Instant::now();
        let mut pinger = Pinger::new(t0);
        assert_eq!(pinger.check(t0 + Duration::from_secs(10)), PingerAction::None);
    }

    #[test]
    fn sends_ping_after_30s_silence() {
        let t0 = Instant::now();
        let mut pinger = Pinger::new(t0);
        assert_eq!(
            pinger.check(t0 + Duration::from_secs(30)),
            PingerAction::SendPing
        );
    }

    #[test]
    fn disconnects_after_second_30s_silence() {
        let t0 = Instant::now();
        let mut pinger = Pinger::new(t0);
        let t1 = t0 + Duration::from_secs(30);
        assert_eq!(pinger.check(t1), PingerAction::SendPing);
        let t2 = t1 + Duration::from_secs(30);
        assert_eq!(pinger.check(t2), PingerAction::Disconnect);
        assert!(pinger.is_dead());
    }

    #[test]
    fn reset_clears_awaiting_state() {
        let t0 = Instant::now();
        let mut pinger = Pinger::new(t0);
        let t1 = t0 + Duration::from_secs(30);
        assert_eq!(pinger.check(t1), PingerAction::SendPing);
        pinger.reset(t1);
        assert_eq!(pinger.check(t1 + Duration::from_secs(10)), PingerAction::None);
    }
}
