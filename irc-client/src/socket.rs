//! The transport collaborator: send bytes, non-blocking receive, would-block indication,
//! liveness query, shutdown. Transport/TLS selection is the embedding application's job.
//!
//! Grounded on `libtiny_client::stream::Stream`'s enum-of-transports shape, converted from an
//! async `AsyncRead`/`AsyncWrite` enum into a synchronous trait since the engine has no internal
//! tasks or threads to drive polling.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// A non-blocking duplex byte stream to an IRC server.
pub trait IrcSocket {
    /// Sends `data` in full, blocking if necessary. Outbound writes are small (one line at a
    /// time) so this is not expected to stall the poll loop.
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Attempts a non-blocking read into `buf`. Returns `Ok(0)` only on EOF (peer closed the
    /// connection); returns `Err` with `io::ErrorKind::WouldBlock` when no data is available yet.
    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the underlying transport is still usable.
    fn is_alive(&self) -> bool;

    /// Tears the connection down. Idempotent.
    fn shutdown(&mut self);
}

/// Default `IrcSocket` backed by a plain, non-blocking `std::net::TcpStream`.
pub struct TcpIrcSocket {
    stream: Option<TcpStream>,
}

impl TcpIrcSocket {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(TcpIrcSocket {
            stream: Some(stream),
        })
    }

    pub fn connect_timeout(
        addr: &std::net::SocketAddr,
        timeout: Duration,
    ) -> io::Result<Self> {
        let stream = TcpStream::connect_timeout(addr, timeout)?;
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(TcpIrcSocket {
            stream: Some(stream),
        })
    }
}

impl IrcSocket for TcpIrcSocket {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        match &mut self.stream {
            Some(stream) => stream.write_all(data),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed")),
        }
    }

    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.stream {
            Some(stream) => stream.read(buf),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed")),
        }
    }

    fn is_alive(&self) -> bool {
        self.stream.is_some()
    }

    fn shutdown(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn connect_and_shutdown_is_idempotent() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let mut sock = TcpIrcSocket::connect(addr).unwrap();
        assert!(sock.is_alive());
        sock.shutdown();
        assert!(!sock.is_alive());
        sock.shutdown();
        assert!(!sock.is_alive());
    }
}
