//! Turns a stream of arbitrarily-chunked bytes into complete protocol lines.
//!
//! Grounded on `libtiny_wire::parse_irc_msg`'s `\r\n`-seeking/`buf.drain` idiom, split out into
//! its own stage since framing and parsing are separate concerns here.

use crate::error::ProtocolError;
use std::str;

/// Maximum line length including the trailing CRLF, per RFC 2812.
pub const MAX_LINE_LEN: usize = 512;

static CRLF: [u8; 2] = [b'\r', b'\n'];

/// Accumulates bytes across polls and yields complete, CRLF-terminated lines.
#[derive(Debug, Default)]
pub struct LineFramer {
    carry: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        LineFramer { carry: Vec::new() }
    }

    /// Bytes currently held as an incomplete trailing fragment. Callers use this to size their
    /// next read to the remaining scratch-area budget (`MAX_LINE_LEN - carry_len()`).
    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }

    /// Feed freshly-read bytes and drain every complete line now available. Lines are returned in
    /// arrival order. An incomplete trailing fragment is kept as carry for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<String>, ProtocolError> {
        self.carry.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(crlf_idx) = find_crlf(&self.carry) {
            let line_bytes: Vec<u8> = self.carry.drain(0..=crlf_idx + 1).collect();
            if line_bytes.len() > MAX_LINE_LEN {
                self.carry.clear();
                return Err(ProtocolError::LineTooLong(line_bytes.len()));
            }
            let line = &line_bytes[..line_bytes.len() - 2];
            if line.is_empty() {
                continue;
            }
            let line = str::from_utf8(line).map_err(|_| ProtocolError::InvalidUtf8)?;
            lines.push(line.to_owned());
        }

        if self.carry.len() >= MAX_LINE_LEN {
            let len = self.carry.len();
            self.carry.clear();
            return Err(ProtocolError::LineTooLong(len));
        }

        Ok(lines)
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|sub| sub == CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_one_chunk() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"PING :abc\r\n").unwrap();
        assert_eq!(lines, vec!["PING :abc".to_string()]);
    }

    #[test]
    fn line_split_across_chunks() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.feed(b"PING :a").unwrap(), Vec::<String>::new());
        assert_eq!(
            framer.feed(b"bc\r\n").unwrap(),
            vec!["PING :abc".to_string()]
        );
    }

    #[test]
    fn multiple_lines_one_chunk() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"FOO\r\nBAR\r\n").unwrap();
        assert_eq!(lines, vec!["FOO".to_string(), "BAR".to_string()]);
    }

    #[test]
    fn byte_at_a_time_is_idempotent_with_whole_stream() {
        let stream = b"ONE\r\nTWO\r\nTHREE\r\n";

        let mut whole = LineFramer::new();
        let expected = whole.feed(stream).unwrap();

        let mut chunked = LineFramer::new();
        let mut actual = Vec::new();
        for byte in stream {
            actual.extend(chunked.feed(&[*byte]).unwrap());
        }

        assert_eq!(expected, actual);
    }

    #[test]
    fn overlong_line_without_crlf_errors() {
        let mut framer = LineFramer::new();
        let junk = vec![b'a'; MAX_LINE_LEN + 1];
        let err = framer.feed(&junk).unwrap_err();
        assert!(matches!(err, ProtocolError::LineTooLong(_)));
    }

    /// A single read can hand `feed` many complete lines' worth of bytes at once; an oversized
    /// line terminated by CRLF within that one chunk must still be rejected, not just an
    /// unterminated carry.
    #[test]
    fn overlong_terminated_line_within_one_chunk_errors() {
        let mut framer = LineFramer::new();
        let mut chunk = vec![b'a'; MAX_LINE_LEN];
        chunk.extend_from_slice(b"\r\n");
        let err = framer.feed(&chunk).unwrap_err();
        assert!(matches!(err, ProtocolError::LineTooLong(_)));
    }
}
