//! IRC wire protocol: line framing, line parsing, outgoing command formatting, the outbound
//! message splitter, and ISUPPORT token parsing. No connection or tracked-state concerns live
//! here — this crate is pure data in, data out.

pub mod commands;
pub mod error;
pub mod framer;
pub mod isupport;
pub mod message;
pub mod splitter;

pub use error::ProtocolError;
pub use framer::LineFramer;
pub use message::{parse_message, Cmd, Ctcp, Msg, MsgTarget, Pfx, Tag};
