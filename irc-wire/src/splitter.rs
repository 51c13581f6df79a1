//! Outbound message splitter: fragments oversized `PRIVMSG`/`NOTICE`/CTCP payloads across
//! multiple protocol lines.
//!
//! Grounded on `libtiny_client::utils::{SplitIterator, split_iterator, find_idx}`, relocated here
//! because splitting is a protocol-layer concern, not a client-state concern.

/// Reserves room for the server to prepend `:nick!user@host ` (63 + 10 + 1 bytes) plus CRLF to
/// whatever we send, out of the 512-byte protocol maximum.
pub const CONTENT_BUDGET: usize = 512 - 2 - (63 + 10 + 1);

struct SplitIterator<'a> {
    s: Option<&'a str>,
    max: usize,
}

/// Iterate over subslices that are at most `max` bytes long, preferring to split on whitespace.
fn split_iterator(s: &str, max: usize) -> SplitIterator {
    SplitIterator { s: Some(s), max }
}

impl<'a> Iterator for SplitIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.max == 0 {
            return None;
        }

        match self.s {
            None => None,
            Some(s) => {
                if s.len() <= self.max {
                    let ret = Some(s);
                    self.s = None;
                    ret
                } else {
                    let mut split = 0;

                    for (ws_idx, ws_char) in s.rmatch_indices(char::is_whitespace) {
                        if ws_idx <= self.max {
                            if ws_idx + ws_char.len() <= self.max {
                                split = ws_idx + ws_char.len();
                            } else {
                                split = ws_idx;
                            }
                            break;
                        }
                    }

                    if split == 0 {
                        for i in 0..4 {
                            if s.is_char_boundary(self.max - i) {
                                split = self.max - i;
                                break;
                            }
                        }
                    }

                    if split == 0 {
                        // max is smaller than the first character's UTF-8 width; fall back to a
                        // single-byte split so we always make progress.
                        split = 1;
                    }

                    let ret = Some(&s[0..split]);
                    self.s = Some(&s[split..]);
                    ret
                }
            }
        }
    }
}

/// Splits `msg` into fragments each small enough that `"{cmd} {target} :{fragment}"` stays within
/// `CONTENT_BUDGET` bytes.
pub fn split_privmsg<'a>(cmd: &str, target: &str, msg: &'a str) -> Vec<&'a str> {
    let overhead = cmd.len() + 1 + target.len() + 2; // "{cmd} {target} :"
    let budget = CONTENT_BUDGET.saturating_sub(overhead).max(1);
    split_iterator(msg, budget).collect()
}

/// Splits a CTCP payload (tag plus optional message) into fragments, each re-wrapped in `\x01`
/// delimiters with the tag repeated on every fragment after the first.
pub fn split_ctcp<'a>(cmd: &str, target: &str, tag: &str, msg: &'a str) -> Vec<String> {
    let overhead = cmd.len() + 1 + target.len() + 2 + 2; // "{cmd} {target} :" + two 0x01 bytes
    let tag_overhead = tag.len() + 1; // "{tag} "
    let budget = CONTENT_BUDGET
        .saturating_sub(overhead)
        .saturating_sub(tag_overhead)
        .max(1);

    if msg.is_empty() {
        return vec![format!("\x01{}\x01", tag)];
    }

    split_iterator(msg, budget)
        .map(|frag| format!("\x01{} {}\x01", tag, frag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_iterator_prefers_whitespace() {
        let iter = split_iterator("yada yada yada", 5);
        assert_eq!(iter.collect::<Vec<&str>>(), vec!["yada ", "yada ", "yada"]);
    }

    #[test]
    fn split_iterator_hard_splits_long_word() {
        let iter = split_iterator("longwordislong", 3);
        assert_eq!(
            iter.collect::<Vec<&str>>(),
            vec!["lon", "gwo", "rdi", "slo", "ng"]
        );
    }

    #[test]
    fn split_iterator_empty_input() {
        let iter = split_iterator("", 3);
        assert_eq!(iter.collect::<Vec<&str>>(), vec![""]);
    }

    #[test]
    fn split_iterator_zero_budget_is_empty() {
        let iter = split_iterator("abc", 0);
        let ret: Vec<&str> = vec![];
        assert_eq!(iter.collect::<Vec<&str>>(), ret);
    }

    #[test]
    fn split_privmsg_keeps_fragments_under_budget() {
        let payload: String = "A".repeat(500);
        let frags = split_privmsg("PRIVMSG", "#x", &payload);
        assert!(frags.len() >= 2);
        for f in &frags {
            assert!("PRIVMSG".len() + 1 + "#x".len() + 2 + f.len() <= CONTENT_BUDGET);
        }
        assert_eq!(frags.concat(), payload);
    }

    #[test]
    fn split_ctcp_no_message_is_single_frame() {
        let frags = split_ctcp("PRIVMSG", "#x", "VERSION", "");
        assert_eq!(frags, vec!["\x01VERSION\x01".to_string()]);
    }

    #[test]
    fn split_ctcp_wraps_each_fragment() {
        let payload: String = "b".repeat(500);
        let frags = split_ctcp("PRIVMSG", "#x", "ACTION", &payload);
        assert!(frags.len() >= 2);
        for f in &frags {
            assert!(f.starts_with("\x01ACTION "));
            assert!(f.ends_with('\x01'));
        }
    }
}
