//! Parsing of `005 RPL_BOUNCE` (ISUPPORT) tokens relevant to channel-user mode tracking.
//!
//! No teacher counterpart (the teacher never negotiates ISUPPORT); grounded on
//! `sid3xyz-slirc-proto::isupport`'s `PrefixSpec`/`ChanModes` parsing.

use crate::error::ProtocolError;

/// `PREFIX=(modes)prefixes`, e.g. `PREFIX=(ohv)@%+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSpec {
    /// Channel-user mode characters, most privileged first (e.g. `"ohv"`).
    pub modes: String,
    /// Display prefixes, index-aligned with `modes` (e.g. `"@%+"`).
    pub prefixes: String,
}

impl PrefixSpec {
    pub fn parse(s: &str) -> Result<PrefixSpec, ProtocolError> {
        let open = s
            .find('(')
            .ok_or_else(|| ProtocolError::MalformedIsupport(s.to_owned()))?;
        let close = s[open + 1..]
            .find(')')
            .map(|i| open + 1 + i)
            .ok_or_else(|| ProtocolError::MalformedIsupport(s.to_owned()))?;

        let modes = &s[open + 1..close];
        let prefixes = &s[close + 1..];

        if modes.chars().count() != prefixes.chars().count() {
            return Err(ProtocolError::MalformedIsupport(s.to_owned()));
        }

        Ok(PrefixSpec {
            modes: modes.to_owned(),
            prefixes: prefixes.to_owned(),
        })
    }
}

/// `CHANMODES=A,B,C,D`: list / parameterized / nullary-removable / setting-only mode classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanModes {
    pub list: String,
    pub always_param: String,
    pub param_when_set: String,
    pub never_param: String,
}

impl ChanModes {
    pub fn parse(s: &str) -> Result<ChanModes, ProtocolError> {
        let mut parts = s.splitn(4, ',');
        let (a, b, c, d) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        );
        match (a, b, c, d) {
            (Some(a), Some(b), Some(c), Some(d)) => Ok(ChanModes {
                list: a.to_owned(),
                always_param: b.to_owned(),
                param_when_set: c.to_owned(),
                never_param: d.to_owned(),
            }),
            _ => Err(ProtocolError::MalformedIsupport(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_spec_parse() {
        let spec = PrefixSpec::parse("(ohv)@%+").unwrap();
        assert_eq!(spec.modes, "ohv");
        assert_eq!(spec.prefixes, "@%+");
    }

    #[test]
    fn prefix_spec_mismatched_lengths_errors() {
        assert!(PrefixSpec::parse("(ov)@").is_err());
    }

    #[test]
    fn prefix_spec_missing_parens_errors() {
        assert!(PrefixSpec::parse("ov@+").is_err());
    }

    #[test]
    fn chanmodes_parse() {
        let modes = ChanModes::parse("eIbq,k,flj,CFLMPQScgimnprstz").unwrap();
        assert_eq!(modes.list, "eIbq");
        assert_eq!(modes.always_param, "k");
        assert_eq!(modes.param_when_set, "flj");
        assert_eq!(modes.never_param, "CFLMPQScgimnprstz");
    }

    #[test]
    fn chanmodes_missing_field_errors() {
        assert!(ChanModes::parse("a,b,c").is_err());
    }
}
