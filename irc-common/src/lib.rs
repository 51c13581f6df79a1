//! Common types shared by the wire and client crates: case-insensitive
//! channel and nick identifiers, and the monotonic clock collaborator.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::time::Instant;

/// Channel names according to RFC 2812, section 1.3. Channel names are case insensitive, so this
/// type defines `Eq`, and `Hash` traits that work in a case-insensitive way. `ChanName::display`
/// method shows the channel name with the original casing.
#[derive(Debug, Clone)]
pub struct ChanName(String);

/// Slice version of `ChanName`
#[derive(Debug)]
pub struct ChanNameRef(str);

impl Deref for ChanName {
    type Target = ChanNameRef;

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}

// https://github.com/rust-lang/rust/blob/10b3595ba6a4c658c9dea105488fc562c815e434/library/std/src/path.rs#L1735
impl AsRef<ChanNameRef> for ChanName {
    fn as_ref(&self) -> &ChanNameRef {
        ChanNameRef::new(self.0.as_ref())
    }
}

impl<'a> Borrow<ChanNameRef> for ChanName {
    fn borrow(&self) -> &ChanNameRef {
        self.as_ref()
    }
}

// Used to normalize channel and nick names. Rules are:
//
// - ASCII characters are mapped to their lowercase versions
// - '[', ']', '\\', '~' are mapped to '{', '}', '|', '^', respectively. See RFC 2812 section 2.2.
// - Non-ASCII characters are left unchanged.
fn to_lower(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c.to_ascii_lowercase(),
    }
}

impl ChanName {
    pub fn new(name: String) -> Self {
        ChanName(name)
    }

    pub fn display(&self) -> &str {
        &self.0
    }
}

impl ChanNameRef {
    pub fn new(name: &str) -> &Self {
        unsafe { &*(name as *const str as *const ChanNameRef) }
    }

    pub fn display(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> String {
        self.0.chars().map(to_lower).collect()
    }

    pub fn is_channel(&self) -> bool {
        self.0.starts_with('#')
    }
}

impl ToOwned for ChanNameRef {
    type Owned = ChanName;

    fn to_owned(&self) -> Self::Owned {
        ChanName(self.0.to_owned())
    }
}

impl PartialEq for ChanName {
    fn eq(&self, other: &Self) -> bool {
        let self_borrowed: &ChanNameRef = self.borrow();
        let other_borrowed: &ChanNameRef = other.borrow();
        self_borrowed.eq(other_borrowed)
    }
}

impl Eq for ChanName {}

impl PartialEq<ChanNameRef> for ChanName {
    fn eq(&self, other: &ChanNameRef) -> bool {
        let self_borrowed: &ChanNameRef = self.borrow();
        self_borrowed.eq(other)
    }
}

impl Hash for ChanName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let self_borrowed: &ChanNameRef = self.borrow();
        self_borrowed.hash(state)
    }
}

impl PartialEq for ChanNameRef {
    fn eq(&self, other: &Self) -> bool {
        // https://github.com/rust-lang/rust/blob/b4acb110333392ecdaf890fce080e4b576106aae/library/core/src/slice/mod.rs#L6678-L6684

        // All characters in ASCII have the same encoding length so we can compare byte lenghts.
        if self.0.as_bytes().len() != other.0.as_bytes().len() {
            return false;
        }

        self.0
            .chars()
            .map(to_lower)
            .zip(other.0.chars().map(to_lower))
            .all(|(a, b)| a == b)
    }
}

impl Eq for ChanNameRef {}

impl PartialEq<ChanName> for ChanNameRef {
    fn eq(&self, other: &ChanName) -> bool {
        let other_borrowed: &ChanNameRef = other.borrow();
        self.eq(other_borrowed)
    }
}

impl Hash for ChanNameRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // https://github.com/rust-lang/rust/blob/b4acb110333392ecdaf890fce080e4b576106aae/library/core/src/hash/mod.rs#L653-L656
        self.0.len().hash(state);
        for c in self.0.chars() {
            to_lower(c).hash(state);
        }
    }
}

/// IRC nicknames. Case insensitive like `ChanName`, using the same RFC 2812 casemap, so the same
/// owned/borrowed split applies: `Nick` owns the original casing, `NickRef` is the slice form used
/// as a map key.
#[derive(Debug, Clone)]
pub struct Nick(String);

#[derive(Debug)]
pub struct NickRef(str);

impl Deref for Nick {
    type Target = NickRef;

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}

impl AsRef<NickRef> for Nick {
    fn as_ref(&self) -> &NickRef {
        NickRef::new(self.0.as_ref())
    }
}

impl<'a> Borrow<NickRef> for Nick {
    fn borrow(&self) -> &NickRef {
        self.as_ref()
    }
}

impl Nick {
    pub fn new(name: String) -> Self {
        Nick(name)
    }

    pub fn display(&self) -> &str {
        &self.0
    }
}

impl NickRef {
    pub fn new(name: &str) -> &Self {
        unsafe { &*(name as *const str as *const NickRef) }
    }

    pub fn display(&self) -> &str {
        &self.0
    }

    pub fn normalized(&self) -> String {
        self.0.chars().map(to_lower).collect()
    }
}

impl ToOwned for NickRef {
    type Owned = Nick;

    fn to_owned(&self) -> Self::Owned {
        Nick(self.0.to_owned())
    }
}

impl PartialEq for Nick {
    fn eq(&self, other: &Self) -> bool {
        let self_borrowed: &NickRef = self.borrow();
        let other_borrowed: &NickRef = other.borrow();
        self_borrowed.eq(other_borrowed)
    }
}

impl Eq for Nick {}

impl PartialEq<NickRef> for Nick {
    fn eq(&self, other: &NickRef) -> bool {
        let self_borrowed: &NickRef = self.borrow();
        self_borrowed.eq(other)
    }
}

impl Hash for Nick {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let self_borrowed: &NickRef = self.borrow();
        self_borrowed.hash(state)
    }
}

impl PartialEq for NickRef {
    fn eq(&self, other: &Self) -> bool {
        if self.0.as_bytes().len() != other.0.as_bytes().len() {
            return false;
        }

        self.0
            .chars()
            .map(to_lower)
            .zip(other.0.chars().map(to_lower))
            .all(|(a, b)| a == b)
    }
}

impl Eq for NickRef {}

impl PartialEq<Nick> for NickRef {
    fn eq(&self, other: &Nick) -> bool {
        let other_borrowed: &NickRef = other.borrow();
        self.eq(other_borrowed)
    }
}

impl Hash for NickRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for c in self.0.chars() {
            to_lower(c).hash(state);
        }
    }
}

/// Source of monotonic time for the engine. The engine never reads the system clock directly so
/// that tests can drive the keep-alive FSM without sleeping.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// `Clock` backed by the real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
