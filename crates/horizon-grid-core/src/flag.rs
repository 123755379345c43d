//! Interned behaviour flags.
//!
//! A [`Flag`] is a validated lowercase token (`[a-z_-]`, at least three
//! characters) used as a boolean switch on a session. Flags are interned,
//! so they are `Copy` and cheap to compare and hash.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::error::FlagError;

/// An interned behaviour flag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Flag(&'static str);

impl Flag {
    /// Clicks in the secondary region are allowed through.
    pub const ALLOW_SECONDARY_INTERACTION: Flag = Flag("allow-secondary-interaction");
    /// Clicks in the secondary region close the session.
    pub const CLOSE_ON_SECONDARY_INTERACTION: Flag = Flag("close-on-secondary-interaction");
    /// Clicks outside the grid are allowed through.
    pub const ALLOW_OUTSIDE_INTERACTION: Flag = Flag("allow-outside-interaction");
    /// Clicks outside the grid close the session.
    pub const CLOSE_ON_OUTSIDE_INTERACTION: Flag = Flag("close-on-outside-interaction");
    /// Cursor clicks are treated as outside clicks.
    pub const CONVERT_CURSOR_TO_OUTSIDE: Flag = Flag("convert-cursor-to-outside");
    /// Drag gestures are allowed through.
    pub const ALLOW_DRAG: Flag = Flag("allow-drag");
    /// A disconnect runs the close callbacks. Seeded into every session.
    pub const CLOSE_ON_DISCONNECT: Flag = Flag("close-on-disconnect");

    const BUILTIN: [Flag; 7] = [
        Self::ALLOW_SECONDARY_INTERACTION,
        Self::CLOSE_ON_SECONDARY_INTERACTION,
        Self::ALLOW_OUTSIDE_INTERACTION,
        Self::CLOSE_ON_OUTSIDE_INTERACTION,
        Self::CONVERT_CURSOR_TO_OUTSIDE,
        Self::ALLOW_DRAG,
        Self::CLOSE_ON_DISCONNECT,
    ];

    /// Validate and intern a flag.
    pub fn new(name: &str) -> Result<Self, FlagError> {
        validate(name)?;
        let mut interned = interner().lock();
        if let Some(&existing) = interned.get(name) {
            return Ok(Flag(existing));
        }
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        interned.insert(leaked);
        tracing::trace!(target: "horizon_grid_core::flag", flag = leaked, "interned flag");
        Ok(Flag(leaked))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

fn interner() -> &'static Mutex<HashSet<&'static str>> {
    static INTERNER: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    INTERNER.get_or_init(|| Mutex::new(Flag::BUILTIN.iter().map(|f| f.0).collect()))
}

fn validate(name: &str) -> Result<(), FlagError> {
    if name.chars().count() < 3 {
        return Err(FlagError::TooShort(name.to_string()));
    }
    if let Some(character) = name
        .chars()
        .find(|&c| !(c.is_ascii_lowercase() || c == '_' || c == '-'))
    {
        return Err(FlagError::InvalidCharacter {
            flag: name.to_string(),
            character,
        });
    }
    Ok(())
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flag({})", self.0)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<&str> for Flag {
    type Error = FlagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Flag::new(value)
    }
}

/// A set of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: BTreeSet<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag. Returns `true` if it was not already set.
    pub fn insert(&mut self, flag: Flag) -> bool {
        self.flags.insert(flag)
    }

    /// Remove a flag. Returns `true` if it was set.
    pub fn remove(&mut self, flag: Flag) -> bool {
        self.flags.remove(&flag)
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.flags.iter().copied()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

impl Extend<Flag> for FlagSet {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        self.flags.extend(iter);
    }
}
