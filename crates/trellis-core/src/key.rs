// crates/trellis-core/src/key.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to one slot of a layout tree.
///
/// Keys are plain indices into the context's record store. They stay valid until the
/// tree is cleared, after which the same numbers are handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlKey(pub u32);

impl ControlKey {
    pub const ROOT: ControlKey = ControlKey(0);
    pub const INVALID: ControlKey = ControlKey(u32::MAX);

    pub fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        ControlKey(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    /// `None` for the invalid sentinel.
    pub fn valid(self) -> Option<ControlKey> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl Default for ControlKey {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#invalid")
        }
    }
}

/// Opaque classification attached to a control. Layout never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTag(pub u32);

impl LayoutTag {
    pub const NONE: LayoutTag = LayoutTag(0);
    pub const ROOT: LayoutTag = LayoutTag(1);
}
