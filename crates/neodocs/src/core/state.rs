//! Session state: the current mode, the chord buffer and panel state.

use std::{
    collections::HashSet,
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    event::key::KeyComb,
    panel::ROOT_PANEL_ID,
};

/// Name of the mode bindings default to.
pub const NORMAL_MODE: &str = "normal";

/// Return true if the character is valid in a mode name.
pub fn valid_mode_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// A named operating mode. Only bindings registered for the current mode are
/// eligible for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mode(String);

impl Mode {
    /// Create a mode, returning an error if the name is empty or contains
    /// characters other than ASCII alphanumerics, `_` and `-`.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() || !name.chars().all(valid_mode_char) {
            return Err(Error::Config(format!("invalid mode name {name:?}")));
        }
        Ok(Self(name.to_string()))
    }

    /// The default mode.
    pub fn normal() -> Self {
        Self(NORMAL_MODE.into())
    }

    /// The mode name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::normal()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Mode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Mode {
    type Error = Error;
    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Mode {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<Mode> for String {
    fn from(m: Mode) -> Self {
        m.0
    }
}

impl PartialEq<&str> for Mode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Visibility and activation state of the panel tree.
///
/// The registry never copies this record: every transition mutates it in
/// place. Two invariants hold across all transitions: once anything has been
/// activated the root panel sits at the bottom of `active_id_stack` and is
/// never popped, and every id on the stack is also displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    /// Ids of panels currently rendered, independent of activation.
    pub displayed_ids: HashSet<String>,
    /// Activation history, bottom to top. The top is the current focus.
    pub active_id_stack: Vec<String>,
}

impl PanelState {
    /// Is the panel displayed?
    pub fn is_displayed(&self, id: &str) -> bool {
        self.displayed_ids.contains(id)
    }

    /// Is the panel anywhere on the active stack?
    pub fn is_active(&self, id: &str) -> bool {
        self.active_id_stack.iter().any(|x| x == id)
    }

    /// The id on top of the active stack, if any.
    pub fn top(&self) -> Option<&str> {
        self.active_id_stack.last().map(String::as_str)
    }
}

/// The mutable state shared between the dispatcher, commands and the panel
/// registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeodocsState {
    /// Current operating mode.
    pub mode: Mode,
    /// Tokens typed so far towards a multi-stroke chord.
    pub key_buffer: Vec<KeyComb>,
    /// Panel visibility and activation.
    pub panel: PanelState,
}

impl NeodocsState {
    /// Construct a state in normal mode with the root panel displayed and
    /// active.
    pub fn new() -> Self {
        let mut panel = PanelState::default();
        panel.displayed_ids.insert(ROOT_PANEL_ID.into());
        panel.active_id_stack.push(ROOT_PANEL_ID.into());
        Self {
            mode: Mode::normal(),
            key_buffer: Vec::new(),
            panel,
        }
    }

    /// Switch to another mode, dropping any partially typed chord.
    pub fn set_mode(&mut self, mode: Mode) {
        self.key_buffer.clear();
        self.mode = mode;
    }
}

impl Default for NeodocsState {
    fn default() -> Self {
        Self::new()
    }
}
