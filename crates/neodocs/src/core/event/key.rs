//! This module contains the primitives that turn a keypress into the canonical
//! tokens the keymap is indexed by.
//!
//! A token is either a bare key name (`j`, `Enter`, `?`) or a key name wrapped
//! with its modifier flags, as in `<SC-k>`. Flags are always emitted in the
//! fixed order Shift, Ctrl, Alt, Meta, Mouse, so two presses with the same set
//! of modifiers always produce the same token.
use std::{fmt, ops::Add};

use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseError, Result};

/// Modifier state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
    /// Meta (Command on macOS) is active.
    pub meta: bool,
    /// The press came from a mouse button rather than the keyboard.
    pub mouse: bool,
}

impl Mods {
    /// Is any flag set?
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta || self.mouse
    }

    /// The letter each flag contributes to a token, in canonical order, paired
    /// with whether the flag is held.
    fn flags(&self) -> [(char, bool); 5] {
        [
            ('S', self.shift),
            ('C', self.ctrl),
            ('A', self.alt),
            ('M', self.meta),
            ('O', self.mouse),
        ]
    }

    /// Set the flag named by a token letter. Returns false if the letter is
    /// unknown or the flag was already set.
    fn set_flag(&mut self, flag: char) -> bool {
        let slot = match flag {
            'S' => &mut self.shift,
            'C' => &mut self.ctrl,
            'A' => &mut self.alt,
            'M' => &mut self.meta,
            'O' => &mut self.mouse,
            _ => return false,
        };
        if *slot {
            return false;
        }
        *slot = true;
        true
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
            mouse: self.mouse || other.mouse,
        }
    }
}

impl Add<&str> for Mods {
    type Output = KeyPress;

    fn add(self, key: &str) -> Self::Output {
        KeyPress {
            key: key.to_string(),
            mods: self,
        }
    }
}

impl Add<char> for Mods {
    type Output = KeyPress;

    fn add(self, key: char) -> Self::Output {
        KeyPress {
            key: key.to_string(),
            mods: self,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
    meta: false,
    mouse: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ..Empty
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods { ctrl: true, ..Empty };

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods { alt: true, ..Empty };

/// Meta-only modifier state.
#[allow(non_upper_case_globals)]
pub const Meta: Mods = Mods { meta: true, ..Empty };

/// Mouse marker.
#[allow(non_upper_case_globals)]
pub const Mouse: Mods = Mods {
    mouse: true,
    ..Empty
};

/// A key name along with the modifiers held when it was pressed.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct KeyPress {
    /// Key name, e.g. `k`, `Enter` or `ArrowUp`.
    pub key: String,
    /// Modifier state.
    pub mods: Mods,
}

impl KeyPress {
    /// Construct a key press.
    pub fn new(key: impl Into<String>, mods: Mods) -> Self {
        Self {
            key: key.into(),
            mods,
        }
    }

    /// Encode this press as a canonical token.
    pub fn encode(&self) -> KeyComb {
        KeyComb::encode(&self.key, self.mods)
    }

    /// Parse a token back into a key press.
    ///
    /// `<FLAGS-key>` is recognised when FLAGS is a non-empty run of upper-case
    /// letters; the letters may come in any order but each must name a known
    /// flag exactly once. Anything else is a bare key name.
    pub fn parse(token: &str) -> Result<Self> {
        let Some((flags, key)) = token
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .and_then(|inner| inner.split_once('-'))
            .filter(|(flags, key)| {
                !flags.is_empty() && !key.is_empty() && flags.chars().all(|c| c.is_ascii_uppercase())
            })
        else {
            return Ok(Self::new(token, Empty));
        };

        let mut mods = Empty;
        for flag in flags.chars() {
            if !mods.set_flag(flag) {
                return Err(ParseError::with_input(
                    format!("unknown or repeated modifier flag {flag:?}"),
                    token,
                )
                .into());
            }
        }
        Ok(Self::new(key, mods))
    }
}

impl From<char> for KeyPress {
    fn from(c: char) -> Self {
        Self::new(c.to_string(), Empty)
    }
}

impl From<&str> for KeyPress {
    fn from(s: &str) -> Self {
        Self::new(s, Empty)
    }
}

/// A canonical key token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyComb(String);

impl KeyComb {
    /// Build the canonical token for a key name and modifier state.
    pub fn encode(key: &str, mods: Mods) -> Self {
        let flags: String = mods
            .flags()
            .iter()
            .filter(|(_, held)| *held)
            .map(|(letter, _)| *letter)
            .collect();
        if flags.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("<{flags}-{key}>"))
        }
    }

    /// Parse a token written in any flag order into its canonical form.
    pub fn parse(token: &str) -> Result<Self> {
        Ok(KeyPress::parse(token)?.encode())
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyComb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tokens built from literal strings are taken verbatim.
impl From<&str> for KeyComb {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<char> for KeyComb {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl From<KeyPress> for KeyComb {
    fn from(k: KeyPress) -> Self {
        k.encode()
    }
}

impl From<KeyComb> for String {
    fn from(k: KeyComb) -> Self {
        k.0
    }
}

impl TryFrom<String> for KeyComb {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

/// An ordered sequence of tokens that together trigger a binding.
///
/// Most chords are a single token. Multi-stroke chords such as `g g` share
/// their prefix with every other chord that starts the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chord(Vec<KeyComb>);

impl Chord {
    /// Construct a chord from a token sequence.
    pub fn new(tokens: Vec<KeyComb>) -> Self {
        Self(tokens)
    }

    /// Parse each token of a sequence into canonical form.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        tokens
            .iter()
            .map(|t| KeyComb::parse(t.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// The tokens of this chord.
    pub fn tokens(&self) -> &[KeyComb] {
        &self.0
    }

    /// Number of strokes in the chord.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is this the empty chord?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, k) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{k}")?;
        }
        Ok(())
    }
}

impl From<KeyComb> for Chord {
    fn from(k: KeyComb) -> Self {
        Self(vec![k])
    }
}

impl From<KeyPress> for Chord {
    fn from(k: KeyPress) -> Self {
        Self(vec![k.encode()])
    }
}

impl From<&str> for Chord {
    fn from(s: &str) -> Self {
        Self(vec![s.into()])
    }
}

impl From<char> for Chord {
    fn from(c: char) -> Self {
        Self(vec![c.into()])
    }
}

impl From<Vec<KeyComb>> for Chord {
    fn from(v: Vec<KeyComb>) -> Self {
        Self(v)
    }
}

impl From<&[KeyComb]> for Chord {
    fn from(v: &[KeyComb]) -> Self {
        Self(v.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Chord {
    fn from(v: [&str; N]) -> Self {
        Self(v.iter().map(|s| KeyComb::from(*s)).collect())
    }
}
