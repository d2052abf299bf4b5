//! A builder for registering many bindings that share modes and a condition.

use std::rc::Rc;

use crate::{
    commands::Invocation,
    element::Element,
    error::Result,
    event::key::Chord,
    keybinding::{Action, BindingOptions, Condition, Keybinding},
    keymap::Keymap,
    state::{Mode, NeodocsState},
};

/// Binder provides an ergonomic way to specify a set of key bindings that
/// share a mode set and a guard condition, using a builder pattern.
pub struct Binder<'a> {
    /// Modes for subsequent bindings. `None` means normal mode only.
    modes: Option<Vec<Mode>>,
    /// Condition for subsequent bindings.
    condition: Option<Condition>,
    /// Keymap being configured.
    keymap: &'a mut Keymap,
}

impl<'a> Binder<'a> {
    /// Construct a new binder for a keymap.
    pub fn new(keymap: &'a mut Keymap) -> Self {
        Self {
            modes: None,
            condition: None,
            keymap,
        }
    }

    /// Set a single mode for subsequent bindings.
    pub fn with_mode(mut self, m: Mode) -> Self {
        self.modes = Some(vec![m]);
        self
    }

    /// Set the modes for subsequent bindings.
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        self.modes = Some(modes.into_iter().collect());
        self
    }

    /// Guard subsequent bindings with a condition.
    pub fn with_condition<F>(mut self, f: F) -> Self
    where
        F: Fn(&NeodocsState, &dyn Element) -> bool + 'static,
    {
        self.condition = Some(Rc::new(f));
        self
    }

    /// Drop the condition for subsequent bindings.
    pub fn without_condition(mut self) -> Self {
        self.condition = None;
        self
    }

    /// Options carrying the binder's current modes and condition.
    fn options(&self) -> BindingOptions {
        let opts = BindingOptions::new().shared_condition(self.condition.clone());
        match &self.modes {
            Some(m) => opts.modes(m.iter().cloned()),
            None => opts,
        }
    }

    /// Bind a chord to an action and return the binding.
    pub fn key_id<C, A>(&mut self, chord: C, action: A) -> Rc<Keybinding>
    where
        C: Into<Chord>,
        A: Into<Action>,
    {
        let opts = self.options();
        self.keymap.set(chord, action, opts)
    }

    /// Bind a chord to an action. Tokens are taken verbatim.
    pub fn key<C, A>(mut self, chord: C, action: A) -> Self
    where
        C: Into<Chord>,
        A: Into<Action>,
    {
        let _ = self.key_id(chord, action);
        self
    }

    /// Bind a chord written as whitespace-separated tokens, canonicalizing
    /// each token. Fails if a token doesn't parse.
    pub fn try_keys<A>(mut self, keys: &str, action: A) -> Result<Self>
    where
        A: Into<Action>,
    {
        let tokens: Vec<&str> = keys.split_whitespace().collect();
        let chord = Chord::parse(&tokens)?;
        let _ = self.key_id(chord, action);
        Ok(self)
    }

    /// Bind a chord to a closure.
    pub fn key_command<C, F>(self, chord: C, f: F) -> Self
    where
        C: Into<Chord>,
        F: Fn(&mut Invocation<'_>) -> Result<()> + 'static,
    {
        self.key(chord, Action::direct(f))
    }

    /// Remove a binding from its own chord. Returns true if a binding was
    /// removed.
    pub fn unbind(&mut self, binding: &Rc<Keybinding>) -> bool {
        self.keymap.unset_keybinding(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::key::KeyComb;

    #[test]
    fn shared_modes_and_condition() -> Result<()> {
        let mut km = Keymap::new();
        let visual = Mode::new("visual")?;
        Binder::new(&mut km)
            .key("j", "down")
            .with_modes([Mode::normal(), visual.clone()])
            .with_condition(|_, el| el.tag() == "article")
            .key(["g", "g"], "top")
            .with_mode(visual.clone())
            .without_condition()
            .try_keys("<CS-d>", "half-page")?;

        let down = &km.get_keybindings(&[KeyComb::from("j")])[0];
        assert!(down.applies_in(&Mode::normal()));
        assert!(down.condition().is_none());

        let top = &km.get_keybindings(&[KeyComb::from("g"), KeyComb::from("g")])[0];
        assert!(top.applies_in(&visual));
        assert!(top.condition().is_some());

        let half = &km.get_keybindings(&[KeyComb::from("<SC-d>")])[0];
        assert!(!half.applies_in(&Mode::normal()));
        assert!(half.condition().is_none());
        Ok(())
    }

    #[test]
    fn unbind() {
        let mut km = Keymap::new();
        let mut b = Binder::new(&mut km);
        let id = b.key_id("q", "quit");
        assert!(b.unbind(&id));
        assert!(!b.unbind(&id));
    }

    #[test]
    fn bad_token() {
        let mut km = Keymap::new();
        assert!(Binder::new(&mut km).try_keys("<Z-q>", "quit").is_err());
    }
}
