//! Keybinding records: a chord, the modes it applies in, an action and an
//! optional guard condition.

use std::{collections::BTreeSet, fmt, rc::Rc};

use crate::{
    commands::{ActionResolver, Command, Invocation, command},
    element::Element,
    error::Result,
    event::key::Chord,
    state::{Mode, NeodocsState},
};

/// A guard that decides whether a binding is live for the current state and
/// the element that triggered it.
pub type Condition = Rc<dyn Fn(&NeodocsState, &dyn Element) -> bool>;

/// What a binding does when it fires.
#[derive(Clone)]
pub enum Action {
    /// Run this command.
    Direct(Command),
    /// Run whatever command is registered under this name when the binding
    /// fires.
    Named(String),
}

impl Action {
    /// Wrap a closure as a direct action.
    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<()> + 'static,
    {
        Self::Direct(command(f))
    }

    /// Resolve to a runnable command.
    pub fn resolve(&self, resolver: &dyn ActionResolver) -> Result<Command> {
        match self {
            Self::Direct(c) => Ok(c.clone()),
            Self::Named(name) => resolver.resolve(name),
        }
    }

    /// The symbolic name, if this is a named action.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Direct(_) => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct(..)"),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("<closure>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Command> for Action {
    fn from(c: Command) -> Self {
        Self::Direct(c)
    }
}

/// Optional parts of a binding.
#[derive(Clone, Default)]
pub struct BindingOptions {
    /// Modes the binding applies in. `None` means normal mode only.
    modes: Option<Vec<Mode>>,
    /// Guard condition.
    condition: Option<Condition>,
}

impl BindingOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mode the binding applies in.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.modes.get_or_insert_with(Vec::new).push(mode);
        self
    }

    /// Set the modes the binding applies in.
    pub fn modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        self.modes = Some(modes.into_iter().collect());
        self
    }

    /// Guard the binding with a condition.
    pub fn condition<F>(mut self, f: F) -> Self
    where
        F: Fn(&NeodocsState, &dyn Element) -> bool + 'static,
    {
        self.condition = Some(Rc::new(f));
        self
    }

    /// Guard the binding with an already shared condition.
    pub fn shared_condition(mut self, c: Option<Condition>) -> Self {
        self.condition = c;
        self
    }
}

/// A chord bound to an action in a set of modes.
///
/// Bindings are shared through `Rc`, and the keymap tells bindings apart by
/// pointer identity: two bindings with the same fields are still different
/// bindings.
#[derive(Clone)]
pub struct Keybinding {
    /// The chord that triggers this binding when set through the keymap.
    chord: Chord,
    /// Modes the binding applies in.
    modes: BTreeSet<Mode>,
    /// What to do when the binding fires.
    action: Action,
    /// Optional guard.
    condition: Option<Condition>,
}

impl Keybinding {
    /// Combine a chord, an action and options into a binding. The chord is not
    /// validated.
    pub fn new(chord: impl Into<Chord>, action: impl Into<Action>, opts: BindingOptions) -> Self {
        let modes = match opts.modes {
            Some(m) => m.into_iter().collect(),
            None => BTreeSet::from([Mode::normal()]),
        };
        Self {
            chord: chord.into(),
            modes,
            action: action.into(),
            condition: opts.condition,
        }
    }

    /// The chord this binding was created with.
    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    /// Modes the binding applies in.
    pub fn modes(&self) -> &BTreeSet<Mode> {
        &self.modes
    }

    /// The bound action.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The guard condition, if any.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Does the binding apply in a mode?
    pub fn applies_in(&self, mode: &Mode) -> bool {
        self.modes.contains(mode)
    }

    /// Is the binding eligible to fire: registered for the state's mode, with
    /// its condition (if any) holding for the triggering element?
    pub fn is_eligible(&self, state: &NeodocsState, element: &dyn Element) -> bool {
        self.applies_in(&state.mode) && self.condition.as_ref().is_none_or(|c| c(state, element))
    }
}

impl fmt::Debug for Keybinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keybinding")
            .field("chord", &self.chord)
            .field("modes", &self.modes)
            .field("action", &self.action)
            .field("condition", &self.condition.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{element::BoundElement, error::Error};

    #[test]
    fn defaults() {
        let b = Keybinding::new("j", "scroll-down", BindingOptions::new());
        assert_eq!(b.modes().len(), 1);
        assert!(b.applies_in(&Mode::normal()));
        assert!(b.condition().is_none());
        assert_eq!(b.action().name(), Some("scroll-down"));
        assert_eq!(b.chord(), &Chord::from("j"));
    }

    #[test]
    fn eligibility() -> Result<()> {
        let insert = Mode::new("insert")?;
        let b = Keybinding::new(
            "x",
            "delete",
            BindingOptions::new()
                .modes([insert.clone()])
                .condition(|_, el| el.id() == "content"),
        );
        let mut ns = NeodocsState::new();
        let content = BoundElement::new("content", "div");
        let sidebar = BoundElement::new("sidebar", "div");

        assert!(!b.is_eligible(&ns, &content));
        ns.set_mode(insert);
        assert!(b.is_eligible(&ns, &content));
        assert!(!b.is_eligible(&ns, &sidebar));
        Ok(())
    }

    #[test]
    fn resolve_named() {
        struct Nothing;
        impl ActionResolver for Nothing {
            fn resolve(&self, name: &str) -> Result<Command> {
                Err(Error::NotFound(name.into()))
            }
        }
        assert!(Action::from("missing").resolve(&Nothing).is_err());
        assert!(Action::direct(|_| Ok(())).resolve(&Nothing).is_ok());
    }
}
