//! Named commands and the registry that resolves them.
//!
//! Registering a name again shadows the earlier command until the later one
//! is unset.

use std::{collections::HashMap, fmt, rc::Rc};

use crate::{
    Neodocs,
    element::Element,
    error::{Error, Result},
    state::NeodocsState,
};

/// Everything a command receives when it runs.
pub struct Invocation<'a> {
    /// The application instance the command runs against.
    pub app: &'a Neodocs,
    /// Shared mutable state.
    pub state: &'a mut NeodocsState,
    /// The triggering element: the active panel's element for keyboard input
    /// and direct calls, the event target for mouse input.
    pub element: Rc<dyn Element>,
    /// Extra arguments supplied by the caller.
    pub args: &'a [String],
}

/// A runnable command.
pub type Command = Rc<dyn Fn(&mut Invocation<'_>) -> Result<()>>;

/// Wrap a closure as a command.
pub fn command<F>(f: F) -> Command
where
    F: Fn(&mut Invocation<'_>) -> Result<()> + 'static,
{
    Rc::new(f)
}

/// Resolves symbolic action names to commands at invocation time.
pub trait ActionResolver {
    /// Return the command currently registered under `name`.
    fn resolve(&self, name: &str) -> Result<Command>;
}

/// A flat registry of named commands.
///
/// Each name holds a stack of commands. Setting a name pushes onto its stack
/// and the most recent command is the one that runs, so a plugin can override
/// a built-in command and restore it again by unsetting its own.
#[derive(Default)]
pub struct CommandRegistry {
    /// Command stacks by name, oldest first.
    commands: HashMap<String, Vec<Command>>,
}

impl CommandRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under a name. With `overwrite`, every command
    /// previously registered under the name is dropped first.
    pub fn set(&mut self, name: &str, command: Command, overwrite: bool) {
        if overwrite {
            self.unset_all(name);
        }
        self.commands
            .entry(name.to_string())
            .or_default()
            .push(command);
    }

    /// Remove a specific command from a name's stack. Commands are compared by
    /// identity. Returns true if the command was found.
    pub fn unset(&mut self, name: &str, command: &Command) -> bool {
        let Some(stack) = self.commands.get_mut(name) else {
            tracing::warn!("command {name:?} not found for unsetting");
            return false;
        };
        let before = stack.len();
        stack.retain(|c| !Rc::ptr_eq(c, command));
        stack.len() != before
    }

    /// Remove every command registered under a name.
    pub fn unset_all(&mut self, name: &str) {
        self.commands.remove(name);
    }

    /// Return the most recently registered command for a name.
    pub fn get(&self, name: &str) -> Result<Command> {
        self.commands
            .get(name)
            .and_then(|stack| stack.last())
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("command {name:?}")))
    }

    /// Does the name resolve to a command?
    pub fn contains(&self, name: &str) -> bool {
        self.commands.get(name).is_some_and(|s| !s.is_empty())
    }

    /// Names that currently resolve to a command, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .commands
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl ActionResolver for CommandRegistry {
    fn resolve(&self, name: &str) -> Result<Command> {
        self.get(name)
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("names", &self.names())
            .finish()
    }
}
