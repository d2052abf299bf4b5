//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::{cell::RefCell, iter, rc::Rc};

use neodocs::{
    Neodocs,
    commands::command,
    dispatch::Outcome,
    element::ElementMap,
    error::Result,
    event::key::KeyComb,
    panel::ROOT_PANEL_ID,
    state::NeodocsState,
};

/// Panel ids in the standard layout, in creation order, with type and parent.
pub const LAYOUT: &[(&str, &str, &str)] = &[
    ("main", "container", ROOT_PANEL_ID),
    ("sidebar", "sidebar", "main"),
    ("files", "file-tree", "sidebar"),
    ("content", "container", "main"),
    ("help", "floating", ROOT_PANEL_ID),
];

/// An instance with the standard layout, an element bound to every panel and
/// a call log fed by recorder commands.
pub struct Harness {
    /// The instance under test.
    pub app: Neodocs,
    /// Session state.
    pub state: NeodocsState,
    /// Calls made by recorder commands, as `name@element`.
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    /// Build the standard fixture.
    pub fn new() -> Result<Self> {
        let ids = iter::once(ROOT_PANEL_ID).chain(LAYOUT.iter().map(|(id, _, _)| *id));
        let mut app = Neodocs::new(ElementMap::new().with_ids(ids, "div"));
        for (id, kind, parent) in LAYOUT {
            app.panels.create(id, *kind, Some(*parent))?;
        }
        Ok(Self {
            app,
            state: NeodocsState::new(),
            calls: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Register a command that records its invocations.
    pub fn recorder(&mut self, name: &str) {
        let calls = self.calls.clone();
        let label = name.to_string();
        self.app.commands.set(
            name,
            command(move |inv| {
                calls
                    .borrow_mut()
                    .push(format!("{label}@{}", inv.element.id()));
                Ok(())
            }),
            false,
        );
    }

    /// Dispatch one key.
    pub fn key(&mut self, k: &str) -> Result<Outcome> {
        self.app.dispatch(&mut self.state, KeyComb::from(k))
    }

    /// Dispatch keys in order, returning the last outcome.
    pub fn keys(&mut self, ks: &[&str]) -> Result<Outcome> {
        let mut last = Outcome::Unbound;
        for k in ks {
            last = self.key(k)?;
        }
        Ok(last)
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}
