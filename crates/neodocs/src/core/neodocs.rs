//! The application context and the dispatch entry points.

use std::{io::Write, rc::Rc};

use crate::{
    Binder,
    commands::{CommandRegistry, Invocation},
    dispatch::{self, Outcome},
    doctree::DocTrees,
    element::{Element, ElementLookup, ElementMap},
    error::Result,
    event::key::KeyComb,
    keybinding::Action,
    keymap::Keymap,
    notify::NotifyLog,
    panel::PanelRegistry,
    schedule::{Job, Scheduler},
    state::NeodocsState,
};

/// The application context. It owns every registry a neodocs instance needs
/// and is passed explicitly to everything that uses them.
///
/// Mutable session state lives in a separate [`NeodocsState`], so that
/// commands can read the registries while changing state.
pub struct Neodocs {
    /// Chord bindings.
    pub keymap: Keymap,
    /// Named commands.
    pub commands: CommandRegistry,
    /// The panel tree.
    pub panels: PanelRegistry,
    /// Documentation trees.
    pub trees: DocTrees,
    /// User-facing message log.
    pub notify: NotifyLog,
    /// Element lookup for panels and doc nodes.
    pub elements: Box<dyn ElementLookup>,
    /// When set, bindings that fire are queued instead of run immediately.
    pub deferred_dispatch: bool,
    /// Deferred jobs.
    scheduler: Scheduler,
}

impl Default for Neodocs {
    fn default() -> Self {
        Self::new(ElementMap::new())
    }
}

impl Neodocs {
    /// Construct an instance with empty registries, resolving elements
    /// through `elements`.
    pub fn new(elements: impl ElementLookup + 'static) -> Self {
        Self {
            keymap: Keymap::new(),
            commands: CommandRegistry::new(),
            panels: PanelRegistry::new(),
            trees: DocTrees::new(),
            notify: NotifyLog::new(),
            elements: Box::new(elements),
            deferred_dispatch: false,
            scheduler: Scheduler::new(),
        }
    }

    /// A binder over this instance's keymap.
    pub fn bind(&mut self) -> Binder<'_> {
        Binder::new(&mut self.keymap)
    }

    /// The element bound to the active panel.
    pub fn active_element(&self, state: &NeodocsState) -> Result<Rc<dyn Element>> {
        self.panels
            .active_element(&state.panel, self.elements.as_ref())
    }

    /// Resolve an action and run it against an element.
    pub fn invoke(
        &self,
        state: &mut NeodocsState,
        action: &Action,
        element: Rc<dyn Element>,
        args: &[String],
    ) -> Result<()> {
        let cmd = action.resolve(&self.commands)?;
        tracing::debug!("invoking {action} on {}", element.id());
        cmd(&mut Invocation {
            app: self,
            state,
            element,
            args,
        })
    }

    /// Run a named command against an element, or against the active panel's
    /// element if none is given.
    pub fn run(
        &self,
        state: &mut NeodocsState,
        name: &str,
        element: Option<Rc<dyn Element>>,
        args: &[String],
    ) -> Result<()> {
        let element = match element {
            Some(e) => e,
            None => self.active_element(state)?,
        };
        self.invoke(state, &Action::from(name), element, args)
    }

    /// Queue a named command to run on a later turn. The element is resolved
    /// now; the command is resolved when the job runs.
    pub fn schedule(
        &self,
        state: &NeodocsState,
        name: &str,
        element: Option<Rc<dyn Element>>,
        args: &[String],
    ) -> Result<()> {
        let element = match element {
            Some(e) => e,
            None => self.active_element(state)?,
        };
        self.scheduler.push(Job {
            action: Action::from(name),
            element,
            args: args.to_vec(),
        });
        Ok(())
    }

    /// Number of queued jobs.
    pub fn pending_jobs(&self) -> usize {
        self.scheduler.len()
    }

    /// Run every job queued before this call, oldest first. Jobs queued while
    /// draining wait for the next call. A failing job doesn't stop the rest;
    /// the first failure is returned once the batch is done.
    pub fn run_pending(&self, state: &mut NeodocsState) -> Result<usize> {
        let batch = self.scheduler.take_batch();
        let n = batch.len();
        let mut first_err = None;
        for job in batch {
            if let Err(e) = self.invoke(state, &job.action, job.element, &job.args) {
                tracing::error!("deferred {} failed: {e}", job.action);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(n),
        }
    }

    /// Dispatch a key against the active panel's element.
    pub fn dispatch(&self, state: &mut NeodocsState, key: impl Into<KeyComb>) -> Result<Outcome> {
        self.dispatch_on(state, key, None)
    }

    /// Dispatch a key against the element bound to a given panel rather than
    /// the active one. Hosts use this for mouse input, passing the panel
    /// under the pointer.
    pub fn dispatch_at(
        &self,
        state: &mut NeodocsState,
        key: impl Into<KeyComb>,
        panel_id: &str,
    ) -> Result<Outcome> {
        let element = self.panels.element(panel_id, self.elements.as_ref())?;
        self.dispatch_on(state, key, Some(element))
    }

    /// Dispatch a key. The element defaults to the active panel's element;
    /// mouse input supplies the element under the pointer instead.
    pub fn dispatch_on(
        &self,
        state: &mut NeodocsState,
        key: impl Into<KeyComb>,
        element: Option<Rc<dyn Element>>,
    ) -> Result<Outcome> {
        let Some(node) = dispatch::advance(&self.keymap, state, key.into()) else {
            tracing::debug!("unbound key");
            return Ok(Outcome::Unbound);
        };

        let candidates = node.bindings();
        let winner = if candidates.is_empty() {
            None
        } else {
            let element = match element {
                Some(e) => e,
                None => self.active_element(state).inspect_err(|_| {
                    state.key_buffer.clear();
                })?,
            };
            dispatch::select(candidates, state, element.as_ref())
                .cloned()
                .map(|b| (b, element))
        };

        match winner {
            Some((binding, element)) => {
                state.key_buffer.clear();
                if self.deferred_dispatch {
                    tracing::debug!("scheduling {}", binding.action());
                    self.scheduler.push(Job {
                        action: binding.action().clone(),
                        element,
                        args: Vec::new(),
                    });
                    Ok(Outcome::Scheduled(binding))
                } else {
                    self.invoke(state, binding.action(), element, &[])?;
                    Ok(Outcome::Invoked(binding))
                }
            }
            None if node.has_children() => {
                tracing::debug!("pending chord {:?}", state.key_buffer);
                Ok(Outcome::Pending)
            }
            None => {
                state.key_buffer.clear();
                Ok(Outcome::Unbound)
            }
        }
    }

    /// Tokens that may follow the keys buffered so far.
    pub fn pending_continuations(&self, state: &NeodocsState) -> Vec<KeyComb> {
        dispatch::continuations(&self.keymap, state)
    }

    /// Pretty print the binding table.
    pub fn print_binding_table(&self, w: &mut dyn Write) -> Result<()> {
        self.keymap.print_binding_table(w)
    }
}
