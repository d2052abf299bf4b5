//! TOML configuration: dispatch options, the panel layout and key bindings.
//!
//! ```toml
//! [dispatch]
//! deferred = false
//!
//! [[panels]]
//! id = "sidebar"
//! type = "sidebar"
//!
//! [[bindings]]
//! keys = ["g", "g"]
//! action = "scroll-top"
//! ```

use std::{fs, path::Path, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{
    Neodocs,
    error::{Error, Result},
    event::key::Chord,
    keybinding::{BindingOptions, Keybinding},
    panel::{PanelType, ROOT_PANEL_ID},
    state::Mode,
};

/// Dispatch options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Queue fired bindings instead of running them immediately.
    #[serde(default)]
    pub deferred: bool,
}

/// The root panel's id, as a serde default.
fn root_panel() -> String {
    ROOT_PANEL_ID.into()
}

/// A panel to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelSpec {
    /// Panel id.
    pub id: String,
    /// Panel type.
    #[serde(rename = "type")]
    pub kind: PanelType,
    /// Parent panel id. Defaults to the root panel.
    #[serde(default = "root_panel")]
    pub parent: String,
}

/// The keys of a binding: one token, or a sequence of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keys {
    /// A single token.
    One(String),
    /// A multi-stroke chord.
    Many(Vec<String>),
}

impl Keys {
    /// Parse into a canonical chord.
    pub fn chord(&self) -> Result<Chord> {
        match self {
            Self::One(k) => Chord::parse(&[k]),
            Self::Many(ks) => Chord::parse(ks),
        }
    }
}

/// A binding to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    /// Chord tokens.
    pub keys: Keys,
    /// Extra chords that trigger the same binding.
    #[serde(default)]
    pub also: Vec<Keys>,
    /// Modes the binding applies in. Empty means normal mode only.
    #[serde(default)]
    pub modes: Vec<Mode>,
    /// Name of the command to run.
    pub action: String,
}

/// A neodocs configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dispatch options.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Panels, created in order.
    #[serde(default)]
    pub panels: Vec<PanelSpec>,
    /// Bindings, registered in order.
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply the configuration to an instance: set dispatch options, create
    /// panels and register bindings. Stops at the first error, leaving
    /// whatever was applied before it in place. Returns the registered
    /// bindings.
    pub fn apply(&self, app: &mut Neodocs) -> Result<Vec<Rc<Keybinding>>> {
        app.deferred_dispatch = self.dispatch.deferred;
        for p in &self.panels {
            app.panels.create(&p.id, p.kind.clone(), Some(&p.parent))?;
        }
        let mut bound = Vec::with_capacity(self.bindings.len());
        for b in &self.bindings {
            let opts = if b.modes.is_empty() {
                BindingOptions::new()
            } else {
                BindingOptions::new().modes(b.modes.iter().cloned())
            };
            let binding = app
                .keymap
                .set(b.keys.chord()?, b.action.as_str(), opts);
            for alt in &b.also {
                app.keymap.set_under(alt.chord()?, binding.clone());
            }
            bound.push(binding);
        }
        tracing::debug!(
            panels = self.panels.len(),
            bindings = bound.len(),
            "configuration applied"
        );
        Ok(bound)
    }
}
