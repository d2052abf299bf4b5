//! Neodocs: keyboard-driven documentation browsing.
//!
//! Neodocs resolves chorded keybindings through a prefix trie, filtered by
//! mode and guard conditions, and routes the winning action to the active
//! panel of a panel tree whose visibility and activation are tracked as a
//! displayed set plus an activation stack.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Neodocs`] - The application context owning every registry
//! - [`state::NeodocsState`] - Mutable session state
//! - [`Binder`] - A builder for key bindings
//!
//! # Module Organization
//!
//! - [`keymap`] - The chord trie and its facade
//! - [`panel`] - Panels and the visibility/activation state machine
//! - [`doctree`] - Documentation trees and markdown rendering

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod doctree;

// Re-export core application types
pub use core::{Binder, Neodocs};
pub use core::{
    builtins, commands, config, dispatch, dump, element, error, event, keybinding, keymap,
    notify, panel, schedule, state, tree,
};
