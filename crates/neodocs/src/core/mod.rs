//! Core types: keys and chords, the keymap, panels and their state machine,
//! commands and dispatch.

/// Binding builder.
pub mod binder;
/// Built-in panel and mode commands.
pub mod builtins;
/// Command registry and invocation.
pub mod commands;
/// Configuration loading.
pub mod config;
/// Chord buffering and binding selection.
pub mod dispatch;
/// Debug dump utilities.
pub mod dump;
/// The seam to UI elements.
pub mod element;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Keybinding records.
pub mod keybinding;
/// The keymap trie.
pub mod keymap;
/// The application context.
pub mod neodocs;
/// User-facing message log.
pub mod notify;
/// Panels and the panel registry.
pub mod panel;
/// Deferred execution.
pub mod schedule;
/// Shared session state.
pub mod state;
/// Panel tree queries.
pub mod tree;

pub use binder::Binder;
pub use neodocs::Neodocs;
