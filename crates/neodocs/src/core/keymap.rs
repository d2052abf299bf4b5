//! The keybinding trie and the keymap facade over it.

use std::{collections::HashMap, io::Write, rc::Rc};

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use slotmap::{SlotMap, new_key_type};

use crate::{
    error::Result,
    event::key::{Chord, KeyComb},
    keybinding::{Action, BindingOptions, Keybinding},
};

new_key_type! {
    /// Opaque identifier for a node stored in the keymap arena.
    pub struct KeymapNodeId;
}

/// A node in the keymap trie.
///
/// The path of tokens from the root to a node is the chord that reaches it.
#[derive(Debug)]
pub struct KeymapNode {
    /// The token on the edge into this node. Empty for the root.
    token: KeyComb,
    /// Bindings whose chord ends here, in registration order.
    bindings: Vec<Rc<Keybinding>>,
    /// Parent node. Never followed during lookup; used to rebuild a node's
    /// chord when listing bindings.
    parent: Option<KeymapNodeId>,
    /// Child nodes by token.
    children: HashMap<KeyComb, KeymapNodeId>,
}

impl KeymapNode {
    /// Construct an empty node.
    fn new(token: KeyComb, parent: Option<KeymapNodeId>) -> Self {
        Self {
            token,
            bindings: Vec::new(),
            parent,
            children: HashMap::new(),
        }
    }

    /// The token on the edge into this node.
    pub fn token(&self) -> &KeyComb {
        &self.token
    }

    /// Bindings whose chord ends here, in registration order.
    pub fn bindings(&self) -> &[Rc<Keybinding>] {
        &self.bindings
    }

    /// Parent node, if this isn't the root.
    pub fn parent(&self) -> Option<KeymapNodeId> {
        self.parent
    }

    /// Does any longer chord continue through this node?
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Tokens that continue a chord from this node, sorted.
    pub fn continuations(&self) -> Vec<&KeyComb> {
        let mut v: Vec<&KeyComb> = self.children.keys().collect();
        v.sort();
        v
    }
}

/// A prefix tree over chord tokens.
///
/// Nodes live in an arena and refer to each other by key. They are created on
/// first insertion along a path and are never pruned, even once empty.
#[derive(Debug)]
pub struct KeymapTrie {
    /// Node arena.
    nodes: SlotMap<KeymapNodeId, KeymapNode>,
    /// The root node, reached by the empty chord.
    root: KeymapNodeId,
}

impl Default for KeymapTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeymapTrie {
    /// Construct a trie holding only the root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(KeymapNode::new(KeyComb::default(), None));
        Self { nodes, root }
    }

    /// The root node id.
    pub fn root(&self) -> KeymapNodeId {
        self.root
    }

    /// Return a node by id.
    pub fn node(&self, id: KeymapNodeId) -> Option<&KeymapNode> {
        self.nodes.get(id)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the trie just the root?
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Walk a chord through existing nodes only.
    fn find(&self, chord: &[KeyComb]) -> Option<KeymapNodeId> {
        let mut current = self.root;
        for token in chord {
            current = *self.nodes[current].children.get(token)?;
        }
        Some(current)
    }

    /// Add a binding at the end of a chord, creating missing nodes on the way.
    /// The empty chord adds the binding to the root itself.
    pub fn insert(&mut self, chord: &[KeyComb], binding: Rc<Keybinding>) {
        let mut current = self.root;
        for token in chord {
            current = match self.nodes[current].children.get(token) {
                Some(next) => *next,
                None => {
                    let next = self
                        .nodes
                        .insert(KeymapNode::new(token.clone(), Some(current)));
                    self.nodes[current].children.insert(token.clone(), next);
                    next
                }
            };
        }
        self.nodes[current].bindings.push(binding);
    }

    /// Remove a binding from the end of a chord, comparing by identity. A
    /// chord that was never inserted is not an error. Returns true if a
    /// binding was removed.
    pub fn remove(&mut self, chord: &[KeyComb], binding: &Rc<Keybinding>) -> bool {
        let Some(id) = self.find(chord) else {
            return false;
        };
        let bindings = &mut self.nodes[id].bindings;
        match bindings.iter().position(|b| Rc::ptr_eq(b, binding)) {
            Some(idx) => {
                bindings.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Return the node at the end of a chord.
    pub fn lookup(&self, chord: &[KeyComb]) -> Option<&KeymapNode> {
        self.find(chord).map(|id| &self.nodes[id])
    }

    /// Bindings at the end of a chord in registration order. Empty if the
    /// chord leads nowhere.
    pub fn bindings_at(&self, chord: &[KeyComb]) -> &[Rc<Keybinding>] {
        self.lookup(chord).map(KeymapNode::bindings).unwrap_or(&[])
    }

    /// Rebuild the chord that leads to a node by following parent links.
    pub fn chord_of(&self, id: KeymapNodeId) -> Chord {
        let mut tokens = Vec::new();
        let mut current = Some(id);
        while let Some(nid) = current {
            let Some(node) = self.nodes.get(nid) else {
                break;
            };
            if node.parent.is_some() {
                tokens.push(node.token.clone());
            }
            current = node.parent;
        }
        tokens.reverse();
        Chord::new(tokens)
    }

    /// Every (chord, binding) pair in the trie, sorted by chord and then by
    /// registration order.
    pub fn entries(&self) -> Vec<(Chord, Rc<Keybinding>)> {
        let mut out: Vec<(Chord, Rc<Keybinding>)> = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.bindings.is_empty())
            .flat_map(|(id, node)| {
                let chord = self.chord_of(id);
                node.bindings
                    .iter()
                    .map(move |b| (chord.clone(), b.clone()))
            })
            .collect();
        // Stable sort keeps registration order within a node.
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

/// The keymap owns one trie and wraps it with binding-level operations.
///
/// The keymap does no mode or condition filtering: it returns every binding
/// registered at a chord and leaves the choice to the dispatcher.
#[derive(Debug, Default)]
pub struct Keymap {
    /// Chord trie.
    trie: KeymapTrie,
}

impl Keymap {
    /// Construct an empty keymap.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying trie.
    pub fn trie(&self) -> &KeymapTrie {
        &self.trie
    }

    /// Build a binding without registering it.
    pub fn create_keybinding(
        chord: impl Into<Chord>,
        action: impl Into<Action>,
        opts: BindingOptions,
    ) -> Keybinding {
        Keybinding::new(chord, action, opts)
    }

    /// Register a binding under its own chord.
    pub fn set_keybinding(&mut self, binding: Keybinding) -> Rc<Keybinding> {
        let binding = Rc::new(binding);
        self.set_shared(binding.clone());
        binding
    }

    /// Register an already shared binding under its own chord.
    pub fn set_shared(&mut self, binding: Rc<Keybinding>) {
        let chord = binding.chord().clone();
        self.trie.insert(chord.tokens(), binding);
    }

    /// Register a binding under an additional chord. The binding stays one
    /// binding: unsetting it under one chord leaves it in place under others.
    pub fn set_under(&mut self, chord: impl Into<Chord>, binding: Rc<Keybinding>) {
        let chord = chord.into();
        self.trie.insert(chord.tokens(), binding);
    }

    /// Create and register a binding.
    pub fn set(
        &mut self,
        chord: impl Into<Chord>,
        action: impl Into<Action>,
        opts: BindingOptions,
    ) -> Rc<Keybinding> {
        self.set_keybinding(Keybinding::new(chord, action, opts))
    }

    /// Unregister a binding from its own chord. Unsetting a binding that isn't
    /// there logs a warning and changes nothing.
    pub fn unset_keybinding(&mut self, binding: &Rc<Keybinding>) -> bool {
        self.unset_under(binding.chord().clone(), binding)
    }

    /// Unregister a binding from a specific chord.
    pub fn unset_under(&mut self, chord: impl Into<Chord>, binding: &Rc<Keybinding>) -> bool {
        let chord = chord.into();
        let removed = self.trie.remove(chord.tokens(), binding);
        if !removed {
            tracing::warn!("keybinding for {:?} not found for unsetting", chord.to_string());
        }
        removed
    }

    /// Bindings registered at a chord, in registration order.
    pub fn get_keybindings(&self, chord: &[KeyComb]) -> &[Rc<Keybinding>] {
        self.trie.bindings_at(chord)
    }

    /// Register several bindings. There is no atomicity: each is set in turn.
    pub fn set_keybindings(&mut self, bindings: impl IntoIterator<Item = Rc<Keybinding>>) {
        for b in bindings {
            self.set_shared(b);
        }
    }

    /// Unregister several bindings.
    pub fn unset_keybindings<'a>(&mut self, bindings: impl IntoIterator<Item = &'a Rc<Keybinding>>) {
        for b in bindings {
            self.unset_keybinding(b);
        }
    }

    /// Every registered (chord, binding) pair, sorted by chord.
    pub fn entries(&self) -> Vec<(Chord, Rc<Keybinding>)> {
        self.trie.entries()
    }

    /// Pretty print the binding table.
    pub fn print_binding_table(&self, w: &mut dyn Write) -> Result<()> {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["keys", "modes", "action", "guarded"]);
        for (chord, b) in self.entries() {
            let modes: Vec<&str> = b.modes().iter().map(|m| m.as_str()).collect();
            table.add_row(vec![
                comfy_table::Cell::new(chord.to_string()).fg(comfy_table::Color::Green),
                comfy_table::Cell::new(modes.join(", ")),
                comfy_table::Cell::new(b.action().to_string()),
                comfy_table::Cell::new(if b.condition().is_some() { "yes" } else { "" }),
            ]);
        }
        writeln!(w, "{table}")?;
        Ok(())
    }
}
