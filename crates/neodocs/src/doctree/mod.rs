//! Documentation trees: the pages a neodocs instance browses.
//!
//! A raw tree arrives from the host as JSON, is converted once into an indexed
//! [`DocTree`] with rendered content, and is then only navigated. Expansion,
//! focus and selection live in a separate [`DocTreeState`] owned by the
//! caller, the same way panel state does.

/// Raw tree conversion and markdown rendering.
pub mod convert;
/// Tree node types.
pub mod node;

use std::{
    collections::{BTreeSet, HashMap},
    rc::Rc,
};

pub use convert::{Converter, MarkdownRenderer, Renderer, from_raw};
pub use node::{DocNode, NodeKind, RawDocNode, RawDocTree};

use crate::{
    element::{Element, ElementLookup},
    error::{Error, Result},
};

/// Expansion, focus and selection of a doc tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTreeState {
    /// Ids of expanded nodes.
    pub expanded_ids: BTreeSet<usize>,
    /// The node with keyboard focus.
    pub focused_id: usize,
    /// The node whose page is shown.
    pub selected_id: usize,
}

/// A converted documentation tree, indexed by node id and by path.
#[derive(Debug, Clone)]
pub struct DocTree {
    /// Nodes in pre-order. A node's id is its index.
    nodes: Vec<DocNode>,
    /// Node ids by path.
    by_path: HashMap<String, usize>,
}

impl DocTree {
    /// Index converted nodes. The first node is the root.
    pub(crate) fn from_nodes(nodes: Vec<DocNode>) -> Self {
        let by_path = nodes.iter().map(|n| (n.path.clone(), n.id)).collect();
        Self { nodes, by_path }
    }

    /// Convert a raw tree with the default renderer.
    pub fn from_raw(raw: &RawDocTree) -> Self {
        from_raw(raw)
    }

    /// Parse and convert a raw tree from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDocTree = serde_json::from_str(json)?;
        Ok(from_raw(&raw))
    }

    /// The root node.
    pub fn root(&self) -> &DocNode {
        &self.nodes[0]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so it's never empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &DocNode> {
        self.nodes.iter()
    }

    /// Return a node by id.
    pub fn get(&self, id: usize) -> Result<&DocNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::not_found("doc node", id.to_string()))
    }

    /// Return a node by path.
    pub fn get_by_path(&self, path: &str) -> Result<&DocNode> {
        let id = self
            .by_path
            .get(path)
            .ok_or_else(|| Error::not_found("doc node with path", path))?;
        self.get(*id)
    }

    /// The element bound to a node. `provider` maps a node id to the id of
    /// its element.
    pub fn element(
        &self,
        id: usize,
        provider: &dyn Fn(usize) -> String,
        lookup: &dyn ElementLookup,
    ) -> Result<Rc<dyn Element>> {
        let element_id = provider(self.get(id)?.id);
        lookup
            .by_id(&element_id)
            .ok_or_else(|| Error::not_found("element", element_id))
    }

    /// Mark nodes expanded.
    pub fn expand(&self, state: &mut DocTreeState, ids: &[usize]) {
        state.expanded_ids.extend(ids.iter().copied());
    }

    /// Mark nodes collapsed.
    pub fn collapse(&self, state: &mut DocTreeState, ids: &[usize]) {
        state.expanded_ids.retain(|id| !ids.contains(id));
    }

    /// Select a node, or the focused node if none is given.
    pub fn select(&self, state: &mut DocTreeState, id: Option<usize>) {
        state.selected_id = id.unwrap_or(state.focused_id);
    }

    /// Node ids visible under the current expansion, in display order. The
    /// root is always visible; children show only under expanded nodes.
    pub fn visible_ids(&self, state: &DocTreeState) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            out.push(id);
            if state.expanded_ids.contains(&id) {
                stack.extend(self.nodes[id].children.iter().rev());
            }
        }
        out
    }

    /// An indented outline of the visible nodes, marking the focused and
    /// selected ones.
    pub fn outline(&self, state: &DocTreeState) -> String {
        let mut out = String::new();
        for id in self.visible_ids(state) {
            let node = &self.nodes[id];
            let mut depth = 0;
            let mut p = node.parent;
            while let Some(pid) = p {
                depth += 1;
                p = self.nodes[pid].parent;
            }
            let marker = match (node.is_dir(), state.expanded_ids.contains(&id)) {
                (true, true) => "v ",
                (true, false) => "> ",
                (false, _) => "  ",
            };
            let focus = if state.focused_id == id { "*" } else { " " };
            let sel = if state.selected_id == id { " [selected]" } else { "" };
            out.push_str(&format!(
                "{focus}{}{marker}{} ({}){sel}\n",
                "  ".repeat(depth),
                node.title,
                node.path
            ));
        }
        out
    }
}

/// Named doc trees.
#[derive(Debug, Default)]
pub struct DocTrees {
    /// Trees by name.
    trees: HashMap<String, DocTree>,
}

impl DocTrees {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a raw tree and register it under a name. Fails if the name is
    /// taken.
    pub fn create(&mut self, name: &str, raw: &RawDocTree) -> Result<&DocTree> {
        if self.trees.contains_key(name) {
            return Err(Error::Duplicate(format!("doc tree {name:?}")));
        }
        Ok(self
            .trees
            .entry(name.to_string())
            .or_insert_with(|| from_raw(raw)))
    }

    /// Register an already converted tree.
    pub fn insert(&mut self, name: &str, tree: DocTree) -> Result<&DocTree> {
        if self.trees.contains_key(name) {
            return Err(Error::Duplicate(format!("doc tree {name:?}")));
        }
        Ok(self.trees.entry(name.to_string()).or_insert(tree))
    }

    /// Return a tree by name.
    pub fn get(&self, name: &str) -> Result<&DocTree> {
        self.trees
            .get(name)
            .ok_or_else(|| Error::not_found("doc tree", name))
    }

    /// Registered tree names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}
