//! Panels and the visibility and activation state machine over them.
//!
//! The registry only indexes the panel tree. All visibility and activation
//! state lives in a [`PanelState`] owned by the caller and mutated in place.
//! State transitions never look panels up, so they accept any id and never
//! fail; only identity lookups report unknown ids.

use std::{collections::HashMap, convert::Infallible, fmt, rc::Rc, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    element::{Element, ElementLookup},
    error::{Error, Result},
    state::PanelState,
    tree::PanelTree,
};

/// The id of the root panel. Every registry contains it.
pub const ROOT_PANEL_ID: &str = "panel-root";

/// The kind of a panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PanelType {
    /// The root panel. Only the root has this type.
    Root,
    /// A panel that lays out other panels.
    Container,
    /// A sidebar.
    Sidebar,
    /// A documentation file tree.
    FileTree,
    /// A panel floating over the others.
    Floating,
    /// A host-defined type.
    Custom(String),
}

impl PanelType {
    /// The type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Container => "container",
            Self::Sidebar => "sidebar",
            Self::FileTree => "file-tree",
            Self::Floating => "floating",
            Self::Custom(s) => s,
        }
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for PanelType {
    fn from(s: &str) -> Self {
        match s {
            "root" => Self::Root,
            "container" => Self::Container,
            "sidebar" => Self::Sidebar,
            "file-tree" => Self::FileTree,
            "floating" => Self::Floating,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for PanelType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PanelType> for String {
    fn from(t: PanelType) -> Self {
        t.as_str().to_string()
    }
}

/// A node in the panel tree. Parent and children are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelNode {
    /// Panel id. Also the id of the element the panel is bound to.
    id: String,
    /// Panel type.
    kind: PanelType,
    /// Parent panel id.
    parent: Option<String>,
    /// Child panel ids in creation order.
    children: Vec<String>,
}

impl PanelNode {
    /// The panel id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The panel type.
    pub fn kind(&self) -> &PanelType {
        &self.kind
    }

    /// The parent panel id.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child panel ids in creation order.
    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// The id to node index for a panel tree, plus every visibility and
/// activation transition.
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    /// Panels by id.
    nodes: HashMap<String, PanelNode>,
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelRegistry {
    /// Construct a registry holding only the root panel.
    pub fn new() -> Self {
        let root = PanelNode {
            id: ROOT_PANEL_ID.into(),
            kind: PanelType::Root,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: HashMap::from([(ROOT_PANEL_ID.to_string(), root)]),
        }
    }

    /// Register a panel under a parent. The panel is appended to the parent's
    /// children. Fails if the id is taken or the parent is unknown.
    pub fn create(
        &mut self,
        id: &str,
        kind: impl Into<PanelType>,
        parent: Option<&str>,
    ) -> Result<&PanelNode> {
        if self.nodes.contains_key(id) {
            return Err(Error::Duplicate(format!("panel {id:?}")));
        }
        if let Some(p) = parent {
            let parent = self
                .nodes
                .get_mut(p)
                .ok_or_else(|| Error::not_found("parent panel", p))?;
            parent.children.push(id.to_string());
        }
        let node = PanelNode {
            id: id.to_string(),
            kind: kind.into(),
            parent: parent.map(str::to_string),
            children: Vec::new(),
        };
        Ok(self.nodes.entry(id.to_string()).or_insert(node))
    }

    /// Return a panel by id.
    pub fn get(&self, id: &str) -> Result<&PanelNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::not_found("panel", id))
    }

    /// Is a panel registered under this id?
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered panels, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the root the only panel?
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The element bound to a panel.
    pub fn element(&self, id: &str, lookup: &dyn ElementLookup) -> Result<Rc<dyn Element>> {
        lookup
            .by_id(id)
            .ok_or_else(|| Error::not_found("element", id))
    }

    /// Add panels to the displayed set.
    pub fn show<S: AsRef<str>>(&self, state: &mut PanelState, ids: &[S]) {
        state
            .displayed_ids
            .extend(ids.iter().map(|id| id.as_ref().to_string()));
    }

    /// Remove panels from the displayed set and from the active stack. Order
    /// among the remaining stack entries is preserved.
    pub fn hide<S: AsRef<str>>(&self, state: &mut PanelState, ids: &[S]) {
        let hidden = |id: &str| ids.iter().any(|h| h.as_ref() == id);
        state.displayed_ids.retain(|id| !hidden(id));
        state.active_id_stack.retain(|id| !hidden(id));
    }

    /// Show a panel if needed, then push it onto the active stack. A panel
    /// already on the stack is pushed again.
    pub fn activate(&self, state: &mut PanelState, id: &str) {
        if !state.displayed_ids.contains(id) {
            self.show(state, &[id]);
        }
        state.active_id_stack.push(id.to_string());
    }

    /// Pop the top of the active stack. The bottom entry is never popped.
    /// Returns true if an entry was popped.
    pub fn deactivate(&self, state: &mut PanelState) -> bool {
        if state.active_id_stack.len() > 1 {
            state.active_id_stack.pop();
            true
        } else {
            false
        }
    }

    /// Truncate the active stack at the first (bottom-most) occurrence of
    /// `id`. The entry for `id` itself is removed unless `include` is set. If
    /// `id` isn't on the stack at all, the whole stack is cleared.
    pub fn deactivate_all_until(&self, state: &mut PanelState, id: &str, include: bool) {
        match state.active_id_stack.iter().position(|x| x == id) {
            Some(idx) => {
                let end = if include { idx + 1 } else { idx };
                state.active_id_stack.truncate(end);
            }
            None => state.active_id_stack.clear(),
        }
    }

    /// The id on top of the active stack, or the root id if the stack is
    /// empty.
    pub fn active_id<'s>(&self, state: &'s PanelState) -> &'s str {
        state.top().unwrap_or(ROOT_PANEL_ID)
    }

    /// The active panel.
    pub fn active(&self, state: &PanelState) -> Result<&PanelNode> {
        self.get(self.active_id(state))
    }

    /// The element bound to the active panel.
    pub fn active_element(
        &self,
        state: &PanelState,
        lookup: &dyn ElementLookup,
    ) -> Result<Rc<dyn Element>> {
        self.element(self.active_id(state), lookup)
    }

    /// Show a panel along with every hidden ancestor, then activate it.
    ///
    /// The climb stops at the first displayed panel or at the root, since a
    /// displayed panel's own ancestors are assumed to be displayed already.
    /// An unregistered id is treated as a panel with no parent.
    pub fn open(&self, state: &mut PanelState, id: &str) {
        let mut to_show = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ROOT_PANEL_ID || state.displayed_ids.contains(cid) {
                break;
            }
            to_show.push(cid.to_string());
            current = self.nodes.get(cid).and_then(PanelNode::parent);
        }
        to_show.reverse();
        self.show(state, &to_show);
        self.activate(state, id);
    }

    /// Hide and deactivate a panel and all its descendants.
    pub fn close(&self, state: &mut PanelState, id: &str) {
        let ids = self
            .descendant_ids(id)
            .unwrap_or_else(|_| vec![id.to_string()]);
        self.hide(state, &ids);
    }

    /// Show a hidden panel or hide a displayed one.
    pub fn toggle_display(&self, state: &mut PanelState, id: &str) {
        if state.is_displayed(id) {
            self.hide(state, &[id]);
        } else {
            self.show(state, &[id]);
        }
    }

    /// Close a panel that is on the active stack, or open one that isn't.
    pub fn toggle_active(&self, state: &mut PanelState, id: &str) {
        if state.is_active(id) {
            self.close(state, id);
        } else {
            self.open(state, id);
        }
    }

    /// Hide a panel and immediately activate it, moving it to the top of the
    /// stack. Whatever was on top before stays on the stack below it.
    pub fn switch(&self, state: &mut PanelState, id: &str) {
        self.hide(state, &[id]);
        self.activate(state, id);
    }

    /// Panel ids in pre-order from the root.
    pub fn ids(&self) -> Vec<String> {
        self.descendant_ids(ROOT_PANEL_ID).unwrap_or_default()
    }
}

impl PanelTree for PanelRegistry {
    fn parent_of(&self, id: &str) -> Result<Option<&str>> {
        Ok(self.get(id)?.parent())
    }

    fn children_of(&self, id: &str) -> Result<&[String]> {
        Ok(self.get(id)?.children())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::element::ElementMap;

    fn setup() -> Result<(PanelRegistry, PanelState)> {
        let mut r = PanelRegistry::new();
        r.create("a", PanelType::Container, Some(ROOT_PANEL_ID))?;
        r.create("b", "sidebar", Some("a"))?;
        r.create("c", "file-tree", Some("b"))?;
        r.create("d", "floating", Some("a"))?;
        let mut st = PanelState::default();
        r.activate(&mut st, ROOT_PANEL_ID);
        Ok((r, st))
    }

    #[test]
    fn panel_types() {
        assert_eq!(PanelType::from("file-tree"), PanelType::FileTree);
        assert_eq!(PanelType::from("toc").to_string(), "toc");
        assert_eq!("root".parse::<PanelType>(), Ok(PanelType::Root));
    }

    #[test]
    fn create() -> Result<()> {
        let (mut r, _) = setup()?;
        assert_eq!(r.get("a")?.children(), ["b", "d"]);
        assert_eq!(r.get("c")?.parent(), Some("b"));
        assert_eq!(r.get(ROOT_PANEL_ID)?.kind(), &PanelType::Root);
        assert!(matches!(r.create("a", "x", None), Err(Error::Duplicate(_))));
        assert!(matches!(
            r.create("z", "x", Some("nope")),
            Err(Error::NotFound(_))
        ));
        assert!(!r.contains("z"));
        assert!(matches!(r.get("nope"), Err(Error::NotFound(_))));
        assert_eq!(r.ids(), vec![ROOT_PANEL_ID, "a", "b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn queries() -> Result<()> {
        let (r, _) = setup()?;
        assert!(r.is_descendant_of("c", "a")?);
        assert!(r.is_descendant_of("c", ROOT_PANEL_ID)?);
        assert!(r.is_descendant_of("c", "c")?);
        assert!(!r.is_descendant_of("d", "b")?);
        assert!(r.is_ancestor_of("a", "c")?);
        assert!(!r.is_ancestor_of("b", "d")?);
        assert!(r.is_descendant_of("nope", "a").is_err());
        assert!(r.is_ancestor_of("nope", "a").is_err());
        assert_eq!(r.descendant_ids("a")?, vec!["a", "b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn show_hide() -> Result<()> {
        let (r, mut st) = setup()?;
        r.show(&mut st, &["a", "b"]);
        r.show(&mut st, &["a", "b"]);
        assert_eq!(st.displayed_ids.len(), 3);

        r.activate(&mut st, "a");
        r.activate(&mut st, "b");
        r.activate(&mut st, "a");
        r.hide(&mut st, &["a"]);
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID, "b"]);
        assert!(!st.is_displayed("a"));
        Ok(())
    }

    #[test]
    fn activate_shows() -> Result<()> {
        let (r, mut st) = setup()?;
        r.activate(&mut st, "c");
        assert!(st.is_displayed("c"));
        assert_eq!(r.active_id(&st), "c");
        // Unregistered ids are accepted.
        r.activate(&mut st, "ghost");
        assert_eq!(r.active_id(&st), "ghost");
        assert!(r.active(&st).is_err());
        Ok(())
    }

    #[test]
    fn deactivate_floor() -> Result<()> {
        let (r, mut st) = setup()?;
        r.activate(&mut st, "a");
        assert!(r.deactivate(&mut st));
        assert!(!r.deactivate(&mut st));
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID]);
        Ok(())
    }

    #[test]
    fn deactivate_all_until() -> Result<()> {
        let (r, mut st) = setup()?;
        for id in ["a", "b", "c"] {
            r.activate(&mut st, id);
        }
        r.deactivate_all_until(&mut st, "b", false);
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID, "a"]);
        r.activate(&mut st, "b");
        r.deactivate_all_until(&mut st, "a", true);
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID, "a"]);

        r.deactivate_all_until(&mut st, "missing", false);
        assert!(st.active_id_stack.is_empty());
        assert_eq!(r.active_id(&st), ROOT_PANEL_ID);
        Ok(())
    }

    #[test]
    fn open_close() -> Result<()> {
        let (r, mut st) = setup()?;
        r.open(&mut st, "c");
        for id in ["a", "b", "c"] {
            assert!(st.is_displayed(id));
        }
        assert!(!st.is_displayed("d"));
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID, "c"]);

        r.activate(&mut st, "d");
        r.close(&mut st, "b");
        assert!(!st.is_displayed("b"));
        assert!(!st.is_displayed("c"));
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID, "d"]);

        // The climb stops at the displayed "a"; "b" comes back with "c".
        r.open(&mut st, "c");
        assert!(st.is_displayed("b"));
        Ok(())
    }

    #[test]
    fn toggles() -> Result<()> {
        let (r, mut st) = setup()?;
        r.toggle_display(&mut st, "d");
        assert!(st.is_displayed("d"));
        r.toggle_display(&mut st, "d");
        assert!(!st.is_displayed("d"));

        r.toggle_active(&mut st, "b");
        assert_eq!(r.active_id(&st), "b");
        assert!(st.is_displayed("a"));
        r.toggle_active(&mut st, "b");
        assert!(!st.is_active("b"));
        assert!(st.is_displayed("a"));
        Ok(())
    }

    #[test]
    fn switch_keeps_previous() -> Result<()> {
        let (r, mut st) = setup()?;
        r.activate(&mut st, "a");
        r.activate(&mut st, "b");
        r.switch(&mut st, "a");
        assert_eq!(st.active_id_stack, vec![ROOT_PANEL_ID, "b", "a"]);
        assert!(st.is_displayed("a"));
        Ok(())
    }

    #[test]
    fn elements() -> Result<()> {
        let (r, mut st) = setup()?;
        let els = ElementMap::new().with_ids([ROOT_PANEL_ID, "a"], "div");
        assert_eq!(r.active_element(&st, &els)?.id(), ROOT_PANEL_ID);
        r.activate(&mut st, "a");
        assert_eq!(r.active_element(&st, &els)?.id(), "a");
        assert!(r.element("b", &els).is_err());
        Ok(())
    }
}
