//! Structural queries over the panel tree.

use crate::{error::Result, panel::ROOT_PANEL_ID};

/// Ancestor and descendant queries over a tree of panels addressed by id.
///
/// Implementors supply parent and child links; the queries come for free. A
/// panel counts as both an ancestor and a descendant of itself.
pub trait PanelTree {
    /// The parent of a panel, or `None` for the root and detached panels.
    fn parent_of(&self, id: &str) -> Result<Option<&str>>;

    /// The children of a panel, in creation order.
    fn children_of(&self, id: &str) -> Result<&[String]>;

    /// Is `id` a descendant of `ancestor`? Climbs the parent chain from `id`,
    /// stopping at the root.
    fn is_descendant_of(&self, id: &str, ancestor: &str) -> Result<bool> {
        if id == ancestor {
            return Ok(true);
        }
        let mut current = id;
        while current != ROOT_PANEL_ID {
            match self.parent_of(current)? {
                None => return Ok(false),
                Some(p) if p == ancestor => return Ok(true),
                Some(p) => current = p,
            }
        }
        Ok(false)
    }

    /// Is `id` an ancestor of `descendant`? Scans the subtree under `id`.
    fn is_ancestor_of(&self, id: &str, descendant: &str) -> Result<bool> {
        if id == descendant {
            return Ok(true);
        }
        for child in self.children_of(id)? {
            if self.is_ancestor_of(child, descendant)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// A panel and all its descendants in pre-order, self first.
    fn descendant_ids(&self, id: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            // Push children in reverse so the first child is visited first.
            stack.extend(self.children_of(&current)?.iter().rev().cloned());
            out.push(current);
        }
        Ok(out)
    }
}
