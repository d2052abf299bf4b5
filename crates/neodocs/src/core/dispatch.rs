//! Chord buffering and binding selection for key dispatch.

use std::rc::Rc;

use crate::{
    element::Element,
    event::key::KeyComb,
    keybinding::Keybinding,
    keymap::{Keymap, KeymapNode},
    state::NeodocsState,
};

/// What happened to a dispatched key.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A binding fired and its action ran.
    Invoked(Rc<Keybinding>),
    /// A binding fired and its action was queued for a later turn.
    Scheduled(Rc<Keybinding>),
    /// The key extends a chord that may still complete. The chord buffer is
    /// kept.
    Pending,
    /// Nothing is bound. The chord buffer has been cleared.
    Unbound,
}

impl Outcome {
    /// Did a binding fire?
    pub fn fired(&self) -> bool {
        matches!(self, Self::Invoked(_) | Self::Scheduled(_))
    }

    /// The binding that fired, if any.
    pub fn binding(&self) -> Option<&Rc<Keybinding>> {
        match self {
            Self::Invoked(b) | Self::Scheduled(b) => Some(b),
            Self::Pending | Self::Unbound => None,
        }
    }
}

/// Append a key to the state's chord buffer and return the keymap node the
/// buffer now reaches.
///
/// If the extended buffer leads nowhere but earlier keys were buffered, the
/// stale prefix is dropped and the key is tried on its own. If that leads
/// nowhere too, the buffer is cleared and `None` is returned.
pub fn advance<'k>(keymap: &'k Keymap, state: &mut NeodocsState, key: KeyComb) -> Option<&'k KeymapNode> {
    state.key_buffer.push(key);
    if let Some(node) = keymap.trie().lookup(&state.key_buffer) {
        return Some(node);
    }
    if state.key_buffer.len() > 1 {
        let last = state.key_buffer.split_off(state.key_buffer.len() - 1);
        tracing::debug!("dropping stale chord prefix {:?}", state.key_buffer);
        state.key_buffer = last;
        if let Some(node) = keymap.trie().lookup(&state.key_buffer) {
            return Some(node);
        }
    }
    state.key_buffer.clear();
    None
}

/// Pick the binding that fires from the candidates at a node: the most
/// recently registered one that applies in the current mode and whose
/// condition holds.
pub fn select<'b>(
    candidates: &'b [Rc<Keybinding>],
    state: &NeodocsState,
    element: &dyn Element,
) -> Option<&'b Rc<Keybinding>> {
    candidates
        .iter()
        .rev()
        .find(|b| b.is_eligible(state, element))
}

/// Tokens that can follow the current chord buffer, sorted.
pub fn continuations(keymap: &Keymap, state: &NeodocsState) -> Vec<KeyComb> {
    keymap
        .trie()
        .lookup(&state.key_buffer)
        .map(|n| n.continuations().into_iter().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{element::BoundElement, error::Result, keybinding::BindingOptions, state::Mode};

    #[test]
    fn advance_retries_single_key() {
        let mut km = Keymap::new();
        km.set(["g", "g"], "top", BindingOptions::new());
        km.set("j", "down", BindingOptions::new());
        let mut ns = NeodocsState::new();

        assert!(advance(&km, &mut ns, "g".into()).is_some());
        assert_eq!(ns.key_buffer.len(), 1);
        // "g j" isn't bound, but "j" is.
        let node = advance(&km, &mut ns, "j".into()).unwrap();
        assert_eq!(node.bindings().len(), 1);
        assert_eq!(ns.key_buffer, vec![KeyComb::from("j")]);

        ns.key_buffer.clear();
        assert!(advance(&km, &mut ns, "q".into()).is_none());
        assert!(ns.key_buffer.is_empty());
    }

    #[test]
    fn select_last_eligible() -> Result<()> {
        let mut km = Keymap::new();
        let insert = Mode::new("insert")?;
        let a = km.set("x", "a", BindingOptions::new());
        let _b = km.set("x", "b", BindingOptions::new().mode(insert));
        let c = km.set(
            "x",
            "c",
            BindingOptions::new().condition(|_, el| el.id() == "content"),
        );
        let ns = NeodocsState::new();
        let bindings = km.get_keybindings(&[KeyComb::from("x")]);

        let content = BoundElement::new("content", "");
        let other = BoundElement::new("other", "");
        assert!(Rc::ptr_eq(select(bindings, &ns, &content).unwrap(), &c));
        assert!(Rc::ptr_eq(select(bindings, &ns, &other).unwrap(), &a));
        Ok(())
    }

    #[test]
    fn continuations_sorted() {
        let mut km = Keymap::new();
        km.set(["<C-w>", "l"], "right", BindingOptions::new());
        km.set(["<C-w>", "h"], "left", BindingOptions::new());
        let mut ns = NeodocsState::new();
        ns.key_buffer.push("<C-w>".into());
        let next: Vec<String> = continuations(&km, &ns).into_iter().map(String::from).collect();
        assert_eq!(next, vec!["h", "l"]);
    }
}
