//! The narrow seam through which the core reaches UI elements.
//!
//! The core never renders. It only needs to hand the element bound to a panel
//! (or a doc tree node) to commands and binding conditions, so all it asks of
//! the UI layer is a lookup by id.

use std::{collections::HashMap, fmt, rc::Rc};

/// A UI element bound to a panel or a doc tree node.
pub trait Element: fmt::Debug {
    /// The element identifier. For panels this is the panel id.
    fn id(&self) -> &str;

    /// A free-form tag describing the element, e.g. the HTML tag name or the
    /// widget kind.
    fn tag(&self) -> &str {
        ""
    }
}

/// Resolve element identifiers to elements.
pub trait ElementLookup {
    /// Return the element with the given id, if one is bound.
    fn by_id(&self, id: &str) -> Option<Rc<dyn Element>>;
}

/// A plain element record, for hosts that don't carry their own element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundElement {
    /// Element id.
    id: String,
    /// Element tag.
    tag: String,
}

impl BoundElement {
    /// Construct an element record.
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
        }
    }
}

impl Element for BoundElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn tag(&self) -> &str {
        &self.tag
    }
}

/// An in-memory element table.
#[derive(Debug, Default)]
pub struct ElementMap {
    /// Elements by id.
    elements: HashMap<String, Rc<dyn Element>>,
}

impl ElementMap {
    /// Construct an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an element under its own id, replacing any previous binding.
    pub fn insert(&mut self, element: impl Element + 'static) -> Rc<dyn Element> {
        let element: Rc<dyn Element> = Rc::new(element);
        self.elements
            .insert(element.id().to_string(), element.clone());
        element
    }

    /// Bind a plain element record for each id.
    pub fn with_ids<'a>(mut self, ids: impl IntoIterator<Item = &'a str>, tag: &str) -> Self {
        for id in ids {
            self.insert(BoundElement::new(id, tag));
        }
        self
    }

    /// Drop the element bound to an id.
    pub fn remove(&mut self, id: &str) -> Option<Rc<dyn Element>> {
        self.elements.remove(id)
    }
}

impl ElementLookup for ElementMap {
    fn by_id(&self, id: &str) -> Option<Rc<dyn Element>> {
        self.elements.get(id).cloned()
    }
}
