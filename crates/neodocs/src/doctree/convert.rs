//! Conversion of a raw tree into an indexed one, with markdown rendered to
//! HTML.

use pulldown_cmark::{Options, Parser, html};

use super::{
    DocTree,
    node::{DocNode, RawDocNode, RawDocTree},
};

/// Turns markdown source into display markup.
pub trait Renderer {
    /// Render a markdown document.
    fn render(&self, markdown: &str) -> String;
}

/// Renders CommonMark with tables, strikethrough and task lists to HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let options =
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}

/// Converts raw trees into indexed doc trees, numbering nodes in pre-order.
pub struct Converter<'r> {
    /// Content renderer.
    renderer: &'r dyn Renderer,
    /// Converted nodes, indexed by id.
    nodes: Vec<DocNode>,
}

impl<'r> Converter<'r> {
    /// Construct a converter using a renderer.
    pub fn new(renderer: &'r dyn Renderer) -> Self {
        Self {
            renderer,
            nodes: Vec::new(),
        }
    }

    /// Convert a raw tree.
    pub fn convert(mut self, raw: &RawDocTree) -> DocTree {
        self.convert_node(&raw.root, None);
        DocTree::from_nodes(self.nodes)
    }

    /// Convert a raw node and its subtree, returning the node's id.
    fn convert_node(&mut self, raw: &RawDocNode, parent: Option<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(DocNode {
            id,
            kind: raw.kind,
            path: raw.path.clone(),
            title: raw.title.clone(),
            content: raw.content.clone(),
            html: self.renderer.render(&raw.content),
            parent,
            children: Vec::new(),
        });
        for child in &raw.children {
            let cid = self.convert_node(child, Some(id));
            self.nodes[id].children.push(cid);
        }
        id
    }
}

/// Convert a raw tree with the default markdown renderer.
pub fn from_raw(raw: &RawDocTree) -> DocTree {
    Converter::new(&MarkdownRenderer).convert(raw)
}
