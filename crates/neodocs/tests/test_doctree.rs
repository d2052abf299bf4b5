//! Documentation tree conversion and navigation.

mod common;

#[cfg(test)]
mod tests {
    use neodocs::{
        doctree::{DocTree, DocTreeState, NodeKind, RawDocTree},
        element::ElementMap,
        error::{Error, Result},
    };
    use pretty_assertions::assert_eq;

    use super::common::Harness;

    const DOCS: &str = r##"{
        "root": {
            "type": "directory",
            "path": "docs",
            "title": "Docs",
            "content": "# Welcome",
            "children": [
                {
                    "type": "directory",
                    "path": "docs/guide",
                    "title": "Guide",
                    "children": [
                        { "type": "file", "path": "docs/guide/install.md", "title": "Install",
                          "content": "Run `make`." },
                        { "type": "file", "path": "docs/guide/usage.md", "title": "Usage" }
                    ]
                },
                { "type": "file", "path": "docs/faq.md", "title": "FAQ",
                  "content": "| q | a |\n|---|---|\n| x | y |\n" }
            ]
        }
    }"##;

    #[test]
    fn ids_follow_pre_order() -> Result<()> {
        let tree = DocTree::from_json(DOCS)?;
        let paths: Vec<(usize, &str)> = tree.iter().map(|n| (n.id(), n.path())).collect();
        assert_eq!(
            paths,
            vec![
                (0, "docs"),
                (1, "docs/guide"),
                (2, "docs/guide/install.md"),
                (3, "docs/guide/usage.md"),
                (4, "docs/faq.md"),
            ]
        );
        assert_eq!(tree.get(1)?.children(), &[2, 3]);
        assert_eq!(tree.get(4)?.parent(), Some(0));
        assert_eq!(tree.root().kind(), NodeKind::Directory);
        assert!(tree.root().parent().is_none());
        Ok(())
    }

    #[test]
    fn path_index_and_rendering() -> Result<()> {
        let tree = DocTree::from_json(DOCS)?;
        let install = tree.get_by_path("docs/guide/install.md")?;
        assert_eq!(install.id(), 2);
        assert_eq!(install.html(), "<p>Run <code>make</code>.</p>\n");
        assert_eq!(install.content(), "Run `make`.");
        assert!(tree.get_by_path("docs/faq.md")?.html().contains("<table>"));
        assert_eq!(tree.get_by_path("docs/guide/usage.md")?.html(), "");
        assert!(matches!(tree.get_by_path("nope"), Err(Error::NotFound(_))));
        assert!(matches!(tree.get(99), Err(Error::NotFound(_))));
        Ok(())
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(DocTree::from_json("{"), Err(Error::Config(_))));
        assert!(matches!(
            DocTree::from_json(r#"{"root": {"type": "folder", "path": "x", "title": "x"}}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn select_falls_back_to_focus() -> Result<()> {
        let tree = DocTree::from_json(DOCS)?;
        let mut st = DocTreeState {
            focused_id: 3,
            ..Default::default()
        };
        tree.select(&mut st, None);
        assert_eq!(st.selected_id, 3);
        // Node 0 is a real id, not "no selection".
        tree.select(&mut st, Some(0));
        assert_eq!(st.selected_id, 0);
        Ok(())
    }

    #[test]
    fn expansion_controls_outline() -> Result<()> {
        let tree = DocTree::from_json(DOCS)?;
        let mut st = DocTreeState::default();
        assert_eq!(tree.visible_ids(&st), vec![0]);

        tree.expand(&mut st, &[0, 1]);
        assert_eq!(tree.visible_ids(&st), vec![0, 1, 2, 3, 4]);
        st.focused_id = 2;
        tree.select(&mut st, Some(4));
        assert_eq!(
            tree.outline(&st),
            concat!(
                " v Docs (docs)\n",
                "   v Guide (docs/guide)\n",
                "*      Install (docs/guide/install.md)\n",
                "       Usage (docs/guide/usage.md)\n",
                "     FAQ (docs/faq.md) [selected]\n",
            )
        );

        tree.collapse(&mut st, &[1]);
        assert_eq!(tree.visible_ids(&st), vec![0, 1, 4]);
        Ok(())
    }

    #[test]
    fn named_trees() -> Result<()> {
        let mut h = Harness::new()?;
        let raw: RawDocTree = serde_json::from_str(DOCS)?;
        assert_eq!(h.app.trees.create("main", &raw)?.len(), 5);
        assert!(matches!(
            h.app.trees.create("main", &raw),
            Err(Error::Duplicate(_))
        ));
        assert!(matches!(h.app.trees.get("other"), Err(Error::NotFound(_))));
        h.app.trees.insert("api", DocTree::from_raw(&raw))?;
        assert_eq!(h.app.trees.names(), vec!["api", "main"]);
        Ok(())
    }

    #[test]
    fn node_elements_come_from_the_provider() -> Result<()> {
        let tree = DocTree::from_json(DOCS)?;
        let lookup = ElementMap::new().with_ids(["doc-node-2"], "li");
        let provider = |id: usize| format!("doc-node-{id}");

        let el = tree.element(2, &provider, &lookup)?;
        assert_eq!(el.id(), "doc-node-2");
        assert_eq!(el.tag(), "li");
        assert!(matches!(
            tree.element(3, &provider, &lookup),
            Err(Error::NotFound(_))
        ));
        assert!(tree.element(42, &provider, &lookup).is_err());
        Ok(())
    }
}
