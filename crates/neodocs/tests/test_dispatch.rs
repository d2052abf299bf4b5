//! End-to-end key dispatch: chords, modes, conditions and deferred jobs.

mod common;

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use neodocs::{
        dispatch::Outcome,
        error::{Error, Result},
        event::key::{Ctrl, KeyComb},
        keybinding::BindingOptions,
        state::Mode,
    };
    use pretty_assertions::assert_eq;

    use super::common::Harness;

    #[test]
    fn multi_stroke_chord() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("top");
        h.app.bind().key(["g", "g"], "top");

        assert!(matches!(h.key("g")?, Outcome::Pending));
        assert_eq!(h.state.key_buffer, vec![KeyComb::from("g")]);
        assert!(h.key("g")?.fired());
        assert!(h.state.key_buffer.is_empty());
        assert_eq!(h.calls(), vec!["top@panel-root"]);
        Ok(())
    }

    #[test]
    fn prefix_binding_fires_before_longer_chord() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("short");
        h.recorder("long");
        h.app.bind().key("d", "short").key(["d", "d"], "long");

        // A binding at the node wins over waiting for a longer chord.
        assert!(h.key("d")?.fired());
        assert!(h.key("d")?.fired());
        assert_eq!(h.calls(), vec!["short@panel-root", "short@panel-root"]);
        Ok(())
    }

    #[test]
    fn stale_prefix_is_dropped() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("top");
        h.recorder("down");
        h.app.bind().key(["g", "g"], "top").key("j", "down");

        assert!(matches!(h.key("g")?, Outcome::Pending));
        assert!(h.key("j")?.fired());
        assert_eq!(h.calls(), vec!["down@panel-root"]);

        assert!(matches!(h.keys(&["g", "x"])?, Outcome::Unbound));
        assert!(h.state.key_buffer.is_empty());
        Ok(())
    }

    #[test]
    fn modes_filter_bindings() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("n");
        h.recorder("v");
        let visual = Mode::new("visual")?;
        h.app.bind().key("x", "n").with_mode(visual.clone()).key("x", "v");

        h.key("x")?;
        h.state.set_mode(visual);
        h.key("x")?;
        h.state.set_mode(Mode::new("insert")?);
        assert!(matches!(h.key("x")?, Outcome::Unbound));
        assert_eq!(h.calls(), vec!["n@panel-root", "v@panel-root"]);
        Ok(())
    }

    #[test]
    fn conditions_see_active_element() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("in-sidebar");
        h.recorder("anywhere");
        h.app
            .bind()
            .key("o", "anywhere")
            .with_condition(|_, el| el.id() == "sidebar")
            .key("o", "in-sidebar");

        h.key("o")?;
        h.app.panels.open(&mut h.state.panel, "sidebar");
        h.key("o")?;
        assert_eq!(h.calls(), vec!["anywhere@panel-root", "in-sidebar@sidebar"]);
        Ok(())
    }

    #[test]
    fn conditions_see_supplied_element() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("click-files");
        h.recorder("click");
        h.app
            .bind()
            .key("<O-Left>", "click")
            .with_condition(|_, el| el.id() == "files")
            .key("<O-Left>", "click-files");
        h.app.panels.open(&mut h.state.panel, "content");

        let out = h.app.dispatch_at(&mut h.state, "<O-Left>", "files")?;
        assert!(out.fired());
        h.app.dispatch(&mut h.state, "<O-Left>")?;
        assert_eq!(h.calls(), vec!["click-files@files", "click@content"]);
        // Pointing at a panel doesn't activate it.
        assert_eq!(h.app.panels.active_id(&h.state.panel), "content");

        assert!(matches!(
            h.app.dispatch_at(&mut h.state, "<O-Left>", "nowhere"),
            Err(Error::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn last_registered_wins() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("first");
        h.recorder("second");
        let first = h.app.keymap.set("k", "first", BindingOptions::new());
        let second = h.app.keymap.set("k", "second", BindingOptions::new());

        let out = h.key("k")?;
        assert!(Rc::ptr_eq(out.binding().unwrap(), &second));

        h.app.keymap.unset_keybinding(&second);
        let out = h.key("k")?;
        assert!(Rc::ptr_eq(out.binding().unwrap(), &first));
        assert_eq!(h.calls(), vec!["second@panel-root", "first@panel-root"]);
        Ok(())
    }

    #[test]
    fn modifier_tokens_match_in_any_order() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("split");
        h.app.bind().try_keys("<CS-w> v", "split")?;

        assert!(matches!(h.key("<SC-w>")?, Outcome::Pending));
        assert!(h.key("v")?.fired());

        let mut h = Harness::new()?;
        h.recorder("save");
        h.app.bind().key((Ctrl + 's').encode(), "save");
        assert!(h.key("<C-s>")?.fired());
        Ok(())
    }

    #[test]
    fn missing_command_is_an_error() -> Result<()> {
        let mut h = Harness::new()?;
        h.app.bind().key("z", "nowhere");
        assert!(matches!(h.key("z"), Err(Error::NotFound(_))));
        assert!(h.state.key_buffer.is_empty());
        Ok(())
    }

    #[test]
    fn missing_element_is_an_error() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("a");
        h.app.bind().key(["q", "a"], "a");
        h.app.panels.activate(&mut h.state.panel, "detached");

        // No element is needed until a binding is a candidate.
        assert!(matches!(h.key("q")?, Outcome::Pending));
        assert!(matches!(h.key("a"), Err(Error::NotFound(_))));
        assert!(h.state.key_buffer.is_empty());
        Ok(())
    }

    #[test]
    fn deferred_dispatch_runs_fifo() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("a");
        h.recorder("b");
        h.app.bind().key("a", "a").key("b", "b");
        h.app.deferred_dispatch = true;

        assert!(matches!(h.key("b")?, Outcome::Scheduled(_)));
        h.app.panels.open(&mut h.state.panel, "content");
        assert!(matches!(h.key("a")?, Outcome::Scheduled(_)));
        assert!(h.calls().is_empty());
        assert_eq!(h.app.pending_jobs(), 2);

        assert_eq!(h.app.run_pending(&mut h.state)?, 2);
        // Each job keeps the element it was scheduled against.
        assert_eq!(h.calls(), vec!["b@panel-root", "a@content"]);
        assert_eq!(h.app.pending_jobs(), 0);
        Ok(())
    }

    #[test]
    fn deferred_job_failure_does_not_stop_batch() -> Result<()> {
        let mut h = Harness::new()?;
        h.recorder("ok");
        h.app.deferred_dispatch = true;
        h.app.bind().key("x", "missing").key("y", "ok");
        h.keys(&["x", "y"])?;
        assert!(matches!(h.app.run_pending(&mut h.state), Err(Error::NotFound(_))));
        assert_eq!(h.calls(), vec!["ok@panel-root"]);
        Ok(())
    }

    #[test]
    fn pending_continuations() -> Result<()> {
        let mut h = Harness::new()?;
        h.app
            .bind()
            .key(["<C-w>", "l"], "right")
            .key(["<C-w>", "h"], "left")
            .key(["<C-w>", "<C-w>"], "cycle");
        assert_eq!(h.app.pending_continuations(&h.state).len(), 1);

        h.key("<C-w>")?;
        let next: Vec<String> = h
            .app
            .pending_continuations(&h.state)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(next, vec!["<C-w>", "h", "l"]);
        Ok(())
    }
}
