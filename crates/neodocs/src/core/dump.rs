//! Text dumps of the panel tree and its visibility and activation state.

use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    error::Result,
    panel::{PanelRegistry, ROOT_PANEL_ID},
    state::PanelState,
};

/// Traverses the panel tree and returns a string showing each panel's id and
/// type, marked with its visibility and activation state. This is a debug
/// function.
pub fn dump(panels: &PanelRegistry, state: &PanelState) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_panel(&mut buffer, panels, state, ROOT_PANEL_ID, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// As [`dump`], without color escapes.
pub fn dump_plain(panels: &PanelRegistry, state: &PanelState) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_panel(&mut buffer, panels, state, ROOT_PANEL_ID, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Walk a panel subtree and emit formatted debug output.
fn dump_panel(
    buffer: &mut Buffer,
    panels: &PanelRegistry,
    state: &PanelState,
    id: &str,
    level: usize,
) -> Result<()> {
    let panel = panels.get(id)?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{id}")?;
    buffer.reset()?;
    write!(buffer, " ({})", panel.kind())?;

    let mut indicators = Vec::new();
    if state.top() == Some(id) {
        indicators.push("ACTIVE");
    } else if state.is_active(id) {
        indicators.push("stacked");
    }
    if state.is_displayed(id) {
        indicators.push("displayed");
    }

    for (i, indicator) in indicators.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " })?;
        let color = match *indicator {
            "ACTIVE" => Color::Magenta,
            "stacked" => Color::Yellow,
            _ => Color::Green,
        };
        buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(buffer, "{indicator}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    for child in panel.children() {
        dump_panel(buffer, panels, state, child, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain() -> Result<()> {
        let mut panels = PanelRegistry::new();
        panels.create("sidebar", "sidebar", Some(ROOT_PANEL_ID))?;
        panels.create("files", "file-tree", Some("sidebar"))?;
        panels.create("help", "floating", Some(ROOT_PANEL_ID))?;
        let mut st = PanelState::default();
        panels.activate(&mut st, ROOT_PANEL_ID);
        panels.open(&mut st, "files");

        assert_eq!(
            dump_plain(&panels, &st)?,
            "panel-root (root) stacked, displayed\n    sidebar (sidebar) displayed\n        files (file-tree) ACTIVE, displayed\n    help (floating)\n"
        );
        assert!(dump(&panels, &st)?.contains("\u{1b}["));
        Ok(())
    }
}
