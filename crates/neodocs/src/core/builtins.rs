//! Built-in commands over the panel state machine and modes.
//!
//! Panel commands are registered once per panel under `open:<id>`,
//! `close:<id>`, `toggle:<id>` and `switch:<id>`, so that plain action names
//! in bindings can address them. Modes get `mode:<name>`.

use crate::{
    commands::{CommandRegistry, command},
    panel::PanelRegistry,
    state::{Mode, NeodocsState},
};

/// Which panel transition a command performs.
#[derive(Debug, Clone, Copy)]
enum PanelOp {
    /// Show with ancestors and activate.
    Open,
    /// Hide and deactivate with descendants.
    Close,
    /// Open or close depending on activation.
    Toggle,
    /// Re-activate on top of the stack.
    Switch,
}

impl PanelOp {
    /// Command name prefix.
    fn prefix(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Toggle => "toggle",
            Self::Switch => "switch",
        }
    }

    /// Apply the transition.
    fn apply(self, panels: &PanelRegistry, state: &mut NeodocsState, id: &str) {
        let st = &mut state.panel;
        match self {
            Self::Open => panels.open(st, id),
            Self::Close => panels.close(st, id),
            Self::Toggle => panels.toggle_active(st, id),
            Self::Switch => panels.switch(st, id),
        }
    }
}

/// Register panel commands for every panel in the registry, plus
/// `deactivate`, which pops the active stack. Commands are pushed, so
/// existing commands of the same names stay underneath.
pub fn install_panel_commands(commands: &mut CommandRegistry, panels: &PanelRegistry) {
    for id in panels.ids() {
        for op in [PanelOp::Open, PanelOp::Close, PanelOp::Toggle, PanelOp::Switch] {
            let target = id.clone();
            commands.set(
                &format!("{}:{id}", op.prefix()),
                command(move |inv| {
                    op.apply(&inv.app.panels, inv.state, &target);
                    Ok(())
                }),
                false,
            );
        }
    }
    commands.set(
        "deactivate",
        command(|inv| {
            inv.app.panels.deactivate(&mut inv.state.panel);
            Ok(())
        }),
        false,
    );
}

/// Register a `mode:<name>` command for each mode.
pub fn install_mode_commands<'a>(
    commands: &mut CommandRegistry,
    modes: impl IntoIterator<Item = &'a Mode>,
) {
    for mode in modes {
        let m = mode.clone();
        commands.set(
            &format!("mode:{mode}"),
            command(move |inv| {
                inv.state.set_mode(m.clone());
                Ok(())
            }),
            false,
        );
    }
}
