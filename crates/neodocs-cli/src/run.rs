use std::{
    cell::Cell,
    io::{self, Stdout, Write},
    panic,
};

use anyhow::Result;
use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::{
    ExecutableCommand,
    event::{self as cevent, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal,
};
use neodocs::{
    Neodocs,
    dispatch::Outcome,
    error::Error,
    event::{key::KeyPress, mouse_press},
    state::NeodocsState,
};
use scopeguard::guard;

/// Put the terminal in raw mode with mouse capture.
fn enter(out: &mut Stdout) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    out.execute(cevent::EnableMouseCapture)?;
    Ok(())
}

/// Restore the terminal.
fn exit(out: &mut Stdout) -> io::Result<()> {
    out.execute(cevent::DisableMouseCapture)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// One press read from the terminal.
struct Input {
    /// The press itself.
    press: KeyPress,
    /// Pointer column for mouse presses.
    column: Option<u16>,
}

/// Read the next press from the terminal. Returns `None` on Ctrl+C, and skips
/// events that don't map to a key press.
fn next_input() -> io::Result<Option<Input>> {
    loop {
        match cevent::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(None);
                }
                return Ok(Some(Input {
                    press: KeyPress::from(k),
                    column: None,
                }));
            }
            Event::Mouse(m) => {
                if let Some(press) = mouse_press(&m) {
                    return Ok(Some(Input {
                        press,
                        column: Some(m.column),
                    }));
                }
            }
            _ => {}
        }
    }
}

/// Displayed panels in pre-order.
fn displayed(app: &Neodocs, state: &NeodocsState) -> Vec<String> {
    app.panels
        .ids()
        .into_iter()
        .filter(|id| state.panel.is_displayed(id))
        .collect()
}

/// The panel under a pointer column. The terminal is split into equal
/// vertical strips, one per displayed panel in pre-order.
fn panel_at(panels: &[String], column: u16, width: u16) -> Option<&str> {
    if panels.is_empty() || width == 0 {
        return None;
    }
    let idx = usize::from(column.min(width - 1)) * panels.len() / usize::from(width);
    panels.get(idx).map(String::as_str)
}

/// Describe an outcome on one line.
fn describe(app: &Neodocs, state: &NeodocsState, key: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Invoked(b) => format!("{key}: ran {} [{}]", b.action(), state.mode),
        Outcome::Scheduled(b) => format!("{key}: queued {}", b.action()),
        Outcome::Pending => {
            let next: Vec<String> = app
                .pending_continuations(state)
                .into_iter()
                .map(String::from)
                .collect();
            format!("{key}: waiting for one of {}", next.join(" "))
        }
        Outcome::Unbound => format!("{key}: unbound"),
    }
}

/// Describe the panel state on one line: displayed panels, then the active
/// stack from the bottom.
fn panel_line(app: &Neodocs, state: &NeodocsState) -> String {
    format!(
        "  displayed: {}  active: {}",
        displayed(app, state).join(" "),
        state.panel.active_id_stack.join(" > ")
    )
}

/// Report a dispatch failure to the log and return the line to print.
fn failure(key: &str, e: &Error) -> String {
    let line = format!("{key}: {e}");
    tracing::warn!("{line}");
    line
}

/// Dispatch terminal input until `quit` is raised or Ctrl+C is pressed.
/// Mouse presses go to the panel under the pointer. Command failures are
/// reported and the loop carries on.
pub fn run(app: &Neodocs, state: &mut NeodocsState, quit: &Cell<bool>) -> Result<()> {
    let mut out = io::stdout();
    enter(&mut out)?;
    let _restore = guard(io::stdout(), |mut out| {
        #[allow(unused_must_use)]
        {
            exit(&mut out);
        }
    });

    let previous = panic::take_hook();
    panic::set_hook(Box::new(|pi| {
        #[allow(unused_must_use)]
        {
            exit(&mut io::stdout());
            BacktracePrinter::new().print_panic_info(pi, &mut default_output_stream());
        }
    }));
    let _hook = guard(previous, |hook| {
        panic::set_hook(hook);
    });

    write!(out, "neodocs: press keys to dispatch, Ctrl+C to exit\r\n")?;
    while !quit.get() {
        let Some(input) = next_input()? else {
            break;
        };
        let key = input.press.encode();
        let target = match input.column {
            Some(column) => {
                let (width, _) = terminal::size()?;
                panel_at(&displayed(app, state), column, width).map(String::from)
            }
            None => None,
        };
        let result = match &target {
            Some(id) => app.dispatch_at(state, key.clone(), id),
            None => app.dispatch(state, key.clone()),
        };
        let line = match result {
            Ok(outcome) => describe(app, state, key.as_str(), &outcome),
            Err(e) => failure(key.as_str(), &e),
        };
        write!(out, "{line}\r\n{}\r\n", panel_line(app, state))?;
        if let Err(e) = app.run_pending(state) {
            write!(out, "deferred: {e}\r\n")?;
        }
        out.flush()?;
    }
    Ok(())
}
