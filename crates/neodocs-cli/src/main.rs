//! The `neodocs` command: inspect a configuration and drive key dispatch from
//! a terminal.

use std::{
    cell::Cell,
    collections::BTreeSet,
    fs,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use neodocs::{
    Neodocs,
    builtins::{install_mode_commands, install_panel_commands},
    commands::command,
    config::Config,
    doctree::{DocTree, DocTreeState},
    dump::{dump, dump_plain},
    element::{BoundElement, ElementMap},
    notify::NotifyLevel,
    state::{Mode, NeodocsState},
};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Run mode: raw terminal input fed through the dispatcher.
mod run;

/// Configuration used when no file is given.
const DEFAULT_CONFIG: &str = r#"
[[panels]]
id = "sidebar"
type = "sidebar"

[[panels]]
id = "files"
type = "file-tree"
parent = "sidebar"

[[panels]]
id = "content"
type = "container"

[[panels]]
id = "help"
type = "floating"

[[bindings]]
keys = "q"
action = "quit"

[[bindings]]
keys = "?"
action = "toggle:help"

[[bindings]]
keys = "e"
action = "toggle:files"

[[bindings]]
keys = ["<C-w>", "h"]
also = [["<C-w>", "ArrowLeft"]]
action = "open:sidebar"

[[bindings]]
keys = ["<C-w>", "l"]
also = [["<C-w>", "ArrowRight"]]
action = "open:content"

[[bindings]]
keys = "Escape"
action = "deactivate"

[[bindings]]
keys = "i"
action = "mode:insert"

[[bindings]]
keys = "Escape"
modes = ["insert"]
action = "mode:normal"
"#;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "neodocs", version, about = "Keyboard-driven documentation browsing")]
struct Args {
    /// Configuration file. A built-in demo layout is used if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity. Repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// What to do.
    #[command(subcommand)]
    command: Cmd,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the binding table.
    Keys,
    /// Print the registered command names.
    Commands,
    /// Print the panel tree after opening panels in order.
    Panels {
        /// Panels to open.
        #[arg(long, num_args = 1..)]
        open: Vec<String>,
    },
    /// Print the outline of a documentation tree read from JSON.
    Tree {
        /// Path to the tree JSON.
        path: PathBuf,
        /// Expand every directory.
        #[arg(long)]
        expand: bool,
    },
    /// Read keys from the terminal and dispatch them until `quit` runs or
    /// Ctrl+C is pressed.
    Run,
}

/// Map the verbosity count onto a level filter.
fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Modes named by the configuration: those bindings apply in, and those
/// `mode:` actions switch to. Normal mode is always included.
fn config_modes(cfg: &Config) -> Result<BTreeSet<Mode>> {
    let mut modes = BTreeSet::from([Mode::normal()]);
    for b in &cfg.bindings {
        modes.extend(b.modes.iter().cloned());
        if let Some(name) = b.action.strip_prefix("mode:") {
            modes.insert(Mode::new(name)?);
        }
    }
    Ok(modes)
}

/// Bind an element to every panel, tagged with the panel type.
fn panel_elements(app: &Neodocs) -> ElementMap {
    let mut elements = ElementMap::new();
    for id in app.panels.ids() {
        let tag = app
            .panels
            .get(&id)
            .map(|p| p.kind().to_string())
            .unwrap_or_default();
        elements.insert(BoundElement::new(id, tag));
    }
    elements
}

/// Build an instance from a configuration, with the built-in commands and a
/// `quit` command that raises `quit`.
fn setup(app: &mut Neodocs, cfg: &Config, quit: &Rc<Cell<bool>>) -> Result<()> {
    cfg.apply(app).context("applying configuration")?;
    install_panel_commands(&mut app.commands, &app.panels);
    install_mode_commands(&mut app.commands, &config_modes(cfg)?);
    let q = quit.clone();
    app.commands.set(
        "quit",
        command(move |_| {
            q.set(true);
            Ok(())
        }),
        false,
    );
    app.elements = Box::new(panel_elements(app));
    Ok(())
}

/// Print a doc tree outline.
fn print_tree(out: &mut dyn Write, path: &Path, expand: bool) -> Result<()> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let tree = DocTree::from_json(&json)?;
    let mut st = DocTreeState::default();
    if expand {
        let dirs: Vec<usize> = tree.iter().filter(|n| n.is_dir()).map(|n| n.id()).collect();
        tree.expand(&mut st, &dirs);
    }
    write!(out, "{}", tree.outline(&st))?;
    Ok(())
}

/// Parse arguments, set up logging and the instance, then run a subcommand.
fn main() -> Result<()> {
    let args = Args::parse();
    let mut app = Neodocs::default();

    tracing_subscriber::registry()
        .with(level(args.verbose))
        .with(fmt::layer().with_writer(io::stderr))
        .with(app.notify.layer())
        .init();

    let cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_toml_str(DEFAULT_CONFIG)?,
    };
    let quit = Rc::new(Cell::new(false));
    setup(&mut app, &cfg, &quit)?;
    let mut state = NeodocsState::new();

    let mut stdout = io::stdout();
    match args.command {
        Cmd::Keys => app.print_binding_table(&mut stdout)?,
        Cmd::Commands => {
            for name in app.commands.names() {
                writeln!(stdout, "{name}")?;
            }
        }
        Cmd::Panels { open } => {
            for id in &open {
                app.run(&mut state, &format!("open:{id}"), None, &[])?;
            }
            let out = if stdout.is_terminal() {
                dump(&app.panels, &state.panel)?
            } else {
                dump_plain(&app.panels, &state.panel)?
            };
            write!(stdout, "{out}")?;
        }
        Cmd::Tree { path, expand } => print_tree(&mut stdout, &path, expand)?,
        Cmd::Run => {
            run::run(&app, &mut state, &quit)?;
            for m in app.notify.at_least(NotifyLevel::Warn) {
                eprintln!("{m}");
            }
        }
    }
    Ok(())
}
