//! Terminal front-end for crchat: a REPL plus one-shot subcommands over the
//! shared session controller.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod paths;
pub mod render;
pub mod repl;
pub mod session;
pub mod store;
pub mod view;

pub use cli::{Cli, Commands, ConfigCommands, ConfigOverrides};
pub use commands::{print_completions, run_command};
pub use logging::init_logging;
pub use repl::{run_repl, ReplCommand};
pub use session::{ConfigUpdate, Session};
pub use store::{DirectorySink, FileStore};
pub use view::TerminalView;
