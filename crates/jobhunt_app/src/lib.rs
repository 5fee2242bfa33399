//! Jobhunt app: wires the pure session core to the worker engine and the terminal.
pub mod platform;

pub use platform::app::{AppInput, SessionApp};
pub use platform::config::{Cli, Command, ConfigError, SavedAction};
pub use platform::console::{display_size, parse_command, ConsoleCommand, ConsoleError};
pub use platform::persistence::RonFileStore;
