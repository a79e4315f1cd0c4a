//! External command execution.

pub mod command;
pub mod mock;
pub mod platform;
pub mod runner;

pub use command::{
    execute, execute_streaming, CommandOptions, CommandResult, OutputCallback,
    OutputLine, ProcessSpec,
};
pub use mock::{MockCall, MockResponse, MockRunner};
pub use platform::{is_ci, is_executable, parse_system_path, resolve_tool_path};
pub use runner::{CommandRunner, DryRunRunner, SystemRunner};
