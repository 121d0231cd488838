pub mod exec;

pub use exec::{exit_code, run_shell_command};
