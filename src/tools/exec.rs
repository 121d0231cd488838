use std::io;
use std::process::{Command, ExitStatus};

use tracing::debug;

/// Run an accepted command through `shell -c`, inheriting the terminal's stdio.
pub fn run_shell_command(shell: &str, command: &str) -> io::Result<ExitStatus> {
    debug!(shell, command, "running accepted command");
    Command::new(shell).arg("-c").arg(command).status().map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Failed to execute command '{}': {}", command, e),
        )
    })
}

/// Exit code to propagate for a finished command; 128 + signal when killed.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_propagates() {
        let status = run_shell_command("sh", "exit 3").unwrap();
        assert_eq!(exit_code(status), 3);
    }

    #[test]
    fn test_successful_command() {
        let status = run_shell_command("sh", "true").unwrap();
        assert!(status.success());
        assert_eq!(exit_code(status), 0);
    }

    #[test]
    fn test_missing_shell_reports_command() {
        let err = run_shell_command("/nonexistent/shell", "ls").unwrap_err();
        assert!(err.to_string().contains("'ls'"));
    }
}
