//! Bounded execution of the external tools that back every sample.

use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Upper bound on how long a single query may run.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Reasons a query produced no usable output.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("i/o error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("`{program}` exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },
}

/// Runs `program` with [`COMMAND_TIMEOUT`] and returns its stdout.
pub fn run(program: &str, args: &[&str]) -> Result<String, CommandError> {
    run_with_timeout(program, args, COMMAND_TIMEOUT)
}

/// Runs `program` and returns its stdout, killing it once `timeout` elapses.
///
/// Stdout is drained on a helper thread so a child producing more output than
/// the pipe buffer holds cannot stall while we wait on it. The deadline also
/// covers that drain: a descendant still holding the pipe open after the
/// child exits counts as a timeout, and the helper thread is left behind.
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, CommandError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    if let Some(mut stdout) = child.stdout.take() {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });
    }

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CommandError::Timeout {
                    program: program.to_string(),
                    timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CommandError::Io {
                    program: program.to_string(),
                    source,
                });
            }
        }
    };

    let stdout = match rx.recv_timeout(timeout.saturating_sub(start.elapsed())) {
        Ok(read) => read.map_err(|source| CommandError::Io {
            program: program.to_string(),
            source,
        })?,
        Err(RecvTimeoutError::Timeout) => {
            return Err(CommandError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }
        Err(RecvTimeoutError::Disconnected) => Vec::new(),
    };

    if !status.success() {
        return Err(CommandError::ExitStatus {
            program: program.to_string(),
            status,
        });
    }

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = run("sh", &["-c", "echo hello"]).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = run("powerdash-no-such-tool", &[]).unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn test_slow_program_times_out() {
        let start = Instant::now();
        let err = run_with_timeout("sh", &["-c", "sleep 5"], Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_background_descendant_holding_stdout_times_out() {
        let start = Instant::now();
        let err = run_with_timeout(
            "sh",
            &["-c", "sleep 3 & echo hi"],
            Duration::from_millis(200),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_failing_program_reports_status() {
        let err = run("sh", &["-c", "exit 3"]).unwrap_err();
        assert!(matches!(err, CommandError::ExitStatus { .. }));
    }

    #[test]
    fn test_large_output_does_not_stall() {
        let out = run("sh", &["-c", "yes powerdash | head -n 20000"]).unwrap();
        assert_eq!(out.lines().count(), 20000);
    }
}
