//! Process tree walking
//!
//! This module traverses the process tree from the current process up to the
//! root, collecting the command line of every process on the way.
//!
//! Platform strategy:
//! - Linux/macOS: `ps -p <pid> -o ppid=,args=` once per ancestor
//! - Windows: a `Get-CimInstance Win32_Process` query through PowerShell, once per ancestor
//!
//! Inspection is best effort. The first failed query ends the walk and the
//! lines gathered so far are returned along with the reason.

use crate::config::{MAX_WALK_DEPTH, POSIX_ROOT_PID};
use crate::core::models::{AncestryWalk, ProcessRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

const PS_PROGRAM: &str = "ps";
const POWERSHELL_PROGRAM: &str = "powershell";

static CIM_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(\d+)","(.*)""#).unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessTreeError {
    #[error("Failed to launch `{command}`: {message}")]
    Spawn { command: String, message: String },
    #[error("`{command}` failed ({}): {stderr}", describe_exit(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Unexpected output while inspecting process {pid}: {output:?}")]
    MalformedOutput { pid: u32, output: String },
    #[error("Process not found: {pid}")]
    ProcessNotFound { pid: u32 },
    #[error("Process {pid} was already visited, parent chain loops")]
    Cycle { pid: u32 },
    #[error("Process tree is deeper than {max} levels")]
    DepthLimit { max: usize },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Runs an external inspection tool and returns its standard output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String, ProcessTreeError>;
}

impl<F> CommandRunner for F
where
    F: Fn(&str, &[String]) -> Result<String, ProcessTreeError>,
{
    fn run(&self, program: &str, args: &[String]) -> Result<String, ProcessTreeError> {
        self(program, args)
    }
}

/// Spawns the real tool and waits for it. There is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String, ProcessTreeError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| ProcessTreeError::Spawn {
                command: program.to_string(),
                message: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(ProcessTreeError::CommandFailed {
                command: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A platform-specific way of walking from a pid to the root of the tree.
pub trait ProcessTreeWalker {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Walk from `start_pid` upwards. `start_pid`'s own command line is the first entry.
    fn walk(&self, start_pid: u32) -> AncestryWalk;
}

/// Parse one line of `ps -o ppid=,args=` output.
///
/// The first field is the parent pid, the rest is the command line rejoined
/// with single spaces.
pub fn parse_ps_output(pid: u32, output: &str) -> Result<ProcessRecord, ProcessTreeError> {
    let mut fields = output.split_whitespace();
    let parent_pid = fields
        .next()
        .and_then(|field| field.parse::<u32>().ok())
        .ok_or_else(|| ProcessTreeError::MalformedOutput {
            pid,
            output: output.trim().to_string(),
        })?;
    let command_line = fields.collect::<Vec<_>>().join(" ");
    Ok(ProcessRecord::new(parent_pid, command_line))
}

/// Find the `"<ppid>","<commandline>"` row in `ConvertTo-Csv` output.
///
/// Doubled quotes inside the command line are left for the tokenizer.
pub fn parse_cim_csv(output: &str) -> Option<ProcessRecord> {
    let captures = CIM_ROW.captures(output)?;
    let parent_pid = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let command_line = captures.get(2).map_or("", |m| m.as_str());
    Some(ProcessRecord::new(parent_pid, command_line))
}

fn ps_args(pid: u32) -> Vec<String> {
    vec![
        "-p".to_string(),
        pid.to_string(),
        "-o".to_string(),
        "ppid=,args=".to_string(),
    ]
}

fn cim_args(pid: u32) -> Vec<String> {
    vec![
        "-NoProfile".to_string(),
        "-Command".to_string(),
        format!(
            "Get-CimInstance Win32_Process -Filter 'ProcessId={pid}' | Select-Object ParentProcessId,CommandLine | ConvertTo-Csv -NoTypeInformation"
        ),
    ]
}

/// Pids seen so far in one walk.
#[derive(Debug, Default)]
struct Visited {
    pids: HashSet<u32>,
}

impl Visited {
    /// Record `pid`, failing on a repeat or once the depth backstop is hit.
    fn enter(&mut self, pid: u32) -> Result<(), ProcessTreeError> {
        if self.pids.len() == MAX_WALK_DEPTH {
            return Err(ProcessTreeError::DepthLimit {
                max: MAX_WALK_DEPTH,
            });
        }
        if !self.pids.insert(pid) {
            return Err(ProcessTreeError::Cycle { pid });
        }
        Ok(())
    }
}

/// Walker for Linux, macOS and other systems with a POSIX `ps`.
#[derive(Debug, Default, Clone)]
pub struct PosixWalker<R = SystemCommandRunner> {
    runner: R,
}

impl<R: CommandRunner> PosixWalker<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn inspect(&self, pid: u32) -> Result<ProcessRecord, ProcessTreeError> {
        match self.runner.run(PS_PROGRAM, &ps_args(pid)) {
            Ok(output) => parse_ps_output(pid, &output),
            // ps exits non-zero without a message when the pid is gone
            Err(ProcessTreeError::CommandFailed { stderr, .. }) if stderr.is_empty() => {
                Err(ProcessTreeError::ProcessNotFound { pid })
            }
            Err(err) => Err(err),
        }
    }
}

impl<R: CommandRunner> ProcessTreeWalker for PosixWalker<R> {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn walk(&self, start_pid: u32) -> AncestryWalk {
        let mut command_lines = Vec::new();
        let mut pid = start_pid;
        let mut visited = Visited::default();

        while pid > POSIX_ROOT_PID {
            if let Err(err) = visited.enter(pid) {
                debug!(pid, error = %err, "process tree walk cut short");
                return AncestryWalk::interrupted(command_lines, pid, err);
            }

            match self.inspect(pid) {
                Ok(record) => {
                    debug!(
                        pid,
                        ppid = record.parent_pid,
                        command_line = %record.command_line,
                        "inspected process"
                    );
                    command_lines.push(record.command_line);
                    pid = record.parent_pid;
                }
                Err(err) => {
                    debug!(pid, error = %err, "process tree walk cut short");
                    return AncestryWalk::interrupted(command_lines, pid, err);
                }
            }
        }

        AncestryWalk::completed(command_lines)
    }
}

/// Walker for Windows, backed by CIM queries.
#[derive(Debug, Default, Clone)]
pub struct WindowsWalker<R = SystemCommandRunner> {
    runner: R,
}

impl<R: CommandRunner> WindowsWalker<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// `Ok(None)` means the query ran but found no such process.
    fn inspect(&self, pid: u32) -> Result<Option<ProcessRecord>, ProcessTreeError> {
        let output = self.runner.run(POWERSHELL_PROGRAM, &cim_args(pid))?;
        if output.trim().is_empty() {
            return Ok(None);
        }
        parse_cim_csv(&output)
            .map(Some)
            .ok_or_else(|| ProcessTreeError::MalformedOutput {
                pid,
                output: output.trim().to_string(),
            })
    }
}

impl<R: CommandRunner> ProcessTreeWalker for WindowsWalker<R> {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn walk(&self, start_pid: u32) -> AncestryWalk {
        let mut command_lines = Vec::new();
        let mut pid = start_pid;
        let mut visited = Visited::default();

        while pid > 0 {
            if let Err(err) = visited.enter(pid) {
                debug!(pid, error = %err, "process tree walk cut short");
                return AncestryWalk::interrupted(command_lines, pid, err);
            }

            match self.inspect(pid) {
                Ok(Some(record)) => {
                    debug!(
                        pid,
                        ppid = record.parent_pid,
                        command_line = %record.command_line,
                        "inspected process"
                    );
                    if !record.command_line.is_empty() {
                        command_lines.push(record.command_line);
                    }
                    pid = record.parent_pid;
                }
                // Parents on Windows routinely exit before their children.
                Ok(None) => {
                    debug!(pid, "no such process, treating as root");
                    break;
                }
                Err(err) => {
                    debug!(pid, error = %err, "process tree walk cut short");
                    return AncestryWalk::interrupted(command_lines, pid, err);
                }
            }
        }

        AncestryWalk::completed(command_lines)
    }
}
