//! Streaming command execution with redacted command echo
//!
//! # Security Features
//!
//! - **Injection prevention**: Uses `std::process::Command`, arguments are never
//!   interpolated into a shell string
//! - **Secret arguments**: Values passed through [`Invocation::secret_arg`] reach the
//!   child unmodified but are rendered as `[REDACTED]` in the echoed command line
//! - **Injected sinks**: Child output is forwarded into caller-provided writers, so
//!   nothing is hard-wired to the process streams
//!
//! # Example
//!
//! ```rust,no_run
//! use expo_eject_step::security::{CommandRunner, Invocation, StreamingExecutor};
//!
//! let mut executor = StreamingExecutor::inherit();
//! executor.run(&Invocation::new("npm").arg("--version")).unwrap();
//! ```

use super::redactor::SecretRedactor;
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use thiserror::Error;

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Binary not found, permission denied, ...
    #[error("could not start '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child exited unsuccessfully; `code` is `None` when it was killed by a signal
    #[error("'{program}' failed with {}", describe_exit(*code))]
    Failed { program: String, code: Option<i32> },

    /// Waiting on the child failed
    #[error("lost track of '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The command line could not be written to the output sink
    #[error("could not write to the output stream: {0}")]
    Output(#[source] io::Error),
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

#[derive(Debug)]
enum Argument {
    Plain(String),
    Secret(SecretString),
}

/// One external command: program, arguments and optional working directory
#[derive(Debug)]
pub struct Invocation {
    program: String,
    args: Vec<Argument>,
    workdir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Argument::Plain(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|a| Argument::Plain(a.into())));
        self
    }

    /// Adds an argument that must never be echoed in clear text
    pub fn secret_arg(mut self, secret: &SecretString) -> Self {
        self.args
            .push(Argument::Secret(SecretString::new(secret.expose_secret().into())));
        self
    }

    /// Runs the command inside `dir`; an empty path keeps the current directory
    pub fn current_dir(mut self, dir: Option<&Path>) -> Self {
        self.workdir = dir
            .filter(|d| !d.as_os_str().is_empty())
            .map(Path::to_path_buf);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Arguments as the child process receives them, secrets included
    fn exposed_args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| match arg {
            Argument::Plain(value) => value.as_str(),
            Argument::Secret(secret) => secret.expose_secret(),
        })
    }

    /// The command line as it may be logged
    ///
    /// Every secret argument is redacted, including where its value also
    /// appears inside a plain argument.
    pub fn printable(&self) -> String {
        let mut redactor = SecretRedactor::new();
        for arg in &self.args {
            if let Argument::Secret(secret) = arg {
                redactor.register(secret);
            }
        }

        let line = std::iter::once(self.program.as_str())
            .chain(self.exposed_args())
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ");

        redactor.redact(&line)
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Executes one [`Invocation`] and blocks until it finishes
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), CommandError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<(), CommandError> {
        (**self).run(invocation)
    }
}

/// Runs commands while streaming their output into the given sinks
///
/// The `$ program args` line is written to the stdout sink before the child
/// starts.
#[derive(Debug)]
pub struct StreamingExecutor<O, E> {
    stdout: O,
    stderr: E,
}

impl StreamingExecutor<io::Stdout, io::Stderr> {
    /// Executor writing to this process's own stdout and stderr
    pub fn inherit() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O, E> StreamingExecutor<O, E>
where
    O: Write + Send,
    E: Write + Send,
{
    pub fn new(stdout: O, stderr: E) -> Self {
        Self { stdout, stderr }
    }

    /// Gives the sinks back, e.g. to inspect captured output
    pub fn into_sinks(self) -> (O, E) {
        (self.stdout, self.stderr)
    }
}

impl<O, E> CommandRunner for StreamingExecutor<O, E>
where
    O: Write + Send,
    E: Write + Send,
{
    fn run(&mut self, invocation: &Invocation) -> Result<(), CommandError> {
        writeln!(self.stdout, "$ {}", invocation.printable()).map_err(CommandError::Output)?;
        self.stdout.flush().map_err(CommandError::Output)?;

        let program = invocation.program().to_string();
        let mut command = Command::new(resolve_program(&program));
        command
            .args(invocation.exposed_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = invocation.workdir() {
            command.current_dir(dir);
        }

        log::debug!("Spawning {} in {:?}", program, invocation.workdir());
        let mut child = command.spawn().map_err(|source| CommandError::Launch {
            program: program.clone(),
            source,
        })?;

        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();
        let (stdout, stderr) = (&mut self.stdout, &mut self.stderr);

        // One pump per stream so neither pipe can fill up and stall the child.
        let (out_result, err_result) = thread::scope(|scope| {
            let out_pump = scope.spawn(move || pump(child_stdout, stdout));
            let err_pump = scope.spawn(move || pump(child_stderr, stderr));
            (out_pump.join(), err_pump.join())
        });
        for result in [out_result, err_result] {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::warn!("Failed to forward output of {}: {}", program, e),
                Err(_) => log::warn!("Output forwarding thread for {} panicked", program),
            }
        }

        let status = child.wait().map_err(|source| CommandError::Wait {
            program: program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                program,
                code: status.code(),
            })
        }
    }
}

/// Copies everything from `source` to `sink`, flushing after each chunk
fn pump<R: Read, W: Write>(source: Option<R>, sink: &mut W) -> io::Result<()> {
    let Some(mut source) = source else {
        return Ok(());
    };
    let mut buffer = [0u8; 8 * 1024];
    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => return sink.flush(),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_all(&buffer[..read])?;
        sink.flush()?;
    }
}

/// npm and expo are `.cmd` shims on Windows, not executables
#[cfg(target_os = "windows")]
fn resolve_program(program: &str) -> String {
    if matches!(program, "npm" | "expo") {
        format!("{}.cmd", program)
    } else {
        program.to_string()
    }
}

#[cfg(not(target_os = "windows"))]
fn resolve_program(program: &str) -> String {
    program.to_string()
}
