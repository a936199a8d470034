pub mod command_executor;
pub mod redactor;

pub use command_executor::{CommandError, CommandRunner, Invocation, StreamingExecutor};
pub use redactor::{REDACTION_MARKER, SecretRedactor, mask};
