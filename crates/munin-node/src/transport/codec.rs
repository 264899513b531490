//! Line codec between the socket and the command processor.
//!
//! - Request lines => `Request` (blank lines are dropped)
//! - Processor outcome => one `Bytes` buffer per response, or a close signal

use bytes::Bytes;
use munin_core::error::{MuninError, Result};
use munin_core::protocol::{encode_lines, Request, BAD_EXIT, END, UNKNOWN_COMMAND};

use crate::processor::Reply;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Complete response, already newline-terminated.
    Write(Bytes),
    /// Client asked to quit.
    Close,
}

pub fn decode(line: &str) -> Option<Request> {
    Request::parse(line)
}

/// Turn a processor outcome into what goes on the wire.
///
/// Errors never close the connection: an unknown command gets the usage
/// hint, anything else is logged and answered with `# Bad exit`.
pub fn encode(outcome: Result<Reply>, request: &Request) -> Outbound {
    match outcome {
        Ok(Reply::Lines(lines)) => Outbound::Write(encode_lines(&lines)),
        Ok(Reply::Quit) => Outbound::Close,
        Err(MuninError::UnknownCommand(cmd)) => {
            tracing::debug!(command = %cmd, "unknown command");
            Outbound::Write(encode_lines(&[UNKNOWN_COMMAND]))
        }
        Err(e) => {
            tracing::warn!(
                command = %request.command,
                args = ?request.args,
                code = e.code().as_str(),
                error = %e,
                "command failed"
            );
            Outbound::Write(encode_lines(&[BAD_EXIT, END]))
        }
    }
}
