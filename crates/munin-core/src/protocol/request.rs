//! Request line parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{MuninError, Result};

/// Commands understood by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Config,
    Fetch,
    Nodes,
    Version,
    Quit,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Config => "config",
            Command::Fetch => "fetch",
            Command::Nodes => "nodes",
            Command::Version => "version",
            Command::Quit => "quit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = MuninError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(Command::List),
            "config" => Ok(Command::Config),
            "fetch" => Ok(Command::Fetch),
            "nodes" => Ok(Command::Nodes),
            "version" => Ok(Command::Version),
            "quit" => Ok(Command::Quit),
            other => Err(MuninError::UnknownCommand(other.to_string())),
        }
    }
}

/// One tokenized request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: String,
    pub args: Vec<String>,
}

impl Request {
    /// Split a raw line on whitespace. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Request> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_string();
        Some(Request {
            command,
            args: words.map(str::to_string).collect(),
        })
    }

    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}
