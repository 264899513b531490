//! Munin node wire protocol.
//!
//! Requests are single ASCII lines, `<command>[ <argument>]`. Responses are
//! lines as well; multi-line responses (`config`, `fetch`, `nodes`) end with a
//! line holding a single `.`.
//!
//! Parsing never panics: blank or odd input is reported as `None` or as a
//! `MuninError` so a misbehaving poller cannot take the node down.

pub mod request;
pub mod response;

pub use request::{Command, Request};
pub use response::{
    encode_lines, field_name, greeting, is_valid_graph_name, sanitize, version_line, BAD_EXIT, END,
    UNKNOWN_COMMAND, UNKNOWN_SERVICE,
};
