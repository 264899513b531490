//! Transport layer (line-oriented TCP).
//!
//! Exposes the accept loop, the per-connection session and the codec that
//! turns request lines into processor calls and replies into wire bytes.

pub mod codec;
pub mod listener;
pub mod session;

pub use listener::serve;
pub use session::{run_session, MAX_LINE};
