//! SSH transport layer wrapping russh.
//!
//! Low-level connection management for the jump host and the terminal
//! server: connection setup, password authentication, and channel
//! creation (PTY for console work, plain session channels for exec).

mod ssh;

pub use ssh::SshTransport;
