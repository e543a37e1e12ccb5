//! Interactive console session layer.
//!
//! This module makes a byte-oriented, promptless remote shell behave like
//! a request/response protocol: buffered reads with ANSI stripping,
//! pager and confirmation interception, and quiescence-based command
//! completion. There is no framing and no guaranteed prompt string on the
//! far side, so "command finished" is inferred from silence.

mod buffer;
mod link;
mod quiesce;
mod result;
mod session;

use std::future::Future;

pub use buffer::PendingBuffer;
pub use link::{ConsoleLink, PtyLink};
pub use quiesce::{ChunkAction, RunState, MAX_PAGINATION};
pub use result::{CommandResult, RunOptions};
pub use session::{ConsoleSession, SessionConfig, SshConsoleFactory};

use crate::error::{CommandError, Error};

/// Session-level operations the orchestrator drives.
pub trait Console: Send {
    /// Reach privileged mode, tolerating devices that are already there.
    fn enter_privileged_mode(&mut self)
    -> impl Future<Output = Result<(), CommandError>> + Send;

    /// Send one command and collect its output until quiescence.
    fn run(
        &mut self,
        command: &str,
        opts: &RunOptions,
    ) -> impl Future<Output = Result<CommandResult, CommandError>> + Send;

    /// Release the channel. Idempotent; safe after partial failure.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens console sessions to a device's console line.
pub trait ConsoleFactory: Send {
    type Console: Console + Send;

    /// Establish the underlying channel and run the port-selection
    /// handshake for the given console port.
    fn open(
        &mut self,
        console_port: u16,
    ) -> impl Future<Output = Result<Self::Console, Error>> + Send;
}
