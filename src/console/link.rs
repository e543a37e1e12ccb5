//! Raw bidirectional byte channel to the remote console.
//!
//! The session logic is written against [`ConsoleLink`] so the read loop
//! can be exercised with scripted chunk sequences in tests; [`PtyLink`]
//! is the russh-backed implementation used in production.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use crate::error::CommandError;
use crate::transport::SshTransport;

/// A raw console byte channel.
pub trait ConsoleLink: Send {
    /// Send bytes exactly as given, no terminator appended.
    fn send_raw(&mut self, data: &str)
    -> impl Future<Output = Result<(), CommandError>> + Send;

    /// Wait up to `wait` for the next chunk of bytes.
    ///
    /// Returns `Ok(None)` when the wait elapsed with nothing received.
    /// A closed channel is an error: the console path has no legitimate
    /// end-of-stream while a run is active.
    fn read_chunk(
        &mut self,
        wait: Duration,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, CommandError>> + Send;

    /// Release the channel. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Console link over a russh PTY channel, owning its transport.
pub struct PtyLink {
    transport: Option<SshTransport>,
    channel: Option<Channel<Msg>>,
}

impl PtyLink {
    /// Wrap an open PTY channel and the transport it came from.
    pub fn new(transport: SshTransport, channel: Channel<Msg>) -> Self {
        Self {
            transport: Some(transport),
            channel: Some(channel),
        }
    }
}

impl ConsoleLink for PtyLink {
    async fn send_raw(&mut self, data: &str) -> Result<(), CommandError> {
        let channel = self.channel.as_mut().ok_or(CommandError::ChannelClosed)?;
        channel
            .data(data.as_bytes())
            .await
            .map_err(CommandError::Ssh)
    }

    async fn read_chunk(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, CommandError> {
        let channel = self.channel.as_mut().ok_or(CommandError::ChannelClosed)?;

        match tokio::time::timeout(wait, channel.wait()).await {
            // Nothing arrived within the window.
            Err(_) => Ok(None),

            Ok(Some(ChannelMsg::Data { data })) => Ok(Some(data.to_vec())),
            Ok(Some(ChannelMsg::ExtendedData { data, .. })) => Ok(Some(data.to_vec())),

            Ok(Some(ChannelMsg::Eof)) | Ok(Some(ChannelMsg::Close)) | Ok(None) => {
                Err(CommandError::ChannelClosed)
            }

            // Control messages carry no console bytes.
            Ok(Some(other)) => {
                debug!("Ignoring channel message: {:?}", other);
                Ok(Some(Vec::new()))
            }
        }
    }

    async fn close(&mut self) {
        if let Some(channel) = self.channel.take() {
            if let Err(e) = channel.eof().await {
                debug!("Error sending EOF on console channel: {}", e);
            }
        }
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                warn!("Error closing console transport: {}", e);
            }
        }
    }
}
