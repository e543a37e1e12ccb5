//! SSH transport implementation using russh.

use std::sync::Arc;

use log::{debug, info};
use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::Channel;
use secrecy::ExposeSecret;

use crate::config::SshEndpoint;
use crate::error::ConnectionError;

/// SSH transport wrapping a russh client session.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Endpoint used for this connection.
    endpoint: SshEndpoint,
}

impl SshTransport {
    /// Connect to the SSH server and authenticate with the endpoint's
    /// password credentials.
    pub async fn connect(endpoint: &SshEndpoint) -> Result<Self, ConnectionError> {
        debug!(
            "Connecting to {}:{} as {}",
            endpoint.host, endpoint.port, endpoint.username
        );

        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: None,
            ..Default::default()
        });

        let handler = SshHandler;

        let mut session = tokio::time::timeout(
            endpoint.timeout,
            client::connect(
                ssh_config,
                (endpoint.host.as_str(), endpoint.port),
                handler,
            ),
        )
        .await
        .map_err(|_| ConnectionError::Timeout(endpoint.timeout))?
        .map_err(|e| match e {
            russh::Error::IO(io) => ConnectionError::ConnectionFailed {
                host: endpoint.host.clone(),
                port: endpoint.port,
                source: io,
            },
            other => ConnectionError::Ssh(other),
        })?;

        let authenticated = session
            .authenticate_password(
                &endpoint.username,
                endpoint.password.expose_secret(),
            )
            .await
            .map_err(ConnectionError::Ssh)?
            .success();

        if !authenticated {
            return Err(ConnectionError::AuthenticationFailed {
                user: endpoint.username.clone(),
            });
        }

        info!("Connected to {}:{}", endpoint.host, endpoint.port);

        Ok(Self {
            session,
            endpoint: endpoint.clone(),
        })
    }

    /// Open a PTY channel with a shell, for interactive console work.
    pub async fn open_pty_channel(&self) -> Result<Channel<Msg>, ConnectionError> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(ConnectionError::Ssh)?;

        channel
            .request_pty(true, "xterm", 511, 24, 0, 0, &[])
            .await
            .map_err(ConnectionError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(ConnectionError::Ssh)?;

        Ok(channel)
    }

    /// Open a plain session channel running one remote command.
    pub async fn open_exec_channel(
        &self,
        command: &str,
    ) -> Result<Channel<Msg>, ConnectionError> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(ConnectionError::Ssh)?;

        channel
            .exec(true, command)
            .await
            .map_err(ConnectionError::Ssh)?;

        Ok(channel)
    }

    /// The host this transport is connected to.
    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    /// Close the connection.
    pub async fn close(self) -> Result<(), ConnectionError> {
        debug!("Closing connection to {}", self.endpoint.host);
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(ConnectionError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
///
/// Host keys are accepted without verification: the jump host and terminal
/// server live on a management network and are frequently reimaged, which
/// makes known_hosts churn constant.
struct SshHandler;

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}
