//! SSH-backed stager: one exec channel per operation on the file server.

use log::{debug, info, warn};
use russh::ChannelMsg;

use super::Stager;
use crate::config::SshEndpoint;
use crate::error::{ConnectionError, DeploymentError};
use crate::retry::RetryPolicy;
use crate::transport::SshTransport;

/// Stages files in the FTP directory of the jump host over SSH.
pub struct SshStager {
    endpoint: SshEndpoint,
    retry: RetryPolicy,
    directory: String,
    transport: Option<SshTransport>,
}

/// Collected output of one remote command.
struct ExecOutput {
    output: String,
    exit: Option<u32>,
}

impl SshStager {
    pub fn new(endpoint: SshEndpoint, directory: &str, retry: RetryPolicy) -> Self {
        Self {
            endpoint,
            retry,
            directory: directory.trim_end_matches('/').to_string(),
            transport: None,
        }
    }

    /// Absolute path of a staged file, shell-quoted.
    ///
    /// Filenames are produced by the caller from a sanitized device
    /// name; anything that would break out of the quoting is rejected
    /// here as well.
    fn quoted_path(&self, filename: &str) -> Result<String, DeploymentError> {
        if filename.is_empty()
            || filename.contains(['/', '\'', '\\'])
            || filename.contains(char::is_whitespace)
        {
            return Err(DeploymentError::StagingWrite {
                path: filename.to_string(),
                detail: "invalid staging filename".to_string(),
            });
        }
        Ok(format!("'{}/{}'", self.directory, filename))
    }

    fn transport(&self) -> Result<&SshTransport, DeploymentError> {
        self.transport.as_ref().ok_or(DeploymentError::NotConnected)
    }

    /// Run one remote command, optionally feeding `stdin`, and collect
    /// its output and exit status.
    async fn exec(
        &self,
        command: &str,
        stdin: Option<&[u8]>,
    ) -> Result<ExecOutput, ConnectionError> {
        let transport = match self.transport.as_ref() {
            Some(t) => t,
            None => return Err(ConnectionError::Disconnected),
        };

        let mut channel = transport.open_exec_channel(command).await?;

        if let Some(data) = stdin {
            channel.data(data).await.map_err(ConnectionError::Ssh)?;
        }
        channel.eof().await.map_err(ConnectionError::Ssh)?;

        let mut output = Vec::new();
        let mut exit = None;
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => output.extend_from_slice(&data),
                ChannelMsg::ExtendedData { data, .. } => output.extend_from_slice(&data),
                ChannelMsg::ExitStatus { exit_status } => exit = Some(exit_status),
                ChannelMsg::Eof | ChannelMsg::Close => {}
                other => debug!("Ignoring exec channel message: {:?}", other),
            }
        }

        Ok(ExecOutput {
            output: String::from_utf8_lossy(&output).into_owned(),
            exit,
        })
    }
}

impl Stager for SshStager {
    async fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.transport.is_some() {
            return Ok(());
        }

        let endpoint = self.endpoint.clone();
        let transport = self
            .retry
            .connect(&endpoint.host, || {
                let endpoint = endpoint.clone();
                async move { SshTransport::connect(&endpoint).await }
            })
            .await?;

        info!("Connected to staging server {}", transport.host());
        self.transport = Some(transport);
        Ok(())
    }

    async fn put_file(&mut self, filename: &str, content: &str) -> Result<(), DeploymentError> {
        let path = self.quoted_path(filename)?;
        self.transport()?;

        debug!("Staging {} bytes to {}", content.len(), path);
        let result = self
            .exec(&format!("cat > {}", path), Some(content.as_bytes()))
            .await
            .map_err(|e| DeploymentError::StagingWrite {
                path: filename.to_string(),
                detail: e.to_string(),
            })?;

        match result.exit {
            Some(0) | None => {
                info!("Staged configuration file {}", path);
                Ok(())
            }
            Some(code) => Err(DeploymentError::StagingWrite {
                path: filename.to_string(),
                detail: format!("remote write exited with status {}: {}", code, result.output),
            }),
        }
    }

    async fn file_size(&mut self, filename: &str) -> Result<u64, DeploymentError> {
        let path = self.quoted_path(filename)?;
        self.transport()?;

        let result = self
            .exec(&format!("wc -c < {}", path), None)
            .await
            .map_err(|e| DeploymentError::StagingVerify {
                path: filename.to_string(),
                detail: e.to_string(),
            })?;

        if let Some(code) = result.exit {
            if code != 0 {
                return Err(DeploymentError::StagingVerify {
                    path: filename.to_string(),
                    detail: format!("size check exited with status {}: {}", code, result.output),
                });
            }
        }

        result
            .output
            .trim()
            .parse::<u64>()
            .map_err(|_| DeploymentError::StagingVerify {
                path: filename.to_string(),
                detail: format!("unparseable size output: {:?}", result.output.trim()),
            })
    }

    async fn remove_file(&mut self, filename: &str) -> Result<(), DeploymentError> {
        let path = self.quoted_path(filename)?;
        self.transport()?;

        debug!("Removing staged file {}", path);
        let result = self
            .exec(&format!("rm -f {}", path), None)
            .await
            .map_err(|e| DeploymentError::CleanupFailed {
                path: filename.to_string(),
                detail: e.to_string(),
            })?;

        match result.exit {
            Some(0) | None => Ok(()),
            Some(code) => Err(DeploymentError::CleanupFailed {
                path: filename.to_string(),
                detail: format!("remove exited with status {}: {}", code, result.output),
            }),
        }
    }

    async fn close(&mut self) {
        if let Some(transport) = self.transport.take() {
            if let Err(e) = transport.close().await {
                warn!("Error closing staging connection: {}", e);
            }
        }
    }
}
