//! Staging of configuration files on the intermediate file server.
//!
//! The device later pulls the staged file itself over FTP; this module
//! only writes, verifies, and removes files on the server.

use std::future::Future;

use crate::error::{ConnectionError, DeploymentError};

pub mod ssh;

pub use ssh::SshStager;

/// A file-staging backend.
pub trait Stager: Send {
    /// Establish the connection to the staging server.
    fn connect(&mut self) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Write `content` to `filename` in the staging directory,
    /// overwriting any previous file of that name.
    fn put_file(
        &mut self,
        filename: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), DeploymentError>> + Send;

    /// Size in bytes of a staged file.
    fn file_size(
        &mut self,
        filename: &str,
    ) -> impl Future<Output = Result<u64, DeploymentError>> + Send;

    /// Remove a staged file. Missing files are not an error.
    fn remove_file(
        &mut self,
        filename: &str,
    ) -> impl Future<Output = Result<(), DeploymentError>> + Send;

    /// Release the connection. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
