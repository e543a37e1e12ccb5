//! Zero-touch provisioning of network devices over their console line.
//!
//! A factory-fresh device has no management IP, so everything happens
//! through a terminal server's console multiplexer: verify the device is
//! the one the inventory expects, stage its intended configuration on a
//! file server, have the device pull and apply it, and verify the result
//! in the running configuration.
//!
//! The crate splits into a console automation layer ([`console`]), which
//! turns a promptless byte stream into a request/response protocol using
//! quiescence detection, and a provisioning workflow ([`orchestrator`]),
//! a linear state machine over three collaborators: the device inventory
//! ([`inventory`]), the file stager ([`staging`]), and the console
//! itself.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use secrecy::SecretString;
//! use zerotouch::config::{SshEndpoint, StagingSettings};
//! use zerotouch::console::{SessionConfig, SshConsoleFactory};
//! use zerotouch::inventory::NetboxInventory;
//! use zerotouch::orchestrator::{DevicePolicy, Orchestrator};
//! use zerotouch::retry::RetryPolicy;
//! use zerotouch::staging::SshStager;
//!
//! # async fn example(inventory: NetboxInventory) -> zerotouch::Result<()> {
//! let retry = RetryPolicy::new(3, Duration::from_secs(5));
//! let jump = SshEndpoint::new("jump.lab.net", "admin", SecretString::from("...".to_string()));
//! let term = SshEndpoint::new("ts.lab.net", "admin", SecretString::from("...".to_string()));
//!
//! let stager = SshStager::new(jump, "/srv/ftp", retry.clone());
//! let consoles = SshConsoleFactory::new(term, retry, SessionConfig::default());
//! let staging = StagingSettings {
//!     server: "198.51.100.9".to_string(),
//!     username: "ftpuser".to_string(),
//!     password: SecretString::from("...".to_string()),
//!     directory: "/srv/ftp".to_string(),
//! };
//!
//! let mut orch = Orchestrator::new(
//!     "edge-sw-01", 5, inventory, stager, consoles, staging, DevicePolicy::default(),
//! );
//! orch.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod parse;
pub mod retry;
pub mod staging;
pub mod transport;

pub use error::{Error, Result};
pub use orchestrator::{DevicePolicy, Orchestrator, ProvisioningState, ProvisioningStatus};
