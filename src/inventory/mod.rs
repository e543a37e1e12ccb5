//! Source of truth for devices: expected serial and intended
//! configuration.

use std::future::Future;

use crate::error::InventoryError;

pub mod netbox;

pub use netbox::NetboxInventory;

/// What provisioning needs to know about one device.
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub name: String,

    /// Expected platform serial; compared against the serial the device
    /// reports over its console.
    pub serial: String,

    /// Full intended configuration text.
    pub config_text: String,
}

/// A device inventory backend.
pub trait Inventory: Send {
    /// Cheap reachability check, run before anything else so a dead
    /// inventory fails the run early.
    fn ping(&self) -> impl Future<Output = Result<(), InventoryError>> + Send;

    /// Look up one device by name, with its serial and configuration.
    fn fetch_device(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<DeviceRecord, InventoryError>> + Send;
}
