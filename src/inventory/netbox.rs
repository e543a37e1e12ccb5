//! NetBox-backed inventory over its REST API.

use log::{debug, info, warn};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;

use super::{DeviceRecord, Inventory};
use crate::config::InventorySettings;
use crate::error::InventoryError;

/// NetBox REST client with token authentication.
pub struct NetboxInventory {
    client: Client,
    base_url: String,
    auth_header: String,
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    count: u64,
    results: Vec<RawDevice>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDevice {
    name: Option<String>,
    serial: Option<String>,
    config_context: Option<Value>,
    custom_fields: Option<Value>,
    local_context_data: Option<Value>,
}

impl NetboxInventory {
    pub fn new(settings: &InventorySettings) -> Result<Self, InventoryError> {
        if !settings.verify_tls {
            warn!("TLS certificate verification disabled for inventory API");
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            auth_header: format!("Token {}", settings.token.expose_secret()),
        })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, InventoryError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Inventory request: GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::Api {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Inventory for NetboxInventory {
    async fn ping(&self) -> Result<(), InventoryError> {
        self.get("/api/status/").await?;
        info!("Inventory API reachable at {}", self.base_url);
        Ok(())
    }

    async fn fetch_device(&self, name: &str) -> Result<DeviceRecord, InventoryError> {
        let path = format!("/api/dcim/devices/?name={}", name);
        let body = self.get(&path).await?.text().await?;
        let list: DeviceList = serde_json::from_str(&body)?;

        if list.count == 0 {
            return Err(InventoryError::DeviceNotFound {
                name: name.to_string(),
            });
        }
        if list.count > 1 {
            warn!(
                "Inventory returned {} devices named '{}', using the first",
                list.count, name
            );
        }

        let device = list
            .results
            .into_iter()
            .next()
            .ok_or_else(|| InventoryError::DeviceNotFound {
                name: name.to_string(),
            })?;

        let serial = device
            .serial
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InventoryError::SerialMissing {
                name: name.to_string(),
            })?
            .to_string();

        let config_text = configuration_text(&device).ok_or_else(|| InventoryError::ConfigMissing {
            name: name.to_string(),
        })?;

        let record_name = device.name.unwrap_or_else(|| name.to_string());
        info!(
            "Fetched device '{}': serial {}, configuration {} bytes",
            record_name,
            serial,
            config_text.len()
        );

        Ok(DeviceRecord {
            name: record_name,
            serial,
            config_text,
        })
    }
}

/// Locate the intended configuration on a device record.
///
/// NetBox installations store it in different places; checked in order:
/// the rendered config context, then custom fields, then raw local
/// context data. Keys `startup_config` and `configuration` are accepted
/// in the first two.
fn configuration_text(device: &RawDevice) -> Option<String> {
    for source in [&device.config_context, &device.custom_fields] {
        let Some(obj) = source else { continue };
        for key in ["startup_config", "configuration"] {
            if let Some(text) = obj.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return Some(text.to_string());
                }
            }
        }
    }

    device
        .local_context_data
        .as_ref()
        .and_then(|v| v.get("configuration"))
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn config_context_preferred() {
        let device = RawDevice {
            config_context: Some(json!({"startup_config": "hostname a\n"})),
            custom_fields: Some(json!({"startup_config": "hostname b\n"})),
            ..RawDevice::default()
        };
        assert_eq!(
            configuration_text(&device).as_deref(),
            Some("hostname a\n")
        );
    }

    #[test]
    fn configuration_key_accepted() {
        let device = RawDevice {
            config_context: Some(json!({"configuration": "hostname a\n"})),
            ..RawDevice::default()
        };
        assert_eq!(
            configuration_text(&device).as_deref(),
            Some("hostname a\n")
        );
    }

    #[test]
    fn custom_fields_fallback() {
        let device = RawDevice {
            config_context: Some(json!({"unrelated": 1})),
            custom_fields: Some(json!({"startup_config": "hostname b\n"})),
            ..RawDevice::default()
        };
        assert_eq!(
            configuration_text(&device).as_deref(),
            Some("hostname b\n")
        );
    }

    #[test]
    fn local_context_last_resort() {
        let device = RawDevice {
            local_context_data: Some(json!({"configuration": "hostname c\n"})),
            ..RawDevice::default()
        };
        assert_eq!(
            configuration_text(&device).as_deref(),
            Some("hostname c\n")
        );
    }

    #[test]
    fn empty_strings_do_not_count() {
        let device = RawDevice {
            config_context: Some(json!({"startup_config": "  "})),
            custom_fields: Some(json!({"configuration": ""})),
            ..RawDevice::default()
        };
        assert_eq!(configuration_text(&device), None);
    }

    #[test]
    fn device_list_parses() {
        let body = json!({
            "count": 1,
            "results": [{
                "name": "edge-sw-01",
                "serial": "FOC2345ABCD",
                "config_context": {"startup_config": "hostname edge-sw-01\n"}
            }]
        });
        let list: DeviceList = serde_json::from_value(body).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.results[0].serial.as_deref(), Some("FOC2345ABCD"));
    }
}
