//! Docker volume lifecycle against the daemon
//!
//! Volumes are created from a loose string option set (the shape a CLI or
//! dashboard form produces) and removed by name. Neither operation touches
//! the cached snapshot; call [`DaemonState::refresh_volumes`] afterwards to
//! observe the result.

use bollard::models::Volume;
use std::collections::HashMap;

use super::errors::DaemonError;
use super::DaemonState;

/// Option key for the volume name
pub const NAME_KEY: &str = "name";
/// Option key for the volume driver
pub const DRIVER_KEY: &str = "driver";
/// Option key for the comma separated `key=value` label list
pub const LABELS_KEY: &str = "labels";
/// Option key for the comma separated `key=value` driver option list
pub const OPTIONS_KEY: &str = "options";

/// Parameters for a single volume creation
///
/// A missing name lets the daemon generate one; a missing driver selects the
/// daemon's default driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeCreateRequest {
    pub name: Option<String>,
    pub driver: Option<String>,
    pub labels: HashMap<String, String>,
    pub driver_opts: HashMap<String, String>,
}

impl VolumeCreateRequest {
    /// Build a request from a generic option set
    ///
    /// Recognized keys are `name`, `driver`, `labels` and `options`; anything
    /// else is ignored. Malformed label or option entries fail with
    /// [`DaemonError::Parse`].
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, DaemonError> {
        let non_empty = |key: &str| {
            options
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let labels = match options.get(LABELS_KEY) {
            Some(raw) => parse_key_value_list(LABELS_KEY, raw)?,
            None => HashMap::new(),
        };
        let driver_opts = match options.get(OPTIONS_KEY) {
            Some(raw) => parse_key_value_list(OPTIONS_KEY, raw)?,
            None => HashMap::new(),
        };

        Ok(Self {
            name: non_empty(NAME_KEY),
            driver: non_empty(DRIVER_KEY),
            labels,
            driver_opts,
        })
    }

    /// Name used when reporting on this request
    fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| "<generated>".to_string())
    }
}

/// Parse a comma separated list of `key=value` pairs
///
/// Entries, keys and values are trimmed of surrounding whitespace, so a
/// value cannot carry leading or trailing spaces. Empty segments are skipped
/// and later duplicates override earlier ones. The value may contain `=`;
/// only the first one splits.
pub fn parse_key_value_list(
    field: &str,
    raw: &str,
) -> Result<HashMap<String, String>, DaemonError> {
    let mut pairs = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry.split_once('=').ok_or_else(|| DaemonError::Parse {
            field: field.to_string(),
            entry: entry.to_string(),
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(DaemonError::Parse {
                field: field.to_string(),
                entry: entry.to_string(),
            });
        }
        pairs.insert(key.to_string(), value.trim().to_string());
    }

    Ok(pairs)
}

impl DaemonState {
    /// Create a volume from a generic option set and return its name
    ///
    /// The option set is fully parsed before any remote call is made. The
    /// cached volume list is not updated.
    pub async fn create_volume(
        &self,
        options: &HashMap<String, String>,
    ) -> Result<String, DaemonError> {
        let request = VolumeCreateRequest::from_options(options)?;
        self.create_volume_from_request(&request).await
    }

    /// Create a volume from an already built request and return its name
    pub async fn create_volume_from_request(
        &self,
        request: &VolumeCreateRequest,
    ) -> Result<String, DaemonError> {
        log::debug!("Creating volume '{}'", request.display_name());

        match self.client().create_volume(request).await {
            Ok(volume) => {
                log::info!(
                    "Created volume '{}' with driver '{}'",
                    volume.name,
                    volume.driver
                );
                Ok(volume.name)
            }
            Err(e) => {
                log::warn!("Failed to create volume '{}': {}", request.display_name(), e);
                Err(DaemonError::Create {
                    name: request.display_name(),
                    source: e,
                })
            }
        }
    }

    /// Remove the named volume from the daemon
    ///
    /// The cached volume list is not updated.
    pub async fn remove_volume(&self, name: &str) -> Result<(), DaemonError> {
        log::debug!("Removing volume '{}'", name);

        match self.client().remove_volume(name).await {
            Ok(()) => {
                log::info!("Removed volume '{}'", name);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to remove volume '{}': {}", name, e);
                Err(DaemonError::Remove {
                    name: name.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Look up a volume by name in the cached volume list
    ///
    /// Pure cache read; the result is only as fresh as the last volume refresh.
    pub fn find_volume_by_name(&self, name: &str) -> Result<&Volume, DaemonError> {
        self.volumes()
            .iter()
            .find(|volume| volume.name == name)
            .ok_or_else(|| DaemonError::NotFound(name.to_string()))
    }
}
