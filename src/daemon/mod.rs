//! Point-in-time snapshot of a Docker daemon's state
//!
//! [`DaemonState`] holds the containers, images, system info, networks and
//! volumes last fetched from the daemon. Each category is refreshed on its
//! own and always replaced wholesale; nothing is merged or diffed. Volume
//! create/remove go straight to the daemon and are only visible in the
//! snapshot after the next [`DaemonState::refresh_volumes`].
//!
//! Cached collections are assigned only after the remote call has resolved,
//! so a failed or cancelled (dropped) refresh leaves the previous value in place.

pub mod client;
pub mod config;
pub mod errors;
pub mod volume;

pub use client::{DaemonClient, DockerClient, Filters};
pub use config::ClientConfig;
pub use errors::{Category, ClientError, DaemonError};
pub use volume::{parse_key_value_list, VolumeCreateRequest};

use bollard::models::{ContainerSummary, ImageSummary, Network, SystemInfo, Volume};

/// Cached view of the daemon's containers, images, info, networks and volumes
///
/// Categories may be stale relative to each other. Callers sharing one
/// instance across tasks must serialize access themselves.
pub struct DaemonState {
    client: Box<dyn DaemonClient>,
    containers: Vec<ContainerSummary>,
    images: Vec<ImageSummary>,
    info: SystemInfo,
    networks: Vec<Network>,
    volumes: Vec<Volume>,
}

impl std::fmt::Debug for DaemonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonState")
            .field("client", &"<daemon_client>")
            .field("containers", &self.containers.len())
            .field("images", &self.images.len())
            .field("networks", &self.networks.len())
            .field("volumes", &self.volumes.len())
            .finish()
    }
}

impl DaemonState {
    /// Create an empty snapshot bound to `client`; nothing is fetched
    pub fn new(client: Box<dyn DaemonClient>) -> Self {
        Self {
            client,
            containers: Vec::new(),
            images: Vec::new(),
            info: SystemInfo::default(),
            networks: Vec::new(),
            volumes: Vec::new(),
        }
    }

    /// Build a snapshot and populate every category
    ///
    /// Refreshes run in [`Category::ALL`] order and stop at the first failure.
    /// On failure the partially filled snapshot is dropped and only the error
    /// is returned.
    pub async fn initialize(client: Box<dyn DaemonClient>) -> Result<Self, DaemonError> {
        let mut state = Self::new(client);
        state.refresh_all().await?;
        Ok(state)
    }

    /// Refresh every category in the fixed order, stopping at the first failure
    ///
    /// Categories refreshed before the failure keep their new values; there is
    /// no rollback.
    pub async fn refresh_all(&mut self) -> Result<(), DaemonError> {
        for category in Category::ALL {
            self.refresh(category).await?;
        }
        Ok(())
    }

    /// Refresh a single category
    pub async fn refresh(&mut self, category: Category) -> Result<(), DaemonError> {
        match category {
            Category::Containers => self.refresh_containers().await,
            Category::Images => self.refresh_images().await,
            Category::Info => self.refresh_info().await,
            Category::Networks => self.refresh_networks().await,
            Category::Volumes => self.refresh_volumes().await,
        }
    }

    /// Replace the cached containers, stopped ones included
    pub async fn refresh_containers(&mut self) -> Result<(), DaemonError> {
        log::debug!("Refreshing container list");
        let containers = self
            .client
            .list_containers(true)
            .await
            .map_err(|e| refresh_failed(Category::Containers, e))?;

        log::info!("Refreshed {} containers", containers.len());
        self.containers = containers;
        Ok(())
    }

    /// Replace the cached images, intermediate images included
    pub async fn refresh_images(&mut self) -> Result<(), DaemonError> {
        log::debug!("Refreshing image list");
        let images = self
            .client
            .list_images(true)
            .await
            .map_err(|e| refresh_failed(Category::Images, e))?;

        log::info!("Refreshed {} images", images.len());
        self.images = images;
        Ok(())
    }

    /// Replace the cached system info
    pub async fn refresh_info(&mut self) -> Result<(), DaemonError> {
        log::debug!("Refreshing daemon info");
        let info = self
            .client
            .info()
            .await
            .map_err(|e| refresh_failed(Category::Info, e))?;

        log::info!(
            "Refreshed daemon info (server version {})",
            info.server_version.as_deref().unwrap_or("unknown")
        );
        self.info = info;
        Ok(())
    }

    /// Replace the cached networks
    pub async fn refresh_networks(&mut self) -> Result<(), DaemonError> {
        log::debug!("Refreshing network list");
        let networks = self
            .client
            .list_networks(Filters::new())
            .await
            .map_err(|e| refresh_failed(Category::Networks, e))?;

        log::info!("Refreshed {} networks", networks.len());
        self.networks = networks;
        Ok(())
    }

    /// Replace the cached volumes
    pub async fn refresh_volumes(&mut self) -> Result<(), DaemonError> {
        log::debug!("Refreshing volume list");
        let volumes = self
            .client
            .list_volumes(Filters::new())
            .await
            .map_err(|e| refresh_failed(Category::Volumes, e))?;

        log::info!("Refreshed {} volumes", volumes.len());
        self.volumes = volumes;
        Ok(())
    }

    pub fn containers(&self) -> &[ContainerSummary] {
        &self.containers
    }

    pub fn images(&self) -> &[ImageSummary] {
        &self.images
    }

    pub fn info(&self) -> &SystemInfo {
        &self.info
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Get the remote client this snapshot is bound to
    pub fn client(&self) -> &dyn DaemonClient {
        self.client.as_ref()
    }
}

fn refresh_failed(category: Category, source: ClientError) -> DaemonError {
    log::warn!("Failed to refresh {}: {}", category, source);
    DaemonError::Refresh { category, source }
}
