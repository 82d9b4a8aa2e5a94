use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::image::ListImagesOptions;
use bollard::models::{ContainerSummary, ImageSummary, Network, SystemInfo, Volume};
use bollard::network::ListNetworksOptions;
use bollard::query_parameters::RemoveVolumeOptions;
use bollard::volume::{CreateVolumeOptions, ListVolumesOptions};
use bollard::Docker;
use std::collections::HashMap;
use std::time::Duration;

use super::config::ClientConfig;
use super::errors::{ClientError, DaemonError};
use super::volume::VolumeCreateRequest;

/// Filter set passed to list calls; an empty map selects everything
pub type Filters = HashMap<String, Vec<String>>;

/// Operations the daemon snapshot needs from a container engine
///
/// Every method issues exactly one remote call. Implementations must not retry.
#[async_trait]
pub trait DaemonClient: Send + Sync {
    /// List containers, including stopped ones when `all` is set
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ClientError>;

    /// List images, including intermediate layers when `all` is set
    async fn list_images(&self, all: bool) -> Result<Vec<ImageSummary>, ClientError>;

    /// Fetch daemon-wide system information
    async fn info(&self) -> Result<SystemInfo, ClientError>;

    /// List networks matching `filters`
    async fn list_networks(&self, filters: Filters) -> Result<Vec<Network>, ClientError>;

    /// List volumes matching `filters`
    async fn list_volumes(&self, filters: Filters) -> Result<Vec<Volume>, ClientError>;

    /// Create a volume and return the daemon's record of it
    async fn create_volume(&self, request: &VolumeCreateRequest) -> Result<Volume, ClientError>;

    /// Remove the named volume
    async fn remove_volume(&self, name: &str) -> Result<(), ClientError>;
}

/// [`DaemonClient`] backed by a bollard connection to a real Docker daemon
#[derive(Debug, Clone)]
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connect to the daemon discovered from the environment
    ///
    /// Honours `DOCKER_HOST` and falls back to the platform's default socket.
    /// Fails with [`DaemonError::Connection`] instead of panicking.
    pub async fn connect(config: &ClientConfig) -> Result<Self, DaemonError> {
        let docker = Docker::connect_with_defaults()
            .map_err(|e| DaemonError::Connection(ClientError::Docker(e)))?;
        Self::connect_with(docker, config).await
    }

    /// Finish connecting an already built bollard handle
    ///
    /// Always makes one round trip to the daemon: version negotiation when
    /// enabled, a ping otherwise. An unreachable daemon is reported here as
    /// [`DaemonError::Connection`], never later as a refresh failure.
    pub async fn connect_with(docker: Docker, config: &ClientConfig) -> Result<Self, DaemonError> {
        let docker = docker.with_timeout(Duration::from_secs(config.timeout_secs));

        let docker = if config.negotiate_version {
            log::debug!("Negotiating Docker API version");
            docker
                .negotiate_version()
                .await
                .map_err(|e| DaemonError::Connection(ClientError::Docker(e)))?
        } else {
            log::debug!("Pinging Docker daemon");
            docker
                .ping()
                .await
                .map_err(|e| DaemonError::Connection(ClientError::Docker(e)))?;
            docker
        };

        log::info!("Connected to Docker daemon");
        Ok(Self { docker })
    }
}

#[async_trait]
impl DaemonClient for DockerClient {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ClientError> {
        let options = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };
        Ok(self.docker.list_containers(Some(options)).await?)
    }

    async fn list_images(&self, all: bool) -> Result<Vec<ImageSummary>, ClientError> {
        let options = ListImagesOptions::<String> {
            all,
            ..Default::default()
        };
        Ok(self.docker.list_images(Some(options)).await?)
    }

    async fn info(&self) -> Result<SystemInfo, ClientError> {
        Ok(self.docker.info().await?)
    }

    async fn list_networks(&self, filters: Filters) -> Result<Vec<Network>, ClientError> {
        let options = ListNetworksOptions::<String> { filters };
        Ok(self.docker.list_networks(Some(options)).await?)
    }

    async fn list_volumes(&self, filters: Filters) -> Result<Vec<Volume>, ClientError> {
        let options = ListVolumesOptions::<String> { filters };
        let response = self.docker.list_volumes(Some(options)).await?;

        for warning in response.warnings.unwrap_or_default() {
            log::warn!("Docker volume list warning: {}", warning);
        }
        Ok(response.volumes.unwrap_or_default())
    }

    async fn create_volume(&self, request: &VolumeCreateRequest) -> Result<Volume, ClientError> {
        // Empty name and driver let the daemon pick a generated name and its default driver
        let options = CreateVolumeOptions {
            name: request.name.clone().unwrap_or_default(),
            driver: request.driver.clone().unwrap_or_default(),
            driver_opts: request.driver_opts.clone(),
            labels: request.labels.clone(),
        };
        Ok(self.docker.create_volume(options).await?)
    }

    async fn remove_volume(&self, name: &str) -> Result<(), ClientError> {
        Ok(self
            .docker
            .remove_volume(name, None::<RemoveVolumeOptions>)
            .await?)
    }
}
