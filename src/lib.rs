pub mod daemon;

pub use daemon::{
    parse_key_value_list, Category, ClientConfig, ClientError, DaemonClient, DaemonError,
    DaemonState, DockerClient, Filters, VolumeCreateRequest,
};
