use daemon_state::{ClientConfig, DaemonState, DockerClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    log::info!("Starting daemon state snapshot...");

    let config = ClientConfig::from_env();
    let client = DockerClient::connect(&config).await?;
    let state = DaemonState::initialize(Box::new(client)).await?;

    let info = state.info();
    println!(
        "Docker {} on {} ({} CPUs)",
        info.server_version.as_deref().unwrap_or("unknown"),
        info.operating_system.as_deref().unwrap_or("unknown OS"),
        info.ncpu.unwrap_or_default()
    );
    println!("Containers: {}", state.containers().len());
    println!("Images:     {}", state.images().len());
    println!("Networks:   {}", state.networks().len());
    println!("Volumes:    {}", state.volumes().len());

    for volume in state.volumes() {
        println!("  {} ({})", volume.name, volume.driver);
    }

    Ok(())
}
