use std::io;

use log::info;
use parameter_server::{ServerConfig, ServerErr, service::Service};
use tokio::signal;

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    env_logger::init();

    let cfg = ServerConfig::from_env().map_err(ServerErr::from)?;
    info!(
        max_epochs = cfg.max_epochs,
        regularization_step = cfg.regularization_step;
        "starting parameter server"
    );

    let service = Service::bind(&cfg).await?;

    tokio::select! {
        ret = service.run() => ret?,
        _ = signal::ctrl_c() => {
            info!("received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
