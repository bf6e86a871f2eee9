use std::sync::Arc;

use clap::Parser;
use hello_demo::{DirectoryArgs, HelloDispatch, HelloImpl, TracingArgs};
use jgrpc::prelude::*;

#[derive(Debug, Parser)]
#[clap(version, author, about = "demo.Hello RPC server")]
struct Args {
    #[clap(flatten)]
    tracing: TracingArgs,

    #[clap(flatten)]
    directory: DirectoryArgs,

    /// Address to bind the RPC listener on.
    #[clap(long, default_value = "0.0.0.0:7890", env = "HELLO_DEMO_BIND_ADDR")]
    bind_addr: String,
}

#[tokio::main]
async fn main() -> Result<(), CallFailed> {
    let args = Args::parse();
    args.tracing.init();

    let directory = args.directory.build().await?;
    let publisher = ServerPublisher::bind(
        directory,
        PublisherConfig { server: ServerConfig { bind_addr: args.bind_addr, ..ServerConfig::default() }, ..PublisherConfig::default() },
    )
    .await?;

    publisher.publish(Arc::new(HelloDispatch::new(Arc::new(HelloImpl)))).await?;
    tracing::info!(endpoint = %publisher.endpoint(), "demo.Hello published");

    tokio::signal::ctrl_c().await.map_err(|err| CallFailed::new(CallFailedKind::Connect, err.to_string()))?;
    tracing::info!("received ctrl-c, shutting down");
    publisher.shutdown().await;
    Ok(())
}
