use std::sync::Arc;

use clap::Parser;
use hello_demo::{default_client_config, DirectoryArgs, HelloClient, TracingArgs};
use jgrpc::prelude::*;

#[derive(Debug, Parser)]
#[clap(version, author, about = "demo.Hello RPC client")]
struct Args {
    #[clap(flatten)]
    tracing: TracingArgs,

    #[clap(flatten)]
    directory: DirectoryArgs,

    /// Name to greet.
    #[clap(long, default_value = "world")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), CallFailed> {
    let args = Args::parse();
    args.tracing.init();

    let directory = args.directory.build().await?;
    let engine = Arc::new(ClientEngine::new(directory, Arc::new(RoundRobin::new()), default_client_config()));
    let client = HelloClient::new(engine);

    let greeting = client.greet(args.name).await?;
    println!("{greeting}");
    Ok(())
}
