//! svcprobed - service status daemon

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use svcprobe_core::{secrets::generate_master_key, DescriptorStore, DisabledMarkers, FieldEncryptor, SecretResolver};
use svcprobe_gateway::{ConnectionRegistry, GatewayConfig, GatewayServer, HttpSettings, StatusService};
use tracing::info;

use cli::{Cli, Commands, EncryptOpts, ServeOpts};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before parsing so it feeds the env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(opts) => {
            let _guard = logging::init_tracing(cli.log_dir.as_deref())?;
            serve(opts).await
        }
        Commands::Encrypt(opts) => encrypt(opts),
        Commands::Keygen => {
            let key = generate_master_key()?;
            println!("{}", hex::encode(&key[..]));
            Ok(())
        }
    }
}

async fn serve(opts: ServeOpts) -> anyhow::Result<()> {
    info!("Starting svcprobed v{}", env!("CARGO_PKG_VERSION"));

    let secrets = Arc::new(SecretResolver::from_hex_key(opts.secret_key.as_deref())?);
    if !secrets.can_decrypt() {
        info!("No secret key configured, encrypted client secrets will be rejected");
    }

    let http = HttpSettings::from_millis(opts.connect_timeout_ms, opts.read_timeout_ms)
        .build_client()?;

    let store = Arc::new(DescriptorStore::new(&opts.services_file));
    info!("Services file: {}", opts.services_file.display());

    let markers = DisabledMarkers::new(opts.disabled_dir);
    let registry = Arc::new(ConnectionRegistry::new(secrets, http));
    let status_service = Arc::new(StatusService::new(store, markers, registry));

    let config = GatewayConfig {
        host: opts.host,
        port: opts.port,
    };

    GatewayServer::new(config, status_service)
        .run()
        .await
        .context("Status API server failed")
}

fn encrypt(opts: EncryptOpts) -> anyhow::Result<()> {
    let encryptor = FieldEncryptor::from_hex_key(&opts.secret_key)?;
    println!("{}", encryptor.encrypt(&opts.plaintext)?);
    Ok(())
}
