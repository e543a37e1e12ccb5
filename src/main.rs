//! Command-line entry point for one provisioning run.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::error;
use secrecy::SecretString;

use zerotouch::config::{InventorySettings, SshEndpoint, StagingSettings};
use zerotouch::console::{SessionConfig, SshConsoleFactory};
use zerotouch::error::{Error, VerificationError};
use zerotouch::inventory::NetboxInventory;
use zerotouch::orchestrator::{DevicePolicy, Orchestrator};
use zerotouch::retry::RetryPolicy;
use zerotouch::staging::SshStager;

/// Provision one network device through its console line.
#[derive(Debug, Parser)]
#[command(name = "zerotouch", version, about)]
struct Cli {
    /// Device name as recorded in the inventory.
    #[arg(long)]
    device_name: String,

    /// Console port number on the terminal server.
    #[arg(long)]
    console_port: u16,

    /// Base URL of the inventory API.
    #[arg(long, env = "INVENTORY_URL")]
    inventory_url: String,

    /// Inventory API token.
    #[arg(long, env = "INVENTORY_TOKEN", hide_env_values = true)]
    inventory_token: String,

    /// Skip TLS certificate verification for the inventory API.
    #[arg(long)]
    insecure: bool,

    /// Jump host address (files are staged here over SSH).
    #[arg(long, env = "JUMPHOST_ADDRESS")]
    jumphost_address: String,

    #[arg(long, env = "JUMPHOST_USERNAME")]
    jumphost_username: String,

    #[arg(long, env = "JUMPHOST_PASSWORD", hide_env_values = true)]
    jumphost_password: String,

    /// Terminal server address (console sessions are opened here).
    #[arg(long, env = "TERMINAL_SERVER_ADDRESS")]
    terminal_server_address: String,

    #[arg(long, env = "TERMINAL_SERVER_USERNAME")]
    terminal_server_username: String,

    #[arg(long, env = "TERMINAL_SERVER_PASSWORD", hide_env_values = true)]
    terminal_server_password: String,

    /// FTP server address as the device will reach it.
    #[arg(long, env = "FTP_SERVER")]
    ftp_server: String,

    #[arg(long, env = "FTP_USERNAME")]
    ftp_username: String,

    #[arg(long, env = "FTP_PASSWORD", hide_env_values = true)]
    ftp_password: String,

    /// Directory on the jump host exported over FTP.
    #[arg(long, env = "FTP_DIRECTORY", default_value = "/srv/ftp")]
    ftp_directory: String,

    /// Enable secret for privileged-mode entry, if the device needs one.
    #[arg(long, env = "ENABLE_SECRET", hide_env_values = true)]
    enable_secret: Option<String>,

    /// Connection attempts per endpoint.
    #[arg(long, default_value_t = 3)]
    connect_attempts: u32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .format_timestamp_secs()
    .init();

    let inventory = InventorySettings {
        url: cli.inventory_url.clone(),
        token: SecretString::from(cli.inventory_token.clone()),
        verify_tls: !cli.insecure,
    };
    let inventory = match NetboxInventory::new(&inventory) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build inventory client: {}", e);
            return ExitCode::from(1);
        }
    };

    let retry = RetryPolicy::new(cli.connect_attempts, Duration::from_secs(5));

    let jump_host = SshEndpoint::new(
        cli.jumphost_address.clone(),
        cli.jumphost_username.clone(),
        SecretString::from(cli.jumphost_password.clone()),
    );
    let terminal_server = SshEndpoint::new(
        cli.terminal_server_address.clone(),
        cli.terminal_server_username.clone(),
        SecretString::from(cli.terminal_server_password.clone()),
    );

    let staging = StagingSettings {
        server: cli.ftp_server.clone(),
        username: cli.ftp_username.clone(),
        password: SecretString::from(cli.ftp_password.clone()),
        directory: cli.ftp_directory.clone(),
    };

    let stager = SshStager::new(jump_host, &cli.ftp_directory, retry.clone());

    let session_config = SessionConfig {
        enable_secret: cli.enable_secret.clone().map(SecretString::from),
        ..SessionConfig::default()
    };
    let consoles = SshConsoleFactory::new(terminal_server, retry, session_config);

    let mut orch = Orchestrator::new(
        cli.device_name.clone(),
        cli.console_port,
        inventory,
        stager,
        consoles,
        staging,
        DevicePolicy::default(),
    );

    enum Outcome {
        Finished(zerotouch::Result<()>),
        Interrupted,
    }

    let outcome = tokio::select! {
        result = orch.run() => Outcome::Finished(result),
        _ = tokio::signal::ctrl_c() => Outcome::Interrupted,
    };

    let code = match &outcome {
        Outcome::Finished(Ok(())) => ExitCode::SUCCESS,
        Outcome::Finished(Err(Error::Verification(VerificationError::SerialMismatch {
            ..
        }))) => {
            // Distinct code so automation can tell "wrong device racked"
            // from transient infrastructure trouble.
            ExitCode::from(2)
        }
        Outcome::Finished(Err(_)) => ExitCode::from(1),
        Outcome::Interrupted => {
            error!("{}", Error::Interrupted);
            orch.shutdown().await;
            ExitCode::from(130)
        }
    };

    if let Outcome::Finished(Err(e)) = &outcome {
        error!("{}", e);
    }

    match serde_json::to_string_pretty(&orch.status()) {
        Ok(status) => println!("{}", status),
        Err(e) => error!("Failed to serialize final status: {}", e),
    }

    code
}
