//! usb-device-list
//!
//! Lists the USB devices attached to this host as an expandable tree of
//! devices and interfaces, with the endpoints of a selected interface shown
//! alongside.

mod config;
mod listing;
mod tui;
mod usb;

use anyhow::{Context, Result};
use clap::Parser;
use common::setup_logging;
use model::Snapshot;
use tracing::info;
use usb::HostUsb;

#[derive(Parser, Debug)]
#[command(name = "usb-device-list")]
#[command(author, version, about = "Browse USB devices, interfaces and endpoints")]
#[command(long_about = "
Shows every USB device attached to this host, the interfaces each device
exposes and, for a selected interface, its endpoints.

EXAMPLES:
    # Interactive tree view
    usb-device-list

    # Print the device tree and exit
    usb-device-list --list

    # Print the device tree as JSON
    usb-device-list --list --json

CONFIGURATION:
    The viewer looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usb-device-list/viewer.toml
    3. /etc/usb-device-list/viewer.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Print the device list and exit
    #[arg(long)]
    list: bool,

    /// Print the device list as JSON and exit
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = config::ViewerConfig::default();
        let path = config::ViewerConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let config = if let Some(ref path) = args.config {
        config::load_config(path).context("Failed to load configuration")?
    } else {
        config::ViewerConfig::load_or_default()
    };

    // CLI log level wins over the config file
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.viewer.log_level);

    setup_logging(log_level).context("Failed to setup logging")?;

    info!("usb-device-list v{}", env!("CARGO_PKG_VERSION"));
    info!("Log level: {}", log_level);

    let host = HostUsb::new(config.usb.filters.clone(), config.usb.skip_root_hubs)
        .context("Failed to initialize USB subsystem")?;

    if args.list || args.json {
        return list_devices_mode(&host, args.json);
    }

    info!("Running in TUI mode (interactive)");
    tui::run(host, config.tui.tick_rate()).await
}

/// Print the device tree once and exit
fn list_devices_mode(host: &HostUsb, json: bool) -> Result<()> {
    info!("Listing USB devices...");

    let devices = host
        .try_list_devices()
        .context("Failed to enumerate USB devices")?;
    let snapshot = Snapshot::build(&devices);

    if json {
        println!("{}", listing::render_json(&snapshot)?);
    } else {
        print!("{}", listing::render_text(&snapshot)?);
    }

    Ok(())
}
