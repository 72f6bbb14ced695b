#![deny(clippy::all)]

#[macro_use]
extern crate log;

use simplelog::LevelFilter;
use simplelog::SimpleLogger;

use winsys::xdata::xconnection;
use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

use std::os::unix::io::AsFd;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

#[macro_use]
mod macros;

#[macro_use]
mod defaults;

mod binding;
mod config;
mod dispatch;
mod focus;
mod lifecycle;
mod model;
mod registry;
mod signal;
mod util;


use config::ConfigSource;
use model::Model;

/// A minimal X11 window manager.
#[derive(Parser, Debug)]
#[command(name = "hana", version)]
struct Args {
    /// Read the configuration from this file instead of
    /// $XDG_CONFIG_HOME/hana/config.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

pub fn main() {
    if let Err(err) = run() {
        eprintln!("{}: {:#}", WM_NAME!(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let source = match args.config {
        Some(path) => ConfigSource::new(Some(path)),
        None => ConfigSource::from_environment(),
    };

    let (conn, screen_num) = xconnection::connect()?;
    let xconn = XConnection::new(&conn, conn.stream().as_fd(), screen_num)?;

    signal::install()?;

    info!("{} {} has taken over the display", WM_NAME!(), env!("CARGO_PKG_VERSION"));

    Model::new(&xconn, source, &signal::RELOAD_REQUESTED).run();

    Ok(())
}

fn init_logging() -> Result<()> {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let level = std::env::var("HANA_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(default_level);

    SimpleLogger::init(level, simplelog::Config::default())?;
    Ok(())
}
