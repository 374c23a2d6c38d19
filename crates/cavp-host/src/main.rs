use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;

use cavp_host::runner::{self, CancelFlag, RunPolicy};
use cavp_host::{HostConfig, SerialLineTransport};
use cavp_protocol::{HandshakeSession, ResultStore};

#[derive(Parser)]
#[command(name = "cavp-host", about = "Serial host driving CAVP test vectors against a target")]
struct Cli {
    /// Serial port connected to the target
    port: String,

    /// Vector file, one test vector per line
    vector_file: PathBuf,

    /// Record raw result blocks instead of verifying expected outputs
    #[arg(long)]
    capture: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match HostConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load config from {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => HostConfig::default(),
    };

    // Initialize logging
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        cavp_host::logging::init_json(&config.logging.level);
    } else {
        cavp_host::logging::init(&config.logging.level);
    }

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            tracing::info!("received SIGINT, finishing the current vector");
            cancel.cancel();
        }) {
            tracing::warn!("failed to install signal handler: {e}");
        }
    }

    let transport = match SerialLineTransport::open(&cli.port, config.serial.baud) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("failed to open serial port {}: {e}", cli.port);
            std::process::exit(1);
        }
    };
    let mut session = HandshakeSession::new(transport, config.protocol.session_config());

    let mut store = match ResultStore::open(result_path(&cli.vector_file)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("failed to open result file: {e}");
            std::process::exit(1);
        }
    };

    let reader = match File::open(&cli.vector_file) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            tracing::error!(
                "failed to open vector file {}: {e}",
                cli.vector_file.display()
            );
            std::process::exit(1);
        }
    };

    let policy = if cli.capture {
        RunPolicy::Capture
    } else {
        RunPolicy::Verify
    };
    let input_name = cli.vector_file.display().to_string();

    if let Err(e) = runner::run(&mut session, &mut store, reader, &input_name, policy, &cancel) {
        tracing::error!("run failed: {e}");
        std::process::exit(1);
    }
}

/// The result file always sits next to the vector file with a `.result`
/// suffix appended.
fn result_path(vector_file: &Path) -> PathBuf {
    let mut path = vector_file.as_os_str().to_os_string();
    path.push(".result");
    PathBuf::from(path)
}
