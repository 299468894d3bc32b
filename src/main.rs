use anyhow::Result;
use std::path::PathBuf;

use stocklist::config::Config;
use stocklist::{logging, server};

struct Args {
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    cache_dir: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config_path: None,
        host: None,
        port: None,
        cache_dir: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("stocklist {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--host" => {
                if i + 1 < args.len() {
                    parsed.host = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --host requires an address argument");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(port) => parsed.port = Some(port),
                        Err(_) => {
                            eprintln!("Error: invalid port: {}", args[i + 1]);
                            std::process::exit(1);
                        }
                    }
                    i += 1;
                } else {
                    eprintln!("Error: --port requires a number argument");
                    std::process::exit(1);
                }
            }
            "--cache-dir" => {
                if i + 1 < args.len() {
                    parsed.cache_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --cache-dir requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

fn print_help() {
    println!(
        r#"stocklist - A small photo-aware inventory HTTP service

USAGE:
    stocklist [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --host ADDR         Bind address (overrides config)
    --port, -p N        Bind port (overrides config)
    --cache-dir PATH    Directory for the inventory document and photos
    --help, -h          Show this help message
    --version, -V       Show version

ENVIRONMENT:
    STOCKLIST_CONFIG    Path to config file (overrides default location)
    STOCKLIST_LOG       Log level (trace, debug, info, warn, error)
"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    logging::init()?;

    let mut config = match args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(cache_dir) = args.cache_dir {
        config.storage.cache_dir = cache_dir;
    }

    tracing::info!(
        "Starting stocklist with store at {:?}",
        config.storage.cache_dir
    );

    server::serve(&config).await
}
