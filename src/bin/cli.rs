//! craftgate CLI
//!
//! Command-line front end: runs exactly one administrative operation against
//! the game server and prints the result.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use craftgate::{Config, GateError, Gateway, ModStore, PropertyStore, RconAnswer, Result};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// craftgate CLI
#[derive(Parser, Debug)]
#[command(name = "craftgate")]
#[command(about = "Remote administration for a game server over RCON")]
#[command(version)]
struct Args {
    /// Remote console host
    #[arg(long, env = "RCON_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Remote console port
    #[arg(long, env = "RCON_PORT", default_value = "25575")]
    port: u16,

    /// Remote console password
    #[arg(long, env = "RCON_PASS", hide_env_values = true, default_value = "")]
    password: String,

    /// Server data directory (holds server.properties and mods/)
    #[arg(short, long, env = "BASE_PATH", default_value = "/srv/data")]
    base_dir: PathBuf,

    /// Connect/read/write timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a raw console command
    Exec {
        /// Command words, joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Show the difficulty, or change it when a level is given
    Difficulty {
        /// New difficulty level
        level: Option<String>,
    },

    /// Set a gamerule
    Gamerule {
        /// Rule name
        rule: String,

        /// New value
        value: String,
    },

    /// Stop the server
    Stop,

    /// Read or change server.properties
    Props {
        #[command(subcommand)]
        action: PropsAction,
    },

    /// Manage files in the mods directory
    Mods {
        #[command(subcommand)]
        action: ModsAction,
    },
}

#[derive(Subcommand, Debug)]
enum PropsAction {
    /// Print every property
    Get,

    /// Set one property and print the result
    Set {
        /// Property key
        key: String,

        /// Property value
        value: String,
    },
}

#[derive(Subcommand, Debug)]
enum ModsAction {
    /// List mod files
    List,

    /// Copy a local file into the mods directory
    Add {
        /// File to upload
        file: PathBuf,
    },

    /// Remove a mod file by name
    Remove {
        /// File name inside the mods directory
        name: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging (stderr, stdout carries results)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,craftgate=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .rcon_host(&args.host)
        .rcon_port(args.port)
        .rcon_password(&args.password)
        .timeout_ms(args.timeout_ms)
        .base_dir(&args.base_dir)
        .build();

    tracing::debug!("craftgate v{} with {:?}", craftgate::VERSION, config);

    match run(&config, args.command, args.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: Commands, json: bool) -> Result<()> {
    config.validate()?;

    match command {
        Commands::Exec { words } => {
            let gateway = Gateway::new(config);
            print_answer(gateway.execute(&words.join(" "))?, json)
        }
        Commands::Difficulty { level } => {
            let gateway = Gateway::new(config);
            let answer = match level {
                Some(level) => gateway.set_difficulty(&level)?,
                None => gateway.get_difficulty()?,
            };
            print_answer(answer, json)
        }
        Commands::Gamerule { rule, value } => {
            let gateway = Gateway::new(config);
            print_answer(gateway.set_gamerule(&rule, &value)?, json)
        }
        Commands::Stop => {
            let gateway = Gateway::new(config);
            print_answer(gateway.stop()?, json)
        }
        Commands::Props { action } => {
            let store = PropertyStore::new();
            let path = config.properties_path();
            let properties = match action {
                PropsAction::Get => store.load(&path)?,
                PropsAction::Set { key, value } => store.set_and_save(&path, &key, &value)?,
            };

            if json {
                print_json(&properties)
            } else {
                let mut lines: Vec<String> =
                    properties.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                lines.sort();
                for line in lines {
                    println!("{}", line);
                }
                Ok(())
            }
        }
        Commands::Mods { action } => {
            let mods = ModStore::from_config(config);
            let listing = match action {
                ModsAction::List => mods.list()?,
                ModsAction::Add { file } => {
                    let name = file
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or_default()
                        .to_string();
                    mods.save(&name, File::open(&file)?)?
                }
                ModsAction::Remove { name } => mods.delete(&name)?,
            };

            if json {
                print_json(&listing)
            } else {
                for name in listing {
                    println!("{}", name);
                }
                Ok(())
            }
        }
    }
}

fn print_answer(answer: String, json: bool) -> Result<()> {
    if json {
        print_json(&RconAnswer::from(answer))
    } else {
        println!("{}", answer);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| GateError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
