//! rconkit CLI Client
//!
//! Command-line interface for sending RCON commands to a game server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rconkit::{health, parser, RconConfig, RconConnection};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// rconkit CLI
#[derive(Parser, Debug)]
#[command(name = "rcon-cli")]
#[command(about = "Send commands to a game server over RCON")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "localhost")]
    host: String,

    /// RCON port
    #[arg(short, long, default_value = "25575")]
    port: u16,

    /// RCON password
    #[arg(short = 'P', long, env = "RCON_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Connection string (host=...;port=...;password=...), overrides the flags above
    #[arg(short, long, env = "RCON_CONNECTION_STRING", hide_env_values = true)]
    connection_string: Option<String>,

    /// Give up after this many seconds (0 = wait forever)
    #[arg(short, long, default_value = "30")]
    timeout_secs: u64,

    /// Print parsed results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an arbitrary command and print the raw reply
    Exec {
        /// Command words, joined with spaces
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },

    /// Ticks per second (1m, 5m, 15m)
    Tps,

    /// Milliseconds per tick (5s, 10s, 60s)
    Mspt,

    /// Online players
    List,

    /// Loaded worlds
    Worlds,

    /// Connect, log in and run `list` once
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rconkit=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!("rconkit CLI v{} -> {}", rconkit::VERSION, config.addr());

    let work = run(&args, config);
    let outcome = tokio::select! {
        result = with_timeout(args.timeout_secs, work) => result,
        _ = tokio::signal::ctrl_c() => Err("interrupted".to_string()),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> rconkit::Result<RconConfig> {
    match &args.connection_string {
        Some(cs) => RconConfig::from_connection_string(cs),
        None => RconConfig::builder()
            .host(&args.host)
            .port(args.port)
            .password(&args.password)
            .build(),
    }
}

async fn with_timeout<F>(secs: u64, work: F) -> Result<ExitCode, String>
where
    F: std::future::Future<Output = Result<ExitCode, String>>,
{
    if secs == 0 {
        return work.await;
    }
    tokio::time::timeout(Duration::from_secs(secs), work)
        .await
        .unwrap_or_else(|_| Err(format!("timed out after {}s", secs)))
}

async fn run(args: &Args, config: RconConfig) -> Result<ExitCode, String> {
    if let Commands::Health = args.command {
        let status = health::probe(&config).await;
        if args.json {
            emit_json(&serde_json::json!({
                "healthy": status.is_healthy(),
                "detail": status.to_string(),
            }))?;
        } else {
            println!("{}", status);
        }
        return Ok(if status.is_healthy() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let connection = RconConnection::new(config);
    let result = execute(args, &connection).await;
    connection.dispose().await;

    result.map(|_| ExitCode::SUCCESS)
}

async fn execute(args: &Args, connection: &RconConnection) -> Result<(), String> {
    let send = |command: &'static str| async move {
        connection.send_command(command).await.map_err(|e| e.to_string())
    };

    match &args.command {
        Commands::Exec { command } => {
            let reply = connection
                .send_command(&command.join(" "))
                .await
                .map_err(|e| e.to_string())?;
            if args.json {
                emit_json(&serde_json::json!({ "response": reply }))
            } else {
                println!("{}", parser::strip_formatting_codes(&reply));
                Ok(())
            }
        }
        Commands::Tps => {
            let tps = parser::parse_tick_rate(&send("tps").await?);
            print_parsed(args.json, &tps, || {
                format!(
                    "TPS (1m, 5m, 15m): {:.2}, {:.2}, {:.2}",
                    tps.one_minute, tps.five_minute, tps.fifteen_minute
                )
            })
        }
        Commands::Mspt => {
            let mspt = parser::parse_tick_duration(&send("mspt").await?);
            print_parsed(args.json, &mspt, || {
                format!(
                    "MSPT (5s, 10s, 60s): {:.2}, {:.2}, {:.2}",
                    mspt.five_second, mspt.ten_second, mspt.sixty_second
                )
            })
        }
        Commands::List => {
            let players = parser::parse_player_list(&send("list").await?);
            print_parsed(args.json, &players, || {
                format!(
                    "{}/{} online: {}",
                    players.online,
                    players.max,
                    players.players.join(", ")
                )
            })
        }
        Commands::Worlds => {
            let worlds = parser::parse_world_list(&send("worlds").await?);
            print_parsed(args.json, &worlds, || worlds.worlds.join("\n"))
        }
        // Probed without a managed connection in `run`
        Commands::Health => Ok(()),
    }
}

fn print_parsed<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<(), String> {
    if json {
        emit_json(value)
    } else {
        println!("{}", text());
        Ok(())
    }
}

fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}
