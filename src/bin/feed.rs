//! scpstats Feed Tool
//!
//! Stands in for the game server: listens for the backend, then sends it
//! commands read from a file or stdin, one per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::net::TcpListener;
use std::path::PathBuf;

use clap::Parser;
use scpstats::dispatcher::parse_command;
use scpstats::protocol::{decode_line, write_frame};
use tracing_subscriber::{fmt, EnvFilter};

/// scpstats feed
#[derive(Parser, Debug)]
#[command(name = "scpstats-feed")]
#[command(about = "Replay protocol commands to a connecting scpstats backend")]
struct Args {
    /// Address to listen on for the backend
    #[arg(short, long, default_value = "127.0.0.1:7777")]
    listen: String,

    /// Command file, one frame per line (stdin if omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Forward lines verbatim instead of validating and re-encoding them
    #[arg(long)]
    raw: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> scpstats::Result<()> {
    let input: Box<dyn BufRead> = match &args.file {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let listener = TcpListener::bind(&args.listen)?;
    tracing::info!("Waiting for backend on {}", args.listen);

    let (stream, peer) = listener.accept()?;
    tracing::info!("Backend connected from {}", peer);
    let mut writer = BufWriter::new(stream);

    let (mut sent, mut skipped) = (0u64, 0u64);
    for line in input.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let outgoing = if args.raw {
            line
        } else {
            match decode_line(&line).and_then(|frame| parse_command(&frame)) {
                Ok(command) => command.encode(),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", line, e);
                    skipped += 1;
                    continue;
                }
            }
        };

        write_frame(&mut writer, &outgoing)?;
        sent += 1;
    }

    tracing::info!("Sent {} frames, skipped {}", sent, skipped);
    Ok(())
}
