// src/main.rs

use painter::{
    config::Config,
    dispatch::{LogSink, Painter, PpmSink, RenderSink},
    lang::Parser,
};

use anyhow::{bail, Context};
use log::{error, info, warn};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

const USAGE: &str = "usage: painter [SCRIPT] [--out DIR]";

/// Command-line arguments.
#[derive(Debug, Default)]
struct Args {
    /// Command script; stdin when absent.
    script: Option<PathBuf>,
    /// Directory for PPM frames; frames are only logged when absent.
    out_dir: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => {
                let dir = iter.next().context("--out needs a directory")?;
                args.out_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ if args.script.is_none() && !arg.starts_with("--") => {
                args.script = Some(PathBuf::from(arg));
            }
            _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }
    Ok(args)
}

/// Main entry point for the `painter` binary.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting painter...");

    let args = parse_args()?;
    let config = Config::load().context("Failed to load configuration")?;
    let shutdown_policy = config.shutdown.policy;

    // --- Parse Commands ---
    let parser = Parser::new();
    let parsed = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            parser.parse(BufReader::new(file))
        }
        None => parser.parse(io::stdin().lock()),
    };
    let (operations, parse_error) = match parsed {
        Ok(ops) => (ops, None),
        Err(partial) => {
            warn!("Posting {} operations parsed before the error", partial.parsed.len());
            (partial.parsed, Some(partial.error))
        }
    };
    info!("Parsed {} operations", operations.len());

    // --- Run The Loop ---
    let sink: Box<dyn RenderSink> = match &args.out_dir {
        Some(dir) => Box::new(PpmSink::new(dir)?),
        None => Box::new(LogSink::default()),
    };
    let painter = Painter::spawn(config, sink).context("Failed to start painter loop")?;
    painter
        .post(operations)
        .context("Failed to post operations")?;
    let report = painter
        .stop_and_wait(shutdown_policy)
        .context("Painter loop did not shut down cleanly")?;

    println!(
        "rendered {} frame(s), applied {} operation(s)",
        report.frames_rendered, report.operations_applied
    );

    if let Some(e) = parse_error {
        error!("Command input rejected: {}", e);
        return Err(e).context("Failed to parse command input");
    }

    info!("painter exited successfully.");
    Ok(())
}
