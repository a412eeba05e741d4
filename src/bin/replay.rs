// Standalone replay tool for analyzing snake bot debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all ticks
//   --turns <t1,t2>        Replay specific ticks (comma-separated)
//   --validate <t:m,...>   Check logged moves against expectations
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use slither_bot::config::Config;
use slither_bot::replay::ReplayEngine;
use slither_bot::types::Direction;

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    All,
    Turns(Vec<u32>),
    Validate(Vec<(u32, Vec<Direction>)>),
}

fn print_usage() {
    eprintln!("Snake Bot Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all ticks in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific ticks (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate expected moves (format: tick:move,...)");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay snake_debug.jsonl --all");
    eprintln!("  replay snake_debug.jsonl --turns 5,10,15");
    eprintln!("  replay snake_debug.jsonl --validate 5:up,10:right|down");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (tick, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'tick:move'", pair))?;

            let tick = tick
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", tick, e))?;

            // Several acceptable moves are separated by '|'
            let moves = moves
                .split('|')
                .map(str::parse::<Direction>)
                .collect::<Result<Vec<_>, _>>()?;

            Ok((tick, moves))
        })
        .collect()
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires an argument", flag))
}

fn parse_args(args: &[String]) -> Result<(Mode, Option<String>, bool), String> {
    let mut config_path = None;
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => {
                mode = Some(Mode::Turns(parse_turns(option_value(args, i, "--turns")?)?));
                i += 1;
            }
            "--validate" => {
                let value = option_value(args, i, "--validate")?;
                mode = Some(Mode::Validate(parse_expected_moves(value)?));
                i += 1;
            }
            "--config" => {
                config_path = Some(option_value(args, i, "--config")?.to_string());
                i += 1;
            }
            "--verbose" => verbose = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
        i += 1;
    }

    let mode = mode.ok_or("Must specify --all, --turns, or --validate")?;
    Ok((mode, config_path, verbose))
}

fn main() {
    // We default to 'info' level logging unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.iter().any(|a| a == "--help") { 0 } else { 1 });
    }

    let log_file = &args[1];
    let (mode, config_path, verbose) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let config = match &config_path {
        Some(path) => {
            let config = Config::from_file(path).unwrap_or_else(|e| {
                eprintln!("Warning: Could not load config from '{}': {}", path, e);
                eprintln!("Using default configuration");
                Config::default_hardcoded()
            });
            println!("Loaded configuration from: {}", path);
            config
        }
        None => Config::load_or_default(),
    };

    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} ticks...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(ticks) => {
            println!("Replaying {} specific tick(s)...\n", ticks.len());
            match engine.replay_turns(&entries, &ticks) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(expected_moves) => {
            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
