mod config;
mod console;
mod git;
mod workflow;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::path::PathBuf;

use config::Config;
use console::{Console, TerminalConsole};
use git::{Decoder, SystemRunner};
use workflow::error::as_workflow_error;
use workflow::pull::PullOptions;
use workflow::push::PushOptions;
use workflow::Outcome;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_DESC: &str = env!("CARGO_PKG_DESCRIPTION");

fn print_help() {
    println!("{} v{}", PKG_NAME, VERSION);
    println!("{}", PKG_DESC);
    println!();
    println!("USAGE:");
    println!("    gitsync [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    pull      Fetch, show upstream changes and pull after confirmation");
    println!("    push      Check identity, commit local changes and push");
    println!("    status    Show classified working tree status");
    println!("    config    Print the effective configuration");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help               Print this help message");
    println!("    -v, --version            Print version information");
    println!("    --verbose                Enable verbose logging (GITSYNC_LOG=debug)");
    println!("    -C <DIR>                 Run as if started in <DIR>");
    println!("    --remote <NAME>          Pull from <NAME>/<branch> instead of the upstream (pull)");
    println!("    --rebase, --no-rebase    Rebase instead of merge (pull)");
    println!("    --include-untracked      Commit untracked files too (push)");
    println!("    --tracked-only           Only commit tracked files (push)");
    println!();
    println!("ENVIRONMENT:");
    println!("    GITSYNC_LOG      Set log level (error, warn, info, debug, trace)");
    println!("    GITSYNC_CONFIG   Config file path (default: ~/.config/gitsync/config.toml)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pull,
    Push,
    Status,
    Config,
}

#[derive(Debug, Default, PartialEq)]
struct Cli {
    command: Option<Command>,
    verbose: bool,
    directory: Option<PathBuf>,
    remote: Option<String>,
    rebase: Option<bool>,
    include_untracked: Option<bool>,
}

#[derive(Debug, PartialEq)]
enum Action {
    Help,
    Version,
    Run(Cli),
}

fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut cli = Cli::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Action::Help),
            "-v" | "--version" => return Ok(Action::Version),
            "--verbose" => cli.verbose = true,
            "--rebase" => cli.rebase = Some(true),
            "--no-rebase" => cli.rebase = Some(false),
            "--include-untracked" => cli.include_untracked = Some(true),
            "--tracked-only" => cli.include_untracked = Some(false),
            "-C" => {
                let dir = iter.next().ok_or("Option '-C' requires a directory")?;
                cli.directory = Some(PathBuf::from(dir));
            }
            "--remote" => {
                let name = iter.next().ok_or("Option '--remote' requires a name")?;
                cli.remote = Some(name.clone());
            }
            "pull" | "push" | "status" | "config" if cli.command.is_none() => {
                cli.command = Some(match arg.as_str() {
                    "pull" => Command::Pull,
                    "push" => Command::Push,
                    "status" => Command::Status,
                    _ => Command::Config,
                });
            }
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            other => return Err(format!("Unexpected argument: {}", other)),
        }
    }
    if cli.command.is_none() {
        return Err("Missing command (pull, push, status or config)".to_string());
    }
    Ok(Action::Run(cli))
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::new().filter("GITSYNC_LOG"));
    builder.format_timestamp(None).format_target(false);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(Action::Help) => {
            print_help();
            return;
        }
        Ok(Action::Version) => {
            println!("{} {}", PKG_NAME, VERSION);
            return;
        }
        Ok(Action::Run(cli)) => cli,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("Run 'gitsync --help' for usage.");
            std::process::exit(2);
        }
    };

    init_logging(cli.verbose);
    log::info!("Starting {} v{}", PKG_NAME, VERSION);

    let mut console = TerminalConsole::new();
    match run(cli, &mut console) {
        Ok(outcome) => log::debug!("Finished: {:?}", outcome),
        Err(err) => {
            match as_workflow_error(&err) {
                Some(workflow_err) => {
                    console.error(&workflow_err.to_string());
                    if let Some(hint) = workflow_err.hint() {
                        console.hint(&hint);
                    }
                }
                None => console.error(&format!("{:#}", err)),
            }
            std::process::exit(1);
        }
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => {
            log::debug!("Config loaded from {:?}", Config::path());
            config
        }
        Err(e) => {
            log::warn!("Using default config: {:#}", e);
            Config::default()
        }
    }
}

fn run(cli: Cli, console: &mut dyn Console) -> Result<Outcome> {
    let config = load_config();
    let Some(command) = cli.command else {
        anyhow::bail!("No command given");
    };

    if command == Command::Config {
        let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
        console.info(&format!("Config file: {}", Config::path().display()));
        console.block(&rendered);
        return Ok(Outcome::Completed);
    }

    let decoder = Decoder::from_labels(config.general.encodings.as_slice());
    log::debug!(
        "Output encodings: {:?}",
        decoder.candidates().iter().map(|e| e.name()).collect::<Vec<_>>()
    );
    let mut runner = SystemRunner::new(decoder);
    if let Some(dir) = cli.directory {
        runner = runner.in_dir(dir);
    }
    git::runner::check_git_version(&runner)?;

    match command {
        Command::Pull => {
            let options = PullOptions {
                remote: cli.remote.or(config.general.remote),
                rebase: cli.rebase.unwrap_or(config.pull.rebase),
            };
            workflow::pull::run(&runner, console, &options)
        }
        Command::Push => {
            let options = PushOptions {
                include_untracked: cli.include_untracked.unwrap_or(config.push.include_untracked),
            };
            workflow::push::run(&runner, console, &options)
        }
        Command::Status => workflow::status::run(&runner, console),
        Command::Config => unreachable!("handled above"),
    }
}
