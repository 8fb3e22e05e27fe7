use std::env;

use bf_engine::commands::{info, run};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bf",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Describe the language and the engine
    #[arg(long = "about", action = clap::ArgAction::SetTrue)]
    about: bool,

    /// Print version
    #[arg(short = 'V', long = "version", action = clap::ArgAction::SetTrue)]
    version: bool,

    /// Log engine activity to stderr
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::SetTrue)]
    verbose: bool,

    #[command(flatten)]
    run: run::RunArgs,
}

const VERBOSE_DIRECTIVES: &str = "bf_engine=debug,bf=debug";

fn init_logging(verbose: bool) {
    let from_env = env::var("RUST_LOG").ok().filter(|s| !s.trim().is_empty());
    let fallback = if verbose { VERBOSE_DIRECTIVES } else { "warn" };
    let directives = match (verbose, from_env) {
        // Later directives for the same target win, so RUST_LOG can still go finer.
        (true, Some(rust_log)) => format!("{VERBOSE_DIRECTIVES},{rust_log}"),
        (false, Some(rust_log)) => rust_log,
        (_, None) => fallback.to_string(),
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    if env::args_os().len() <= 1 {
        info::usage_and_exit(&program, 0);
    }

    let cli = Cli::parse();

    if cli.help {
        info::usage_and_exit(&program, 0);
    }
    if cli.version {
        info::version_and_exit();
    }
    if cli.about {
        info::about_and_exit();
    }

    init_logging(cli.verbose);
    let code = run::run(&program, cli.run);
    std::process::exit(code);
}
