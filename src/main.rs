use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use lineagemap::cli::{Cli, Commands};
use lineagemap::commands::{self, AnalyzeConfig, ResolveConfig, RunConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity().verbosity);

    match cli.command {
        Commands::Run {
            config,
            libraries,
            source,
            output,
            format,
            verbosity,
        } => commands::handle_run(RunConfig {
            config,
            libraries,
            source,
            output,
            format: format.map(Into::into),
            verbosity: verbosity.verbosity,
            quiet: verbosity.quiet,
        }),
        Commands::Resolve {
            package,
            config,
            source,
            verbosity: _,
        } => commands::handle_resolve(ResolveConfig {
            package,
            config,
            source,
        }),
        Commands::Analyze {
            path,
            library,
            version,
            config,
            format,
            output,
            verbosity: _,
        } => commands::handle_analyze(AnalyzeConfig {
            path,
            library,
            version,
            config,
            format: format.into(),
            output,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}

/// `RUST_LOG` wins over the `-v` count
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
