use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lineagemap")]
#[command(
    about = "Maintainability metrics across the major-version lineage of Python libraries",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    /// Increase verbosity level (-v: info, -vv: debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Suppress progress output and the summary table
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Where to list versions from (overrides config)
    #[arg(long, value_enum)]
    pub index: Option<IndexSource>,

    /// Directory holding <package>/<version>/ release trees (overrides config)
    #[arg(long)]
    pub mirror: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve, acquire and analyze every configured library
    Run {
        /// Configuration file (defaults to searching for .lineagemap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Library to analyze; repeat for several (overrides config)
        #[arg(short, long = "library")]
        libraries: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[command(flatten)]
        verbosity: Verbosity,
    },

    /// Show the major lineages of a package and their candidate order
    Resolve {
        /// Package name
        package: String,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        verbosity: Verbosity,
    },

    /// Analyze one release tree already on disk
    Analyze {
        /// Root of the release source tree
        path: PathBuf,

        /// Library name recorded in the output
        #[arg(long)]
        library: String,

        /// Version recorded in the output
        #[arg(long)]
        version: String,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        verbosity: Verbosity,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> Verbosity {
        match self {
            Commands::Run { verbosity, .. }
            | Commands::Resolve { verbosity, .. }
            | Commands::Analyze { verbosity, .. } => *verbosity,
            Commands::Init { .. } => Verbosity::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum IndexSource {
    Mirror,
    Pypi,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

impl From<IndexSource> for crate::config::IndexKind {
    fn from(s: IndexSource) -> Self {
        match s {
            IndexSource::Mirror => crate::config::IndexKind::Mirror,
            IndexSource::Pypi => crate::config::IndexKind::Pypi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Json),
            crate::io::output::OutputFormat::Json
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Markdown),
            crate::io::output::OutputFormat::Markdown
        );
        assert_eq!(
            crate::io::output::OutputFormat::from(OutputFormat::Terminal),
            crate::io::output::OutputFormat::Terminal
        );
    }

    #[test]
    fn test_cli_parsing_run_command() {
        let args = vec![
            "lineagemap",
            "run",
            "--library",
            "click",
            "-l",
            "requests",
            "--index",
            "pypi",
            "-o",
            "out.json",
            "-vv",
        ];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Run {
                libraries,
                source,
                output,
                format,
                verbosity,
                ..
            } => {
                assert_eq!(libraries, vec!["click", "requests"]);
                assert_eq!(source.index, Some(IndexSource::Pypi));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert_eq!(format, None);
                assert_eq!(verbosity.verbosity, 2);
                assert!(!verbosity.quiet);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parsing_analyze_command() {
        let args = vec![
            "lineagemap",
            "analyze",
            "/tmp/click-7.0",
            "--library",
            "click",
            "--version",
            "7.0",
            "--format",
            "json",
            "-q",
        ];

        let cli = Cli::parse_from(args);
        assert!(cli.command.verbosity().quiet);

        match cli.command {
            Commands::Analyze {
                path,
                library,
                version,
                format,
                ..
            } => {
                assert_eq!(path, PathBuf::from("/tmp/click-7.0"));
                assert_eq!(library, "click");
                assert_eq!(version, "7.0");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parsing_resolve_command() {
        let cli = Cli::parse_from(vec!["lineagemap", "resolve", "click", "--mirror", "/m"]);
        match cli.command {
            Commands::Resolve {
                package, source, ..
            } => {
                assert_eq!(package, "click");
                assert_eq!(source.mirror, Some(PathBuf::from("/m")));
                assert_eq!(source.index, None);
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_cli_parsing_init_command() {
        let cli = Cli::parse_from(vec!["lineagemap", "init", "--force"]);
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
