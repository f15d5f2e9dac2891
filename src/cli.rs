use clap::{ArgAction, Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    Csv,
    Json,
    Txt,
    #[default]
    All,
}

impl ReportFormat {
    pub fn includes(&self, other: ReportFormat) -> bool {
        *self == ReportFormat::All || *self == other
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rustlite-audit",
    about = "Misconfiguration scanner: finds risky exposed services, probes banners and default credentials"
)]
pub struct Cli {
    /// IP, hostname or CIDR range to scan
    #[arg(short, long = "target", alias = "range", default_value = "192.168.1.0/24")]
    pub target: String,

    #[arg(short, long, default_value = "1-1000")]
    pub ports: String,

    /// Disable banner grabbing (credential checks still run)
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_banner: bool,

    /// Report format to save; HTML is always written
    #[arg(long, value_enum, default_value_t = ReportFormat::All)]
    pub format: ReportFormat,

    #[arg(long, value_name = "DIR", default_value = "output")]
    pub output_dir: String,

    /// Parallel enrichment workers
    #[arg(short = 'c', long, default_value_t = 32)]
    pub concurrency: usize,

    #[arg(long, default_value_t = 256)]
    pub discovery_concurrency: usize,

    #[arg(long, default_value_t = 800)]
    pub discovery_timeout_ms: u64,

    #[arg(long, default_value_t = 1000)]
    pub connect_timeout_ms: u64,

    #[arg(long, default_value_t = 1000)]
    pub read_timeout_ms: u64,

    #[arg(long, default_value_t = 2000)]
    pub credential_timeout_ms: u64,

    /// Path to a blocklist file (one CIDR or host per line) to skip targets
    #[arg(long, value_name = "FILE", default_value_t = String::new())]
    pub blocklist: String,

    /// Force override safety checks (use with care)
    #[arg(long, action = ArgAction::SetTrue)]
    pub force: bool,

    /// Print the full report bundle as JSON on stdout
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
