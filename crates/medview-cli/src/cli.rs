use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "medview")]
#[command(about = "Patient Profile Viewer — fetch patient profiles from an ORDS medical API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides MEDICAL_API_URL and API_URL)
    #[arg(short = 'u', long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides API_TIMEOUT)
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (development servers only)
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    /// Accept any non-empty patient ID, not just 1-20 letters and digits
    #[arg(long, global = true)]
    pub lenient_ids: bool,

    /// Show the literal "string" instead of treating it as missing
    #[arg(long, global = true)]
    pub keep_placeholder: bool,

    /// Never shorten long medical text
    #[arg(long, global = true)]
    pub no_truncate: bool,

    /// Hide fields that are present but empty instead of showing N/A
    #[arg(long, global = true)]
    pub omit_blank: bool,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log request details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Cards per category
    #[default]
    Table,
    /// Normalized profile as JSON
    Json,
    /// Response body exactly as received
    Raw,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and display one patient profile
    Fetch(FetchArgs),
    /// Interactive prompt: enter IDs to fetch, `clear` to clear, `quit` to leave
    Shell,
    /// Show the effective endpoint configuration
    Config,
    /// About this tool
    About,
}

#[derive(clap::Args)]
pub struct FetchArgs {
    /// Patient ID
    #[arg(default_value = "1")]
    pub patient_id: String,
}
