use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Version string; dev builds carry the git hash.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{} (dev: {})", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "recordz", bin_name = "recordz", version = get_version())]
#[command(about = "Local record collections: tasks, food log, invoices, products, lessons", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Collection to operate on (defaults to config `default-collection`)
    #[arg(short, long, global = true)]
    pub collection: Option<String>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Search, filter and sort options shared by list, stats and export.
#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Case-insensitive text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact match, e.g. --filter status=Done (repeatable, combined with AND)
    #[arg(short, long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Sort order, e.g. --sort due_date or --sort priority:desc
    #[arg(long, value_name = "FIELD[:asc|desc]")]
    pub sort: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a record from field=value pairs
    #[command(alias = "add")]
    Create {
        /// Fields, e.g. title="Buy milk" priority=High
        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,
    },

    /// Change fields of a record
    #[command(alias = "set")]
    Update {
        /// Id of the record
        id: String,

        /// Fields to change, e.g. status=Done
        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,
    },

    /// Delete one or more records
    #[command(alias = "rm")]
    Delete {
        /// Ids of the records
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// List records
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show every field of one or more records
    #[command(alias = "v")]
    View {
        /// Ids of the records
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Counts per category, sums and goal progress
    Stats {
        #[command(flatten)]
        query: QueryArgs,

        /// Only sum records dated YYYY-MM-DD
        #[arg(long, conflicts_with = "today")]
        date: Option<String>,

        /// Only sum records dated today
        #[arg(long)]
        today: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export records to <collection>-<date>.csv
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// Target directory (defaults to config `export-dir`, then the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Append records from a CSV file
    Import {
        /// CSV file with a header row
        path: PathBuf,
    },

    /// Write <collection>-template.csv with the expected columns
    Template {
        /// Target directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Remove every record of the collection
    Reset {
        /// Restore the sample records instead of leaving it empty
        #[arg(long)]
        reseed: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (default-collection, export-dir, goal.<field>)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Show or change the color theme (light, dark or toggle)
    Theme { value: Option<String> },

    /// List the available collections
    Collections,
}
