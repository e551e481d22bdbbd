//! Clap derive structures for the `cookiefy` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cookiefy -- admin console for the Cookiefy restaurant platform
#[derive(Debug, Parser)]
#[command(
    name = "cookiefy",
    version,
    about = "Administer Cookiefy restaurants, lists and users from the command line",
    long_about = "Admin console for the Cookiefy restaurant-discovery backend.\n\n\
        Log in once with `cookiefy login`; the session is kept per profile\n\
        until you log out or the backend rejects it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "COOKIEFY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "COOKIEFY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides the per-profile default)
    #[arg(long, env = "COOKIEFY_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "COOKIEFY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "COOKIEFY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "COOKIEFY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session for this profile
    Login(LoginArgs),

    /// End the session for this profile
    Logout,

    /// Show who is logged in
    Whoami,

    /// Search sites, lists and users
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Inspect and edit sites (restaurants as listed in search)
    Sites(SitesArgs),

    /// Manage users
    Users(ResourceArgs),

    /// Manage lists
    Lists(ResourceArgs),

    /// Manage hashtags
    #[command(alias = "tags")]
    Hashtags(ResourceArgs),

    /// Manage restaurants
    Restaurants(ResourceArgs),

    /// Query statistics
    Stats(StatsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Admin username (defaults to the profile's)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from stdin instead of the credential chain
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEARCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct SearchArgs {
    /// Text to search for
    pub input: String,

    /// Include sites (default: all kinds when none selected)
    #[arg(long)]
    pub sites: bool,

    /// Include lists
    #[arg(long)]
    pub lists: bool,

    /// Include users
    #[arg(long)]
    pub users: bool,

    /// Search as an administrator (includes inactive records)
    #[arg(long)]
    pub admin: bool,

    /// Latitude for distance ranking
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude for distance ranking
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Restrict to a city
    #[arg(long)]
    pub city: Option<String>,

    /// Restrict to a cuisine
    #[arg(long)]
    pub cuisine: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// Show a site
    Get {
        /// Site ID
        id: String,
    },

    /// Change a site's details
    Edit(SiteEditArgs),

    /// Replace a site's cover image
    UploadImage {
        /// Site ID
        id: String,

        /// Image file (jpg, png, webp, gif, heic)
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct SiteEditArgs {
    /// Site ID
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// Phone or other contact
    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub cuisine_type: Option<String>,

    #[arg(long, value_name = "BOOL")]
    pub vegan: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub gluten_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub halal: Option<bool>,

    /// Whether the site is shown to users
    #[arg(long, value_name = "BOOL")]
    pub active: Option<bool>,

    /// Upload this image before saving
    #[arg(long)]
    pub image: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS / LISTS / HASHTAGS / RESTAURANTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record ID
        id: String,
    },

    /// Create a record from JSON
    Create(BodyArgs),

    /// Update a record from JSON
    Update {
        /// Record ID
        id: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },
}

/// Paging and filter parameters passed through to list endpoints.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Results to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Extra query parameter (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

/// JSON request body, inline or from a file.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct BodyArgs {
    /// Inline JSON body
    #[arg(long)]
    pub data: Option<String>,

    /// Read the JSON body from a file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Platform-wide metrics
    Overview,

    /// Metrics for one restaurant
    Restaurant {
        /// Restaurant ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, username, password_env, ca_cert, insecure, timeout, session_file)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
