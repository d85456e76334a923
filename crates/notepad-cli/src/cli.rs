use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notepad")]
#[command(about = "Create, list and delete notes with image attachments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for backend configuration and credentials
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all notes with resolved image URLs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a note, optionally uploading an image first
    #[command(alias = "new")]
    Create {
        /// Note name
        #[arg(long, default_value = "")]
        name: String,
        /// Note description
        #[arg(long, default_value = "")]
        description: String,
        /// Image file to upload and attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a note by ID
    Delete {
        /// Note ID
        id: String,
    },
    /// Upload an image and print its storage key
    Upload {
        /// Image file to upload
        path: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage stored backend credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// GraphQL endpoint of the notes API
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Storage bucket name
        #[arg(long, value_name = "NAME")]
        bucket: Option<String>,
        /// Storage bucket region
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
        /// Custom S3-compatible storage endpoint
        #[arg(long, value_name = "URL")]
        storage_endpoint: Option<String>,
        /// Object key prefix (defaults to `public/`)
        #[arg(long, value_name = "PREFIX")]
        key_prefix: Option<String>,
        /// Public URL base for serving images without signing
        #[arg(long, value_name = "URL")]
        public_base_url: Option<String>,
        /// Lifetime of presigned image URLs in seconds
        #[arg(long, value_name = "SECS")]
        url_ttl_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show profile config
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store backend credentials in the keychain
    Login {
        /// Notes API key
        #[arg(long, value_name = "KEY", conflicts_with = "token")]
        api_key: Option<String>,
        /// Notes API session token
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
        /// Storage access key id
        #[arg(long, value_name = "ID", requires = "storage_secret_access_key")]
        storage_access_key_id: Option<String>,
        /// Storage secret access key
        #[arg(long, value_name = "SECRET", requires = "storage_access_key_id")]
        storage_secret_access_key: Option<String>,
        /// Storage session token for temporary credentials
        #[arg(long, value_name = "TOKEN")]
        storage_session_token: Option<String>,
    },
    /// Show which credentials are stored for a profile
    Status,
    /// Sign out: clear stored credentials for a profile
    Logout,
}
