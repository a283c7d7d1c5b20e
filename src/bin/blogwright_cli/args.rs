//! Command-line surface for `blogwright-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use blogwright::config::ConfigOverrides;
use blogwright::domain::files::ImageFormat;
use blogwright_api_types::PostStatus;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "blogwright-cli", version, about = "Blog accounts, posts and images on an Appwrite backend", long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over config/default.toml and blogwright.toml
    #[arg(long, env = "BLOGWRIGHT_CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Account email used to sign in
    #[arg(long, env = "BLOGWRIGHT_EMAIL", global = true)]
    pub email: Option<String>,

    /// Path to file containing the account password (takes precedence over env)
    #[arg(long, env = "BLOGWRIGHT_PASSWORD_FILE", global = true)]
    pub password_file: Option<PathBuf>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, env = "BLOGWRIGHT_PASSWORD")]
    pub password_env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account registration and sessions
    Account(AccountArgs),
    /// Post management
    Posts(PostsArgs),
    /// Image storage
    Files(FilesArgs),
}

#[derive(Parser, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountCmd,
}

#[derive(Subcommand, Debug)]
pub enum AccountCmd {
    /// Register an account with the configured credentials and sign in
    Create {
        #[arg(long)]
        name: String,
    },
    /// Sign in and print the new session
    Login,
    /// Show the signed-in account
    Me,
    /// Sign in, then end every session of the account
    Logout,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts; only active ones unless a filter is given
    List {
        #[arg(long, conflicts_with = "all")]
        status: Option<PostStatusArg>,
        /// Drop the default status filter
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Get a post by slug
    Get { slug: String },
    /// Create a post owned by the signed-in account
    Create {
        #[arg(long)]
        title: String,
        /// Document id; derived from the title when omitted
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Id of an already uploaded image
        #[arg(long, conflicts_with = "image")]
        featured_image: Option<String>,
        /// Image to upload and use as the featured image
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long, default_value_t = PostStatusArg::Active)]
        status: PostStatusArg,
    },
    /// Overwrite the mutable fields of a post
    Update {
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        featured_image: Option<String>,
        #[arg(long, default_value_t = PostStatusArg::Active)]
        status: PostStatusArg,
    },
    /// Delete a post by slug
    Delete { slug: String },
}

#[derive(Parser, Debug)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub action: FilesCmd,
}

#[derive(Subcommand, Debug)]
pub enum FilesCmd {
    /// Upload a file readable only by the signed-in account
    Upload { path: PathBuf },
    /// Delete a stored file
    Delete { file_id: String },
    /// Print the preview URL of a stored image
    Preview {
        file_id: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: Option<u8>,
        #[arg(long)]
        output: Option<ImageFormatArg>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PostStatusArg {
    Active,
    Inactive,
}

impl fmt::Display for PostStatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostStatusArg::Active => "active",
            PostStatusArg::Inactive => "inactive",
        };
        f.write_str(s)
    }
}

impl From<PostStatusArg> for PostStatus {
    fn from(value: PostStatusArg) -> Self {
        match value {
            PostStatusArg::Active => PostStatus::Active,
            PostStatusArg::Inactive => PostStatus::Inactive,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    Jpg,
    Png,
    Webp,
    Gif,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(value: ImageFormatArg) -> Self {
        match value {
            ImageFormatArg::Jpg => ImageFormat::Jpg,
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Webp => ImageFormat::Webp,
            ImageFormatArg::Gif => ImageFormat::Gif,
        }
    }
}
