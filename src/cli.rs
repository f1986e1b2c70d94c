use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hayah", about = "Hayah onboarding client: registration, login and profile")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the registration wizard with answers from a TOML file
    Register {
        /// Answers file
        #[arg(short, long)]
        answers: PathBuf,

        /// Wizard flow (legacy or move); defaults to the config value
        #[arg(short, long)]
        flow: Option<String>,
    },
    /// Ask the backend whether an email is already registered
    CheckEmail {
        email: String,
    },
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session and cached data
    Logout,
    /// Reset a forgotten password (interactive)
    Recover {
        #[arg(short, long)]
        email: String,
    },
    /// View or edit the logged-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show level, missions and badges
    Dashboard {
        /// Ignore the local cache
        #[arg(short, long)]
        refresh: bool,
    },
    /// List the municipalities of a Brazilian state
    Cities {
        /// Two-letter state code (SP, RJ, ...)
        #[arg(short, long)]
        state: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    Show {
        #[arg(short, long)]
        refresh: bool,
    },
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },
    /// Upload a profile picture (jpg, jpeg, png or webp, up to 5 MB)
    UploadImage {
        path: PathBuf,
    },
    DeleteImage,
}
