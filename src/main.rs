//! CloudFlix CLI - Lightweight client for the CloudFlix short-video service
//!
//! A terminal client: browse the feed, upload clips, rate and comment,
//! and manage your own uploads.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudflix_cli::api::{self, UploadSpec, VideoPatch, VideoQuery};
use cloudflix_cli::auth;
use cloudflix_cli::config;
use cloudflix_cli::models::{UserRole, Visibility};

#[derive(Parser)]
#[command(name = "cloudflix")]
#[command(about = "Lightweight CLI client for CloudFlix", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with username (or email) and password
    Login {
        /// Username or email
        user: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Signup {
        /// Username (min 3 characters)
        username: String,

        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Account role: creator or consumer
        #[arg(short, long, default_value = "consumer")]
        role: UserRole,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show current session status
    Status,

    /// Show or change client configuration
    Config {
        /// Set the API base URL (e.g. https://api.cloudflix.example)
        #[arg(long)]
        api_base_url: Option<String>,
    },

    /// Show current user info (verify auth works)
    Whoami,

    /// List videos
    Videos {
        /// Page number
        #[arg(short, long)]
        page: Option<u32>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Search query
        #[arg(short, long)]
        q: Option<String>,

        /// Filter by genre
        #[arg(short, long)]
        genre: Option<String>,

        /// Filter by uploader id
        #[arg(short, long)]
        uploader: Option<u64>,

        /// Filter by visibility: public, unlisted, private
        #[arg(long)]
        visibility: Option<Visibility>,
    },

    /// Show one video's details
    Info {
        /// Video id
        id: u64,
    },

    /// Upload a video (creators only)
    Upload {
        /// Path to the video file
        file: std::path::PathBuf,

        /// Title
        #[arg(short, long)]
        title: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Genre
        #[arg(short, long)]
        genre: Option<String>,

        /// Producer
        #[arg(long)]
        producer: Option<String>,

        /// Age rating (e.g. PG-13)
        #[arg(long)]
        age_rating: Option<String>,

        /// Visibility: public, unlisted, private
        #[arg(long)]
        visibility: Option<Visibility>,
    },

    /// Edit a video's metadata
    Edit {
        /// Video id
        id: u64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        genre: Option<String>,

        #[arg(long)]
        producer: Option<String>,

        #[arg(long)]
        age_rating: Option<String>,

        #[arg(long)]
        visibility: Option<Visibility>,
    },

    /// Delete a video
    Delete {
        /// Video id
        id: u64,
    },

    /// List a video's comments
    Comments {
        /// Video id
        video_id: u64,
    },

    /// Comment on a video
    Comment {
        /// Video id
        video_id: u64,

        /// Comment text
        text: String,
    },

    /// Remove one of your comments
    Uncomment {
        /// Video id
        video_id: u64,

        /// Comment id
        comment_id: u64,
    },

    /// Rate a video 1-5
    Rate {
        /// Video id
        video_id: u64,

        /// Score from 1 to 5
        rating: u8,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Login { user, password } => {
            auth::login(&user, &password).await?;
        }
        Commands::Signup {
            username,
            password,
            email,
            role,
        } => {
            auth::signup(&username, email.as_deref(), &password, role).await?;
        }
        Commands::Logout => {
            auth::logout().await?;
        }
        Commands::Status => {
            auth::status().await?;
        }
        Commands::Config { api_base_url } => {
            config::configure(api_base_url)?;
        }
        Commands::Whoami => {
            api::whoami().await?;
        }
        Commands::Videos {
            page,
            limit,
            q,
            genre,
            uploader,
            visibility,
        } => {
            api::list_videos(VideoQuery {
                page,
                limit,
                q,
                genre,
                uploader_id: uploader,
                visibility,
            })
            .await?;
        }
        Commands::Info { id } => {
            api::show_video(id).await?;
        }
        Commands::Upload {
            file,
            title,
            description,
            genre,
            producer,
            age_rating,
            visibility,
        } => {
            api::upload(UploadSpec {
                file,
                title,
                description,
                genre,
                producer,
                age_rating,
                visibility,
            })
            .await?;
        }
        Commands::Edit {
            id,
            title,
            description,
            genre,
            producer,
            age_rating,
            visibility,
        } => {
            api::edit_video(
                id,
                VideoPatch {
                    title,
                    description,
                    genre,
                    producer,
                    age_rating,
                    visibility,
                },
            )
            .await?;
        }
        Commands::Delete { id } => {
            api::delete_video(id).await?;
        }
        Commands::Comments { video_id } => {
            api::list_comments(video_id).await?;
        }
        Commands::Comment { video_id, text } => {
            api::add_comment(video_id, &text).await?;
        }
        Commands::Uncomment {
            video_id,
            comment_id,
        } => {
            api::remove_comment(video_id, comment_id).await?;
        }
        Commands::Rate { video_id, rating } => {
            api::rate_video(video_id, rating).await?;
        }
    }

    Ok(())
}
