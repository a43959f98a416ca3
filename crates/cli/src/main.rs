mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use familyalbum_core::config::{self, AlbumConfig};
use familyalbum_core::domain::{GridDensity, PhotoSize, Theme};
use familyalbum_core::Album;
use tracing_subscriber::EnvFilter;

/// Family Album: photos, timeline and accounts kept on this device
#[derive(Parser)]
#[command(name = "album", version, about)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value_t = default_config_path())]
    config: String,

    /// Path to the album store (overrides the config file)
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new family account
    Register { username: String, password: String },
    /// Sign in (leave the username empty to sign in with the master key)
    Login { username: String, password: String },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// List registered accounts
    Users,
    /// Reset a password with the master key
    ForgotPassword {
        username: String,
        new_password: String,
        #[arg(long)]
        master_key: String,
    },
    /// Admin-only account management
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Browse and manage the gallery
    Photos {
        #[command(subcommand)]
        action: Option<PhotosAction>,
    },
    /// Browse and manage the family timeline
    Timeline {
        #[command(subcommand)]
        action: Option<TimelineAction>,
    },
    /// Show or edit the homepage banner
    Hero {
        #[command(subcommand)]
        action: Option<HeroAction>,
    },
    /// Show or change preferences
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Show album summary
    Status,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Reset any user's password
    ResetPassword {
        username: String,
        new_password: String,
        #[arg(long)]
        master_key: String,
    },
    /// Create an account for someone
    CreateUser {
        username: String,
        password: String,
        #[arg(long)]
        master_key: String,
    },
}

#[derive(Subcommand)]
enum PhotosAction {
    /// List photos, newest first
    Ls,
    /// Show one photo with its comments
    Show { id: i64 },
    /// Add a photo by URL
    Add {
        url: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = PhotoSize::Medium)]
        size: PhotoSize,
        /// Date shown under the photo (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Upload image files or directories
    Import {
        paths: Vec<PathBuf>,
        /// Caption applied to every uploaded photo
        #[arg(long)]
        caption: Option<String>,
        /// Override the tile size picked from the image shape
        #[arg(long)]
        size: Option<PhotoSize>,
    },
    /// Edit a photo's metadata
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        size: Option<PhotoSize>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Replace the photo with a local image file
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        /// Rewrite the caption (the first comment)
        #[arg(long)]
        caption: Option<String>,
    },
    /// Like a photo
    Like { id: i64 },
    /// Comment on a photo
    Comment { id: i64, text: String },
    /// Delete one or more photos
    Rm {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum TimelineAction {
    /// List events, most recent first
    Ls,
    /// Add an event
    Add {
        /// Event date (YYYY-MM-DD)
        date: String,
        title: String,
        #[arg(long, default_value = "")]
        desc: String,
        #[arg(long)]
        img: Option<String>,
    },
    /// Edit an event
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        img: Option<String>,
    },
    /// Delete an event
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum HeroAction {
    /// Show the banner
    Show,
    /// Change banner fields
    Set {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show preferences
    Show,
    /// Change preferences
    Set {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        density: Option<GridDensity>,
        #[arg(long)]
        expert: Option<bool>,
    },
}

fn default_config_path() -> String {
    config::default_dir()
        .join("album.toml")
        .to_string_lossy()
        .to_string()
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AlbumConfig::load(&PathBuf::from(&cli.config))?;
    init_logging(&config.logging.level);

    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path());
    tracing::debug!(store = %store_path.display(), "opening album");
    let mut album = Album::open(&store_path, config)?;

    match cli.command {
        Commands::Register { username, password } => {
            commands::account::register(&mut album, &username, &password)?
        }
        Commands::Login { username, password } => {
            commands::account::login(&mut album, &username, &password)?
        }
        Commands::Logout => commands::account::logout(&mut album),
        Commands::Whoami => commands::account::whoami(&album),
        Commands::Users => commands::account::users(&album),
        Commands::ForgotPassword {
            username,
            new_password,
            master_key,
        } => commands::account::forgot_password(&mut album, &username, &new_password, &master_key)?,
        Commands::Admin { action } => match action {
            AdminAction::ResetPassword {
                username,
                new_password,
                master_key,
            } => commands::account::admin_reset(&mut album, &username, &new_password, &master_key)?,
            AdminAction::CreateUser {
                username,
                password,
                master_key,
            } => commands::account::admin_create(&mut album, &username, &password, &master_key)?,
        },
        Commands::Photos { action } => {
            commands::ensure_signed_in(&album)?;
            match action {
                None | Some(PhotosAction::Ls) => commands::photos::list(&album),
                Some(PhotosAction::Show { id }) => commands::photos::show(&album, id)?,
                Some(PhotosAction::Add {
                    url,
                    title,
                    size,
                    date,
                }) => commands::photos::add(&mut album, url, title, size, date),
                Some(PhotosAction::Import {
                    paths,
                    caption,
                    size,
                }) => commands::photos::import(&mut album, &paths, caption, size)?,
                Some(PhotosAction::Edit {
                    id,
                    title,
                    size,
                    date,
                    url,
                    file,
                    caption,
                }) => commands::photos::edit(
                    &mut album,
                    id,
                    commands::photos::EditArgs {
                        title,
                        size,
                        date,
                        url,
                        file,
                        caption,
                    },
                )?,
                Some(PhotosAction::Like { id }) => commands::photos::like(&mut album, id)?,
                Some(PhotosAction::Comment { id, text }) => {
                    commands::photos::comment(&mut album, id, &text)?
                }
                Some(PhotosAction::Rm { ids }) => commands::photos::rm(&mut album, &ids),
            }
        }
        Commands::Timeline { action } => {
            commands::ensure_signed_in(&album)?;
            match action {
                None | Some(TimelineAction::Ls) => commands::content::timeline(&album),
                Some(TimelineAction::Add {
                    date,
                    title,
                    desc,
                    img,
                }) => commands::content::add_event(&mut album, date, title, desc, img),
                Some(TimelineAction::Edit {
                    id,
                    date,
                    title,
                    desc,
                    img,
                }) => commands::content::edit_event(&mut album, id, date, title, desc, img)?,
                Some(TimelineAction::Rm { id }) => commands::content::rm_event(&mut album, id)?,
            }
        }
        Commands::Hero { action } => {
            commands::ensure_signed_in(&album)?;
            match action {
                None | Some(HeroAction::Show) => commands::content::hero(&album),
                Some(HeroAction::Set {
                    title,
                    subtitle,
                    image,
                }) => commands::content::set_hero(&mut album, title, subtitle, image),
            }
        }
        Commands::Settings { action } => match action {
            None | Some(SettingsAction::Show) => commands::settings::show(&album),
            Some(SettingsAction::Set {
                theme,
                density,
                expert,
            }) => commands::settings::set(&mut album, theme, density, expert),
        },
        Commands::Status => commands::status::run(&album),
    }

    Ok(())
}
