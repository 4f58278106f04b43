//! Operator CLI for artworks and their QR codes.
//!
//! Results are printed to stdout as JSON; logs go to stderr and are
//! filtered with `RUST_LOG`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use artwork_db::{NewArtwork, Visibility};
use artqr_lib::{Services, SettingsManager};
use qr_service::Caller;

#[derive(Parser, Debug)]
#[command(name = "artqr", version, about = "Artwork QR issuance and scanning")]
struct Cli {
    /// Data directory holding the database and default image directory
    #[arg(long, env = "ARTQR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage artworks
    #[command(subcommand)]
    Artwork(ArtworkCommand),

    /// Issue, scan and revoke QR codes
    #[command(subcommand)]
    Qr(QrCommand),

    /// Read and change runtime settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
enum ArtworkCommand {
    /// Create an artwork
    Create(CreateArtwork),
    /// Show an artwork
    Show { id: i64 },
    /// Change who may resolve the artwork's QR code
    Visibility {
        id: i64,
        #[arg(value_parser = parse_visibility)]
        visibility: Visibility,
    },
    /// Delete an artwork and its QR codes
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct CreateArtwork {
    #[arg(long)]
    owner: i64,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    /// Only the owner can resolve the QR code
    #[arg(long)]
    private: bool,
    /// Media reference (repeatable)
    #[arg(long = "media")]
    media_refs: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum QrCommand {
    /// Issue a new QR code, disabling the current one
    Issue { artwork_id: i64 },
    /// Resolve a scanned token
    Scan {
        token: String,
        /// Resolve as this user (owners can resolve private artworks)
        #[arg(long = "as-user")]
        as_user: Option<i64>,
    },
    /// Disable the active QR code of an artwork
    Revoke { artwork_id: i64 },
    /// List every token issued for an artwork
    Show { artwork_id: i64 },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Get { key: String },
    Set { key: String, value: String },
    List,
}

fn parse_visibility(s: &str) -> Result<Visibility, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    artqr_lib::load_dotenv();
    let cli = Cli::parse();

    let dir = cli.data_dir.unwrap_or_else(artqr_lib::data_dir);
    let (db, config, _dir) = artqr_lib::init_foundation(dir)?;

    match cli.command {
        Command::Artwork(cmd) => match cmd {
            ArtworkCommand::Create(args) => {
                let artwork = db.create_artwork(&NewArtwork {
                    owner_id: args.owner,
                    title: args.title,
                    description: args.description,
                    visibility: if args.private {
                        Visibility::Private
                    } else {
                        Visibility::Public
                    },
                    media_refs: args.media_refs,
                })?;
                print_json(&artwork)
            }
            ArtworkCommand::Show { id } => {
                let artwork = db
                    .get_artwork(id)?
                    .with_context(|| format!("artwork {id} not found"))?;
                print_json(&artwork)
            }
            ArtworkCommand::Visibility { id, visibility } => {
                db.update_artwork_visibility(id, visibility)?;
                tracing::info!(artwork_id = id, %visibility, "Updated visibility");
                Ok(())
            }
            ArtworkCommand::Delete { id } => {
                if !db.delete_artwork(id)? {
                    anyhow::bail!("artwork {id} not found");
                }
                Ok(())
            }
        },
        Command::Qr(cmd) => {
            let services = Services::new(&db, &config)?;
            match cmd {
                QrCommand::Issue { artwork_id } => print_json(&services.issuance.issue(artwork_id)?),
                QrCommand::Scan { token, as_user } => {
                    let caller = Caller { user_id: as_user };
                    print_json(&services.scan.validate_and_resolve_str(&token, &caller)?)
                }
                QrCommand::Revoke { artwork_id } => {
                    let disabled = services.issuance.revoke(artwork_id)?;
                    print_json(&serde_json::json!({ "disabled": disabled }))
                }
                QrCommand::Show { artwork_id } => {
                    print_json(&db.list_qr_codes_for_artwork(artwork_id)?)
                }
            }
        }
        Command::Settings(cmd) => {
            let sm = SettingsManager::new(db.clone());
            match cmd {
                SettingsCommand::Get { key } => {
                    println!("{}", sm.get_setting(&key)?);
                    Ok(())
                }
                SettingsCommand::Set { key, value } => sm.set_setting(&key, &value),
                SettingsCommand::List => print_json(&sm.get_all_settings()?),
            }
        }
    }
}
