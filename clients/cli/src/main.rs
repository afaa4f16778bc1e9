//! GreetLink CLI
//!
//! Compose a greeting, upload its photos under signed grants, and print the
//! share link; or open a share link someone sent you and replay it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::{style, Emoji};
use dialoguer::Confirm;
use indicatif::ProgressBar;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod client;
mod composer;
mod config;

use greetlink_core::{decode, extract_token, youtube_video_id, GreetingPayload, SOFT_LINK_LIMIT};

use client::{MediaUploader, RelayClient};
use composer::{whatsapp_share_url, Composer, PhotoOutcome};
use config::CliConfig;

static ENVELOPE: Emoji<'_, '_> = Emoji("💌 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR] ");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "[LINK] ");
static CAMERA: Emoji<'_, '_> = Emoji("📷 ", "[PHOTO] ");
static MUSIC: Emoji<'_, '_> = Emoji("🎵 ", "[SONG] ");

/// GreetLink CLI - compose and open shareable greetings
#[derive(Parser)]
#[command(name = "greetlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a greeting and print its share link
    Create {
        /// Sender name
        #[arg(long, default_value = "")]
        from: String,

        /// Recipient name
        #[arg(long, default_value = "")]
        to: String,

        /// Date the greeting counts toward (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        date: String,

        /// Greeting template identifier
        #[arg(long, default_value = "")]
        template: String,

        /// Message text
        #[arg(short, long)]
        message: Option<String>,

        /// Read message text from file
        #[arg(long, value_name = "FILE", conflicts_with = "message")]
        message_file: Option<PathBuf>,

        /// Gift token to include (repeatable, order kept)
        #[arg(short, long = "gift")]
        gifts: Vec<String>,

        /// Song link (YouTube watch URL)
        #[arg(long, default_value = "")]
        youtube: String,

        /// Photo to upload and include (repeatable, order kept)
        #[arg(short, long = "photo")]
        photos: Vec<PathBuf>,

        /// Upload folder override
        #[arg(long)]
        folder: Option<String>,

        /// Skip link shortening
        #[arg(long)]
        no_shorten: bool,

        /// Answer yes to prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Open a share link and replay the greeting
    Open {
        /// Share link (or bare payload token)
        link: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Load config
    let config_path = cli.config.unwrap_or_else(|| {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("greetlink");
        path.push("config.toml");
        path
    });

    let config = CliConfig::load_or_default(&config_path)?;
    debug!(relay_url = %config.relay_url, "loaded configuration");

    match cli.command {
        Commands::Create {
            from,
            to,
            date,
            template,
            message,
            message_file,
            gifts,
            youtube,
            photos,
            folder,
            no_shorten,
            yes,
        } => {
            let text = match (message, message_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => String::new(),
            };
            create_greeting(
                &config,
                CreateArgs {
                    from,
                    to,
                    date,
                    template,
                    text,
                    gifts,
                    youtube,
                    photos,
                    folder,
                    no_shorten,
                    yes,
                },
            )
            .await?;
        }
        Commands::Open { link } => {
            open_greeting(&link);
        }
    }

    Ok(())
}

struct CreateArgs {
    from: String,
    to: String,
    date: String,
    template: String,
    text: String,
    gifts: Vec<String>,
    youtube: String,
    photos: Vec<PathBuf>,
    folder: Option<String>,
    no_shorten: bool,
    yes: bool,
}

async fn create_greeting(config: &CliConfig, args: CreateArgs) -> anyhow::Result<()> {
    println!("{} Composing greeting...", ENVELOPE);

    if !args.date.is_empty()
        && chrono::NaiveDate::parse_from_str(&args.date, "%Y-%m-%d").is_err()
    {
        println!(
            "{} {} is not a YYYY-MM-DD date; keeping it as-is",
            CROSS,
            style(&args.date).yellow()
        );
    }

    if !args.youtube.is_empty() && youtube_video_id(&args.youtube).is_none() {
        println!(
            "{} The song link does not look like a YouTube watch URL",
            CROSS
        );
    }

    let mut composer = Composer::new();
    composer.from = args.from;
    composer.to = args.to;
    composer.date = args.date;
    composer.template = args.template;
    composer.text = args.text;
    composer.youtube = args.youtube;
    for gift in &args.gifts {
        composer.toggle_gift(gift);
    }

    let relay = RelayClient::new(config.relay_url.clone())?;

    if !args.photos.is_empty() {
        let folder = args
            .folder
            .unwrap_or_else(|| config.upload_folder.clone());
        let uploader = MediaUploader::new(relay.clone(), folder, config.max_photo_bytes)?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("uploading {} photo(s)...", args.photos.len()));
        spinner.enable_steady_tick(std::time::Duration::from_millis(120));

        let outcomes = composer.attach_photos(&args.photos, &uploader).await;
        spinner.finish_and_clear();

        for outcome in &outcomes {
            match outcome {
                PhotoOutcome::Uploaded { path, url } => {
                    println!("{} {} -> {}", CAMERA, path.display(), style(url).dim());
                }
                PhotoOutcome::Skipped { path, reason } => {
                    println!(
                        "{} {} skipped: {}",
                        CROSS,
                        path.display(),
                        style(reason).yellow()
                    );
                }
            }
        }
    }

    // Length check happens before shortening so the user can back out of a
    // link that may not shorten reliably
    let full_url = greetlink_core::build_share_url(&config.share_base, &composer.payload())?;
    if full_url.len() > SOFT_LINK_LIMIT && !args.yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "The generated link is {} characters and may not shorten reliably. Continue?",
                full_url.len()
            ))
            .default(true)
            .interact()?;
        if !proceed {
            println!("{} Aborted", CROSS);
            return Ok(());
        }
    }

    let outcome = if args.no_shorten {
        composer::ShareOutcome {
            url: full_url.clone(),
            full_url,
            shortened: false,
            oversize: false,
            warning: None,
        }
    } else {
        composer.generate_link(&config.share_base, &relay).await?
    };

    if let Some(warning) = &outcome.warning {
        println!("{} {}", CROSS, style(warning).yellow());
    }

    println!();
    println!("{} {}", LINK, style(&outcome.url).bold());
    println!("   WhatsApp: {}", style(whatsapp_share_url(&outcome.url)).dim());
    if outcome.shortened {
        println!("   Full link: {}", style(&outcome.full_url).dim());
    }
    println!();
    println!("{} Greeting ready to share", CHECK);

    Ok(())
}

/// Replay a greeting from a share link.
///
/// A link that cannot be decoded is reported and the user is pointed back at
/// compose mode; it is never a hard failure.
fn open_greeting(link: &str) {
    let token = extract_token(link).unwrap_or(link);

    let payload = match decode(token) {
        Ok(payload) => payload,
        Err(e) => {
            println!("{} Could not read a greeting from this link: {}", CROSS, e);
            println!(
                "   Compose a new one with {}",
                style("greetlink create").bold()
            );
            return;
        }
    };

    render_greeting(&payload);
}

fn render_greeting(payload: &GreetingPayload) {
    println!();
    if payload.to.is_empty() {
        println!("{}", style("Hello").bold().magenta());
    } else {
        println!("{}", style(format!("Dear {}", payload.to)).bold().magenta());
    }

    if !payload.date.is_empty() {
        println!("{}", style(&payload.date).dim());
    }

    if !payload.text.is_empty() {
        println!();
        println!("{}", payload.text);
    }

    if !payload.gifts.is_empty() {
        println!();
        println!("Gifts: {}", payload.gifts.join(" "));
    }

    if !payload.youtube.is_empty() {
        println!();
        match youtube_video_id(&payload.youtube) {
            Some(id) => println!(
                "{} https://www.youtube.com/watch?v={}",
                MUSIC,
                style(id).bold()
            ),
            None => println!("{} {}", MUSIC, payload.youtube),
        }
    }

    if !payload.photos.is_empty() {
        println!();
        for photo in &payload.photos {
            println!("{} {}", CAMERA, photo);
        }
    }

    if !payload.from.is_empty() {
        println!();
        println!("{}", style(format!("from {}", payload.from)).italic());
    }
    println!();
}
