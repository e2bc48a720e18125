use std::io::BufRead;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Value, json};
use testiflow::api::types::{NewReview, Rating, Review, Space, SpaceRequest};
use testiflow::config::ConfigError;
use testiflow::state::SpaceDetail;
use testiflow::{ApiClient, ApiError, AuthController, AuthError, ClientConfig, FileSessionStore, Route, SessionStore};
use tracing_subscriber::EnvFilter;

const PASSWORD_ENV: &str = "TESTIFLOW_PASSWORD";


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `testiflow auth login` first")]
    NotSignedIn,
    #[error("no password given; set TESTIFLOW_PASSWORD or pass --password-stdin")]
    MissingPassword,
    #[error("failed to read password from stdin: {0}")]
    Stdin(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "testiflow", about = "Testimonial collection API client")]
struct Cli {
    /// Overrides `TESTIFLOW_API_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Auth(AuthCommand),
    Space(SpaceCommand),
    Review(ReviewCommand),
    /// Public review feed for a space.
    Embed {
        space_id: String,
        /// Only reviews marked liked ("Wall of Love").
        #[arg(long, default_value_t = false)]
        liked_only: bool,
    },
    /// Every space with review counts.
    Dashboard,
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Login {
        #[arg(long)]
        email: String,
        #[command(flatten)]
        password: PasswordArgs,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[command(flatten)]
        password: PasswordArgs,
    },
    Logout,
    Whoami,
}

/// Password comes from `TESTIFLOW_PASSWORD` or the first line of stdin, never argv.
#[derive(Args, Debug)]
struct PasswordArgs {
    #[arg(long, default_value_t = false)]
    password_stdin: bool,
}

#[derive(Args, Debug)]
struct SpaceCommand {
    #[command(subcommand)]
    command: SpaceSubcommand,
}

#[derive(Subcommand, Debug)]
enum SpaceSubcommand {
    List,
    Get {
        space_id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        redirect_url: String,
    },
    Update {
        space_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        redirect_url: String,
    },
    Delete {
        space_id: String,
    },
    /// Space, reviews and stats in one view.
    Show {
        space_id: String,
    },
}

#[derive(Args, Debug)]
struct ReviewCommand {
    #[command(subcommand)]
    command: ReviewSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReviewSubcommand {
    List {
        space_id: String,
    },
    /// Submit a testimonial to a space's public page.
    Submit {
        slug: String,
        #[arg(long)]
        author_name: String,
        #[arg(long)]
        author_email: Option<String>,
        #[arg(long, value_parser = parse_rating)]
        rating: Rating,
        #[arg(long)]
        text: String,
    },
    Like {
        review_id: String,
    },
    Delete {
        review_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    let storage_dir = config.resolve_storage_dir()?;
    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(storage_dir));
    let api = ApiClient::new(&config, session)?;
    tracing::debug!(base_url = api.base_url(), "client ready");

    match cli.command {
        Command::Auth(auth) => run_auth(api, auth).await,
        Command::Space(space) => run_space(&api, space).await,
        Command::Review(review) => run_review(&api, review).await,
        Command::Embed { space_id, liked_only } => run_embed(&api, &space_id, liked_only).await,
        Command::Dashboard => run_dashboard(&api).await,
    }
}

fn log_navigation(route: Route) {
    tracing::info!(path = route.path(), "navigate");
}

async fn run_auth(api: ApiClient, auth: AuthCommand) -> Result<(), CliError> {
    let mut controller = AuthController::new(api, log_navigation);
    match auth.command {
        AuthSubcommand::Login { email, password } => {
            let password = read_password(&password)?;
            let user = controller.login(&email, &password).await?;
            print_json(&user)
        }
        AuthSubcommand::Signup { name, email, password } => {
            let password = read_password(&password)?;
            controller.signup(&name, &email, &password).await?;
            eprintln!("account created; sign in with `testiflow auth login`");
            Ok(())
        }
        AuthSubcommand::Logout => {
            controller.logout();
            Ok(())
        }
        AuthSubcommand::Whoami => {
            controller.initialize().await;
            let user = controller.user().ok_or(CliError::NotSignedIn)?;
            print_json(user)
        }
    }
}

async fn run_space(api: &ApiClient, space: SpaceCommand) -> Result<(), CliError> {
    match space.command {
        SpaceSubcommand::List => print_json(&api.spaces().list().await?),
        SpaceSubcommand::Get { space_id } => print_json(&api.spaces().get(&space_id).await?),
        SpaceSubcommand::Create { name, redirect_url } => {
            let created = api.spaces().create(&SpaceRequest::new(name, redirect_url)).await?;
            print_json(&created)
        }
        SpaceSubcommand::Update {
            space_id,
            name,
            redirect_url,
        } => {
            let updated = api.spaces().update(&space_id, &SpaceRequest::new(name, redirect_url)).await?;
            print_json(&updated)
        }
        SpaceSubcommand::Delete { space_id } => {
            api.spaces().delete(&space_id).await?;
            Ok(())
        }
        SpaceSubcommand::Show { space_id } => {
            let detail = SpaceDetail::load(api, &space_id).await?;
            print_json(&detail_view(&detail))
        }
    }
}

async fn run_review(api: &ApiClient, review: ReviewCommand) -> Result<(), CliError> {
    match review.command {
        ReviewSubcommand::List { space_id } => print_json(&api.reviews().list(&space_id).await?),
        ReviewSubcommand::Submit {
            slug,
            author_name,
            author_email,
            rating,
            text,
        } => {
            let body = NewReview {
                author_name,
                author_email,
                rating,
                text,
            };
            api.reviews().create(&slug, &body).await?;
            eprintln!("review submitted");
            Ok(())
        }
        ReviewSubcommand::Like { review_id } => print_json(&api.reviews().toggle_like(&review_id).await?),
        ReviewSubcommand::Delete { review_id } => {
            api.reviews().delete(&review_id).await?;
            Ok(())
        }
    }
}

async fn run_embed(api: &ApiClient, space_id: &str, liked_only: bool) -> Result<(), CliError> {
    let reviews = if liked_only {
        api.embed().wall_of_love(space_id).await?
    } else {
        api.embed().list(space_id).await?
    };
    print_json(&reviews)
}

async fn run_dashboard(api: &ApiClient) -> Result<(), CliError> {
    let spaces = api.spaces().list().await?;
    let ids: Vec<&str> = spaces.iter().map(|s| s.id.as_str()).collect();
    let results = api.reviews().list_many(&ids).await;
    let rows: Vec<Value> = spaces
        .iter()
        .zip(results.iter())
        .map(|(space, (_, reviews))| dashboard_row(space, reviews))
        .collect();
    print_json(&rows)
}

// =============================================================================
// RENDERING
// =============================================================================

fn detail_view(detail: &SpaceDetail) -> Value {
    let stats = detail.stats();
    json!({
        "space": detail.space,
        "submissionPath": detail.submission_path(),
        "stats": {
            "total": stats.total,
            "liked": stats.liked,
            "averageRating": stats.average_label(),
        },
        "reviews": detail.reviews,
    })
}

/// One dashboard line; a failed review fetch shows its error instead of counts.
fn dashboard_row(space: &Space, reviews: &Result<Vec<Review>, ApiError>) -> Value {
    match reviews {
        Ok(reviews) => {
            let stats = testiflow::state::ReviewStats::from_reviews(reviews);
            json!({
                "id": space.id,
                "name": space.name,
                "slug": space.slug,
                "reviews": stats.total,
                "liked": stats.liked,
                "averageRating": stats.average_label(),
            })
        }
        Err(e) => json!({
            "id": space.id,
            "name": space.name,
            "slug": space.slug,
            "error": e.message,
        }),
    }
}

fn read_password(args: &PasswordArgs) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    resolve_password(args.password_stdin, std::env::var(PASSWORD_ENV).ok(), &mut stdin.lock())
}

/// Stdin wins when requested; otherwise the environment. Empty is missing.
fn resolve_password(from_stdin: bool, from_env: Option<String>, input: &mut impl BufRead) -> Result<String, CliError> {
    let password = if from_stdin {
        let mut line = String::new();
        input.read_line(&mut line)?;
        Some(line.trim_end_matches(['\r', '\n']).to_owned())
    } else {
        from_env
    };
    password.filter(|p| !p.is_empty()).ok_or(CliError::MissingPassword)
}

fn parse_rating(raw: &str) -> Result<Rating, String> {
    let stars: u8 = raw.trim().parse().map_err(|_| format!("`{raw}` is not a number"))?;
    Rating::new(stars).map_err(|e| e.to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
