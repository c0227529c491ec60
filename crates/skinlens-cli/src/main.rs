//! SkinLens CLI
//!
//! Command-line client for the SkinLens skin-analysis service and shop

mod commands;
mod config;

use clap::{Args, Parser, Subcommand};
use config::SkinLensConfig;
use skinlens_client::{AdminAuth, ApiClient};
use skinlens_core::{Navigator, Redirect, Session};
use skinlens_observability::{ClientMetrics, init_logging};
use skinlens_session::FileSessionStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "skinlens")]
#[command(about = "SkinLens - skin analysis and skincare shop client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SKINLENS_CONFIG",
        global = true
    )]
    config: Option<String>,

    /// Backend API base URL (overrides config and environment)
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Print client metrics (Prometheus text format) after the command
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SKINLENS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Sign out and forget the stored tokens
    Logout,
    /// Admin session
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Analyze a photo of a skin area
    Analyze {
        /// JPEG, PNG, WebP, GIF or BMP image
        image: PathBuf,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage user accounts (admin)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Book and list dermatologist consultations
    Consultations {
        #[command(subcommand)]
        command: ConsultationCommands,
    },
    /// Show whether a view can be opened with the current session
    Guard {
        /// Application path, e.g. /results
        path: String,
    },
    /// Show the stored session state
    Session,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "SKINLENS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Repeat the password
    #[arg(long)]
    confirm_password: String,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    age: Option<u32>,

    #[arg(long)]
    sex: Option<String>,

    #[arg(long)]
    country: Option<String>,

    /// Skin type (repeatable), e.g. --skin-type oily --skin-type sensitive
    #[arg(long = "skin-type")]
    skin_type: Vec<String>,

    /// Skin concern (repeatable)
    #[arg(long = "skin-concern")]
    skin_concerns: Vec<String>,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Sign in as administrator
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SKINLENS_ADMIN_LOGIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Leave the admin session
    Logout,
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    brand: String,

    #[arg(long)]
    category: String,

    #[arg(long)]
    description: String,

    #[arg(long)]
    price: f64,

    #[arg(long, default_value = "0")]
    stock: i64,

    #[arg(long, default_value = "")]
    suitable_for: String,

    #[arg(long, default_value = "")]
    targets: String,

    #[arg(long, default_value = "")]
    when_to_apply: String,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List all products
    List,
    /// Show one product
    Get { id: i64 },
    /// Add a product
    Create(ProductArgs),
    /// Replace a product's details
    Update {
        id: i64,

        #[command(flatten)]
        product: ProductArgs,
    },
    /// Upload a new product image
    UpdateImage { id: i64, image: PathBuf },
    /// Remove a product
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Re-enable an account
    Activate { id: i64 },
    /// Disable an account
    Deactivate { id: i64 },
    /// Delete an account
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ConsultationCommands {
    /// Request a consultation
    Create {
        /// Day of the consultation (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// What the dermatologist should know
        #[arg(long)]
        message: String,
    },
    /// List your consultations
    List,
    /// Show the days that can be booked
    Dates,
}

/// Navigator for a terminal: a redirect can only be reported
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, redirect: Redirect) {
        debug!("Redirect to {}", redirect.to);
        warn!("Session expired; run `skinlens login` to sign in again");
    }
}

/// Everything a command needs
pub struct App {
    pub config: SkinLensConfig,
    pub session: Session,
    pub api: Arc<ApiClient>,
    pub admin: AdminAuth,
    pub metrics: Arc<ClientMetrics>,
}

impl App {
    async fn build(config: SkinLensConfig) -> anyhow::Result<Self> {
        let store = FileSessionStore::open(config.session_path()).await?;
        let session = Session::new(Arc::new(store));
        let metrics = Arc::new(ClientMetrics::new()?);

        let api = ApiClient::new(config.api_client_config(), session.clone())?
            .with_navigator(Arc::new(TerminalNavigator))
            .with_metrics(metrics.clone());

        let admin = AdminAuth::new(config.admin_credentials(), session.clone());

        Ok(Self {
            config,
            session,
            api: Arc::new(api),
            admin,
            metrics,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => {
            // Expand tilde in path
            let path = shellexpand::tilde(path).to_string();
            SkinLensConfig::from_file(&path)?
        }
        None => SkinLensConfig::default(),
    };

    // Merge environment variables (they override config file)
    config.merge_env();

    // Apply CLI override (highest precedence)
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }

    init_logging(&config.logging.level, config.logging.json)?;
    debug!("Using backend API at {}", config.api.base_url);

    let app = App::build(config).await?;
    let result = commands::run(&app, cli.command).await;

    if cli.metrics {
        eprintln!("{}", app.metrics.encode_text()?);
    }

    result
}
