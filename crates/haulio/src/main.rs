// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! haulio - request moving-company quotes from the command line.
//!
//! This binary is the presentation layer: it wires configuration into the
//! backend clients, drives the session manager and inquiry synchronizer, and
//! renders their results. No quoting logic lives here.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use haulio_auth::AuthClient;
use haulio_config::HaulioConfig;
use haulio_core::error::HaulioError;
use haulio_core::session::SessionHandle;
use haulio_core::traits::{AuthBackend, CallDispatch, RowStore};
use haulio_dispatch::DispatchClient;
use haulio_session::{PasswordRecovery, SessionFile, SessionManager};
use haulio_store::StoreClient;
use haulio_sync::{InquiryPoller, InquirySynchronizer};

mod account;
mod search;
mod watch;

/// haulio - request moving-company quotes over robo-calls.
#[derive(Parser, Debug)]
#[command(name = "haulio", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in to an existing account.
    Login {
        /// Account email; prompted for when omitted.
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account.
    Register,
    /// Sign out and clear the persisted session.
    Logout,
    /// Show the current session and profile.
    Whoami {
        /// Emit structured JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },
    /// Reset a forgotten password by answering the security question.
    ResetPassword {
        /// Account email; prompted for when omitted.
        #[arg(long)]
        email: Option<String>,
    },
    /// Submit a new move search and list the candidate companies.
    Search(search::SearchArgs),
    /// List your past searches.
    Past,
    /// Watch the inquiries of a search until interrupted.
    Watch {
        /// The moving query id returned by `search`.
        moving_query_id: i64,
    },
    /// Place the outbound quote call for one inquiry.
    Call {
        /// The inquiry id shown by `search` or `watch`.
        inquiry_id: i64,
    },
    /// Show the call transcript and summary for one inquiry.
    Transcript {
        /// The inquiry id shown by `search` or `watch`.
        inquiry_id: i64,
    },
}

/// Everything the subcommands need, built once from config.
struct App {
    config: HaulioConfig,
    manager: SessionManager,
    recovery: PasswordRecovery,
    synchronizer: InquirySynchronizer,
    store: Arc<dyn RowStore>,
}

impl App {
    fn build(config: HaulioConfig) -> Result<Self, HaulioError> {
        let handle = Arc::new(SessionHandle::new());

        let auth: Arc<dyn AuthBackend> = Arc::new(AuthClient::new(&config.auth)?);
        let store: Arc<dyn RowStore> =
            Arc::new(StoreClient::new(&config.store, Arc::clone(&handle))?);
        let dispatch: Arc<dyn CallDispatch> = Arc::new(DispatchClient::new(&config.dispatch)?);

        let manager = SessionManager::new(
            Arc::clone(&auth),
            Arc::clone(&store),
            Arc::clone(&handle),
            SessionFile::from_config(&config.session)?,
            &config.limits,
            &config.session,
        );
        let recovery = PasswordRecovery::new(Arc::clone(&auth), Arc::clone(&store));
        let synchronizer =
            InquirySynchronizer::new(Arc::clone(&store), dispatch, Arc::clone(&handle));

        Ok(Self {
            config,
            manager,
            recovery,
            synchronizer,
            store,
        })
    }

    fn poller(&self) -> InquiryPoller {
        InquiryPoller::new(
            Arc::clone(&self.store),
            std::time::Duration::from_secs(self.config.polling.interval_secs),
        )
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("haulio={log_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match haulio_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            haulio_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.client.log_level);

    let app = match App::build(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("haulio: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&app, cli.command).await {
        eprintln!("haulio: {e}");
        std::process::exit(1);
    }
}

async fn run(app: &App, command: Commands) -> Result<(), HaulioError> {
    // Commands below assume the persisted session (if any) has been adopted;
    // the credential flows manage session state themselves.
    match command {
        Commands::Login { email } => account::run_login(&app.manager, email).await,
        Commands::Register => account::run_register(&app.manager).await,
        Commands::ResetPassword { email } => {
            account::run_reset_password(&app.recovery, email).await
        }
        Commands::Logout => {
            account::run_logout(&app.manager).await;
            Ok(())
        }
        Commands::Whoami { json } => account::run_whoami(&app.manager, json).await,
        Commands::Search(args) => {
            app.manager.restore_session().await;
            search::run_search(&app.synchronizer, args).await
        }
        Commands::Past => {
            app.manager.restore_session().await;
            search::run_past(&app.synchronizer).await
        }
        Commands::Watch { moving_query_id } => {
            app.manager.restore_session().await;
            watch::run_watch(&app.synchronizer, &app.poller(), moving_query_id).await
        }
        Commands::Call { inquiry_id } => {
            app.manager.restore_session().await;
            search::run_call(&app.synchronizer, inquiry_id).await
        }
        Commands::Transcript { inquiry_id } => {
            app.manager.restore_session().await;
            search::run_transcript(&app.synchronizer, inquiry_id).await
        }
    }
}
