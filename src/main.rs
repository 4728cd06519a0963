use std::{process, sync::Arc};

use postdesk::{
    application::{
        admin::posts::AdminPostService,
        auth::{AdminGate, EmailAdminGate, SessionTokens},
        error::AppError,
        posts::PostService,
        render::{RenderService, render_service},
        repos::{PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HealthProbe, HttpState, RouterState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    match command {
        config::Command::Serve(_) => {
            telemetry::init(&settings.logging)?;
            run_serve(settings).await
        }
        config::Command::Session(args) => {
            let tokens = session_tokens(&settings)?;
            println!("{}", tokens.issue(args.email.trim()));
            Ok(())
        }
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let router_state = build_router_state(repositories, &settings)?;
    let router = http::build_router(router_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "postdesk::server",
        addr = %settings.server.addr,
        admin = %settings.auth.admin_email,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "postdesk::server", "shut down");
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_router_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<RouterState, AppError> {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let health: Arc<dyn HealthProbe> = repositories;
    let renderer: Arc<dyn RenderService> = render_service();
    let gate: Arc<dyn AdminGate> = Arc::new(EmailAdminGate::new(&settings.auth.admin_email));

    Ok(RouterState {
        http: HttpState {
            posts: Arc::new(PostService::new(posts_repo.clone(), renderer)),
            health,
        },
        admin: AdminState {
            posts: Arc::new(AdminPostService::new(posts_repo, posts_write_repo, gate)),
        },
        sessions: Arc::new(session_tokens(settings)?),
    })
}

fn session_tokens(settings: &config::Settings) -> Result<SessionTokens, AppError> {
    SessionTokens::new(&settings.auth.session_secret)
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(
            target = "postdesk::server",
            error = %err,
            "failed to listen for shutdown signal"
        );
    }
}
