use clap::Parser;
use colored::*;
use github_explorer::actors::dashboard::DashboardArgs;
use github_explorer::actors::{DashboardHandle, DetailHandle, DetailView, LookupOutcome, SectionStatus};
use github_explorer::cli::{Cli, Command};
use github_explorer::config::ExplorerConfig;
use github_explorer::github::RepositoryApi;
use github_explorer::render;
use github_explorer::server::{self, AppState};
use github_explorer::store::RepositoryStore;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // The server logs request traces; one-shot commands stay quiet unless asked
    let default_filter = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ExplorerConfig::from_cli(&cli)?;
    let api: Arc<dyn RepositoryApi> = Arc::new(config.build_client()?);

    match cli.command {
        Command::Add { repository } => {
            let dashboard = spawn_dashboard(&config, api).await?;
            let outcome = dashboard.submit(repository).await?;
            let view = dashboard.view().await?;
            dashboard.stop();

            match outcome {
                LookupOutcome::Added { repository } => {
                    println!("{} {}\n", "✅ Added".green(), repository.full_name.bold());
                    print!("{}", render::dashboard(&view));
                }
                LookupOutcome::EmptyInput { message } | LookupOutcome::Failed { message, .. } => {
                    eprintln!("{}", message.red());
                    std::process::exit(1);
                }
                LookupOutcome::PersistFailed { error } => {
                    eprintln!("{} {}", "Failed to save the repository list:".red(), error);
                    std::process::exit(1);
                }
            }
        }

        Command::List => {
            let dashboard = spawn_dashboard(&config, api).await?;
            let view = dashboard.view().await?;
            dashboard.stop();
            print!("{}", render::dashboard(&view));
        }

        Command::Show { repository } => {
            let detail = DetailHandle::spawn(api).await?;
            let mut updates = detail.subscribe();
            let generation = detail.open(repository.clone()).await?;

            println!("{} {}\n", "Repository".dimmed(), repository.bold());

            let mut previous = DetailView {
                generation,
                repository_status: SectionStatus::Loading,
                issues_status: SectionStatus::Loading,
                ..DetailView::default()
            };
            loop {
                let view = updates.borrow_and_update().clone();
                if view.generation == generation {
                    print!("{}", render::detail_changes(&previous, &view));
                    if view.is_settled() {
                        break;
                    }
                    previous = view;
                }
                updates.changed().await?;
            }
            detail.stop();
        }

        Command::Serve { port, bind } => {
            let storage = config.build_storage()?;
            let store = RepositoryStore::open(storage.clone()).await?;
            let dashboard = DashboardHandle::spawn(DashboardArgs {
                store,
                api: api.clone(),
                messages: config.messages.clone(),
            })
            .await?;
            let detail = DetailHandle::spawn(api).await?;

            println!("{}", "GitHub Explorer".bold().green());
            println!("{}\n", "=".repeat(50).dimmed());
            println!("📡 Serving on http://{}:{}", bind, port);
            println!("\nPress Ctrl+C to stop the server\n");

            let state = AppState {
                dashboard: dashboard.clone(),
                detail: detail.clone(),
                storage,
                start_time: Instant::now(),
            };
            server::serve(state, &format!("{}:{}", bind, port))
                .await
                .map_err(|e| anyhow::anyhow!("server failed: {}", e))?;

            println!("\n🛑 Shutting down...");
            dashboard.stop();
            detail.stop();
            println!("✅ Server stopped");
        }
    }

    Ok(())
}

async fn spawn_dashboard(
    config: &ExplorerConfig,
    api: Arc<dyn RepositoryApi>,
) -> anyhow::Result<DashboardHandle> {
    let store = RepositoryStore::open(config.build_storage()?).await?;
    let dashboard = DashboardHandle::spawn(DashboardArgs {
        store,
        api,
        messages: config.messages.clone(),
    })
    .await?;
    Ok(dashboard)
}
