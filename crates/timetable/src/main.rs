//! timetable CLI entry point.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetable::cli::sessions::SessionsAction;
use timetable::cli::{Cli, Commands, OutputFormat};
use timetable::notify::{ChannelNotifier, Notifier, TracingNotifier};
use timetable::output::pretty::{self, Summary};
use timetable::output::json_line;
use timetable::{Config, MutationOutcome, Services, SharedCollection};
use timetable_core::mutation::Notice;
use timetable_core::remote::failure_message;
use timetable_core::schedule::{
    classify, Day, Entity, EntityKind, Module, Period, Professor, Section, SectionSession, Size,
    Space,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetable=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = base_url;
    }
    let services = Services::new(config);

    match cli.command {
        Commands::List { kind } => show(&services, kind, false, cli.format).await?,
        Commands::Refresh { kind } => show(&services, kind, true, cli.format).await?,
        Commands::ClearCache { kind } => {
            let cleared = services.clear_cache(kind).await;
            match cli.format {
                OutputFormat::Json => println!("{}", json_line(&cleared)),
                OutputFormat::Pretty if !cli.quiet => {
                    println!("Cleared {} cached collection(s)", cleared.len())
                }
                OutputFormat::Pretty => {}
            }
        }
        Commands::Classify { capacity } => {
            let group = classify(capacity);
            match cli.format {
                OutputFormat::Json => println!("{}", json_line(&group)),
                OutputFormat::Pretty => {
                    println!("{}", pretty::format_classification(capacity, group))
                }
            }
        }
        Commands::Sessions(sessions_cmd) => {
            let (channel, notices) = ChannelNotifier::new();
            let notifier: Arc<dyn Notifier> = if cli.quiet {
                Arc::new(TracingNotifier)
            } else {
                Arc::new(channel)
            };

            let coordinator = services.coordinator(notifier);
            let sessions = load::<SectionSession>(&services, false).await?;
            let state = SharedCollection::new(sessions);

            let outcome = match sessions_cmd.action {
                SessionsAction::Delete { ids } if ids.len() == 1 => {
                    coordinator.delete_session(&state, &ids[0]).await
                }
                SessionsAction::Delete { ids } => coordinator.delete_sessions(&state, &ids).await?,
                SessionsAction::Move { section_id, moves } => {
                    coordinator
                        .update_session_times(&state, &section_id, &moves, &[])
                        .await?
                }
            };

            print_notices(notices, cli.format);
            match outcome {
                MutationOutcome::Committed => {}
                MutationOutcome::RolledBack(err) => {
                    bail!("Mutation rolled back: {}", failure_message(&err))
                }
                MutationOutcome::Superseded(err) => bail!(
                    "Mutation failed after a newer change, refresh sessions: {}",
                    failure_message(&err)
                ),
            }
            if let OutputFormat::Json = cli.format {
                println!("{}", json_line(&state.items()));
            }
        }
    }

    Ok(())
}

/// Reads a collection, failing if the server could not be reached.
async fn load<T: Entity>(services: &Services, refresh: bool) -> Result<Vec<T>> {
    let repository = services.repository::<T>();
    let state = if refresh {
        repository.refetch().await
    } else {
        repository.fetch().await
    };

    match state.error {
        Some(err) => bail!("Failed to load {}: {}", T::KIND, failure_message(&err)),
        None => Ok(state.items),
    }
}

async fn show(
    services: &Services,
    kind: EntityKind,
    refresh: bool,
    format: OutputFormat,
) -> Result<()> {
    match kind {
        EntityKind::Days => print_collection::<Day>(services, refresh, format).await,
        EntityKind::Modules => print_collection::<Module>(services, refresh, format).await,
        EntityKind::Sections => print_collection::<Section>(services, refresh, format).await,
        EntityKind::Sessions => {
            print_collection::<SectionSession>(services, refresh, format).await
        }
        EntityKind::Spaces => print_collection::<Space>(services, refresh, format).await,
        EntityKind::Professors => print_collection::<Professor>(services, refresh, format).await,
        EntityKind::Periods => print_collection::<Period>(services, refresh, format).await,
        EntityKind::Sizes => print_collection::<Size>(services, refresh, format).await,
    }
}

async fn print_collection<T: Entity + Summary>(
    services: &Services,
    refresh: bool,
    format: OutputFormat,
) -> Result<()> {
    let items = load::<T>(services, refresh).await?;
    match format {
        OutputFormat::Json => println!("{}", json_line(&items)),
        OutputFormat::Pretty => println!("{}", pretty::format_collection(T::KIND, &items)),
    }
    Ok(())
}

fn print_notices(mut rx: UnboundedReceiver<Notice>, format: OutputFormat) {
    while let Ok(notice) = rx.try_recv() {
        match format {
            OutputFormat::Json => println!("{}", json_line(&notice)),
            OutputFormat::Pretty => eprintln!("{}", pretty::format_notice(&notice)),
        }
    }
}
