use dotenvy::dotenv;
use goal_planner::{
    api::HttpGoalBackend,
    cli::{exit_code, parse_args, run_command},
    config::{api::get_api_url, settings::load_default_config},
    errors::{Error, Result},
    store::GoalStore,
};
use std::{process::ExitCode, sync::Arc};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                Error::Usage { message } => eprintln!("{message}"),
                other => error!("{}", other),
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run() -> Result<()> {
    // 3. Parse the command before touching the network
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    // 4. Load settings and resolve the persistence service
    let settings = load_default_config()?;
    let base_url = get_api_url(&settings);
    info!("Using goal service at {base_url}");
    let backend = HttpGoalBackend::from_settings(&base_url, &settings.api)?;

    // 5. Build the store and log its change notifications
    let mut store = GoalStore::new(Arc::new(backend), settings.store.mutation_policy);
    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            debug!("Store event: {:?}", event);
        }
    });

    // 6. Initial load; a failure leaves the cache empty and is only logged
    if let Err(e) = store.fetch_goals().await {
        error!("Could not load goals: {}", e);
    }

    // 7. Run the command
    let output = run_command(&mut store, command, &settings.display, chrono::Utc::now()).await?;
    println!("{output}");

    Ok(())
}
