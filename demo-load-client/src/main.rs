use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod load;
mod report;

use client::ApiClient;
use load::LoadPlan;

/// Drive concurrent logins against a running user token API
#[derive(Parser, Debug)]
#[command(name = "demo-load-client", version)]
struct Args {
    /// Base URL of the server
    #[arg(long, default_value = "http://localhost:8080")]
    base_url: String,

    /// Route prefix the auth endpoints are mounted under
    #[arg(long, default_value = "/api/auth")]
    prefix: String,

    /// Total number of login requests
    #[arg(short = 'n', long, default_value_t = 10_000)]
    requests: usize,

    /// Maximum requests in flight
    #[arg(short, long, default_value_t = 16)]
    concurrency: usize,

    /// Number of seeded users to cycle through
    #[arg(long, default_value_t = 10_000)]
    users: usize,

    /// Log in as this username on every request (server must enable the bypass)
    #[arg(long)]
    load_test_user: Option<String>,

    /// Do not call create-db before the run
    #[arg(long)]
    skip_create_db: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_load_client=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let client = ApiClient::new(&args.base_url, &args.prefix, args.concurrency)?;

    let health = client.health().await?;
    tracing::info!(base_url = %args.base_url, %health, "Server is up");

    if !args.skip_create_db {
        let created = client.create_db().await?;
        tracing::info!("{created}");
    }

    let plan = LoadPlan {
        requests: args.requests,
        concurrency: args.concurrency,
        users: args.users,
        load_test_user: args.load_test_user,
    };
    tracing::info!(
        requests = plan.requests,
        concurrency = plan.concurrency,
        bypass = plan.load_test_user.is_some(),
        "Starting load test"
    );

    let report = load::run(&client, &plan).await;
    println!("{report}");

    Ok(())
}
