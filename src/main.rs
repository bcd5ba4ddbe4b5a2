use anyhow::Result;
use clap::{Parser, Subcommand};
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::Level;

use rebalance_calc::{
    api::frank,
    app::{PlanOutcome, Planner, import, report},
    config::Settings,
    db::SqliteStore,
    engine::Rebalancer,
};

#[derive(Parser)]
#[command(name = "rebalance-calc", version, about)]
struct Cli {
    /// Database file, overrides REBALANCE_DATABASE
    #[arg(long, global = true)]
    database: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database schema
    Init,
    /// Replace categories and holdings from CSV files
    Import {
        #[arg(long)]
        categories: String,
        #[arg(long)]
        assets: String,
    },
    /// Set a new contribution and plan it; zero or less clears the plan
    Contribute {
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        /// Local units per one foreign unit
        #[arg(long, conflicts_with = "fetch_rate")]
        rate: Option<Decimal>,
        /// Look the rate up instead of passing it
        #[arg(long)]
        fetch_rate: bool,
    },
    /// Plan the stored contribution again
    Estimate,
    /// Clear the stored plan
    Reset,
    /// Add the stored purchases to holdings and clear the plan
    Commit,
    /// Print holdings and the stored plan
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut settings = Settings::from_env()?;
    if let Some(database) = &cli.database {
        settings = settings.with_database(database);
    }

    let store = SqliteStore::open(settings.database()).await?;
    let planner = Planner::new(store, Rebalancer::new(settings.engine_config()));

    match cli.command {
        Command::Init => {
            println!("Database ready at {}", settings.database().display());
        }
        Command::Import { categories, assets } => {
            let categories = shellexpand::tilde(&categories).into_owned();
            let assets = shellexpand::tilde(&assets).into_owned();
            let summary = import::import_portfolio(planner.store(), &categories, &assets).await?;
            println!(
                "Imported {} categories and {} assets",
                summary.categories(),
                summary.assets()
            );
        }
        Command::Contribute {
            amount,
            rate,
            fetch_rate,
        } => {
            let rate = match (rate, fetch_rate) {
                (Some(rate), _) => Some(rate),
                (None, true) => Some(
                    frank::get_latest_rate(
                        settings.foreign_currency(),
                        settings.local_currency(),
                        &Client::new(),
                    )
                    .await?,
                ),
                (None, false) => None,
            };
            if let Some(rate) = rate {
                planner.store().set_exchange_rate(rate).await?;
            }
            planner.store().set_contribution_amount(Some(amount)).await?;

            print_outcome(&planner, planner.estimate().await?).await?;
        }
        Command::Estimate => {
            print_outcome(&planner, planner.estimate().await?).await?;
        }
        Command::Reset => {
            planner.reset().await?;
            println!("Plan cleared");
        }
        Command::Commit => {
            let updated = planner.commit().await?;
            println!("Updated {} holdings", updated);
        }
        Command::Show => {
            let store = planner.store();
            let categories = store.categories().await?;
            for category in &categories {
                println!(
                    "{:<24} target {:>6.2}%  value {:>14.2}  [{}, {}]",
                    category.name(),
                    *category.target_weight() * Decimal::ONE_HUNDRED,
                    category.current_value(),
                    category.currency_domain(),
                    category.unit_policy()
                );
            }
            print!(
                "{}",
                report::render_allocations(
                    &store.category_allocations().await?,
                    &store.purchase_instructions().await?,
                    &categories,
                )
            );
        }
    }

    Ok(())
}

async fn print_outcome(planner: &Planner<SqliteStore>, outcome: PlanOutcome) -> Result<()> {
    match outcome {
        PlanOutcome::Planned(plan) => {
            let categories = planner.store().categories().await?;
            print!("{}", report::render_plan(&plan, &categories));
        }
        PlanOutcome::Reset => println!("Contribution is not positive; plan cleared"),
    }
    Ok(())
}
