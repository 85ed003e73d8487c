use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use kakei_core::{FixedCostDraft, Recurrence, TransactionDraft};
use kakei_store::{RestStore, Service};

mod auth;
mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "kakei",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("KAKEI_BUILD_SHA"), ")"),
    about = "Household budget tracker CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spent vs. budgeted per category for one month, plus recent activity
    Dashboard {
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (default: current month)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Monthly budget amounts per category
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Spending categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// The transaction ledger
    Tx {
        #[command(subcommand)]
        command: TxCommand,
    },

    /// Recurring fixed costs
    Fixed {
        #[command(subcommand)]
        command: FixedCommand,
    },

    /// Holiday calendar annotations
    Holidays {
        #[command(subcommand)]
        command: HolidayCommand,
    },

    /// Owner identity for the hosted store
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Write a default ~/.kakei/config.toml
    ConfigInit,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set one (category, month) cell. Non-numeric amounts become 0.
    Set {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        category: String,
        #[arg(long)]
        amount: String,
    },

    /// Apply one amount to a category across all 12 months of a year
    FillYear {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        category: String,
        #[arg(long)]
        amount: String,
    },

    /// Print the category x month grid for a year
    Grid {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    Add { name: String },
    Rm { id: String },
    List,
    /// Persist an explicit full ordering of category ids
    Reorder { ids: Vec<String> },
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    Add {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Rm { id: String },
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum FixedCommand {
    Add {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        category: String,
        /// monthly or yearly
        #[arg(long)]
        recurrence: String,
        /// Day of month the charge executes, 1-31
        #[arg(long)]
        day: u32,
    },
    Edit {
        id: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        recurrence: String,
        #[arg(long)]
        day: u32,
    },
    Rm { id: String },
    List,
    /// Preview the ledger entries templates would produce on a date
    Due {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum HolidayCommand {
    /// Replace the holiday set: one entry per date, shared title
    Set {
        #[arg(long)]
        title: String,
        dates: Vec<NaiveDate>,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Store the owner id issued by the identity provider
    Login,
    /// Show the stored owner identity
    Show,
}

fn build_service() -> Result<Service<RestStore>> {
    let cfg = config::load_config()?;
    let auth = auth::load_auth()?;
    log::debug!("store endpoint: {}", cfg.store.base_url);
    let store = RestStore::new(&cfg.store.base_url, &cfg.store.api_key);
    let mut service = Service::new(store);
    if let Some(owner) = auth.owner_id {
        service.set_owner(owner);
    }
    Ok(service)
}

fn current_year_month() -> (i32, u32) {
    let today = Utc::now().date_naive();
    (today.year(), today.month())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Dashboard { year, month } => {
            let (default_year, default_month) = current_year_month();
            let mut svc = build_service()?;
            let data = svc
                .dashboard(year.unwrap_or(default_year), month.unwrap_or(default_month))
                .await?;

            println!("# {}-{:02}\n", data.year, data.month);
            println!(
                "{:<20} {:>10} {:>10} {:>10} {:>5}",
                "category", "budgeted", "spent", "remaining", "%"
            );
            for row in &data.summary {
                println!(
                    "{:<20} {:>10} {:>10} {:>10} {:>5}",
                    row.name, row.budgeted, row.spent, row.remaining, row.percentage
                );
            }

            if !data.recent.is_empty() {
                println!("\nRecent transactions:");
                for tx in &data.recent {
                    println!(
                        "  {}  {:>8}  {}",
                        tx.date,
                        tx.amount,
                        tx.description.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        Command::Budget { command } => match command {
            BudgetCommand::Set {
                year,
                month,
                category,
                amount,
            } => {
                let mut svc = build_service()?;
                svc.update_budget(year, month, &category, &amount).await?;
                println!("Budget set for {}-{:02}.", year, month);
            }
            BudgetCommand::FillYear {
                year,
                category,
                amount,
            } => {
                let mut svc = build_service()?;
                svc.fill_year_budget(year, &category, &amount).await?;
                println!("Budget applied to all 12 months of {year}.");
            }
            BudgetCommand::Grid { year } => {
                let (default_year, _) = current_year_month();
                let year = year.unwrap_or(default_year);
                let mut svc = build_service()?;
                let grid = svc.budget_grid(year).await?;

                print!("{:<20}", "category");
                for month in 1..=12 {
                    print!(" {:>8}", month);
                }
                println!();
                for row in &grid.rows {
                    print!("{:<20}", row.category_name);
                    for amount in row.months {
                        print!(" {:>8}", amount);
                    }
                    println!();
                }
            }
        },

        Command::Category { command } => match command {
            CategoryCommand::Add { name } => {
                let mut svc = build_service()?;
                svc.add_category(&name).await?;
                println!("Added category \"{name}\".");
            }
            CategoryCommand::Rm { id } => {
                let mut svc = build_service()?;
                svc.delete_category(&id).await?;
                println!("Deleted category {id}.");
            }
            CategoryCommand::List => {
                let mut svc = build_service()?;
                for cat in svc.list_categories().await? {
                    println!("{:>3}  {}  {}", cat.sort_order, cat.id, cat.name);
                }
            }
            CategoryCommand::Reorder { ids } => {
                let mut svc = build_service()?;
                svc.reorder_categories(&ids).await?;
                println!("Reordered {} categories.", ids.len());
            }
        },

        Command::Tx { command } => match command {
            TxCommand::Add {
                date,
                amount,
                category,
                description,
            } => {
                let mut svc = build_service()?;
                svc.add_transaction(TransactionDraft {
                    date: Some(date),
                    amount,
                    description,
                    category_id: category,
                })
                .await?;
                println!("Transaction saved.");
            }
            TxCommand::Edit {
                id,
                date,
                amount,
                category,
                description,
            } => {
                let mut svc = build_service()?;
                svc.update_transaction(
                    &id,
                    TransactionDraft {
                        date: Some(date),
                        amount,
                        description,
                        category_id: category,
                    },
                )
                .await?;
                println!("Transaction {id} updated.");
            }
            TxCommand::Rm { id } => {
                let mut svc = build_service()?;
                svc.delete_transaction(&id).await?;
                println!("Transaction {id} deleted.");
            }
            TxCommand::List { year, month } => {
                let (default_year, default_month) = current_year_month();
                let svc = build_service()?;
                let txs = svc
                    .list_transactions(year.unwrap_or(default_year), month.unwrap_or(default_month))
                    .await?;
                for tx in txs {
                    println!(
                        "{}  {}  {:>8}  {:<12}  {}",
                        tx.id,
                        tx.date,
                        tx.amount,
                        tx.category_id.as_deref().unwrap_or("-"),
                        tx.description.as_deref().unwrap_or("")
                    );
                }
            }
        },

        Command::Fixed { command } => match command {
            FixedCommand::Add {
                description,
                amount,
                category,
                recurrence,
                day,
            } => {
                let mut svc = build_service()?;
                svc.add_fixed_cost(FixedCostDraft {
                    description,
                    amount,
                    category_id: Some(category),
                    recurrence: Recurrence::parse(&recurrence),
                    execution_day: day,
                })
                .await?;
                println!("Fixed cost added.");
            }
            FixedCommand::Edit {
                id,
                description,
                amount,
                category,
                recurrence,
                day,
            } => {
                let mut svc = build_service()?;
                svc.update_fixed_cost(
                    &id,
                    FixedCostDraft {
                        description,
                        amount,
                        category_id: Some(category),
                        recurrence: Recurrence::parse(&recurrence),
                        execution_day: day,
                    },
                )
                .await?;
                println!("Fixed cost {id} updated.");
            }
            FixedCommand::Rm { id } => {
                let mut svc = build_service()?;
                svc.delete_fixed_cost(&id).await?;
                println!("Fixed cost {id} deleted.");
            }
            FixedCommand::List => {
                let svc = build_service()?;
                for cost in svc.list_fixed_costs().await? {
                    println!(
                        "{}  day {:>2}  {:<8}  {:>8}  {}",
                        cost.id,
                        cost.execution_day,
                        cost.recurrence.as_str(),
                        cost.amount,
                        cost.description
                    );
                }
            }
            FixedCommand::Due { date } => {
                let date = date.unwrap_or_else(|| Utc::now().date_naive());
                let svc = build_service()?;
                let due = svc.due_fixed_costs(date).await?;
                if due.is_empty() {
                    println!("No fixed costs due on {date}.");
                } else {
                    for tx in due {
                        println!(
                            "{}  {:>8}  {}",
                            tx.date,
                            tx.amount,
                            tx.description.as_deref().unwrap_or("-")
                        );
                    }
                }
            }
        },

        Command::Holidays { command } => match command {
            HolidayCommand::Set { title, dates } => {
                let mut svc = build_service()?;
                svc.register_holidays(&dates, &title).await?;
                println!("Registered {} holiday(s).", dates.len());
            }
            HolidayCommand::List => {
                let svc = build_service()?;
                for entry in svc.list_schedules().await? {
                    println!("{}  {:<8}  {}", entry.date, entry.kind.as_str(), entry.title);
                }
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::Login => auth::login()?,
            AuthCommand::Show => auth::show()?,
        },

        Command::ConfigInit => {
            config::init_config()?;
        }
    }

    Ok(())
}
