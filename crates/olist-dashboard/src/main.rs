//! `olist-dashboard` command line

use anyhow::Context;
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use olist_dashboard::format::{options_text, summary_text};
use olist_dashboard::telemetry::init_tracing;
use olist_dashboard::{Dashboard, DashboardConfig, FilterState};
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("olist-dashboard")
        .version(olist_dashboard::VERSION)
        .about("Olist e-commerce orders dashboard")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("uri")
                .long("uri")
                .global(true)
                .help("Store connection string (memory:// for the in-process store)"),
        )
        .arg(Arg::new("db").long("db").global(true).help("Database name"))
        .arg(
            Arg::new("collection")
                .long("collection")
                .global(true)
                .help("Collection holding the orders"),
        )
        .arg(
            Arg::new("seed-path")
                .long("seed-path")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Seed file imported into an empty collection"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Server-selection timeout in milliseconds"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("seed").about("Import the seed file if the collection is empty"))
        .subcommand(
            Command::new("options")
                .about("List selectable filter values")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("summary")
                .about("Show KPIs and breakdowns for a filter selection")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_parser(value_parser!(NaiveDate))
                        .help("First purchase date (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(value_parser!(NaiveDate))
                        .help("Last purchase date, inclusive (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Order statuses to include (default: all)"),
                )
                .arg(
                    Arg::new("payment")
                        .long("payment")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Payment types to include (default: all)"),
                )
                .arg(
                    Arg::new("top")
                        .long("top")
                        .value_parser(value_parser!(usize))
                        .help("Number of order statuses to list"),
                )
                .arg(json_flag()),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(uri) = matches.get_one::<String>("uri") {
        config = config.with_store_uri(uri);
    }
    if let Some(db) = matches.get_one::<String>("db") {
        config = config.with_database(db);
    }
    if let Some(collection) = matches.get_one::<String>("collection") {
        config = config.with_collection(collection);
    }
    if let Some(path) = matches.get_one::<PathBuf>("seed-path") {
        config = config.with_seed_path(path);
    }
    if let Some(ms) = matches.get_one::<u64>("timeout-ms") {
        config = config.with_server_selection_timeout_ms(*ms);
    }
    if matches.get_flag("log-json") {
        config = config.with_log_json(true);
    }
    Ok(config)
}

fn filter_state(args: &ArgMatches, config: &DashboardConfig) -> FilterState {
    let mut state = FilterState::default().with_top_statuses(
        args.get_one::<usize>("top").copied().unwrap_or(config.top_statuses),
    );
    if let Some(from) = args.get_one::<NaiveDate>("from") {
        state = state.with_from(*from);
    }
    if let Some(to) = args.get_one::<NaiveDate>("to") {
        state = state.with_to(*to);
    }
    if let Some(statuses) = args.get_many::<String>("status") {
        state = state.with_statuses(statuses.cloned());
    }
    if let Some(payments) = args.get_many::<String>("payment") {
        state = state.with_payment_types(payments.cloned());
    }
    state
}

async fn run(matches: ArgMatches) -> anyhow::Result<()> {
    let config = load_config(&matches)?;
    if init_tracing(config.log_json).is_err() {
        eprintln!("warning: tracing subscriber already installed");
    }

    let (dashboard, seeded) = Dashboard::open(config.clone()).await?;
    if !seeded.is_success() {
        eprintln!("warning: {}", seeded.message());
    }

    match matches.subcommand() {
        Some(("seed", _)) => {
            println!("{}", seeded.message());
        }
        Some(("options", args)) => {
            let options = dashboard.options().await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print!("{}", options_text(&options));
            }
        }
        Some(("summary", args)) => {
            let state = filter_state(args, &config);
            let outcome = dashboard.render(&state).await?;
            if args.get_flag("json") {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&outcome).context("serializing summary")?
                );
            } else {
                print!("{}", summary_text(&outcome));
            }
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    match run(matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
