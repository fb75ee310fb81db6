use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daycap_tracker::logging::{init_logging, LogConfig};
use daycap_tracker::prelude::*;
use daycap_tracker::TrackerError;

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Directory for rotated log files; logging stays off when omitted
    #[arg(long = "log-dir")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track calories eaten today against a daily cap
    Calories {
        /// Daily calorie cap
        #[arg(short, long)]
        limit: i64,

        /// Record as amount:note[:dd.mm.yyyy], repeatable
        #[arg(short, long = "add")]
        add: Vec<String>,
    },
    /// Track money spent today against a daily cap, in rubles
    Spending {
        /// Daily spending cap in rubles
        #[arg(short, long)]
        limit: i64,

        /// Record as amount:note[:dd.mm.yyyy], repeatable
        #[arg(short, long = "add")]
        add: Vec<String>,

        /// Currency for the remaining-balance line
        #[arg(short, long, default_value = "rub")]
        status: String,

        /// Where rate snapshots are cached
        #[arg(long = "cache-dir", default_value = "~/.cache/daycap/rates")]
        cache_dir: String,
    },
}

fn parse_record(raw: &str) -> Result<Record> {
    let mut parts = raw.splitn(3, ':');
    let amount = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<i64>()
        .with_context(|| format!("bad amount in record \"{raw}\""))?;
    let note = parts.next().unwrap_or("").to_string();
    match parts.next() {
        Some(date) => Ok(Record::from_date_str(amount, note, date)?),
        None => Ok(Record::new(amount, note)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _guard = match &args.log_dir {
        Some(dir) => {
            let dir = shellexpand::tilde(dir).into_owned();
            Some(init_logging(&LogConfig::new(dir))?)
        }
        None => None,
    };

    match args.command {
        Command::Calories { limit, add } => {
            let mut calories = CalorieTracker::new(limit);
            for raw in &add {
                calories.add_record(parse_record(raw)?);
            }
            println!("{}", calories.describe_today());
            println!("{}", calories.describe_week());
            println!("{}", calories.describe_remaining());
        }
        Command::Spending {
            limit,
            add,
            status,
            cache_dir,
        } => {
            let cache_dir = shellexpand::tilde(&cache_dir).into_owned();
            let mut cash = SpendingTracker::new(limit, ExchangeRateCache::new(cache_dir));
            for raw in &add {
                cash.add_record(parse_record(raw)?);
            }
            println!("{}", cash.describe_today());
            println!("{}", cash.describe_week());
            match cash.spending_status(&status) {
                Ok(line) => println!("{line}"),
                Err(err @ TrackerError::InvalidCurrency { .. }) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}
