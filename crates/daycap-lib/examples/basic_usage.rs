//! Walkthrough of both trackers against the live rate feed. The first run
//! performs one network request; reruns within an hour reuse the snapshot
//! cached under ./currency_data.

use daycap_tracker::prelude::*;

fn main() -> Result<()> {
    let rates = ExchangeRateCache::new("currency_data");
    let mut cash = SpendingTracker::new(1000, rates);
    cash.add_record(Record::from_date_str(5, "купил сухарики".to_string(), "22.12.2021")?);
    cash.add_record(Record::new(100, "купил певко".to_string()));

    match cash.spending_status("qqq") {
        Ok(line) => println!("{line}"),
        Err(err) => println!("{err}"),
    }
    println!("{}", cash.spending_status("eur")?);
    println!("{}", cash.spending_status("usd")?);
    println!("{}", cash.describe_today());
    println!("{}", cash.describe_week());
    println!();

    let mut calories = CalorieTracker::new(900);
    calories.add_record(Record::new(1000, "съел еду".to_string()));

    println!("{}", calories.describe_today());
    println!("{}", calories.describe_week());
    println!("{}", calories.describe_remaining());

    Ok(())
}
