use anyhow::Result;
use std::collections::BTreeSet;
use std::env;

use ultraskate_stats::export::export_all;
use ultraskate_stats::query::athlete_roster;
use ultraskate_stats::{init_tracing, load_dir, Config, Dataset, EventStats};

fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("summary");

    println!("📂 Loading events from {:?}...", config.snapshot_dir);
    let dataset = load_dir(&config.snapshot_dir);
    if dataset.is_loaded() {
        println!("✓ {} event(s) loaded\n", dataset.events.len());
    } else {
        println!("⚠️  No events loaded\n");
    }

    match mode {
        "summary" => run_summary(&dataset),
        "athletes" => run_athletes(&dataset),
        "export" => run_export(&dataset, &config)?,
        other => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Usage: ultraskate [summary|athletes|export]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_summary(dataset: &Dataset) {
    let mut sports = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut age_groups = BTreeSet::new();

    for event in &dataset.events {
        println!("{}", event.name);
        let stats = EventStats::new(event);
        for (medal, perf) in ["🥇", "🥈", "🥉"].iter().zip(stats.top(3)) {
            println!("  {} {}", medal, perf);
        }
        println!();

        for perf in event.performances() {
            sports.insert(perf.sport.as_str());
            categories.insert(perf.category.clone());
            age_groups.insert(perf.age_group.clone());
        }
    }

    print_set("Unique sports in all events", sports.iter());
    print_set("Unique categories in all events", categories.iter());
    print_set("Unique age groups in all events", age_groups.iter());

    if !dataset.skipped.is_empty() {
        println!("\n⚠️  Skipped files:");
        for skipped in &dataset.skipped {
            println!("- {:?}: {}", skipped.path, skipped.reason);
        }
    }
}

fn print_set<T: std::fmt::Display>(title: &str, items: impl Iterator<Item = T>) {
    println!("\n{}:", title);
    for item in items {
        println!("- {}", item);
    }
}

fn run_athletes(dataset: &Dataset) {
    println!("🛹 Athletes by career distance");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (i, career) in athlete_roster(dataset).iter().enumerate() {
        let team = if career.team { " [team]" } else { "" };
        println!(
            "{:>4}. {}{} - {:.2} mi over {} event(s), best {:.2} mi",
            i + 1,
            career.athlete.name,
            team,
            career.total_miles,
            career.event_count,
            career.best_event_miles
        );
    }
}

fn run_export(dataset: &Dataset, config: &Config) -> Result<()> {
    println!("💾 Exporting CSV to {:?}...", config.export_dir);
    let written = export_all(&dataset.events, &dataset.athletes, &config.export_dir)?;
    for path in &written {
        println!("✓ {:?}", path);
    }
    println!("✅ {} file(s) written", written.len());
    Ok(())
}
