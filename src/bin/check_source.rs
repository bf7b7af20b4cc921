use std::collections::BTreeMap;
use std::env;

use anyhow::Context;
use quizpage::config::Config;
use quizpage::loader::{HttpFetcher, Item, LoadOutcome, Loader, Origin};
use serde::Serialize;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let config = match Config::from_env(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: cargo run --bin check_source [source_url]");
            return Err(e.into());
        }
    };

    let mut loader = Loader::new(HttpFetcher::new(config.timeout));
    let outcome = loader.load(&config.source_url);

    let report = serialize_report(&config.source_url, outcome)
        .context("failed to serialize load report")?;
    println!("---");
    print!("{}", report);
    println!("---\n");

    match outcome.origin {
        Origin::Remote => {
            println!(
                "accepted {BOLD}{}{RESET} items from {BOLD}{}{RESET}",
                outcome.items.len(),
                outcome.diagnostics.resolved_source.as_deref().unwrap_or_default()
            );
            Ok(())
        }
        Origin::Fallback => Err(anyhow::anyhow!(
            "no usable items at {}: {}",
            config.source_url,
            outcome
                .diagnostics
                .last_error
                .as_deref()
                .unwrap_or("unknown error")
        )),
    }
}

fn serialize_report(source_url: &str, outcome: &LoadOutcome) -> anyhow::Result<String> {
    let mut map = BTreeMap::<&str, ReportField>::new();
    map.insert("source_url", ReportField::Text(source_url));
    map.insert("origin", ReportField::Origin(outcome.origin));
    map.insert(
        "attempted_urls",
        ReportField::Urls(&outcome.diagnostics.attempted_urls),
    );
    map.insert(
        "resolved_source",
        ReportField::Optional(outcome.diagnostics.resolved_source.as_deref()),
    );
    map.insert(
        "last_error",
        ReportField::Optional(outcome.diagnostics.last_error.as_deref()),
    );
    map.insert("items", ReportField::Items(&outcome.items));

    Ok(serde_yaml_ng::to_string(&map)?)
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum ReportField<'a> {
    Text(&'a str),
    Optional(Option<&'a str>),
    Origin(Origin),
    Urls(&'a [String]),
    Items(&'a [Item]),
}
