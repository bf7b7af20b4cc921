use anyhow::Context;
use quizpage::config::Config;
use quizpage::loader::{HttpFetcher, Loader};
use std::{env, io};

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let config = match Config::from_env(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: quizpage [source_url]");
            return Err(e.into());
        }
    };
    log::info!("quiz source: {}", config.source_url);

    let mut loader = Loader::new(HttpFetcher::new(config.timeout));
    let outcome = loader.load(&config.source_url);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    quizpage::page::run(stdin.lock(), &mut stdout, outcome).context("quiz page failed")?;

    Ok(())
}
