use clap::Parser;
use pagepalette::catalog::Catalog;
use pagepalette::{RunConfig, SessionConfig};

/// Screenshot a page's structural regions and record their palette and styles
#[derive(Parser, Debug)]
#[command(name = "pagepalette", version, about)]
struct Args {
    /// Absolute URL of the page to analyze (scheme included)
    url: String,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let run = match RunConfig::new(&args.url) {
        Ok(run) => run,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) =
        pagepalette::pipeline::run_with_chrome(run, Catalog::default(), SessionConfig::default())
            .await
    {
        log::error!("run failed: {}", e);
        std::process::exit(1);
    }
}
