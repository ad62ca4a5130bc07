//! Fetches a page and prints its readable content as JSON.
//!
//! Usage:
//!   fetch_article <url> [timeout-secs]
//!   fetch_article - <page-url>        (HTML on stdin)
//!
//! Set `RUST_LOG=debug` to trace the pipeline stages on stderr.

use std::env;
use std::io;
use std::process;
use std::time::Duration;

use rs_readability::{acquire_from_stream, acquire_from_url, validate, Article, Error};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn usage() -> ! {
    eprintln!("usage: fetch_article <url> [timeout-secs]");
    eprintln!("       fetch_article - <page-url>   (read HTML from stdin)");
    process::exit(2);
}

fn run(args: &[String]) -> Result<Article, Error> {
    match args {
        [dash, page_url] if dash == "-" => {
            let url = validate::parse_request_url(page_url)?;
            acquire_from_stream(io::stdin().lock(), &url)
        }
        [url] => acquire_from_url(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        [url, secs] => {
            let Ok(secs) = secs.parse::<u64>() else {
                usage();
            };
            acquire_from_url(url, Duration::from_secs(secs))
        }
        _ => usage(),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(article) => match serde_json::to_string_pretty(&article) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to serialize article: {err}");
                process::exit(1);
            }
        },
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
