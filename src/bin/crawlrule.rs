//! crawlrule: CLI tool for checking URLs against rule files and timing rule sets.

use clap::{Parser, Subcommand, ValueEnum};
use crawlrule::harness::DEFAULT_RULE_COUNTS;
use crawlrule::{
    BenchmarkHarness, Decision, FilterConfig, LengthLimits, LogContext, MatcherBackend, UrlFilter,
};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crawlrule")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Filter crawl URLs with ordered allow/deny rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Regex,
    Fast,
}

impl From<Backend> for MatcherBackend {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Regex => MatcherBackend::Regex,
            Backend::Fast => MatcherBackend::Fast,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read URLs from stdin and print `+url` (keep) or `-url` (discard)
    Check {
        /// YAML filter configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rule file (overrides the configuration's rule source)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Matcher back-end (overrides the configuration)
        #[arg(short, long, value_enum)]
        backend: Option<Backend>,

        /// Keep URLs no rule matches
        #[arg(long)]
        keep_unmatched: bool,

        /// Print the deciding rule next to each URL
        #[arg(short, long)]
        verbose: bool,
    },

    /// Time rule sets of increasing size against a URL corpus
    Bench {
        /// Rule corpus, one rule per line
        #[arg(short, long)]
        rules: PathBuf,

        /// URL corpus, one URL per line
        #[arg(short, long)]
        urls: PathBuf,

        /// Matcher back-end
        #[arg(short, long, value_enum, default_value = "fast")]
        backend: Backend,

        /// Rule counts to sweep
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_RULE_COUNTS.to_vec())]
        counts: Vec<usize>,

        /// Timed rounds per rule count
        #[arg(long, default_value_t = 3)]
        rounds: usize,

        /// Maximum URL length
        #[arg(long)]
        max_url_length: Option<usize>,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            config,
            rules,
            backend,
            keep_unmatched,
            verbose,
        } => check(config, rules, backend, keep_unmatched, verbose),
        Commands::Bench {
            rules,
            urls,
            backend,
            counts,
            rounds,
            max_url_length,
            json,
        } => bench(rules, urls, backend, &counts, rounds, max_url_length, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn check(
    config_path: Option<PathBuf>,
    rules: Option<PathBuf>,
    backend: Option<Backend>,
    keep_unmatched: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => FilterConfig::from_yaml(&fs::read_to_string(path)?)?,
        None => FilterConfig::default(),
    };
    if let Some(rules) = rules {
        config.rules = None;
        config.rules_file = Some(rules);
    }
    if let Some(backend) = backend {
        config.backend = backend.into();
    }
    if keep_unmatched {
        config.default_decision = Decision::Keep;
    }

    let filter = UrlFilter::new(&config, LogContext::default())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let url = line.trim();
        if url.is_empty() {
            continue;
        }

        match filter.filter(url) {
            Ok(decision) => {
                let sign = if decision.is_keep() { '+' } else { '-' };
                if verbose {
                    let rule = filter
                        .matched_rule(url)?
                        .map(|r| format!("line {}: {}", r.line(), r))
                        .unwrap_or_else(|| "default".to_string());
                    writeln!(out, "{}{}\t{}", sign, url, rule)?;
                } else {
                    writeln!(out, "{}{}", sign, url)?;
                }
            }
            Err(e) => eprintln!("Skipping {}: {}", url, e),
        }
    }

    Ok(())
}

fn bench(
    rules: PathBuf,
    urls: PathBuf,
    backend: Backend,
    counts: &[usize],
    rounds: usize,
    max_url_length: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = FilterConfig::default()
        .backend(backend.into())
        .limits(LengthLimits {
            max_url_length,
            ..LengthLimits::unlimited()
        });

    let harness = BenchmarkHarness::from_readers(
        BufReader::new(File::open(&rules)?),
        BufReader::new(File::open(&urls)?),
    )?
    .config(config)
    .rounds(rounds);

    log::info!("Benchmarking {} URLs from {:?}", harness.url_count(), urls);

    let reports = harness.sweep(counts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!(
        "{:>8} {:>8} {:>10} {:>10} {:>8} {:>12}",
        "backend", "rules", "kept", "discarded", "errors", "ns/url"
    );
    for r in &reports {
        println!(
            "{:>8} {:>8} {:>10} {:>10} {:>8} {:>12.1}",
            r.backend.as_str(),
            r.rule_count,
            r.kept,
            r.discarded,
            r.errors,
            r.nanos_per_url
        );
    }

    Ok(())
}
