use clap::Parser;
use fanwatch::batch::{self, BatchReport};
use fanwatch::cli::{Cli, Command};
use fanwatch::config::Config;
use fanwatch::notify::{self, CommandNotifier, Notifier};
use fanwatch::report;
use fanwatch::store::{History, HistoryStore};
use fanwatch::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .init();
}

fn notifier(config: &Config) -> Result<CommandNotifier> {
    config
        .notify_command
        .as_deref()
        .and_then(CommandNotifier::from_argv)
        .ok_or_else(|| fanwatch::Error::Notify("no notify_command configured".to_string()))
}

fn print_batch(report: &BatchReport, config: &Config) {
    println!("Processed {}/{} files successfully", report.processed, report.total);
    if report.overwrites > 0 {
        println!("Overwrote {} existing entries", report.overwrites);
    }
    for (path, e) in &report.failures {
        println!("  skipped {}: {e}", path.display());
    }
    println!("Data saved to: {}\n", config.history_path.display());
}

fn run_extract(config: &Config, send_summary: bool) -> Result<()> {
    let mut store = HistoryStore::open(&config.history_path)?;
    let outcome = batch::process_directory(&config.snapshot_dir, &mut store, config);

    // the summary reflects whatever was persisted, even after an abort
    if let Ok(report) = &outcome {
        if !config.json_output {
            print_batch(report, config);
        }
    }
    report::print(store.history(), config);

    let report = outcome?;

    if send_summary {
        let today = chrono::Local::now().date_naive();
        let mut body = report::table::render(store.history());
        if !report.failures.is_empty() {
            body.push_str(&format!("\n{} snapshot(s) skipped\n", report.failures.len()));
        }
        notifier(config)?.send(&notify::summary_subject(today), &body)?;
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Extract(args) => {
            config.apply_extract_args(&args);
            run_extract(&config, args.notify)
        }
        Command::Report(args) => {
            config.apply_history_args(&args.output);
            let history = History::load(&config.history_path)?;
            report::print(&history, &config);
            Ok(())
        }
        Command::Notify(args) => notifier(&config)?.send(&args.subject, &args.body),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
