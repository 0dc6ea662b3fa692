//! Aperture board search CLI

mod report;

use aperture_pack_core::{
    Error as CoreError, ProgressCallback, RunMode, Sampler, SearchConfig, SearchOutcome,
    SearchProgress, PROJECT_MIN_SN_DB,
};
use aperture_pack_render::{save_board, RenderOptions};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aperture-pack")]
#[command(about = "Randomized search for aperture boards meeting a minimum SN")]
#[command(version)]
struct Cli {
    /// Number of iterations (trials) in a single batch
    #[arg(short, long, default_value_t = 1)]
    iterations: usize,

    /// Sweep batches of 100 up to 1,000,000 trials instead of a single batch
    #[arg(short, long)]
    auto: bool,

    /// Render the project candidate to PNG
    #[arg(short, long)]
    visualize: bool,

    /// Print histograms, the best-by-SN candidate and per-aperture tables
    #[arg(short, long)]
    debug: bool,

    /// Base seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Minimum SN of the project candidate in dB
    #[arg(long, default_value_t = PROJECT_MIN_SN_DB)]
    threshold: f64,

    /// Directory for rendered images
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "table")]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Console tables
    Table,
    /// JSON summary per batch
    Json,
}

impl Cli {
    fn mode(&self) -> RunMode {
        if self.auto {
            RunMode::Auto
        } else {
            RunMode::Single(self.iterations)
        }
    }

    fn search_config(&self, trials: usize) -> SearchConfig {
        let config = SearchConfig::new()
            .with_trials(trials)
            .with_parallel(!self.sequential)
            .with_threshold(self.threshold);

        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `Trials: k of N` line rewritten in place.
///
/// Parallel workers report out of order; counts at or below the highest one
/// already shown are dropped.
fn progress_writer<W: Write + Send>(out: W) -> impl Fn(SearchProgress) + Send + Sync {
    let out = Mutex::new(out);
    let shown = AtomicUsize::new(0);

    move |p| {
        let Ok(mut out) = out.lock() else { return };
        if shown.fetch_max(p.completed, Ordering::Relaxed) >= p.completed {
            return;
        }
        let _ = write!(out, "\rTrials: {} of {}", p.completed, p.total);
        if p.completed == p.total {
            let _ = writeln!(out);
        }
        let _ = out.flush();
    }
}

fn progress_line() -> ProgressCallback {
    Box::new(progress_writer(std::io::stderr()))
}

fn print_table(cli: &Cli, outcome: &SearchOutcome) -> Result<(), CoreError> {
    let best = &outcome.best_by_sn;

    if cli.debug {
        println!("{}", report::histogram_section(&outcome.histogram));

        println!("{}", report::header("Best candidate (without project requirements)"));
        println!("{}", report::candidate_block(&best.into()));

        println!("\nParameters of each object on board");
        println!("{}", report::aperture_table(&best.board));
    }

    let candidate = outcome.project_candidate()?;

    println!("{}", report::header("Project candidate"));
    println!("{}", report::candidate_block(&candidate.into()));

    if cli.debug {
        println!("{}", report::aperture_table(&candidate.board));
    }

    println!("{}", report::header("Comparison of two candidates"));
    println!("{}", report::comparison(&best.into(), &candidate.into()));

    Ok(())
}

fn print_json(outcome: &SearchOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    Ok(())
}

fn visualize(cli: &Cli, outcome: &SearchOutcome) -> anyhow::Result<()> {
    if let Ok(candidate) = outcome.project_candidate() {
        let paths = save_board(
            &candidate.board.view(),
            &cli.output_dir,
            &outcome.trials.to_string(),
            &RenderOptions::default(),
        )?;
        for path in paths {
            println!("Image saved to: {}", path.display());
        }
    }
    Ok(())
}

fn run_batch(cli: &Cli, trials: usize) -> anyhow::Result<()> {
    let sampler = Sampler::new(cli.search_config(trials));
    let outcome = sampler.run_with_progress(progress_line())?;

    log::debug!("Batch seed: {}", outcome.seed);

    let selected = match cli.format {
        Format::Table => print_table(cli, &outcome),
        Format::Json => {
            print_json(&outcome)?;
            outcome.project_candidate().map(|_| ())
        }
    };

    if cli.visualize {
        visualize(cli, &outcome)?;
    }

    selected.map_err(Into::into)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    log::debug!("{:?}", cli);

    match cli.mode() {
        RunMode::Single(trials) => run_batch(&cli, trials)?,
        RunMode::Auto => {
            for trials in RunMode::Auto.batches() {
                println!("{}", report::header("New dataset"));
                if let Err(e) = run_batch(&cli, trials) {
                    match e.downcast_ref::<CoreError>() {
                        Some(CoreError::NoQualifyingCandidate { .. }) => {
                            log::warn!("Skipping batch of {} trials: {}", trials, e);
                        }
                        _ => return Err(e),
                    }
                }
            }
        }
    }

    Ok(())
}
