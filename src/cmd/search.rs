use crate::reports;
use clap::Args;
use mixforge::config::{Config, SharedConfig};
use mixforge::consts::PROGRESS_CHANNEL_CAPACITY;
use mixforge::optimizer::{CancelToken, Optimizer, ProgressEvent, SearchOptions};
use mixforge::scorer::{Normalizer, PairCache};
use mixforge::track::Track;
use mixforge::{MfResult, MixForgeError};
use std::sync::mpsc::sync_channel;
use std::thread;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Track list (CSV or JSON)
    pub tracks: String,

    #[command(flatten)]
    pub config: Config,

    /// Search time in seconds (capped at one hour)
    #[arg(short = 'T', long, default_value_t = 60)]
    pub time: u64,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

pub fn run(
    args: &SearchArgs,
    tracks: &[Track],
    cache: &PairCache,
    normalizer: &Normalizer,
    config: Config,
) -> MfResult<()> {
    if args.time == 0 {
        return Err(MixForgeError::Config(
            "--time must be at least one second".into(),
        ));
    }

    let shared = SharedConfig::new(config);
    let cancel = CancelToken::new();

    let mut options = SearchOptions::builder()
        .time_limit(Duration::from_secs(args.time))
        .build();
    options.seed = args.seed;
    if let Some(threads) = args.threads {
        options.threads = threads;
    }

    let (tx, rx) = sync_channel::<ProgressEvent>(PROGRESS_CHANNEL_CAPACITY);

    let outcome = thread::scope(|s| {
        let printer = s.spawn(move || {
            for event in rx {
                reports::print_progress(&event);
            }
        });

        let result = Optimizer::new(tracks, cache, normalizer, options)
            .and_then(|optimizer| optimizer.run(&shared, &cancel, &tx));
        // Closing the channel ends the printer.
        drop(tx);
        let _ = printer.join();
        result
    })?;

    println!(
        "\nStopped ({}) after {} generations.",
        outcome.termination, outcome.generations
    );
    reports::print_ordering(&outcome.ordering, cache);
    reports::print_breakdown(&outcome.breakdown);
    Ok(())
}
