use crate::reports;
use clap::Args;
use mixforge::config::Config;
use mixforge::optimizer::score_ordering;
use mixforge::scorer::{Normalizer, PairCache};
use mixforge::track::Track;
use mixforge::MfResult;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Track list (CSV or JSON)
    pub tracks: String,

    #[command(flatten)]
    pub config: Config,
}

pub fn run(
    tracks: &[Track],
    cache: &PairCache,
    normalizer: &Normalizer,
    config: &Config,
) -> MfResult<()> {
    let genes: Vec<usize> = tracks.iter().map(|t| t.index).collect();
    let breakdown = score_ordering(cache, normalizer, &config.weights, &genes);

    println!("\n=== ORDER AUDIT ===");
    reports::print_ordering(tracks, cache);
    reports::print_breakdown(&breakdown);
    Ok(())
}
