use std::time::Duration;

/// Minimum improvement that counts as "better" anywhere in the engine.
pub const SCORE_EPSILON: f64 = 1e-10;

/// Hard wall-clock ceiling for a single search run.
pub const MAX_SEARCH_DURATION: Duration = Duration::from_secs(60 * 60);

/// Outer-pass cap for the 2-opt refiner.
pub const TWO_OPT_MAX_ITERATIONS: usize = 1000;

/// Harmonic distance buckets (Camelot wheel).
pub const HARMONIC_SAME: u8 = 0;
pub const HARMONIC_NEIGHBOUR: u8 = 1;
pub const HARMONIC_PARALLEL: u8 = 2;
pub const HARMONIC_UNRELATED: u8 = 10;

/// Per-transition ceiling used by the normalizer for the harmonic component.
pub const HARMONIC_NORMALIZER_CEILING: f64 = 12.0;

/// Genre dissimilarity buckets.
pub const GENRE_IDENTICAL: f64 = 0.0;
pub const GENRE_ANCESTOR: f64 = 0.15;
pub const GENRE_SIBLING: f64 = 0.3;
pub const GENRE_SAME_FAMILY: f64 = 0.7;
pub const GENRE_UNRELATED: f64 = 1.0;

/// Number of position swaps applied to an immigrant copy of the best candidate.
pub const IMMIGRANT_SWAPS: usize = 3;

/// Bounds (inclusive) for the number of swaps in a swap mutation.
pub const MUTATION_SWAPS_MIN: usize = 2;
pub const MUTATION_SWAPS_MAX: usize = 5;

/// Structured seeds placed at the head of the initial population.
pub const STRUCTURED_SEED_COUNT: usize = 4;

/// Default queue capacity per worker for the evaluation pool.
pub const QUEUE_SLOTS_PER_WORKER: usize = 4;

/// Capacity of the progress channel created by the CLI.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 16;
