pub mod crossover;
pub mod local_search;
pub mod mutation;
pub mod pool;
pub mod progress;
pub mod runner;

pub use self::pool::WorkerPool;
pub use self::progress::{CancelToken, NullSink, ProgressEvent, ProgressSink};
pub use self::runner::{
    score_ordering, search, Candidate, Optimizer, SearchOptions, SearchOutcome, Termination,
};
