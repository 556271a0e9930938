use crate::consts::QUEUE_SLOTS_PER_WORKER;
use crate::error::{MfResult, MixForgeError};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use tracing::debug;

/// Fixed set of worker threads for one search run.
///
/// Work is handed over in batches: [`WorkerPool::run_batch`] opens a batch,
/// the caller `submit`s units into it, and the call returns only once every
/// unit of that batch has finished. At most `capacity` units are queued or
/// running at any time; `submit` blocks the caller beyond that.
///
/// Dropping the pool returns only after every worker thread has exited.
pub struct WorkerPool {
    // Drops before `joined`: terminating the pool lets the workers exit.
    pool: rayon::ThreadPool,
    joined: Joined,
    workers: usize,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(workers: usize, capacity: usize) -> MfResult<Self> {
        let workers = workers.max(1);
        let capacity = capacity.max(1);
        let latch = Arc::new(ExitLatch::new(workers));
        let on_exit = Arc::clone(&latch);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mixforge-worker-{}", i))
            .exit_handler(move |_| on_exit.arrive())
            .build()
            .map_err(|e| MixForgeError::Pool(e.to_string()))?;

        debug!("Worker pool up: {} workers, queue capacity {}", workers, capacity);
        Ok(Self {
            pool,
            joined: Joined(latch),
            workers,
            capacity,
        })
    }

    /// One worker per available processor, `QUEUE_SLOTS_PER_WORKER` queued units each.
    pub fn with_available_parallelism() -> MfResult<Self> {
        let workers = default_workers();
        Self::new(workers, workers * QUEUE_SLOTS_PER_WORKER)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Opens a batch and blocks until every unit submitted to it has completed.
    /// `op` itself runs on the calling thread.
    pub fn run_batch<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&Batch<'_, 'scope>) -> R,
    {
        let gate = Arc::new(Gate::new(self.capacity));
        self.pool.in_place_scope(|scope| {
            let batch = Batch {
                scope,
                gate: Arc::clone(&gate),
            };
            op(&batch)
        })
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Submission handle for the batch currently open on a [`WorkerPool`].
pub struct Batch<'a, 'scope> {
    scope: &'a rayon::Scope<'scope>,
    gate: Arc<Gate>,
}

impl<'a, 'scope> Batch<'a, 'scope> {
    /// Queues one unit. Blocks while the pool already holds `capacity` units.
    pub fn submit<F>(&self, unit: F)
    where
        F: FnOnce() + Send + 'scope,
    {
        self.gate.acquire();
        let slot = Slot(Arc::clone(&self.gate));
        self.scope.spawn(move |_| {
            let _slot = slot;
            unit();
        });
    }
}

/// Counting gate bounding the number of in-flight units.
struct Gate {
    in_flight: Mutex<usize>,
    freed: Condvar,
    capacity: usize,
}

impl Gate {
    fn new(capacity: usize) -> Self {
        Self {
            in_flight: Mutex::new(0),
            freed: Condvar::new(),
            capacity,
        }
    }

    fn acquire(&self) {
        let mut n = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        while *n >= self.capacity {
            n = self.freed.wait(n).unwrap_or_else(PoisonError::into_inner);
        }
        *n += 1;
    }

    fn release(&self) {
        let mut n = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        *n = n.saturating_sub(1);
        drop(n);
        self.freed.notify_one();
    }
}

/// Counts worker threads that have left the pool.
struct ExitLatch {
    exited: Mutex<usize>,
    all_out: Condvar,
    expected: usize,
}

impl ExitLatch {
    fn new(expected: usize) -> Self {
        Self {
            exited: Mutex::new(0),
            all_out: Condvar::new(),
            expected,
        }
    }

    fn arrive(&self) {
        let mut n = self.exited.lock().unwrap_or_else(PoisonError::into_inner);
        *n += 1;
        drop(n);
        self.all_out.notify_all();
    }

    fn wait(&self) {
        let mut n = self.exited.lock().unwrap_or_else(PoisonError::into_inner);
        while *n < self.expected {
            n = self.all_out.wait(n).unwrap_or_else(PoisonError::into_inner);
        }
    }

    #[cfg(test)]
    fn exited(&self) -> usize {
        *self.exited.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Blocks on drop until the latch is full.
struct Joined(Arc<ExitLatch>);

impl Drop for Joined {
    fn drop(&mut self) {
        self.0.wait();
        debug!("Worker pool down: {} workers joined", self.0.expected);
    }
}

/// Returns its gate slot when the unit finishes, including by panic.
struct Slot(Arc<Gate>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.release();
    }
}
