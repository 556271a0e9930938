use super::crossover::order_crossover;
use super::local_search::refine;
use super::mutation;
use super::pool::{default_workers, WorkerPool};
use super::progress::{CancelToken, ProgressEvent, ProgressSink};
use crate::config::{Config, ConfigSource, Weights};
use crate::consts::{MAX_SEARCH_DURATION, QUEUE_SLOTS_PER_WORKER, SCORE_EPSILON};
use crate::error::{MfResult, MixForgeError};
use crate::scorer::{Evaluator, Normalizer, PairCache, ScoreBreakdown};
use crate::track::{check_indices, Track};
use std::time::{Duration, Instant};
use strum_macros::Display;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

/// One ordering of track indices and its total cost (lower is better).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub genes: Vec<usize>,
    pub score: f64,
}

impl Candidate {
    pub fn new(n: usize) -> Self {
        Self {
            genes: (0..n).collect(),
            score: f64::INFINITY,
        }
    }

    /// True if `genes` holds every index `0..len` exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.genes.len()];
        for &g in &self.genes {
            match seen.get_mut(g) {
                Some(s) if !*s => *s = true,
                _ => return false,
            }
        }
        true
    }

    /// Value copy into existing storage.
    fn copy_from(&mut self, other: &Candidate) {
        self.genes.copy_from_slice(&other.genes);
        self.score = other.score;
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct SearchOptions {
    /// Fixed seed for reproducible runs.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
    /// Clamped to the one-hour ceiling.
    #[builder(default = MAX_SEARCH_DURATION)]
    pub time_limit: Duration,
    #[builder(default = default_workers())]
    pub threads: usize,
    /// Defaults to `QUEUE_SLOTS_PER_WORKER` per thread.
    #[builder(default, setter(strip_option))]
    pub queue_capacity: Option<usize>,
    /// Echoed on every progress event.
    #[builder(default)]
    pub epoch: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Termination {
    Cancelled,
    TimedOut,
    /// Fewer than two tracks; nothing to order.
    Trivial,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub ordering: Vec<Track>,
    pub indices: Vec<usize>,
    pub score: f64,
    /// Under the configuration current when the search ended.
    pub breakdown: ScoreBreakdown,
    pub generations: usize,
    pub termination: Termination,
}

/// Genetic search over orderings of one track set.
pub struct Optimizer<'a> {
    tracks: &'a [Track],
    cache: &'a PairCache,
    normalizer: &'a Normalizer,
    options: SearchOptions,
}

impl<'a> Optimizer<'a> {
    pub fn new(
        tracks: &'a [Track],
        cache: &'a PairCache,
        normalizer: &'a Normalizer,
        options: SearchOptions,
    ) -> MfResult<Self> {
        check_indices(tracks)?;
        if cache.len() != tracks.len() {
            return Err(MixForgeError::Validation(format!(
                "pair cache covers {} tracks but {} were given; rebuild the cache",
                cache.len(),
                tracks.len()
            )));
        }
        Ok(Self {
            tracks,
            cache,
            normalizer,
            options,
        })
    }

    /// Runs until `cancel` fires or the time limit elapses.
    pub fn run<C, P>(&self, config: &C, cancel: &CancelToken, progress: &P) -> MfResult<SearchOutcome>
    where
        C: ConfigSource + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let n = self.tracks.len();
        let initial = config.snapshot().sanitized();
        if n < 2 {
            return Ok(self.outcome((0..n).collect(), &initial, 0, Termination::Trivial));
        }

        let time_limit = self.options.time_limit.min(MAX_SEARCH_DURATION);
        let threads = self.options.threads.max(1);
        let capacity = self
            .options
            .queue_capacity
            .unwrap_or(threads * QUEUE_SLOTS_PER_WORKER);
        let pool = WorkerPool::new(threads, capacity)?;

        let mut rng = if let Some(s) = self.options.seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        // Fixed for the whole run; the buffers below never resize.
        let pop_size = initial.population.population_size;
        info!(
            "Search started: {} tracks, population {}, {} workers, limit {:?}",
            n, pop_size, threads, time_limit
        );

        let mut population: Vec<Candidate> = (0..pop_size).map(|_| Candidate::new(n)).collect();
        let mut next = population.clone();
        let mut parents: Vec<usize> = Vec::with_capacity(pop_size);
        let mut placed = vec![false; n];
        // One don't-look mask per possible elite.
        let mut exhausted = vec![vec![false; n]; pop_size];

        seed_population(&mut population, self.tracks, &mut rng);

        let mut weights: Weights = initial.weights.clone();
        {
            let eval = Evaluator::new(self.cache, self.normalizer, &weights);
            evaluate(&pool, &mut population, &eval);
        }
        sort_population(&mut population);
        let mut best = population[0].clone();

        let start = Instant::now();
        let mut generation = 0usize;
        let mut stagnation = 0usize;
        let mut last_report = Instant::now();
        let mut since_report = 0usize;

        let termination = loop {
            if cancel.is_cancelled() {
                break Termination::Cancelled;
            }
            if start.elapsed() >= time_limit {
                break Termination::TimedOut;
            }

            let snapshot = config.snapshot().sanitized();
            let params = &snapshot.population;
            let eval = Evaluator::new(self.cache, self.normalizer, &snapshot.weights);

            if snapshot.weights != weights {
                weights = snapshot.weights.clone();
                best.score = eval.cost_full(&best.genes);
                debug!(
                    "Weights changed at generation {}; best re-scored to {:.6}",
                    generation, best.score
                );
            }

            // 1. Evaluate & sort
            evaluate(&pool, &mut population, &eval);
            sort_population(&mut population);

            // 2. Periodic 2-opt on the elites
            if params.is_two_opt_generation(generation) {
                let elites = params.elite_count(pop_size);
                refine_all(&pool, &mut population[..elites], &mut exhausted, &eval);
                sort_population(&mut population);
            }

            // 3. Best tracking
            let improved = population[0].score < best.score - SCORE_EPSILON;
            if improved {
                best.copy_from(&population[0]);
                stagnation = 0;
                info!("Generation {}: new best {:.6}", generation, best.score);
            } else {
                stagnation += 1;
            }

            // 4. Report
            since_report += 1;
            if improved || generation % params.progress_interval == 0 {
                let elapsed = last_report.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    since_report as f64 / elapsed
                } else {
                    0.0
                };
                let breakdown = eval.score_full(&best.genes);
                progress.emit(ProgressEvent {
                    generation,
                    score: breakdown.total,
                    ordering: self.ordering(&best.genes),
                    breakdown,
                    generations_per_sec: rate,
                    epoch: self.options.epoch,
                });
                last_report = Instant::now();
                since_report = 0;
            }

            // 5. Immigration (worst slots)
            let immigrants = params.immigrant_count(pop_size);
            for slot in population[pop_size - immigrants..].iter_mut() {
                mutation::immigrant(&mut slot.genes, &best.genes, &mut rng);
                slot.score = eval.cost_full(&slot.genes);
            }

            // 6. Selection (two elites, then tournaments)
            parents.clear();
            parents.extend([0, 1]);
            while parents.len() < pop_size {
                parents.push(tournament(&population, params.tournament_size, &mut rng));
            }

            // 7. Reproduction
            next[0].copy_from(&population[0]);
            next[1].copy_from(&population[1]);
            let mut k = 2;
            while k < pop_size {
                let a = parents[k];
                let b = parents.get(k + 1).copied().unwrap_or(parents[0]);
                order_crossover(
                    &mut next[k].genes,
                    &population[a].genes,
                    &population[b].genes,
                    &mut rng,
                    &mut placed,
                );
                if k + 1 < pop_size {
                    order_crossover(
                        &mut next[k + 1].genes,
                        &population[b].genes,
                        &population[a].genes,
                        &mut rng,
                        &mut placed,
                    );
                }
                k += 2;
            }

            // 8. Mutation
            let rate = params.mutation_rate(stagnation);
            for child in next[2..].iter_mut() {
                if rng.f64() < rate {
                    mutation::mutate(&mut child.genes, &mut rng);
                }
                child.score = f64::INFINITY;
            }

            std::mem::swap(&mut population, &mut next);
            generation += 1;
        };

        debug_assert!(best.is_permutation());
        let outcome = self.outcome(
            best.genes,
            &config.snapshot().sanitized(),
            generation,
            termination,
        );
        info!(
            "Search finished ({}) after {} generations in {:.1}s: best {:.6}",
            outcome.termination,
            generation,
            start.elapsed().as_secs_f64(),
            outcome.score
        );
        Ok(outcome)
    }

    fn outcome(
        &self,
        indices: Vec<usize>,
        config: &Config,
        generations: usize,
        termination: Termination,
    ) -> SearchOutcome {
        let eval = Evaluator::new(self.cache, self.normalizer, &config.weights);
        let breakdown = eval.score_full(&indices);
        SearchOutcome {
            ordering: self.ordering(&indices),
            indices,
            score: breakdown.total,
            breakdown,
            generations,
            termination,
        }
    }

    fn ordering(&self, genes: &[usize]) -> Vec<Track> {
        genes.iter().map(|&i| self.tracks[i].clone()).collect()
    }
}

/// Runs a search with default options and returns the best ordering found.
pub fn search<C, P>(
    tracks: &[Track],
    cache: &PairCache,
    normalizer: &Normalizer,
    config: &C,
    cancel: &CancelToken,
    progress: &P,
) -> MfResult<Vec<Track>>
where
    C: ConfigSource + ?Sized,
    P: ProgressSink + ?Sized,
{
    Optimizer::new(tracks, cache, normalizer, SearchOptions::default())?
        .run(config, cancel, progress)
        .map(|outcome| outcome.ordering)
}

/// Scores a fixed ordering without searching.
pub fn score_ordering(
    cache: &PairCache,
    normalizer: &Normalizer,
    weights: &Weights,
    genes: &[usize],
) -> ScoreBreakdown {
    Evaluator::new(cache, normalizer, weights).score_full(genes)
}

fn seed_population(population: &mut [Candidate], tracks: &[Track], rng: &mut fastrand::Rng) {
    let seeds = mutation::structured_seeds(tracks);
    for (slot, candidate) in population.iter_mut().enumerate() {
        match seeds.get(slot) {
            Some(seed) => candidate.genes.copy_from_slice(seed),
            None => mutation::random_ordering(&mut candidate.genes, rng),
        }
    }
}

fn evaluate(pool: &WorkerPool, population: &mut [Candidate], eval: &Evaluator) {
    pool.run_batch(|batch| {
        for candidate in population.iter_mut() {
            batch.submit(move || candidate.score = eval.cost_full(&candidate.genes));
        }
    });
}

fn refine_all(
    pool: &WorkerPool,
    elites: &mut [Candidate],
    exhausted: &mut [Vec<bool>],
    eval: &Evaluator,
) {
    pool.run_batch(|batch| {
        for (candidate, mask) in elites.iter_mut().zip(exhausted.iter_mut()) {
            batch.submit(move || candidate.score = refine(&mut candidate.genes, eval, mask));
        }
    });
}

fn sort_population(population: &mut [Candidate]) {
    population.sort_unstable_by(|a, b| a.score.total_cmp(&b.score));
}

fn tournament(population: &[Candidate], size: usize, rng: &mut fastrand::Rng) -> usize {
    let len = population.len();
    let mut winner = rng.usize(0..len);
    for _ in 1..size {
        let challenger = rng.usize(0..len);
        if population[challenger].score < population[winner].score {
            winner = challenger;
        }
    }
    winner
}
