use crate::error::MfResult;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub weights: Weights,
    #[command(flatten)]
    pub population: PopulationParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Weights {
    // === TRANSITIONS ===
    #[arg(long, default_value_t = 1.0)]
    pub harmonic: f64,
    #[arg(long, default_value_t = 1.0)]
    pub same_artist: f64,
    #[arg(long, default_value_t = 0.5)]
    pub same_album: f64,
    #[arg(long, default_value_t = 0.5)]
    pub energy: f64,
    #[arg(long, default_value_t = 0.5)]
    pub tempo: f64,

    // Positive clusters genres, negative spreads them.
    #[arg(long, default_value_t = 0.3, allow_negative_numbers = true)]
    pub genre: f64,

    // === OPENING ===
    #[arg(long, default_value_t = 0.2)]
    pub position_bias_portion: f64,
    #[arg(long, default_value_t = 0.3)]
    pub position_bias: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            harmonic: 1.0,
            same_artist: 1.0,
            same_album: 0.5,
            energy: 0.5,
            tempo: 0.5,
            genre: 0.3,
            position_bias_portion: 0.2,
            position_bias: 0.3,
        }
    }
}

impl Weights {
    /// Weights that only score harmonic transitions.
    pub fn harmonic_only() -> Self {
        Self {
            harmonic: 1.0,
            same_artist: 0.0,
            same_album: 0.0,
            energy: 0.0,
            tempo: 0.0,
            genre: 0.0,
            position_bias_portion: 0.0,
            position_bias: 0.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopulationParams {
    #[arg(long, default_value_t = 100)]
    pub population_size: usize,
    #[arg(long, default_value_t = 3)]
    pub tournament_size: usize,
    #[arg(long, default_value_t = 0.1)]
    pub elite_percentage: f64,
    #[arg(long, default_value_t = 0.05)]
    pub immigration_rate: f64,

    // Mutation rate climbs from min to max as stagnation approaches the window.
    #[arg(long, default_value_t = 0.1)]
    pub mutation_rate_min: f64,
    #[arg(long, default_value_t = 0.5)]
    pub mutation_rate_max: f64,
    #[arg(long, default_value_t = 50)]
    pub stagnation_window: usize,

    // === LOCAL SEARCH ===
    #[arg(long, default_value_t = 50)]
    pub two_opt_start: usize,
    #[arg(long, default_value_t = 100)]
    pub two_opt_interval: usize,

    #[arg(long, default_value_t = 10)]
    pub progress_interval: usize,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            tournament_size: 3,
            elite_percentage: 0.1,
            immigration_rate: 0.05,
            mutation_rate_min: 0.1,
            mutation_rate_max: 0.5,
            stagnation_window: 50,
            two_opt_start: 50,
            two_opt_interval: 100,
            progress_interval: 10,
        }
    }
}

impl PopulationParams {
    /// Mutation probability after `stagnation` generations without improvement.
    pub fn mutation_rate(&self, stagnation: usize) -> f64 {
        let window = self.stagnation_window.max(1) as f64;
        let progress = (stagnation as f64 / window).min(1.0);
        self.mutation_rate_min + (self.mutation_rate_max - self.mutation_rate_min) * progress
    }

    /// Number of top candidates handed to the 2-opt refiner (at least 2).
    pub fn elite_count(&self, population: usize) -> usize {
        let wanted = (population as f64 * self.elite_percentage).ceil() as usize;
        wanted.max(2).min(population)
    }

    /// Number of worst candidates replaced by immigrants. Never touches the two elites.
    pub fn immigrant_count(&self, population: usize) -> usize {
        let wanted = (population as f64 * self.immigration_rate).floor() as usize;
        wanted.min(population.saturating_sub(2))
    }

    pub fn is_two_opt_generation(&self, generation: usize) -> bool {
        generation >= self.two_opt_start
            && (generation - self.two_opt_start) % self.two_opt_interval.max(1) == 0
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MfResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> MfResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Clamps values the engine cannot run with. Never fails.
    ///
    /// Non-finite floats fall back to their defaults before clamping.
    pub fn sanitized(mut self) -> Self {
        let pd = PopulationParams::default();
        let p = &mut self.population;
        p.population_size = p.population_size.max(2);
        p.tournament_size = p.tournament_size.max(1);
        p.elite_percentage = finite_or(p.elite_percentage, pd.elite_percentage).clamp(0.0, 1.0);
        p.immigration_rate = finite_or(p.immigration_rate, pd.immigration_rate).clamp(0.0, 1.0);
        p.mutation_rate_min = finite_or(p.mutation_rate_min, pd.mutation_rate_min).clamp(0.0, 1.0);
        p.mutation_rate_max =
            finite_or(p.mutation_rate_max, pd.mutation_rate_max).clamp(p.mutation_rate_min, 1.0);
        p.two_opt_interval = p.two_opt_interval.max(1);
        p.progress_interval = p.progress_interval.max(1);

        let wd = Weights::default();
        let w = &mut self.weights;
        w.harmonic = finite_or(w.harmonic, wd.harmonic);
        w.same_artist = finite_or(w.same_artist, wd.same_artist);
        w.same_album = finite_or(w.same_album, wd.same_album);
        w.energy = finite_or(w.energy, wd.energy);
        w.tempo = finite_or(w.tempo, wd.tempo);
        w.genre = finite_or(w.genre, wd.genre);
        w.position_bias = finite_or(w.position_bias, wd.position_bias);
        w.position_bias_portion =
            finite_or(w.position_bias_portion, wd.position_bias_portion).clamp(0.0, 1.0);
        self
    }

    /// Applies values the user typed on the command line on top of `self`
    /// (typically loaded from a file), leaving everything else untouched.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(weights.harmonic);
        update_if_present!(weights.same_artist);
        update_if_present!(weights.same_album);
        update_if_present!(weights.energy);
        update_if_present!(weights.tempo);
        update_if_present!(weights.genre);
        update_if_present!(weights.position_bias_portion);
        update_if_present!(weights.position_bias);

        update_if_present!(population.population_size);
        update_if_present!(population.tournament_size);
        update_if_present!(population.elite_percentage);
        update_if_present!(population.immigration_rate);
        update_if_present!(population.mutation_rate_min);
        update_if_present!(population.mutation_rate_max);
        update_if_present!(population.stagnation_window);
        update_if_present!(population.two_opt_start);
        update_if_present!(population.two_opt_interval);
        update_if_present!(population.progress_interval);
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Anything the search loop can poll once per generation for the live configuration.
pub trait ConfigSource: Send + Sync {
    fn snapshot(&self) -> Config;
}

impl ConfigSource for Config {
    fn snapshot(&self) -> Config {
        self.clone()
    }
}

impl<F> ConfigSource for F
where
    F: Fn() -> Config + Send + Sync,
{
    fn snapshot(&self) -> Config {
        self()
    }
}

/// Read-write locked configuration shared between the search loop and a tuning surface.
#[derive(Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
    epoch: Arc<AtomicU64>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config.sanitized())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get(&self) -> Config {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update<F: FnOnce(&mut Config)>(&self, f: F) {
        {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard);
            *guard = guard.clone().sanitized();
        }
        self.epoch.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set(&self, config: Config) {
        self.update(|c| *c = config);
    }

    /// Incremented on every write.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Relaxed)
    }
}

impl ConfigSource for SharedConfig {
    fn snapshot(&self) -> Config {
        self.get()
    }
}
