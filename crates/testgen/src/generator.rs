use chrono::{DateTime, Duration, Local};
use rag_core::Scenario;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Bounds for a randomly generated scenario.
///
/// The process and class counts are drawn from `0..=max_*`, so empty
/// scenarios are part of the distribution.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, TypedBuilder)]
pub struct ScenarioParams {
    #[builder(default)]
    pub id: u64,
    #[builder(default = 10)]
    pub max_processes: usize,
    #[builder(default = 10)]
    pub max_resources: usize,
    #[builder(default = 20)]
    pub max_units: u64,
    /// Base seed. Scenario `id` is generated from `seed + id`, so a batch is
    /// reproducible as a whole and its members still differ.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GeneratedScenario {
    params: ScenarioParams,
    info: String,
    start: DateTime<Local>,
    end: DateTime<Local>,
    data: Scenario,
}

impl GeneratedScenario {
    #[must_use]
    pub const fn new(
        params: ScenarioParams,
        info: String,
        start: DateTime<Local>,
        end: DateTime<Local>,
        data: Scenario,
    ) -> Self {
        Self {
            params,
            info,
            start,
            end,
            data,
        }
    }

    #[must_use]
    pub const fn get_id(&self) -> u64 {
        self.params.id
    }

    #[must_use]
    pub const fn get_data(&self) -> &Scenario {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Scenario {
        self.data
    }

    #[must_use]
    pub const fn get_params(&self) -> &ScenarioParams {
        &self.params
    }

    #[must_use]
    pub fn get_duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Generate a scenario with exactly `processes` processes and `resources`
/// classes of at most `max_units` units each.
///
/// # Conservation invariant
///
/// The result always passes [`rag_core::Snapshot::new`]. Allocations are
/// drawn class by class from the units not yet handed out, so no column
/// sum can exceed its total. Each request is drawn from
/// `0..=total - held`, so a process never asks for more than the class
/// could ever give it.
#[must_use]
pub fn generate_scenario<R>(
    rng: &mut R,
    processes: usize,
    resources: usize,
    max_units: u64,
) -> Scenario
where
    R: RngExt,
{
    let total_units: Vec<u64> = (0..resources)
        .map(|_| rng.random_range(0..=max_units))
        .collect();

    let mut remaining = total_units.clone();
    let allocation: Vec<Vec<u64>> = (0..processes)
        .map(|_| {
            remaining
                .iter_mut()
                .map(|left| {
                    let held = rng.random_range(0..=*left);
                    *left -= held;
                    held
                })
                .collect()
        })
        .collect();

    let request = allocation
        .iter()
        .map(|held| {
            total_units
                .iter()
                .zip(held)
                .map(|(total, held)| rng.random_range(0..=total - held))
                .collect()
        })
        .collect();

    Scenario::new(total_units, allocation, request)
}

/// Generate a scenario with random dimensions bounded by `params`.
#[must_use]
pub fn generate_random_scenario<R>(rng: &mut R, params: &ScenarioParams) -> Scenario
where
    R: RngExt,
{
    let processes = rng.random_range(0..=params.max_processes);
    let resources = rng.random_range(0..=params.max_resources);
    generate_scenario(rng, processes, resources, params.max_units)
}

/// Generate one scenario for `params`, seeded from `params.seed` if set.
#[must_use]
pub fn generate_single_scenario(params: &ScenarioParams) -> Scenario {
    match params.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(params.id));
            generate_random_scenario(&mut rng, params)
        }
        None => generate_random_scenario(&mut rand::rng(), params),
    }
}

/// Generate `n_scenario` scenarios in parallel, numbered `0..n_scenario`.
/// Every other field of `template` is shared.
#[must_use]
pub fn generate_mult_scenarios(n_scenario: u64, template: &ScenarioParams) -> Vec<GeneratedScenario> {
    (0..n_scenario)
        .into_par_iter()
        .map(|id| {
            let params = ScenarioParams {
                id,
                ..template.clone()
            };
            let start_time = Local::now();
            let scenario = generate_single_scenario(&params);
            let end_time = Local::now();
            GeneratedScenario {
                params,
                info: "generated".to_string(),
                start: start_time,
                end: end_time,
                data: scenario,
            }
        })
        .collect()
}
