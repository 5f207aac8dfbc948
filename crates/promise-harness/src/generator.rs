//! Produces a deterministic, reproducible stream of operations for one
//! client from a seeded PRNG (see the generator's contract in the
//! component design).
//!
//! The generator never shares mutable state across clients: each client's
//! sequence is drawn from its own `StdRng`, seeded from the run seed mixed
//! with the client id, so the whole run is reproducible from `(seed,
//! config)` alone (the runner draws each client's batch up front rather
//! than sharing one `Generator` across worker tasks -- see
//! `crate::runner`).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use promise_types::{ApiKind, CompleteBody, CreateBody, Input, Operation, SearchParams, SearchStateFilter, Value};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, IteratorRandom};
use uuid::Uuid;

/// A `timeout` far enough in the future (year 2050, in ms) that a Create
/// using it will never hit the implicit-timeout rule within a test run.
pub const FAR_FUTURE_TIMEOUT_MS: i64 = 2_524_608_000_000;

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Size of the id pool; small on purpose, to force key collisions so
    /// idempotent create, complete-after-complete, and read-after-create
    /// are exercised (see the generator's pool design).
    pub id_pool_size: usize,
    /// Size of the data-blob pool; roughly half the entries are `None`.
    pub data_pool_size: usize,
    pub requests_per_client: usize,
    /// The operation-kind mix to draw from; defaults to all six apis but
    /// may be narrowed for a targeted run (e.g. timeout-only).
    pub api_mix: Vec<ApiKind>,
    /// When true, Create draws its timeout from a near-term pool instead
    /// of the far-future default, to exercise the implicit-timeout path
    /// deterministically (see scenario S5 in the testable properties).
    pub near_term_timeouts: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            id_pool_size: 10,
            data_pool_size: 10,
            requests_per_client: 100,
            api_mix: ApiKind::ALL.to_vec(),
            near_term_timeouts: false,
        }
    }
}

/// A pure function of its seed and configuration: the same seed and config
/// always yield the same sequence of operations for a given client, which
/// is what makes a failing run reproducible (see the generator's contract).
#[derive(Clone, Debug)]
pub struct Generator {
    seed: u64,
    config: GeneratorConfig,
    id_pool: Vec<String>,
    data_pool: Vec<Option<String>>,
}

impl Generator {
    pub fn new(seed: u64, config: GeneratorConfig) -> Self {
        let id_pool = (0..config.id_pool_size.max(1)).map(|i| i.to_string()).collect();
        let data_pool = (0..config.data_pool_size.max(1))
            .map(|i| {
                if i % 2 == 0 {
                    None
                } else {
                    Some(BASE64.encode(format!("payload-{i}")))
                }
            })
            .collect();

        Self {
            seed,
            config,
            id_pool,
            data_pool,
        }
    }

    /// Draws `requests_per_client` operations for `client_id` from a
    /// `StdRng` seeded deterministically from `(seed, client_id)`.
    pub fn generate_for_client(&self, client_id: u32) -> Vec<Operation> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ (client_id as u64).wrapping_mul(0x9E3779B97F4A7C15));

        (0..self.config.requests_per_client)
            .map(|_| self.generate_one(&mut rng, client_id))
            .collect()
    }

    fn generate_one(&self, rng: &mut StdRng, client_id: u32) -> Operation {
        let api = *self
            .config
            .api_mix
            .choose(rng)
            .expect("api_mix must be non-empty");
        let id = self.id_pool.iter().choose(rng).expect("id pool must be non-empty").clone();
        let data = self.data_pool.choose(rng).cloned().flatten();

        let input = match api {
            ApiKind::Search => Input::Search(SearchParams {
                id: "*".to_string(),
                state: *[SearchStateFilter::Pending, SearchStateFilter::Resolved, SearchStateFilter::Rejected]
                    .choose(rng)
                    .unwrap(),
            }),
            ApiKind::Get => Input::Get(id),
            ApiKind::Create => {
                let timeout = if self.config.near_term_timeouts {
                    Utc::now().timestamp_millis() + 1
                } else {
                    FAR_FUTURE_TIMEOUT_MS
                };
                Input::Create(CreateBody {
                    id,
                    param: Value {
                        headers: None,
                        data,
                    },
                    timeout,
                })
            }
            ApiKind::Cancel | ApiKind::Resolve | ApiKind::Reject => Input::Complete(CompleteBody {
                id,
                value: Value { headers: None, data },
            }),
        };

        Operation::new_call(Uuid::new_v4().to_string(), client_id, api, input, Utc::now())
    }
}
