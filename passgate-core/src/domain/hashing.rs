//! Password hashing parameters

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters (moderate work factor)
pub const DEFAULT_MEMORY_COST_KIB: u32 = 19456; // 19 MiB
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id cost parameters used when hashing new passwords
///
/// Existing digests carry their own parameters, so changing these never
/// invalidates stored hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasherParams {
    #[serde(default = "default_memory_cost")]
    pub memory_cost_kib: u32,
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_cost() -> u32 {
    DEFAULT_MEMORY_COST_KIB
}

fn default_time_cost() -> u32 {
    DEFAULT_TIME_COST
}

fn default_parallelism() -> u32 {
    DEFAULT_PARALLELISM
}

impl Default for HasherParams {
    fn default() -> Self {
        Self {
            memory_cost_kib: DEFAULT_MEMORY_COST_KIB,
            time_cost: DEFAULT_TIME_COST,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl HasherParams {
    pub fn new(memory_cost_kib: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost_kib,
            time_cost,
            parallelism,
        }
    }
}
