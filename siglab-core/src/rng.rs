//! Explicit seeded RNG hierarchy.
//!
//! The run seed is carried in a value instead of seeding process-global
//! state. Components that need randomness ask for their own `StdRng`,
//! derived by hashing `(seed, component)` with BLAKE3, so streams are
//! independent of the order components are constructed in.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Deterministic sub-seed for a named component.
    pub fn sub_seed(&self, component: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(component.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Seeded generator for a named component.
    pub fn rng_for(&self, component: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(component))
    }
}
