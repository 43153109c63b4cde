//! User-Agent rotation
//!
//! Every outgoing request carries an identity picked uniformly at random from
//! a fixed pool. The pool owns its random source, so a seeded pool yields a
//! reproducible sequence. This is presentation only and carries no security
//! meaning.

use crate::config::DEFAULT_USER_AGENTS;
use crate::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// A fixed set of User-Agent strings with its own random source
#[derive(Debug)]
pub struct UserAgentPool {
    agents: Vec<String>,
    rng: Mutex<StdRng>,
}

impl UserAgentPool {
    /// Creates a pool seeded from the operating system
    ///
    /// # Returns
    ///
    /// * `Ok(UserAgentPool)` - The pool
    /// * `Err(ConfigError)` - `agents` was empty
    pub fn new(agents: Vec<String>) -> Result<Self, ConfigError> {
        Self::with_rng(agents, StdRng::from_os_rng())
    }

    /// Creates a pool whose picks are fully determined by `seed`
    pub fn seeded(agents: Vec<String>, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(agents, StdRng::seed_from_u64(seed))
    }

    fn with_rng(agents: Vec<String>, rng: StdRng) -> Result<Self, ConfigError> {
        if agents.is_empty() {
            return Err(ConfigError::Validation(
                "user agent pool cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            agents,
            rng: Mutex::new(rng),
        })
    }

    /// Picks one identity uniformly at random
    pub fn pick(&self) -> &str {
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.random_range(0..self.agents.len())
        };
        &self.agents[index]
    }

    /// All identities in the pool
    pub fn agents(&self) -> &[String] {
        &self.agents
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}
