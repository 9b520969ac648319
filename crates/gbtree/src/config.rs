use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};

/// Default balancing constant `C`: the tree height stays below `C * log2(n) + 1`.
pub const DEFAULT_BALANCE: f64 = 1.35;

/// Default bound on `deletions since last rebuild / weight`.
pub const DEFAULT_MAX_DELETIONS: usize = 10;

/// Default maximum supported tree height. Requires `C * log2(n_max) < 40`.
pub const DEFAULT_MAX_HEIGHT: usize = 40;

/// Number of levels shown by [`Dictionary::dump`](crate::Dictionary::dump).
pub const DUMP_DEPTH: usize = 8;

/// Column width the dump right-aligns keys against.
pub const SCREEN_WIDTH: usize = 40;

/// Construction-time parameters of a dictionary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Balancing constant `C`, must be greater than 1.
    pub balance: f64,
    /// A full rebuild happens once deletions exceed `max_deletions * weight`.
    pub max_deletions: usize,
    /// Deepest level an insertion may reach.
    pub max_height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            max_deletions: DEFAULT_MAX_DELETIONS,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl Config {
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_max_deletions(mut self, max_deletions: usize) -> Self {
        self.max_deletions = max_deletions;
        self
    }

    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.balance.is_finite() || self.balance <= 1.0 {
            return Err(Error::InvalidConfig(format!(
                "balance constant must be a finite value greater than 1, got {}",
                self.balance
            )));
        }
        if self.max_height == 0 {
            return Err(Error::InvalidConfig(
                "maximum height must be at least 1".to_string(),
            ));
        }
        let top = raw_min_weight(self.balance, self.max_height);
        if !top.is_finite() || top >= usize::MAX as f64 {
            return Err(Error::InvalidConfig(format!(
                "minimum weight at height {} overflows with balance {}",
                self.max_height, self.balance
            )));
        }
        Ok(())
    }

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn raw_min_weight(balance: f64, depth: usize) -> f64 {
    ((depth - 1) as f64 / balance * std::f64::consts::LN_2)
        .exp()
        .floor()
}

/// Lower bound on subtree weight per depth (root is depth 1).
///
/// After an insertion and its rebalancing, every subtree rooted at depth `d`
/// weighs at least `get(d)`. Depths outside `1..=max_height()` have no entry.
#[derive(Debug, PartialEq, Eq)]
pub struct MinWeightTable {
    weights: Vec<usize>,
}

impl MinWeightTable {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut weights = Vec::new();
        weights.try_reserve_exact(config.max_height + 1)?;
        weights.push(0);
        for depth in 1..=config.max_height {
            weights.push(raw_min_weight(config.balance, depth) as usize + 1);
        }
        Ok(Self { weights })
    }

    /// Table for `config`; the default configuration shares one process-wide table.
    pub(crate) fn shared(config: &Config) -> Result<Arc<Self>> {
        static DEFAULT: OnceLock<Arc<MinWeightTable>> = OnceLock::new();

        if config.is_default() {
            if let Some(table) = DEFAULT.get() {
                return Ok(Arc::clone(table));
            }
            let table = Arc::new(Self::new(config)?);
            return Ok(Arc::clone(DEFAULT.get_or_init(|| table)));
        }
        Ok(Arc::new(Self::new(config)?))
    }

    /// Minimum weight at `depth`, or `None` outside `1..=max_height()`.
    pub fn get(&self, depth: usize) -> Option<usize> {
        if depth == 0 {
            return None;
        }
        self.weights.get(depth).copied()
    }

    /// Callers guarantee `1 <= depth <= max_height()`.
    #[inline]
    pub(crate) fn at(&self, depth: usize) -> usize {
        debug_assert!((1..self.weights.len()).contains(&depth));
        self.weights[depth]
    }

    pub fn max_height(&self) -> usize {
        self.weights.len() - 1
    }
}
