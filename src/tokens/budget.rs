//! Token budget policy and the pooled run budget

use crate::domain::config::{default_ratios, DEFAULT_MAX_TOTAL_TOKENS};
use crate::domain::FileCategory;
use std::collections::BTreeMap;

/// Immutable policy: a total ceiling and per-category shares of it.
///
/// Ratios need not sum to 1; categories without a ratio get nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLimits {
    pub max_total: usize,
    pub ratios: BTreeMap<FileCategory, f64>,
}

impl Default for TokenLimits {
    fn default() -> Self {
        Self {
            max_total: DEFAULT_MAX_TOTAL_TOKENS,
            ratios: default_ratios(),
        }
    }
}

impl TokenLimits {
    pub fn new(max_total: usize, ratios: BTreeMap<FileCategory, f64>) -> Self {
        Self { max_total, ratios }
    }

    /// `floor(max_total * ratio)`, or 0 when the category has no ratio.
    pub fn allocation(&self, category: FileCategory) -> i64 {
        self.ratios
            .get(&category)
            .map(|ratio| (self.max_total as f64 * ratio).floor() as i64)
            .unwrap_or(0)
    }
}

pub trait TokenBudget {
    /// Add the category's allocation to the pool. Called once per processed category.
    fn start_category(&mut self, category: FileCategory);
    fn can_afford(&self, count: usize) -> bool;
    /// Deduct `count` without checking; callers check `can_afford` first.
    fn spend(&mut self, count: usize);
}

/// One shared pool fed by each category as it starts.
///
/// Leftover allocation from an earlier category carries forward into later
/// ones. The pool only shrinks through `spend` and may go negative if a
/// caller spends without checking.
#[derive(Debug, Clone)]
pub struct PooledTokenBudget {
    limits: TokenLimits,
    pool: i64,
    spent: usize,
    initial_allocations: BTreeMap<FileCategory, i64>,
}

impl PooledTokenBudget {
    pub fn new(limits: TokenLimits) -> Self {
        let initial_allocations = limits
            .ratios
            .keys()
            .map(|category| (*category, limits.allocation(*category)))
            .collect();
        Self {
            limits,
            pool: 0,
            spent: 0,
            initial_allocations,
        }
    }

    pub fn pool(&self) -> i64 {
        self.pool
    }

    /// Total tokens spent over the run.
    pub fn spent(&self) -> usize {
        self.spent
    }

    pub fn initial_allocation(&self, category: FileCategory) -> i64 {
        self.initial_allocations.get(&category).copied().unwrap_or(0)
    }

    pub fn limits(&self) -> &TokenLimits {
        &self.limits
    }
}

impl TokenBudget for PooledTokenBudget {
    fn start_category(&mut self, category: FileCategory) {
        let allocation = self.initial_allocation(category);
        self.pool += allocation;
        tracing::debug!(%category, allocation, pool = self.pool, "token budget category started");
    }

    fn can_afford(&self, count: usize) -> bool {
        self.pool >= count as i64
    }

    fn spend(&mut self, count: usize) {
        self.pool -= count as i64;
        self.spent += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_total: usize) -> TokenLimits {
        TokenLimits::new(
            max_total,
            BTreeMap::from([(FileCategory::Context, 0.1), (FileCategory::Manifest, 0.05)]),
        )
    }

    #[test]
    fn test_default_limits() {
        let limits = TokenLimits::default();
        assert_eq!(limits.max_total, 200_000);
        assert_eq!(limits.allocation(FileCategory::Context), 20_000);
        assert_eq!(limits.allocation(FileCategory::Manifest), 10_000);
        assert_eq!(limits.allocation(FileCategory::Signal), 10_000);
        assert_eq!(limits.allocation(FileCategory::Source), 80_000);
        assert_eq!(limits.allocation(FileCategory::Unknown), 0);
    }

    #[test]
    fn test_allocation_floors() {
        let limits = TokenLimits::new(99, BTreeMap::from([(FileCategory::Source, 0.5)]));
        assert_eq!(limits.allocation(FileCategory::Source), 49);
    }

    #[test]
    fn test_pool_starts_empty() {
        let budget = PooledTokenBudget::new(limits(1000));
        assert_eq!(budget.pool(), 0);
        assert!(budget.can_afford(0));
        assert!(!budget.can_afford(1));
    }

    #[test]
    fn test_start_category_adds_allocation() {
        let mut budget = PooledTokenBudget::new(limits(1000));
        budget.start_category(FileCategory::Context);
        assert_eq!(budget.pool(), 100);
        budget.start_category(FileCategory::Signal);
        assert_eq!(budget.pool(), 100, "unlisted category adds nothing");
    }

    #[test]
    fn test_leftover_carries_forward() {
        let mut budget = PooledTokenBudget::new(TokenLimits::new(
            1000,
            BTreeMap::from([(FileCategory::Context, 0.1), (FileCategory::Manifest, 0.05)]),
        ));
        budget.start_category(FileCategory::Context);
        assert!(budget.can_afford(30));
        budget.spend(30);
        budget.start_category(FileCategory::Manifest);
        assert_eq!(budget.pool(), 100 - 30 + 50);
        assert_eq!(budget.spent(), 30);
    }

    #[test]
    fn test_can_afford_exact_pool() {
        let mut budget = PooledTokenBudget::new(limits(1000));
        budget.start_category(FileCategory::Manifest);
        assert!(budget.can_afford(50));
        assert!(!budget.can_afford(51));
    }

    #[test]
    fn test_unchecked_spend_goes_negative() {
        let mut budget = PooledTokenBudget::new(limits(1000));
        budget.start_category(FileCategory::Manifest);
        budget.spend(80);
        assert_eq!(budget.pool(), -30);
        assert!(!budget.can_afford(0));
    }
}
