//! Allocation Model
//!
//! Per-option percentage points and their derived quadratic vote weight.
//!
//! ## Invariants
//!
//! - Every entry's percentage is within `[0, 100]`.
//! - `weight == sqrt(percentage)`, recomputed on every change and never set
//!   independently.
//! - A total above 100 is representable (transient while dragging) but not
//!   submittable, and it locks every option still at 0%.
//!
//! All transitions are pure: they return a new [`Allocation`] and leave the
//! receiver untouched.

use serde::Serialize;
use shared_types::{OptionId, PollOption, WeightDistribution, MAX_PERCENTAGE};

/// One row of an allocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AllocationEntry {
    option: PollOption,
    percentage: u8,
    weight: f64,
}

impl AllocationEntry {
    /// Build an entry; `percentage` is clamped to `[0, 100]`.
    pub fn new(option: PollOption, percentage: u8) -> Self {
        let percentage = percentage.min(MAX_PERCENTAGE);
        Self {
            option,
            percentage,
            weight: quadratic_weight(percentage),
        }
    }

    pub fn option(&self) -> &PollOption {
        &self.option
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Displayed vote weight, `sqrt(percentage)`.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn with_percentage(&self, percentage: u8) -> Self {
        Self::new(self.option.clone(), percentage)
    }
}

/// Vote weight bought by `percentage` points.
pub fn quadratic_weight(percentage: u8) -> f64 {
    f64::from(percentage).sqrt()
}

/// Ordered allocation, one entry per poll option in poll order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Allocation {
    entries: Vec<AllocationEntry>,
}

impl Allocation {
    /// Seed an allocation for `options`.
    ///
    /// Without a distribution every option starts at 0%. With one, each
    /// option takes `distribution[option.id]`, defaulting to 0.
    pub fn seed(options: &[PollOption], distribution: Option<&WeightDistribution>) -> Self {
        let entries = options
            .iter()
            .map(|option| {
                let percentage = distribution
                    .map(|d| d.percentage_of(&option.id))
                    .unwrap_or(0);
                AllocationEntry::new(option.clone(), percentage)
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[AllocationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    ///
    /// # Panics
    ///
    /// An out-of-range index is a caller bug and panics.
    pub fn entry(&self, index: usize) -> &AllocationEntry {
        assert!(
            index < self.entries.len(),
            "option index {index} out of range for allocation of {} options",
            self.entries.len()
        );
        &self.entries[index]
    }

    pub fn position_of(&self, option: &OptionId) -> Option<usize> {
        self.entries.iter().position(|e| &e.option.id == option)
    }

    /// Replace the percentage at `index`, clamped to `[0, 100]`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range.
    pub fn set_percentage(&self, index: usize, new_percentage: i32) -> Self {
        let clamped = new_percentage.clamp(0, i32::from(MAX_PERCENTAGE)) as u8;
        let updated = self.entry(index).with_percentage(clamped);

        let mut entries = self.entries.clone();
        entries[index] = updated;
        Self { entries }
    }

    /// Raise `index` by one point; unchanged at 100.
    pub fn increment(&self, index: usize) -> Self {
        let current = self.entry(index).percentage;
        if current >= MAX_PERCENTAGE {
            return self.clone();
        }
        self.set_percentage(index, i32::from(current) + 1)
    }

    /// Lower `index` by one point; unchanged at 0.
    pub fn decrement(&self, index: usize) -> Self {
        let current = self.entry(index).percentage;
        if current == 0 {
            return self.clone();
        }
        self.set_percentage(index, i32::from(current) - 1)
    }

    pub fn total_percentage(&self) -> u32 {
        self.entries.iter().map(|e| u32::from(e.percentage)).sum()
    }

    /// Points still available before the total reaches 100.
    pub fn remaining_budget(&self) -> u32 {
        u32::from(MAX_PERCENTAGE).saturating_sub(self.total_percentage())
    }

    pub fn is_over_budget(&self) -> bool {
        self.total_percentage() > u32::from(MAX_PERCENTAGE)
    }

    /// At least one option allocated and the total within budget.
    pub fn is_submittable(&self) -> bool {
        self.entries.iter().any(|e| e.percentage > 0) && !self.is_over_budget()
    }

    /// Over budget and this option is still at 0%.
    ///
    /// A locked option cannot be raised; lowering other options is always
    /// allowed and unlocks it once the total is back within budget.
    pub fn is_option_locked(&self, index: usize) -> bool {
        self.is_over_budget() && self.entry(index).percentage == 0
    }

    /// One entry per option, zeros included.
    pub fn weight_distribution(&self) -> WeightDistribution {
        self.entries
            .iter()
            .map(|e| (e.option.id.clone(), e.percentage))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(labels: &[&str]) -> Vec<PollOption> {
        labels.iter().map(|l| PollOption::from_label(*l)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_seed_without_distribution_is_all_zero() {
        let alloc = Allocation::seed(&options(&["A", "B"]), None);

        assert_eq!(alloc.len(), 2);
        assert_eq!(alloc.total_percentage(), 0);
        assert!(!alloc.is_submittable());
        assert!(alloc.entries().iter().all(|e| e.weight() == 0.0));
    }

    #[test]
    fn test_seed_from_prior_distribution() {
        let dist: WeightDistribution = [("A".into(), 40), ("B".into(), 30)].into_iter().collect();
        let alloc = Allocation::seed(&options(&["A", "B", "C"]), Some(&dist));

        assert_eq!(alloc.entry(0).percentage(), 40);
        assert!(approx(alloc.entry(0).weight(), 6.325));
        assert_eq!(alloc.entry(1).percentage(), 30);
        assert!(approx(alloc.entry(1).weight(), 5.477));
        assert_eq!(alloc.entry(2).percentage(), 0);
    }

    #[test]
    fn test_seed_uses_option_id_not_label() {
        let opts = vec![PollOption::new("opt-1", "Renamed label")];
        let dist: WeightDistribution = [("opt-1".into(), 25)].into_iter().collect();

        let alloc = Allocation::seed(&opts, Some(&dist));
        assert_eq!(alloc.entry(0).percentage(), 25);
    }

    #[test]
    fn test_set_percentage_clamps_and_recomputes_weight() {
        let alloc = Allocation::seed(&options(&["A"]), None);

        let high = alloc.set_percentage(0, 250);
        assert_eq!(high.entry(0).percentage(), 100);
        assert_eq!(high.entry(0).weight(), 10.0);

        let low = alloc.set_percentage(0, -5);
        assert_eq!(low.entry(0).percentage(), 0);
        assert_eq!(low.entry(0).weight(), 0.0);
    }

    #[test]
    fn test_set_percentage_is_pure() {
        let alloc = Allocation::seed(&options(&["A", "B"]), None);
        let next = alloc.set_percentage(0, 60);

        assert_eq!(alloc.entry(0).percentage(), 0);
        assert_eq!(next.entry(0).percentage(), 60);
        assert!(approx(next.entry(0).weight(), 7.746));
    }

    #[test]
    fn test_increment_and_decrement_stop_at_bounds() {
        let alloc = Allocation::seed(&options(&["A"]), None);
        assert_eq!(alloc.decrement(0), alloc);

        let full = alloc.set_percentage(0, 100);
        assert_eq!(full.increment(0), full);

        assert_eq!(alloc.increment(0).entry(0).percentage(), 1);
        assert_eq!(full.decrement(0).entry(0).percentage(), 99);
    }

    #[test]
    fn test_over_budget_is_not_submittable_until_reduced() {
        let alloc = Allocation::seed(&options(&["A", "B"]), None)
            .set_percentage(0, 80)
            .set_percentage(1, 30);

        assert_eq!(alloc.total_percentage(), 110);
        assert!(!alloc.is_submittable());

        let fixed = alloc.set_percentage(1, 20);
        assert_eq!(fixed.total_percentage(), 100);
        assert!(fixed.is_submittable());
    }

    #[test]
    fn test_zero_options_lock_while_over_budget() {
        let alloc = Allocation::seed(&options(&["A", "B", "C"]), None)
            .set_percentage(0, 80)
            .set_percentage(1, 30);

        assert!(alloc.is_option_locked(2));
        assert!(!alloc.is_option_locked(0));
        assert!(!alloc.is_option_locked(1));

        let unlocked = alloc.decrement(1).decrement(1).decrement(1).decrement(1).decrement(1);
        assert_eq!(unlocked.total_percentage(), 105);
        assert!(unlocked.is_option_locked(2));

        let unlocked = unlocked.set_percentage(1, 20);
        assert!(!unlocked.is_option_locked(2));
    }

    #[test]
    fn test_remaining_budget_saturates() {
        let alloc = Allocation::seed(&options(&["A", "B"]), None).set_percentage(0, 70);
        assert_eq!(alloc.remaining_budget(), 30);

        let over = alloc.set_percentage(1, 50);
        assert_eq!(over.remaining_budget(), 0);
    }

    #[test]
    fn test_weight_distribution_includes_zeros() {
        let alloc = Allocation::seed(&options(&["A", "B"]), None).set_percentage(0, 60);
        let dist = alloc.weight_distribution();

        assert_eq!(dist.len(), 2);
        assert_eq!(dist.get(&"A".into()), Some(60));
        assert_eq!(dist.get(&"B".into()), Some(0));
    }

    #[test]
    fn test_position_of_option() {
        let alloc = Allocation::seed(&options(&["A", "B"]), None);
        assert_eq!(alloc.position_of(&"B".into()), Some(1));
        assert_eq!(alloc.position_of(&"Z".into()), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let alloc = Allocation::seed(&options(&["A"]), None);
        let _ = alloc.set_percentage(3, 10);
    }
}
