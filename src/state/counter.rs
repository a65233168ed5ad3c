// Row counter with bounded auto-reset
use serde::Serialize;
use std::collections::BTreeSet;

use super::models::{validate_name, CounterType, ValidationResult};

/// A row counter owned by a part.
///
/// When `reset_row` is non-zero the counter wraps back to zero after reaching
/// `reset_row`, counting each wrap in `current_resets`. Once `current_resets`
/// reaches `max_resets` the counter stops moving forward. A `reset_row` of zero
/// disables wrapping and reset tracking entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counter {
    id: i64,
    name: String,
    description: String,
    current_value: i32,
    can_go_negative: bool,
    increment_by: i32,
    #[serde(rename = "type")]
    counter_type: CounterType,
    is_globally_linked: bool,
    reset_row: i32,
    max_resets: i32,
    current_resets: i32,
    owning_part_id: i64,
}

impl Counter {
    pub fn new(name: impl Into<String>, owning_part_id: i64) -> ValidationResult<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Counter {
            id: 0,
            name,
            description: String::new(),
            current_value: 0,
            can_go_negative: false,
            increment_by: 1,
            counter_type: CounterType::default(),
            is_globally_linked: false,
            reset_row: 0,
            max_resets: 0,
            current_resets: 0,
            owning_part_id,
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_current_value(mut self, current_value: i32) -> Self {
        self.current_value = current_value;
        self
    }

    pub fn with_can_go_negative(mut self, can_go_negative: bool) -> Self {
        self.can_go_negative = can_go_negative;
        self
    }

    pub fn with_increment_by(mut self, increment_by: i32) -> Self {
        self.increment_by = increment_by;
        self
    }

    pub fn with_type(mut self, counter_type: CounterType) -> Self {
        self.counter_type = counter_type;
        self
    }

    pub fn with_globally_linked(mut self, is_globally_linked: bool) -> Self {
        self.is_globally_linked = is_globally_linked;
        self
    }

    pub fn with_reset_row(mut self, reset_row: i32) -> Self {
        self.reset_row = reset_row;
        self
    }

    pub fn with_max_resets(mut self, max_resets: i32) -> Self {
        self.max_resets = max_resets;
        self
    }

    pub fn with_current_resets(mut self, current_resets: i32) -> Self {
        self.current_resets = current_resets;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ValidationResult<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn current_value(&self) -> i32 {
        self.current_value
    }

    pub fn can_go_negative(&self) -> bool {
        self.can_go_negative
    }

    pub fn set_can_go_negative(&mut self, can_go_negative: bool) {
        self.can_go_negative = can_go_negative;
    }

    pub fn increment_by(&self) -> i32 {
        self.increment_by
    }

    pub fn set_increment_by(&mut self, increment_by: i32) {
        self.increment_by = increment_by;
    }

    pub fn counter_type(&self) -> CounterType {
        self.counter_type
    }

    pub fn set_type(&mut self, counter_type: CounterType) {
        self.counter_type = counter_type;
    }

    pub fn is_globally_linked(&self) -> bool {
        self.is_globally_linked
    }

    pub fn set_globally_linked(&mut self, is_globally_linked: bool) {
        self.is_globally_linked = is_globally_linked;
    }

    pub fn reset_row(&self) -> i32 {
        self.reset_row
    }

    pub fn set_reset_row(&mut self, reset_row: i32) {
        self.reset_row = reset_row;
    }

    pub fn max_resets(&self) -> i32 {
        self.max_resets
    }

    pub fn set_max_resets(&mut self, max_resets: i32) {
        self.max_resets = max_resets;
    }

    pub fn current_resets(&self) -> i32 {
        self.current_resets
    }

    pub fn owning_part_id(&self) -> i64 {
        self.owning_part_id
    }

    fn resets_enabled(&self) -> bool {
        self.reset_row > 0
    }

    /// Advance the counter by one step.
    ///
    /// Wraps to zero when the value already sits on `reset_row`, and does
    /// nothing once the reset budget is spent.
    pub fn increment(&mut self) {
        if self.resets_enabled() && self.current_resets == self.max_resets {
            return;
        }

        if self.resets_enabled() && self.current_value == self.reset_row {
            self.current_value = 0;
            self.increment_current_resets();
        } else {
            self.current_value = self.current_value.saturating_add(self.increment_by);
        }
    }

    /// Step the counter back, flooring at zero unless negatives are allowed
    pub fn decrement(&mut self) {
        let next = self.current_value.saturating_sub(self.increment_by);
        self.current_value = if next < 0 && !self.can_go_negative {
            0
        } else {
            next
        };
    }

    pub fn increment_current_resets(&mut self) {
        if !self.resets_enabled() || self.current_resets == self.max_resets {
            return;
        }
        self.current_resets += 1;
    }

    pub fn decrement_current_resets(&mut self) {
        if !self.resets_enabled() || self.current_resets == 0 {
            return;
        }
        self.current_resets -= 1;
    }
}

/// Apply one increment of each part's global counter.
///
/// For every part that has a `Global` counter in `counters`, that counter and
/// the part's globally linked `Normal` counters are incremented. Counters of
/// parts without a `Global` counter, stitch counters and unlinked counters are
/// left alone. Returns how many counters were touched.
pub fn mirror_global_increment(counters: &mut [Counter]) -> usize {
    let parts_with_global: BTreeSet<i64> = counters
        .iter()
        .filter(|c| c.counter_type() == CounterType::Global)
        .map(Counter::owning_part_id)
        .collect();

    let mut touched = 0;
    for counter in counters.iter_mut() {
        if !parts_with_global.contains(&counter.owning_part_id()) {
            continue;
        }
        let follows_global = match counter.counter_type() {
            CounterType::Global => true,
            CounterType::Normal => counter.is_globally_linked(),
            CounterType::Stitch => false,
        };
        if follows_global {
            counter.increment();
            touched += 1;
        }
    }
    touched
}
