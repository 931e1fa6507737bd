//! Quantization to a rail's discrete voltage steps.

use serde::{Deserialize, Serialize};

use crate::Microvolts;
use crate::error::{Error, Result};

/// Discrete voltages a rail can produce, addressed by selector.
pub trait VoltageSteps {
    /// Number of selectors.
    fn count_voltages(&self) -> usize;

    /// Voltage for `selector`, or `None` if that selector is unusable.
    fn list_voltage(&self, selector: usize) -> Option<Microvolts>;
}

/// Round `uv` up to the smallest supported step at or above it.
///
/// Selectors need not be sorted. Fails with [`Error::OutOfRange`] when
/// `uv` exceeds every step, and [`Error::NoVoltageSteps`] when there are
/// no usable steps at all.
pub fn round_voltage<S: VoltageSteps + ?Sized>(steps: &S, uv: Microvolts) -> Result<Microvolts> {
    let mut best: Option<Microvolts> = None;
    let mut max_uv: Option<Microvolts> = None;

    for selector in 0..steps.count_voltages() {
        let Some(step_uv) = steps.list_voltage(selector) else {
            continue;
        };

        max_uv = Some(max_uv.map_or(step_uv, |max| max.max(step_uv)));
        if step_uv >= uv {
            best = Some(best.map_or(step_uv, |best| best.min(step_uv)));
        }
    }

    match (best, max_uv) {
        (Some(rounded), _) => Ok(rounded),
        (None, Some(max_uv)) => Err(Error::OutOfRange { uv, max_uv }),
        (None, None) => Err(Error::NoVoltageSteps),
    }
}

/// An explicit list of step voltages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepList(pub Vec<Microvolts>);

impl VoltageSteps for StepList {
    fn count_voltages(&self) -> usize {
        self.0.len()
    }

    fn list_voltage(&self, selector: usize) -> Option<Microvolts> {
        self.0.get(selector).copied()
    }
}

/// Evenly spaced steps: `min_uv + selector * step_uv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearRange {
    pub min_uv: Microvolts,
    pub step_uv: Microvolts,
    pub n_steps: usize,
}

impl LinearRange {
    pub const fn new(min_uv: Microvolts, step_uv: Microvolts, n_steps: usize) -> Self {
        Self {
            min_uv,
            step_uv,
            n_steps,
        }
    }

    /// Highest voltage in the range, if it has any steps.
    pub fn max_uv(&self) -> Option<Microvolts> {
        self.n_steps
            .checked_sub(1)
            .and_then(|last| self.list_voltage(last))
    }
}

impl VoltageSteps for LinearRange {
    fn count_voltages(&self) -> usize {
        self.n_steps
    }

    fn list_voltage(&self, selector: usize) -> Option<Microvolts> {
        if selector >= self.n_steps {
            return None;
        }
        let offset = Microvolts::try_from(selector).ok()?.checked_mul(self.step_uv)?;
        self.min_uv.checked_add(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn range() -> LinearRange {
        // 500mV..=3V in 10mV steps
        LinearRange::new(500_000, 10_000, 251)
    }

    #[test_case(950_000, 950_000; "exact step")]
    #[test_case(1_786_666, 1_790_000; "rounds up")]
    #[test_case(1_780_001, 1_790_000; "just above a step")]
    #[test_case(100_000, 500_000; "below range clamps to lowest")]
    #[test_case(3_000_000, 3_000_000; "highest step")]
    fn should_round_up_to_next_step(uv: Microvolts, expected: Microvolts) {
        assert_eq!(round_voltage(&range(), uv).unwrap(), expected);
    }

    #[test]
    fn should_fail_above_highest_step() {
        let err = round_voltage(&range(), 3_000_001).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                uv: 3_000_001,
                max_uv: 3_000_000
            }
        ));
    }

    #[test]
    fn should_fail_without_steps() {
        let err = round_voltage(&StepList(vec![]), 900_000).unwrap_err();
        assert!(matches!(err, Error::NoVoltageSteps));
    }

    #[test_case(612_345; "odd value")]
    #[test_case(950_000; "on a step")]
    #[test_case(1_234_567; "mid range")]
    fn should_be_idempotent(uv: Microvolts) {
        let once = round_voltage(&range(), uv).unwrap();
        assert_eq!(round_voltage(&range(), once).unwrap(), once);
    }

    #[test]
    fn should_handle_unsorted_list() {
        let steps = StepList(vec![1_000_000, 800_000, 900_000]);
        assert_eq!(round_voltage(&steps, 850_000).unwrap(), 900_000);
        assert_eq!(round_voltage(&steps, 700_000).unwrap(), 800_000);
    }

    #[test]
    fn should_list_linear_range() {
        let range = LinearRange::new(600_000, 6_250, 4);
        assert_eq!(range.list_voltage(0), Some(600_000));
        assert_eq!(range.list_voltage(3), Some(618_750));
        assert_eq!(range.list_voltage(4), None);
        assert_eq!(range.max_uv(), Some(618_750));
        assert_eq!(LinearRange::new(600_000, 6_250, 0).max_uv(), None);
    }
}
