//! CVB (coefficient-based voltage) curve evaluation.
//!
//! Each frequency step carries its own coefficient row. The curve is a
//! polynomial in the chip's speedo value, and for the extended model also
//! in temperature:
//!
//! ```text
//! cvb_uv   = ((c2 * speedo / s_scale + c1) * speedo / s_scale + c0)
//! cvb_t_uv = cvb_uv
//!          + ((c3 * speedo / s_scale + c4 + c5 * T / t_scale) * T / t_scale)
//! ```
//!
//! Every division rounds to the closest integer, half away from zero, and
//! is applied right after the product it scales. Reordering the terms
//! changes the result by a few microvolts, which is enough to land on a
//! different regulator step, so the order here must stay as written.

pub mod tables;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Microvolts;
use crate::tracing::prelude::*;

/// Speedo values are pre-scaled by this factor in the coefficient units.
pub const SPEEDO_SCALE: i128 = 100;

/// Temperatures are pre-scaled by this factor in the coefficient units.
pub const TEMP_SCALE: i128 = 10;

/// Temperature (°C) the extended model is evaluated at when zones do not
/// supply their own.
pub const CVB_REFERENCE_TEMP_C: i32 = -10;

/// Which polynomial a coefficient table is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CurveModel {
    /// Three coefficients, speedo terms only.
    Legacy,
    /// Six coefficients ("na" tables) with temperature terms.
    Extended,
}

/// Coefficients for one frequency step.
///
/// Legacy rows leave `c3..c5` at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CvbCoef {
    pub c0: i32,
    pub c1: i32,
    pub c2: i32,
    #[serde(default)]
    pub c3: i32,
    #[serde(default)]
    pub c4: i32,
    #[serde(default)]
    pub c5: i32,
}

impl CvbCoef {
    pub const fn legacy(c0: i32, c1: i32, c2: i32) -> Self {
        Self {
            c0,
            c1,
            c2,
            c3: 0,
            c4: 0,
            c5: 0,
        }
    }

    pub const fn extended(c0: i32, c1: i32, c2: i32, c3: i32, c4: i32, c5: i32) -> Self {
        Self {
            c0,
            c1,
            c2,
            c3,
            c4,
            c5,
        }
    }
}

/// One coefficient row per frequency step, lowest frequency first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefTable {
    pub model: CurveModel,
    pub rows: Vec<CvbCoef>,
}

impl CoefTable {
    pub fn new(model: CurveModel, rows: impl Into<Vec<CvbCoef>>) -> Self {
        Self {
            model,
            rows: rows.into(),
        }
    }

    /// Number of frequency steps (`vid_nr`).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw voltage for step `freq_index` at the reference temperature.
    ///
    /// Panics if `freq_index` is out of bounds.
    pub fn evaluate(&self, freq_index: usize, speedo_value: i32) -> Microvolts {
        evaluate(self.model, &self.rows[freq_index], freq_index, speedo_value)
    }

    /// Raw voltage for step `freq_index` at `temp_c`.
    ///
    /// Panics if `freq_index` is out of bounds.
    pub fn evaluate_at(&self, freq_index: usize, speedo_value: i32, temp_c: i32) -> Microvolts {
        evaluate_at(self.model, &self.rows[freq_index], speedo_value, temp_c)
    }
}

/// Evaluate one coefficient row at [`CVB_REFERENCE_TEMP_C`].
///
/// `freq_index` only identifies the row in trace output; the frequency is
/// already encoded in the coefficients.
pub fn evaluate(
    model: CurveModel,
    coef: &CvbCoef,
    freq_index: usize,
    speedo_value: i32,
) -> Microvolts {
    let uv = evaluate_at(model, coef, speedo_value, CVB_REFERENCE_TEMP_C);
    trace!(%model, freq_index, speedo_value, uv, "CVB evaluated");
    uv
}

/// Evaluate one coefficient row at an explicit temperature.
///
/// The temperature only matters for [`CurveModel::Extended`].
pub fn evaluate_at(model: CurveModel, coef: &CvbCoef, speedo_value: i32, temp_c: i32) -> Microvolts {
    let uv = match model {
        CurveModel::Legacy => cvb_voltage(coef, speedo_value.into()),
        CurveModel::Extended => cvb_t_voltage(coef, speedo_value.into(), temp_c.into()),
    };
    saturate(uv)
}

// Products of two 32-bit inputs with a 32-bit speedo can reach ~2^93, so
// intermediates are 128-bit and only the final value is saturated.
fn cvb_voltage(coef: &CvbCoef, speedo: i128) -> i128 {
    let uv = div_round_closest(i128::from(coef.c2) * speedo, SPEEDO_SCALE);
    div_round_closest((uv + i128::from(coef.c1)) * speedo, SPEEDO_SCALE) + i128::from(coef.c0)
}

fn cvb_t_voltage(coef: &CvbCoef, speedo: i128, temp: i128) -> i128 {
    let cvb_uv = cvb_voltage(coef, speedo);

    let t = div_round_closest(i128::from(coef.c3) * speedo, SPEEDO_SCALE)
        + i128::from(coef.c4)
        + div_round_closest(i128::from(coef.c5) * temp, TEMP_SCALE);
    div_round_closest(t * temp, TEMP_SCALE) + cvb_uv
}

/// Integer division rounding to the closest value, ties away from zero.
pub fn div_round_closest(x: i128, divisor: i128) -> i128 {
    if (x > 0) == (divisor > 0) {
        (x + divisor / 2) / divisor
    } else {
        (x - divisor / 2) / divisor
    }
}

fn saturate(uv: i128) -> Microvolts {
    uv.clamp(i128::from(Microvolts::MIN), i128::from(Microvolts::MAX)) as Microvolts
}
