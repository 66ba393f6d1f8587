//! Two-point factory calibration for the on-chip temperature sensor.
//!
//! The factory stores the raw ADC codes the sensor produced at 30 °C and
//! 85 °C. Those two points define a linear transform from an oversampled
//! raw sum to whole degrees Celsius:
//!
//! `t = (55 * x + 30 * t85 - 85 * t30) / (t85 - t30)`
//!
//! rearranged as `t = (x - offset) * scale / 1024`, where `scale` carries
//! a ×128 fixed-point factor and `offset` is pre-scaled by ×8 to line up
//! with the eight-conversion sum the sampler feeds in.

use thiserror_no_std::Error;

/// Fixed-point factor folded into [`Calibration::scale`].
const SCALE_FACTOR: i32 = 128;

/// Pre-scale applied to the intercept so it matches the oversampled sum,
/// and the rounding constant (11 / 2) that makes the division by 11 round
/// to nearest.
const OFFSET_FACTOR: i32 = 8;
const OFFSET_ROUNDING: i32 = 6;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Both factory reference codes are identical, so no slope exists.
    /// A defect in the calibration segment, not a runtime condition:
    /// initialization must not proceed past it.
    #[error("factory reference codes for 30 °C and 85 °C coincide")]
    CoincidentReferences,
}

/// Linear raw-code → degrees-Celsius transform. Pure function of the two
/// factory constants; immutable after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    scale: i32,
    offset: i32,
}

impl Calibration {
    /// Derive the transform from the factory codes at 30 °C and 85 °C.
    pub fn from_factory(t30: u16, t85: u16) -> Result<Self, CalibrationError> {
        if t30 == t85 {
            return Err(CalibrationError::CoincidentReferences);
        }

        let (t30, t85) = (t30 as i32, t85 as i32);
        let scale = 55 * SCALE_FACTOR / (t85 - t30);
        let offset = ((17 * t30 - 6 * t85) * OFFSET_FACTOR + OFFSET_ROUNDING) / 11;

        Ok(Self { scale, offset })
    }

    /// Map an oversampled raw sum to whole degrees Celsius.
    ///
    /// Fixed-point divide by 1024 with round-to-nearest; the arithmetic
    /// shift keeps sums below the offset on the negative side.
    #[inline]
    pub fn convert(&self, raw_sum: i32) -> i32 {
        ((raw_sum - self.offset) * self.scale + 512) >> 10
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}
