//! Oversampled temperature acquisition.

use crate::calib::Calibration;
use crate::config::OVERSAMPLE;

/// One hardware conversion burst.
///
/// Infallible by contract: the hardware is assumed to complete every
/// burst, and the await is the sampling loop's low-power wait. There are
/// no retries and no error path; a hung converter parks the loop forever.
pub trait BurstAdc {
    async fn read_burst(&mut self, burst: &mut [u16; OVERSAMPLE]);
}

/// Produces one calibrated sample per sampling cycle.
pub struct Sampler<A: BurstAdc> {
    adc: A,
    calibration: Calibration,
}

impl<A: BurstAdc> Sampler<A> {
    pub fn new(adc: A, calibration: Calibration) -> Self {
        Self { adc, calibration }
    }

    /// Run one burst, sum it with half-burst rounding, and map the sum to
    /// degrees truncated to the log's one-byte storage width.
    pub async fn sample(&mut self) -> u8 {
        let mut burst = [0u16; OVERSAMPLE];
        self.adc.read_burst(&mut burst).await;

        let mut raw_sum: i32 = 0;
        for code in burst {
            raw_sum += code as i32;
        }
        raw_sum += (OVERSAMPLE / 2) as i32;

        self.calibration.convert(raw_sum) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers every burst with the same raw codes.
    struct FixedBurst([u16; OVERSAMPLE]);

    impl BurstAdc for FixedBurst {
        async fn read_burst(&mut self, burst: &mut [u16; OVERSAMPLE]) {
            *burst = self.0;
        }
    }

    #[tokio::test]
    async fn test_sum_carries_half_burst_rounding() {
        let cal = Calibration::from_factory(673, 830).unwrap();
        let mut sampler = Sampler::new(FixedBurst([820; OVERSAMPLE]), cal);

        // sum = 8 * 820 + 4 = 6564; (6564 - 4699) * 44 + 512 >> 10 = 80.
        assert_eq!(sampler.sample().await, 80);
    }

    #[tokio::test]
    async fn test_degrees_truncate_to_storage_width() {
        let cal = Calibration::from_factory(673, 830).unwrap();
        let mut sampler = Sampler::new(FixedBurst([400; OVERSAMPLE]), cal);

        // sum = 3204, far below the offset: -64 °C wraps into the log's
        // unsigned byte.
        assert_eq!(sampler.sample().await, (-64i32) as u8);
    }
}
