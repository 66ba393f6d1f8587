//! ADC burst adapter for the temperature sense channel.

use esp_hal::Async;
use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::peripherals::{ADC1, GPIO2};

use thermolog_core::config::OVERSAMPLE;
use thermolog_core::sampler::BurstAdc;

/// The temperature sense input on ADC1 (GPIO2 is ADC1 channel 2 on the
/// C3). One burst is [`OVERSAMPLE`] back-to-back oneshot conversions;
/// each await is the conversion-complete wait of the sampling loop.
pub struct SenseAdc<'d> {
    adc: Adc<'d, ADC1<'d>, Async>,
    pin: AdcPin<GPIO2<'d>, ADC1<'d>>,
}

impl<'d> SenseAdc<'d> {
    pub fn new(adc1: ADC1<'d>, sense_pin: GPIO2<'d>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(sense_pin, Attenuation::_11dB);
        Self {
            adc: Adc::new(adc1, config).into_async(),
            pin,
        }
    }
}

impl BurstAdc for SenseAdc<'_> {
    async fn read_burst(&mut self, burst: &mut [u16; OVERSAMPLE]) {
        for slot in burst {
            *slot = self.adc.read_oneshot(&mut self.pin).await;
        }
    }
}
