//! Signal conditioner: raw ADC reading to PWM duty level.
//!
//! Stateless transform applied once per captured sample when playback is
//! prepared:
//!
//! 1. raw → volts: `raw * reference / full_scale`
//! 2. remove DC bias, apply gain: `(v - offset) * gain`
//! 3. restore bias: `+ offset`
//! 4. clip to `[0, reference]`
//! 5. rescale to duty: `floor(v / reference * output_max)`
//!
//! Clipping in step 4 is the limiter for gain-induced overflow, not an error.

use crate::config::RecorderConfig;

/// Raw-sample to duty-level transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalConditioner {
    full_scale: f32,
    reference_volts: f32,
    offset_volts: f32,
    gain: f32,
    output_max: f32,
}

impl SignalConditioner {
    /// Create conditioner.
    ///
    /// # Arguments
    /// * `full_scale_max` - Highest raw reading (e.g. 4095 for 12-bit)
    /// * `reference_volts` - Voltage at full scale, also the clip ceiling
    /// * `offset_volts` - DC bias removed before gain and restored after
    /// * `gain` - Linear gain around the bias
    /// * `output_max` - Highest duty level
    pub fn new(
        full_scale_max: u16,
        reference_volts: f32,
        offset_volts: f32,
        gain: f32,
        output_max: u8,
    ) -> Self {
        Self {
            full_scale: full_scale_max as f32,
            reference_volts,
            offset_volts,
            gain,
            output_max: output_max as f32,
        }
    }

    /// Create conditioner from recorder configuration.
    pub fn from_config(config: &RecorderConfig) -> Self {
        Self::new(
            config.adc_full_scale,
            config.reference_volts,
            config.dc_offset_volts,
            config.gain,
            config.output_max,
        )
    }

    /// Convert a raw reading to volts.
    #[inline]
    pub fn to_volts(&self, raw_sample: u16) -> f32 {
        raw_sample as f32 * self.reference_volts / self.full_scale
    }

    /// Condition one raw sample into a duty level.
    #[inline]
    pub fn condition(&self, raw_sample: u16) -> u8 {
        let voltage = self.to_volts(raw_sample);

        let mut processed = (voltage - self.offset_volts) * self.gain;
        processed += self.offset_volts;

        if processed > self.reference_volts {
            processed = self.reference_volts;
        } else if processed < 0.0 {
            processed = 0.0;
        }

        // Non-negative and at most output_max: truncating cast is floor
        (processed / self.reference_volts * self.output_max) as u8
    }

    /// Condition `raw` into `out`, index by index.
    ///
    /// Processes `min(raw.len(), out.len())` samples and returns that count.
    pub fn condition_into(&self, raw: &[u16], out: &mut [u8]) -> usize {
        let count = raw.len().min(out.len());
        for (level, &sample) in out[..count].iter_mut().zip(&raw[..count]) {
            *level = self.condition(sample);
        }
        count
    }
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self::from_config(&RecorderConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scale_is_reference() {
        let cond = SignalConditioner::new(4095, 3.3, 0.0, 1.0, 255);
        assert_eq!(cond.to_volts(0), 0.0);
        assert_eq!(cond.to_volts(4095), 3.3);
        assert_eq!(cond.condition(4095), 255);
    }

    #[test]
    fn test_condition_into_stops_at_shorter_slice() {
        let cond = SignalConditioner::new(4095, 3.3, 0.0, 1.0, 255);
        let raw = [0u16, 4095, 4095];
        let mut out = [7u8; 2];
        assert_eq!(cond.condition_into(&raw, &mut out), 2);
        assert_eq!(out, [0, 255]);
    }
}
