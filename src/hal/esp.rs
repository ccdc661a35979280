//! ESP-IDF implementation of [`RecorderIo`].
//!
//! - Microphone: ADC1 oneshot channel, 12-bit, 11 dB attenuation
//! - Buzzer: LEDC channel, 8-bit duty
//! - Buttons: active low with internal pull-up
//! - LEDs: active high
//!
//! Drivers are built by the caller (see `main.rs`) so the LEDC timer and
//! ADC unit outlive this wrapper.

use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::gpio::{ADCPin, AnyIOPin, AnyOutputPin, Input, Output, PinDriver};
use esp_idf_svc::hal::ledc::LedcDriver;
use esp_idf_svc::sys::EspError;

use super::{Control, Indicator, RecorderIo};

/// Recorder peripherals on ESP-IDF.
pub struct EspRecorderIo<'d, T: ADCPin> {
    mic: AdcChannelDriver<'d, T, AdcDriver<'d, T::Adc>>,
    buzzer: LedcDriver<'d>,
    record_button: PinDriver<'d, AnyIOPin, Input>,
    play_button: PinDriver<'d, AnyIOPin, Input>,
    recording_led: PinDriver<'d, AnyOutputPin, Output>,
    playing_led: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d, T: ADCPin> EspRecorderIo<'d, T> {
    /// Wrap configured drivers. LEDs and buzzer start off.
    pub fn new(
        mic: AdcChannelDriver<'d, T, AdcDriver<'d, T::Adc>>,
        buzzer: LedcDriver<'d>,
        record_button: PinDriver<'d, AnyIOPin, Input>,
        play_button: PinDriver<'d, AnyIOPin, Input>,
        recording_led: PinDriver<'d, AnyOutputPin, Output>,
        playing_led: PinDriver<'d, AnyOutputPin, Output>,
    ) -> Result<Self, EspError> {
        let mut io = Self {
            mic,
            buzzer,
            record_button,
            play_button,
            recording_led,
            playing_led,
        };

        io.buzzer.set_duty(0)?;
        io.recording_led.set_low()?;
        io.playing_led.set_low()?;

        Ok(io)
    }
}

impl<T: ADCPin> RecorderIo for EspRecorderIo<'_, T> {
    type Error = EspError;

    #[inline]
    fn now_us(&mut self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions
        unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
    }

    #[inline]
    fn read_raw_sample(&mut self) -> Result<u16, EspError> {
        self.mic.read_raw()
    }

    #[inline]
    fn set_output_level(&mut self, level: u8) -> Result<(), EspError> {
        self.buzzer.set_duty(level as u32)
    }

    #[inline]
    fn control_active(&mut self, control: Control) -> bool {
        match control {
            Control::Record => self.record_button.is_low(),
            Control::Play => self.play_button.is_low(),
        }
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<(), EspError> {
        let led = match indicator {
            Indicator::Recording => &mut self.recording_led,
            Indicator::Playing => &mut self.playing_led,
        };
        led.set_level(on.into())
    }
}
