//! RustMicRecorder - Main entry point
//!
//! 1. Initialize hardware (ADC mic, LEDC buzzer, buttons, LEDs)
//! 2. Allocate capture/playback buffers once
//! 3. Poll the session controller forever, draining logs while idle
//!
//! Hold button A to record, press button B to play back.

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!("===== {} =====", env!("VERSION_STRING"));
    println!("{}", rust_mic_recorder::RecorderConfig::DEFAULT);
    eprintln!("firmware runs on ESP-IDF targets only (e.g. --target xtensa-esp32s3-espidf)");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::adc::attenuation::DB_11;
    use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_svc::hal::delay::{Ets, FreeRtos};
    use esp_idf_svc::hal::gpio::{IOPin, OutputPin, PinDriver, Pull};
    use esp_idf_svc::hal::ledc::config::TimerConfig;
    use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use rust_mic_recorder::hal::EspRecorderIo;
    use rust_mic_recorder::{
        logging, rec_error, LogStream, RecorderConfig, RecorderIo, Session,
        SessionStatus, CAPTURE_CAPACITY,
    };

    /// PWM carrier; far above the 4 kHz audio band.
    const PWM_CARRIER_HZ: u32 = 40_000;

    /// Time for the user to open the serial monitor.
    const STARTUP_DELAY_MS: u32 = 5_000;

    /// Idle poll interval; also lets the IDLE task feed the watchdog.
    const IDLE_POLL_MS: u32 = 10;

    static LOG_STREAM: LogStream = LogStream::new();
    static STATUS: SessionStatus = SessionStatus::new();

    pub fn run() -> Result<(), EspError> {
        // Initialize ESP-IDF
        esp_idf_svc::sys::link_patches();

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // Microphone on GPIO2 (ADC1 channel 1)
        let adc = AdcDriver::new(peripherals.adc1)?;
        let mic_config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let mic = AdcChannelDriver::new(adc, pins.gpio2, &mic_config)?;

        // Buzzer on GPIO21, 8-bit duty
        let timer = LedcTimerDriver::new(
            peripherals.ledc.timer0,
            &TimerConfig::new()
                .frequency(Hertz(PWM_CARRIER_HZ))
                .resolution(Resolution::Bits8),
        )?;
        let buzzer = LedcDriver::new(peripherals.ledc.channel0, &timer, pins.gpio21)?;

        // Buttons A/B (active low), red/green LEDs
        let mut record_button = PinDriver::input(pins.gpio5.downgrade())?;
        record_button.set_pull(Pull::Up)?;
        let mut play_button = PinDriver::input(pins.gpio6.downgrade())?;
        play_button.set_pull(Pull::Up)?;
        let recording_led = PinDriver::output(pins.gpio13.downgrade_output())?;
        let playing_led = PinDriver::output(pins.gpio11.downgrade_output())?;

        let mut io = EspRecorderIo::new(
            mic,
            buzzer,
            record_button,
            play_button,
            recording_led,
            playing_led,
        )?;

        // Single allocation for the process lifetime
        let config = RecorderConfig::DEFAULT;
        let mut capture_storage = vec![0u16; CAPTURE_CAPACITY].into_boxed_slice();
        let mut playback_storage = vec![0u8; CAPTURE_CAPACITY].into_boxed_slice();

        let mut session = Session::new(
            config,
            &mut capture_storage,
            &mut playback_storage,
            &LOG_STREAM,
            &STATUS,
        )
        .unwrap_or_else(|e| panic!("recorder configuration rejected: {}", e));

        FreeRtos::delay_ms(STARTUP_DELAY_MS);

        println!("\n===== {} =====", env!("VERSION_STRING"));
        println!("{}\n", config);
        println!("1. Hold button A to record");
        println!("2. Press button B to play back\n");

        let mut console = String::new();

        loop {
            let state = match session.poll(&mut io) {
                Ok(state) => state,
                Err(e) => {
                    let now_us = io.now_us();
                    rec_error!(LOG_STREAM, now_us, "peripheral error: {:?}", e);
                    session.state()
                }
            };

            // Console output blocks; only flush between sessions
            if !state.is_active() && (LOG_STREAM.pending() > 0 || LOG_STREAM.dropped() > 0) {
                console.clear();
                let _ = logging::drain_into(&LOG_STREAM, &mut console);
                print!("{}", console);
            }

            if state.is_active() {
                Ets::delay_us(config.idle_delay_us);
            } else {
                FreeRtos::delay_ms(IDLE_POLL_MS);
            }
        }
    }
}
