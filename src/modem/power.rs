use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;

use crate::{log, ModemPower};

/// How long the power key is held to switch the modem on or off.
pub const POWER_KEY_PULSE: Duration = Duration::from_millis(1200);

/// SIM900 min reset pulse 50us
pub const RESET_PULSE: Duration = Duration::from_millis(150);

/// Drives the SIM900 `PWRKEY` and `NRESET` lines through GPIO pins.
///
/// Both pins are assumed to switch a transistor pulling the modem line low, so a pulse is
/// high, hold, low on the pin.
pub struct PowerPins<K: OutputPin, R: OutputPin> {
    power_key: K,
    reset: R,
    power_pulse: Duration,
    reset_pulse: Duration,
}

impl<K: OutputPin, R: OutputPin> PowerPins<K, R> {
    pub fn new(power_key: K, reset: R) -> Self {
        Self::with_pulse_lengths(power_key, reset, POWER_KEY_PULSE, RESET_PULSE)
    }

    pub fn with_pulse_lengths(
        power_key: K,
        reset: R,
        power_pulse: Duration,
        reset_pulse: Duration,
    ) -> Self {
        PowerPins {
            power_key,
            reset,
            power_pulse,
            reset_pulse,
        }
    }

    pub fn release(self) -> (K, R) {
        (self.power_key, self.reset)
    }
}

async fn pulse<P: OutputPin>(pin: &mut P, length: Duration, name: &str) {
    if pin.set_high().is_err() {
        log::warn!("failed to raise {} pin", name);
    }
    Timer::after(length).await;
    if pin.set_low().is_err() {
        log::warn!("failed to lower {} pin", name);
    }
}

impl<K: OutputPin, R: OutputPin> ModemPower for PowerPins<K, R> {
    async fn toggle_power(&mut self) {
        log::debug!("pulsing power key");
        pulse(&mut self.power_key, self.power_pulse, "power key").await;
    }

    async fn reset(&mut self) {
        log::debug!("pulsing reset");
        pulse(&mut self.reset, self.reset_pulse, "reset").await;
    }
}

/// For boards where the modem power is not wired to the microcontroller.
pub struct NoPowerControl;

impl ModemPower for NoPowerControl {
    async fn toggle_power(&mut self) {}

    async fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_time::Instant;
    use embedded_hal::digital::ErrorType;
    use futures::executor::block_on;

    #[derive(Default)]
    struct RecordingPin {
        levels: Vec<(bool, Instant)>,
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push((false, Instant::now()));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push((true, Instant::now()));
            Ok(())
        }
    }

    #[test]
    fn pulses() {
        block_on(async {
            let mut pins = PowerPins::with_pulse_lengths(
                RecordingPin::default(),
                RecordingPin::default(),
                Duration::from_millis(30),
                Duration::from_millis(10),
            );

            pins.toggle_power().await;
            pins.reset().await;
            pins.reset().await;

            let (power_key, reset) = pins.release();
            assert_eq!(power_key.levels.len(), 2);
            assert!(power_key.levels[0].0);
            assert!(!power_key.levels[1].0);
            assert!(power_key.levels[1].1 - power_key.levels[0].1 >= Duration::from_millis(30));

            let levels: Vec<bool> = reset.levels.iter().map(|(level, _)| *level).collect();
            assert_eq!(levels, [true, false, true, false]);
        })
    }
}
