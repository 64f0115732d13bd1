mod command;
mod config;
pub mod power;

use embassy_time::Timer;

use crate::{
    at_command::{ate, ath::DisconnectParameter, At, Disconnect},
    log, Error, ModemPower, Transport,
};
pub use command::{Command, CommandEngine, AT_DEFAULT_TIMEOUT};
pub use config::ModemConfig;

/// Whether the modem has answered since it was last started or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Uninitialized,
    Ready,
}

/// Helper macro that repeatedly attempts to evaluate an expression that returns a result.
///
/// Returns the Result yielded by the expression if
/// - the expression returns `Ok` at any point,
/// - or the expression returns `Err` $attempts time in a row.
macro_rules! try_retry {
    (($label:literal, $attempts:expr, $delay: expr), $e:expr) => {{
        let mut attempt = 0;
        loop {
            let r = $e;

            attempt += 1;
            if r.is_ok() || attempt >= $attempts {
                break r;
            }

            log::warn!(
                "{} failed, attempt {}/{}, retrying after {:?}",
                $label,
                attempt,
                $attempts,
                $delay
            );
            Timer::after($delay).await;
        }
    }};
}

/// A SIM900 modem on the other end of a serial line.
pub struct Sim900<T: Transport, P: ModemPower> {
    commands: CommandEngine<T>,
    power: P,
    echo: bool,
    state: SessionState,
}

impl<T: Transport, P: ModemPower> Sim900<T, P> {
    pub fn new(transport: T, power: P) -> Self {
        Self::with_config(transport, power, ModemConfig::default())
    }

    pub fn with_config(transport: T, power: P, config: ModemConfig) -> Self {
        Sim900 {
            commands: CommandEngine::new(transport, config),
            power,
            // factory default
            echo: true,
            state: SessionState::Uninitialized,
        }
    }

    /// Open the serial line and make sure the modem is listening.
    ///
    /// If the modem does not answer `AT`, it is assumed to be off: the power key is pulsed and
    /// the modem gets [ModemConfig::init_timeout] to report `Call Ready`.
    pub async fn begin(&mut self, baud_rate: u32) -> Result<(), Error> {
        log::info!("initializing modem at {} baud", baud_rate);
        self.state = SessionState::Uninitialized;
        self.commands.configure(baud_rate)?;

        let config = *self.commands.config();
        let probe = try_retry!(
            ("AT", config.probe_attempts, config.probe_timeout),
            self.commands
                .run_with_timeout(config.probe_timeout, At)
                .await
        );

        match probe {
            Ok(_) => {}
            Err(Error::Serial) => return Err(Error::Serial),
            Err(_) => {
                log::warn!("modem not responding, pulsing power key");
                self.power.toggle_power().await;
                self.commands.clear_response();

                let banner = self
                    .commands
                    .wait_until_receive("Call Ready", config.init_timeout)
                    .await?;

                if banner.is_none() {
                    log::error!("modem did not come up");
                    return Err(Error::NotResponding);
                }
            }
        }

        self.state = SessionState::Ready;
        log::info!("modem ready");
        Ok(())
    }

    /// Pulse the reset line. The modem has to be started again with [Sim900::begin].
    pub async fn soft_reset(&mut self) {
        self.power.reset().await;
        self.state = SessionState::Uninitialized;
    }

    /// Pulse the power key, switching the modem off if it is on and on if it is off.
    pub async fn soft_power(&mut self) {
        self.power.toggle_power().await;
        self.state = SessionState::Uninitialized;
    }

    /// Turn command echo on or off.
    pub async fn set_echo(&mut self, echo: bool) -> Result<(), Error> {
        self.commands.run(ate::SetEcho(echo)).await?;
        self.echo = echo;
        Ok(())
    }

    /// Hang up the calls selected by `parameter`.
    pub async fn disconnect(&mut self, parameter: DisconnectParameter) -> Result<(), Error> {
        self.commands.run(Disconnect(parameter)).await?;
        Ok(())
    }

    pub fn commands(&mut self) -> &mut CommandEngine<T> {
        &mut self.commands
    }

    pub fn config(&self) -> &ModemConfig {
        self.commands.config()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the modem echoes commands back, as last set by [Sim900::set_echo].
    pub fn echo(&self) -> bool {
        self.echo
    }

    pub fn release(self) -> (T, P) {
        (self.commands.release(), self.power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at_command::SimError;
    use crate::test::{modem, MockSerial};
    use futures::executor::block_on;

    #[test]
    fn begin_handshake() {
        block_on(async {
            let serial = MockSerial::build()
                .expect_write(b"AT\r\n")
                .reply(b"\r\nOK\r\n")
                .finalize();
            let mut modem = modem(serial);

            assert_eq!(modem.begin(19200).await, Ok(()));
            assert_eq!(modem.state(), SessionState::Ready);

            let (serial, power) = modem.release();
            assert_eq!(serial.baud_rate(), Some(19200));
            assert_eq!(power.toggles, 0);
        })
    }

    #[test]
    fn begin_retries() {
        block_on(async {
            let serial = MockSerial::build()
                .expect_write(b"AT\r\n")
                .expect_write(b"AT\r\n")
                .reply(b"\r\nOK\r\n")
                .finalize();
            let mut modem = modem(serial);

            assert_eq!(modem.begin(9600).await, Ok(()));
            let (serial, power) = modem.release();
            assert_eq!(serial.written(), b"AT\r\nAT\r\n");
            assert_eq!(power.toggles, 0);
        })
    }

    #[test]
    fn begin_powers_on() {
        block_on(async {
            let serial = MockSerial::build()
                .reply_after(400, b"\r\nRDY\r\n\r\n+CFUN: 1\r\n\r\n+CPIN: READY\r\n\r\nCall Ready\r\n")
                .finalize();
            let mut modem = modem(serial);

            assert_eq!(modem.begin(9600).await, Ok(()));
            assert_eq!(modem.state(), SessionState::Ready);

            let (serial, power) = modem.release();
            assert_eq!(serial.written(), b"AT\r\nAT\r\nAT\r\n");
            assert_eq!(power.toggles, 1);
        })
    }

    #[test]
    fn begin_gives_up() {
        block_on(async {
            let mut modem = modem(MockSerial::build().finalize());

            assert_eq!(modem.begin(9600).await, Err(Error::NotResponding));
            assert_eq!(modem.state(), SessionState::Uninitialized);
            assert_eq!(modem.release().1.toggles, 1);
        })
    }

    #[test]
    fn echo() {
        block_on(async {
            let serial = MockSerial::build()
                .expect_write(b"ATE0\r\n")
                .reply(b"ATE0\r\r\nOK\r\n")
                .expect_write(b"ATE1\r\n")
                .reply(b"\r\nERROR\r\n")
                .finalize();
            let mut modem = modem(serial);
            assert!(modem.echo());

            assert_eq!(modem.set_echo(false).await, Ok(()));
            assert!(!modem.echo());

            assert_eq!(
                modem.set_echo(true).await,
                Err(Error::Sim(SimError::Generic))
            );
            assert!(!modem.echo());
        })
    }

    #[test]
    fn hang_up() {
        block_on(async {
            let serial = MockSerial::build()
                .expect_write(b"ATH1\r\n")
                .reply(b"\r\nOK\r\n")
                .finalize();
            let mut modem = modem(serial);

            let result = modem.disconnect(DisconnectParameter::AllChannels).await;
            assert_eq!(result, Ok(()));
        })
    }

    #[test]
    fn pulses_reset_session() {
        block_on(async {
            let serial = MockSerial::build().reply(b"\r\nOK\r\n").finalize();
            let mut modem = modem(serial);
            modem.begin(9600).await.unwrap();

            modem.soft_reset().await;
            assert_eq!(modem.state(), SessionState::Uninitialized);
            modem.soft_power().await;

            let (_, power) = modem.release();
            assert_eq!((power.toggles, power.resets), (1, 1));
        })
    }
}
