use embassy_time::Duration;

use super::AT_DEFAULT_TIMEOUT;

/// Timing knobs of a [Sim900](crate::Sim900).
///
/// The defaults follow the maximum response times from the SIM900 AT command manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig {
    /// How many times `begin` sends `AT` before falling back to the power key.
    pub probe_attempts: u32,

    /// How long to wait for the answer to each `AT` probe.
    pub probe_timeout: Duration,

    /// How long to wait for `Call Ready` after pulsing the power key.
    pub init_timeout: Duration,

    /// Timeout of commands that don't have their own.
    pub command_timeout: Duration,

    /// Once a response has started, how long the line may stay quiet before the response is
    /// considered complete. `None` keeps listening for the full timeout of the operation.
    pub max_idle_gap: Option<Duration>,

    /// AT+CIICR
    pub bring_up_timeout: Duration,

    /// AT+CIPSTART, until `CONNECT OK`
    pub connect_timeout: Duration,

    /// AT+CDNSGIP, until the `+CDNSGIP` result
    pub dns_timeout: Duration,

    /// AT+CIPSHUT
    pub shutdown_timeout: Duration,

    /// AT+CIPSEND and AT+CMGS, until the modem confirms the transfer
    pub send_timeout: Duration,
}

impl Default for ModemConfig {
    fn default() -> Self {
        ModemConfig {
            probe_attempts: 3,
            probe_timeout: Duration::from_millis(100),
            init_timeout: Duration::from_secs(10),
            command_timeout: AT_DEFAULT_TIMEOUT,
            max_idle_gap: Some(Duration::from_millis(100)),
            bring_up_timeout: Duration::from_secs(85),
            connect_timeout: Duration::from_secs(75),
            dns_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(65),
            send_timeout: Duration::from_secs(60),
        }
    }
}

impl ModemConfig {
    /// The quiet period that ends a response to an operation with the given timeout.
    pub fn idle_gap(&self, timeout: Duration) -> Duration {
        match self.max_idle_gap {
            Some(gap) if gap < timeout => gap,
            _ => timeout,
        }
    }
}
