use embassy_time::Duration;

use super::ModemConfig;
use crate::at_command::{AtRequest, AtResponse};
use crate::read::{read_response, ResponseBuffer, RX_BUFFER_SIZE};
use crate::{log, Error, Transport};

/// The default timeout of AT commands
pub const AT_DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

const LINE_END: &str = "\r\n";

/// A single command line, sent with [CommandEngine::send_command].
#[derive(Debug, Clone, Copy)]
pub struct Command<'a> {
    text: &'a str,
    prefix: bool,
    timeout: Duration,
}

impl<'a> Command<'a> {
    /// `text` is sent after an `AT` prefix, so `Command::at("+CIFSR")` sends `AT+CIFSR`.
    pub const fn at(text: &'a str) -> Self {
        Command {
            text,
            prefix: true,
            timeout: AT_DEFAULT_TIMEOUT,
        }
    }

    /// `text` is sent as is.
    pub const fn raw(text: &'a str) -> Self {
        Command {
            text,
            prefix: false,
            timeout: AT_DEFAULT_TIMEOUT,
        }
    }

    /// How long to wait for the first byte of the response.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Command { timeout, ..self }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Sends commands to the modem and collects what it says back.
///
/// There is only ever one command in flight. Every response is gathered into a single buffer
/// which stays available for inspection until the next command is sent.
pub struct CommandEngine<T: Transport> {
    transport: T,
    buffer: ResponseBuffer<RX_BUFFER_SIZE>,
    config: ModemConfig,
}

impl<T: Transport> CommandEngine<T> {
    pub fn new(transport: T, config: ModemConfig) -> Self {
        CommandEngine {
            transport,
            buffer: ResponseBuffer::new(),
            config,
        }
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Set up the transport for the given baud rate.
    pub fn configure(&mut self, baud_rate: u32) -> Result<(), Error> {
        self.transport.configure(baud_rate).map_err(|_| {
            log::error!("failed to configure serial port at {} baud", baud_rate);
            Error::Serial
        })
    }

    /// Send raw bytes to the modem, use with care.
    ///
    /// The response buffer is left untouched.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.transport
            .write_all(bytes)
            .await
            .map_err(|_| Error::Serial)?;
        self.transport.flush().await.map_err(|_| Error::Serial)
    }

    pub async fn write_str(&mut self, text: &str) -> Result<(), Error> {
        self.write(text.as_bytes()).await
    }

    /// Send a command and collect the response.
    ///
    /// Returns the number of bytes received, 0 if the modem stayed silent for the timeout of
    /// the command.
    pub async fn send_command(&mut self, command: &Command<'_>) -> Result<usize, Error> {
        log::debug!(
            "sending AT command: {}{}",
            if command.prefix { "AT" } else { "" },
            command.text
        );

        self.buffer.clear();

        self.write_command(command)
            .await
            .map_err(|_| Error::Serial)?;

        self.read_response(command.timeout, false).await
    }

    async fn write_command(&mut self, command: &Command<'_>) -> Result<(), T::Error> {
        if command.prefix {
            self.transport.write_all(b"AT").await?;
        }
        self.transport.write_all(command.text.as_bytes()).await?;
        self.transport.write_all(LINE_END.as_bytes()).await?;
        self.transport.flush().await
    }

    /// Send a command, and check whether the response contains `expected`.
    pub async fn send_command_expecting(
        &mut self,
        command: &Command<'_>,
        expected: &str,
    ) -> Result<bool, Error> {
        if self.send_command(command).await? == 0 {
            return Ok(false);
        }

        Ok(self.response_contains(expected))
    }

    /// Read whatever the modem sends within `timeout`, and until it goes quiet.
    ///
    /// With `append` set, the bytes are added to the current response instead of replacing it.
    pub async fn read_response(&mut self, timeout: Duration, append: bool) -> Result<usize, Error> {
        let idle_gap = self.config.idle_gap(timeout);
        read_response(&mut self.transport, &mut self.buffer, timeout, idle_gap, append).await
    }

    /// Wait until `pattern` shows up in the response.
    ///
    /// Returns the offset of the match, or `None` if the modem went silent for `timeout`
    /// without sending it.
    pub async fn wait_until_receive(
        &mut self,
        pattern: &str,
        timeout: Duration,
    ) -> Result<Option<usize>, Error> {
        self.wait_until_receive_from(pattern, 0, timeout).await
    }

    /// Like [CommandEngine::wait_until_receive], but only considers matches at or after `start`.
    pub async fn wait_until_receive_from(
        &mut self,
        pattern: &str,
        start: usize,
        timeout: Duration,
    ) -> Result<Option<usize>, Error> {
        loop {
            if let Some(position) = self.buffer.find_from(pattern.as_bytes(), start) {
                return Ok(Some(position));
            }

            if self.read_response(timeout, true).await? == 0 {
                log::debug!("gave up waiting for {:?}", pattern);
                return Ok(None);
            }
        }
    }

    /// Wait for a line starting with `marker`, and return it without the line terminator.
    ///
    /// The line is returned as is, bytes the modem garbled included.
    pub async fn wait_for_line(
        &mut self,
        marker: &str,
        timeout: Duration,
    ) -> Result<Option<&[u8]>, Error> {
        let Some(start) = self.wait_until_receive(marker, timeout).await? else {
            return Ok(None);
        };
        let Some(end) = self
            .wait_until_receive_from(LINE_END, start, timeout)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(&self.buffer.as_bytes()[start..end]))
    }

    /// Send a request to the modem, and wait for the modem to respond.
    ///
    /// Returns the number of bytes received.
    pub async fn send_request<R: AtRequest>(
        &mut self,
        request: &R,
        timeout: Duration,
    ) -> Result<usize, Error> {
        let text = request.encode()?;
        self.send_command(&Command::raw(&text).with_timeout(timeout))
            .await
    }

    /// Send a request to the modem, and interpret the response.
    pub async fn run<R: AtRequest>(&mut self, request: R) -> Result<R::Response, Error> {
        self.run_with_timeout(self.config.command_timeout, request)
            .await
    }

    /// Send a request to the modem and interpret the response.
    ///
    /// Use the provided timeout value instead of the configured one.
    pub async fn run_with_timeout<R: AtRequest>(
        &mut self,
        timeout: Duration,
        request: R,
    ) -> Result<R::Response, Error> {
        log::trace!("Running AT command: {:?}", request);

        let result = match self.send_request(&request, timeout).await {
            Ok(0) => Err(Error::Timeout),
            Ok(_) => self.finish_response::<R::Response>(timeout).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            log::error!("AT command {:?} error: {:?}", request, e);
        }

        result
    }

    /// Keep reading until the response is complete, or the modem stays silent for `timeout`.
    async fn finish_response<R: AtResponse>(&mut self, timeout: Duration) -> Result<R, Error> {
        // the echo can come well ahead of the result code
        while self.buffer.is_fully_read() && !R::is_complete(self.buffer.as_bytes()) {
            if self.read_response(timeout, true).await? == 0 {
                break;
            }
        }

        R::from_response(self.buffer.as_bytes())
    }

    /// The response to the last command.
    pub fn response(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn response_contains(&self, pattern: &str) -> bool {
        self.buffer.contains(pattern.as_bytes())
    }

    pub fn find_in_response(&self, pattern: &str) -> Option<usize> {
        self.buffer.find(pattern.as_bytes())
    }

    pub fn find_in_response_from(&self, pattern: &str, start: usize) -> Option<usize> {
        self.buffer.find_from(pattern.as_bytes(), start)
    }

    /// False if the last read had to drop bytes because the buffer was full.
    pub fn is_fully_read(&self) -> bool {
        self.buffer.is_fully_read()
    }

    pub fn clear_response(&mut self) {
        self.buffer.clear();
    }

    pub fn release(self) -> T {
        self.transport
    }
}
