use core::future::Future;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};

use crate::{
    at_command::{
        generic_response::missing_reply, AtParseLine, ClientState, CloseConnection, ConfigureDns,
        ConfigureServer, Connect, ConnectMode, ConnectionState, DnsResult, EnableMultiIpConnection,
        GetClientStatus, GetConnectionStatus, GetLocalIp, IpSend, QueryTransmittingState,
        ResolveName, SendResult, ServerMode, ShutConnections, StartGprs, StartTask,
        TransmittingState, MAX_SEND_LEN,
    },
    log, Error, ModemPower, Sim900, Transport,
};

/// Highest connection id in Multi-IP mode.
pub const MAX_CONNECTION_ID: u8 = 7;

/// Which connection an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connection {
    /// The only connection, when the multiplexer is off.
    Single,

    /// One of the connections 0 to 7, when the multiplexer is on.
    Id(u8),
}

/// GPRS data connections.
pub trait Gprs {
    /// Start the modem and close any IP session left over from before.
    fn begin(&mut self, baud_rate: u32) -> impl Future<Output = Result<(), Error>>;

    /// Switch between a single connection and up to 8 numbered ones.
    fn use_multiplexer(&mut self, enabled: bool) -> impl Future<Output = Result<(), Error>>;

    /// Set the access point to connect through.
    fn attach(
        &mut self,
        apn: &str,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), Error>>;

    /// Bring up the wireless connection.
    fn bring_up(&mut self) -> impl Future<Output = Result<(), Error>>;

    /// The address the network assigned to us. Only available after [Gprs::bring_up].
    fn obtain_ip(&mut self) -> impl Future<Output = Result<[u8; 4], Error>>;

    fn status(&mut self) -> impl Future<Output = Result<ConnectionState, Error>>;

    /// State of one connection. Requires the multiplexer.
    fn connection_status(&mut self, id: u8) -> impl Future<Output = Result<ClientState, Error>>;

    fn configure_dns(
        &mut self,
        primary: &str,
        secondary: Option<&str>,
    ) -> impl Future<Output = Result<(), Error>>;

    /// Open a TCP or UDP connection to `address`, an IP or a domain name.
    fn open(
        &mut self,
        connection: Connection,
        mode: ConnectMode,
        address: &str,
        port: u16,
    ) -> impl Future<Output = Result<(), Error>>;

    fn close(&mut self, connection: Connection) -> impl Future<Output = Result<(), Error>>;

    /// Look up the first IPv4 address of `name`.
    fn resolve(&mut self, name: &str) -> impl Future<Output = Result<[u8; 4], Error>>;

    /// Send between 1 and [MAX_SEND_LEN] bytes, returning how many were sent.
    fn send(
        &mut self,
        connection: Connection,
        data: &[u8],
    ) -> impl Future<Output = Result<usize, Error>>;

    /// Start or stop listening for incoming connections.
    ///
    /// Requires the multiplexer, fails with [Error::InvalidConnection] otherwise.
    fn configure_server(&mut self, mode: ServerMode) -> impl Future<Output = Result<(), Error>>;

    /// Close every connection and deactivate the GPRS context.
    fn shutdown(&mut self) -> impl Future<Output = Result<(), Error>>;

    fn transmitting_state(
        &mut self,
        connection: Connection,
    ) -> impl Future<Output = Result<TransmittingState, Error>>;
}

/// [Gprs] on a SIM900.
pub struct GprsSim900<'d, M: RawMutex, T: Transport, P: ModemPower> {
    modem: &'d Mutex<M, Sim900<T, P>>,
    multiplexed: bool,
}

impl<'d, M: RawMutex, T: Transport, P: ModemPower> GprsSim900<'d, M, T, P> {
    pub fn new(modem: &'d Mutex<M, Sim900<T, P>>) -> Self {
        GprsSim900 {
            modem,
            multiplexed: false,
        }
    }

    pub fn is_multiplexed(&self) -> bool {
        self.multiplexed
    }

    /// The id to put in commands, after checking that it fits the multiplexer setting.
    fn connection_id(&self, connection: Connection) -> Result<Option<u8>, Error> {
        match (connection, self.multiplexed) {
            (Connection::Single, false) => Ok(None),
            (Connection::Id(id), true) if id <= MAX_CONNECTION_ID => Ok(Some(id)),
            _ => {
                log::error!(
                    "invalid connection {:?}, multiplexer enabled: {}",
                    connection,
                    self.multiplexed
                );
                Err(Error::InvalidConnection)
            }
        }
    }
}

impl<M: RawMutex, T: Transport, P: ModemPower> Gprs for GprsSim900<'_, M, T, P> {
    async fn begin(&mut self, baud_rate: u32) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem.begin(baud_rate).await?;
        modem.set_echo(false).await?;

        let timeout = modem.config().shutdown_timeout;
        modem
            .commands()
            .run_with_timeout(timeout, ShutConnections)
            .await?;
        Ok(())
    }

    async fn use_multiplexer(&mut self, enabled: bool) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem
            .commands()
            .run(EnableMultiIpConnection(enabled))
            .await?;
        self.multiplexed = enabled;
        Ok(())
    }

    async fn attach(&mut self, apn: &str, username: &str, password: &str) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        log::info!("attaching to apn {:?}", apn);
        modem
            .commands()
            .run(StartTask {
                apn,
                username,
                password,
            })
            .await?;
        Ok(())
    }

    async fn bring_up(&mut self) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        // datasheet specifies 85 seconds max response time
        let timeout = modem.config().bring_up_timeout;
        modem.commands().run_with_timeout(timeout, StartGprs).await?;
        Ok(())
    }

    async fn obtain_ip(&mut self) -> Result<[u8; 4], Error> {
        let mut modem = self.modem.lock().await;
        let ip = modem.commands().run(GetLocalIp).await?;
        log::info!("local ip {:?}", ip.0);
        Ok(ip.0)
    }

    async fn status(&mut self) -> Result<ConnectionState, Error> {
        let mut modem = self.modem.lock().await;
        let timeout = modem.config().command_timeout;
        let commands = modem.commands();

        commands.send_request(&GetConnectionStatus, timeout).await?;
        let state = match commands.wait_for_line("STATE:", timeout).await? {
            Some(line) => ConnectionState::classify(line),
            None => ConnectionState::QueryError,
        };

        log::debug!("connection state {:?}", state);
        Ok(state)
    }

    async fn connection_status(&mut self, id: u8) -> Result<ClientState, Error> {
        let Some(id) = self.connection_id(Connection::Id(id))? else {
            return Err(Error::InvalidConnection);
        };

        let mut modem = self.modem.lock().await;
        let timeout = modem.config().command_timeout;
        let commands = modem.commands();

        commands.send_request(&GetClientStatus(id), timeout).await?;
        let state = match commands.wait_for_line("+CIPSTATUS:", timeout).await? {
            Some(line) => ClientState::classify(line),
            None => ClientState::QueryError,
        };

        Ok(state)
    }

    async fn configure_dns(&mut self, primary: &str, secondary: Option<&str>) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        modem
            .commands()
            .run(ConfigureDns { primary, secondary })
            .await?;
        Ok(())
    }

    async fn open(
        &mut self,
        connection: Connection,
        mode: ConnectMode,
        address: &str,
        port: u16,
    ) -> Result<(), Error> {
        let id = self.connection_id(connection)?;
        let mut modem = self.modem.lock().await;
        let config = *modem.config();
        let commands = modem.commands();

        log::info!("connecting to {}:{}", address, port);
        commands
            .run(Connect {
                connection: id,
                mode,
                destination: address,
                port,
            })
            .await?;

        let Some(at) = commands
            .wait_until_receive("CONNECT", config.connect_timeout)
            .await?
        else {
            log::error!("no connection to {}:{}", address, port);
            return Err(Error::ConnectFailed);
        };

        // the verdict is on the rest of the line
        commands
            .wait_until_receive_from("\r\n", at, config.command_timeout)
            .await?;

        if commands.response_contains("FAIL") {
            log::error!("failed to connect to {}:{}", address, port);
            return Err(Error::ConnectFailed);
        }

        Ok(())
    }

    async fn close(&mut self, connection: Connection) -> Result<(), Error> {
        let id = self.connection_id(connection)?;
        let mut modem = self.modem.lock().await;
        modem
            .commands()
            .run(CloseConnection { connection: id })
            .await?;
        Ok(())
    }

    async fn resolve(&mut self, name: &str) -> Result<[u8; 4], Error> {
        let mut modem = self.modem.lock().await;
        let timeout = modem.config().dns_timeout;
        let commands = modem.commands();

        commands.run(ResolveName(name)).await?;

        let Some(line) = commands.wait_for_line("+CDNSGIP: ", timeout).await? else {
            return Err(missing_reply(commands.response()));
        };

        match DnsResult::from_line(line)? {
            DnsResult::Resolved(address) => {
                log::debug!("{} resolved to {:?}", name, address);
                Ok(address)
            }
            DnsResult::Failed(error) => {
                log::error!("failed to resolve {}: {:?}", name, error);
                Err(Error::Dns(error))
            }
        }
    }

    async fn send(&mut self, connection: Connection, data: &[u8]) -> Result<usize, Error> {
        let id = self.connection_id(connection)?;
        if data.is_empty() || data.len() > MAX_SEND_LEN {
            return Err(Error::PayloadTooLarge);
        }

        let mut modem = self.modem.lock().await;
        let config = *modem.config();
        let commands = modem.commands();

        let request = IpSend {
            connection: id,
            len: data.len(),
        };
        commands.send_request(&request, config.command_timeout).await?;

        if commands
            .wait_until_receive(">", config.command_timeout)
            .await?
            .is_none()
        {
            return Err(missing_reply(commands.response()));
        }

        commands.clear_response();
        commands.write(data).await?;

        let Some(line) = commands.wait_for_line("SEND ", config.send_timeout).await? else {
            return Err(missing_reply(commands.response()));
        };

        match SendResult::from_line(line)? {
            SendResult::Ok => Ok(data.len()),
            SendResult::Fail => {
                log::error!("modem failed to send {} bytes", data.len());
                Err(Error::SendFailed)
            }
        }
    }

    async fn configure_server(&mut self, mode: ServerMode) -> Result<(), Error> {
        if !self.multiplexed {
            log::error!("server mode {:?} needs the multiplexer", mode);
            return Err(Error::InvalidConnection);
        }

        let mut modem = self.modem.lock().await;
        let timeout = modem.config().command_timeout;
        let commands = modem.commands();

        commands.send_request(&ConfigureServer(mode), timeout).await?;
        match commands
            .wait_until_receive(mode.confirmation(), timeout)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(missing_reply(commands.response())),
        }
    }

    async fn shutdown(&mut self) -> Result<(), Error> {
        let mut modem = self.modem.lock().await;
        let timeout = modem.config().shutdown_timeout;
        modem
            .commands()
            .run_with_timeout(timeout, ShutConnections)
            .await?;
        Ok(())
    }

    async fn transmitting_state(
        &mut self,
        connection: Connection,
    ) -> Result<TransmittingState, Error> {
        let id = self.connection_id(connection)?;
        let mut modem = self.modem.lock().await;
        let timeout = modem.config().command_timeout;
        let commands = modem.commands();

        commands
            .send_request(&QueryTransmittingState { connection: id }, timeout)
            .await?;

        let Some(line) = commands.wait_for_line("+CIPACK: ", timeout).await? else {
            return Err(missing_reply(commands.response()));
        };

        Ok(TransmittingState::from_line(line)?)
    }
}
