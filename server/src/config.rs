//! Process-wide gateway configuration, fixed at startup.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;

use ftpgate_core::client::ftp::FtpClient;
use ftpgate_core::client::sftp::SftpClient;
use ftpgate_core::client::{ClientFactory, RemoteClient};
use ftpgate_core::model::RemoteHost;

/// Remote protocol the gateway speaks. Chosen once on the command line,
/// never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    Ftp,
    Sftp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ftp => "FTP",
            Self::Sftp => "SFTP",
        }
    }
}

/// Read-only configuration shared by all requests: protocol choice, remote
/// operation timeout, and the suffix for temporary upload names.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub protocol: Protocol,
    pub timeout: Duration,
    pub temp_suffix: String,
}

impl GatewayConfig {
    /// Build the per-request client factory for the configured protocol.
    pub fn client_factory(&self) -> ClientFactory {
        let timeout = self.timeout;
        let temp_suffix = self.temp_suffix.clone();
        match self.protocol {
            Protocol::Ftp => Arc::new(move |host: &RemoteHost| {
                Box::new(FtpClient::new(host.clone(), timeout, temp_suffix.clone()))
                    as Box<dyn RemoteClient>
            }),
            Protocol::Sftp => Arc::new(move |host: &RemoteHost| {
                Box::new(SftpClient::new(host.clone(), timeout, temp_suffix.clone()))
                    as Box<dyn RemoteClient>
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_unconnected_clients() {
        let config = GatewayConfig {
            protocol: Protocol::Sftp,
            timeout: Duration::from_secs(5),
            temp_suffix: ".io".into(),
        };
        let factory = config.client_factory();
        let client = factory(&RemoteHost {
            host: "server".into(),
            port: 22,
            username: "user".into(),
            password: "pwd".into(),
        });
        assert!(!client.is_connected());
    }
}
