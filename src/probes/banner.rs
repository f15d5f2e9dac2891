use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::helper::{connect_with_timeout, read_chunk, sanitize, send_and_read};
use super::BannerGrabber;
use crate::types::NO_BANNER;

pub const HTTPS_DETECTED: &str = "HTTPS Detected";
pub const MAX_BANNER_BYTES: usize = 1024;

const HEAD_REQUEST: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";

/// Ports that only answer once asked: they get a `HEAD` first.
pub const HEAD_PORTS: &[u16] = &[80, 8080];
/// Ports reported as `"HTTPS Detected"` without reading.
pub const TLS_PORTS: &[u16] = &[443];

/// Plain TCP banner grab with per-connection timeouts.
#[derive(Debug, Clone)]
pub struct TcpBannerProbe {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub head_ports: Vec<u16>,
    pub tls_ports: Vec<u16>,
}

impl TcpBannerProbe {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_timeout,
            head_ports: HEAD_PORTS.to_vec(),
            tls_ports: TLS_PORTS.to_vec(),
        }
    }

    pub fn with_ports(mut self, head_ports: Vec<u16>, tls_ports: Vec<u16>) -> Self {
        self.head_ports = head_ports;
        self.tls_ports = tls_ports;
        self
    }
}

#[async_trait]
impl BannerGrabber for TcpBannerProbe {
    async fn grab(&self, host: &str, port: u16) -> String {
        probe_with_ports(
            host,
            port,
            self.connect_timeout,
            self.read_timeout,
            &self.head_ports,
            &self.tls_ports,
        )
        .await
    }
}

/// Grab the first response text from `host:port` with the default port sets.
pub async fn probe(host: &str, port: u16, connect_timeout: Duration, read_timeout: Duration) -> String {
    probe_with_ports(host, port, connect_timeout, read_timeout, HEAD_PORTS, TLS_PORTS).await
}

/// Returns `"N/A"` on connect failure, timeout or an empty read, and
/// `"HTTPS Detected"` for a TLS port without reading. Ports in `head_ports`
/// are sent `HEAD / HTTP/1.0` first. Never blocks longer than
/// `connect_timeout + read_timeout`.
pub async fn probe_with_ports(
    host: &str,
    port: u16,
    connect_timeout: Duration,
    read_timeout: Duration,
    head_ports: &[u16],
    tls_ports: &[u16],
) -> String {
    let Some(mut stream) = connect_with_timeout(host, port, connect_timeout).await else {
        debug!(host, port, "banner: connect failed");
        return NO_BANNER.to_string();
    };

    if tls_ports.contains(&port) {
        return HTTPS_DETECTED.to_string();
    }

    // one deadline covers the HEAD write and the read
    let exchange = async {
        if head_ports.contains(&port) {
            send_and_read(&mut stream, HEAD_REQUEST, MAX_BANNER_BYTES, read_timeout).await
        } else {
            // FTP, SSH, SMTP and friends greet on connect
            read_chunk(&mut stream, MAX_BANNER_BYTES, read_timeout).await
        }
    };
    let raw = tokio::time::timeout(read_timeout, exchange).await.ok().flatten();

    let banner = raw.map(|b| sanitize(&b)).unwrap_or_default();
    if banner.is_empty() {
        debug!(host, port, "banner: nothing read");
        NO_BANNER.to_string()
    } else {
        banner
    }
}
