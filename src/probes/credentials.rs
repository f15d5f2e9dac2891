use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::helper::{connect_with_timeout, read_reply, reply_code};
use super::CredentialChecker;

pub const FTP_PORTS: &[u16] = &[21];
pub const HTTP_PORTS: &[u16] = &[80, 8080];
pub const HTTPS_PORTS: &[u16] = &[443, 8443];

/// Cap on one FTP reply, continuation lines included.
const MAX_REPLY_BYTES: usize = 4096;

/// Placeholder identity sent as the anonymous FTP password.
pub const FTP_ANON_PASSWORD: &str = "anonymous@example.com";

/// Tried in order; the first accepted pair wins.
pub const DEFAULT_HTTP_CREDENTIALS: &[(&str, &str)] = &[
    ("admin", "admin"),
    ("admin", "password"),
    ("admin", "1234"),
    ("root", "root"),
    ("user", "user"),
];

/// Best-effort default-credential check for FTP and HTTP(S) basic auth.
///
/// Ports outside the three lists are not probed.
#[derive(Debug, Clone)]
pub struct DefaultCredentialProbe {
    pub timeout: Duration,
    pub http_credentials: Vec<(String, String)>,
    pub ftp_ports: Vec<u16>,
    pub http_ports: Vec<u16>,
    pub https_ports: Vec<u16>,
    // None when the TLS backend could not be set up; HTTP checks then yield nothing
    client: Option<Client>,
}

impl DefaultCredentialProbe {
    pub fn new(timeout: Duration) -> Self {
        let creds = DEFAULT_HTTP_CREDENTIALS
            .iter()
            .map(|(u, p)| (u.to_string(), p.to_string()))
            .collect();
        Self::with_credentials(timeout, creds)
    }

    pub fn with_credentials(timeout: Duration, http_credentials: Vec<(String, String)>) -> Self {
        // Self-signed certs are the norm on the devices being audited
        let client = match Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
        {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(error = %e, "HTTP client unavailable; skipping HTTP credential checks");
                None
            }
        };
        Self {
            timeout,
            http_credentials,
            ftp_ports: FTP_PORTS.to_vec(),
            http_ports: HTTP_PORTS.to_vec(),
            https_ports: HTTPS_PORTS.to_vec(),
            client,
        }
    }

    pub fn with_ports(mut self, ftp_ports: Vec<u16>, http_ports: Vec<u16>, https_ports: Vec<u16>) -> Self {
        self.ftp_ports = ftp_ports;
        self.http_ports = http_ports;
        self.https_ports = https_ports;
        self
    }

    /// Run the basic-auth list against `scheme://host:port/`.
    pub async fn check_http(&self, scheme: &str, host: &str, port: u16) -> Option<String> {
        let client = self.client.as_ref()?;
        check_http_basic(client, scheme, host, port, &self.http_credentials).await
    }
}

#[async_trait]
impl CredentialChecker for DefaultCredentialProbe {
    async fn check(&self, host: &str, port: u16) -> Option<String> {
        if self.ftp_ports.contains(&port) {
            return check_ftp_anonymous(host, port, self.timeout).await;
        }
        let scheme = if self.https_ports.contains(&port) {
            "https"
        } else if self.http_ports.contains(&port) {
            "http"
        } else {
            return None;
        };
        self.check_http(scheme, host, port).await
    }
}

/// Try `USER anonymous` / `PASS <placeholder>`. Whole exchange bounded by `timeout`.
pub async fn check_ftp_anonymous(host: &str, port: u16, timeout: Duration) -> Option<String> {
    match tokio::time::timeout(timeout, ftp_anonymous_login(host, port, timeout)).await {
        Ok(Some(())) => {
            info!(host, port, "anonymous FTP login accepted");
            Some("Anonymous FTP login allowed".to_string())
        }
        _ => {
            debug!(host, port, "anonymous FTP login refused or timed out");
            None
        }
    }
}

async fn ftp_command(stream: &mut TcpStream, cmd: &[u8], timeout: Duration) -> Option<String> {
    if !matches!(tokio::time::timeout(timeout, stream.write_all(cmd)).await, Ok(Ok(()))) {
        return None;
    }
    read_reply(stream, MAX_REPLY_BYTES, timeout).await
}

async fn ftp_anonymous_login(host: &str, port: u16, timeout: Duration) -> Option<()> {
    let mut stream = connect_with_timeout(host, port, timeout).await?;

    let greeting = read_reply(&mut stream, MAX_REPLY_BYTES, timeout).await?;
    if reply_code(&greeting) != Some(220) {
        return None;
    }

    let user = ftp_command(&mut stream, b"USER anonymous\r\n", timeout).await?;
    let code = match reply_code(&user) {
        Some(331) => {
            let pass = format!("PASS {}\r\n", FTP_ANON_PASSWORD);
            let reply = ftp_command(&mut stream, pass.as_bytes(), timeout).await?;
            reply_code(&reply)
        }
        other => other,
    };
    (code == Some(230)).then_some(())
}

/// Basic-auth GET `/` with each pair; stop at the first 2xx.
pub async fn check_http_basic(
    client: &Client,
    scheme: &str,
    host: &str,
    port: u16,
    credentials: &[(String, String)],
) -> Option<String> {
    let url = if host.contains(':') {
        format!("{}://[{}]:{}/", scheme, host, port)
    } else {
        format!("{}://{}:{}/", scheme, host, port)
    };

    for (user, pass) in credentials {
        // each request carries the client timeout; errors just move on
        match client.get(&url).basic_auth(user, Some(pass)).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(host, port, user = user.as_str(), "default HTTP credentials accepted");
                return Some(format!("Default credentials accepted: {}:{}", user, pass));
            }
            Ok(resp) => debug!(host, port, user = user.as_str(), status = resp.status().as_u16(), "rejected"),
            Err(e) => debug!(host, port, user = user.as_str(), error = %e, "request failed"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_client_yields_nothing() {
        let mut p = DefaultCredentialProbe::new(Duration::from_millis(200));
        p.client = None;
        assert!(p.check_http("http", "127.0.0.1", 80).await.is_none());
        assert!(p.check("127.0.0.1", 8443).await.is_none());
    }

    #[test]
    fn default_port_lists() {
        let p = DefaultCredentialProbe::new(Duration::from_secs(1));
        assert_eq!(p.ftp_ports, vec![21]);
        assert_eq!(p.http_ports, vec![80, 8080]);
        assert_eq!(p.https_ports, vec![443, 8443]);
        assert_eq!(p.http_credentials.len(), DEFAULT_HTTP_CREDENTIALS.len());
    }
}
