use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};

/// Resolve `host` (IP literal or name) and connect, all within `timeout`.
pub async fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> Option<TcpStream> {
    let fut = async {
        match resolve(host, port).await {
            Some(addr) => TcpStream::connect(addr).await.ok(),
            None => None,
        }
    };
    tokio::time::timeout(timeout, fut).await.ok().flatten()
}

async fn resolve(host: &str, port: u16) -> Option<SocketAddr> {
    // Parse first so IPv6 literals don't need brackets
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Some(SocketAddr::new(ip, port));
    }
    lookup_host((host, port)).await.ok()?.next()
}

/// Single read of at most `max` bytes. `None` on timeout, error or EOF.
pub async fn read_chunk(stream: &mut TcpStream, max: usize, timeout: Duration) -> Option<Vec<u8>> {
    let mut buf = vec![0u8; max];
    match tokio::time::timeout(timeout, stream.read(&mut buf)).await {
        Ok(Ok(n)) if n > 0 => {
            buf.truncate(n);
            Some(buf)
        }
        _ => None,
    }
}

/// Write `request`, then read one response chunk.
pub async fn send_and_read(
    stream: &mut TcpStream,
    request: &[u8],
    max: usize,
    timeout: Duration,
) -> Option<Vec<u8>> {
    if !matches!(tokio::time::timeout(timeout, stream.write_all(request)).await, Ok(Ok(()))) {
        return None;
    }
    read_chunk(stream, max, timeout).await
}

/// Lossy-decode and drop control characters other than line breaks and tabs.
pub fn sanitize(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| *c == '\n' || *c == '\r' || *c == '\t' || (!c.is_control() && *c != '\u{FFFD}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Three-digit reply code at the start of a line-oriented server reply (FTP, SMTP).
pub fn reply_code(reply: &str) -> Option<u16> {
    let code = reply.trim_start().get(..3)?;
    code.parse().ok()
}

/// Read one complete line-oriented reply (FTP, SMTP), following `NNN-`
/// continuation lines until the closing `NNN ` line. Gives up past `max` bytes.
pub async fn read_reply(stream: &mut TcpStream, max: usize, timeout: Duration) -> Option<String> {
    let mut buf = Vec::new();
    while buf.len() < max {
        let chunk = read_chunk(stream, max - buf.len(), timeout).await?;
        buf.extend_from_slice(&chunk);
        if reply_complete(&String::from_utf8_lossy(&buf)) {
            return Some(sanitize(&buf));
        }
    }
    None
}

fn reply_complete(text: &str) -> bool {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return false;
    };
    if !first.ends_with('\n') {
        return false;
    }
    let code = match first.get(..4) {
        Some(head) if head.ends_with('-') => &head[..3],
        _ => return true,
    };
    lines.any(|l| l.ends_with('\n') && l.starts_with(code) && l.as_bytes().get(3) == Some(&b' '))
}
