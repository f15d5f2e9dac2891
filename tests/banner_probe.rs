use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use rustlite_audit::probes::banner::{probe, HTTPS_DETECTED};
use rustlite_audit::probes::{BannerGrabber, TcpBannerProbe};

const CONNECT: Duration = Duration::from_millis(500);
const READ: Duration = Duration::from_millis(300);

#[tokio::test]
async fn reads_greeting_banner() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut s, _) = listener.accept().await.unwrap();
        let _ = s.write_all(b"SSH-2.0-OpenSSH_7.2p2 Ubuntu-4ubuntu2.8\r\n").await;
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let p = TcpBannerProbe::new(CONNECT, READ);
    let banner = p.grab("127.0.0.1", port).await;
    assert_eq!(banner, "SSH-2.0-OpenSSH_7.2p2 Ubuntu-4ubuntu2.8");
}

#[tokio::test]
async fn strips_non_printable_bytes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut s, _) = listener.accept().await.unwrap();
        let _ = s.write_all(b"\x00\x01220 (vsFTPd 3.0.3)\x07\r\n").await;
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let banner = probe("127.0.0.1", port, CONNECT, READ).await;
    assert_eq!(banner, "220 (vsFTPd 3.0.3)");
}

#[tokio::test]
async fn closed_port_is_na() {
    // grab a free port, then release it
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap().port()
    };
    assert_eq!(probe("127.0.0.1", port, CONNECT, READ).await, "N/A");
}

#[tokio::test]
async fn immediate_close_is_na() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (s, _) = listener.accept().await.unwrap();
        drop(s);
    });
    assert_eq!(probe("127.0.0.1", port, CONNECT, READ).await, "N/A");
}

#[tokio::test]
async fn silent_service_is_bounded_by_read_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (_s, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let started = Instant::now();
    let banner = probe("127.0.0.1", port, CONNECT, READ).await;
    assert_eq!(banner, "N/A");
    assert!(started.elapsed() < CONNECT + READ + Duration::from_millis(200));
}

#[tokio::test]
async fn web_ports_are_sent_head_first() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut s, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 256];
        let n = s.read(&mut buf).await.unwrap_or(0);
        let req = String::from_utf8_lossy(&buf[..n]).to_string();
        let first = req.lines().next().unwrap_or("").to_string();
        let resp = format!("HTTP/1.0 200 OK\r\nX-Req: {}\r\n\r\n", first);
        let _ = s.write_all(resp.as_bytes()).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let p = TcpBannerProbe::new(CONNECT, READ).with_ports(vec![port], vec![]);
    let banner = p.grab("127.0.0.1", port).await;
    assert_eq!(banner, "HTTP/1.0 200 OK\r\nX-Req: HEAD / HTTP/1.0");
}

#[tokio::test]
async fn tls_port_reports_https_without_reading() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (_s, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let p = TcpBannerProbe::new(CONNECT, READ).with_ports(vec![], vec![port]);
    let started = Instant::now();
    assert_eq!(p.grab("127.0.0.1", port).await, HTTPS_DETECTED);
    // no read was attempted
    assert!(started.elapsed() < READ);
}

#[tokio::test]
async fn refused_tls_port_is_na() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap().port()
    };
    let p = TcpBannerProbe::new(CONNECT, READ).with_ports(vec![], vec![port]);
    assert_eq!(p.grab("127.0.0.1", port).await, "N/A");
}

#[test]
fn default_port_sets() {
    let p = TcpBannerProbe::new(CONNECT, READ);
    assert_eq!(p.head_ports, vec![80, 8080]);
    assert_eq!(p.tls_ports, vec![443]);
}
