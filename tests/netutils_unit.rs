use std::io::Write;
use std::time::{Duration, Instant};

use rustlite_audit::netutils::{expand_targets, is_blocked, load_blocklist, parse_ports};

#[test]
fn parse_ports_ranges_and_list() {
    let p = parse_ports("22,80,100-102").unwrap();
    assert_eq!(p, vec![22, 80, 100, 101, 102]);
}

#[test]
fn parse_ports_dedups_and_rejects_garbage() {
    assert_eq!(parse_ports("80, 22,80,25-21").unwrap(), vec![21, 22, 23, 24, 25, 80]);
    assert!(parse_ports("http").is_err());
    assert!(parse_ports("0").is_err());
    assert!(parse_ports("70000").is_err());
}

#[test]
fn expand_cidr_and_literal() {
    let hosts = expand_targets("10.0.0.0/30", false).unwrap();
    assert_eq!(hosts, vec!["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    assert_eq!(expand_targets("192.168.1.10", false).unwrap(), vec!["192.168.1.10"]);
    assert!(expand_targets("10.0.0.0/33", false).is_err());
}

#[test]
fn oversized_cidr_is_refused_before_expansion() {
    let started = Instant::now();
    let err = expand_targets("10.0.0.0/8", false).unwrap_err();
    assert!(err.to_string().contains("--force"), "{}", err);
    assert!(started.elapsed() < Duration::from_millis(100));

    // a /64 is refused even with --force
    let started = Instant::now();
    assert!(expand_targets("2001:db8::/64", true).is_err());
    assert!(expand_targets("2001:db8::/64", false).is_err());
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[test]
fn force_lifts_the_soft_cap() {
    assert!(expand_targets("10.0.0.0/18", false).is_err());
    assert_eq!(expand_targets("10.0.0.0/18", true).unwrap().len(), 1 << 14);
    assert_eq!(expand_targets("2001:db8::/126", false).unwrap().len(), 4);
}

#[test]
fn expand_single_host() {
    let res = expand_targets("localhost", false).unwrap();
    assert!(!res.is_empty());
}

#[test]
fn blocklist_filters_cidrs_and_hosts() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "# lab gear").unwrap();
    writeln!(f, "10.0.0.0/30").unwrap();
    writeln!(f, "192.168.1.1").unwrap();
    writeln!(f, "not-an-ip").unwrap();
    f.flush().unwrap();

    let bl = load_blocklist(f.path().to_str().unwrap()).unwrap();
    assert_eq!(bl.len(), 2);
    assert!(is_blocked("10.0.0.2", &bl));
    assert!(is_blocked("192.168.1.1", &bl));
    assert!(!is_blocked("10.0.0.9", &bl));
    assert!(!is_blocked("router.local", &bl));
}
