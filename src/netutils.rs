use anyhow::{bail, Context, Result};
use cidr::{IpCidr, Ipv4Cidr, Ipv6Cidr};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use tracing::warn;

/// Parse `22,80,100-200` into a sorted, deduplicated port list.
pub fn parse_ports(spec: &str) -> Result<Vec<u16>> {
    let mut ports = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((a, b)) = part.split_once('-') {
            let start: u16 = a.trim().parse().with_context(|| format!("bad port range '{}'", part))?;
            let end: u16 = b.trim().parse().with_context(|| format!("bad port range '{}'", part))?;
            ports.extend(start.min(end)..=start.max(end));
        } else {
            ports.push(part.parse().with_context(|| format!("bad port '{}'", part))?);
        }
    }
    ports.retain(|&p| p != 0);
    if ports.is_empty() {
        bail!("no valid ports in '{}'", spec);
    }
    ports.sort_unstable();
    ports.dedup();
    Ok(ports)
}

/// Above this many addresses a CIDR needs `--force`.
pub const MAX_TARGETS: u128 = 10_000;

/// Never expanded, `--force` or not.
pub const HARD_TARGET_LIMIT: u128 = 1 << 24;

/// Addresses covered by a prefix of `network_length` bits in a `bits`-wide family.
fn cidr_size(bits: u8, network_length: u8) -> u128 {
    1u128
        .checked_shl(u32::from(bits.saturating_sub(network_length)))
        .unwrap_or(u128::MAX)
}

fn check_size(target: &str, size: u128, force: bool) -> Result<()> {
    if size > HARD_TARGET_LIMIT {
        bail!("'{}' covers {} addresses, more than can be scanned", target, size);
    }
    if size > MAX_TARGETS && !force {
        bail!("Too many targets in '{}' ({}). Use --force to override.", target, size);
    }
    Ok(())
}

/// Expand a CIDR, IP literal or hostname into address strings.
///
/// CIDR sizes are checked before any address is built: more than
/// [`MAX_TARGETS`] needs `force`, more than [`HARD_TARGET_LIMIT`] always fails.
pub fn expand_targets(target: &str, force: bool) -> Result<Vec<String>> {
    let target = target.trim();
    if target.contains('/') {
        // Decide IPv4 vs IPv6 by presence of ':'
        if target.contains(':') {
            let cidr: Ipv6Cidr = target.parse().with_context(|| format!("bad CIDR '{}'", target))?;
            check_size(target, cidr_size(128, cidr.network_length()), force)?;
            Ok(cidr.iter().map(|ip| ip.address().to_string()).collect())
        } else {
            let cidr: Ipv4Cidr = target.parse().with_context(|| format!("bad CIDR '{}'", target))?;
            check_size(target, cidr_size(32, cidr.network_length()), force)?;
            Ok(cidr.iter().map(|ip| ip.address().to_string()).collect())
        }
    } else if target.parse::<IpAddr>().is_ok() {
        Ok(vec![target.to_string()])
    } else {
        let addrs = (target, 0)
            .to_socket_addrs()
            .with_context(|| format!("cannot resolve '{}'", target))?;
        let mut ips = addrs
            .map(|sa| match sa {
                SocketAddr::V4(v4) => v4.ip().to_string(),
                SocketAddr::V6(v6) => v6.ip().to_string(),
            })
            .collect::<Vec<_>>();
        ips.sort();
        ips.dedup();
        if ips.is_empty() {
            Ok(vec![target.to_string()])
        } else {
            Ok(ips)
        }
    }
}

/// One CIDR or IP per line; `#` comments and unparseable lines are skipped.
pub fn load_blocklist(path: &str) -> Result<Vec<IpCidr>> {
    let f = File::open(path).with_context(|| format!("open blocklist {}", path))?;
    let mut out = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        let l = line.trim();
        if l.is_empty() || l.starts_with('#') {
            continue;
        }
        if let Ok(cidr) = l.parse::<IpCidr>() {
            out.push(cidr);
        } else if let Ok(ip) = l.parse::<IpAddr>() {
            out.push(IpCidr::new_host(ip));
        } else {
            warn!(entry = l, "ignoring unrecognized blocklist entry");
        }
    }
    Ok(out)
}

/// Whether `host` (if it is an IP literal) falls inside any blocklist entry.
pub fn is_blocked(host: &str, blocklist: &[IpCidr]) -> bool {
    match host.parse::<IpAddr>() {
        Ok(ip) => blocklist.iter().any(|c| c.contains(&ip)),
        Err(_) => false,
    }
}
