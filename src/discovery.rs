//! TCP connect sweep producing the (host, open ports) input for the
//! assessment. Stands in for an external scanning engine.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::probes::helper::connect_with_timeout;
use crate::types::HostPorts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    Closed,
}

/// Plain connect check; a refused or timed-out connect counts as closed.
pub async fn tcp_connect(host: &str, port: u16, timeout: Duration) -> PortState {
    match connect_with_timeout(host, port, timeout).await {
        Some(_) => PortState::Open,
        None => PortState::Closed,
    }
}

/// Sweep every host × port with at most `concurrency` connects in flight.
///
/// Hosts without an open port are left out. Output follows `targets`
/// order with ports ascending. No new connects start after `shutdown`.
pub async fn discover(
    targets: &[String],
    ports: &[u16],
    concurrency: usize,
    timeout: Duration,
    shutdown: Arc<AtomicBool>,
) -> Vec<HostPorts> {
    let total = (targets.len() * ports.len()) as u64;
    info!(hosts = targets.len(), ports = ports.len(), "starting discovery");

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Discovering [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let pairs = (0..targets.len()).flat_map(|ti| ports.iter().map(move |&p| (ti, p)));

    let mut open: Vec<BTreeSet<u16>> = vec![BTreeSet::new(); targets.len()];
    let mut results = stream::iter(pairs)
        .map(|(ti, port)| {
            let pb = pb.clone();
            let shutdown = shutdown.clone();
            let host = &targets[ti];
            async move {
                if shutdown.load(Ordering::SeqCst) {
                    return (ti, port, PortState::Closed);
                }
                let state = tcp_connect(host, port, timeout).await;
                pb.inc(1);
                (ti, port, state)
            }
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((ti, port, state)) = results.next().await {
        if state == PortState::Open {
            debug!(host = %targets[ti], port, "open");
            open[ti].insert(port);
        }
    }
    pb.finish_and_clear();

    let live: Vec<HostPorts> = targets
        .iter()
        .zip(open)
        .filter(|(_, ports)| !ports.is_empty())
        .map(|(host, ports)| HostPorts::new(host.clone(), ports))
        .collect();
    info!(live = live.len(), "discovery complete");
    live
}
