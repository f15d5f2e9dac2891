use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::config::AssessConfig;
use crate::enrich::Enricher;
use crate::probes::{DefaultCredentialProbe, TcpBannerProbe};
use crate::risk::RiskTables;
use crate::signatures::SignatureMatcher;
use crate::types::{Finding, HostPorts, PortProfile, ReportBundle};

/// Expand discovery output into classified (host, profile) work, in
/// discovery order. Unclassified ports are dropped here.
pub fn plan(targets: &[HostPorts], tables: &RiskTables) -> Vec<(String, PortProfile)> {
    let mut work = Vec::new();
    for hp in targets {
        for &port in &hp.open_ports {
            if let Some(profile) = tables.classify(port) {
                work.push((hp.host.clone(), profile.clone()));
            }
        }
    }
    work
}

/// Build the production enricher: TCP banner probe, default-credential probe,
/// default tables and signatures.
pub fn build_enricher(cfg: &AssessConfig) -> Enricher {
    Enricher::new(
        Arc::new(RiskTables::default()),
        Arc::new(SignatureMatcher::default()),
        Arc::new(TcpBannerProbe::new(cfg.connect_timeout, cfg.read_timeout)),
        Arc::new(DefaultCredentialProbe::new(cfg.credential_timeout)),
        cfg.grab_banners,
    )
}

/// Enrich every classified pair on a bounded worker pool.
///
/// Results come back in discovery order whatever the completion order.
/// Once `shutdown` is raised no new pair starts; pairs already running
/// finish or time out on their own.
pub async fn assess(
    targets: &[HostPorts],
    enricher: Arc<Enricher>,
    concurrency: usize,
    shutdown: Arc<AtomicBool>,
) -> Vec<Finding> {
    let work = plan(targets, enricher.tables());
    info!(pairs = work.len(), concurrency, "assessing classified ports");

    let pb = ProgressBar::new(work.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Assessing [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let sem = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = FuturesUnordered::new();

    for (index, (host, profile)) in work.into_iter().enumerate() {
        let sem = sem.clone();
        let enricher = enricher.clone();
        let shutdown = shutdown.clone();
        let pb = pb.clone();

        tasks.push(tokio::spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                return (index, None);
            };
            if shutdown.load(Ordering::SeqCst) {
                return (index, None);
            }
            let finding = enricher.enrich(&host, &profile).await;
            pb.inc(1);
            (index, Some(finding))
        }));
    }

    let mut slots: Vec<Option<Finding>> = vec![None; tasks.len()];
    while let Some(res) = tasks.next().await {
        match res {
            Ok((index, finding)) => slots[index] = finding,
            Err(e) => warn!(error = %e, "enrichment task failed"),
        }
    }
    pb.finish_and_clear();

    let findings: Vec<Finding> = slots.into_iter().flatten().collect();
    if shutdown.load(Ordering::SeqCst) {
        warn!(completed = findings.len(), "assessment cancelled before all ports were dispatched");
    }
    findings
}

/// Enrich and aggregate in one go.
pub async fn run_assessment(
    targets: &[HostPorts],
    cfg: &AssessConfig,
    shutdown: Arc<AtomicBool>,
) -> ReportBundle {
    let enricher = Arc::new(build_enricher(cfg));
    let findings = assess(targets, enricher, cfg.concurrency, shutdown).await;
    aggregate(&findings)
}
