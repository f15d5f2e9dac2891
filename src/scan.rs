use anyhow::{bail, Result};
use cidr::IpCidr;
use colored::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::AssessConfig;
use crate::discovery::discover;
use crate::netutils::{expand_targets, is_blocked, load_blocklist, parse_ports};
use crate::pipeline::run_assessment;
use crate::report::{print_summary, save_reports};

/// Discover, assess, report.
pub async fn run(cli: Cli) -> Result<()> {
    let cfg = AssessConfig::from(&cli);
    cfg.validate()?;
    if cli.discovery_concurrency == 0 || cli.discovery_concurrency > 4096 {
        bail!("--discovery-concurrency must be between 1 and 4096");
    }

    let ports = parse_ports(&cli.ports)?;
    if ports.len() > 5000 && !cli.force {
        bail!("Too many ports specified ({}). Use --force to override.", ports.len());
    }
    let mut targets = expand_targets(&cli.target, cli.force)?;

    if !cli.blocklist.is_empty() {
        let blocklist: Vec<IpCidr> = load_blocklist(&cli.blocklist)?;
        info!(entries = blocklist.len(), path = %cli.blocklist, "loaded blocklist");
        targets.retain(|t| !is_blocked(t, &blocklist));
    }

    println!(
        "{}\n   • Network Range: {}\n   • Port Range: {}\n   • Banner Grabbing: {}\n   • Report Format: {}\n",
        "Starting scan with settings:".cyan().bold(),
        cli.target.yellow(),
        cli.ports.yellow(),
        (if cfg.grab_banners { "Enabled" } else { "Disabled" }).yellow(),
        format!("{:?} + HTML", cli.format).yellow(),
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let s = shutdown.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("received interrupt, finishing in-flight probes");
                s.store(true, Ordering::SeqCst);
            }
        });
    }

    let live = discover(
        &targets,
        &ports,
        cli.discovery_concurrency,
        Duration::from_millis(cli.discovery_timeout_ms),
        shutdown.clone(),
    )
    .await;
    let hosts: Vec<&str> = live.iter().map(|h| h.host.as_str()).collect();
    println!("{} {:?}", "Active hosts found:".green().bold(), hosts);

    let bundle = run_assessment(&live, &cfg, shutdown.clone()).await;

    print_summary(&bundle);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    }

    if !bundle.findings.is_empty() {
        save_reports(Path::new(&cli.output_dir), &bundle, cli.format)?;
    }

    if shutdown.load(Ordering::SeqCst) {
        warn!("scan interrupted; report covers completed probes only");
    }
    Ok(())
}
