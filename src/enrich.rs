use std::sync::Arc;
use tracing::debug;

use crate::probes::{BannerHandle, CredentialHandle};
use crate::risk::RiskTables;
use crate::signatures::SignatureMatcher;
use crate::types::{Finding, PortProfile, RiskLevel, NO_BANNER};

/// Turns a classified (host, port) into a finished [`Finding`].
///
/// Holds only shared, read-only state, so one instance serves every worker.
pub struct Enricher {
    tables: Arc<RiskTables>,
    signatures: Arc<SignatureMatcher>,
    banner: BannerHandle,
    credentials: CredentialHandle,
    grab_banners: bool,
}

impl Enricher {
    pub fn new(
        tables: Arc<RiskTables>,
        signatures: Arc<SignatureMatcher>,
        banner: BannerHandle,
        credentials: CredentialHandle,
        grab_banners: bool,
    ) -> Self {
        Self { tables, signatures, banner, credentials, grab_banners }
    }

    pub fn tables(&self) -> &RiskTables {
        &self.tables
    }

    /// Enrich one port. Every probe degrades to an empty result, so this
    /// always produces a finding.
    pub async fn enrich(&self, host: &str, profile: &PortProfile) -> Finding {
        let mut finding = Finding::from_profile(host, profile);
        let port = profile.port;

        if self.grab_banners {
            finding.banner = self.banner.grab(host, port).await;
            let hits = self.signatures.matches(&finding.banner);
            finding.extra_findings.extend(hits);
        } else {
            finding.banner = NO_BANNER.to_string();
        }

        if let Some(msg) = self.credentials.check(host, port).await {
            finding.extra_findings.push(msg);
        }

        // any live signal is treated as worst case
        if !finding.extra_findings.is_empty() {
            finding.escalate(RiskLevel::High);
        }

        finding.recommendation = self
            .tables
            .recommendation(port, profile.baseline_recommendation)
            .to_string();
        finding.best_practice = self.tables.best_practice(finding.risk()).to_string();

        debug!(
            host,
            port,
            risk = %finding.risk(),
            extra = finding.extra_findings.len(),
            "enriched"
        );
        finding
    }
}
