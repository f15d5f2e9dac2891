use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered severity. Variant order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static classification of a well-known port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortProfile {
    pub port: u16,
    pub service: &'static str,
    pub baseline_risk: RiskLevel,
    pub baseline_recommendation: &'static str,
}

/// One enriched record per classified (host, port).
///
/// Field names are the contract with the exporters and the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    host: String,
    port: u16,
    pub service: String,
    risk: RiskLevel,
    pub recommendation: String,
    pub best_practice: String,
    pub banner: String,
    pub extra_findings: Vec<String>,
}

pub const NO_BANNER: &str = "N/A";

impl Finding {
    /// Start a finding from the port's baseline classification.
    pub fn from_profile(host: &str, profile: &PortProfile) -> Self {
        Self {
            host: host.to_string(),
            port: profile.port,
            service: profile.service.to_string(),
            risk: profile.baseline_risk,
            recommendation: profile.baseline_recommendation.to_string(),
            best_practice: String::new(),
            banner: NO_BANNER.to_string(),
            extra_findings: Vec::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    /// Raise the risk to at least `level`. Never lowers it.
    pub fn escalate(&mut self, level: RiskLevel) {
        self.risk = self.risk.max(level);
    }
}

/// Per-severity tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    #[serde(rename = "High")]
    pub high: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "Low")]
    pub low: usize,
}

impl RiskCounts {
    pub fn add(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Final, severity-ordered output of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportBundle {
    pub findings: Vec<Finding>,
    pub counts: RiskCounts,
    pub grouped_by_host: BTreeMap<String, Vec<Finding>>,
}

/// Discovery output: one live host and its open TCP ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostPorts {
    pub host: String,
    pub open_ports: Vec<u16>,
}

impl HostPorts {
    pub fn new(host: impl Into<String>, open_ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            host: host.into(),
            open_ports: open_ports.into_iter().collect(),
        }
    }
}
