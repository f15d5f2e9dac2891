use std::collections::HashMap;

use crate::types::{PortProfile, RiskLevel};

const fn profile(
    port: u16,
    service: &'static str,
    baseline_risk: RiskLevel,
    baseline_recommendation: &'static str,
) -> PortProfile {
    PortProfile { port, service, baseline_risk, baseline_recommendation }
}

/// Ports evaluated by the assessment. Anything else is skipped.
pub const PORT_RISKS: &[PortProfile] = &[
    profile(21, "FTP", RiskLevel::High, "Disable FTP or switch to SFTP"),
    profile(22, "SSH", RiskLevel::Medium, "Limit access with firewall or keys"),
    profile(23, "Telnet", RiskLevel::High, "Disable Telnet; use SSH"),
    profile(25, "SMTP", RiskLevel::Medium, "Ensure authentication and TLS is used"),
    profile(53, "DNS", RiskLevel::Medium, "Secure DNS or use internal DNS server"),
    profile(80, "HTTP", RiskLevel::Medium, "Enable HTTPS"),
    profile(139, "NetBIOS", RiskLevel::High, "Disable or segment SMB"),
    profile(443, "HTTPS", RiskLevel::Low, "Secure"),
    profile(445, "SMB", RiskLevel::High, "Disable or use modern authentication"),
    profile(3389, "RDP", RiskLevel::High, "Restrict RDP access and enable 2FA"),
];

pub const REMEDIATION_GUIDE: &[(u16, &str)] = &[
    (21, "Disable FTP or use SFTP (port 22) for secure file transfer."),
    (22, "Use key-based SSH authentication and disable password logins."),
    (23, "Disable Telnet; use SSH instead for secure remote access."),
    (25, "Use secure email protocols like SMTPS; restrict open relays."),
    (80, "Enable HTTPS with SSL/TLS certificates instead of HTTP."),
    (110, "Use secure email retrieval (IMAPS/POP3S) instead of plain POP3."),
    (139, "Restrict SMB access to trusted IPs; update SMB to the latest version."),
    (445, "Disable SMBv1; restrict SMB shares and require authentication."),
    (3389, "Restrict RDP to trusted IPs; enable Network Level Authentication."),
];

pub const BEST_PRACTICES: &[(RiskLevel, &str)] = &[
    (RiskLevel::High, "Immediately patch or disable the vulnerable service and restrict access."),
    (RiskLevel::Medium, "Schedule updates, review user permissions, and restrict unnecessary access."),
    (RiskLevel::Low, "Keep software updated and apply general security hardening best practices."),
];

/// Read-only lookup tables, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct RiskTables {
    profiles: HashMap<u16, PortProfile>,
    remediation: HashMap<u16, &'static str>,
    best_practice: HashMap<RiskLevel, &'static str>,
}

impl Default for RiskTables {
    fn default() -> Self {
        Self::new(PORT_RISKS, REMEDIATION_GUIDE, BEST_PRACTICES)
    }
}

impl RiskTables {
    pub fn new(
        profiles: &[PortProfile],
        remediation: &[(u16, &'static str)],
        best_practice: &[(RiskLevel, &'static str)],
    ) -> Self {
        Self {
            profiles: profiles.iter().map(|p| (p.port, p.clone())).collect(),
            remediation: remediation.iter().copied().collect(),
            best_practice: best_practice.iter().copied().collect(),
        }
    }

    /// Baseline profile for `port`, or `None` if the port is not evaluated.
    pub fn classify(&self, port: u16) -> Option<&PortProfile> {
        self.profiles.get(&port)
    }

    /// Port-specific remediation, falling back to `default`.
    pub fn recommendation<'a>(&self, port: u16, default: &'a str) -> &'a str {
        self.remediation.get(&port).copied().unwrap_or(default)
    }

    pub fn best_practice(&self, risk: RiskLevel) -> &'static str {
        self.best_practice.get(&risk).copied().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_and_unknown() {
        let t = RiskTables::default();
        let ftp = t.classify(21).unwrap();
        assert_eq!(ftp.service, "FTP");
        assert_eq!(ftp.baseline_risk, RiskLevel::High);
        assert_eq!(t.classify(443).unwrap().baseline_risk, RiskLevel::Low);
        assert!(t.classify(8081).is_none());
        assert!(t.classify(110).is_none());
    }

    #[test]
    fn recommendation_falls_back_to_baseline() {
        let t = RiskTables::default();
        assert_eq!(
            t.recommendation(80, "Enable HTTPS"),
            "Enable HTTPS with SSL/TLS certificates instead of HTTP."
        );
        assert_eq!(t.recommendation(443, "Secure"), "Secure");
        assert_eq!(
            t.recommendation(53, "Secure DNS or use internal DNS server"),
            "Secure DNS or use internal DNS server"
        );
    }

    #[test]
    fn every_level_has_best_practice() {
        let t = RiskTables::default();
        for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low] {
            assert!(!t.best_practice(level).is_empty());
        }
        assert_ne!(t.best_practice(RiskLevel::High), t.best_practice(RiskLevel::Low));
    }
}
