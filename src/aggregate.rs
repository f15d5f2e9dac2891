use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::types::{Finding, ReportBundle, RiskCounts};

/// Order findings High → Medium → Low, tally them and group by host.
///
/// The sort is stable, so equal-risk findings keep their input order.
/// Input is not modified.
pub fn aggregate(findings: &[Finding]) -> ReportBundle {
    let mut sorted = findings.to_vec();
    sorted.sort_by_key(|f| Reverse(f.risk()));

    let mut counts = RiskCounts::default();
    let mut grouped_by_host: BTreeMap<String, Vec<Finding>> = BTreeMap::new();
    for f in &sorted {
        counts.add(f.risk());
        grouped_by_host.entry(f.host().to_string()).or_default().push(f.clone());
    }

    ReportBundle { findings: sorted, counts, grouped_by_host }
}
