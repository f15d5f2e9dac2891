use std::fs;

use rustlite_audit::aggregate;
use rustlite_audit::cli::ReportFormat;
use rustlite_audit::report::{save_reports, write_csv_file_atomic, write_json_file_atomic, CSV_HEADER};
use rustlite_audit::risk::RiskTables;
use rustlite_audit::types::{Finding, RiskLevel};

fn sample() -> Vec<Finding> {
    let t = RiskTables::default();
    let mut http = Finding::from_profile("10.0.0.5", t.classify(80).unwrap());
    http.banner = "HTTP/1.0 200 OK\r\nServer: Apache/2.2.8".to_string();
    http.extra_findings = vec!["Apache 2.2 is end-of-life; upgrade to Apache 2.4.".to_string()];
    http.escalate(RiskLevel::High);
    http.best_practice = t.best_practice(RiskLevel::High).to_string();

    let mut ssh = Finding::from_profile("10.0.0.5", t.classify(22).unwrap());
    ssh.best_practice = t.best_practice(RiskLevel::Medium).to_string();
    vec![ssh, http]
}

#[test]
fn json_roundtrip_keeps_contract_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let bundle = aggregate(&sample());
    write_json_file_atomic(&path, &bundle.findings).unwrap();

    let back: Vec<Finding> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, bundle.findings);
    assert_eq!(back[0].risk(), RiskLevel::High);
    assert!(!dir.path().join("out.json.tmp").exists());
}

#[test]
fn csv_has_contract_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    write_csv_file_atomic(&path, &sample()).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(header, CSV_HEADER.to_vec());
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][3], "High");
    assert!(rows[1][7].contains("Apache 2.2"));
}

#[test]
fn save_all_formats() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = aggregate(&sample());
    let written = save_reports(dir.path(), &bundle, ReportFormat::All).unwrap();
    assert_eq!(written.len(), 4);
    let mut exts: Vec<String> = written
        .iter()
        .map(|p| p.extension().unwrap().to_string_lossy().to_string())
        .collect();
    exts.sort();
    assert_eq!(exts, vec!["csv", "html", "json", "txt"]);

    let html = written.iter().find(|p| p.extension().unwrap() == "html").unwrap();
    let html = fs::read_to_string(html).unwrap();
    assert!(html.contains("<tr class=\"high\">"));
    assert!(html.contains("<tr class=\"medium\">"));

    let txt = written.iter().find(|p| p.extension().unwrap() == "txt").unwrap();
    let txt = fs::read_to_string(txt).unwrap();
    assert!(txt.starts_with("Security Risks Report"));
    assert!(txt.contains("Host: 10.0.0.5, Port: 80, Service: HTTP, Risk: High"));
}

#[test]
fn html_always_written() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = aggregate(&sample());
    let written = save_reports(dir.path(), &bundle, ReportFormat::Json).unwrap();
    assert_eq!(written.len(), 2);
    assert!(written.iter().any(|p| p.extension().unwrap() == "html"));
}
