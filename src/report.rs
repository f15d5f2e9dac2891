use anyhow::Result;
use chrono::Local;
use colored::*;
use csv::Writer;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::ReportFormat;
use crate::types::{Finding, ReportBundle, RiskLevel};

pub const CSV_HEADER: [&str; 8] = [
    "host",
    "port",
    "service",
    "risk",
    "recommendation",
    "best_practice",
    "banner",
    "extra_findings",
];

fn tmp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".tmp");
    PathBuf::from(s)
}

/// Write the severity-ordered findings as a JSON array via temp file + rename.
pub fn write_json_file_atomic(path: &Path, findings: &[Finding]) -> Result<()> {
    let tmp = tmp_path(path);
    let f = File::create(&tmp)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, findings)?;
    w.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn write_csv_file_atomic(path: &Path, findings: &[Finding]) -> Result<()> {
    let tmp = tmp_path(path);
    let f = File::create(&tmp)?;
    let mut wtr = Writer::from_writer(BufWriter::new(f));

    wtr.write_record(CSV_HEADER)?;
    for r in findings {
        let port = r.port().to_string();
        let extra = r.extra_findings.join("; ");
        wtr.write_record([
            r.host(),
            port.as_str(),
            r.service.as_str(),
            r.risk().as_str(),
            r.recommendation.as_str(),
            r.best_practice.as_str(),
            r.banner.as_str(),
            extra.as_str(),
        ])?;
    }

    wtr.flush()?;
    drop(wtr);
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn write_txt_file(path: &Path, findings: &[Finding]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "Security Risks Report")?;
    writeln!(w, "{}", "=".repeat(50))?;
    for r in findings {
        write!(
            w,
            "Host: {}, Port: {}, Service: {}, Risk: {}, Fix: {}, Best practice: {}, Banner: {}",
            r.host(),
            r.port(),
            r.service,
            r.risk(),
            r.recommendation,
            r.best_practice,
            r.banner.replace(['\r', '\n'], " ")
        )?;
        if !r.extra_findings.is_empty() {
            write!(w, ", Findings: {}", r.extra_findings.join("; "))?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const HTML_HEAD: &str = r#"<html>
<head>
    <title>Security Scan Report</title>
    <style>
        body { font-family: Arial, sans-serif; background: #f4f4f4; padding: 20px; }
        h1 { text-align: center; }
        table { border-collapse: collapse; width: 100%; background: white; }
        th, td { border: 1px solid #ccc; padding: 8px; text-align: center; }
        th { background: #333; color: white; }
        .high { background: #ffcccc; }
        .medium { background: #fff5cc; }
        .low { background: #ccffcc; }
    </style>
</head>
<body>
    <h1>Security Scan Report</h1>
"#;

pub fn render_html(bundle: &ReportBundle) -> String {
    let mut html = String::from(HTML_HEAD);
    html.push_str(&format!(
        "    <p>High: {} &nbsp; Medium: {} &nbsp; Low: {}</p>\n",
        bundle.counts.high, bundle.counts.medium, bundle.counts.low
    ));
    html.push_str("    <table>\n        <tr>\n            <th>Host</th><th>Port</th><th>Service</th><th>Risk</th><th>Recommendation</th><th>Best Practice</th><th>Banner</th><th>Findings</th>\n        </tr>\n");
    for r in &bundle.findings {
        html.push_str(&format!(
            "        <tr class=\"{}\">\n            <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\n        </tr>\n",
            r.risk().as_str().to_lowercase(),
            html_escape(r.host()),
            r.port(),
            html_escape(&r.service),
            r.risk(),
            html_escape(&r.recommendation),
            html_escape(&r.best_practice),
            html_escape(&r.banner),
            html_escape(&r.extra_findings.join("; ")),
        ));
    }
    html.push_str("    </table>\n</body>\n</html>\n");
    html
}

pub fn write_html_file(path: &Path, bundle: &ReportBundle) -> Result<()> {
    fs::write(path, render_html(bundle))?;
    Ok(())
}

/// Write every requested export under `dir` as
/// `scan_results_<timestamp>.<ext>`. HTML is always produced.
///
/// A failed export is logged and the rest still run. Returns the paths written.
pub fn save_reports(dir: &Path, bundle: &ReportBundle, format: ReportFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let path_for = |ext: &str| dir.join(format!("scan_results_{}.{}", stamp, ext));

    let mut exts = Vec::new();
    if format.includes(ReportFormat::Csv) {
        exts.push("csv");
    }
    if format.includes(ReportFormat::Txt) {
        exts.push("txt");
    }
    if format.includes(ReportFormat::Json) {
        exts.push("json");
    }
    exts.push("html");

    let mut written = Vec::new();
    for ext in exts {
        let path = path_for(ext);
        let res = match ext {
            "csv" => write_csv_file_atomic(&path, &bundle.findings),
            "txt" => write_txt_file(&path, &bundle.findings),
            "json" => write_json_file_atomic(&path, &bundle.findings),
            _ => write_html_file(&path, bundle),
        };
        match res {
            Ok(()) => {
                info!(path = %path.display(), "report saved");
                written.push(path);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write report"),
        }
    }
    Ok(written)
}

fn colored_risk(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::High => level.as_str().red().bold(),
        RiskLevel::Medium => level.as_str().yellow().bold(),
        RiskLevel::Low => level.as_str().green().bold(),
    }
}

/// Human-readable summary on stdout.
pub fn print_summary(bundle: &ReportBundle) {
    if bundle.findings.is_empty() {
        println!("{}", "No misconfigurations detected.".green().bold());
        return;
    }

    println!("{}", "Security Risks Summary".bold().underline());
    for (host, findings) in &bundle.grouped_by_host {
        println!("Host: {}", host.cyan().bold());
        for r in findings {
            println!(
                "  {:>5}  {:<8} {:<6}  {}",
                r.port().to_string().magenta(),
                r.service.green(),
                colored_risk(r.risk()),
                r.recommendation.yellow()
            );
            if r.banner != crate::types::NO_BANNER {
                println!("         banner: {}", r.banner.replace(['\r', '\n'], " ").dimmed());
            }
            for extra in &r.extra_findings {
                println!("         {} {}", "!".red().bold(), extra);
            }
        }
    }
    println!();
    println!(
        "{} {}   {} {}   {} {}",
        "High Risks:".red().bold(),
        bundle.counts.high,
        "Medium Risks:".yellow().bold(),
        bundle.counts.medium,
        "Low Risks:".green().bold(),
        bundle.counts.low
    );
}
