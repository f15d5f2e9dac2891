//! Banner-based detection of known vulnerable or end-of-life service versions.

use crate::types::NO_BANNER;

/// (case-insensitive substring, message) pairs, checked in order.
pub const DEFAULT_SIGNATURES: &[(&str, &str)] = &[
    ("vsFTPd 2.3.4", "vsftpd 2.3.4 ships a known backdoor (CVE-2011-2523); upgrade vsftpd immediately."),
    ("ProFTPD 1.3.3c", "ProFTPD 1.3.3c source release was backdoored; upgrade ProFTPD."),
    ("OpenSSH_7.2", "OpenSSH 7.2 allows user enumeration (CVE-2016-6210); upgrade OpenSSH."),
    ("OpenSSH_5.", "OpenSSH 5.x is end-of-life; upgrade OpenSSH."),
    ("Apache/2.4.49", "Apache 2.4.49 is vulnerable to path traversal (CVE-2021-41773); upgrade Apache."),
    ("Apache/2.2", "Apache 2.2 is end-of-life; upgrade to Apache 2.4."),
    ("Microsoft-IIS/6.0", "IIS 6.0 WebDAV is vulnerable to remote code execution (CVE-2017-7269); upgrade IIS."),
    ("OpenSSL/1.0.1", "OpenSSL 1.0.1 may be vulnerable to Heartbleed (CVE-2014-0160); upgrade OpenSSL."),
    ("PHP/5.", "PHP 5 is end-of-life; upgrade PHP."),
];

#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    // needles are stored lowercased
    signatures: Vec<(String, String)>,
}

impl Default for SignatureMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURES.iter().copied())
    }
}

impl SignatureMatcher {
    pub fn new<'a>(signatures: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            signatures: signatures
                .into_iter()
                .map(|(sig, msg)| (sig.to_lowercase(), msg.to_string()))
                .collect(),
        }
    }

    /// All messages whose signature occurs in `banner`, in table order.
    pub fn matches(&self, banner: &str) -> Vec<String> {
        if banner.is_empty() || banner == NO_BANNER {
            return Vec::new();
        }
        let haystack = banner.to_lowercase();
        self.signatures
            .iter()
            .filter(|(sig, _)| haystack.contains(sig.as_str()))
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}
