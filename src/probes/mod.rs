pub mod banner;
pub mod credentials;
pub mod helper;

pub use banner::TcpBannerProbe;
pub use credentials::DefaultCredentialProbe;

use async_trait::async_trait;
use std::sync::Arc;

/// Source of banner text for a host:port.
#[async_trait]
pub trait BannerGrabber: Send + Sync {
    /// Banner text, or `"N/A"` when nothing usable was read. Never fails.
    async fn grab(&self, host: &str, port: u16) -> String;
}

/// Default-credential check for a host:port.
#[async_trait]
pub trait CredentialChecker: Send + Sync {
    /// A finding message if a default credential was accepted, else `None`.
    async fn check(&self, host: &str, port: u16) -> Option<String>;
}

pub type BannerHandle = Arc<dyn BannerGrabber>;
pub type CredentialHandle = Arc<dyn CredentialChecker>;
