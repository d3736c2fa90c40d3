//! Canned feed messages
//!
//! The simulator draws from this pool. A few templates splice in a random
//! number or hex string so repeated picks do not look identical.

use super::Severity;
use crate::dashboard::random::RandomSource;
use chrono::Duration;

/// How a template fills its message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBody {
    Fixed(&'static str),
    /// `CVE-2024-<n>` with n in 0..9999
    Cve,
    /// 8 random hex digits
    FileHash,
    /// Port in 0..65535
    Port,
    /// Device count in 50..150
    Devices,
}

/// One entry in the simulator's pool
#[derive(Debug, Clone, Copy)]
pub struct FeedTemplate {
    pub source: &'static str,
    pub severity: Severity,
    pub body: MessageBody,
}

impl FeedTemplate {
    pub fn render(&self, rng: &mut dyn RandomSource) -> String {
        match self.body {
            MessageBody::Fixed(text) => text.to_string(),
            MessageBody::Cve => format!(
                "CVE-2024-{} detected in Apache server",
                rng.range(0, 9999)
            ),
            MessageBody::FileHash => {
                format!("Suspicious file hash detected: {}", rng.hex(8))
            }
            MessageBody::Port => format!(
                "Unusual traffic pattern detected on port {}",
                rng.range(0, 65535)
            ),
            MessageBody::Devices => format!(
                "Real-time protection active on {} devices",
                rng.range(50, 150)
            ),
        }
    }
}

pub const FEED_TEMPLATES: [FeedTemplate; 7] = [
    FeedTemplate {
        source: "PORT-SCAN",
        severity: Severity::Info,
        body: MessageBody::Fixed("TCP scan completed on 192.168.1.0/24 subnet"),
    },
    FeedTemplate {
        source: "VULN-SCAN",
        severity: Severity::High,
        body: MessageBody::Cve,
    },
    FeedTemplate {
        source: "HONEYPOT",
        severity: Severity::Medium,
        body: MessageBody::Fixed("SSH brute force attempt from unknown IP"),
    },
    FeedTemplate {
        source: "MALWARE-DET",
        severity: Severity::High,
        body: MessageBody::FileHash,
    },
    FeedTemplate {
        source: "NETWORK-MON",
        severity: Severity::Medium,
        body: MessageBody::Port,
    },
    FeedTemplate {
        source: "OSINT-INTEL",
        severity: Severity::Info,
        body: MessageBody::Fixed("New threat actor profile added to database"),
    },
    FeedTemplate {
        source: "ENDPOINT-SEC",
        severity: Severity::Info,
        body: MessageBody::Devices,
    },
];

/// Historical entries present when the dashboard comes up
pub struct SeedEntry {
    pub age: Duration,
    pub source: &'static str,
    pub message: &'static str,
    pub severity: Severity,
}

/// Seeds in insertion order; the last one ends up on top
pub fn seed_entries() -> [SeedEntry; 3] {
    [
        SeedEntry {
            age: Duration::seconds(120),
            source: "OSINT-BOT",
            message: "Threat intelligence database updated: 2,847 new IOCs.",
            severity: Severity::Info,
        },
        SeedEntry {
            age: Duration::seconds(60),
            source: "FIREWALL",
            message: "Blocked 15 malicious IP addresses in last hour.",
            severity: Severity::Medium,
        },
        SeedEntry {
            age: Duration::zero(),
            source: "IDS-MONITOR",
            message: "Network baseline established. Monitoring 1,247 endpoints.",
            severity: Severity::Info,
        },
    ]
}

/// Narration logged while the contact form "encrypts"
pub const ENCRYPTION_STEPS: [&str; 4] = [
    "Generating RSA key pair...",
    "Encrypting message with AES-256...",
    "Creating digital signature...",
    "Establishing secure channel...",
];
