use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::DashboardError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorProfile {
    pub name: String,
    pub handle: String,
    pub host: String,
    pub title: String,
    pub clearance: String,
    pub summary: Vec<String>,
}

impl Default for OperatorProfile {
    fn default() -> Self {
        Self {
            name: "Security Analyst".to_owned(),
            handle: "analyst".to_owned(),
            host: "cybersec-workstation".to_owned(),
            title: "Security Analyst | OSINT Specialist".to_owned(),
            clearance: "AUTHORIZED".to_owned(),
            summary: vec![
                "Blue-team analyst focused on detection engineering and threat hunting.".to_owned(),
                "Comfortable across SIEM pipelines, packet captures and OSINT tooling.".to_owned(),
                "Runs a home lab for malware triage and CTF practice.".to_owned(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub target: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub code: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCard {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntelEntry {
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyTarget {
    pub label: String,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedState {
    Active,
    Warning,
    Idle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Led {
    pub label: String,
    pub state: LedState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub operator: OperatorProfile,
    pub metrics: Vec<Metric>,
    pub operations: Vec<Operation>,
    pub skills: Vec<Skill>,
    pub tools: Vec<ToolCard>,
    pub intel: Vec<IntelEntry>,
    pub contact: Vec<CopyTarget>,
    pub leds: Vec<Led>,
    pub boot_lines: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let metric = |label: &str, target| Metric {
            label: label.to_owned(),
            target,
        };
        let op = |code: &str, name: &str, status: &str, summary: &str| Operation {
            code: code.to_owned(),
            name: name.to_owned(),
            status: status.to_owned(),
            summary: summary.to_owned(),
        };
        let skill = |name: &str, level| Skill {
            name: name.to_owned(),
            level,
        };
        let tool = |name: &str, category: &str, description: &str, actions: &[&str]| ToolCard {
            name: name.to_owned(),
            category: category.to_owned(),
            description: description.to_owned(),
            actions: actions.iter().map(|a| (*a).to_owned()).collect(),
        };
        let intel = |title: &str, detail: &str| IntelEntry {
            title: title.to_owned(),
            detail: detail.to_owned(),
        };
        let led = |label: &str, state| Led {
            label: label.to_owned(),
            state,
        };

        Self {
            operator: OperatorProfile::default(),
            metrics: vec![
                metric("Incidents Triaged", 247),
                metric("IOCs Catalogued", 512),
                metric("CTF Flags", 86),
            ],
            operations: vec![
                op("OP-01", "Phishing Triage Pipeline", "ACTIVE", "Automated header and URL analysis for reported mail."),
                op("OP-02", "Honeypot Grid", "MONITORING", "SSH and HTTP decoys feeding a local SIEM."),
                op("OP-03", "OSINT Recon Toolkit", "COMPLETE", "Passive footprinting scripts for scoped engagements."),
            ],
            skills: vec![
                skill("Network Security", 90),
                skill("Incident Response", 85),
                skill("OSINT", 88),
                skill("Malware Analysis", 70),
                skill("Python Scripting", 80),
            ],
            tools: vec![
                tool("Wireshark", "Network", "Packet capture and protocol analysis", &["Launch", "Capture"]),
                tool("Nmap", "Recon", "Port and service discovery", &["Scan"]),
                tool("Burp Suite", "Web", "Intercepting proxy for web testing", &["Launch", "Intercept"]),
                tool("Splunk", "SIEM", "Log aggregation and correlation", &["Query"]),
            ],
            intel: vec![
                intel("CompTIA Security+", "Certified"),
                intel("Threat Hunting Playbooks", "MITRE ATT&CK mapped detections"),
                intel("CTF Writeups", "Forensics and OSINT categories"),
            ],
            contact: vec![
                CopyTarget {
                    label: "Email".to_owned(),
                    payload: "analyst@example.com".to_owned(),
                },
                CopyTarget {
                    label: "PGP".to_owned(),
                    payload: "0xA1B2C3D4E5F60718".to_owned(),
                },
            ],
            leds: vec![
                led("FW", LedState::Active),
                led("IDS", LedState::Active),
                led("VPN", LedState::Warning),
                led("AV", LedState::Idle),
            ],
            boot_lines: vec![
                "[ OK ] Loading kernel security modules...".to_owned(),
                "[ OK ] Initializing intrusion detection system...".to_owned(),
                "[ OK ] Mounting encrypted volumes...".to_owned(),
                "[ OK ] Establishing secure network tunnel...".to_owned(),
                "[ OK ] Loading threat intelligence feeds...".to_owned(),
                "[ OK ] Starting SOC dashboard...".to_owned(),
            ],
        }
    }
}

impl DashboardConfig {
    /// Where the config lives when no path is given
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("soc-dashboard").join("config.json"))
    }

    /// Load from `path`, or from the default location. A missing file at the
    /// default location means defaults; a missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!(DashboardError::Config(format!(
                    "{} does not exist",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("invalid json in {}", path.display()))?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(skill) = self.skills.iter().find(|s| s.level > 100) {
            anyhow::bail!(DashboardError::Config(format!(
                "skill '{}' level {} exceeds 100",
                skill.name, skill.level
            )));
        }
        Ok(())
    }
}
