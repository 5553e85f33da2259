// Status enums and the status -> presentation lookup tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SampleError;

/// Health of one service at one instant. Ordered by severity so "worst wins"
/// reductions are plain `max()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    #[default]
    Operational,
    Degraded,
    Outage,
}

/// Rollup of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Operational,
    Mixed,
    Outage,
}

/// Display attributes for a status value (badge label, color token, icon name).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const STATUS_STYLES: [StatusStyle; 3] = [
    StatusStyle {
        label: "Operational",
        color: "emerald",
        icon: "check-circle",
    },
    StatusStyle {
        label: "Degraded",
        color: "amber",
        icon: "alert-circle",
    },
    StatusStyle {
        label: "Outage",
        color: "red",
        icon: "x-circle",
    },
];

const DAY_STYLES: [StatusStyle; 3] = [
    StatusStyle {
        label: "Fully Operational",
        color: "emerald",
        icon: "check-circle",
    },
    StatusStyle {
        label: "Partial Outages",
        color: "amber",
        icon: "alert-triangle",
    },
    StatusStyle {
        label: "Major Outage",
        color: "red",
        icon: "x-circle",
    },
];

const BANNERS: [&str; 3] = [
    "All Systems Operational",
    "Partial Degradation",
    "Service Outage",
];

impl StatusKind {
    pub const ALL: [StatusKind; 3] = [
        StatusKind::Operational,
        StatusKind::Degraded,
        StatusKind::Outage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Operational => "operational",
            StatusKind::Degraded => "degraded",
            StatusKind::Outage => "outage",
        }
    }

    pub fn is_operational(self) -> bool {
        self == StatusKind::Operational
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn style(self) -> &'static StatusStyle {
        &STATUS_STYLES[self.index()]
    }

    /// Headline shown for the whole deployment when this is the overall status.
    pub fn banner(self) -> &'static str {
        BANNERS[self.index()]
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        StatusKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SampleError::UnknownStatus(s.to_string()))
    }
}

impl DayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Operational => "operational",
            DayStatus::Mixed => "mixed",
            DayStatus::Outage => "outage",
        }
    }

    pub fn style(self) -> &'static StatusStyle {
        &DAY_STYLES[self as usize]
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
