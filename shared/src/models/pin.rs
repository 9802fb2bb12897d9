//! PIN Session Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseEnumError;

/// PIN session status
///
/// `Active -> Inactive` is one-way. Re-opening a table always issues a new
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinStatus {
    Active,
    Inactive,
}

impl PinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinStatus::Active => "active",
            PinStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PinStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PinStatus::Active),
            "inactive" => Ok(PinStatus::Inactive),
            other => Err(ParseEnumError::new("pin status", other)),
        }
    }
}

/// Open table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTableRequest {
    pub table_id: String,
}

/// Session list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinListQuery {
    pub status: Option<String>,
}
