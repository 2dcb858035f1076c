//! Case records and form submissions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CaseTreeError, Result};
use crate::flow::StageNode;

/// Custody jurisdiction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustodyType {
    #[default]
    County,
    State,
    Federal,
}

impl CustodyType {
    pub fn as_str(self) -> &'static str {
        match self {
            CustodyType::County => "county",
            CustodyType::State => "state",
            CustodyType::Federal => "federal",
        }
    }
}

impl fmt::Display for CustodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustodyType {
    type Err = CaseTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "county" => Ok(CustodyType::County),
            "state" => Ok(CustodyType::State),
            "federal" => Ok(CustodyType::Federal),
            _ => Err(CaseTreeError::InvalidCustody { value: s.to_string() }),
        }
    }
}

/// One person's case, as persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub dob: String,
    #[serde(deserialize_with = "lenient_custody")]
    pub custody_type: CustodyType,
    #[serde(deserialize_with = "null_as_empty")]
    pub facility: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub next_court_date: String,
    /// Loose reference to a stage id; never checked against the flow
    #[serde(deserialize_with = "null_as_empty")]
    pub current_stage: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Saved custody values are matched case-insensitively; anything else keeps
/// the record and falls back to the default jurisdiction.
fn lenient_custody<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<CustodyType, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %value, "unknown custody type in saved case, using county");
            CustodyType::default()
        }),
        None => CustodyType::default(),
    })
}

impl CaseRecord {
    /// `"<name> • <facility> • Next court: <date>"`
    pub fn summary(&self) -> String {
        format!(
            "{} • {} • Next court: {}",
            self.full_name,
            non_empty_or(&self.facility, "No facility"),
            non_empty_or(&self.next_court_date, "N/A"),
        )
    }

    /// Label of the current stage, if it names one in `flow`
    pub fn stage_label(&self, flow: &StageNode) -> Option<&'static str> {
        flow.find(&self.current_stage).map(|node| node.label)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Raw field values from a form or the command line
#[derive(Debug, Clone, Default)]
pub struct CaseForm {
    pub full_name: String,
    pub dob: String,
    pub custody_type: CustodyType,
    pub facility: String,
    pub next_court_date: String,
    pub current_stage: String,
}

impl CaseForm {
    /// Pre-fill a form from an existing record (edit flow)
    pub fn from_record(record: &CaseRecord) -> Self {
        Self {
            full_name: record.full_name.clone(),
            dob: record.dob.clone(),
            custody_type: record.custody_type,
            facility: record.facility.clone(),
            next_court_date: record.next_court_date.clone(),
            current_stage: record.current_stage.clone(),
        }
    }

    /// Presence check. Only the full name is required.
    pub fn into_record(self) -> Result<CaseRecord> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(CaseTreeError::MissingField { field: "fullName" });
        }
        Ok(CaseRecord {
            full_name: full_name.to_string(),
            dob: self.dob,
            custody_type: self.custody_type,
            facility: self.facility,
            next_court_date: self.next_court_date,
            current_stage: self.current_stage,
        })
    }
}

/// Record inserted when the store starts out empty
pub fn sample_case() -> CaseRecord {
    CaseRecord {
        full_name: "Sample Inmate".to_string(),
        dob: "1990-01-01".to_string(),
        custody_type: CustodyType::County,
        facility: "Bergen County Jail".to_string(),
        next_court_date: "2025-12-01".to_string(),
        current_stage: "arraignment".to_string(),
    }
}
