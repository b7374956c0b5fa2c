//! Contact record model
//!
//! The persisted shape is a flat JSON object with camelCase keys, all values
//! strings. Text fields that are missing or `null` in stored data read back
//! as empty strings.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Write};

use crate::error::{CrmError, CrmResult};

use super::ids::RecordId;

/// he-IL `toLocaleString` style, e.g. `19.10.2026, 14:05:33`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-d.%-m.%Y, %H:%M:%S";

/// One contact entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,

    /// Display text captured at creation; never parsed back
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reject strftime formats chrono cannot render
pub fn validate_timestamp_format(format: &str) -> CrmResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(CrmError::Config(format!(
            "Invalid timestamp format: {:?}",
            format
        )));
    }
    Ok(())
}

/// The five user-supplied fields of a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub notes: String,
}

impl NewRecord {
    /// Copy with leading/trailing whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}

impl Record {
    /// Build a record with a fresh id, stamped with the local time
    pub fn new(fields: NewRecord, timestamp_format: &str) -> CrmResult<Self> {
        Self::with_timestamp(fields, &Local::now(), timestamp_format)
    }

    /// Build a record with a fresh id and an explicit creation instant
    pub fn with_timestamp<Tz>(
        fields: NewRecord,
        at: &DateTime<Tz>,
        timestamp_format: &str,
    ) -> CrmResult<Self>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut created_at = String::new();
        write!(created_at, "{}", at.format(timestamp_format)).map_err(|_| {
            CrmError::Config(format!("Invalid timestamp format: {:?}", timestamp_format))
        })?;

        Ok(Self {
            id: RecordId::new(),
            full_name: fields.full_name,
            phone: fields.phone,
            email: fields.email,
            company: fields.company,
            notes: fields.notes,
            created_at,
        })
    }

    /// The six exported/displayed columns, in fixed order
    pub fn columns(&self) -> [&str; 6] {
        [
            self.full_name.as_str(),
            self.phone.as_str(),
            self.email.as_str(),
            self.company.as_str(),
            self.notes.as_str(),
            self.created_at.as_str(),
        ]
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.full_name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}", self.full_name)
        }
    }
}
