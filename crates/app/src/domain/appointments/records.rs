//! Appointment Records

use std::{collections::BTreeMap, fmt, str::FromStr};

use gabinet::calendar::MonthGrid;
use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::patients::records::PatientUuid, uuids::TypedUuid};

/// Appointment UUID
pub type AppointmentUuid = TypedUuid<AppointmentRecord>;

/// Appointment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown appointment status {0:?}")]
pub struct UnknownAppointmentStatus(pub String);

impl FromStr for AppointmentStatus {
    type Err = UnknownAppointmentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownAppointmentStatus(other.to_string())),
        }
    }
}

/// Appointment Record
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRecord {
    pub uuid: AppointmentUuid,
    pub patient_uuid: PatientUuid,
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A month grid with the appointments starting on each of its days.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCalendar {
    pub grid: MonthGrid,

    /// Keyed by local start date. Days without appointments are absent.
    pub appointments: BTreeMap<Date, Vec<AppointmentRecord>>,
}
