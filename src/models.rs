use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            other => anyhow::bail!("unknown attendance status `{other}` (expected present or absent)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Student {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectAttendanceSummary {
    pub subject_id: Uuid,
    pub name: String,
    pub total_classes: usize,
    pub present_classes: usize,
    pub percentage: u8,
}

/// Result of one aggregation run for a single student.
///
/// `student_id` is `None` when the email did not resolve to a student, in
/// which case the summaries are empty and the overall percentage is 0.
/// `records` holds every fetched row, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttendanceOverview {
    pub student_id: Option<Uuid>,
    pub overall_percentage: u8,
    pub subject_summaries: Vec<SubjectAttendanceSummary>,
    #[serde(skip)]
    pub records: Vec<AttendanceRecord>,
}

impl AttendanceOverview {
    pub fn summary_for(&self, subject_id: Uuid) -> Option<&SubjectAttendanceSummary> {
        self.subject_summaries
            .iter()
            .find(|summary| summary.subject_id == subject_id)
    }
}

#[derive(Debug, Clone)]
pub struct MonthlyAttendance {
    pub label: String,
    pub records: Vec<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_loosely() {
        assert_eq!(" Present ".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Present);
        assert_eq!("ABSENT".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Absent);
        assert_eq!(AttendanceStatus::Absent.to_string(), "absent");
    }

    #[test]
    fn status_rejects_unknown_values() {
        let err = "late".parse::<AttendanceStatus>().unwrap_err();
        assert!(err.to_string().contains("unknown attendance status `late`"));
        assert!("".parse::<AttendanceStatus>().is_err());
    }
}
