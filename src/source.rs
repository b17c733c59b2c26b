//! Read-side seam between the aggregator and whatever backend stores
//! students, subjects and attendance rows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SourceError;
use crate::models::{AttendanceRecord, Student, Subject};

#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Zero-or-one student registered under `email`.
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, SourceError>;

    /// Every subject, unfiltered.
    async fn list_subjects(&self) -> Result<Vec<Subject>, SourceError>;

    /// Records for one student in one subject, newest date first.
    async fn fetch_attendance(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<AttendanceRecord>, SourceError>;
}
