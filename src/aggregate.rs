use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::{AttendanceError, FetchOperation};
use crate::models::{
    AttendanceOverview, AttendanceRecord, AttendanceStatus, Subject, SubjectAttendanceSummary,
};
use crate::source::AttendanceSource;

pub fn compute_subject_summary(
    records: &[AttendanceRecord],
    subject: &Subject,
) -> SubjectAttendanceSummary {
    let total_classes = records.len();
    let present_classes = records
        .iter()
        .filter(|record| record.status == AttendanceStatus::Present)
        .count();

    SubjectAttendanceSummary {
        subject_id: subject.id,
        name: subject.name.clone(),
        total_classes,
        present_classes,
        percentage: rounded_percentage(present_classes, total_classes),
    }
}

/// Unweighted mean of the per-subject percentages.
pub fn compute_overall_percentage(summaries: &[SubjectAttendanceSummary]) -> u8 {
    if summaries.is_empty() {
        return 0;
    }
    let sum: usize = summaries
        .iter()
        .map(|summary| summary.percentage as usize)
        .sum();
    rounded_ratio(sum, summaries.len())
}

/// `round(100 * part / whole)`, half-up, 0 when `whole` is 0.
pub fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    rounded_ratio(part.min(whole) * 100, whole)
}

fn rounded_ratio(numerator: usize, denominator: usize) -> u8 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    rounded.min(100) as u8
}

/// Resolves `email` to a student and aggregates their attendance across the
/// subject catalog.
///
/// Per-subject fetches run concurrently. The first failing fetch aborts the
/// whole aggregation; dropping the returned future aborts fetches in flight.
pub async fn fetch_and_aggregate(
    source: Arc<dyn AttendanceSource>,
    email: &str,
) -> Result<AttendanceOverview, AttendanceError> {
    let student = source
        .find_student_by_email(email)
        .await
        .map_err(|err| AttendanceError::fetch(FetchOperation::IdentityLookup, err))?;

    let Some(student) = student else {
        info!(email, "no student registered for email");
        return Ok(AttendanceOverview::default());
    };
    debug!(student_id = %student.id, name = %student.full_name, email = %student.email, "resolved student");

    let subjects = source
        .list_subjects()
        .await
        .map_err(|err| AttendanceError::fetch(FetchOperation::SubjectCatalog, err))?;
    debug!(count = subjects.len(), "loaded subject catalog");

    let mut fetches = JoinSet::new();
    for (index, subject) in subjects.iter().enumerate() {
        let source = Arc::clone(&source);
        let student_id = student.id;
        let subject_id = subject.id;
        fetches.spawn(async move {
            let records = source.fetch_attendance(student_id, subject_id).await;
            (index, subject_id, records)
        });
    }

    let mut slots: Vec<Option<SubjectAttendanceSummary>> = vec![None; subjects.len()];
    let mut records = Vec::new();
    while let Some(joined) = fetches.join_next().await {
        let (index, subject_id, fetched) = joined?;
        let fetched = fetched.map_err(|err| {
            AttendanceError::fetch(FetchOperation::Attendance { subject_id }, err)
        })?;
        debug!(%subject_id, records = fetched.len(), "fetched attendance");

        slots[index] = Some(compute_subject_summary(&fetched, &subjects[index]));
        records.extend(fetched);
    }
    records.sort_by(|a, b| b.date.cmp(&a.date));

    let subject_summaries: Vec<SubjectAttendanceSummary> = slots.into_iter().flatten().collect();
    let overall_percentage = compute_overall_percentage(&subject_summaries);
    info!(
        student_id = %student.id,
        subjects = subject_summaries.len(),
        overall_percentage,
        "aggregated attendance"
    );

    Ok(AttendanceOverview {
        student_id: Some(student.id),
        overall_percentage,
        subject_summaries,
        records,
    })
}
