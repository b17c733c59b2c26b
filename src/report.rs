use std::fmt::Write;

use chrono::Datelike;

use crate::models::{AttendanceOverview, AttendanceRecord, AttendanceStatus, MonthlyAttendance};
use crate::status::{classify_status, color_band};

/// Groups records by calendar month, newest month first and newest record
/// first within each month.
pub fn group_by_month(records: &[AttendanceRecord]) -> Vec<MonthlyAttendance> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut months: Vec<MonthlyAttendance> = Vec::new();
    let mut current_key = None;

    for record in sorted {
        let key = (record.date.year(), record.date.month());
        if current_key != Some(key) {
            current_key = Some(key);
            months.push(MonthlyAttendance {
                label: record.date.format("%B %Y").to_string(),
                records: Vec::new(),
            });
        }
        if let Some(month) = months.last_mut() {
            month.records.push(record);
        }
    }

    months
}

pub fn render_summary(email: &str, overview: &AttendanceOverview) -> String {
    let mut output = String::new();

    if overview.student_id.is_none() {
        let _ = writeln!(output, "No student registered for {email}.");
        return output;
    }

    let tier = classify_status(overview.overall_percentage);
    let band = color_band(overview.overall_percentage);
    let _ = writeln!(
        output,
        "Overall attendance for {}: {}% [{}]",
        email,
        overview.overall_percentage,
        band.hex()
    );
    let _ = writeln!(output, "{}: {}", tier.headline(), tier.message());

    if overview.subject_summaries.is_empty() {
        let _ = writeln!(output, "No attendance recorded yet.");
    } else {
        for summary in overview.subject_summaries.iter() {
            let _ = writeln!(
                output,
                "- {} {}% (present {}/{} classes) [{}]",
                summary.name,
                summary.percentage,
                summary.present_classes,
                summary.total_classes,
                color_band(summary.percentage).hex()
            );
        }
    }

    output
}

pub fn build_report(email: &str, overview: &AttendanceOverview) -> String {
    let mut output = String::new();
    let tier = classify_status(overview.overall_percentage);

    let _ = writeln!(output, "# Attendance Report");
    let _ = writeln!(output, "Generated for {email}");
    let _ = writeln!(output);

    if overview.student_id.is_none() {
        let _ = writeln!(output, "No student registered for this email.");
        return output;
    }

    let _ = writeln!(output, "## Overall");
    let _ = writeln!(
        output,
        "- {}% ({}): {}",
        overview.overall_percentage,
        tier.headline(),
        tier.message()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subjects");

    if overview.subject_summaries.is_empty() {
        let _ = writeln!(output, "No attendance recorded yet.");
    } else {
        for summary in overview.subject_summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {}% (present {}/{} classes)",
                summary.name, summary.percentage, summary.present_classes, summary.total_classes
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## History");

    let months = group_by_month(&overview.records);
    if months.is_empty() {
        let _ = writeln!(output, "No attendance recorded yet.");
    }
    for month in months.iter() {
        let _ = writeln!(output, "### {}", month.label);
        for record in month.records.iter() {
            let subject = overview
                .summary_for(record.subject_id)
                .map(|summary| summary.name.as_str())
                .unwrap_or("unknown subject");
            let mark = match record.status {
                AttendanceStatus::Present => "PRESENT",
                AttendanceStatus::Absent => "ABSENT",
            };
            let _ = writeln!(
                output,
                "- {} {}: {}",
                record.date.format("%d %b"),
                subject,
                mark
            );
        }
    }

    output
}
