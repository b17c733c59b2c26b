use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SourceError;
use crate::models::{AttendanceRecord, AttendanceStatus, Student, Subject};
use crate::source::AttendanceSource;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let students = vec![
        (
            Uuid::parse_str("6b1f3c52-0e0a-4c3e-9a57-1f5c2f6a9d01")?,
            "Asha Menon",
            "asha.menon@cusat.ac.in",
        ),
        (
            Uuid::parse_str("a3d8e7b4-52c1-4f0b-8e2a-7c94d1b6f302")?,
            "Rahul Nair",
            "rahul.nair@cusat.ac.in",
        ),
    ];

    for (id, name, email) in students {
        sqlx::query(
            r#"
            INSERT INTO campus_connect.students (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(pool)
        .await?;
    }

    let data_structures = ensure_subject(pool, "Data Structures").await?;
    let networks = ensure_subject(pool, "Computer Networks").await?;
    let databases = ensure_subject(pool, "Database Systems").await?;

    let rows = vec![
        ("asha.menon@cusat.ac.in", data_structures, (2026, 2, 2), AttendanceStatus::Present),
        ("asha.menon@cusat.ac.in", data_structures, (2026, 2, 4), AttendanceStatus::Present),
        ("asha.menon@cusat.ac.in", data_structures, (2026, 2, 6), AttendanceStatus::Absent),
        ("asha.menon@cusat.ac.in", networks, (2026, 2, 3), AttendanceStatus::Present),
        ("rahul.nair@cusat.ac.in", data_structures, (2026, 1, 28), AttendanceStatus::Absent),
        ("rahul.nair@cusat.ac.in", databases, (2026, 1, 29), AttendanceStatus::Present),
        ("rahul.nair@cusat.ac.in", databases, (2026, 2, 5), AttendanceStatus::Absent),
    ];

    for (email, subject_id, (year, month, day), status) in rows {
        let student_id = find_student_id(pool, email)
            .await?
            .with_context(|| format!("seed student {email} missing"))?;
        let date = NaiveDate::from_ymd_opt(year, month, day).context("invalid date")?;
        upsert_attendance(pool, student_id, subject_id, date, status).await?;
    }

    Ok(())
}

pub async fn find_student_id(pool: &PgPool, email: &str) -> anyhow::Result<Option<Uuid>> {
    let row = sqlx::query("SELECT id FROM campus_connect.students WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|row| row.get("id")))
}

pub async fn find_subject_id(pool: &PgPool, name: &str) -> anyhow::Result<Option<Uuid>> {
    let row = sqlx::query("SELECT id FROM campus_connect.subjects WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|row| row.get("id")))
}

pub async fn ensure_subject(pool: &PgPool, name: &str) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO campus_connect.subjects (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

/// Writes one attendance row; an existing row for the same student, subject
/// and date has its status replaced.
pub async fn upsert_attendance(
    pool: &PgPool,
    student_id: Uuid,
    subject_id: Uuid,
    date: NaiveDate,
    status: AttendanceStatus,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO campus_connect.attendance (student_id, subject_id, date, status)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (student_id, subject_id, date) DO UPDATE
        SET status = EXCLUDED.status, updated_at = now()
        "#,
    )
    .bind(student_id)
    .bind(subject_id)
    .bind(date)
    .bind(status.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn mark_attendance(
    pool: &PgPool,
    email: &str,
    subject: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> anyhow::Result<()> {
    let student_id = find_student_id(pool, email)
        .await?
        .with_context(|| format!("no student registered for {email}"))?;
    let subject_id = find_subject_id(pool, subject)
        .await?
        .with_context(|| format!("unknown subject `{subject}`"))?;

    upsert_attendance(pool, student_id, subject_id, date, status).await?;
    info!(%student_id, %subject_id, %date, %status, "marked attendance");
    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        email: String,
        subject: String,
        date: NaiveDate,
        status: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut written = 0usize;

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("malformed row on line {line}"))?;
        let status: AttendanceStatus = row
            .status
            .parse()
            .with_context(|| format!("line {line}"))?;
        let student_id = find_student_id(pool, &row.email)
            .await?
            .with_context(|| format!("line {line}: no student registered for {}", row.email))?;
        let subject_id = ensure_subject(pool, row.subject.trim()).await?;

        written += upsert_attendance(pool, student_id, subject_id, row.date, status).await? as usize;
    }

    debug!(written, path = %csv_path.display(), "imported attendance csv");
    Ok(written)
}

/// [`AttendanceSource`] backed by the campus Postgres schema.
#[derive(Clone)]
pub struct PgAttendanceSource {
    pool: PgPool,
}

impl PgAttendanceSource {
    pub fn new(pool: PgPool) -> Self {
        PgAttendanceSource { pool }
    }
}

#[async_trait]
impl AttendanceSource for PgAttendanceSource {
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, SourceError> {
        let row = sqlx::query(
            "SELECT id, full_name, email FROM campus_connect.students WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Student {
            id: row.get("id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
        }))
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, SourceError> {
        let rows = sqlx::query("SELECT id, name FROM campus_connect.subjects ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Subject {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn fetch_attendance(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<AttendanceRecord>, SourceError> {
        let rows = sqlx::query(
            r#"
            SELECT date, status
            FROM campus_connect.attendance
            WHERE student_id = $1 AND subject_id = $2
            ORDER BY date DESC
            "#,
        )
        .bind(student_id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let status: String = row.get("status");
            records.push(AttendanceRecord {
                student_id,
                subject_id,
                date: row.get("date"),
                status: status.parse()?,
            });
        }
        Ok(records)
    }
}
