//! Read-only aggregate views over the store.
//!
//! Every report runs in its own read transaction and orders its rows completely, so the same
//! data always produces the same output.

use crate::error::Result;
use crate::store::Store;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Integer, Text};
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

/// How many students the top-students report returns at most.
pub const TOP_STUDENTS_LIMIT: i64 = 3;

/// Registrations per event, including events nobody registered for.
const SQL_EVENT_POPULARITY: &str = r#"
SELECT e.id AS event_id, e.title AS title, COUNT(r.id) AS registrations
FROM events e
LEFT JOIN registrations r ON r.event_id = e.id
GROUP BY e.id, e.title
ORDER BY registrations DESC, e.title ASC, e.id ASC
"#;

const SQL_STUDENT_PARTICIPATION: &str = r#"
SELECT e.title AS title
FROM attendance a
JOIN events e ON e.id = a.event_id
WHERE a.student_id = ? AND a.status = 'Present'
ORDER BY e.id ASC, a.id ASC
"#;

const SQL_TOP_STUDENTS: &str = r#"
SELECT s.id AS student_id, s.name AS student, COUNT(a.id) AS events_attended
FROM attendance a
JOIN students s ON s.id = a.student_id
WHERE a.status = 'Present'
GROUP BY s.id, s.name
ORDER BY events_attended DESC, s.name ASC, s.id ASC
LIMIT ?
"#;

const SQL_FILTER_BY_TYPE: &str = r#"
SELECT e.id AS id, e.title AS title, e.date AS date, e.type AS event_type
FROM events e
WHERE lower(e.type) = lower(?)
ORDER BY e.id ASC
"#;

#[derive(QueryableByName, Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EventPopularity {
    /// Identifies the row; not part of the rendered report.
    #[diesel(sql_type = Integer)]
    #[serde(skip)]
    #[tabled(skip)]
    pub event_id: i32,
    #[diesel(sql_type = Text)]
    #[serde(rename = "event")]
    #[tabled(rename = "event")]
    pub title: String,
    #[diesel(sql_type = BigInt)]
    pub registrations: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StudentParticipation {
    pub student_id: i32,
    pub events_attended: Vec<String>,
}

#[derive(QueryableByName, Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TopStudent {
    #[diesel(sql_type = Integer)]
    #[serde(skip)]
    #[tabled(skip)]
    pub student_id: i32,
    #[diesel(sql_type = Text)]
    pub student: String,
    #[diesel(sql_type = BigInt)]
    pub events_attended: i64,
}

#[derive(QueryableByName, Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Date)]
    pub date: NaiveDate,
    #[diesel(sql_type = Text)]
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    pub event_type: String,
}

#[derive(QueryableByName)]
struct TitleRow {
    #[diesel(sql_type = Text)]
    title: String,
}

#[derive(Clone)]
pub struct ReportEngine {
    store: Store,
}

impl ReportEngine {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every event with its registration count, most registrations first. Ties are broken by
    /// title, then by ID.
    pub fn event_popularity(&self) -> Result<Vec<EventPopularity>> {
        let rows = self
            .store
            .read(|conn| diesel::sql_query(SQL_EVENT_POPULARITY).load::<EventPopularity>(conn))?;

        debug!(events = rows.len(), "computed event popularity");
        Ok(rows)
    }

    /// Titles of the events a student attended (status `Present`), in event order.
    ///
    /// An unknown student simply has an empty list.
    pub fn student_participation(&self, student_id: i32) -> Result<StudentParticipation> {
        let rows = self.store.read(|conn| {
            diesel::sql_query(SQL_STUDENT_PARTICIPATION)
                .bind::<Integer, _>(student_id)
                .load::<TitleRow>(conn)
        })?;

        debug!(student_id, events = rows.len(), "computed student participation");
        Ok(StudentParticipation {
            student_id,
            events_attended: rows.into_iter().map(|row| row.title).collect(),
        })
    }

    /// Up to [`TOP_STUDENTS_LIMIT`] students with the most `Present` attendance records. Ties are
    /// broken by name, then by ID.
    pub fn top_students(&self) -> Result<Vec<TopStudent>> {
        let rows = self.store.read(|conn| {
            diesel::sql_query(SQL_TOP_STUDENTS)
                .bind::<BigInt, _>(TOP_STUDENTS_LIMIT)
                .load::<TopStudent>(conn)
        })?;

        debug!(students = rows.len(), "computed top students");
        Ok(rows)
    }

    /// Events whose type equals `label`, ignoring case. A missing or blank label matches nothing.
    ///
    /// Case folding is SQLite's `lower()`, which only folds ASCII letters: `Séminaire` and
    /// `SÉMINAIRE` are different labels here.
    pub fn filter_by_type(&self, label: Option<&str>) -> Result<Vec<EventSummary>> {
        let Some(label) = label.filter(|label| !label.trim().is_empty()) else {
            return Ok(Vec::new());
        };

        let rows = self.store.read(|conn| {
            diesel::sql_query(SQL_FILTER_BY_TYPE)
                .bind::<Text, _>(label)
                .load::<EventSummary>(conn)
        })?;

        debug!(label, events = rows.len(), "filtered events by type");
        Ok(rows)
    }
}
