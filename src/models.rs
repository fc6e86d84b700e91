use crate::error::Error;
use crate::schema::{attendance, colleges, events, feedback, registrations, students};
use chrono::NaiveDate;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The root organizational entity. Owns students and events.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = colleges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct College {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = colleges)]
pub struct NewCollege<'a> {
    pub name: &'a str,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub college_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub college_id: i32,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Event {
    pub id: i32,
    pub title: String,
    /// A free-form label such as `Workshop`, `Fest`, or `Seminar`, stored exactly as given.
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: NaiveDate,
    pub college_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub title: &'a str,
    pub event_type: &'a str,
    pub date: NaiveDate,
    pub college_id: i32,
}

/// A student's declared intent to attend an event. Unique per `(student_id, event_id)`.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Registration {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = registrations)]
pub struct NewRegistration {
    pub student_id: i32,
    pub event_id: i32,
}

/// The recorded outcome of a student at an event.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Attendance {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub status: Status,
}

#[derive(Insertable)]
#[diesel(table_name = attendance)]
pub struct NewAttendance {
    pub student_id: i32,
    pub event_id: i32,
    pub status: Status,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feedback {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub rating: i32,
}

#[derive(Insertable)]
#[diesel(table_name = feedback)]
pub struct NewFeedback {
    pub student_id: i32,
    pub event_id: i32,
    pub rating: i32,
}

/// Attendance status of a student at an event. This is the only record of presence; reports
/// treat [`Status::Present`] as attended and everything else as not.
#[derive(
    AsExpression, FromSqlRow, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
#[diesel(sql_type = Text)]
pub enum Status {
    Present,
    Absent,
    Excused,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Present, Status::Absent, Status::Excused];

    /// The exact label stored in the `attendance.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
            Status::Excused => "Excused",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    /// Labels are matched exactly; `present` or `Late` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "invalid status `{s}`, expected one of Present, Absent, Excused"
                ))
            })
    }
}

impl ToSql<Text, Sqlite> for Status {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Status {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let label = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        match Status::ALL.into_iter().find(|status| status.as_str() == label) {
            Some(status) => Ok(status),
            None => Err(format!("unrecognized attendance status `{label}`").into()),
        }
    }
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid date `{value}`, expected YYYY-MM-DD")))
}
