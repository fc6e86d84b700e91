//! Registrations, attendance, and feedback: the records that link a student to an event.

use crate::error::{Error, Result};
use crate::models::{
    Attendance, Feedback, NewAttendance, NewFeedback, NewRegistration, Registration, Status,
};
use crate::schema::{attendance, events, feedback, registrations, students};
use crate::store::Store;
use diesel::dsl::exists;
use diesel::prelude::*;
use std::ops::RangeInclusive;
use tracing::info;

/// Ratings a student may give an event.
pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

#[derive(Clone)]
pub struct RelationshipManager {
    store: Store,
}

impl RelationshipManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Registers a student for an event.
    ///
    /// The existence checks and the insert share one immediate transaction, so of two concurrent
    /// identical registrations exactly one succeeds and the other gets [`Error::Duplicate`].
    pub fn register_student(&self, student_id: i32, event_id: i32) -> Result<Registration> {
        let registration = self.store.write(|conn| {
            ensure_student_and_event(conn, student_id, event_id)?;

            diesel::insert_into(registrations::table)
                .values(NewRegistration {
                    student_id,
                    event_id,
                })
                .returning(Registration::as_returning())
                .get_result(conn)
                .map_err(|e| Error::from_insert(e, "registration"))
        })?;

        info!(student_id, event_id, "registered student");
        Ok(registration)
    }

    /// Records the attendance outcome of a student at an event.
    ///
    /// `status` must be exactly one of `Present`, `Absent`, or `Excused`.
    pub fn mark_attendance(&self, student_id: i32, event_id: i32, status: &str) -> Result<Attendance> {
        let status: Status = status.parse()?;

        let record = self.store.write(|conn| {
            ensure_student_and_event(conn, student_id, event_id)?;

            diesel::insert_into(attendance::table)
                .values(NewAttendance {
                    student_id,
                    event_id,
                    status,
                })
                .returning(Attendance::as_returning())
                .get_result(conn)
                .map_err(|e| Error::from_insert(e, "attendance"))
        })?;

        info!(student_id, event_id, %status, "marked attendance");
        Ok(record)
    }

    /// Stores a student's rating of an event. Ratings outside [`RATING_RANGE`] are rejected before
    /// the store is touched.
    pub fn submit_feedback(&self, student_id: i32, event_id: i32, rating: i64) -> Result<Feedback> {
        if !RATING_RANGE.contains(&rating) {
            return Err(Error::Validation(format!(
                "rating {rating} is outside {}..={}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            )));
        }
        // In range, so this cannot truncate.
        let rating = rating as i32;

        let entry = self.store.write(|conn| {
            ensure_student_and_event(conn, student_id, event_id)?;

            diesel::insert_into(feedback::table)
                .values(NewFeedback {
                    student_id,
                    event_id,
                    rating,
                })
                .returning(Feedback::as_returning())
                .get_result(conn)
                .map_err(|e| Error::from_insert(e, "feedback"))
        })?;

        info!(student_id, event_id, rating, "submitted feedback");
        Ok(entry)
    }
}

fn ensure_student_and_event(conn: &mut SqliteConnection, student_id: i32, event_id: i32) -> Result<()> {
    let student_found: bool =
        diesel::select(exists(students::table.find(student_id))).get_result(conn)?;
    if !student_found {
        return Err(Error::unknown("student", student_id));
    }

    let event_found: bool = diesel::select(exists(events::table.find(event_id))).get_result(conn)?;
    if !event_found {
        return Err(Error::unknown("event", event_id));
    }

    Ok(())
}
