//! Validated creation of colleges, students, and events.

use crate::error::{Error, Result, required};
use crate::models::{College, Event, NewCollege, NewEvent, NewStudent, Student};
use crate::schema::{colleges, events, students};
use crate::store::Store;
use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;
use tracing::info;

/// Creates the entities that everything else refers to.
#[derive(Clone)]
pub struct EntityRegistry {
    store: Store,
}

impl EntityRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates a college and returns it with its assigned ID.
    pub fn create_college(&self, name: &str) -> Result<College> {
        let name = required("name", name)?;

        let college = self.store.write(|conn| {
            diesel::insert_into(colleges::table)
                .values(NewCollege { name })
                .returning(College::as_returning())
                .get_result(conn)
                .map_err(|e| Error::from_insert(e, "college"))
        })?;

        info!(college_id = college.id, "created college");
        Ok(college)
    }

    /// Creates a student belonging to `college_id`.
    ///
    /// Fails with [`Error::Reference`] if the college does not exist and with
    /// [`Error::Duplicate`] if another student already uses `email`.
    pub fn create_student(&self, name: &str, email: &str, college_id: i32) -> Result<Student> {
        let name = required("name", name)?;
        let email = required("email", email)?;

        let student = self.store.write(|conn| {
            ensure_college(conn, college_id)?;

            diesel::insert_into(students::table)
                .values(NewStudent {
                    name,
                    email,
                    college_id,
                })
                .returning(Student::as_returning())
                .get_result(conn)
                .map_err(|e| Error::from_insert(e, "email"))
        })?;

        info!(student_id = student.id, college_id, "created student");
        Ok(student)
    }

    /// Creates an event hosted by `college_id`. The type label is stored exactly as given.
    pub fn create_event(
        &self,
        title: &str,
        event_type: &str,
        date: NaiveDate,
        college_id: i32,
    ) -> Result<Event> {
        let title = required("title", title)?;
        let event_type = required("type", event_type)?;

        let event = self.store.write(|conn| {
            ensure_college(conn, college_id)?;

            diesel::insert_into(events::table)
                .values(NewEvent {
                    title,
                    event_type,
                    date,
                    college_id,
                })
                .returning(Event::as_returning())
                .get_result(conn)
                .map_err(|e| Error::from_insert(e, "event"))
        })?;

        info!(event_id = event.id, college_id, "created event");
        Ok(event)
    }
}

fn ensure_college(conn: &mut SqliteConnection, college_id: i32) -> Result<()> {
    let found: bool = diesel::select(exists(colleges::table.find(college_id))).get_result(conn)?;

    if found {
        Ok(())
    } else {
        Err(Error::unknown("college", college_id))
    }
}
