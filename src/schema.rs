diesel::table! {
    colleges (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    students (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        college_id -> Integer,
    }
}

diesel::table! {
    events (id) {
        id -> Integer,
        title -> Text,
        #[sql_name = "type"]
        event_type -> Text,
        date -> Date,
        college_id -> Integer,
    }
}

diesel::table! {
    registrations (id) {
        id -> Integer,
        student_id -> Integer,
        event_id -> Integer,
    }
}

diesel::table! {
    attendance (id) {
        id -> Integer,
        student_id -> Integer,
        event_id -> Integer,
        status -> Text,
    }
}

diesel::table! {
    feedback (id) {
        id -> Integer,
        student_id -> Integer,
        event_id -> Integer,
        rating -> Integer,
    }
}

diesel::joinable!(students -> colleges (college_id));
diesel::joinable!(events -> colleges (college_id));
diesel::joinable!(registrations -> students (student_id));
diesel::joinable!(registrations -> events (event_id));
diesel::joinable!(attendance -> students (student_id));
diesel::joinable!(attendance -> events (event_id));
diesel::joinable!(feedback -> students (student_id));
diesel::joinable!(feedback -> events (event_id));

diesel::allow_tables_to_appear_in_same_query!(
    attendance,
    colleges,
    events,
    feedback,
    registrations,
    students,
);

/// The DDL matching the tables above. Every statement is idempotent so it can run on each open.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS colleges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    email TEXT NOT NULL UNIQUE CHECK (length(trim(email)) > 0),
    college_id INTEGER NOT NULL REFERENCES colleges (id)
);

CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    type TEXT NOT NULL CHECK (length(trim(type)) > 0),
    date TEXT NOT NULL,
    college_id INTEGER NOT NULL REFERENCES colleges (id)
);

CREATE TABLE IF NOT EXISTS registrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students (id),
    event_id INTEGER NOT NULL REFERENCES events (id),
    CONSTRAINT unique_registration UNIQUE (student_id, event_id)
);

CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students (id),
    event_id INTEGER NOT NULL REFERENCES events (id),
    status TEXT NOT NULL CHECK (status IN ('Present', 'Absent', 'Excused'))
);

CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students (id),
    event_id INTEGER NOT NULL REFERENCES events (id),
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5)
);

CREATE INDEX IF NOT EXISTS idx_students_college ON students (college_id);
CREATE INDEX IF NOT EXISTS idx_events_college ON events (college_id);
CREATE INDEX IF NOT EXISTS idx_registrations_event ON registrations (event_id);
CREATE INDEX IF NOT EXISTS idx_attendance_student_status ON attendance (student_id, status);
CREATE INDEX IF NOT EXISTS idx_feedback_event ON feedback (event_id);
"#;
