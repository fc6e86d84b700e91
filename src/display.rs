use crate::reports::{EventPopularity, EventSummary, StudentParticipation, TopStudent};
use serde::Serialize;
use std::io;
use tabled::{Table, Tabled, settings::Style};

/// How a report is written to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Csv,
}

#[derive(Tabled, Serialize)]
struct AttendedEvent {
    student_id: i32,
    event: String,
}

/// Pretty prints the event popularity report.
pub fn show_event_popularity(rows: &[EventPopularity], format: Format) -> anyhow::Result<()> {
    emit("Event popularity", rows, format)
}

/// Prints the events a single student attended.
pub fn show_student_participation(
    report: &StudentParticipation,
    format: Format,
) -> anyhow::Result<()> {
    let rows: Vec<AttendedEvent> = report
        .events_attended
        .iter()
        .map(|title| AttendedEvent {
            student_id: report.student_id,
            event: title.clone(),
        })
        .collect();

    emit(
        &format!("Events attended by student {}", report.student_id),
        &rows,
        format,
    )
}

pub fn show_top_students(rows: &[TopStudent], format: Format) -> anyhow::Result<()> {
    emit("Top students", rows, format)
}

pub fn show_events(label: &str, rows: &[EventSummary], format: Format) -> anyhow::Result<()> {
    emit(&format!("Events of type '{label}'"), rows, format)
}

fn emit<T: Tabled + Serialize>(title: &str, rows: &[T], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Table => {
            println!("{}", render_table(title, rows));
            Ok(())
        }
        Format::Csv => write_csv(io::stdout().lock(), rows),
    }
}

fn render_table<T: Tabled>(title: &str, rows: &[T]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{title}:\n{table}")
}

fn write_csv<W: io::Write, T: Serialize>(out: W, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<TopStudent> {
        vec![
            TopStudent {
                student_id: 2,
                student: "Bob".to_string(),
                events_attended: 3,
            },
            TopStudent {
                student_id: 1,
                student: "Ada".to_string(),
                events_attended: 1,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &rows()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "student,events_attended\nBob,3\nAda,1\n"
        );
    }

    #[test]
    fn table_contains_every_student() {
        let rendered = render_table("Top students", &rows());

        assert!(rendered.starts_with("Top students:\n"));
        assert!(rendered.contains("Bob"));
        assert!(rendered.contains("Ada"));
    }
}
