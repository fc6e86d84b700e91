//! This module contains the command-line interface [`Cli`] parser for recording campus events and
//! reporting on them.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(name = "campus", version, about = "Campus event participation records and reports")]
pub struct Cli {
    /// Path to a TOML configuration file. Defaults to `campus.toml` if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Address to listen on, overriding `server.bind`.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Create a college.
    AddCollege { name: String },

    /// Create a student belonging to a college.
    AddStudent {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        college: i32,
    },

    /// Create an event hosted by a college.
    AddEvent {
        #[arg(long)]
        title: String,
        /// Free-form label such as Workshop, Fest, or Seminar.
        #[arg(long = "type")]
        event_type: String,
        /// Calendar date, YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        college: i32,
    },

    /// Register a student for an event.
    Register(StudentEvent),

    /// Record whether a student was Present, Absent, or Excused at an event.
    MarkAttendance {
        #[command(flatten)]
        target: StudentEvent,
        #[arg(long)]
        status: String,
    },

    /// Submit a 1-5 rating for an event.
    Feedback {
        #[command(flatten)]
        target: StudentEvent,
        #[arg(long)]
        rating: i64,
    },

    /// Print a report.
    Report {
        #[command(subcommand)]
        report: Report,

        /// Write CSV instead of a table.
        #[arg(long, global = true)]
        csv: bool,
    },
}

#[derive(Args, Debug)]
pub struct StudentEvent {
    #[arg(long)]
    pub student: i32,
    #[arg(long)]
    pub event: i32,
}

#[derive(Subcommand, Debug)]
pub enum Report {
    /// Registrations per event, most popular first.
    Popularity,

    /// Events a student attended.
    Student { student_id: i32 },

    /// The three students with the most attended events.
    TopStudents,

    /// Events of a given type, ignoring case.
    Filter {
        #[arg(value_name = "TYPE")]
        event_type: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_attendance() {
        let cli = Cli::parse_from([
            "campus",
            "mark-attendance",
            "--student",
            "3",
            "--event",
            "7",
            "--status",
            "Present",
        ]);

        let Command::MarkAttendance { target, status } = cli.command else {
            panic!("expected mark-attendance");
        };
        assert_eq!((target.student, target.event), (3, 7));
        assert_eq!(status, "Present");
    }

    #[test]
    fn parses_report_with_csv() {
        let cli = Cli::parse_from(["campus", "report", "filter", "workshop", "--csv"]);

        let Command::Report { report, csv } = cli.command else {
            panic!("expected report");
        };
        assert!(csv);
        assert!(matches!(report, Report::Filter { event_type } if event_type == "workshop"));
    }

    #[test]
    fn rejects_bad_dates() {
        let result = Cli::try_parse_from([
            "campus", "add-event", "--title", "Fest", "--type", "Fest", "--date", "soon",
            "--college", "1",
        ]);
        assert!(result.is_err());
    }
}
