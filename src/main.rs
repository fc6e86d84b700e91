use anyhow::Context;
use campus_events::cli::{Cli, Command, Report};
use campus_events::config::Settings;
use campus_events::display::{self, Format};
use campus_events::models::Event;
use campus_events::{EntityRegistry, RelationshipManager, ReportEngine, Store, web};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    let store = Store::open(&settings.database)
        .with_context(|| format!("failed to open database {}", settings.database.url))?;

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(settings.server.bind);
            tokio::runtime::Runtime::new()?.block_on(web::serve(store, bind))?;
        }
        Command::AddCollege { name } => {
            let college = EntityRegistry::new(store).create_college(&name)?;
            println!("Created college {} ({})", college.id, college.name);
        }
        Command::AddStudent {
            name,
            email,
            college,
        } => {
            let student = EntityRegistry::new(store).create_student(&name, &email, college)?;
            println!("Created student {} ({} <{}>)", student.id, student.name, student.email);
        }
        Command::AddEvent {
            title,
            event_type,
            date,
            college,
        } => {
            let Event { id, title, .. } =
                EntityRegistry::new(store).create_event(&title, &event_type, date, college)?;
            println!("Created event {id} ({title})");
        }
        Command::Register(target) => {
            RelationshipManager::new(store).register_student(target.student, target.event)?;
            println!("Student {} registered for event {}", target.student, target.event);
        }
        Command::MarkAttendance { target, status } => {
            RelationshipManager::new(store).mark_attendance(target.student, target.event, &status)?;
            println!(
                "Student {} marked {status} at event {}",
                target.student, target.event
            );
        }
        Command::Feedback { target, rating } => {
            RelationshipManager::new(store).submit_feedback(target.student, target.event, rating)?;
            println!("Feedback submitted for event {}", target.event);
        }
        Command::Report { report, csv } => {
            let format = if csv { Format::Csv } else { Format::Table };
            let reports = ReportEngine::new(store);

            match report {
                Report::Popularity => {
                    display::show_event_popularity(&reports.event_popularity()?, format)?
                }
                Report::Student { student_id } => display::show_student_participation(
                    &reports.student_participation(student_id)?,
                    format,
                )?,
                Report::TopStudents => display::show_top_students(&reports.top_students()?, format)?,
                Report::Filter { event_type } => display::show_events(
                    &event_type,
                    &reports.filter_by_type(Some(&event_type))?,
                    format,
                )?,
            }
        }
    }

    Ok(())
}
