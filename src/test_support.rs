//! Shared fixtures for unit tests.

use crate::models::{College, Event, Student};
use crate::registry::EntityRegistry;
use crate::relationships::RelationshipManager;
use crate::reports::ReportEngine;
use crate::store::Store;
use chrono::NaiveDate;
use rstest::fixture;

/// All three components over one fresh in-memory store.
#[derive(Clone)]
pub struct Campus {
    pub registry: EntityRegistry,
    pub relationships: RelationshipManager,
    pub reports: ReportEngine,
}

impl Campus {
    pub fn new(store: Store) -> Self {
        Self {
            registry: EntityRegistry::new(store.clone()),
            relationships: RelationshipManager::new(store.clone()),
            reports: ReportEngine::new(store),
        }
    }

    pub fn college(&self, name: &str) -> College {
        self.registry.create_college(name).unwrap()
    }

    pub fn student(&self, college: &College, name: &str) -> Student {
        let email = format!("{}@campus.edu", name.to_lowercase().replace(' ', "."));
        self.registry
            .create_student(name, &email, college.id)
            .unwrap()
    }

    pub fn event(&self, college: &College, title: &str, event_type: &str) -> Event {
        self.registry
            .create_event(title, event_type, date(), college.id)
            .unwrap()
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
}

#[fixture]
pub fn campus() -> Campus {
    Campus::new(Store::in_memory().unwrap())
}
