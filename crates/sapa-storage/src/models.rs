// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the operational school tables.
//!
//! The conversation entities (`Intent`, `CannedResponse`, `ConversationTurn`)
//! are defined in `sapa-core::types` for use across crate boundaries and
//! re-exported here for convenience.

use serde::{Deserialize, Serialize};

pub use sapa_core::types::{CannedResponse, ConversationTurn, Intent, UserProfile, UserRole};

/// One schedule slot, already joined with subject, teacher, and class names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub class_id: String,
    pub class_name: String,
    pub subject_name: String,
    pub teacher_name: String,
    /// ISO weekday: 1 = Monday .. 7 = Sunday.
    pub day_of_week: u8,
    pub starts_at: String,
    pub ends_at: String,
}

/// A single grade record for a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRecord {
    pub subject_name: String,
    pub period: String,
    pub score: f64,
}

/// Aggregated attendance for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub present: i64,
    pub total: i64,
}

impl AttendanceSummary {
    /// Attendance percentage; 0.0 when no records exist.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 * 100.0 / self.total as f64
        }
    }
}

/// One billing line item for a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingItem {
    pub description: String,
    pub amount: i64,
    pub paid: bool,
}

/// A general announcement active within a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    pub body: String,
    pub audience: String,
    pub starts_on: String,
    pub ends_on: String,
}

/// A subject in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

/// One student on a class roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
}

/// One distinct class/subject assignment in a teacher's load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingAssignment {
    pub class_name: String,
    pub subject_name: String,
    pub sessions_per_week: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_percentage_handles_empty() {
        let empty = AttendanceSummary {
            present: 0,
            total: 0,
        };
        assert_eq!(empty.percentage(), 0.0);

        let partial = AttendanceSummary {
            present: 18,
            total: 20,
        };
        assert!((partial.percentage() - 90.0).abs() < f64::EPSILON);
    }
}
