// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped reads over the operational school tables.
//!
//! These queries are consumed by the domain responders. Every function takes
//! explicit scope parameters (student id, teacher id, class id) so a
//! responder can only read what it passes in; authorization decisions happen
//! in the responder, which derives the scope from the caller's profile.

use std::str::FromStr;

use rusqlite::params;
use sapa_core::types::{UserProfile, UserRole};
use sapa_core::SapaError;

use crate::database::{map_tr_err, Database};
use crate::models::{
    Announcement, AttendanceSummary, BillingItem, GradeRecord, RosterEntry, ScheduleEntry,
    Subject, TeachingAssignment,
};

fn row_to_schedule(row: &rusqlite::Row<'_>) -> Result<ScheduleEntry, rusqlite::Error> {
    Ok(ScheduleEntry {
        class_id: row.get(0)?,
        class_name: row.get(1)?,
        subject_name: row.get(2)?,
        teacher_name: row.get(3)?,
        day_of_week: row.get(4)?,
        starts_at: row.get(5)?,
        ends_at: row.get(6)?,
    })
}

const SCHEDULE_SELECT: &str = "SELECT s.class_id, c.name, sub.name, u.name, s.day_of_week, s.starts_at, s.ends_at
     FROM schedule_entries s
     JOIN classes c ON c.id = s.class_id
     JOIN subjects sub ON sub.id = s.subject_id
     JOIN users u ON u.id = s.teacher_id";

/// Load a user's identity profile. Returns `None` for unknown ids.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<UserProfile>, SapaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, role, class_id, phone, email FROM users WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                let role_str: String = row.get(2)?;
                let role = UserRole::from_str(&role_str).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(UserProfile {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    role,
                    class_id: row.get(3)?,
                    phone: row.get(4)?,
                    email: row.get(5)?,
                })
            });
            match result {
                Ok(profile) => Ok(Some(profile)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Schedule slots for one class on one ISO weekday, ordered by start time.
pub async fn schedule_for_class_day(
    db: &Database,
    class_id: &str,
    day_of_week: u8,
) -> Result<Vec<ScheduleEntry>, SapaError> {
    let class_id = class_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SCHEDULE_SELECT} WHERE s.class_id = ?1 AND s.day_of_week = ?2
                 ORDER BY s.starts_at ASC"
            ))?;
            let entries = stmt
                .query_map(params![class_id, day_of_week], row_to_schedule)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Schedule slots taught by one teacher on one ISO weekday.
pub async fn schedule_for_teacher_day(
    db: &Database,
    teacher_id: &str,
    day_of_week: u8,
) -> Result<Vec<ScheduleEntry>, SapaError> {
    let teacher_id = teacher_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SCHEDULE_SELECT} WHERE s.teacher_id = ?1 AND s.day_of_week = ?2
                 ORDER BY s.starts_at ASC"
            ))?;
            let entries = stmt
                .query_map(params![teacher_id, day_of_week], row_to_schedule)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// All grade records for one student, grouped by subject then period.
pub async fn grades_for_student(
    db: &Database,
    student_id: &str,
) -> Result<Vec<GradeRecord>, SapaError> {
    let student_id = student_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT sub.name, g.period, g.score
                 FROM grades g JOIN subjects sub ON sub.id = g.subject_id
                 WHERE g.student_id = ?1
                 ORDER BY sub.name ASC, g.period ASC",
            )?;
            let grades = stmt
                .query_map(params![student_id], |row| {
                    Ok(GradeRecord {
                        subject_name: row.get(0)?,
                        period: row.get(1)?,
                        score: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(grades)
        })
        .await
        .map_err(map_tr_err)
}

/// Present/total attendance counts for one student.
pub async fn attendance_summary(
    db: &Database,
    student_id: &str,
) -> Result<AttendanceSummary, SapaError> {
    let student_id = student_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT COALESCE(SUM(status = 'present'), 0), COUNT(*)
                 FROM attendance WHERE student_id = ?1",
            )?;
            let summary = stmt.query_row(params![student_id], |row| {
                Ok(AttendanceSummary {
                    present: row.get(0)?,
                    total: row.get(1)?,
                })
            })?;
            Ok(summary)
        })
        .await
        .map_err(map_tr_err)
}

/// Billing line items for one student, unpaid first.
pub async fn billing_for_student(
    db: &Database,
    student_id: &str,
) -> Result<Vec<BillingItem>, SapaError> {
    let student_id = student_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT description, amount, paid FROM billing_items
                 WHERE student_id = ?1 ORDER BY paid ASC, id ASC",
            )?;
            let items = stmt
                .query_map(params![student_id], |row| {
                    Ok(BillingItem {
                        description: row.get(0)?,
                        amount: row.get(1)?,
                        paid: row.get::<_, i64>(2)? != 0,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

/// Announcements active on `date` and visible to `role` (audience 'all' or
/// the role's own audience).
pub async fn active_announcements(
    db: &Database,
    date: &str,
    role: UserRole,
) -> Result<Vec<Announcement>, SapaError> {
    let date = date.to_string();
    let audience = role.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT title, body, audience, starts_on, ends_on FROM announcements
                 WHERE starts_on <= ?1 AND ends_on >= ?1
                   AND (audience = 'all' OR audience = ?2)
                 ORDER BY starts_on DESC, id ASC",
            )?;
            let items = stmt
                .query_map(params![date, audience], |row| {
                    Ok(Announcement {
                        title: row.get(0)?,
                        body: row.get(1)?,
                        audience: row.get(2)?,
                        starts_on: row.get(3)?,
                        ends_on: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

/// The full subject catalog, sorted by name.
pub async fn list_subjects(db: &Database) -> Result<Vec<Subject>, SapaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM subjects ORDER BY name ASC")?;
            let subjects = stmt
                .query_map([], |row| {
                    Ok(Subject {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(subjects)
        })
        .await
        .map_err(map_tr_err)
}

/// Students enrolled in one class, sorted by name.
pub async fn class_roster(db: &Database, class_id: &str) -> Result<Vec<RosterEntry>, SapaError> {
    let class_id = class_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name FROM users
                 WHERE role = 'student' AND class_id = ?1 ORDER BY name ASC",
            )?;
            let roster = stmt
                .query_map(params![class_id], |row| {
                    Ok(RosterEntry {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(roster)
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct class/subject assignments for one teacher with weekly session
/// counts.
pub async fn teaching_load(
    db: &Database,
    teacher_id: &str,
) -> Result<Vec<TeachingAssignment>, SapaError> {
    let teacher_id = teacher_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.name, sub.name, COUNT(*)
                 FROM schedule_entries s
                 JOIN classes c ON c.id = s.class_id
                 JOIN subjects sub ON sub.id = s.subject_id
                 WHERE s.teacher_id = ?1
                 GROUP BY c.name, sub.name
                 ORDER BY c.name ASC, sub.name ASC",
            )?;
            let load = stmt
                .query_map(params![teacher_id], |row| {
                    Ok(TeachingAssignment {
                        class_name: row.get(0)?,
                        subject_name: row.get(1)?,
                        sessions_per_week: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(load)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_demo_data;
    use tempfile::tempdir;

    async fn setup() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("school.db").to_str().unwrap())
            .await
            .unwrap();
        seed_demo_data(&db).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn get_user_resolves_profile_and_role() {
        let (db, _dir) = setup().await;
        let andi = get_user(&db, "stu1").await.unwrap().unwrap();
        assert_eq!(andi.name, "Andi");
        assert_eq!(andi.role, UserRole::Student);
        assert_eq!(andi.class_id.as_deref(), Some("c7a"));

        assert!(get_user(&db, "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn class_schedule_is_ordered_by_start_time() {
        let (db, _dir) = setup().await;
        let monday = schedule_for_class_day(&db, "c7a", 1).await.unwrap();
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].subject_name, "Matematika");
        assert_eq!(monday[0].teacher_name, "Pak Budi");
        assert_eq!(monday[1].subject_name, "Bahasa Indonesia");

        // No entries on Sunday: empty result, not an error.
        let sunday = schedule_for_class_day(&db, "c7a", 7).await.unwrap();
        assert!(sunday.is_empty());
    }

    #[tokio::test]
    async fn teacher_schedule_only_contains_own_slots() {
        let (db, _dir) = setup().await;
        let monday = schedule_for_teacher_day(&db, "tch1", 1).await.unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].class_name, "VII-A");
    }

    #[tokio::test]
    async fn grades_are_scoped_to_the_requested_student() {
        let (db, _dir) = setup().await;
        let grades = grades_for_student(&db, "stu1").await.unwrap();
        assert_eq!(grades.len(), 3);
        assert!(grades.iter().all(|g| g.score >= 78.0));

        let other = grades_for_student(&db, "stu2").await.unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].score, 90.0);
    }

    #[tokio::test]
    async fn attendance_summary_counts_present() {
        let (db, _dir) = setup().await;
        let summary = attendance_summary(&db, "stu1").await.unwrap();
        assert_eq!(summary.present, 3);
        assert_eq!(summary.total, 4);
        assert!((summary.percentage() - 75.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn billing_lists_unpaid_first() {
        let (db, _dir) = setup().await;
        let items = billing_for_student(&db, "stu1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(!items[0].paid);
        assert_eq!(items[0].description, "SPP Februari");
    }

    #[tokio::test]
    async fn announcements_filter_by_date_and_audience() {
        let (db, _dir) = setup().await;

        let student_view = active_announcements(&db, "2026-06-10", UserRole::Student)
            .await
            .unwrap();
        assert_eq!(student_view.len(), 1);
        assert_eq!(student_view[0].title, "Libur Semester");

        let teacher_view = active_announcements(&db, "2026-06-10", UserRole::Teacher)
            .await
            .unwrap();
        assert_eq!(teacher_view.len(), 2);

        let off_season = active_announcements(&db, "2026-07-15", UserRole::Student)
            .await
            .unwrap();
        assert!(off_season.is_empty());
    }

    #[tokio::test]
    async fn roster_and_teaching_load() {
        let (db, _dir) = setup().await;

        let roster = class_roster(&db, "c7a").await.unwrap();
        let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Andi", "Siti"]);

        let load = teaching_load(&db, "tch1").await.unwrap();
        assert_eq!(load.len(), 3);
        assert!(load
            .iter()
            .any(|a| a.class_name == "VIII-B" && a.subject_name == "Matematika"));
    }
}
