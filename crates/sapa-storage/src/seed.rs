// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo fixture data for the operational school tables.
//!
//! Used by `sapa seed-demo` for local evaluation and by tests that exercise
//! the domain responders against realistic rows.

use sapa_core::SapaError;

use crate::database::{map_tr_err, Database};

/// Populate the school tables with a small demo dataset: two classes, four
/// subjects, two teachers, three students, one week of schedule, grades,
/// attendance, billing, and announcements.
///
/// Idempotent: re-running replaces nothing and fails on duplicate keys, so
/// callers should only seed an empty database.
pub async fn seed_demo_data(db: &Database) -> Result<(), SapaError> {
    db.connection()
        .call(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO classes (id, name) VALUES
                    ('c7a', 'VII-A'),
                    ('c8b', 'VIII-B');

                INSERT INTO subjects (id, name) VALUES
                    ('mat', 'Matematika'),
                    ('ind', 'Bahasa Indonesia'),
                    ('eng', 'Bahasa Inggris'),
                    ('ipa', 'IPA');

                INSERT INTO users (id, name, role, class_id, phone, email) VALUES
                    ('adm1', 'Ibu Ratna', 'admin',   NULL,  NULL, 'ratna@sekolah.sch.id'),
                    ('tch1', 'Pak Budi',  'teacher', NULL,  NULL, 'budi@sekolah.sch.id'),
                    ('tch2', 'Bu Sari',   'teacher', NULL,  NULL, 'sari@sekolah.sch.id'),
                    ('stu1', 'Andi',      'student', 'c7a', '+62-812-1111-2222', NULL),
                    ('stu2', 'Siti',      'student', 'c7a', NULL, NULL),
                    ('stu3', 'Rudi',      'student', 'c8b', NULL, NULL);

                INSERT INTO schedule_entries
                    (class_id, subject_id, teacher_id, day_of_week, starts_at, ends_at)
                VALUES
                    ('c7a', 'mat', 'tch1', 1, '07:00', '08:30'),
                    ('c7a', 'ind', 'tch2', 1, '08:30', '10:00'),
                    ('c7a', 'ipa', 'tch1', 2, '07:00', '08:30'),
                    ('c8b', 'eng', 'tch2', 1, '07:00', '08:30'),
                    ('c8b', 'mat', 'tch1', 3, '10:00', '11:30');

                INSERT INTO grades (student_id, subject_id, period, score) VALUES
                    ('stu1', 'mat', 'UTS', 85.0),
                    ('stu1', 'mat', 'UAS', 88.0),
                    ('stu1', 'ind', 'UTS', 78.0),
                    ('stu2', 'mat', 'UTS', 90.0),
                    ('stu3', 'eng', 'UTS', 70.0);

                INSERT INTO attendance (student_id, date, status) VALUES
                    ('stu1', '2026-06-01', 'present'),
                    ('stu1', '2026-06-02', 'present'),
                    ('stu1', '2026-06-03', 'sick'),
                    ('stu1', '2026-06-04', 'present'),
                    ('stu2', '2026-06-01', 'present'),
                    ('stu2', '2026-06-02', 'present');

                INSERT INTO billing_items (student_id, description, amount, paid) VALUES
                    ('stu1', 'SPP Januari',  150000, 1),
                    ('stu1', 'SPP Februari', 150000, 0),
                    ('stu3', 'SPP Januari',  150000, 0);

                INSERT INTO announcements (title, body, audience, starts_on, ends_on) VALUES
                    ('Libur Semester',
                     'Libur semester genap dimulai tanggal 20 Juni.',
                     'all', '2026-06-01', '2026-06-30'),
                    ('Rapat Guru',
                     'Rapat koordinasi guru pukul 13:00 di ruang rapat.',
                     'teacher', '2026-06-10', '2026-06-10');
                "#,
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
