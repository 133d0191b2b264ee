// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in domain responders.
//!
//! Every responder receives the calling user's profile and issues only
//! queries that role may see: a student reads their own grades, a teacher
//! reads their own timetable, nobody reads across users. Empty results are a
//! normal reply, never an error.

use chrono::{Datelike, Local};
use sapa_core::types::{UserProfile, UserRole};
use sapa_core::SapaError;
use sapa_storage::queries::{school, turns};
use sapa_storage::Database;
use serde::Serialize;
use serde_json::json;

use crate::dispatch::Responder;

/// Reply produced by a responder: text for the chat surface plus an optional
/// structured payload for rich clients.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: None,
        }
    }

    pub fn with_payload(text: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            payload: Some(payload),
        }
    }
}

/// Everything a responder may touch for one turn.
pub struct ResponderCtx<'a> {
    pub db: &'a Database,
    pub profile: &'a UserProfile,
    /// Assistant display name, used in greetings and the help menu.
    pub agent_name: &'a str,
}

/// Run one built-in responder.
pub async fn respond(responder: Responder, ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    match responder {
        Responder::Greeting => Ok(greeting(ctx)),
        Responder::Schedule => schedule(ctx).await,
        Responder::Grades => grades(ctx).await,
        Responder::Attendance => attendance(ctx).await,
        Responder::Billing => billing(ctx).await,
        Responder::Announcements => announcements(ctx).await,
        Responder::Profile => Ok(profile(ctx)),
        Responder::Subjects => subjects(ctx).await,
        Responder::Roster => roster(ctx).await,
        Responder::DateTime => Ok(date_time()),
        Responder::ClearHistory => clear_history(ctx).await,
        Responder::Help => Ok(help(ctx)),
        Responder::Thanks => Ok(Reply::text("Sama-sama! Senang bisa membantu.")),
        Responder::Goodbye => Ok(Reply::text(
            "Sampai jumpa! Ketik pesan kapan saja kalau butuh bantuan lagi.",
        )),
    }
}

const DAY_NAMES_ID: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

fn day_name_id(iso_weekday: u8) -> &'static str {
    iso_weekday
        .checked_sub(1)
        .and_then(|i| DAY_NAMES_ID.get(i as usize))
        .copied()
        .unwrap_or("?")
}

fn format_rupiah(amount: i64) -> String {
    // Thousands separated with dots, Indonesian style.
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-Rp{grouped}")
    } else {
        format!("Rp{grouped}")
    }
}

fn greeting(ctx: &ResponderCtx<'_>) -> Reply {
    Reply::text(format!(
        "Halo {}! Saya {}, asisten sekolah. Ketik 'bantuan' untuk melihat apa saja yang bisa saya bantu.",
        ctx.profile.name, ctx.agent_name
    ))
}

async fn schedule(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    let now = Local::now();
    let weekday = now.weekday().number_from_monday() as u8;
    let day = day_name_id(weekday);

    let entries = match ctx.profile.role {
        UserRole::Teacher => school::schedule_for_teacher_day(ctx.db, &ctx.profile.id, weekday).await?,
        UserRole::Student | UserRole::Admin => match ctx.profile.class_id.as_deref() {
            Some(class_id) => school::schedule_for_class_day(ctx.db, class_id, weekday).await?,
            None => {
                return Ok(Reply::text(
                    "Kamu tidak terdaftar di kelas manapun, jadi belum ada jadwal yang bisa saya tampilkan.",
                ));
            }
        },
    };

    if entries.is_empty() {
        return Ok(Reply::text(format!("Tidak ada jadwal untuk hari {day}.")));
    }

    let mut lines = vec![format!("Jadwal hari {day}:")];
    for e in &entries {
        if ctx.profile.role == UserRole::Teacher {
            lines.push(format!(
                "- {}-{} {} ({})",
                e.starts_at, e.ends_at, e.subject_name, e.class_name
            ));
        } else {
            lines.push(format!(
                "- {}-{} {} ({})",
                e.starts_at, e.ends_at, e.subject_name, e.teacher_name
            ));
        }
    }
    Ok(Reply::with_payload(lines.join("\n"), json!(entries)))
}

async fn grades(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    if ctx.profile.role != UserRole::Student {
        return Ok(Reply::text(
            "Ringkasan nilai hanya tersedia untuk akun siswa.",
        ));
    }
    let records = school::grades_for_student(ctx.db, &ctx.profile.id).await?;
    if records.is_empty() {
        return Ok(Reply::text("Belum ada nilai yang tercatat untukmu."));
    }
    let mut lines = vec!["Nilai kamu:".to_string()];
    for r in &records {
        lines.push(format!("- {} {}: {}", r.subject_name, r.period, r.score));
    }
    Ok(Reply::with_payload(lines.join("\n"), json!(records)))
}

async fn attendance(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    if ctx.profile.role != UserRole::Student {
        return Ok(Reply::text(
            "Rekap kehadiran hanya tersedia untuk akun siswa.",
        ));
    }
    let summary = school::attendance_summary(ctx.db, &ctx.profile.id).await?;
    if summary.total == 0 {
        return Ok(Reply::text("Belum ada catatan kehadiran untukmu."));
    }
    let text = format!(
        "Kehadiranmu: hadir {} dari {} pertemuan ({:.1}%).",
        summary.present,
        summary.total,
        summary.percentage()
    );
    Ok(Reply::with_payload(
        text,
        json!({
            "present": summary.present,
            "total": summary.total,
            "percentage": summary.percentage(),
        }),
    ))
}

async fn billing(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    if ctx.profile.role != UserRole::Student {
        return Ok(Reply::text(
            "Informasi tagihan hanya tersedia untuk akun siswa.",
        ));
    }
    let items = school::billing_for_student(ctx.db, &ctx.profile.id).await?;
    if items.is_empty() {
        return Ok(Reply::text("Tidak ada tagihan yang tercatat atas namamu."));
    }
    let outstanding: i64 = items.iter().filter(|i| !i.paid).map(|i| i.amount).sum();
    let mut lines = Vec::new();
    if outstanding > 0 {
        lines.push(format!(
            "Total tunggakan kamu {}:",
            format_rupiah(outstanding)
        ));
    } else {
        lines.push("Semua tagihanmu sudah lunas. Rinciannya:".to_string());
    }
    for i in &items {
        let status = if i.paid { "lunas" } else { "belum dibayar" };
        lines.push(format!(
            "- {}: {} ({status})",
            i.description,
            format_rupiah(i.amount)
        ));
    }
    Ok(Reply::with_payload(lines.join("\n"), json!(items)))
}

async fn announcements(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let items = school::active_announcements(ctx.db, &today, ctx.profile.role).await?;
    if items.is_empty() {
        return Ok(Reply::text("Tidak ada pengumuman aktif saat ini."));
    }
    let mut lines = vec!["Pengumuman aktif:".to_string()];
    for a in &items {
        lines.push(format!("- {}: {}", a.title, a.body));
    }
    Ok(Reply::with_payload(lines.join("\n"), json!(items)))
}

fn profile(ctx: &ResponderCtx<'_>) -> Reply {
    let p = ctx.profile;
    let mut lines = vec![
        format!("Nama: {}", p.name),
        format!("Peran: {}", p.role),
    ];
    if let Some(class_id) = &p.class_id {
        lines.push(format!("Kelas: {class_id}"));
    }
    if let Some(phone) = &p.phone {
        lines.push(format!("Telepon: {phone}"));
    }
    if let Some(email) = &p.email {
        lines.push(format!("Email: {email}"));
    }
    Reply::with_payload(lines.join("\n"), json!(p))
}

async fn subjects(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    let subjects = school::list_subjects(ctx.db).await?;
    if subjects.is_empty() {
        return Ok(Reply::text("Belum ada mata pelajaran yang terdaftar."));
    }
    let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
    Ok(Reply::with_payload(
        format!("Mata pelajaran: {}.", names.join(", ")),
        json!(subjects),
    ))
}

async fn roster(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    match ctx.profile.role {
        UserRole::Teacher => {
            let load = school::teaching_load(ctx.db, &ctx.profile.id).await?;
            if load.is_empty() {
                return Ok(Reply::text("Kamu belum memiliki jadwal mengajar."));
            }
            let mut lines = vec!["Beban mengajar kamu:".to_string()];
            for l in &load {
                lines.push(format!(
                    "- {} {} ({}x per minggu)",
                    l.class_name, l.subject_name, l.sessions_per_week
                ));
            }
            Ok(Reply::with_payload(lines.join("\n"), json!(load)))
        }
        UserRole::Student | UserRole::Admin => match ctx.profile.class_id.as_deref() {
            Some(class_id) => {
                let roster = school::class_roster(ctx.db, class_id).await?;
                if roster.is_empty() {
                    return Ok(Reply::text("Kelas ini belum memiliki siswa terdaftar."));
                }
                let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
                Ok(Reply::with_payload(
                    format!("Siswa kelas {class_id}: {}.", names.join(", ")),
                    json!(roster),
                ))
            }
            None => Ok(Reply::text(
                "Kamu tidak terhubung dengan kelas manapun, jadi tidak ada daftar siswa untuk ditampilkan.",
            )),
        },
    }
}

fn date_time() -> Reply {
    let now = Local::now();
    let day = day_name_id(now.weekday().number_from_monday() as u8);
    Reply::text(format!(
        "Sekarang hari {day}, {} pukul {}.",
        now.format("%Y-%m-%d"),
        now.format("%H:%M")
    ))
}

async fn clear_history(ctx: &ResponderCtx<'_>) -> Result<Reply, SapaError> {
    let deleted = turns::clear_for_user(ctx.db, &ctx.profile.id).await?;
    Ok(Reply::text(format!(
        "Riwayat percakapanmu sudah dihapus ({deleted} pesan)."
    )))
}

fn help(ctx: &ResponderCtx<'_>) -> Reply {
    let mut lines = vec![format!(
        "Saya {}, asisten sekolah. Saya bisa membantu:",
        ctx.agent_name
    )];
    lines.push("- jadwal pelajaran hari ini".to_string());
    if ctx.profile.role == UserRole::Student {
        lines.push("- nilai, absensi, dan tagihan SPP kamu".to_string());
    }
    if ctx.profile.role == UserRole::Teacher {
        lines.push("- beban mengajar kamu".to_string());
    }
    lines.push("- pengumuman sekolah".to_string());
    lines.push("- daftar mata pelajaran".to_string());
    lines.push("- profil akun kamu".to_string());
    lines.push("- hapus riwayat chat".to_string());
    Reply::text(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapa_storage::seed::seed_demo_data;
    use tempfile::tempdir;

    async fn setup() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("responders.db").to_str().unwrap())
            .await
            .unwrap();
        seed_demo_data(&db).await.unwrap();
        (db, dir)
    }

    async fn profile_of(db: &Database, id: &str) -> UserProfile {
        school::get_user(db, id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn student_grades_are_scoped_to_the_caller() {
        let (db, _dir) = setup().await;
        let andi = profile_of(&db, "stu1").await;
        let ctx = ResponderCtx {
            db: &db,
            profile: &andi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::Grades, &ctx).await.unwrap();
        assert!(reply.text.contains("Matematika"), "{}", reply.text);
        assert!(reply.text.contains("85"), "{}", reply.text);
        // Another student's scores never leak in.
        assert!(!reply.text.contains("90"), "{}", reply.text);
    }

    #[tokio::test]
    async fn teacher_asking_grades_gets_a_scope_message() {
        let (db, _dir) = setup().await;
        let budi = profile_of(&db, "tch1").await;
        let ctx = ResponderCtx {
            db: &db,
            profile: &budi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::Grades, &ctx).await.unwrap();
        assert!(reply.text.contains("siswa"), "{}", reply.text);
        assert!(reply.payload.is_none());
    }

    #[tokio::test]
    async fn attendance_reports_percentage() {
        let (db, _dir) = setup().await;
        let andi = profile_of(&db, "stu1").await;
        let ctx = ResponderCtx {
            db: &db,
            profile: &andi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::Attendance, &ctx).await.unwrap();
        assert!(reply.text.contains("3 dari 4"), "{}", reply.text);
        assert!(reply.text.contains("75.0%"), "{}", reply.text);
    }

    #[tokio::test]
    async fn billing_totals_unpaid_items() {
        let (db, _dir) = setup().await;
        let andi = profile_of(&db, "stu1").await;
        let ctx = ResponderCtx {
            db: &db,
            profile: &andi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::Billing, &ctx).await.unwrap();
        assert!(reply.text.contains("Tunggakan") || reply.text.contains("tunggakan"),
            "{}", reply.text);
        assert!(reply.text.contains("belum dibayar"), "{}", reply.text);
    }

    #[tokio::test]
    async fn empty_results_are_replies_not_errors() {
        let (db, _dir) = setup().await;
        // Rudi has no attendance records in the demo data.
        let rudi = profile_of(&db, "stu3").await;
        let ctx = ResponderCtx {
            db: &db,
            profile: &rudi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::Attendance, &ctx).await.unwrap();
        assert!(reply.text.contains("Belum ada"), "{}", reply.text);
    }

    #[tokio::test]
    async fn clear_history_reports_deleted_count() {
        let (db, _dir) = setup().await;
        let andi = profile_of(&db, "stu1").await;
        let intent = sapa_storage::queries::intents::find_or_create(&db, "greeting")
            .await
            .unwrap();
        turns::append_turn(&db, "stu1", "halo", "Halo!", intent.id, 0.9)
            .await
            .unwrap();
        let ctx = ResponderCtx {
            db: &db,
            profile: &andi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::ClearHistory, &ctx).await.unwrap();
        assert!(reply.text.contains("1 pesan"), "{}", reply.text);
        assert!(turns::history_for_user(&db, "stu1", Some(10))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn teacher_roster_is_their_teaching_load() {
        let (db, _dir) = setup().await;
        let budi = profile_of(&db, "tch1").await;
        let ctx = ResponderCtx {
            db: &db,
            profile: &budi,
            agent_name: "sapa",
        };
        let reply = respond(Responder::Roster, &ctx).await.unwrap();
        assert!(reply.text.contains("Matematika"), "{}", reply.text);
    }

    #[test]
    fn rupiah_formatting_groups_thousands() {
        assert_eq!(format_rupiah(150000), "Rp150.000");
        assert_eq!(format_rupiah(1500), "Rp1.500");
        assert_eq!(format_rupiah(500), "Rp500");
    }

    #[test]
    fn day_names_cover_the_iso_week() {
        assert_eq!(day_name_id(1), "Senin");
        assert_eq!(day_name_id(7), "Minggu");
        assert_eq!(day_name_id(0), "?");
    }
}
