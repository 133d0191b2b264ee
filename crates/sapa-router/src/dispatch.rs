// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static dispatch table from intent names to domain responders.
//!
//! Both canonical names and synonym aliases (Indonesian and English) map to
//! the same responder, so an administrator can teach the classifier a new
//! phrasing under either name without touching code. Names with no table
//! entry fall through to the canned-response registry.

/// A built-in domain responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Responder {
    Greeting,
    Schedule,
    Grades,
    Attendance,
    Billing,
    Announcements,
    Profile,
    Subjects,
    Roster,
    DateTime,
    ClearHistory,
    Help,
    Thanks,
    Goodbye,
}

/// Intent name (canonical or alias) -> responder. Adding an intent to the
/// assistant means adding a row here plus corpus examples.
const DISPATCH_TABLE: &[(&str, Responder)] = &[
    ("greeting", Responder::Greeting),
    ("halo", Responder::Greeting),
    ("hello", Responder::Greeting),
    ("jadwal", Responder::Schedule),
    ("schedule", Responder::Schedule),
    ("nilai", Responder::Grades),
    ("grades", Responder::Grades),
    ("absensi", Responder::Attendance),
    ("attendance", Responder::Attendance),
    ("pembayaran", Responder::Billing),
    ("tagihan", Responder::Billing),
    ("billing", Responder::Billing),
    ("pengumuman", Responder::Announcements),
    ("announcements", Responder::Announcements),
    ("profil", Responder::Profile),
    ("profile", Responder::Profile),
    ("mapel", Responder::Subjects),
    ("subjects", Responder::Subjects),
    ("roster", Responder::Roster),
    ("siswa", Responder::Roster),
    ("waktu", Responder::DateTime),
    ("tanggal", Responder::DateTime),
    ("datetime", Responder::DateTime),
    ("hapus_riwayat", Responder::ClearHistory),
    ("clear_history", Responder::ClearHistory),
    ("bantuan", Responder::Help),
    ("help", Responder::Help),
    ("terima_kasih", Responder::Thanks),
    ("thanks", Responder::Thanks),
    ("selamat_tinggal", Responder::Goodbye),
    ("goodbye", Responder::Goodbye),
];

/// Resolve an intent name to its responder, if the name is built in.
pub fn resolve(intent: &str) -> Option<Responder> {
    let wanted = intent.trim().to_lowercase();
    DISPATCH_TABLE
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, responder)| *responder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_resolve() {
        assert_eq!(resolve("jadwal"), Some(Responder::Schedule));
        assert_eq!(resolve("hapus_riwayat"), Some(Responder::ClearHistory));
    }

    #[test]
    fn aliases_resolve_to_the_same_responder() {
        assert_eq!(resolve("schedule"), resolve("jadwal"));
        assert_eq!(resolve("billing"), resolve("pembayaran"));
    }

    #[test]
    fn resolution_ignores_case_and_whitespace() {
        assert_eq!(resolve("  Jadwal "), Some(Responder::Schedule));
    }

    #[test]
    fn unknown_names_fall_through_to_the_registry() {
        assert_eq!(resolve("informasi"), None);
        assert_eq!(resolve("unknown"), None);
    }
}
