// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base training corpus for the school assistant.
//!
//! Indonesian phrasings with English synonyms for every dispatchable intent.
//! Administrator-supplied examples are merged on top of this corpus on
//! retrain; the base itself is compiled in and never mutated.

use sapa_core::types::TrainingExample;

/// (text, intent) pairs covering every intent the dispatch table knows.
pub const BASE_CORPUS: &[(&str, &str)] = &[
    // greeting
    ("halo", "greeting"),
    ("halo kak", "greeting"),
    ("hai selamat pagi", "greeting"),
    ("selamat siang", "greeting"),
    ("selamat sore", "greeting"),
    ("assalamualaikum", "greeting"),
    ("hello", "greeting"),
    ("hi good morning", "greeting"),
    // jadwal -- schedule for today
    ("jadwal pelajaran hari ini", "jadwal"),
    ("jadwal hari ini apa saja", "jadwal"),
    ("pelajaran apa hari ini", "jadwal"),
    ("lihat jadwal kelas", "jadwal"),
    ("jadwal mengajar saya", "jadwal"),
    ("schedule for today", "jadwal"),
    ("what classes today", "jadwal"),
    // nilai -- grade summary
    ("nilai saya berapa", "nilai"),
    ("lihat nilai ujian", "nilai"),
    ("berapa nilai matematika saya", "nilai"),
    ("nilai rapor saya", "nilai"),
    ("hasil ulangan saya", "nilai"),
    ("my grades please", "nilai"),
    ("show my exam results", "nilai"),
    // absensi -- attendance percentage
    ("absensi saya bagaimana", "absensi"),
    ("berapa persen kehadiran saya", "absensi"),
    ("rekap absen saya", "absensi"),
    ("kehadiran saya bulan ini", "absensi"),
    ("my attendance record", "absensi"),
    ("attendance percentage", "absensi"),
    // pembayaran -- billing status
    ("tagihan spp saya", "pembayaran"),
    ("berapa tagihan saya", "pembayaran"),
    ("status pembayaran spp", "pembayaran"),
    ("apakah spp sudah lunas", "pembayaran"),
    ("cek tunggakan saya", "pembayaran"),
    ("my bill status", "pembayaran"),
    ("payment status please", "pembayaran"),
    // pengumuman -- announcements
    ("pengumuman terbaru", "pengumuman"),
    ("ada pengumuman apa", "pengumuman"),
    ("berita sekolah terkini", "pengumuman"),
    ("pengumuman hari ini", "pengumuman"),
    ("any announcements", "pengumuman"),
    ("latest school news", "pengumuman"),
    // informasi -- general school information
    ("kapan libur sekolah", "informasi"),
    ("informasi pendaftaran siswa baru", "informasi"),
    ("kapan ujian dimulai", "informasi"),
    ("jam berapa sekolah masuk", "informasi"),
    ("school holiday information", "informasi"),
    // profil -- caller's own profile
    ("profil saya", "profil"),
    ("data diri saya", "profil"),
    ("siapa saya menurut sistem", "profil"),
    ("lihat akun saya", "profil"),
    ("my profile", "profil"),
    ("show my account", "profil"),
    // mapel -- subject catalog
    ("daftar mata pelajaran", "mapel"),
    ("mapel apa saja di sekolah", "mapel"),
    ("list mata pelajaran semua", "mapel"),
    ("subject list", "mapel"),
    ("what subjects are there", "mapel"),
    // waktu -- current date/time
    ("jam berapa sekarang", "waktu"),
    ("tanggal berapa hari ini", "waktu"),
    ("sekarang hari apa", "waktu"),
    ("what time is it", "waktu"),
    ("what day is today", "waktu"),
    // hapus_riwayat -- clear chat history
    ("hapus riwayat chat", "hapus_riwayat"),
    ("bersihkan percakapan", "hapus_riwayat"),
    ("hapus semua chat saya", "hapus_riwayat"),
    ("clear my chat history", "hapus_riwayat"),
    ("delete conversation history", "hapus_riwayat"),
    // bantuan -- help menu
    ("bantuan", "bantuan"),
    ("menu bantuan dong", "bantuan"),
    ("bisa apa saja kamu", "bantuan"),
    ("tolong tampilkan menu", "bantuan"),
    ("help me", "bantuan"),
    ("what can you do", "bantuan"),
    // terima_kasih
    ("terima kasih banyak", "terima_kasih"),
    ("makasih ya", "terima_kasih"),
    ("oke terima kasih", "terima_kasih"),
    ("thank you", "terima_kasih"),
    ("thanks a lot", "terima_kasih"),
    // selamat_tinggal
    ("sampai jumpa", "selamat_tinggal"),
    ("selamat tinggal", "selamat_tinggal"),
    ("dadah dulu ya", "selamat_tinggal"),
    ("goodbye", "selamat_tinggal"),
    ("bye bye", "selamat_tinggal"),
];

/// The base corpus as owned examples, ready to merge with admin extras.
pub fn base_examples() -> Vec<TrainingExample> {
    BASE_CORPUS
        .iter()
        .map(|(text, intent)| TrainingExample::new(*text, *intent))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_corpus_is_well_formed() {
        let examples = base_examples();
        assert!(examples.len() > 50);
        assert!(examples.iter().all(|e| e.is_valid()));
    }

    #[test]
    fn every_intent_has_multiple_examples() {
        use std::collections::HashMap;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (_, intent) in BASE_CORPUS {
            *counts.entry(intent).or_default() += 1;
        }
        for (intent, count) in counts {
            assert!(count >= 5, "intent {intent} has only {count} examples");
        }
    }
}
