// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent registry operations.

use rusqlite::params;
use sapa_core::SapaError;

use crate::database::{map_tr_err, Database};
use crate::models::Intent;

/// Description given to intents auto-registered from classifier output.
pub const AUTO_DESCRIPTION: &str = "auto-registered";

fn row_to_intent(row: &rusqlite::Row<'_>) -> Result<Intent, rusqlite::Error> {
    Ok(Intent {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Create an intent explicitly. Fails with `Conflict` if the name exists.
pub async fn create_intent(
    db: &Database,
    name: &str,
    description: &str,
) -> Result<Intent, SapaError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(SapaError::InvalidInput("intent name must not be empty".into()));
    }
    let description = description.to_string();
    let conflict_name = name.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO intents (name, description) VALUES (?1, ?2)",
                params![name, description],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare(
                "SELECT id, name, description, created_at FROM intents WHERE id = ?1",
            )?;
            let intent = stmt.query_row(params![id], row_to_intent)?;
            Ok(intent)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(ref err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                SapaError::Conflict(conflict_name)
            }
            other => map_tr_err(other),
        })
}

/// Look up an intent by name, creating it with a placeholder description if
/// it does not exist yet (auto-registration of classifier-returned names).
pub async fn find_or_create(db: &Database, name: &str) -> Result<Intent, SapaError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(SapaError::InvalidInput("intent name must not be empty".into()));
    }

    db.connection()
        .call(move |conn| {
            // INSERT OR IGNORE + SELECT keeps this a single round trip and
            // safe against concurrent registration of the same name.
            conn.execute(
                "INSERT OR IGNORE INTO intents (name, description) VALUES (?1, ?2)",
                params![name, AUTO_DESCRIPTION],
            )?;
            let mut stmt = conn.prepare(
                "SELECT id, name, description, created_at FROM intents WHERE name = ?1",
            )?;
            let intent = stmt.query_row(params![name], row_to_intent)?;
            Ok(intent)
        })
        .await
        .map_err(map_tr_err)
}

/// Get an intent by id.
pub async fn get_intent(db: &Database, id: i64) -> Result<Option<Intent>, SapaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, created_at FROM intents WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], row_to_intent) {
                Ok(intent) => Ok(Some(intent)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get an intent by its unique name.
pub async fn get_intent_by_name(db: &Database, name: &str) -> Result<Option<Intent>, SapaError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, created_at FROM intents WHERE name = ?1",
            )?;
            match stmt.query_row(params![name], row_to_intent) {
                Ok(intent) => Ok(Some(intent)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all intents ordered by name.
pub async fn list_intents(db: &Database) -> Result<Vec<Intent>, SapaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, description, created_at FROM intents ORDER BY name ASC",
            )?;
            let intents = stmt
                .query_map([], row_to_intent)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(intents)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an intent as one atomic unit: delete all its canned responses,
/// null out `intent_id` on every conversation turn that referenced it, then
/// delete the intent itself. Any step failing rolls the whole delete back.
pub async fn delete_intent_cascade(db: &Database, id: i64) -> Result<(), SapaError> {
    let found = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM canned_responses WHERE intent_id = ?1",
                params![id],
            )?;
            tx.execute(
                "UPDATE conversation_turns SET intent_id = NULL WHERE intent_id = ?1",
                params![id],
            )?;
            let deleted = tx.execute("DELETE FROM intents WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)?;

    if found {
        Ok(())
    } else {
        Err(SapaError::NotFound {
            kind: "intent",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{responses, turns};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_get_intent() {
        let (db, _dir) = setup_db().await;
        let intent = create_intent(&db, "jadwal", "schedule questions")
            .await
            .unwrap();
        assert_eq!(intent.name, "jadwal");

        let by_id = get_intent(&db, intent.id).await.unwrap().unwrap();
        assert_eq!(by_id.description, "schedule questions");

        let by_name = get_intent_by_name(&db, "jadwal").await.unwrap().unwrap();
        assert_eq!(by_name.id, intent.id);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let (db, _dir) = setup_db().await;
        create_intent(&db, "nilai", "").await.unwrap();
        let err = create_intent(&db, "nilai", "again").await.unwrap_err();
        assert!(matches!(err, SapaError::Conflict(name) if name == "nilai"));
    }

    #[tokio::test]
    async fn find_or_create_auto_registers_once() {
        let (db, _dir) = setup_db().await;
        let first = find_or_create(&db, "cuaca").await.unwrap();
        assert_eq!(first.description, AUTO_DESCRIPTION);

        let second = find_or_create(&db, "cuaca").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(list_intents(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cascade_delete_removes_responses_and_nulls_turns() {
        let (db, _dir) = setup_db().await;
        let intent = create_intent(&db, "pembayaran", "").await.unwrap();
        responses::create_response(&db, intent.id, "cek tagihan di loket", 1)
            .await
            .unwrap();
        responses::create_response(&db, intent.id, "hubungi bagian keuangan", 2)
            .await
            .unwrap();
        let t1 = turns::append_turn(&db, "u1", "bayar spp", "ok", intent.id, 0.9)
            .await
            .unwrap();
        let t2 = turns::append_turn(&db, "u2", "tagihan", "ok", intent.id, 0.8)
            .await
            .unwrap();

        delete_intent_cascade(&db, intent.id).await.unwrap();

        assert!(get_intent(&db, intent.id).await.unwrap().is_none());
        assert!(responses::list_for_intent(&db, intent.id)
            .await
            .unwrap()
            .is_empty());
        for turn_id in [t1, t2] {
            let turn = turns::get_turn(&db, turn_id).await.unwrap().unwrap();
            assert_eq!(turn.intent_id, None, "turn must survive with nulled intent");
        }
    }

    #[tokio::test]
    async fn cascade_delete_rolls_back_on_midway_failure() {
        let (db, _dir) = setup_db().await;
        let intent = create_intent(&db, "informasi", "").await.unwrap();
        responses::create_response(&db, intent.id, "lihat papan pengumuman", 0)
            .await
            .unwrap();
        turns::append_turn(&db, "u1", "info dong", "ok", intent.id, 0.7)
            .await
            .unwrap();

        // Inject a failure between the response delete and the turn update:
        // the trigger aborts the UPDATE, which must roll back the response
        // delete that already ran inside the same transaction.
        db.connection()
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER fail_turn_update
                     BEFORE UPDATE OF intent_id ON conversation_turns
                     BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let err = delete_intent_cascade(&db, intent.id).await;
        assert!(err.is_err(), "injected failure must surface");

        // Nothing was partially applied.
        assert!(get_intent(&db, intent.id).await.unwrap().is_some());
        assert_eq!(
            responses::list_for_intent(&db, intent.id).await.unwrap().len(),
            1,
            "response delete must have rolled back"
        );
    }

    #[tokio::test]
    async fn deleting_unknown_intent_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = delete_intent_cascade(&db, 404).await.unwrap_err();
        assert!(matches!(err, SapaError::NotFound { kind: "intent", .. }));
    }
}
