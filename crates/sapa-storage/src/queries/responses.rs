// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned response registry operations.
//!
//! Responses for an intent are ordered by priority descending, then creation
//! time ascending (stable tie-break: older wins among equal priorities).

use rusqlite::params;
use sapa_core::SapaError;

use crate::database::{map_tr_err, Database};
use crate::models::CannedResponse;

fn row_to_response(row: &rusqlite::Row<'_>) -> Result<CannedResponse, rusqlite::Error> {
    Ok(CannedResponse {
        id: row.get(0)?,
        intent_id: row.get(1)?,
        text: row.get(2)?,
        priority: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Create a canned response for an intent. `NotFound` if the intent is unknown.
pub async fn create_response(
    db: &Database,
    intent_id: i64,
    text: &str,
    priority: i64,
) -> Result<CannedResponse, SapaError> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(SapaError::InvalidInput(
            "response text must not be empty".into(),
        ));
    }

    let created = db
        .connection()
        .call(move |conn| {
            let intent_exists: bool = conn
                .prepare("SELECT 1 FROM intents WHERE id = ?1")?
                .exists(params![intent_id])?;
            if !intent_exists {
                return Ok(None);
            }
            conn.execute(
                "INSERT INTO canned_responses (intent_id, text, priority) VALUES (?1, ?2, ?3)",
                params![intent_id, text, priority],
            )?;
            let id = conn.last_insert_rowid();
            let mut stmt = conn.prepare(
                "SELECT id, intent_id, text, priority, created_at
                 FROM canned_responses WHERE id = ?1",
            )?;
            let response = stmt.query_row(params![id], row_to_response)?;
            Ok(Some(response))
        })
        .await
        .map_err(map_tr_err)?;

    created.ok_or(SapaError::NotFound {
        kind: "intent",
        id: intent_id.to_string(),
    })
}

/// Update a response's text and priority.
pub async fn update_response(
    db: &Database,
    id: i64,
    text: &str,
    priority: i64,
) -> Result<(), SapaError> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(SapaError::InvalidInput(
            "response text must not be empty".into(),
        ));
    }

    let updated = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE canned_responses SET text = ?1, priority = ?2 WHERE id = ?3",
                params![text, priority, id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;

    if updated > 0 {
        Ok(())
    } else {
        Err(SapaError::NotFound {
            kind: "response",
            id: id.to_string(),
        })
    }
}

/// Delete a single response.
pub async fn delete_response(db: &Database, id: i64) -> Result<(), SapaError> {
    let deleted = db
        .connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM canned_responses WHERE id = ?1", params![id])?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;

    if deleted > 0 {
        Ok(())
    } else {
        Err(SapaError::NotFound {
            kind: "response",
            id: id.to_string(),
        })
    }
}

/// List an intent's responses: priority descending, then oldest first.
pub async fn list_for_intent(
    db: &Database,
    intent_id: i64,
) -> Result<Vec<CannedResponse>, SapaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, intent_id, text, priority, created_at
                 FROM canned_responses WHERE intent_id = ?1
                 ORDER BY priority DESC, created_at ASC, id ASC",
            )?;
            let responses = stmt
                .query_map(params![intent_id], row_to_response)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(responses)
        })
        .await
        .map_err(map_tr_err)
}

/// The single preferred response for an intent, if any: highest priority,
/// ties broken by oldest creation time.
pub async fn best_for_intent(
    db: &Database,
    intent_id: i64,
) -> Result<Option<CannedResponse>, SapaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, intent_id, text, priority, created_at
                 FROM canned_responses WHERE intent_id = ?1
                 ORDER BY priority DESC, created_at ASC, id ASC
                 LIMIT 1",
            )?;
            match stmt.query_row(params![intent_id], row_to_response) {
                Ok(response) => Ok(Some(response)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::intents;
    use rusqlite::params;
    use tempfile::tempdir;

    async fn setup() -> (Database, i64, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        let intent = intents::create_intent(&db, "bantuan", "help").await.unwrap();
        (db, intent.id, dir)
    }

    #[tokio::test]
    async fn create_for_unknown_intent_is_not_found() {
        let (db, _intent_id, _dir) = setup().await;
        let err = create_response(&db, 999, "nope", 0).await.unwrap_err();
        assert!(matches!(err, SapaError::NotFound { kind: "intent", .. }));
    }

    #[tokio::test]
    async fn listing_orders_by_priority_then_age() {
        let (db, intent_id, _dir) = setup().await;

        // Insert with explicit timestamps so the tie-break is deterministic.
        let rows = [
            ("low priority", 1, "2026-01-01T00:00:03.000Z"),
            ("high, newer", 5, "2026-01-01T00:00:02.000Z"),
            ("high, older", 5, "2026-01-01T00:00:01.000Z"),
        ];
        for (text, priority, ts) in rows {
            db.connection()
                .call(move |conn| {
                    conn.execute(
                        "INSERT INTO canned_responses (intent_id, text, priority, created_at)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![intent_id, text, priority, ts],
                    )?;
                    Ok::<_, rusqlite::Error>(())
                })
                .await
                .unwrap();
        }

        let listed = list_for_intent(&db, intent_id).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["high, older", "high, newer", "low priority"]);

        let best = best_for_intent(&db, intent_id).await.unwrap().unwrap();
        assert_eq!(best.text, "high, older");
    }

    #[tokio::test]
    async fn best_for_intent_without_responses_is_none() {
        let (db, intent_id, _dir) = setup().await;
        assert!(best_for_intent(&db, intent_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let (db, intent_id, _dir) = setup().await;
        let created = create_response(&db, intent_id, "ketik 'menu'", 3)
            .await
            .unwrap();

        update_response(&db, created.id, "ketik 'bantuan'", 7)
            .await
            .unwrap();
        let listed = list_for_intent(&db, intent_id).await.unwrap();
        assert_eq!(listed[0].text, "ketik 'bantuan'");
        assert_eq!(listed[0].priority, 7);

        delete_response(&db, created.id).await.unwrap();
        assert!(list_for_intent(&db, intent_id).await.unwrap().is_empty());

        let err = delete_response(&db, created.id).await.unwrap_err();
        assert!(matches!(err, SapaError::NotFound { kind: "response", .. }));
    }

    #[tokio::test]
    async fn empty_text_is_invalid_input() {
        let (db, intent_id, _dir) = setup().await;
        let err = create_response(&db, intent_id, "   ", 0).await.unwrap_err();
        assert!(matches!(err, SapaError::InvalidInput(_)));
    }
}
