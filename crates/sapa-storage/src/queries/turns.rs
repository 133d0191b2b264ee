// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation log operations.
//!
//! The log is append-only per turn: exactly one row per processed message,
//! on every code path. Rows are only removed by the per-user clear (session
//! fresh-start or explicit request).

use rusqlite::params;
use sapa_core::types::TurnStats;
use sapa_core::SapaError;

use crate::database::{map_tr_err, Database};
use crate::models::ConversationTurn;

fn row_to_turn(row: &rusqlite::Row<'_>) -> Result<ConversationTurn, rusqlite::Error> {
    Ok(ConversationTurn {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        reply: row.get(3)?,
        intent_id: row.get(4)?,
        confidence: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const TURN_COLUMNS: &str = "id, user_id, message, reply, intent_id, confidence, created_at";

/// Append one turn. `intent_id` is non-null at write time; the registry's
/// find-or-create runs before this. Returns the new row id.
pub async fn append_turn(
    db: &Database,
    user_id: &str,
    message: &str,
    reply: &str,
    intent_id: i64,
    confidence: f64,
) -> Result<i64, SapaError> {
    let user_id = user_id.to_string();
    let message = message.to_string();
    let reply = reply.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation_turns (user_id, message, reply, intent_id, confidence)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user_id, message, reply, intent_id, confidence],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a single turn by id.
pub async fn get_turn(db: &Database, id: i64) -> Result<Option<ConversationTurn>, SapaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TURN_COLUMNS} FROM conversation_turns WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], row_to_turn) {
                Ok(turn) => Ok(Some(turn)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// A user's most recent turns, newest first. Used by the confidence gate,
/// which reads this window BEFORE the current turn is appended.
pub async fn recent_for_user(
    db: &Database,
    user_id: &str,
    limit: usize,
) -> Result<Vec<ConversationTurn>, SapaError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TURN_COLUMNS} FROM conversation_turns
                 WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2"
            ))?;
            let turns = stmt
                .query_map(params![user_id, limit as i64], row_to_turn)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(turns)
        })
        .await
        .map_err(map_tr_err)
}

/// Full history for a user, newest first, optionally limited.
pub async fn history_for_user(
    db: &Database,
    user_id: &str,
    limit: Option<i64>,
) -> Result<Vec<ConversationTurn>, SapaError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut turns = Vec::new();
            match limit {
                Some(lim) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {TURN_COLUMNS} FROM conversation_turns
                         WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2"
                    ))?;
                    let rows = stmt.query_map(params![user_id, lim], row_to_turn)?;
                    for row in rows {
                        turns.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {TURN_COLUMNS} FROM conversation_turns
                         WHERE user_id = ?1 ORDER BY id DESC"
                    ))?;
                    let rows = stmt.query_map(params![user_id], row_to_turn)?;
                    for row in rows {
                        turns.push(row?);
                    }
                }
            }
            Ok(turns)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete all turns for one user. Returns the number of deleted rows.
/// Other users' turns are untouched.
pub async fn clear_for_user(db: &Database, user_id: &str) -> Result<usize, SapaError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM conversation_turns WHERE user_id = ?1",
                params![user_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Aggregate statistics over the log, optionally bounded by ISO-8601
/// timestamps (inclusive). Turns whose intent was deleted are grouped
/// under "(deleted)".
pub async fn stats(
    db: &Database,
    from: Option<String>,
    to: Option<String>,
) -> Result<TurnStats, SapaError> {
    db.connection()
        .call(move |conn| {
            let mut clauses = Vec::new();
            let mut args: Vec<String> = Vec::new();
            if let Some(from) = from {
                clauses.push("t.created_at >= ?");
                args.push(from);
            }
            if let Some(to) = to {
                clauses.push("t.created_at <= ?");
                args.push(to);
            }
            let filter = if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            };

            let (total_turns, avg_confidence) = {
                let sql = format!(
                    "SELECT COUNT(*), COALESCE(AVG(t.confidence), 0.0)
                     FROM conversation_turns t{filter}"
                );
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_row(rusqlite::params_from_iter(args.iter()), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
                })?
            };

            let per_intent = {
                let sql = format!(
                    "SELECT COALESCE(i.name, '(deleted)'), COUNT(*)
                     FROM conversation_turns t
                     LEFT JOIN intents i ON i.id = t.intent_id{filter}
                     GROUP BY 1 ORDER BY 2 DESC, 1 ASC"
                );
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?
            };

            Ok(TurnStats {
                total_turns,
                avg_confidence,
                per_intent,
            })
        })
        .await
        .map_err(map_tr_err)
}
