use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use rusqlite::params;

use crate::domain::entities::document::{DocumentId, FileDocument, NewFileDocument, OwnerId};
use crate::domain::entities::user::UserAccount;
use crate::infra::sqlite::schema::open_connection;

/// Inserts one document inside a transaction so the whole document becomes
/// visible atomically or not at all.
pub fn insert_document(
    db_path: &Path,
    owner: &OwnerId,
    document: &NewFileDocument,
) -> Result<i64> {
    let headers_json =
        serde_json::to_string(&document.headers).context("failed to serialize headers")?;

    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start document insert transaction")?;

    tx.execute(
        "INSERT INTO file_document(owner_id, name, uploaded_at, size, headers, data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            owner.0,
            document.name,
            document.uploaded_at.timestamp_millis(),
            document.size,
            headers_json,
            document.data
        ],
    )
    .context("failed to insert document")?;
    let document_id = tx.last_insert_rowid();

    tx.commit().context("failed to commit document insert")?;

    Ok(document_id)
}

/// Most recent first; equal timestamps keep insertion order.
pub fn list_documents_by_owner(db_path: &Path, owner: &OwnerId) -> Result<Vec<FileDocument>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, owner_id, name, uploaded_at, size, headers, data
             FROM file_document
             WHERE owner_id = ?1
             ORDER BY uploaded_at DESC, id ASC",
        )
        .context("failed to prepare document list query")?;

    let rows = stmt
        .query_map(params![owner.0], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .context("failed to run document list query")?;

    let mut documents = Vec::new();
    for row in rows {
        let (id, owner_id, name, millis, size, headers_json, data) =
            row.context("failed to read document row")?;
        let uploaded_at = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| anyhow!("invalid uploaded_at timestamp: {millis}"))?;
        let headers =
            serde_json::from_str(&headers_json).context("failed to parse stored headers")?;
        documents.push(FileDocument {
            id: DocumentId(id),
            owner: OwnerId(owner_id),
            name,
            uploaded_at,
            size,
            headers,
            data,
        });
    }

    Ok(documents)
}

pub fn delete_document(db_path: &Path, owner: &OwnerId, id: DocumentId) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "DELETE FROM file_document WHERE owner_id = ?1 AND id = ?2",
        params![owner.0, id.0],
    )
    .context("failed to delete document")?;
    Ok(())
}

pub fn list_owner_ids(db_path: &Path) -> Result<Vec<OwnerId>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare("SELECT DISTINCT owner_id FROM file_document ORDER BY owner_id")
        .context("failed to prepare owner list query")?;
    let owners = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("failed to run owner list query")?
        .collect::<rusqlite::Result<Vec<String>>>()
        .context("failed to read owner rows")?;
    Ok(owners.into_iter().map(OwnerId).collect())
}

pub fn count_documents_by_owner(db_path: &Path, owner: &OwnerId) -> Result<i64> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT COUNT(*) FROM file_document WHERE owner_id = ?1",
        params![owner.0],
        |row| row.get(0),
    )
    .context("failed to count documents")
}

pub fn insert_account(
    db_path: &Path,
    id: &str,
    email: &str,
    password_hash: &str,
) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO user_account(id, email, password_hash) VALUES (?1, ?2, ?3)",
        params![id, email, password_hash],
    )
    .context("failed to insert account")?;
    Ok(())
}

pub fn find_account_by_email(db_path: &Path, email: &str) -> Result<Option<(String, String)>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare("SELECT id, password_hash FROM user_account WHERE email = ?1")
        .context("failed to prepare account lookup")?;
    let mut rows = stmt
        .query_map(params![email], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .context("failed to run account lookup")?;
    match rows.next() {
        Some(row) => Ok(Some(row.context("failed to read account row")?)),
        None => Ok(None),
    }
}

pub fn list_accounts(db_path: &Path) -> Result<Vec<UserAccount>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare("SELECT id, email FROM user_account ORDER BY created_at, id")
        .context("failed to prepare account list query")?;
    let accounts = stmt
        .query_map([], |row| {
            Ok(UserAccount {
                id: OwnerId(row.get(0)?),
                email: row.get(1)?,
            })
        })
        .context("failed to run account list query")?
        .collect::<rusqlite::Result<Vec<UserAccount>>>()
        .context("failed to read account rows")?;
    Ok(accounts)
}
