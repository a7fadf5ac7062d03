//! SQLite chunk store with vector search via `sqlite-vec`.

use std::mem::transmute;
use std::os::raw::c_char;
use std::path::Path;
use std::sync::Once;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, OptionalExtension, ffi};

use crate::types::PipelineError;

use super::{Backend, ChunkRecord};

/// Chunk store backed by a single SQLite database file.
///
/// Embeddings live in the `chunks` table as little-endian f32 blobs;
/// similarity search is a cosine-distance scan through `sqlite-vec`.
#[derive(Clone)]
pub struct SqliteChunkStore {
    conn: Connection,
}

impl SqliteChunkStore {
    /// Opens (and initializes) a store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Self::register_sqlite_vec()?;
        let conn = Connection::open(path)
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))?;
        Self::initialize(conn).await
    }

    /// Opens an in-memory store, for tests and throwaway runs.
    pub async fn open_in_memory() -> Result<Self, PipelineError> {
        Self::register_sqlite_vec()?;
        let conn = Connection::open_in_memory()
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))?;
        Self::initialize(conn).await
    }

    async fn initialize(conn: Connection) -> Result<Self, PipelineError> {
        conn.call(|conn| -> Result<(), tokio_rusqlite::rusqlite::Error> {
            conn.query_row("select vec_version()", [], |row| row.get::<_, String>(0))?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS chunks (
                    id TEXT PRIMARY KEY,
                    source TEXT,
                    chunk_index INTEGER,
                    content TEXT,
                    embedding BLOB
                );
                CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source);",
            )?;
            Ok(())
        })
        .await
        .map_err(|err| PipelineError::Storage(err.to_string()))?;
        Ok(Self { conn })
    }

    fn register_sqlite_vec() -> Result<(), PipelineError> {
        use std::sync::Mutex;

        static INIT: Once = Once::new();
        static INIT_RESULT: Mutex<Option<Result<(), String>>> = Mutex::new(None);

        INIT.call_once(|| {
            let result = unsafe {
                type SqliteExtensionInit = unsafe extern "C" fn(
                    *mut ffi::sqlite3,
                    *mut *mut c_char,
                    *const ffi::sqlite3_api_routines,
                ) -> i32;

                let init: unsafe extern "C" fn() = sqlite_vec::sqlite3_vec_init;
                let init_fn: SqliteExtensionInit =
                    transmute::<unsafe extern "C" fn(), SqliteExtensionInit>(init);
                let rc = ffi::sqlite3_auto_extension(Some(init_fn));
                if rc != 0 {
                    Err(format!(
                        "failed to register sqlite-vec extension (code {rc})"
                    ))
                } else {
                    Ok(())
                }
            };
            *INIT_RESULT.lock().expect("init result mutex poisoned") = Some(result);
        });

        INIT_RESULT
            .lock()
            .expect("init result mutex poisoned")
            .clone()
            .expect("init was called but result not set")
            .map_err(PipelineError::Storage)
    }
}

fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[async_trait]
impl Backend for SqliteChunkStore {
    async fn insert_chunks(&self, chunks: Vec<ChunkRecord>) -> Result<(), PipelineError> {
        if chunks.is_empty() {
            return Ok(());
        }
        self.conn
            .call(move |conn| -> Result<(), tokio_rusqlite::rusqlite::Error> {
                let tx = conn.transaction()?;
                for record in chunks {
                    let embedding = record.embedding.as_deref().map(embedding_to_bytes);
                    tx.execute(
                        "INSERT INTO chunks (id, source, chunk_index, content, embedding) \
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        (
                            record.id,
                            record.source,
                            record.chunk_index as i64,
                            record.content,
                            embedding,
                        ),
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))
    }

    async fn get_chunk_by_id(&self, id: &str) -> Result<Option<ChunkRecord>, PipelineError> {
        let id = id.to_string();
        self.conn
            .call(
                move |conn| -> Result<Option<ChunkRecord>, tokio_rusqlite::rusqlite::Error> {
                    let mut stmt = conn.prepare(
                        "SELECT id, source, chunk_index, content, embedding \
                         FROM chunks WHERE id = ?1",
                    )?;
                    let record = stmt
                        .query_row([&id], |row| {
                            let chunk_index: i64 = row.get(2)?;
                            let embedding: Option<Vec<u8>> = row.get(4)?;
                            Ok(ChunkRecord {
                                id: row.get(0)?,
                                source: row.get(1)?,
                                chunk_index: usize::try_from(chunk_index).unwrap_or(0),
                                content: row.get(3)?,
                                embedding: embedding.map(|bytes| bytes_to_embedding(&bytes)),
                            })
                        })
                        .optional()?;
                    Ok(record)
                },
            )
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))
    }

    async fn get_chunks_by_source(&self, source: &str) -> Result<Vec<ChunkRecord>, PipelineError> {
        let source = source.to_string();
        self.conn
            .call(
                move |conn| -> Result<Vec<ChunkRecord>, tokio_rusqlite::rusqlite::Error> {
                    let mut stmt = conn.prepare(
                        "SELECT id, source, chunk_index, content, embedding \
                         FROM chunks WHERE source = ?1 ORDER BY chunk_index ASC",
                    )?;
                    let rows = stmt.query_map([&source], |row| {
                        let chunk_index: i64 = row.get(2)?;
                        let embedding: Option<Vec<u8>> = row.get(4)?;
                        Ok(ChunkRecord {
                            id: row.get(0)?,
                            source: row.get(1)?,
                            chunk_index: usize::try_from(chunk_index).unwrap_or(0),
                            content: row.get(3)?,
                            embedding: embedding.map(|bytes| bytes_to_embedding(&bytes)),
                        })
                    })?;
                    let mut results = Vec::new();
                    for row in rows {
                        results.push(row?);
                    }
                    Ok(results)
                },
            )
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))
    }

    async fn search_similar(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(ChunkRecord, f32)>, PipelineError> {
        let embedding_json = serde_json::to_string(query_embedding)
            .map_err(|err| PipelineError::Storage(err.to_string()))?;
        self.conn
            .call(
                move |conn| -> Result<Vec<(ChunkRecord, f32)>, tokio_rusqlite::rusqlite::Error> {
                    let mut stmt = conn.prepare(
                        "SELECT id, source, chunk_index, content, embedding, \
                         vec_distance_cosine(embedding, vec_f32(?1)) AS distance \
                         FROM chunks WHERE embedding IS NOT NULL \
                         ORDER BY distance ASC LIMIT ?2",
                    )?;
                    let rows = stmt.query_map((embedding_json, top_k as i64), |row| {
                        let chunk_index: i64 = row.get(2)?;
                        let embedding: Option<Vec<u8>> = row.get(4)?;
                        let record = ChunkRecord {
                            id: row.get(0)?,
                            source: row.get(1)?,
                            chunk_index: usize::try_from(chunk_index).unwrap_or(0),
                            content: row.get(3)?,
                            embedding: embedding.map(|bytes| bytes_to_embedding(&bytes)),
                        };
                        let distance: f32 = row.get(5)?;
                        Ok((record, distance))
                    })?;
                    let mut results = Vec::new();
                    for row in rows {
                        results.push(row?);
                    }
                    Ok(results)
                },
            )
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))
    }

    async fn count(&self) -> Result<usize, PipelineError> {
        self.conn
            .call(|conn| -> Result<usize, tokio_rusqlite::rusqlite::Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(|err| PipelineError::Storage(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, index: usize, content: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord::new(id, "doc", index, content).with_embedding(embedding)
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let store = SqliteChunkStore::open_in_memory().await.unwrap();
        store
            .insert_chunks(vec![record("a", 0, "first chunk", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let fetched = store.get_chunk_by_id("a").await.unwrap().unwrap();
        assert_eq!(fetched.content, "first chunk");
        assert_eq!(fetched.chunk_index, 0);
        assert_eq!(fetched.embedding, Some(vec![1.0, 0.0, 0.0]));

        assert!(store.get_chunk_by_id("missing").await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn search_orders_by_cosine_distance() {
        let store = SqliteChunkStore::open_in_memory().await.unwrap();
        store
            .insert_chunks(vec![
                record("x", 0, "aligned", vec![1.0, 0.0, 0.0]),
                record("y", 1, "orthogonal", vec![0.0, 1.0, 0.0]),
                record("z", 2, "close", vec![0.9, 0.1, 0.0]),
            ])
            .await
            .unwrap();

        let hits = store.search_similar(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0.id, "x");
        assert_eq!(hits[1].0.id, "z");
        assert!(hits[0].1 <= hits[1].1);
    }

    #[tokio::test]
    async fn rows_without_embeddings_are_not_searchable() {
        let store = SqliteChunkStore::open_in_memory().await.unwrap();
        store
            .insert_chunks(vec![ChunkRecord::new("plain", "doc", 0, "no vector")])
            .await
            .unwrap();
        let hits = store.search_similar(&[1.0, 0.0, 0.0], 5).await.unwrap();
        assert!(hits.is_empty());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn chunks_by_source_preserve_order() {
        let store = SqliteChunkStore::open_in_memory().await.unwrap();
        store
            .insert_chunks(vec![
                record("b", 1, "second", vec![0.0, 1.0]),
                record("a", 0, "first", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();
        let rows = store.get_chunks_by_source("doc").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[1].id, "b");
    }
}
