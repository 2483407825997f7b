//! Explicit store handle over a SQLite connection
//!
//! Lifecycle is open, create_schema, load, close. The schema is never
//! created implicitly, and taxa must be loaded before accessions
//! because the accession table declares a foreign key into taxa.

use std::path::{Path, PathBuf};

use rusqlite::{ffi, params, params_from_iter, types::Value, Connection};
use taxadb_core::{Accession, TaxadbError, TaxadbResult, Taxon};
use tracing::{debug, info};

use crate::schema;

/// Handle to a SQLite taxonomy store
pub struct TaxonomyStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl TaxonomyStore {
    /// Open (or create) a store file.
    ///
    /// Opening never creates tables; call
    /// [`create_schema`](Self::create_schema) exactly once per store.
    pub fn open<P: AsRef<Path>>(path: P) -> TaxadbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(db_err)?;
        let store = TaxonomyStore {
            conn,
            path: Some(path),
        };
        store.apply_pragmas()?;
        Ok(store)
    }

    /// Open an in-memory store, mainly for tests
    pub fn in_memory() -> TaxadbResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        let store = TaxonomyStore { conn, path: None };
        store.apply_pragmas()?;
        Ok(store)
    }

    fn apply_pragmas(&self) -> TaxadbResult<()> {
        self.conn
            .execute_batch(
                "PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )
            .map_err(db_err)?;
        // WAL is not available for in-memory connections
        let _ = self.conn.execute_batch("PRAGMA journal_mode = WAL;");
        Ok(())
    }

    /// Create the taxa and accessions tables.
    ///
    /// The store has no reset operation, so creating the schema twice
    /// is an error rather than a silent no-op.
    pub fn create_schema(&self) -> TaxadbResult<()> {
        if self.has_schema()? {
            return Err(TaxadbError::AlreadyExists(format!(
                "schema already present in {}",
                self.describe()
            )));
        }
        self.conn.execute_batch(schema::SCHEMA_SQL).map_err(db_err)?;
        debug!("created schema in {}", self.describe());
        Ok(())
    }

    fn has_schema(&self) -> TaxadbResult<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'taxa'",
                [],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        Ok(count > 0)
    }

    /// Insert taxa in multi-row batches inside a single transaction.
    ///
    /// Either every record becomes durable or, on any failure
    /// (including a duplicate taxon_id), none do. Returns the number of
    /// rows written.
    pub fn load_taxa(&self, taxa: &[Taxon], batch_size: usize) -> TaxadbResult<usize> {
        if batch_size == 0 {
            return Err(TaxadbError::InvalidInput(
                "taxa batch size must be at least 1".to_string(),
            ));
        }

        let tx = self.conn.unchecked_transaction().map_err(db_err)?;
        for chunk in taxa.chunks(batch_size) {
            let mut sql = String::from(
                "INSERT INTO taxa (taxon_id, parent_taxon_id, scientific_name, rank) VALUES ",
            );
            for i in 0..chunk.len() {
                if i > 0 {
                    sql.push(',');
                }
                sql.push_str("(?, ?, ?, ?)");
            }

            let mut values: Vec<Value> = Vec::with_capacity(chunk.len() * 4);
            for taxon in chunk {
                values.push(Value::from(i64::from(taxon.taxon_id)));
                values.push(Value::from(i64::from(taxon.parent_taxon_id)));
                values.push(Value::from(taxon.scientific_name.clone()));
                values.push(Value::from(taxon.rank.clone()));
            }

            // At most two distinct statements end up cached: full chunks
            // and the final partial one
            let mut stmt = tx.prepare_cached(&sql).map_err(db_err)?;
            stmt.execute(params_from_iter(values)).map_err(taxa_insert_err)?;
        }
        tx.commit().map_err(db_err)?;

        info!("loaded {} taxa into {}", taxa.len(), self.describe());
        Ok(taxa.len())
    }

    /// Stream accession records into the store inside a single
    /// transaction.
    ///
    /// The cursor is pulled lazily, so arbitrarily large inputs work. A
    /// parse error from the cursor or a record referencing a taxon that
    /// was never loaded aborts the call and rolls the whole load back.
    pub fn load_accessions<I>(&self, records: I) -> TaxadbResult<usize>
    where
        I: IntoIterator<Item = TaxadbResult<Accession>>,
    {
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO accessions (accession_number, taxon_id) VALUES (?1, ?2)",
                )
                .map_err(db_err)?;
            for record in records {
                let record = record?;
                stmt.execute(params![record.accession_number, record.taxon_id])
                    .map_err(|e| accession_insert_err(e, &record))?;
                inserted += 1;
            }
        }
        tx.commit().map_err(db_err)?;

        info!("loaded {} accessions into {}", inserted, self.describe());
        Ok(inserted)
    }

    /// Number of taxa currently in the store
    pub fn taxon_count(&self) -> TaxadbResult<u64> {
        self.count("SELECT COUNT(*) FROM taxa")
    }

    /// Number of accession rows currently in the store
    pub fn accession_count(&self) -> TaxadbResult<u64> {
        self.count("SELECT COUNT(*) FROM accessions")
    }

    fn count(&self, sql: &str) -> TaxadbResult<u64> {
        let count: i64 = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as u64)
    }

    /// Close the handle, surfacing any outstanding error
    pub fn close(self) -> TaxadbResult<()> {
        self.conn.close().map_err(|(_, e)| db_err(e))
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "memory".to_string(),
        }
    }
}

fn db_err(e: rusqlite::Error) -> TaxadbError {
    TaxadbError::Database(e.to_string())
}

fn is_constraint(e: &rusqlite::Error, extended_code: std::os::raw::c_int) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.extended_code == extended_code)
}

fn taxa_insert_err(e: rusqlite::Error) -> TaxadbError {
    if is_constraint(&e, ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        || is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE)
    {
        TaxadbError::AlreadyExists(format!("duplicate taxon id: {}", e))
    } else {
        db_err(e)
    }
}

fn accession_insert_err(e: rusqlite::Error, record: &Accession) -> TaxadbError {
    if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
        TaxadbError::MissingTaxon(format!(
            "accession {} references taxon {} which is not in the store",
            record.accession_number, record.taxon_id
        ))
    } else {
        db_err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn taxon(taxon_id: u32, parent: u32, name: &str, rank: &str) -> Taxon {
        Taxon {
            taxon_id,
            parent_taxon_id: parent,
            scientific_name: name.to_string(),
            rank: rank.to_string(),
        }
    }

    fn accession(number: &str, taxon_id: u32) -> TaxadbResult<Accession> {
        Ok(Accession {
            accession_number: number.to_string(),
            taxon_id,
        })
    }

    fn sample_taxa() -> Vec<Taxon> {
        vec![
            taxon(1, 1, "root", "no rank"),
            taxon(2, 1, "Bacteria", "superkingdom"),
            taxon(561, 2, "Escherichia", "genus"),
            taxon(562, 561, "Escherichia coli", "species"),
        ]
    }

    fn populated_store() -> TaxonomyStore {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        store.load_taxa(&sample_taxa(), 500).unwrap();
        store
    }

    #[test]
    fn test_fresh_schema_is_empty() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        assert_eq!(store.taxon_count().unwrap(), 0);
        assert_eq!(store.accession_count().unwrap(), 0);
    }

    #[test]
    fn test_create_schema_twice_fails() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        let result = store.create_schema();
        assert!(matches!(result, Err(TaxadbError::AlreadyExists(_))));
    }

    #[test]
    fn test_load_before_schema_fails() {
        let store = TaxonomyStore::in_memory().unwrap();
        let result = store.load_taxa(&sample_taxa(), 500);
        assert!(matches!(result, Err(TaxadbError::Database(_))));
    }

    #[test]
    fn test_load_taxa_roundtrip() {
        let store = populated_store();
        assert_eq!(store.taxon_count().unwrap(), 4);

        let (parent, name, rank): (u32, String, String) = store
            .conn
            .query_row(
                "SELECT parent_taxon_id, scientific_name, rank FROM taxa WHERE taxon_id = 562",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(parent, 561);
        assert_eq!(name, "Escherichia coli");
        assert_eq!(rank, "species");
    }

    #[test]
    fn test_load_taxa_batches_cover_every_record() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();

        let taxa: Vec<Taxon> = (1..=1234)
            .map(|id| taxon(id, 1, &format!("Taxon {}", id), "species"))
            .collect();
        let loaded = store.load_taxa(&taxa, 500).unwrap();

        assert_eq!(loaded, 1234);
        assert_eq!(store.taxon_count().unwrap(), 1234);
    }

    #[test]
    fn test_load_taxa_batch_size_one() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        let loaded = store.load_taxa(&sample_taxa(), 1).unwrap();
        assert_eq!(loaded, 4);
        assert_eq!(store.taxon_count().unwrap(), 4);
    }

    #[test]
    fn test_load_taxa_batch_larger_than_input() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        let loaded = store.load_taxa(&sample_taxa(), 10_000).unwrap();
        assert_eq!(loaded, 4);
    }

    #[test]
    fn test_load_taxa_zero_batch_size_rejected() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        let result = store.load_taxa(&sample_taxa(), 0);
        assert!(matches!(result, Err(TaxadbError::InvalidInput(_))));
        assert_eq!(store.taxon_count().unwrap(), 0);
    }

    #[test]
    fn test_reloading_taxa_fails_and_keeps_first_load() {
        let store = populated_store();
        let result = store.load_taxa(&sample_taxa(), 500);
        assert!(matches!(result, Err(TaxadbError::AlreadyExists(_))));
        // The failed call rolled back, the original rows remain
        assert_eq!(store.taxon_count().unwrap(), 4);
    }

    #[test]
    fn test_duplicate_within_one_load_rolls_back_everything() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();

        let mut taxa = sample_taxa();
        taxa.push(taxon(2, 1, "Bacteria again", "superkingdom"));

        let result = store.load_taxa(&taxa, 2);
        assert!(matches!(result, Err(TaxadbError::AlreadyExists(_))));
        assert_eq!(store.taxon_count().unwrap(), 0);
    }

    #[test]
    fn test_load_accessions_roundtrip() {
        let store = populated_store();
        let records = vec![
            accession("AB000001", 562),
            accession("AB000002", 562),
            accession("AC000003", 561),
        ];

        let inserted = store.load_accessions(records).unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(store.accession_count().unwrap(), 3);

        let taxon_id: u32 = store
            .conn
            .query_row(
                "SELECT taxon_id FROM accessions WHERE accession_number = 'AC000003'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(taxon_id, 561);
    }

    #[test]
    fn test_duplicate_accession_numbers_are_allowed() {
        let store = populated_store();
        let records = vec![accession("AB000001", 562), accession("AB000001", 561)];
        assert_eq!(store.load_accessions(records).unwrap(), 2);
        assert_eq!(store.accession_count().unwrap(), 2);
    }

    #[test]
    fn test_unknown_taxon_reference_is_missing_taxon() {
        let store = populated_store();
        let records = vec![accession("AB000001", 562), accession("ZZ999999", 99999)];

        let result = store.load_accessions(records);
        match result {
            Err(TaxadbError::MissingTaxon(msg)) => {
                assert!(msg.contains("ZZ999999"));
                assert!(msg.contains("99999"));
            }
            other => panic!("expected missing taxon error, got {:?}", other),
        }
        // Nothing from the failed call survives
        assert_eq!(store.accession_count().unwrap(), 0);
    }

    #[test]
    fn test_cursor_error_rolls_back_partial_load() {
        let store = populated_store();
        let records = vec![
            accession("AB000001", 562),
            accession("AB000002", 562),
            Err(TaxadbError::Parse(
                "nucl_gb.accession2taxid.gz:4: bad line".to_string(),
            )),
            accession("AC000003", 561),
        ];

        let result = store.load_accessions(records);
        assert!(matches!(result, Err(TaxadbError::Parse(_))));
        assert_eq!(store.accession_count().unwrap(), 0);
    }

    #[test]
    fn test_successful_loads_accumulate() {
        let store = populated_store();
        store
            .load_accessions(vec![accession("AB000001", 562)])
            .unwrap();
        store
            .load_accessions(vec![accession("AC000003", 561)])
            .unwrap();
        assert_eq!(store.accession_count().unwrap(), 2);
    }

    #[test]
    fn test_file_backed_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("taxadb.sqlite");

        let store = TaxonomyStore::open(&db_path).unwrap();
        store.create_schema().unwrap();
        store.load_taxa(&sample_taxa(), 500).unwrap();
        store
            .load_accessions(vec![accession("AB000001", 562)])
            .unwrap();
        store.close().unwrap();

        let reopened = TaxonomyStore::open(&db_path).unwrap();
        assert_eq!(reopened.taxon_count().unwrap(), 4);
        assert_eq!(reopened.accession_count().unwrap(), 1);

        // And the schema guard still holds after reopening
        assert!(matches!(
            reopened.create_schema(),
            Err(TaxadbError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_empty_taxa_load_is_a_noop() {
        let store = TaxonomyStore::in_memory().unwrap();
        store.create_schema().unwrap();
        assert_eq!(store.load_taxa(&[], 500).unwrap(), 0);
        assert_eq!(store.taxon_count().unwrap(), 0);
    }
}
