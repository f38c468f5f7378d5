//! Catalog query engine: caller-supplied SQL over the `restaurants` relation.
//!
//! The flat view is loaded into an in-memory SQLite database once per engine,
//! on first use. Every call then:
//! 1. appends `(now, sql)` to the audit log, before anything can fail
//! 2. copies that database into a private one with the backup API and
//!    switches the copy to `query_only`
//! 3. runs exactly one statement and serializes at most `max_results` rows,
//!    in the statement's own output order
//!
//! Statement errors are not raised. They come back as text asking the caller
//! to fix the query and retry. Trailing statements are one such error.

use crate::catalog::{Catalog, CatalogRow, QueryAuditRecord, COLUMNS};
use crate::storage::QueryAuditLog;
use crate::types::{Error, Result};
use base64::Engine as _;
use rusqlite::backup::Backup;
use rusqlite::types::ValueRef;
use rusqlite::{params, Batch, Connection};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Name of the queryable relation.
pub const TABLE_NAME: &str = "restaurants";

/// Default row cap on serialized results.
pub const MAX_RESULTS: usize = 50;

/// Rejection text for input holding more than one statement.
pub const MULTIPLE_STATEMENTS: &str = "You can only execute one statement at a time.";

const BACKUP_PAGES_PER_STEP: i32 = 1024;

/// Outcome of one query call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Result rows (already truncated) as column → value objects.
    Rows(Vec<Map<String, Value>>),
    /// The engine rejected the statement; carries its message.
    Rejected(String),
}

impl QueryOutcome {
    /// Text body sent back to the orchestrator.
    pub fn into_text(self) -> Result<String> {
        match self {
            QueryOutcome::Rows(rows) => Ok(serde_json::to_string(&rows)?),
            QueryOutcome::Rejected(message) => Ok(format!(
                "The query failed, if you think that you can fix your query try again. \
                 The error was: \"{}\"",
                message
            )),
        }
    }
}

/// Handler behind `find_restaurants`.
#[derive(Clone)]
pub struct CatalogQueryEngine {
    catalog: Arc<Catalog>,
    audit: Arc<dyn QueryAuditLog>,
    max_results: usize,
    snapshot: Arc<OnceCell<ViewSnapshot>>,
}

impl fmt::Debug for CatalogQueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogQueryEngine")
            .field("restaurants", &self.catalog.len())
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl CatalogQueryEngine {
    pub fn new(catalog: Arc<Catalog>, audit: Arc<dyn QueryAuditLog>) -> Self {
        Self {
            catalog,
            audit,
            max_results: MAX_RESULTS,
            snapshot: Arc::new(OnceCell::new()),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Audit, execute, truncate. Only storage and view-loading failures are
    /// errors; a bad statement yields `QueryOutcome::Rejected`.
    pub async fn query(&self, sql: &str) -> Result<QueryOutcome> {
        self.audit.append(QueryAuditRecord::now(sql)).await?;

        let snapshot = self
            .snapshot
            .get_or_try_init(|| async { ViewSnapshot::load(self.catalog.rows()) })
            .await?;
        let conn = snapshot.fork()?;
        let outcome = run(&conn, sql, self.max_results);
        match &outcome {
            QueryOutcome::Rows(rows) => {
                tracing::debug!(rows = rows.len(), "catalog query succeeded");
            }
            QueryOutcome::Rejected(message) => {
                tracing::info!(error = %message, "catalog query rejected");
            }
        }
        Ok(outcome)
    }

    /// [`CatalogQueryEngine::query`] rendered as the tool's text body.
    pub async fn query_text(&self, sql: &str) -> Result<String> {
        self.query(sql).await?.into_text()
    }
}

// =============================================================================
// Execution
// =============================================================================

fn create_table_sql() -> String {
    let columns: Vec<String> = COLUMNS
        .iter()
        .map(|c| {
            let ty = match *c {
                "average_price_per_person"
                | "rating_food_stars"
                | "rating_service_stars"
                | "capacity_persons" => "INTEGER",
                _ => "TEXT",
            };
            format!("{} {}", c, ty)
        })
        .collect();
    format!("CREATE TABLE {} ({});", TABLE_NAME, columns.join(", "))
}

/// In-memory database holding the flat view. Still writable.
fn load_view(rows: &[CatalogRow]) -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    conn.execute_batch(&create_table_sql())?;

    let tx = conn.transaction()?;
    {
        let placeholders = vec!["?"; COLUMNS.len()].join(", ");
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} ({}) VALUES ({})",
            TABLE_NAME,
            COLUMNS.join(", "),
            placeholders
        ))?;
        for row in rows {
            insert.execute(params![
                row.district_name,
                row.restaurant_name,
                row.restaurant_cuisine,
                row.signature_dish,
                row.dishes,
                row.average_price_per_person,
                row.rating_food_stars,
                row.rating_service_stars,
                row.capacity_persons,
            ])?;
        }
    }
    tx.commit()?;
    Ok(conn)
}

fn seal(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA query_only = ON;")?;
    Ok(())
}

/// The flat view, materialized once and copied per call.
#[derive(Debug)]
struct ViewSnapshot {
    conn: Mutex<Connection>,
}

impl ViewSnapshot {
    fn load(rows: &[CatalogRow]) -> Result<Self> {
        let conn = load_view(rows)?;
        tracing::debug!(rows = rows.len(), "query view materialized");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private read-only copy; nothing a statement does reaches the snapshot.
    fn fork(&self) -> Result<Connection> {
        let source = self
            .conn
            .lock()
            .map_err(|_| Error::internal("query view lock poisoned"))?;
        let mut conn = Connection::open_in_memory()?;
        Backup::new(&source, &mut conn)?.run_to_completion(
            BACKUP_PAGES_PER_STEP,
            Duration::ZERO,
            None,
        )?;
        seal(&conn)?;
        Ok(conn)
    }
}

/// Run `sql` against a freshly loaded view. The outer `Result` covers
/// loading the view; anything the statement itself triggers is a `Rejected`
/// outcome.
pub fn execute(rows: &[CatalogRow], sql: &str, max_results: usize) -> Result<QueryOutcome> {
    let conn = load_view(rows)?;
    seal(&conn)?;
    Ok(run(&conn, sql, max_results))
}

fn run(conn: &Connection, sql: &str, max_results: usize) -> QueryOutcome {
    match run_statement(conn, sql, max_results) {
        Ok(rows) => QueryOutcome::Rows(rows),
        Err(rusqlite::Error::MultipleStatement) => {
            QueryOutcome::Rejected(MULTIPLE_STATEMENTS.to_string())
        }
        Err(e) => QueryOutcome::Rejected(e.to_string()),
    }
}

fn run_statement(
    conn: &Connection,
    sql: &str,
    max_results: usize,
) -> rusqlite::Result<Vec<Map<String, Value>>> {
    // Batch skips whitespace, comments and bare `;` between statements.
    let mut batch = Batch::new(conn, sql);
    let Some(mut stmt) = batch.next()? else {
        return Ok(Vec::new());
    };
    if batch.next()?.is_some() {
        return Err(rusqlite::Error::MultipleStatement);
    }
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while out.len() < max_results {
        let Some(row) = rows.next()? else {
            break;
        };
        let mut object = Map::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            object.insert(name.clone(), to_json(row.get_ref(idx)?));
        }
        out.push(object);
    }
    Ok(out)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => {
            Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
        }
    }
}
