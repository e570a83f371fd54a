use std::{
    sync::{Arc, Mutex, OnceLock},
    time::Instant,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::Result,
    sql::{
        executor::ResultSet,
        parser::{Parser, ast::StatementKind},
        plan::Plan,
        schema::Column,
        types::Row,
    },
    storage::{Catalog, FileStorage, Storage},
};

pub use cache::{CachedRows, ResultCache};

mod cache;

/// SQL engine handle
///
/// Cloning shares the catalog and the result cache. A statement holds the
/// catalog lock from recognition to its reported result, so statements
/// within one process run one at a time. Writers in other processes are
/// not coordinated with: whole-file overwrites can lose their updates.
pub struct Engine<S: Storage> {
    catalog: Arc<Mutex<Catalog<S>>>,
    cache: Arc<Mutex<ResultCache>>,
    config: Config,
}

impl<S: Storage> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}

impl Engine<FileStorage> {
    /// Opens the file-backed engine rooted at `config.data_dir`
    pub fn open(config: Config) -> Result<Self> {
        let storage = FileStorage::new(&config.data_dir)?;
        tracing::debug!(data_dir = %config.data_dir.display(), "engine opened");
        Ok(Self::new(storage, config))
    }
}

impl<S: Storage + 'static> Engine<S> {
    /// Creates an engine with a fresh, empty result cache
    pub fn new(storage: S, config: Config) -> Self {
        Self::with_cache(storage, Arc::new(Mutex::new(ResultCache::new())), config)
    }

    /// Creates an engine around an externally owned cache
    pub fn with_cache(storage: S, cache: Arc<Mutex<ResultCache>>, config: Config) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(Catalog::new(storage))),
            cache,
            config,
        }
    }

    pub fn cache(&self) -> Arc<Mutex<ResultCache>> {
        self.cache.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Session<S> {
        Session {
            engine: self.clone(),
        }
    }
}

/// Where a SELECT result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Executed,
}

/// Result record of one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Select {
        columns: Vec<String>,
        rows: Vec<Row>,
        source: Source,
    },
    Databases {
        databases: Vec<String>,
    },
    Insert {
        message: String,
        row: Row,
    },
    Message {
        message: String,
    },
}

fn count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s+rows?").expect("valid row count regex"))
}

impl QueryResult {
    /// Rows returned or touched by the statement
    ///
    /// UPDATE and DELETE only report their count inside the message text
    /// (`"3 rows deleted ..."`), so it is read back from there.
    pub fn rows_affected(&self) -> usize {
        match self {
            QueryResult::Select { rows, .. } => rows.len(),
            QueryResult::Insert { .. } => 1,
            QueryResult::Message { message } => count_regex()
                .captures(message)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .unwrap_or(0),
            QueryResult::Databases { .. } => 0,
        }
    }
}

/// SQL session for executing statements
pub struct Session<S: Storage> {
    engine: Engine<S>,
}

impl<S: Storage + 'static> Session<S> {
    /// Executes a SQL statement
    pub fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();
        let result = self.execute_statement(sql);
        match &result {
            Ok(_) => tracing::debug!(elapsed = ?start.elapsed(), "statement executed"),
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err.message(), "statement rejected")
            }
        }
        result
    }

    fn execute_statement(&mut self, sql: &str) -> Result<QueryResult> {
        let stmt = Parser::new(sql).parse()?;
        let kind = stmt.kind();
        let mut catalog = self.engine.catalog.lock()?;

        if kind == StatementKind::Select {
            if let Some(hit) = self.engine.cache.lock()?.lookup(sql) {
                tracing::debug!("plan: cache");
                return Ok(QueryResult::Select {
                    columns: hit.columns.clone(),
                    rows: hit.rows.clone(),
                    source: Source::Cache,
                });
            }
            tracing::debug!("plan: execute");
        }

        // A rejected statement returns here, before the cache is touched
        let result =
            Plan::build(stmt, self.engine.config.strict_aggregates)?.execute(&mut *catalog)?;

        let mut cache = self.engine.cache.lock()?;
        if kind.is_mutation() {
            cache.clear();
        }
        Ok(match result {
            ResultSet::Scan { columns, rows } => {
                cache.store(
                    sql,
                    CachedRows {
                        columns: columns.clone(),
                        rows: rows.clone(),
                    },
                );
                QueryResult::Select {
                    columns,
                    rows,
                    source: Source::Executed,
                }
            }
            ResultSet::Databases { databases } => QueryResult::Databases { databases },
            ResultSet::Message { message } => QueryResult::Message { message },
            ResultSet::Insert { message, row } => QueryResult::Insert { message, row },
        })
    }

    /// Overwrites a live table with one of its backups
    pub fn restore_backup(
        &mut self,
        db: &str,
        table: &str,
        backup_id: &str,
    ) -> Result<QueryResult> {
        self.engine.catalog.lock()?.restore_backup(db, table, backup_id)?;
        self.engine.cache.lock()?.clear();
        Ok(QueryResult::Message {
            message: format!("Backup {} restored for {} in {}", backup_id, table, db),
        })
    }

    pub fn list_backups(&self, db: &str, table: &str) -> Result<Vec<String>> {
        self.engine.catalog.lock()?.list_backups(db, table)
    }

    pub fn list_tables(&self, db: &str) -> Result<Vec<String>> {
        self.engine.catalog.lock()?.list_tables(db)
    }

    pub fn describe_table(&self, db: &str, table: &str) -> Result<Vec<Column>> {
        self.engine.catalog.lock()?.describe_table(db, table)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Engine, QueryResult, ResultCache, Source};
    use crate::{
        config::Config,
        error::{Error, Result},
        sql::types::{Row, Value},
        storage::{FileStorage, MemoryStorage, Storage},
    };

    fn memory() -> Engine<MemoryStorage> {
        Engine::new(MemoryStorage::new(), Config::default())
    }

    fn rows_of(result: QueryResult) -> Vec<Row> {
        match result {
            QueryResult::Select { rows, .. } => rows,
            other => panic!("expected rows, got {:?}", other),
        }
    }

    fn text(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    fn test_round_trip(engine: Engine<impl Storage + 'static>) -> Result<()> {
        let mut s = engine.session();
        s.execute("CREATE DATABASE shop")?;
        let created = s.execute(
            "CREATE TABLE shop.items (id INT, name VARCHAR(10), price DECIMAL(10,2))",
        )?;
        assert_eq!(
            created,
            QueryResult::Message {
                message: "Table items created in database shop with columns \
                          [id INT, name VARCHAR(10), price DECIMAL(10,2)]"
                    .into()
            }
        );

        for (id, name, price) in [("1", "pen", "1.5"), ("2", "ink", "3"), ("3", "pad", "2.25")] {
            let sql = format!(
                "INSERT INTO shop.items (id, name, price) VALUES ({}, '{}', {})",
                id, name, price
            );
            assert_eq!(s.execute(&sql)?.rows_affected(), 1);
        }

        match s.execute("SELECT * FROM shop.items")? {
            QueryResult::Select {
                columns,
                rows,
                source,
            } => {
                assert_eq!(columns, vec!["id", "name", "price"]);
                assert_eq!(source, Source::Executed);
                assert_eq!(
                    rows,
                    vec![
                        text(&[("id", "1"), ("name", "pen"), ("price", "1.5")]),
                        text(&[("id", "2"), ("name", "ink"), ("price", "3")]),
                        text(&[("id", "3"), ("name", "pad"), ("price", "2.25")]),
                    ]
                );
            }
            other => panic!("unexpected result {:?}", other),
        }

        assert_eq!(
            s.execute("SHOW DATABASES")?,
            QueryResult::Databases {
                databases: vec!["shop".into()]
            }
        );
        Ok(())
    }

    #[test]
    fn test_round_trip_memory() -> Result<()> {
        test_round_trip(memory())
    }

    #[test]
    fn test_round_trip_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        test_round_trip(Engine::open(Config::new(dir.path()))?)?;

        // Data outlives the engine
        let engine = Engine::new(FileStorage::new(dir.path())?, Config::default());
        let rows = rows_of(engine.session().execute("SELECT name FROM shop.items")?);
        assert_eq!(rows.len(), 3);
        Ok(())
    }

    fn test_cache(engine: Engine<impl Storage + 'static>) -> Result<()> {
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (id INT, v TEXT)")?;
        s.execute("INSERT INTO db.t (id, v) VALUES (1, 'a')")?;

        let sql = "SELECT id, v FROM db.t";
        let first = s.execute(sql)?;
        let second = s.execute(sql)?;
        match (&first, &second) {
            (
                QueryResult::Select { rows: r1, source: Source::Executed, .. },
                QueryResult::Select { rows: r2, source: Source::Cache, .. },
            ) => assert_eq!(r1, r2),
            other => panic!("unexpected results {:?}", other),
        }

        // Different text, different key
        assert!(matches!(
            s.execute("select id, v from db.t")?,
            QueryResult::Select { source: Source::Executed, .. }
        ));

        // Each successful mutation invalidates
        let mutations = [
            "INSERT INTO db.t (id, v) VALUES (2, 'b')",
            "UPDATE db.t SET v = 'c' WHERE id = 2",
            "DELETE FROM db.t WHERE id = 1",
            "CREATE TABLE db.u (id INT)",
            "RENAME TABLE db.u TO db.w",
            "DROP TABLE db.w",
            "CREATE DATABASE other",
            "RENAME DATABASE other TO archive",
            "DROP DATABASE archive",
        ];
        for mutation in mutations {
            s.execute(sql)?;
            s.execute(mutation)?;
            assert!(engine.cache().lock()?.is_empty(), "{} kept the cache", mutation);
            assert!(matches!(
                s.execute(sql)?,
                QueryResult::Select { source: Source::Executed, .. }
            ));
        }
        assert_eq!(rows_of(s.execute(sql)?), vec![text(&[("id", "2"), ("v", "c")])]);

        // A rejected statement leaves the cache alone
        assert!(engine.cache().lock()?.contains(sql));
        assert!(s.execute("DROP TABLE db.nope").is_err());
        assert!(s.execute("INSERT INTO db.t (id, v) VALUES (x, 'b')").is_err());
        assert!(engine.cache().lock()?.contains(sql));
        Ok(())
    }

    #[test]
    fn test_cache_memory() -> Result<()> {
        test_cache(memory())
    }

    #[test]
    fn test_cache_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        test_cache(Engine::open(Config::new(dir.path()))?)
    }

    #[test]
    fn test_injected_cache() -> Result<()> {
        let cache = Arc::new(Mutex::new(ResultCache::new()));
        let engine = Engine::with_cache(MemoryStorage::new(), cache.clone(), Config::default());
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (id INT)")?;
        s.execute("SELECT * FROM db.t")?;
        assert_eq!(cache.lock()?.len(), 1);
        Ok(())
    }

    fn setup_join(engine: &Engine<MemoryStorage>) -> Result<()> {
        let mut s = engine.session();
        for sql in [
            "CREATE DATABASE shop",
            "CREATE TABLE shop.customers (name TEXT, city TEXT)",
            "CREATE TABLE shop.orders (customer TEXT, total DECIMAL)",
            "INSERT INTO shop.customers (name, city) VALUES ('Ana', 'Lima')",
            "INSERT INTO shop.customers (name, city) VALUES ('José', 'Quito')",
            "INSERT INTO shop.orders (customer, total) VALUES ('ana', 10)",
            "INSERT INTO shop.orders (customer, total) VALUES ('ANA', 5)",
            "INSERT INTO shop.orders (customer, total) VALUES ('jose', 2)",
            "INSERT INTO shop.orders (customer, total) VALUES ('luis', 7)",
        ] {
            s.execute(sql)?;
        }
        Ok(())
    }

    #[test]
    fn test_join() -> Result<()> {
        let engine = memory();
        setup_join(&engine)?;
        let mut s = engine.session();

        let rows = rows_of(s.execute(
            "SELECT c.name, o.total FROM shop.customers c \
             JOIN shop.orders o ON c.name = o.customer",
        )?);
        assert_eq!(
            rows,
            vec![
                text(&[("name", "Ana"), ("total", "10")]),
                text(&[("name", "Ana"), ("total", "5")]),
                text(&[("name", "José"), ("total", "2")]),
            ]
        );

        // Aggregates without GROUP BY are evaluated per row
        match s.execute(
            "SELECT c.name, SUM(o.total) AS s, COUNT(o.total) FROM shop.customers c \
             JOIN shop.orders o ON c.name = o.customer",
        )? {
            QueryResult::Select { columns, rows, .. } => {
                assert_eq!(columns, vec!["name", "s", "count_total"]);
                assert_eq!(rows.len(), 3);
                assert_eq!(rows[0].get("s"), Some(&Value::Float(10.0)));
                assert_eq!(rows[0].get("count_total"), Some(&Value::Integer(1)));
            }
            other => panic!("unexpected result {:?}", other),
        }

        // No matches, no columns
        match s.execute(
            "SELECT * FROM shop.customers c JOIN shop.orders o ON c.city = o.customer",
        )? {
            QueryResult::Select { columns, rows, .. } => {
                assert!(columns.is_empty());
                assert!(rows.is_empty());
            }
            other => panic!("unexpected result {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_join_group_by() -> Result<()> {
        let engine = memory();
        setup_join(&engine)?;
        let mut s = engine.session();

        match s.execute(
            "SELECT c.name, SUM(o.total), COUNT(*) AS n FROM shop.customers c \
             JOIN shop.orders o ON c.name = o.customer GROUP BY c.name",
        )? {
            QueryResult::Select { columns, rows, .. } => {
                assert_eq!(columns, vec!["name", "sum_total", "n"]);
                let mut ana = Row::new();
                ana.insert("name".into(), Value::from("Ana"));
                ana.insert("sum_total".into(), Value::Float(15.0));
                ana.insert("n".into(), Value::Integer(2));
                assert_eq!(rows[0], ana);
                assert_eq!(rows[1].get("sum_total"), Some(&Value::Float(2.0)));
            }
            other => panic!("unexpected result {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_group_by() -> Result<()> {
        let engine = memory();
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (g TEXT, v INT)")?;
        for (g, v) in [("a", "10"), ("a", "5"), ("b", "2")] {
            s.execute(&format!("INSERT INTO db.t (g, v) VALUES ('{}', {})", g, v))?;
        }

        let rows = rows_of(s.execute("SELECT g, SUM(v), COUNT(v) FROM db.t GROUP BY g")?);
        let expected = |g: &str, sum: f64, count: i64| -> Row {
            let mut row = Row::new();
            row.insert("g".into(), Value::from(g));
            row.insert("sum_v".into(), Value::Float(sum));
            row.insert("count_v".into(), Value::Integer(count));
            row
        };
        assert_eq!(rows, vec![expected("a", 15.0, 2), expected("b", 2.0, 1)]);

        // Filter runs before grouping
        let rows = rows_of(s.execute("SELECT g, MAX(v) FROM db.t WHERE v < 10 GROUP BY g")?);
        assert_eq!(rows[0].get("max_v"), Some(&Value::from("5")));

        // Empty partitioning set, empty columns
        match s.execute("SELECT g, SUM(v) FROM db.t WHERE v > 100 GROUP BY g")? {
            QueryResult::Select { columns, rows, .. } => {
                assert!(columns.is_empty());
                assert!(rows.is_empty());
            }
            other => panic!("unexpected result {:?}", other),
        }

        assert!(matches!(
            s.execute("SELECT nope, SUM(v) FROM db.t GROUP BY nope"),
            Err(Error::NotFound(_))
        ));

        s.execute("CREATE TABLE db.w (g TEXT, v TEXT)")?;
        s.execute("INSERT INTO db.w (g, v) VALUES ('a', 'ten')")?;
        assert!(matches!(
            s.execute("SELECT g, SUM(v) FROM db.w GROUP BY g"),
            Err(Error::Execution(_))
        ));
        Ok(())
    }

    #[test]
    fn test_strict_aggregates() -> Result<()> {
        let engine = Engine::new(
            MemoryStorage::new(),
            Config::default().with_strict_aggregates(true),
        );
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (g TEXT, v INT)")?;
        assert!(matches!(
            s.execute("SELECT SUM(v) FROM db.t"),
            Err(Error::Validation(_))
        ));
        assert!(s.execute("SELECT g, SUM(v) FROM db.t GROUP BY g").is_ok());
        Ok(())
    }

    #[test]
    fn test_type_validation() -> Result<()> {
        let engine = memory();
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (n INT, s VARCHAR(5), c CHAR(3), d DATE, b BIT)")?;

        let insert = |n: &str, st: &str, c: &str, d: &str, b: &str| {
            format!(
                "INSERT INTO db.t (n, s, c, d, b) VALUES ({}, '{}', '{}', '{}', {})",
                n, st, c, d, b
            )
        };
        s.execute(&insert("1", "abcde", "abc", "2024-01-31", "1"))?;
        for sql in [
            insert("one", "a", "abc", "2024-01-31", "1"),
            insert("1", "abcdef", "abc", "2024-01-31", "1"),
            insert("1", "a", "ab", "2024-01-31", "1"),
            insert("1", "a", "abc", "2024-02-31", "1"),
            insert("1", "a", "abc", "2024-01-31", "maybe"),
        ] {
            assert!(
                matches!(s.execute(&sql), Err(Error::Validation(_))),
                "{} should be rejected",
                sql
            );
        }

        // Column set must match exactly
        assert!(matches!(
            s.execute("INSERT INTO db.t (n, s) VALUES (1, 'a')"),
            Err(Error::Validation(_))
        ));
        assert_eq!(rows_of(s.execute("SELECT * FROM db.t")?).len(), 1);
        Ok(())
    }

    #[test]
    fn test_update_delete_backups() -> Result<()> {
        let engine = memory();
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (id INT, v INT)")?;
        for (id, v) in [("1", "5"), ("2", "9"), ("3", "10"), ("4", "100")] {
            s.execute(&format!("INSERT INTO db.t (id, v) VALUES ({}, {})", id, v))?;
        }

        let updated = s.execute("UPDATE db.t SET v = 11 WHERE id = '4'")?;
        assert_eq!(updated.rows_affected(), 1);
        assert_eq!(
            updated,
            QueryResult::Message {
                message: "1 rows updated in t of db".into()
            }
        );

        let deleted = s.execute("DELETE FROM db.t WHERE v > 9;")?;
        assert_eq!(deleted.rows_affected(), 2);
        let left = rows_of(s.execute("SELECT id FROM db.t")?);
        assert_eq!(left, vec![text(&[("id", "1")]), text(&[("id", "2")])]);

        let backups = s.list_backups("db", "t")?;
        assert_eq!(backups.len(), 2);

        // The newest backup holds the table as it was before the DELETE
        let restored = s.restore_backup("db", "t", &backups[1])?;
        assert_eq!(restored.rows_affected(), 0);
        assert_eq!(rows_of(s.execute("SELECT id FROM db.t")?).len(), 4);
        assert!(matches!(
            s.restore_backup("db", "t", "20000101_000000"),
            Err(Error::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_ddl_errors() -> Result<()> {
        let engine = memory();
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (id INT)")?;

        assert!(matches!(s.execute("DROP TABLE db.nope"), Err(Error::NotFound(_))));
        assert!(matches!(
            s.execute("CREATE TABLE db.t (id INT)"),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            s.execute("CREATE TABLE db.u (id INT, id TEXT)"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            s.execute("CREATE TABLE db.u (id MONEY)"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            s.execute("CREATE TABLE nodb.u (id INT)"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(s.execute("SELECT * FROM db.nope"), Err(Error::NotFound(_))));
        assert!(matches!(
            s.execute("CREATE INDEX i ON db.t (id)"),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(s.list_tables("db")?, vec!["t".to_string()]);

        // Column modifiers are kept as written, only the base type is checked
        let created =
            s.execute("CREATE TABLE db.p (id INT PRIMARY KEY, name VARCHAR(20) NOT NULL)")?;
        assert_eq!(
            created,
            QueryResult::Message {
                message: "Table p created in database db with columns \
                          [id INT PRIMARY KEY, name VARCHAR(20) NOT NULL]"
                    .into()
            }
        );
        s.execute("INSERT INTO db.p (id, name) VALUES (1, 'pen')")?;
        assert!(matches!(
            s.execute("INSERT INTO db.p (id, name) VALUES (2, 'abcdefghijklmnopqrstu')"),
            Err(Error::Validation(_))
        ));
        s.execute("DROP TABLE db.p")?;

        s.execute("RENAME TABLE db.t TO db.items")?;
        assert_eq!(s.describe_table("db", "items")?.len(), 1);
        s.execute("RENAME DATABASE db TO store")?;
        assert_eq!(
            s.execute("DROP DATABASE store")?,
            QueryResult::Message {
                message: "Database store dropped".into()
            }
        );
        assert!(matches!(s.execute("DROP DATABASE store"), Err(Error::NotFound(_))));
        Ok(())
    }

    #[test]
    fn test_result_serialization() -> Result<()> {
        let engine = memory();
        let mut s = engine.session();
        s.execute("CREATE DATABASE db")?;
        s.execute("CREATE TABLE db.t (id INT)")?;
        let inserted = s.execute("INSERT INTO db.t (id) VALUES (7)")?;
        assert_eq!(
            serde_json::to_string(&inserted)?,
            r#"{"message":"Row inserted into t in db","row":{"id":"7"}}"#
        );

        s.execute("SELECT * FROM db.t")?;
        let cached = s.execute("SELECT * FROM db.t")?;
        assert_eq!(
            serde_json::to_string(&cached)?,
            r#"{"columns":["id"],"rows":[{"id":"7"}],"source":"cache"}"#
        );

        // Row keys follow the schema, not alphabetical order
        s.execute("CREATE TABLE db.z (zeta TEXT, alpha TEXT)")?;
        let inserted = s.execute("INSERT INTO db.z (zeta, alpha) VALUES ('1', '2')")?;
        assert_eq!(
            serde_json::to_string(&inserted)?,
            r#"{"message":"Row inserted into z in db","row":{"zeta":"1","alpha":"2"}}"#
        );
        let selected = s.execute("SELECT * FROM db.z")?;
        assert_eq!(
            serde_json::to_string(&selected)?,
            r#"{"columns":["zeta","alpha"],"rows":[{"zeta":"1","alpha":"2"}],"source":"executed"}"#
        );
        Ok(())
    }
}
