use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;

use crate::{error::Result, sql::schema::Table, storage::engine::Storage};

const TABLE_EXT: &str = "json";
const BACKUP_DIR: &str = "backups";

/// JSON file storage engine
///
/// Layout under the data directory:
/// - `<db>/` per database
/// - `<db>/<table>.json` per table
/// - `<db>/backups/<table>_<YYYYMMDD_HHMMSS>.json` per backup
///
/// Files are read and overwritten whole. There is no locking, two
/// processes writing the same table can lose updates.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

fn backup_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{8}_\d{6}(?:_\d+)?$").expect("valid backup id regex"))
}

impl FileStorage {
    /// Opens storage rooted at `root`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    fn db_path(&self, db: &str) -> PathBuf {
        self.root.join(db)
    }

    fn table_path(&self, db: &str, table: &str) -> PathBuf {
        self.db_path(db).join(format!("{}.{}", table, TABLE_EXT))
    }

    fn backup_dir(&self, db: &str) -> PathBuf {
        self.db_path(db).join(BACKUP_DIR)
    }

    fn backup_path(&self, db: &str, table: &str, id: &str) -> PathBuf {
        self.backup_dir(db).join(format!("{}_{}.{}", table, id, TABLE_EXT))
    }

    fn read_json(path: &Path) -> Result<Option<Table>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// File stems in `dir` with the table extension, sorted
    fn json_stems(dir: &Path) -> Result<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut stems = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == TABLE_EXT) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    stems.push(stem.to_string());
                }
            }
        }
        stems.sort();
        Ok(stems)
    }
}

impl Storage for FileStorage {
    fn list_databases(&self) -> Result<Vec<String>> {
        let mut dbs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    dbs.push(name.to_string());
                }
            }
        }
        dbs.sort();
        Ok(dbs)
    }

    fn has_database(&self, db: &str) -> Result<bool> {
        Ok(self.db_path(db).is_dir())
    }

    fn create_database(&mut self, db: &str) -> Result<()> {
        fs::create_dir_all(self.db_path(db))?;
        Ok(())
    }

    fn remove_database(&mut self, db: &str) -> Result<()> {
        fs::remove_dir_all(self.db_path(db))?;
        Ok(())
    }

    fn rename_database(&mut self, from: &str, to: &str) -> Result<()> {
        fs::rename(self.db_path(from), self.db_path(to))?;
        Ok(())
    }

    fn list_tables(&self, db: &str) -> Result<Vec<String>> {
        Self::json_stems(&self.db_path(db))
    }

    fn read_table(&self, db: &str, table: &str) -> Result<Option<Table>> {
        Self::read_json(&self.table_path(db, table))
    }

    fn write_table(&mut self, db: &str, table: &str, data: &Table) -> Result<()> {
        fs::create_dir_all(self.db_path(db))?;
        fs::write(self.table_path(db, table), serde_json::to_vec(data)?)?;
        Ok(())
    }

    fn has_table(&self, db: &str, table: &str) -> Result<bool> {
        Ok(self.table_path(db, table).is_file())
    }

    fn remove_table(&mut self, db: &str, table: &str) -> Result<()> {
        fs::remove_file(self.table_path(db, table))?;
        Ok(())
    }

    fn rename_table(&mut self, db: &str, from: &str, to: &str) -> Result<()> {
        fs::rename(self.table_path(db, from), self.table_path(db, to))?;
        Ok(())
    }

    fn list_backups(&self, db: &str, table: &str) -> Result<Vec<String>> {
        let prefix = format!("{}_", table);
        Ok(Self::json_stems(&self.backup_dir(db))?
            .into_iter()
            .filter_map(|stem| stem.strip_prefix(&prefix).map(|id| id.to_string()))
            .filter(|id| backup_id_regex().is_match(id))
            .collect())
    }

    fn read_backup(&self, db: &str, table: &str, id: &str) -> Result<Option<Table>> {
        Self::read_json(&self.backup_path(db, table, id))
    }

    fn write_backup(&mut self, db: &str, table: &str, id: &str, data: &Table) -> Result<bool> {
        fs::create_dir_all(self.backup_dir(db))?;
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.backup_path(db, table, id));
        let mut file = match file {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        file.write_all(&serde_json::to_vec(data)?)?;
        Ok(true)
    }
}
