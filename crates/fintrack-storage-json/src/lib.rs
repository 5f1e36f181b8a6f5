//! fintrack-storage-json
//!
//! File-backed [`KeyValueStore`]: every key lives in one JSON object on disk,
//! rewritten atomically on each `set`, with timestamped rolling backups.

use std::{
    cmp::Reverse,
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use fintrack_core::{CoreError, KeyValueStore};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub const STORE_FILE: &str = "store.json";
pub const BACKUP_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "store";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const BACKUP_SECONDS_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Locations used by [`JsonFileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub store_file: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<base>/store.json` plus `<base>/backups/`.
    pub fn in_dir(base: &Path) -> Self {
        Self {
            store_file: base.join(STORE_FILE),
            backup_root: base.join(BACKUP_DIR),
        }
    }

    /// Explicit store file; backups go next to it.
    pub fn for_store_file(store_file: PathBuf) -> Self {
        let backup_root = store_file
            .parent()
            .map(|parent| parent.join(BACKUP_DIR))
            .unwrap_or_else(|| PathBuf::from(BACKUP_DIR));
        Self {
            store_file,
            backup_root,
        }
    }
}

/// Describes a persisted backup artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// JSON object store. Reads are served from memory; writes go through to disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    paths: StoragePaths,
    entries: BTreeMap<String, String>,
    retention: usize,
}

impl JsonFileStore {
    pub fn open(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        if let Some(parent) = paths.store_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&paths.backup_root)?;
        let mut store = Self {
            paths,
            entries: BTreeMap::new(),
            retention: retention.max(1),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.paths.store_file
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Takes effect on the next backup.
    pub fn set_retention(&mut self, retention: usize) {
        self.retention = retention.max(1);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Re-reads the store file. A missing file is an empty store. A file that
    /// cannot be parsed is copied into the backups and the store starts empty.
    pub fn reload(&mut self) -> Result<(), CoreError> {
        let path = &self.paths.store_file;
        if !path.exists() {
            self.entries.clear();
            return Ok(());
        }
        let data = fs::read_to_string(path)?;
        match parse_entries(&data) {
            Some(entries) => {
                debug!(path = %path.display(), keys = entries.len(), "store loaded");
                self.entries = entries;
            }
            None => {
                let preserved = self.copy_to_backup(Some("corrupt"))?;
                warn!(
                    path = %path.display(),
                    preserved = %preserved.path.display(),
                    "store file is not a JSON object; starting empty"
                );
                self.entries.clear();
            }
        }
        Ok(())
    }

    /// Snapshots the current store file into the backup directory.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        if !self.paths.store_file.exists() {
            self.flush()?;
        }
        let info = self.copy_to_backup(note)?;
        info!(backup = %info.id, "store backed up");
        Ok(info)
    }

    /// Backups sorted newest first by the time encoded in their names.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = &self.paths.backup_root;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION)
            {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            backups.push(BackupInfo {
                id: file_name.to_string(),
                created_at: parse_backup_timestamp(file_name),
                size_bytes,
                path: path.clone(),
            });
        }
        backups.sort_by_key(|info| Reverse((info.created_at, info.id.clone())));
        Ok(backups)
    }

    /// Replaces the store with the contents of `backup`. The current file is
    /// backed up first so the restore itself can be undone.
    pub fn restore_backup(&mut self, backup: &BackupInfo) -> Result<(), CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let data = fs::read_to_string(&backup.path)?;
        let entries = parse_entries(&data).ok_or_else(|| {
            CoreError::Storage(format!("backup `{}` is not a valid store file", backup.id))
        })?;
        if self.paths.store_file.exists() {
            self.copy_to_backup(Some("pre-restore"))?;
        }
        self.entries = entries;
        self.flush()?;
        info!(backup = %backup.id, "store restored from backup");
        Ok(())
    }

    fn flush(&self) -> Result<(), CoreError> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        let json = serde_json::to_string_pretty(&Value::Object(map))?;
        let path = &self.paths.store_file;
        let tmp = tmp_path(path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn copy_to_backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.paths.backup_root)?;
        let created_at = self.next_backup_time()?;
        let timestamp = created_at.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, BACKUP_EXTENSION);
        let path = self.paths.backup_root.join(&file_name);
        if path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` already exists",
                file_name
            )));
        }
        let size_bytes = fs::copy(&self.paths.store_file, &path)?;
        self.prune_backups()?;
        Ok(BackupInfo {
            created_at: Some(created_at),
            id: file_name,
            size_bytes,
            path,
        })
    }

    /// Now, in whole milliseconds, but always after the newest existing backup.
    fn next_backup_time(&self) -> Result<DateTime<Utc>, CoreError> {
        let now = Utc::now().timestamp_millis();
        let newest = self
            .list_backups()?
            .iter()
            .filter_map(|backup| backup.created_at)
            .map(|created| created.timestamp_millis())
            .max();
        let millis = match newest {
            Some(newest) if newest >= now => newest + 1,
            _ => now,
        };
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| CoreError::Storage("system clock out of range".into()))
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for stale in self.list_backups()?.into_iter().skip(self.retention) {
            debug!(backup = %stale.id, "pruning backup");
            let _ = fs::remove_file(stale.path);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Accepts a JSON object; non-string values are kept in their JSON text form.
fn parse_entries(data: &str) -> Option<BTreeMap<String, String>> {
    if data.trim().is_empty() {
        return Some(BTreeMap::new());
    }
    match serde_json::from_str::<Value>(data).ok()? {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(text) => text,
                        other => other.to_string(),
                    };
                    (key, text)
                })
                .collect(),
        ),
        _ => None,
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// `store_20250101_093000250[_note].json` → 2025-01-01T09:30:00.250Z.
/// Names without the millisecond digits are read at whole seconds.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let seconds = NaiveDateTime::parse_from_str(rest.get(..15)?, BACKUP_SECONDS_FORMAT).ok()?;
    let millis = rest
        .get(15..18)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<i64>().ok())
        .unwrap_or(0);
    Some(DateTime::from_naive_utc_and_offset(
        seconds + Duration::milliseconds(millis),
        Utc,
    ))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
