//! Selection history file I/O
//!
//! One record per line, `<unix-seconds> <name> [<namespace>]`, most recent
//! last. Loading reads the file backwards so only the newest `max` records
//! are ever parsed, however large the file has grown.

use log::debug;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{KwError, Result};

use super::models::HistoryRecord;

const READ_CHUNK: u64 = 4096;

/// Chronological log of kubeconfig/namespace selections
#[derive(Debug)]
pub struct SelectionHistory {
    path: PathBuf,
    records: Vec<HistoryRecord>,
}

impl SelectionHistory {
    /// Load the newest `max` valid records from `path`. A missing file is an
    /// empty history; malformed lines are skipped.
    pub fn open(path: &Path, max: usize) -> Result<Self> {
        let records = match File::open(path) {
            Ok(file) => Self::scan(file, max).map_err(|e| {
                KwError::Config(format!("scan history file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(KwError::Config(format!(
                    "open history file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        debug!(
            "Loaded {} history record(s) from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    fn scan<R: Read + Seek>(reader: R, max: usize) -> io::Result<Vec<HistoryRecord>> {
        let mut lines = ReverseLines::new(reader)?;
        let mut newest_first = Vec::new();
        while newest_first.len() < max {
            let Some(line) = lines.next_line()? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(record) = HistoryRecord::parse(line) {
                newest_first.push(record);
            }
        }
        newest_first.reverse();
        Ok(newest_first)
    }

    /// Append a selection stamped with the current time; not persisted until `save`
    pub fn add(&mut self, name: &str, namespace: &str) {
        self.records.push(HistoryRecord {
            timestamp: chrono::Utc::now().timestamp(),
            name: name.to_string(),
            namespace: namespace.to_string(),
        });
    }

    /// Most recent kubeconfig name that differs from `exclude`
    pub fn last_name(&self, exclude: &str) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .find(|r| r.name != exclude)
            .map(|r| r.name.as_str())
    }

    /// Most recent non-empty namespace recorded for `name` that differs from `exclude`
    pub fn last_namespace(&self, name: &str, exclude: &str) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .filter(|r| !r.namespace.is_empty())
            .find(|r| r.name == name && r.namespace != exclude)
            .map(|r| r.namespace.as_str())
    }

    pub fn delete_by_name(&mut self, name: &str) {
        self.records.retain(|r| r.name != name);
    }

    pub fn delete_all(&mut self) {
        self.records.clear();
    }

    /// Records oldest first
    pub fn list(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Overwrite the history file with the in-memory records
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                KwError::Config(format!(
                    "ensure history directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut content = String::new();
        for record in &self.records {
            content.push_str(&record.to_line());
            content.push('\n');
        }

        // Atomic write: write to tmp file, then rename
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content).map_err(|e| {
            KwError::Config(format!(
                "write history file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            KwError::Config(format!(
                "rename history file to {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "Saved {} history record(s) to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Yields lines from the end of a seekable reader towards its start
struct ReverseLines<R> {
    reader: R,
    pos: u64,
    pending: Vec<u8>,
    finished: bool,
}

impl<R: Read + Seek> ReverseLines<R> {
    fn new(mut reader: R) -> io::Result<Self> {
        let pos = reader.seek(SeekFrom::End(0))?;
        Ok(Self {
            reader,
            pos,
            pending: Vec::new(),
            finished: false,
        })
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(idx) = self.pending.iter().rposition(|&b| b == b'\n') {
                let line = self.pending.split_off(idx + 1);
                self.pending.truncate(idx);
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            if self.pos == 0 {
                if self.finished {
                    return Ok(None);
                }
                self.finished = true;
                let line = std::mem::take(&mut self.pending);
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            let len = READ_CHUNK.min(self.pos);
            self.pos -= len;
            self.reader.seek(SeekFrom::Start(self.pos))?;
            let mut chunk = vec![0u8; len as usize];
            self.reader.read_exact(&mut chunk)?;
            chunk.extend_from_slice(&self.pending);
            self.pending = chunk;
        }
    }
}
