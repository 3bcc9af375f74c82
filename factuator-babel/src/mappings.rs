//! Persistent identifier mappings between wiki titles and destination ids.
//!
//! The table is loaded once per run, mutated between page conversions and
//! written back atomically. All maps are ordered so the saved JSON is stable
//! across runs.

use crate::common::links::normalize_title;
use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mappings {
    pub title_to_id: BTreeMap<String, String>,
    pub id_to_title: BTreeMap<String, String>,
    pub file_to_id: BTreeMap<String, String>,
    /// Document id to the ids of documents linking to it.
    pub backlinks: BTreeMap<String, BTreeSet<String>>,
    pub do_not_convert: BTreeSet<String>,
}

impl Mappings {
    /// Reads the table at `path`. A missing file yields an empty table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no mappings at {}, starting empty", path.display());
            return Ok(Mappings::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| ConvertError::Io(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| ConvertError::Mapping(format!("{}: {e}", path.display())))
    }

    /// Writes the table through a temporary file in the same directory, so
    /// readers never observe a half-written file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConvertError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let json = serde_json::to_string_pretty(self)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| ConvertError::Io(format!("{}: {e}", dir.display())))?;
        file.write_all(json.as_bytes())
            .map_err(|e| ConvertError::Io(e.to_string()))?;
        file.persist(path)
            .map_err(|e| ConvertError::Io(format!("{}: {}", path.display(), e.error)))?;
        Ok(())
    }

    pub fn add(&mut self, title: &str, document_id: &str) {
        let title = normalize_title(title);
        self.id_to_title
            .insert(document_id.to_string(), title.clone());
        self.title_to_id.insert(title, document_id.to_string());
    }

    pub fn add_file(&mut self, file_name: &str, asset_id: &str) {
        self.file_to_id
            .insert(normalize_title(file_name), asset_id.to_string());
    }

    /// Records that `source_id` links to `target_id`.
    pub fn add_backlink(&mut self, target_id: &str, source_id: &str) {
        self.backlinks
            .entry(target_id.to_string())
            .or_default()
            .insert(source_id.to_string());
    }

    /// Records backlinks from `source_id` to every resolvable title.
    /// Returns how many were recorded.
    pub fn record_links<'t>(
        &mut self,
        source_id: &str,
        titles: impl IntoIterator<Item = &'t String>,
    ) -> usize {
        let targets: Vec<String> = titles
            .into_iter()
            .filter_map(|title| self.document_for(title).map(str::to_string))
            .filter(|target| target != source_id)
            .collect();
        for target in &targets {
            self.add_backlink(target, source_id);
        }
        targets.len()
    }

    /// Document id of `title`, matching exact titles first.
    pub fn document_for(&self, title: &str) -> Option<&str> {
        self.title_to_id
            .get(title)
            .or_else(|| self.title_to_id.get(&normalize_title(title)))
            .map(String::as_str)
    }

    pub fn title_for(&self, document_id: &str) -> Option<&str> {
        self.id_to_title.get(document_id).map(String::as_str)
    }

    pub fn asset_for(&self, file_name: &str) -> Option<&str> {
        self.file_to_id
            .get(file_name)
            .or_else(|| self.file_to_id.get(&normalize_title(file_name)))
            .map(String::as_str)
    }

    pub fn should_convert(&self, title: &str) -> bool {
        !self.do_not_convert.contains(title)
            && !self.do_not_convert.contains(&normalize_title(title))
    }
}
