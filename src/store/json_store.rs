use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::QuestionBank;
use crate::config::Config;
use crate::store::schema::{EXPORT_VERSION, ExportData, ProfileData};

const PROFILE_FILE: &str = "profile.json";
const CATALOG_FILE: &str = "catalog.json";

/// Local persistence: one pretty-printed JSON file per concern, last write wins.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Self::default_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("adaptutor")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        write_synced(&tmp_path, &json)?;
        fs::rename(&tmp_path, &path)?;
        debug!(file = name, bytes = json.len(), "saved");
        Ok(())
    }

    /// Load and deserialize profile. Returns None if file exists but
    /// cannot be parsed (schema mismatch / corruption).
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path(PROFILE_FILE);
        if !path.exists() {
            return Some(ProfileData::default());
        }
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "profile.json could not be parsed");
                None
            }
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    /// The saved catalog, or the bundled one when nothing usable is on disk.
    pub fn load_catalog(&self) -> Result<QuestionBank> {
        let path = self.file_path(CATALOG_FILE);
        if path.exists() {
            let parsed = fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| Ok(serde_json::from_str::<QuestionBank>(&content)?));
            match parsed {
                Ok(bank) => return Ok(bank),
                Err(e) => warn!(error = %e, "catalog.json unusable, using bundled catalog"),
            }
        }
        QuestionBank::bundled()
    }

    pub fn save_catalog(&self, bank: &QuestionBank) -> Result<()> {
        self.save(CATALOG_FILE, bank)
    }

    /// Write the bundled catalog and an empty profile if they are not on disk yet.
    pub fn initialize(&self) -> Result<()> {
        if !self.file_path(CATALOG_FILE).exists() {
            self.save_catalog(&QuestionBank::bundled()?)?;
        }
        if !self.file_path(PROFILE_FILE).exists() {
            self.save_profile(&ProfileData::default())?;
        }
        Ok(())
    }

    pub fn export_all(&self, config: &Config) -> Result<ExportData> {
        Ok(ExportData {
            adaptutor_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            profile: self.load_profile().unwrap_or_default(),
            catalog: self.load_catalog()?,
        })
    }

    /// Transactional import.
    ///
    /// Every file is staged to `.json.tmp` first; nothing on disk changes if
    /// staging fails. Commit moves each original to `.json.bak` and the staged
    /// file into place, restoring the backups if any step fails.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.adaptutor_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.adaptutor_export_version,
                EXPORT_VERSION
            );
        }

        let files = [
            (PROFILE_FILE, serde_json::to_string_pretty(&data.profile)?),
            (CATALOG_FILE, serde_json::to_string_pretty(&data.catalog)?),
        ];

        let mut staged: Vec<PathBuf> = Vec::new();
        for (name, json) in &files {
            let tmp_path = self.file_path(name).with_extension("json.tmp");
            if let Err(e) = write_synced(&tmp_path, json) {
                remove_all(&staged);
                bail!("Import failed during staging: {e}");
            }
            staged.push(tmp_path);
        }

        let mut committed: Vec<Committed> = Vec::new();
        for (i, (name, _)) in files.iter().enumerate() {
            let entry = Committed {
                final_path: self.file_path(name),
                bak_path: self.file_path(name).with_extension("json.bak"),
                had_original: self.file_path(name).exists(),
            };

            if entry.had_original
                && let Err(e) = fs::rename(&entry.final_path, &entry.bak_path)
            {
                rollback(&committed);
                remove_all(&staged);
                bail!("Import failed during commit (backup): {e}");
            }

            if let Err(e) = fs::rename(&staged[i], &entry.final_path) {
                rollback(std::slice::from_ref(&entry));
                rollback(&committed);
                remove_all(&staged[i + 1..]);
                bail!("Import failed during commit (rename): {e}");
            }

            committed.push(entry);
        }

        for entry in &committed {
            if entry.had_original {
                let _ = fs::remove_file(&entry.bak_path);
            }
        }
        Ok(())
    }

    /// Clean up `.bak` files left by an interrupted import. Returns true if
    /// any were found.
    pub fn check_interrupted_import(&self) -> bool {
        let mut found = false;
        for name in [PROFILE_FILE, CATALOG_FILE] {
            let bak_path = self.file_path(name).with_extension("json.bak");
            if bak_path.exists() {
                found = true;
                let _ = fs::remove_file(&bak_path);
            }
        }
        found
    }
}

struct Committed {
    final_path: PathBuf,
    bak_path: PathBuf,
    had_original: bool,
}

fn write_synced(path: &Path, content: &str) -> Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn rollback(entries: &[Committed]) {
    for entry in entries {
        if entry.had_original && entry.bak_path.exists() {
            let _ = fs::rename(&entry.bak_path, &entry.final_path);
        } else if !entry.had_original {
            let _ = fs::remove_file(&entry.final_path);
        }
    }
}
