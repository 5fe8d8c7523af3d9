use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use log::info;

use crate::{dates::DayId, record::CalendarRecord};

/// One CSV file per day under a single output directory.
///
/// A day counts as done as soon as its file exists. Files are only written
/// with at least one record, so an empty day is retried on the next run.
#[derive(Debug, Clone)]
pub struct DayStore {
    dir: PathBuf,
}

impl DayStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, day: &DayId) -> PathBuf {
        self.dir.join(format!("{day}.csv"))
    }

    pub fn exists(&self, day: &DayId) -> bool {
        self.path_for(day).exists()
    }

    /// Writes (or overwrites) the file for `day`, creating the directory first.
    pub fn write(&self, day: &DayId, records: &[CalendarRecord]) -> anyhow::Result<PathBuf> {
        if records.is_empty() {
            bail!("refusing to write an empty file for {day}");
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let path = self.path_for(day);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        for record in records {
            writer
                .serialize(record)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;

        info!("Data for {day} saved to {}", path.display());
        Ok(path)
    }
}

pub fn read_day_file(path: &Path) -> anyhow::Result<Vec<CalendarRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<CalendarRecord>, _>>()
        .with_context(|| format!("failed to parse {}", path.display()))
}
