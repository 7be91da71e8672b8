use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::ExperimentError;

/// Experiment files end with this suffix; the part before it is the
/// experiment name.
pub const EXPERIMENT_SUFFIX: &str = "_experiment.json";

const DATE_TIME_FORMAT: &str = "%Y%m%d_%H%M";

/// Metadata parsed from an experiment file name.
///
/// Names follow `<prefix>_<date>_<time>_..._<subject>_<occ>_<occ>_<phase><n>`,
/// for example `PREY_20230117_1412_FMM13_21_05_RT3`. The trailing token
/// carries the session phase label and its iteration number.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentFile {
    pub name: String,
    pub prefix: String,
    pub subject: String,
    pub occlusions: String,
    pub phase: String,
    pub iteration: u32,
    pub date_time: NaiveDateTime,
    pub path: PathBuf,
}

impl ExperimentFile {
    /// Parse experiment metadata out of a file path. Returns `None` when the
    /// file name does not follow the recording convention.
    pub fn parse(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let name = file_name.strip_suffix(EXPERIMENT_SUFFIX)?;
        let parts: Vec<&str> = name.split('_').collect();
        if parts.len() < 7 {
            return None;
        }
        let (phase, iteration) = split_phase_iteration(parts[parts.len() - 1])?;
        let date_time = NaiveDateTime::parse_from_str(
            &format!("{}_{}", parts[1], parts[2]),
            DATE_TIME_FORMAT,
        )
        .ok()?;
        Some(ExperimentFile {
            name: name.to_string(),
            prefix: parts[0].to_string(),
            subject: parts[parts.len() - 4].to_string(),
            occlusions: format!("{}_{}", parts[parts.len() - 3], parts[parts.len() - 2]),
            phase: phase.to_string(),
            iteration,
            date_time,
            path: path.to_path_buf(),
        })
    }
}

/// Split a trailing token like `RT3` into its phase label and iteration.
/// The label must be non-empty and everything after it must be a number.
fn split_phase_iteration(token: &str) -> Option<(&str, u32)> {
    let digit_start = token.find(|c: char| c.is_ascii_digit())?;
    if digit_start == 0 {
        return None;
    }
    let iteration = token[digit_start..].parse().ok()?;
    Some((&token[..digit_start], iteration))
}

/// Scan an experiment folder for recordings. Each experiment lives in its
/// own subdirectory holding a `<dirname>_experiment.json` file; directories
/// without one and files with unrecognized names are skipped. The result is
/// sorted by experiment name.
pub fn discover(root: &Path) -> Result<Vec<ExperimentFile>, ExperimentError> {
    let entries = std::fs::read_dir(root).map_err(|e| ExperimentError::DirRead {
        path: root.to_path_buf(),
        source: e,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExperimentError::DirRead {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let candidate = path.join(format!("{}{}", dir_name, EXPERIMENT_SUFFIX));
        if !candidate.is_file() {
            continue;
        }
        match ExperimentFile::parse(&candidate) {
            Some(file) => files.push(file),
            None => eprintln!(
                "skipping {}: unrecognized experiment name",
                candidate.display()
            ),
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Keep only the experiments whose phase label is in the given list.
pub fn filter_by_phases(files: Vec<ExperimentFile>, phases: &[String]) -> Vec<ExperimentFile> {
    files
        .into_iter()
        .filter(|f| phases.iter().any(|p| p == &f.phase))
        .collect()
}

/// Keep only the experiments whose subject is in the given list.
pub fn filter_by_subjects(files: Vec<ExperimentFile>, subjects: &[String]) -> Vec<ExperimentFile> {
    files
        .into_iter()
        .filter(|f| subjects.iter().any(|s| s == &f.subject))
        .collect()
}

/// A sortable field of [`ExperimentFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Prefix,
    DateTime,
    Subject,
    Occlusions,
    Phase,
    Iteration,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "prefix" => Ok(SortKey::Prefix),
            "date" => Ok(SortKey::DateTime),
            "subject" => Ok(SortKey::Subject),
            "occlusions" => Ok(SortKey::Occlusions),
            "phase" => Ok(SortKey::Phase),
            "iteration" => Ok(SortKey::Iteration),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Sort experiments by the given keys in order of precedence.
pub fn sort_files(files: &mut [ExperimentFile], keys: &[SortKey]) {
    files.sort_by(|a, b| {
        for key in keys {
            let ordering = match key {
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::Prefix => a.prefix.cmp(&b.prefix),
                SortKey::DateTime => a.date_time.cmp(&b.date_time),
                SortKey::Subject => a.subject.cmp(&b.subject),
                SortKey::Occlusions => a.occlusions.cmp(&b.occlusions),
                SortKey::Phase => a.phase.cmp(&b.phase),
                SortKey::Iteration => a.iteration.cmp(&b.iteration),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
