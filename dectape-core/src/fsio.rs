//! Host filesystem collaborators: output files, timestamps, source metadata
//! and directory enumeration

use crate::extract::FileSink;
use crate::Result;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Asked before an existing file is overwritten; `true` means go ahead
pub type ConfirmFn = Box<dyn FnMut(&str) -> bool>;

/// Open `path` for writing.
///
/// An existing file is only replaced if `overwrite` is set or `confirm`
/// agrees; otherwise `None` is returned and the file is left alone.
pub fn open_output(
    path: &Path,
    overwrite: bool,
    confirm: Option<&mut dyn FnMut(&str) -> bool>,
) -> Result<Option<File>> {
    if path.exists() && !overwrite {
        let message = format!("Overwrite \"{}\"", path.display());
        match confirm {
            Some(confirm) => {
                if !confirm(&message) {
                    return Ok(None);
                }
            }
            None => return Ok(None),
        }
    }
    Ok(Some(File::create(path)?))
}

/// Local midnight at the start of the given day
pub fn local_midnight(year: i32, day_of_year: u32) -> Option<SystemTime> {
    let date = NaiveDate::from_yo_opt(year, day_of_year)?;
    let local = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    Some(SystemTime::from(local))
}

/// Set a file's modification time to local midnight of the given day.
///
/// Dates that do not exist (day 0, day 366 of a standard year) leave the
/// file untouched.
pub fn set_modification_date(path: &Path, year: i32, day_of_year: u32) -> Result<()> {
    let Some(time) = local_midnight(year, day_of_year) else {
        #[cfg(feature = "logging")]
        warn!(
            "Not setting date of {}: day {} of {} does not exist",
            path.display(),
            day_of_year,
            year
        );
        return Ok(());
    };
    File::options().write(true).open(path)?.set_modified(time)?;
    Ok(())
}

/// `(year, day_of_year)` of a file's modification time, in local time
pub fn modification_date(path: &Path) -> Result<(i32, u32)> {
    let modified: DateTime<Local> = fs::metadata(path)?.modified()?.into();
    Ok((modified.year(), modified.ordinal()))
}

/// Size of a file in bytes
pub fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Writes extracted files into a host directory
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
    confirm: Option<ConfirmFn>,
}

impl DirectorySink {
    /// Write into `dir`; existing files are kept unless `overwrite` is set
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            dir: dir.into(),
            overwrite,
            confirm: None,
        }
    }

    /// Ask `confirm` before replacing an existing file
    pub fn with_confirm(mut self, confirm: ConfirmFn) -> Self {
        self.confirm = Some(confirm);
        self
    }

    /// Full path of an output file
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl FileSink for DirectorySink {
    fn create(&mut self, name: &str) -> Result<Option<Box<dyn Write>>> {
        let path = self.path_of(name);
        let confirm = self
            .confirm
            .as_mut()
            .map(|c| c.as_mut() as &mut dyn FnMut(&str) -> bool);
        let file = open_output(&path, self.overwrite, confirm)?;
        Ok(file.map(|f| Box::new(BufWriter::new(f)) as Box<dyn Write>))
    }

    fn set_creation_date(&mut self, name: &str, year: i32, day_of_year: u32) -> Result<()> {
        set_modification_date(&self.path_of(name), year, day_of_year)
    }
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// File name within the directory
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Whether the entry is a directory (symlinks followed)
    pub is_directory: bool,
}

/// Lazy iterator over the entries of a directory matching a wildcard
pub struct DirEntries {
    inner: fs::ReadDir,
    pattern: Option<String>,
}

impl Iterator for DirEntries {
    type Item = Result<EntryInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(pattern) = &self.pattern {
                if !wildcard_match(pattern, &name) {
                    continue;
                }
            }
            let path = entry.path();
            let is_directory = path.is_dir();
            return Some(Ok(EntryInfo {
                name,
                path,
                is_directory,
            }));
        }
    }
}

/// Enumerate a directory.
///
/// `path` is either a directory (all entries) or a directory followed by a
/// file name pattern using `*` and `?`.
pub fn list_entries(path: &Path) -> Result<DirEntries> {
    let (dir, pattern) = if path.is_dir() {
        (path.to_path_buf(), None)
    } else {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let pattern = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        (dir, pattern)
    };

    #[cfg(feature = "logging")]
    debug!("Listing {} (pattern {:?})", dir.display(), pattern);

    Ok(DirEntries {
        inner: fs::read_dir(dir)?,
        pattern,
    })
}

/// Shell-style match of `name` against `pattern` (`*` any run, `?` any one
/// character)
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
