//! Turning command line arguments into a file list, and writing the result.
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{Error, Result};

/// Where the file for lookup key `path` is read from.
#[must_use]
pub fn resolve(base_dir: Option<&Path>, path: &str) -> PathBuf {
    base_dir.map_or_else(|| PathBuf::from(path), |base| base.join(path))
}

/// Reads a newline-delimited list of paths, ignoring blank lines.
///
/// # Errors
/// [`Error::Read`] if the list cannot be read.
pub fn load_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Resolves explicit paths plus an optional list file into the final,
/// sorted and de-duplicated set of files to embed.
///
/// Directories are expanded recursively; their entries are keyed as
/// `dir/name`. Empty files are skipped, as are directory entries that cannot
/// be inspected.
///
/// # Errors
/// [`Error::PathNotFound`] for a named path that does not exist,
/// [`Error::UnsupportedFileType`] for a named path that is neither a file
/// nor a directory, and [`Error::NonUtf8Path`] for an entry whose name cannot
/// be used as a key.
pub fn expand_inputs<S: AsRef<str>>(
    paths: &[S],
    list: Option<&Path>,
    base_dir: Option<&Path>,
) -> Result<Vec<String>> {
    let mut named: Vec<String> = paths.iter().map(|p| p.as_ref().to_owned()).collect();
    if let Some(list) = list {
        named.extend(load_list(list)?);
    }

    let mut files = Vec::with_capacity(named.len());
    for path in &named {
        expand_into(path, base_dir, true, &mut files)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Recursively processes files and directories.
fn expand_into(
    key: &str,
    base_dir: Option<&Path>,
    named: bool,
    files: &mut Vec<String>,
) -> Result<()> {
    let path = resolve(base_dir, key);
    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(_) if named => {
            return Err(Error::PathNotFound(
                path.display().to_string(),
                env::current_dir().map_or_else(|_| "unknown".into(), |p| p.display().to_string()),
            ));
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "skipping unreadable entry");
            return Ok(());
        }
    };

    if metadata.is_dir() {
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable directory");
                return Ok(());
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name();
            let name = name.to_str().ok_or_else(|| Error::NonUtf8Path(entry.path()))?;
            expand_into(&join_key(key, name), base_dir, false, files)?;
        }
        Ok(())
    } else if metadata.is_file() {
        if metadata.len() == 0 {
            warn!(path = key, "skipping empty file");
        } else {
            files.push(key.to_owned());
        }
        Ok(())
    } else if named {
        Err(Error::UnsupportedFileType(path.display().to_string()))
    } else {
        warn!(path = %path.display(), "skipping unsupported file type");
        Ok(())
    }
}

fn join_key(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Writes the generated source to `path`, creating parent directories.
///
/// # Errors
/// [`Error::Write`] on any filesystem failure.
pub fn write_output(text: &str, path: &Path) -> Result<()> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, text).map_err(write_err)
}
