//! Finding configuration files on disk
//!
//! A relative file name is looked up in a start directory and then in each of
//! its ancestors, so a program deep inside a tree picks up the nearest
//! configuration file above it. The directories between that file and the
//! program also become the default sections to search, nearest first.

use std::path::{Component, Path, PathBuf};

use crate::resolver::SearchPath;

/// Find `name` starting at `start_dir` and walking up to the filesystem root
///
/// Absolute names are returned as is, without checking that they exist.
pub fn locate_file(name: impl AsRef<Path>, start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let name = name.as_ref();
    if name.is_absolute() {
        return Some(name.to_path_buf());
    }

    for dir in start_dir.as_ref().ancestors() {
        let candidate = dir.join(name);
        if candidate.is_file() {
            log::debug!("Located configuration file {}", candidate.display());
            return Some(candidate);
        }
    }
    None
}

/// Search path for a program running in `working_dir` that reads `config_file`
///
/// With the configuration at `/srv/site/app.conf` and the program in
/// `/srv/site/public/admin`, sections `admin`, then `public`, then `global`
/// are searched, followed by qualified keys. When `working_dir` is not below
/// the configuration file's directory, every component of `working_dir` is
/// used.
pub fn search_path_for(config_file: impl AsRef<Path>, working_dir: impl AsRef<Path>) -> SearchPath {
    let working_dir = working_dir.as_ref();
    let relative = config_file
        .as_ref()
        .parent()
        .and_then(|root| working_dir.strip_prefix(root).ok())
        .unwrap_or(working_dir);

    let sections: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .rev()
        .collect();

    SearchPath::from_sections(sections)
}
