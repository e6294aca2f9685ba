//! Collision-free output file names.
//!
//! [`unique_name`] is a point-in-time probe of the target directory. Concurrent
//! downloads go through a [`NameRegistry`], which also treats names handed out
//! but not yet written as taken.

use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

/// Returns the first of `base`, `base1`, `base2`, ... for which
/// `dir/<name>.<ext>` does not exist. The returned name has no directory and
/// no extension.
pub fn unique_name(dir: &Path, base: &str, ext: &str) -> io::Result<String> {
    first_free_name(dir, base, ext, |_| false)
}

fn first_free_name(
    dir: &Path,
    base: &str,
    ext: &str,
    is_reserved: impl Fn(&Path) -> bool,
) -> io::Result<String> {
    let mut name = base.to_string();
    let mut counter: u64 = 1;

    loop {
        let path = file_path(dir, &name, ext);
        if !path.try_exists()? && !is_reserved(&path) {
            return Ok(name);
        }
        name = format!("{base}{counter}");
        counter += 1;
    }
}

fn file_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    dir.join(format!("{name}.{ext}"))
}

/// Longest base name in bytes. Leaves room for a numeric suffix and an
/// extension under the usual 255 byte file name limit.
pub const MAX_BASE_LEN: usize = 200;

/// Replace characters that are invalid in file names on common filesystems,
/// and cut the result to at most [`MAX_BASE_LEN`] bytes
pub fn sanitize_filename(filename: &str) -> String {
    let mut name = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>();

    if name.len() > MAX_BASE_LEN {
        let end = (0..=MAX_BASE_LEN)
            .rev()
            .find(|&i| name.is_char_boundary(i))
            .unwrap_or_default();
        name.truncate(end);
    }

    name.trim()
        .trim_end_matches('.')
        .trim_end()
        .to_string()
}

/// Hands out unique file names across concurrent downloads of one process.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    reserved: Arc<Mutex<HashSet<PathBuf>>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks a name like [`unique_name`] and holds it until the returned
    /// reservation is dropped. Callers should keep the reservation alive until
    /// the file exists on disk.
    pub fn reserve(&self, dir: &Path, base: &str, ext: &str) -> io::Result<NameReservation> {
        let mut reserved = self
            .reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let name = first_free_name(dir, base, ext, |path| reserved.contains(path))?;
        let path = file_path(dir, &name, ext);
        reserved.insert(path.clone());

        Ok(NameReservation {
            reserved: Arc::clone(&self.reserved),
            name,
            path,
        })
    }

    #[cfg(test)]
    pub fn is_reserved(&self, path: &Path) -> bool {
        self.reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
    }
}

#[derive(Debug)]
pub struct NameReservation {
    reserved: Arc<Mutex<HashSet<PathBuf>>>,
    name: String,
    path: PathBuf,
}

impl NameReservation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for NameReservation {
    fn drop(&mut self) {
        self.reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.path);
    }
}
