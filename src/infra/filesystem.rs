//! Filesystem operations
//!
//! Handles file and directory operations.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use regex::Regex;
use sha2::{Digest, Sha256, Sha512};
use walkdir::WalkDir;

use crate::error::FilesystemError;

/// A regular file found by [`dir_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirFile {
    /// Full path
    pub path: PathBuf,
    /// File name
    pub name: String,
    /// Name of the directory holding the file
    pub parent_dir_name: String,
    /// Size in bytes
    pub size: u64,
}

/// Digest used by [`hash_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// SHA-512
    Sha512,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(format!("unsupported hash algorithm '{other}'")),
        }
    }
}

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Alias of [`create_dir_all`]
pub fn ensure_dir(path: &Path) -> Result<(), FilesystemError> {
    create_dir_all(path)
}

/// Remove a file or a directory tree; a missing path is not an error
pub fn remove(path: &Path) -> Result<(), FilesystemError> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(_) => return Ok(()),
    };
    result.map_err(|e| FilesystemError::Remove {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Make sure `path` is an existing, empty directory
pub fn empty_dir(path: &Path) -> Result<(), FilesystemError> {
    create_dir_all(path)?;
    let entries = fs::read_dir(path).map_err(|e| FilesystemError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| FilesystemError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        remove(&entry.path())?;
    }
    Ok(())
}

/// Copy a file, or a directory tree, to `to`
pub fn copy(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    let copy_err = |e: &dyn std::fmt::Display| FilesystemError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e.to_string(),
    };

    if from.is_file() {
        if let Some(parent) = to.parent() {
            create_dir_all(parent)?;
        }
        fs::copy(from, to).map_err(|e| copy_err(&e))?;
        return Ok(());
    }

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|e| copy_err(&e))?;
        let relative = entry.path().strip_prefix(from).map_err(|e| copy_err(&e))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| copy_err(&e))?;
        }
    }
    Ok(())
}

/// Move a file or directory, falling back to copy + remove across devices
pub fn move_path(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    if !from.exists() {
        return Err(FilesystemError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: "source does not exist".to_string(),
        });
    }
    copy(from, to)?;
    remove(from)
}

/// List regular files under `dir`, recursively
///
/// When `filter` is given only files whose full path matches it are kept.
/// Results are sorted by path.
pub fn dir_files(dir: &Path, filter: Option<&Regex>) -> Result<Vec<DirFile>, FilesystemError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| FilesystemError::Read {
            path: dir.to_path_buf(),
            error: e.to_string(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        if let Some(re) = filter {
            if !re.is_match(&path.to_string_lossy()) {
                continue;
            }
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let parent_dir_name = path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        files.push(DirFile {
            path: path.to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            parent_dir_name,
            size,
        });
    }

    Ok(files)
}

/// Hex digest of a file's contents, read in chunks
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, FilesystemError> {
    match algorithm {
        HashAlgorithm::Sha256 => digest_file::<Sha256>(path),
        HashAlgorithm::Sha512 => digest_file::<Sha512>(path),
    }
}

fn digest_file<D: Digest>(path: &Path) -> Result<String, FilesystemError> {
    let read_err = |e: std::io::Error| FilesystemError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut file = fs::File::open(path).map_err(read_err)?;
    let mut hasher = D::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_hash_file_sha256() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("hello.txt");
        write(&file, "hello world");

        assert_eq!(
            hash_file(&file, HashAlgorithm::Sha256).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_hash_file_empty() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("empty");
        write(&file, "");

        assert_eq!(
            hash_file(&file, HashAlgorithm::Sha256).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_file_sha512_length() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data.bin");
        write(&file, "abc");

        assert_eq!(hash_file(&file, HashAlgorithm::Sha512).unwrap().len(), 128);
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/file.txt"), HashAlgorithm::Sha256);
        assert!(matches!(result, Err(FilesystemError::Read { .. })));
    }

    #[test]
    fn test_hash_algorithm_from_str() {
        assert_eq!("SHA256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("sha512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
        assert!("sha1".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_dir_files_recursive_with_filter() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("a.rs"), "a");
        write(&temp.path().join("sub").join("b.rs"), "bb");
        write(&temp.path().join("sub").join("c.txt"), "c");

        let all = dir_files(temp.path(), None).unwrap();
        assert_eq!(all.len(), 3);

        let re = Regex::new(r"\.rs$").unwrap();
        let rust = dir_files(temp.path(), Some(&re)).unwrap();
        let names: Vec<_> = rust.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.rs", "b.rs"]);

        let nested = rust.iter().find(|f| f.name == "b.rs").unwrap();
        assert_eq!(nested.parent_dir_name, "sub");
        assert_eq!(nested.size, 2);
    }

    #[test]
    fn test_copy_directory_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write(&src.join("x").join("y.txt"), "nested");
        write(&src.join("top.txt"), "top");

        let dst = temp.path().join("dst");
        copy(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("x").join("y.txt")).unwrap(), "nested");
        assert_eq!(fs::read_to_string(dst.join("top.txt")).unwrap(), "top");
        assert!(src.join("top.txt").exists());
    }

    #[test]
    fn test_move_file() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("from.txt");
        write(&from, "moving");
        let to = temp.path().join("deep").join("to.txt");

        move_path(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "moving");
    }

    #[test]
    fn test_move_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = move_path(&temp.path().join("nope"), &temp.path().join("dest"));
        assert!(matches!(result, Err(FilesystemError::Move { .. })));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("gone");
        write(&dir.join("file"), "x");

        remove(&dir).unwrap();
        assert!(!dir.exists());
        remove(&dir).unwrap();
    }

    #[test]
    fn test_empty_dir_clears_and_creates() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("work");
        write(&dir.join("a"), "a");
        write(&dir.join("b").join("c"), "c");

        empty_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

        let fresh = temp.path().join("fresh");
        empty_dir(&fresh).unwrap();
        assert!(fresh.is_dir());
    }

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
