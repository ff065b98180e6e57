//! Collaborator traits for filesystem and process access
//!
//! Every operation that touches the world outside the object graph goes
//! through these providers so the engine stays testable without a real
//! disk or an installed toolchain. Callers hand the live implementations
//! to production code and the mocks to tests.

use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Provider trait for filesystem operations
pub trait FileSystemProvider {
    /// Check if a path exists, file or directory
    fn file_exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_directory(&self, path: &Path) -> bool;

    /// Create an empty file, failing when one already exists
    fn create_file(&self, path: &Path) -> Result<()>;

    /// Create directory and all parent directories
    fn create_directory(&self, path: &Path) -> Result<()>;

    /// Copy a file or directory tree to a new location
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()>;

    /// Rename a file or directory
    fn move_item(&self, from: &Path, to: &Path) -> Result<()>;

    /// Delete a file or directory tree, succeeding when already absent
    fn remove_item(&self, path: &Path) -> Result<()>;

    /// Read entire file contents as string
    fn read_text_file(&self, path: &Path) -> Result<String>;

    /// Write string content to file, creating missing parent directories
    fn write_text_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Direct children of a directory, sorted by path
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Rewrite a text file with every occurrence of `from` replaced
    fn replace_occurrences(&self, path: &Path, from: &str, to: &str) -> Result<()> {
        let content = self.read_text_file(path)?;
        self.write_text_file(path, &content.replace(from, to))
    }

    /// Every file under a directory tree, sorted by path
    fn walk_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![path.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in self.list_dir(&dir)? {
                if self.is_directory(&entry) {
                    pending.push(entry);
                } else {
                    files.push(entry);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Process execution output
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Provider trait for process execution
pub trait ProcessProvider {
    /// Execute a command with given arguments
    fn execute(&self, command: &str, args: &[&str]) -> Result<ProcessOutput>;
}

/// Live implementation of FileSystemProvider
pub struct LiveFileSystemProvider;

impl FileSystemProvider for LiveFileSystemProvider {
    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        copy_recursively(from, to)
            .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))
    }

    fn move_item(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::rename(from, to)
            .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))
    }

    fn remove_item(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        if path.is_dir() {
            std::fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove directory: {}", path.display()))
        } else {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {}", path.display()))
        }
    }

    fn read_text_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    fn write_text_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)
            .with_context(|| format!("Failed to list directory: {}", path.display()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to list directory: {}", path.display()))?;
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }
}

fn copy_recursively(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("source does not exist: {}", from.display());
    }
    if from.is_dir() {
        std::fs::create_dir_all(to)?;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            copy_recursively(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(from, to)?;
    }
    Ok(())
}

/// Live implementation of ProcessProvider
pub struct LiveProcessProvider;

impl ProcessProvider for LiveProcessProvider {
    fn execute(&self, command: &str, args: &[&str]) -> Result<ProcessOutput> {
        use std::process::Command;

        let output = Command::new(command)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute command: {}", command))?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

const TEAM_ID_KEY: &str = "IDEProvisioningTeamManagerLastSelectedTeamID";

/// Development team Xcode last signed with on this machine, if any
///
/// Reads the team identifier from Xcode's preferences domain. Any failure
/// along the way, no home directory, no `defaults` binary, key absent,
/// means there is nothing to sign with and the answer is `None`.
pub fn fetch_last_selected_team_id(process: &dyn ProcessProvider) -> Option<String> {
    let base_dirs = BaseDirs::new()?;
    let plist = base_dirs
        .home_dir()
        .join("Library/Preferences/com.apple.dt.Xcode.plist");
    let plist = plist.to_string_lossy();
    let output = match process.execute("defaults", &["read", plist.as_ref(), TEAM_ID_KEY]) {
        Ok(output) if output.success => output,
        _ => return None,
    };
    let team = output.stdout.trim();
    if team.is_empty() {
        None
    } else {
        Some(team.to_string())
    }
}

#[cfg(test)]
mod tests {
    include!("session.test.rs");
}
