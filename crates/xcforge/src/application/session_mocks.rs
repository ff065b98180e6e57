//! Mock providers for engine tests
//!
//! In-memory stand-ins for the live providers. The filesystem mock keeps
//! file contents and directory membership in shared maps so tests can
//! seed a tree up front and inspect what an operation left behind.

use anyhow::{Result, bail};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::session::{FileSystemProvider, ProcessOutput, ProcessProvider};

/// Mock filesystem provider for testing
pub struct MockFileSystemProvider {
    /// In-memory filesystem: path -> content
    pub files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    /// Track directories that exist
    pub directories: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl MockFileSystemProvider {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            directories: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Seed a file, registering its parent directories along the way
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            register_directory(&mut self.directories.lock().unwrap(), parent);
        }
        self.files.lock().unwrap().insert(path, content.to_string());
        self
    }

    /// Seed an empty directory
    pub fn with_directory(self, path: impl Into<PathBuf>) -> Self {
        register_directory(&mut self.directories.lock().unwrap(), &path.into());
        self
    }

    /// Content currently stored for a file, if present
    pub fn file_content(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl Default for MockFileSystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn register_directory(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        directories.insert(ancestor.to_path_buf());
    }
}

/// Destination for `path` when a tree rooted at `from` lands at `to`
fn rewrite(path: &Path, from: &Path, to: &Path) -> Option<PathBuf> {
    let suffix = path.strip_prefix(from).ok()?;
    Some(if suffix.as_os_str().is_empty() {
        to.to_path_buf()
    } else {
        to.join(suffix)
    })
}

impl FileSystemProvider for MockFileSystemProvider {
    fn file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.directories.lock().unwrap().contains(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.directories.lock().unwrap().contains(path)
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            bail!("Failed to create file: {} already exists", path.display());
        }
        if let Some(parent) = path.parent() {
            register_directory(&mut self.directories.lock().unwrap(), parent);
        }
        files.insert(path.to_path_buf(), String::new());
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        register_directory(&mut self.directories.lock().unwrap(), path);
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        if !self.file_exists(from) {
            bail!("source does not exist: {}", from.display());
        }
        let copied_files: Vec<(PathBuf, String)> = {
            let files = self.files.lock().unwrap();
            files
                .iter()
                .filter_map(|(path, content)| {
                    Some((rewrite(path, from, to)?, content.clone()))
                })
                .collect()
        };
        let copied_dirs: Vec<PathBuf> = {
            let directories = self.directories.lock().unwrap();
            directories
                .iter()
                .filter_map(|path| rewrite(path, from, to))
                .collect()
        };
        self.files.lock().unwrap().extend(copied_files);
        let mut directories = self.directories.lock().unwrap();
        for dir in copied_dirs {
            register_directory(&mut directories, &dir);
        }
        Ok(())
    }

    fn move_item(&self, from: &Path, to: &Path) -> Result<()> {
        if !self.file_exists(from) {
            bail!("Failed to move {}: does not exist", from.display());
        }
        let mut files = self.files.lock().unwrap();
        let moved: Vec<(PathBuf, PathBuf)> = files
            .keys()
            .filter_map(|path| Some((path.clone(), rewrite(path, from, to)?)))
            .collect();
        for (old, new) in moved {
            if let Some(content) = files.remove(&old) {
                files.insert(new, content);
            }
        }
        drop(files);

        let mut directories = self.directories.lock().unwrap();
        let moved_dirs: Vec<(PathBuf, PathBuf)> = directories
            .iter()
            .filter_map(|path| Some((path.clone(), rewrite(path, from, to)?)))
            .collect();
        for (old, new) in moved_dirs {
            directories.remove(&old);
            register_directory(&mut directories, &new);
        }
        Ok(())
    }

    fn remove_item(&self, path: &Path) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .retain(|candidate, _| !candidate.starts_with(path));
        self.directories
            .lock()
            .unwrap()
            .retain(|candidate| !candidate.starts_with(path));
        Ok(())
    }

    fn read_text_file(&self, path: &Path) -> Result<String> {
        match self.files.lock().unwrap().get(path) {
            Some(content) => Ok(content.clone()),
            None => bail!("Failed to read file: {}", path.display()),
        }
    }

    fn write_text_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            register_directory(&mut self.directories.lock().unwrap(), parent);
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_directory(path) {
            bail!("Failed to list directory: {}", path.display());
        }
        let mut entries: Vec<PathBuf> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|candidate| candidate.parent() == Some(path))
            .cloned()
            .collect();
        entries.extend(
            self.directories
                .lock()
                .unwrap()
                .iter()
                .filter(|candidate| candidate.parent() == Some(path))
                .cloned(),
        );
        entries.sort();
        Ok(entries)
    }
}

/// Mock process provider for testing
pub struct MockProcessProvider {
    /// Canned outputs keyed by the full command line
    pub responses: Mutex<HashMap<String, ProcessOutput>>,
    /// Every command line executed, in order
    pub calls: Mutex<Vec<String>>,
}

impl MockProcessProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, command_line: &str, output: ProcessOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command_line.to_string(), output);
        self
    }

    /// Successful response with the given stdout
    pub fn with_stdout(self, command_line: &str, stdout: &str) -> Self {
        self.with_response(
            command_line,
            ProcessOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                success: true,
            },
        )
    }
}

impl Default for MockProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProvider for MockProcessProvider {
    fn execute(&self, command: &str, args: &[&str]) -> Result<ProcessOutput> {
        let command_line = if args.is_empty() {
            command.to_string()
        } else {
            format!("{} {}", command, args.join(" "))
        };
        self.calls.lock().unwrap().push(command_line.clone());
        match self.responses.lock().unwrap().get(&command_line) {
            Some(output) => Ok(output.clone()),
            None => Ok(ProcessOutput {
                stdout: String::new(),
                stderr: format!("no mock response for: {command_line}"),
                success: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_files_and_directories_exist() {
        let fs = MockFileSystemProvider::new()
            .with_file("/work/App/main.swift", "print(1)")
            .with_directory("/work/Assets");
        assert!(fs.file_exists(Path::new("/work/App/main.swift")));
        assert!(fs.is_directory(Path::new("/work/App")));
        assert!(fs.is_directory(Path::new("/work/Assets")));
        assert!(!fs.is_directory(Path::new("/work/App/main.swift")));
        assert_eq!(
            fs.read_text_file(Path::new("/work/App/main.swift")).unwrap(),
            "print(1)"
        );
    }

    #[test]
    fn create_file_rejects_existing_paths() {
        let fs = MockFileSystemProvider::new().with_file("/work/a.txt", "x");
        assert!(fs.create_file(Path::new("/work/a.txt")).is_err());
        assert!(fs.create_file(Path::new("/work/b.txt")).is_ok());
        assert_eq!(fs.file_content(Path::new("/work/b.txt")), Some(String::new()));
    }

    #[test]
    fn copy_tree_rewrites_the_prefix() {
        let fs = MockFileSystemProvider::new()
            .with_file("/templates/app/App.swift", "body")
            .with_directory("/templates/app/Assets");
        fs.copy_tree(Path::new("/templates/app"), Path::new("/work/Demo"))
            .unwrap();
        assert_eq!(
            fs.file_content(Path::new("/work/Demo/App.swift")),
            Some("body".to_string())
        );
        assert!(fs.is_directory(Path::new("/work/Demo/Assets")));
        assert!(fs.file_exists(Path::new("/templates/app/App.swift")));
    }

    #[test]
    fn move_item_renames_files_and_subtrees() {
        let fs = MockFileSystemProvider::new()
            .with_file("/work/Old/App.swift", "body")
            .with_file("/work/Old/Deep/Util.swift", "util");
        fs.move_item(Path::new("/work/Old"), Path::new("/work/New"))
            .unwrap();
        assert!(!fs.file_exists(Path::new("/work/Old/App.swift")));
        assert_eq!(
            fs.file_content(Path::new("/work/New/Deep/Util.swift")),
            Some("util".to_string())
        );
        assert!(fs.is_directory(Path::new("/work/New/Deep")));
    }

    #[test]
    fn remove_item_drops_a_subtree_and_tolerates_absence() {
        let fs = MockFileSystemProvider::new()
            .with_file("/work/App/main.swift", "x")
            .with_file("/work/keep.txt", "y");
        fs.remove_item(Path::new("/work/App")).unwrap();
        assert!(!fs.file_exists(Path::new("/work/App/main.swift")));
        assert!(!fs.is_directory(Path::new("/work/App")));
        assert!(fs.file_exists(Path::new("/work/keep.txt")));
        fs.remove_item(Path::new("/work/App")).unwrap();
    }

    #[test]
    fn list_dir_is_sorted_and_walk_recurses() {
        let fs = MockFileSystemProvider::new()
            .with_file("/work/b.swift", "")
            .with_file("/work/a.swift", "")
            .with_file("/work/Sub/c.swift", "");
        let listed = fs.list_dir(Path::new("/work")).unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("/work/Sub"),
                PathBuf::from("/work/a.swift"),
                PathBuf::from("/work/b.swift"),
            ]
        );
        let walked = fs.walk_files(Path::new("/work")).unwrap();
        assert_eq!(
            walked,
            vec![
                PathBuf::from("/work/Sub/c.swift"),
                PathBuf::from("/work/a.swift"),
                PathBuf::from("/work/b.swift"),
            ]
        );
    }

    #[test]
    fn replace_occurrences_rewrites_in_place() {
        let fs = MockFileSystemProvider::new().with_file("/work/a.txt", "Name and Name");
        fs.replace_occurrences(Path::new("/work/a.txt"), "Name", "Demo")
            .unwrap();
        assert_eq!(
            fs.file_content(Path::new("/work/a.txt")),
            Some("Demo and Demo".to_string())
        );
    }

    #[test]
    fn process_mock_replays_responses_and_records_calls() {
        let process = MockProcessProvider::new().with_stdout("git status", "clean");
        let hit = process.execute("git", &["status"]).unwrap();
        assert!(hit.success);
        assert_eq!(hit.stdout, "clean");
        let miss = process.execute("git", &["log"]).unwrap();
        assert!(!miss.success);
        assert_eq!(
            *process.calls.lock().unwrap(),
            vec!["git status".to_string(), "git log".to_string()]
        );
    }
}
