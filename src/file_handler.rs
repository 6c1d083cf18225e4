use anyhow::{Context, Result};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileHandler {
    backup_enabled: bool,
}

impl FileHandler {
    pub fn new(backup_enabled: bool) -> Self {
        Self { backup_enabled }
    }

    pub fn find_java_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                if self.is_java_file(path) {
                    files.push(path.clone());
                }
            } else if path.is_dir() {
                self.find_java_files_in_dir(path, &mut files)?;
            } else {
                // Treat as glob pattern
                let pattern = path.to_str().context("Invalid path")?;
                for entry in glob(pattern).context("Failed to read glob pattern")? {
                    let file = entry.context("Failed to process glob entry")?;
                    if self.is_java_file(&file) {
                        files.push(file);
                    }
                }
            }
        }

        Ok(files)
    }

    fn find_java_files_in_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir).context("Failed to read directory")? {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_dir() {
                // Skip build output and hidden directories
                if let Some(name) = path.file_name() {
                    let name_str = name.to_string_lossy();
                    if name_str != "target" && name_str != "build" && !name_str.starts_with('.') {
                        self.find_java_files_in_dir(&path, files)?;
                    }
                }
            } else if self.is_java_file(&path) {
                files.push(path);
            }
        }
        Ok(())
    }

    fn is_java_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "java")
            .unwrap_or(false)
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if self.backup_enabled {
            self.create_backup(path)?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn create_backup(&self, path: &Path) -> Result<()> {
        let backup_path = path.with_extension(format!(
            "{}.bak",
            path.extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("")
        ));

        fs::copy(path, &backup_path)
            .with_context(|| format!("Failed to create backup: {}", backup_path.display()))?;

        Ok(())
    }
}
