use ignore::WalkBuilder;
use semchunk_code_chunker::Language;
use std::path::{Path, PathBuf};

/// Expands command-line paths into the list of files to chunk
pub struct FileScanner {
    language: Option<String>,
}

impl FileScanner {
    pub fn new(language: Option<String>) -> Self {
        Self { language }
    }

    /// Files named directly are kept as-is; directories are walked
    /// (.gitignore aware, hidden entries skipped) for recognized sources.
    /// Order follows the arguments, and directory contents are sorted.
    pub fn scan(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for input in inputs {
            if input.is_dir() {
                let before = files.len();
                self.walk(input, &mut files);
                files[before..].sort();
            } else {
                files.push(input.clone());
            }
        }
        log::debug!("Found {} input files", files.len());
        files
    }

    fn walk(&self, root: &Path, files: &mut Vec<PathBuf>) {
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                        continue;
                    }
                    if self.accepts(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        match (Language::from_path(path), &self.language) {
            (Language::Unknown, _) => false,
            (detected, Some(wanted)) => detected.as_str() == wanted,
            (_, None) => true,
        }
    }
}
