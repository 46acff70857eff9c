use semchunk_code_chunker::{Chunk, Chunker, ChunkingStats, Language};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of chunking one file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub chunks: Vec<Chunk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ChunkingStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Chunk every file on the blocking pool and return reports in input order
pub async fn chunk_files(
    chunker: Arc<Chunker>,
    files: Vec<PathBuf>,
    language: Option<String>,
    with_stats: bool,
) -> Vec<FileReport> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let chunker = Arc::clone(&chunker);
            let language = language.clone();
            let task_path = path.clone();
            let handle = tokio::task::spawn_blocking(move || {
                chunk_one(&chunker, &task_path, language.as_deref(), with_stats)
            });
            (path, handle)
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let report = match handle.await {
            Ok(report) => report,
            Err(err) => failure(&path, None, format!("chunking task failed: {err}")),
        };
        reports.push(report);
    }
    reports
}

fn chunk_one(
    chunker: &Chunker,
    path: &Path,
    language: Option<&str>,
    with_stats: bool,
) -> FileReport {
    let language = language
        .map(str::to_string)
        .or_else(|| match Language::from_path(path) {
            Language::Unknown => None,
            detected => Some(detected.as_str().to_string()),
        });

    let result = match &language {
        Some(language) => chunker.chunk_file_as(path, language),
        None => chunker.chunk_file(path),
    };

    match result {
        Ok(chunks) => FileReport {
            path: path.display().to_string(),
            stats: with_stats.then(|| Chunker::get_stats(&chunks)),
            language,
            chunks,
            error: None,
        },
        Err(err) => failure(path, language, err.to_string()),
    }
}

fn failure(path: &Path, language: Option<String>, error: String) -> FileReport {
    log::warn!("{}: {error}", path.display());
    FileReport {
        path: path.display().to_string(),
        language,
        chunks: Vec::new(),
        stats: None,
        error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semchunk_code_chunker::ChunkerConfig;
    use std::fs;

    fn chunker() -> Arc<Chunker> {
        Arc::new(Chunker::new(ChunkerConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn reports_follow_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..8)
            .map(|i| {
                let path = dir.path().join(format!("m{i}.py"));
                fs::write(&path, format!("def f{i}(x):\n    return x\n")).unwrap();
                path
            })
            .collect();

        let reports = chunk_files(chunker(), files.clone(), None, false).await;
        assert_eq!(reports.len(), 8);
        for (i, (report, path)) in reports.iter().zip(&files).enumerate() {
            assert_eq!(report.path, path.display().to_string());
            assert_eq!(report.chunks[0].name(), Some(format!("f{i}").as_str()));
            assert!(report.stats.is_none());
        }
    }

    #[tokio::test]
    async fn failures_do_not_abort_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.rs");
        let bad = dir.path().join("bad.rs");
        let notes = dir.path().join("notes.txt");
        fs::write(&good, "fn ok() {}\n").unwrap();
        fs::write(&bad, "fn broken( {\n").unwrap();
        fs::write(&notes, "plain text").unwrap();

        let reports = chunk_files(chunker(), vec![bad, good, notes], None, true).await;
        assert!(reports[0].is_error());
        assert!(!reports[1].is_error());
        assert_eq!(reports[1].stats.as_ref().map(|s| s.total_chunks), Some(1));
        assert!(reports[2].language.is_none());
        assert!(reports[2].error.as_deref().unwrap().contains("Unknown language"));
    }
}
