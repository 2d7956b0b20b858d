//! Report and screenshot artifacts left behind by the engine

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::EngineConfig;

/// What a finished run left on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub report_path: PathBuf,
    pub report_exists: bool,
    pub artifacts_dir: PathBuf,
    pub screenshots: usize,
}

impl ArtifactSummary {
    pub fn collect(engine: &EngineConfig) -> Self {
        let screenshots = count_screenshots(&engine.artifacts_dir);
        debug!(
            "Found {} screenshot(s) under {}",
            screenshots,
            engine.artifacts_dir.display()
        );

        Self {
            report_path: engine.report_path.clone(),
            report_exists: engine.report_path.is_file(),
            artifacts_dir: engine.artifacts_dir.clone(),
            screenshots,
        }
    }
}

/// Count PNG files anywhere below `dir`
fn count_screenshots(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .count()
}
