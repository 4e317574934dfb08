//! Translation catalog compilation (`.po` → `.mo`).
//!
//! Walks locale directories and compiles every `.po` file to a sibling `.mo`
//! file through an injected [`CatalogCompiler`]. One bad file never aborts the
//! batch; without a compiler nothing is processed at all.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// Errors compiling a single catalog.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compiles one editable catalog into the binary format the runtime loads.
pub trait CatalogCompiler: Send + Sync {
    fn compile(&self, po_path: &Path, mo_path: &Path) -> Result<(), CompileError>;
}

/// Compiler backed by the `rspolib` crate.
#[cfg(feature = "rspolib")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RspolibCompiler;

#[cfg(feature = "rspolib")]
impl CatalogCompiler for RspolibCompiler {
    fn compile(&self, po_path: &Path, mo_path: &Path) -> Result<(), CompileError> {
        use rspolib::AsBytes;

        // Catalogs are UTF-8; the path itself may not be.
        let content = fs::read_to_string(po_path)?;
        let po = rspolib::pofile(content.as_str()).map_err(|e| CompileError::Parse {
            path: po_path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mo = rspolib::MOFile::from(&po);
        fs::write(mo_path, mo.as_bytes()).map_err(|source| CompileError::Write {
            path: mo_path.to_path_buf(),
            source,
        })
    }
}

/// The compiler built into this binary, if any.
pub fn default_compiler() -> Option<Box<dyn CatalogCompiler>> {
    #[cfg(feature = "rspolib")]
    {
        Some(Box::new(RspolibCompiler))
    }
    #[cfg(not(feature = "rspolib"))]
    {
        None
    }
}

/// Result of compiling one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub po_path: PathBuf,
    pub mo_path: PathBuf,
    pub result: Result<(), CompileError>,
}

/// Summary of a compilation run.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub files: Vec<FileOutcome>,
    /// Configured directories that do not exist.
    pub missing_dirs: Vec<PathBuf>,
}

impl CompileReport {
    pub fn compiled(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }
}

/// Outcome of a compilation request.
#[derive(Debug)]
pub enum CompileRun {
    /// No compiler is available; zero files were processed.
    Unavailable,
    Completed(CompileReport),
}

/// Compile every `.po` file under `locale_paths`.
pub fn compile_translations(
    locale_paths: &[PathBuf],
    compiler: Option<&dyn CatalogCompiler>,
) -> CompileRun {
    let Some(compiler) = compiler else {
        warn!("no catalog compiler available, skipping compilation");
        return CompileRun::Unavailable;
    };

    let mut report = CompileReport::default();

    for dir in locale_paths {
        if !dir.is_dir() {
            warn!(path = %dir.display(), "locale directory not found");
            report.missing_dirs.push(dir.clone());
            continue;
        }

        info!(path = %dir.display(), "scanning locale directory");

        let mut po_files = Vec::new();
        if let Err(e) = collect_po_files(dir, &mut po_files) {
            warn!(path = %dir.display(), error = %e, "failed to scan locale directory");
            report.files.push(FileOutcome {
                po_path: dir.clone(),
                mo_path: dir.clone(),
                result: Err(CompileError::Io(e)),
            });
            continue;
        }
        po_files.sort();

        for po_path in po_files {
            let mo_path = po_path.with_extension("mo");
            let result = compiler.compile(&po_path, &mo_path);
            match &result {
                Ok(()) => info!(
                    po = %po_path.display(),
                    mo = %mo_path.display(),
                    "compiled catalog"
                ),
                Err(e) => warn!(po = %po_path.display(), error = %e, "failed to compile catalog"),
            }
            report.files.push(FileOutcome {
                po_path,
                mo_path,
                result,
            });
        }
    }

    CompileRun::Completed(report)
}

fn collect_po_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_po_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "po") {
            out.push(path);
        }
    }
    Ok(())
}
