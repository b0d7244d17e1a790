//! File and directory loading into frame-sets.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use super::parser::{ParsedGeometry, RecordWarning, parse_reader};
use crate::schema::{FrameSet, PointSet};

/// File extension recognized when enumerating a directory.
pub const GEOMETRY_EXTENSION: &str = "obj";

/// What to do when one file of a multi-file load cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Install an empty frame in its place and record the failure.
    #[default]
    Degrade,
    /// Abort the whole load; nothing is installed.
    Abort,
}

/// Load failures. Malformed lines are never load errors.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("No files given to load")]
    EmptyFileList,
    #[error("No .obj files in {}", .0.display())]
    NoGeometryFiles(PathBuf),
    #[error("Frame {index} ({}) could not be loaded: {source}", path.display())]
    Frame {
        index: usize,
        path: PathBuf,
        #[source]
        source: Box<LoadError>,
    },
}

/// Per-frame diagnostics collected during a load.
#[derive(Debug, Default)]
pub struct FrameReport {
    pub path: PathBuf,
    pub point_count: usize,
    pub warnings: Vec<RecordWarning>,
    pub degraded_colors: usize,
    /// Set when the file was unreadable and the frame degraded to empty.
    pub error: Option<LoadError>,
}

/// Diagnostics for a whole load.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub frames: Vec<FrameReport>,
}

impl LoadReport {
    /// Total skipped records across all frames.
    pub fn warning_count(&self) -> usize {
        self.frames.iter().map(|f| f.warnings.len()).sum()
    }

    /// Number of frames that degraded to empty because of a read failure.
    pub fn failed_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.error.is_some()).count()
    }
}

/// A successfully loaded animation plus its diagnostics.
#[derive(Debug)]
pub struct LoadedAnimation {
    pub frames: FrameSet,
    pub report: LoadReport,
}

/// Load and parse a single geometry file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ParsedGeometry, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    parse_reader(BufReader::new(file)).map_err(|e| io_error(path, e))
}

/// Load an ordered list of files as animation frames.
///
/// Frame order is the order of `paths`. Under [`LoadPolicy::Degrade`] an
/// unreadable file becomes an empty frame; under [`LoadPolicy::Abort`] the
/// first unreadable file aborts the load.
pub fn load_frames<P: AsRef<Path>>(
    paths: &[P],
    policy: LoadPolicy,
) -> Result<LoadedAnimation, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::EmptyFileList);
    }

    log::info!("Loading {} geometry files", paths.len());

    let mut frames = Vec::with_capacity(paths.len());
    let mut report = LoadReport::default();

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        match load_file(path) {
            Ok(parsed) => {
                report.frames.push(FrameReport {
                    path: path.to_path_buf(),
                    point_count: parsed.points.len(),
                    warnings: parsed.warnings,
                    degraded_colors: parsed.degraded_colors,
                    error: None,
                });
                frames.push(parsed.points);
            }
            Err(err) => match policy {
                LoadPolicy::Abort => {
                    return Err(LoadError::Frame {
                        index,
                        path: path.to_path_buf(),
                        source: Box::new(err),
                    });
                }
                LoadPolicy::Degrade => {
                    log::warn!("Frame {} degraded to empty: {}", index, err);
                    report.frames.push(FrameReport {
                        path: path.to_path_buf(),
                        error: Some(err),
                        ..Default::default()
                    });
                    frames.push(PointSet::empty());
                }
            },
        }
    }

    let frames = FrameSet::new(frames);
    log::info!(
        "Loaded {} frames, {} points total ({})",
        frames.len(),
        frames.total_points(),
        if frames.has_color_data() {
            "with colors"
        } else {
            "no colors"
        }
    );

    Ok(LoadedAnimation { frames, report })
}

/// Enumerate geometry files directly inside `dir`, sorted by file name.
pub fn list_geometry_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, LoadError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(LoadError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.is_file() && has_geometry_extension(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load every geometry file of a directory as one animation.
pub fn load_directory<P: AsRef<Path>>(
    dir: P,
    policy: LoadPolicy,
) -> Result<LoadedAnimation, LoadError> {
    let dir = dir.as_ref();
    let files = list_geometry_files(dir)?;
    if files.is_empty() {
        return Err(LoadError::NoGeometryFiles(dir.to_path_buf()));
    }
    load_frames(&files, policy)
}

/// Load a file as a one-frame animation, or a directory as a multi-frame one.
pub fn load_path<P: AsRef<Path>>(
    path: P,
    policy: LoadPolicy,
) -> Result<LoadedAnimation, LoadError> {
    let path = path.as_ref();
    if path.is_dir() {
        load_directory(path, policy)
    } else {
        // A single file is never degraded: a missing file is a load error.
        load_frames(&[path], LoadPolicy::Abort).map_err(|err| match err {
            LoadError::Frame { source, .. } => *source,
            other => other,
        })
    }
}

fn has_geometry_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(GEOMETRY_EXTENSION))
}

fn io_error(path: &Path, err: io::Error) -> LoadError {
    if err.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound(path.to_path_buf())
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.obj", "v 0 0 0\nv 1 2\nv 1 1 1 1 0 0\n");

        let parsed = load_file(&path).unwrap();
        assert_eq!(parsed.points.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 2);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = tempdir().unwrap();
        let err = load_file(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));

        let err = load_path(dir.path().join("missing.obj"), LoadPolicy::Degrade).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_empty_file_list() {
        let paths: [PathBuf; 0] = [];
        assert!(matches!(
            load_frames(&paths, LoadPolicy::Degrade),
            Err(LoadError::EmptyFileList)
        ));
    }

    #[test]
    fn test_degrade_policy_keeps_frame_slot() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.obj", "v 0 0 0\n");
        let missing = dir.path().join("b.obj");
        let c = write(dir.path(), "c.obj", "v 1 1 1\nv 2 2 2\n");

        let loaded = load_frames(&[a, missing, c], LoadPolicy::Degrade).unwrap();
        assert_eq!(loaded.frames.len(), 3);
        assert!(loaded.frames.get(1).unwrap().is_empty());
        assert_eq!(loaded.frames.get(2).unwrap().len(), 2);
        assert_eq!(loaded.report.failed_frames(), 1);
    }

    #[test]
    fn test_abort_policy() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.obj", "v 0 0 0\n");
        let missing = dir.path().join("b.obj");

        let err = load_frames(&[a, missing], LoadPolicy::Abort).unwrap_err();
        assert!(matches!(err, LoadError::Frame { index: 1, .. }));
    }

    #[test]
    fn test_malformed_file_still_loads() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.obj", "v x y z\nv 1\n");
        let loaded = load_frames(&[a], LoadPolicy::Abort).unwrap();
        assert!(loaded.frames.get(0).unwrap().is_empty());
        assert_eq!(loaded.report.warning_count(), 2);
    }

    #[test]
    fn test_non_utf8_line_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.obj");
        fs::write(&path, b"# caf\xe9\nv 1 2 3\nv 4 5 6\n").unwrap();

        let loaded = load_path(&path, LoadPolicy::Degrade).unwrap();
        assert_eq!(loaded.frames.get(0).unwrap().len(), 2);
        assert_eq!(loaded.report.warning_count(), 0);

        let loaded = load_frames(&[&path, &path], LoadPolicy::Degrade).unwrap();
        assert_eq!(loaded.report.failed_frames(), 0);
        assert_eq!(loaded.frames.total_points(), 4);
    }

    #[test]
    fn test_directory_sorted_by_name() {
        let dir = tempdir().unwrap();
        write(dir.path(), "frame_002.obj", "v 2 0 0\n");
        write(dir.path(), "frame_000.obj", "v 0 0 0\n");
        write(dir.path(), "frame_001.OBJ", "v 1 0 0\n");
        write(dir.path(), "notes.txt", "v 9 9 9\n");

        let files = list_geometry_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);

        let loaded = load_directory(dir.path(), LoadPolicy::Degrade).unwrap();
        let xs: Vec<f64> = loaded
            .frames
            .iter()
            .map(|f| f.points()[0].position.x)
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_directory_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_directory(dir.path(), LoadPolicy::Degrade),
            Err(LoadError::NoGeometryFiles(_))
        ));

        let file = write(dir.path(), "a.obj", "v 0 0 0\n");
        assert!(matches!(
            list_geometry_files(&file),
            Err(LoadError::NotADirectory(_))
        ));
        assert!(matches!(
            list_geometry_files(dir.path().join("nope")),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_color_data_all_or_nothing_across_files() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.obj", "v 0 0 0 1 0 0\nv 1 0 0 0 1 0\n");
        let b = write(dir.path(), "b.obj", "v 0 0 0 1 0 0\nv 1 0 0\n");

        let colored = load_frames(&[&a, &a], LoadPolicy::Degrade).unwrap();
        assert!(colored.frames.has_color_data());

        let mixed = load_frames(&[&a, &b], LoadPolicy::Degrade).unwrap();
        assert!(!mixed.frames.has_color_data());
    }
}
