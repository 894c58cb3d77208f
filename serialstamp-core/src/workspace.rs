//! Workspace - Spec File and Resource Directories
//!
//! A workspace is a directory holding `spec.toml` plus one subdirectory per
//! resource category. Resource paths are always reported relative to the
//! workspace root, e.g. `images/ticket.png`.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::decode::decode;
use crate::defaults::DEFAULT_SPEC_TOML;
use crate::encode::encode;
use crate::spec::Specification;
use crate::SPEC_FILENAME;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid category '{0}'. Must be 'images' or 'fonts'")]
    InvalidCategory(String),

    #[error("Invalid resource path: {0}")]
    InvalidPath(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> WorkspaceError + '_ {
    move |source| WorkspaceError::Io { path: path.to_path_buf(), source }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Images,
    Fonts,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 2] = [ResourceCategory::Images, ResourceCategory::Fonts];

    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceCategory::Images => "images",
            ResourceCategory::Fonts => "fonts",
        }
    }
}

impl FromStr for ResourceCategory {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "images" => Ok(ResourceCategory::Images),
            "fonts" => Ok(ResourceCategory::Fonts),
            other => Err(WorkspaceError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    id: String,
    dir: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `base` with a random id.
    pub fn create(base: &Path) -> Result<Self, WorkspaceError> {
        let id = Uuid::new_v4().to_string();
        let dir = base.join(&id);
        let ws = Self { id, dir };
        ws.ensure_layout()?;
        Ok(ws)
    }

    /// Open (and if needed lay out) a workspace at `dir`.
    pub fn open(dir: &Path) -> Result<Self, WorkspaceError> {
        let id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ws = Self { id, dir: dir.to_path_buf() };
        ws.ensure_layout()?;
        Ok(ws)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn spec_path(&self) -> PathBuf {
        self.dir.join(SPEC_FILENAME)
    }

    fn ensure_layout(&self) -> Result<(), WorkspaceError> {
        for category in ResourceCategory::ALL {
            let dir = self.dir.join(category.dir_name());
            fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        }
        let spec_path = self.spec_path();
        if !spec_path.exists() {
            fs::write(&spec_path, DEFAULT_SPEC_TOML).map_err(io_err(&spec_path))?;
        }
        Ok(())
    }

    /// Read and decode `spec.toml`. A missing file yields the defaults.
    pub fn load_spec(&self) -> Result<Specification, WorkspaceError> {
        let path = self.spec_path();
        if !path.exists() {
            log::debug!("{} missing, using default spec", path.display());
            return Ok(Specification::default());
        }
        let text = fs::read_to_string(&path).map_err(io_err(&path))?;
        Ok(decode(&text))
    }

    pub fn save_spec(&self, spec: &Specification) -> Result<(), WorkspaceError> {
        let path = self.spec_path();
        let text = encode(&spec.clone().normalized_for_save());
        fs::write(&path, text).map_err(io_err(&path))
    }

    /// Files in a category, as sorted workspace-relative paths.
    pub fn list_files(&self, category: ResourceCategory) -> Result<Vec<String>, WorkspaceError> {
        let dir = self.dir.join(category.dir_name());
        let mut files = vec![];
        if !dir.exists() {
            return Ok(files);
        }
        for entry in fs::read_dir(&dir).map_err(io_err(&dir))? {
            let path = entry.map_err(io_err(&dir))?.path();
            if path.is_file() {
                if let Some(name) = path.file_name() {
                    files.push(format!("{}/{}", category, name.to_string_lossy()));
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Copy an external file into a category; returns its relative path.
    pub fn import_file(
        &self,
        src: &Path,
        category: ResourceCategory,
    ) -> Result<String, WorkspaceError> {
        let filename = src
            .file_name()
            .ok_or_else(|| WorkspaceError::InvalidPath(src.display().to_string()))?
            .to_string_lossy()
            .into_owned();

        let dest_dir = self.dir.join(category.dir_name());
        fs::create_dir_all(&dest_dir).map_err(io_err(&dest_dir))?;
        let dest = dest_dir.join(&filename);
        fs::copy(src, &dest).map_err(io_err(src))?;
        log::debug!("imported {} into {}", src.display(), dest.display());

        Ok(format!("{}/{}", category, filename))
    }

    /// Remove a resource given as a workspace-relative path. Removing a
    /// file that is already gone is not an error.
    pub fn remove_file(
        &self,
        category: ResourceCategory,
        relative: &str,
    ) -> Result<(), WorkspaceError> {
        if Path::new(relative).components().any(|c| c == Component::ParentDir) {
            return Err(WorkspaceError::InvalidPath(relative.to_string()));
        }
        let path = self.dir.join(relative);
        if !path.starts_with(self.dir.join(category.dir_name())) {
            return Err(WorkspaceError::InvalidPath(relative.to_string()));
        }
        if path.exists() {
            fs::remove_file(&path).map_err(io_err(&path))?;
            log::debug!("removed {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_lays_out_workspace() {
        let base = TempDir::new().unwrap();
        let ws = Workspace::create(base.path()).unwrap();

        assert!(Uuid::parse_str(ws.id()).is_ok());
        assert!(ws.dir().join("images").is_dir());
        assert!(ws.dir().join("fonts").is_dir());
        assert_eq!(fs::read_to_string(ws.spec_path()).unwrap(), DEFAULT_SPEC_TOML);
    }

    #[test]
    fn test_open_keeps_existing_spec() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SPEC_FILENAME), "stack-size = 7\n").unwrap();

        let ws = Workspace::open(dir.path()).unwrap();
        assert_eq!(ws.load_spec().unwrap().stack_size, 7);
    }

    #[test]
    fn test_load_missing_spec_is_default() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        fs::remove_file(ws.spec_path()).unwrap();
        assert_eq!(ws.load_spec().unwrap(), Specification::default());
    }

    #[test]
    fn test_save_normalizes() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();

        let mut spec = Specification::default();
        spec.stack_size = -3;
        spec.source_image = "images/t.png".to_string();
        ws.save_spec(&spec).unwrap();

        let back = ws.load_spec().unwrap();
        assert_eq!(back.stack_size, 1);
        assert_eq!(back.source_image, "images/t.png");
    }

    #[test]
    fn test_import_list_remove() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::open(&dir.path().join("ws")).unwrap();

        let src_dir = TempDir::new().unwrap();
        for name in ["b.png", "a.png"] {
            fs::write(src_dir.path().join(name), b"png").unwrap();
        }
        let rel = ws.import_file(&src_dir.path().join("b.png"), ResourceCategory::Images).unwrap();
        assert_eq!(rel, "images/b.png");
        ws.import_file(&src_dir.path().join("a.png"), ResourceCategory::Images).unwrap();

        assert_eq!(
            ws.list_files(ResourceCategory::Images).unwrap(),
            ["images/a.png", "images/b.png"]
        );
        assert!(ws.list_files(ResourceCategory::Fonts).unwrap().is_empty());

        ws.remove_file(ResourceCategory::Images, "images/b.png").unwrap();
        ws.remove_file(ResourceCategory::Images, "images/b.png").unwrap();
        assert_eq!(ws.list_files(ResourceCategory::Images).unwrap(), ["images/a.png"]);
    }

    #[test]
    fn test_remove_rejects_escapes() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();

        assert!(matches!(
            ws.remove_file(ResourceCategory::Fonts, "fonts/../spec.toml"),
            Err(WorkspaceError::InvalidPath(_))
        ));
        assert!(matches!(
            ws.remove_file(ResourceCategory::Fonts, "images/a.png"),
            Err(WorkspaceError::InvalidPath(_))
        ));
        assert!(ws.spec_path().exists());
    }

    #[test]
    fn test_remove_allows_double_dot_in_name() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        let path = ws.dir().join("fonts").join("v1..2.ttf");
        fs::write(&path, b"ttf").unwrap();

        ws.remove_file(ResourceCategory::Fonts, "fonts/v1..2.ttf").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("images".parse::<ResourceCategory>().unwrap(), ResourceCategory::Images);
        assert_eq!("fonts".parse::<ResourceCategory>().unwrap(), ResourceCategory::Fonts);
        assert!(matches!(
            "audio".parse::<ResourceCategory>(),
            Err(WorkspaceError::InvalidCategory(_))
        ));
    }
}
