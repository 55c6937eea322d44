use anyhow::{anyhow, Context, Result};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Side effects menu activations are allowed to perform on the host.
pub trait HostServices {
    fn open_in_browser(&self, url: &str) -> Result<()>;
    fn copy_file(&self, src: &Path, dest: &Path) -> Result<()>;
    /// Persist encoded image bytes and return where they were written.
    fn save_image_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Batched avatar lookup. The returned map is keyed by user uid and holds a
/// local image path for every uid the host could resolve.
pub trait AvatarSource {
    fn fetch_avatars(
        &self,
        uids: &HashSet<String>,
    ) -> impl Future<Output = Result<HashMap<String, PathBuf>>>;
}

/// Services backed by the local desktop: default browser, the file system and
/// a fixed output folder for generated images.
#[derive(Debug, Clone)]
pub struct DesktopServices {
    output_dir: PathBuf,
}

impl DesktopServices {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl HostServices for DesktopServices {
    fn open_in_browser(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("open {url} in browser"))
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create destination folder {}", parent.display()))?;
        }
        std::fs::copy(src, dest)
            .with_context(|| format!("copy {} to {}", src.display(), dest.display()))?;
        Ok(())
    }

    fn save_image_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("create image output folder {}", self.output_dir.display())
        })?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

const AVATAR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Avatar cache laid out as `<dir>/<uid>.<ext>`.
#[derive(Debug, Clone)]
pub struct AvatarDirectory {
    dir: PathBuf,
}

impl AvatarDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn lookup(&self, uid: &str) -> Option<PathBuf> {
        AVATAR_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{uid}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl AvatarSource for AvatarDirectory {
    async fn fetch_avatars(&self, uids: &HashSet<String>) -> Result<HashMap<String, PathBuf>> {
        if !self.dir.is_dir() {
            return Err(anyhow!("avatar folder {} does not exist", self.dir.display()));
        }
        Ok(uids
            .iter()
            .filter_map(|uid| self.lookup(uid).map(|path| (uid.clone(), path)))
            .collect())
    }
}
