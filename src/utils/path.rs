//! Output path derivation for converted files, frames and clips

use std::path::{Path, PathBuf};

use crate::error::{VidprepError, VidprepResult};

/// Marker stripped from converted output names
const ORIGINAL_MARKER: &str = "_orig";

/// Path utilities for output layout
pub struct PathUtils;

impl PathUtils {
    /// Get file stem (name without extension) from path
    pub fn stem(path: &Path) -> VidprepResult<String> {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| {
                VidprepError::InvalidArgument(format!(
                    "Path has no file name: {}",
                    path.display()
                ))
            })
    }

    /// Destination of a converted file: `<dst_dir>/<stem><ext>` with the
    /// `_orig` marker removed
    pub fn converted_destination(
        dst_dir: &Path,
        source: &Path,
        extension: &str,
    ) -> VidprepResult<PathBuf> {
        let name = format!("{}{}", Self::stem(source)?, extension).replace(ORIGINAL_MARKER, "");
        Ok(dst_dir.join(name))
    }

    /// Folder receiving sampled status frames for one video
    pub fn frames_dir(status_dir: &Path, video: &Path) -> VidprepResult<PathBuf> {
        Ok(status_dir.join(format!("{}_frames", Self::stem(video)?)))
    }

    /// Default grab output folder: next to the video, named after its stem
    pub fn default_grab_dir(video: &Path) -> VidprepResult<PathBuf> {
        let parent = video.parent().unwrap_or_else(|| Path::new(""));
        Ok(parent.join(Self::stem(video)?))
    }
}
