//! Image frames to send to the pose service.
//!
//! Live capture is handled outside this crate; anything that can hand over
//! encoded images implements [`FrameSource`].  [`ImageDirSource`] replays a
//! directory of captured frames.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::error::SourceError;

/// One encoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub name:  String,
    pub mime:  &'static str,
    pub bytes: Vec<u8>,
}

impl Frame {
    /// `data:<mime>;base64,<…>`, the form the pose service accepts.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Anything that can deliver encoded frames, one per call.
pub trait FrameSource {
    /// The next frame, or `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

/// MIME type for a supported image file name.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png"          => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _              => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ImageDirSource
// ════════════════════════════════════════════════════════════════════════════

/// Replays PNG/JPEG files from a directory in file-name order.
pub struct ImageDirSource {
    files:  Vec<PathBuf>,
    next:   usize,
    repeat: bool,
}

impl ImageDirSource {
    /// Scan `dir`; fails if it holds no supported images.
    pub fn open<P: AsRef<Path>>(dir: P, repeat: bool) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && mime_for(p).is_some())
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(SourceError::NoFrames(dir.to_path_buf()));
        }
        Ok(ImageDirSource { files, next: 0, repeat })
    }

    pub fn len(&self) -> usize { self.files.len() }

    pub fn is_empty(&self) -> bool { self.files.is_empty() }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.next >= self.files.len() {
            if !self.repeat {
                return Ok(None);
            }
            self.next = 0;
        }
        let path = &self.files[self.next];
        self.next += 1;

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Only files with a known type were collected.
        let mime = mime_for(path).unwrap_or("application/octet-stream");

        Ok(Some(Frame { name, mime, bytes }))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_encodes_bytes() {
        let f = Frame { name: "f".into(), mime: "image/png", bytes: b"hi!".to_vec() };
        assert_eq!(f.data_url(), "data:image/png;base64,aGkh");
    }

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_for(Path::new("a/b.PNG")), Some("image/png"));
        assert_eq!(mime_for(Path::new("c.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("notes.txt")), None);
        assert_eq!(mime_for(Path::new("noext")), None);
    }

    #[test]
    fn directory_replayed_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("002.png"), b"two").unwrap();
        std::fs::write(dir.path().join("001.jpg"), b"one").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"skip").unwrap();

        let mut src = ImageDirSource::open(dir.path(), false).unwrap();
        assert_eq!(src.len(), 2);
        let first = src.next_frame().unwrap().unwrap();
        assert_eq!((first.name.as_str(), first.mime), ("001.jpg", "image/jpeg"));
        assert_eq!(src.next_frame().unwrap().unwrap().bytes, b"two");
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn repeat_wraps_around() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"a").unwrap();
        let mut src = ImageDirSource::open(dir.path(), true).unwrap();
        for _ in 0..3 {
            assert_eq!(src.next_frame().unwrap().unwrap().name, "a.png");
        }
    }

    #[test]
    fn empty_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageDirSource::open(dir.path(), false),
            Err(SourceError::NoFrames(_))
        ));
    }
}
