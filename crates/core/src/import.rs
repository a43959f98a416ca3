//! Turning local image files into gallery photos.
//!
//! A batch upload is a list of [`UploadDraft`]s with editable metadata. Each
//! draft's file is embedded as a `data:` URI so the photo needs nothing but
//! the store to display.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use walkdir::WalkDir;

use crate::domain::{Comment, NewPhoto, PhotoSize};
use crate::error::{Error, Result};

const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Progress events for [`crate::Album::import`].
pub enum ImportProgress {
    /// Emitted before conversion starts; `total` drafts will each be added
    /// or reported failed.
    Start { total: usize },
    /// A photo was added to the gallery.
    Added { path: PathBuf, id: i64 },
    /// A file could not be read or encoded and was skipped.
    Failed { path: PathBuf, error: String },
    /// Import completed.
    Complete { added: usize, failed: usize },
}

/// One pending upload with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDraft {
    pub path: PathBuf,
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Becomes the photo's first comment when non-empty.
    pub caption: String,
    pub size: PhotoSize,
}

impl UploadDraft {
    /// Build the photo to insert, given the file's data URI.
    pub fn into_new_photo(self, url: String) -> NewPhoto {
        let comments = if self.caption.is_empty() {
            Vec::new()
        } else {
            vec![Comment {
                id: chrono::Utc::now().timestamp_millis(),
                text: self.caption,
                date: chrono::Utc::now().to_rfc3339(),
            }]
        };
        NewPhoto {
            url,
            title: self.title,
            size: self.size,
            date: Some(self.date),
            likes: None,
            comments: Some(comments),
        }
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Recursively find supported image files under `dir`, in path order.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::ImportDirNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Default metadata for a file: title from the file name, date from EXIF
/// (today otherwise), tile size from the pixel dimensions.
pub fn draft_upload(path: &Path) -> Result<UploadDraft> {
    if !is_supported_image(path) {
        return Err(Error::UnsupportedFormat(path.to_path_buf()));
    }

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let date = exif_date(path)
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());

    let size = match image::image_dimensions(path) {
        Ok((w, h)) => PhotoSize::from_dimensions(w, h),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not read dimensions");
            PhotoSize::Medium
        }
    };

    Ok(UploadDraft {
        path: path.to_path_buf(),
        title,
        date,
        caption: String::new(),
        size,
    })
}

/// Read a file and encode it as `data:<mime>;base64,<payload>`.
pub fn read_data_uri(path: &Path) -> Result<String> {
    let format =
        ImageFormat::from_path(path).map_err(|_| Error::UnsupportedFormat(path.to_path_buf()))?;
    let bytes = fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Capture date (`DateTimeOriginal`, then `DateTime`) as `YYYY-MM-DD`.
fn exif_date(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .iter()
        .filter_map(|tag| exif.get_field(*tag, exif::In::PRIMARY))
        .find_map(|field| match field.value {
            exif::Value::Ascii(ref parts) => parts
                .first()
                .and_then(|raw| exif::DateTime::from_ascii(raw).ok())
                .map(|dt| format!("{:04}-{:02}-{:02}", dt.year, dt.month, dt.day)),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 7) as u8, (y * 5) as u8, 128])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a/b.JPG")));
        assert!(is_supported_image(Path::new("b.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_images_recurses_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("2024/summer");
        fs::create_dir_all(&nested).unwrap();
        write_png(&tmp.path().join("b.png"), 4, 4);
        write_png(&tmp.path().join("a.png"), 4, 4);
        write_png(&nested.join("beach.png"), 4, 4);
        fs::write(tmp.path().join("readme.txt"), b"skip me").unwrap();

        let files = collect_images(tmp.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2024/summer/beach.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_collect_images_missing_dir() {
        let err = collect_images(Path::new("/nonexistent/album")).unwrap_err();
        assert!(matches!(err, Error::ImportDirNotFound(_)));
    }

    #[test]
    fn test_draft_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Grandpa at the lake.png");
        write_png(&path, 32, 16);

        let draft = draft_upload(&path).unwrap();
        assert_eq!(draft.title, "Grandpa at the lake");
        assert_eq!(draft.size, PhotoSize::Wide);
        assert!(draft.caption.is_empty());
        // No EXIF in a generated PNG: today's date.
        assert!(chrono::NaiveDate::parse_from_str(&draft.date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_draft_tall_image() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("portrait.png");
        write_png(&path, 10, 30);
        assert_eq!(draft_upload(&path).unwrap().size, PhotoSize::Tall);
    }

    #[test]
    fn test_draft_rejects_unsupported() {
        let err = draft_upload(Path::new("clip.mov")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_read_data_uri() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dot.png");
        write_png(&path, 1, 1);

        let uri = read_data_uri(&path).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let payload = uri.split_once(',').unwrap().1;
        assert_eq!(STANDARD.decode(payload).unwrap(), fs::read(&path).unwrap());
    }

    #[test]
    fn test_read_data_uri_missing_file() {
        assert!(read_data_uri(Path::new("/nonexistent/dot.png")).is_err());
    }

    #[test]
    fn test_into_new_photo_caption_becomes_comment() {
        let draft = UploadDraft {
            path: PathBuf::from("x.png"),
            title: "x".into(),
            date: "2025-08-15".into(),
            caption: "first swim".into(),
            size: PhotoSize::Large,
        };
        let photo = draft.clone().into_new_photo("data:image/png;base64,AA==".into());
        assert_eq!(photo.comments.as_ref().unwrap()[0].text, "first swim");
        assert_eq!(photo.date.as_deref(), Some("2025-08-15"));
        assert_eq!(photo.size, PhotoSize::Large);

        let bare = UploadDraft {
            caption: String::new(),
            ..draft
        }
        .into_new_photo(String::new());
        assert!(bare.comments.unwrap().is_empty());
    }
}
