use std::path::PathBuf;

use anyhow::{anyhow, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use familyalbum_core::domain::{NewPhoto, PhotoPatch, PhotoSize};
use familyalbum_core::import::{self, ImportProgress, UploadDraft};
use familyalbum_core::Album;
use indicatif::{ProgressBar, ProgressStyle};

/// Fields accepted by `album photos edit`.
pub struct EditArgs {
    pub title: Option<String>,
    pub size: Option<PhotoSize>,
    pub date: Option<String>,
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub caption: Option<String>,
}

/// Shorten long URLs (data URIs especially) for table display.
pub(crate) fn display_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("data:") {
        let mime = rest.split(';').next().unwrap_or("unknown");
        return format!("<embedded {mime}, {}>", super::status::format_size(url.len() as u64));
    }
    if url.chars().count() > 48 {
        let head: String = url.chars().take(45).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

/// Comment timestamps are stored as RFC 3339; show them in local time.
pub(crate) fn format_comment_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

pub fn list(album: &Album) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Title"),
        Cell::new("Size"),
        Cell::new("Date"),
        Cell::new("Likes"),
        Cell::new("Comments"),
        Cell::new("Source"),
    ]);

    for photo in album.photos().photos() {
        table.add_row(vec![
            Cell::new(photo.id),
            Cell::new(&photo.title),
            Cell::new(photo.size),
            Cell::new(photo.date.as_deref().unwrap_or("-")),
            Cell::new(photo.likes),
            Cell::new(photo.comments.len()),
            Cell::new(display_url(&photo.url)),
        ]);
    }

    println!("{table}");
}

pub fn show(album: &Album, id: i64) -> Result<()> {
    let photo = album
        .photos()
        .get(id)
        .ok_or_else(|| anyhow!("no photo with id {id}"))?;

    println!();
    println!("  {}", photo.title);
    println!("  {}", "-".repeat(photo.title.chars().count()));
    println!("   ID:     {}", photo.id);
    println!("   Size:   {}", photo.size);
    println!("   Date:   {}", photo.date.as_deref().unwrap_or("-"));
    println!("   Likes:  {}", photo.likes);
    println!("   Source: {}", display_url(&photo.url));
    println!();
    if photo.comments.is_empty() {
        println!("  No comments yet.");
    } else {
        println!("  Comments");
        for comment in &photo.comments {
            println!("   [{}] {}", format_comment_date(&comment.date), comment.text);
        }
    }
    println!();
    Ok(())
}

pub fn add(album: &mut Album, url: String, title: String, size: PhotoSize, date: Option<String>) {
    let photo = album.photos_mut().add_photo(NewPhoto {
        url,
        title,
        size,
        date,
        ..Default::default()
    });
    println!("Added photo {} ({})", photo.id, photo.title);
}

pub fn import(
    album: &mut Album,
    paths: &[PathBuf],
    caption: Option<String>,
    size: Option<PhotoSize>,
) -> Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(import::collect_images(path)?);
        } else {
            files.push(path.clone());
        }
    }

    let mut drafts: Vec<UploadDraft> = Vec::with_capacity(files.len());
    for file in &files {
        let mut draft = import::draft_upload(file)?;
        if let Some(ref caption) = caption {
            draft.caption = caption.clone();
        }
        if let Some(size) = size {
            draft.size = size;
        }
        drafts.push(draft);
    }

    if drafts.is_empty() {
        println!("No images found.");
        return Ok(());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message("Encoding photos...");

    album.import(
        drafts,
        Some(&mut |progress| match progress {
            ImportProgress::Start { total } => {
                pb.set_length(total as u64);
                pb.set_position(0);
                pb.set_message("Importing photos...");
            }
            ImportProgress::Added { path, .. } => {
                pb.inc(1);
                pb.set_message(format!("+ {}", path.display()));
            }
            ImportProgress::Failed { path, error } => {
                pb.inc(1);
                pb.println(format!("  skipped {}: {error}", path.display()));
            }
            ImportProgress::Complete { added, failed } => {
                pb.finish_with_message(format!("{added} added, {failed} failed"));
            }
        }),
    );

    println!("Import complete.");
    Ok(())
}

pub fn edit(album: &mut Album, id: i64, args: EditArgs) -> Result<()> {
    if album.photos().get(id).is_none() {
        return Err(anyhow!("no photo with id {id}"));
    }

    let url = match args.file {
        Some(file) => Some(import::read_data_uri(&file)?),
        None => args.url,
    };

    album.photos_mut().update_photo(
        id,
        PhotoPatch {
            url,
            title: args.title,
            size: args.size,
            date: args.date,
            comments: None,
        },
    );
    if let Some(caption) = args.caption {
        album.photos_mut().set_caption(id, &caption);
    }

    println!("Updated photo {id}");
    Ok(())
}

pub fn like(album: &mut Album, id: i64) -> Result<()> {
    let likes = album
        .photos_mut()
        .toggle_like(id)
        .ok_or_else(|| anyhow!("no photo with id {id}"))?;
    println!("♥ {likes}");
    Ok(())
}

pub fn comment(album: &mut Album, id: i64, text: &str) -> Result<()> {
    album
        .photos_mut()
        .add_comment(id, text)
        .ok_or_else(|| anyhow!("no photo with id {id}"))?;
    println!("Comment added.");
    Ok(())
}

pub fn rm(album: &mut Album, ids: &[i64]) {
    let removed = album.photos_mut().remove_photos(ids);
    println!("Removed {removed} of {} photo(s).", ids.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_url_short() {
        assert_eq!(display_url("https://a.b/c.jpg"), "https://a.b/c.jpg");
    }

    #[test]
    fn test_display_url_truncates_long() {
        let url = format!("https://images.example.com/{}", "x".repeat(80));
        let shown = display_url(&url);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 48);
    }

    #[test]
    fn test_format_comment_date_passes_through_unparsable() {
        assert_eq!(format_comment_date("last summer"), "last summer");
    }

    #[test]
    fn test_format_comment_date_rfc3339() {
        let shown = format_comment_date("2025-08-15T10:30:00+00:00");
        assert_eq!(shown.len(), "2025-08-15 10:30".len());
        assert!(shown.starts_with("2025-08-1"));
    }

    #[test]
    fn test_display_url_data_uri() {
        let uri = format!("data:image/png;base64,{}", "A".repeat(2000));
        assert_eq!(display_url(&uri), "<embedded image/png, 2.0 KB>");
    }
}
