use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use familyalbum_core::domain::{Photo, PhotoSize};
use familyalbum_core::Album;

/// Storage figures derived from the photo list.
#[derive(Debug, PartialEq)]
pub(crate) struct StorageStats {
    pub(crate) embedded_photos: usize,
    pub(crate) embedded_bytes: u64,
    pub(crate) linked_photos: usize,
}

/// Per-tile-size statistics.
#[derive(Debug, PartialEq)]
pub(crate) struct SizeStats {
    pub(crate) photo_count: usize,
    pub(crate) likes: u64,
}

pub(crate) fn compute_storage(photos: &[Photo]) -> StorageStats {
    let embedded: Vec<&Photo> = photos.iter().filter(|p| p.url.starts_with("data:")).collect();
    StorageStats {
        embedded_photos: embedded.len(),
        embedded_bytes: embedded.iter().map(|p| p.url.len() as u64).sum(),
        linked_photos: photos.len() - embedded.len(),
    }
}

pub(crate) fn compute_size_stats(photos: &[Photo]) -> BTreeMap<&'static str, SizeStats> {
    let mut stats: BTreeMap<&'static str, SizeStats> = BTreeMap::new();
    for photo in photos {
        let entry = stats.entry(photo.size.as_str()).or_insert(SizeStats {
            photo_count: 0,
            likes: 0,
        });
        entry.photo_count += 1;
        entry.likes += u64::from(photo.likes);
    }
    stats
}

pub fn run(album: &Album) {
    let stats = album.status();
    let photos = album.photos().photos();
    let storage = compute_storage(photos);
    let by_size = compute_size_stats(photos);
    let settings = album.settings().settings();

    let signed_in = match (album.session().authenticated, album.session().username()) {
        (true, Some(name)) => name.to_string(),
        (true, None) => "master key".to_string(),
        (false, _) => "nobody".to_string(),
    };

    // Overview
    println!();
    println!("  Family Album Status");
    println!("  ===================");
    println!();
    println!("  Overview");
    println!("  --------");
    println!(
        "   Photos:     {:>8}        Embedded:    {} ({})",
        stats.total_photos,
        storage.embedded_photos,
        format_size(storage.embedded_bytes)
    );
    println!(
        "   Likes:      {:>8}        Linked:      {}",
        stats.total_likes, storage.linked_photos
    );
    println!(
        "   Comments:   {:>8}        Theme:       {}",
        stats.total_comments, settings.theme
    );
    println!(
        "   Events:     {:>8}        Density:     {}",
        stats.total_events, settings.grid_density
    );
    println!(
        "   Users:      {:>8}        Signed in:   {}",
        stats.total_users, signed_in
    );

    // Tile sizes table
    let mut size_table = Table::new();
    size_table.load_preset(UTF8_FULL);
    size_table.set_content_arrangement(ContentArrangement::Dynamic);
    size_table.set_header(vec![Cell::new("Size"), Cell::new("Photos"), Cell::new("Likes")]);

    for size in [
        PhotoSize::Large,
        PhotoSize::Wide,
        PhotoSize::Tall,
        PhotoSize::Medium,
    ] {
        match by_size.get(size.as_str()) {
            Some(s) => size_table.add_row(vec![
                Cell::new(size),
                Cell::new(s.photo_count),
                Cell::new(s.likes),
            ]),
            None => size_table.add_row(vec![
                Cell::new(size),
                Cell::new(0).fg(Color::DarkGrey),
                Cell::new(0).fg(Color::DarkGrey),
            ]),
        };
    }

    println!();
    println!("  Tiles");
    println!("  -----");
    println!("{size_table}");

    println!();
    println!("  Run 'album photos' to show the full gallery.");
    println!();
}

pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_size ─────────────────────────────────────────────────

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_500_000), "1.4 MB");
    }

    #[test]
    fn test_format_size_gigabytes() {
        assert_eq!(format_size(1_073_741_824), "1.0 GB");
    }

    // ── Helper to build Photo for tests ─────────────────────────────

    fn make_photo(id: i64, url: &str, size: PhotoSize, likes: u32) -> Photo {
        Photo {
            id,
            url: url.to_string(),
            title: format!("photo {id}"),
            size,
            date: None,
            likes,
            comments: Vec::new(),
        }
    }

    // ── compute_storage ─────────────────────────────────────────────

    #[test]
    fn test_storage_empty() {
        assert_eq!(
            compute_storage(&[]),
            StorageStats {
                embedded_photos: 0,
                embedded_bytes: 0,
                linked_photos: 0,
            }
        );
    }

    #[test]
    fn test_storage_mixed() {
        let photos = vec![
            make_photo(1, "data:image/png;base64,AAAA", PhotoSize::Medium, 0),
            make_photo(2, "https://example.com/a.jpg", PhotoSize::Medium, 0),
            make_photo(3, "data:image/jpeg;base64,BB", PhotoSize::Wide, 0),
        ];
        let storage = compute_storage(&photos);
        assert_eq!(storage.embedded_photos, 2);
        assert_eq!(storage.linked_photos, 1);
        assert_eq!(storage.embedded_bytes, (26 + 25) as u64);
    }

    // ── compute_size_stats ──────────────────────────────────────────

    #[test]
    fn test_size_stats_empty() {
        assert!(compute_size_stats(&[]).is_empty());
    }

    #[test]
    fn test_size_stats_groups_by_size() {
        let photos = vec![
            make_photo(1, "u", PhotoSize::Wide, 3),
            make_photo(2, "u", PhotoSize::Wide, 4),
            make_photo(3, "u", PhotoSize::Tall, 1),
        ];
        let stats = compute_size_stats(&photos);

        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats["wide"],
            SizeStats {
                photo_count: 2,
                likes: 7,
            }
        );
        assert_eq!(stats["tall"].photo_count, 1);
        assert!(!stats.contains_key("large"));
    }
}
