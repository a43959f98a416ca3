use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use familyalbum_core::domain::{HeroPatch, NewTimelineEvent, TimelineEventPatch};
use familyalbum_core::Album;

use super::photos::display_url;

pub fn timeline(album: &Album) {
    let events = album.content().timeline();
    if events.is_empty() {
        println!("No timeline events yet.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Date"),
        Cell::new("Title"),
        Cell::new("Description"),
        Cell::new("Image"),
    ]);

    for event in events {
        table.add_row(vec![
            Cell::new(event.id),
            Cell::new(&event.date),
            Cell::new(&event.title),
            Cell::new(&event.desc),
            Cell::new(event.img.as_deref().map(display_url).unwrap_or_default()),
        ]);
    }

    println!("{table}");
}

pub fn add_event(album: &mut Album, date: String, title: String, desc: String, img: Option<String>) {
    let event = album.content_mut().add_timeline_event(NewTimelineEvent {
        date,
        title,
        desc,
        img,
    });
    println!("Added event {} ({} on {})", event.id, event.title, event.date);
}

pub fn edit_event(
    album: &mut Album,
    id: i64,
    date: Option<String>,
    title: Option<String>,
    desc: Option<String>,
    img: Option<String>,
) -> Result<()> {
    let patch = TimelineEventPatch {
        date,
        title,
        desc,
        img,
    };
    if !album.content_mut().update_timeline_event(id, patch) {
        bail!("no timeline event with id {id}");
    }
    println!("Updated event {id}");
    Ok(())
}

pub fn rm_event(album: &mut Album, id: i64) -> Result<()> {
    if !album.content_mut().delete_timeline_event(id) {
        bail!("no timeline event with id {id}");
    }
    println!("Deleted event {id}");
    Ok(())
}

pub fn hero(album: &Album) {
    let hero = album.content().hero();
    println!();
    println!("  {}", hero.title);
    println!("  {}", hero.subtitle);
    println!();
    println!("   Image: {}", display_url(&hero.image));
    println!();
}

pub fn set_hero(
    album: &mut Album,
    title: Option<String>,
    subtitle: Option<String>,
    image: Option<String>,
) {
    if title.is_none() && subtitle.is_none() && image.is_none() {
        println!("Nothing to change.");
        return;
    }
    album.content_mut().update_hero(HeroPatch {
        title,
        subtitle,
        image,
    });
    println!("Banner updated.");
}
