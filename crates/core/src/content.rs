use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::defaults;
use crate::domain::{
    next_id, HeroContent, HeroPatch, NewTimelineEvent, TimelineEvent, TimelineEventPatch,
};
use crate::store::{keys, load, load_or_warn, persist, KeyValueStore};

/// Homepage copy: the hero banner and the family timeline.
pub struct ContentDirectory {
    store: Arc<dyn KeyValueStore>,
    hero: HeroContent,
    timeline: Vec<TimelineEvent>,
}

impl ContentDirectory {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let hero = load_or_warn(store.as_ref(), keys::HERO).unwrap_or_else(defaults::hero);

        let timeline = match load::<Vec<TimelineEvent>>(store.as_ref(), keys::TIMELINE) {
            Ok(Some(events)) => events,
            Ok(None) => {
                let events = defaults::timeline();
                persist(store.as_ref(), keys::TIMELINE, &events);
                tracing::info!(count = events.len(), "seeded sample timeline");
                events
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load timeline");
                Vec::new()
            }
        };

        Self {
            store,
            hero,
            timeline,
        }
    }

    pub fn hero(&self) -> &HeroContent {
        &self.hero
    }

    /// Events, most recent first.
    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    pub fn update_hero(&mut self, patch: HeroPatch) {
        if let Some(title) = patch.title {
            self.hero.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.hero.subtitle = subtitle;
        }
        if let Some(image) = patch.image {
            self.hero.image = image;
        }
        persist(self.store.as_ref(), keys::HERO, &self.hero);
    }

    pub fn add_timeline_event(&mut self, new: NewTimelineEvent) -> TimelineEvent {
        let event = TimelineEvent {
            id: next_id(self.timeline.iter().map(|e| e.id)),
            date: new.date,
            title: new.title,
            desc: new.desc,
            img: new.img,
        };
        self.timeline.insert(0, event.clone());
        self.sort_and_save();
        tracing::debug!(id = event.id, date = %event.date, "added timeline event");
        event
    }

    /// Returns false if there is no such event.
    pub fn update_timeline_event(&mut self, id: i64, patch: TimelineEventPatch) -> bool {
        let Some(event) = self.timeline.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(desc) = patch.desc {
            event.desc = desc;
        }
        if let Some(img) = patch.img {
            event.img = Some(img);
        }
        self.sort_and_save();
        true
    }

    /// Returns false if there is no such event.
    pub fn delete_timeline_event(&mut self, id: i64) -> bool {
        let before = self.timeline.len();
        self.timeline.retain(|e| e.id != id);
        if self.timeline.len() == before {
            return false;
        }
        persist(self.store.as_ref(), keys::TIMELINE, &self.timeline);
        true
    }

    fn sort_and_save(&mut self) {
        self.timeline
            .sort_by(|a, b| newest_first(parse_date(&a.date), parse_date(&b.date)));
        persist(self.store.as_ref(), keys::TIMELINE, &self.timeline);
    }
}

/// Accepts `YYYY-MM-DD` or RFC 3339.
fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

/// Descending; dates that do not parse go last.
fn newest_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
