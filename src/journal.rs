use crate::chart::MoodChart;
use crate::models::{Collection, Story};
use crate::mood::{MoodCounts, MoodFilter};
use crate::orientation::{is_probeable, Orientation};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

const MAX_NOTICES: usize = 5;

/// Proof that a selection was started; only the most recent ticket may
/// complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    token: u64,
    collection: Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoLayout {
    Pending,
    Ready(Orientation),
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: &'static str,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

impl Notice {
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Local::now(),
        }
    }
}

/// Client-side journal state: collections, the selected collection and its
/// cached stories, and the chart derived from them.
#[derive(Debug, Default)]
pub struct Journal {
    collections: Vec<Collection>,
    selected: Option<Collection>,
    stories: Vec<Story>,
    chart: MoodChart,
    selection_token: u64,
    pending_selection: Option<u64>,
    photo_layouts: HashMap<String, PhotoLayout>,
    notices: VecDeque<Notice>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, id: u64) -> Option<&Collection> {
        self.collections.iter().find(|collection| collection.id == id)
    }

    pub fn replace_collections(&mut self, collections: Vec<Collection>) {
        self.collections = collections;
    }

    pub fn add_collection(&mut self, collection: Collection) {
        match self.collections.iter_mut().find(|existing| existing.id == collection.id) {
            Some(existing) => *existing = collection,
            None => self.collections.push(collection),
        }
    }

    pub fn selected(&self) -> Option<&Collection> {
        self.selected.as_ref()
    }

    /// 0 when nothing is selected.
    pub fn selected_id(&self) -> u64 {
        self.selected.as_ref().map_or(0, |collection| collection.id)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn filtered_stories(&self, filter: &MoodFilter) -> Vec<&Story> {
        filter.apply(&self.stories)
    }

    pub fn story(&self, id: u64) -> Option<&Story> {
        self.stories.iter().find(|story| story.id == id)
    }

    pub fn chart(&self) -> &MoodChart {
        &self.chart
    }

    /// Starts selecting `collection`, superseding any selection in flight.
    pub fn begin_selection(&mut self, collection: Collection) -> SelectionTicket {
        self.selection_token += 1;
        self.pending_selection = Some(collection.id);
        SelectionTicket {
            token: self.selection_token,
            collection,
        }
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        ticket.token == self.selection_token
    }

    /// Applies the fetched story list for `ticket`. Returns false, leaving
    /// the state untouched, when a newer selection has started since.
    pub fn complete_selection(&mut self, ticket: SelectionTicket, all_stories: Vec<Story>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        let id = ticket.collection.id;
        self.pending_selection = None;
        self.selected = Some(ticket.collection);
        self.stories = all_stories
            .into_iter()
            .filter(|story| story.collection_id == id)
            .collect();
        self.prune_photo_layouts();
        self.refresh_chart();
        true
    }

    /// Adds a freshly created story if it belongs to the selected collection.
    pub fn add_story(&mut self, story: Story) -> bool {
        if self.selected_id() == 0 || story.collection_id != self.selected_id() {
            return false;
        }
        match self.stories.iter_mut().find(|existing| existing.id == story.id) {
            Some(existing) => *existing = story,
            None => self.stories.push(story),
        }
        self.refresh_chart();
        true
    }

    /// Replaces a cached story with the backend's version of it.
    pub fn replace_story(&mut self, story: Story) -> bool {
        if story.collection_id != self.selected_id() {
            return false;
        }
        let Some(existing) = self.stories.iter_mut().find(|existing| existing.id == story.id) else {
            return false;
        };
        *existing = story;
        self.refresh_chart();
        true
    }

    /// Applies a confirmed deletion. Returns true when the deleted
    /// collection was the selected one, in which case the header, story
    /// cache and chart are cleared.
    pub fn remove_collection(&mut self, id: u64) -> bool {
        self.collections.retain(|collection| collection.id != id);

        if self.pending_selection == Some(id) {
            self.selection_token += 1;
            self.pending_selection = None;
        }

        if self.selected_id() != id {
            return false;
        }
        self.selected = None;
        self.stories.clear();
        self.photo_layouts.clear();
        self.chart.reset();
        true
    }

    /// Drops layouts for photos no longer referenced by a cached story.
    fn prune_photo_layouts(&mut self) {
        let live: HashSet<&str> = self
            .stories
            .iter()
            .map(|story| story.photo_url.trim())
            .collect();
        self.photo_layouts.retain(|url, _| live.contains(url.as_str()));
    }

    /// Photo URLs of cached stories that have not been probed yet. They are
    /// marked pending so each URL is probed once.
    pub fn take_unprobed_photos(&mut self) -> Vec<String> {
        let mut urls = Vec::new();
        for story in &self.stories {
            let url = story.photo_url.trim();
            if !is_probeable(url) || self.photo_layouts.contains_key(url) {
                continue;
            }
            self.photo_layouts.insert(url.to_string(), PhotoLayout::Pending);
            urls.push(url.to_string());
        }
        urls
    }

    /// Stores a probe result. Results for photos that were pruned while the
    /// probe was in flight are dropped.
    pub fn record_photo(&mut self, url: &str, orientation: Option<Orientation>) {
        let Some(layout) = self.photo_layouts.get_mut(url.trim()) else {
            return;
        };
        *layout = match orientation {
            Some(orientation) => PhotoLayout::Ready(orientation),
            None => PhotoLayout::Unavailable,
        };
    }

    pub fn photo_layout(&self, url: &str) -> Option<PhotoLayout> {
        self.photo_layouts.get(url.trim()).copied()
    }

    pub fn notify(&mut self, notice: Notice) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.iter().cloned().collect()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn refresh_chart(&mut self) {
        let counts = MoodCounts::for_collection(&self.stories, self.selected_id());
        self.chart.update(&counts);
    }
}
