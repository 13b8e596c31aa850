use crate::chart::ChartData;
use crate::journal::{Journal, Notice, PhotoLayout};
use crate::models::{Collection, Story, MOOD_RATING_MAX};
use crate::mood::{Mood, MoodFilter};
use crate::orientation::Orientation;
use serde::Serialize;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this collection?";

#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
    pub url: String,
    pub orientation: Option<Orientation>,
    pub pending: bool,
    pub background_size: &'static str,
    pub padding: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryCard {
    pub id: u64,
    pub content: String,
    pub mood: Mood,
    pub color: &'static str,
    pub mood_rating: u8,
    /// Mood color whose intensity follows the rating.
    pub accent: String,
    pub photo: PhotoView,
    pub reverse_action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionRow {
    pub id: u64,
    pub name: String,
    pub selected: bool,
    pub select_action: String,
    pub delete_action: String,
    pub delete_prompt: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionHeader {
    pub id: u64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalView {
    pub collections: Vec<CollectionRow>,
    pub header: Option<CollectionHeader>,
    pub selected_collection_id: u64,
    pub mood_filter: &'static str,
    pub stories: Vec<StoryCard>,
    pub chart: ChartData,
    pub notices: Vec<Notice>,
}

pub fn story_card(story: &Story, layout: Option<PhotoLayout>) -> StoryCard {
    let orientation = match layout {
        Some(PhotoLayout::Ready(orientation)) => Some(orientation),
        _ => None,
    };
    let style = orientation.unwrap_or(Orientation::Square);
    let rating = story.mood_rating.min(MOOD_RATING_MAX);
    let alpha = 0.15 + 0.85 * f32::from(rating) / f32::from(MOOD_RATING_MAX);

    StoryCard {
        id: story.id,
        content: story.content.clone(),
        mood: story.mood,
        color: story.mood.color(),
        mood_rating: story.mood_rating,
        accent: story.mood.rgba((alpha * 100.0).round() / 100.0),
        photo: PhotoView {
            url: story.photo_url.clone(),
            orientation,
            pending: matches!(layout, Some(PhotoLayout::Pending)),
            background_size: style.background_size(),
            padding: style.padding(),
        },
        reverse_action: format!("/stories/{}/reverse", story.id),
    }
}

pub fn collection_row(collection: &Collection, selected: bool) -> CollectionRow {
    CollectionRow {
        id: collection.id,
        name: collection.name.clone(),
        selected,
        select_action: format!("/collections/{}/select", collection.id),
        delete_action: format!("/collections/{}/delete", collection.id),
        delete_prompt: DELETE_PROMPT,
    }
}

pub fn collection_header(collection: &Collection) -> CollectionHeader {
    CollectionHeader {
        id: collection.id,
        name: collection.name.clone(),
        description: collection.description.clone(),
    }
}

/// Builds the whole page model. Notices are passed in because reading them
/// consumes them.
pub fn journal_view(journal: &Journal, filter: &MoodFilter, notices: Vec<Notice>) -> JournalView {
    let selected_id = journal.selected_id();
    JournalView {
        collections: journal
            .collections()
            .iter()
            .map(|collection| collection_row(collection, collection.id == selected_id))
            .collect(),
        header: journal.selected().map(collection_header),
        selected_collection_id: selected_id,
        mood_filter: filter.as_str(),
        stories: journal
            .filtered_stories(filter)
            .into_iter()
            .map(|story| story_card(story, journal.photo_layout(&story.photo_url)))
            .collect(),
        chart: journal.chart().dataset(),
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(mood: Mood, rating: u8) -> Story {
        Story {
            id: 7,
            content: "Rain on the window".into(),
            mood,
            mood_rating: rating,
            photo_url: "https://photos.test/rain.jpg".into(),
            collection_id: 1,
        }
    }

    #[test]
    fn card_carries_mood_and_rating() {
        let card = story_card(&story(Mood::Brooding, 9), None);
        assert_eq!(card.mood, Mood::Brooding);
        assert_eq!(card.color, "teal");
        assert_eq!(card.mood_rating, 9);
        assert_eq!(card.accent, "rgba(0, 255, 255, 1)");
        assert_eq!(card.reverse_action, "/stories/7/reverse");
    }

    #[test]
    fn card_photo_uses_probed_orientation() {
        let layout = PhotoLayout::Ready(Orientation::Portrait);
        let card = story_card(&story(Mood::Sad, 3), Some(layout));
        assert_eq!(card.photo.orientation, Some(Orientation::Portrait));
        assert_eq!(card.photo.background_size, "contain");
        assert_eq!(card.photo.padding, "16px 9px");
        assert!(!card.photo.pending);

        let pending = story_card(&story(Mood::Sad, 3), Some(PhotoLayout::Pending));
        assert!(pending.photo.pending);
        assert_eq!(pending.photo.orientation, None);
        assert_eq!(pending.photo.padding, "8px");
    }

    #[test]
    fn row_actions_are_separate() {
        let collection = Collection {
            id: 3,
            name: "Road trip".into(),
            description: "June".into(),
        };
        let row = collection_row(&collection, true);
        assert!(row.selected);
        assert_eq!(row.select_action, "/collections/3/select");
        assert_eq!(row.delete_action, "/collections/3/delete");
        assert_eq!(row.delete_prompt, DELETE_PROMPT);
    }

    #[test]
    fn view_without_selection_is_empty() {
        let mut journal = Journal::new();
        journal.replace_collections(vec![Collection {
            id: 1,
            name: "A".into(),
            description: String::new(),
        }]);
        let view = journal_view(&journal, &MoodFilter::All, Vec::new());
        assert_eq!(view.collections.len(), 1);
        assert!(!view.collections[0].selected);
        assert!(view.header.is_none());
        assert_eq!(view.selected_collection_id, 0);
        assert!(view.stories.is_empty());
        assert_eq!(view.chart.data, vec![0; 8]);
        assert_eq!(view.mood_filter, "all");
    }
}
