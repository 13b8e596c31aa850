use crate::models::Story;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const MOOD_COUNT: usize = 8;

/// The fixed mood taxonomy. Declaration order is the chart slice order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Angry,
    Hungry,
    Happy,
    Ambitious,
    Brooding,
    Sad,
    Playful,
    Stoic,
}

impl Mood {
    pub const ALL: [Mood; MOOD_COUNT] = [
        Mood::Angry,
        Mood::Hungry,
        Mood::Happy,
        Mood::Ambitious,
        Mood::Brooding,
        Mood::Sad,
        Mood::Playful,
        Mood::Stoic,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Mood::Angry => "Angry",
            Mood::Hungry => "Hungry",
            Mood::Happy => "Happy",
            Mood::Ambitious => "Ambitious",
            Mood::Brooding => "Brooding",
            Mood::Sad => "Sad",
            Mood::Playful => "Playful",
            Mood::Stoic => "Stoic",
        }
    }

    /// Display color token used for card accents and CSS classes.
    pub fn color(self) -> &'static str {
        match self {
            Mood::Angry => "red",
            Mood::Hungry => "orange",
            Mood::Happy => "yellow",
            Mood::Ambitious => "green",
            Mood::Brooding => "teal",
            Mood::Sad => "blue",
            Mood::Playful => "purple",
            Mood::Stoic => "pink",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Mood::Angry => (220, 20, 60),
            Mood::Hungry => (255, 127, 80),
            Mood::Happy => (255, 228, 181),
            Mood::Ambitious => (0, 250, 154),
            Mood::Brooding => (0, 255, 255),
            Mood::Sad => (100, 149, 237),
            Mood::Playful => (138, 43, 226),
            Mood::Stoic => (255, 105, 180),
        }
    }

    pub fn rgba(self, alpha: f32) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r}, {g}, {b}, {alpha})")
    }

    pub fn chart_fill(self) -> String {
        self.rgba(0.3)
    }

    pub fn chart_border(self) -> String {
        self.rgba(1.0)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood '{}'", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownMood(value.to_string()))
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-mood story counts in `Mood::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MoodCounts([u32; MOOD_COUNT]);

impl MoodCounts {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Counts the stories belonging to `collection_id`. Id 0 means no
    /// collection is selected and always yields zeros.
    pub fn for_collection(stories: &[Story], collection_id: u64) -> Self {
        let mut counts = Self::zero();
        if collection_id == 0 {
            return counts;
        }
        for story in stories.iter().filter(|story| story.collection_id == collection_id) {
            counts.0[story.mood.index()] = counts.0[story.mood.index()].saturating_add(1);
        }
        counts
    }

    pub fn get(&self, mood: Mood) -> u32 {
        self.0[mood.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<[u32; MOOD_COUNT]> for MoodCounts {
    fn from(values: [u32; MOOD_COUNT]) -> Self {
        Self(values)
    }
}

/// Which stories of the selected collection are shown as cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodFilter {
    #[default]
    All,
    Only(Mood),
}

impl MoodFilter {
    pub fn apply<'a>(&self, stories: &'a [Story]) -> Vec<&'a Story> {
        match self {
            MoodFilter::All => stories.iter().collect(),
            MoodFilter::Only(mood) => stories.iter().filter(|story| story.mood == *mood).collect(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodFilter::All => "all",
            MoodFilter::Only(mood) => mood.name(),
        }
    }
}

impl FromStr for MoodFilter {
    type Err = UnknownMood;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(MoodFilter::All);
        }
        trimmed.parse().map(MoodFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, mood: Mood, collection_id: u64) -> Story {
        Story {
            id,
            content: format!("story {id}"),
            mood,
            mood_rating: 3,
            photo_url: String::new(),
            collection_id,
        }
    }

    #[test]
    fn parses_moods_case_insensitively() {
        assert_eq!("Angry".parse::<Mood>().unwrap(), Mood::Angry);
        assert_eq!("stoic".parse::<Mood>().unwrap(), Mood::Stoic);
        assert_eq!(" PLAYFUL ".parse::<Mood>().unwrap(), Mood::Playful);
        assert!("grumpy".parse::<Mood>().is_err());
    }

    #[test]
    fn slice_order_is_stable() {
        let names: Vec<_> = Mood::ALL.iter().map(|mood| mood.name()).collect();
        assert_eq!(
            names,
            ["Angry", "Hungry", "Happy", "Ambitious", "Brooding", "Sad", "Playful", "Stoic"]
        );
        for (index, mood) in Mood::ALL.iter().enumerate() {
            assert_eq!(mood.index(), index);
        }
    }

    #[test]
    fn aggregate_counts_only_selected_collection() {
        let stories = vec![
            story(1, Mood::Angry, 1),
            story(2, Mood::Happy, 1),
            story(3, Mood::Angry, 2),
        ];
        let counts = MoodCounts::for_collection(&stories, 1);
        assert_eq!(counts.as_slice(), &[1, 0, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn aggregate_sum_matches_collection_size() {
        let stories: Vec<Story> = (0..40)
            .map(|i| story(i, Mood::ALL[(i as usize * 7) % MOOD_COUNT], i % 3 + 1))
            .collect();
        for collection_id in 1..=3 {
            let counts = MoodCounts::for_collection(&stories, collection_id);
            let expected = stories
                .iter()
                .filter(|story| story.collection_id == collection_id)
                .count() as u32;
            assert_eq!(counts.total(), expected);
            for mood in Mood::ALL {
                let per_mood = stories
                    .iter()
                    .filter(|story| story.collection_id == collection_id && story.mood == mood)
                    .count() as u32;
                assert_eq!(counts.get(mood), per_mood);
            }
        }
    }

    #[test]
    fn aggregate_without_selection_is_zero() {
        let stories = vec![story(1, Mood::Sad, 0), story(2, Mood::Sad, 4)];
        assert_eq!(MoodCounts::for_collection(&stories, 0), MoodCounts::zero());
        assert_eq!(MoodCounts::for_collection(&stories, 9), MoodCounts::zero());
    }

    #[test]
    fn filter_all_returns_everything() {
        let stories = vec![story(1, Mood::Sad, 1), story(2, Mood::Happy, 1)];
        let filter: MoodFilter = "all".parse().unwrap();
        let ids: Vec<_> = filter.apply(&stories).iter().map(|story| story.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!("".parse::<MoodFilter>().unwrap(), MoodFilter::All);
    }

    #[test]
    fn filter_by_mood_ignores_case() {
        let stories = vec![
            story(1, Mood::Sad, 1),
            story(2, Mood::Happy, 1),
            story(3, Mood::Sad, 1),
        ];
        let filter: MoodFilter = "sAd".parse().unwrap();
        let ids: Vec<_> = filter.apply(&stories).iter().map(|story| story.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(filter.as_str(), "Sad");
    }

    #[test]
    fn mood_serde_uses_canonical_names() {
        let mood: Mood = serde_json::from_str("\"brooding\"").unwrap();
        assert_eq!(mood, Mood::Brooding);
        assert_eq!(serde_json::to_string(&mood).unwrap(), "\"Brooding\"");
        assert!(serde_json::from_str::<Mood>("\"meh\"").is_err());
    }
}
