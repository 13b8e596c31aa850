use crate::mood::Mood;
use serde::{Deserialize, Deserializer, Serialize};

pub const MOOD_RATING_MIN: u8 = 1;
pub const MOOD_RATING_MAX: u8 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub content: String,
    pub mood: Mood,
    #[serde(deserialize_with = "rating_from_number_or_string")]
    pub mood_rating: u8,
    #[serde(default)]
    pub photo_url: String,
    pub collection_id: u64,
}

/// Body of `POST /collections`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /stories`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStory {
    pub content: String,
    pub mood: Mood,
    pub mood_rating: u8,
    pub photo_url: String,
    pub collection_id: u64,
}

/// Body of `PATCH /stories/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct StoryContentPatch {
    pub content: String,
}

/// Story creation input from the page form or the JSON API. The collection
/// is always the selected one.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryForm {
    pub content: String,
    pub mood: String,
    #[serde(deserialize_with = "rating_from_number_or_string")]
    pub mood_rating: u8,
    #[serde(default)]
    pub photo_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirmed: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub mood: Option<String>,
}

pub fn reverse_content(content: &str) -> String {
    content.chars().rev().collect()
}

fn rating_from_number_or_string<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(number) => number,
        Raw::Text(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                serde::de::Error::custom(format!("mood_rating '{text}' is not a number"))
            })?,
    };
    u8::try_from(value)
        .map_err(|_| serde::de::Error::custom(format!("mood_rating {value} is out of range")))
}
