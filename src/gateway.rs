use crate::errors::GatewayError;
use crate::models::{Collection, NewCollection, NewStory, Story, StoryContentPatch};
use reqwest::{header::ACCEPT, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

const LIST_STORIES: &str = "list stories";

/// Story records as returned by the backend, split into the ones that
/// decoded and the ones that did not.
#[derive(Debug, Default)]
pub struct StoryListing {
    pub stories: Vec<Story>,
    pub malformed: Vec<MalformedStory>,
}

#[derive(Debug)]
pub struct MalformedStory {
    /// `None` when the record does not even carry a readable collection id.
    pub collection_id: Option<u64>,
    pub source: serde_json::Error,
}

impl StoryListing {
    pub fn decode(records: Vec<Value>) -> Self {
        let mut listing = Self::default();
        for record in records {
            let collection_id = record.get("collection_id").and_then(Value::as_u64);
            match serde_json::from_value::<Story>(record) {
                Ok(story) => listing.stories.push(story),
                Err(source) => {
                    warn!(?collection_id, "skipping malformed story record: {source}");
                    listing.malformed.push(MalformedStory {
                        collection_id,
                        source,
                    });
                }
            }
        }
        listing
    }

    /// Stories of one collection. Fails with a data-shape error when any
    /// record of that collection could not be decoded; malformed records
    /// of other collections are ignored.
    pub fn for_collection(self, collection_id: u64) -> Result<Vec<Story>, GatewayError> {
        if let Some(bad) = self
            .malformed
            .into_iter()
            .find(|bad| bad.collection_id == Some(collection_id))
        {
            return Err(GatewayError::DataShape {
                operation: LIST_STORIES,
                source: bad.source,
            });
        }
        Ok(self
            .stories
            .into_iter()
            .filter(|story| story.collection_id == collection_id)
            .collect())
    }
}

/// Thin client for the journal's REST backend.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, GatewayError> {
        let request = self.client.get(self.url("/collections"));
        self.fetch_json("list collections", request).await
    }

    pub async fn create_collection(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Collection, GatewayError> {
        let body = NewCollection {
            name: name.to_string(),
            description: description.to_string(),
        };
        let request = self.client.post(self.url("/collections")).json(&body);
        self.fetch_json("create collection", request).await
    }

    pub async fn delete_collection(&self, id: u64) -> Result<(), GatewayError> {
        let request = self.client.delete(self.url(&format!("/collections/{id}")));
        self.send("delete collection", request).await?;
        Ok(())
    }

    /// Every story in the system. Records are decoded one by one so a bad
    /// record only spoils the collection it belongs to.
    pub async fn list_stories(&self) -> Result<StoryListing, GatewayError> {
        let request = self.client.get(self.url("/stories"));
        let records: Vec<Value> = self.fetch_json(LIST_STORIES, request).await?;
        Ok(StoryListing::decode(records))
    }

    pub async fn create_story(&self, story: &NewStory) -> Result<Story, GatewayError> {
        let request = self.client.post(self.url("/stories")).json(story);
        self.fetch_json("create story", request).await
    }

    pub async fn update_story_content(
        &self,
        id: u64,
        content: &str,
    ) -> Result<Story, GatewayError> {
        let body = StoryContentPatch {
            content: content.to_string(),
        };
        let request = self.client.patch(self.url(&format!("/stories/{id}"))).json(&body);
        self.fetch_json("update story", request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| {
                warn!("{operation} failed: {source}");
                GatewayError::Network { operation, source }
            })?;

        let status = response.status();
        debug!(%status, url = %response.url(), "{operation}");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.trim().chars().take(200).collect();
            warn!(%status, "{operation} rejected by backend");
            return Err(GatewayError::Server {
                operation,
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = self.send(operation, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Network { operation, source })?;
        serde_json::from_slice(&bytes).map_err(|source| {
            warn!("{operation} returned malformed data: {source}");
            GatewayError::DataShape { operation, source }
        })
    }
}
