//! In-process stand-in for the journal's REST backend.
#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use image::{ImageFormat, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct BackendData {
    pub collections: Vec<Value>,
    pub stories: Vec<Value>,
    pub next_id: u64,
    pub fail_stories: bool,
}

impl BackendData {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<BackendData>>;

pub struct MockBackend {
    pub base_url: String,
    pub data: Shared,
}

impl MockBackend {
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock backend");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().unwrap();
        let data: Shared = Arc::new(Mutex::new(BackendData::default()));
        let app = router(Arc::clone(&data));

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock backend runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("mock backend stopped");
            });
        });

        Self {
            base_url: format!("http://{addr}"),
            data,
        }
    }

    pub fn seed_collection(&self, name: &str, description: &str) -> u64 {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        data.collections
            .push(json!({ "id": id, "name": name, "description": description }));
        id
    }

    /// `story` is stored as given plus a fresh id.
    pub fn seed_story(&self, mut story: Value) -> u64 {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        story["id"] = json!(id);
        data.stories.push(story);
        id
    }

    pub fn photo_url(&self, width: u32, height: u32) -> String {
        format!("{}/photos/{width}x{height}.png", self.base_url)
    }

    pub fn set_fail_stories(&self, fail: bool) {
        self.data.lock().unwrap().fail_stories = fail;
    }

    pub fn collection_ids(&self) -> Vec<u64> {
        self.data
            .lock()
            .unwrap()
            .collections
            .iter()
            .filter_map(|collection| collection["id"].as_u64())
            .collect()
    }
}

fn router(data: Shared) -> Router {
    Router::new()
        .route("/collections", get(list_collections).post(create_collection))
        .route("/collections/:id", axum::routing::delete(delete_collection))
        .route("/stories", get(list_stories).post(create_story))
        .route("/stories/:id", axum::routing::patch(update_story))
        .route("/photos/:name", get(photo))
        .route("/blobs/:size", get(blob))
        .with_state(data)
}

async fn list_collections(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(data.lock().unwrap().collections.clone())
}

async fn create_collection(
    State(data): State<Shared>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut data = data.lock().unwrap();
    body["id"] = json!(data.next_id());
    data.collections.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn delete_collection(
    State(data): State<Shared>,
    Path(id): Path<u64>,
) -> (StatusCode, Json<Value>) {
    let mut data = data.lock().unwrap();
    let before = data.collections.len();
    data.collections.retain(|collection| collection["id"].as_u64() != Some(id));
    if data.collections.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({})))
}

async fn list_stories(State(data): State<Shared>) -> Response {
    let data = data.lock().unwrap();
    if data.fail_stories {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(data.stories.clone()).into_response()
}

async fn create_story(
    State(data): State<Shared>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut data = data.lock().unwrap();
    body["id"] = json!(data.next_id());
    data.stories.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_story(
    State(data): State<Shared>,
    Path(id): Path<u64>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut data = data.lock().unwrap();
    let story = data
        .stories
        .iter_mut()
        .find(|story| story["id"].as_u64() == Some(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(content) = patch.get("content") {
        story["content"] = content.clone();
    }
    Ok(Json(story.clone()))
}

/// Serves a blank PNG sized by its name, e.g. `/photos/1600x900.png`.
async fn photo(
    Path(name): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], Bytes), StatusCode> {
    let dims = name.strip_suffix(".png").ok_or(StatusCode::NOT_FOUND)?;
    let (width, height) = dims.split_once('x').ok_or(StatusCode::NOT_FOUND)?;
    let width: u32 = width.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    let height: u32 = height.parse().map_err(|_| StatusCode::NOT_FOUND)?;

    let mut out = Cursor::new(Vec::new());
    RgbImage::new(width, height)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], Bytes::from(out.into_inner())))
}

/// `size` zero bytes, served with a matching Content-Length.
async fn blob(Path(size): Path<usize>) -> Bytes {
    Bytes::from(vec![0u8; size])
}

pub fn pick_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
