use crate::chart::ChartData;
use crate::errors::AppError;
use crate::journal::{Journal, Notice};
use crate::models::{
    reverse_content, Collection, DeleteForm, DeleteQuery, FilterQuery, NewCollection, NewStory,
    Story, StoryForm, MOOD_RATING_MAX, MOOD_RATING_MIN,
};
use crate::mood::{Mood, MoodFilter};
use crate::orientation::probe_photo;
use crate::state::AppState;
use crate::ui::render_index;
use crate::views::{journal_view, JournalView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Html<String> {
    let filter = match parse_filter(&query) {
        Ok(filter) => filter,
        Err(err) => {
            notify(&state, err).await;
            MoodFilter::All
        }
    };

    if let Err(err) = refresh_collections(&state).await {
        notify(&state, err).await;
    }

    let mut journal = state.journal.lock().await;
    let notices = journal.take_notices();
    Html(render_index(&journal_view(&journal, &filter, notices)))
}

pub async fn form_create_collection(
    State(state): State<AppState>,
    Form(input): Form<NewCollection>,
) -> Redirect {
    if let Err(err) = apply_create_collection(&state, input).await {
        notify(&state, err).await;
    }
    Redirect::to("/")
}

pub async fn form_select_collection(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Redirect {
    if let Err(err) = apply_select_collection(&state, id).await {
        notify(&state, err).await;
    }
    Redirect::to("/")
}

pub async fn form_delete_collection(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<DeleteForm>,
) -> Redirect {
    let confirmed = form.confirmed.trim().eq_ignore_ascii_case("yes");
    if let Err(err) = apply_delete_collection(&state, id, confirmed).await {
        notify(&state, err).await;
    }
    Redirect::to("/")
}

pub async fn form_create_story(
    State(state): State<AppState>,
    Form(form): Form<StoryForm>,
) -> Redirect {
    if let Err(err) = apply_create_story(&state, form).await {
        notify(&state, err).await;
    }
    Redirect::to("/")
}

pub async fn form_reverse_story(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    if let Err(err) = apply_reverse_story(&state, id).await {
        notify(&state, err).await;
    }
    Redirect::to("/")
}

pub async fn get_state(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<JournalView>, AppError> {
    let filter = parse_filter(&query)?;
    let journal = state.journal.lock().await;
    let notices = journal.notices();
    Ok(Json(journal_view(&journal, &filter, notices)))
}

pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collection>>, AppError> {
    Ok(Json(refresh_collections(&state).await?))
}

pub async fn create_collection(
    State(state): State<AppState>,
    Json(input): Json<NewCollection>,
) -> Result<(StatusCode, Json<Collection>), AppError> {
    let collection = apply_create_collection(&state, input).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    apply_delete_collection(&state, id, query.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_collection(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<JournalView>, AppError> {
    apply_select_collection(&state, id).await?;
    let journal = state.journal.lock().await;
    Ok(Json(journal_view(&journal, &MoodFilter::All, journal.notices())))
}

pub async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<Story>>, AppError> {
    let filter = parse_filter(&query)?;
    let journal = state.journal.lock().await;
    let stories = journal.filtered_stories(&filter).into_iter().cloned().collect();
    Ok(Json(stories))
}

pub async fn create_story(
    State(state): State<AppState>,
    Json(form): Json<StoryForm>,
) -> Result<(StatusCode, Json<Story>), AppError> {
    let story = apply_create_story(&state, form).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

pub async fn reverse_story(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Story>, AppError> {
    Ok(Json(apply_reverse_story(&state, id).await?))
}

pub async fn get_chart(State(state): State<AppState>) -> Json<ChartData> {
    let journal = state.journal.lock().await;
    Json(journal.chart().dataset())
}

pub async fn refresh_collections(state: &AppState) -> Result<Vec<Collection>, AppError> {
    let collections = state.gateway.list_collections().await?;
    debug!(count = collections.len(), "collections loaded");
    state.journal.lock().await.replace_collections(collections.clone());
    Ok(collections)
}

async fn apply_create_collection(
    state: &AppState,
    input: NewCollection,
) -> Result<Collection, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("collection name is required"));
    }

    let collection = state
        .gateway
        .create_collection(name, input.description.trim())
        .await?;
    info!(collection_id = collection.id, "collection created");

    state.journal.lock().await.add_collection(collection.clone());
    Ok(collection)
}

/// Returns false when a newer selection overtook this one.
async fn apply_select_collection(state: &AppState, id: u64) -> Result<bool, AppError> {
    let known = state.journal.lock().await.collection(id).cloned();
    let collection = match known {
        Some(collection) => collection,
        None => refresh_collections(state)
            .await?
            .into_iter()
            .find(|collection| collection.id == id)
            .ok_or_else(|| AppError::not_found(format!("collection {id} does not exist")))?,
    };

    let ticket = state.journal.lock().await.begin_selection(collection);
    let stories = state.gateway.list_stories().await?.for_collection(id)?;

    let mut journal = state.journal.lock().await;
    if !journal.complete_selection(ticket, stories) {
        debug!(collection_id = id, "discarding stale story list");
        return Ok(false);
    }
    info!(collection_id = id, stories = journal.stories().len(), "collection selected");
    spawn_photo_probes(state, &mut journal);
    Ok(true)
}

/// Returns whether the deleted collection was the selected one.
async fn apply_delete_collection(
    state: &AppState,
    id: u64,
    confirmed: bool,
) -> Result<bool, AppError> {
    if !confirmed {
        return Err(AppError::bad_request("deleting a collection must be confirmed"));
    }

    state.gateway.delete_collection(id).await?;

    let was_selected = state.journal.lock().await.remove_collection(id);
    info!(collection_id = id, was_selected, "collection deleted");
    Ok(was_selected)
}

async fn apply_create_story(state: &AppState, form: StoryForm) -> Result<Story, AppError> {
    let mood = form
        .mood
        .parse::<Mood>()
        .map_err(|err| AppError::bad_request(format!("{err}")))?;
    if !(MOOD_RATING_MIN..=MOOD_RATING_MAX).contains(&form.mood_rating) {
        return Err(AppError::bad_request(format!(
            "mood rating must be between {MOOD_RATING_MIN} and {MOOD_RATING_MAX}"
        )));
    }
    let content = form.content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("story content is required"));
    }

    let collection_id = state.journal.lock().await.selected_id();
    if collection_id == 0 {
        return Err(AppError::bad_request("select a collection before adding stories"));
    }

    let new_story = NewStory {
        content: content.to_string(),
        mood,
        mood_rating: form.mood_rating,
        photo_url: form.photo_url.trim().to_string(),
        collection_id,
    };
    let story = state.gateway.create_story(&new_story).await?;
    info!(story_id = story.id, collection_id, "story created");

    let mut journal = state.journal.lock().await;
    if journal.add_story(story.clone()) {
        spawn_photo_probes(state, &mut journal);
    } else {
        debug!(story_id = story.id, "created story is not in the selected collection");
    }
    Ok(story)
}

async fn apply_reverse_story(state: &AppState, id: u64) -> Result<Story, AppError> {
    let content = state
        .journal
        .lock()
        .await
        .story(id)
        .map(|story| story.content.clone())
        .ok_or_else(|| {
            AppError::not_found(format!("story {id} is not in the selected collection"))
        })?;

    let updated = state
        .gateway
        .update_story_content(id, &reverse_content(&content))
        .await?;
    debug!(story_id = id, "story content reversed");

    if !state.journal.lock().await.replace_story(updated.clone()) {
        debug!(
            story_id = id,
            collection_id = updated.collection_id,
            "reversed story is no longer cached; view left unchanged"
        );
    }
    Ok(updated)
}

fn spawn_photo_probes(state: &AppState, journal: &mut Journal) {
    if !state.config.probe_photos {
        return;
    }
    for url in journal.take_unprobed_photos() {
        let client = state.gateway.client().clone();
        let journal = Arc::clone(&state.journal);
        tokio::spawn(async move {
            let orientation = match probe_photo(&client, &url).await {
                Ok(orientation) => {
                    debug!(%url, ?orientation, "photo probed");
                    Some(orientation)
                }
                Err(err) => {
                    warn!(%url, "photo probe failed: {err}");
                    None
                }
            };
            journal.lock().await.record_photo(&url, orientation);
        });
    }
}

fn parse_filter(query: &FilterQuery) -> Result<MoodFilter, AppError> {
    query
        .mood
        .as_deref()
        .unwrap_or_default()
        .parse::<MoodFilter>()
        .map_err(|err| AppError::bad_request(format!("{err}")))
}

async fn notify(state: &AppState, err: AppError) {
    warn!(kind = err.kind, status = %err.status, "{}", err.message);
    state
        .journal
        .lock()
        .await
        .notify(Notice::new(err.kind, err.message));
}
