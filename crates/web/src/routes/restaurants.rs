//! Restaurant record route handlers.
//!
//! Every handler here requires a logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use reviews_core::{RecordId, Restaurant, RestaurantEntry, RestaurantKey, SearchFilter};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, push_flash, take_flashes};
use crate::services::DeleteOutcome;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Add form data.
///
/// `username` defaults to the logged-in user when omitted or blank.
#[derive(Debug, Deserialize)]
pub struct AddRestaurantForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    pub cuisine: String,
    pub location: String,
    pub review: String,
}

/// Delete form data: the exact key of the record to remove.
#[derive(Debug, Deserialize)]
pub struct DeleteRestaurantForm {
    pub username: String,
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    pub cuisine: String,
}

/// Edit form data. The owning username is not editable.
#[derive(Debug, Deserialize)]
pub struct EditRestaurantForm {
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    pub cuisine: String,
    pub location: String,
    pub review: String,
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "resName")]
    pub res_name: Option<String>,
    #[serde(rename = "resCuisine")]
    pub res_cuisine: Option<String>,
    #[serde(rename = "resUser")]
    pub res_user: Option<String>,
}

/// JSON body returned by `POST /addData`.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Home page: every record.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
    pub restaurants: Vec<Restaurant>,
}

/// Add form page.
#[derive(Template, WebTemplate)]
#[template(path = "add.html")]
pub struct AddTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
}

/// Delete form page.
#[derive(Template, WebTemplate)]
#[template(path = "delete.html")]
pub struct DeleteTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
}

/// Edit form page, pre-filled with the stored record.
#[derive(Template, WebTemplate)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
    pub restaurant: Restaurant,
}

/// Search form and results.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub current_user: Option<String>,
    pub flashes: Vec<String>,
    pub name: String,
    pub cuisine: String,
    pub user: String,
    pub searched: bool,
    pub restaurants: Vec<Restaurant>,
}

// =============================================================================
// Listing
// =============================================================================

/// Display all records sorted by restaurant name.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn home(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let restaurants = state.restaurants().list_all().await?;

    Ok(IndexTemplate {
        current_user: Some(user.username.into_inner()),
        flashes: take_flashes(&session).await,
        restaurants,
    })
}

/// Search records by name, cuisine, and owner.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn search(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let filter = SearchFilter::new(
        query.res_name.as_deref(),
        query.res_cuisine.as_deref(),
        query.res_user.as_deref(),
    );
    let restaurants = state.restaurants().search(&filter).await?;

    Ok(SearchTemplate {
        current_user: Some(user.username.into_inner()),
        flashes: take_flashes(&session).await,
        name: query.res_name.unwrap_or_default(),
        cuisine: query.res_cuisine.unwrap_or_default(),
        user: query.res_user.unwrap_or_default(),
        searched: !filter.is_empty(),
        restaurants,
    })
}

// =============================================================================
// Create
// =============================================================================

/// Display the add form.
pub async fn add_page(RequireAuth(user): RequireAuth, session: Session) -> impl IntoResponse {
    AddTemplate {
        current_user: Some(user.username.into_inner()),
        flashes: take_flashes(&session).await,
    }
}

/// Insert a record.
///
/// POST /addData
#[instrument(skip_all, fields(username = %user.username, restaurant = %form.restaurant_name))]
pub async fn add_data(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<AddRestaurantForm>,
) -> Result<Json<SubmitResponse>> {
    let username = form
        .username
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| user.username.into_inner());

    let entry = RestaurantEntry {
        username,
        restaurant_name: form.restaurant_name,
        cuisine: form.cuisine,
        location: form.location,
        review: form.review,
    };
    let restaurant = state.restaurants().add(&entry).await?;

    Ok(Json(SubmitResponse {
        message: format!(
            "Restaurant '{}' submitted successfully!",
            restaurant.restaurant_name
        ),
    }))
}

// =============================================================================
// Delete
// =============================================================================

/// Display the delete form.
pub async fn delete_page(RequireAuth(user): RequireAuth, session: Session) -> impl IntoResponse {
    DeleteTemplate {
        current_user: Some(user.username.into_inner()),
        flashes: take_flashes(&session).await,
    }
}

/// Delete the first record matching the submitted key exactly.
///
/// POST /deleteData
#[instrument(skip_all, fields(username = %form.username, restaurant = %form.restaurant_name))]
pub async fn delete_data(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<DeleteRestaurantForm>,
) -> Result<(StatusCode, String)> {
    let key = RestaurantKey {
        username: form.username,
        restaurant_name: form.restaurant_name,
        cuisine: form.cuisine,
    };

    let response = match state.restaurants().delete(&key).await? {
        DeleteOutcome::Deleted => (
            StatusCode::OK,
            format!(
                "Restaurant '{}' by '{}' deleted successfully!",
                key.restaurant_name, key.username
            ),
        ),
        DeleteOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            format!(
                "Restaurant '{}' by '{}' not found / could not be deleted",
                key.restaurant_name, key.username
            ),
        ),
    };
    Ok(response)
}

// =============================================================================
// Edit
// =============================================================================

/// Display the edit form for one record.
#[instrument(skip_all, fields(id = %id))]
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_record_id(&id)?;
    let restaurant = state
        .restaurants()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;

    Ok(EditTemplate {
        current_user: Some(user.username.into_inner()),
        flashes: take_flashes(&session).await,
        restaurant,
    })
}

/// Persist an edited record.
#[instrument(skip_all, fields(id = %id))]
pub async fn update(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<EditRestaurantForm>,
) -> Result<Redirect> {
    let id = parse_record_id(&id)?;
    let service = state.restaurants();
    let existing = service
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id}")))?;

    let entry = RestaurantEntry {
        username: existing.username,
        restaurant_name: form.restaurant_name,
        cuisine: form.cuisine,
        location: form.location,
        review: form.review,
    };
    if !service.update(id, &entry).await? {
        // Deleted between the lookup and the write
        return Err(AppError::NotFound(format!("restaurant {id}")));
    }

    push_flash(
        &session,
        format!("Restaurant '{}' updated.", entry.restaurant_name),
    )
    .await?;
    Ok(Redirect::to("/"))
}

fn parse_record_id(raw: &str) -> Result<RecordId> {
    RecordId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
