//! HTTP routes for the games API.

use std::sync::Arc;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use mines_core::{BoardId, BoardView};
use mines_protocol::{CreateGameForm, Created, ErrorBody, FormError, GameCount, MoveForm};
use thiserror::Error;

use crate::store::{GameStore, StoreError, Turn};

const ALLOW_METHODS: &str = "POST, GET, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Accept, Content-Type, Origin, X-GAME-UUID";
const MAX_AGE_SECS: &str = "86400";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid game")]
    InvalidGameId,
    #[error("invalid turn")]
    InvalidTurn,
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidGameId | Self::InvalidTurn => StatusCode::NOT_FOUND,
            Self::Store(StoreError::GameNotFound | StoreError::TurnNotFound) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Game(_)) | Self::Form(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::debug!("Request failed with {}: {}", status, self);
        (status, Json(ErrorBody::new(self))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Builds the application around a shared store.
pub fn router(store: Arc<GameStore>) -> Router {
    let games = Router::new()
        .route(
            "/games",
            get(count_games)
                .post(create_game)
                .delete(method_not_allowed)
                .options(no_content),
        )
        .route(
            "/games/",
            get(count_games)
                .post(create_game)
                .delete(method_not_allowed)
                .options(no_content),
        )
        .route(
            "/games/{id}",
            get(show_game)
                .post(play_move)
                .delete(abandon_game)
                .options(check_game),
        )
        .route("/games/{id}/{turn}", get(show_turn))
        .layer(middleware::map_response(with_cors));

    Router::new()
        .route("/", get(no_content))
        .merge(games)
        .with_state(store)
}

async fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
    response
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

fn parse_id(id: &str) -> ApiResult<BoardId> {
    BoardId::parse(id).ok_or(ApiError::InvalidGameId)
}

/// Body fields win over query string fields, and either part may be missing or unreadable.
fn merge_form<T: Default>(
    query: Result<Query<T>, QueryRejection>,
    body: Result<Form<T>, FormRejection>,
    or_query: impl FnOnce(T, T) -> T,
) -> T {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let body = body.map(|Form(body)| body).unwrap_or_default();
    or_query(body, query)
}

async fn count_games(State(store): State<Arc<GameStore>>) -> Json<GameCount> {
    Json(GameCount {
        games: store.len().await,
    })
}

async fn create_game(
    State(store): State<Arc<GameStore>>,
    query: Result<Query<CreateGameForm>, QueryRejection>,
    form: Result<Form<CreateGameForm>, FormRejection>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let form = merge_form(query, form, CreateGameForm::or_query);
    let (width, height, mines) = (form.width(), form.height(), form.mines());

    let id = store
        .create(width.into(), height.into(), mines.into())
        .await?;
    log::info!("Created game {} ({}x{}, {} mines)", id, width, height, mines);

    Ok((
        StatusCode::CREATED,
        Json(Created {
            uuid: id.to_string(),
        }),
    ))
}

async fn show_game(
    State(store): State<Arc<GameStore>>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardView>> {
    let view = store.view(parse_id(&id)?).await?;
    Ok(Json(view))
}

async fn play_move(
    State(store): State<Arc<GameStore>>,
    Path(id): Path<String>,
    query: Result<Query<MoveForm>, QueryRejection>,
    form: Result<Form<MoveForm>, FormRejection>,
) -> ApiResult<(StatusCode, Json<BoardView>)> {
    let id = parse_id(&id)?;
    if !store.contains(id).await {
        return Err(StoreError::GameNotFound.into());
    }
    let request = merge_form(query, form, MoveForm::or_query).parse()?;

    let view = store.apply_move(id, request.x, request.y, request.flag).await?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

async fn abandon_game(
    State(store): State<Arc<GameStore>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    store.abandon(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn check_game(
    State(store): State<Arc<GameStore>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store.contains(parse_id(&id)?).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StoreError::GameNotFound.into())
    }
}

async fn show_turn(
    State(store): State<Arc<GameStore>>,
    Path((id, turn)): Path<(String, String)>,
) -> ApiResult<Json<Turn>> {
    let id = parse_id(&id)?;
    let turn = turn.parse().map_err(|_| ApiError::InvalidTurn)?;
    Ok(Json(store.turn(id, turn).await?))
}
