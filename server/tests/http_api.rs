use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use mines_core::{Board, BoardConfig, BoardId, MineLayout};
use mines_server::{GameStore, router};
use serde_json::Value;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

fn fixed_board(size: (u8, u8), mines: &[(u8, u8)]) -> Board {
    let layout = MineLayout::from_mine_coords(size, mines).unwrap();
    let config = BoardConfig::new(size.0.into(), size.1.into(), layout.mine_count().into()).unwrap();
    Board::with_generator(config, layout).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            request = request.header(header::CONTENT_TYPE, FORM);
            Body::from(form.to_owned())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_has_no_content() {
    let app = router(Arc::new(GameStore::new()));

    let response = send(&app, Method::GET, "/", None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn create_with_defaults_and_count() {
    let store = Arc::new(GameStore::new());
    let app = router(store.clone());

    let response = send(&app, Method::POST, "/games/", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let created = json(response).await;
    let uuid = created["uuid"].as_str().unwrap().to_owned();

    let view = json(send(&app, Method::GET, &format!("/games/{uuid}"), None).await).await;
    assert_eq!(view["width"], 12);
    assert_eq!(view["height"], 12);
    assert_eq!(view["mines"], 20);
    assert_eq!(view["flags"], 0);
    assert_eq!(view["grid"].as_array().unwrap().len(), 144);
    assert!(view["grid"].as_array().unwrap().iter().all(|tile| tile == "?"));

    let count = json(send(&app, Method::GET, "/games/", None).await).await;
    assert_eq!(count, serde_json::json!({ "games": 1 }));
}

#[tokio::test]
async fn create_uses_posted_sizes_and_defaults_the_rest() {
    let store = Arc::new(GameStore::new());
    let app = router(store.clone());

    let response = send(&app, Method::POST, "/games/", Some("w=5&h=oops")).await;
    let uuid = json(response).await["uuid"].as_str().unwrap().to_owned();

    let view = json(send(&app, Method::GET, &format!("/games/{uuid}"), None).await).await;
    assert_eq!(view["width"], 5);
    assert_eq!(view["height"], 12);
    assert_eq!(view["mines"], 20);
}

#[tokio::test]
async fn create_rejects_oversized_boards() {
    let store = Arc::new(GameStore::new());
    let app = router(store.clone());

    let response = send(&app, Method::POST, "/games/", Some("w=251&h=10&m=5")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "width exceeds max");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn moves_return_the_board_and_win() {
    let store = Arc::new(GameStore::new());
    let id = store.insert(fixed_board((3, 1), &[(0, 0)])).await;
    let app = router(store.clone());
    let uri = format!("/games/{id}");

    let response = send(&app, Method::POST, &uri, Some("x=0&y=0&flag=1")).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let view = json(response).await;
    assert_eq!(view["grid"], serde_json::json!(["!", "?", "?"]));
    assert_eq!(view["flags"], 1);
    assert!(view.get("ended_at").is_none());

    let view = json(send(&app, Method::POST, &uri, Some("x=2&y=0")).await).await;
    assert_eq!(view["grid"], serde_json::json!(["!", "1", ""]));
    assert_eq!(view["won"], true);
    assert!(view.get("ended_at").is_some());

    let response = send(&app, Method::POST, &uri, Some("x=1&y=0")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "Game is not active");
}

#[tokio::test]
async fn move_form_errors_are_bad_requests() {
    let store = Arc::new(GameStore::new());
    let id = store.insert(fixed_board((3, 3), &[(1, 1)])).await;
    let app = router(store.clone());
    let uri = format!("/games/{id}");

    let response = send(&app, Method::POST, &uri, Some("y=1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "x cannot be empty");

    let response = send(&app, Method::POST, &uri, None).await;
    assert_eq!(json(response).await["error"], "x cannot be empty");

    let response = send(&app, Method::POST, &uri, Some("x=1")).await;
    assert_eq!(json(response).await["error"], "y cannot be empty");

    let response = send(&app, Method::POST, &uri, Some("x=3&y=0")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(store.turn_count(id).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_games_are_not_found() {
    let app = router(Arc::new(GameStore::new()));
    let missing = format!("/games/{}", BoardId::new());

    for (method, uri) in [
        (Method::GET, "/games/not-a-uuid"),
        (Method::GET, missing.as_str()),
        (Method::POST, missing.as_str()),
        (Method::DELETE, missing.as_str()),
        (Method::OPTIONS, missing.as_str()),
    ] {
        let response = send(&app, method, uri, Some("x=0&y=0")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json(response).await["error"], "invalid game");
    }
}

#[tokio::test]
async fn delete_abandons_the_game() {
    let store = Arc::new(GameStore::new());
    let id = store.insert(fixed_board((3, 1), &[(1, 0)])).await;
    let app = router(store.clone());
    let uri = format!("/games/{id}");
    send(&app, Method::POST, &uri, Some("x=0&y=0")).await;

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let view = json(send(&app, Method::GET, &uri, None).await).await;
    assert!(view.get("ended_at").is_some());
    assert!(view.get("won").is_none());
    assert_eq!(view["grid"], serde_json::json!(["1", "9", "?"]));

    let response = send(&app, Method::DELETE, "/games/", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn turns_replay_the_history() {
    let store = Arc::new(GameStore::new());
    let id = store.insert(fixed_board((3, 1), &[(2, 0)])).await;
    let app = router(store.clone());
    send(&app, Method::POST, &format!("/games/{id}"), Some("x=2&y=0&flag=1")).await;
    send(&app, Method::POST, &format!("/games/{id}"), Some("x=0&y=0")).await;

    let first = json(send(&app, Method::GET, &format!("/games/{id}/0"), None).await).await;
    assert_eq!(first["turn"], 0);
    assert_eq!(first["flag"], true);
    assert_eq!(first["board"]["grid"], serde_json::json!(["?", "?", "!"]));

    let second = json(send(&app, Method::GET, &format!("/games/{id}/1"), None).await).await;
    assert_eq!((second["x"].as_u64(), second["y"].as_u64()), (Some(0), Some(0)));
    assert_eq!(second["board"]["won"], true);

    for turn in ["2", "last"] {
        let response = send(&app, Method::GET, &format!("/games/{id}/{turn}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"], "invalid turn");
    }
}

#[tokio::test]
async fn options_carry_cors_headers() {
    let store = Arc::new(GameStore::new());
    let id = store.create(4, 4, 1).await.unwrap();
    let app = router(store.clone());

    for uri in ["/games/".to_owned(), format!("/games/{id}")] {
        let response = send(&app, Method::OPTIONS, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "POST, GET, DELETE, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Accept, Content-Type, Origin, X-GAME-UUID"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }
}

#[tokio::test]
async fn unknown_game_wins_over_a_bad_move_form() {
    let app = router(Arc::new(GameStore::new()));
    let missing = format!("/games/{}", BoardId::new());

    for form in [Some("y=1"), Some("x=a&y=b"), None] {
        let response = send(&app, Method::POST, &missing, form).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"], "invalid game");
    }
}

#[tokio::test]
async fn delete_keeps_a_won_game() {
    let store = Arc::new(GameStore::new());
    let id = store.insert(fixed_board((2, 1), &[(0, 0)])).await;
    let app = router(store.clone());
    let uri = format!("/games/{id}");
    let won = json(send(&app, Method::POST, &uri, Some("x=1&y=0")).await).await;
    assert_eq!(won["won"], true);

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let view = json(send(&app, Method::GET, &uri, None).await).await;
    assert_eq!(view, won);
    assert_eq!(view["grid"], serde_json::json!(["!", "1"]));
}

#[tokio::test]
async fn query_string_fills_in_form_fields() {
    let store = Arc::new(GameStore::new());
    let id = store.insert(fixed_board((3, 1), &[(0, 0)])).await;
    let app = router(store.clone());

    let response = send(&app, Method::POST, &format!("/games/{id}?x=0&y=0&flag=1"), None).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(json(response).await["grid"], serde_json::json!(["!", "?", "?"]));

    let response = send(&app, Method::POST, &format!("/games/{id}?x=0&y=0"), Some("x=2")).await;
    assert_eq!(json(response).await["grid"], serde_json::json!(["!", "1", ""]));

    let response = send(&app, Method::POST, "/games/?w=4&h=3&m=2", Some("w=6")).await;
    let uuid = json(response).await["uuid"].as_str().unwrap().to_owned();
    let view = json(send(&app, Method::GET, &format!("/games/{uuid}"), None).await).await;
    assert_eq!(view["width"], 6);
    assert_eq!(view["height"], 3);
    assert_eq!(view["mines"], 2);
}
