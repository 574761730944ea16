use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use marquee_api::{
    api::{create_router, AppState},
    config::Config,
    db::MemoryStore,
    models::Movie,
};

fn movie(id: i64, name: &str, genres: &[&str], year: i32, director: &str, cast: &[&str]) -> Movie {
    Movie {
        id,
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        release_year: year,
        director: director.to_string(),
        cast: cast.iter().map(|c| c.to_string()).collect(),
    }
}

async fn server_with(catalog: Vec<Movie>) -> TestServer {
    let store = Arc::new(MemoryStore::new());
    for m in catalog {
        store.insert_movie(m).await;
    }

    let state = AppState::in_memory(store, &Config::default());
    TestServer::new(create_router(state)).unwrap()
}

async fn create_test_server() -> TestServer {
    server_with(vec![
        movie(
            1,
            "The Godfather",
            &["Crime", "Drama"],
            1972,
            "Francis Ford Coppola",
            &["Marlon Brando", "Al Pacino", "James Caan", "Diane Keaton"],
        ),
        movie(
            2,
            "The Godfather Part II",
            &["Crime", "Drama"],
            1974,
            "Francis Ford Coppola",
            &["Al Pacino", "Robert De Niro", "Robert Duvall", "Diane Keaton"],
        ),
        movie(
            3,
            "Annie Hall",
            &["Comedy"],
            1972,
            "Woody Allen",
            &["Woody Allen", "Diane Keaton"],
        ),
        movie(
            4,
            "Heat",
            &["Crime", "Thriller"],
            1995,
            "Michael Mann",
            &["Al Pacino", "Robert De Niro"],
        ),
    ])
    .await
}

async fn watch(server: &TestServer, user_id: i64, movie_id: i64, watched_at: &str) -> Value {
    let response = server
        .post(&format!("/users/{}/history", user_id))
        .json(&json!({ "movie_id": movie_id, "watched_at": watched_at }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_get_movie() {
    let server = create_test_server().await;

    let response = server.get("/movies/3").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["director"], "Woody Allen");

    let response = server.get("/movies/99").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_history_gives_empty_lists() {
    let server = create_test_server().await;

    let response = server.get("/users/5/recommendations").await;
    response.assert_status_ok();
    let recommendations: Vec<Value> = response.json();
    assert!(recommendations.is_empty());

    let response = server.get("/users/5/rewatch").await;
    response.assert_status_ok();
    let rewatch: Vec<Value> = response.json();
    assert!(rewatch.is_empty());
}

#[tokio::test]
async fn test_recommendation_flow() {
    let server = create_test_server().await;
    watch(&server, 1, 1, "2024-01-10T20:00:00Z").await;

    let response = server
        .get("/users/1/recommendations")
        .add_query_param("max_results", 2)
        .await;
    response.assert_status_ok();

    let recommendations: Vec<Value> = response.json();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["movie"]["id"], 2);
    assert_eq!(recommendations[0]["score"], 199.5);
    assert_eq!(recommendations[1]["movie"]["id"], 4);
    assert_eq!(recommendations[1]["score"], 99.25);
}

#[tokio::test]
async fn test_recommendations_never_repeat_history() {
    let server = create_test_server().await;
    watch(&server, 1, 3, "2023-06-01T20:00:00Z").await;
    watch(&server, 1, 1, "2024-01-10T20:00:00Z").await;

    // Window of one only looks at movie 1, but movie 3 is still excluded
    let response = server
        .get("/users/1/recommendations")
        .add_query_param("window", 1)
        .await;
    let recommendations: Vec<Value> = response.json();
    let ids: Vec<i64> = recommendations
        .iter()
        .map(|r| r["movie"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn test_zero_sizes_give_empty_lists() {
    let server = create_test_server().await;
    watch(&server, 1, 1, "2024-01-10T20:00:00Z").await;

    for (key, value) in [("max_results", 0), ("window", 0)] {
        let response = server
            .get("/users/1/recommendations")
            .add_query_param(key, value)
            .await;
        response.assert_status_ok();
        let recommendations: Vec<Value> = response.json();
        assert!(recommendations.is_empty());
    }
}

#[tokio::test]
async fn test_negative_sizes_rejected() {
    let server = create_test_server().await;

    let response = server
        .get("/users/1/recommendations")
        .add_query_param("max_results", -1)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/users/1/recommendations")
        .add_query_param("window", -5)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("recency_window"));
}

#[tokio::test]
async fn test_rewatch_flow() {
    let server = create_test_server().await;
    // Weekly cadence that stopped years ago
    watch(&server, 1, 2, "2020-01-01T20:00:00Z").await;
    watch(&server, 1, 2, "2020-01-08T20:00:00Z").await;
    // Yearly cadence, next viewing predicted for 2020-01-01, before movie 2's
    watch(&server, 1, 4, "2018-01-01T20:00:00Z").await;
    watch(&server, 1, 4, "2019-01-01T20:00:00Z").await;
    // Watched once only
    watch(&server, 1, 3, "2010-01-01T20:00:00Z").await;

    let response = server.get("/users/1/rewatch").await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    let ids: Vec<i64> = movies.iter().map(|m| m["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![4, 2]);
}

#[tokio::test]
async fn test_history_add_list_and_remove() {
    let server = create_test_server().await;
    let later = watch(&server, 1, 2, "2024-01-05T20:00:00Z").await;
    let earlier = watch(&server, 1, 1, "2024-01-01T20:00:00Z").await;

    let response = server.get("/users/1/history").await;
    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["total"], 2);
    let records = page["items"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], earlier["id"]);

    let record_id = later["id"].as_i64().unwrap();

    // Another user may not remove it
    let response = server
        .delete(&format!("/users/2/history/{}", record_id))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .delete(&format!("/users/1/history/{}", record_id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .delete(&format!("/users/1/history/{}", record_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let page: Value = server.get("/users/1/history").await.json();
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_pages_by_date() {
    let server = create_test_server().await;
    for day in (1..=26).rev() {
        watch(&server, 1, 4, &format!("2024-03-{:02}T20:00:00Z", day)).await;
    }

    let first: Value = server.get("/users/1/history").await.json();
    assert_eq!(first["page"], 1);
    assert_eq!(first["per_page"], 24);
    assert_eq!(first["total"], 26);
    assert_eq!(first["pages"], 2);
    assert_eq!(first["items"].as_array().unwrap().len(), 24);
    assert_eq!(first["items"][0]["watched_at"], "2024-03-01T20:00:00Z");

    let second: Value = server
        .get("/users/1/history")
        .add_query_param("page", 2)
        .await
        .json();
    let items = second["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["watched_at"], "2024-03-26T20:00:00Z");

    let response = server
        .get("/users/1/history")
        .add_query_param("page", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watching_unknown_movie() {
    let server = create_test_server().await;
    let response = server
        .post("/users/1/history")
        .json(&json!({ "movie_id": 404, "watched_at": "2024-01-01T00:00:00Z" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_browse_catalog_pages() {
    let catalog = (1..=30)
        .map(|id| movie(id, &format!("Feature {}", id), &["Drama"], 2000, "D", &[]))
        .collect();
    let server = server_with(catalog).await;

    let response = server.get("/movies").await;
    response.assert_status_ok();
    let first: Value = response.json();
    assert_eq!(first["total"], 30);
    assert_eq!(first["pages"], 2);
    assert_eq!(first["items"].as_array().unwrap().len(), 24);
    assert_eq!(first["items"][0]["id"], 1);

    let second: Value = server.get("/movies").add_query_param("page", 2).await.json();
    let ids: Vec<i64> = second["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, (25..=30).collect::<Vec<i64>>());

    let beyond: Value = server.get("/movies").add_query_param("page", 5).await.json();
    assert!(beyond["items"].as_array().unwrap().is_empty());

    let response = server.get("/movies").add_query_param("page", -1).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_title_search() {
    let server = create_test_server().await;

    let response = server
        .get("/movies/search")
        .add_query_param("q", "The Gódfather: Part")
        .await;
    response.assert_status_ok();
    let hits: Vec<Value> = response.json();
    let ids: Vec<i64> = hits
        .iter()
        .map(|h| h["movie"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(hits[0]["matched_words"], 2);
    assert_eq!(hits[1]["matched_words"], 1);

    let hits: Vec<Value> = server
        .get("/movies/search")
        .add_query_param("q", "the and a")
        .await
        .json();
    assert!(hits.is_empty());

    let hits: Vec<Value> = server
        .get("/movies/search")
        .add_query_param("q", "pkmjnhgs")
        .await
        .json();
    assert!(hits.is_empty());

    let response = server.get("/movies/search").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watch_later_flow() {
    let server = create_test_server().await;

    server
        .put("/users/1/watch-later/4")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .put("/users/1/watch-later/2")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    // Saving again keeps a single entry
    server
        .put("/users/1/watch-later/4")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let movies: Vec<Value> = server.get("/users/1/watch-later").await.json();
    let ids: Vec<i64> = movies.iter().map(|m| m["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![2, 4]);

    let other: Vec<Value> = server.get("/users/2/watch-later").await.json();
    assert!(other.is_empty());

    server
        .put("/users/1/watch-later/404")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete("/users/1/watch-later/4")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/users/1/watch-later/4")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/users/1/watch-later/404")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let movies: Vec<Value> = server.get("/users/1/watch-later").await.json();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["name"], "The Godfather Part II");
}
