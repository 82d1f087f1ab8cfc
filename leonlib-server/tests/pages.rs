use axum::http::StatusCode;

#[path = "support/mod.rs"]
mod support;
use support::{build_test_app, location, page};

#[tokio::test]
async fn index_renders_signed_out() {
    let app = build_test_app();
    let response = app.server.get("/").await;
    response.assert_status_ok();

    let page = page(&response);
    assert_eq!(page["page"], "index");
    assert_eq!(page["logged_in"], false);
    assert_eq!(page["year"].as_str().unwrap().len(), 4);
}

#[tokio::test]
async fn search_concatenates_dimensions_in_request_order() {
    let app = build_test_app();
    app.seed(&[
        ("Dune", "Frank Herbert"),
        ("Herbert West", "H. P. Lovecraft"),
        ("Foundation", "Isaac Asimov"),
    ])
    .await;

    let response = app
        .server
        .get("/search_books")
        .add_query_param("textSearch", "herbert")
        .add_query_param("searchType", "byTitle,byAuthor,byTitle")
        .await;
    response.assert_status_ok();

    let page = page(&response);
    let titles: Vec<&str> = page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Herbert West", "Dune"]);
}

#[tokio::test]
async fn search_defaults_to_title_and_keeps_duplicates_across_dimensions() {
    let app = build_test_app();
    app.seed(&[("Asimov", "Isaac Asimov"), ("Dune", "Frank Herbert")]).await;

    let by_title = page(
        &app.server
            .get("/search_books")
            .add_query_param("textSearch", "ASIMOV")
            .await,
    );
    assert_eq!(by_title["results"].as_array().unwrap().len(), 1);

    let both = page(
        &app.server
            .get("/search_books")
            .add_query_param("textSearch", "asimov")
            .add_query_param("searchType", "byAuthor,byTitle")
            .await,
    );
    let results = both["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], results[1]["id"]);
}

#[tokio::test]
async fn unknown_search_type_redirects_to_error_page() {
    let app = build_test_app();
    app.seed(&[("Dune", "Frank Herbert")]).await;

    let response = app
        .server
        .get("/search_books")
        .add_query_param("textSearch", "dune")
        .add_query_param("searchType", "byTitle,byPublisher")
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/error");
}

#[tokio::test]
async fn failing_store_redirects_to_error_page() {
    let app = build_test_app();
    app.library.set_failing(true);

    let response = app
        .server
        .get("/search_books")
        .add_query_param("textSearch", "dune")
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/error");

    let response = app.server.get("/books_by_author").await;
    assert_eq!(location(&response), "/error");
}

#[tokio::test]
async fn books_by_author_lists_distinct_sorted_authors() {
    let app = build_test_app();
    app.seed(&[
        ("Foundation", "Isaac Asimov"),
        ("Dune", "Frank Herbert"),
        ("I, Robot", "Isaac Asimov"),
    ])
    .await;

    let response = app.server.get("/books_by_author").await;
    response.assert_status_ok();
    let page = page(&response);
    assert_eq!(page["page"], "books_by_author");
    assert_eq!(
        page["authors"],
        serde_json::json!(["Frank Herbert", "Isaac Asimov"])
    );
}

#[tokio::test]
async fn book_info_shows_one_book() {
    let app = build_test_app();
    app.seed(&[("Dune", "Frank Herbert"), ("Foundation", "Isaac Asimov")])
        .await;

    let response = app
        .server
        .get("/book_info")
        .add_query_param("id", "2")
        .await;
    response.assert_status_ok();

    let page = page(&response);
    let results = page["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Foundation");
    assert_eq!(results[0]["has_been_read"], false);
    assert_eq!(results[0]["base64_image"], "");
}

#[tokio::test]
async fn book_info_without_a_valid_book_redirects() {
    let app = build_test_app();
    app.seed(&[("Dune", "Frank Herbert")]).await;

    for id in [None, Some("abc"), Some("999")] {
        let mut request = app.server.get("/book_info");
        if let Some(id) = id {
            request = request.add_query_param("id", id);
        }
        let response = request.await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/error");
    }
}

#[tokio::test]
async fn error_page_renders() {
    let app = build_test_app();
    let response = app.server.get("/error").await;
    response.assert_status_ok();
    assert_eq!(page(&response)["page"], "error");
}

#[tokio::test]
async fn static_assets_are_served() {
    let app = build_test_app();
    app.server.get("/assets/script.js").await.assert_status_ok();
    app.server
        .get("/assets/missing.js")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn book_info_uses_the_first_repeated_id() {
    let app = build_test_app();
    app.seed(&[("Dune", "Frank Herbert"), ("Foundation", "Isaac Asimov")])
        .await;

    let response = app.server.get("/book_info?id=1&id=2").await;
    response.assert_status_ok();
    assert_eq!(page(&response)["results"][0]["title"], "Dune");
}

#[tokio::test]
async fn search_uses_the_first_repeated_search_type() {
    let app = build_test_app();
    app.seed(&[("Dune", "Frank Herbert"), ("Herbert West", "H. P. Lovecraft")])
        .await;

    let response = app
        .server
        .get("/search_books?textSearch=herbert&searchType=byAuthor&searchType=byTitle")
        .await;
    response.assert_status_ok();

    let page = page(&response);
    let results = page["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Dune");
}
