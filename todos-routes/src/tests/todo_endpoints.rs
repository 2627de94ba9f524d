use crate::routes;
use crate::state::TodoAppState;
use crate::tests::{FakeEngine, FakeRepo, TestTodo, todo};
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use rstest::rstest;
use serde_json::{Value, json};

fn init_test_server(repo: FakeRepo) -> TestServer {
    let routes = routes::build(TodoAppState::new_without_metrics(FakeEngine::new(repo)));

    TestServer::new(routes).expect("creation of test server")
}

async fn run_get_endpoint(path: &str, repo: FakeRepo) -> TestResponse {
    init_test_server(repo).get(path).await
}

async fn run_post_endpoint(path: &str, repo: FakeRepo, body: &Value) -> TestResponse {
    init_test_server(repo).post(path).json(body).await
}

async fn run_patch_endpoint(path: &str, repo: FakeRepo, body: &Value) -> TestResponse {
    init_test_server(repo).patch(path).json(body).await
}

async fn run_delete_endpoint(path: &str, repo: FakeRepo) -> TestResponse {
    init_test_server(repo).delete(path).await
}

fn seeded_numbered(amount: u32) -> FakeRepo {
    FakeRepo::seeded((1..=amount).map(|i| todo(i, &format!("todo{i}"), i % 2 == 0)).collect())
}

#[tokio::test]
async fn list_with_no_todos_returns_an_empty_page_with_zero_counts() {
    let response = run_get_endpoint("/todos", FakeRepo::default()).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "items": [],
        "totalCount": 0,
        "pageNumber": 1,
        "pageSize": 10,
        "totalPages": 0,
    }));
}

#[tokio::test]
async fn list_wraps_todos_in_the_page_envelope() {
    let todos = vec![todo(1, "groceries", false), todo(2, "laundry", true)];
    let repo = FakeRepo::seeded(todos.clone());

    let response = run_get_endpoint("/todos", repo).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "items": serde_json::to_value(&todos).unwrap(),
        "totalCount": 2,
        "pageNumber": 1,
        "pageSize": 10,
        "totalPages": 1,
    }));
}

#[rstest]
#[case(1, 10, 3)]
#[case(3, 5, 3)]
#[case(4, 0, 3)]
#[tokio::test]
async fn list_windows_through_all_pages(
    #[case] page: u64,
    #[case] expected_len: usize,
    #[case] expected_total_pages: u64,
) {
    let response = run_get_endpoint(&format!("/todos?page={page}"), seeded_numbered(25)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(expected_len, body["items"].as_array().unwrap().len());
    assert_eq!(25, body["totalCount"]);
    assert_eq!(expected_total_pages, body["totalPages"]);
    assert_eq!(page, body["pageNumber"]);
}

#[tokio::test]
async fn list_page_size_is_taken_from_the_uri_query() {
    let response = run_get_endpoint("/todos?page_size=7", seeded_numbered(25)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(7, body["items"].as_array().unwrap().len());
    assert_eq!(7, body["pageSize"]);
    assert_eq!(4, body["totalPages"]);
}

#[tokio::test]
async fn list_title_filter_matches_substrings_ignoring_case() {
    let repo = FakeRepo::seeded(vec![
        todo(1, "Buy Groceries", false),
        todo(2, "laundry", false),
        todo(3, "more groceries", true),
    ]);

    let response = run_get_endpoint("/todos?title=GROC", repo).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(2, body["totalCount"]);
    assert_eq!(1, body["items"][0]["id"]);
    assert_eq!(3, body["items"][1]["id"]);
}

#[tokio::test]
async fn list_done_filter_keeps_only_matching_todos() {
    let response = run_get_endpoint("/todos?done=true", seeded_numbered(25)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(12, body["totalCount"]);
    assert!(
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["done"] == json!(true))
    );
}

#[tokio::test]
async fn list_filters_combine_as_a_conjunction() {
    let repo = FakeRepo::seeded(vec![
        todo(1, "groceries", false),
        todo(2, "groceries again", true),
        todo(3, "laundry", true),
    ]);

    let response = run_get_endpoint("/todos?title=groceries&done=true", repo).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(1, body["totalCount"]);
    assert_eq!(2, body["items"][0]["id"]);
}

#[rstest]
#[case("page=0")]
#[case("page_size=0")]
#[case("page_size=101")]
#[tokio::test]
async fn list_rejects_out_of_range_parameters_before_the_store(#[case] query: &str) {
    let repo = FakeRepo::default();

    let response = run_get_endpoint(&format!("/todos?{query}"), repo.clone()).await;

    response.assert_status_bad_request();
    assert_eq!(0, repo.store_calls());
}

#[tokio::test]
async fn list_invalid_page_param_returns_bad_request() {
    let response = run_get_endpoint("/todos?page=hello", FakeRepo::default()).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn list_unknown_params_are_ignored() {
    let response = run_get_endpoint("/todos?unknown=hello", FakeRepo::default()).await;

    response.assert_status_ok();
}

#[tokio::test]
async fn list_returns_internal_server_error_if_the_repo_fails() {
    let response = run_get_endpoint("/todos", FakeRepo::failing()).await;

    response.assert_status_internal_server_error();
}

#[tokio::test]
async fn get_returns_the_todo_when_it_exists() {
    let existing: TestTodo = todo(7, "groceries", false);
    let repo = FakeRepo::seeded(vec![existing.clone()]);

    let response = run_get_endpoint("/todos/7", repo).await;

    response.assert_status_ok();
    response.assert_json(&existing);
}

#[tokio::test]
async fn get_returns_not_found_when_the_todo_does_not_exist() {
    let response = run_get_endpoint("/todos/7", FakeRepo::default()).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn get_returns_bad_request_for_a_malformed_id() {
    let response = run_get_endpoint("/todos/bad_id", FakeRepo::default()).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn get_returns_internal_server_error_if_the_repo_fails() {
    let response = run_get_endpoint("/todos/7", FakeRepo::failing()).await;

    response.assert_status_internal_server_error();
}

#[tokio::test]
async fn create_returns_the_created_todo() {
    let response = run_post_endpoint(
        "/todos",
        FakeRepo::default(),
        &json!({
            "title": "groceries",
            "description": "milk and eggs",
        }),
    )
    .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!("groceries", body["title"]);
    assert_eq!("milk and eggs", body["description"]);
    assert_eq!(false, body["done"]);
    assert_eq!(1, body["id"]);
}

#[tokio::test]
async fn create_description_is_optional() {
    let response =
        run_post_endpoint("/todos", FakeRepo::default(), &json!({ "title": "groceries" })).await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(Value::Null, body["description"]);
}

#[tokio::test]
async fn create_title_is_not_optional() {
    let response = run_post_endpoint(
        "/todos",
        FakeRepo::default(),
        &json!({ "description": "milk and eggs" }),
    )
    .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_returns_internal_server_error_if_the_repo_fails() {
    let response =
        run_post_endpoint("/todos", FakeRepo::failing(), &json!({ "title": "groceries" })).await;

    response.assert_status_internal_server_error();
}

#[tokio::test]
async fn patch_updates_the_given_fields() {
    let repo = FakeRepo::seeded(vec![todo(1, "groceries", false)]);

    let response = run_patch_endpoint(
        "/todos/1",
        repo,
        &json!({
            "title": "weekly groceries",
            "done": true,
        }),
    )
    .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!("weekly groceries", body["title"]);
    assert_eq!(true, body["done"]);
    assert_ne!(Value::Null, body["updated"]);
}

#[tokio::test]
async fn patch_with_explicit_null_clears_the_description() {
    let existing = TestTodo::new(
        1,
        String::from("groceries"),
        Some(String::from("milk and eggs")),
        false,
        crate::tests::fixed_time(),
        None,
    );
    let repo = FakeRepo::seeded(vec![existing]);

    let response = run_patch_endpoint("/todos/1", repo, &json!({ "description": null })).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(Value::Null, body["description"]);
}

#[tokio::test]
async fn patch_returns_not_found_when_the_todo_does_not_exist() {
    let response =
        run_patch_endpoint("/todos/1", FakeRepo::default(), &json!({ "title": "x" })).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn delete_returns_no_content_when_the_todo_existed() {
    let repo = FakeRepo::seeded(vec![todo(1, "groceries", false)]);

    let response = run_delete_endpoint("/todos/1", repo).await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_returns_not_found_when_the_todo_does_not_exist() {
    let response = run_delete_endpoint("/todos/1", FakeRepo::default()).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn metrics_endpoint_is_unavailable_when_metrics_are_disabled() {
    let response = run_get_endpoint("/todos/metrics", FakeRepo::default()).await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
