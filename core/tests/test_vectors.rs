//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use todo_sync::{
    ApiError, CreateTodo, Filters, FiltersPatch, HttpMethod, HttpRequest, HttpResponse, Todo,
    TodoClient, TodoPage, UpdateTodo,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_request_line(req: &HttpRequest, expected: &serde_json::Value, name: &str) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
}

fn assert_body(req: &HttpRequest, expected: &serde_json::Value, name: &str) {
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

fn assert_expected_error(err: ApiError, expected: &serde_json::Value, name: &str) {
    match expected.as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "ServerError" => assert!(
            matches!(err, ApiError::ServerError { .. }),
            "{name}: expected ServerError"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

fn load(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap()
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/list.json"));

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let patch: FiltersPatch = serde_json::from_value(case["input_filters"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_todos(&Filters::default().merge(&patch)).unwrap();
        assert_request_line(&req, expected_req, name);
        assert_eq!(req.query, string_pairs(&expected_req["query"]), "{name}: query");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let page = c.parse_list_todos(simulated_response(case)).unwrap();
        let expected: TodoPage = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(page, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/create.json"));

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: CreateTodo = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_create_todo(&input).unwrap();
        assert_request_line(&req, expected_req, name);
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");
        assert_body(&req, expected_req, name);

        // Verify parse
        let todo = c.parse_create_todo(simulated_response(case)).unwrap();
        let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/get.json"));

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();

        // Verify build
        let req = c.build_get_todo(id);
        assert_request_line(&req, &case["expected_request"], name);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_get_todo(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(result.unwrap_err(), expected_error, name);
        } else {
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/update.json"));

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();
        let input: UpdateTodo = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_update_todo(id, &input).unwrap();
        assert_request_line(&req, expected_req, name);
        assert_body(&req, expected_req, name);

        // Verify parse
        let todo = c.parse_update_todo(simulated_response(case)).unwrap();
        let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/delete.json"));

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();

        // Verify build
        let req = c.build_delete_todo(id);
        assert_request_line(&req, &case["expected_request"], name);
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_delete_todo(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(result.unwrap_err(), expected_error, name);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
