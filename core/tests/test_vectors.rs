//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Request vectors describe the operation inputs and the exact request the
//! client must build; error vectors describe server responses and the
//! `ApiError` they normalize to. Comparing parsed JSON (not raw strings)
//! avoids false negatives from field-ordering differences.

use task_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, NewTask, TaskClient, TaskFilter};

const BASE_URL: &str = "http://localhost:8001";

fn client() -> TaskClient {
    TaskClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn build(c: &TaskClient, case: &serde_json::Value) -> HttpRequest {
    let id = || case["id"].as_i64().unwrap();
    let input = || -> NewTask { serde_json::from_value(case["input"].clone()).unwrap() };
    match case["operation"].as_str().unwrap() {
        "list" => {
            let filter = TaskFilter {
                completed: case["filter"]["completed"].as_bool(),
                priority: case["filter"]["priority"].as_i64().map(|p| p as i32),
            };
            c.build_list_tasks(&filter)
        }
        "get" => c.build_get_task(id()),
        "create" => c.build_create_task(&input()).unwrap(),
        "update" => c.build_update_task(id(), &input()).unwrap(),
        "delete" => c.build_delete_task(id()),
        "complete" => c.build_complete_task(id()),
        "uncomplete" => c.build_uncomplete_task(id()),
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&c, case);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match req.body.as_deref() {
            Some(body) => {
                let body: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(body, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let expected = &case["expected_error"];

        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let err = c.parse_get_task(response).unwrap_err();

        match expected["kind"].as_str().unwrap() {
            "not_found" => assert!(matches!(err, ApiError::NotFound { .. }), "{name}: kind"),
            "server" => assert!(matches!(err, ApiError::Server { .. }), "{name}: kind"),
            other => panic!("unknown error kind: {other}"),
        }
        assert_eq!(err.status(), expected["status"].as_u64().map(|s| s as u16), "{name}: status");
        assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(
            err.payload().is_some(),
            expected["has_payload"].as_bool().unwrap(),
            "{name}: payload"
        );
    }
}
