//! BDD step definitions for fetching homework statuses

use std::sync::Arc;

use cucumber::{given, then, when};

use homework_bot::api::PracticumClient;
use homework_bot::config::PracticumConfig;
use homework_bot::io::HttpResponse;

use crate::world::mock_http::{ScriptedGet, ScriptedHttpClient};
use crate::world::{error_kind, BotWorld};

pub fn test_practicum_config() -> PracticumConfig {
    PracticumConfig {
        endpoint: "http://review.test/api/user_api/homework_statuses/".to_string(),
        token: "test-token".to_string(),
    }
}

#[given(expr = "a review API that responds with status {int} and body {string}")]
async fn api_responds(world: &mut BotWorld, status: u16, body: String) {
    world
        .http()
        .push(ScriptedGet::Response(HttpResponse { status, body }))
        .await;
}

#[given("a review API that is unreachable")]
async fn api_unreachable(world: &mut BotWorld) {
    world.http().push(ScriptedGet::ConnectionRefused).await;
}

#[given("a review API that times out")]
async fn api_times_out(world: &mut BotWorld) {
    world.http().push(ScriptedGet::Timeout).await;
}

#[when(expr = "homework statuses are requested from {int}")]
async fn request_statuses(world: &mut BotWorld, from_date: i64) {
    let http: Arc<ScriptedHttpClient> = world.http();
    let client = PracticumClient::new(&test_practicum_config(), http);
    world.fetch_result = Some(client.get_api_answer(from_date).await);
}

#[then("the fetch should succeed")]
fn fetch_succeeds(world: &mut BotWorld) {
    let result = world.fetch_result.as_ref().expect("no fetch result");
    result.as_ref().unwrap();
}

#[then(expr = "the fetch should fail with {string}")]
fn fetch_fails_with(world: &mut BotWorld, kind: String) {
    let result = world.fetch_result.as_ref().expect("no fetch result");
    let err = result.as_ref().expect_err("expected the fetch to fail");
    assert_eq!(error_kind(err), kind, "unexpected error: {err}");
}

#[then(expr = "the fetch error should mention {string}")]
fn fetch_error_mentions(world: &mut BotWorld, text: String) {
    let result = world.fetch_result.as_ref().expect("no fetch result");
    let err = result.as_ref().expect_err("expected the fetch to fail");
    assert!(err.to_string().contains(&text), "{err}");
}

#[then(expr = "the request should carry header {string} with value {string}")]
async fn request_has_header(world: &mut BotWorld, name: String, value: String) {
    let http = world.http();
    let gets = http.gets.read().await;
    let last = gets.last().expect("no GET request recorded");
    assert_eq!(last.url, test_practicum_config().endpoint);
    assert!(
        last.headers.contains(&(name.clone(), value.clone())),
        "headers were {:?}",
        last.headers
    );
}

#[then(expr = "the request should carry query {string} with value {string}")]
async fn request_has_query(world: &mut BotWorld, name: String, value: String) {
    let http = world.http();
    let gets = http.gets.read().await;
    let last = gets.last().expect("no GET request recorded");
    assert!(
        last.query.contains(&(name.clone(), value.clone())),
        "query was {:?}",
        last.query
    );
}

#[then(expr = "the decoded body should have {string} equal to {int}")]
fn decoded_body_field(world: &mut BotWorld, key: String, expected: i64) {
    let result = world.fetch_result.as_ref().expect("no fetch result");
    let body = result.as_ref().expect("fetch failed");
    assert_eq!(body[key.as_str()].as_i64(), Some(expected));
}
