mod common;

use std::time::Duration;

use jobcast_core::Category;
use jobcast_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::descriptor;

#[tokio::test]
async fn fetcher_returns_html_with_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/frontend"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let source = descriptor(Category::Frontend, format!("{}/jobs/{{category}}", server.uri()));

    let output = fetcher.fetch(&source).await.expect("fetch ok");
    assert_eq!(output.metadata.original_url, format!("{}/jobs/frontend", server.uri()));
    assert_eq!(output.metadata.final_url, output.metadata.original_url);
    assert_eq!(output.metadata.redirect_count, 0);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let source = descriptor(Category::Backend, format!("{}/blocked", server.uri()));

    let err = fetcher.fetch(&source).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let source = descriptor(Category::Frontend, format!("{}/slow", server.uri()));

    let err = fetcher.fetch(&source).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let source = descriptor(Category::Frontend, format!("{}/large", server.uri()));

    let err = fetcher.fetch(&source).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_non_html_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::default();
    let source = descriptor(Category::Frontend, format!("{}/api", server.uri()));

    let err = fetcher.fetch(&source).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_malformed_endpoint() {
    let fetcher = ReqwestFetcher::default();
    let source = descriptor(Category::Frontend, "not a url");

    let err = fetcher.fetch(&source).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

async fn redirect(server: &MockServer, from: &str, to: &str) {
    Mock::given(method("GET"))
        .and(path(from))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}{to}", server.uri())),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn redirects_up_to_the_limit_are_followed() {
    let server = MockServer::start().await;
    redirect(&server, "/start", "/final").await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>moved</html>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 1,
        ..FetchSettings::default()
    });
    let source = descriptor(Category::Frontend, format!("{}/start", server.uri()));

    let output = fetcher.fetch(&source).await.expect("one redirect is within the limit");
    assert_eq!(output.metadata.redirect_count, 1);
    assert_eq!(output.metadata.final_url, format!("{}/final", server.uri()));
    assert_eq!(output.bytes, b"<html>moved</html>");
}

#[tokio::test]
async fn redirects_beyond_the_limit_fail() {
    let server = MockServer::start().await;
    redirect(&server, "/start", "/middle").await;
    redirect(&server, "/middle", "/final").await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>moved</html>", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 1,
        ..FetchSettings::default()
    });
    let source = descriptor(Category::Frontend, format!("{}/start", server.uri()));

    let err = fetcher.fetch(&source).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}
