/*!
 * Integration tests for redirect resolution against a mock server
 */

use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yt_sub_fetch::app_config::Config;
use yt_sub_fetch::http_client::{build_page_client, session_headers};
use yt_sub_fetch::resolver::{resolve, resolve_with_session};
use yt_sub_fetch::FetchError;

/// Mount `/hop/0 -> /hop/1 -> ... -> /hop/{redirects}`, the last one a 200
async fn mount_redirect_chain(server: &MockServer, redirects: u32) {
    for hop in 0..redirects {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{}", hop)))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", format!("/hop/{}", hop + 1).as_str()))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/hop/{}", redirects)))
        .respond_with(ResponseTemplate::new(200).set_body_string("final page"))
        .mount(server)
        .await;
}

fn client() -> reqwest::Client {
    build_page_client(&Config::default()).expect("client")
}

#[tokio::test]
async fn test_resolve_withDirectSuccess_shouldReturnPage() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 0).await;

    let page = resolve(&client(), &format!("{}/hop/0", server.uri()), 5).await.unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "final page");
    assert_eq!(page.url.path(), "/hop/0");
}

#[tokio::test]
async fn test_resolve_withOneHopFewerThanLimit_shouldReturnFinalPage() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 4).await;

    let page = resolve(&client(), &format!("{}/hop/0", server.uri()), 5).await.unwrap();

    assert_eq!(page.body, "final page");
    assert_eq!(page.url.path(), "/hop/4");
}

#[tokio::test]
async fn test_resolve_withChainLongerThanLimit_shouldFail() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 6).await;

    let result = resolve(&client(), &format!("{}/hop/0", server.uri()), 5).await;

    assert!(matches!(result, Err(FetchError::TooManyRedirects { max_hops: 5 })));
}

#[tokio::test]
async fn test_resolve_withChainEqualToLimit_shouldFail() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 5).await;

    let result = resolve(&client(), &format!("{}/hop/0", server.uri()), 5).await;

    assert!(matches!(result, Err(FetchError::TooManyRedirects { .. })));
}

#[tokio::test]
async fn test_resolve_withErrorStatus_shouldReturnPageAsIs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let page = resolve(&client(), &format!("{}/gone", server.uri()), 5).await.unwrap();

    assert_eq!(page.status, 404);
    assert_eq!(page.body, "not here");
}

#[tokio::test]
async fn test_resolve_withRedirectWithoutLocation_shouldStop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301))
        .expect(1)
        .mount(&server)
        .await;

    let page = resolve(&client(), &format!("{}/moved", server.uri()), 5).await.unwrap();

    assert_eq!(page.status, 301);
    assert!(page.body.is_empty());
}

#[tokio::test]
async fn test_resolve_shouldSendBrowserHeaders() {
    let server = MockServer::start().await;
    let config = Config::default();
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .and(header_exists("cookie"))
        .and(header("referer", config.headers.referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_headers(&config).unwrap();
    let page = resolve_with_session(&client(), &format!("{}/watch", server.uri()), 5, &session)
        .await
        .unwrap();

    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_resolve_withRedirectToOtherHost_shouldNotLeakSessionHeaders() {
    let origin = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", format!("{}/consent", elsewhere.uri()).as_str()))
        .expect(1)
        .mount(&origin)
        .await;
    // Mounted first so it wins whenever a Cookie arrives
    Mock::given(method("GET"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&elsewhere)
        .await;
    Mock::given(method("GET"))
        .and(path("/consent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("consent page"))
        .expect(1)
        .mount(&elsewhere)
        .await;

    let session = session_headers(&Config::default()).unwrap();
    let page = resolve_with_session(&client(), &format!("{}/watch", origin.uri()), 5, &session)
        .await
        .unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "consent page");
}

#[tokio::test]
async fn test_resolve_withSameHostRedirect_shouldKeepSessionHeaders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/final"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .and(header_exists("cookie"))
        .and(header_exists("referer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("final page"))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_headers(&Config::default()).unwrap();
    let page = resolve_with_session(&client(), &format!("{}/watch", server.uri()), 5, &session)
        .await
        .unwrap();

    assert_eq!(page.body, "final page");
}

#[tokio::test]
async fn test_resolve_withInvalidUrl_shouldFail() {
    let result = resolve(&client(), "not a url", 5).await;
    assert!(matches!(result, Err(FetchError::InvalidRequestUrl(_))));
}
