use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use vizserver_api::{AUTH_HEADER, Credentials, Server};
use vizserver_core::config::{ClientConfig, DEFAULT_API_VERSION};
use vizserver_core::error::{JobError, ServerError, is_not_found};
use vizserver_core::model::FinishCode;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "session-token";

fn api(path: &str) -> String {
    format!("/api/{DEFAULT_API_VERSION}{path}")
}

fn site(path: &str) -> String {
    api(&format!("/sites/site-1{path}"))
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><tsResponse xmlns="http://tableau.com/api">{body}</tsResponse>"#
        ))
}

async fn mount_sign_in(mock: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api("/auth/signin")))
        .and(body_string_contains(r#"personalAccessTokenName="ci""#))
        .respond_with(xml(&format!(
            r#"<credentials token="{TOKEN}"><site id="site-1" contentUrl="marketing"/><user id="user-1"/></credentials>"#
        )))
        .expect(1)
        .mount(mock)
        .await;
}

fn client(uri: String, page_size: u32) -> Server {
    let config = ClientConfig {
        server_url: uri,
        site: "marketing".to_string(),
        page_size,
        ..ClientConfig::default()
    };
    let mut server = Server::from_config(&config).unwrap();
    server
        .sign_in(&Credentials::personal_access_token("ci", "s3cret", "marketing"))
        .unwrap();
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn sign_in_and_out_manage_the_session() {
    let mock = MockServer::start().await;
    mount_sign_in(&mock).await;
    Mock::given(method("POST"))
        .and(path(api("/auth/signout")))
        .and(header(AUTH_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let mut server = client(uri, 100);
        let session = server.session().unwrap();
        assert_eq!(session.site_id, "site-1");
        assert_eq!(session.user_id, "user-1");
        server.sign_out().unwrap();
        assert!(!server.is_signed_in());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn projects_pager_follows_pages() {
    let mock = MockServer::start().await;
    mount_sign_in(&mock).await;
    Mock::given(method("GET"))
        .and(path(site("/projects")))
        .and(query_param("pageNumber", "1"))
        .and(header(AUTH_HEADER, TOKEN))
        .respond_with(xml(
            r#"<pagination pageNumber="1" pageSize="2" totalAvailable="3"/><projects><project id="p1" name="Finance"/><project id="p2" name="Sales"/></projects>"#,
        ))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path(site("/projects")))
        .and(query_param("pageNumber", "2"))
        .respond_with(xml(
            r#"<pagination pageNumber="2" pageSize="2" totalAvailable="3"/><projects><project id="p3" name="Ops" parentProjectId="p1"/></projects>"#,
        ))
        .expect(1)
        .mount(&mock)
        .await;

    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let server = client(uri, 2);
        let projects = server.projects().all().unwrap();
        let names: Vec<&str> = projects.iter().map(|project| project.name.as_str()).collect();
        assert_eq!(names, vec!["Finance", "Sales", "Ops"]);
        assert_eq!(projects[2].parent_id.as_deref(), Some("p1"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn not_found_maps_to_server_error() {
    let mock = MockServer::start().await;
    mount_sign_in(&mock).await;
    Mock::given(method("GET"))
        .and(path(site("/workbooks/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"<tsResponse><error code="404006"><summary>Resource Not Found</summary><detail>Workbook 'missing' could not be found.</detail></error></tsResponse>"#,
        ))
        .mount(&mock)
        .await;

    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let server = client(uri, 100);
        let err = server.workbooks().get_by_id("missing").unwrap_err();
        assert!(is_not_found(&err));
        let server_error = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ServerError>())
            .unwrap();
        assert_eq!(server_error.code, "404006");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn throttled_request_is_retried() {
    let mock = MockServer::start().await;
    mount_sign_in(&mock).await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    Mock::given(method("GET"))
        .and(path(site("/users/u1")))
        .respond_with(move |_req: &wiremock::Request| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429).insert_header("retry-after", "0")
            } else {
                xml(r#"<user id="u1" name="ana" siteRole="Viewer"/>"#)
            }
        })
        .mount(&mock)
        .await;

    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let server = client(uri, 100);
        let user = server.users().get_by_id("u1").unwrap();
        assert_eq!(user.name, "ana");
    })
    .await
    .unwrap();
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_then_wait_returns_finished_job() {
    let mock = MockServer::start().await;
    mount_sign_in(&mock).await;
    Mock::given(method("POST"))
        .and(path(site("/workbooks/w1/refresh")))
        .respond_with(xml(
            r#"<job id="j1" mode="Asynchronous" type="RefreshExtract" createdAt="2024-05-01T09:59:00Z"/>"#,
        ))
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path(site("/jobs/j1")))
        .respond_with(xml(
            r#"<job id="j1" mode="Asynchronous" type="RefreshExtract" progress="100" createdAt="2024-05-01T09:59:00Z" completedAt="2024-05-01T10:00:00Z" finishCode="0"/>"#,
        ))
        .mount(&mock)
        .await;

    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let server = client(uri, 100);
        let queued = server.workbooks().refresh("w1").unwrap();
        assert!(!queued.is_complete());
        let job = server
            .jobs()
            .wait_for_job(&queued.id, Some(Duration::from_secs(10)))
            .unwrap();
        assert_eq!(job.finish_code, Some(FinishCode::Success));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_job_surfaces_job_error() {
    let mock = MockServer::start().await;
    mount_sign_in(&mock).await;
    Mock::given(method("GET"))
        .and(path(site("/jobs/j2")))
        .respond_with(xml(
            r#"<job id="j2" mode="Asynchronous" type="RefreshExtract" completedAt="2024-05-01T10:00:00Z" finishCode="1"><extractRefreshJob><notes>extract failed</notes><datasource id="d1"/></extractRefreshJob></job>"#,
        ))
        .mount(&mock)
        .await;

    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let server = client(uri, 100);
        let err = server.jobs().wait_for_job("j2", None).unwrap_err();
        match err.downcast_ref::<JobError>() {
            Some(JobError::Failed(job)) => assert_eq!(job.notes, vec!["extract failed"]),
            other => panic!("unexpected error: {other:?}"),
        }
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn calls_without_session_fail_before_network() {
    let mock = MockServer::start().await;
    let uri = mock.uri();
    tokio::task::spawn_blocking(move || {
        let server = Server::new(&uri).unwrap();
        let err = server.projects().all().unwrap_err();
        assert!(err.to_string().contains("not signed in"));
    })
    .await
    .unwrap();
    assert!(mock.received_requests().await.unwrap().is_empty());
}
