use std::time::Duration;

use cloud_dav_rs::{ClientConfig, CloudClient, ErrorKind, RequestOptions, codes};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::client_for;

#[tokio::test]
async fn session_cookies_are_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/remote.php/dav/files/alice/first.txt"))
        .respond_with(
            ResponseTemplate::new(204)
                .append_header("set-cookie", "oc_session=abc; Path=/; HttpOnly")
                .append_header("set-cookie", "nc_token=xyz; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/remote.php/dav/files/alice/second.txt"))
        .and(header("cookie", "oc_session=abc; nc_token=xyz"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = RequestOptions::default();
    client.files().delete("first.txt", &opts).await.expect("first delete");
    assert_eq!(
        client.cookies().cookies(client.account()),
        vec!["oc_session=abc", "nc_token=xyz"]
    );
    client.files().delete("second.txt", &opts).await.expect("cookie replayed");
}

#[tokio::test]
async fn switching_accounts_drops_session_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204).append_header("set-cookie", "oc_session=abc"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .files()
        .delete("x.txt", &RequestOptions::default())
        .await
        .expect("delete");
    assert!(!client.cookies().is_empty());

    let bob = ClientConfig::new(&server.uri(), "bob", "pw")
        .into_context()
        .expect("valid context");
    let switched = client.switch_account(bob);
    assert!(client.cookies().is_empty());
    assert_eq!(switched.context().user_id, "bob");
}

#[tokio::test]
async fn client_defaults_merge_with_call_options() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(header("x-client", "sync"))
        .and(header("x-request", "42"))
        .and(header("user-agent", "Desktop/3.0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_options(
        RequestOptions::default()
            .with_header("X-Client", "sync")
            .with_user_agent("Desktop/3.0"),
    );
    client
        .files()
        .delete("a.txt", &RequestOptions::default().with_header("X-Request", "42"))
        .await
        .expect("headers merged");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .files()
        .delete(
            "slow.txt",
            &RequestOptions::default().with_timeout(Duration::from_millis(100)),
        )
        .await
        .expect_err("timed out");
    assert_eq!(err.code(), codes::TIMED_OUT);
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let client = CloudClient::new(ClientConfig::new("http://127.0.0.1:1", "alice", "pw"))
        .expect("valid base url");
    let err = client
        .files()
        .delete("a.txt", &RequestOptions::default())
        .await
        .expect_err("nothing listens on port 1");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.code() < 0);
}

#[tokio::test]
async fn cancelling_a_dispatched_request_completes_with_cancel_code() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (handle, done) = client.dispatch_channel(|c| async move {
        c.files().delete("big.bin", &RequestOptions::default()).await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();

    let completion = done.await.expect("completion delivered");
    assert_eq!(completion.account, client.account());
    assert_eq!(completion.normalized().code, codes::CANCELLED);
}

#[tokio::test]
async fn dispatched_requests_run_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let receivers: Vec<_> = ["a.txt", "b.txt", "c.txt"]
        .into_iter()
        .map(|name| {
            let (_handle, done) = client.dispatch_channel(move |c| async move {
                c.files().delete(name, &RequestOptions::default()).await
            });
            done
        })
        .collect();

    let completions = futures::future::join_all(receivers).await;
    for completion in completions {
        let completion = completion.expect("completion delivered");
        assert!(completion.is_success());
    }
}

#[tokio::test]
async fn shared_transport_and_cookie_store() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(
            ResponseTemplate::new(204)
                .append_header("set-cookie", "oc_session=abc")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut transport = cloud_dav_rs::WebDavClient::new();
    transport.set_default_timeout(Some(Duration::from_millis(100)));
    let cookies = cloud_dav_rs::CookieStore::new();
    let client = client_for(&server)
        .with_transport(transport)
        .with_cookie_store(cookies.clone());

    let err = client
        .files()
        .delete("a.txt", &RequestOptions::default())
        .await
        .expect_err("transport default timeout applies");
    assert_eq!(err.code(), codes::TIMED_OUT);

    client
        .files()
        .delete("a.txt", &RequestOptions::default().with_timeout(Duration::from_secs(10)))
        .await
        .expect("call timeout overrides the transport default");
    assert_eq!(cookies.cookies(client.account()), vec!["oc_session=abc"]);

    client.session_delete_cookies();
    assert!(cookies.is_empty());
}
