//! Live hosting and file serving over real sockets.

use std::fs;
use std::net::SocketAddr;

use sitebuild::build::generate;
use sitebuild::config::{FileServeConfig, HostConfig};
use sitebuild::http::{FileServer, HostServer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod common;

use common::{build_config, FixtureSite};

async fn local_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_host_serves_the_same_pages_as_generate() {
    let assets = tempfile::tempdir().unwrap();
    fs::write(assets.path().join("site.css"), "body {}").unwrap();

    let mut fixture = FixtureSite::new(&["one", "two"]);
    fixture.failing = vec!["two".into()];
    let config = HostConfig {
        assets_dir: Some(assets.path().to_path_buf()),
        ..HostConfig::default()
    };
    let server = HostServer::new(fixture.into_site(), &config).unwrap();

    let (listener, addr) = local_listener().await;
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run(listener, async {
        let _ = stopped.await;
    }));

    let client = client();
    let base = format!("http://{addr}");

    let res = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    assert_eq!(res.text().await.unwrap(), "root");

    let res = client.get(format!("{base}/about")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "about");

    let res = client.get(format!("{base}/one")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "page one");

    let res = client.get(format!("{base}/two")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "render failed: two is broken");

    let res = client.get(format!("{base}/a/b")).send().await.unwrap();
    assert_eq!(res.status(), 400);

    let res = client.post(format!("{base}/one")).send().await.unwrap();
    assert_eq!(res.status(), 405);
    assert!(res.text().await.unwrap().is_empty());

    let res = client.get(format!("{base}/static/site.css")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "body {}");

    drop(client);
    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_host_rejects_duplicate_routes_at_startup() {
    let mut fixture = FixtureSite::new(&[]);
    fixture.duplicate_route = true;

    assert!(HostServer::new(fixture.into_site(), &HostConfig::default()).is_err());
}

#[tokio::test]
async fn test_file_server_serves_generated_output() {
    let out = tempfile::tempdir().unwrap();
    generate(FixtureSite::new(&["one"]).into_site(), &build_config(out.path(), 2))
        .await
        .unwrap();

    let server = FileServer::new(out.path(), &FileServeConfig::default());
    let (listener, addr) = local_listener().await;
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run(listener, async {
        let _ = stopped.await;
    }));

    let client = client();
    let base = format!("http://{addr}");

    let res = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "root");

    let res = client.get(format!("{base}/one")).send().await.unwrap();
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    assert_eq!(res.text().await.unwrap(), "page one");

    let res = client.get(format!("{base}/missing")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    drop(client);
    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
