//! Live server tests over TCP.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::mpsc;

use cms_router::config::RouterConfig;
use cms_router::http::HttpServer;
use cms_router::lifecycle::Shutdown;

mod common;
use common::*;

async fn start_server(
    config: RouterConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<RouterConfig>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, common::api());
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    (addr, shutdown, config_tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_serves_pages_and_redirects() {
    let (addr, shutdown, _config_tx) = start_server(RouterConfig::default()).await;
    let client = client();

    let res = client
        .get(format!("http://{}/about/team", addr))
        .header("host", "www.example.com")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["content"]["page"]["id"], TEAM.to_string());

    let res = client
        .get(format!("http://{}/old-url", addr))
        .header("host", "example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 301);
    assert_eq!(res.headers()["location"], "/about");

    shutdown.trigger();
}

#[tokio::test]
async fn test_sitemap_uses_request_host() {
    let (addr, shutdown, _config_tx) = start_server(RouterConfig::default()).await;

    let res = client()
        .get(format!("http://{}/sitemap.xml", addr))
        .header("host", "other.org")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let xml = res.text().await.unwrap();
    assert!(xml.contains("<loc>http://other.org/welcome</loc>"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_config_updates_are_applied() {
    let (addr, shutdown, config_tx) = start_server(RouterConfig::default()).await;
    let client = client();
    let url = format!("http://{}/about", addr);

    let res = client.get(&url).header("host", "example.com").send().await.unwrap();
    assert_eq!(res.headers()["cache-control"], "no-cache");

    let mut config = RouterConfig::default();
    config.cache.page_expires_secs = 90;
    config_tx.send(config).unwrap();

    // Reload is applied by a background task
    let mut cache_control = String::new();
    for _ in 0..50 {
        let res = client.get(&url).header("host", "example.com").send().await.unwrap();
        cache_control = res.headers()["cache-control"].to_str().unwrap().to_string();
        if cache_control != "no-cache" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(cache_control, "public, max-age=90");

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let (addr, shutdown, _config_tx) = start_server(RouterConfig::default()).await;
    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let result = client()
        .get(format!("http://{}/about", addr))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(result.is_err());
}
