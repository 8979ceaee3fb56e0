use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::AppConfig;

struct TestApp {
    base_url: String,
    root: std::path::PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let root = std::env::temp_dir().join(format!("contacts_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.contacts_path = root.join("data/contacts.json").display().to_string();
    cfg.storage.users_path = root.join("data/users.json").display().to_string();
    cfg.storage.public_dir = root.join("public").display().to_string();
    cfg.storage.temp_dir = root.join("tmp").display().to_string();
    cfg.auth.jwt_secret = "test-secret".into();

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server error: {e}");
        }
    });
    Ok(TestApp { base_url: format!("http://{addr}"), root })
}

#[tokio::test]
async fn e2e_contacts_and_cookie_session() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::builder().cookie_store(true).build()?;

    let res = client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = client
        .post(format!("{}/api/contacts", app.base_url))
        .json(&json!({"name": "Ann", "email": "ann@x.com", "phone": "123"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;

    let res = client.get(format!("{}/api/contacts", app.base_url)).send().await?;
    let all: Vec<Value> = res.json().await?;
    assert_eq!(all, vec![created.clone()]);

    // persisted with two-space indentation
    let raw = tokio::fs::read_to_string(app.root.join("data/contacts.json")).await?;
    assert!(raw.contains("\n  {"), "{raw}");

    let creds = json!({"email": "e2e@example.com", "password": "S3curePass!"});
    let res = client.post(format!("{}/api/users/signup", app.base_url)).json(&creds).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let res = client.post(format!("{}/api/users/login", app.base_url)).json(&creds).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // the client now carries the auth cookie
    let res = client.get(format!("{}/api/users/current", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["email"], "e2e@example.com");

    let res = client.get(format!("{}/api/users/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = client.get(format!("{}/api/users/current", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let _ = tokio::fs::remove_dir_all(&app.root).await;
    Ok(())
}
