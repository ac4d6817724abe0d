use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::auth::service::AuthConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::{routes, ServerState};

const ADMIN_EMAIL: &str = "admin@example.com";

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }
}

/// In-memory server on an ephemeral port; no database required.
async fn start_server() -> anyhow::Result<TestApp> {
    let mut auth = AuthConfig::with_secret("test-secret");
    auth.admin_emails = vec![ADMIN_EMAIL.into()];
    let app = routes::build_router(ServerState::in_memory(auth), CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()) })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

/// Registers and logs in through `c`, returning the bearer token.
async fn sign_up(app: &TestApp, c: &reqwest::Client, email: &str) -> anyhow::Result<String> {
    let res = c.post(app.url("/auth/register"))
        .json(&json!({"email": email, "username": "tester", "password": "S3curePass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(app.url("/auth/login"))
        .json(&json!({"email": email, "password": "S3curePass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.headers().get("set-cookie").is_some());
    let body: Value = res.json().await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn e2e_public_health_and_docs() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");

    let res = client().get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<Value>().await?;
    assert!(doc["paths"]["/api/screens/claim_next"].is_object());
    Ok(())
}

#[tokio::test]
async fn e2e_anonymous_caller() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.get(app.url("/api/screens")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let res = c.get(app.url("/api/screens/my_screens")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let res = c.post(app.url("/api/services")).json(&json!({"name": "Netflix"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Unauthorized");
    assert!(body["detail"].is_string());

    let res = c.get(app.url("/auth/me")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_bad_tokens_are_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.get(app.url("/api/screens")).header("Authorization", "Bearer not-a-jwt").send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = c.get(app.url("/api/screens")).header("Authorization", "Basic dTpw").send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    use jsonwebtoken::{encode, EncodingKey, Header};
    #[derive(serde::Serialize)]
    struct Claims { sub: String, uid: uuid::Uuid, adm: bool, exp: usize }
    let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_secs() as usize;
    let claims = Claims { sub: "u@e.com".into(), uid: uuid::Uuid::new_v4(), adm: true, exp: now.saturating_sub(600) };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret("test-secret".as_bytes()))?;
    let res = c.get(app.url("/api/screens")).bearer_auth(token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_register_conflict_and_me() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    sign_up(&app, &c, "someone@example.com").await?;

    let res = c.get(app.url("/auth/me")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let me = res.json::<Value>().await?;
    assert_eq!(me["email"], "someone@example.com");
    assert_eq!(me["is_admin"], false);

    let res = c.post(app.url("/auth/register"))
        .json(&json!({"email": "someone@example.com", "username": "again", "password": "An0therPass"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = c.post(app.url("/auth/login"))
        .json(&json!({"email": "someone@example.com", "password": "wrong-password"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = c.post(app.url("/auth/logout")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(app.url("/auth/me")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_account_screen_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let admin = reqwest::Client::new();
    let admin_token = sign_up(&app, &admin, ADMIN_EMAIL).await?;
    let member = client();
    sign_up(&app, &member, "member@example.com").await?;

    // Catalog is admin-only.
    let res = member.post(app.url("/api/services")).json(&json!({"name": "Netflix"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
    let res = admin.post(app.url("/api/services")).bearer_auth(&admin_token).json(&json!({"name": "Netflix"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let service_id = res.json::<Value>().await?["id"].clone();

    // Member lists an account with two screens.
    let res = member.post(app.url("/api/accounts"))
        .json(&json!({"service": service_id, "username": "fam@netflix", "password": "pw", "price_per_screen": 450, "total_screens": 2}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let account = res.json::<Value>().await?;
    assert_eq!(account["price_per_screen"], 450);
    assert_eq!(account["verified"], false);
    let account_id = account["id"].as_str().unwrap_or_default().to_string();

    // Admin provisions screens up to capacity.
    for _ in 0..2 {
        let res = admin.post(app.url("/api/screens")).bearer_auth(&admin_token)
            .json(&json!({"streaming_account": account_id}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }
    let res = admin.post(app.url("/api/screens")).bearer_auth(&admin_token)
        .json(&json!({"streaming_account": account_id}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let offered = member.get(app.url("/api/screens")).send().await?.json::<Value>().await?;
    assert_eq!(offered.as_array().map(Vec::len), Some(1));
    assert_eq!(offered[0]["streaming_account"], account_id.as_str());
    assert_eq!(offered[0]["payment_status"], "N");
    assert!(offered[0]["user"].is_null());
    assert!(offered[0]["subscription_date"].is_string());

    // Claim the least-loaded screen; the same screen cannot be claimed twice.
    let res = member.post(app.url("/api/screens/claim_next")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let screen = res.json::<Value>().await?;
    let screen_id = screen["id"].as_str().unwrap_or_default().to_string();
    let res = admin.post(app.url(&format!("/api/screens/{screen_id}/claim"))).bearer_auth(&admin_token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    // Payment status walks N -> P -> C and round-trips as its code.
    for code in ["P", "C"] {
        let res = member.patch(app.url(&format!("/api/screens/{screen_id}")))
            .json(&json!({"payment_status": code}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        assert_eq!(res.json::<Value>().await?["payment_status"], code);
    }
    let res = member.patch(app.url(&format!("/api/screens/{screen_id}")))
        .json(&json!({"payment_status": "X"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let res = member.patch(app.url(&format!("/api/screens/{screen_id}")))
        .json(&json!({"is_active": false}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    let mine = member.get(app.url("/api/screens/my_screens")).send().await?.json::<Value>().await?;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["payment_status"], "C");

    // `"user": null` releases the screen, and only an admin may do that.
    let res = member.patch(app.url(&format!("/api/screens/{screen_id}")))
        .json(&json!({"user": null}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
    let res = admin.patch(app.url(&format!("/api/screens/{screen_id}")))
        .bearer_auth(&admin_token)
        .json(&json!({"user": null}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.json::<Value>().await?["user"].is_null());
    let mine = member.get(app.url("/api/screens/my_screens")).send().await?.json::<Value>().await?;
    assert_eq!(mine.as_array().map(Vec::len), Some(0));

    // Owners cannot shrink below provisioned screens; deleting cascades.
    let res = member.patch(app.url(&format!("/api/accounts/{account_id}")))
        .json(&json!({"total_screens": 1}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let res = member.delete(app.url(&format!("/api/accounts/{account_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = member.get(app.url(&format!("/api/screens/{screen_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_accounts_are_private_to_owner() -> anyhow::Result<()> {
    let app = start_server().await?;
    let admin = reqwest::Client::new();
    let admin_token = sign_up(&app, &admin, ADMIN_EMAIL).await?;
    let alice = client();
    sign_up(&app, &alice, "alice@example.com").await?;
    let bob = client();
    sign_up(&app, &bob, "bob@example.com").await?;

    let service = admin.post(app.url("/api/services")).bearer_auth(&admin_token)
        .json(&json!({"name": "Disney+"}))
        .send().await?.json::<Value>().await?;
    let account = alice.post(app.url("/api/accounts"))
        .json(&json!({"service": service["id"], "username": "a", "password": "b", "total_screens": 4}))
        .send().await?.json::<Value>().await?;
    let account_id = account["id"].as_str().unwrap_or_default().to_string();

    let res = bob.get(app.url(&format!("/api/accounts/{account_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let listed = bob.get(app.url("/api/accounts")).send().await?.json::<Value>().await?;
    assert_eq!(listed, json!([]));
    let res = admin.get(app.url(&format!("/api/accounts/{account_id}"))).bearer_auth(&admin_token).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}
