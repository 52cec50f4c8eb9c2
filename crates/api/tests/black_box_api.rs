use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_api::config::ApiConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod with the demo data, but cheap hashing and an ephemeral port.
        let config = ApiConfig {
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            ..ApiConfig::default()
        };
        let app = stockroom_api::app::build_app(&config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn get(&self, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn send(&self, method: reqwest::Method, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn delete(&self, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self.client.delete(self.url(path)).bearer_auth(token).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn available(srv: &TestServer, token: &str, item_id: u64) -> i64 {
    let (status, body) = srv.get(&format!("/inventory/{item_id}"), token).await;
    assert_eq!(status, StatusCode::OK);
    body["quantity"].as_i64().unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "OK", "message": "Server is running" }));
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/items")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "missing_token");

    let (status, _) = srv.get("/orders", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/login"))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/login"))
        .json(&json!({ "username": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_login_me_logout() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/register"))
        .json(&json!({ "username": "carol", "password": "secret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["user"]["username"], "carol");
    assert_eq!(created["user"]["id"], 3);

    let res = srv
        .client
        .post(srv.url("/register"))
        .json(&json!({ "username": "carol", "password": "secret2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let token = srv.login("carol", "secret1").await;
    let (status, me) = srv.get("/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "carol");

    let (status, _) = srv.send(reqwest::Method::POST, "/logout", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = srv.get("/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_revoked");
}

#[tokio::test]
async fn items_are_scoped_to_their_owner() {
    let srv = TestServer::spawn().await;
    let admin = srv.login("admin", "password").await;
    let user1 = srv.login("user1", "user123").await;

    let (_, items) = srv.get("/items", &admin).await;
    let titles: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Laptop", "Wireless Mouse"]);

    // Coffee Mug belongs to user1; for admin it does not exist.
    let (status, _) = srv.get("/items/3", &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, mug) = srv.get("/items/3", &user1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mug["userId"], 2);

    let (status, _) = srv
        .send(reqwest::Method::PUT, "/items/3", &admin, json!({ "title": "Mine now" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = srv.get("/items/abc", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn item_crud_with_inventory_cascade() {
    let srv = TestServer::spawn().await;
    let token = srv.login("admin", "password").await;

    let (status, body) = srv
        .send(reqwest::Method::POST, "/items", &token, json!({ "description": "no title" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let (status, item) = srv
        .send(reqwest::Method::POST, "/items", &token, json!({ "title": "Monitor" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["description"], "");
    let id = item["id"].as_u64().unwrap();
    assert_eq!(id, 4);

    let (status, updated) = srv
        .send(
            reqwest::Method::PUT,
            &format!("/items/{id}"),
            &token,
            json!({ "title": "4K Monitor", "description": "27 inch" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "4K Monitor");

    let (status, _) = srv
        .send(reqwest::Method::POST, "/inventory", &token, json!({ "itemId": id, "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = srv
        .send(reqwest::Method::POST, "/inventory", &token, json!({ "itemId": id, "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, deleted) = srv.delete(&format!("/items/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["item"]["title"], "4K Monitor");

    let (status, _) = srv.get(&format!("/inventory/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inventory_views_and_low_stock() {
    let srv = TestServer::spawn().await;
    let token = srv.login("user1", "user123").await;

    let (status, all) = srv.get("/inventory", &token).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["item"]["title"], "Laptop");
    assert_eq!(all[0]["lowStock"], false);

    let (status, _) = srv
        .send(reqwest::Method::PUT, "/inventory/2", &token, json!({ "quantity": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, level) = srv
        .send(reqwest::Method::PUT, "/inventory/2", &token, json!({ "quantity": 4 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(level["lowStock"], true);

    let (_, low) = srv.get("/inventory/low-stock", &token).await;
    let low_items: Vec<u64> = low
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["itemId"].as_u64().unwrap())
        .collect();
    assert_eq!(low_items, vec![2]);

    let (status, removed) = srv.delete("/inventory/2", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["inventory"]["quantity"], 4);
    let (status, _) = srv.delete("/inventory/2", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_lifecycle_keeps_inventory_consistent() {
    let srv = TestServer::spawn().await;
    let token = srv.login("admin", "password").await;
    assert_eq!(available(&srv, &token, 1).await, 10);

    let (status, order) = srv
        .send(reqwest::Method::POST, "/orders", &token, json!({ "itemId": 1, "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["item"]["title"], "Laptop");
    let path = format!("/orders/{}", order["id"].as_u64().unwrap());
    assert_eq!(available(&srv, &token, 1).await, 7);

    let (status, _) = srv
        .send(reqwest::Method::PUT, &path, &token, json!({ "quantity": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available(&srv, &token, 1).await, 5);

    let (status, body) = srv
        .send(reqwest::Method::PUT, &path, &token, json!({ "quantity": 50 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_inventory");
    assert_eq!(available(&srv, &token, 1).await, 5);

    let (status, _) = srv
        .send(reqwest::Method::PUT, &path, &token, json!({ "status": "shipped" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cancelled) = srv
        .send(reqwest::Method::PUT, &path, &token, json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(available(&srv, &token, 1).await, 10);

    let (status, _) = srv.delete(&path, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available(&srv, &token, 1).await, 10);

    let (status, _) = srv.delete(&path, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_are_scoped_and_oversized_orders_fail() {
    let srv = TestServer::spawn().await;
    let admin = srv.login("admin", "password").await;
    let user1 = srv.login("user1", "user123").await;

    let (_, mine) = srv.get("/orders", &admin).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);
    let (_, theirs) = srv.get("/orders", &user1).await;
    assert!(theirs.as_array().unwrap().is_empty());

    let (status, _) = srv.get("/orders/1", &user1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = srv.delete("/orders/1", &user1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = srv
        .send(reqwest::Method::POST, "/orders", &user1, json!({ "itemId": 3, "quantity": 16 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_inventory");

    let (status, _) = srv
        .send(reqwest::Method::POST, "/orders", &user1, json!({ "itemId": 99, "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = srv
        .send(reqwest::Method::POST, "/orders", &user1, json!({ "itemId": 3 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Completed demo order #2: deleting it gives nothing back.
    assert_eq!(available(&srv, &admin, 2).await, 25);
    let (status, _) = srv.delete("/orders/2", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available(&srv, &admin, 2).await, 25);
}
