//! HTTP tests of the admin service against the in-memory backend

use std::net::SocketAddr;

use admin::{AppState, create_router};
use chrono::{Duration, Utc};
use common::backend::{Backend, MemoryBackend, MemoryOp};
use common::models::{Customer, Order, OrderProduct, OrderStatus, Product, SiteSettings};
use reqwest::{StatusCode, header::LOCATION, multipart, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

const SECRET: &str = "test-jwt-secret";
const EMAIL: &str = "staff@example.com";
const PASSWORD: &str = "hunter22";

struct TestApp {
    addr: SocketAddr,
    memory: MemoryBackend,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let memory = MemoryBackend::new(SECRET, "http://localhost:54321", "products");
        memory.add_staff(EMAIL, PASSWORD).await;

        let state = AppState::new(
            Backend::memory(memory.clone()),
            SECRET,
            Duration::milliseconds(3000),
        );
        let app = create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            addr,
            memory,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn login(&self) -> String {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        body["access_token"].as_str().unwrap().to_string()
    }
}

fn product(name: &str, price: f64) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        price,
        image_url: None,
        is_highlighted: false,
        created_at: Utc::now(),
        updated_at: None,
        updated_by: None,
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_unreachable_backend() {
    let app = TestApp::spawn().await;
    app.memory.fail_next(MemoryOp::HealthCheck).await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "degraded");

    let recovered = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(recovered.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_redirect_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/", "/products", "/settings", "/orders"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    let forged = app
        .client
        .get(app.url("/"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_failures_are_localized() {
    let app = TestApp::spawn().await;

    let wrong = app
        .client
        .post(app.url("/login"))
        .json(&json!({ "email": EMAIL, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json().await.unwrap();
    assert_eq!(body["error"], "Email ou senha inválidos");

    app.memory.fail_next(MemoryOp::SignIn).await;
    let offline = app
        .client
        .post(app.url("/login"))
        .json(&json!({ "email": EMAIL, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(offline.status(), StatusCode::BAD_GATEWAY);
    let body: Value = offline.json().await.unwrap();
    assert_eq!(body["error"], "Falha de conexão com o servidor");

    let missing = app
        .client
        .post(app.url("/login"))
        .json(&json!({ "email": EMAIL }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_without_image_shows_placeholder() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let form = multipart::Form::new()
        .text("name", "Ovo de Páscoa")
        .text("description", "Ovo trufado 250g")
        .text("price", "39.9");
    let response = app
        .client
        .post(app.url("/products"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["form"]["name"], "");
    assert_eq!(body["notification"]["kind"], "success");

    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Ovo de Páscoa");
    assert_eq!(products[0]["price_label"], "R$ 39.90");
    assert_eq!(products[0]["image"]["kind"], "placeholder");
    assert!(app.memory.object_names().await.is_empty());
}

#[tokio::test]
async fn test_create_product_requires_fields() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let form = multipart::Form::new()
        .text("name", "Ovo de Páscoa")
        .text("price", "39.9");
    let response = app
        .client
        .post(app.url("/products"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Campo obrigatório: Descrição");
    assert!(!app.memory.calls().await.contains(&MemoryOp::InsertProduct));
}

#[tokio::test]
async fn test_edit_with_new_image_keeps_url() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let image = multipart::Part::bytes(b"old".to_vec())
        .file_name("ovo.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new()
        .text("name", "Ovo de Páscoa")
        .text("description", "Ovo trufado 250g")
        .text("price", "39.9")
        .part("image", image);
    let created: Value = app
        .client
        .post(app.url("/products"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["product"]["id"].as_str().unwrap().to_string();
    let original_url = created["product"]["image"]["url"].clone();

    let image = multipart::Part::bytes(b"new".to_vec())
        .file_name("outro.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new()
        .text("name", "Ovo de Páscoa")
        .text("description", "Ovo trufado 500g")
        .text("price", "59.9")
        .text("is_highlighted", "on")
        .part("image", image);
    let response = app
        .client
        .put(app.url(&format!("/edit/{}", id)))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect_to"], "/");
    assert_eq!(body["product"]["image"]["url"], original_url);
    assert_eq!(body["product"]["badge"], "Destaque");
    assert_eq!(app.memory.object_names().await.len(), 1);
}

#[tokio::test]
async fn test_create_product_accepts_large_image() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let bytes = vec![7u8; 3 * 1024 * 1024];
    let image = multipart::Part::bytes(bytes.clone())
        .file_name("ovo.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let form = multipart::Form::new()
        .text("name", "Ovo de Páscoa")
        .text("description", "Ovo trufado 1kg")
        .text("price", "129.9")
        .part("image", image);
    let response = app
        .client
        .post(app.url("/products"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let names = app.memory.object_names().await;
    assert_eq!(names.len(), 1);
    let stored = app.memory.object(&names[0]).await.unwrap();
    assert_eq!(stored.bytes.len(), bytes.len());
    assert_eq!(stored.content_type, "image/jpeg");
}

#[tokio::test]
async fn test_edit_of_missing_product_returns_to_panel() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .client
        .get(app.url(&format!("/edit/{}", Uuid::new_v4())))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");

    let notifications: Value = app
        .client
        .get(app.url("/notifications"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(notifications[0]["message"], "Erro ao carregar produto");
}

#[tokio::test]
async fn test_delete_with_failed_image_removal_keeps_product() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let mut seeded = product("Colomba", 49.9);
    seeded.image_url =
        Some("http://localhost:54321/storage/v1/object/public/products/1-colomba.png".to_string());
    app.memory
        .seed_object("1-colomba.png", b"png".to_vec(), "image/png")
        .await;
    app.memory.seed_product(seeded.clone()).await;
    app.memory.fail_next(MemoryOp::Remove).await;

    let response = app
        .client
        .delete(app.url(&format!("/products/{}", seeded.id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Erro ao remover imagem do produto");
    assert!(app.memory.product(seeded.id).await.is_some());

    let response = app
        .client
        .delete(app.url(&format!("/products/{}", seeded.id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.memory.product(seeded.id).await.is_none());
    assert!(app.memory.object("1-colomba.png").await.is_none());
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_list() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    app.memory.seed_product(product("Bolo", 20.0)).await;

    let first: Value = app
        .client
        .get(app.url("/products"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["products"].as_array().unwrap().len(), 1);

    app.memory.fail_next(MemoryOp::ListProducts).await;
    let second: Value = app
        .client
        .get(app.url("/products"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["products"][0]["name"], "Bolo");
    assert_eq!(second["notifications"][0]["message"], "Erro ao carregar produtos");
}

#[tokio::test]
async fn test_settings_update_requires_loaded_row() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    let id = Uuid::new_v4();
    app.memory
        .seed_settings(SiteSettings {
            id: Some(id),
            title: "Loja".to_string(),
            subtitle: "Páscoa".to_string(),
            whatsapp_number: 0,
        })
        .await;

    let payload = json!({
        "title": "Loja de Páscoa",
        "subtitle": "Chocolates artesanais",
        "whatsapp_number": 5511999990000_i64,
    });

    let response = app
        .client
        .put(app.url("/settings"))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "ID das configurações não encontrado");
    assert!(!app.memory.calls().await.contains(&MemoryOp::UpdateSettings));

    let loaded: Value = app
        .client
        .get(app.url("/settings"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded["title"], "Loja");

    let response = app
        .client
        .put(app.url("/settings"))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        app.memory.settings().await.unwrap().title,
        "Loja de Páscoa"
    );
}

#[tokio::test]
async fn test_orders_render_and_change_status() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let order = Order {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        full_price: 25.0,
        updated_at: None,
        updated_by: None,
        status: OrderStatus::Finished,
        user: Some(Customer {
            id: Uuid::new_v4(),
            email: "cliente@example.com".to_string(),
            username: Some("Maria".to_string()),
            whatsapp_number: None,
        }),
        products: vec![
            OrderProduct {
                product: product("Product A", 10.0),
                product_quantity: 2,
            },
            OrderProduct {
                product: product("Product B", 5.0),
                product_quantity: 1,
            },
        ],
    };
    app.memory.seed_order(order.clone()).await;

    let listed: Value = app
        .client
        .get(app.url("/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["orders"][0]["total"], "R$ 25,00");
    assert_eq!(listed["orders"][0]["customer"], "Maria");
    assert_eq!(listed["orders"][0]["actions"][3]["enabled"], false);

    let same = app
        .client
        .post(app.url(&format!("/orders/{}/status", order.id)))
        .bearer_auth(&token)
        .json(&json!({ "status": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(same.status(), StatusCode::CONFLICT);

    let back = app
        .client
        .post(app.url(&format!("/orders/{}/status", order.id)))
        .bearer_auth(&token)
        .json(&json!({ "status": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(back.status(), StatusCode::OK);
    let body: Value = back.json().await.unwrap();
    assert_eq!(body["orders"][0]["status"], 1);
    assert_eq!(body["orders"][0]["status_label"], "Criado");

    let invalid = app
        .client
        .post(app.url(&format!("/orders/{}/status", order.id)))
        .bearer_auth(&token)
        .json(&json!({ "status": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_change_survives_failed_reload() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let order = Order {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        full_price: 10.0,
        updated_at: None,
        updated_by: None,
        status: OrderStatus::Created,
        user: None,
        products: vec![],
    };
    app.memory.seed_order(order.clone()).await;
    app.memory.fail_next(MemoryOp::ListOrders).await;

    let response = app
        .client
        .post(app.url(&format!("/orders/{}/status", order.id)))
        .bearer_auth(&token)
        .json(&json!({ "status": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["order"]["status"], 2);
    assert!(body["orders"].is_null());
    assert_eq!(body["notification"]["kind"], "success");

    let messages: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Erro ao carregar pedidos"));
    assert_eq!(
        app.memory.order(order.id).await.unwrap().status,
        OrderStatus::InPreparation
    );
}

#[tokio::test]
async fn test_logout_invalidates_token_even_on_backend_failure() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    app.memory.fail_next(MemoryOp::SignOut).await;

    let response = app
        .client
        .post(app.url("/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect_to"], "/login");
    assert_eq!(body["notification"]["message"], "Erro ao sair");

    let after = app
        .client
        .get(app.url("/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_panel_selects_tab_and_dismisses_notifications() {
    let app = TestApp::spawn().await;
    let token = app.login().await;
    app.memory.fail_next(MemoryOp::LoadSettings).await;

    let panel: Value = app
        .client
        .get(app.url("/?tab=2"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(panel["tab"], 2);
    assert_eq!(panel["tabs"][2]["active"], true);
    assert_eq!(panel["notifications"][0]["message"], "Erro ao carregar configurações");

    let id = panel["notifications"][0]["id"].as_str().unwrap().to_string();
    let dismissed = app
        .client
        .delete(app.url(&format!("/notifications/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(dismissed.status(), StatusCode::NO_CONTENT);

    let again = app
        .client
        .delete(app.url(&format!("/notifications/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
