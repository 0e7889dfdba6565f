use serde_json::{json, Value};

use crate::support::{form, start_server, start_server_with_limit, with_image};

#[tokio::test]
async fn health_check() {
    let server = start_server().await;
    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn empty_catalog_lists_wrapped_array() {
    let server = start_server().await;
    let resp = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "products": [] }));
}

#[tokio::test]
async fn create_drill() {
    let server = start_server().await;
    let resp = server
        .client
        .post(server.url("/api/products"))
        .multipart(with_image(
            form(&[("name", "Drill"), ("price", "49.99"), ("category", "Tools")]),
            "drill.png",
            b"png",
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "id": 1,
            "name": "Drill",
            "price": 49.99,
            "category": "Tools",
            "image": "/images/drill.png"
        })
    );

    let list: Value = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["products"][0], body);
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let server = start_server().await;

    let cases = [
        (
            form(&[("name", "Dr"), ("price", "1")]),
            "\"name\" length must be at least 3 characters long",
        ),
        (
            form(&[("name", "Drill"), ("price", "-0.01")]),
            "\"price\" must be greater than or equal to 0",
        ),
        (
            form(&[("name", "Drill"), ("price", "cheap")]),
            "\"price\" must be a number",
        ),
        (
            form(&[("name", "Drill"), ("price", "1"), ("colour", "red")]),
            "\"colour\" is not allowed",
        ),
    ];

    for (fields, message) in cases {
        let resp = server
            .client
            .post(server.url("/api/products"))
            .multipart(with_image(fields, "x.png", b"x"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], message);
    }

    let list: Value = server
        .client
        .get(server.url("/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["products"], json!([]));
}

#[tokio::test]
async fn create_without_image_is_bad_request() {
    let server = start_server().await;
    let resp = server
        .client
        .post(server.url("/api/products"))
        .multipart(form(&[("name", "Drill"), ("price", "1")]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "\"image\" is required");
}

#[tokio::test]
async fn show_update_and_delete() {
    let server = start_server().await;
    server
        .client
        .post(server.url("/api/products"))
        .multipart(with_image(
            form(&[("name", "Drill"), ("price", "49.99")]),
            "drill.png",
            b"png",
        ))
        .send()
        .await
        .unwrap();

    let shown: Value = server
        .client
        .get(server.url("/api/products/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(shown["category"], "General");

    // No image part: the stored image is kept.
    let resp = server
        .client
        .put(server.url("/api/products/1"))
        .multipart(form(&[("name", "Cordless Drill"), ("price", "59")]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], "Cordless Drill");
    assert_eq!(updated["price"], 59.0);
    assert_eq!(updated["image"], "/images/drill.png");

    let resp = server
        .client
        .put(server.url("/api/products/1"))
        .multipart(with_image(
            form(&[("name", "Cordless Drill"), ("price", "59")]),
            "cordless.png",
            b"png2",
        ))
        .send()
        .await
        .unwrap();
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["image"], "/images/cordless.png");

    let resp = server
        .client
        .delete(server.url("/api/products/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted["id"], 1);

    let resp = server
        .client
        .get(server.url("/api/products/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let server = start_server().await;

    for path in ["/api/products/9", "/api/products/abc"] {
        let resp = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 404, "GET {path}");

        let resp = server.client.delete(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 404, "DELETE {path}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Product not found");
    }

    // 404 is reported even when the payload is also invalid.
    let resp = server
        .client
        .put(server.url("/api/products/9"))
        .multipart(form(&[("name", "x")]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let server = start_server().await;
    let mut ids = Vec::new();
    for name in ["First", "Second"] {
        let body: Value = server
            .client
            .post(server.url("/api/products"))
            .multipart(with_image(
                form(&[("name", name), ("price", "1")]),
                &format!("{name}.png"),
                b"x",
            ))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(body["id"].as_u64().unwrap());
    }

    server
        .client
        .delete(server.url(&format!("/api/products/{}", ids[0])))
        .send()
        .await
        .unwrap();

    let third: Value = server
        .client
        .post(server.url("/api/products"))
        .multipart(with_image(
            form(&[("name", "Third"), ("price", "1")]),
            "third.png",
            b"x",
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_ne!(third["id"].as_u64().unwrap(), ids[1]);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let server = start_server_with_limit(1024).await;
    let resp = server
        .client
        .post(server.url("/api/products"))
        .multipart(with_image(
            form(&[("name", "Drill"), ("price", "1")]),
            "big.png",
            &vec![0u8; 8 * 1024],
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
    assert!(!server.dir.path().join("images").join("big.png").exists());
}
