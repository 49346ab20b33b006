//! Mock DummyJSON server for testing
//!
//! A small threaded HTTP server that answers the DummyJSON routes the client
//! uses with fixture data and records every request it sees, so tests can
//! assert on method, path, query, headers and body.
//!
//! Behaviour mirrors the real API where the client depends on it:
//! - mutations echo a result but change nothing server-side
//! - `PUT /carts/{id}` with `merge: true` keeps existing lines
//! - `/auth/me` and `/auth/refresh` answer 401 without a known bearer token

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value as JsonValue};
use url::Url;

pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
pub const MOCK_REFRESHED_TOKEN: &str = "mock-refreshed-token";

/// Mock DummyJSON server
pub struct MockShopServer {
    port: u16,
    running: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Answer every request with this status and a JSON message
    pub force_status: Option<u16>,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query string, exactly as sent
    pub target: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> JsonValue {
        serde_json::from_str(&self.body).unwrap_or(JsonValue::Null)
    }
}

impl MockShopServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(Mutex::new(Vec::new()));

        // Non-blocking accept so stop() can end the loop
        listener.set_nonblocking(true)?;

        let running_clone = Arc::clone(&running);
        let requests_clone = Arc::clone(&requests);
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let log = Arc::clone(&requests_clone);
                        thread::spawn(move || handle_connection(stream, &cfg, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            requests,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockShopServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(
    mut stream: TcpStream,
    config: &MockConfig,
    log: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_nonblocking(false);

    let request = match read_request(&mut stream) {
        Some(request) => request,
        None => {
            send_response(&mut stream, 400, r#"{"message": "Invalid request"}"#);
            return;
        }
    };

    if let Ok(mut requests) = log.lock() {
        requests.push(request.clone());
    }

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let (status, body) = match config.force_status {
        Some(status) => (status, json!({"message": "Service unavailable"})),
        None => route(&request),
    };
    send_response(&mut stream, status, &body.to_string());
}

/// Read headers and a Content-Length body
fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut authorization = None;
    let mut content_type = None;
    let mut content_length = 0;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            match name.trim().to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value),
                "content-type" => content_type = Some(value),
                "content-length" => content_length = value.parse().unwrap_or(0),
                _ => {}
            }
        }
    }

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }
    let body = String::from_utf8_lossy(&data[header_end..]).to_string();

    Some(RecordedRequest {
        method,
        target,
        authorization,
        content_type,
        body,
    })
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn route(request: &RecordedRequest) -> (u16, JsonValue) {
    let url = match Url::parse(&format!("http://mock{}", request.target)) {
        Ok(url) => url,
        Err(_) => return (400, json!({"message": "Invalid path"})),
    };
    let segments: Vec<String> = url
        .path_segments()
        .map(|s| s.map(|seg| seg.replace("%20", " ")).collect())
        .unwrap_or_default();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    let body = request.json();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["products"]) => (200, products_response(fixture_products())),
        ("GET", ["products", "search"]) => {
            let q = url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.to_lowercase())
                .unwrap_or_default();
            let found = fixture_products()
                .into_iter()
                .filter(|p| title_of(p).to_lowercase().contains(&q))
                .collect();
            (200, products_response(found))
        }
        ("GET", ["products", "category-list"]) => {
            (200, json!(["beauty", "fragrances", "sports-accessories"]))
        }
        ("GET", ["products", "category", category]) => {
            let found = fixture_products()
                .into_iter()
                .filter(|p| p["category"] == *category)
                .collect();
            (200, products_response(found))
        }
        ("POST", ["products", "add"]) => {
            let mut created = json!({"id": 195});
            merge_object(&mut created, &body);
            (201, created)
        }
        ("GET", ["products", id]) => match find_product(id) {
            Some(product) => (200, product),
            None => product_not_found(id),
        },
        ("PUT", ["products", id]) => match find_product(id) {
            Some(mut product) => {
                merge_object(&mut product, &body);
                (200, product)
            }
            None => product_not_found(id),
        },
        ("DELETE", ["products", id]) => match find_product(id) {
            Some(mut product) => {
                merge_object(
                    &mut product,
                    &json!({"isDeleted": true, "deletedOn": "2024-05-29T12:00:00.000Z"}),
                );
                (200, product)
            }
            None => product_not_found(id),
        },
        ("GET", ["carts"]) => (
            200,
            json!({"carts": [fixture_cart(vec![(144, 1)])], "total": 1, "skip": 0, "limit": 1}),
        ),
        ("POST", ["carts", "add"]) => {
            let mut cart = cart_json(51, &lines_of(&body));
            cart["userId"] = body["userId"].clone();
            (201, cart)
        }
        ("GET", ["carts", "1"]) => (200, fixture_cart(vec![(144, 1)])),
        ("PUT", ["carts", "1"]) => {
            let mut lines = if body["merge"] == true {
                vec![(144, 1)]
            } else {
                Vec::new()
            };
            for (id, quantity) in lines_of(&body) {
                match lines.iter_mut().find(|(existing, _)| *existing == id) {
                    Some(line) => line.1 = quantity,
                    None => lines.push((id, quantity)),
                }
            }
            (200, fixture_cart(lines))
        }
        ("DELETE", ["carts", "1"]) => {
            let mut cart = fixture_cart(vec![(144, 1)]);
            merge_object(
                &mut cart,
                &json!({"isDeleted": true, "deletedOn": "2024-05-29T12:00:00.000Z"}),
            );
            (200, cart)
        }
        (_, ["carts", id]) => (404, json!({"message": format!("Cart with id '{}' not found", id)})),
        ("POST", ["auth", "login"]) => {
            if body["username"] == "emilys" && body["password"] == "emilyspass" {
                let mut user = fixture_user();
                merge_object(
                    &mut user,
                    &json!({"accessToken": MOCK_ACCESS_TOKEN, "refreshToken": "mock-refresh-token"}),
                );
                (200, user)
            } else {
                (400, json!({"message": "Invalid credentials"}))
            }
        }
        ("GET", ["auth", "me"]) => {
            if has_known_bearer(request) {
                (200, fixture_user())
            } else {
                unauthorized()
            }
        }
        ("GET", ["auth", "refresh"]) => {
            if has_known_bearer(request) {
                (
                    200,
                    json!({"accessToken": MOCK_REFRESHED_TOKEN, "refreshToken": "mock-refresh-token-2"}),
                )
            } else {
                unauthorized()
            }
        }
        _ => (404, json!({"message": "Endpoint not found"})),
    }
}

fn has_known_bearer(request: &RecordedRequest) -> bool {
    matches!(
        request.authorization.as_deref(),
        Some(value) if value == format!("Bearer {}", MOCK_ACCESS_TOKEN)
            || value == format!("Bearer {}", MOCK_REFRESHED_TOKEN)
    )
}

fn unauthorized() -> (u16, JsonValue) {
    (401, json!({"message": "Invalid/expired Token!"}))
}

fn product_not_found(id: &str) -> (u16, JsonValue) {
    (404, json!({"message": format!("Product with id '{}' not found", id)}))
}

fn merge_object(target: &mut JsonValue, patch: &JsonValue) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn title_of(product: &JsonValue) -> &str {
    product["title"].as_str().unwrap_or("")
}

fn products_response(products: Vec<JsonValue>) -> JsonValue {
    let total = products.len();
    json!({"products": products, "total": total, "skip": 0, "limit": total})
}

fn find_product(id: &str) -> Option<JsonValue> {
    let id: u64 = id.parse().ok()?;
    fixture_products().into_iter().find(|p| p["id"] == id)
}

fn lines_of(body: &JsonValue) -> Vec<(u64, u64)> {
    body["products"]
        .as_array()
        .map(|lines| {
            lines
                .iter()
                .filter_map(|l| Some((l["id"].as_u64()?, l["quantity"].as_u64()?)))
                .collect()
        })
        .unwrap_or_default()
}

fn fixture_products() -> Vec<JsonValue> {
    vec![
        json!({
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "description": "Popular mascara known for its volumizing and lengthening effects.",
            "category": "beauty",
            "price": 9.99,
            "discountPercentage": 7.17,
            "rating": 4.94,
            "stock": 5,
            "tags": ["beauty", "mascara"],
            "brand": "Essence",
            "sku": "RCH45Q1A",
            "availabilityStatus": "Low Stock",
            "images": ["https://cdn.dummyjson.com/products/images/beauty/1.png"],
            "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/thumbnail.png"
        }),
        json!({
            "id": 5,
            "title": "Red Nail Polish",
            "category": "beauty",
            "price": 8.99,
            "discountPercentage": 2.46,
            "rating": 4.32,
            "stock": 79,
            "brand": "Nail Couture",
            "images": []
        }),
        json!({
            "id": 144,
            "title": "Cricket Helmet",
            "category": "sports-accessories",
            "price": 44.99,
            "discountPercentage": 11.47,
            "rating": 4.2,
            "stock": 37,
            "images": []
        }),
    ]
}

fn cart_json(id: u64, lines: &[(u64, u64)]) -> JsonValue {
    let products: Vec<JsonValue> = lines
        .iter()
        .map(|(product_id, quantity)| {
            let product = find_product(&product_id.to_string()).unwrap_or_else(|| json!({}));
            let price = product["price"].as_f64().unwrap_or(10.0);
            let total = price * *quantity as f64;
            json!({
                "id": product_id,
                "title": title_of(&product),
                "price": price,
                "quantity": quantity,
                "total": total,
                "discountPercentage": 0.0,
                "discountedTotal": total
            })
        })
        .collect();
    let total: f64 = products.iter().filter_map(|p| p["total"].as_f64()).sum();
    let quantity: u64 = lines.iter().map(|(_, q)| q).sum();

    json!({
        "id": id,
        "userId": 1,
        "products": products,
        "total": total,
        "discountedTotal": total,
        "totalProducts": lines.len(),
        "totalQuantity": quantity
    })
}

fn fixture_cart(lines: Vec<(u64, u64)>) -> JsonValue {
    cart_json(1, &lines)
}

fn fixture_user() -> JsonValue {
    json!({
        "id": 1,
        "username": "emilys",
        "email": "emily.johnson@x.dummyjson.com",
        "firstName": "Emily",
        "lastName": "Johnson",
        "gender": "female",
        "image": "https://dummyjson.com/icon/emilys/128"
    })
}
