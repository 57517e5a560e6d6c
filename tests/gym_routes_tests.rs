use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use chrono::{NaiveDate, Utc};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

use frontdesk::gym::models::{NewCustomer, NewEntryLog, NewPayment};
use frontdesk::gym::{GymState, GymStorage, gym_router};

const ADMIN_EMAIL: &str = "admin@gym.com";
const ADMIN_PASSWORD: &str = "admin123";
const COOKIE_SECRET: &str = "frontdesk-test-cookie-secret-frontdesk-test-cookie-secret";

struct TestApp {
    app: Router,
    store: GymStorage,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
    }
}

async fn spawn_app(tag: &str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "frontdesk-gym-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let pool = frontdesk::db::connect(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open database");
    let store = GymStorage::new(pool);
    store.init_schema().await.expect("failed to init schema");

    let hash = bcrypt::hash(ADMIN_PASSWORD, bcrypt::DEFAULT_COST).expect("hash failed");
    store
        .ensure_admin("Admin", ADMIN_EMAIL, &hash)
        .await
        .expect("failed to seed admin");

    let app = gym_router(GymState::new(store.clone(), COOKIE_SECRET));
    TestApp {
        app,
        store,
        db_path,
    }
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn form_request_with_cookie(uri: &str, body: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn get_request_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("failed to build request")
}

fn session_cookie(resp: &axum::response::Response) -> String {
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("no set-cookie header")
        .to_str()
        .expect("set-cookie not utf-8");
    set_cookie
        .split(';')
        .next()
        .expect("empty set-cookie")
        .to_string()
}

async fn login(app: &Router, email: &str, password: &str, role: &str) -> String {
    let resp = app
        .clone()
        .oneshot(form_request(
            "/login",
            &format!("email={email}&password={password}&role={role}"),
        ))
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    session_cookie(&resp)
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&body).expect("body was not json")
}

#[tokio::test]
async fn duplicate_registration_keeps_a_single_row() {
    let t = spawn_app("dup-register").await;

    let body = "name=Alice&email=alice%40example.com&password=secret&membership_type=Monthly";
    let resp = t
        .app
        .clone()
        .oneshot(form_request("/register", body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = t
        .app
        .clone()
        .oneshot(form_request("/register", body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");

    let matches = t
        .store
        .search_customers("alice@example.com")
        .await
        .expect("query failed");
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn login_verifies_password_and_stores_role() {
    let t = spawn_app("login").await;

    let resp = t
        .app
        .clone()
        .oneshot(form_request(
            "/register",
            "name=Alice&email=alice%40example.com&password=secret&membership_type=Monthly",
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // Wrong password: one generic answer.
    let resp = t
        .app
        .clone()
        .oneshot(form_request(
            "/login",
            "email=alice%40example.com&password=wrong&role=customer",
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    // Unknown email answers identically.
    let resp = t
        .app
        .clone()
        .oneshot(form_request(
            "/login",
            "email=nobody%40example.com&password=secret&role=customer",
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Correct password: session cookie plus redirect to the role dashboard.
    let cookie = login(&t.app, "alice%40example.com", "secret", "customer").await;
    let resp = t
        .app
        .clone()
        .oneshot(get_request_with_cookie("/customer/dashboard", &cookie))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["customer"]["email"], "alice@example.com");
}

#[tokio::test]
async fn admin_routes_reject_non_admin_sessions_without_mutation() {
    let t = spawn_app("role-gate").await;

    let resp = t
        .app
        .clone()
        .oneshot(form_request(
            "/register",
            "name=Alice&email=alice%40example.com&password=secret&membership_type=Monthly",
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = login(&t.app, "alice%40example.com", "secret", "customer").await;

    let add_body = "name=Mallory&email=mallory%40example.com&password=pw&membership_type=Yearly";

    // No session at all.
    let resp = t
        .app
        .clone()
        .oneshot(form_request("/admin/customers/add", add_body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/login");

    // Customer session is not enough.
    let resp = t
        .app
        .clone()
        .oneshot(form_request_with_cookie(
            "/admin/customers/add",
            add_body,
            &cookie,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/login");

    let all = t.store.search_customers("").await.expect("query failed");
    assert_eq!(all.len(), 1, "store must be unmodified apart from alice");
}

#[tokio::test]
async fn customer_search_filters_by_substring() {
    let t = spawn_app("search").await;
    for (name, email, membership) in [
        ("Alice", "alice@example.com", "Monthly"),
        ("Bob", "bob@example.com", "Yearly"),
        ("Carol", "carol@other.net", "Monthly"),
    ] {
        t.store
            .create_customer(NewCustomer {
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                password_hash: "x".to_string(),
                membership_type: membership.to_string(),
                payment_amount: 0.0,
                join_date: None,
                next_renewal: None,
                entry_time: None,
            })
            .await
            .expect("insert failed");
    }

    let cookie = login(&t.app, "admin%40gym.com", ADMIN_PASSWORD, "admin").await;

    // Substring over email.
    let resp = t
        .app
        .clone()
        .oneshot(get_request_with_cookie(
            "/admin/customers?search=example.com",
            &cookie,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["customers"].as_array().map(Vec::len), Some(2));

    // Substring over membership type.
    let resp = t
        .app
        .clone()
        .oneshot(get_request_with_cookie(
            "/admin/customers?search=Yearly",
            &cookie,
        ))
        .await
        .expect("request failed");
    let body = json_body(resp).await;
    assert_eq!(body["customers"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["customers"][0]["name"], "Bob");

    // Empty query: universal set.
    let resp = t
        .app
        .clone()
        .oneshot(get_request_with_cookie("/admin/customers", &cookie))
        .await
        .expect("request failed");
    let body = json_body(resp).await;
    assert_eq!(body["customers"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn dashboard_aggregates_revenue_and_active_memberships() {
    let t = spawn_app("dashboard").await;

    let customer_id = t
        .store
        .create_customer(NewCustomer {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            membership_type: "Monthly".to_string(),
            payment_amount: 50.0,
            join_date: Some(Utc::now().date_naive()),
            next_renewal: Some(Utc::now().date_naive() + chrono::Days::new(30)),
            entry_time: None,
        })
        .await
        .expect("insert failed");

    t.store
        .create_payment(NewPayment {
            customer_id,
            month: "January".to_string(),
            amount: 50.0,
            status: "Paid".to_string(),
            date: Utc::now().date_naive(),
        })
        .await
        .expect("insert failed");
    // Pending payments never count towards revenue.
    t.store
        .create_payment(NewPayment {
            customer_id,
            month: "February".to_string(),
            amount: 75.0,
            status: "Pending".to_string(),
            date: Utc::now().date_naive(),
        })
        .await
        .expect("insert failed");

    let cookie = login(&t.app, "admin%40gym.com", ADMIN_PASSWORD, "admin").await;
    let resp = t
        .app
        .clone()
        .oneshot(get_request_with_cookie("/admin/dashboard", &cookie))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["total_customers"], 1);
    assert_eq!(body["active_memberships"], 1);
    assert_eq!(body["total_revenue"].as_f64(), Some(50.0));
    assert_eq!(body["recent_payments"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn deleting_a_customer_removes_payments_and_entry_logs() {
    let t = spawn_app("cascade-delete").await;

    let customer_id = t
        .store
        .create_customer(NewCustomer {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            membership_type: "Monthly".to_string(),
            payment_amount: 0.0,
            join_date: None,
            next_renewal: None,
            entry_time: None,
        })
        .await
        .expect("insert failed");
    t.store
        .create_payment(NewPayment {
            customer_id,
            month: "January".to_string(),
            amount: 50.0,
            status: "Paid".to_string(),
            date: Utc::now().date_naive(),
        })
        .await
        .expect("insert failed");
    t.store
        .create_entry_log(NewEntryLog {
            customer_id,
            check_in: None,
            check_out: None,
            date: Utc::now().date_naive(),
        })
        .await
        .expect("insert failed");

    let cookie = login(&t.app, "admin%40gym.com", ADMIN_PASSWORD, "admin").await;
    let resp = t
        .app
        .clone()
        .oneshot(form_request_with_cookie(
            &format!("/admin/customers/delete/{customer_id}"),
            "",
            &cookie,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // No dangling rows: payments and entry logs go with the customer.
    let gone = t.store.get_customer(customer_id).await.expect("query failed");
    assert!(gone.is_none());
    let payments = t
        .store
        .payments_for_customer(customer_id)
        .await
        .expect("query failed");
    assert!(payments.is_empty());
    let logs = t.store.search_entry_logs("").await.expect("query failed");
    assert!(logs.is_empty());
}

#[tokio::test]
async fn malformed_join_date_is_rejected() {
    let t = spawn_app("bad-date").await;
    let cookie = login(&t.app, "admin%40gym.com", ADMIN_PASSWORD, "admin").await;

    let resp = t
        .app
        .clone()
        .oneshot(form_request_with_cookie(
            "/admin/customers/add",
            "name=Alice&email=alice%40example.com&password=pw&membership_type=Monthly&join_date=15-01-2024",
            &cookie,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let all = t.store.search_customers("").await.expect("query failed");
    assert!(all.is_empty(), "nothing may be inserted on a parse failure");
}

#[tokio::test]
async fn update_preserves_password_and_dates_when_blank() {
    let t = spawn_app("partial-update").await;

    let join = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    let customer_id = t
        .store
        .create_customer(NewCustomer {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: Some("12345".to_string()),
            password_hash: "original-hash".to_string(),
            membership_type: "Monthly".to_string(),
            payment_amount: 10.0,
            join_date: Some(join),
            next_renewal: None,
            entry_time: None,
        })
        .await
        .expect("insert failed");

    let cookie = login(&t.app, "admin%40gym.com", ADMIN_PASSWORD, "admin").await;
    let resp = t
        .app
        .clone()
        .oneshot(form_request_with_cookie(
            &format!("/admin/customers/update/{customer_id}"),
            "name=Alice+B&email=alice%40example.com&phone=&password=&membership_type=Yearly&payment_amount=20",
            &cookie,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let updated = t
        .store
        .get_customer(customer_id)
        .await
        .expect("query failed")
        .expect("customer vanished");
    assert_eq!(updated.name, "Alice B");
    assert_eq!(updated.membership_type, "Yearly");
    assert_eq!(updated.payment_amount, 20.0);
    // Blank password and join_date keep the stored values.
    assert_eq!(updated.password_hash, "original-hash");
    assert_eq!(updated.join_date, Some(join));
    // Blank phone clears it: phone is not on the preserve list.
    assert_eq!(updated.phone, None);
}
