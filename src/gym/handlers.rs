use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::FrontdeskError;
use crate::gym::models::{Customer, NewCustomer, NewEntryLog, NewPayment};
use crate::gym::router::GymState;
use crate::gym::session::{
    AdminSession, AnySession, CustomerSession, Role, SessionUser, clear_session, store_session,
};

const RECENT_PAYMENTS: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub membership_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Shared payload for admin add/update. Empty optional fields mean
/// "default" on add and "keep the stored value" on update.
#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub membership_type: String,
    pub payment_amount: Option<String>,
    pub join_date: Option<String>,
    pub next_renewal: Option<String>,
    pub entry_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub month: String,
    pub amount: f64,
    pub status: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntryLogForm {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub date: Option<String>,
}

pub async fn index() -> Json<serde_json::Value> {
    Json(json!({ "service": "gym", "status": "ok" }))
}

/// POST /register — self-service customer signup.
pub async fn register(
    State(state): State<GymState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, FrontdeskError> {
    if state.store.find_customer_by_email(&form.email).await?.is_some() {
        return Err(FrontdeskError::DuplicateEmail);
    }

    let password_hash = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST)?;
    let id = state
        .store
        .create_customer(NewCustomer {
            name: form.name,
            email: form.email,
            phone: non_empty(form.phone),
            password_hash,
            membership_type: form.membership_type,
            payment_amount: 0.0,
            join_date: Some(Utc::now().date_naive()),
            next_renewal: None,
            entry_time: None,
        })
        .await?;
    info!(customer_id = id, "customer registered");
    Ok(Redirect::to("/login"))
}

/// POST /login — admins and customers share the form; the role selector
/// picks the table. Unknown email and wrong password get the same answer.
pub async fn login(
    State(state): State<GymState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, FrontdeskError> {
    let (user_id, password_hash) = match form.role {
        Role::Admin => match state.store.find_admin_by_email(&form.email).await? {
            Some(admin) => (admin.id, admin.password_hash),
            None => return Err(FrontdeskError::InvalidCredentials),
        },
        Role::Customer => match state.store.find_customer_by_email(&form.email).await? {
            Some(customer) => (customer.id, customer.password_hash),
            None => return Err(FrontdeskError::InvalidCredentials),
        },
    };

    if !bcrypt::verify(&form.password, &password_hash)? {
        return Err(FrontdeskError::InvalidCredentials);
    }

    let jar = store_session(
        jar,
        SessionUser {
            user_id,
            role: form.role,
        },
    );
    info!(user_id, role = %form.role, "login successful");
    let target = match form.role {
        Role::Admin => "/admin/dashboard",
        Role::Customer => "/customer/dashboard",
    };
    Ok((jar, Redirect::to(target)))
}

pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (clear_session(jar), Redirect::to("/login"))
}

/// GET /customer/dashboard — own profile plus own payments.
pub async fn customer_dashboard(
    State(state): State<GymState>,
    CustomerSession(session): CustomerSession,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let customer = state
        .store
        .get_customer(session.user_id)
        .await?
        .ok_or(FrontdeskError::NotFound("Customer"))?;
    let payments = state.store.payments_for_customer(customer.id).await?;
    Ok(Json(json!({ "customer": customer, "payments": payments })))
}

/// GET /admin/dashboard — aggregate metrics over the (optionally filtered)
/// customer list.
pub async fn admin_dashboard(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let customers = state.store.search_customers(&params.search).await?;
    let active_memberships = state
        .store
        .count_active_memberships(Utc::now().date_naive())
        .await?;
    let total_revenue = state.store.total_paid_revenue().await?;
    let recent_payments = state.store.recent_payments(RECENT_PAYMENTS).await?;

    Ok(Json(json!({
        "total_customers": customers.len(),
        "active_memberships": active_memberships,
        "total_revenue": total_revenue,
        "recent_payments": recent_payments,
        "customers": customers,
        "search": params.search,
    })))
}

/// GET /admin/customers — list, with the same substring filter as the
/// dashboard.
pub async fn customers_list(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let customers = state.store.search_customers(&params.search).await?;
    Ok(Json(json!({ "customers": customers, "search": params.search })))
}

/// POST /admin/customers/add
pub async fn add_customer(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Form(form): Form<CustomerForm>,
) -> Result<Redirect, FrontdeskError> {
    if state.store.find_customer_by_email(&form.email).await?.is_some() {
        return Err(FrontdeskError::DuplicateEmail);
    }
    let password = non_empty(form.password)
        .ok_or_else(|| FrontdeskError::BadRequest("password is required".to_string()))?;
    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;

    let join_date = match non_empty(form.join_date) {
        Some(s) => Some(parse_date("join_date", &s)?),
        None => Some(Utc::now().date_naive()),
    };
    let next_renewal = non_empty(form.next_renewal)
        .map(|s| parse_date("next_renewal", &s))
        .transpose()?;
    let entry_time = non_empty(form.entry_time)
        .map(|s| parse_time("entry_time", &s))
        .transpose()?;

    let id = state
        .store
        .create_customer(NewCustomer {
            name: form.name,
            email: form.email,
            phone: non_empty(form.phone),
            password_hash,
            membership_type: form.membership_type,
            payment_amount: parse_amount(form.payment_amount)?,
            join_date,
            next_renewal,
            entry_time,
        })
        .await?;
    info!(customer_id = id, "customer added");
    Ok(Redirect::to("/admin/customers"))
}

/// POST /admin/customers/update/{id} — empty password, join_date,
/// next_renewal and entry_time keep the stored values; everything else is
/// replaced.
pub async fn update_customer(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
    Form(form): Form<CustomerForm>,
) -> Result<Redirect, FrontdeskError> {
    let existing = state
        .store
        .get_customer(id)
        .await?
        .ok_or(FrontdeskError::NotFound("Customer"))?;

    let password_hash = match non_empty(form.password) {
        Some(password) => bcrypt::hash(&password, bcrypt::DEFAULT_COST)?,
        None => existing.password_hash,
    };
    let join_date = match non_empty(form.join_date) {
        Some(s) => Some(parse_date("join_date", &s)?),
        None => existing.join_date,
    };
    let next_renewal = match non_empty(form.next_renewal) {
        Some(s) => Some(parse_date("next_renewal", &s)?),
        None => existing.next_renewal,
    };
    let entry_time = match non_empty(form.entry_time) {
        Some(s) => Some(parse_time("entry_time", &s)?),
        None => existing.entry_time,
    };

    state
        .store
        .update_customer(&Customer {
            id,
            name: form.name,
            email: form.email,
            phone: non_empty(form.phone),
            password_hash,
            membership_type: form.membership_type,
            payment_amount: parse_amount(form.payment_amount)?,
            join_date,
            next_renewal,
            entry_time,
        })
        .await?;
    info!(customer_id = id, "customer updated");
    Ok(Redirect::to("/admin/customers"))
}

/// POST /admin/customers/delete/{id}
pub async fn delete_customer(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Redirect, FrontdeskError> {
    state.store.delete_customer(id).await?;
    info!(customer_id = id, "customer deleted");
    Ok(Redirect::to("/admin/customers"))
}

/// GET /admin/customers/{id}/payments
pub async fn customer_payments(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let customer = state
        .store
        .get_customer(id)
        .await?
        .ok_or(FrontdeskError::NotFound("Customer"))?;
    let payments = state.store.payments_for_customer(id).await?;
    Ok(Json(json!({ "customer": customer, "payments": payments })))
}

/// POST /admin/customers/{id}/payments/add
pub async fn record_payment(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
    Form(form): Form<PaymentForm>,
) -> Result<Redirect, FrontdeskError> {
    state
        .store
        .get_customer(id)
        .await?
        .ok_or(FrontdeskError::NotFound("Customer"))?;

    let date = match non_empty(form.date) {
        Some(s) => parse_date("date", &s)?,
        None => Utc::now().date_naive(),
    };
    let payment_id = state
        .store
        .create_payment(NewPayment {
            customer_id: id,
            month: form.month,
            amount: form.amount,
            status: non_empty(form.status).unwrap_or_else(|| "Pending".to_string()),
            date,
        })
        .await?;
    info!(customer_id = id, payment_id, "payment recorded");
    Ok(Redirect::to(&format!("/admin/customers/{id}/payments")))
}

/// POST /admin/customers/{id}/entries/add
pub async fn record_entry(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
    Form(form): Form<EntryLogForm>,
) -> Result<Redirect, FrontdeskError> {
    state
        .store
        .get_customer(id)
        .await?
        .ok_or(FrontdeskError::NotFound("Customer"))?;

    let check_in = non_empty(form.check_in)
        .map(|s| parse_datetime("check_in", &s))
        .transpose()?;
    let check_out = non_empty(form.check_out)
        .map(|s| parse_datetime("check_out", &s))
        .transpose()?;
    let date = match non_empty(form.date) {
        Some(s) => parse_date("date", &s)?,
        None => Utc::now().date_naive(),
    };

    state
        .store
        .create_entry_log(NewEntryLog {
            customer_id: id,
            check_in,
            check_out,
            date,
        })
        .await?;
    Ok(Redirect::to("/entry_logs"))
}

/// GET /payments — admin sees everything, a customer only their own rows.
pub async fn payment_history(
    State(state): State<GymState>,
    AnySession(session): AnySession,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let payments = match session.role {
        Role::Admin => state.store.all_payments().await?,
        Role::Customer => state.store.payments_for_customer(session.user_id).await?,
    };
    Ok(Json(json!({ "payments": payments })))
}

/// GET /entry_logs — filter joins on the owning customer's name/email.
pub async fn entry_logs(
    State(state): State<GymState>,
    AdminSession(_): AdminSession,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, FrontdeskError> {
    let logs = state.store.search_entry_logs(&params.search).await?;
    Ok(Json(json!({ "entry_logs": logs, "search": params.search })))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_amount(value: Option<String>) -> Result<f64, FrontdeskError> {
    match non_empty(value) {
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| FrontdeskError::BadRequest("invalid payment_amount".to_string())),
        None => Ok(0.0),
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, FrontdeskError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FrontdeskError::BadRequest(format!("invalid {field}, expected YYYY-MM-DD")))
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, FrontdeskError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| FrontdeskError::BadRequest(format!("invalid {field}, expected HH:MM")))
}

fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime, FrontdeskError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").map_err(|_| {
        FrontdeskError::BadRequest(format!("invalid {field}, expected YYYY-MM-DDTHH:MM"))
    })
}
