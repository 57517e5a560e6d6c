use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub membership_type: String,
    pub payment_amount: f64,
    pub join_date: Option<NaiveDate>,
    pub next_renewal: Option<NaiveDate>,
    pub entry_time: Option<NaiveTime>,
}

/// Insert payload for `customers`; the row id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub membership_type: String,
    pub payment_amount: f64,
    pub join_date: Option<NaiveDate>,
    pub next_renewal: Option<NaiveDate>,
    pub entry_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub customer_id: i64,
    pub month: String,
    pub amount: f64,
    /// Free text; `Paid` / `Pending` by convention.
    pub status: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: i64,
    pub month: String,
    pub amount: f64,
    pub status: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryLog {
    pub id: i64,
    pub customer_id: i64,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewEntryLog {
    pub customer_id: i64,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub date: NaiveDate,
}
