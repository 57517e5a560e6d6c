use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BorrowRecord {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub returned: bool,
}

/// Borrow record joined with its book's title, for the member view.
#[derive(Debug, Clone, Serialize)]
pub struct BorrowedBook {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub book_title: String,
}
