//! SQL DDL for the gym database. SQLite-first design.

/// Dates are stored as ISO-8601 TEXT (`YYYY-MM-DD`), times as `HH:MM:SS`,
/// timestamps as `YYYY-MM-DDTHH:MM:SS`. Payments and entry logs are removed
/// together with their customer.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NULL,
    password_hash TEXT NOT NULL,
    membership_type TEXT NOT NULL DEFAULT 'Monthly',
    payment_amount REAL NOT NULL DEFAULT 0.0,
    join_date TEXT NULL,
    next_renewal TEXT NULL,
    entry_time TEXT NULL
);

CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    month TEXT NOT NULL,
    amount REAL NOT NULL,
    status TEXT NOT NULL DEFAULT 'Pending',
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS entry_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    check_in TEXT NULL,
    check_out TEXT NULL,
    date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_payments_customer_id ON payments(customer_id);
CREATE INDEX IF NOT EXISTS idx_entry_logs_customer_id ON entry_logs(customer_id);
"#;
