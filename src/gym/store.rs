use crate::db::{self, SqlitePool, like_pattern};
use crate::error::FrontdeskError;
use crate::gym::models::{
    Admin, Customer, EntryLog, NewCustomer, NewEntryLog, NewPayment, Payment,
};
use crate::gym::schema::SQLITE_INIT;
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

#[derive(Clone)]
pub struct GymStorage {
    pool: SqlitePool,
}

impl GymStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), FrontdeskError> {
        db::init_schema(&self.pool, SQLITE_INIT).await
    }

    /// Insert the bootstrap admin account unless one with this email exists.
    /// Returns true when a row was created.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, FrontdeskError> {
        if self.find_admin_by_email(email).await?.is_some() {
            return Ok(false);
        }
        sqlx::query("INSERT INTO admins (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, FrontdeskError> {
        let row = sqlx::query("SELECT id, name, email, password_hash FROM admins WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_admin).transpose()
    }

    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Customer>, FrontdeskError> {
        let row = sqlx::query(&format!(
            "{CUSTOMER_COLUMNS} FROM customers WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_customer).transpose()
    }

    pub async fn get_customer(&self, id: i64) -> Result<Option<Customer>, FrontdeskError> {
        let row = sqlx::query(&format!("{CUSTOMER_COLUMNS} FROM customers WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_customer).transpose()
    }

    pub async fn create_customer(&self, new: NewCustomer) -> Result<i64, FrontdeskError> {
        let res = sqlx::query(
            r#"
            INSERT INTO customers (
                name, email, phone, password_hash, membership_type,
                payment_amount, join_date, next_renewal, entry_time
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.password_hash)
        .bind(new.membership_type)
        .bind(new.payment_amount)
        .bind(new.join_date)
        .bind(new.next_renewal)
        .bind(new.entry_time)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// Substring OR-match over name/email/membership_type; the empty query
    /// returns everything.
    pub async fn search_customers(&self, search: &str) -> Result<Vec<Customer>, FrontdeskError> {
        let rows = if search.is_empty() {
            sqlx::query(&format!("{CUSTOMER_COLUMNS} FROM customers ORDER BY id"))
                .fetch_all(&self.pool)
                .await?
        } else {
            let pattern = like_pattern(search);
            sqlx::query(&format!(
                r#"{CUSTOMER_COLUMNS} FROM customers
                   WHERE name LIKE ? ESCAPE '\'
                      OR email LIKE ? ESCAPE '\'
                      OR membership_type LIKE ? ESCAPE '\'
                   ORDER BY id"#
            ))
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?
        };
        rows.into_iter().map(Self::row_to_customer).collect()
    }

    /// Full row write by id. Partial-update merging happens in the handler.
    pub async fn update_customer(&self, customer: &Customer) -> Result<(), FrontdeskError> {
        let res = sqlx::query(
            r#"UPDATE customers SET
                name = ?,
                email = ?,
                phone = ?,
                password_hash = ?,
                membership_type = ?,
                payment_amount = ?,
                join_date = ?,
                next_renewal = ?,
                entry_time = ?
              WHERE id = ?"#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.password_hash)
        .bind(&customer.membership_type)
        .bind(customer.payment_amount)
        .bind(customer.join_date)
        .bind(customer.next_renewal)
        .bind(customer.entry_time)
        .bind(customer.id)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(FrontdeskError::NotFound("Customer"));
        }
        Ok(())
    }

    /// Payments and entry logs go with the customer (ON DELETE CASCADE).
    pub async fn delete_customer(&self, id: i64) -> Result<(), FrontdeskError> {
        let res = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(FrontdeskError::NotFound("Customer"));
        }
        Ok(())
    }

    pub async fn payments_for_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<Payment>, FrontdeskError> {
        let rows = sqlx::query(
            r#"SELECT id, customer_id, month, amount, status, date
               FROM payments WHERE customer_id = ? ORDER BY date DESC, id DESC"#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_payment).collect()
    }

    pub async fn all_payments(&self) -> Result<Vec<Payment>, FrontdeskError> {
        let rows = sqlx::query(
            "SELECT id, customer_id, month, amount, status, date FROM payments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_payment).collect()
    }

    pub async fn recent_payments(&self, limit: i64) -> Result<Vec<Payment>, FrontdeskError> {
        let rows = sqlx::query(
            r#"SELECT id, customer_id, month, amount, status, date
               FROM payments ORDER BY date DESC, id DESC LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_payment).collect()
    }

    pub async fn create_payment(&self, new: NewPayment) -> Result<i64, FrontdeskError> {
        let res = sqlx::query(
            "INSERT INTO payments (customer_id, month, amount, status, date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new.customer_id)
        .bind(new.month)
        .bind(new.amount)
        .bind(new.status)
        .bind(new.date)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// Customers whose next renewal is today or later.
    pub async fn count_active_memberships(&self, today: NaiveDate) -> Result<i64, FrontdeskError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM customers WHERE next_renewal >= ?")
                .bind(today)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Sum of payment amounts with status `Paid`.
    pub async fn total_paid_revenue(&self) -> Result<f64, FrontdeskError> {
        let (total,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE status = 'Paid'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Entry logs, optionally filtered by a substring over the owning
    /// customer's name or email.
    pub async fn search_entry_logs(&self, search: &str) -> Result<Vec<EntryLog>, FrontdeskError> {
        let rows = if search.is_empty() {
            sqlx::query(
                "SELECT id, customer_id, check_in, check_out, date FROM entry_logs ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            let pattern = like_pattern(search);
            sqlx::query(
                r#"SELECT e.id, e.customer_id, e.check_in, e.check_out, e.date
                   FROM entry_logs e
                   JOIN customers c ON c.id = e.customer_id
                   WHERE c.name LIKE ? ESCAPE '\' OR c.email LIKE ? ESCAPE '\'
                   ORDER BY e.id"#,
            )
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?
        };
        rows.into_iter().map(Self::row_to_entry_log).collect()
    }

    pub async fn create_entry_log(&self, new: NewEntryLog) -> Result<i64, FrontdeskError> {
        let res = sqlx::query(
            "INSERT INTO entry_logs (customer_id, check_in, check_out, date) VALUES (?, ?, ?, ?)",
        )
        .bind(new.customer_id)
        .bind(new.check_in)
        .bind(new.check_out)
        .bind(new.date)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    fn row_to_admin(row: SqliteRow) -> Result<Admin, FrontdeskError> {
        Ok(Admin {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }

    fn row_to_customer(row: SqliteRow) -> Result<Customer, FrontdeskError> {
        Ok(Customer {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            password_hash: row.try_get("password_hash")?,
            membership_type: row.try_get("membership_type")?,
            payment_amount: row.try_get("payment_amount")?,
            join_date: row.try_get("join_date")?,
            next_renewal: row.try_get("next_renewal")?,
            entry_time: row.try_get("entry_time")?,
        })
    }

    fn row_to_payment(row: SqliteRow) -> Result<Payment, FrontdeskError> {
        Ok(Payment {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            month: row.try_get("month")?,
            amount: row.try_get("amount")?,
            status: row.try_get("status")?,
            date: row.try_get("date")?,
        })
    }

    fn row_to_entry_log(row: SqliteRow) -> Result<EntryLog, FrontdeskError> {
        Ok(EntryLog {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            check_in: row.try_get("check_in")?,
            check_out: row.try_get("check_out")?,
            date: row.try_get("date")?,
        })
    }
}

const CUSTOMER_COLUMNS: &str = "SELECT id, name, email, phone, password_hash, membership_type, \
                                payment_amount, join_date, next_renewal, entry_time";
