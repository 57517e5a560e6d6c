use crate::db::{self, SqlitePool, like_pattern};
use crate::error::FrontdeskError;
use crate::library::models::{Book, BorrowRecord, BorrowedBook, User};
use crate::library::schema::{SQLITE_INIT, STARTER_BOOKS};
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

#[derive(Clone)]
pub struct LibraryStorage {
    pool: SqlitePool,
}

impl LibraryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<(), FrontdeskError> {
        db::init_schema(&self.pool, SQLITE_INIT).await
    }

    /// Seed the starter catalog when the books table is empty. Returns the
    /// number of rows inserted (0 when the table already has books).
    pub async fn seed_starter_books(&self) -> Result<usize, FrontdeskError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        for (title, author) in STARTER_BOOKS {
            sqlx::query("INSERT INTO books (title, author, available) VALUES (?, ?, 1)")
                .bind(title)
                .bind(author)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(STARTER_BOOKS.len())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, FrontdeskError> {
        let row = sqlx::query("SELECT id, username, email, password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, FrontdeskError> {
        let row = sqlx::query("SELECT id, username, email, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_user).transpose()
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, FrontdeskError> {
        let res = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind(username)
            .bind(email)
            .bind(password)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    /// Substring OR-match over username/email; empty query returns all users.
    pub async fn search_users(&self, search: &str) -> Result<Vec<User>, FrontdeskError> {
        let rows = if search.is_empty() {
            sqlx::query("SELECT id, username, email, password FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await?
        } else {
            let pattern = like_pattern(search);
            sqlx::query(
                r#"SELECT id, username, email, password FROM users
                   WHERE username LIKE ? ESCAPE '\' OR email LIKE ? ESCAPE '\'
                   ORDER BY id"#,
            )
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?
        };
        rows.into_iter().map(Self::row_to_user).collect()
    }

    /// Full replace of the mutable user fields.
    pub async fn update_user(
        &self,
        id: i64,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), FrontdeskError> {
        let res = sqlx::query("UPDATE users SET username = ?, email = ?, password = ? WHERE id = ?")
            .bind(username)
            .bind(email)
            .bind(password)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(FrontdeskError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), FrontdeskError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(FrontdeskError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, FrontdeskError> {
        let rows = sqlx::query("SELECT id, title, author, available FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_book).collect()
    }

    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, FrontdeskError> {
        let row = sqlx::query("SELECT id, title, author, available FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_book).transpose()
    }

    pub async fn create_book(&self, title: &str, author: &str) -> Result<i64, FrontdeskError> {
        let res = sqlx::query("INSERT INTO books (title, author, available) VALUES (?, ?, 1)")
            .bind(title)
            .bind(author)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    /// Availability is owned by the borrow/return flow and left untouched.
    pub async fn update_book(
        &self,
        id: i64,
        title: &str,
        author: &str,
    ) -> Result<(), FrontdeskError> {
        let res = sqlx::query("UPDATE books SET title = ?, author = ? WHERE id = ?")
            .bind(title)
            .bind(author)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(FrontdeskError::NotFound("Book"));
        }
        Ok(())
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), FrontdeskError> {
        let res = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(FrontdeskError::NotFound("Book"));
        }
        Ok(())
    }

    /// Borrow in one transaction. The availability flip is a guarded UPDATE,
    /// so two concurrent borrows of the same book cannot both succeed.
    pub async fn borrow_book(
        &self,
        user_id: i64,
        book_id: i64,
        borrow_date: NaiveDate,
    ) -> Result<i64, FrontdeskError> {
        let mut tx = self.pool.begin().await?;

        let res = sqlx::query("UPDATE books SET available = 0 WHERE id = ? AND available = 1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            let (exists,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE id = ?")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            return if exists == 0 {
                Err(FrontdeskError::NotFound("Book"))
            } else {
                Err(FrontdeskError::AlreadyBorrowed)
            };
        }

        let res = sqlx::query(
            r#"INSERT INTO borrow_records (user_id, book_id, borrow_date, returned)
               VALUES (?, ?, ?, 0)"#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(borrow_date)
        .execute(&mut *tx)
        .await?;
        let record_id = res.last_insert_rowid();

        tx.commit().await?;
        Ok(record_id)
    }

    pub async fn get_record(&self, id: i64) -> Result<Option<BorrowRecord>, FrontdeskError> {
        let row = sqlx::query(
            r#"SELECT id, user_id, book_id, borrow_date, return_date, returned
               FROM borrow_records WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_record).transpose()
    }

    /// Mark a record returned and flip the book available, in one
    /// transaction. The returned flip is a guarded UPDATE, same as the
    /// borrow path, so a second return (concurrent or not) touches nothing
    /// and reports false.
    pub async fn return_record(
        &self,
        record_id: i64,
        return_date: NaiveDate,
    ) -> Result<bool, FrontdeskError> {
        let mut tx = self.pool.begin().await?;

        let res = sqlx::query(
            "UPDATE borrow_records SET returned = 1, return_date = ? WHERE id = ? AND returned = 0",
        )
        .bind(return_date)
        .bind(record_id)
        .execute(&mut *tx)
        .await?;
        if res.rows_affected() == 0 {
            let (exists,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM borrow_records WHERE id = ?")
                    .bind(record_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return if exists == 0 {
                Err(FrontdeskError::NotFound("Borrow record"))
            } else {
                Ok(false)
            };
        }

        let (book_id,): (i64,) =
            sqlx::query_as("SELECT book_id FROM borrow_records WHERE id = ?")
                .bind(record_id)
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query("UPDATE books SET available = 1 WHERE id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn records_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<BorrowedBook>, FrontdeskError> {
        let rows = sqlx::query(
            r#"SELECT r.id, r.user_id, r.book_id, r.borrow_date, r.return_date, r.returned,
                      b.title AS book_title
               FROM borrow_records r
               JOIN books b ON b.id = r.book_id
               WHERE r.user_id = ?
               ORDER BY r.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| {
                let book_title: String = row.try_get("book_title")?;
                let record = Self::row_to_record(row)?;
                Ok(BorrowedBook { record, book_title })
            })
            .collect()
    }

    fn row_to_user(row: SqliteRow) -> Result<User, FrontdeskError> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
        })
    }

    fn row_to_book(row: SqliteRow) -> Result<Book, FrontdeskError> {
        let available: i64 = row.try_get("available")?;
        Ok(Book {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            available: available != 0,
        })
    }

    fn row_to_record(row: SqliteRow) -> Result<BorrowRecord, FrontdeskError> {
        let returned: i64 = row.try_get("returned")?;
        Ok(BorrowRecord {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            book_id: row.try_get("book_id")?,
            borrow_date: row.try_get("borrow_date")?,
            return_date: row.try_get("return_date")?,
            returned: returned != 0,
        })
    }
}
