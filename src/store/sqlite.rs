use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::Store;
use crate::errors::{StoreError, StoreResult};
use crate::models::{format_date, parse_date, Review};

/// Review store on top of an embedded SQLite connection, opened in memory so
/// the data lives only as long as the session.
pub struct SqliteReviewStore {
    conn: Connection,
}

/// Raw column values before they are decoded into a [`Review`].
type ReviewRow = (String, String, String, i64, String, String);

impl SqliteReviewStore {
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// `seq` keeps insertion order. The `CHECK` mirrors the star range.
    fn ensure_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS reviews (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                nickname TEXT NOT NULL,
                book_code TEXT NOT NULL,
                stars INTEGER NOT NULL CHECK (stars BETWEEN 0 AND 5),
                comment TEXT NOT NULL,
                reviewed_on TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

fn decode(row: ReviewRow) -> StoreResult<Review> {
    let (id, nickname, book_code, stars, comment, reviewed_on) = row;
    let id = Uuid::parse_str(&id).map_err(|err| StoreError::Corrupt(format!("id {id}: {err}")))?;
    let stars = u8::try_from(stars)
        .map_err(|_| StoreError::Corrupt(format!("stars {stars} for review {id}")))?;
    let reviewed_on: NaiveDate = parse_date(&reviewed_on)
        .ok_or_else(|| StoreError::Corrupt(format!("date {reviewed_on} for review {id}")))?;
    Ok(Review {
        id,
        nickname,
        book_code,
        stars,
        comment,
        reviewed_on,
    })
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

impl Store<Review> for SqliteReviewStore {
    fn insert(&mut self, record: Review) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO reviews (id, nickname, book_code, stars, comment, reviewed_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                record.nickname,
                record.book_code,
                i64::from(record.stars),
                record.comment,
                format_date(record.reviewed_on),
            ],
        )?;
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<Review>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, nickname, book_code, stars, comment, reviewed_on
             FROM reviews ORDER BY seq",
        )?;
        let rows = stmt
            .query_map([], read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(decode).collect()
    }

    fn find(&self, id: Uuid) -> StoreResult<Option<Review>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, nickname, book_code, stars, comment, reviewed_on
                 FROM reviews WHERE id = ?1",
                params![id.to_string()],
                read_row,
            )
            .optional()?;
        row.map(decode).transpose()
    }

    fn replace(&mut self, record: Review) -> StoreResult<bool> {
        let updated = self.conn.execute(
            "UPDATE reviews
             SET nickname = ?1, book_code = ?2, stars = ?3, comment = ?4, reviewed_on = ?5
             WHERE id = ?6",
            params![
                record.nickname,
                record.book_code,
                i64::from(record.stars),
                record.comment,
                format_date(record.reviewed_on),
                record.id.to_string(),
            ],
        )?;
        Ok(updated > 0)
    }

    fn remove(&mut self, id: Uuid) -> StoreResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(book_code: &str, stars: u8) -> Review {
        Review {
            id: Uuid::new_v4(),
            nickname: "biblio".into(),
            book_code: book_code.into(),
            stars,
            comment: "ok".into(),
            reviewed_on: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        }
    }

    #[test]
    fn round_trips_in_insertion_order() {
        let mut store = SqliteReviewStore::open_in_memory().unwrap();
        let first = review("1002", 3);
        let second = review("1001", 5);
        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();

        assert_eq!(store.list().unwrap(), vec![first.clone(), second]);
        assert_eq!(store.find(first.id).unwrap(), Some(first));
    }

    #[test]
    fn replace_and_remove_report_missing_rows() {
        let mut store = SqliteReviewStore::open_in_memory().unwrap();
        let stored = review("1001", 4);
        store.insert(stored.clone()).unwrap();

        let mut changed = stored.clone();
        changed.stars = 1;
        assert!(store.replace(changed).unwrap());
        assert_eq!(store.find(stored.id).unwrap().unwrap().stars, 1);

        assert!(store.remove(stored.id).unwrap());
        assert!(!store.remove(stored.id).unwrap());
        assert!(!store.replace(review("x", 0)).unwrap());
    }

    #[test]
    fn schema_rejects_out_of_range_stars() {
        let mut store = SqliteReviewStore::open_in_memory().unwrap();
        let mut bad = review("1001", 0);
        bad.stars = 9;
        assert!(matches!(store.insert(bad), Err(StoreError::Sqlite(_))));
    }
}
