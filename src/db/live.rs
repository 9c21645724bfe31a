//! Live queries: a polling layer that re-runs a query only when the
//! database changed and emits only when the result differs.
//!
//! The change stamp combines `total_changes()` (writes made through this
//! connection) and `PRAGMA data_version` (commits made by other connections
//! to the same file).

use crate::errors::AppResult;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStamp {
    local_changes: i64,
    data_version: i64,
}

impl ChangeStamp {
    pub fn read(conn: &Connection) -> AppResult<Self> {
        let local_changes = conn.query_row("SELECT total_changes()", [], |row| row.get(0))?;
        let data_version = conn.query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(Self {
            local_changes,
            data_version,
        })
    }
}

type QueryFn<T> = Box<dyn Fn(&Connection) -> AppResult<T>>;

pub struct LiveQuery<T> {
    query: QueryFn<T>,
    stamp: Option<ChangeStamp>,
    current: Option<T>,
}

impl<T: PartialEq> LiveQuery<T> {
    pub fn new<F>(query: F) -> Self
    where
        F: Fn(&Connection) -> AppResult<T> + 'static,
    {
        Self {
            query: Box::new(query),
            stamp: None,
            current: None,
        }
    }

    /// Last emitted value, if any.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Returns `Some(value)` on the first poll and whenever the result changed
    /// since the previous emission; `None` otherwise.
    pub fn poll(&mut self, conn: &Connection) -> AppResult<Option<&T>> {
        let stamp = ChangeStamp::read(conn)?;
        if self.stamp == Some(stamp) && self.current.is_some() {
            return Ok(None);
        }

        let fresh = (self.query)(conn)?;
        self.stamp = Some(stamp);
        if self.current.as_ref() == Some(&fresh) {
            return Ok(None);
        }

        self.current = Some(fresh);
        Ok(self.current.as_ref())
    }
}
