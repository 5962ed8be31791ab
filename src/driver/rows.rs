use sqlx::{FromRow, Row};

use crate::{Error, Operation, Result};

/// Rows returned by a query, with their column names.
///
/// Iterating yields the driver's native rows; [`next_as`](Self::next_as)
/// decodes the next one through [`FromRow`].
///
/// The rows are fetched in full before `Rows` is returned, and the column
/// names are read from the first of them. A query that matches no rows
/// therefore reports no columns.
#[derive(Debug)]
pub struct Rows<R> {
    columns: Vec<String>,
    rows: std::vec::IntoIter<R>,
}

impl<R: Row> Rows<R> {
    #[cfg(any(feature = "mysql", feature = "postgres", feature = "sqlite"))]
    pub(crate) fn new(rows: Vec<R>) -> Self {
        use sqlx::Column;

        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| column.name().to_owned())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }

    /// Column names in select order.
    ///
    /// Empty when the query returned no rows: the names come from the first
    /// row, and sqlx exposes no statement metadata without a second round
    /// trip on the same executor.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Discards the remaining rows.
    pub fn close(&mut self) -> Result<()> {
        self.rows = Vec::new().into_iter();
        Ok(())
    }

    pub fn next_as<T>(&mut self) -> Option<Result<T>>
    where
        T: for<'r> FromRow<'r, R>,
    {
        let row = self.rows.next()?;
        Some(T::from_row(&row).map_err(|err| Error::execution(Operation::Decode, err)))
    }
}

impl<R> Iterator for Rows<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
