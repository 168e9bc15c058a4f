/// A row-oriented geometry table whose rows all share one coordinate
/// reference system, identified by EPSG code.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub epsg: Option<u32>,
    pub rows: Vec<T>,
}

impl<T> Table<T> {
    pub fn new(epsg: Option<u32>, rows: Vec<T>) -> Self { Self { epsg, rows } }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// A new table in the same CRS.
    pub fn with_rows<U>(&self, rows: Vec<U>) -> Table<U> { Table { epsg: self.epsg, rows } }
}
