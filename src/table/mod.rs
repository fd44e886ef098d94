//! In-memory tables built from worksheets.

mod value;

pub use value::Value;

/// An ordered sequence of records sharing named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Name the table was read from, used in messages
    pub name: String,
    /// Column names in sheet order
    pub columns: Vec<String>,
    /// Records, each holding exactly `columns.len()` values
    pub records: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<String>) -> Self {
        Table {
            name: name.to_owned(),
            columns,
            records: Vec::new(),
        }
    }

    /// Appends a record, padding or truncating it to the column count.
    pub fn push(&mut self, mut record: Vec<Value>) {
        record.resize(self.columns.len(), Value::Null);
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the first column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value at (record, column). Out-of-range positions read as null.
    pub fn get(&self, record: usize, column: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.records
            .get(record)
            .and_then(|values| values.get(column))
            .unwrap_or(&NULL)
    }

    /// Rewrites every value of the named column in place. Returns false when
    /// the column does not exist.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Value) -> Value,
    {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        for record in &mut self.records {
            record[index] = f(&record[index]);
        }
        true
    }
}
