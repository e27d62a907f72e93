use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::io::{self, Write};

/// Semantic type of a column. Every column is nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Str,
    Date,
}

/// One cell of a row, tagged with its type so the column can be built without probing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Str(Option<String>),
    Date(Option<NaiveDate>),
}

impl Cell {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Cell::Int(_) => ColumnType::Int,
            Cell::Float(_) => ColumnType::Float,
            Cell::Bool(_) => ColumnType::Bool,
            Cell::Str(_) => ColumnType::Str,
            Cell::Date(_) => ColumnType::Date,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Cell::Int(v) => v.is_none(),
            Cell::Float(v) => v.is_none(),
            Cell::Bool(v) => v.is_none(),
            Cell::Str(v) => v.is_none(),
            Cell::Date(v) => v.is_none(),
        }
    }
}

impl From<Option<i64>> for Cell {
    fn from(v: Option<i64>) -> Self {
        Cell::Int(v)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        Cell::Float(v)
    }
}

impl From<Option<bool>> for Cell {
    fn from(v: Option<bool>) -> Self {
        Cell::Bool(v)
    }
}

impl From<Option<String>> for Cell {
    fn from(v: Option<String>) -> Self {
        Cell::Str(v)
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(v: Option<NaiveDate>) -> Self {
        Cell::Date(v)
    }
}

/// A row type with a fixed, declared column layout.
///
/// `cells()` must return exactly one cell per entry of `COLUMNS`, in the same
/// order and with the declared type.
pub trait Tabular {
    const COLUMNS: &'static [(&'static str, ColumnType)];

    fn cells(&self) -> Vec<Cell>;
}

/// Declare a row struct whose field names are its column names.
/// Field kinds are `Int`, `Float`, `Bool`, `Str` or `Date`; every field is optional.
macro_rules! tabular_row {
    (@ty Int) => { Option<i64> };
    (@ty Float) => { Option<f64> };
    (@ty Bool) => { Option<bool> };
    (@ty Str) => { Option<String> };
    (@ty Date) => { Option<chrono::NaiveDate> };
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $kind:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $crate::table::tabular_row!(@ty $kind), )*
        }

        impl $crate::table::Tabular for $name {
            const COLUMNS: &'static [(&'static str, $crate::table::ColumnType)] =
                &[$( (stringify!($field), $crate::table::ColumnType::$kind) ),*];

            fn cells(&self) -> Vec<$crate::table::Cell> {
                vec![$( $crate::table::Cell::$kind(self.$field.clone()) ),*]
            }
        }
    };
}
pub(crate) use tabular_row;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
}

impl ColumnValues {
    fn with_capacity(kind: ColumnType, capacity: usize) -> Self {
        match kind {
            ColumnType::Int => ColumnValues::Int(Vec::with_capacity(capacity)),
            ColumnType::Float => ColumnValues::Float(Vec::with_capacity(capacity)),
            ColumnType::Bool => ColumnValues::Bool(Vec::with_capacity(capacity)),
            ColumnType::Str => ColumnValues::Str(Vec::with_capacity(capacity)),
            ColumnType::Date => ColumnValues::Date(Vec::with_capacity(capacity)),
        }
    }

    /// Append a cell. A cell of the wrong type is stored as null.
    fn push(&mut self, cell: Cell) {
        match (self, cell) {
            (ColumnValues::Int(col), Cell::Int(v)) => col.push(v),
            (ColumnValues::Float(col), Cell::Float(v)) => col.push(v),
            (ColumnValues::Bool(col), Cell::Bool(v)) => col.push(v),
            (ColumnValues::Str(col), Cell::Str(v)) => col.push(v),
            (ColumnValues::Date(col), Cell::Date(v)) => col.push(v),
            (col, cell) => {
                debug_assert!(false, "cell type {:?} pushed into {:?} column", cell.column_type(), col.column_type());
                col.push_null();
            }
        }
    }

    fn push_null(&mut self) {
        match self {
            ColumnValues::Int(col) => col.push(None),
            ColumnValues::Float(col) => col.push(None),
            ColumnValues::Bool(col) => col.push(None),
            ColumnValues::Str(col) => col.push(None),
            ColumnValues::Date(col) => col.push(None),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValues::Int(_) => ColumnType::Int,
            ColumnValues::Float(_) => ColumnType::Float,
            ColumnValues::Bool(_) => ColumnType::Bool,
            ColumnValues::Str(_) => ColumnType::Str,
            ColumnValues::Date(_) => ColumnType::Date,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Int(col) => col.len(),
            ColumnValues::Float(col) => col.len(),
            ColumnValues::Bool(col) => col.len(),
            ColumnValues::Str(col) => col.len(),
            ColumnValues::Date(col) => col.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnValues::Int(col) => col.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Float(col) => col.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Bool(col) => col.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Str(col) => col.iter().filter(|v| v.is_none()).count(),
            ColumnValues::Date(col) => col.iter().filter(|v| v.is_none()).count(),
        }
    }

    pub fn get(&self, row: usize) -> Option<Cell> {
        match self {
            ColumnValues::Int(col) => col.get(row).map(|v| Cell::Int(*v)),
            ColumnValues::Float(col) => col.get(row).map(|v| Cell::Float(*v)),
            ColumnValues::Bool(col) => col.get(row).map(|v| Cell::Bool(*v)),
            ColumnValues::Str(col) => col.get(row).map(|v| Cell::Str(v.clone())),
            ColumnValues::Date(col) => col.get(row).map(|v| Cell::Date(*v)),
        }
    }

    pub fn as_ints(&self) -> Option<&[Option<i64>]> {
        match self {
            ColumnValues::Int(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnValues::Float(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_bools(&self) -> Option<&[Option<bool>]> {
        match self {
            ColumnValues::Bool(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_strs(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnValues::Str(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_dates(&self) -> Option<&[Option<NaiveDate>]> {
        match self {
            ColumnValues::Date(col) => Some(col),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub values: ColumnValues,
}

/// Columnar table with named, typed, nullable columns in a stable order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Transpose a sequence of rows into columns in one pass.
    pub fn from_rows<R: Tabular>(rows: &[R]) -> Self {
        let mut columns: Vec<Column> = R::COLUMNS
            .iter()
            .map(|&(name, kind)| Column { name, values: ColumnValues::with_capacity(kind, rows.len()) })
            .collect();

        for row in rows {
            let mut cells = row.cells().into_iter();
            for column in &mut columns {
                match cells.next() {
                    Some(cell) => column.values.push(cell),
                    None => column.values.push_null(),
                }
            }
        }

        Self { columns, height: rows.len() }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.values)
    }

    /// Write as CSV with a header line. Nulls are empty fields.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let header: Vec<String> = self.columns.iter().map(|c| escape_csv(c.name)).collect();
        writeln!(out, "{}", header.join(","))?;

        let mut line = Vec::with_capacity(self.columns.len());
        for row in 0..self.height {
            line.clear();
            for column in &self.columns {
                let field = column.values.get(row).map(|cell| cell_to_text(&cell)).unwrap_or_default();
                line.push(escape_csv(&field));
            }
            writeln!(out, "{}", line.join(","))?;
        }
        Ok(())
    }

    /// One JSON object per row, keys in column order. Nulls are JSON `null`.
    pub fn to_json_records(&self) -> Vec<Value> {
        (0..self.height)
            .map(|row| {
                let mut record = Map::with_capacity(self.columns.len());
                for column in &self.columns {
                    let value = column.values.get(row).map(cell_to_json).unwrap_or(Value::Null);
                    record.insert(column.name.to_owned(), value);
                }
                Value::Object(record)
            })
            .collect()
    }
}

fn cell_to_text(cell: &Cell) -> String {
    match cell {
        Cell::Int(v) => v.map(|x| x.to_string()).unwrap_or_default(),
        Cell::Float(v) => v.map(|x| x.to_string()).unwrap_or_default(),
        Cell::Bool(v) => v.map(|x| x.to_string()).unwrap_or_default(),
        Cell::Str(v) => v.clone().unwrap_or_default(),
        Cell::Date(v) => v.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
    }
}

fn cell_to_json(cell: Cell) -> Value {
    match cell {
        Cell::Int(v) => v.map(Value::from).unwrap_or(Value::Null),
        Cell::Float(v) => v
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Bool(v) => v.map(Value::Bool).unwrap_or(Value::Null),
        Cell::Str(v) => v.map(Value::String).unwrap_or(Value::Null),
        Cell::Date(v) => v.map(|d| Value::String(d.format("%Y-%m-%d").to_string())).unwrap_or(Value::Null),
    }
}

/// Quote a field if it contains the separator, a quote, or a line break.
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
