//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the entity tables.
//! Identifiers come from [`Table`] definitions only; values are always bound as parameters.

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// A table with a `BIGSERIAL id` primary key, writable data columns, and managed
/// `created_at` / `updated_at` timestamps.
#[derive(Clone, Debug)]
pub struct Table {
    pub schema: String,
    pub name: &'static str,
    /// Writable columns in insert/bind order.
    pub columns: &'static [&'static str],
}

impl Table {
    pub fn qualified(&self) -> String {
        qualified_table(&self.schema, self.name)
    }

    /// `id`, data columns, then timestamps: the shape every row struct is read from.
    pub fn returning(&self) -> String {
        let mut cols = vec![quoted("id")];
        cols.extend(self.columns.iter().map(|c| quoted(c)));
        cols.push(quoted("created_at"));
        cols.push(quoted("updated_at"));
        cols.join(", ")
    }
}

/// The three entity tables of one schema.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub schema: String,
    pub students: Table,
    pub courses: Table,
    pub grades: Table,
}

impl Catalog {
    pub const STUDENT_COLUMNS: &'static [&'static str] = &["name", "email", "enrollment", "birth_date"];
    pub const COURSE_COLUMNS: &'static [&'static str] = &["code", "name", "workload"];
    pub const GRADE_COLUMNS: &'static [&'static str] = &["student_id", "course_id", "score", "semester"];

    pub fn new(schema: &str) -> Self {
        let table = |name: &'static str, columns: &'static [&'static str]| Table {
            schema: schema.to_string(),
            name,
            columns,
        };
        Catalog {
            schema: schema.to_string(),
            students: table("students", Self::STUDENT_COLUMNS),
            courses: table("courses", Self::COURSE_COLUMNS),
            grades: table("grades", Self::GRADE_COLUMNS),
        }
    }
}

/// SELECT by primary key. Binds: id.
pub fn select_by_id(table: &Table) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        table.returning(),
        table.qualified(),
        quoted("id")
    )
}

/// SELECT a page ordered by id. Binds: limit, offset.
pub fn select_page(table: &Table) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT $1 OFFSET $2",
        table.returning(),
        table.qualified(),
        quoted("id")
    )
}

/// SELECT all rows where `column` equals the bound value, ordered by id. Binds: value.
pub fn select_where(table: &Table, column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1 ORDER BY {}",
        table.returning(),
        table.qualified(),
        quoted(column),
        quoted("id")
    )
}

/// Whether another row (id different from `$2`) already holds the value `$1` in `column`.
/// Bind 0 as `$2` on insert: ids start at 1.
pub fn exists_other(table: &Table, column: &str) -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND {} <> $2)",
        table.qualified(),
        quoted(column),
        quoted("id")
    )
}

/// Number of rows where `column` equals `$1`.
pub fn count_where(table: &Table, column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        table.qualified(),
        quoted(column)
    )
}

/// INSERT all writable columns. Binds: one value per column, in column order.
pub fn insert(table: &Table) -> String {
    let cols: Vec<String> = table.columns.iter().map(|c| quoted(c)).collect();
    let placeholders: Vec<String> = (1..=table.columns.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table.qualified(),
        cols.join(", "),
        placeholders.join(", "),
        table.returning()
    )
}

/// UPDATE by id where a NULL parameter keeps the current value.
/// Binds: id, then one value (or NULL) per `columns` entry, in order.
pub fn update_partial(table: &Table, columns: &[&str]) -> String {
    let mut sets: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let q = quoted(c);
            format!("{} = COALESCE(${}, {})", q, i + 2, q)
        })
        .collect();
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    format!(
        "UPDATE {} SET {} WHERE {} = $1 RETURNING {}",
        table.qualified(),
        sets.join(", "),
        quoted("id"),
        table.returning()
    )
}

/// DELETE by id. Binds: id.
pub fn delete(table: &Table) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        table.qualified(),
        quoted("id")
    )
}

/// DELETE every row where `column` equals `$1`.
pub fn delete_where(table: &Table, column: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        table.qualified(),
        quoted(column)
    )
}
