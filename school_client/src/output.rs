//! Plain-text views of records: aligned tables for listings.

use school_registry::export::Exportable;
use school_registry::model::GradeReport;

/// Left-aligned table with a header underline. Column width is the widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        padded.join("  ").trim_end().to_string()
    };
    let mut out = line(headers.to_vec());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Table of any exportable listing, one column per field.
pub fn records<T: Exportable>(items: &[T]) -> String {
    let headers: Vec<&str> = T::fields().iter().map(|f| f.label).collect();
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|r| r.cells().iter().map(ToString::to_string).collect())
        .collect();
    table(&headers, &rows)
}

/// Grades with names resolved, keyed by grade id.
pub fn grade_reports(rows: &[(i64, GradeReport)]) -> String {
    let mut headers = vec!["ID"];
    headers.extend(GradeReport::fields().iter().map(|f| f.label));
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(id, r)| {
            let mut row = vec![id.to_string()];
            row.extend(r.cells().iter().map(ToString::to_string));
            row
        })
        .collect();
    table(&headers, &rows)
}
