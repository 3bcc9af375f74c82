//! Table layout: grid size and destination offsets of every cell.
//!
//! In the destination's flat index space a table, each of its rows and each
//! of its cells open with their own structural slot, and every cell carries a
//! trailing paragraph mark. A freshly inserted `rows x columns` table anchored
//! at `a` therefore places the paragraph of cell `(i, j)` at
//!
//! ```text
//! a + 2 + i + columns * i * 2 + (j + 1) * 2
//! ```
//!
//! Offsets are only valid on the empty table: writing text into one cell
//! shifts every later cell. Cells are therefore filled from the last one to
//! the first (see [`TableLayout::fill_order`]).
//!
//! Splitting the markup follows the line structure of wiki tables:
//!
//! - `{|` / `|}` open and close the table and may nest inside a cell;
//! - `|-` starts a row, `|+` is a caption (dropped);
//! - a line starting with `|` or `!` starts one or more cells, split on
//!   `||` (or `!!` for header lines) outside of `[[..]]`, `[..]` and `{{..}}`;
//! - any other line continues the previous cell.

use crate::ir::operations::FontRange;
use serde::Serialize;

/// A cell's markup and its insertion index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellPlacement {
    pub row: usize,
    pub column: usize,
    pub index: usize,
    pub markup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub anchor: usize,
    pub rows: usize,
    pub columns: usize,
    /// Non-empty cells, in row/column order.
    pub cells: Vec<CellPlacement>,
}

impl TableLayout {
    pub fn cell_index(&self, row: usize, column: usize) -> usize {
        cell_index(self.anchor, self.columns, row, column)
    }

    /// Range covering the whole table body, for the table font size.
    pub fn font_range(&self, size_pt: f64) -> FontRange {
        let last = self.cell_index(self.rows - 1, self.columns - 1);
        FontRange {
            start: self.anchor + 1,
            end: last + 1,
            size_pt,
        }
    }

    /// Cells in the order their content must be inserted.
    pub fn fill_order(&self) -> impl Iterator<Item = &CellPlacement> {
        self.cells.iter().rev()
    }
}

/// Index of the first position inside cell `(row, column)` of an empty table.
pub fn cell_index(anchor: usize, columns: usize, row: usize, column: usize) -> usize {
    (anchor + 2 + row + columns * row * 2) + (column + 1) * 2
}

/// Computes the layout of `raw` table markup inserted at `anchor`.
///
/// Returns `None` when no cell delimiter is found.
pub fn layout_table(raw: &str, anchor: usize) -> Option<TableLayout> {
    let rows: Vec<Vec<String>> = split_rows(raw)
        .into_iter()
        .filter(|row| !row.is_empty())
        .collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return None;
    }

    let mut cells = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let markup = cell.trim();
            if markup.is_empty() {
                continue;
            }
            cells.push(CellPlacement {
                row: i,
                column: j,
                index: cell_index(anchor, columns, i, j),
                markup: markup.to_string(),
            });
        }
    }

    Some(TableLayout {
        anchor,
        rows: rows.len(),
        columns,
        cells,
    })
}

/// Splits table markup into rows of raw cell markup.
pub fn split_rows(raw: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut depth = 0usize;

    for line in raw.lines() {
        let trimmed = line.trim_start();

        if depth == 0 {
            if trimmed.starts_with("{|") {
                depth = 1;
            }
            continue;
        }

        if depth > 1 {
            if trimmed.starts_with("{|") {
                depth += 1;
            } else if trimmed.starts_with("|}") {
                depth -= 1;
            }
            append_line(&mut row, line);
            continue;
        }

        if trimmed.starts_with("|}") {
            break;
        }
        if trimmed.starts_with("{|") {
            depth += 1;
            append_line(&mut row, line);
        } else if trimmed.starts_with("|+") {
            continue;
        } else if trimmed.starts_with("|-") {
            rows.push(std::mem::take(&mut row));
        } else if let Some(rest) = trimmed.strip_prefix('!') {
            row.extend(split_cells(rest, true).into_iter().map(strip_attributes));
        } else if let Some(rest) = trimmed.strip_prefix('|') {
            row.extend(split_cells(rest, false).into_iter().map(strip_attributes));
        } else {
            append_line(&mut row, line);
        }
    }
    rows.push(row);
    rows
}

fn append_line(row: &mut [String], line: &str) {
    if let Some(cell) = row.last_mut() {
        cell.push('\n');
        cell.push_str(line);
    }
}

/// Splits one cell line on `||` (and `!!` for header lines) outside brackets.
pub fn split_cells(line: &str, header: bool) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' | b'{' => depth += 1,
            b']' | b'}' => depth = depth.saturating_sub(1),
            b'|' | b'!' if depth == 0 && bytes.get(i + 1) == Some(&bytes[i]) => {
                if bytes[i] == b'|' || header {
                    cells.push(&line[start..i]);
                    i += 2;
                    start = i;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    cells.push(&line[start..]);
    cells
}

/// Drops an `attr="x" | content` prefix.
fn strip_attributes(cell: &str) -> String {
    let bytes = cell.as_bytes();
    let mut depth = 0usize;
    for (i, byte) in bytes.iter().enumerate() {
        match byte {
            b'[' | b'{' => depth += 1,
            b']' | b'}' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => {
                let prefix = &cell[..i];
                if prefix.contains('=') {
                    return cell[i + 1..].to_string();
                }
                break;
            }
            _ => {}
        }
    }
    cell.to_string()
}
