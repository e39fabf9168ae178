use std::io::Write;

use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

/// Write `data` as pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize>(w: &mut impl Write, data: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, data)?;
    writeln!(w)?;
    Ok(())
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Tabular writer backed by `comfy-table`.
///
/// Columns are sized to the widest entry, separated by whitespace only.
pub struct TabWriter {
    table: Table,
}

impl TabWriter {
    /// Create a new `TabWriter` with `(header, alignment)` column definitions.
    pub fn new(columns: &[(&str, Align)]) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);

        let headers: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        table.set_header(headers);

        // Outer columns carry no padding on the outside edge; inner gaps are two spaces
        let last = columns.len().saturating_sub(1);
        for (i, (_, align)) in columns.iter().enumerate() {
            let cell_align = match align {
                Align::Left => CellAlignment::Left,
                Align::Right => CellAlignment::Right,
            };
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(cell_align);
                let pad_left = if i == 0 { 0 } else { 1 };
                let pad_right = if i == last { 0 } else { 1 };
                col.set_padding((pad_left, pad_right));
            }
        }

        Self { table }
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Write the table, one trimmed line per row.
    pub fn write(&self, w: &mut impl Write) -> std::io::Result<()> {
        for line in self.table.to_string().lines() {
            writeln!(w, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
