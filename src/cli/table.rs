//! Fixed-width text tables for ledger listings.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub alignment: Alignment,
    pub max_width: Option<usize>,
}

impl Column {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Left,
            max_width: None,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Right,
            max_width: None,
        }
    }

    pub fn capped(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.header.len(), usize::max);
                column.max_width.map_or(widest, |cap| widest.min(cap))
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = cells.get(idx).copied().unwrap_or("");
                render_cell(text, *width, column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    /// Header, rule and one line per row.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let header: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        let mut lines = vec![self.render_row(&header, &widths)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines.join("\n")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('~');
    out
}

fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate(text, width);
    match alignment {
        Alignment::Left => format!("{fitted:<width$}"),
        Alignment::Right => format!("{fitted:>width$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_and_truncate() {
        let mut table = Table::new(vec![
            Column::left("Category").capped(6),
            Column::right("Amount"),
        ]);
        table.push(vec!["Groceries".into(), "12.50".into()]);
        table.push(vec!["Rent".into(), "1200.00".into()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Categ~   Amount");
        assert_eq!(lines[1], "---------------");
        assert_eq!(lines[2], "Groce~    12.50");
        assert_eq!(lines[3], "Rent    1200.00");
    }

    #[test]
    fn header_only_when_empty() {
        let table = Table::new(vec![Column::left("Id")]);
        assert!(table.is_empty());
        assert_eq!(table.render(), "Id\n--");
    }
}
