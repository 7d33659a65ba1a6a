//! Append-only table of per-plant records and its CSV writer.
use crate::image::io::ensure_parent_dir;
use crate::types::{PlantIndex, PlantMetrics};
use std::io::Write;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub enum TableError {
    OutOfOrder {
        expected: PlantIndex,
        found: PlantIndex,
    },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::OutOfOrder { expected, found } => write!(
                f,
                "plant records must be appended in selection order: expected plant {expected}, got {found}"
            ),
        }
    }
}

impl std::error::Error for TableError {}

/// Per-plant records in selection order. Indices run 1, 2, 3, …
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsTable {
    rows: Vec<PlantMetrics>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next appended record must carry.
    pub fn next_index(&self) -> PlantIndex {
        self.rows.len() + 1
    }

    pub fn append(&mut self, metrics: PlantMetrics) -> Result<(), TableError> {
        let expected = self.next_index();
        if metrics.index != expected {
            return Err(TableError::OutOfOrder {
                expected,
                found: metrics.index,
            });
        }
        self.rows.push(metrics);
        Ok(())
    }

    pub fn rows(&self) -> &[PlantMetrics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), String> {
        let mut wtr = csv::Writer::from_writer(out);
        if self.rows.is_empty() {
            wtr.write_record(HEADER)
                .map_err(|e| format!("Failed to write CSV header: {e}"))?;
        }
        for row in &self.rows {
            wtr.serialize(row)
                .map_err(|e| format!("Failed to write CSV row for plant {}: {e}", row.index))?;
        }
        wtr.flush()
            .map_err(|e| format!("Failed to flush CSV: {e}"))
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), String> {
        ensure_parent_dir(path)?;
        let file = std::fs::File::create(path)
            .map_err(|e| format!("Failed to create {}: {e}", path.display()))?;
        self.write_csv(file)
    }
}

/// Column names, in order.
pub const HEADER: [&str; 6] = [
    "PlantIndex",
    "MeanShootGreen",
    "MeanRootGray",
    "BranchCount",
    "ManualLength_mm",
    "ManualDiameter_mm",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: PlantIndex) -> PlantMetrics {
        PlantMetrics {
            index,
            mean_shoot_green: 120.0,
            mean_root_gray: 87.5,
            branch_count: 2,
            manual_length_mm: 150.0,
            manual_diameter_mm: 0.0,
        }
    }

    #[test]
    fn rows_must_arrive_in_selection_order() {
        let mut table = MetricsTable::new();
        table.append(row(1)).unwrap();
        let err = table.append(row(3)).unwrap_err();
        assert_eq!(
            err,
            TableError::OutOfOrder {
                expected: 2,
                found: 3
            }
        );
        table.append(row(2)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.next_index(), 3);
    }

    #[test]
    fn csv_has_exact_header_and_one_line_per_plant() {
        let mut table = MetricsTable::new();
        table.append(row(1)).unwrap();
        table.append(row(2)).unwrap();
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(lines[1], "1,120.0,87.5,2,150.0,0.0");
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn empty_table_still_writes_header() {
        let mut buf = Vec::new();
        MetricsTable::new().write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), HEADER.join(","));
    }
}
