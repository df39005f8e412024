//! Header-keyed CSV reading.

use std::collections::BTreeMap;
use std::io::Read;

use crate::DatasetError;

/// A parsed CSV file: trimmed headers plus rows keyed by header.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// One map per data row.
    pub rows: Vec<BTreeMap<String, String>>,
}

impl RawTable {
    /// Whether the file declared a column with this header.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Fails with [`DatasetError::MissingColumn`] unless every named
    /// column is present.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] naming the first absent column.
    pub fn require_columns(&self, dataset: &str, names: &[&str]) -> Result<(), DatasetError> {
        for name in names {
            if !self.has_column(name) {
                return Err(DatasetError::MissingColumn {
                    dataset: dataset.to_string(),
                    column: (*name).to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Reads a CSV stream into a [`RawTable`].
///
/// Short rows are padded with empty cells, the same way the scraper
/// treats ragged exports.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the stream is not valid CSV, or
/// [`DatasetError::Parse`] if it has no header row.
pub fn read_table(dataset: &str, reader: impl Read) -> Result<RawTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(DatasetError::Parse(format!(
            "{dataset}: CSV file contains no header row"
        )));
    }

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;

        let mut row = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim().to_owned();
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    log::debug!("{dataset}: read {} rows", rows.len());

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_keyed_by_header() {
        let csv = "Street, PCI \nMain St,35\nOak Ave\n";
        let table = read_table("test", csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Street", "PCI"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["PCI"], "35");
        assert_eq!(table.rows[1]["PCI"], "");
    }

    #[test]
    fn reports_missing_required_column() {
        let table = read_table("pavement", "MSAG_Name\nMain St\n".as_bytes()).unwrap();
        let err = table.require_columns("pavement", &["MSAG_Name", "PCI"]);
        assert!(matches!(
            err,
            Err(DatasetError::MissingColumn { ref column, .. }) if column == "PCI"
        ));
    }

    #[test]
    fn strips_byte_order_mark() {
        let table = read_table("test", "\u{feff}StopID\n12\n".as_bytes()).unwrap();
        assert!(table.has_column("StopID"));
    }
}
