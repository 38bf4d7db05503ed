use std::io::Write;
use std::path::Path;

use super::metrics::{with_derived_columns, DerivedRow};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `rows` as CSV: `columns` plus `daily_cost_inr`, nulls empty.
pub fn write_csv<W: Write>(
    writer: W,
    columns: &[String],
    rows: &[DerivedRow<'_>],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header = with_derived_columns(columns);
    wtr.write_record(&header)?;

    for row in rows {
        let record: Vec<String> = header
            .iter()
            .map(|col| row.cell(col).to_plain_string())
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export the filtered view to `path`.
pub fn export_csv(path: &Path, columns: &[String], rows: &[DerivedRow<'_>]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(file, columns, rows)?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::loader::parse_inventory;
    use crate::data::metrics::derive_rows;

    #[test]
    fn test_csv_has_derived_column_and_empty_nulls() {
        let table = parse_inventory(
            r#"[{"instance_name":"vm1","daily_cost":"10"},{"instance_name":"vm, 2","daily_cost":"bad"}]"#,
            Path::new("t.json"),
        )
        .unwrap();
        let rows = derive_rows(&table, 83.0);
        let mut out = Vec::new();
        write_csv(&mut out, &table.column_names, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "instance_name,daily_cost,daily_cost_inr\nvm1,10,830\n\"vm, 2\",,\n"
        );
    }

    #[test]
    fn test_csv_overwrites_existing_inr_column() {
        let table = parse_inventory(
            r#"[{"instance_name":"vm1","daily_cost_inr":5,"daily_cost":"10"}]"#,
            Path::new("t.json"),
        )
        .unwrap();
        let rows = derive_rows(&table, 83.0);
        let mut out = Vec::new();
        write_csv(&mut out, &table.column_names, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "instance_name,daily_cost_inr,daily_cost\nvm1,830,10\n"
        );
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export_csv(&path, &[], &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "daily_cost_inr\n");
    }
}
