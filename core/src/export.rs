//! CSV export of a generated table.
//!
//! One header row, then one row per applicant in id order.
//! Encodings come from ApplicantRecord::to_row.

use crate::{
    error::{GenError, GenResult},
    table::{DatasetTable, COLUMNS},
};
use std::{fs::File, io::Write, path::Path};

pub fn write_csv<W: Write>(table: &DatasetTable, writer: W) -> GenResult<W> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for row in table.rows() {
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    csv_writer.into_inner().map_err(|e| GenError::Io(e.into_error()))
}

pub fn to_csv_bytes(table: &DatasetTable) -> GenResult<Vec<u8>> {
    write_csv(table, Vec::new())
}

pub fn write_csv_file(table: &DatasetTable, path: &Path) -> GenResult<()> {
    let file = File::create(path)?;
    write_csv(table, file)?;
    log::info!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
