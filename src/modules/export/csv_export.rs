//! CSV Export
//!
//! Writes the fleet snapshot (cars and tours) to a CSV file.

use crate::domain::{Car, FleetRecord, Tour};
use std::path::Path;

/// Write cars and tours to one CSV file
pub fn write_fleet(
    path: &Path,
    cars: &[Car],
    tours: &[Tour],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["kind", "id", "name", "price", "available"])?;

    for car in cars {
        write_row(&mut wtr, "car", car)?;
    }
    for tour in tours {
        write_row(&mut wtr, "tour", tour)?;
    }

    wtr.flush()?;
    Ok(cars.len() + tours.len())
}

fn write_row<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    kind: &str,
    record: &dyn FleetRecord,
) -> csv::Result<()> {
    wtr.write_record([
        kind.to_string(),
        record.id().to_string(),
        record.display_name(),
        format!("{:.2}", record.price()),
        record.available().to_string(),
    ])
}
