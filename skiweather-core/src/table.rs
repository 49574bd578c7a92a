use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use tracing::info;

use crate::model::{COLUMNS, DayRecord, ForecastTable};

/// Write `table` as CSV to `path`. Absent values become empty cells.
pub fn write_csv(table: &ForecastTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_csv_to(table, file)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;

    info!(path = %path.display(), rows = table.len(), "wrote forecast CSV");
    Ok(())
}

pub fn write_csv_to<W: Write>(table: &ForecastTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    // serde only emits a header alongside the first record
    if table.is_empty() {
        wtr.write_record(COLUMNS)?;
    }
    for record in table {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<ForecastTable> {
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_csv_from(file).with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

pub fn read_csv_from<R: Read>(reader: R) -> Result<ForecastTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr.deserialize::<DayRecord>().collect::<Result<Vec<_>, _>>()?;
    Ok(ForecastTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ForecastTable {
        ForecastTable::new(vec![
            DayRecord {
                date: "2024-12-13".into(),
                max_temp_c: 2.0,
                min_temp_c: -5.0,
                total_snow_cm: 0.0,
                chance_of_snow: Some(20.0),
                avg_visibility_km: Some(9.0),
            },
            DayRecord {
                date: "2024-12-14".into(),
                max_temp_c: -1.5,
                min_temp_c: -9.0,
                total_snow_cm: 12.3,
                chance_of_snow: None,
                avg_visibility_km: None,
            },
        ])
    }

    fn render(table: &ForecastTable) -> String {
        let mut buf = Vec::new();
        write_csv_to(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_and_blank_cells() {
        let text = render(&sample());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "date,max_temp_C,min_temp_C,total_snow_cm,chance_of_snow,avg_visibility_km"
        );
        assert_eq!(lines[1], "2024-12-13,2.0,-5.0,0.0,20.0,9.0");
        assert_eq!(lines[2], "2024-12-14,-1.5,-9.0,12.3,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_table_still_has_header() {
        assert_eq!(
            render(&ForecastTable::default()),
            "date,max_temp_C,min_temp_C,total_snow_cm,chance_of_snow,avg_visibility_km\n"
        );
    }

    #[test]
    fn file_roundtrip_keeps_absent_values_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_forecast.csv");

        write_csv(&sample(), &path).unwrap();
        let back = read_csv(&path).unwrap();

        assert_eq!(back, sample());
        assert_eq!(back.records()[1].chance_of_snow, None);
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_csv(&sample(), &path).unwrap_err();
        assert!(err.to_string().contains("Failed to create CSV file"));
    }
}
