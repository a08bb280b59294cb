//! CSV input/output for sample columns.

use std::io::{Read, Write};
use std::path::Path;

type IoError = Box<dyn std::error::Error>;

/// Read two numeric columns, selected by header label, from a CSV source.
pub fn read_columns<R: Read>(
    reader: R,
    x_col: &str,
    y_col: &str,
) -> Result<(Vec<f64>, Vec<f64>), IoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize, IoError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| format!("missing column '{}' (have: {:?})", name, headers).into())
    };
    let xi = column(x_col)?;
    let yi = column(y_col)?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |i: usize, name: &str| -> Result<f64, IoError> {
            let raw = record.get(i).unwrap_or("");
            raw.parse::<f64>().map_err(|e| -> IoError {
                format!("row {}: column '{}': cannot parse '{}': {}", row + 1, name, raw, e).into()
            })
        };
        xs.push(field(xi, x_col)?);
        ys.push(field(yi, y_col)?);
    }
    Ok((xs, ys))
}

/// Read two columns from a CSV file.
pub fn read_columns_file(
    path: &Path,
    x_col: &str,
    y_col: &str,
) -> Result<(Vec<f64>, Vec<f64>), IoError> {
    let file = std::fs::File::open(path)
        .map_err(|e| -> IoError { format!("failed to open {}: {}", path.display(), e).into() })?;
    read_columns(file, x_col, y_col)
}

/// Write points as a two-column `x,y` CSV.
pub fn write_points<W: Write>(writer: W, points: &[[f64; 2]]) -> Result<(), IoError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["x", "y"])?;
    for &[x, y] in points {
        wtr.write_record([x.to_string(), y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write points to a CSV file.
pub fn write_points_file(path: &Path, points: &[[f64; 2]]) -> Result<(), IoError> {
    let file = std::fs::File::create(path)?;
    write_points(file, points)
}
