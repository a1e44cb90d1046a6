use std::path::Path;

use log::debug;

use super::error::{AnalysisError, Result};
use super::model::{Interferogram, ReferenceSpectrum};

// ---------------------------------------------------------------------------
// Table layout
// ---------------------------------------------------------------------------

/// Header lines written by the interferometer acquisition software.
pub const DEFAULT_HEADER_LINES: usize = 18;
/// Trailing summary line written by the acquisition software.
pub const DEFAULT_FOOTER_LINES: usize = 1;

/// Where the data sits inside a whitespace-delimited text export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Lines dropped from the top of the file.
    pub header_lines: usize,
    /// Lines dropped from the bottom of the file.
    pub footer_lines: usize,
    /// Column read as the x axis.
    pub position_column: usize,
    /// Column read as the y axis.
    pub signal_column: usize,
}

impl TableLayout {
    /// Interferometer export: index, displacement (µm), voltage (mV).
    pub const INTERFEROGRAM: TableLayout = TableLayout {
        header_lines: DEFAULT_HEADER_LINES,
        footer_lines: DEFAULT_FOOTER_LINES,
        position_column: 1,
        signal_column: 2,
    };

    /// Spectrometer export: wavelength (nm), intensity. No header or footer.
    pub const REFERENCE: TableLayout = TableLayout {
        header_lines: 0,
        footer_lines: 0,
        position_column: 0,
        signal_column: 1,
    };

    /// Same columns as `self` with different trimming margins.
    pub fn with_margins(self, header_lines: usize, footer_lines: usize) -> Self {
        Self {
            header_lines,
            footer_lines,
            ..self
        }
    }

    /// Minimum number of fields a data row must have.
    pub fn min_columns(&self) -> usize {
        self.position_column.max(self.signal_column) + 1
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::INTERFEROGRAM
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an interferogram export from disk.
pub fn load_interferogram(path: &Path, layout: &TableLayout) -> Result<Interferogram> {
    let text = read_text(path)?;
    let (positions, signals) = parse_columns(&text, layout)?;
    debug!("{}: {} samples after trimming", path.display(), positions.len());
    Interferogram::new(positions, signals)
}

/// Load a reference spectrometer export from disk.
pub fn load_reference(path: &Path, layout: &TableLayout) -> Result<ReferenceSpectrum> {
    let text = read_text(path)?;
    let (wavelengths_nm, intensities) = parse_columns(&text, layout)?;
    Ok(ReferenceSpectrum {
        wavelengths_nm,
        intensities,
    })
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| AnalysisError::from_io(path.to_path_buf(), e))
}

// ---------------------------------------------------------------------------
// Table parser
// ---------------------------------------------------------------------------

/// Split `text` into the two columns selected by `layout`.
///
/// The header is cut by raw line count. Blank lines are then discarded and
/// the footer is taken off the remaining rows, so trailing newlines after
/// the footer do not shift it into the data. Any row with too few fields or
/// a non-numeric field rejects the whole table, as does ending up with
/// fewer than two rows.
pub fn parse_columns(text: &str, layout: &TableLayout) -> Result<(Vec<f64>, Vec<f64>)> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < layout.header_lines {
        return Err(AnalysisError::Parse(format!(
            "{} lines, fewer than the {} header lines",
            lines.len(),
            layout.header_lines
        )));
    }

    // (1-based line number, content) of every non-blank line after the header
    let rows: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .skip(layout.header_lines)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, *line))
        .collect();
    if rows.len() < layout.footer_lines {
        return Err(AnalysisError::Parse(format!(
            "{} rows after the header, fewer than the {} footer lines",
            rows.len(),
            layout.footer_lines
        )));
    }
    let body = &rows[..rows.len() - layout.footer_lines];

    let min_columns = layout.min_columns();
    let mut xs = Vec::with_capacity(body.len());
    let mut ys = Vec::with_capacity(body.len());

    for &(line_no, line) in body {
        let fields = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| {
                    AnalysisError::Parse(format!("line {line_no}: '{tok}' is not a number"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if fields.len() < min_columns {
            return Err(AnalysisError::Parse(format!(
                "line {line_no}: {} columns, expected at least {min_columns}",
                fields.len()
            )));
        }

        xs.push(fields[layout.position_column]);
        ys.push(fields[layout.signal_column]);
    }

    if xs.len() < 2 {
        return Err(AnalysisError::Parse(format!(
            "{} data rows after trimming, need at least 2",
            xs.len()
        )));
    }

    Ok((xs, ys))
}
