//! Time series of temperature fields produced by the integrators, with the slicing and
//! export helpers used for heat maps and reports.
use crate::HeatTransfer::geometry::Geometry;
use crate::HeatTransfer::heat_error::HeatError;
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Table, row};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Recorded solution: `t[k]` is the time of row `k` of `y`, columns are cells.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatSolution {
    pub t: DVector<f64>,
    pub y: DMatrix<f64>,
}

impl HeatSolution {
    pub fn new(t: DVector<f64>, y: DMatrix<f64>) -> Self {
        Self { t, y }
    }

    /// Builds a solution from row-wise recorded states.
    pub fn from_records(times: Vec<f64>, states: &[Vec<f64>]) -> Self {
        let cells = states.first().map_or(0, |s| s.len());
        let y = DMatrix::from_fn(states.len(), cells, |r, c| states[r][c]);
        Self {
            t: DVector::from_vec(times),
            y,
        }
    }

    /// number of recorded time points
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// field at record `k`, `None` past the last record
    pub fn state_at(&self, k: usize) -> Option<DVector<f64>> {
        (k < self.y.nrows()).then(|| self.y.row(k).transpose())
    }

    pub fn final_state(&self) -> Option<DVector<f64>> {
        self.len().checked_sub(1).and_then(|k| self.state_at(k))
    }

    pub fn final_time(&self) -> Option<f64> {
        self.t.iter().last().copied()
    }

    /// Temperature field at record `k` laid out for a heat map: entry `(ix, iy)`.
    /// Rods give a single column, cuboids the horizontal layer `layer`.
    pub fn field_2d(
        &self,
        geometry: &Geometry,
        k: usize,
        layer: usize,
    ) -> Result<DMatrix<f64>, HeatError> {
        if self.y.ncols() != geometry.cell_count() {
            return Err(HeatError::StateSizeMismatch {
                expected: geometry.cell_count(),
                found: self.y.ncols(),
            });
        }
        let nx = geometry.cells_on(0);
        let ny = if geometry.dimension() > 1 {
            geometry.cells_on(1)
        } else {
            1
        };
        let nz = if geometry.dimension() > 2 {
            geometry.cells_on(2)
        } else {
            1
        };
        if k >= self.len() || k >= self.y.nrows() {
            return Err(HeatError::StateSizeMismatch {
                expected: self.len(),
                found: k + 1,
            });
        }
        if layer >= nz {
            return Err(HeatError::InvalidDimension {
                axis: 2,
                extent: layer as f64,
                cells: nz,
            });
        }
        let offset = layer * nx * ny;
        Ok(DMatrix::from_fn(nx, ny, |ix, iy| {
            self.y[(k, offset + ix + nx * iy)]
        }))
    }

    /// Writes `t,T0,T1,...` rows as CSV.
    pub fn save_csv(&self, path: &str) -> Result<(), HeatError> {
        let mut w = BufWriter::new(File::create(path)?);
        let header: Vec<String> = std::iter::once("t".to_string())
            .chain((0..self.y.ncols()).map(|i| format!("T{}", i)))
            .collect();
        writeln!(w, "{}", header.join(","))?;
        for (k, t) in self.t.iter().enumerate() {
            let row: Vec<String> = std::iter::once(format!("{}", t))
                .chain(self.y.row(k).iter().map(|v| format!("{}", v)))
                .collect();
            writeln!(w, "{}", row.join(","))?;
        }
        w.flush()?;
        info!("solution with {} records saved to {}", self.len(), path);
        Ok(())
    }

    /// min/mean/max temperature at up to `rows` evenly spaced records
    pub fn summary_table(&self, rows: usize) -> Table {
        let mut table = Table::new();
        table.add_row(row!["t, s", "T min, K", "T mean, K", "T max, K"]);
        if self.is_empty() {
            return table;
        }
        let n = self.len();
        let rows = rows.clamp(1, n);
        let mut picked: Vec<usize> = (0..rows)
            .map(|r| if rows == 1 { n - 1 } else { r * (n - 1) / (rows - 1) })
            .collect();
        picked.dedup();
        for k in picked {
            let state = self.y.row(k);
            table.add_row(row![
                format!("{:.3}", self.t[k]),
                format!("{:.2}", state.min()),
                format!("{:.2}", state.mean()),
                format!("{:.2}", state.max())
            ]);
        }
        table
    }

    pub fn print_summary(&self, rows: usize) {
        self.summary_table(rows).printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    fn sample() -> HeatSolution {
        HeatSolution::from_records(
            vec![0.0, 1.0, 2.0],
            &[
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
                vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
                vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            ],
        )
    }

    #[test]
    fn records_become_rows() {
        let s = sample();
        assert_eq!(s.len(), 3);
        assert_eq!(s.y.shape(), (3, 6));
        assert_eq!(s.final_state().unwrap()[5], 8.0);
        assert_eq!(s.final_time(), Some(2.0));
        assert_relative_eq!(s.state_at(1).unwrap()[0], 2.0);
        assert!(s.state_at(3).is_none());
    }

    #[test]
    fn plate_field_is_indexed_by_x_then_y() {
        let s = sample();
        let plate = Geometry::plate([1.0, 1.0], [3, 2]).unwrap();
        let f = s.field_2d(&plate, 0, 0).unwrap();
        assert_eq!(f.shape(), (3, 2));
        assert_eq!(f[(0, 0)], 1.0);
        assert_eq!(f[(2, 0)], 3.0);
        assert_eq!(f[(0, 1)], 4.0);
        assert!(s.field_2d(&plate, 0, 1).is_err());
        assert!(matches!(
            s.field_2d(&plate, 3, 0),
            Err(HeatError::StateSizeMismatch { .. })
        ));

        let cuboid = Geometry::cuboid([1.0; 3], [1, 2, 3]).unwrap();
        let layer = s.field_2d(&cuboid, 2, 2).unwrap();
        assert_eq!(layer.shape(), (1, 2));
        assert_eq!(layer[(0, 1)], 8.0);

        let wrong = Geometry::rod(1.0, 4).unwrap();
        assert!(s.field_2d(&wrong, 0, 0).is_err());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let s = sample();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        s.save_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "t,T0,T1,T2,T3,T4,T5");
        assert!(lines[3].starts_with("2,3,4"));
    }

    #[test]
    fn summary_picks_first_and_last() {
        let table = sample().summary_table(2);
        // header + two records
        assert_eq!(table.len(), 3);
    }
}
