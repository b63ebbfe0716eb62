//! # Geometry
//!
//! Uniform grids for rods (1D), plates (2D) and cuboids (3D).
//!
//! A geometry is a box of physical size `extents` split into `cells` equal
//! control volumes per axis. Cells are numbered with the x index running
//! fastest:
//!
//! ```text
//! i = ix + nx * (iy + ny * iz)
//! ```
//!
//! Faces of the box are named after the compass (x: West/East, y: South/North)
//! and the vertical (z: Bottom/Top). The lower face of every axis is the one at
//! coordinate 0.
use crate::HeatTransfer::heat_error::HeatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Face of the computational box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    West,
    East,
    South,
    North,
    Bottom,
    Top,
}

impl Face {
    /// all faces in storage order
    pub const ALL: [Face; 6] = [
        Face::West,
        Face::East,
        Face::South,
        Face::North,
        Face::Bottom,
        Face::Top,
    ];

    /// axis normal to the face (0 = x, 1 = y, 2 = z)
    pub fn axis(&self) -> usize {
        match self {
            Face::West | Face::East => 0,
            Face::South | Face::North => 1,
            Face::Bottom | Face::Top => 2,
        }
    }

    /// true for the face at the far end of its axis
    pub fn is_upper(&self) -> bool {
        matches!(self, Face::East | Face::North | Face::Top)
    }

    /// slot of the face in fixed-size per-face tables
    pub fn slot(&self) -> usize {
        2 * self.axis() + usize::from(self.is_upper())
    }

    /// face at the given end of the given axis
    pub fn on_axis(axis: usize, upper: bool) -> Option<Face> {
        Face::ALL
            .iter()
            .copied()
            .find(|f| f.axis() == axis && f.is_upper() == upper)
    }

    /// faces that exist for a geometry of the given dimensionality
    pub fn faces_for(dimension: usize) -> &'static [Face] {
        let n = 2 * dimension.min(3);
        &Face::ALL[..n]
    }

    pub fn is_valid_for(&self, dimension: usize) -> bool {
        self.axis() < dimension
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Face::West => "west",
            Face::East => "east",
            Face::South => "south",
            Face::North => "north",
            Face::Bottom => "bottom",
            Face::Top => "top",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Face {
    type Err = HeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "west" => Ok(Face::West),
            "east" => Ok(Face::East),
            "south" => Ok(Face::South),
            "north" => Ok(Face::North),
            "bottom" => Ok(Face::Bottom),
            "top" => Ok(Face::Top),
            _ => Err(HeatError::UnknownFace {
                face: s.to_string(),
                dimension: 0,
            }),
        }
    }
}

/// What lies next to a cell in a given direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    Cell(usize),
    Boundary(Face),
}

/// serialized form of a [`Geometry`]; sampling is always recomputed
#[derive(Serialize, Deserialize)]
struct GeometryShape {
    extents: Vec<f64>,
    cells: Vec<usize>,
}

/// Uniform 1D/2D/3D grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryShape", into = "GeometryShape")]
pub struct Geometry {
    extents: Vec<f64>,
    cells: Vec<usize>,
    sampling: Vec<f64>,
}

impl TryFrom<GeometryShape> for Geometry {
    type Error = HeatError;

    fn try_from(shape: GeometryShape) -> Result<Self, Self::Error> {
        Geometry::new(shape.extents, shape.cells)
    }
}

impl From<Geometry> for GeometryShape {
    fn from(g: Geometry) -> Self {
        GeometryShape {
            extents: g.extents,
            cells: g.cells,
        }
    }
}

impl Geometry {
    /// Creates a grid from physical extents [m] and cell counts per axis.
    ///
    /// # Errors
    /// `InvalidDimension` when the lists differ in length, have more than 3 or no
    /// axes, or when any extent is not a positive finite number or any count is zero.
    pub fn new(extents: Vec<f64>, cells: Vec<usize>) -> Result<Self, HeatError> {
        if extents.is_empty() || extents.len() > 3 || extents.len() != cells.len() {
            return Err(HeatError::InvalidDimension {
                axis: extents.len().min(cells.len()),
                extent: extents.first().copied().unwrap_or(0.0),
                cells: cells.first().copied().unwrap_or(0),
            });
        }
        for (axis, (&extent, &count)) in extents.iter().zip(cells.iter()).enumerate() {
            if !(extent.is_finite() && extent > 0.0) || count == 0 {
                return Err(HeatError::InvalidDimension {
                    axis,
                    extent,
                    cells: count,
                });
            }
        }
        let sampling = extents
            .iter()
            .zip(cells.iter())
            .map(|(e, &n)| e / n as f64)
            .collect();
        Ok(Self {
            extents,
            cells,
            sampling,
        })
    }

    /// rod of given length split into `n` cells
    pub fn rod(length: f64, n: usize) -> Result<Self, HeatError> {
        Self::new(vec![length], vec![n])
    }

    /// plate of size `lx × ly`
    pub fn plate(size: [f64; 2], cells: [usize; 2]) -> Result<Self, HeatError> {
        Self::new(size.to_vec(), cells.to_vec())
    }

    /// cuboid of size `lx × ly × lz`
    pub fn cuboid(size: [f64; 3], cells: [usize; 3]) -> Result<Self, HeatError> {
        Self::new(size.to_vec(), cells.to_vec())
    }

    pub fn dimension(&self) -> usize {
        self.cells.len()
    }

    pub fn extents(&self) -> &[f64] {
        &self.extents
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// number of cells along `axis`
    pub fn cells_on(&self, axis: usize) -> usize {
        self.cells[axis]
    }

    /// cell size along `axis`, extent/count
    pub fn sampling(&self, axis: usize) -> f64 {
        self.sampling[axis]
    }

    pub fn samplings(&self) -> &[f64] {
        &self.sampling
    }

    pub fn cell_count(&self) -> usize {
        self.cells.iter().product()
    }

    /// volume (length in 1D, area in 2D) of one cell
    pub fn cell_volume(&self) -> f64 {
        self.sampling.iter().product()
    }

    /// Canonical linear index of a multi-axis cell coordinate, x fastest.
    pub fn linear_index(&self, coords: &[usize]) -> usize {
        debug_assert_eq!(coords.len(), self.dimension());
        debug_assert!(
            coords.iter().zip(self.cells.iter()).all(|(&c, &n)| c < n),
            "cell coordinates {:?} outside grid {:?}",
            coords,
            self.cells
        );
        coords
            .iter()
            .zip(self.cells.iter())
            .rev()
            .fold(0, |acc, (&c, &n)| acc * n + c)
    }

    /// Inverse of [`Geometry::linear_index`].
    pub fn coordinates(&self, index: usize) -> Vec<usize> {
        let mut rest = index;
        self.cells
            .iter()
            .map(|&n| {
                let c = rest % n;
                rest /= n;
                c
            })
            .collect()
    }

    /// stride of the linear index along `axis`
    pub fn stride(&self, axis: usize) -> usize {
        self.cells[..axis].iter().product()
    }

    /// Neighbour of cell `index` along `axis`; `upper = true` looks towards
    /// increasing coordinate.
    pub fn neighbor(&self, index: usize, axis: usize, upper: bool) -> Neighbor {
        let n = self.cells[axis];
        let c = (index / self.stride(axis)) % n;
        let face = Face::on_axis(axis, upper);
        match (upper, face) {
            (true, Some(f)) if c + 1 == n => Neighbor::Boundary(f),
            (false, Some(f)) if c == 0 => Neighbor::Boundary(f),
            (true, _) => Neighbor::Cell(index + self.stride(axis)),
            (false, _) => Neighbor::Cell(index - self.stride(axis)),
        }
    }

    /// positions of cell centres along `axis`
    pub fn centres(&self, axis: usize) -> Vec<f64> {
        let dx = self.sampling[axis];
        (0..self.cells[axis])
            .map(|i| (i as f64 + 0.5) * dx)
            .collect()
    }

    pub fn faces(&self) -> &'static [Face] {
        Face::faces_for(self.dimension())
    }

    /// `UnknownFace` unless `face` belongs to this geometry
    pub fn check_face(&self, face: Face) -> Result<(), HeatError> {
        if face.is_valid_for(self.dimension()) {
            Ok(())
        } else {
            Err(HeatError::UnknownFace {
                face: face.to_string(),
                dimension: self.dimension(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sampling_is_extent_over_count() {
        let g = Geometry::cuboid([0.3, 0.2, 0.1], [30, 4, 7]).unwrap();
        for axis in 0..3 {
            assert_relative_eq!(
                g.sampling(axis),
                g.extents()[axis] / g.cells()[axis] as f64,
                epsilon = 1e-15
            );
        }
        assert_eq!(g.cell_count(), 30 * 4 * 7);
        assert_relative_eq!(g.cell_volume(), 0.01 * 0.05 * (0.1 / 7.0), epsilon = 1e-15);
    }

    #[test]
    fn rejects_non_positive_input() {
        assert!(matches!(
            Geometry::rod(0.0, 10),
            Err(HeatError::InvalidDimension { axis: 0, .. })
        ));
        assert!(matches!(
            Geometry::plate([0.1, -0.2], [2, 2]),
            Err(HeatError::InvalidDimension { axis: 1, .. })
        ));
        assert!(matches!(
            Geometry::plate([0.1, 0.2], [2, 0]),
            Err(HeatError::InvalidDimension { axis: 1, .. })
        ));
        assert!(Geometry::new(vec![], vec![]).is_err());
        assert!(Geometry::new(vec![1.0; 4], vec![1; 4]).is_err());
        assert!(Geometry::new(vec![1.0, 1.0], vec![1]).is_err());
        assert!(Geometry::rod(f64::NAN, 3).is_err());
    }

    #[test]
    fn linear_index_round_trips() {
        let g = Geometry::cuboid([1.0, 1.0, 1.0], [3, 4, 5]).unwrap();
        for i in 0..g.cell_count() {
            let c = g.coordinates(i);
            assert_eq!(g.linear_index(&c), i);
        }
        assert_eq!(g.linear_index(&[1, 0, 0]), 1);
        assert_eq!(g.linear_index(&[0, 1, 0]), 3);
        assert_eq!(g.linear_index(&[0, 0, 1]), 12);
    }

    #[test]
    fn neighbors_reach_faces_at_edges() {
        let g = Geometry::plate([1.0, 1.0], [3, 2]).unwrap();
        assert_eq!(g.neighbor(0, 0, false), Neighbor::Boundary(Face::West));
        assert_eq!(g.neighbor(0, 0, true), Neighbor::Cell(1));
        assert_eq!(g.neighbor(2, 0, true), Neighbor::Boundary(Face::East));
        assert_eq!(g.neighbor(0, 1, false), Neighbor::Boundary(Face::South));
        assert_eq!(g.neighbor(0, 1, true), Neighbor::Cell(3));
        assert_eq!(g.neighbor(4, 1, true), Neighbor::Boundary(Face::North));
        assert_eq!(g.neighbor(4, 1, false), Neighbor::Cell(1));
    }

    #[test]
    fn faces_depend_on_dimension() {
        assert_eq!(Face::faces_for(1), &[Face::West, Face::East]);
        assert_eq!(Face::faces_for(2).len(), 4);
        assert_eq!(Face::faces_for(3).len(), 6);
        let rod = Geometry::rod(1.0, 4).unwrap();
        assert!(rod.check_face(Face::East).is_ok());
        assert!(matches!(
            rod.check_face(Face::North),
            Err(HeatError::UnknownFace { dimension: 1, .. })
        ));
        for f in Face::ALL {
            assert_eq!(Face::ALL[f.slot()], f);
            assert_eq!(f.to_string().parse::<Face>().unwrap(), f);
        }
        assert_eq!(" TOP ".parse::<Face>().unwrap(), Face::Top);
        assert!("up".parse::<Face>().is_err());
    }

    #[test]
    fn json_goes_through_validation() {
        let g = Geometry::plate([0.2, 0.1], [4, 2]).unwrap();
        let text = serde_json::to_string(&g).unwrap();
        assert!(!text.contains("sampling"));
        let back: Geometry = serde_json::from_str(&text).unwrap();
        assert_eq!(back, g);
        assert_relative_eq!(back.sampling(0), 0.05);
        assert!(serde_json::from_str::<Geometry>(r#"{"extents": [0.2], "cells": [0]}"#).is_err());
        assert!(
            serde_json::from_str::<Geometry>(r#"{"extents": [-1.0, 1.0], "cells": [2, 2]}"#)
                .is_err()
        );
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn out_of_range_coordinate_is_caught() {
        let g = Geometry::plate([1.0, 1.0], [3, 2]).unwrap();
        // x = 3 would alias cell (0, 1)
        g.linear_index(&[3, 0]);
    }

    #[test]
    fn centres_sit_mid_cell() {
        let g = Geometry::rod(1.0, 4).unwrap();
        let c = g.centres(0);
        assert_relative_eq!(c[0], 0.125);
        assert_relative_eq!(c[3], 0.875);
    }
}
