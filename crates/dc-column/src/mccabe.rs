//! McCabe–Thiele diagram points.

use crate::error::{ColumnError, ColumnResult};
use crate::model::DistillationColumn;
use dc_thermo::VaporLiquidEquilibrium;

/// Point sequences for a McCabe–Thiele diagram, as `(x, y)` pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct McCabeThiele {
    /// Equilibrium curve over the liquid grid
    pub equilibrium: Vec<(f64, f64)>,
    /// Staircase through the stage compositions
    pub staircase: Vec<(f64, f64)>,
    /// Operating-line points `(x_{i+1}, y_i)`
    pub operating_line: Vec<(f64, f64)>,
}

/// Build the diagram for `stage_compositions` ordered from the reboiler up.
///
/// Each step runs horizontally from `(x_i, y_i)` to `(x_{i+1}, y_i)` and then
/// vertically to `(x_{i+1}, y_{i+1})`; the staircase ends on the last
/// horizontal run.
pub fn mccabe_thiele(
    column: &DistillationColumn,
    x_grid: &[f64],
    stage_compositions: &[f64],
) -> ColumnResult<McCabeThiele> {
    let vle = column.equilibrium();

    // Grid failures carry a grid index, not a stage
    let curve = vle.vapor_fractions(x_grid).map_err(ColumnError::Equilibrium)?;
    let equilibrium = x_grid.iter().copied().zip(curve).collect();

    let ys = vle.vapor_fractions(stage_compositions)?;
    let mut staircase = Vec::with_capacity(2 * stage_compositions.len());
    let mut operating_line = Vec::with_capacity(stage_compositions.len());
    for (pair, &y) in stage_compositions.windows(2).zip(&ys) {
        staircase.push((pair[0], y));
        staircase.push((pair[1], y));
        operating_line.push((pair[1], y));
    }

    Ok(McCabeThiele {
        equilibrium,
        staircase,
        operating_line,
    })
}

/// Smallest step accepted by `uniform_grid`.
pub const MIN_GRID_STEP: f64 = 1e-6;

/// Liquid grid `0, step, 2*step, ...` closed at exactly 1.
pub fn uniform_grid(step: f64) -> ColumnResult<Vec<f64>> {
    if !(MIN_GRID_STEP..=1.0).contains(&step) {
        return Err(ColumnError::configuration(format!(
            "grid step must be in [{MIN_GRID_STEP}, 1], got {step}"
        )));
    }
    let intervals = (1.0 / step - 1e-9).ceil() as usize;
    let mut grid: Vec<f64> = (0..intervals).map(|i| i as f64 * step).collect();
    grid.push(1.0);
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnConfig;

    fn column() -> DistillationColumn {
        DistillationColumn::new(ColumnConfig::ideal(3, 2, 10.0, 0.5, 5.0, 2.0).unwrap()).unwrap()
    }

    fn y(x: f64) -> f64 {
        2.0 * x / (1.0 + x)
    }

    #[test]
    fn staircase_points() {
        let diagram = mccabe_thiele(&column(), &[0.0, 0.5, 1.0], &[0.2, 0.4, 0.7]).unwrap();

        assert_eq!(diagram.equilibrium.len(), 3);
        assert!((diagram.equilibrium[1].1 - 2.0 / 3.0).abs() < 1e-15);

        let expected = [(0.2, y(0.2)), (0.4, y(0.2)), (0.4, y(0.4)), (0.7, y(0.4))];
        assert_eq!(diagram.staircase.len(), expected.len());
        for (got, want) in diagram.staircase.iter().zip(expected) {
            assert!((got.0 - want.0).abs() < 1e-15 && (got.1 - want.1).abs() < 1e-15);
        }

        assert_eq!(diagram.operating_line.len(), 2);
        assert_eq!(diagram.operating_line[0].0, 0.4);
        assert_eq!(diagram.operating_line[1].0, 0.7);
    }

    #[test]
    fn single_stage_has_no_steps() {
        let diagram = mccabe_thiele(&column(), &[], &[0.3]).unwrap();
        assert!(diagram.staircase.is_empty());
        assert!(diagram.operating_line.is_empty());
        assert!(diagram.equilibrium.is_empty());
    }

    #[test]
    fn grid_closes_at_one() {
        let grid = uniform_grid(0.01).unwrap();
        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[100], 1.0);

        let coarse = uniform_grid(0.3).unwrap();
        assert_eq!(coarse.len(), 5);
        assert_eq!(coarse[4], 1.0);

        assert!(uniform_grid(0.0).is_err());
        assert!(uniform_grid(1.5).is_err());
        assert!(uniform_grid(f64::NAN).is_err());
        assert!(matches!(
            uniform_grid(1e-12),
            Err(ColumnError::Configuration { .. })
        ));
        assert!(uniform_grid(MIN_GRID_STEP).is_ok());
    }
}
