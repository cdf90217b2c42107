mod support;

use nalgebra::Vector3;
use tpmsgen::{DesignParameters, GridBuilder, TpmsVariant, grid::linspace};

use crate::support::approx_eq;

fn design() -> DesignParameters {
    DesignParameters::shell(TpmsVariant::Gyroid)
        .with_bounding_box(Vector3::new(40.0, 30.0, 20.0))
        .with_unit_cell(Vector3::new(10.0, 15.0, 8.0))
        .with_resolution(20)
}

#[test]
fn unpadded_grid_has_one_sample_per_voxel_corner() {
    let params = design();
    let grid = GridBuilder::new(&params).build(0);
    // floor(40/10)·20 + 1, floor(30/15)·20 + 1, floor(20/8)·20 + 1
    assert_eq!(grid.dims(), [81, 41, 41]);
    assert_eq!(grid.tolerances, Vector3::zeros());
    assert_eq!(grid.half_extent, Vector3::new(20.0, 15.0, 10.0));
    assert_eq!(grid.sample_count(), 81 * 41 * 41);
}

#[test]
fn padding_adds_two_samples_per_step() {
    let params = design();
    let builder = GridBuilder::new(&params);
    let grid = builder.build(3);
    assert_eq!(grid.dims(), [87, 47, 47]);
    assert!(approx_eq(grid.tolerances.x, 3.0 * 10.0 / 20.0, 1e-12));
    assert!(approx_eq(grid.tolerances.y, 3.0 * 15.0 / 20.0, 1e-12));
    assert!(approx_eq(grid.tolerances.z, 3.0 * 8.0 / 20.0, 1e-12));

    let (lo, hi) = grid.padded_extent();
    assert!(approx_eq(lo.x, -21.5, 1e-12));
    assert!(approx_eq(hi.y, 17.25, 1e-12));
    assert_eq!(grid.axes[0][0], lo.x);
    assert_eq!(*grid.axes[0].last().unwrap(), hi.x);
}

#[test]
fn extents_and_counts_grow_with_k() {
    let params = design();
    let builder = GridBuilder::new(&params);
    let mut previous = builder.build(0);
    for k in 1..=9 {
        let grid = builder.build(k);
        for axis in 0..3 {
            assert!(grid.half_extent[axis] >= previous.half_extent[axis]);
            assert!(grid.dims()[axis] > previous.dims()[axis]);
        }
        previous = grid;
    }
}

#[test]
fn spacing_is_the_first_step() {
    let params = design();
    let grid = GridBuilder::new(&params).build(2);
    for axis in 0..3 {
        let expected = grid.axes[axis][1] - grid.axes[axis][0];
        assert_eq!(grid.spacing[axis], expected);
    }
    // where the box holds whole cells, padding keeps the voxel size
    for axis in 0..2 {
        let voxel = params.unit_cell_size[axis] / 20.0;
        assert!(approx_eq(grid.spacing[axis], voxel, 1e-9));
    }
}

#[test]
fn partial_cells_are_dropped_from_the_sample_count() {
    // 25 / 10 leaves half a cell, which is not sampled at its own resolution
    let params = DesignParameters::shell(TpmsVariant::Diamond)
        .with_bounding_box(Vector3::new(25.0, 10.0, 10.0))
        .with_unit_cell(Vector3::repeat(10.0))
        .with_resolution(20);
    let grid = GridBuilder::new(&params).build(0);
    assert_eq!(grid.dims()[0], 41);
    assert!(approx_eq(grid.spacing.x, 25.0 / 40.0, 1e-12));
}

#[test]
fn coordinate_grid_is_x_fastest() {
    let params = DesignParameters::shell(TpmsVariant::Gyroid)
        .with_bounding_box(Vector3::repeat(10.0))
        .with_unit_cell(Vector3::repeat(10.0))
        .with_resolution(20);
    let grid = GridBuilder::new(&params).build(0);
    let [xs, ys, zs] = grid.coordinate_grid();
    assert_eq!(xs.len(), grid.sample_count());
    assert_eq!(xs[1], grid.axes[0][1]);
    assert_eq!(ys[1], grid.axes[1][0]);
    assert_eq!(ys[21], grid.axes[1][1]);
    assert_eq!(zs[21 * 21], grid.axes[2][1]);
}

#[test]
fn linspace_pins_both_ends() {
    let values = linspace(-1.3, 2.9, 7);
    assert_eq!(values.len(), 7);
    assert_eq!(values[0], -1.3);
    assert_eq!(values[6], 2.9);
    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(4.0, 5.0, 1), vec![4.0]);
}
