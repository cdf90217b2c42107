mod support;

use tpmsgen::{
    FieldEvaluator, GridBuilder, IsosurfaceExtractor, MarchingCubes, MeshStrategy, NormalOrientation,
    TpmsVariant,
    lattice::{build_shell, build_skeletal},
    preview::preview,
};

use crate::support::{approx_eq, small_shell, small_skeletal};

#[test]
fn shell_vertex_count_is_the_sum_of_both_walls() {
    for variant in [
        TpmsVariant::Gyroid,
        TpmsVariant::Diamond,
        TpmsVariant::Lidinoid,
        TpmsVariant::SplitP,
        TpmsVariant::Schwarz,
    ] {
        let params = small_shell(variant);
        let grid = GridBuilder::new(&params).build(1);
        let field = FieldEvaluator::new(&params).evaluate(&grid);
        let level = params.shell_level();

        let outer = MarchingCubes.extract_centred(&field, level, &grid);
        let inner = MarchingCubes.extract_centred(&field, -level, &grid);
        let shell = build_shell(&MarchingCubes, &field, &grid, level);

        assert_eq!(
            shell.mesh.vertex_count(),
            outer.vertex_count() + inner.vertex_count(),
            "{variant}"
        );
        assert_eq!(shell.mesh.face_count(), outer.face_count() + inner.face_count());
        assert_eq!(shell.vertices, shell.mesh.vertices);
    }
}

#[test]
fn shell_inner_wall_is_exactly_inverted() {
    let params = small_shell(TpmsVariant::Gyroid);
    let grid = GridBuilder::new(&params).build(0);
    let field = FieldEvaluator::new(&params).evaluate(&grid);
    let level = params.shell_level();
    assert!(approx_eq(level, 0.125, 1e-15));

    let inner = MarchingCubes.extract_centred(&field, -level, &grid);
    let shell = build_shell(&MarchingCubes, &field, &grid, level);
    let offset = shell.positive_vertex_count;

    let normals = shell.mesh.normals.as_ref().unwrap();
    for (i, n) in inner.normals.as_ref().unwrap().iter().enumerate() {
        assert_eq!(normals[offset + i], -n);
    }
    let inner_faces = &shell.mesh.faces[shell.mesh.face_count() - inner.face_count()..];
    for (flipped, original) in inner_faces.iter().zip(&inner.faces) {
        assert_eq!(*flipped, [original[0] + offset, original[2] + offset, original[1] + offset]);
    }
}

#[test]
fn skeletal_mesh_is_the_zero_level_set_unflipped() {
    let params = small_skeletal(TpmsVariant::BodyDiagonalsWithNodes);
    let grid = GridBuilder::new(&params).build(1);
    let field = FieldEvaluator::new(&params).evaluate(&grid);

    let direct = MarchingCubes.extract_centred(&field, 0.0, &grid);
    let built = build_skeletal(&MarchingCubes, &field, &grid);
    assert_eq!(built, direct);

    let via_strategy = MeshStrategy::for_design(&params).build_mesh(&MarchingCubes, &field, &grid);
    assert_eq!(via_strategy, direct);
}

#[test]
fn wall_level_scales_with_thickness_and_design() {
    let thin = small_shell(TpmsVariant::Lidinoid).with_thickness(1.0);
    let thick = small_shell(TpmsVariant::Lidinoid).with_thickness(3.0);
    assert!(approx_eq(thin.shell_level(), 0.37, 1e-15));
    assert!(approx_eq(thick.shell_level(), 1.11, 1e-12));

    match MeshStrategy::for_design(&thick) {
        MeshStrategy::Shell { level } => assert_eq!(level, thick.shell_level()),
        MeshStrategy::Skeletal => panic!("shell design meshed as skeletal"),
    }
}

#[test]
fn preview_carries_the_raw_vertex_cloud() {
    let params = small_shell(TpmsVariant::Diamond);
    let preview = preview(&params, NormalOrientation::default()).unwrap();

    let grid = GridBuilder::new(&params).build(0);
    let field = FieldEvaluator::new(&params).evaluate(&grid);
    let shell = build_shell(&MarchingCubes, &field, &grid, params.shell_level());

    assert_eq!(preview.vertices, shell.vertices);
    assert_eq!(preview.mesh, shell.mesh);
    assert!(preview.colors.iter().zip(&preview.vertices).all(|(c, p)| *c == p.x * p.y * p.z));
}
