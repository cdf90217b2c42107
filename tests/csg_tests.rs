mod support;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use tpmsgen::{
    BooleanKernel, BooleanOp, BspKernel, Mesh,
    errors::TpmsError,
    float_types::Real,
    mesh::{
        bsp::Node,
        holes::{detect_holes, fill_holes},
        plane::Plane,
        shapes::cuboid,
        tjunction::split_t_junctions,
    },
};

use crate::support::{approx_eq, bounding_box, make_polygon_3d};

const EPSILON: Real = 1e-9;

// --------------------------------------------------------
//   Planes and polygons
// --------------------------------------------------------

#[test]
fn plane_flip() {
    let mut plane = Plane::from_normal(Vector3::y(), &Point3::new(0.0, 2.0, 0.0)).unwrap();
    plane.flip();
    assert_eq!(plane.normal(), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(plane.offset(), -2.0);
}

#[test]
fn plane_split_polygon() {
    // Define a plane that splits the XY plane at y=0
    let plane = Plane::from_normal(Vector3::y(), &Point3::origin()).unwrap();

    // A polygon that crosses y=0 line: a square from ( -1, -1 ) to (1, 1 )
    let poly = make_polygon_3d(&[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ]);

    let (cf, cb, f, b) = plane.split_polygon(&poly);
    assert_eq!(cf.len(), 0);
    assert_eq!(cb.len(), 0);
    assert_eq!(f.len(), 1);
    assert_eq!(b.len(), 1);

    for v in &f[0].vertices {
        assert!(v.pos.y >= -EPSILON);
    }
    for v in &b[0].vertices {
        assert!(v.pos.y <= EPSILON);
    }
}

#[test]
fn polygon_plane_follows_winding() {
    let mut poly = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    assert!(approx_eq(poly.plane.normal().z, 1.0, EPSILON));
    poly.flip();
    assert!(approx_eq(poly.plane.normal().z, -1.0, EPSILON));
    assert_eq!(poly.vertices.len(), 3);
}

#[test]
fn polygon_triangulate_quad() {
    let poly = make_polygon_3d(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);
    let tris = poly.triangulate();
    assert_eq!(tris.len(), 2);
    for tri in &tris {
        let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
        assert!(n.z > 0.0);
    }
}

// --------------------------------------------------------
//   BSP nodes
// --------------------------------------------------------

#[test]
fn node_new_and_build() {
    let p = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let node = Node::from_polygons(&[p]);
    assert!(node.plane.is_some());
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.is_none());
    assert!(node.back.is_none());
}

#[test]
fn node_invert() {
    let p = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let mut node = Node::from_polygons(&[p]);
    let original_normal = node.plane.as_ref().unwrap().normal();
    node.invert();
    let flipped_normal = node.plane.as_ref().unwrap().normal();
    assert!(approx_eq(flipped_normal.z, -original_normal.z, EPSILON));
    assert_eq!(node.polygons.len(), 1);
    node.invert();
    assert!(approx_eq(node.plane.as_ref().unwrap().normal().z, original_normal.z, EPSILON));
}

#[test]
fn node_clip_polygons_drops_the_inside() {
    let mut node = Node::new();
    node.build(&[
        make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        make_polygon_3d(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]),
    ]);

    // crosses z = 0 and z = 1
    let crossing = make_polygon_3d(&[[-1.0, -1.0, -0.5], [2.0, -1.0, 1.5], [-1.0, 2.0, 1.5]]);
    let clipped = node.clip_polygons(&[crossing]);
    assert!(!clipped.is_empty());
    // whatever the split order, the part behind both planes is inside
    for poly in &clipped {
        for v in &poly.vertices {
            assert!(v.pos.z >= -EPSILON, "kept a vertex below z = 0: {:?}", v.pos);
        }
    }
}

#[test]
fn node_clip_to_keeps_coplanar_polygon() {
    let small = make_polygon_3d(&[[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]]);
    let big = make_polygon_3d(&[
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ]);
    let mut node_a = Node::from_polygons(&[small]);
    let node_b = Node::from_polygons(&[big]);
    node_a.clip_to(&node_b);
    assert_eq!(node_a.all_polygons().len(), 1);
}

#[test]
fn node_all_polygons() {
    let poly1 = make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let poly2 = make_polygon_3d(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
    let node = Node::from_polygons(&[poly1, poly2]);
    assert_eq!(node.all_polygons().len(), 2);
}

// --------------------------------------------------------
//   Kernel
// --------------------------------------------------------

fn shifted_box(size: Real, offset: Vector3<Real>) -> Mesh {
    let mut mesh = cuboid(&Vector3::repeat(size));
    mesh.translate(&offset);
    mesh
}

#[test]
fn cuboid_is_closed_and_outward() {
    let cube = cuboid(&Vector3::new(1.0, 2.0, 3.0));
    assert!(cube.is_watertight());
    assert!(approx_eq(cube.signed_volume(), 6.0, 1e-12));
    assert_eq!(bounding_box(&cube), [-0.5, -1.0, -1.5, 0.5, 1.0, 1.5]);
}

#[test]
fn intersection_of_offset_boxes_is_closed() {
    let a = cuboid(&Vector3::repeat(2.0));
    let b = shifted_box(2.0, Vector3::new(0.7, 0.4, 0.3));
    let result = BspKernel::new().intersection(&a, &b).unwrap();

    let bb = bounding_box(&result);
    let expected = [-0.3, -0.6, -0.7, 1.0, 1.0, 1.0];
    for (got, want) in bb.iter().zip(expected) {
        assert!(approx_eq(*got, want, 1e-9), "{bb:?}");
    }
    assert_relative_eq!(result.signed_volume(), 1.3 * 1.6 * 1.7, epsilon = 1e-9);
    assert!(result.is_watertight());
}

#[test]
fn difference_carves_a_corner() {
    let a = cuboid(&Vector3::repeat(2.0));
    let b = shifted_box(2.0, Vector3::new(1.1, 1.2, 1.3));
    let result = BspKernel::new().difference(&a, &b).unwrap();
    let removed = 0.9 * 0.8 * 0.7;
    assert_relative_eq!(result.signed_volume(), 8.0 - removed, epsilon = 1e-9);
    assert!(result.is_watertight());
}

#[test]
fn skeletal_frame_removes_the_outside_of_a_mesh() {
    // a box poking out of the design box on +x, trimmed by the hollow frame
    let kernel = BspKernel::new();
    let size = Vector3::repeat(4.0);
    let frame = kernel.difference(&cuboid(&(size * 2.0)), &cuboid(&size)).unwrap();
    let lattice = shifted_box(2.0, Vector3::new(1.7, 0.1, -0.2));

    let trimmed = kernel.apply(BooleanOp::Difference, &lattice, &frame).unwrap();
    let bb = bounding_box(&trimmed);
    assert!(approx_eq(bb[3], 2.0, 1e-9), "{bb:?}");
    assert_relative_eq!(trimmed.signed_volume(), 1.3 * 2.0 * 2.0, epsilon = 1e-9);
    assert!(trimmed.is_watertight());
}

#[test]
fn disjoint_intersection_is_empty() {
    let a = cuboid(&Vector3::repeat(1.0));
    let b = shifted_box(1.0, Vector3::new(5.0, 0.0, 0.0));
    let result = BspKernel::new().intersection(&a, &b).unwrap();
    assert!(result.is_empty());
    assert!(!result.is_watertight());
}

#[test]
fn kernel_reports_malformed_input() {
    let mut bad = cuboid(&Vector3::repeat(1.0));
    bad.vertices[3] = Point3::new(0.0, Real::INFINITY, 0.0);
    let err = BspKernel::new().fill_holes(&bad).unwrap_err();
    assert!(matches!(err, TpmsError::BooleanKernelFailure { operation: "fill_holes", .. }));

    let mut bad = cuboid(&Vector3::repeat(1.0));
    bad.faces.push([0, 1, 42]);
    let err = BspKernel::new()
        .apply(BooleanOp::Intersection, &bad, &cuboid(&Vector3::repeat(1.0)))
        .unwrap_err();
    assert!(matches!(err, TpmsError::BooleanKernelFailure { operation: "intersection", .. }));
}

// --------------------------------------------------------
//   Watertightness and repair
// --------------------------------------------------------

#[test]
fn open_box_is_detected_and_filled() {
    let mut open = cuboid(&Vector3::repeat(2.0));
    // drop both triangles of one side
    let top: Vec<usize> = open
        .face_normals()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.z > 0.5)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(top.len(), 2);
    open.faces = open
        .faces
        .iter()
        .enumerate()
        .filter(|(i, _)| !top.contains(i))
        .map(|(_, f)| *f)
        .collect();

    let analysis = open.edge_analysis();
    assert_eq!(analysis.boundary_edges, 4);
    assert!(!open.is_watertight());
    assert_eq!(detect_holes(&open.weld()).len(), 1);

    let report = fill_holes(&open, None);
    assert_eq!(report.loops_found, 1);
    assert_eq!(report.loops_filled, 1);
    assert!(report.mesh.is_watertight());
    assert!(approx_eq(report.mesh.signed_volume(), 8.0, 1e-9));

    let via_kernel = BspKernel::new().fill_holes(&open).unwrap();
    assert!(via_kernel.is_watertight());
}

#[test]
fn hole_size_limit_is_respected() {
    let mut open = cuboid(&Vector3::repeat(2.0));
    open.faces.truncate(10);
    let limited = BspKernel::with_max_hole_edges(3).fill_holes(&open).unwrap();
    assert!(!limited.is_watertight());
    let unlimited = BspKernel::new().fill_holes(&open).unwrap();
    assert!(unlimited.is_watertight());
}

#[test]
fn t_junction_repair_leaves_clean_meshes_alone() {
    let mut cube = cuboid(&Vector3::repeat(3.0));
    assert_eq!(split_t_junctions(&mut cube, 1e-5), 0);
    assert_eq!(cube.face_count(), 12);
}

#[test]
fn duplicated_vertices_still_count_as_closed() {
    // unweld every face: each triangle gets its own three vertices
    let cube = cuboid(&Vector3::repeat(1.0));
    let mut soup = Mesh::new();
    for face in &cube.faces {
        let base = soup.vertices.len();
        soup.vertices.extend(face.iter().map(|&i| cube.vertices[i]));
        soup.faces.push([base, base + 1, base + 2]);
    }
    assert_eq!(soup.vertex_count(), 36);
    assert!(soup.is_watertight());
}
