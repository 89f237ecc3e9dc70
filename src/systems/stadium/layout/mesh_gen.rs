use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::config::{ROOF_TEXTURE_CELLS, ROOF_TEXTURE_SIZE};
use super::utils::{ellipse_points, quadratic_bezier, quadratic_bezier_tangent};
use super::Shape;

// world units covered by one repeat of the roof grid texture
const ROOF_TEXTURE_SPAN: f32 = 40.0;

#[derive(Default)]
struct MeshBuffers {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    fn vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv.to_array());
        idx
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend([a, b, c]);
    }

    fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

/// Builds the render mesh for a layout shape, in the node's local space.
pub fn shape_to_mesh(shape: &Shape) -> Mesh {
    match shape {
        Shape::Cuboid { size } => Mesh::from(Cuboid::new(size.x, size.y, size.z)),
        Shape::Plane { size } => Mesh::from(Plane3d::new(Vec3::Y, *size / 2.0)),
        Shape::Disc { radius_x, radius_z, segments } => disc(*radius_x, *radius_z, *segments),
        Shape::Cylinder { radius_top, radius_bottom, height, segments } => {
            frustum(*radius_top, *radius_bottom, *height, *segments)
        }
        Shape::Ribbon { points, width } => ribbon(points, *width),
        Shape::Wedge { inner_radius, outer_radius, height, start_angle, sweep, segments } => {
            wedge(*inner_radius, *outer_radius, *height, *start_angle, *sweep, *segments)
        }
        Shape::AnnularSlab { outer, hole, thickness } => annular_slab(*outer, *hole, *thickness),
        Shape::Tube { curve, radius, segments, radial_segments } => tube(curve, *radius, *segments, *radial_segments),
    }
}

// flat ellipse, fanned from the centre
fn disc(radius_x: f32, radius_z: f32, segments: usize) -> Mesh {
    let mut buffers = MeshBuffers::default();
    let outline = ellipse_points(radius_x, radius_z, segments.max(3));

    let center = buffers.vertex(Vec3::ZERO, Vec3::Y, Vec2::splat(0.5));
    for p in &outline {
        let uv = Vec2::new(p.x / (2.0 * radius_x) + 0.5, p.y / (2.0 * radius_z) + 0.5);
        buffers.vertex(Vec3::new(p.x, 0.0, p.y), Vec3::Y, uv);
    }
    for i in 0..outline.len() {
        let next = (i + 1) % outline.len();
        // counter-clockwise seen from above
        buffers.triangle(center, center + 1 + next as u32, center + 1 + i as u32);
    }
    buffers.into_mesh()
}

// cylinder with independent top and bottom radii, centred on its mid height
fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: usize) -> Mesh {
    let mut buffers = MeshBuffers::default();
    let segments = segments.max(3);
    let half = height / 2.0;
    let slope = if height > 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };

    // sides
    for i in 0..=segments {
        let angle = std::f32::consts::TAU * i as f32 / segments as f32;
        let (sin, cos) = angle.sin_cos();
        let normal = Vec3::new(cos, slope, sin).normalize();
        let u = i as f32 / segments as f32;
        buffers.vertex(Vec3::new(cos * radius_bottom, -half, sin * radius_bottom), normal, Vec2::new(u, 1.0));
        buffers.vertex(Vec3::new(cos * radius_top, half, sin * radius_top), normal, Vec2::new(u, 0.0));
    }
    for i in 0..segments as u32 {
        let (b, t) = (i * 2, i * 2 + 1);
        let (b_next, t_next) = (b + 2, t + 2);
        buffers.triangle(b, t, b_next);
        buffers.triangle(b_next, t, t_next);
    }

    // caps
    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        let center = buffers.vertex(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5));
        for i in 0..segments {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            let (sin, cos) = angle.sin_cos();
            buffers.vertex(
                Vec3::new(cos * radius, y, sin * radius),
                normal,
                Vec2::new(cos * 0.5 + 0.5, sin * 0.5 + 0.5),
            );
        }
        for i in 0..segments as u32 {
            let cur = center + 1 + i;
            let next = center + 1 + (i + 1) % segments as u32;
            if normal.y > 0.0 {
                buffers.triangle(center, next, cur);
            } else {
                buffers.triangle(center, cur, next);
            }
        }
    }

    buffers.into_mesh()
}

// polyline widened into a flat strip, one quad per segment
fn ribbon(points: &[Vec3], width: f32) -> Mesh {
    let mut buffers = MeshBuffers::default();
    let half = width / 2.0;
    let mut along = 0.0;

    for pair in points.windows(2) {
        let delta = pair[1] - pair[0];
        let length = delta.length();
        if length <= f32::EPSILON {
            continue;
        }
        let dir = delta / length;
        let perp = Vec3::new(-dir.z, 0.0, dir.x) * half;
        // overlap by half the width so corners close up
        let start = pair[0] - dir * half;
        let end = pair[1] + dir * half;

        let base = buffers.vertex(start + perp, Vec3::Y, Vec2::new(along, 0.0));
        buffers.vertex(start - perp, Vec3::Y, Vec2::new(along, 1.0));
        buffers.vertex(end + perp, Vec3::Y, Vec2::new(along + length, 0.0));
        buffers.vertex(end - perp, Vec3::Y, Vec2::new(along + length, 1.0));
        buffers.triangle(base, base + 2, base + 1);
        buffers.triangle(base + 1, base + 2, base + 3);
        along += length;
    }
    buffers.into_mesh()
}

// annular sector prism, the curved seating block of a bowl corner
fn wedge(inner: f32, outer: f32, height: f32, start: f32, sweep: f32, segments: usize) -> Mesh {
    let mut buffers = MeshBuffers::default();
    let segments = segments.max(1);
    let angle = |i: usize| start + sweep * i as f32 / segments as f32;
    let dir = |i: usize| {
        let (sin, cos) = angle(i).sin_cos();
        Vec3::new(cos, 0.0, sin)
    };

    // top and bottom
    for (y, normal) in [(height, Vec3::Y), (0.0, Vec3::NEG_Y)] {
        let base = buffers.positions.len() as u32;
        for i in 0..=segments {
            let d = dir(i);
            let u = i as f32 / segments as f32;
            buffers.vertex(d * inner + Vec3::Y * y, normal, Vec2::new(u, 0.0));
            buffers.vertex(d * outer + Vec3::Y * y, normal, Vec2::new(u, 1.0));
        }
        for i in 0..segments as u32 {
            let (in_i, out_i) = (base + i * 2, base + i * 2 + 1);
            let (in_n, out_n) = (in_i + 2, out_i + 2);
            if normal.y > 0.0 {
                buffers.triangle(in_i, out_n, out_i);
                buffers.triangle(in_i, in_n, out_n);
            } else {
                buffers.triangle(in_i, out_i, out_n);
                buffers.triangle(in_i, out_n, in_n);
            }
        }
    }

    // curved walls, the outer one facing out and the inner one facing the corner
    for (radius, outward) in [(outer, true), (inner, false)] {
        let base = buffers.positions.len() as u32;
        for i in 0..=segments {
            let d = dir(i);
            let normal = if outward { d } else { -d };
            let u = i as f32 / segments as f32;
            buffers.vertex(d * radius, normal, Vec2::new(u, 1.0));
            buffers.vertex(d * radius + Vec3::Y * height, normal, Vec2::new(u, 0.0));
        }
        for i in 0..segments as u32 {
            let (b, t) = (base + i * 2, base + i * 2 + 1);
            let (b_next, t_next) = (b + 2, t + 2);
            if outward {
                buffers.triangle(b, t, b_next);
                buffers.triangle(b_next, t, t_next);
            } else {
                buffers.triangle(b, b_next, t);
                buffers.triangle(b_next, t_next, t);
            }
        }
    }

    // flat end caps
    for (i, flip) in [(0, false), (segments, true)] {
        let d = dir(i);
        let tangent = Vec3::new(-d.z, 0.0, d.x);
        let normal = if flip { tangent } else { -tangent };
        let ib = buffers.vertex(d * inner, normal, Vec2::new(0.0, 1.0));
        let it = buffers.vertex(d * inner + Vec3::Y * height, normal, Vec2::new(0.0, 0.0));
        let ob = buffers.vertex(d * outer, normal, Vec2::new(1.0, 1.0));
        let ot = buffers.vertex(d * outer + Vec3::Y * height, normal, Vec2::new(1.0, 0.0));
        if flip {
            buffers.triangle(ib, ob, it);
            buffers.triangle(ob, ot, it);
        } else {
            buffers.triangle(ib, it, ob);
            buffers.triangle(ob, it, ot);
        }
    }

    buffers.into_mesh()
}

// rectangle with a rectangular hole, centred on its mid thickness
fn annular_slab(outer: Vec2, hole: Vec2, thickness: f32) -> Mesh {
    let mut buffers = MeshBuffers::default();
    let half = thickness / 2.0;
    // corners in increasing angle from +X towards +Z
    let ring = |size: Vec2| {
        let (x, z) = (size.x / 2.0, size.y / 2.0);
        [Vec3::new(x, 0.0, -z), Vec3::new(x, 0.0, z), Vec3::new(-x, 0.0, z), Vec3::new(-x, 0.0, -z)]
    };
    let outer_ring = ring(outer);
    let hole_ring = ring(hole);
    let planar_uv = |p: Vec3| Vec2::new(p.x, p.z) / ROOF_TEXTURE_SPAN;

    for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let lift = Vec3::Y * y;
        for i in 0..4 {
            let next = (i + 1) % 4;
            let h_i = buffers.vertex(hole_ring[i] + lift, normal, planar_uv(hole_ring[i]));
            let h_n = buffers.vertex(hole_ring[next] + lift, normal, planar_uv(hole_ring[next]));
            let o_i = buffers.vertex(outer_ring[i] + lift, normal, planar_uv(outer_ring[i]));
            let o_n = buffers.vertex(outer_ring[next] + lift, normal, planar_uv(outer_ring[next]));
            if normal.y > 0.0 {
                buffers.triangle(h_i, o_n, o_i);
                buffers.triangle(h_i, h_n, o_n);
            } else {
                buffers.triangle(h_i, o_i, o_n);
                buffers.triangle(h_i, o_n, h_n);
            }
        }
    }

    for (corners, outward) in [(outer_ring, true), (hole_ring, false)] {
        for i in 0..4 {
            let (a, c) = (corners[i], corners[(i + 1) % 4]);
            let edge = c - a;
            let mut normal = Vec3::new(edge.z, 0.0, -edge.x).normalize_or_zero();
            if !outward {
                normal = -normal;
            }
            let span = edge.length() / ROOF_TEXTURE_SPAN;
            let b = buffers.vertex(a - Vec3::Y * half, normal, Vec2::new(0.0, 0.0));
            let t = buffers.vertex(a + Vec3::Y * half, normal, Vec2::new(0.0, 0.1));
            let b_next = buffers.vertex(c - Vec3::Y * half, normal, Vec2::new(span, 0.0));
            let t_next = buffers.vertex(c + Vec3::Y * half, normal, Vec2::new(span, 0.1));
            if outward {
                buffers.triangle(b, t, b_next);
                buffers.triangle(b_next, t, t_next);
            } else {
                buffers.triangle(b, b_next, t);
                buffers.triangle(b_next, t_next, t);
            }
        }
    }

    buffers.into_mesh()
}

// circle swept along a quadratic Bezier, open at both ends
fn tube(curve: &[Vec3; 3], radius: f32, segments: usize, radial_segments: usize) -> Mesh {
    let mut buffers = MeshBuffers::default();
    let segments = segments.max(1);
    let radial = radial_segments.max(3);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let center = quadratic_bezier(curve, t);
        let tangent = quadratic_bezier_tangent(curve, t).try_normalize().unwrap_or(Vec3::Y);
        // any axis not parallel to the tangent gives a stable frame for these short arches
        let normal = tangent
            .cross(Vec3::X)
            .try_normalize()
            .unwrap_or_else(|| tangent.cross(Vec3::Z).normalize());
        let binormal = tangent.cross(normal);

        for j in 0..=radial {
            let v = std::f32::consts::TAU * j as f32 / radial as f32;
            let dir = normal * v.sin() + binormal * v.cos();
            buffers.vertex(center + dir * radius, dir, Vec2::new(t, j as f32 / radial as f32));
        }
    }

    let stride = radial as u32 + 1;
    for i in 0..segments as u32 {
        for j in 0..radial as u32 {
            let a = i * stride + j;
            let b = (i + 1) * stride + j;
            let c = b + 1;
            let d = a + 1;
            buffers.triangle(a, b, d);
            buffers.triangle(b, c, d);
        }
    }
    buffers.into_mesh()
}

/// RGBA8 pixels of a square panel grid, `cells` panels per side.
pub fn grid_texture_pixels(size: u32, cells: u32) -> Vec<u8> {
    let cell = (size / cells.max(1)).max(1);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            // 2 px seams on the low edge of every panel
            let seam = x % cell < 2 || y % cell < 2;
            let value = if seam { 90 } else { 230 };
            pixels.extend([value, value, value, 255]);
        }
    }
    pixels
}

/// Tiling panel texture for the unified roof.
pub fn roof_grid_image() -> Image {
    let mut image = Image::new(
        Extent3d {
            width: ROOF_TEXTURE_SIZE,
            height: ROOF_TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        grid_texture_pixels(ROOF_TEXTURE_SIZE, ROOF_TEXTURE_CELLS),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

#[cfg(test)]
mod tests {
    use bevy::render::mesh::VertexAttributeValues;

    use super::*;

    fn positions(mesh: &Mesh) -> Vec<Vec3> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(values)) => values.iter().map(|p| Vec3::from_array(*p)).collect(),
            _ => panic!("mesh has no positions"),
        }
    }

    fn index_count(mesh: &Mesh) -> usize {
        mesh.indices().map(|indices| indices.len()).unwrap_or(0)
    }

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Shape::Cuboid { size: Vec3::new(2.0, 1.0, 3.0) },
            Shape::Plane { size: Vec2::new(105.0, 68.0) },
            Shape::Disc { radius_x: 60.0, radius_z: 51.0, segments: 64 },
            Shape::Cylinder { radius_top: 1.0, radius_bottom: 1.2, height: 35.0, segments: 8 },
            Shape::Ribbon {
                points: vec![Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), Vec3::new(3.0, 0.0, 10.0)],
                width: 0.12,
            },
            Shape::Wedge {
                inner_radius: 2.0,
                outer_radius: 20.0,
                height: 5.0,
                start_angle: 0.3,
                sweep: 1.2,
                segments: 16,
            },
            Shape::AnnularSlab { outer: Vec2::new(145.0, 108.0), hole: Vec2::new(73.5, 47.6), thickness: 0.5 },
            Shape::Tube {
                curve: [Vec3::ZERO, Vec3::new(0.0, 26.0, 0.0), Vec3::new(0.0, 20.0, -10.0)],
                radius: 0.5,
                segments: 20,
                radial_segments: 8,
            },
        ]
    }

    #[test]
    fn test_meshes_stay_inside_shape_bounds() {
        for shape in sample_shapes() {
            let (min, max) = shape.local_bounds();
            for p in positions(&shape_to_mesh(&shape)) {
                assert!(
                    p.cmpge(min - Vec3::splat(1e-3)).all() && p.cmple(max + Vec3::splat(1e-3)).all(),
                    "{p:?} outside bounds of {shape:?}"
                );
            }
        }
    }

    #[test]
    fn test_index_buffers_are_valid() {
        for shape in sample_shapes() {
            let mesh = shape_to_mesh(&shape);
            let vertices = mesh.count_vertices();
            assert!(vertices > 0);
            assert_eq!(index_count(&mesh) % 3, 0);
            if let Some(indices) = mesh.indices() {
                assert!(indices.iter().all(|i| i < vertices), "{shape:?} indexes past its vertices");
            }
        }
    }

    #[test]
    fn test_disc_and_tube_sizes() {
        let disc = shape_to_mesh(&Shape::Disc { radius_x: 60.0, radius_z: 51.0, segments: 64 });
        assert_eq!(disc.count_vertices(), 65);
        assert_eq!(index_count(&disc), 64 * 3);

        let tube = shape_to_mesh(&Shape::Tube {
            curve: [Vec3::ZERO, Vec3::Y * 10.0, Vec3::new(0.0, 8.0, -5.0)],
            radius: 0.5,
            segments: 20,
            radial_segments: 8,
        });
        assert_eq!(tube.count_vertices(), 21 * 9);
        assert_eq!(index_count(&tube), 20 * 8 * 6);
    }

    #[test]
    fn test_ribbon_skips_repeated_points() {
        let mesh = shape_to_mesh(&Shape::Ribbon {
            points: vec![Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0)],
            width: 0.1,
        });
        assert_eq!(mesh.count_vertices(), 8);
        assert_eq!(index_count(&mesh), 12);
    }

    #[test]
    fn test_tube_vertices_keep_radius() {
        let curve = [Vec3::ZERO, Vec3::new(0.0, 13.0, 0.0), Vec3::new(0.0, 10.0, -5.0)];
        let mesh = shape_to_mesh(&Shape::Tube { curve, radius: 0.5, segments: 4, radial_segments: 6 });
        let points = positions(&mesh);
        for i in 0..=4 {
            let center = quadratic_bezier(&curve, i as f32 / 4.0);
            for p in &points[i * 7..(i + 1) * 7] {
                assert!((p.distance(center) - 0.5).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_grid_texture_pixels() {
        let pixels = grid_texture_pixels(ROOF_TEXTURE_SIZE, ROOF_TEXTURE_CELLS);
        assert_eq!(pixels.len(), (ROOF_TEXTURE_SIZE * ROOF_TEXTURE_SIZE * 4) as usize);
        // seam at the origin, panel fill in the middle of the first cell
        assert_eq!(&pixels[0..4], &[90, 90, 90, 255]);
        let inside = ((8 * ROOF_TEXTURE_SIZE + 8) * 4) as usize;
        assert_eq!(&pixels[inside..inside + 4], &[230, 230, 230, 255]);
    }

    #[test]
    fn test_roof_image_repeats() {
        let image = roof_grid_image();
        assert_eq!(image.width(), ROOF_TEXTURE_SIZE);
        assert!(matches!(image.sampler, ImageSampler::Descriptor(ref d) if matches!(d.address_mode_u, ImageAddressMode::Repeat)));
    }
}
