//! Pure scene description produced by the builders.
//!
//! Builders never touch the ECS: they return a tree of [`SceneNode`]s made of
//! positioned primitive shapes, surfaces and light descriptors. The assembly
//! layer turns that tree into entities, meshes and materials.

use bevy::prelude::*;

use crate::config::STAND_DEPTH;
use super::{FieldSpec, Footprint, Side};

pub mod fixtures;
pub mod lights;
pub mod mesh_gen;
pub mod pitch;
pub mod roof;
pub mod stands;
pub mod utils;

/// Which part of the stadium a node belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Part {
    Pitch,
    Marking,
    Fixtures,
    Goal,
    CornerFlag,
    Stand,
    Roof,
    Floodlight,
    Lens,
}

impl Part {
    pub fn is_football_only(self) -> bool {
        matches!(self, Part::Marking | Part::Fixtures | Part::Goal | Part::CornerFlag)
    }
}

/// Primitive geometry, centred on the node origin unless noted.
#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
    Cuboid { size: Vec3 },
    /// Flat rectangle in the XZ plane facing +Y.
    Plane { size: Vec2 },
    /// Flat ellipse in the XZ plane facing +Y.
    Disc { radius_x: f32, radius_z: f32, segments: usize },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, segments: usize },
    /// Polyline widened into a flat strip, points in node space.
    Ribbon { points: Vec<Vec3>, width: f32 },
    /// Annular sector prism, angles measured from +X towards +Z, base at y = 0.
    Wedge { inner_radius: f32, outer_radius: f32, height: f32, start_angle: f32, sweep: f32, segments: usize },
    /// Rectangle with a rectangular hole, extruded along Y.
    AnnularSlab { outer: Vec2, hole: Vec2, thickness: f32 },
    /// Quadratic Bezier swept by a circle, control points in node space.
    Tube { curve: [Vec3; 3], radius: f32, segments: usize, radial_segments: usize },
}

impl Shape {
    // local axis-aligned bounds as (min, max)
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        match self {
            Shape::Cuboid { size } => (-*size / 2.0, *size / 2.0),
            Shape::Plane { size } => {
                let half = Vec3::new(size.x / 2.0, 0.0, size.y / 2.0);
                (-half, half)
            }
            Shape::Disc { radius_x, radius_z, .. } => {
                let half = Vec3::new(*radius_x, 0.0, *radius_z);
                (-half, half)
            }
            Shape::Cylinder { radius_top, radius_bottom, height, .. } => {
                let r = radius_top.max(*radius_bottom);
                let half = Vec3::new(r, height / 2.0, r);
                (-half, half)
            }
            Shape::Ribbon { points, width } => {
                let (min, max) = utils::point_bounds(points.iter().copied());
                // segment ends are extended by half the width, corners reach w / sqrt(2)
                let pad = Vec3::new(1.0, 0.0, 1.0) * (width * std::f32::consts::FRAC_1_SQRT_2);
                (min - pad, max + pad)
            }
            Shape::Wedge { inner_radius, outer_radius, height, start_angle, sweep, segments } => {
                let mut points = Vec::new();
                for i in 0..=*segments {
                    let angle = start_angle + sweep * i as f32 / *segments as f32;
                    let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
                    points.push(dir * *inner_radius);
                    points.push(dir * *outer_radius + Vec3::Y * *height);
                }
                utils::point_bounds(points.into_iter())
            }
            Shape::AnnularSlab { outer, thickness, .. } => {
                let half = Vec3::new(outer.x / 2.0, thickness / 2.0, outer.y / 2.0);
                (-half, half)
            }
            Shape::Tube { curve, radius, segments, .. } => {
                let (min, max) = utils::point_bounds(
                    (0..=*segments).map(|i| utils::quadratic_bezier(curve, i as f32 / *segments as f32)),
                );
                (min - Vec3::splat(*radius), max + Vec3::splat(*radius))
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Texture {
    RoofGrid,
}

/// Material description for a mesh node.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Surface {
    pub color: Color,
    pub opacity: f32,
    pub emissive: Option<Color>,
    pub unlit: bool,
    pub double_sided: bool,
    pub wireframe: bool,
    pub texture: Option<Texture>,
}

impl Surface {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            emissive: None,
            unlit: false,
            double_sided: false,
            wireframe: false,
            texture: None,
        }
    }

    pub fn translucent(color: Color, opacity: f32) -> Self {
        Self { opacity, double_sided: true, ..Self::solid(color) }
    }

    pub fn double_sided(self) -> Self {
        Self { double_sided: true, ..self }
    }

    pub fn unlit(self) -> Self {
        Self { unlit: true, ..self }
    }

    pub fn wireframe(self) -> Self {
        Self { wireframe: true, ..self }
    }

    pub fn glowing(self, emissive: Color) -> Self {
        Self { emissive: Some(emissive), ..self }
    }

    pub fn textured(self, texture: Texture) -> Self {
        Self { texture: Some(texture), ..self }
    }
}

/// Spot light shining along the node's local -Z.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LightSource {
    pub color: Color,
    pub intensity: f32, // configured value, scaled to lumens when spawned
    pub range: f32,
    pub inner_angle: f32,
    pub outer_angle: f32,
    pub shadows: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub enum NodeContent {
    Group,
    Mesh { shape: Shape, surface: Surface },
    Light(LightSource),
}

#[derive(Clone, PartialEq, Debug)]
pub struct SceneNode {
    pub name: &'static str,
    pub part: Part,
    pub transform: Transform,
    pub content: NodeContent,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: &'static str, part: Part) -> Self {
        Self {
            name,
            part,
            transform: Transform::IDENTITY,
            content: NodeContent::Group,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: &'static str, part: Part, shape: Shape, surface: Surface) -> Self {
        Self {
            content: NodeContent::Mesh { shape, surface },
            ..Self::group(name, part)
        }
    }

    pub fn light(name: &'static str, part: Part, light: LightSource) -> Self {
        Self {
            content: NodeContent::Light(light),
            ..Self::group(name, part)
        }
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Visits every node depth-first with its transform composed from the root.
    pub fn visit(&self, f: &mut impl FnMut(&SceneNode, &Transform)) {
        self.visit_from(&Transform::IDENTITY, f);
    }

    fn visit_from(&self, parent: &Transform, f: &mut impl FnMut(&SceneNode, &Transform)) {
        let world = parent.mul_transform(self.transform);
        f(self, &world);
        for child in &self.children {
            child.visit_from(&world, f);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    pub fn count_where(&self, predicate: impl Fn(&SceneNode) -> bool) -> usize {
        let mut count = 0;
        self.visit(&mut |node, _| {
            if predicate(node) {
                count += 1;
            }
        });
        count
    }

    pub fn mesh_count(&self) -> usize {
        self.count_where(|node| matches!(node.content, NodeContent::Mesh { .. }))
    }

    pub fn light_count(&self) -> usize {
        self.count_where(|node| matches!(node.content, NodeContent::Light(_)))
    }

    /// Direct children with the given name.
    pub fn children_named(&self, name: &str) -> impl Iterator<Item = &SceneNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// World-space axis-aligned bounds of every mesh in the tree.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut bounds: Option<(Vec3, Vec3)> = None;
        self.visit(&mut |node, world| {
            let NodeContent::Mesh { shape, .. } = &node.content else {
                return;
            };
            let (min, max) = shape.local_bounds();
            for i in 0..8 {
                let corner = Vec3::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                );
                let p = world.transform_point(corner);
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(p), hi.max(p)),
                    None => (p, p),
                });
            }
        });
        bounds
    }
}

/// Overall length (X) and width (Z) of the playing area after the footprint scale.
pub fn scaled_field(field: &FieldSpec, footprint: &Footprint) -> Vec2 {
    Vec2::new(field.length * footprint.length, field.width * footprint.width)
}

/// Where a side's stand sits: local X runs along the stand, local -Z faces the pitch.
#[derive(Clone, Copy, Debug)]
pub struct SidePlacement {
    pub transform: Transform,
    pub length: f32,
}

pub fn side_placement(side: Side, field: &FieldSpec, footprint: &Footprint) -> SidePlacement {
    let size = scaled_field(field, footprint);
    let (translation, yaw, length) = match side {
        Side::North => (Vec3::new(0.0, 0.0, -size.y / 2.0 - STAND_DEPTH / 2.0), std::f32::consts::PI, size.x),
        Side::South => (Vec3::new(0.0, 0.0, size.y / 2.0 + STAND_DEPTH / 2.0), 0.0, size.x),
        Side::East => (Vec3::new(size.x / 2.0 + STAND_DEPTH / 2.0, 0.0, 0.0), std::f32::consts::FRAC_PI_2, size.y),
        Side::West => (Vec3::new(-size.x / 2.0 - STAND_DEPTH / 2.0, 0.0, 0.0), -std::f32::consts::FRAC_PI_2, size.y),
    };
    SidePlacement {
        transform: Transform::from_translation(translation).with_rotation(Quat::from_rotation_y(yaw)),
        length,
    }
}
