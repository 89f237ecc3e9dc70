// floodlight masts, towers and their fixtures

use bevy::prelude::*;

use crate::config::*;
use crate::systems::stadium::{FieldSpec, LightConfig, LightStyle, StandConfig};
use super::{scaled_field, LightSource, Part, SceneNode, Shape, Surface};

const ARM_LENGTH: f32 = 8.0;
const ARM_TILT: f32 = 0.26;
const BANK_SETBACK: f32 = 6.0;
const BANK_FIXTURES: usize = 8;
const BANK_ROW_SPACING: f32 = 1.2;

pub fn build_lights(field: &FieldSpec, stands: &StandConfig, lights: &LightConfig) -> SceneNode {
    let tallest = stands.tallest();
    if lights.pole_height <= tallest {
        warn!(
            "floodlight poles at {:.1} m are hidden behind {:.1} m stands",
            lights.pole_height, tallest
        );
    }

    let size = scaled_field(field, &stands.footprint);
    let bowl = stands.bowl_corners > 0.0;
    let mut group = SceneNode::group("lights", Part::Floodlight);

    match lights.style {
        LightStyle::FloodCorner => {
            for corner in mast_corners(size, bowl) {
                group.push(flood_corner(corner, lights));
            }
        }
        LightStyle::ModernBank => {
            for side in [-1.0_f32, 1.0] {
                group.push(light_bank(side, size, lights));
            }
        }
        LightStyle::ClassicPole => {
            for corner in mast_corners(size, bowl) {
                group.push(classic_pole(corner, lights));
            }
        }
        LightStyle::AngledCorner => {
            for corner in mast_corners(size, bowl) {
                group.push(angled_corner(corner, lights));
            }
        }
    }

    group
}

/// Mast positions just beyond each corner of the (scaled) pitch.
///
/// Bowl corners fill a quarter disc of radius `STAND_DEPTH` around each
/// pitch corner, so with `bowl` set the masts move out along the diagonal
/// until they clear that seating.
pub fn mast_corners(size: Vec2, bowl: bool) -> [Vec3; 4] {
    let offset = if bowl {
        CORNER_MAST_OFFSET.max((STAND_DEPTH + BOWL_MAST_CLEARANCE) * std::f32::consts::FRAC_1_SQRT_2)
    } else {
        CORNER_MAST_OFFSET
    };
    let x = size.x / 2.0 + offset;
    let z = size.y / 2.0 + offset;
    [
        Vec3::new(x, 0.0, z),
        Vec3::new(-x, 0.0, z),
        Vec3::new(x, 0.0, -z),
        Vec3::new(-x, 0.0, -z),
    ]
}

fn spot(lights: &LightConfig) -> LightSource {
    LightSource {
        color: lights.color,
        intensity: lights.intensity,
        range: LIGHT_RANGE,
        inner_angle: SPOT_OUTER_ANGLE * (1.0 - SPOT_PENUMBRA),
        outer_angle: SPOT_OUTER_ANGLE,
        shadows: lights.shadows,
    }
}

// housing, glowing lens and the light itself, aimed from `position` at `target`
fn fixture(position: Vec3, target: Vec3, lights: &LightConfig) -> SceneNode {
    SceneNode::group("fixture", Part::Floodlight)
        .with_transform(Transform::from_translation(position).looking_at(target, Vec3::Y))
        .with_child(SceneNode::mesh(
            "housing",
            Part::Floodlight,
            Shape::Cuboid { size: Vec3::new(2.0, 1.0, 1.0) },
            Surface::solid(FIXTURE_COLOR),
        ))
        .with_child(
            SceneNode::mesh(
                "lens",
                Part::Lens,
                Shape::Cuboid { size: Vec3::new(1.8, 0.8, 0.05) },
                Surface::solid(lights.color).glowing(lights.color),
            )
            .at(Vec3::new(0.0, 0.0, -0.525)),
        )
        .with_child(SceneNode::light("spot", Part::Floodlight, spot(lights)).at(Vec3::new(0.0, 0.0, -0.6)))
}

fn pole(height: f32, radius_top: f32, radius_bottom: f32) -> SceneNode {
    SceneNode::mesh(
        "pole",
        Part::Floodlight,
        Shape::Cylinder { radius_top, radius_bottom, height, segments: 8 },
        Surface::solid(POLE_COLOR),
    )
    .at(Vec3::new(0.0, height / 2.0, 0.0))
}

// heading from a mast towards the pitch centre, in the XZ plane
fn inward_angle(corner: Vec3) -> f32 {
    (-corner.z).atan2(-corner.x)
}

fn flood_corner(corner: Vec3, lights: &LightConfig) -> SceneNode {
    let h = lights.pole_height;
    let mut mast = SceneNode::group("mast", Part::Floodlight)
        .at(corner)
        .with_child(pole(h, 1.0, 1.2))
        .with_child(
            SceneNode::mesh(
                "platform",
                Part::Floodlight,
                Shape::Cylinder { radius_top: 2.0, radius_bottom: 2.0, height: 0.5, segments: 8 },
                Surface::solid(POLE_COLOR),
            )
            .at(Vec3::new(0.0, h - 0.25, 0.0)),
        );

    let heading = inward_angle(corner);
    for i in -1..=1 {
        let angle = heading + i as f32 * std::f32::consts::FRAC_PI_4;
        let position = Vec3::new(angle.cos() * 1.5, h + 0.5, angle.sin() * 1.5);
        mast.push(fixture(position, -corner, lights));
    }
    mast
}

// tower behind a long side carrying a vertical column of eight fixtures
fn light_bank(side: f32, size: Vec2, lights: &LightConfig) -> SceneNode {
    let h = lights.pole_height;
    let distance = size.y / 2.0 + STAND_DEPTH + BANK_SETBACK;
    // local -Z faces the pitch
    let yaw = if side < 0.0 { std::f32::consts::PI } else { 0.0 };
    let column = BANK_FIXTURES as f32 * BANK_ROW_SPACING;

    let mut tower = SceneNode::group("tower", Part::Floodlight).with_transform(
        Transform::from_xyz(0.0, 0.0, side * distance).with_rotation(Quat::from_rotation_y(yaw)),
    );
    for x in [-2.0, 2.0] {
        tower.push(pole(h, 0.6, 0.8).at(Vec3::new(x, h / 2.0, 0.0)));
    }
    tower.push(
        SceneNode::mesh(
            "bank",
            Part::Floodlight,
            Shape::Cuboid { size: Vec3::new(5.0, column + 0.5, 1.0) },
            Surface::solid(POLE_COLOR),
        )
        .at(Vec3::new(0.0, h - column / 2.0, 0.0)),
    );

    // top fixtures throw furthest, the column fans out along the pitch
    for row in 0..BANK_FIXTURES {
        let t = row as f32 / (BANK_FIXTURES - 1) as f32;
        let position = Vec3::new(0.0, h - BANK_ROW_SPACING * (row as f32 + 0.5), -1.2);
        let target = Vec3::new((t - 0.5) * size.x * 0.6, 0.0, -distance + (0.5 - t) * size.y / 3.0);
        tower.push(fixture(position, target, lights));
    }
    tower
}

// slim pole with six fixtures fanned out around the top
fn classic_pole(corner: Vec3, lights: &LightConfig) -> SceneNode {
    let h = lights.pole_height;
    let mut mast = SceneNode::group("mast", Part::Floodlight)
        .at(corner)
        .with_child(pole(h, 0.6, 0.8))
        .with_child(
            SceneNode::mesh(
                "ring",
                Part::Floodlight,
                Shape::Cylinder { radius_top: 2.2, radius_bottom: 2.2, height: 0.3, segments: 16 },
                Surface::solid(POLE_COLOR),
            )
            .at(Vec3::new(0.0, h, 0.0)),
        );

    let heading = inward_angle(corner);
    let step = std::f32::consts::PI / 6.0;
    for i in 0..6 {
        let angle = heading + (i as f32 - 2.5) * step;
        let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
        mast.push(fixture(dir * 2.0 + Vec3::Y * (h + 0.5), -corner + dir * 20.0, lights));
    }
    mast
}

// pole with an arm leaning out over the stand, four fixtures along it
fn angled_corner(corner: Vec3, lights: &LightConfig) -> SceneNode {
    let h = lights.pole_height;
    let inward = Vec3::new(-corner.x, 0.0, -corner.z).normalize_or_zero();
    let yaw = (-inward.x).atan2(-inward.z);
    let arm = Transform::from_xyz(0.0, h, 0.0)
        .with_rotation(Quat::from_rotation_y(yaw) * Quat::from_rotation_x(ARM_TILT));

    let mut mast = SceneNode::group("mast", Part::Floodlight)
        .at(corner)
        .with_child(pole(h, 0.8, 1.0))
        .with_child(
            SceneNode::mesh(
                "arm",
                Part::Floodlight,
                Shape::Cuboid { size: Vec3::new(0.6, 0.6, ARM_LENGTH) },
                Surface::solid(POLE_COLOR),
            )
            .with_transform(arm.mul_transform(Transform::from_xyz(0.0, 0.0, -ARM_LENGTH / 2.0))),
        );

    for i in 0..4 {
        let along = -1.5 - i as f32 * 2.0;
        let position = arm.transform_point(Vec3::new(0.0, -0.8, along));
        mast.push(fixture(position, -corner + inward * (i as f32 * 5.0), lights));
    }
    mast
}
