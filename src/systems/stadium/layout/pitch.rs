// ground and line markings

use bevy::prelude::*;

use crate::config::*;
use crate::systems::stadium::{FieldSpec, Sport};
use super::utils::{arc_points, rectangle_outline};
use super::{Part, SceneNode, Shape, Surface};

pub fn build_pitch(field: &FieldSpec) -> SceneNode {
    let ground = match field.sport {
        Sport::Football => Shape::Plane {
            size: Vec2::new(field.length, field.width),
        },
        Sport::Cricket => Shape::Disc {
            radius_x: field.length / 2.0,
            radius_z: field.width / 2.0,
            segments: CRICKET_SEGMENTS,
        },
    };

    let mut pitch = SceneNode::group("pitch", Part::Pitch)
        .with_child(SceneNode::mesh("ground", Part::Pitch, ground, Surface::solid(GRASS_COLOR).double_sided()));

    if field.sport == Sport::Football {
        pitch.push(football_markings(field));
    }

    pitch
}

fn line(points: Vec<Vec3>) -> SceneNode {
    SceneNode::mesh(
        "line",
        Part::Marking,
        Shape::Ribbon { points, width: LINE_WIDTH },
        marking_surface(),
    )
}

fn spot(position: Vec3) -> SceneNode {
    SceneNode::mesh(
        "spot",
        Part::Marking,
        Shape::Cylinder {
            radius_top: SPOT_RADIUS,
            radius_bottom: SPOT_RADIUS,
            height: LINE_HEIGHT * 2.0,
            segments: 16,
        },
        marking_surface(),
    )
    .at(position)
}

fn marking_surface() -> Surface {
    Surface::translucent(MARKING_COLOR, 0.9).unlit()
}

// boundary, halfway line, centre circle and spot, both penalty ends and the corner arcs
fn football_markings(field: &FieldSpec) -> SceneNode {
    let half_l = field.length / 2.0;
    let half_w = field.width / 2.0;
    let y = LINE_HEIGHT;

    let mut markings = SceneNode::group("markings", Part::Marking);

    markings.push(line(rectangle_outline(Vec2::new(-half_l, -half_w), Vec2::new(half_l, half_w), y)));
    markings.push(line(vec![Vec3::new(0.0, y, -half_w), Vec3::new(0.0, y, half_w)]));
    markings.push(line(arc_points(
        Vec3::new(0.0, y, 0.0),
        CENTER_CIRCLE_RADIUS,
        0.0,
        std::f32::consts::TAU,
        CENTER_CIRCLE_SEGMENTS,
    )));
    markings.push(spot(Vec3::new(0.0, y, 0.0)));

    // mirrored ends
    for side in [-1.0_f32, 1.0] {
        let goal_line = side * half_l;
        for (depth, width) in [(PENALTY_AREA_DEPTH, PENALTY_AREA_WIDTH), (GOAL_AREA_DEPTH, GOAL_AREA_WIDTH)] {
            let inner = goal_line - side * depth;
            markings.push(line(rectangle_outline(
                Vec2::new(goal_line.min(inner), -width / 2.0),
                Vec2::new(goal_line.max(inner), width / 2.0),
                y,
            )));
        }
        markings.push(spot(Vec3::new(goal_line - side * PENALTY_SPOT_DISTANCE, y, 0.0)));
    }

    // quarter circles opening into the pitch
    let quarter = std::f32::consts::FRAC_PI_2;
    for (x, z, start) in [
        (-half_l, -half_w, 0.0),
        (-half_l, half_w, -quarter),
        (half_l, half_w, -2.0 * quarter),
        (half_l, -half_w, -3.0 * quarter),
    ] {
        markings.push(line(arc_points(
            Vec3::new(x, y, z),
            CORNER_ARC_RADIUS,
            start,
            quarter,
            CORNER_ARC_SEGMENTS,
        )));
    }

    markings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_football_pitch_has_markings() {
        let pitch = build_pitch(&FieldSpec::for_sport(Sport::Football));
        assert_eq!(pitch.count_where(|n| n.name == "ground"), 1);

        let markings = pitch.children_named("markings").next().unwrap();
        // boundary, halfway, circle, spot, 2x(penalty, goal area, spot), 4 arcs
        assert_eq!(markings.mesh_count(), 14);
        assert_eq!(markings.count_where(|n| n.name == "spot"), 3);
    }

    #[test]
    fn test_cricket_pitch_is_bare_ellipse() {
        let pitch = build_pitch(&FieldSpec::for_sport(Sport::Cricket));
        assert_eq!(pitch.count_where(|n| n.part.is_football_only()), 0);
        assert_eq!(pitch.mesh_count(), 1);

        let (min, max) = pitch.bounds().unwrap();
        assert!((max.x - 60.0).abs() < 1e-4 && (min.x + 60.0).abs() < 1e-4);
        assert!((max.z - 51.0).abs() < 1e-4);
    }

    #[test]
    fn test_markings_stay_on_the_pitch() {
        let pitch = build_pitch(&FieldSpec::for_sport(Sport::Football));
        let markings = pitch.children_named("markings").next().unwrap();
        let (min, max) = markings.bounds().unwrap();
        assert!(max.x <= 52.5 + LINE_WIDTH && min.x >= -52.5 - LINE_WIDTH);
        assert!(max.z <= 34.0 + LINE_WIDTH && min.z >= -34.0 - LINE_WIDTH);
    }

    #[test]
    fn test_penalty_spots_are_mirrored() {
        let pitch = build_pitch(&FieldSpec::for_sport(Sport::Football));
        let mut xs = Vec::new();
        pitch.visit(&mut |node, world| {
            if node.name == "spot" {
                xs.push(world.translation.x);
            }
        });
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs, vec![-41.5, 0.0, 41.5]);
    }
}
