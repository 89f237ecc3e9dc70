// goal frames and corner flags, fixed geometry for football only

use bevy::prelude::*;

use crate::config::*;
use crate::systems::stadium::{FieldSpec, Sport};
use super::{Part, SceneNode, Shape, Surface};

pub fn build_fixtures(field: &FieldSpec) -> Option<SceneNode> {
    if field.sport != Sport::Football {
        return None;
    }

    let mut fixtures = SceneNode::group("fixtures", Part::Fixtures);
    for side in [-1.0_f32, 1.0] {
        fixtures.push(goal(side * field.length / 2.0, side));
    }
    for x in [-field.length / 2.0, field.length / 2.0] {
        for z in [-field.width / 2.0, field.width / 2.0] {
            fixtures.push(corner_flag(Vec3::new(x, 0.0, z)));
        }
    }
    Some(fixtures)
}

// posts and crossbar on the goal line, net box behind it
fn goal(goal_line: f32, side: f32) -> SceneNode {
    let frame = Surface::solid(Color::WHITE).unlit();
    let t = GOAL_POST_THICKNESS;

    let mut goal = SceneNode::group("goal", Part::Goal).at(Vec3::new(goal_line, 0.0, 0.0));
    for z in [-GOAL_WIDTH / 2.0, GOAL_WIDTH / 2.0] {
        goal.push(
            SceneNode::mesh("post", Part::Goal, Shape::Cuboid { size: Vec3::new(t, GOAL_HEIGHT, t) }, frame)
                .at(Vec3::new(0.0, GOAL_HEIGHT / 2.0, z)),
        );
    }
    goal.push(
        SceneNode::mesh("crossbar", Part::Goal, Shape::Cuboid { size: Vec3::new(t, t, GOAL_WIDTH) }, frame)
            .at(Vec3::new(0.0, GOAL_HEIGHT, 0.0)),
    );
    goal.push(
        SceneNode::mesh(
            "net",
            Part::Goal,
            Shape::Cuboid { size: Vec3::new(GOAL_DEPTH, GOAL_HEIGHT, GOAL_WIDTH) },
            Surface::translucent(Color::WHITE, NET_OPACITY).unlit().wireframe(),
        )
        .at(Vec3::new(side * GOAL_DEPTH / 2.0, GOAL_HEIGHT / 2.0, 0.0)),
    );
    goal
}

fn corner_flag(corner: Vec3) -> SceneNode {
    // flag hangs from the pole top, on the pitch side of the pole along X
    let inward = -corner.x.signum();
    SceneNode::group("corner_flag", Part::CornerFlag)
        .at(corner)
        .with_child(
            SceneNode::mesh(
                "flag_pole",
                Part::CornerFlag,
                Shape::Cylinder {
                    radius_top: FLAG_POLE_RADIUS,
                    radius_bottom: FLAG_POLE_RADIUS,
                    height: FLAG_POLE_HEIGHT,
                    segments: 8,
                },
                Surface::solid(Color::WHITE).unlit(),
            )
            .at(Vec3::new(0.0, FLAG_POLE_HEIGHT / 2.0, 0.0)),
        )
        .with_child(
            SceneNode::mesh(
                "flag",
                Part::CornerFlag,
                Shape::Plane { size: Vec2::new(FLAG_WIDTH, FLAG_HEIGHT) },
                Surface::solid(FLAG_COLOR).double_sided().unlit(),
            )
            // stand the plane upright, facing +Z
            .with_transform(
                Transform::from_xyz(inward * FLAG_WIDTH / 2.0, FLAG_POLE_HEIGHT - FLAG_HEIGHT / 2.0, 0.0)
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_football_fixture_counts() {
        let fixtures = build_fixtures(&FieldSpec::for_sport(Sport::Football)).unwrap();
        assert_eq!(fixtures.children_named("goal").count(), 2);
        assert_eq!(fixtures.children_named("corner_flag").count(), 4);
        // 2 posts, crossbar and net per goal, pole and flag per corner
        assert_eq!(fixtures.mesh_count(), 2 * 4 + 4 * 2);
        // every node is owned by a goal or a flag
        assert!(fixtures.count_where(|n| n.part.is_football_only()) == fixtures.node_count());
    }

    #[test]
    fn test_cricket_has_no_fixtures() {
        assert!(build_fixtures(&FieldSpec::for_sport(Sport::Cricket)).is_none());
    }

    #[test]
    fn test_goal_opening_and_net_behind_line() {
        let fixtures = build_fixtures(&FieldSpec::for_sport(Sport::Football)).unwrap();
        let mut posts = Vec::new();
        let mut nets = Vec::new();
        fixtures.visit(&mut |node, world| match node.name {
            "post" => posts.push(world.translation),
            "net" => nets.push(world.translation),
            _ => {}
        });
        assert_eq!(posts.len(), 4);
        assert!((posts[1].z - posts[0].z - GOAL_WIDTH).abs() < 1e-5);
        for net in nets {
            assert!(net.x.abs() > 52.5, "net at {net:?} hangs over the pitch");
        }
    }

    #[test]
    fn test_flags_are_upright() {
        let fixtures = build_fixtures(&FieldSpec::for_sport(Sport::Football)).unwrap();
        let flags = fixtures.children_named("corner_flag").next().unwrap();
        let (min, max) = flags.bounds().unwrap();
        assert!((max.y - FLAG_POLE_HEIGHT).abs() < 1e-4);
        assert!(min.y.abs() < 1e-4);
    }
}
