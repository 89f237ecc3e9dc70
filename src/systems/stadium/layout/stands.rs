// tiered seating around the pitch
//
// One side is built in its own frame (X along the stand, -Z towards the pitch)
// and placed by `side_placement`, so the same routine serves all four sides.

use bevy::prelude::*;

use crate::config::*;
use crate::systems::stadium::{FieldSpec, ResolvedStand, Side, StandConfig, StandShape};
use super::utils::spaced_positions;
use super::{scaled_field, side_placement, Part, SceneNode, Shape, Surface};

/// Size of one tier's base slab in the side's frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TierFootprint {
    pub length: f32,
    pub depth: f32,
    pub shift: f32, // offset of the tier centre along the stand
}

pub fn tier_footprint(shape: StandShape, length: f32, depth: f32, tier: u32, spacing: f32) -> TierFootprint {
    let step = tier as f32 * spacing;
    match shape {
        StandShape::Rectangular => TierFootprint {
            length: length - 2.0 * step,
            depth: depth - step,
            shift: 0.0,
        },
        StandShape::Curved => TierFootprint {
            length: length - CURVED_LENGTH_RATE * step,
            depth: depth - CURVED_DEPTH_RATE * step,
            shift: 0.0,
        },
        // the +X end of every tier stays flush
        StandShape::Asymmetric => TierFootprint {
            length: length - 2.0 * step,
            depth: depth - step,
            shift: step,
        },
    }
}

pub fn build_stands(field: &FieldSpec, config: &StandConfig) -> SceneNode {
    let mut stands = SceneNode::group("stands", Part::Stand);

    for side in Side::ALL {
        stands.push(build_side(side, field, config));
    }

    if config.bowl_corners > 0.0 {
        let size = scaled_field(field, &config.footprint);
        for sx in [-1.0_f32, 1.0] {
            for sz in [-1.0_f32, 1.0] {
                stands.push(corner_section(size, sx, sz, config));
            }
        }
    }

    stands
}

fn build_side(side: Side, field: &FieldSpec, config: &StandConfig) -> SceneNode {
    let placement = side_placement(side, field, &config.footprint);
    let stand = config.resolve(side);
    let tier_height = stand.height / stand.tiers as f32;

    let mut section = SceneNode::group("stand", Part::Stand).with_transform(placement.transform);

    for tier in 0..stand.tiers {
        let footprint = tier_footprint(config.shape, placement.length, STAND_DEPTH, tier, config.tier_spacing);
        let premium = config.premium.enabled && config.premium.tier == tier;
        section.push(build_tier(&stand, config, footprint, tier as f32 * tier_height, tier_height, premium));
    }

    // entrance tunnels cut into the front of the lowest tier
    let count = (placement.length / TUNNEL_SPACING).floor() as usize;
    let first = -(count.saturating_sub(1) as f32) * TUNNEL_SPACING / 2.0;
    for i in 0..count {
        section.push(
            SceneNode::mesh(
                "tunnel",
                Part::Stand,
                Shape::Cuboid { size: Vec3::new(TUNNEL_WIDTH, TUNNEL_HEIGHT, TUNNEL_DEPTH) },
                Surface::solid(TUNNEL_COLOR),
            )
            .at(Vec3::new(
                first + i as f32 * TUNNEL_SPACING,
                TUNNEL_HEIGHT / 2.0,
                -STAND_DEPTH / 2.0 + TUNNEL_DEPTH / 2.0,
            )),
        );
    }

    section
}

fn build_tier(
    stand: &ResolvedStand,
    config: &StandConfig,
    footprint: TierFootprint,
    tier_y: f32,
    tier_height: f32,
    premium: bool,
) -> SceneNode {
    let TierFootprint { length, depth, shift } = footprint;
    let (stand_color, seat_color, rows) = if premium {
        (config.premium.stand_color, config.premium.seat_color, PREMIUM_SEAT_ROWS)
    } else {
        (stand.color, stand.seat_color, SEAT_ROWS)
    };

    let mut tier = SceneNode::group(if premium { "premium_tier" } else { "tier" }, Part::Stand);

    let base_height = tier_height * BASE_SLAB_RATIO;
    tier.push(
        SceneNode::mesh(
            "base",
            Part::Stand,
            Shape::Cuboid { size: Vec3::new(length, base_height, depth) },
            Surface::solid(stand_color),
        )
        .at(Vec3::new(shift, tier_y + base_height / 2.0, 0.0)),
    );

    // rows climb away from the pitch
    let row_height = tier_height * SEATING_RATIO / rows as f32;
    let row_depth = depth / rows as f32;
    let seats = Surface::solid(seat_color);
    for row in 0..rows {
        let row_y = tier_y + base_height + (row as f32 + 0.5) * row_height;
        let row_z = -depth / 2.0 + (row as f32 + 0.5) * row_depth;

        tier.push(
            SceneNode::mesh("seat", Part::Stand, Shape::Cuboid { size: Vec3::new(length, row_height, row_depth) }, seats)
                .at(Vec3::new(shift, row_y, row_z)),
        );
        tier.push(
            SceneNode::mesh(
                "seat_back",
                Part::Stand,
                Shape::Cuboid { size: Vec3::new(length, row_height * 0.5, 0.1) },
                seats,
            )
            .at(Vec3::new(shift, row_y + row_height * 0.25, row_z + row_depth / 2.0 - 0.05)),
        );
    }

    tier.push(
        SceneNode::mesh(
            "railing",
            Part::Stand,
            Shape::Cuboid { size: Vec3::new(length, 0.1, 0.1) },
            Surface::solid(RAILING_COLOR),
        )
        .at(Vec3::new(shift, tier_y + tier_height - 0.1, -depth / 2.0 + 0.1)),
    );

    for x in spaced_positions(length - 0.2, SUPPORT_SPACING) {
        tier.push(
            SceneNode::mesh(
                "support",
                Part::Stand,
                Shape::Cuboid { size: Vec3::new(0.2, tier_height, 0.2) },
                Surface::solid(stand_color),
            )
            .at(Vec3::new(shift + x, tier_y + tier_height / 2.0, -depth / 2.0 + 0.1)),
        );
    }

    if premium {
        let seating_height = tier_height * SEATING_RATIO;
        let segments = (length / PREMIUM_DIVIDER_SPACING).floor() as usize;
        for i in 1..segments {
            tier.push(
                SceneNode::mesh(
                    "divider",
                    Part::Stand,
                    Shape::Cuboid { size: Vec3::new(0.15, seating_height, depth) },
                    Surface::solid(DIVIDER_COLOR),
                )
                .at(Vec3::new(
                    shift - length / 2.0 + i as f32 * PREMIUM_DIVIDER_SPACING,
                    tier_y + base_height + seating_height / 2.0,
                    0.0,
                )),
            );
        }
    }

    tier
}

// rounded corner piece filling the gap between two neighbouring stands
fn corner_section(size: Vec2, sx: f32, sz: f32, config: &StandConfig) -> SceneNode {
    let along_x = config.resolve(if sx > 0.0 { Side::East } else { Side::West });
    let along_z = config.resolve(if sz > 0.0 { Side::South } else { Side::North });
    let stand = if along_x.height <= along_z.height { along_x } else { along_z };
    let tier_height = stand.height / stand.tiers as f32;

    let sweep = config.bowl_corners.min(1.0) * std::f32::consts::FRAC_PI_2;
    let start = sz.atan2(sx) - sweep / 2.0;
    let depth_rate = match config.shape {
        StandShape::Curved => CURVED_DEPTH_RATE,
        StandShape::Rectangular | StandShape::Asymmetric => 1.0,
    };

    let mut corner = SceneNode::group("corner", Part::Stand)
        .at(Vec3::new(sx * size.x / 2.0, 0.0, sz * size.y / 2.0));

    for tier in 0..stand.tiers {
        let tier_y = tier as f32 * tier_height;
        let radius = STAND_DEPTH - tier as f32 * config.tier_spacing * depth_rate;
        let base_height = tier_height * BASE_SLAB_RATIO;

        corner.push(
            SceneNode::mesh(
                "corner_base",
                Part::Stand,
                Shape::Wedge {
                    inner_radius: 0.0,
                    outer_radius: radius,
                    height: base_height,
                    start_angle: start,
                    sweep,
                    segments: CORNER_SEGMENTS,
                },
                Surface::solid(stand.color),
            )
            .at(Vec3::new(0.0, tier_y, 0.0)),
        );
        corner.push(
            SceneNode::mesh(
                "corner_seats",
                Part::Stand,
                Shape::Wedge {
                    inner_radius: radius * 0.25,
                    outer_radius: radius,
                    height: tier_height * SEATING_RATIO,
                    start_angle: start,
                    sweep,
                    segments: CORNER_SEGMENTS,
                },
                Surface::solid(stand.seat_color),
            )
            .at(Vec3::new(0.0, tier_y + base_height, 0.0)),
        );
    }

    corner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::Sport;
    use crate::systems::stadium::layout::NodeContent;

    fn football() -> FieldSpec {
        FieldSpec::for_sport(Sport::Football)
    }

    fn side_node(stands: &SceneNode, side: Side) -> &SceneNode {
        stands.children_named("stand").nth(side.index()).unwrap()
    }

    fn cuboid(node: &SceneNode) -> Vec3 {
        match &node.content {
            NodeContent::Mesh { shape: Shape::Cuboid { size }, .. } => *size,
            other => panic!("expected a cuboid, got {other:?}"),
        }
    }

    #[test]
    fn test_north_stand_example() {
        let config = StandConfig { height: 15.0, tiers: 3, tier_spacing: 1.5, ..default() };
        let stands = build_stands(&football(), &config);
        let north = side_node(&stands, Side::North);

        let tiers: Vec<_> = north.children_named("tier").collect();
        assert_eq!(tiers.len(), 3);

        let widths: Vec<f32> = tiers
            .iter()
            .map(|tier| cuboid(tier.children_named("base").next().unwrap()).z)
            .collect();
        assert_eq!(widths, vec![20.0, 18.5, 17.0]);

        // each tier lives in its own 5 unit band
        for (i, tier) in tiers.iter().enumerate() {
            let (min, max) = tier.bounds().unwrap();
            let band = i as f32 * 5.0;
            assert!(min.y >= band - 1e-4 && max.y <= band + 5.0 + 1e-4, "tier {i} spans {min:?}..{max:?}");
        }
    }

    #[test]
    fn test_outer_tier_matches_footprint() {
        let field = football();
        for tiers in 1..=5 {
            let config = StandConfig { tiers, tier_spacing: 1.5, ..default() };
            let stands = build_stands(&field, &config);
            for side in Side::ALL {
                let placement = side_placement(side, &field, &config.footprint);
                let node = side_node(&stands, side);
                let bases: Vec<Vec3> = node
                    .children_named("tier")
                    .map(|tier| cuboid(tier.children_named("base").next().unwrap()))
                    .collect();
                assert_eq!(bases.len(), tiers as usize);
                assert!((bases[0].x - placement.length).abs() < 1e-4);
                assert!((bases[0].z - STAND_DEPTH).abs() < 1e-4);
                for base in &bases[1..] {
                    assert!(base.x < bases[0].x && base.z < bases[0].z, "{side:?} tier protrudes");
                }

                // the whole side, tunnels included, stays on its base slab
                let mut local = node.clone();
                local.transform = Transform::IDENTITY;
                let (min, max) = local.bounds().unwrap();
                let half = Vec3::new(placement.length, 0.0, STAND_DEPTH) / 2.0;
                assert!(min.x >= -half.x - 1e-4 && max.x <= half.x + 1e-4, "{side:?} spans x {min:?}..{max:?}");
                assert!(min.z >= -half.z - 1e-4 && max.z <= half.z + 1e-4, "{side:?} spans z {min:?}..{max:?}");
            }
        }
    }

    #[test]
    fn test_seating_fits_its_tier() {
        let config = StandConfig { tiers: 4, ..default() };
        let stands = build_stands(&football(), &config);
        let tier_height = config.height / 4.0;
        for side in Side::ALL {
            let node = side_node(&stands, side);
            for tier in node.children_named("tier") {
                let base = cuboid(tier.children_named("base").next().unwrap());
                let seats: Vec<Vec3> = tier.children_named("seat").map(cuboid).collect();
                assert_eq!(seats.len(), SEAT_ROWS);
                let total: f32 = seats.iter().map(|s| s.y).sum();
                assert!(total <= tier_height * SEATING_RATIO + 1e-4);

                // nothing sticks out of the base footprint, in the side's frame
                let (min, max) = tier.bounds().unwrap();
                assert!(max.z - min.z <= base.z + 1e-4);
                assert!(max.x - min.x <= base.x + 1e-4);
            }
        }
    }

    #[test]
    fn test_side_override_falls_back() {
        let mut config = StandConfig::default();
        config.sides[Side::East.index()].custom = true;
        config.sides[Side::East.index()].tiers = 5;
        config.sides[Side::West.index()].tiers = 1; // ignored, not custom

        let stands = build_stands(&football(), &config);
        assert_eq!(side_node(&stands, Side::East).children_named("tier").count(), 5);
        assert_eq!(side_node(&stands, Side::West).children_named("tier").count(), 3);
    }

    #[test]
    fn test_premium_tier() {
        let mut config = StandConfig::default();
        config.premium.enabled = true;
        config.premium.tier = 1;

        let stands = build_stands(&football(), &config);
        let north = side_node(&stands, Side::North);
        let premium = north.children_named("premium_tier").next().unwrap();
        assert_eq!(premium.children_named("seat").count(), PREMIUM_SEAT_ROWS);
        assert!(premium.children_named("divider").count() > 0);
        assert_eq!(north.children_named("tier").count(), 2);
        assert_eq!(north.children.iter().position(|n| n.name == "premium_tier"), Some(1));
    }

    #[test]
    fn test_shape_modes() {
        let curved = tier_footprint(StandShape::Curved, 100.0, 20.0, 2, 1.0);
        assert_eq!(curved.length, 94.0);
        assert_eq!(curved.depth, 17.5);

        let asymmetric = tier_footprint(StandShape::Asymmetric, 100.0, 20.0, 2, 1.0);
        // right ends line up with the outer tier
        assert_eq!(asymmetric.shift + asymmetric.length / 2.0, 50.0);

        let outer = tier_footprint(StandShape::Curved, 100.0, 20.0, 0, 1.0);
        assert_eq!((outer.length, outer.depth), (100.0, 20.0));
    }

    #[test]
    fn test_tunnels_spread_along_stand() {
        let stands = build_stands(&football(), &StandConfig::default());
        assert_eq!(side_node(&stands, Side::North).children_named("tunnel").count(), 4);
        assert_eq!(side_node(&stands, Side::East).children_named("tunnel").count(), 2);
    }

    #[test]
    fn test_bowl_corners() {
        let mut config = StandConfig::default();
        assert_eq!(build_stands(&football(), &config).children_named("corner").count(), 0);

        config.bowl_corners = 1.0;
        let stands = build_stands(&football(), &config);
        let corners: Vec<_> = stands.children_named("corner").collect();
        assert_eq!(corners.len(), 4);
        // every corner stays outside the pitch
        for corner in corners {
            let (min, max) = corner.bounds().unwrap();
            assert!(min.x >= 52.5 - 1e-3 || max.x <= -52.5 + 1e-3);
            assert!(min.z >= 34.0 - 1e-3 || max.z <= -34.0 + 1e-3);
            assert_eq!(corner.mesh_count(), 2 * config.tiers as usize);
        }
    }
}
