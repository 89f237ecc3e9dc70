// roof shell or per-side canopies, plus their arched supports

use bevy::prelude::*;

use crate::config::*;
use crate::systems::stadium::{FieldSpec, RoofConfig, RoofStyle, Side, StandConfig};
use super::{scaled_field, side_placement, Part, SceneNode, Shape, Surface, Texture};

pub fn build_roof(field: &FieldSpec, stands: &StandConfig, roof: &RoofConfig) -> SceneNode {
    match roof.style {
        RoofStyle::Unified => unified_roof(field, stands, roof),
        RoofStyle::PerSide => per_side_roof(field, stands, roof),
    }
}

fn arch(curve: [Vec3; 3], color: Color) -> SceneNode {
    SceneNode::mesh(
        "arch",
        Part::Roof,
        Shape::Tube {
            curve,
            radius: ARCH_RADIUS,
            segments: ARCH_SEGMENTS,
            radial_segments: TUBE_RADIAL_SEGMENTS,
        },
        Surface::solid(color),
    )
}

// single ring over every stand, with a hole over the pitch
fn unified_roof(field: &FieldSpec, stands: &StandConfig, roof: &RoofConfig) -> SceneNode {
    let size = scaled_field(field, &stands.footprint);
    let total = size + Vec2::splat(STAND_DEPTH * 2.0);
    let height = stands.tallest() + ROOF_CLEARANCE;

    let mut surface = Surface::translucent(roof.color, roof.opacity);
    if roof.grid_texture {
        surface = surface.textured(Texture::RoofGrid);
    }

    let mut group = SceneNode::group("roof", Part::Roof);
    group.push(
        SceneNode::mesh(
            "roof_shell",
            Part::Roof,
            Shape::AnnularSlab {
                outer: total,
                hole: size * ROOF_HOLE_RATIO,
                thickness: ROOF_THICKNESS,
            },
            surface,
        )
        .at(Vec3::new(0.0, height - ROOF_THICKNESS / 2.0, 0.0)),
    );

    // arches rise from the outer perimeter and lean in towards the pitch
    for i in 0..ROOF_ARCH_COUNT {
        let angle = std::f32::consts::TAU * i as f32 / ROOF_ARCH_COUNT as f32;
        let base = Vec3::new(angle.cos() * total.x / 2.0, 0.0, angle.sin() * total.y / 2.0);
        group.push(
            arch(
                [
                    Vec3::ZERO,
                    Vec3::new(0.0, height * ARCH_RISE, 0.0),
                    Vec3::new(0.0, height, -STAND_DEPTH / 2.0),
                ],
                roof.support_color,
            )
            .with_transform(Transform::from_translation(base).looking_at(Vec3::ZERO, Vec3::Y)),
        );
    }

    group
}

// one canopy per enabled side, each over its own stand
fn per_side_roof(field: &FieldSpec, stands: &StandConfig, roof: &RoofConfig) -> SceneNode {
    let mut group = SceneNode::group("roof", Part::Roof);

    for side in Side::ALL {
        let stand = stands.resolve(side);
        let settings = roof.resolve(side, stand.height);
        if !settings.enabled {
            continue;
        }
        if settings.height <= stand.height {
            warn!(
                "{} canopy at {:.1} m does not clear its {:.1} m stand",
                side.label(),
                settings.height,
                stand.height
            );
        }

        let placement = side_placement(side, field, &stands.footprint);
        let length = placement.length;
        let height = settings.height;
        let back = STAND_DEPTH / 2.0 + 1.0;

        let mut canopy = SceneNode::group("canopy", Part::Roof).with_transform(placement.transform);
        canopy.push(
            SceneNode::mesh(
                "canopy_slab",
                Part::Roof,
                Shape::Cuboid { size: Vec3::new(length, ROOF_THICKNESS, STAND_DEPTH + CANOPY_OVERHANG) },
                Surface::translucent(settings.color, settings.opacity),
            )
            .at(Vec3::new(0.0, height - ROOF_THICKNESS / 2.0, -CANOPY_OVERHANG / 2.0)),
        );

        let struts = ((length / CANOPY_STRUT_SPACING).round() as usize).max(2);
        let xs: Vec<f32> = (0..struts)
            .map(|i| -length / 2.0 + length * (i as f32 + 0.5) / struts as f32)
            .collect();

        for &x in &xs {
            canopy.push(arch(
                [
                    Vec3::new(x, 0.0, back),
                    Vec3::new(x, height * ARCH_RISE, back),
                    Vec3::new(x, height, back - 3.0),
                ],
                roof.support_color,
            ));
        }
        for pair in xs.windows(2) {
            canopy.push(
                SceneNode::mesh(
                    "post",
                    Part::Roof,
                    Shape::Cylinder {
                        radius_top: 0.4,
                        radius_bottom: 0.4,
                        height,
                        segments: 8,
                    },
                    Surface::solid(roof.support_color),
                )
                .at(Vec3::new((pair[0] + pair[1]) / 2.0, height / 2.0, back)),
            );
        }

        group.push(canopy);
    }

    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::Sport;
    use crate::systems::stadium::layout::NodeContent;

    fn football() -> FieldSpec {
        FieldSpec::for_sport(Sport::Football)
    }

    #[test]
    fn test_unified_roof_clears_tallest_stand() {
        let mut stands = StandConfig::default();
        stands.sides[Side::South.index()].custom = true;
        stands.sides[Side::South.index()].height = 25.0;

        let roof = build_roof(&football(), &stands, &RoofConfig::default());
        assert_eq!(roof.children_named("roof_shell").count(), 1);
        assert_eq!(roof.children_named("arch").count(), ROOF_ARCH_COUNT);

        let shell = roof.children_named("roof_shell").next().unwrap();
        let (min, max) = shell.bounds().unwrap();
        assert!((max.y - 30.0).abs() < 1e-4);
        assert!(min.y > 25.0);
        // outer edge covers the stands
        assert!((max.x - (52.5 + STAND_DEPTH)).abs() < 1e-4);
        assert!((max.z - (34.0 + STAND_DEPTH)).abs() < 1e-4);
    }

    #[test]
    fn test_arches_reach_the_roof() {
        let roof = build_roof(&football(), &StandConfig::default(), &RoofConfig::default());
        for arch in roof.children_named("arch") {
            let (min, max) = arch.bounds().unwrap();
            assert!(min.y < 0.0 && min.y > -1.0);
            assert!(max.y >= 20.0);
            // leans in towards the pitch
            let end = arch.transform.transform_point(Vec3::new(0.0, 20.0, -STAND_DEPTH / 2.0));
            assert!(end.xz().length() < arch.transform.translation.xz().length());
        }
    }

    #[test]
    fn test_grid_texture_variant() {
        let roof_config = RoofConfig { grid_texture: true, ..default() };
        let roof = build_roof(&football(), &StandConfig::default(), &roof_config);
        let shell = roof.children_named("roof_shell").next().unwrap();
        let NodeContent::Mesh { surface, .. } = &shell.content else {
            panic!("roof shell is not a mesh");
        };
        assert_eq!(surface.texture, Some(Texture::RoofGrid));
        assert!((surface.opacity - ROOF_OPACITY).abs() < 1e-6);
    }

    #[test]
    fn test_per_side_canopies() {
        let mut roof_config = RoofConfig { style: RoofStyle::PerSide, ..default() };
        let roof = build_roof(&football(), &StandConfig::default(), &roof_config);
        let canopies: Vec<_> = roof.children_named("canopy").collect();
        assert_eq!(canopies.len(), 4);
        // strut count follows the stand length
        assert_eq!(canopies[Side::North.index()].children_named("arch").count(), 7);
        assert_eq!(canopies[Side::East.index()].children_named("arch").count(), 5);
        assert_eq!(canopies[Side::East.index()].children_named("post").count(), 4);

        roof_config.sides[Side::West.index()] = crate::systems::stadium::SideRoof {
            custom: true,
            enabled: false,
            ..default()
        };
        roof_config.sides[Side::North.index()].custom = true;
        roof_config.sides[Side::North.index()].height = 28.0;
        let roof = build_roof(&football(), &StandConfig::default(), &roof_config);
        assert_eq!(roof.children_named("canopy").count(), 3);

        let north = roof.children_named("canopy").next().unwrap();
        let slab = north.children_named("canopy_slab").next().unwrap();
        assert!((slab.transform.translation.y + ROOF_THICKNESS / 2.0 - 28.0).abs() < 1e-4);
    }

    #[test]
    fn test_canopy_defaults_follow_stand_height() {
        let mut stands = StandConfig::default();
        stands.sides[Side::East.index()].custom = true;
        stands.sides[Side::East.index()].height = 22.0;
        let roof_config = RoofConfig { style: RoofStyle::PerSide, ..default() };

        let roof = build_roof(&football(), &stands, &roof_config);
        let east = roof.children_named("canopy").nth(Side::East.index()).unwrap();
        let (_, max) = east.children_named("canopy_slab").next().unwrap().bounds().unwrap();
        assert!((max.y - (22.0 + ROOF_CLEARANCE)).abs() < 1e-4);
    }
}
