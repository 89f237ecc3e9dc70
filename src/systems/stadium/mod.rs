// this is the entry point for the stadium generation plugin
use bevy::prelude::*;

use crate::config::*;

pub mod assembly;
pub mod layout;

pub use assembly::{Builder, EditDebounce, RebuildScope, SceneState};

// sport being played, decides the pitch and its dimensions
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sport {
    #[default]
    Football,
    Cricket,
}

/// Playing surface size, fixed per sport.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FieldSpec {
    pub sport: Sport,
    pub length: f32, // along X
    pub width: f32,  // along Z
}

impl FieldSpec {
    pub fn for_sport(sport: Sport) -> Self {
        match sport {
            Sport::Football => Self {
                sport,
                length: FOOTBALL_LENGTH,
                width: FOOTBALL_WIDTH,
            },
            Sport::Cricket => Self {
                sport,
                length: CRICKET_RADIUS * 2.0,
                width: CRICKET_RADIUS * 2.0 * CRICKET_ASPECT,
            },
        }
    }
}

// the four stand positions around the pitch
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    North, // -Z
    South, // +Z
    East,  // +X
    West,  // -X
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];

    pub fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::South => 1,
            Side::East => 2,
            Side::West => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::North => "North",
            Side::South => "South",
            Side::East => "East",
            Side::West => "West",
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StandShape {
    #[default]
    Rectangular,
    Curved,     // depth and length recede at different rates
    Asymmetric, // one end of every tier stays flush
}

/// Per-side stand settings, only used when `custom` is set.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SideStand {
    pub custom: bool,
    pub height: f32,
    pub tiers: u32,
    pub color: Color,
    pub seat_color: Color,
}

impl Default for SideStand {
    fn default() -> Self {
        Self {
            custom: false,
            height: STAND_HEIGHT,
            tiers: STAND_TIERS,
            color: STAND_COLOR,
            seat_color: SEAT_COLOR,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PremiumTier {
    pub enabled: bool,
    pub tier: u32, // zero-based, counted from the ground up
    pub stand_color: Color,
    pub seat_color: Color,
}

impl Default for PremiumTier {
    fn default() -> Self {
        Self {
            enabled: false,
            tier: 1,
            stand_color: PREMIUM_STAND_COLOR,
            seat_color: PREMIUM_SEAT_COLOR,
        }
    }
}

// stadium footprint multipliers, independent of the pitch size
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Footprint {
    pub width: f32,
    pub length: f32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self { width: 1.0, length: 1.0 }
    }
}

/// Stand parameters. Tier shrink is not clamped here: the panel ranges keep
/// `tiers * tier_spacing` well below the stand depth.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StandConfig {
    pub height: f32,
    pub tiers: u32,
    pub color: Color,
    pub seat_color: Color,
    pub tier_spacing: f32,
    pub shape: StandShape,
    pub sides: [SideStand; 4],
    pub premium: PremiumTier,
    pub bowl_corners: f32, // 0 = open corners, 1 = full quarter cylinder
    pub footprint: Footprint,
}

impl Default for StandConfig {
    fn default() -> Self {
        Self {
            height: STAND_HEIGHT,
            tiers: STAND_TIERS,
            color: STAND_COLOR,
            seat_color: SEAT_COLOR,
            tier_spacing: TIER_SPACING,
            shape: StandShape::default(),
            sides: [SideStand::default(); 4],
            premium: PremiumTier::default(),
            bowl_corners: 0.0,
            footprint: Footprint::default(),
        }
    }
}

/// Stand settings for one side after falling back to the global values.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ResolvedStand {
    pub height: f32,
    pub tiers: u32,
    pub color: Color,
    pub seat_color: Color,
}

impl StandConfig {
    pub fn resolve(&self, side: Side) -> ResolvedStand {
        let custom = &self.sides[side.index()];
        if custom.custom {
            ResolvedStand {
                height: custom.height,
                tiers: custom.tiers.max(1),
                color: custom.color,
                seat_color: custom.seat_color,
            }
        } else {
            ResolvedStand {
                height: self.height,
                tiers: self.tiers.max(1),
                color: self.color,
                seat_color: self.seat_color,
            }
        }
    }

    pub fn tallest(&self) -> f32 {
        Side::ALL
            .iter()
            .map(|&side| self.resolve(side).height)
            .fold(0.0, f32::max)
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoofStyle {
    #[default]
    Unified, // one ring over all stands
    PerSide, // independent canopies
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SideRoof {
    pub custom: bool,
    pub enabled: bool,
    pub height: f32,
    pub color: Color,
    pub opacity: f32,
}

impl Default for SideRoof {
    fn default() -> Self {
        Self {
            custom: false,
            enabled: true,
            height: STAND_HEIGHT + ROOF_CLEARANCE,
            color: ROOF_COLOR,
            opacity: ROOF_OPACITY,
        }
    }
}

/// Roof parameters. `opacity` is the transparency control: 1 is opaque.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RoofConfig {
    pub style: RoofStyle,
    pub color: Color,
    pub opacity: f32,
    pub support_color: Color,
    pub grid_texture: bool,
    pub sides: [SideRoof; 4],
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self {
            style: RoofStyle::default(),
            color: ROOF_COLOR,
            opacity: ROOF_OPACITY,
            support_color: SUPPORT_COLOR,
            grid_texture: false,
            sides: [SideRoof::default(); 4],
        }
    }
}

/// Canopy settings for one side after falling back to the global values.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ResolvedRoof {
    pub enabled: bool,
    pub height: f32,
    pub color: Color,
    pub opacity: f32,
}

impl RoofConfig {
    pub fn resolve(&self, side: Side, stand_height: f32) -> ResolvedRoof {
        let custom = &self.sides[side.index()];
        if custom.custom {
            ResolvedRoof {
                enabled: custom.enabled,
                height: custom.height,
                color: custom.color,
                opacity: custom.opacity,
            }
        } else {
            ResolvedRoof {
                enabled: true,
                height: stand_height + ROOF_CLEARANCE,
                color: self.color,
                opacity: self.opacity,
            }
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LightStyle {
    #[default]
    FloodCorner,  // corner mast, 3 fixtures
    ModernBank,   // two side towers, 8 fixtures each
    ClassicPole,  // corner poles, 6 radial fixtures
    AngledCorner, // corner poles with an overhead arm of 4 fixtures
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LightConfig {
    pub style: LightStyle,
    pub pole_height: f32,
    pub color: Color,
    pub intensity: f32,
    pub enabled: bool,
    pub shadows: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            style: LightStyle::default(),
            pole_height: LIGHT_POLE_HEIGHT,
            color: LIGHT_COLOR,
            intensity: LIGHT_INTENSITY,
            enabled: true,
            shadows: false,
        }
    }
}

// stadium generation parameters, edited by the panel
#[derive(Resource, Default, Clone, Copy, PartialEq, Debug)]
pub struct StadiumParams {
    pub sport: Sport,
    pub stands: StandConfig,
    pub roof: RoofConfig,
    pub lights: LightConfig,
}

impl StadiumParams {
    pub fn field(&self) -> FieldSpec {
        FieldSpec::for_sport(self.sport)
    }
}

// what a panel edit touched
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditKind {
    Sport,
    Stands,
    Roof,
    Lights,
    LightSwitch, // on/off only, never rebuilds
}

// Event for a parameter edit, debounced before it turns into a rebuild
#[derive(Event, Clone, Copy, Debug)]
pub struct StadiumEdit {
    pub kind: EditKind,
}

// Event for an immediate rebuild of the given builders
#[derive(Event, Clone, Copy, Debug)]
pub struct RebuildEvent {
    pub scope: RebuildScope,
}

// main plugin for stadium generation
pub struct StadiumPlugin;

impl Plugin for StadiumPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(StadiumParams::default())
            .insert_resource(SceneState::default())
            .insert_resource(EditDebounce::new(std::time::Duration::from_millis(REBUILD_DEBOUNCE_MS)))

            .add_event::<StadiumEdit>()
            .add_event::<RebuildEvent>()

            // build everything once on start
            .add_systems(Startup, |mut rebuilds: EventWriter<RebuildEvent>| {
                rebuilds.write(RebuildEvent { scope: RebuildScope::ALL });
            })
            .add_systems(
                Update,
                (
                    assembly::debounce_edits,
                    assembly::handle_rebuild,
                    assembly::switch_floodlights,
                )
                    .chain(),
            );
    }
}
