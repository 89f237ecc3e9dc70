// Configuration file, all measurements in metres (1 unit = 1 metre)
// This controls the initial generation parameter settings

use bevy::color::Color;

// Pitch dimensions
pub const FOOTBALL_LENGTH: f32 = 105.0;
pub const FOOTBALL_WIDTH: f32 = 68.0;
pub const CRICKET_RADIUS: f32 = 60.0;     // radius along the long axis
pub const CRICKET_ASPECT: f32 = 0.85;     // short axis = radius * aspect
pub const CRICKET_SEGMENTS: usize = 64;

// Markings (FIFA dimensions)
pub const LINE_WIDTH: f32 = 0.12;
pub const LINE_HEIGHT: f32 = 0.02;        // lift above the grass to avoid z-fighting
pub const CENTER_CIRCLE_RADIUS: f32 = 9.15;
pub const CENTER_CIRCLE_SEGMENTS: usize = 64;
pub const SPOT_RADIUS: f32 = 0.2;
pub const PENALTY_AREA_DEPTH: f32 = 16.5;
pub const PENALTY_AREA_WIDTH: f32 = 40.3;
pub const GOAL_AREA_DEPTH: f32 = 5.5;
pub const GOAL_AREA_WIDTH: f32 = 18.32;
pub const PENALTY_SPOT_DISTANCE: f32 = 11.0;
pub const CORNER_ARC_RADIUS: f32 = 1.0;
pub const CORNER_ARC_SEGMENTS: usize = 16;

// Goals and corner flags
pub const GOAL_WIDTH: f32 = 7.32;
pub const GOAL_HEIGHT: f32 = 2.44;
pub const GOAL_DEPTH: f32 = 2.0;
pub const GOAL_POST_THICKNESS: f32 = 0.1;
pub const NET_OPACITY: f32 = 0.3;
pub const FLAG_POLE_HEIGHT: f32 = 1.5;
pub const FLAG_POLE_RADIUS: f32 = 0.05;
pub const FLAG_WIDTH: f32 = 0.4;
pub const FLAG_HEIGHT: f32 = 0.3;

// Stands
pub const STAND_DEPTH: f32 = 20.0;
pub const STAND_HEIGHT: f32 = 15.0;
pub const STAND_TIERS: u32 = 3;
pub const TIER_SPACING: f32 = 0.8;        // per-tier shrink of the footprint
pub const MAX_TIERS: u32 = 5;
pub const SEAT_ROWS: usize = 10;
pub const PREMIUM_SEAT_ROWS: usize = 6;
pub const BASE_SLAB_RATIO: f32 = 0.3;     // share of a tier taken by its base slab
pub const SEATING_RATIO: f32 = 0.7;       // share of a tier taken by seat rows
pub const SUPPORT_SPACING: f32 = 10.0;
pub const PREMIUM_DIVIDER_SPACING: f32 = 8.0;
pub const TUNNEL_SPACING: f32 = 25.0;
pub const TUNNEL_WIDTH: f32 = 4.0;
pub const TUNNEL_HEIGHT: f32 = 3.0;
pub const TUNNEL_DEPTH: f32 = 3.0;
pub const CURVED_DEPTH_RATE: f32 = 1.25;
pub const CURVED_LENGTH_RATE: f32 = 3.0;
pub const CORNER_SEGMENTS: usize = 16;

// Roof
pub const ROOF_CLEARANCE: f32 = 5.0;      // default roof height above its stand
pub const ROOF_THICKNESS: f32 = 0.5;
pub const ROOF_HOLE_RATIO: f32 = 0.7;
pub const ROOF_OPACITY: f32 = 0.7;
pub const ROOF_ARCH_COUNT: usize = 12;
pub const ARCH_RADIUS: f32 = 0.5;
pub const ARCH_RISE: f32 = 1.3;           // control point height relative to the roof
pub const ARCH_SEGMENTS: usize = 20;
pub const TUBE_RADIAL_SEGMENTS: usize = 8;
pub const CANOPY_OVERHANG: f32 = 6.0;
pub const CANOPY_STRUT_SPACING: f32 = 15.0;
pub const ROOF_TEXTURE_SIZE: u32 = 256;
pub const ROOF_TEXTURE_CELLS: u32 = 16;

// Floodlights
pub const LIGHT_POLE_HEIGHT: f32 = 35.0;
pub const LIGHT_INTENSITY: f32 = 1.5;
pub const LUMENS_PER_INTENSITY: f32 = 2_000_000.0;
pub const CORNER_MAST_OFFSET: f32 = 10.0;  // distance beyond each field corner
pub const BOWL_MAST_CLEARANCE: f32 = 4.0; // gap between a mast and the bowl corner seating
pub const LIGHT_RANGE: f32 = 300.0;
pub const SPOT_OUTER_ANGLE: f32 = 0.4;
pub const SPOT_PENUMBRA: f32 = 0.5;

// Rebuild coalescing window for slider drags
pub const REBUILD_DEBOUNCE_MS: u64 = 100;

// Palette
pub const GRASS_COLOR: Color = Color::srgb(0.133, 0.545, 0.133);
pub const MARKING_COLOR: Color = Color::WHITE;
pub const STAND_COLOR: Color = Color::srgb(0.102, 0.102, 0.102);
pub const SEAT_COLOR: Color = Color::srgb(0.502, 0.502, 0.502);
pub const RAILING_COLOR: Color = Color::WHITE;
pub const TUNNEL_COLOR: Color = Color::srgb(0.03, 0.03, 0.03);
pub const PREMIUM_SEAT_COLOR: Color = Color::srgb(0.55, 0.05, 0.08);
pub const PREMIUM_STAND_COLOR: Color = Color::srgb(0.17, 0.15, 0.12);
pub const DIVIDER_COLOR: Color = Color::srgb(0.78, 0.65, 0.3);
pub const ROOF_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);
pub const SUPPORT_COLOR: Color = Color::srgb(0.533, 0.533, 0.533);
pub const FLAG_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const POLE_COLOR: Color = Color::srgb(0.533, 0.533, 0.533);
pub const FIXTURE_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);
pub const LIGHT_COLOR: Color = Color::srgb(1.0, 1.0, 0.8);
