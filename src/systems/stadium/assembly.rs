// turns layout trees into entities and keeps track of what each builder owns

use std::time::Duration;

use bevy::pbr::wireframe::Wireframe;
use bevy::prelude::*;
use bevy::render::render_resource::Face;

use crate::config::LUMENS_PER_INTENSITY;
use super::layout::{fixtures, lights, mesh_gen, pitch, roof, stands};
use super::layout::{NodeContent, Part, SceneNode, Surface, Texture};
use super::{EditKind, RebuildEvent, StadiumEdit, StadiumParams};

/// One independently rebuilt part of the scene.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Builder {
    Pitch,
    Fixtures,
    Stands,
    Roof,
    Lights,
}

impl Builder {
    pub const ALL: [Builder; 5] = [
        Builder::Pitch,
        Builder::Fixtures,
        Builder::Stands,
        Builder::Roof,
        Builder::Lights,
    ];

    pub fn index(self) -> usize {
        match self {
            Builder::Pitch => 0,
            Builder::Fixtures => 1,
            Builder::Stands => 2,
            Builder::Roof => 3,
            Builder::Lights => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Builder::Pitch => "pitch",
            Builder::Fixtures => "fixtures",
            Builder::Stands => "stands",
            Builder::Roof => "roof",
            Builder::Lights => "lights",
        }
    }

    /// Lays out this builder's subtree. `None` when there is nothing to show,
    /// e.g. goals on a cricket ground.
    pub fn build(self, params: &StadiumParams) -> Option<SceneNode> {
        let field = params.field();
        match self {
            Builder::Pitch => Some(pitch::build_pitch(&field)),
            Builder::Fixtures => fixtures::build_fixtures(&field),
            Builder::Stands => Some(stands::build_stands(&field, &params.stands)),
            Builder::Roof => Some(roof::build_roof(&field, &params.stands, &params.roof)),
            Builder::Lights => Some(lights::build_lights(&field, &params.stands, &params.lights)),
        }
    }
}

/// Set of builders due for a rebuild.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct RebuildScope(u8);

impl RebuildScope {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1_1111);

    pub fn only(builder: Builder) -> Self {
        Self(1 << builder.index())
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, builder: Builder) -> bool {
        self.0 & (1 << builder.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Builders in the scope, in build order.
    pub fn builders(self) -> impl Iterator<Item = Builder> {
        Builder::ALL.into_iter().filter(move |&builder| self.contains(builder))
    }

    /// What an edit invalidates. Roof and lights follow the stands, the sport changes everything.
    pub fn for_edit(kind: EditKind) -> Self {
        match kind {
            EditKind::Sport => Self::ALL,
            EditKind::Stands => Self::only(Builder::Stands)
                .union(Self::only(Builder::Roof))
                .union(Self::only(Builder::Lights)),
            EditKind::Roof => Self::only(Builder::Roof),
            EditKind::Lights => Self::only(Builder::Lights),
            EditKind::LightSwitch => Self::NONE,
        }
    }
}

// tags every spawned stadium entity
#[derive(Component, Clone, Copy, Debug)]
pub struct StadiumPart {
    pub builder: Builder,
    pub part: Part,
}

// spot light owned by a floodlight fixture, remembers its switched-on output
#[derive(Component, Clone, Copy, Debug)]
pub struct Floodlight {
    pub lumens: f32,
}

/// Everything one builder put into the world.
#[derive(Debug)]
pub struct LiveSubtree {
    pub root: Entity,
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
    pub images: Vec<Handle<Image>>,
    pub floodlights: Vec<Entity>,
    pub lenses: Vec<(Handle<StandardMaterial>, LinearRgba)>,
}

impl LiveSubtree {
    fn new() -> Self {
        Self {
            root: Entity::PLACEHOLDER,
            meshes: Vec::new(),
            materials: Vec::new(),
            images: Vec::new(),
            floodlights: Vec::new(),
            lenses: Vec::new(),
        }
    }
}

// currently live subtree per builder
#[derive(Resource, Default, Debug)]
pub struct SceneState {
    slots: [Option<LiveSubtree>; 5],
}

impl SceneState {
    pub fn slot(&self, builder: Builder) -> Option<&LiveSubtree> {
        self.slots[builder.index()].as_ref()
    }

    pub fn slot_mut(&mut self, builder: Builder) -> &mut Option<LiveSubtree> {
        &mut self.slots[builder.index()]
    }
}

// asset stores a spawn writes into
pub struct AssetSinks<'a> {
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub images: &'a mut Assets<Image>,
}

pub fn material_for(surface: &Surface, texture: Option<Handle<Image>>) -> StandardMaterial {
    StandardMaterial {
        base_color: surface.color.with_alpha(surface.opacity),
        base_color_texture: texture,
        emissive: surface.emissive.map(|c| c.to_linear()).unwrap_or(LinearRgba::BLACK),
        unlit: surface.unlit,
        double_sided: surface.double_sided,
        cull_mode: if surface.double_sided { None } else { Some(Face::Back) },
        alpha_mode: if surface.opacity < 1.0 { AlphaMode::Blend } else { AlphaMode::Opaque },
        perceptual_roughness: 0.8,
        ..default()
    }
}

/// Despawns a subtree and drops every asset it created.
pub fn teardown(commands: &mut Commands, sinks: &mut AssetSinks, live: LiveSubtree) {
    commands.entity(live.root).try_despawn();
    for mesh in &live.meshes {
        sinks.meshes.remove(mesh);
    }
    for material in &live.materials {
        sinks.materials.remove(material);
    }
    for image in &live.images {
        sinks.images.remove(image);
    }
}

fn spawn_node(
    commands: &mut Commands,
    sinks: &mut AssetSinks,
    builder: Builder,
    node: &SceneNode,
    lights_on: bool,
    live: &mut LiveSubtree,
) -> Entity {
    let mut entity = commands.spawn((
        Name::new(node.name),
        StadiumPart { builder, part: node.part },
        node.transform,
        Visibility::default(),
    ));

    match &node.content {
        NodeContent::Group => {}
        NodeContent::Mesh { shape, surface } => {
            let texture = surface.texture.map(|texture| match texture {
                Texture::RoofGrid => {
                    let image = sinks.images.add(mesh_gen::roof_grid_image());
                    live.images.push(image.clone());
                    image
                }
            });
            let mesh = sinks.meshes.add(mesh_gen::shape_to_mesh(shape));
            let material = sinks.materials.add(material_for(surface, texture));
            live.meshes.push(mesh.clone());
            live.materials.push(material.clone());

            if node.part == Part::Lens {
                let glow = surface.emissive.map(|c| c.to_linear()).unwrap_or(LinearRgba::BLACK);
                live.lenses.push((material.clone(), glow));
                if !lights_on {
                    if let Some(lens) = sinks.materials.get_mut(&material) {
                        lens.emissive = LinearRgba::BLACK;
                    }
                }
            }

            entity.insert((Mesh3d(mesh), MeshMaterial3d(material)));
            if surface.wireframe {
                entity.insert(Wireframe);
            }
        }
        NodeContent::Light(source) => {
            let lumens = source.intensity * LUMENS_PER_INTENSITY;
            entity.insert((
                SpotLight {
                    color: source.color,
                    intensity: if lights_on { lumens } else { 0.0 },
                    range: source.range,
                    inner_angle: source.inner_angle,
                    outer_angle: source.outer_angle,
                    shadows_enabled: source.shadows,
                    ..default()
                },
                Floodlight { lumens },
            ));
            live.floodlights.push(entity.id());
        }
    }

    let id = entity.id();
    let children: Vec<Entity> = node
        .children
        .iter()
        .map(|child| spawn_node(commands, sinks, builder, child, lights_on, live))
        .collect();
    if !children.is_empty() {
        commands.entity(id).add_children(&children);
    }
    id
}

/// Spawns a layout tree, recording what it creates.
pub fn spawn_subtree(
    commands: &mut Commands,
    sinks: &mut AssetSinks,
    builder: Builder,
    node: &SceneNode,
    lights_on: bool,
) -> LiveSubtree {
    let mut live = LiveSubtree::new();
    let root = spawn_node(commands, sinks, builder, node, lights_on, &mut live);
    live.root = root;
    live
}

/// Tears down a builder's previous subtree, then builds and spawns the new one.
pub fn rebuild(
    commands: &mut Commands,
    sinks: &mut AssetSinks,
    state: &mut SceneState,
    params: &StadiumParams,
    builder: Builder,
) {
    if let Some(previous) = state.slot_mut(builder).take() {
        debug!(
            "tearing down {}: {} meshes, {} materials",
            builder.label(),
            previous.meshes.len(),
            previous.materials.len()
        );
        teardown(commands, sinks, previous);
    }

    let Some(node) = builder.build(params) else {
        debug!("{} has nothing to build for {:?}", builder.label(), params.sport);
        return;
    };

    let live = spawn_subtree(commands, sinks, builder, &node, params.lights.enabled);
    info!(
        "built {}: {} nodes, {} meshes, {} lights",
        builder.label(),
        node.node_count(),
        live.meshes.len(),
        live.floodlights.len()
    );
    *state.slot_mut(builder) = Some(live);
}

pub fn handle_rebuild(
    mut commands: Commands,
    mut events: EventReader<RebuildEvent>,
    params: Res<StadiumParams>,
    mut state: ResMut<SceneState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    // several requests in one frame collapse into one pass
    let scope = events.read().fold(RebuildScope::NONE, |scope, event| scope.union(event.scope));
    if scope.is_empty() {
        return;
    }

    let mut sinks = AssetSinks {
        meshes: &mut meshes,
        materials: &mut materials,
        images: &mut images,
    };
    for builder in scope.builders() {
        rebuild(&mut commands, &mut sinks, &mut state, &params, builder);
    }
}

/// Trailing-edge debounce: pending scopes fire once no edit arrived for a full window.
#[derive(Resource, Debug)]
pub struct EditDebounce {
    timer: Timer,
    pending: RebuildScope,
}

impl EditDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            timer: Timer::new(window, TimerMode::Once),
            pending: RebuildScope::NONE,
        }
    }

    pub fn push(&mut self, scope: RebuildScope) {
        self.pending = self.pending.union(scope);
        self.timer.reset();
    }

    pub fn pending(&self) -> RebuildScope {
        self.pending
    }

    pub fn tick(&mut self, delta: Duration) -> Option<RebuildScope> {
        if self.pending.is_empty() {
            return None;
        }
        self.timer.tick(delta);
        if !self.timer.finished() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}

pub fn debounce_edits(
    time: Res<Time>,
    mut edits: EventReader<StadiumEdit>,
    mut debounce: ResMut<EditDebounce>,
    mut rebuilds: EventWriter<RebuildEvent>,
) {
    let mut edited = false;
    for edit in edits.read() {
        let scope = RebuildScope::for_edit(edit.kind);
        if !scope.is_empty() {
            debounce.push(scope);
            edited = true;
        }
    }
    // the window starts after the frame holding the last edit
    if edited {
        return;
    }

    if let Some(scope) = debounce.tick(time.delta()) {
        debug!("debounced edits fire a rebuild of {scope:?}");
        rebuilds.write(RebuildEvent { scope });
    }
}

/// Applies the floodlight on/off switch to the live lights, geometry untouched.
pub fn switch_floodlights(
    mut edits: EventReader<StadiumEdit>,
    params: Res<StadiumParams>,
    state: Res<SceneState>,
    mut spots: Query<(&mut SpotLight, &Floodlight)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let switched = edits.read().filter(|edit| edit.kind == EditKind::LightSwitch).count();
    if switched == 0 {
        return;
    }
    let Some(live) = state.slot(Builder::Lights) else {
        return;
    };

    let on = params.lights.enabled;
    for &entity in &live.floodlights {
        if let Ok((mut spot, floodlight)) = spots.get_mut(entity) {
            spot.intensity = if on { floodlight.lumens } else { 0.0 };
        }
    }
    for (handle, glow) in &live.lenses {
        if let Some(lens) = materials.get_mut(handle) {
            lens.emissive = if on { *glow } else { LinearRgba::BLACK };
        }
    }
    info!("floodlights {}", if on { "on" } else { "off" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::Sport;

    #[test]
    fn test_edit_cascade() {
        let stands = RebuildScope::for_edit(EditKind::Stands);
        assert!(!stands.contains(Builder::Pitch));
        assert!(!stands.contains(Builder::Fixtures));
        assert!(stands.contains(Builder::Stands) && stands.contains(Builder::Roof) && stands.contains(Builder::Lights));

        assert_eq!(RebuildScope::for_edit(EditKind::Sport), RebuildScope::ALL);
        assert_eq!(RebuildScope::for_edit(EditKind::Roof).builders().collect::<Vec<_>>(), vec![Builder::Roof]);
        assert!(RebuildScope::for_edit(EditKind::LightSwitch).is_empty());
    }

    #[test]
    fn test_scope_iterates_in_build_order() {
        let scope = RebuildScope::only(Builder::Lights).union(RebuildScope::only(Builder::Pitch));
        assert_eq!(scope.builders().collect::<Vec<_>>(), vec![Builder::Pitch, Builder::Lights]);
        assert_eq!(RebuildScope::ALL.builders().count(), 5);
    }

    #[test]
    fn test_debounce_trailing_edge() {
        let mut debounce = EditDebounce::new(Duration::from_millis(100));
        assert_eq!(debounce.tick(Duration::from_millis(500)), None);

        debounce.push(RebuildScope::only(Builder::Roof));
        assert_eq!(debounce.tick(Duration::from_millis(60)), None);
        // a new edit restarts the window and merges the scope
        debounce.push(RebuildScope::only(Builder::Lights));
        assert_eq!(debounce.tick(Duration::from_millis(60)), None);
        let fired = debounce.tick(Duration::from_millis(60)).unwrap();
        assert!(fired.contains(Builder::Roof) && fired.contains(Builder::Lights));

        assert!(debounce.pending().is_empty());
        assert_eq!(debounce.tick(Duration::from_millis(200)), None);
    }

    #[test]
    fn test_builders_follow_the_sport() {
        let mut params = StadiumParams::default();
        assert!(Builder::Fixtures.build(&params).is_some());
        params.sport = Sport::Cricket;
        assert!(Builder::Fixtures.build(&params).is_none());
        for builder in [Builder::Pitch, Builder::Stands, Builder::Roof, Builder::Lights] {
            let node = builder.build(&params).unwrap();
            assert_eq!(node.count_where(|n| n.part.is_football_only()), 0, "{builder:?}");
        }
    }

    #[test]
    fn test_material_for_translucent_surface() {
        let material = material_for(&Surface::translucent(Color::WHITE, 0.3), None);
        assert!(matches!(material.alpha_mode, AlphaMode::Blend));
        assert!(material.cull_mode.is_none());
        assert!((material.base_color.alpha() - 0.3).abs() < 1e-6);

        let solid = material_for(&Surface::solid(Color::BLACK), None);
        assert!(matches!(solid.alpha_mode, AlphaMode::Opaque));
        assert_eq!(solid.cull_mode, Some(Face::Back));
    }
}
