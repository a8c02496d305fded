use glam::IVec3;
use kinetic_anim::StructureKind;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::MovementDirection;
use kinetic_core::types::WorldId;
use kinetic_engine::StructureData;
use kinetic_world::{MemoryBlock, MemoryWorld};

pub const BENCH_WORLD: WorldId = WorldId(0);

/// Distance between neighbouring structures of one scene, in blocks.
const SPACING: i32 = 32;
const GROUND_Y: i32 = 64;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub kind: StructureKind,
    pub open_direction: MovementDirection,
    /// Number of identical structures laid out on a grid.
    pub copies: u32,
    /// Width (x) and height (y) of each structure.
    pub width: i32,
    pub height: i32,
    /// Requested animation duration in seconds.
    pub duration_secs: f64,
}

/// One scene per archetype, plus a crowd of hinged doors.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let single = |name, kind, open_direction, width, height| SceneConfig {
        name,
        kind,
        open_direction,
        copies: 1,
        width,
        height,
        duration_secs: 2.0,
    };
    vec![
        single("big-door", StructureKind::BigDoor, MovementDirection::Clockwise, 8, 12),
        single(
            "revolving-door",
            StructureKind::RevolvingDoor { quarter_circles: 4 },
            MovementDirection::Counterclockwise,
            8,
            12,
        ),
        single(
            "portcullis",
            StructureKind::Portcullis { blocks_to_move: 0 },
            MovementDirection::Up,
            10,
            10,
        ),
        single("drawbridge", StructureKind::Drawbridge, MovementDirection::North, 7, 14),
        single(
            "windmill",
            StructureKind::Windmill { quarter_circles: 4 },
            MovementDirection::East,
            15,
            15,
        ),
        single("garage-door", StructureKind::GarageDoor, MovementDirection::South, 6, 5),
        single("flag", StructureKind::Flag, MovementDirection::East, 12, 6),
        SceneConfig {
            name: "crowd",
            kind: StructureKind::BigDoor,
            open_direction: MovementDirection::Clockwise,
            copies: 64,
            width: 4,
            height: 6,
            duration_secs: 2.0,
        },
    ]
}

/// Grid origin of the `index`-th copy.
fn layout_origin(index: u32) -> IVec3 {
    let side = 8;
    let i = index as i32;
    IVec3::new((i % side) * SPACING, GROUND_Y, (i / side) * SPACING)
}

/// Cuboid and rotation point of one structure whose anchor is at `origin`.
fn shape(config: &SceneConfig, origin: IVec3) -> (Cuboid, IVec3) {
    let (w, h) = (config.width, config.height);
    match config.kind {
        // Leaf runs south from the hinge.
        StructureKind::BigDoor | StructureKind::RevolvingDoor { .. } => (
            Cuboid::new(origin, origin + IVec3::new(0, h - 1, w - 1)),
            origin,
        ),
        // Sails centred on the hub.
        StructureKind::Windmill { .. } => {
            let r = IVec3::new(w / 2, h / 2, 0);
            let hub = origin + r;
            (Cuboid::new(hub - r, hub + r), hub)
        }
        // Cloth starts one block east of the pole.
        StructureKind::Flag => (
            Cuboid::new(origin + IVec3::X, origin + IVec3::new(w, h - 1, 0)),
            origin,
        ),
        StructureKind::Portcullis { .. }
        | StructureKind::Drawbridge
        | StructureKind::GarageDoor => (
            Cuboid::new(origin, origin + IVec3::new(w - 1, h - 1, 0)),
            origin,
        ),
    }
}

/// Structures of a scene and a world holding their blocks.
pub fn build_scene(config: &SceneConfig) -> (MemoryWorld, Vec<StructureData>) {
    let mut world = MemoryWorld::new();
    let mut structures = Vec::with_capacity(config.copies as usize);

    for index in 0..config.copies {
        let (cuboid, rotation_point) = shape(config, layout_origin(index));
        let material = (index % 16) as u16 + 1;
        world.fill(BENCH_WORLD, &cuboid, MemoryBlock::new(material));
        structures.push(StructureData {
            name: format!("{}-{index}", config.name),
            kind: config.kind,
            world: BENCH_WORLD,
            cuboid,
            rotation_point,
            is_open: false,
            open_direction: config.open_direction,
        });
    }

    (world, structures)
}
