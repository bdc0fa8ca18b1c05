use std::rc::Rc;

use anyhow::bail;
use clap::Parser;
use glam::{Mat4, Vec3};
use log::{info, warn};

use wonderland::io::common::loader::RawAssetLoader;
use wonderland::io::fs::loader::FsLoader;
use wonderland::rendering::asset_cache::model_cache::ModelCache;
use wonderland::rendering::backend::headless::HeadlessBackend;
use wonderland::rendering::loader::model_loader::ModelLoader;
use wonderland::settings::{CliArgs, OperationMode, Vector3};
use wonderland::world::coordinate_systems::cell_origin;
use wonderland::world::decoration::{Decoration, decoration_for_cell};
use wonderland::world::world_manager::WorldManager;
use wonderland::world::{CellCoord, WorldAssets};

// Camera
const FOV_DEGREES: f32 = 60.0;
const ASPECT_RATIO: f32 = 1024.0 / 768.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 3000.0;

const LIGHT_POSITION: Vec3 = Vec3::new(0.0, 1000.0, 0.0);
const LIGHT_INTENSITY: Vec3 = Vec3::new(1.0, 0.97, 0.9);

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    match args.operation_mode {
        OperationMode::Flythrough {
            start,
            heading,
            speed,
            frames,
            fps,
            cull,
        } => flythrough(&args.asset_dir, start, heading, speed, frames, fps, cull),
        OperationMode::Inspect { cell_x, cell_z } => {
            inspect(CellCoord::new(cell_x, cell_z));
            Ok(())
        }
    }
}

fn flythrough(
    asset_dir: &str,
    start: Vector3,
    heading: Vector3,
    speed: f32,
    frames: u32,
    fps: f32,
    cull: bool,
) -> Result<(), anyhow::Error> {
    if !fps.is_finite() || fps <= 0.0 {
        bail!("fps has to be positive, got {}", fps);
    }

    let start = Vec3::from(start);
    let heading = Vec3::from(heading).normalize_or_zero();
    let look_direction = if heading == Vec3::ZERO { Vec3::NEG_Z } else { heading };

    let raw_loader: Rc<dyn RawAssetLoader> = Rc::new(FsLoader::new(asset_dir));
    let backend = Rc::new(HeadlessBackend::new());
    let model_cache = ModelCache::new(
        Box::new(ModelLoader::new(raw_loader.clone())),
        backend.clone(),
        raw_loader,
    );

    let mut world = WorldManager::new(model_cache, WorldAssets::default()).with_distance_culling(cull);
    let projection = Mat4::perspective_rh(FOV_DEGREES.to_radians(), ASPECT_RATIO, Z_NEAR, Z_FAR);

    info!(
        "Flying {} frames from {} along {} at {} units/s",
        frames, start, heading, speed
    );

    let dt = 1.0 / fps;
    let mut rendered = 0;
    let mut position = start;
    for frame in 0..frames {
        let time = frame as f32 * dt;
        position = start + heading * speed * time;

        world.update(position, dt, time);
        let view = Mat4::look_at_rh(position, position + look_direction, Vec3::Y);
        rendered += world.render(projection * view, LIGHT_POSITION, LIGHT_INTENSITY, position);
    }

    let stats = backend.stats();
    info!(
        "Arrived at {} in cell {:?}: {} grid rebuilds, {} chunks active, {} models cached",
        position,
        world.center_cell(),
        world.rebuild_count(),
        world.len(),
        world.model_cache().len()
    );
    info!(
        "{} chunk renders, {} draw calls, {} meshes uploaded, {} released",
        rendered, stats.draw_calls, stats.meshes_uploaded, stats.meshes_released
    );

    drop(world);
    if backend.live_mesh_count() > 0 || backend.stats().invalid_releases > 0 {
        warn!(
            "{} meshes leaked, {} invalid releases",
            backend.live_mesh_count(),
            backend.stats().invalid_releases
        );
    }

    Ok(())
}

fn inspect(cell: CellCoord) {
    let decoration = decoration_for_cell(cell);
    let kind = match &decoration {
        Decoration::Empty => "nothing",
        Decoration::Trees(_) => "trees",
        Decoration::AnimatedActor(_) => "an animated actor",
        Decoration::StaticProp(_) => "a static prop",
    };

    println!(
        "Cell {} (seed {}, origin {}) contains {}",
        cell,
        cell.seed(),
        cell_origin(cell),
        kind
    );
    for placement in decoration.placements() {
        println!(
            "  at {} rotated {:.1} degrees, scale {:.2}",
            placement.translation, placement.rotation_degrees, placement.scale
        );
    }
}
