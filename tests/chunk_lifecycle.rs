mod common;

use glam::{Mat4, Vec3};
use wonderland::rendering::backend::FrameParams;
use wonderland::rendering::models::animated_model::{AnimatedModel, AnimationClock};
use wonderland::world::WorldAssets;
use wonderland::world::chunk::Chunk;
use wonderland::world::decoration::Decoration;

use common::{ACTOR_CLIP_DURATION, Fixture, find_cells, is_actor, is_trees};

fn frame() -> FrameParams {
    FrameParams {
        view_projection: Mat4::IDENTITY,
        light_position: Vec3::new(0.0, 1000.0, 0.0),
        light_intensity: Vec3::ONE,
        view_position: Vec3::ZERO,
    }
}

#[test_log::test]
fn empty_cells_render_ground_only() -> Result<(), anyhow::Error> {
    let fixture = Fixture::new();
    let cell = *find_cells(Decoration::is_empty)
        .first()
        .ok_or(anyhow::anyhow!("no empty cell"))?;

    let mut chunk = Chunk::new(cell, 1);
    chunk.initialize(&fixture.cache, &fixture.assets);
    assert_eq!(chunk.decoration(), &Decoration::Empty);
    assert_eq!(fixture.total_loads(), 0);
    assert!(fixture.cache.is_empty());

    chunk.render(&frame());
    let draws = fixture.backend.take_draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].animation_time, None);
    Ok(())
}

#[test_log::test]
fn initialize_runs_once() -> Result<(), anyhow::Error> {
    let fixture = Fixture::new();
    let cell = *find_cells(is_trees).first().ok_or(anyhow::anyhow!("no trees"))?;

    let mut chunk = Chunk::new(cell, 1);
    chunk.initialize(&fixture.cache, &fixture.assets);
    chunk.initialize(&fixture.cache, &fixture.assets);

    assert_eq!(fixture.cache.reference_count(&fixture.assets.tree_model), 1);
    assert_eq!(fixture.backend.stats().meshes_uploaded, 2 + 1);
    Ok(())
}

#[test_log::test]
fn chunks_share_one_cache_entry() -> Result<(), anyhow::Error> {
    let fixture = Fixture::new();
    let cells = find_cells(is_trees);
    let (first_cell, second_cell) = match cells.as_slice() {
        [first, second, ..] => (*first, *second),
        _ => anyhow::bail!("Expected two tree cells"),
    };
    let tree = fixture.assets.tree_model.clone();

    let mut first = Chunk::new(first_cell, 1);
    let mut second = Chunk::new(second_cell, 2);
    first.initialize(&fixture.cache, &fixture.assets);
    second.initialize(&fixture.cache, &fixture.assets);

    assert_eq!(fixture.cache.len(), 1);
    assert_eq!(fixture.cache.reference_count(&tree), 2);
    assert_eq!(fixture.loads_of(&tree), 1);

    drop(first);
    assert!(fixture.cache.contains(&tree));
    assert_eq!(fixture.cache.reference_count(&tree), 1);
    assert_eq!(fixture.cache.evictions(), 0);

    drop(second);
    assert!(!fixture.cache.contains(&tree));
    assert_eq!(fixture.cache.evictions(), 1);
    assert_eq!(fixture.backend.live_mesh_count(), 0);
    assert_eq!(fixture.backend.stats().invalid_releases, 0);
    Ok(())
}

#[test_log::test]
fn missing_models_leave_the_ground() -> Result<(), anyhow::Error> {
    let fixture = Fixture::with_assets(WorldAssets {
        tree_model: "models/does_not_exist.gltf".to_string(),
        ..WorldAssets::default()
    });
    let cells = find_cells(is_trees);

    for (index, cell) in cells.iter().take(2).enumerate() {
        let mut chunk = Chunk::new(*cell, index as u64);
        chunk.initialize(&fixture.cache, &fixture.assets);
        assert!(chunk.static_model().is_none());
        assert!(matches!(chunk.decoration(), Decoration::Trees(_)));

        chunk.render(&frame());
        assert_eq!(fixture.backend.take_draws().len(), 1);
    }

    // failures are not cached, every chunk tries again
    assert_eq!(fixture.loads_of("models/does_not_exist.gltf"), 2);
    assert!(fixture.cache.is_empty());
    Ok(())
}

#[test_log::test]
fn actors_sharing_a_model_animate_independently() -> Result<(), anyhow::Error> {
    let fixture = Fixture::new();
    let path = fixture.assets.actor_model.clone();

    let mut walking = AnimatedModel::load(&fixture.cache, &path).ok_or(anyhow::anyhow!("actor"))?;
    let mut resting = AnimatedModel::load(&fixture.cache, &path).ok_or(anyhow::anyhow!("actor"))?;
    assert_eq!(fixture.loads_of(&path), 1);

    resting.pause();
    walking.set_playback_speed(2.0);
    assert!(!resting.is_playing());
    assert_eq!(walking.playback_speed(), 2.0);
    for _ in 0..3 {
        walking.update(0.5, 0.0);
        resting.update(0.5, 0.0);
    }

    assert_eq!(walking.current_time(), 3.0);
    assert_eq!(walking.animation_phase(), 3.0 % ACTOR_CLIP_DURATION);
    assert_eq!(resting.current_time(), 0.0);

    resting.play();
    resting.set_clock(AnimationClock::Global);
    assert_eq!(resting.clock(), AnimationClock::Global);
    assert_eq!(walking.clock(), AnimationClock::Local);
    resting.update(0.5, 5.0);
    assert_eq!(resting.current_time(), 5.0);
    assert_eq!(resting.animation_phase(), 1.0);

    walking.reset_animation();
    assert_eq!(walking.animation_phase(), 0.0);
    Ok(())
}

#[test_log::test]
fn actor_chunks_forward_updates() -> Result<(), anyhow::Error> {
    let fixture = Fixture::new();
    let cell = *find_cells(is_actor).first().ok_or(anyhow::anyhow!("no actor"))?;

    let mut chunk = Chunk::new(cell, 1);
    chunk.initialize(&fixture.cache, &fixture.assets);
    assert!(chunk.has_time_varying_content());

    chunk.update(0.25, 0.25);
    chunk.update(0.25, 0.5);
    assert_eq!(chunk.actor().map(|actor| actor.current_time()), Some(0.5));

    chunk.render(&frame());
    let draws = fixture.backend.take_draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[1].animation_time, Some(0.5));
    Ok(())
}
