use std::rc::Rc;

use glam::Mat4;

use crate::rendering::asset_cache::model_cache::{ModelCache, ModelHandle};
use crate::rendering::backend::{DrawCall, FrameParams, RenderBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationClock {
    /// Accumulates the frame deltas, every instance has its own phase.
    #[default]
    Local,
    /// Follows the global time, all instances play in lockstep.
    Global,
}

/// A skinned model playing the first animation clip of its asset. The clip itself is shared
/// through the cache, the playback state belongs to the instance.
pub struct AnimatedModel {
    handle: ModelHandle,
    backend: Rc<dyn RenderBackend>,
    current_time: f32,
    is_playing: bool,
    playback_speed: f32,
    clock: AnimationClock,
}

impl AnimatedModel {
    pub fn load(cache: &ModelCache, path: &str) -> Option<Self> {
        let handle = cache.acquire(path)?;
        Some(Self {
            handle,
            backend: cache.backend().clone(),
            current_time: 0.0,
            is_playing: true,
            playback_speed: 1.0,
            clock: AnimationClock::default(),
        })
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// Unwrapped playback time, see [`Self::animation_phase`] for the position inside the clip.
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn clock(&self) -> AnimationClock {
        self.clock
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    pub fn reset_animation(&mut self) {
        self.current_time = 0.0;
    }

    pub fn set_clock(&mut self, clock: AnimationClock) {
        self.clock = clock;
    }

    fn duration(&self) -> Option<f32> {
        self.handle.model().animation.as_ref().map(|clip| clip.duration)
    }

    pub fn update(&mut self, dt: f32, global_time: f32) {
        if !self.is_playing || self.duration().is_none() {
            return;
        }

        match self.clock {
            AnimationClock::Local => self.current_time += dt * self.playback_speed,
            AnimationClock::Global => self.current_time = global_time * self.playback_speed,
        }
    }

    /// Position inside the clip, in seconds.
    pub fn animation_phase(&self) -> f32 {
        match self.duration() {
            Some(duration) if duration > 0.0 => self.current_time.rem_euclid(duration),
            _ => 0.0,
        }
    }

    pub fn render(&self, model_matrix: Mat4, frame: &FrameParams) {
        let animation_time = Some(self.animation_phase());
        for primitive in self.handle.model().primitives.iter().filter(|p| p.index_count > 0) {
            self.backend.draw(&DrawCall {
                mesh: primitive.mesh,
                texture: Some(primitive.texture),
                model_matrix,
                animation_time,
                frame,
            });
        }
    }
}
