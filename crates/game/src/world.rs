//! Battle entities in a hecs world: scattered rocks, enemies and dust,
//! plus the short-lived explosions spawned when targets are destroyed.

use std::time::Duration;

use engine_core::{basis_from_euler_xyz, Debounce, Transform, TransformRaw, Vec3};
use hecs::{Entity, World};
use physics::{TargetingRay, DEFAULT_TARGETING_RANGE};
use procgen::{scatter, Curve, ScatterObject, ScatterSpec, TrackSampler};
use rand::Rng;

use crate::score::HitKind;
use crate::state::GameState;

pub const EXPLOSION_LIFETIME: Duration = Duration::from_secs(1);
pub const EXPLOSION_PARTICLES: usize = 20;
/// Particle speed per frame.
pub const EXPLOSION_SPEED: f32 = 0.4;

/// Entity counts for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    pub enemies: usize,
    pub rocks: usize,
    pub particles: usize,
}

impl Population {
    pub fn for_state(state: GameState) -> Self {
        match state {
            GameState::Battle => Self {
                enemies: 10,
                rocks: 100,
                particles: 500,
            },
            _ => Self {
                enemies: 0,
                rocks: 0,
                particles: 50,
            },
        }
    }
}

/// A shootable object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub kind: HitKind,
    pub object: ScatterObject,
}

/// Background dust, never hit-tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dust(pub ScatterObject);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionColor {
    White,
    Orange,
}

impl ExplosionColor {
    pub fn rgb(self) -> [f32; 3] {
        match self {
            ExplosionColor::White => [1.0, 1.0, 1.0],
            ExplosionColor::Orange => [1.0, 0.5, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionParticle {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub guid: u64,
    pub origin: Vec3,
    pub started: Duration,
    pub color: ExplosionColor,
    pub particles: Vec<ExplosionParticle>,
}

/// Everything that lives only while a mode is running.
pub struct BattleWorld {
    world: World,
    initial: Population,
    next_guid: u64,
    explosion_cleanup: Debounce,
}

impl Default for BattleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleWorld {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            initial: Population {
                enemies: 0,
                rocks: 0,
                particles: 0,
            },
            next_guid: 0,
            explosion_cleanup: Debounce::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn initial(&self) -> Population {
        self.initial
    }

    /// Throw away every entity and scatter a fresh set for `state`.
    pub fn regenerate<C: Curve, R: Rng>(&mut self, state: GameState, track: &TrackSampler<C>, rng: &mut R) {
        self.world.clear();
        self.explosion_cleanup.cancel();

        let population = Population::for_state(state);
        let guid = &mut self.next_guid;
        let enemies = scatter(track, ScatterSpec::enemies(population.enemies), guid, rng);
        let rocks = scatter(track, ScatterSpec::rocks(population.rocks), guid, rng);
        let dust = scatter(track, ScatterSpec::particles(population.particles), guid, rng);

        for object in enemies {
            self.spawn_target(HitKind::Enemy, object);
        }
        for object in rocks {
            self.spawn_target(HitKind::Rock, object);
        }
        for object in dust {
            self.world.spawn((Dust(object), transform_of(&object)));
        }

        self.initial = population;
        log::info!(
            "Spawned {} enemies, {} rocks, {} particles for {}",
            population.enemies,
            population.rocks,
            population.particles,
            state
        );
    }

    /// Add one target outside the scatter pass.
    pub fn spawn_target(&mut self, kind: HitKind, object: ScatterObject) -> Entity {
        self.world.spawn((Target { kind, object }, transform_of(&object)))
    }

    pub fn count(&self, kind: HitKind) -> usize {
        self.world
            .query::<&Target>()
            .iter()
            .filter(|(_, target)| target.kind == kind)
            .count()
    }

    pub fn particle_count(&self) -> usize {
        self.world.query::<&Dust>().iter().count()
    }

    pub fn explosion_count(&self) -> usize {
        self.world.query::<&Explosion>().iter().count()
    }

    /// Targets whose hit box the ray passes through.
    pub fn targets_hit(&self, ray: &TargetingRay) -> Vec<(Entity, Target)> {
        self.world
            .query::<&Target>()
            .iter()
            .filter(|(_, target)| {
                ray.cast_cube(target.object.offset, target.object.half_size(), DEFAULT_TARGETING_RANGE)
                    .is_some()
            })
            .map(|(entity, target)| (entity, *target))
            .collect()
    }

    /// Remove the hit targets and leave two explosions where each one was.
    /// Returns how many targets of each kind were destroyed.
    pub fn destroy<R: Rng>(&mut self, hits: &[(Entity, Target)], now: Duration, rng: &mut R) -> (u32, u32) {
        let (mut rocks, mut enemies) = (0, 0);
        for (entity, target) in hits {
            if self.world.despawn(*entity).is_err() {
                continue;
            }
            match target.kind {
                HitKind::Rock => rocks += 1,
                HitKind::Enemy => enemies += 1,
            }
            for color in [ExplosionColor::White, ExplosionColor::Orange] {
                let explosion = self.make_explosion(target.object.offset, color, now, rng);
                self.world.spawn((explosion,));
            }
        }
        if rocks + enemies > 0 {
            self.explosion_cleanup.cancel();
            self.explosion_cleanup.schedule(now, EXPLOSION_LIFETIME);
        }
        (rocks, enemies)
    }

    fn make_explosion<R: Rng>(&mut self, origin: Vec3, color: ExplosionColor, now: Duration, rng: &mut R) -> Explosion {
        let guid = self.next_guid;
        self.next_guid += 1;
        let particles = (0..EXPLOSION_PARTICLES)
            .map(|_| {
                let direction = Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                )
                .normalize_or(Vec3::Y);
                ExplosionParticle {
                    position: origin,
                    velocity: direction * EXPLOSION_SPEED,
                }
            })
            .collect();
        Explosion {
            guid,
            origin,
            started: now,
            color,
            particles,
        }
    }

    /// Move explosion particles one frame and drop explosions past their
    /// lifetime once the cleanup timer fires.
    pub fn update_explosions(&mut self, now: Duration) {
        for (_, explosion) in self.world.query_mut::<&mut Explosion>() {
            for particle in &mut explosion.particles {
                particle.position += particle.velocity;
            }
        }

        if self.explosion_cleanup.fire(now) {
            let expired: Vec<Entity> = self
                .world
                .query::<&Explosion>()
                .iter()
                .filter(|(_, e)| now.saturating_sub(e.started) >= EXPLOSION_LIFETIME)
                .map(|(entity, _)| entity)
                .collect();
            for entity in expired {
                let _ = self.world.despawn(entity);
            }
        }
    }

    /// Instance transforms of every live target, for the renderer.
    pub fn target_instances(&self, kind: HitKind) -> Vec<TransformRaw> {
        self.world
            .query::<(&Target, &Transform)>()
            .iter()
            .filter(|(_, (target, _))| target.kind == kind)
            .map(|(_, (_, transform))| TransformRaw::from(*transform))
            .collect()
    }

    pub fn dust_instances(&self) -> Vec<TransformRaw> {
        self.world
            .query::<(&Dust, &Transform)>()
            .iter()
            .map(|(_, (_, transform))| TransformRaw::from(*transform))
            .collect()
    }

    pub fn explosions(&self) -> Vec<Explosion> {
        self.world
            .query::<&Explosion>()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.explosion_cleanup.cancel();
    }
}

fn transform_of(object: &ScatterObject) -> Transform {
    Transform::from_basis(object.offset, basis_from_euler_xyz(object.rotation), object.scale)
}
