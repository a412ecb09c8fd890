//! Game state and core simulation types
//!
//! The loop's private state lives in one explicit struct so that every step
//! (physics, collision, render) receives it by reference and tests can poke
//! at it without a drawing surface.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::viewport::Viewport;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Physics, spawning and scoring advance every tick
    Running,
    /// Frozen on the final frame until restart
    GameOver,
}

/// Things that happened during a tick, drained by the loop driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32 },
    Scored { score: u32 },
    GameOver { score: u32 },
    Restarted,
}

/// The player-controlled square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Side length
    pub size: f32,
    /// Vertical velocity (positive is down)
    pub vy: f32,
    pub grounded: bool,
}

impl Player {
    fn new(viewport: &Viewport, tuning: &Tuning) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            size: 0.0,
            vy: 0.0,
            grounded: true,
        };
        player.fit_to(viewport, tuning);
        player
    }

    /// Resize for a new viewport and stand on the ground. Velocity is kept.
    pub fn fit_to(&mut self, viewport: &Viewport, tuning: &Tuning) {
        self.size = viewport.player_size(tuning);
        self.pos.x = viewport.player_x(tuning);
        self.pos.y = self.rest_y(viewport, tuning);
    }

    /// y of the top edge when standing on the ground
    #[inline]
    pub fn rest_y(&self, viewport: &Viewport, tuning: &Tuning) -> f32 {
        viewport.ground_y(tuning) - self.size
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }
}

/// A square obstacle scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Side length
    pub size: f32,
    /// Already scored (flips once)
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size
    }
}

/// Per-run counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    pub score: u32,
    /// Scroll speed (pixels per tick)
    pub speed: f32,
    /// Ticks simulated this run
    pub frame_index: u64,
    /// Frame of the most recent spawn
    pub last_spawn: Option<u64>,
}

impl Session {
    fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Running,
            score: 0,
            speed: tuning.start_speed,
            frame_index: 0,
            last_spawn: None,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub player: Player,
    /// Active obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    pub session: Session,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh run: Running, score 0, no obstacles, player on the ground
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            seed,
            player: Player::new(&viewport, &tuning),
            session: Session::new(&tuning),
            obstacles: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            viewport,
            tuning,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.session.phase == GamePhase::Running
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.session.score
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply a recomputed viewport. The player is resized and put back on
    /// the ground; velocity, obstacles and the session are untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!(
            "Viewport {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.scale_factor
        );
        self.viewport = viewport;
        self.player.fit_to(&self.viewport, &self.tuning);
    }

    /// Full reset to the initial run state (not a resume)
    pub fn restart(&mut self) {
        self.obstacles.clear();
        self.session = Session::new(&self.tuning);
        self.player.pos.y = self.player.rest_y(&self.viewport, &self.tuning);
        self.player.vy = 0.0;
        self.player.grounded = true;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    /// Place an obstacle of the given size standing on the ground at `x`
    pub fn push_obstacle(&mut self, x: f32, size: f32) -> u32 {
        let id = self.next_entity_id();
        let y = self.viewport.ground_y(&self.tuning) - size;
        self.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, y),
            size,
            passed: false,
        });
        id
    }

    /// Spawn a randomly sized obstacle just past the right edge
    pub fn spawn_obstacle(&mut self) -> u32 {
        let t = &self.tuning;
        let frac = if t.obstacle_size_max_frac > t.obstacle_size_min_frac {
            self.rng
                .random_range(t.obstacle_size_min_frac..=t.obstacle_size_max_frac)
        } else {
            t.obstacle_size_min_frac
        };
        let size = (self.viewport.width * frac).max(t.obstacle_min_px).round();
        let x = self.viewport.width + t.spawn_offset;

        let id = self.push_obstacle(x, size);
        self.events.push(GameEvent::Spawned { id });
        log::debug!(
            "Spawned obstacle {} (size {}) at frame {}",
            id,
            size,
            self.session.frame_index
        );
        id
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
