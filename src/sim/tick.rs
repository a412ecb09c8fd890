//! Per-frame simulation tick
//!
//! One tick = physics & spawner, then the collision pass. Nothing advances
//! once the run is over; the caller keeps rendering the frozen frame.

use super::collision::overlaps;
use super::state::{GameEvent, GamePhase, GameState};

/// What a call to [`tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run is over, nothing changed
    Frozen,
    /// Simulation advanced, no collision
    Advanced,
    /// Simulation advanced and the player hit the obstacle with this ID
    Collided { obstacle: u32 },
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase() == GamePhase::GameOver {
        return TickOutcome::Frozen;
    }

    step_physics(state);

    match first_collision(state) {
        Some(obstacle) => {
            state.session.phase = GamePhase::GameOver;
            let score = state.session.score;
            state.events.push(GameEvent::GameOver { score });
            log::info!("Game over: hit obstacle {obstacle}, final score {score}");
            TickOutcome::Collided { obstacle }
        }
        None => TickOutcome::Advanced,
    }
}

/// Integrate the player, scroll/score/despawn obstacles, then maybe spawn.
///
/// Spawning looks at the frame index before it is incremented, so the very
/// first tick of a run always spawns.
pub fn step_physics(state: &mut GameState) {
    let GameState {
        tuning,
        viewport,
        player,
        obstacles,
        session,
        events,
        ..
    } = state;

    // Player
    player.vy += tuning.gravity;
    player.pos.y += player.vy;
    let rest_y = player.rest_y(viewport, tuning);
    if player.pos.y >= rest_y {
        player.pos.y = rest_y;
        player.vy = 0.0;
        player.grounded = true;
    } else {
        player.grounded = false;
    }

    // Obstacles (newest first, speed changes apply to the rest of the pass)
    for obstacle in obstacles.iter_mut().rev() {
        obstacle.pos.x -= session.speed;
        if !obstacle.passed && obstacle.right() < player.pos.x {
            obstacle.passed = true;
            session.score += 1;
            session.speed += tuning.speed_step;
            events.push(GameEvent::Scored {
                score: session.score,
            });
        }
    }
    let despawn_x = -tuning.despawn_margin;
    obstacles.retain(|o| o.right() >= despawn_x);

    // Spawner
    let frame = session.frame_index;
    let interval = tuning.spawn_interval(session.score);
    let floor = tuning.spawn_interval_floor;
    let gap_ok = session
        .last_spawn
        .is_none_or(|last| frame.saturating_sub(last) >= floor);
    if frame % interval == 0 && gap_ok {
        session.last_spawn = Some(frame);
        state.spawn_obstacle();
    }

    state.session.frame_index += 1;
}

/// ID of the first obstacle overlapping the player, if any
pub fn first_collision(state: &GameState) -> Option<u32> {
    let player = state.player.rect();
    state
        .obstacles
        .iter()
        .find(|o| overlaps(&player, &o.rect()))
        .map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::{Intent, apply_intent};
    use crate::sim::viewport::Viewport;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn state_800(seed: u64) -> GameState {
        let tuning = Tuning::default();
        let vp = Viewport::from_host(840.0, 1.0, &tuning);
        GameState::new(seed, vp, tuning)
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = state_800(1);
        assert_eq!(tick(&mut state), TickOutcome::Advanced);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.session.frame_index, 1);
        assert_eq!(state.session.last_spawn, Some(0));
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::Spawned { .. }]
        ));
    }

    #[test]
    fn test_spawn_every_120_ticks_at_score_zero() {
        let mut state = state_800(2);
        let mut spawn_frames = Vec::new();
        for _ in 0..361 {
            let frame = state.session.frame_index;
            step_physics(&mut state);
            if state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Spawned { .. }))
            {
                spawn_frames.push(frame);
            }
        }
        assert_eq!(spawn_frames, vec![0, 120, 240, 360]);
    }

    #[test]
    fn test_spawn_gap_respects_floor_when_interval_shrinks() {
        let mut state = state_800(3);
        // Interval 65 at score 275; 1300 is a multiple of 65
        state.session.score = 275;
        state.session.frame_index = 1300;
        step_physics(&mut state);
        assert_eq!(state.session.last_spawn, Some(1300));

        // Interval drops to 64; 1344 is a multiple but only 44 ticks later
        state.session.score = 280;
        while state.session.frame_index <= 1408 {
            step_physics(&mut state);
        }
        assert_eq!(state.session.last_spawn, Some(1408));
        let spawns = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawns, 2);
    }

    #[test]
    fn test_gravity_and_ground_clamp() {
        let mut state = state_800(4);
        state.player.vy = -14.0;
        step_physics(&mut state);
        assert!(!state.player.grounded);
        assert!((state.player.vy - (-13.1)).abs() < 1e-4);
        assert!((state.player.pos.y - (142.0 - 13.1)).abs() < 1e-4);

        for _ in 0..100 {
            step_physics(&mut state);
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.vy, 0.0);
        assert_eq!(state.player.pos.y, 142.0);
    }

    #[test]
    fn test_full_jump_lands() {
        let mut state = state_800(5);
        apply_intent(&mut state, Intent::Jump);
        let mut airborne_ticks = 0;
        loop {
            step_physics(&mut state);
            if state.player.grounded {
                break;
            }
            airborne_ticks += 1;
            assert!(state.player.pos.y + state.player.size <= 190.0);
        }
        // -14 impulse with 0.9 gravity stays up for about 30 ticks
        assert!((28..=32).contains(&airborne_ticks), "{airborne_ticks}");
    }

    #[test]
    fn test_obstacle_scores_once_when_right_edge_passes_player() {
        let mut state = state_800(6);
        state.session.frame_index = 1; // skip the frame-0 spawn
        // Right edge at player.x + speed - 1 = 53: lands at 47 after one tick
        state.push_obstacle(43.0, 10.0);
        // Get the player out of the way vertically
        state.player.pos.y = 0.0;
        state.player.vy = 0.0;

        assert_eq!(tick(&mut state), TickOutcome::Advanced);
        assert_eq!(state.obstacles[0].right(), 47.0);
        assert!(state.obstacles[0].passed);
        assert_eq!(state.session.score, 1);
        assert!((state.session.speed - 6.08).abs() < 1e-5);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Scored { score: 1 }]
        );

        // Further ticks never score it again
        for _ in 0..10 {
            step_physics(&mut state);
        }
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_obstacle_not_scored_while_right_edge_at_player() {
        let mut state = state_800(6);
        state.session.frame_index = 1;
        // Right edge lands exactly on player.x: not yet past
        state.push_obstacle(44.0, 10.0);
        state.player.pos.y = 0.0;
        step_physics(&mut state);
        assert_eq!(state.obstacles[0].right(), 48.0);
        assert!(!state.obstacles[0].passed);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_despawn_past_left_margin() {
        let mut state = state_800(7);
        state.session.frame_index = 1;
        state.push_obstacle(-55.0, 10.0); // right edge -45 -> -51 after tick
        state.push_obstacle(-50.0, 10.0); // right edge -40 -> -46
        state.obstacles.iter_mut().for_each(|o| o.passed = true);
        step_physics(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].right(), -46.0);
    }

    #[test]
    fn test_collision_with_grounded_player_ends_run() {
        let mut state = state_800(8);
        let id = state.push_obstacle(state.player.pos.x, 20.0);
        state.drain_events();

        assert_eq!(tick(&mut state), TickOutcome::Collided { obstacle: id });
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(state
            .drain_events()
            .contains(&GameEvent::GameOver { score: 0 }));

        // Frozen until restart
        let frame = state.session.frame_index;
        let x = state.obstacles[0].pos.x;
        for _ in 0..5 {
            assert_eq!(tick(&mut state), TickOutcome::Frozen);
        }
        assert_eq!(state.session.frame_index, frame);
        assert_eq!(state.obstacles[0].pos.x, x);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_jumping_clears_obstacle() {
        let mut state = state_800(9);
        state.session.frame_index = 1;
        // Reaches the player in ~8 ticks; jump now and sail over it
        state.push_obstacle(150.0, 16.0);
        apply_intent(&mut state, Intent::Jump);
        let mut outcome = TickOutcome::Advanced;
        for _ in 0..40 {
            outcome = tick(&mut state);
            if outcome != TickOutcome::Advanced {
                break;
            }
        }
        assert_eq!(outcome, TickOutcome::Advanced);
        assert_eq!(state.session.score, 1);
    }

    /// Play a run with the given jump schedule, checking invariants each tick
    fn check_run(seed: u64, jumps: &[bool]) -> Result<(), TestCaseError> {
        let mut state = state_800(seed);
        let ground = state.viewport.ground_y(&state.tuning);
        let mut last_spawn_frame: Option<u64> = None;

        for &jump in jumps {
            if jump {
                apply_intent(&mut state, Intent::Jump);
            }
            let was_running = state.is_running();
            let before_speed = state.session.speed;
            let before_score = state.session.score;
            let before: HashMap<u32, bool> =
                state.obstacles.iter().map(|o| (o.id, o.passed)).collect();
            let frame = state.session.frame_index;

            tick(&mut state);

            let flips = state
                .obstacles
                .iter()
                .filter(|o| o.passed && !before.get(&o.id).copied().unwrap_or(false))
                .count() as u32;
            for o in &state.obstacles {
                if before.get(&o.id).copied().unwrap_or(false) {
                    prop_assert!(o.passed, "passed flag flipped back");
                }
            }

            prop_assert!(state.player.pos.y + state.player.size <= ground + 1e-3);
            if was_running {
                prop_assert!(state.session.speed >= before_speed);
                prop_assert_eq!(state.session.score - before_score, flips);
                prop_assert_eq!(state.session.speed > before_speed, flips > 0);
            } else {
                prop_assert_eq!(state.session.speed, before_speed);
                prop_assert_eq!(state.session.score, before_score);
            }

            for event in state.drain_events() {
                if let GameEvent::Spawned { .. } = event {
                    if let Some(last) = last_spawn_frame {
                        prop_assert!(frame - last >= 60, "spawn gap {}", frame - last);
                    }
                    last_spawn_frame = Some(frame);
                }
            }

            if !state.is_running() {
                apply_intent(&mut state, Intent::Jump);
                prop_assert_eq!(state.session.score, 0);
                prop_assert_eq!(state.session.speed, 6.0);
                prop_assert!(state.obstacles.is_empty());
                prop_assert!(state.player.grounded);
                prop_assert_eq!(state.player.vy, 0.0);
                last_spawn_frame = None;
                state.drain_events();
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_run_invariants(
            seed in any::<u64>(),
            jumps in proptest::collection::vec(proptest::bool::weighted(0.05), 0..1500),
        ) {
            check_run(seed, &jumps)?;
        }
    }

    #[test]
    fn test_determinism() {
        let jumps: Vec<bool> = (0..600).map(|i| i % 37 == 0).collect();
        let mut a = state_800(99999);
        let mut b = state_800(99999);
        for &jump in &jumps {
            if jump {
                apply_intent(&mut a, Intent::Jump);
                apply_intent(&mut b, Intent::Jump);
            }
            tick(&mut a);
            tick(&mut b);
        }
        assert_eq!(a.session.frame_index, b.session.frame_index);
        assert_eq!(a.session.score, b.session.score);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.player.pos, b.player.pos);
    }
}
