//! Unit tests for nav-behavior.

use nav_core::{AgentId, TargetId, Tick, TileId, WorldPos};
use nav_spatial::{GridBuilder, GridLayout, TileGraph, TilePathFinder};

use crate::{
    AgentConfig, AgentState, BehaviorController, BehaviorVariant, TickReport, TrackedTarget,
    WorldStatus, WorldView,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f32 = 0.1;

fn grid(w: u32, h: u32) -> (TileGraph, GridLayout) {
    GridBuilder::new(w, h).build()
}

fn view<'a>(graph: &'a TileGraph, targets: &'a [TrackedTarget]) -> WorldView<'a> {
    WorldView::new(graph, targets, WorldStatus::default(), DT, Tick::ZERO)
}

fn placed(graph: &TileGraph, tile: TileId, config: AgentConfig) -> BehaviorController {
    let mut c = BehaviorController::new(AgentId(0), config, 7).unwrap();
    c.place(graph, tile).unwrap();
    c
}

/// Tick until `pred` holds for a report; panics after `limit` ticks.
fn tick_until(
    c:     &mut BehaviorController,
    world: &WorldView<'_>,
    limit: usize,
    pred:  impl Fn(&TickReport) -> bool,
) -> TickReport {
    let finder = TilePathFinder::new();
    for _ in 0..limit {
        let r = c.tick(world, &finder);
        if pred(&r) {
            return r;
        }
    }
    panic!("condition not reached within {limit} ticks (state {:?})", c.state());
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;
    use crate::{BehaviorError, ChaseLostPolicy};

    #[test]
    fn defaults() {
        let c = AgentConfig::default();
        assert_eq!(c.variant, BehaviorVariant::Wanderer);
        assert_eq!(c.speed, 1.0);
        assert_eq!(c.vision_distance, 5.0);
        assert_eq!(c.max_counter, 5);
        assert_eq!(c.max_random_steps, 20);
        assert_eq!(c.chase_lost, ChaseLostPolicy::Hold);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn invalid_values_rejected() {
        let base = AgentConfig::new(BehaviorVariant::Hunter);
        for bad in [
            base.clone().with_speed(0.0),
            base.clone().with_speed(f32::INFINITY),
            base.clone().with_vision(-1.0),
            base.clone().with_max_counter(0),
            base.clone().with_random_steps(0),
        ] {
            assert!(matches!(bad.validate(), Err(BehaviorError::Config(_))), "{bad:?}");
            assert!(BehaviorController::new(AgentId(0), bad, 0).is_err());
        }
    }

    #[test]
    fn variant_epsilons_and_ranges() {
        let eps = |v| BehaviorController::new(AgentId(0), AgentConfig::new(v), 0).unwrap();
        assert_eq!(eps(BehaviorVariant::Wanderer).kinematics().arrival_epsilon(), 0.05);
        assert_eq!(eps(BehaviorVariant::Hunter).kinematics().arrival_epsilon(), 0.5);
        assert_eq!(eps(BehaviorVariant::Stalker).kinematics().arrival_epsilon(), 0.5);
        assert_eq!(eps(BehaviorVariant::Hunter).pursuit_range(), 5.0);
        assert_eq!(eps(BehaviorVariant::Stalker).pursuit_range(), 10.0);
    }
}

// ── PerceptionTracker ─────────────────────────────────────────────────────────

#[cfg(test)]
mod perception {
    use super::*;
    use crate::{PerceptionTracker, TransitionSignal};

    fn target_at(id: u32, x: f32, y: f32) -> TrackedTarget {
        TrackedTarget::new(TargetId(id), WorldPos::new(x, y))
    }

    #[test]
    fn scans_on_kth_arrival() {
        let mut t = PerceptionTracker::new(3);
        let targets = [target_at(0, 1.0, 0.0)];
        assert_eq!(t.on_arrival(WorldPos::ZERO, &targets, 5.0), TransitionSignal::ContinueWandering);
        assert_eq!(t.on_arrival(WorldPos::ZERO, &targets, 5.0), TransitionSignal::ContinueWandering);
        assert_eq!(t.on_arrival(WorldPos::ZERO, &targets, 5.0), TransitionSignal::Pursue(TargetId(0)));
        assert_eq!(t.counter(), 3);
    }

    #[test]
    fn out_of_range_never_triggers() {
        let mut t = PerceptionTracker::new(2);
        let targets = [target_at(0, 50.0, 0.0)];
        for _ in 0..20 {
            assert_eq!(t.on_arrival(WorldPos::ZERO, &targets, 5.0), TransitionSignal::ContinueWandering);
        }
        assert_eq!(t.counter(), 0);
    }

    #[test]
    fn expired_counter_scans_every_arrival() {
        let mut t = PerceptionTracker::new(4);
        let far = [target_at(0, 50.0, 0.0)];
        for _ in 0..6 {
            t.on_arrival(WorldPos::ZERO, &far, 5.0);
        }
        let near = [target_at(0, 2.0, 0.0)];
        assert_eq!(t.on_arrival(WorldPos::ZERO, &near, 5.0), TransitionSignal::Pursue(TargetId(0)));
    }

    #[test]
    fn range_is_inclusive() {
        let mut t = PerceptionTracker::new(1);
        let targets = [target_at(0, 3.0, 4.0)];
        assert_eq!(t.on_arrival(WorldPos::ZERO, &targets, 5.0), TransitionSignal::Pursue(TargetId(0)));
    }

    #[test]
    fn inactive_skipped_first_active_wins() {
        let mut dead = target_at(0, 1.0, 0.0);
        dead.alive = false;
        let mut done = target_at(1, 1.0, 0.0);
        done.goal_reached = true;
        let targets = [dead, done, target_at(2, 4.0, 0.0), target_at(3, 1.0, 0.0)];
        let mut t = PerceptionTracker::new(1);
        assert_eq!(t.on_arrival(WorldPos::ZERO, &targets, 5.0), TransitionSignal::Pursue(TargetId(2)));
    }

    #[test]
    fn empty_target_set() {
        let mut t = PerceptionTracker::new(1);
        assert_eq!(t.on_arrival(WorldPos::ZERO, &[], 5.0), TransitionSignal::ContinueWandering);
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod fsm {
    use super::*;
    use crate::ChaseLostPolicy;

    #[test]
    fn default_to_moving_in_one_tick() {
        let (graph, layout) = grid(5, 5);
        let start = layout.tile(0, 0).unwrap();
        let mut c = placed(&graph, start, AgentConfig::default());
        let r = c.tick(&view(&graph, &[]), &TilePathFinder::new());
        assert_eq!((r.from, r.to), (AgentState::Default, AgentState::Moving));
        let next = c.target_tile().unwrap();
        assert!(graph.are_adjacent(start, next));
        assert!(c.plan().len() < 20);
    }

    #[test]
    fn reaches_target_tile_in_finite_ticks() {
        let (graph, layout) = grid(5, 5);
        for variant in BehaviorVariant::ALL {
            let mut c = placed(&graph, layout.tile(2, 2).unwrap(), AgentConfig::new(variant));
            let world = view(&graph, &[]);
            c.tick(&world, &TilePathFinder::new());
            let goal = c.target_tile().unwrap();
            let r = tick_until(&mut c, &world, 100, |r| r.arrived.is_some());
            assert_eq!(r.arrived, Some(goal));
            assert_eq!(c.current_tile(), goal);
            assert!(c.position().distance(graph.pos(goal)) <= c.kinematics().arrival_epsilon());
        }
    }

    #[test]
    fn wanderer_never_chases() {
        let (graph, layout) = grid(5, 5);
        let start = layout.tile(2, 2).unwrap();
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, start).unwrap()];
        let mut c = placed(&graph, start, AgentConfig::new(BehaviorVariant::Wanderer).with_max_counter(1));
        let world = view(&graph, &targets);
        let finder = TilePathFinder::new();
        let mut arrivals = 0;
        for _ in 0..2_000 {
            let r = c.tick(&world, &finder);
            arrivals += r.arrived.is_some() as usize;
            assert_ne!(r.to, AgentState::Chase);
        }
        assert!(arrivals > 10);
        assert_eq!(c.tracker().counter(), 1);
        assert_eq!(c.detected_target(), None);
    }

    #[test]
    fn hunter_detects_on_kth_arrival() {
        let (graph, layout) = grid(5, 5);
        let centre = layout.tile(2, 2).unwrap();
        let targets = [TrackedTarget::on_tile(TargetId(4), &graph, centre).unwrap()];
        let mut c = placed(&graph, centre, AgentConfig::new(BehaviorVariant::Hunter).with_max_counter(3));
        let world = view(&graph, &targets);
        let finder = TilePathFinder::new();

        let mut arrivals = 0;
        loop {
            let r = c.tick(&world, &finder);
            if r.arrived.is_some() {
                arrivals += 1;
                if r.to == AgentState::Chase {
                    break;
                }
                assert_eq!(r.to, AgentState::Default);
            }
            assert!(arrivals <= 3);
        }
        assert_eq!(arrivals, 3);
        assert_eq!(c.detected_target(), Some(TargetId(4)));
    }

    #[test]
    fn hunter_paths_to_target_tile() {
        let (graph, layout) = grid(5, 5);
        let goal = layout.tile(2, 2).unwrap();
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, goal).unwrap()];
        let mut c = placed(&graph, layout.tile(0, 0).unwrap(), AgentConfig::new(BehaviorVariant::Hunter).with_max_counter(1));
        let world = view(&graph, &targets);

        tick_until(&mut c, &world, 200, |r| r.to == AgentState::Chase);
        let r = c.tick(&world, &TilePathFinder::new());
        assert_eq!((r.from, r.to), (AgentState::Chase, AgentState::Moving));

        let end = c.plan().last().or(c.target_tile()).unwrap();
        assert_eq!(end, goal);
        assert!(graph.are_adjacent(c.current_tile(), c.target_tile().unwrap()));
    }

    #[test]
    fn stalker_aims_next_to_target() {
        let (graph, layout) = grid(5, 5);
        let target_tile = layout.tile(2, 2).unwrap();
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, target_tile).unwrap()];
        let mut c = placed(&graph, layout.tile(0, 0).unwrap(), AgentConfig::new(BehaviorVariant::Stalker).with_max_counter(1));
        let world = view(&graph, &targets);

        tick_until(&mut c, &world, 200, |r| r.to == AgentState::Chase);
        let r = c.tick(&world, &TilePathFinder::new());
        assert_eq!(r.to, AgentState::Moving);

        let end = c.plan().last().or(c.target_tile()).unwrap();
        assert_ne!(end, target_tile);
        assert!(graph.are_adjacent(end, target_tile));
    }

    #[test]
    fn stalker_sees_twice_as_far() {
        // Target 8 tiles away: outside vision 5, inside 2 × 5.
        let (graph, layout) = grid(12, 1);
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(11, 0).unwrap()).unwrap()];
        let start = layout.tile(2, 0).unwrap();
        let world = view(&graph, &targets);

        let mut hunter = placed(&graph, start, AgentConfig::new(BehaviorVariant::Hunter).with_max_counter(1).with_random_steps(1));
        let mut stalker = placed(&graph, start, AgentConfig::new(BehaviorVariant::Stalker).with_max_counter(1).with_random_steps(1));

        let r = tick_until(&mut stalker, &world, 200, |r| r.arrived.is_some());
        assert_eq!(r.to, AgentState::Chase);

        let r = tick_until(&mut hunter, &world, 200, |r| r.arrived.is_some());
        // A single step from column 2 never gets within 5 of column 11.
        assert_eq!(r.to, AgentState::Default);
    }

    fn chasing_hunter(policy: ChaseLostPolicy) -> (TileGraph, GridLayout, BehaviorController) {
        let (graph, layout) = grid(10, 10);
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(1, 1).unwrap()).unwrap()];
        let config = AgentConfig::new(BehaviorVariant::Hunter)
            .with_max_counter(1)
            .with_chase_lost(policy);
        let mut c = placed(&graph, layout.tile(0, 0).unwrap(), config);
        tick_until(&mut c, &view(&graph, &targets), 200, |r| r.to == AgentState::Chase);
        (graph, layout, c)
    }

    #[test]
    fn chase_holds_when_target_leaves_range() {
        let (graph, layout, mut c) = chasing_hunter(ChaseLostPolicy::Hold);
        let far = [TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(9, 9).unwrap()).unwrap()];
        let world = view(&graph, &far);
        let finder = TilePathFinder::new();
        let before = c.position();
        for _ in 0..10 {
            let r = c.tick(&world, &finder);
            assert_eq!((r.from, r.to), (AgentState::Chase, AgentState::Chase));
        }
        assert_eq!(c.position(), before);
        assert_eq!(c.detected_target(), Some(TargetId(0)));
    }

    #[test]
    fn chase_holds_when_target_inactive() {
        let (graph, layout, mut c) = chasing_hunter(ChaseLostPolicy::Hold);
        let mut dead = TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(1, 1).unwrap()).unwrap();
        dead.alive = false;
        let targets = [dead];
        let r = c.tick(&view(&graph, &targets), &TilePathFinder::new());
        assert_eq!(r.to, AgentState::Chase);
    }

    #[test]
    fn wander_policy_drops_lost_target() {
        let (graph, layout, mut c) = chasing_hunter(ChaseLostPolicy::Wander);
        let far = [TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(9, 9).unwrap()).unwrap()];
        let r = c.tick(&view(&graph, &far), &TilePathFinder::new());
        assert_eq!((r.from, r.to), (AgentState::Chase, AgentState::Default));
        assert_eq!(c.detected_target(), None);
    }

    #[test]
    fn walled_off_target_does_not_pin_chase() {
        // Column 3 is a full wall; the target sits behind it but within
        // vision of every tile left of the wall.
        let (graph, layout) = GridBuilder::new(6, 3).block_where(|c, _| c == 3).build();
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(4, 0).unwrap()).unwrap()];
        let world = view(&graph, &targets);
        let finder = TilePathFinder::new();

        for policy in [ChaseLostPolicy::Hold, ChaseLostPolicy::Wander] {
            let config = AgentConfig::new(BehaviorVariant::Hunter)
                .with_max_counter(1)
                .with_chase_lost(policy);
            let mut c = placed(&graph, layout.tile(0, 0).unwrap(), config);
            tick_until(&mut c, &world, 200, |r| r.to == AgentState::Chase);

            let r = c.tick(&world, &finder);
            assert_eq!((r.from, r.to), (AgentState::Chase, AgentState::Default));
            assert_eq!(c.detected_target(), None);

            let mut arrivals = 0;
            for _ in 0..2_000 {
                let r = c.tick(&world, &finder);
                assert!(!(r.from == AgentState::Chase && r.to == AgentState::Chase), "{policy:?}");
                arrivals += r.arrived.is_some() as usize;
            }
            assert!(arrivals > 10);
            assert!(layout.coords(c.current_tile()).is_some_and(|(col, _)| col < 3));
        }
    }

    #[test]
    fn standing_on_target_tile_ends_chase() {
        // A one-step walk along a 3×1 corridor always lands on column 1.
        let (graph, layout) = grid(3, 1);
        let middle = layout.tile(1, 0).unwrap();
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, middle).unwrap()];
        let config = AgentConfig::new(BehaviorVariant::Hunter)
            .with_max_counter(1)
            .with_random_steps(1);
        let mut c = placed(&graph, layout.tile(0, 0).unwrap(), config);
        let world = view(&graph, &targets);

        let r = tick_until(&mut c, &world, 100, |r| r.arrived.is_some());
        assert_eq!((r.arrived, r.to), (Some(middle), AgentState::Chase));

        let r = c.tick(&world, &TilePathFinder::new());
        assert_eq!((r.from, r.to), (AgentState::Chase, AgentState::Default));
        assert_eq!(c.detected_target(), None);
        assert!(c.plan().is_empty());

        let r = c.tick(&world, &TilePathFinder::new());
        assert_eq!(r.to, AgentState::Moving);
    }

    #[test]
    fn position_only_target_resolves_to_nearest_tile() {
        let (graph, layout, mut c) = chasing_hunter(ChaseLostPolicy::Hold);
        let goal = layout.tile(3, 3).unwrap();
        let targets = [TrackedTarget::new(TargetId(0), WorldPos::new(3.2, 2.9))];
        let r = c.tick(&view(&graph, &targets), &TilePathFinder::new());
        assert_eq!(r.to, AgentState::Moving);
        assert_eq!(c.plan().last().or(c.target_tile()), Some(goal));
    }

    #[test]
    fn halted_world_freezes_agent() {
        let (graph, layout) = grid(5, 5);
        let mut c = placed(&graph, layout.tile(0, 0).unwrap(), AgentConfig::default());
        let finder = TilePathFinder::new();
        c.tick(&view(&graph, &[]), &finder);
        let (pos, plan) = (c.position(), c.plan().clone());

        for status in [
            WorldStatus { map_destroyed: true, session_finished: false },
            WorldStatus { map_destroyed: false, session_finished: true },
        ] {
            let world = WorldView::new(&graph, &[], status, DT, Tick(1));
            let r = c.tick(&world, &finder);
            assert_eq!((r.from, r.to, r.arrived), (AgentState::Moving, AgentState::Moving, None));
            assert_eq!(c.position(), pos);
            assert_eq!(c.plan(), &plan);
        }
    }

    #[test]
    fn parked_states_fall_back_to_default() {
        let (graph, layout) = grid(3, 3);
        let mut c = placed(&graph, layout.tile(1, 1).unwrap(), AgentConfig::default());
        for parked in [AgentState::Rest, AgentState::Static] {
            c.force_state(parked);
            let r = c.tick(&view(&graph, &[]), &TilePathFinder::new());
            assert_eq!((r.from, r.to), (parked, AgentState::Default));
        }
    }

    #[test]
    fn isolated_tile_stays_default() {
        let (graph, layout) = GridBuilder::new(3, 1).block(1, 0).build();
        let mut c = placed(&graph, layout.tile(0, 0).unwrap(), AgentConfig::default());
        let r = c.tick(&view(&graph, &[]), &TilePathFinder::new());
        assert_eq!(r.to, AgentState::Default);
        assert!(c.plan().is_empty());
    }

    #[test]
    fn plan_tiles_are_walkable_and_adjacent() {
        let (graph, layout) = GridBuilder::new(6, 6).block_where(|c, r| c == 3 && r > 1).build();
        let mut c = placed(&graph, layout.tile(0, 5).unwrap(), AgentConfig::new(BehaviorVariant::Stalker));
        let world = view(&graph, &[]);
        let finder = TilePathFinder::new();
        for _ in 0..1_000 {
            let from = c.current_tile();
            let r = c.tick(&world, &finder);
            if let Some(t) = r.arrived {
                assert!(graph.is_walkable(t));
                assert!(graph.are_adjacent(from, t));
            }
        }
    }
}

// ── Reset & placement ─────────────────────────────────────────────────────────

#[cfg(test)]
mod reset {
    use super::*;
    use crate::BehaviorError;
    use nav_spatial::SpatialError;

    #[test]
    fn reset_lands_on_walkable_tile_with_clean_slate() {
        let (graph, layout) = GridBuilder::new(6, 6).block_where(|c, _| c % 2 == 0).build();
        let targets = [TrackedTarget::on_tile(TargetId(0), &graph, layout.tile(1, 1).unwrap()).unwrap()];
        let mut c = BehaviorController::new(AgentId(3), AgentConfig::new(BehaviorVariant::Hunter), 99).unwrap();
        c.reset(&graph).unwrap();
        tick_until(&mut c, &view(&graph, &targets), 50, |r| r.to == AgentState::Moving);

        c.reset(&graph).unwrap();
        assert!(graph.is_walkable(c.current_tile()));
        assert!(c.plan().is_empty());
        assert_eq!(c.state(), AgentState::Default);
        assert_eq!(c.target_tile(), None);
        assert_eq!(c.detected_target(), None);
        assert_eq!(c.velocity(), WorldPos::ZERO);
        assert_eq!(c.tracker().counter(), c.config().max_counter);
        assert_eq!(c.position(), graph.pos(c.current_tile()));
    }

    #[test]
    fn reset_fails_without_walkable_tiles() {
        let (graph, _) = GridBuilder::new(3, 3).block_where(|_, _| true).build();
        let mut c = BehaviorController::new(AgentId(0), AgentConfig::default(), 0).unwrap();
        assert!(matches!(
            c.reset(&graph),
            Err(BehaviorError::Spawn(SpatialError::NoWalkableTile))
        ));
    }

    #[test]
    fn place_rejects_bad_tiles() {
        let (graph, layout) = GridBuilder::new(3, 3).block(1, 1).build();
        let mut c = BehaviorController::new(AgentId(0), AgentConfig::default(), 0).unwrap();
        assert!(matches!(
            c.place(&graph, layout.tile(1, 1).unwrap()),
            Err(BehaviorError::NotWalkable(_))
        ));
        assert!(matches!(c.place(&graph, TileId(40)), Err(BehaviorError::Spawn(_))));
    }

    #[test]
    fn unplaced_controller_idles() {
        let (graph, _) = grid(3, 3);
        let mut c = BehaviorController::new(AgentId(0), AgentConfig::default(), 0).unwrap();
        let r = c.tick(&view(&graph, &[]), &TilePathFinder::new());
        assert_eq!(r.to, AgentState::Default);
        assert_eq!(c.current_tile(), TileId::INVALID);
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod targets {
    use super::*;
    use nav_spatial::SpatialError;

    #[test]
    fn on_tile_takes_tile_position() {
        let (graph, layout) = grid(4, 4);
        let tile = layout.tile(3, 1).unwrap();
        let t = TrackedTarget::on_tile(TargetId(2), &graph, tile).unwrap();
        assert_eq!(t.position, graph.pos(tile));
        assert_eq!(t.tile, Some(tile));
        assert!(t.is_active());
    }

    #[test]
    fn on_tile_rejects_unknown_tile() {
        let (graph, _) = grid(4, 4);
        assert!(matches!(
            TrackedTarget::on_tile(TargetId(0), &graph, TileId(16)),
            Err(SpatialError::TileNotFound(TileId(16)))
        ));
    }
}
