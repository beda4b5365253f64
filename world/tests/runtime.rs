use std::{collections::VecDeque, time::Duration};

use maze_runner_core::{
    CameraMode, Command, Direction, Event, MazeDimensions, MazeGrid, MoveRejection, StepPosition,
    TilePosition, WallGrid,
};
use maze_runner_world::{self as world, query, GameSession, MazeRuntime, RuntimeConfig};

fn dimensions(width: u32, height: u32) -> MazeDimensions {
    MazeDimensions::new(width, height).expect("valid dimensions")
}

fn corridor(length: u32) -> WallGrid {
    let mut walls = WallGrid::closed(dimensions(length, 1));
    for column in 0..length - 1 {
        let _ = walls
            .carve(TilePosition::new(column, 0), Direction::East)
            .expect("corridor stays inside the grid");
    }
    walls
}

fn reachable_tiles(grid: &MazeGrid) -> usize {
    let mut seen = vec![TilePosition::new(0, 0)];
    let mut queue = VecDeque::from([TilePosition::new(0, 0)]);
    while let Some(tile) = queue.pop_front() {
        for direction in Direction::ALL {
            if let Some(next) = grid.passable(tile, direction) {
                if !seen.contains(&next) {
                    seen.push(next);
                    queue.push_back(next);
                }
            }
        }
    }
    seen.len()
}

fn passage_count(grid: &MazeGrid) -> usize {
    grid.tiles()
        .iter()
        .map(|tile| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter(|direction| grid.passable(tile.position(), *direction).is_some())
                .count()
        })
        .sum()
}

fn tick(runtime: &mut MazeRuntime, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(runtime, Command::Tick { dt }, &mut events);
    events
}

#[test]
fn exit_is_far_from_spawn_on_both_axes() {
    for size in [4, 5, 8, 15] {
        let maze = dimensions(size, size);
        let threshold = size / 3;
        for seed in 0..40 {
            let runtime =
                MazeRuntime::new(maze, RuntimeConfig::default(), seed).expect("valid config");
            let spawn = query::agent(&runtime).target();
            let (columns, rows) = spawn.axis_distance(query::exit(&runtime));

            assert!(
                columns > threshold && rows > threshold,
                "{size}x{size} seed {seed}: spawn {spawn:?} exit {:?}",
                query::exit(&runtime)
            );
        }
    }
}

#[test]
fn initialise_twice_yields_two_valid_mazes() {
    let maze = dimensions(9, 7);
    let mut runtime = MazeRuntime::new(maze, RuntimeConfig::default(), 77).expect("valid config");
    let mut events = Vec::new();

    world::apply(&mut runtime, Command::Initialise, &mut events);
    let first = query::grid(&runtime).clone();
    world::apply(&mut runtime, Command::Initialise, &mut events);
    let second = query::grid(&runtime).clone();

    for grid in [&first, &second] {
        assert_eq!(reachable_tiles(grid), 63);
        assert_eq!(passage_count(grid), 62);
    }
    assert_ne!(first, second);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::MazeGenerated { .. }))
            .count(),
        2
    );
}

#[test]
fn initialise_resets_counters() {
    let mut runtime = MazeRuntime::from_layout(
        RuntimeConfig::default(),
        corridor(3),
        TilePosition::new(0, 0),
        TilePosition::new(2, 0),
    )
    .expect("valid layout");
    let mut events = Vec::new();
    assert!(runtime.handle_directional_input(Direction::East, &mut events));
    let _ = tick(&mut runtime, Duration::from_millis(1500));
    assert_eq!(query::elapsed_seconds(&runtime), 1);

    runtime.initialise(&mut events);

    assert_eq!(query::steps_taken(&runtime), 0);
    assert_eq!(query::elapsed_seconds(&runtime), 0);
    assert!(!query::is_complete(&runtime));
    assert!(query::agent(&runtime).is_at_rest());
}

#[test]
fn reaching_the_exit_completes_on_the_same_tick() {
    let config = RuntimeConfig::default();
    let dt = config.tick_duration();
    let mut runtime = MazeRuntime::from_layout(
        config,
        corridor(2),
        TilePosition::new(0, 0),
        TilePosition::new(1, 0),
    )
    .expect("valid layout");
    assert_eq!(query::camera_mode(&runtime), CameraMode::Fixed);

    let mut events = Vec::new();
    assert!(runtime.handle_directional_input(Direction::East, &mut events));
    assert_eq!(
        events,
        vec![Event::AgentMoveStarted {
            from: TilePosition::new(0, 0),
            to: TilePosition::new(1, 0),
            steps_taken: 1,
        }]
    );

    for _ in 0..3 {
        let events = tick(&mut runtime, dt);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::MazeCompleted { .. })));
        assert!(!query::is_complete(&runtime));
    }

    let arrival = tick(&mut runtime, dt);
    assert!(arrival.contains(&Event::AgentArrived {
        tile: TilePosition::new(1, 0)
    }));
    assert_eq!(
        arrival.last(),
        Some(&Event::MazeCompleted {
            steps_taken: 1,
            elapsed_seconds: 0,
        })
    );
    assert!(query::is_complete(&runtime));
}

#[test]
fn completed_runtime_ignores_updates_and_input() {
    let mut runtime = MazeRuntime::from_layout(
        RuntimeConfig::default(),
        corridor(2),
        TilePosition::new(1, 0),
        TilePosition::new(1, 0),
    )
    .expect("valid layout");

    let first = tick(&mut runtime, Duration::from_millis(10));
    assert!(first.contains(&Event::MazeCompleted {
        steps_taken: 0,
        elapsed_seconds: 0,
    }));

    assert!(tick(&mut runtime, Duration::from_secs(5)).is_empty());
    assert_eq!(query::elapsed_seconds(&runtime), 0);

    let mut events = Vec::new();
    assert!(!runtime.handle_directional_input(Direction::West, &mut events));
    assert_eq!(
        events,
        vec![Event::AgentMoveRejected {
            direction: Direction::West,
            reason: MoveRejection::Completed,
        }]
    );
}

#[test]
fn clock_counts_whole_seconds() {
    let mut runtime = MazeRuntime::from_layout(
        RuntimeConfig::default(),
        corridor(3),
        TilePosition::new(0, 0),
        TilePosition::new(2, 0),
    )
    .expect("valid layout");

    let mut clock_events = 0;
    for _ in 0..8 {
        clock_events += tick(&mut runtime, Duration::from_millis(250))
            .iter()
            .filter(|event| matches!(event, Event::ClockAdvanced { .. }))
            .count();
    }

    assert_eq!(clock_events, 2);
    assert_eq!(query::elapsed_seconds(&runtime), 2);
}

#[test]
fn clock_keeps_pace_at_the_configured_tick_rate() {
    let mut runtime = MazeRuntime::from_layout(
        RuntimeConfig::default(),
        corridor(3),
        TilePosition::new(0, 0),
        TilePosition::new(2, 0),
    )
    .expect("valid layout");
    let config = query::config(&runtime).clone();
    let dt = config.tick_duration();

    for _ in 0..config.tick_rate_hz * 60 {
        let _ = tick(&mut runtime, dt);
    }

    assert_eq!(query::elapsed_seconds(&runtime), 60);
}

#[test]
fn blocked_moves_are_reported() {
    let mut runtime = MazeRuntime::from_layout(
        RuntimeConfig::default(),
        corridor(3),
        TilePosition::new(0, 0),
        TilePosition::new(2, 0),
    )
    .expect("valid layout");
    let mut events = Vec::new();

    world::apply(
        &mut runtime,
        Command::Move {
            direction: Direction::North,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::AgentMoveRejected {
            direction: Direction::North,
            reason: MoveRejection::Blocked,
        }]
    );
    assert_eq!(query::steps_taken(&runtime), 0);
}

#[test]
fn agent_waits_while_the_camera_pans() {
    let mut runtime = MazeRuntime::from_layout(
        RuntimeConfig::default(),
        corridor(40),
        TilePosition::new(0, 0),
        TilePosition::new(39, 0),
    )
    .expect("valid layout");
    assert_eq!(query::camera_mode(&runtime), CameraMode::Panning);
    assert!(!query::is_settled(&runtime));
    let exit = query::exit_pixel_position(&runtime);
    assert!(query::viewport(&runtime).intersects(exit.x, exit.y, 32.0, 32.0));

    let mut events = Vec::new();
    assert!(runtime.handle_directional_input(Direction::East, &mut events));

    let dt = Duration::from_millis(10);
    let mut pan_ticks = 0;
    loop {
        let events = tick(&mut runtime, dt);
        if events.contains(&Event::CameraFollowEngaged) {
            break;
        }
        pan_ticks += 1;
        assert!(pan_ticks < 1_000, "panning must finish");
        assert_eq!(
            query::agent(&runtime).position(),
            StepPosition::from_tile(TilePosition::new(0, 0))
        );
    }
    assert_eq!(query::camera_mode(&runtime), CameraMode::Following);

    let mut arrived = false;
    for _ in 0..4 {
        arrived |= tick(&mut runtime, dt).contains(&Event::AgentArrived {
            tile: TilePosition::new(1, 0),
        });
    }
    assert!(arrived);
    assert!(query::is_settled(&runtime));

    let viewport = query::viewport(&runtime);
    assert_eq!(viewport.x, 32.0 + 16.0 - 256.0);
}

fn solve(grid: &MazeGrid, from: TilePosition, to: TilePosition) -> Vec<Direction> {
    let mut previous: Vec<(TilePosition, TilePosition, Direction)> = Vec::new();
    let mut seen = vec![from];
    let mut queue = VecDeque::from([from]);
    while let Some(tile) = queue.pop_front() {
        if tile == to {
            break;
        }
        for direction in Direction::ALL {
            if let Some(next) = grid.passable(tile, direction) {
                if !seen.contains(&next) {
                    seen.push(next);
                    previous.push((next, tile, direction));
                    queue.push_back(next);
                }
            }
        }
    }

    let mut path = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let (_, parent, direction) = *previous
            .iter()
            .find(|(tile, _, _)| *tile == cursor)
            .expect("perfect maze connects every tile");
        path.push(direction);
        cursor = parent;
    }
    path.reverse();
    path
}

#[test]
fn solving_a_level_starts_a_larger_one() {
    let mut session = GameSession::new(RuntimeConfig::default(), 404).expect("valid config");
    let dt = session.config().tick_duration();
    let runtime = session.runtime();
    let path = solve(
        query::grid(runtime),
        query::agent(runtime).target(),
        query::exit(runtime),
    );
    assert!(!path.is_empty());

    let mut events = Vec::new();
    for direction in path {
        session.apply(Command::Move { direction }, &mut events);
        for _ in 0..100 {
            session.apply(Command::Tick { dt }, &mut events);
            if query::is_settled(session.runtime()) {
                break;
            }
        }
    }

    let completed = events
        .iter()
        .find(|event| matches!(event, Event::LevelCompleted { .. }))
        .expect("level must complete");
    assert!(matches!(
        completed,
        Event::LevelCompleted { level: 1, .. }
    ));
    assert!(events.contains(&Event::LevelStarted {
        level: 2,
        dimensions: dimensions(6, 6),
    }));
    assert_eq!(session.level(), 2);
    assert_eq!(query::steps_taken(session.runtime()), 0);
}
