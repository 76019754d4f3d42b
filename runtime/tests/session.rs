use machines_td_core::{
    Event, FrameInput, GameMode, GridPos, InputCommand, MapId, SessionOutcome, TowerKind,
    STARTING_BASE_HP, STARTING_MONEY,
};
use machines_td_runtime::{Simulation, SimulationConfig};
use machines_td_system_game_flow::BossEntry;
use machines_td_system_waves::Config as WaveConfig;
use machines_td_world::query;

fn press(simulation: &mut Simulation, commands: &[InputCommand]) -> Vec<Event> {
    let frame = FrameInput::from_commands(commands.iter().copied());
    simulation.step(&frame).to_vec()
}

fn idle(simulation: &mut Simulation, steps: usize, log: &mut Vec<Event>) {
    let frame = FrameInput::idle();
    for _ in 0..steps {
        log.extend(simulation.step(&frame).iter().cloned());
    }
}

fn run_until<F>(simulation: &mut Simulation, log: &mut Vec<Event>, done: F)
where
    F: Fn(&Simulation) -> bool,
{
    let mut steps = 0;
    while !done(&*simulation) && steps < 20_000 {
        idle(simulation, 1, log);
        steps += 1;
    }
    assert!(done(&*simulation), "condition not reached within {steps} steps");
}

fn position(log: &[Event], wanted: impl Fn(&Event) -> bool) -> usize {
    log.iter()
        .position(wanted)
        .expect("event should have been emitted")
}

/// One spawn round per wave, bosses every second wave.
fn short_boss_session() -> Simulation {
    Simulation::new(SimulationConfig::new(WaveConfig::new(1, 1, 2, 10, 10)))
}

fn start_map1(simulation: &mut Simulation) {
    let _ = press(simulation, &[InputCommand::Confirm]);
    let events = press(simulation, &[InputCommand::Confirm]);
    assert!(events.contains(&Event::SessionStarted { map: MapId::Map1 }));
    assert_eq!(query::game_mode(simulation.world()), GameMode::Playing);
}

fn move_cursor_to(simulation: &mut Simulation, cell: GridPos) {
    while query::cursor(simulation.world()).x() < cell.x() {
        let _ = press(simulation, &[InputCommand::MoveRight]);
    }
    while query::cursor(simulation.world()).y() < cell.y() {
        let _ = press(simulation, &[InputCommand::MoveDown]);
    }
    assert_eq!(query::cursor(simulation.world()), cell);
}

fn build(simulation: &mut Simulation, kind: TowerKind, cell: GridPos) -> Vec<Event> {
    move_cursor_to(simulation, cell);
    press(simulation, &[InputCommand::SelectTower(kind), InputCommand::Build])
}

#[test]
fn entering_a_map_starts_the_first_wave() {
    let mut simulation = Simulation::default();
    start_map1(&mut simulation);

    let wave = query::wave(simulation.world());
    assert!(wave.active);
    assert_eq!(wave.number, 1);
    assert_eq!(query::hud(simulation.world()).money, STARTING_MONEY);
}

#[test]
fn towers_are_bought_at_the_cursor_and_rejected_on_the_path() {
    let mut simulation = Simulation::default();
    start_map1(&mut simulation);

    let events = build(&mut simulation, TowerKind::Normal, GridPos::new(1, 1));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TowerPlacementRejected { .. })));

    let events = build(&mut simulation, TowerKind::Normal, GridPos::new(2, 2));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TowerPlaced {
            kind: TowerKind::Normal,
            ..
        }
    )));
    assert_eq!(query::hud(simulation.world()).money, STARTING_MONEY - 20);
    assert!(query::tower_at(simulation.world(), GridPos::new(2, 2)).is_some());
}

#[test]
fn defended_wave_balances_money_and_base_hit_points() {
    let mut simulation = Simulation::default();
    start_map1(&mut simulation);
    let mut log = Vec::new();
    log.extend(build(&mut simulation, TowerKind::Normal, GridPos::new(2, 2)));
    log.extend(build(&mut simulation, TowerKind::Normal, GridPos::new(4, 2)));
    let spent = 40;

    let mut steps = 0;
    while query::wave(simulation.world()).number < 2 && steps < 20_000 {
        idle(&mut simulation, 1, &mut log);
        steps += 1;
    }

    let rewards: u32 = log
        .iter()
        .filter_map(|event| match event {
            Event::EnemyKilled { reward, .. } => Some(*reward),
            _ => None,
        })
        .sum();
    let bonuses: u32 = log
        .iter()
        .filter_map(|event| match event {
            Event::WaveCompleted { bonus, .. } => Some(*bonus),
            _ => None,
        })
        .sum();
    let kills = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    let leaks = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyLeaked { .. }))
        .count();

    let hud = query::hud(simulation.world());
    assert!(kills > 0, "towers next to the entrance should score kills");
    assert_eq!(kills + leaks, 6, "every wave one enemy dies or leaks once");
    assert_eq!(hud.money, STARTING_MONEY - spent + rewards + bonuses);
    assert_eq!(hud.base_hp, STARTING_BASE_HP - leaks as u32);
}

#[test]
fn pausing_freezes_the_battlefield() {
    let mut simulation = Simulation::default();
    start_map1(&mut simulation);
    let mut log = Vec::new();
    idle(&mut simulation, 300, &mut log);

    let _ = press(&mut simulation, &[InputCommand::Pause]);
    assert_eq!(query::game_mode(simulation.world()), GameMode::Paused);
    let enemies = query::enemy_view(simulation.world()).into_vec();
    let wave = query::wave(simulation.world());
    assert!(!enemies.is_empty());

    idle(&mut simulation, 120, &mut log);
    assert_eq!(query::enemy_view(simulation.world()).into_vec(), enemies);
    assert_eq!(query::wave(simulation.world()), wave);

    let _ = press(&mut simulation, &[InputCommand::Pause]);
    assert_eq!(query::game_mode(simulation.world()), GameMode::Playing);
}

#[test]
fn undefended_base_falls_and_confirm_returns_to_the_menu() {
    let mut simulation = Simulation::default();
    start_map1(&mut simulation);
    let mut log = Vec::new();

    let mut steps = 0;
    while !query::outcome(simulation.world()).is_terminal() && steps < 20_000 {
        idle(&mut simulation, 1, &mut log);
        steps += 1;
    }

    assert_eq!(query::outcome(simulation.world()), SessionOutcome::Defeat);
    assert_eq!(query::hud(simulation.world()).base_hp, 0);
    assert_eq!(
        log.iter()
            .filter(|event| matches!(event, Event::BaseDestroyed))
            .count(),
        1
    );

    let events = press(&mut simulation, &[InputCommand::Build, InputCommand::Pause]);
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::TowerPlaced { .. })));
    assert_eq!(query::game_mode(simulation.world()), GameMode::Playing);

    let _ = press(&mut simulation, &[InputCommand::Confirm]);
    let hud = query::hud(simulation.world());
    assert_eq!(hud.mode, GameMode::Menu);
    assert_eq!(hud.outcome, SessionOutcome::Ongoing);
    assert_eq!(hud.money, STARTING_MONEY);
    assert_eq!(hud.base_hp, STARTING_BASE_HP);
    assert_eq!(hud.map, None);
}

fn reach_boss_choice(simulation: &mut Simulation) -> Vec<Event> {
    start_map1(simulation);
    let mut log = Vec::new();
    run_until(simulation, &mut log, |simulation| {
        query::game_mode(simulation.world()) == GameMode::BossChoice
    });

    let started = position(&log, |event| {
        *event
            == Event::WaveStarted {
                wave: 2,
                boss_wave: true,
            }
    });
    let released = position(&log, |event| {
        matches!(event, Event::BossesReleased { count: 1 })
    });
    let cleared = position(&log, |event| *event == Event::BossCleared { wave: 2 });
    let choice = position(&log, |event| {
        *event
            == Event::GameModeChanged {
                mode: GameMode::BossChoice,
            }
    });
    assert!(started < released && released < cleared && cleared < choice);

    let wave = query::wave(simulation.world());
    assert_eq!(wave.number, 2);
    assert!(!wave.infinite_mode);
    assert_eq!(query::outcome(simulation.world()), SessionOutcome::Ongoing);
    assert_eq!(
        simulation.game_flow().boss_selection(),
        BossEntry::ReturnToLobby
    );
    log
}

#[test]
fn clearing_a_boss_wave_offers_the_boss_choice() {
    let mut simulation = short_boss_session();
    let log = reach_boss_choice(&mut simulation);

    let frozen = query::wave(simulation.world());
    let mut later = Vec::new();
    idle(&mut simulation, 30, &mut later);
    assert_eq!(query::game_mode(simulation.world()), GameMode::BossChoice);
    assert_eq!(query::wave(simulation.world()), frozen);
    assert!(later
        .iter()
        .all(|event| !matches!(event, Event::WaveStarted { .. })));
    assert!(!log.iter().any(|event| matches!(event, Event::SessionWon { .. })));
}

#[test]
fn continuing_after_a_boss_skips_ahead_by_the_boss_interval() {
    let mut simulation = short_boss_session();
    let _ = reach_boss_choice(&mut simulation);

    let _ = press(&mut simulation, &[InputCommand::MoveDown]);
    assert_eq!(simulation.game_flow().boss_selection(), BossEntry::Continue);
    let events = press(&mut simulation, &[InputCommand::Confirm]);

    assert_eq!(query::game_mode(simulation.world()), GameMode::Playing);
    assert!(events.contains(&Event::WaveStarted {
        wave: 4,
        boss_wave: true,
    }));
    let wave = query::wave(simulation.world());
    assert_eq!(wave.number, 4);
    assert!(wave.infinite_mode);
    assert!(wave.active);
}

#[test]
fn leaving_the_boss_choice_returns_to_the_lobby() {
    let mut simulation = short_boss_session();
    let _ = reach_boss_choice(&mut simulation);

    let events = press(&mut simulation, &[InputCommand::Confirm]);
    assert!(events.contains(&Event::SessionReset));

    let hud = query::hud(simulation.world());
    let wave = query::wave(simulation.world());
    assert_eq!(hud.mode, GameMode::Menu);
    assert_eq!(hud.money, STARTING_MONEY);
    assert_eq!(hud.base_hp, STARTING_BASE_HP);
    assert_eq!(wave.number, 1);
    assert!(!wave.infinite_mode);
}

#[test]
fn clearing_the_final_wave_wins_and_advances_the_wave_counter() {
    let config = SimulationConfig::new(WaveConfig::new(1, 1, 5, 1, 10));
    let mut simulation = Simulation::new(config);
    start_map1(&mut simulation);
    let mut log = Vec::new();
    run_until(&mut simulation, &mut log, |simulation| {
        query::outcome(simulation.world()).is_terminal()
    });

    assert_eq!(query::outcome(simulation.world()), SessionOutcome::Victory);
    let completed = position(&log, |event| {
        *event == Event::WaveCompleted { wave: 1, bonus: 10 }
    });
    let won = position(&log, |event| *event == Event::SessionWon { wave: 2 });
    assert!(completed < won);

    let wave = query::wave(simulation.world());
    assert_eq!(wave.number, 2);
    assert!(!wave.active);
}
