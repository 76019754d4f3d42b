use machines_td_core::{
    Command, Event, FrameInput, GameMode, GridPos, InputCommand, MapId, TowerId, TowerKind,
};
use machines_td_system_builder::{Builder, BuilderInput};

fn playing() -> Vec<Event> {
    vec![Event::GameModeChanged {
        mode: GameMode::Playing,
    }]
}

#[test]
fn build_emits_place_command_while_playing() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &playing(),
        BuilderInput {
            build_action: true,
            cursor_cell: GridPos::new(2, 2),
            selected_kind: TowerKind::Aoe,
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            kind: TowerKind::Aoe,
            cell: GridPos::new(2, 2),
        }],
        "builder should request the selected tower kind at the cursor",
    );
}

#[test]
fn build_ignored_outside_playing_mode() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[Event::GameModeChanged {
            mode: GameMode::MapEditor,
        }],
        BuilderInput {
            build_action: true,
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "editor builds paint tiles and must not purchase towers",
    );
}

#[test]
fn upgrade_and_sell_target_the_hovered_tower() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let hovered_cell = GridPos::new(2, 2);
    let returned_tower = TowerId::new(7);
    let mut looked_up = None;

    builder.handle(
        &playing(),
        BuilderInput {
            upgrade_action: true,
            sell_action: true,
            cursor_cell: hovered_cell,
            ..BuilderInput::default()
        },
        |cell| {
            looked_up = Some(cell);
            Some(returned_tower)
        },
        &mut commands,
    );

    assert_eq!(looked_up, Some(hovered_cell));
    assert_eq!(
        commands,
        vec![
            Command::UpgradeTower {
                tower: returned_tower,
            },
            Command::SellTower {
                tower: returned_tower,
            },
        ],
    );
}

#[test]
fn sell_ignored_when_no_tower_present() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &playing(),
        BuilderInput {
            sell_action: true,
            cursor_cell: GridPos::new(1, 1),
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert!(commands.is_empty(), "no tower under cursor, nothing to sell");
}

#[test]
fn finished_sessions_ignore_builder_input_until_restarted() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let input = BuilderInput {
        build_action: true,
        ..BuilderInput::default()
    };

    let mut events = playing();
    events.push(Event::BaseDestroyed);
    builder.handle(&events, input, |_| None, &mut commands);
    assert!(commands.is_empty(), "defeated sessions accept no purchases");

    builder.handle(
        &[Event::SessionStarted { map: MapId::Map2 }],
        input,
        |_| None,
        &mut commands,
    );
    assert_eq!(commands.len(), 1);
}

#[test]
fn frame_input_maps_onto_builder_actions() {
    let frame = FrameInput::from_commands([InputCommand::Upgrade, InputCommand::Build]);
    let input = BuilderInput::from_poller(&frame, GridPos::new(3, 4), TowerKind::Drone);

    assert_eq!(
        input,
        BuilderInput::new(true, true, false, GridPos::new(3, 4), TowerKind::Drone)
    );
}
