use std::time::Duration;

use dynamo_core::{Command, Direction, Event, Key, KeySet, PhaseKind};
use dynamo_system_controls::{Controls, TickInput};
use dynamo_world::{self as world, query, Config, World};

fn commands_for(input: TickInput, phase: PhaseKind) -> Vec<Command> {
    let mut commands = Vec::new();
    Controls.handle(&input, phase, &mut commands);
    commands
}

#[test]
fn quit_precedes_everything_else() {
    let input = TickInput::new(
        KeySet::of(&[Key::Escape, Key::D]),
        KeySet::of(&[Key::D, Key::E]),
    );

    let commands = commands_for(input, PhaseKind::Level);

    assert_eq!(
        commands,
        vec![
            Command::Quit,
            Command::MovePlayer {
                direction: Direction::East,
                tapped: true,
            },
            Command::ToggleTorch,
        ]
    );
}

#[test]
fn q_quits_on_the_title_screen() {
    let input = TickInput::new(KeySet::of(&[Key::Q]), KeySet::EMPTY);
    assert_eq!(commands_for(input, PhaseKind::Title), vec![Command::Quit]);
}

#[test]
fn e_confirms_title_but_toggles_torch_in_level() {
    let input = TickInput::new(KeySet::of(&[Key::E]), KeySet::of(&[Key::E]));
    assert_eq!(commands_for(input, PhaseKind::Title), vec![Command::Confirm]);
    assert_eq!(
        commands_for(input, PhaseKind::Level),
        vec![Command::ToggleTorch]
    );
    assert!(commands_for(input, PhaseKind::TitleTransition).is_empty());
}

#[test]
fn held_e_never_repeats() {
    let input = TickInput::new(KeySet::of(&[Key::E]), KeySet::EMPTY);
    assert!(commands_for(input, PhaseKind::Title).is_empty());
    assert!(commands_for(input, PhaseKind::Level).is_empty());
}

#[test]
fn movement_keys_follow_polling_order() {
    let input = TickInput::new(
        KeySet::of(&[Key::W, Key::A, Key::S, Key::D]),
        KeySet::of(&[Key::A]),
    );

    let directions: Vec<(Direction, bool)> = commands_for(input, PhaseKind::Level)
        .into_iter()
        .filter_map(|command| match command {
            Command::MovePlayer { direction, tapped } => Some((direction, tapped)),
            _ => None,
        })
        .collect();

    assert_eq!(
        directions,
        vec![
            (Direction::South, false),
            (Direction::North, false),
            (Direction::West, true),
            (Direction::East, false),
        ]
    );
}

#[test]
fn pressing_e_on_title_drives_world_into_level() {
    let mut world = World::new(Config::new(42, 0));
    let mut commands = Vec::new();
    let input = TickInput::new(KeySet::of(&[Key::E]), KeySet::of(&[Key::E]));
    Controls.handle(&input, query::phase(&world), &mut commands);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut events,
    )
    .expect("tick");
    for command in commands {
        world::apply(&mut world, command, &mut events).expect("apply");
    }

    assert_eq!(query::phase(&world), PhaseKind::Level);
    assert!(events.contains(&Event::PhaseChanged {
        phase: PhaseKind::Level
    }));
}
