//! Property-based engine tests.

use proptest::prelude::*;
use umbra_core::Placement;
use umbra_engine::{Engine, EngineConfig};

const COMMANDS: &[&str] = &[
    "look",
    "n",
    "s",
    "e",
    "w",
    "out",
    "in",
    "search leaves",
    "take lighter",
    "drop lighter",
    "burn vines",
    "open panel",
    "close panel",
    "switch on actuator",
    "switch off actuator",
    "take lantern",
    "switch on lantern",
    "put lighter in panel",
    "take coin",
    "unscrew vent",
    "sleep",
    "wake",
    "focus on mirror",
    "wear void",
    "remove void",
    "inventory",
    "xyzzy",
    "",
];

fn commands() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(COMMANDS), 0..60)
}

/// Check that the world and the session agree about where things are.
fn assert_consistent(engine: &Engine) -> Result<(), TestCaseError> {
    let state = engine.state();
    let world = engine.world();

    for object in world.objects() {
        let carried = object.placement.is_carried();
        prop_assert_eq!(carried, state.has_item(&object.id), "inventory mismatch for {}", &object.id);
        prop_assert_eq!(object.is_worn, state.is_wearing(&object.id), "worn mismatch for {}", &object.id);
        if object.is_worn {
            prop_assert!(carried, "{} is worn but not carried", &object.id);
        }
        if let Placement::Room(room) = &object.placement {
            let room = world.room(room).expect("placement names a known room");
            prop_assert!(room.objects.contains(&object.id));
        }
    }
    for room in world.rooms() {
        for id in &room.objects {
            let object = world.object(id).expect("room lists a known object");
            prop_assert_eq!(object.placement.location(), Some(room.id.as_str()));
        }
    }
    prop_assert!(world.room(&state.current_room).is_some());
    Ok(())
}

proptest! {
    #[test]
    fn every_command_is_a_turn(inputs in commands()) {
        let mut engine = Engine::new(EngineConfig::default(), None).unwrap();
        let mut last = engine.state().turn;
        for input in &inputs {
            engine.execute(input);
            let turn = engine.state().turn;
            prop_assert_eq!(turn, last + 1);
            last = turn;
        }
        prop_assert_eq!(last, inputs.len() as u64);
    }

    #[test]
    fn world_and_session_stay_consistent(inputs in commands()) {
        let mut engine = Engine::new(EngineConfig::default(), None).unwrap();
        for input in &inputs {
            engine.execute(input);
            assert_consistent(&engine)?;
        }
    }

    #[test]
    fn solved_puzzles_are_never_repeated(inputs in commands()) {
        let mut engine = Engine::new(EngineConfig::default(), None).unwrap();
        for input in &inputs {
            engine.execute(input);
        }
        let mut solved = engine.state().solved_puzzles;
        let total = solved.len();
        solved.sort();
        solved.dedup();
        prop_assert_eq!(solved.len(), total);
    }

    #[test]
    fn saves_restore_the_same_session(inputs in commands()) {
        let mut engine = Engine::new(EngineConfig::default(), None).unwrap();
        for input in &inputs {
            engine.execute(input);
        }
        let json = engine.serialize().unwrap();
        let restored = Engine::deserialize(&json, EngineConfig::default()).unwrap();
        prop_assert_eq!(restored.state(), engine.state());
        assert_consistent(&restored)?;
    }
}
