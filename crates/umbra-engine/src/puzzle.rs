//! The puzzle evaluator.
//!
//! Every evaluation re-scans all puzzles in content order and repeats the
//! scan until a pass solves nothing, so chains of puzzles settle within the
//! command that started them. The pass count is capped by
//! [`EngineConfig::max_evaluation_passes`](crate::EngineConfig).

use umbra_core::{Condition, ConditionKind, Puzzle, Value};

use crate::context::GameContext;

/// What one evaluation solved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Evaluation {
    /// Solved puzzle ids, in solve order.
    pub solved: Vec<String>,
    /// Solve messages, in solve order.
    pub messages: Vec<String>,
    /// Whether no puzzle was left ready to solve.
    pub settled: bool,
}

impl GameContext<'_> {
    pub(crate) fn evaluate_puzzles(&mut self) -> Evaluation {
        let mut evaluation = Evaluation::default();
        for _ in 0..self.config.max_evaluation_passes {
            let mut progressed = false;
            for index in 0..self.world.puzzles().len() {
                let puzzle = &self.world.puzzles()[index];
                if self.is_ready(puzzle) {
                    let puzzle = puzzle.clone();
                    self.solve(&puzzle, &mut evaluation);
                    progressed = true;
                }
            }
            if !progressed {
                evaluation.settled = true;
                return evaluation;
            }
        }
        evaluation.settled = !self.world.puzzles().iter().any(|p| self.is_ready(p));
        if !evaluation.settled {
            tracing::warn!(
                passes = self.config.max_evaluation_passes,
                "puzzle evaluation hit the pass limit"
            );
        }
        evaluation
    }

    /// Unsolved, prerequisites solved, and every condition holds.
    fn is_ready(&self, puzzle: &Puzzle) -> bool {
        !puzzle.solved
            && !self.state.is_solved(&puzzle.id)
            && puzzle.depends_on.iter().all(|dep| self.state.is_solved(dep))
            && puzzle.conditions.iter().all(|c| self.condition_holds(c))
    }

    fn condition_holds(&self, condition: &Condition) -> bool {
        let expected = &condition.value;
        match condition.kind {
            ConditionKind::ObjectState => {
                let Some(object) = self.world.object(&condition.target) else {
                    return false;
                };
                let Some(path) = condition.property.as_deref() else {
                    return false;
                };
                let actual = object.property(path).or_else(|| {
                    // Unset custom state reads as false.
                    (path.starts_with("customState.") || path.starts_with("custom_state."))
                        .then_some(Value::Boolean(false))
                });
                actual.is_some_and(|actual| actual.loosely_eq(expected))
            }
            ConditionKind::Inventory => {
                self.state.has_item(&condition.target) == expected.is_truthy()
            }
            ConditionKind::Flag => self
                .state
                .flag(&condition.target)
                .cloned()
                .unwrap_or(Value::Boolean(false))
                .loosely_eq(expected),
            ConditionKind::Room => {
                (self.state.current_room == condition.target) == expected.is_truthy()
            }
        }
    }

    fn solve(&mut self, puzzle: &Puzzle, evaluation: &mut Evaluation) {
        tracing::debug!(puzzle = %puzzle.id, "puzzle solved");
        if let Some(p) = self.world.puzzle_mut(&puzzle.id) {
            p.solved = true;
        }
        self.state.solved_puzzles.push(puzzle.id.clone());
        for effect in &puzzle.effects {
            self.apply_effect(effect);
        }
        evaluation.solved.push(puzzle.id.clone());
        evaluation.messages.extend(puzzle.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use umbra_core::{
        Effect, GameObject, NarrativeRules, Placement, Room, World, WorldData,
    };

    use crate::config::EngineConfig;
    use crate::context::GameContext;
    use crate::player::SessionState;

    use super::*;

    fn world(puzzles: Vec<Puzzle>) -> World {
        World::from_data(WorldData {
            rules: NarrativeRules {
                start_room: "hall".into(),
                ..Default::default()
            },
            rooms: vec![Room::new("hall", "Hall")],
            objects: vec![
                GameObject::new("lever", "lever").at(Placement::Room("hall".into())),
            ],
            puzzles,
            ..Default::default()
        })
    }

    fn evaluate(world: &mut World, state: &mut SessionState) -> Evaluation {
        evaluate_with(world, state, &EngineConfig::default())
    }

    fn evaluate_with(
        world: &mut World,
        state: &mut SessionState,
        config: &EngineConfig,
    ) -> Evaluation {
        GameContext::new(world, state, config).evaluate_puzzles()
    }

    fn reversed_chain() -> Vec<Puzzle> {
        vec![
            Puzzle::new("b", "B").requires("a"),
            Puzzle::new("a", "A"),
        ]
    }

    #[test]
    fn chain_settles_in_one_evaluation() {
        // Declared in reverse so a single pass could not solve all three.
        let mut world = world(vec![
            Puzzle::new("c", "C").requires("b").with_condition(Condition::flag("b_done", true)),
            Puzzle::new("b", "B")
                .requires("a")
                .with_effect(Effect::SetFlag {
                    flag: "b_done".into(),
                    value: true.into(),
                }),
            Puzzle::new("a", "A").with_condition(Condition::object_state(
                "lever",
                "customState.pulled",
                true,
            )),
        ]);
        let mut state = SessionState::new("hall");

        assert!(evaluate(&mut world, &mut state).solved.is_empty());

        world
            .object_mut("lever")
            .unwrap()
            .custom_state
            .insert("pulled".into(), true.into());
        let evaluation = evaluate(&mut world, &mut state);
        assert_eq!(evaluation.solved, vec!["a", "b", "c"]);
        assert_eq!(state.solved_puzzles, vec!["a", "b", "c"]);
    }

    #[test]
    fn last_pass_that_settles_is_not_a_limit_hit() {
        let config = EngineConfig::default().with_max_evaluation_passes(1);
        let mut world = world(vec![Puzzle::new("p", "P")]);
        let mut state = SessionState::new("hall");
        let evaluation = evaluate_with(&mut world, &mut state, &config);
        assert_eq!(evaluation.solved, vec!["p"]);
        assert!(evaluation.settled);
    }

    #[test]
    fn pass_limit_leaves_ready_puzzles_for_later() {
        let config = EngineConfig::default().with_max_evaluation_passes(1);
        let mut world = world(reversed_chain());
        let mut state = SessionState::new("hall");

        let first = evaluate_with(&mut world, &mut state, &config);
        assert_eq!(first.solved, vec!["a"]);
        assert!(!first.settled);

        let second = evaluate_with(&mut world, &mut state, &config);
        assert_eq!(second.solved, vec!["b"]);
        assert!(second.settled);
    }

    #[test]
    fn solved_puzzles_never_fire_twice() {
        let mut world = world(vec![Puzzle::new("p", "P").with_effect(Effect::TriggerEvent {
            event: "rang".into(),
        })]);
        let mut state = SessionState::new("hall");
        assert_eq!(evaluate(&mut world, &mut state).solved, vec!["p"]);
        state.flags.clear();
        assert!(evaluate(&mut world, &mut state).solved.is_empty());
        assert!(state.flags.is_empty());
        assert_eq!(state.solved_puzzles, vec!["p"]);
    }

    #[test]
    fn unset_custom_state_reads_false() {
        let mut world = world(vec![Puzzle::new("p", "P").with_condition(
            Condition::object_state("lever", "customState.broken", false),
        )]);
        let mut state = SessionState::new("hall");
        assert_eq!(evaluate(&mut world, &mut state).solved, vec!["p"]);
    }

    #[test]
    fn inventory_and_room_conditions() {
        let mut world = world(vec![
            Puzzle::new("p", "P")
                .with_condition(Condition::carrying("lever"))
                .with_condition(Condition::in_room("hall")),
        ]);
        let mut state = SessionState::new("hall");
        assert!(evaluate(&mut world, &mut state).solved.is_empty());
        state.inventory.push("lever".into());
        assert_eq!(evaluate(&mut world, &mut state).solved, vec!["p"]);
    }

    #[test]
    fn numeric_flags_compare_loosely() {
        let mut world = world(vec![
            Puzzle::new("p", "P").with_condition(Condition::flag("count", Value::Float(2.0))),
        ]);
        let mut state = SessionState::new("hall");
        state.set_flag("count", 2i64);
        assert_eq!(evaluate(&mut world, &mut state).solved, vec!["p"]);
    }
}
