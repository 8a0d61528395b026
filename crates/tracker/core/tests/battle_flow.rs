use tracker_core::{
    Attack, AttackCategory, BattleEngine, BattleEvent, BattleId, BattleState, CombatantKind,
    CombatantTemplate, ConditionId, DamageRoll, EngineError, ErrorKind, NegotiationStatus,
    PersistentDamage, PersistentDamageTiming, StatId, Stats, Template, TieMode, TrackerConfig,
    reduce,
};

fn creature(name: &str, level: i32, max_hp: i32) -> CombatantTemplate {
    let mut template = CombatantTemplate::new(name.to_lowercase(), name, CombatantKind::Creature);
    template.level = level;
    template.max_hp = max_hp;
    template
}

fn player(name: &str, max_hp: i32) -> CombatantTemplate {
    let mut template = CombatantTemplate::new(name.to_lowercase(), name, CombatantKind::Player);
    template.level = 1;
    template.max_hp = max_hp;
    template
}

fn add(engine: &mut BattleEngine<'_>, template: CombatantTemplate) -> BattleId {
    engine
        .execute(BattleEvent::AddCombatant(template))
        .expect("add should succeed")
        .added
        .expect("add reports the new id")
}

fn execute(engine: &mut BattleEngine<'_>, event: BattleEvent) -> tracker_core::EventOutcome {
    engine.execute(event).expect("event should succeed")
}

/// Runs negotiation with one initiative per queued combatant, in queue order.
fn negotiate(engine: &mut BattleEngine<'_>, initiatives: &[i32]) -> NegotiationStatus {
    let mut status = execute(engine, BattleEvent::StartBattle).negotiation;
    for value in initiatives {
        status = execute(engine, BattleEvent::ConfirmInitiative(*value)).negotiation;
    }
    status.expect("negotiation events report a status")
}

fn initiative_of(state: &BattleState, name: &str) -> Option<i32> {
    state
        .roster
        .iter()
        .find(|c| c.name == name)
        .and_then(|c| c.initiative)
}

#[test]
fn initial_tie_is_broken_by_a_single_point() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    add(&mut engine, creature("Goblin", 1, 6));
    add(&mut engine, creature("Orc", 2, 20));
    add(&mut engine, creature("Wolf", 1, 14));

    let status = execute(&mut engine, BattleEvent::StartBattle).negotiation;
    assert_eq!(
        status,
        Some(NegotiationStatus::AwaitingInitiative {
            next: BattleId(1),
            name: "Goblin".into(),
        })
    );

    execute(&mut engine, BattleEvent::ConfirmInitiative(10));
    execute(&mut engine, BattleEvent::ConfirmInitiative(10));
    let status = execute(&mut engine, BattleEvent::ConfirmInitiative(8)).negotiation;
    assert_eq!(
        status,
        Some(NegotiationStatus::TieResolution {
            mode: TieMode::Initial,
            tied: vec![BattleId(1), BattleId(2)],
            contested: 10,
        })
    );

    // Turns cannot start while the tie is open.
    assert_eq!(
        engine.execute(BattleEvent::FinishTurn),
        Err(EngineError::NegotiationInProgress)
    );

    let outcome = execute(&mut engine, BattleEvent::ResolveTie(Some(BattleId(1))));
    assert_eq!(
        outcome.negotiation,
        Some(NegotiationStatus::Sorted {
            order: vec![BattleId(4), BattleId(5), BattleId(3)],
        })
    );
    assert_eq!(
        outcome.reissued,
        vec![(BattleId(1), BattleId(4)), (BattleId(2), BattleId(5))]
    );

    let state = engine.state();
    assert_eq!(initiative_of(state, "Goblin"), Some(11));
    assert_eq!(initiative_of(state, "Orc"), Some(10));
    assert_eq!(initiative_of(state, "Wolf"), Some(8));
    assert!(!state.is_negotiating());
}

#[test]
fn cancelling_a_tie_prompt_changes_nothing() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    add(&mut engine, creature("Goblin", 1, 6));
    add(&mut engine, creature("Orc", 2, 20));
    negotiate(&mut engine, &[12, 12]);

    let before = engine.state().clone();
    let outcome = execute(&mut engine, BattleEvent::ResolveTie(None));
    assert!(!outcome.changed);
    assert_eq!(*engine.state(), before);
}

#[test]
fn scheduler_skips_downed_creatures_and_counts_rounds() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let valeros = add(&mut engine, player("Valeros", 30));
    let goblin = add(&mut engine, creature("Goblin", 1, 6));
    let orc = add(&mut engine, creature("Orc", 2, 20));
    negotiate(&mut engine, &[20, 15, 10]);

    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round, turn.new_round), (valeros, 1, false));

    execute(
        &mut engine,
        BattleEvent::ApplyDamage {
            target: goblin,
            amount: 6,
        },
    );

    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!(turn.active, orc);
    assert_eq!(turn.skipped, vec![goblin]);
    assert_eq!(turn.round, 1);

    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!(turn.active, valeros);
    assert_eq!(turn.round, 2);
    assert!(turn.new_round);

    // A downed player keeps their turn.
    execute(
        &mut engine,
        BattleEvent::ApplyDamage {
            target: valeros,
            amount: 50,
        },
    );
    execute(&mut engine, BattleEvent::FinishTurn);
    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round), (valeros, 3));
}

#[test]
fn round_advances_only_when_the_turn_lands_on_the_top_of_the_order() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let ogre = add(&mut engine, creature("Ogre", 3, 10));
    let goblin = add(&mut engine, creature("Goblin", 1, 10));
    let wolf = add(&mut engine, creature("Wolf", 1, 10));
    negotiate(&mut engine, &[20, 15, 10]);

    for (target, amount) in [(ogre, 10), (goblin, 5), (wolf, 5)] {
        execute(&mut engine, BattleEvent::ApplyDamage { target, amount });
    }

    // The first call seats the top of the order even though it is down.
    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round, turn.new_round), (ogre, 1, false));

    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round, turn.new_round), (goblin, 1, false));
    assert!(turn.skipped.is_empty());

    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round, turn.new_round), (wolf, 1, false));

    // Wrapping past the downed ogre lands on index 1, not 0.
    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round, turn.new_round), (goblin, 1, false));
    assert_eq!(turn.skipped, vec![ogre]);

    execute(
        &mut engine,
        BattleEvent::ApplyHeal {
            target: ogre,
            amount: 4,
        },
    );
    execute(&mut engine, BattleEvent::FinishTurn);
    let turn = execute(&mut engine, BattleEvent::FinishTurn).turn.unwrap();
    assert_eq!((turn.active, turn.round, turn.new_round), (ogre, 2, true));
    assert_eq!(engine.state().turn.round, 2);
}

#[test]
fn persistent_damage_drains_temp_hp_then_asks_whether_it_ended() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let goblin = add(&mut engine, creature("Goblin", 1, 10));
    execute(
        &mut engine,
        BattleEvent::SetTempHp {
            target: goblin,
            value: 3,
        },
    );
    execute(
        &mut engine,
        BattleEvent::ApplyCondition {
            target: goblin,
            condition: ConditionId::PersistentDamage,
            instance: Some(PersistentDamage::new("fire", 5)),
        },
    );
    negotiate(&mut engine, &[14]);

    execute(&mut engine, BattleEvent::FinishTurn);
    let outcome = execute(&mut engine, BattleEvent::FinishTurn);

    let combatant = engine.state().combatant(goblin).unwrap();
    assert_eq!((combatant.temp_hp, combatant.hp), (0, 8));
    let prompt = outcome.prompt.expect("surviving target is prompted");
    assert_eq!(prompt.target, goblin);
    assert_eq!(prompt.instance, PersistentDamage::new("fire", 5));

    let before = engine.state().clone();
    assert_eq!(
        engine.execute(BattleEvent::FinishTurn),
        Err(EngineError::PromptPending { target: goblin })
    );
    assert_eq!(*engine.state(), before);

    let outcome = execute(&mut engine, BattleEvent::ResolvePersistentDamage { ended: true });
    assert!(outcome.prompt.is_none());
    assert!(
        engine
            .state()
            .combatant(goblin)
            .unwrap()
            .persistent_damage()
            .is_empty()
    );
    execute(&mut engine, BattleEvent::FinishTurn);
}

#[test]
fn prompt_for_a_manually_cleared_instance_can_still_be_closed() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let goblin = add(&mut engine, creature("Goblin", 1, 10));
    execute(
        &mut engine,
        BattleEvent::ApplyCondition {
            target: goblin,
            condition: ConditionId::PersistentDamage,
            instance: Some(PersistentDamage::new("fire", 2)),
        },
    );
    negotiate(&mut engine, &[14]);
    execute(&mut engine, BattleEvent::FinishTurn);
    let outcome = execute(&mut engine, BattleEvent::FinishTurn);
    assert!(outcome.prompt.is_some());

    execute(
        &mut engine,
        BattleEvent::ClearCondition {
            target: goblin,
            condition: ConditionId::PersistentDamage,
        },
    );

    let outcome = execute(&mut engine, BattleEvent::ResolvePersistentDamage { ended: true });
    assert!(outcome.prompt.is_none());
    assert!(engine.state().pending_prompt.is_none());
    assert!(execute(&mut engine, BattleEvent::FinishTurn).turn.is_some());
}

#[test]
fn persistent_damage_that_drops_the_target_ends_silently() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let goblin = add(&mut engine, creature("Goblin", 1, 4));
    execute(
        &mut engine,
        BattleEvent::ApplyCondition {
            target: goblin,
            condition: ConditionId::PersistentDamage,
            instance: Some(PersistentDamage::new("bleed", 6)),
        },
    );
    negotiate(&mut engine, &[9]);

    execute(&mut engine, BattleEvent::FinishTurn);
    let outcome = execute(&mut engine, BattleEvent::FinishTurn);

    assert!(outcome.prompt.is_none());
    let combatant = engine.state().combatant(goblin).unwrap();
    assert_eq!(combatant.hp, 0);
    assert!(!combatant.conditions.contains_key(&ConditionId::PersistentDamage));
}

#[test]
fn start_of_turn_timing_resolves_for_the_incoming_combatant() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state).with_config(
        TrackerConfig::default().with_persistent_damage_timing(PersistentDamageTiming::StartOfTurn),
    );
    let orc = add(&mut engine, creature("Orc", 2, 20));
    let goblin = add(&mut engine, creature("Goblin", 1, 10));
    execute(
        &mut engine,
        BattleEvent::ApplyCondition {
            target: goblin,
            condition: ConditionId::PersistentDamage,
            instance: Some(PersistentDamage::new("acid", 2)),
        },
    );
    negotiate(&mut engine, &[20, 10]);

    let outcome = execute(&mut engine, BattleEvent::FinishTurn);
    assert_eq!(outcome.turn.unwrap().active, orc);
    assert!(outcome.prompt.is_none());

    let outcome = execute(&mut engine, BattleEvent::FinishTurn);
    assert_eq!(outcome.turn.unwrap().active, goblin);
    assert_eq!(outcome.prompt.map(|p| p.target), Some(goblin));
    assert_eq!(engine.state().combatant(goblin).unwrap().hp, 8);
}

#[test]
fn end_of_turn_timing_waits_for_the_turn_to_finish() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let orc = add(&mut engine, creature("Orc", 2, 20));
    let goblin = add(&mut engine, creature("Goblin", 1, 10));
    execute(
        &mut engine,
        BattleEvent::ApplyCondition {
            target: goblin,
            condition: ConditionId::PersistentDamage,
            instance: Some(PersistentDamage::new("acid", 2)),
        },
    );
    negotiate(&mut engine, &[20, 10]);

    execute(&mut engine, BattleEvent::FinishTurn);
    let outcome = execute(&mut engine, BattleEvent::FinishTurn);
    assert!(outcome.prompt.is_none());
    assert_eq!(engine.state().combatant(goblin).unwrap().hp, 10);

    let outcome = execute(&mut engine, BattleEvent::FinishTurn);
    assert_eq!(outcome.turn.unwrap().active, orc);
    assert_eq!(outcome.prompt.map(|p| p.target), Some(goblin));
    assert_eq!(engine.state().combatant(goblin).unwrap().hp, 8);
}

#[test]
fn drained_stacks_shrink_max_hp_by_level() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let ogre = add(&mut engine, creature("Ogre", 3, 50));

    for _ in 0..2 {
        execute(
            &mut engine,
            BattleEvent::ApplyCondition {
                target: ogre,
                condition: ConditionId::Drained,
                instance: None,
            },
        );
    }
    let combatant = engine.state().combatant(ogre).unwrap();
    assert_eq!((combatant.hp, combatant.max_hp), (44, 44));
    assert_eq!(combatant.original_max_hp, Some(50));

    execute(
        &mut engine,
        BattleEvent::RemoveCondition {
            target: ogre,
            condition: ConditionId::Drained,
            instance: None,
        },
    );
    let combatant = engine.state().combatant(ogre).unwrap();
    assert_eq!(combatant.stacks(ConditionId::Drained), 1);
    assert_eq!((combatant.hp, combatant.max_hp), (47, 47));
}

#[test]
fn weak_template_round_trips_exactly() {
    let mut ogre = creature("Ogre", 3, 50);
    ogre.stats = Stats::default()
        .with(StatId::Ac, 17)
        .with(StatId::Fortitude, 12)
        .with(StatId::Will, 5);
    ogre.attacks.push(
        Attack::new("ogre hook", AttackCategory::Melee)
            .with_hit_modifiers([13, 8, 3])
            .with_damage(DamageRoll::new(1, 10, 7).with_type("piercing")),
    );

    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let id = add(&mut engine, ogre);
    let before = engine.state().combatant(id).unwrap().clone();

    execute(
        &mut engine,
        BattleEvent::ApplyTemplate {
            target: id,
            template: Template::Weak,
        },
    );
    let weak = engine.state().combatant(id).unwrap();
    assert_eq!((weak.hp, weak.max_hp, weak.level), (35, 35, 2));
    assert_eq!(weak.stats.ac, Some(15));
    assert_eq!(weak.attacks[0].hit_modifiers, [11, 6, 1]);

    assert_eq!(
        engine.execute(BattleEvent::ToggleTemplate {
            target: id,
            template: Template::Elite,
        }),
        Err(EngineError::ConflictingTemplate {
            combatant: id,
            active: Template::Weak,
            requested: Template::Elite,
        })
    );

    execute(&mut engine, BattleEvent::RemoveTemplate { target: id });
    assert_eq!(*engine.state().combatant(id).unwrap(), before);
}

#[test]
fn hp_stays_within_bounds() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let goblin = add(&mut engine, creature("Goblin", 1, 6));

    let events = [
        BattleEvent::ApplyDamage {
            target: goblin,
            amount: 4,
        },
        BattleEvent::ApplyHeal {
            target: goblin,
            amount: 100,
        },
        BattleEvent::ApplyDamage {
            target: goblin,
            amount: 100,
        },
        BattleEvent::ApplyHeal {
            target: goblin,
            amount: 2,
        },
    ];
    let mut seen = Vec::new();
    for event in events {
        execute(&mut engine, event);
        let combatant = engine.state().combatant(goblin).unwrap();
        assert!(0 <= combatant.hp && combatant.hp <= combatant.max_hp);
        seen.push(combatant.hp);
    }
    assert_eq!(seen, vec![2, 6, 0, 2]);
}

#[test]
fn rejected_events_leave_state_and_revision_untouched() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    let goblin = add(&mut engine, creature("Goblin", 1, 6));
    let before = engine.state().clone();

    let rejected = [
        BattleEvent::ApplyDamage {
            target: goblin,
            amount: -3,
        },
        BattleEvent::ApplyDamage {
            target: BattleId(99),
            amount: 3,
        },
        BattleEvent::RemoveCondition {
            target: goblin,
            condition: ConditionId::Frightened,
            instance: None,
        },
        BattleEvent::ConfirmInitiative(12),
        BattleEvent::ResolvePersistentDamage { ended: true },
        BattleEvent::FinishTurn,
    ];
    let kinds: Vec<ErrorKind> = rejected
        .into_iter()
        .map(|event| engine.execute(event).unwrap_err().kind())
        .collect();

    assert_eq!(
        kinds,
        vec![
            ErrorKind::InvalidInput,
            ErrorKind::NotFound,
            ErrorKind::NotFound,
            ErrorKind::InvariantViolation,
            ErrorKind::InvariantViolation,
            ErrorKind::InvariantViolation,
        ]
    );
    assert_eq!(*engine.state(), before);
}

#[test]
fn roster_size_is_capped() {
    let config = TrackerConfig {
        max_roster_size: 2,
        ..TrackerConfig::default()
    };
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state).with_config(config);
    add(&mut engine, creature("Goblin", 1, 6));
    add(&mut engine, creature("Orc", 2, 20));

    assert_eq!(
        engine.execute(BattleEvent::AddCombatant(creature("Wolf", 1, 14))),
        Err(EngineError::RosterFull { max: 2 })
    );
}

#[test]
fn combatants_added_mid_negotiation_join_the_queue() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    add(&mut engine, creature("Goblin", 1, 6));
    execute(&mut engine, BattleEvent::StartBattle);

    let wolf = add(&mut engine, creature("Wolf", 1, 14));
    let status = execute(&mut engine, BattleEvent::ConfirmInitiative(15)).negotiation;
    assert_eq!(
        status,
        Some(NegotiationStatus::AwaitingInitiative {
            next: wolf,
            name: "Wolf".into(),
        })
    );

    let status = execute(&mut engine, BattleEvent::SkipInitiative).negotiation;
    assert_eq!(
        status,
        Some(NegotiationStatus::Sorted {
            order: vec![BattleId(1)],
        })
    );
    assert_eq!(engine.state().roster.len(), 2);
    assert_eq!(initiative_of(engine.state(), "Wolf"), None);
}

#[test]
fn end_battle_clears_the_roster_and_rewinds_the_round() {
    let mut state = BattleState::new();
    let mut engine = BattleEngine::new(&mut state);
    add(&mut engine, creature("Goblin", 1, 6));
    add(&mut engine, creature("Orc", 2, 20));
    negotiate(&mut engine, &[12, 8]);
    for _ in 0..3 {
        execute(&mut engine, BattleEvent::FinishTurn);
    }
    assert_eq!(engine.state().turn.round, 2);

    execute(&mut engine, BattleEvent::EndBattle);
    let state = engine.state();
    assert!(state.roster.is_empty());
    assert_eq!(state.turn.round, 1);
    assert_eq!(state.turn.active, None);

    // Ids are never reused after a battle ends.
    let next = add(&mut engine, creature("Wolf", 1, 14));
    assert_eq!(next, BattleId(3));
}

#[test]
fn reduce_leaves_the_input_state_alone() {
    let state = BattleState::new();
    let (next, outcome) = reduce(
        &state,
        BattleEvent::AddCombatant(creature("Goblin", 1, 6)),
        &TrackerConfig::default(),
    )
    .unwrap();

    assert!(outcome.changed);
    assert_eq!(next.revision, 1);
    assert_eq!(next.roster.len(), 1);
    assert!(state.roster.is_empty());
    assert_eq!(state.revision, 0);
}
