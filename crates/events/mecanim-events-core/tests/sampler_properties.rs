use std::collections::HashMap;

use mecanim_events_core::{
    sample_layer, AnimatorSnapshot, ConditionTerm, Config, ControllerId, EntityId, EventCondition,
    EventData, EventDataEntry, EventSampler, EventTable, FiredEvent, IntMode, LayerQuery,
    MissingParameterPolicy, NoParameters, ParameterMap, PlaybackSample, StateHash, StateKey,
    TimedEvent, LOOP_EPSILON,
};

const CTRL: ControllerId = ControllerId(42);
const LOOP: StateHash = StateHash(1);
const ONCE: StateHash = StateHash(2);
const NEXT: StateHash = StateHash(3);

fn lq() -> LayerQuery {
    LayerQuery {
        controller: CTRL,
        layer: 0,
    }
}

/// Ten evenly spaced events named by their time, plus one at exactly 1.0.
fn grid_entry(state: StateHash) -> EventDataEntry {
    let mut entry = EventDataEntry::new(CTRL, 0, state);
    for i in 0..10 {
        let t = i as f32 / 10.0;
        entry = entry.with_event(TimedEvent::new(format!("e{i}"), t));
    }
    entry.with_event(TimedEvent::new("end", 1.0))
}

fn grid_table() -> EventTable {
    EventTable::from_data(
        &EventData::new()
            .with_entry(grid_entry(LOOP))
            .with_entry(grid_entry(ONCE))
            .with_entry(
                EventDataEntry::new(CTRL, 0, NEXT)
                    .with_event(TimedEvent::new("next_early", 0.05))
                    .with_event(TimedEvent::new("next_late", 0.5)),
            ),
    )
}

fn names(fired: &[FiredEvent]) -> Vec<&str> {
    fired.iter().map(|f| f.function_name()).collect()
}

fn fire(table: &EventTable, prev: PlaybackSample, curr: PlaybackSample) -> Vec<FiredEvent> {
    sample_layer(
        &prev,
        &curr,
        lq(),
        table,
        &NoParameters,
        MissingParameterPolicy::FailClosed,
    )
}

#[test]
fn same_loop_returns_exactly_events_in_half_open_interval() {
    let table = grid_table();
    let events = table.events(&StateKey::new(CTRL, 0, LOOP)).to_vec();
    let cuts = [0.0f32, 0.05, 0.1, 0.33, 0.5, 0.77, 0.9, 0.95, 0.999];
    for &a in &cuts {
        for &b in &cuts {
            if b < a {
                continue;
            }
            let fired = fire(
                &table,
                PlaybackSample::new(LOOP, a, true),
                PlaybackSample::new(LOOP, b, true),
            );
            let expected: Vec<&str> = events
                .iter()
                .filter(|e| e.scheduled_time >= a && e.scheduled_time < b)
                .map(|e| e.function_name.as_str())
                .collect();
            assert_eq!(names(&fired), expected, "[{a}, {b})");
        }
    }
}

#[test]
fn loop_wraparound_unions_tail_and_head_once() {
    let table = grid_table();
    let fired = fire(
        &table,
        PlaybackSample::new(LOOP, 0.9, true),
        PlaybackSample::new(LOOP, 1.05, true),
    );
    assert_eq!(names(&fired), vec!["e9", "end", "e0"]);
}

#[test]
fn wraparound_over_several_loops_fires_each_event_once() {
    let table = grid_table();
    let fired = fire(
        &table,
        PlaybackSample::new(LOOP, 0.95, true),
        PlaybackSample::new(LOOP, 3.15, true),
    );
    assert_eq!(names(&fired), vec!["end", "e0", "e1"]);
}

#[test]
fn loop_epsilon_reaches_just_past_one() {
    assert!(LOOP_EPSILON > 1.0 && LOOP_EPSILON < 1.001);
}

#[test]
fn stationary_non_looping_poll_fires_nothing() {
    let table = grid_table();
    for t in [0.0, 0.3, 0.5, 0.999] {
        let s = PlaybackSample::new(ONCE, t, false);
        assert!(fire(&table, s, s).is_empty(), "t={t}");
    }
}

#[test]
fn paused_looping_poll_fires_nothing() {
    let table = grid_table();
    for t in [0.0, 0.5, 2.3] {
        let s = PlaybackSample::new(LOOP, t, true);
        assert!(fire(&table, s, s).is_empty(), "t={t}");
    }
}

#[test]
fn interrupted_non_looping_state_fires_critical_tail_and_new_head() {
    let mut once = grid_entry(ONCE);
    for e in &mut once.events {
        e.critical = e.function_name == "e8" || e.function_name == "e2";
    }
    let table = EventTable::from_data(
        &EventData::new().with_entry(once).with_entry(
            EventDataEntry::new(CTRL, 0, NEXT)
                .with_event(TimedEvent::new("next_early", 0.05))
                .with_event(TimedEvent::new("next_late", 0.5)),
        ),
    );
    let fired = fire(
        &table,
        PlaybackSample::new(ONCE, 0.6, false),
        PlaybackSample::new(NEXT, 0.1, true),
    );
    assert_eq!(names(&fired), vec!["next_early", "e8"]);
    assert_eq!(fired[0].context.state, NEXT);
    assert_eq!(fired[1].context.state, ONCE);
}

#[test]
fn non_looping_state_first_seen_past_its_end_keeps_critical_tail() {
    let mut once = grid_entry(ONCE);
    for e in &mut once.events {
        e.critical = e.function_name == "e9";
    }
    let table = EventTable::from_data(&EventData::new().with_entry(once).with_entry(
        EventDataEntry::new(CTRL, 0, NEXT).with_event(TimedEvent::new("next_early", 0.05)),
    ));
    let mut sampler = EventSampler::new(Config::default());
    let mut poll = |sample: PlaybackSample| -> Vec<String> {
        sampler
            .poll_layer(EntityId(0), CTRL, 0, sample, &table, &NoParameters)
            .into_iter()
            .map(|f| f.event.function_name)
            .collect()
    };

    assert_eq!(poll(PlaybackSample::new(NEXT, 0.5, true)), vec!["next_early"]);
    // The short clip finished between polls: only its head is swept on entry.
    assert_eq!(poll(PlaybackSample::new(ONCE, 1.25, false)), vec!["e0", "e1", "e2"]);
    assert_eq!(poll(PlaybackSample::new(NEXT, 0.1, true)), vec!["next_early", "e9"]);
}

#[test]
fn disabled_critical_event_stays_silent_in_interrupted_tail() {
    let mut once = grid_entry(ONCE);
    for e in &mut once.events {
        e.critical = e.function_name == "e7" || e.function_name == "e8";
        e.enabled = e.function_name != "e7";
    }
    let table = EventTable::from_data(&EventData::new().with_entry(once));
    let fired = fire(
        &table,
        PlaybackSample::new(ONCE, 0.6, false),
        PlaybackSample::new(NEXT, 0.3, true),
    );
    assert_eq!(names(&fired), vec!["e8"]);
    assert!(fired.iter().all(|f| f.event.enabled && f.event.critical));
}

#[test]
fn disabled_events_never_fire() {
    let mut entry = grid_entry(LOOP);
    for e in &mut entry.events {
        e.enabled = false;
    }
    let table = EventTable::from_data(&EventData::new().with_entry(entry));
    let mut sampler = EventSampler::new(Config::default());
    for i in 0..400 {
        let t = i as f32 * 0.013;
        let fired = sampler.poll_layer(
            EntityId(0),
            CTRL,
            0,
            PlaybackSample::new(LOOP, t, true),
            &table,
            &NoParameters,
        );
        assert!(fired.is_empty(), "t={t}");
    }
}

#[test]
fn int_greater_than_condition_gates_firing() {
    let cond =
        EventCondition::new().with_term(ConditionTerm::int("Combo", IntMode::GreaterThan, 5));
    let table = EventTable::from_data(
        &EventData::new().with_entry(
            EventDataEntry::new(CTRL, 0, LOOP)
                .with_event(TimedEvent::new("Finisher", 0.5).with_condition(cond)),
        ),
    );
    let prev = PlaybackSample::new(LOOP, 0.4, true);
    let curr = PlaybackSample::new(LOOP, 0.6, true);

    for (combo, should_fire) in [(4, false), (5, false), (6, true)] {
        let mut params = ParameterMap::new();
        params.set_int("Combo", combo);
        let fired = sample_layer(
            &prev,
            &curr,
            lq(),
            &table,
            &params,
            MissingParameterPolicy::FailClosed,
        );
        assert_eq!(!fired.is_empty(), should_fire, "Combo={combo}");
    }
}

#[test]
fn missing_parameter_policy_is_configurable() {
    let cond = EventCondition::new().with_term(ConditionTerm::bool("Typo", true));
    let table = EventTable::from_data(
        &EventData::new().with_entry(
            EventDataEntry::new(CTRL, 0, LOOP)
                .with_event(TimedEvent::new("Gated", 0.5).with_condition(cond)),
        ),
    );
    let prev = PlaybackSample::new(LOOP, 0.4, true);
    let curr = PlaybackSample::new(LOOP, 0.6, true);
    let policies = [
        MissingParameterPolicy::FailClosed,
        MissingParameterPolicy::FailOpen,
    ];
    let [closed, open] =
        policies.map(|policy| sample_layer(&prev, &curr, lq(), &table, &NoParameters, policy));
    assert!(closed.is_empty());
    assert_eq!(names(&open), vec!["Gated"]);
}

#[test]
fn steady_playback_fires_every_event_once_per_loop() {
    let table = grid_table();
    let mut sampler = EventSampler::new(Config::default());
    let mut counts: HashMap<String, usize> = HashMap::new();

    // 0.013 per tick up to t = 4.446: four wraps, the fifth loop stops before 0.45.
    for i in 0..=342 {
        let t = i as f32 * 0.013;
        for f in sampler.poll_layer(
            EntityId(0),
            CTRL,
            0,
            PlaybackSample::new(LOOP, t, true),
            &table,
            &NoParameters,
        ) {
            *counts.entry(f.event.function_name).or_default() += 1;
        }
    }

    for i in 0..10 {
        let expected = if i <= 4 { 5 } else { 4 };
        assert_eq!(counts.get(&format!("e{i}")).copied(), Some(expected), "e{i}");
    }
    assert_eq!(counts.get("end").copied(), Some(4));
}

#[test]
fn non_looping_playthrough_fires_each_event_once() {
    let table = grid_table();
    let mut sampler = EventSampler::new(Config::default());
    let mut fired_names = Vec::new();
    for i in 0..=150 {
        let t = i as f32 * 0.017;
        for f in sampler.poll_layer(
            EntityId(0),
            CTRL,
            0,
            PlaybackSample::new(ONCE, t, false),
            &table,
            &NoParameters,
        ) {
            fired_names.push(f.event.function_name);
        }
    }
    let expected: Vec<String> = (0..10)
        .map(|i| format!("e{i}"))
        .chain(std::iter::once("end".to_string()))
        .collect();
    assert_eq!(fired_names, expected);
}

#[test]
fn identical_inputs_produce_identical_outputs() {
    let table = grid_table();
    let script: Vec<(StateHash, f32, bool)> = vec![
        (LOOP, 0.2, true),
        (LOOP, 0.95, true),
        (LOOP, 1.3, true),
        (ONCE, 0.4, false),
        (ONCE, 0.8, false),
        (NEXT, 0.6, true),
        (LOOP, 0.1, true),
        (LOOP, 3.7, true),
    ];

    let run = || {
        let mut sampler = EventSampler::new(Config::default());
        let mut out: Vec<Vec<FiredEvent>> = Vec::new();
        for (state, t, looping) in &script {
            let animator = AnimatorSnapshot::new(vec![PlaybackSample::new(*state, *t, *looping)]);
            out.push(sampler.poll(EntityId(5), CTRL, &animator, &table));
        }
        out
    };

    let a = run();
    let b = run();
    assert_eq!(a, b);
    assert!(a.iter().any(|poll| !poll.is_empty()));
}

#[test]
fn fired_copies_never_touch_the_table() {
    let table = grid_table();
    let key = StateKey::new(CTRL, 0, LOOP);
    let before = table.events(&key).to_vec();

    let mut fired = fire(
        &table,
        PlaybackSample::new(LOOP, 0.0, true),
        PlaybackSample::new(LOOP, 0.35, true),
    );
    for f in &mut fired {
        f.event.enabled = false;
        f.event.critical = true;
        f.event.function_name.push_str("_mutated");
    }

    assert_eq!(table.events(&key), before.as_slice());
    let again = fire(
        &table,
        PlaybackSample::new(LOOP, 0.0, true),
        PlaybackSample::new(LOOP, 0.35, true),
    );
    assert_eq!(names(&again), vec!["e0", "e1", "e2", "e3"]);
}

#[test]
fn entities_and_layers_are_tracked_independently() {
    let table = grid_table();
    let mut sampler = EventSampler::new(Config::default());
    let a = AnimatorSnapshot::new(vec![
        PlaybackSample::new(LOOP, 0.15, true),
        PlaybackSample::new(LOOP, 0.15, true),
    ]);
    sampler.poll(EntityId(1), CTRL, &a, &table);

    // Entity 2 has never been seen: it starts from the zeroed sample.
    let b = AnimatorSnapshot::new(vec![PlaybackSample::new(LOOP, 0.25, true)]);
    let fired = sampler.poll(EntityId(2), CTRL, &b, &table);
    assert_eq!(names(&fired), vec!["e0", "e1", "e2"]);

    // Entity 1 continues from 0.15 on layer 0.
    let a2 = AnimatorSnapshot::new(vec![PlaybackSample::new(LOOP, 0.25, true)]);
    let fired = sampler.poll(EntityId(1), CTRL, &a2, &table);
    assert_eq!(names(&fired), vec!["e2"]);
    assert_eq!(sampler.state().len(), 3);
}
