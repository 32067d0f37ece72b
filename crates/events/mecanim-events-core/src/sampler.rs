//! Event sampler: recovers the normalized-time interval(s) a layer traversed between
//! two polls and collects the table events scheduled inside them.
//!
//! Planning and collection are split:
//! - [`plan_queries`] turns a (previous, current) sample pair into at most two
//!   [`IntervalQuery`]s (loop wraparound, end of a non-looping state, or a transition
//!   plus the critical tail of the interrupted state).
//! - [`collect_events`] filters one table entry against one interval, in table
//!   declaration order, stamping each match with its [`EventContext`].
//!
//! [`EventSampler`] owns the last-seen sample per (entity, layer) and drives both for
//! every layer of an animator.

use hashbrown::HashMap;

use crate::condition::ParameterSource;
use crate::config::{Config, MissingParameterPolicy};
use crate::event::{EventContext, FiredEvent};
use crate::ids::{ControllerId, EntityId, StateHash, StateKey, TagHash};
use crate::sample::{AnimatorSource, PlaybackSample};
use crate::table::EventTable;

/// Exclusive upper bound for intervals that run to the end of a loop. Slightly above
/// 1.0 so an event scheduled at exactly 1.0 still fires.
pub const LOOP_EPSILON: f32 = 1.00001;

/// Half-open normalized-time interval `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub start: f32,
    pub end: f32,
}

impl Interval {
    #[inline]
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// `[start, LOOP_EPSILON)`.
    #[inline]
    pub fn to_loop_end(start: f32) -> Self {
        Self::new(start, LOOP_EPSILON)
    }

    #[inline]
    pub fn contains(&self, t: f32) -> bool {
        t >= self.start && t < self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One interval to query against one state's events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntervalQuery {
    pub state: StateHash,
    pub tag: TagHash,
    pub interval: Interval,
    /// Only events flagged critical qualify.
    pub critical_only: bool,
}

impl IntervalQuery {
    fn all(sample: &PlaybackSample, interval: Interval) -> Self {
        Self {
            state: sample.state,
            tag: sample.tag,
            interval,
            critical_only: false,
        }
    }

    fn critical(sample: &PlaybackSample, interval: Interval) -> Self {
        Self {
            critical_only: true,
            ..Self::all(sample, interval)
        }
    }
}

/// Controller and layer a poll is sampling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayerQuery {
    pub controller: ControllerId,
    pub layer: u32,
}

/// Reconstruct the interval(s) traversed between `prev` and `curr` on one layer.
pub fn plan_queries(prev: &PlaybackSample, curr: &PlaybackSample) -> Vec<IntervalQuery> {
    let last_loop = prev.loop_index();
    let curr_loop = curr.loop_index();
    let last_frac = prev.fraction();
    let curr_frac = curr.fraction();

    let mut queries = Vec::with_capacity(2);

    if prev.state == curr.state {
        if curr.looping {
            if last_loop == curr_loop {
                queries.push(IntervalQuery::all(curr, Interval::new(last_frac, curr_frac)));
            } else {
                queries.push(IntervalQuery::all(curr, Interval::to_loop_end(last_frac)));
                queries.push(IntervalQuery::all(curr, Interval::new(0.0, curr_frac)));
            }
        } else {
            let start = prev.normalized_time.clamp(0.0, 1.0);
            let end = curr.normalized_time.clamp(0.0, 1.0);
            if last_loop == 0 && curr_loop == 0 {
                // A stationary sample must not re-fire the event sitting under it.
                if start != end {
                    queries.push(IntervalQuery::all(curr, Interval::new(start, end)));
                }
            } else if last_loop == 0 && curr_loop > 0 {
                // Overshoot past the end still belongs to the state that was playing.
                queries.push(IntervalQuery::all(prev, Interval::to_loop_end(start)));
            }
            // Otherwise the state ran out on an earlier poll.
        }
    } else {
        queries.push(IntervalQuery::all(curr, Interval::new(0.0, curr_frac)));

        // Critical tail of an interrupted non-looping state, swept from its fraction
        // even when the state was first seen past its end.
        if !prev.looping {
            queries.push(IntervalQuery::critical(prev, Interval::to_loop_end(last_frac)));
        }
    }

    queries
}

/// Collect the events of one table entry that qualify for `query`, in declaration order.
///
/// Matches are enabled, scheduled inside the interval, pass their condition, and are
/// critical when the query asks for critical events only. Each match is cloned so the
/// table entry is never touched.
pub fn collect_events(
    table: &EventTable,
    layer: LayerQuery,
    query: &IntervalQuery,
    params: &dyn ParameterSource,
    policy: MissingParameterPolicy,
) -> Vec<FiredEvent> {
    let key = StateKey::new(layer.controller, layer.layer, query.state);
    let context = EventContext {
        controller: layer.controller,
        layer: layer.layer,
        state: query.state,
        tag: query.tag,
    };

    table
        .events(&key)
        .iter()
        .filter(|e| e.enabled)
        .filter(|e| query.interval.contains(e.scheduled_time))
        .filter(|e| !query.critical_only || e.critical)
        .filter(|e| e.condition.test(params, policy))
        .map(|e| FiredEvent {
            event: e.clone(),
            context,
        })
        .collect()
}

/// Events fired on one layer between two samples.
pub fn sample_layer(
    prev: &PlaybackSample,
    curr: &PlaybackSample,
    layer: LayerQuery,
    table: &EventTable,
    params: &dyn ParameterSource,
    policy: MissingParameterPolicy,
) -> Vec<FiredEvent> {
    let mut fired = Vec::new();
    for query in plan_queries(prev, curr) {
        let found = collect_events(table, layer, &query, params, policy);
        log::debug!(
            "layer {} state {:?}: [{}, {}){} -> {} event(s)",
            layer.layer,
            query.state,
            query.interval.start,
            query.interval.end,
            if query.critical_only { " critical" } else { "" },
            found.len()
        );
        fired.extend(found);
    }
    fired
}

/// Last-seen sample per (entity, layer).
#[derive(Debug, Default, Clone)]
pub struct SamplerState {
    last: HashMap<(EntityId, u32), PlaybackSample>,
}

impl SamplerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous sample for a layer; the default sample when the layer is unseen.
    pub fn last(&self, entity: EntityId, layer: u32) -> PlaybackSample {
        self.last.get(&(entity, layer)).copied().unwrap_or_default()
    }

    pub fn record(&mut self, entity: EntityId, layer: u32, sample: PlaybackSample) {
        self.last.insert((entity, layer), sample);
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }

    /// Drop every layer of one entity (e.g. when it is destroyed).
    pub fn forget_entity(&mut self, entity: EntityId) {
        self.last.retain(|(e, _), _| *e != entity);
    }

    /// Number of tracked (entity, layer) pairs.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

/// Stateful sampler over any number of entities.
#[derive(Debug, Default, Clone)]
pub struct EventSampler {
    state: SamplerState,
    cfg: Config,
}

impl EventSampler {
    pub fn new(cfg: Config) -> Self {
        Self {
            state: SamplerState::new(),
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    /// Sample one layer against its previous sample, then record `curr` whether or not
    /// anything fired.
    pub fn poll_layer(
        &mut self,
        entity: EntityId,
        controller: ControllerId,
        layer: u32,
        curr: PlaybackSample,
        table: &EventTable,
        params: &dyn ParameterSource,
    ) -> Vec<FiredEvent> {
        let prev = self.state.last(entity, layer);
        let fired = sample_layer(
            &prev,
            &curr,
            LayerQuery { controller, layer },
            table,
            params,
            self.cfg.missing_parameter,
        );
        self.state.record(entity, layer, curr);
        fired
    }

    /// Sample every layer of an animator; results are concatenated in layer order.
    pub fn poll(
        &mut self,
        entity: EntityId,
        controller: ControllerId,
        animator: &dyn AnimatorSource,
        table: &EventTable,
    ) -> Vec<FiredEvent> {
        let mut all = Vec::new();
        for layer in 0..animator.layer_count() {
            let curr = animator.current_state(layer);
            let fired =
                self.poll_layer(entity, controller, layer, curr, table, animator.parameters());
            all.extend(fired);
        }
        if all.len() > self.cfg.warn_events_per_poll {
            log::warn!(
                "entity {:?} fired {} events in one poll (threshold {})",
                entity,
                all.len(),
                self.cfg.warn_events_per_poll
            );
        }
        all
    }

    /// Level/scene reload: forget every last-seen sample.
    pub fn on_level_loaded(&mut self) {
        self.state.clear();
    }

    pub fn forget_entity(&mut self, entity: EntityId) {
        self.state.forget_entity(entity);
    }
}
