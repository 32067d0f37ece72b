//! Playback samples and the host-side animator boundary.

use serde::{Deserialize, Serialize};

use crate::condition::{ParameterMap, ParameterSource};
use crate::ids::{StateHash, TagHash};

/// Snapshot of one layer's current state, taken once per poll.
///
/// `normalized_time` is unbounded: the integer part counts completed loops.
/// The default sample (state 0, time 0, not looping) stands in for a layer that
/// has not been seen yet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSample {
    pub state: StateHash,
    #[serde(default)]
    pub tag: TagHash,
    pub normalized_time: f32,
    #[serde(default)]
    pub looping: bool,
}

impl PlaybackSample {
    pub fn new(state: StateHash, normalized_time: f32, looping: bool) -> Self {
        Self {
            state,
            tag: TagHash::default(),
            normalized_time,
            looping,
        }
    }

    pub fn with_tag(mut self, tag: TagHash) -> Self {
        self.tag = tag;
        self
    }

    /// Completed loops: `floor(normalized_time)`.
    #[inline]
    pub fn loop_index(&self) -> i32 {
        self.normalized_time.floor() as i32
    }

    /// Position within the current loop, in [0,1).
    #[inline]
    pub fn fraction(&self) -> f32 {
        self.normalized_time - self.normalized_time.floor()
    }
}

/// Host adapter over a live animation graph.
pub trait AnimatorSource {
    fn layer_count(&self) -> u32;
    fn current_state(&self, layer: u32) -> PlaybackSample;
    /// Parameters used to evaluate event conditions.
    fn parameters(&self) -> &dyn ParameterSource;
}

/// Plain-data [`AnimatorSource`]: one sample per layer plus a parameter map.
/// Layers beyond `layers.len()` are never reported.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimatorSnapshot {
    pub layers: Vec<PlaybackSample>,
    #[serde(default)]
    pub params: ParameterMap,
}

impl AnimatorSnapshot {
    pub fn new(layers: Vec<PlaybackSample>) -> Self {
        Self {
            layers,
            params: ParameterMap::new(),
        }
    }

    pub fn with_params(mut self, params: ParameterMap) -> Self {
        self.params = params;
        self
    }
}

impl AnimatorSource for AnimatorSnapshot {
    fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    fn current_state(&self, layer: u32) -> PlaybackSample {
        self.layers
            .get(layer as usize)
            .copied()
            .unwrap_or_default()
    }

    fn parameters(&self) -> &dyn ParameterSource {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn loop_index_and_fraction() {
        let s = PlaybackSample::new(StateHash(1), 2.25, true);
        assert_eq!(s.loop_index(), 2);
        approx(s.fraction(), 0.25);

        let s = PlaybackSample::new(StateHash(1), 0.0, true);
        assert_eq!(s.loop_index(), 0);
        approx(s.fraction(), 0.0);
    }

    #[test]
    fn negative_time_floors_downward() {
        let s = PlaybackSample::new(StateHash(1), -0.25, false);
        assert_eq!(s.loop_index(), -1);
        approx(s.fraction(), 0.75);
    }

    #[test]
    fn snapshot_reports_layers() {
        let snap = AnimatorSnapshot::new(vec![
            PlaybackSample::new(StateHash(1), 0.5, true),
            PlaybackSample::new(StateHash(2), 0.1, false),
        ]);
        assert_eq!(snap.layer_count(), 2);
        assert_eq!(snap.current_state(1).state, StateHash(2));
        assert_eq!(snap.current_state(9), PlaybackSample::default());
    }
}
