//! Configuration for the keyed sequencer

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Maximum envelopes accepted by one `process_batch` call
    pub max_batch_size: usize,
    /// Run independent lanes on the rayon pool
    pub parallel_lanes: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 10_000,
            parallel_lanes: true,
        }
    }
}
