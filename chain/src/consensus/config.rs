/// Tunable thresholds for the Proof-of-Knowledge consensus rule.
#[derive(Clone, Debug)]
pub struct ConsensusConfig {
    /// Minimum weighted dominant-answer share required to mine a completion.
    pub quorum_conv_thresh: f64,
    /// Running-proportion threshold below which a correct attester counts
    /// as a thought leader.
    pub thought_leader_thresh: f64,
    /// Reputation multiplier awarded to thought-leader attesters.
    pub thought_leader_bonus: f64,
    /// Minimum pending attestations batched into one attestation block.
    pub attestation_batch_size: usize,
    /// Fraction of combined attestations sampled during gossip.
    pub gossip_sample_fraction: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            quorum_conv_thresh: 0.7,
            thought_leader_thresh: 0.5,
            thought_leader_bonus: 2.5,
            attestation_batch_size: 5,
            gossip_sample_fraction: 0.25,
        }
    }
}
