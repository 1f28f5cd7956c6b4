//! Static metric identities exported for a NEAR node.

/// Name, help text and label names of one exported gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MetricIdentity {
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

impl MetricIdentity {
    pub const fn new(
        name: &'static str,
        help: &'static str,
        label_names: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            help,
            label_names,
        }
    }
}

/// Every metric identity the collector may emit.
///
/// Built once when the collector is constructed and only read afterwards.
#[derive(Clone, Debug)]
pub struct NodeMetrics {
    pub epoch_block_produced: MetricIdentity,
    pub epoch_block_expected: MetricIdentity,
    pub epoch_chunks_produced: MetricIdentity,
    pub epoch_chunks_expected: MetricIdentity,
    pub seat_price: MetricIdentity,
    /// Labelled with `delegator_account_id`.
    pub delegator_stake: MetricIdentity,
    pub epoch_start_height: MetricIdentity,
    pub block_number: MetricIdentity,
    /// 1 while the node is syncing, 0 otherwise.
    pub sync_state: MetricIdentity,
    /// Labelled with `version` and `build`; the value is the FNV-1a hash of
    /// the build string.
    pub version_build: MetricIdentity,
    pub current_validator_stake: MetricIdentity,
    pub next_validator_stake: MetricIdentity,
    pub current_proposals_stake: MetricIdentity,
    /// Labelled with `reason`; the value is always 0.
    pub prev_epoch_kickout: MetricIdentity,
}

impl NodeMetrics {
    pub fn new() -> Self {
        Self {
            epoch_block_produced: MetricIdentity::new(
                "near_account_epoch_block_produced_number",
                "The number of block produced in epoch of a given account id",
                &[],
            ),
            epoch_block_expected: MetricIdentity::new(
                "near_account_epoch_block_expected_number",
                "The number of block expected in epoch of a given account id",
                &[],
            ),
            epoch_chunks_produced: MetricIdentity::new(
                "near_account_epoch_chunks_produced_number",
                "The number of chunks produced in epoch of a given account id",
                &[],
            ),
            epoch_chunks_expected: MetricIdentity::new(
                "near_account_epoch_chunks_expected_number",
                "The number of chunks expected in epoch of a given account id",
                &[],
            ),
            seat_price: MetricIdentity::new("near_seat_price", "Validator seat price", &[]),
            delegator_stake: MetricIdentity::new(
                "near_account_delegator_stake",
                "Delegators stake of a given account id",
                &["delegator_account_id"],
            ),
            epoch_start_height: MetricIdentity::new(
                "near_epoch_start_height",
                "Near epoch start height",
                &[],
            ),
            block_number: MetricIdentity::new(
                "near_block_number",
                "The number of most recent block",
                &[],
            ),
            sync_state: MetricIdentity::new("near_sync_state", "Sync state", &[]),
            version_build: MetricIdentity::new(
                "near_version_build",
                "The Near node version build",
                &["version", "build"],
            ),
            current_validator_stake: MetricIdentity::new(
                "near_account_current_validator_stake",
                "Current amount of validator stake of a given account id",
                &[],
            ),
            next_validator_stake: MetricIdentity::new(
                "near_account_next_validator_stake",
                "The next validator stake of a given account id",
                &[],
            ),
            current_proposals_stake: MetricIdentity::new(
                "near_account_current_proposals_stake",
                "Current proposals of a given account id",
                &[],
            ),
            prev_epoch_kickout: MetricIdentity::new(
                "near_account_prev_epoch_kickout",
                "Near previous epoch kicked out of a given account id",
                &["reason"],
            ),
        }
    }

    /// All identities, in declaration order.
    pub fn all(&self) -> [&MetricIdentity; 14] {
        [
            &self.epoch_block_produced,
            &self.epoch_block_expected,
            &self.epoch_chunks_produced,
            &self.epoch_chunks_expected,
            &self.seat_price,
            &self.delegator_stake,
            &self.epoch_start_height,
            &self.block_number,
            &self.sync_state,
            &self.version_build,
            &self.current_validator_stake,
            &self.next_validator_stake,
            &self.current_proposals_stake,
            &self.prev_epoch_kickout,
        ]
    }

    /// Identities whose values come from the `validators` call, plus the
    /// status-derived ones that are marked invalid alongside them when that
    /// call fails.
    pub fn validator_dependent(&self) -> [&MetricIdentity; 13] {
        [
            &self.epoch_block_produced,
            &self.epoch_block_expected,
            &self.epoch_chunks_produced,
            &self.epoch_chunks_expected,
            &self.seat_price,
            &self.epoch_start_height,
            &self.block_number,
            &self.sync_state,
            &self.version_build,
            &self.current_validator_stake,
            &self.next_validator_stake,
            &self.current_proposals_stake,
            &self.prev_epoch_kickout,
        ]
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let metrics = NodeMetrics::new();
        let names: HashSet<_> = metrics.all().iter().map(|m| m.name).collect();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn labelled_identities() {
        let metrics = NodeMetrics::new();
        let labelled: Vec<_> = metrics
            .all()
            .into_iter()
            .filter(|m| !m.label_names.is_empty())
            .map(|m| (m.name, m.label_names))
            .collect();
        assert_eq!(
            labelled,
            vec![
                ("near_account_delegator_stake", &["delegator_account_id"][..]),
                ("near_version_build", &["version", "build"][..]),
                ("near_account_prev_epoch_kickout", &["reason"][..]),
            ]
        );
    }

    #[test]
    fn validator_dependent_excludes_only_delegator_stake() {
        let metrics = NodeMetrics::new();
        let dependent: HashSet<_> = metrics.validator_dependent().iter().map(|m| m.name).collect();
        assert_eq!(dependent.len(), 13);
        assert!(!dependent.contains("near_account_delegator_stake"));
    }
}
