use crate::metrics::{NodeMetrics, Observation, ObservationSink};
use crate::rpc::{CallFunctionRequest, EpochReference, EpochValidatorInfo, NodeRpc, NodeStatus};
use crate::stake::{hash_build, min_stake, stake_from_string};

/// Scrapes one node on behalf of one account.
///
/// Holds no mutable state; every call to [`collect`](Self::collect) is
/// independent of the previous one.
pub struct NodeRpcCollector<R> {
    account_id: String,
    rpc: R,
    metrics: NodeMetrics,
}

impl<R> NodeRpcCollector<R> {
    pub fn new(rpc: R, account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            rpc,
            metrics: NodeMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }
}

impl<R> NodeRpcCollector<R>
where
    R: NodeRpc,
{
    /// Runs one scrape, feeding every observation into `sink`.
    pub fn collect<S: ObservationSink + ?Sized>(&self, sink: &mut S) {
        tracing::debug!(account_id = %self.account_id, "scrape started");

        let mut counted = CountingSink::new(sink);
        self.scrape(&mut counted);

        tracing::debug!(
            account_id = %self.account_id,
            observations = counted.emitted,
            "scrape finished"
        );
    }

    fn scrape<S: ObservationSink + ?Sized>(&self, sink: &mut S) {
        let status = match self.rpc.status() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("status call failed: {e}");
                sink.invalid(&self.metrics.version_build, &e);
                return;
            }
        };
        self.observe_status(&status, sink);

        let validators = match self.rpc.validators(EpochReference::Latest) {
            Ok(validators) => validators,
            Err(e) => {
                tracing::warn!("validators call failed: {e}");
                for metric in self.metrics.validator_dependent() {
                    sink.invalid(metric, &e);
                }
                return;
            }
        };
        self.observe_validators(&validators, sink);

        let request = CallFunctionRequest::get_accounts(self.account_id.as_str());
        let result = match self.rpc.call_function(&request) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(account_id = %self.account_id, "get_accounts query failed: {e}");
                sink.invalid(&self.metrics.delegator_stake, &e);
                return;
            }
        };

        for delegator in result.delegators() {
            sink.gauge(
                &self.metrics.delegator_stake,
                stake_from_string(&delegator.staked_balance),
                &[delegator.account_id.as_str()],
            );
        }
    }

    fn observe_status<S: ObservationSink + ?Sized>(&self, status: &NodeStatus, sink: &mut S) {
        let syncing = if status.sync_info.syncing { 1.0 } else { 0.0 };
        sink.gauge(&self.metrics.sync_state, syncing, &[]);

        sink.gauge(
            &self.metrics.block_number,
            status.sync_info.latest_block_height as f64,
            &[],
        );

        let version = &status.version;
        sink.gauge(
            &self.metrics.version_build,
            f64::from(hash_build(&version.build)),
            &[version.version.as_str(), version.build.as_str()],
        );
    }

    fn observe_validators<S: ObservationSink + ?Sized>(
        &self,
        info: &EpochValidatorInfo,
        sink: &mut S,
    ) {
        let m = &self.metrics;

        sink.gauge(&m.epoch_start_height, info.epoch_start_height as f64, &[]);

        let seat_price = min_stake(
            info.current_validators
                .iter()
                .map(|v| stake_from_string(&v.stake)),
        );
        if let Some(seat_price) = seat_price {
            sink.gauge(&m.seat_price, seat_price, &[]);
        }

        for v in info
            .current_validators
            .iter()
            .filter(|v| v.account_id == self.account_id)
        {
            sink.gauge(&m.current_validator_stake, stake_from_string(&v.stake), &[]);
            sink.gauge(&m.epoch_block_produced, v.num_produced_blocks as f64, &[]);
            sink.gauge(&m.epoch_block_expected, v.num_expected_blocks as f64, &[]);
            sink.gauge(&m.epoch_chunks_produced, v.num_produced_chunks as f64, &[]);
            sink.gauge(&m.epoch_chunks_expected, v.num_expected_chunks as f64, &[]);
        }

        for v in info
            .next_validators
            .iter()
            .filter(|v| v.account_id == self.account_id)
        {
            sink.gauge(&m.next_validator_stake, stake_from_string(&v.stake), &[]);
        }

        for v in info
            .current_proposals
            .iter()
            .filter(|v| v.account_id == self.account_id)
        {
            sink.gauge(&m.current_proposals_stake, stake_from_string(&v.stake), &[]);
        }

        for k in info
            .prev_epoch_kick_out
            .iter()
            .filter(|k| k.account_id == self.account_id)
        {
            let reason = k.reason_label();
            sink.gauge(&m.prev_epoch_kickout, 0.0, &[reason.as_str()]);
        }
    }
}

/// Forwards to another sink, counting what passes through.
struct CountingSink<'a, S: ?Sized> {
    inner: &'a mut S,
    emitted: usize,
}

impl<'a, S: ?Sized> CountingSink<'a, S> {
    fn new(inner: &'a mut S) -> Self {
        Self { inner, emitted: 0 }
    }
}

impl<S: ObservationSink + ?Sized> ObservationSink for CountingSink<'_, S> {
    fn observe(&mut self, observation: Observation) {
        self.emitted += 1;
        self.inner.observe(observation);
    }
}
