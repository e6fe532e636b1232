use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use vrf_blockchain::{Fulfillment, FulfillmentReceipt, U256, VrfLedger};
use vrf_pow::{ChallengeSigner, solve};

use super::FulfillRandomnessConfig;
use crate::{error::WorkerError, periodic_tasks::runner::run_with_shutdown};

const TASK_NAME: &str = "fulfill_randomness";

/// What a single polling iteration did.
#[derive(Debug)]
pub(crate) enum IterationOutcome {
    /// Every request up to the current id was already fulfilled.
    Idle,
    Fulfilled {
        request_id: U256,
        receipt: FulfillmentReceipt,
    },
    /// The ledger refused the solution, usually because another worker won.
    Rejected { request_id: U256, reason: String },
}

impl IterationOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fulfilled { .. } => "fulfilled",
            Self::Rejected { .. } => "rejected",
        }
    }
}

pub(crate) struct FulfillRandomnessTask<L, S> {
    ledger: Arc<L>,
    signer: Arc<S>,
    config: FulfillRandomnessConfig,
}

impl<L, S> Clone for FulfillRandomnessTask<L, S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            signer: Arc::clone(&self.signer),
            config: self.config.clone(),
        }
    }
}

impl<L, S> FulfillRandomnessTask<L, S>
where
    L: VrfLedger + 'static,
    S: ChallengeSigner + 'static,
{
    pub(crate) fn new(ledger: Arc<L>, signer: Arc<S>, config: FulfillRandomnessConfig) -> Self {
        Self {
            ledger,
            signer,
            config,
        }
    }

    /// Pause between iterations.
    pub(crate) fn delay(&self) -> Duration {
        self.config.delay
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown(TASK_NAME, shutdown, || self.execute()).await;
    }

    /// One iteration with every failure contained; always yields the delay
    /// before the next poll.
    #[tracing::instrument(
        name = "periodic_tasks.fulfill_randomness",
        skip(self),
        fields(
            current_request_id = tracing::field::Empty,
            latest_fulfill_id = tracing::field::Empty
        )
    )]
    pub(crate) async fn execute(&self) -> Duration {
        let started = Instant::now();

        let outcome = match self.run_iteration().await {
            Ok(outcome) => {
                log_outcome(&outcome);
                outcome.as_str()
            }
            Err(error) => {
                tracing::error!(error = %error, "Error fulfilling randomness");
                "failed"
            }
        };

        let status = if outcome == "failed" { "error" } else { "success" };
        vrf_observability::record_fulfillment_outcome(outcome);
        vrf_observability::record_task_run(TASK_NAME, status, started.elapsed());

        self.config.delay
    }

    pub(crate) async fn run_iteration(&self) -> Result<IterationOutcome, WorkerError> {
        let current_request_id = self.ledger.current_request_id().await?;
        let latest_fulfill_id = self.ledger.latest_fulfill_id().await?;

        let span = tracing::Span::current();
        span.record(
            "current_request_id",
            tracing::field::display(current_request_id),
        );
        span.record("latest_fulfill_id", tracing::field::display(latest_fulfill_id));
        vrf_observability::record_request_cursor(
            as_gauge(current_request_id),
            as_gauge(latest_fulfill_id),
        );

        let request_id = latest_fulfill_id + U256::from(1u8);
        if current_request_id == request_id {
            tracing::info!("There is no new random request. Waiting for incoming requests...");
            return Ok(IterationOutcome::Idle);
        }

        tracing::info!(
            request_id = %request_id,
            "Found new random request"
        );

        let previous_random = self.ledger.random_result(latest_fulfill_id).await?;
        let difficulty = self.ledger.difficulty().await?;

        let solve_started = Instant::now();
        let solution = match solve(self.signer.as_ref(), previous_random, difficulty).await {
            Ok(solution) => {
                vrf_observability::record_solve("success", solution.attempts, solve_started.elapsed());
                solution
            }
            Err(error) => {
                vrf_observability::record_solve("error", 0, solve_started.elapsed());
                return Err(error.into());
            }
        };

        tracing::info!(
            request_id = %request_id,
            input = %solution.input,
            attempts = solution.attempts,
            difficulty = %difficulty,
            elapsed_ms = solve_started.elapsed().as_millis(),
            "Submitting fulfill transaction"
        );

        let fulfillment = Fulfillment {
            request_id,
            input: solution.input,
            signature: solution.signature,
        };

        match self
            .ledger
            .fulfill_randomness(std::slice::from_ref(&fulfillment))
            .await
        {
            Ok(receipt) => Ok(IterationOutcome::Fulfilled {
                request_id,
                receipt,
            }),
            Err(error) if error.is_rejection() => Ok(IterationOutcome::Rejected {
                request_id,
                reason: error.to_string(),
            }),
            Err(error) => Err(error.into()),
        }
    }
}

fn log_outcome(outcome: &IterationOutcome) {
    match outcome {
        IterationOutcome::Idle => {}
        IterationOutcome::Fulfilled {
            request_id,
            receipt,
        } => tracing::info!(
            request_id = %request_id,
            transaction_hash = %receipt.transaction_hash,
            block_number = ?receipt.block_number,
            events = %describe_events(receipt),
            "Fulfilled randomness successfully"
        ),
        IterationOutcome::Rejected { request_id, reason } => tracing::warn!(
            request_id = %request_id,
            reason = %reason,
            "Fulfillment rejected; request was likely claimed by another worker"
        ),
    }
}

fn describe_events(receipt: &FulfillmentReceipt) -> String {
    let events: Vec<String> = receipt.events.iter().map(ToString::to_string).collect();
    format!("[{}]", events.join(", "))
}

fn as_gauge(value: U256) -> f64 {
    u64::try_from(value).unwrap_or(u64::MAX) as f64
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, VecDeque},
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use alloy::{
        primitives::{Address, B256, Bytes, keccak256},
        signers::{Signer, local::PrivateKeySigner},
    };
    use tokio::sync::Barrier;
    use vrf_blockchain::{BlockchainError, FulfillmentBatch, NativeVRF, ReceiptEvent};
    use vrf_pow::{SignerError, signature_to_u256, verify_solution};

    use super::*;
    use crate::periodic_tasks::tasks::fulfill_randomness::FulfillRandomnessConfigRaw;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    struct LedgerState {
        current_request_id: U256,
        latest_fulfill_id: U256,
        random_results: HashMap<U256, U256>,
        difficulty: U256,
        submissions: Vec<FulfillmentBatch>,
    }

    /// Ledger double that applies the on-chain acceptance rules in memory.
    struct InMemoryLedger {
        state: Mutex<LedgerState>,
        /// Recovered signer required on submissions; `None` only checks the score.
        expected_signer: Option<Address>,
        difficulty_gate: Option<Barrier>,
        unreachable: bool,
        reads: AtomicUsize,
    }

    impl InMemoryLedger {
        fn new(current_request_id: u64, latest_fulfill_id: u64, difficulty: u64) -> Self {
            Self {
                state: Mutex::new(LedgerState {
                    current_request_id: U256::from(current_request_id),
                    latest_fulfill_id: U256::from(latest_fulfill_id),
                    random_results: HashMap::new(),
                    difficulty: U256::from(difficulty),
                    submissions: Vec::new(),
                }),
                expected_signer: None,
                difficulty_gate: None,
                unreachable: false,
                reads: AtomicUsize::new(0),
            }
        }

        fn with_random_result(self, request_id: u64, random: u64) -> Self {
            self.state
                .lock()
                .unwrap()
                .random_results
                .insert(U256::from(request_id), U256::from(random));
            self
        }

        fn requiring_signer(mut self, signer: Address) -> Self {
            self.expected_signer = Some(signer);
            self
        }

        fn with_difficulty_gate(mut self, parties: usize) -> Self {
            self.difficulty_gate = Some(Barrier::new(parties));
            self
        }

        fn unreachable(mut self) -> Self {
            self.unreachable = true;
            self
        }

        fn submissions(&self) -> usize {
            self.state.lock().unwrap().submissions.len()
        }

        fn latest_fulfill_id_now(&self) -> U256 {
            self.state.lock().unwrap().latest_fulfill_id
        }

        fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> Result<T, BlockchainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.unreachable {
                return Err(BlockchainError::Custom("connection refused".to_string()));
            }
            Ok(f(&self.state.lock().unwrap()))
        }
    }

    impl VrfLedger for InMemoryLedger {
        async fn current_request_id(&self) -> Result<U256, BlockchainError> {
            self.read(|state| state.current_request_id)
        }

        async fn latest_fulfill_id(&self) -> Result<U256, BlockchainError> {
            self.read(|state| state.latest_fulfill_id)
        }

        async fn random_result(&self, request_id: U256) -> Result<U256, BlockchainError> {
            self.read(|state| {
                state
                    .random_results
                    .get(&request_id)
                    .copied()
                    .unwrap_or_default()
            })
        }

        async fn difficulty(&self) -> Result<U256, BlockchainError> {
            let difficulty = self.read(|state| state.difficulty)?;
            if let Some(gate) = &self.difficulty_gate {
                gate.wait().await;
            }
            Ok(difficulty)
        }

        async fn fulfill_randomness(
            &self,
            fulfillments: &[Fulfillment],
        ) -> Result<FulfillmentReceipt, BlockchainError> {
            let batch = FulfillmentBatch::encode(fulfillments)?;
            let mut state = self.state.lock().unwrap();
            let mut events = Vec::with_capacity(batch.len());

            for fulfillment in fulfillments {
                let expected_id = state.latest_fulfill_id + U256::from(1u8);
                if fulfillment.request_id != expected_id {
                    return Err(BlockchainError::SubmissionRejected {
                        reason: format!("request {} already fulfilled", fulfillment.request_id),
                    });
                }

                let previous_random = state
                    .random_results
                    .get(&state.latest_fulfill_id)
                    .copied()
                    .unwrap_or_default();
                let accepted = match self.expected_signer {
                    Some(signer) => verify_solution(
                        previous_random,
                        fulfillment.input,
                        &fulfillment.signature,
                        state.difficulty,
                        signer,
                    )
                    .is_ok(),
                    None => (signature_to_u256(&fulfillment.signature) % state.difficulty)
                        .is_zero(),
                };
                if !accepted {
                    return Err(BlockchainError::SubmissionRejected {
                        reason: "invalid proof of work".to_string(),
                    });
                }

                let random = U256::from_be_bytes(keccak256(&fulfillment.signature).0);
                state.random_results.insert(fulfillment.request_id, random);
                state.latest_fulfill_id = fulfillment.request_id;
                events.push(ReceiptEvent {
                    name: "RandomFulfilled",
                    event: NativeVRF::NativeVRFEvents::RandomFulfilled(
                        NativeVRF::RandomFulfilled {
                            requestId: fulfillment.request_id,
                            random,
                        },
                    ),
                });
            }

            state.submissions.push(batch);
            Ok(FulfillmentReceipt {
                transaction_hash: B256::repeat_byte(state.submissions.len() as u8),
                block_number: Some(100 + state.submissions.len() as u64),
                events,
            })
        }
    }

    /// Returns pre-scored signatures in order.
    struct ScriptedSigner {
        scores: Mutex<VecDeque<u64>>,
        calls: AtomicUsize,
    }

    impl ScriptedSigner {
        fn new(scores: &[u64]) -> Self {
            Self {
                scores: Mutex::new(scores.iter().copied().collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ChallengeSigner for ScriptedSigner {
        async fn sign_challenge(&self, _challenge: B256) -> Result<Bytes, SignerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let score = self
                .scores
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| SignerError::new("signing service unavailable"))?;
            Ok(Bytes::from(U256::from(score).to_be_bytes_vec()))
        }
    }

    fn test_signer() -> PrivateKeySigner {
        TEST_PRIVATE_KEY.parse().expect("valid test key")
    }

    fn config() -> FulfillRandomnessConfig {
        FulfillRandomnessConfigRaw { delay_ms: 2_000 }.resolve()
    }

    fn task<L, S>(ledger: &Arc<L>, signer: S) -> FulfillRandomnessTask<L, S>
    where
        L: VrfLedger + 'static,
        S: ChallengeSigner + 'static,
    {
        FulfillRandomnessTask::new(Arc::clone(ledger), Arc::new(signer), config())
    }

    #[tokio::test]
    async fn idle_when_every_request_is_fulfilled() {
        let ledger = Arc::new(InMemoryLedger::new(6, 5, 4));
        let signer = ScriptedSigner::new(&[4]);
        let task = task(&ledger, signer);

        let outcome = task.run_iteration().await.expect("iteration succeeds");

        assert!(matches!(outcome, IterationOutcome::Idle));
        assert_eq!(ledger.submissions(), 0);
        assert_eq!(task.signer.calls.load(Ordering::SeqCst), 0);
        // Only the two cursor reads happen.
        assert_eq!(ledger.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fulfills_the_next_request_with_the_first_passing_input() {
        let ledger = Arc::new(InMemoryLedger::new(3, 1, 4).with_random_result(1, 777));
        let task = task(&ledger, ScriptedSigner::new(&[7, 9, 12]));

        let outcome = task.run_iteration().await.expect("iteration succeeds");

        let IterationOutcome::Fulfilled {
            request_id,
            receipt,
        } = outcome
        else {
            panic!("expected a fulfillment, got {outcome:?}");
        };
        assert_eq!(request_id, U256::from(2u64));
        assert_eq!(receipt.events.len(), 1);
        assert!(receipt.events[0].to_string().starts_with("RandomFulfilled(requestId=2, random="));

        let state = ledger.state.lock().unwrap();
        assert_eq!(state.latest_fulfill_id, U256::from(2u64));
        let batch = &state.submissions[0];
        assert_eq!(batch.request_ids, vec![U256::from(2u64)]);
        assert_eq!(batch.inputs, vec![U256::from(2u64)]);
        assert_eq!(signature_to_u256(&batch.signatures[0]), U256::from(12u64));
    }

    #[tokio::test]
    async fn local_key_solution_is_accepted_by_signature_checking_ledger() {
        let signer = test_signer();
        let ledger = Arc::new(
            InMemoryLedger::new(2, 0, 8)
                .with_random_result(0, 777)
                .requiring_signer(signer.address()),
        );
        let task = task(&ledger, signer);

        let outcome = task.run_iteration().await.expect("iteration succeeds");

        assert!(matches!(outcome, IterationOutcome::Fulfilled { .. }));
        assert_eq!(ledger.latest_fulfill_id_now(), U256::from(1u64));
    }

    #[tokio::test]
    async fn execute_returns_the_delay_when_reads_fail() {
        let ledger = Arc::new(InMemoryLedger::new(3, 1, 4).unreachable());
        let task = task(&ledger, ScriptedSigner::new(&[4]));

        let result = task.run_iteration().await;
        assert!(matches!(result, Err(WorkerError::Blockchain(_))));

        assert_eq!(task.execute().await, Duration::from_secs(2));
        assert_eq!(ledger.submissions(), 0);
    }

    #[tokio::test]
    async fn signer_failure_submits_nothing() {
        let ledger = Arc::new(InMemoryLedger::new(3, 1, 4));
        let task = task(&ledger, ScriptedSigner::new(&[7, 9]));

        let result = task.run_iteration().await;

        assert!(matches!(result, Err(WorkerError::ProofOfWork(_))));
        assert_eq!(ledger.submissions(), 0);
        assert_eq!(task.execute().await, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn zero_difficulty_fails_without_signing() {
        let ledger = Arc::new(InMemoryLedger::new(3, 1, 0));
        let task = task(&ledger, ScriptedSigner::new(&[4]));

        let result = task.run_iteration().await;

        assert!(matches!(
            result,
            Err(WorkerError::ProofOfWork(vrf_pow::PowError::ZeroDifficulty))
        ));
        assert_eq!(task.signer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.submissions(), 0);
    }

    #[tokio::test]
    async fn concurrent_workers_claim_a_request_exactly_once() {
        let ledger = Arc::new(InMemoryLedger::new(2, 0, 2).with_difficulty_gate(2));
        let first = task(&ledger, ScriptedSigner::new(&[2]));
        let second = task(&ledger, ScriptedSigner::new(&[4]));

        let (a, b) = tokio::join!(first.run_iteration(), second.run_iteration());
        let outcomes = [a.expect("first worker"), b.expect("second worker")];

        let fulfilled = outcomes
            .iter()
            .filter(|o| matches!(o, IterationOutcome::Fulfilled { .. }))
            .count();
        let rejected: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                IterationOutcome::Rejected { request_id, reason } => Some((*request_id, reason)),
                _ => None,
            })
            .collect();

        assert_eq!(fulfilled, 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, U256::from(1u64));
        assert!(rejected[0].1.contains("already fulfilled"));
        assert_eq!(ledger.submissions(), 1);
        assert_eq!(ledger.latest_fulfill_id_now(), U256::from(1u64));
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let ledger = Arc::new(InMemoryLedger::new(1, 0, 4));
        let task = task(&ledger, ScriptedSigner::new(&[]));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(task.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_secs(5)).await;
        shutdown.cancel();
        handle.await.expect("task exits cleanly");

        // Idle polls at 0s, 2s and 4s.
        assert_eq!(ledger.reads.load(Ordering::SeqCst), 6);
    }
}
