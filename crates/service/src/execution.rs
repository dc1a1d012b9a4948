//! Route execution driven through an event channel and a single reducer
//!
//! The vendor primitive reports through [`ExecutionHooks`]. The hook bridge
//! turns every callback into an [`ExecutionEvent`] on an mpsc channel; one
//! reducer task owns the [`ExecutionProgress`] and publishes snapshots on a
//! watch channel. Nothing else mutates progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use kite_storage::TransactionHistory;
use kite_types::{
	ExecutionError, ExecutionEvent, ExecutionHooks, ExecutionProgress, HistoryEntry, RateChange,
	Route, RouteExecutor, StepUpdate, TokenAmount, UserPrompt, WalletClient,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

/// Final progress of a successful execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
	pub progress: ExecutionProgress,
	/// Id of the history entry, when history is enabled and the write succeeded
	pub history_id: Option<String>,
}

/// Who receives the deposit; recorded in the history entry
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
	pub address: String,
	pub ens_name: Option<String>,
}

impl Recipient {
	pub fn new(address: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			ens_name: None,
		}
	}

	pub fn with_ens_name(mut self, name: impl Into<String>) -> Self {
		self.ens_name = Some(name.into());
		self
	}
}

/// Executes one route at a time against the connected wallet
pub struct ExecutionService {
	executor: Arc<dyn RouteExecutor>,
	wallet: Arc<dyn WalletClient>,
	history: Option<TransactionHistory>,
	running: AtomicBool,
	progress: Arc<watch::Sender<Option<ExecutionProgress>>>,
}

impl std::fmt::Debug for ExecutionService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExecutionService")
			.field("executor", &self.executor)
			.field("history", &self.history.is_some())
			.field("running", &self.is_running())
			.finish()
	}
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}

impl ExecutionService {
	pub fn new(executor: Arc<dyn RouteExecutor>, wallet: Arc<dyn WalletClient>) -> Self {
		let (progress, _) = watch::channel(None);
		Self {
			executor,
			wallet,
			history: None,
			running: AtomicBool::new(false),
			progress: Arc::new(progress),
		}
	}

	pub fn with_history(mut self, history: TransactionHistory) -> Self {
		self.history = Some(history);
		self
	}

	/// Progress snapshots of the current (or last) execution
	pub fn subscribe(&self) -> watch::Receiver<Option<ExecutionProgress>> {
		self.progress.subscribe()
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::SeqCst)
	}

	/// Execute `route` to completion
	///
	/// Errors are returned verbatim; the step that was active is marked failed
	/// and completed steps stay completed.
	pub async fn execute(
		&self,
		route: &Route,
		recipient: &Recipient,
		prompt: &dyn UserPrompt,
	) -> Result<ExecutionReport, ExecutionError> {
		if self
			.running
			.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
			.is_err()
		{
			return Err(ExecutionError::AlreadyExecuting);
		}
		let _running = RunningGuard(&self.running);

		if !route.is_executable() {
			return Err(ExecutionError::NotExecutable);
		}

		let history_id = self.record_start(route, recipient).await;

		let (events, reducer) = self.spawn_reducer(route);
		let _ = events.send(ExecutionEvent::Started);
		info!(
			"Executing route {} ({} step(s), chain {} -> {})",
			route.id,
			route.steps.len(),
			route.from_chain_id,
			route.to_chain_id
		);

		let bridge = HookBridge {
			events: events.clone(),
			wallet: self.wallet.as_ref(),
			prompt,
			route,
		};
		let result = self
			.executor
			.execute_route(route, self.wallet.as_ref(), &bridge)
			.await;
		drop(bridge);

		let _ = events.send(match &result {
			Ok(()) => ExecutionEvent::Completed,
			Err(e) => ExecutionEvent::Failed {
				message: e.to_string(),
			},
		});
		drop(events);

		let progress = match reducer.await {
			Ok(progress) => progress,
			Err(e) => {
				warn!("Execution reducer for route {} ended abnormally: {}", route.id, e);
				self.progress
					.borrow()
					.clone()
					.unwrap_or_else(|| ExecutionProgress::new(route))
			},
		};

		match result {
			Ok(()) => {
				info!("Route {} executed successfully", route.id);
				self.record_completed(history_id.as_deref(), &progress).await;
				Ok(ExecutionReport {
					progress,
					history_id,
				})
			},
			Err(e) => {
				warn!("Route {} failed: {}", route.id, e);
				self.record_failed(history_id.as_deref(), &progress, &e).await;
				Err(e)
			},
		}
	}

	fn spawn_reducer(
		&self,
		route: &Route,
	) -> (
		mpsc::UnboundedSender<ExecutionEvent>,
		tokio::task::JoinHandle<ExecutionProgress>,
	) {
		let (tx, mut rx) = mpsc::unbounded_channel::<ExecutionEvent>();
		let mut progress = ExecutionProgress::new(route);
		let publisher = Arc::clone(&self.progress);
		publisher.send_replace(Some(progress.clone()));

		let handle = tokio::spawn(async move {
			while let Some(event) = rx.recv().await {
				progress.apply(event);
				publisher.send_replace(Some(progress.clone()));
			}
			progress
		});

		(tx, handle)
	}

	async fn record_start(&self, route: &Route, recipient: &Recipient) -> Option<String> {
		let history = self.history.as_ref()?;
		let entry = HistoryEntry::pending(route, &recipient.address, recipient.ens_name.clone());
		let id = entry.id.clone();
		match history.add(entry).await {
			Ok(()) => Some(id),
			Err(e) => {
				warn!("Failed to record history entry for route {}: {}", route.id, e);
				None
			},
		}
	}

	async fn record_completed(&self, id: Option<&str>, progress: &ExecutionProgress) {
		if let (Some(history), Some(id)) = (&self.history, id) {
			if let Err(e) = history.mark_completed(id, progress.hashes.clone()).await {
				warn!("Failed to update history entry {}: {}", id, e);
			}
		}
	}

	async fn record_failed(
		&self,
		id: Option<&str>,
		progress: &ExecutionProgress,
		error: &ExecutionError,
	) {
		if let (Some(history), Some(id)) = (&self.history, id) {
			if let Err(e) = history
				.mark_failed(id, progress.hashes.clone(), error)
				.await
			{
				warn!("Failed to update history entry {}: {}", id, e);
			}
		}
	}
}

/// Maps vendor callbacks onto execution events
struct HookBridge<'a> {
	events: mpsc::UnboundedSender<ExecutionEvent>,
	wallet: &'a dyn WalletClient,
	prompt: &'a dyn UserPrompt,
	route: &'a Route,
}

impl HookBridge<'_> {
	fn emit(&self, event: ExecutionEvent) {
		// the reducer only stops once every sender is gone
		let _ = self.events.send(event);
	}
}

#[async_trait]
impl ExecutionHooks for HookBridge<'_> {
	fn update_route(&self, update: StepUpdate) {
		self.emit(ExecutionEvent::StepUpdated(update));
	}

	async fn switch_chain(&self, chain_id: u64) -> Result<(), ExecutionError> {
		self.emit(ExecutionEvent::ChainSwitchRequested { chain_id });
		info!("Requesting wallet switch to chain {}", chain_id);

		self.wallet
			.switch_chain(chain_id)
			.await
			.map_err(|e| ExecutionError::ChainSwitchFailed {
				chain_id,
				reason: e.to_string(),
			})?;

		self.emit(ExecutionEvent::ChainSwitched { chain_id });
		Ok(())
	}

	async fn accept_exchange_rate_update(
		&self,
		step_index: usize,
		old_to_amount: &TokenAmount,
		new_to_amount: &TokenAmount,
	) -> bool {
		self.emit(ExecutionEvent::RateChangeRequested {
			step_index,
			old_to_amount: old_to_amount.clone(),
			new_to_amount: new_to_amount.clone(),
		});

		let token = self
			.route
			.steps
			.get(step_index)
			.map(|step| step.to_token.clone())
			.unwrap_or_else(|| self.route.to_token.clone());
		let change = RateChange {
			step_index,
			token,
			old_to_amount: old_to_amount.clone(),
			new_to_amount: new_to_amount.clone(),
		};

		let accepted = self.prompt.confirm_rate_change(&change).await;
		if accepted {
			self.emit(ExecutionEvent::RateAccepted { step_index });
		} else {
			warn!(
				"Exchange rate update for step {} rejected ({} -> {})",
				step_index, old_to_amount, new_to_amount
			);
		}
		accepted
	}
}
