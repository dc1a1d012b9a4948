//! Execution progress state and the reducer that folds execution events into it

use serde::{Deserialize, Serialize};

use crate::adapters::{StepUpdate, VendorStepStatus};
use crate::models::TokenAmount;
use crate::routes::{Route, StepKind};

/// Status of a single step; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
	Pending,
	Executing,
	Completed,
	Failed,
}

impl StepStatus {
	fn rank(&self) -> u8 {
		match self {
			StepStatus::Pending => 0,
			StepStatus::Executing => 1,
			StepStatus::Completed | StepStatus::Failed => 2,
		}
	}

	pub fn is_terminal(&self) -> bool {
		self.rank() == 2
	}

	/// Whether moving from `self` to `next` is a forward transition
	pub fn can_transition_to(&self, next: StepStatus) -> bool {
		next.rank() > self.rank()
	}
}

impl From<VendorStepStatus> for StepStatus {
	fn from(status: VendorStepStatus) -> Self {
		match status {
			VendorStepStatus::Pending | VendorStepStatus::ActionRequired => StepStatus::Executing,
			VendorStepStatus::Done => StepStatus::Completed,
			VendorStepStatus::Failed => StepStatus::Failed,
		}
	}
}

/// Logical role a transaction hash is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashRole {
	Swap,
	Bridge,
	Deposit,
}

/// At most one hash per role; the first hash recorded for a role wins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionHashes {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub swap: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bridge: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deposit: Option<String>,
}

impl TransactionHashes {
	pub fn record(&mut self, role: HashRole, hash: &str) {
		let slot = match role {
			HashRole::Swap => &mut self.swap,
			HashRole::Bridge => &mut self.bridge,
			HashRole::Deposit => &mut self.deposit,
		};
		if slot.is_none() {
			*slot = Some(hash.to_string());
		}
	}

	pub fn is_empty(&self) -> bool {
		self.swap.is_none() && self.bridge.is_none() && self.deposit.is_none()
	}
}

/// Progress of one route step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProgress {
	pub kind: StepKind,
	pub cross_chain: bool,
	pub status: StepStatus,
	pub tx_hash: Option<String>,
	pub receiving_tx_hash: Option<String>,
	pub message: Option<String>,
}

impl StepProgress {
	/// Role of the source-chain transaction of this step
	fn source_role(&self) -> HashRole {
		match (self.kind, self.cross_chain) {
			(StepKind::Swap, _) => HashRole::Swap,
			(StepKind::Bridge, _) => HashRole::Bridge,
			// bridge-and-deposit in one step: the source tx is the bridge leg
			(StepKind::ContractCall, true) => HashRole::Bridge,
			(StepKind::ContractCall, false) => HashRole::Deposit,
		}
	}
}

/// Overall execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionPhase {
	Idle,
	Running,
	AwaitingChainSwitch,
	AwaitingRateAcceptance,
	Completed,
	Failed,
}

impl ExecutionPhase {
	pub fn is_terminal(&self) -> bool {
		matches!(self, ExecutionPhase::Completed | ExecutionPhase::Failed)
	}
}

/// Events emitted by the execution hook bridge and folded by [`ExecutionProgress::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
	Started,
	StepUpdated(StepUpdate),
	ChainSwitchRequested { chain_id: u64 },
	ChainSwitched { chain_id: u64 },
	RateChangeRequested {
		step_index: usize,
		old_to_amount: TokenAmount,
		new_to_amount: TokenAmount,
	},
	RateAccepted { step_index: usize },
	Failed { message: String },
	Completed,
}

/// Progress of a route execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionProgress {
	pub route_id: String,
	pub current_step_index: usize,
	pub steps: Vec<StepProgress>,
	pub phase: ExecutionPhase,
	pub error: Option<String>,
	pub hashes: TransactionHashes,
}

impl ExecutionProgress {
	pub fn new(route: &Route) -> Self {
		Self {
			route_id: route.id.clone(),
			current_step_index: 0,
			steps: route
				.steps
				.iter()
				.map(|step| StepProgress {
					kind: step.kind,
					cross_chain: step.is_cross_chain(),
					status: StepStatus::Pending,
					tx_hash: None,
					receiving_tx_hash: None,
					message: None,
				})
				.collect(),
			phase: ExecutionPhase::Idle,
			error: None,
			hashes: TransactionHashes::default(),
		}
	}

	pub fn is_finished(&self) -> bool {
		self.phase.is_terminal()
	}

	pub fn completed_steps(&self) -> usize {
		self.steps
			.iter()
			.filter(|s| s.status == StepStatus::Completed)
			.count()
	}

	/// Fold one event into the progress
	///
	/// Step statuses only move forward and a terminal phase is final; events
	/// that would violate either are ignored.
	pub fn apply(&mut self, event: ExecutionEvent) {
		if self.phase.is_terminal() {
			return;
		}

		match event {
			ExecutionEvent::Started => self.phase = ExecutionPhase::Running,
			ExecutionEvent::StepUpdated(update) => self.apply_step_update(update),
			ExecutionEvent::ChainSwitchRequested { .. } => {
				self.phase = ExecutionPhase::AwaitingChainSwitch
			},
			ExecutionEvent::RateChangeRequested { .. } => {
				self.phase = ExecutionPhase::AwaitingRateAcceptance
			},
			ExecutionEvent::ChainSwitched { .. } | ExecutionEvent::RateAccepted { .. } => {
				self.phase = ExecutionPhase::Running
			},
			ExecutionEvent::Failed { message } => {
				// first step not completed; it may already carry a vendor-reported failure
				let active = self
					.steps
					.iter()
					.position(|s| s.status != StepStatus::Completed)
					.or_else(|| self.steps.get(self.current_step_index).map(|_| self.current_step_index));
				if let Some(index) = active {
					self.advance(index, StepStatus::Failed);
					self.current_step_index = index;
				}
				self.error = Some(message);
				self.phase = ExecutionPhase::Failed;
			},
			ExecutionEvent::Completed => {
				for index in 0..self.steps.len() {
					self.advance(index, StepStatus::Completed);
				}
				self.current_step_index = self.steps.len().saturating_sub(1);
				self.phase = ExecutionPhase::Completed;
			},
		}
	}

	fn apply_step_update(&mut self, update: StepUpdate) {
		let index = update.step_index;
		if index >= self.steps.len() {
			return;
		}

		let status = StepStatus::from(update.status);
		self.advance(index, status);

		let is_last = index + 1 == self.steps.len();
		let step = &mut self.steps[index];
		if let Some(message) = update.message {
			step.message = Some(message);
		}
		if let Some(hash) = update.tx_hash {
			if step.tx_hash.is_none() {
				step.tx_hash = Some(hash.clone());
			}
			let role = step.source_role();
			self.hashes.record(role, &hash);
		}
		let step = &mut self.steps[index];
		if let Some(hash) = update.receiving_tx_hash {
			if step.receiving_tx_hash.is_none() {
				step.receiving_tx_hash = Some(hash.clone());
			}
			if is_last && step.kind == StepKind::ContractCall {
				self.hashes.record(HashRole::Deposit, &hash);
			}
		}

		self.current_step_index = match self.steps[index].status {
			StepStatus::Completed if !is_last => index + 1,
			_ => index,
		};
		if self.phase == ExecutionPhase::Idle {
			self.phase = ExecutionPhase::Running;
		}
	}

	fn advance(&mut self, index: usize, next: StepStatus) {
		if let Some(step) = self.steps.get_mut(index) {
			if step.status.can_transition_to(next) {
				step.status = next;
			}
		}
	}
}
