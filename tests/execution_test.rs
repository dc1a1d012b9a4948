//! Route execution through the hook bridge, reducer and history

mod mocks;

use std::sync::Arc;

use kite_router::types::{ExecutionPhase, HistoryStatus, StepStatus, MAX_HISTORY_ENTRIES};
use kite_router::{
	ExecutionError, ExecutionService, MemoryStore, Recipient, TransactionHistory,
};
use mocks::{
	bridge_route, tx_hash, vault_route, MockExecutor, MockPrompt, MockWallet, ScriptedStep,
	RECIPIENT,
};

fn service(executor: MockExecutor, wallet: MockWallet) -> (ExecutionService, TransactionHistory) {
	let history = TransactionHistory::new(Arc::new(MemoryStore::new()));
	let service = ExecutionService::new(Arc::new(executor), Arc::new(wallet))
		.with_history(history.clone());
	(service, history)
}

fn recipient() -> Recipient {
	Recipient::new(RECIPIENT).with_ens_name("alice.eth")
}

#[tokio::test]
async fn test_vault_route_records_hash_per_role() {
	let script = vec![
		ScriptedStep::default(),
		ScriptedStep {
			receiving_hash: Some(tx_hash(20)),
			..Default::default()
		},
		ScriptedStep {
			receiving_hash: Some(tx_hash(30)),
			..Default::default()
		},
	];
	let (service, history) = service(MockExecutor::new(script), MockWallet::on_chain(42161));

	let report = service
		.execute(&vault_route("r1"), &recipient(), &MockPrompt::accepting())
		.await
		.unwrap();

	let hashes = &report.progress.hashes;
	assert_eq!(hashes.swap.as_deref(), Some(tx_hash(1).as_str()));
	assert_eq!(hashes.bridge.as_deref(), Some(tx_hash(2).as_str()));
	assert_eq!(hashes.deposit.as_deref(), Some(tx_hash(3).as_str()));
	assert!(report
		.progress
		.steps
		.iter()
		.all(|s| s.status == StepStatus::Completed));

	let entry = history.entries().await.unwrap().remove(0);
	assert_eq!(entry.status, HistoryStatus::Completed);
	assert!(entry.used_vault);
	assert_eq!(entry.hashes, report.progress.hashes);
}

#[tokio::test]
async fn test_chain_switch_is_awaited_before_step_runs() {
	let script = vec![ScriptedStep {
		chain_id: Some(42161),
		..Default::default()
	}];
	let wallet = Arc::new(MockWallet::on_chain(1));
	let history = TransactionHistory::new(Arc::new(MemoryStore::new()));
	let service = ExecutionService::new(Arc::new(MockExecutor::new(script)), wallet.clone())
		.with_history(history);

	service
		.execute(&bridge_route("r1", 0.1), &recipient(), &MockPrompt::accepting())
		.await
		.unwrap();

	assert_eq!(*wallet.switches.lock().unwrap(), vec![42161]);
	assert_eq!(wallet.current_chain(), 42161);
}

#[tokio::test]
async fn test_refused_chain_switch_fails_execution() {
	let script = vec![ScriptedStep {
		chain_id: Some(42161),
		..Default::default()
	}];
	let (service, history) = service(MockExecutor::new(script), MockWallet::refusing_switch(1));

	let err = service
		.execute(&bridge_route("r1", 0.1), &recipient(), &MockPrompt::accepting())
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		ExecutionError::ChainSwitchFailed { chain_id: 42161, .. }
	));

	let progress = service.subscribe().borrow().clone().unwrap();
	assert_eq!(progress.phase, ExecutionPhase::Failed);
	assert_eq!(progress.steps[0].status, StepStatus::Failed);

	let entry = history.entries().await.unwrap().remove(0);
	assert_eq!(entry.status, HistoryStatus::Failed);
	assert_eq!(entry.error.as_deref(), Some(err.to_string().as_str()));
}

#[tokio::test]
async fn test_accepted_rate_change_continues() {
	let script = vec![ScriptedStep {
		rate_change: Some(("985000".to_string(), "970000".to_string())),
		..Default::default()
	}];
	let (service, _) = service(MockExecutor::new(script), MockWallet::on_chain(42161));
	let prompt = MockPrompt::accepting();

	let report = service
		.execute(&bridge_route("r1", 0.1), &recipient(), &prompt)
		.await
		.unwrap();

	assert_eq!(report.progress.phase, ExecutionPhase::Completed);
	let asked = prompt.asked.lock().unwrap();
	assert_eq!(asked.len(), 1);
	assert_eq!(asked[0].old_to_amount.as_str(), "985000");
	assert_eq!(asked[0].new_to_amount.as_str(), "970000");
	assert_eq!(asked[0].token.symbol, "USDC");
}

#[tokio::test]
async fn test_rejected_rate_change_aborts() {
	let script = vec![ScriptedStep {
		rate_change: Some(("985000".to_string(), "900000".to_string())),
		..Default::default()
	}];
	let (service, _) = service(MockExecutor::new(script), MockWallet::on_chain(42161));

	let err = service
		.execute(&bridge_route("r1", 0.1), &recipient(), &MockPrompt::rejecting())
		.await
		.unwrap_err();

	assert!(matches!(err, ExecutionError::RateRejected));
	let progress = service.subscribe().borrow().clone().unwrap();
	assert_eq!(progress.phase, ExecutionPhase::Failed);
	assert!(!service.is_running());
}

#[tokio::test]
async fn test_failed_step_keeps_earlier_steps_completed() {
	let script = vec![
		ScriptedStep::default(),
		ScriptedStep {
			fail: Some("bridge reverted".to_string()),
			..Default::default()
		},
	];
	let (service, _) = service(MockExecutor::new(script), MockWallet::on_chain(42161));

	let err = service
		.execute(&vault_route("r1"), &recipient(), &MockPrompt::accepting())
		.await
		.unwrap_err();
	assert_eq!(err.to_string(), "Step 1 failed: bridge reverted");

	let progress = service.subscribe().borrow().clone().unwrap();
	assert_eq!(progress.steps[0].status, StepStatus::Completed);
	assert_eq!(progress.steps[1].status, StepStatus::Failed);
	assert_eq!(progress.steps[2].status, StepStatus::Pending);
	assert_eq!(progress.current_step_index, 1);
	assert_eq!(progress.hashes.swap.as_deref(), Some(tx_hash(1).as_str()));
	assert!(progress.hashes.deposit.is_none());
}

#[tokio::test]
async fn test_second_execution_while_running_is_rejected() {
	let executor = Arc::new(MockExecutor::held(vec![]));
	let service = Arc::new(ExecutionService::new(
		executor.clone(),
		Arc::new(MockWallet::on_chain(42161)),
	));

	let running = {
		let service = Arc::clone(&service);
		tokio::spawn(async move {
			service
				.execute(&bridge_route("r1", 0.1), &recipient(), &MockPrompt::accepting())
				.await
		})
	};
	while !service.is_running() {
		tokio::task::yield_now().await;
	}

	let err = service
		.execute(&bridge_route("r2", 0.1), &recipient(), &MockPrompt::accepting())
		.await
		.unwrap_err();
	assert!(matches!(err, ExecutionError::AlreadyExecuting));

	executor.release();
	assert!(running.await.unwrap().is_ok());
	assert_eq!(executor.runs.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_history_is_capped() {
	let (service, history) = service(MockExecutor::new(vec![]), MockWallet::on_chain(42161));

	for i in 0..(MAX_HISTORY_ENTRIES + 5) {
		service
			.execute(
				&bridge_route(&format!("r{}", i), 0.1),
				&recipient(),
				&MockPrompt::accepting(),
			)
			.await
			.unwrap();
	}

	let entries = history.entries().await.unwrap();
	assert_eq!(entries.len(), MAX_HISTORY_ENTRIES);
	assert!(entries.iter().all(|e| e.status == HistoryStatus::Completed));
}
