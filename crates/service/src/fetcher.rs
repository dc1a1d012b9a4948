//! Debounced, de-duplicating route fetcher
//!
//! Wraps [`RouteService`] for an interactive session: inputs arrive in bursts,
//! only the latest one is considered once the debounce window elapses, and a
//! request identical to the one in flight (or the one last completed) never
//! reaches the vendor twice. At most one vendor call is in flight per fetcher;
//! in-flight calls are never cancelled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use kite_types::{
	RequestValidationError, RouteAcquisition, RouteRequest, RouteRequestKey, RouteResult,
	ValidatedRouteRequest,
};
use tokio::sync::watch;
use tracing::debug;

use crate::route::RouteService;

/// Default debounce window applied to [`RouteFetcher::request`]
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Route state as observed by subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum RouteState {
	/// No valid request yet, or the latest input is incomplete
	Idle,
	Loading,
	Ready(RouteAcquisition),
	Failed(String),
}

impl RouteState {
	pub fn is_loading(&self) -> bool {
		matches!(self, RouteState::Loading)
	}
}

/// What [`RouteFetcher::fetch_now`] did with a request
#[derive(Debug)]
pub enum FetchOutcome {
	/// A vendor call was made; its result is also published as state
	Fetched(RouteResult<RouteAcquisition>),
	/// Same request as the one in flight or the one last completed
	Suppressed,
	/// Another request is in flight; this one is fetched when it completes
	Queued,
	/// Incomplete or malformed input; state reset to [`RouteState::Idle`]
	Invalid(RequestValidationError),
}

#[derive(Debug, Default)]
struct FetchMemo {
	in_flight: Option<RouteRequestKey>,
	last_completed: Option<RouteRequestKey>,
	/// Latest request seen while another was in flight
	pending: Option<ValidatedRouteRequest>,
	/// Input turned invalid while a call was in flight; its result is stale
	superseded: bool,
}

enum Begin {
	Start(ValidatedRouteRequest, RouteRequestKey),
	Suppressed,
	Queued,
}

struct Inner {
	service: Arc<RouteService>,
	debounce: Duration,
	generation: AtomicU64,
	memo: Mutex<FetchMemo>,
	state: watch::Sender<RouteState>,
}

/// Session-scoped route fetcher; cheap to clone
#[derive(Clone)]
pub struct RouteFetcher {
	inner: Arc<Inner>,
}

impl std::fmt::Debug for RouteFetcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteFetcher")
			.field("debounce", &self.inner.debounce)
			.field("state", &*self.inner.state.borrow())
			.finish()
	}
}

impl RouteFetcher {
	pub fn new(service: Arc<RouteService>) -> Self {
		Self::with_debounce(service, DEFAULT_DEBOUNCE)
	}

	pub fn with_debounce(service: Arc<RouteService>, debounce: Duration) -> Self {
		let (state, _) = watch::channel(RouteState::Idle);
		Self {
			inner: Arc::new(Inner {
				service,
				debounce,
				generation: AtomicU64::new(0),
				memo: Mutex::new(FetchMemo::default()),
				state,
			}),
		}
	}

	pub fn subscribe(&self) -> watch::Receiver<RouteState> {
		self.inner.state.subscribe()
	}

	pub fn state(&self) -> RouteState {
		self.inner.state.borrow().clone()
	}

	/// Record the latest input and restart the debounce timer
	///
	/// When the timer fires without a newer input having arrived, the request
	/// goes through the same path as [`RouteFetcher::fetch_now`].
	pub fn request(&self, request: RouteRequest) {
		let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
		let inner = Arc::clone(&self.inner);

		tokio::spawn(async move {
			tokio::time::sleep(inner.debounce).await;
			if inner.generation.load(Ordering::SeqCst) != generation {
				return;
			}
			let outcome = inner.run(&request).await;
			debug!("Debounced route request finished: {}", outcome_label(&outcome));
		});
	}

	/// Fetch immediately, bypassing the debounce window but not de-duplication
	pub async fn fetch_now(&self, request: RouteRequest) -> FetchOutcome {
		// a direct fetch supersedes any debounced input still waiting
		self.inner.generation.fetch_add(1, Ordering::SeqCst);
		self.inner.run(&request).await
	}

	/// Forget the completed request so that the next identical request refetches
	pub fn reset(&self) {
		let mut memo = self.inner.memo();
		memo.last_completed = None;
		memo.pending = None;
	}
}

impl Inner {
	fn memo(&self) -> MutexGuard<'_, FetchMemo> {
		self.memo.lock().unwrap_or_else(PoisonError::into_inner)
	}

	async fn run(self: &Arc<Self>, request: &RouteRequest) -> FetchOutcome {
		let validated = match request.validate() {
			Ok(validated) => validated,
			Err(e) => {
				let mut memo = self.memo();
				memo.pending = None;
				memo.last_completed = None;
				let in_flight = memo.in_flight.is_some();
				memo.superseded = in_flight;
				self.state.send_replace(RouteState::Idle);
				return FetchOutcome::Invalid(e);
			},
		};

		let (validated, key) = match self.begin(validated) {
			Begin::Start(validated, key) => (validated, key),
			Begin::Suppressed => return FetchOutcome::Suppressed,
			Begin::Queued => return FetchOutcome::Queued,
		};

		let (result, next) = self.fetch_once(&validated, key).await;
		if let Some(next) = next {
			let inner = Arc::clone(self);
			tokio::spawn(async move { inner.follow_up(next).await });
		}
		FetchOutcome::Fetched(result)
	}

	fn begin(&self, validated: ValidatedRouteRequest) -> Begin {
		let key = validated.key();
		let mut memo = self.memo();

		match memo.in_flight.as_ref().map(|in_flight| *in_flight == key) {
			Some(true) => {
				memo.pending = None;
				memo.superseded = false;
				debug!("Route request identical to the one in flight, suppressed");
				Begin::Suppressed
			},
			Some(false) => {
				memo.pending = Some(validated);
				debug!("Route request queued behind the one in flight");
				Begin::Queued
			},
			None if memo.last_completed.as_ref() == Some(&key) => {
				debug!("Route request identical to the last completed one, suppressed");
				Begin::Suppressed
			},
			None => {
				memo.in_flight = Some(key.clone());
				memo.superseded = false;
				self.state.send_replace(RouteState::Loading);
				Begin::Start(validated, key)
			},
		}
	}

	/// One vendor call; returns its result and the follow-up request, if any
	async fn fetch_once(
		&self,
		validated: &ValidatedRouteRequest,
		key: RouteRequestKey,
	) -> (RouteResult<RouteAcquisition>, Option<ValidatedRouteRequest>) {
		let result = self.service.acquire_validated(validated).await;

		let mut memo = self.memo();
		memo.in_flight = None;
		let stale = std::mem::take(&mut memo.superseded);
		if !stale {
			memo.last_completed = Some(key.clone());
			let state = match &result {
				Ok(acquisition) => RouteState::Ready(acquisition.clone()),
				Err(e) => RouteState::Failed(e.to_string()),
			};
			self.state.send_replace(state);
		}
		let next = memo.pending.take().filter(|pending| pending.key() != key);

		(result, next)
	}

	/// Fetch `first`, then whatever was queued behind it, until the queue is empty
	async fn follow_up(self: Arc<Self>, first: ValidatedRouteRequest) {
		let mut next = Some(first);
		while let Some(validated) = next.take() {
			next = match self.begin(validated) {
				Begin::Start(validated, key) => self.fetch_once(&validated, key).await.1,
				Begin::Suppressed | Begin::Queued => None,
			};
		}
	}
}

fn outcome_label(outcome: &FetchOutcome) -> &'static str {
	match outcome {
		FetchOutcome::Fetched(Ok(_)) => "fetched",
		FetchOutcome::Fetched(Err(_)) => "failed",
		FetchOutcome::Suppressed => "suppressed",
		FetchOutcome::Queued => "queued",
		FetchOutcome::Invalid(_) => "invalid",
	}
}
