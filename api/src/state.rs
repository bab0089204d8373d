//! API state: shared handles to the engine components

use std::sync::Arc;

use market_core::{EngineConfig, EscrowPolicy, FeeCalculator, FeeSchedule};
use market_escrow::{EscrowLedger, EscrowStore, PayoutScheduler};

#[derive(Clone)]
pub struct ApiState {
    pub schedule: Arc<FeeSchedule>,
    pub calculator: FeeCalculator,
    pub policy: EscrowPolicy,
    pub ledger: Arc<EscrowLedger>,
    pub scheduler: Arc<PayoutScheduler>,
}

impl ApiState {
    /// Wire the engine up against one store
    pub fn new(config: &EngineConfig, store: Arc<dyn EscrowStore>) -> Self {
        let schedule = Arc::new(config.schedule.clone());
        let ledger = Arc::new(EscrowLedger::new(store));
        let scheduler = Arc::new(PayoutScheduler::new(
            ledger.clone(),
            config.hold_period_secs,
        ));
        ApiState {
            calculator: FeeCalculator::new(schedule.clone()),
            policy: EscrowPolicy::new(schedule.clone()),
            schedule,
            ledger,
            scheduler,
        }
    }
}
