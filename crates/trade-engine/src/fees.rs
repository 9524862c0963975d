//! Broker fee model
//!
//! A vertical spread always has two legs, so every per-contract charge is
//! applied `2 * quantity` times. Closing costs the same as opening.

use std::num::NonZeroU32;

use common::OptionSide;
use config::FeeSchedule;
use tracing::trace;

use crate::types::{FeeBreakdown, TradeFees};

pub const LEGS_PER_SPREAD: u32 = 2;

/// Fee calculator over a per-contract schedule
#[derive(Debug, Clone, Default)]
pub struct FeeModel {
    schedule: FeeSchedule,
}

impl FeeModel {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Commission and clearing per contract; futures overrides win over index
    fn per_contract(&self, is_index: bool, is_futures: bool) -> (f64, f64) {
        let base = (
            self.schedule.commission_per_contract,
            self.schedule.clearing_fee_per_contract,
        );

        let overridden = if is_futures {
            self.schedule.futures.as_ref()
        } else if is_index {
            self.schedule.index.as_ref()
        } else {
            None
        };

        overridden
            .map(|o| (o.commission_per_contract, o.clearing_fee_per_contract))
            .unwrap_or(base)
    }

    /// Entry, exit and round-trip fees for `quantity` spreads
    pub fn compute(
        &self,
        side: OptionSide,
        quantity: NonZeroU32,
        is_index: bool,
        is_futures: bool,
    ) -> TradeFees {
        let contracts = f64::from(LEGS_PER_SPREAD) * f64::from(quantity.get());
        let (commission, clearing) = self.per_contract(is_index, is_futures);
        let regulatory =
            self.schedule.orf_fee_per_contract + self.schedule.taf_fee_per_contract;

        let entry = FeeBreakdown::new(
            commission * contracts,
            clearing * contracts,
            regulatory * contracts,
        );

        trace!(%side, quantity = quantity.get(), is_index, is_futures, total = entry.total, "Computed entry fees");

        TradeFees::new(entry, entry)
    }
}

/// Fees under the default equity-option schedule
pub fn compute_fees(
    side: OptionSide,
    quantity: NonZeroU32,
    is_index: bool,
    is_futures: bool,
) -> TradeFees {
    FeeModel::default().compute(side, quantity, is_index, is_futures)
}
