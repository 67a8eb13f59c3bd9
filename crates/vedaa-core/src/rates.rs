//! # Metal Rates
//!
//! Data shapes for the live metal rate feed and the per-gram rate table the
//! calculator prices against.
//!
//! ## Refresh Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Feed (external) ──► Some(LiveRates) ──► RateBoard::refresh ──► table  │
//! │                 └──► None (failed)   ──► RateBoard::refresh ──► keep   │
//! │                                                         last-known-good │
//! │                                                                         │
//! │  The pricing engine only ever sees a complete MetalRates table.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Metal, MetalDescriptor};

// =============================================================================
// Live feed shapes
// =============================================================================

/// Price of one metal as reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetalPrice {
    #[ts(type = "string")]
    pub price_per_gram: Decimal,
    /// Absolute day change, in percent.
    #[ts(type = "string")]
    pub change_percent: Decimal,
    pub is_positive_change: bool,
}

impl MetalPrice {
    /// Signed change for display, e.g. `+1.2%` / `-0.5%`.
    pub fn change_label(&self) -> String {
        let sign = if self.is_positive_change { '+' } else { '-' };
        format!("{}{}%", sign, self.change_percent.abs().round_dp(1))
    }
}

/// A full snapshot from the live rate feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LiveRates {
    pub gold24k: MetalPrice,
    pub gold22k: MetalPrice,
    pub gold18k: MetalPrice,
    pub silver: MetalPrice,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
    pub source: String,
}

impl LiveRates {
    pub fn price(&self, metal: Metal) -> &MetalPrice {
        match metal {
            Metal::Gold24k => &self.gold24k,
            Metal::Gold22k => &self.gold22k,
            Metal::Gold18k => &self.gold18k,
            Metal::Silver => &self.silver,
        }
    }
}

// =============================================================================
// Rate table
// =============================================================================

/// Per-gram rates in force for pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetalRates {
    #[ts(type = "string")]
    pub gold24k: Decimal,
    #[ts(type = "string")]
    pub gold22k: Decimal,
    #[ts(type = "string")]
    pub gold18k: Decimal,
    #[ts(type = "string")]
    pub silver: Decimal,
}

impl MetalRates {
    pub fn new(gold24k: Decimal, gold22k: Decimal, gold18k: Decimal, silver: Decimal) -> Self {
        MetalRates {
            gold24k,
            gold22k,
            gold18k,
            silver,
        }
    }

    /// Table built from a live snapshot.
    pub fn from_live(live: &LiveRates) -> Self {
        MetalRates {
            gold24k: live.gold24k.price_per_gram,
            gold22k: live.gold22k.price_per_gram,
            gold18k: live.gold18k.price_per_gram,
            silver: live.silver.price_per_gram,
        }
    }

    /// Table derived from the configured 22K gold rate.
    ///
    /// 24K and 18K scale by fineness (24/22, 18/22); values are truncated to
    /// whole rupees the way counter boards display them. A 22K rate too large
    /// to scale saturates at `Decimal::MAX`.
    pub fn from_defaults(gold22k: Decimal, silver: Decimal) -> Self {
        let karat = |k: u32| {
            let k = Decimal::from(k);
            match gold22k.checked_mul(k) {
                Some(scaled) => (scaled / Decimal::from(22)).trunc(),
                None => (gold22k / Decimal::from(22)).saturating_mul(k).trunc(),
            }
        };
        MetalRates {
            gold24k: karat(24),
            gold22k,
            gold18k: karat(18),
            silver,
        }
    }

    pub fn rate_for(&self, metal: Metal) -> Decimal {
        match metal {
            Metal::Gold24k => self.gold24k,
            Metal::Gold22k => self.gold22k,
            Metal::Gold18k => self.gold18k,
            Metal::Silver => self.silver,
        }
    }

    /// Invoice descriptor for a metal at today's rate.
    pub fn descriptor(&self, metal: Metal) -> MetalDescriptor {
        MetalDescriptor::for_metal(metal, self.rate_for(metal))
    }

    /// Returns a copy with one rate replaced (manual override at the counter).
    pub fn with_rate(mut self, metal: Metal, rate: Decimal) -> Self {
        let rate = rate.max(Decimal::ZERO);
        match metal {
            Metal::Gold24k => self.gold24k = rate,
            Metal::Gold22k => self.gold22k = rate,
            Metal::Gold18k => self.gold18k = rate,
            Metal::Silver => self.silver = rate,
        }
        self
    }
}

// =============================================================================
// Rate board
// =============================================================================

/// Current rates plus when they were last refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateBoard {
    rates: MetalRates,
    live: Option<LiveRates>,
}

impl RateBoard {
    /// Board seeded with fallback rates (e.g. from user settings).
    pub fn new(fallback: MetalRates) -> Self {
        RateBoard {
            rates: fallback,
            live: None,
        }
    }

    pub fn rates(&self) -> &MetalRates {
        &self.rates
    }

    /// The last successful feed snapshot, if any.
    pub fn live(&self) -> Option<&LiveRates> {
        self.live.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.live.as_ref().map(|l| l.last_updated)
    }

    /// Applies a feed result. `None` means the fetch failed; the previous
    /// rates stay in force. Returns whether the table changed.
    pub fn refresh(&mut self, snapshot: Option<LiveRates>) -> bool {
        match snapshot {
            Some(live) => {
                let rates = MetalRates::from_live(&live);
                let changed = rates != self.rates;
                tracing::debug!(source = %live.source, changed, "Rate board refreshed");
                self.rates = rates;
                self.live = Some(live);
                changed
            }
            None => {
                tracing::debug!("Rate feed unavailable, keeping last-known-good rates");
                false
            }
        }
    }

    /// Manual override of one rate; keeps the live snapshot for its change data.
    pub fn set_rate(&mut self, metal: Metal, rate: Decimal) {
        self.rates = self.rates.with_rate(metal, rate);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
