//! Applied-coupon state for a cart/checkout session.
//!
//! At most one coupon is bound to a session at a time. Rejections are
//! transient: they surface once through the returned event and the state
//! settles back to `Idle`, never persisting a rejected binding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coupon::Coupon;
use crate::money::Money;
use crate::validator::{validate, ApplicationResult, PurchaseContext, RejectionReason};

/// The coupon currently bound to the session, with its computed discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    pub coupon: Coupon,
    pub discount: Money,
    pub label: String,
}

/// Session binding state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum AppliedState {
    /// No coupon bound.
    #[default]
    Idle,
    /// A submission is being checked (held only while a server round-trip
    /// is outstanding; local validation resolves synchronously).
    Validating { code: String },
    /// A coupon is bound.
    Applied(AppliedCoupon),
}

/// What a session operation did, for the UI to react to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SessionEvent {
    /// A coupon was bound (replacing any prior binding).
    Applied(AppliedCoupon),
    /// The submitted code was rejected; state returned to `Idle`.
    Rejected(RejectionReason),
    /// The bound coupon was explicitly removed.
    Removed,
    /// The bound coupon stopped validating after a cart change and was
    /// silently dropped; surface this as a notification.
    Dropped {
        code: String,
        reason: RejectionReason,
    },
    /// The bound coupon still validates; its discount was recomputed for
    /// the new purchase amount.
    Recomputed(AppliedCoupon),
    /// Nothing was bound, nothing changed.
    NoChange,
}

/// Owner of the single applied-coupon reference for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CouponSession {
    state: AppliedState,
}

impl CouponSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppliedState {
        &self.state
    }

    /// The bound coupon, if any.
    pub fn applied(&self) -> Option<&AppliedCoupon> {
        match &self.state {
            AppliedState::Applied(applied) => Some(applied),
            _ => None,
        }
    }

    /// The discount currently in effect (zero-equivalent `None` when no
    /// coupon is bound).
    pub fn current_discount(&self) -> Option<Money> {
        self.applied().map(|a| a.discount)
    }

    /// Submit a code (user-entered or clicked suggestion). A successful
    /// submission replaces any prior binding; a rejected one clears it.
    pub fn submit_code(
        &mut self,
        code: &str,
        ctx: &PurchaseContext,
        catalog: &[Coupon],
        now: DateTime<Utc>,
    ) -> SessionEvent {
        self.state = AppliedState::Validating {
            code: code.trim().to_uppercase(),
        };
        match validate(code, ctx, catalog, now) {
            ApplicationResult::Accepted {
                coupon,
                discount,
                label,
            } => {
                let applied = AppliedCoupon {
                    coupon,
                    discount,
                    label,
                };
                self.state = AppliedState::Applied(applied.clone());
                SessionEvent::Applied(applied)
            }
            ApplicationResult::Rejected(reason) => {
                self.state = AppliedState::Idle;
                SessionEvent::Rejected(reason)
            }
        }
    }

    /// Explicitly remove the bound coupon.
    pub fn remove(&mut self) -> SessionEvent {
        match std::mem::take(&mut self.state) {
            AppliedState::Applied(_) => SessionEvent::Removed,
            _ => SessionEvent::NoChange,
        }
    }

    /// Re-validate after a purchase-amount or product-set change. Drops
    /// the binding when it no longer validates, recomputes the discount
    /// when it still does.
    pub fn cart_changed(
        &mut self,
        ctx: &PurchaseContext,
        catalog: &[Coupon],
        now: DateTime<Utc>,
    ) -> SessionEvent {
        let AppliedState::Applied(current) = &self.state else {
            return SessionEvent::NoChange;
        };
        let code = current.coupon.code.clone();

        match validate(&code, ctx, catalog, now) {
            ApplicationResult::Accepted {
                coupon,
                discount,
                label,
            } => {
                let applied = AppliedCoupon {
                    coupon,
                    discount,
                    label,
                };
                self.state = AppliedState::Applied(applied.clone());
                SessionEvent::Recomputed(applied)
            }
            ApplicationResult::Rejected(reason) => {
                self.state = AppliedState::Idle;
                SessionEvent::Dropped { code, reason }
            }
        }
    }
}
