//! Discount engine.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use jiff::{Span, Timestamp, ToSpan};
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::discounts::{
    errors::DiscountRejection,
    models::{AppliedDiscount, DiscountCode, DiscountType},
};

#[automock]
#[async_trait]
pub trait DiscountService: Send + Sync {
    /// Look up an active code by its case-insensitive key.
    async fn find_code(&self, code: &str) -> Option<DiscountCode>;

    /// Validate and price a code against a subtotal without consuming usage.
    async fn price_discount(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<AppliedDiscount, DiscountRejection>;

    /// Validate, price and atomically consume one usage of a code.
    ///
    /// Usage is gated by a compare-and-swap conditioned on the counter being
    /// below the limit, so concurrent redemptions stop exactly at the limit.
    async fn redeem(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<AppliedDiscount, DiscountRejection>;
}

struct CodeEntry {
    code: DiscountCode,
    usage: AtomicU32,
}

/// Discount engine over a fixed, in-process catalog of codes.
pub struct BuiltinDiscountService {
    codes: Vec<CodeEntry>,
}

impl std::fmt::Debug for BuiltinDiscountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinDiscountService")
            .field("codes", &self.codes.len())
            .finish()
    }
}

impl Default for BuiltinDiscountService {
    fn default() -> Self {
        Self::with_codes(default_codes(Timestamp::now()))
    }
}

impl BuiltinDiscountService {
    #[must_use]
    pub fn with_codes(codes: Vec<DiscountCode>) -> Self {
        Self {
            codes: codes
                .into_iter()
                .map(|code| CodeEntry {
                    code,
                    usage: AtomicU32::new(0),
                })
                .collect(),
        }
    }

    /// Current usage counter for a code, if it exists.
    #[must_use]
    pub fn usage_count(&self, code: &str) -> Option<u32> {
        self.entry(code).map(|e| e.usage.load(Ordering::SeqCst))
    }

    fn entry(&self, code: &str) -> Option<&CodeEntry> {
        self.codes
            .iter()
            .find(|entry| entry.code.code.eq_ignore_ascii_case(code))
    }

    fn validate(&self, entry: &CodeEntry, subtotal: Decimal) -> Result<(), DiscountRejection> {
        let code = &entry.code;

        if !code.active {
            return Err(DiscountRejection::Inactive);
        }

        let now = Timestamp::now();

        if now < code.starts_at || now > code.ends_at {
            return Err(DiscountRejection::OutOfWindow);
        }

        if let Some(minimum) = code.min_order_amount
            && subtotal < minimum
        {
            return Err(DiscountRejection::BelowMinimum { minimum, subtotal });
        }

        if let Some(limit) = code.usage_limit
            && entry.usage.load(Ordering::SeqCst) >= limit
        {
            return Err(DiscountRejection::LimitReached);
        }

        Ok(())
    }

    /// Consume one usage, failing when the limit has been reached.
    fn try_consume(&self, entry: &CodeEntry) -> bool {
        let Some(limit) = entry.code.usage_limit else {
            entry.usage.fetch_add(1, Ordering::SeqCst);
            return true;
        };

        let mut current = entry.usage.load(Ordering::SeqCst);

        loop {
            if current >= limit {
                return false;
            }

            match entry.usage.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}

#[async_trait]
impl DiscountService for BuiltinDiscountService {
    async fn find_code(&self, code: &str) -> Option<DiscountCode> {
        self.entry(code)
            .filter(|entry| entry.code.active)
            .map(|entry| entry.code.clone())
    }

    async fn price_discount(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<AppliedDiscount, DiscountRejection> {
        let entry = self.entry(code).ok_or(DiscountRejection::NotFound)?;

        self.validate(entry, subtotal).inspect_err(|rejection| {
            warn!(code, %subtotal, %rejection, "discount rejected");
        })?;

        Ok(snapshot(&entry.code, subtotal))
    }

    async fn redeem(
        &self,
        code: &str,
        subtotal: Decimal,
    ) -> Result<AppliedDiscount, DiscountRejection> {
        let entry = self.entry(code).ok_or(DiscountRejection::NotFound)?;

        self.validate(entry, subtotal).inspect_err(|rejection| {
            warn!(code, %subtotal, %rejection, "discount rejected");
        })?;

        if !self.try_consume(entry) {
            warn!(code, "discount usage limit reached during redemption");
            return Err(DiscountRejection::LimitReached);
        }

        let applied = snapshot(&entry.code, subtotal);

        debug!(code, amount = %applied.amount, "discount redeemed");

        Ok(applied)
    }
}

/// Compute the discount amount for a code against a subtotal.
///
/// The amount is clamped to the code's cap and to the subtotal itself (a
/// discount can never make the total negative), then rounded to 2 decimal
/// places with midpoint-to-even rounding.
fn compute_amount(code: &DiscountCode, subtotal: Decimal) -> Decimal {
    let mut amount = match code.kind {
        DiscountType::Percentage => subtotal * code.value / Decimal::from(100),
        DiscountType::FixedAmount => code.value,
    };

    if let Some(cap) = code.max_discount_amount {
        amount = amount.min(cap);
    }

    amount = amount.min(subtotal);

    amount.round_dp(2)
}

fn snapshot(code: &DiscountCode, subtotal: Decimal) -> AppliedDiscount {
    AppliedDiscount {
        code: code.code.clone(),
        name: code.name.clone(),
        kind: code.kind,
        value: code.value,
        amount: compute_amount(code, subtotal),
    }
}

/// Timestamp arithmetic wants absolute units.
fn days(n: i64) -> Span {
    (n * 24).hours()
}

/// The fixed catalog the engine ships with; windows are relative to `now`.
fn default_codes(now: Timestamp) -> Vec<DiscountCode> {
    vec![
        DiscountCode {
            code: "WELCOME10".to_owned(),
            name: "Welcome discount 10%".to_owned(),
            description: Some("10% off for new customers".to_owned()),
            kind: DiscountType::Percentage,
            value: Decimal::from(10),
            min_order_amount: Some(Decimal::from(50)),
            max_discount_amount: None,
            starts_at: now
                .saturating_sub(days(30))
                .expect("hour-only spans never overflow timestamp range"),
            ends_at: now
                .saturating_add(days(30))
                .expect("hour-only spans never overflow timestamp range"),
            usage_limit: Some(1000),
            active: true,
        },
        DiscountCode {
            code: "SAVE20".to_owned(),
            name: "Save €20".to_owned(),
            description: Some("Flat €20 off".to_owned()),
            kind: DiscountType::FixedAmount,
            value: Decimal::from(20),
            min_order_amount: Some(Decimal::from(100)),
            max_discount_amount: Some(Decimal::from(20)),
            starts_at: now
                .saturating_sub(days(15))
                .expect("hour-only spans never overflow timestamp range"),
            ends_at: now
                .saturating_add(days(15))
                .expect("hour-only spans never overflow timestamp range"),
            usage_limit: Some(500),
            active: true,
        },
        DiscountCode {
            code: "SUMMER15".to_owned(),
            name: "Summer sale 15%".to_owned(),
            description: Some("15% off for the summer promotion".to_owned()),
            kind: DiscountType::Percentage,
            value: Decimal::from(15),
            min_order_amount: Some(Decimal::from(75)),
            max_discount_amount: Some(Decimal::from(50)),
            starts_at: now
                .saturating_sub(days(10))
                .expect("hour-only spans never overflow timestamp range"),
            ends_at: now
                .saturating_add(days(20))
                .expect("hour-only spans never overflow timestamp range"),
            usage_limit: None,
            active: true,
        },
    ]
}
