use crate::domain::payment::PaymentScheme;
use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, BitOr, BitOrAssign, Sub, SubAssign};
use std::str::FromStr;

/// Represents a signed monetary value.
///
/// This is a wrapper around `rust_decimal::Decimal` so that account balances
/// can't be mixed up with other decimal quantities. Overdrawn balances are
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `None` if the result falls outside the `Decimal` range.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl From<Decimal> for Balance {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Set of payment schemes an account is permissioned for.
///
/// Stored as a bitmask so an account can hold any combination of schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedPaymentSchemes(u8);

impl AllowedPaymentSchemes {
    pub const NONE: Self = Self(0);
    pub const BACS: Self = Self(1 << 0);
    pub const FASTER_PAYMENTS: Self = Self(1 << 1);
    pub const CHAPS: Self = Self(1 << 2);

    /// Returns true if every flag set in `other` is also set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn permits(self, scheme: PaymentScheme) -> bool {
        self.contains(scheme.into())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = PaymentScheme> {
        PaymentScheme::ALL
            .into_iter()
            .filter(move |scheme| self.permits(*scheme))
    }
}

impl From<PaymentScheme> for AllowedPaymentSchemes {
    fn from(scheme: PaymentScheme) -> Self {
        match scheme {
            PaymentScheme::Bacs => Self::BACS,
            PaymentScheme::FasterPayments => Self::FASTER_PAYMENTS,
            PaymentScheme::Chaps => Self::CHAPS,
        }
    }
}

impl BitOr for AllowedPaymentSchemes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AllowedPaymentSchemes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<PaymentScheme> for AllowedPaymentSchemes {
    fn from_iter<I: IntoIterator<Item = PaymentScheme>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::NONE, |acc, scheme| acc | scheme.into())
    }
}

/// Parses a `|`-separated scheme list such as `bacs|chaps`. An empty string
/// yields no permissions.
impl FromStr for AllowedPaymentSchemes {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(PaymentScheme::from_str)
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Live,
    Disabled,
}

impl FromStr for AccountStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "live" => Ok(Self::Live),
            "disabled" => Ok(Self::Disabled),
            other => Err(PaymentError::ValidationError(format!(
                "Unknown account status: {other}"
            ))),
        }
    }
}

/// A debtor account as held by an account store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: String,
    pub allowed_schemes: AllowedPaymentSchemes,
    pub status: AccountStatus,
    pub balance: Balance,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            allowed_schemes: AllowedPaymentSchemes::NONE,
            status: AccountStatus::Live,
            balance: Balance::ZERO,
        }
    }

    /// Subtracts `amount` from the balance.
    ///
    /// Callers must have validated the payment first. The balance is left
    /// unchanged if the result would overflow.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), PaymentError> {
        self.balance = self
            .balance
            .checked_sub(Balance::from(amount))
            .ok_or_else(|| PaymentError::BalanceOverflow(self.id.clone()))?;
        Ok(())
    }
}
