//! [`Money`]-related definitions.

use std::{cmp::Ordering, fmt, ops, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

use crate::define_kind;

/// Amount of money in some [`Currency`].
///
/// [`Money`] is an immutable value: every arithmetic operation returns a new
/// [`Money`], leaving its operands untouched.
///
/// All binary operations require both operands to be in the same
/// [`Currency`]. A mismatch is a caller bug and panics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] of the provided `amount` in the provided
    /// [`Currency`].
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero [`Money`] in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Indicates whether the amount of this [`Money`] is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Indicates whether the amount of this [`Money`] is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds the amount of this [`Money`] to 2 decimal places, half-up.
    #[must_use]
    pub fn round_2dp(self) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            currency: self.currency,
        }
    }

    /// Asserts that the [`Currency`] of the `other` [`Money`] matches the
    /// one of this [`Money`].
    fn assert_same_currency(&self, other: &Self, op: &str) {
        assert_eq!(
            self.currency, other.currency,
            "`Money` currency mismatch in `{op}`: \
             {} vs {}",
            self.currency, other.currency,
        );
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero(Currency::default())
    }
}

impl ops::Add for Money {
    type Output = Self;

    /// # Panics
    ///
    /// If the operands are in different [`Currency`]s.
    fn add(self, rhs: Self) -> Self::Output {
        self.assert_same_currency(&rhs, "add");
        Self {
            amount: self.amount + rhs.amount,
            currency: self.currency,
        }
    }
}

impl ops::Sub for Money {
    type Output = Self;

    /// # Panics
    ///
    /// If the operands are in different [`Currency`]s.
    fn sub(self, rhs: Self) -> Self::Output {
        self.assert_same_currency(&rhs, "sub");
        Self {
            amount: self.amount - rhs.amount,
            currency: self.currency,
        }
    }
}

impl ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            amount: -self.amount,
            currency: self.currency,
        }
    }
}

impl ops::Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self {
            amount: self.amount * rhs,
            currency: self.currency,
        }
    }
}

impl ops::Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        self * Decimal::from(rhs)
    }
}

impl PartialOrd for Money {
    /// Amounts in different [`Currency`]s are incomparable and yield
    /// [`None`].
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.currency == other.currency)
            .then(|| self.amount.cmp(&other.amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Turkish Lira."]
        Try = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Try
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn try_lira(s: &str) -> Money {
        Money::new(decimal(s), Currency::Try)
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45TRY").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Try,
            },
        );

        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Currency::Usd,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Tr").is_err());
        assert!(Money::from_str("123.45Turkish").is_err());

        assert!(Money::from_str("123.00TRY").is_ok());
        assert!(Money::from_str("123.0TRY").is_ok());
        assert!(Money::from_str("123TRY").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(try_lira("123.45").to_string(), "123.45TRY");
        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Currency::Eur,
            }
            .to_string(),
            "123.45EUR",
        );

        assert_eq!(try_lira("123.00").to_string(), "123TRY");
        assert_eq!(try_lira("123.0").to_string(), "123TRY");
        assert_eq!(try_lira("123").to_string(), "123TRY");
    }

    #[test]
    fn adds_and_subtracts() {
        assert_eq!(try_lira("100.50") + try_lira("49.50"), try_lira("150"));
        assert_eq!(try_lira("100") - try_lira("0.01"), try_lira("99.99"));
    }

    #[test]
    fn multiplies() {
        assert_eq!(try_lira("1000") * 5u32, try_lira("5000"));
        assert_eq!(try_lira("2") * decimal("1.5"), try_lira("3.0"));
    }

    #[test]
    fn negates() {
        assert_eq!(-try_lira("100.50"), try_lira("-100.50"));
        assert!((-try_lira("1")).is_negative());
        assert_eq!(-Money::zero(Currency::Try), Money::zero(Currency::Try));
    }

    #[test]
    #[should_panic(expected = "currency mismatch")]
    fn add_panics_on_currency_mismatch() {
        let _ = try_lira("1") + Money::new(decimal("1"), Currency::Usd);
    }

    #[test]
    #[should_panic(expected = "currency mismatch")]
    fn sub_panics_on_currency_mismatch() {
        let _ = try_lira("1") - Money::new(decimal("1"), Currency::Eur);
    }

    #[test]
    fn compares_within_currency_only() {
        assert!(try_lira("2") > try_lira("1"));
        assert!(try_lira("1") <= try_lira("1"));
        assert_eq!(
            try_lira("1")
                .partial_cmp(&Money::new(decimal("1"), Currency::Usd)),
            None,
        );
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(try_lira("10.005").round_2dp(), try_lira("10.01"));
        assert_eq!(try_lira("10.004").round_2dp(), try_lira("10.00"));
        assert_eq!(try_lira("-10.005").round_2dp(), try_lira("-10.01"));
    }

    #[test]
    fn zero_helpers() {
        assert!(Money::zero(Currency::Try).is_zero());
        assert!(!try_lira("0.01").is_zero());
        assert!(try_lira("-0.01").is_negative());
        assert!(!try_lira("0").is_negative());
        assert_eq!(Money::default().currency, Currency::Try);
    }
}
