//! Property-based tests for amount parsing.
//!
//! These verify that `Amount::parse` and `Display` form an exact round trip
//! over the full stroop range, and that precision violations are always
//! rejected rather than rounded.
//!
//!   Refer to `src/models/amount.rs` for more details.
use horizon_wallet::models::Amount;
use proptest::{prelude::*, test_runner::Config};

proptest! {
  #![proptest_config(Config {
    cases: 1000, ..Config::default()
  })]

  /// Rendering an amount and parsing it back is lossless.
  #[test]
  fn prop_display_parse_round_trip(stroops in 0i64..=i64::MAX) {
      let amount = Amount::from_stroops(stroops).unwrap();
      let rendered = amount.to_string();
      let parsed = Amount::parse(&rendered).unwrap();
      prop_assert_eq!(parsed, amount);
  }

  /// Any decimal with up to 7 fractional digits parses to the exact stroop
  /// count, independent of trailing-zero padding.
  #[test]
  fn prop_parse_is_exact(units in 0i64..=900_000_000_000, frac in 0i64..10_000_000) {
      let rendered = format!("{}.{:07}", units, frac);
      let parsed = Amount::parse(&rendered).unwrap();
      prop_assert_eq!(parsed.stroops(), units * 10_000_000 + frac);
  }

  /// An 8th fractional digit is always rejected.
  #[test]
  fn prop_eighth_digit_rejected(units in 0i64..1_000_000, frac in 0i64..100_000_000) {
      let rendered = format!("{}.{:08}", units, frac);
      prop_assert!(Amount::parse(&rendered).is_err());
  }

  /// Signs are never accepted, regardless of the digits that follow.
  #[test]
  fn prop_signed_input_rejected(units in 0i64..1_000_000, sign in prop::sample::select(vec!["-", "+"])) {
      let rendered = format!("{}{}", sign, units);
      prop_assert!(Amount::parse(&rendered).is_err());
  }
}
