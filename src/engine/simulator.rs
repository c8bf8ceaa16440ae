use crate::data::PricePoint;
use crate::engine::ledger::{Ledger, TradeRecord};
use crate::indicator::Signal;
use crate::portfolio::PositionState;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid close price {price} on buy signal at {date}")]
    InvalidPrice { date: NaiveDate, price: f64 },
    #[error("Capital {capital} buys no shares at {price} on {date}")]
    InsufficientCapital {
        date: NaiveDate,
        price: f64,
        capital: f64,
    },
    #[error("Invalid starting capital: {0}")]
    InvalidCapital(f64),
    #[error("Signal count ({signals}) does not match price count ({prices})")]
    LengthMismatch { signals: usize, prices: usize },
}

//applies one signal to the position state
//flat + buy opens, long + sell closes, every other pair leaves the state untouched
fn step(
    state: PositionState,
    signal: Signal,
    point: &PricePoint,
    capital: f64,
) -> Result<(PositionState, Option<TradeRecord>), SimulationError> {
    match (state, signal) {
        (PositionState::Flat, Signal::Buy) => {
            let price = point.close;
            if !price.is_finite() || price <= 0.0 {
                return Err(SimulationError::InvalidPrice {
                    date: point.date,
                    price,
                });
            }

            let shares = (capital / price).floor() as u64;
            if shares == 0 {
                return Err(SimulationError::InsufficientCapital {
                    date: point.date,
                    price,
                    capital,
                });
            }

            let entry = TradeRecord::Entry {
                date: point.date,
                price,
                shares,
            };
            let next = PositionState::Long {
                entry_date: point.date,
                entry_price: price,
                shares,
            };
            Ok((next, Some(entry)))
        }
        (
            PositionState::Long {
                entry_price,
                shares,
                ..
            },
            Signal::Sell,
        ) => {
            let profit_per_share = point.close - entry_price;
            let exit = TradeRecord::Exit {
                date: point.date,
                price: point.close,
                shares,
                profit_per_share,
                total_profit: profit_per_share * shares as f64,
            };
            Ok((PositionState::Flat, Some(exit)))
        }
        (state, _) => Ok((state, None)),
    }
}

//replays signals over their price points with a fixed capital per entry
//a position still open at the end is reported separately and never closed
pub fn simulate(
    signals: &[Signal],
    prices: &[PricePoint],
    starting_capital: f64,
) -> Result<Ledger, SimulationError> {
    if signals.len() != prices.len() {
        return Err(SimulationError::LengthMismatch {
            signals: signals.len(),
            prices: prices.len(),
        });
    }
    if !starting_capital.is_finite() || starting_capital <= 0.0 {
        return Err(SimulationError::InvalidCapital(starting_capital));
    }

    let mut state = PositionState::Flat;
    let mut trades = Vec::new();

    for (signal, point) in signals.iter().zip(prices) {
        let (next, record) = step(state, *signal, point, starting_capital)?;
        state = next;
        trades.extend(record);
    }

    let open_position = prices
        .last()
        .and_then(|last| state.mark_to_market(last.date, last.close));

    Ok(Ledger {
        trades,
        open_position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PricePoint::from_close(start + chrono::Duration::days(i as i64), close)
            })
            .collect()
    }

    fn signals(pattern: &str) -> Vec<Signal> {
        pattern
            .chars()
            .map(|c| match c {
                'B' => Signal::Buy,
                'S' => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect()
    }

    #[test]
    fn buy_then_sell_produces_one_round_trip() {
        let prices = series(&[10.0, 12.0, 15.0]);
        let ledger = simulate(&signals("BHS"), &prices, 1000.0).unwrap();

        assert_eq!(ledger.trades.len(), 2);
        assert_eq!(
            ledger.trades[0],
            TradeRecord::Entry {
                date: prices[0].date,
                price: 10.0,
                shares: 100,
            }
        );
        match ledger.trades[1] {
            TradeRecord::Exit {
                shares,
                profit_per_share,
                total_profit,
                ..
            } => {
                assert_eq!(shares, 100);
                assert_relative_eq!(profit_per_share, 5.0);
                assert_relative_eq!(total_profit, 500.0);
            }
            other => panic!("expected exit, got {:?}", other),
        }
        assert!(ledger.open_position.is_none());
    }

    #[test]
    fn shares_are_floored() {
        let prices = series(&[3.0, 4.0]);
        let ledger = simulate(&signals("BS"), &prices, 1000.0).unwrap();
        assert_eq!(ledger.trades[0].shares(), 333);
        assert_relative_eq!(ledger.trades[1].total_profit().unwrap(), 333.0);
    }

    #[test]
    fn redundant_signals_are_ignored() {
        let prices = series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let ledger = simulate(&signals("SBBHSS"), &prices, 100.0).unwrap();

        assert_eq!(ledger.trades.len(), 2);
        assert_eq!(ledger.trades[0].price(), 11.0);
        assert_eq!(ledger.trades[1].price(), 14.0);
    }

    #[test]
    fn open_position_at_end_is_not_closed() {
        let prices = series(&[10.0, 11.0, 12.0]);
        let ledger = simulate(&signals("HBH"), &prices, 100.0).unwrap();

        assert_eq!(ledger.entry_count(), 1);
        assert_eq!(ledger.exit_count(), 0);

        let open = ledger.open_position.unwrap();
        assert_eq!(open.shares, 9);
        assert_eq!(open.last_price, 12.0);
        assert_relative_eq!(open.unrealized_profit, 9.0);
    }

    #[test]
    fn all_hold_gives_empty_ledger() {
        let prices = series(&[10.0, 11.0, 12.0]);
        let ledger = simulate(&signals("HHH"), &prices, 1000.0).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.open_position.is_none());
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let ledger = simulate(&[], &[], 1000.0).unwrap();
        assert_eq!(ledger, Ledger::default());
    }

    #[test]
    fn zero_price_buy_is_rejected() {
        let prices = series(&[0.0, 5.0]);
        let err = simulate(&signals("BS"), &prices, 1000.0).unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidPrice {
                date: prices[0].date,
                price: 0.0,
            }
        );
    }

    #[test]
    fn negative_or_nan_price_buy_is_rejected() {
        let prices = series(&[-1.0]);
        assert!(matches!(
            simulate(&signals("B"), &prices, 1000.0),
            Err(SimulationError::InvalidPrice { .. })
        ));

        let prices = series(&[f64::NAN]);
        assert!(matches!(
            simulate(&signals("B"), &prices, 1000.0),
            Err(SimulationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn zero_price_is_harmless_without_a_buy() {
        let prices = series(&[0.0, 5.0]);
        let ledger = simulate(&signals("SH"), &prices, 1000.0).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn price_above_capital_is_rejected() {
        let prices = series(&[2000.0]);
        assert!(matches!(
            simulate(&signals("B"), &prices, 1000.0),
            Err(SimulationError::InsufficientCapital { .. })
        ));
    }

    #[test]
    fn invalid_capital_and_length_mismatch() {
        let prices = series(&[10.0]);
        assert_eq!(
            simulate(&signals("H"), &prices, 0.0),
            Err(SimulationError::InvalidCapital(0.0))
        );
        assert_eq!(
            simulate(&signals("HH"), &prices, 100.0),
            Err(SimulationError::LengthMismatch {
                signals: 2,
                prices: 1,
            })
        );
    }

    fn signal_strategy() -> impl Strategy<Value = Signal> {
        prop_oneof![Just(Signal::Hold), Just(Signal::Buy), Just(Signal::Sell)]
    }

    proptest! {
        #[test]
        fn ledger_alternates_and_is_deterministic(
            rows in prop::collection::vec((signal_strategy(), 1.0f64..500.0), 0..100),
            capital in 1000.0f64..100000.0,
        ) {
            let (sigs, closes): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
            let prices = series(&closes);

            let ledger = simulate(&sigs, &prices, capital).unwrap();
            let again = simulate(&sigs, &prices, capital).unwrap();
            prop_assert_eq!(&ledger, &again);

            let entries = ledger.entry_count();
            let exits = ledger.exit_count();
            prop_assert!(entries >= exits);
            prop_assert!(entries - exits <= 1);
            prop_assert_eq!(ledger.open_position.is_some(), entries > exits);

            for (i, trade) in ledger.trades.iter().enumerate() {
                prop_assert_eq!(trade.is_exit(), i % 2 == 1);
            }
        }
    }
}
