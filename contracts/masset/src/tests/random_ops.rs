extern crate std;

use pretty_assertions::assert_eq;
use soroban_sdk::Env;
use test_case::test_case;

use super::setup::{default_fees, seed_equal, three_asset_basket, units};
use mosaic::constants::WEIGHT_PRECISION;
use mosaic::types::{BassetStatus, WeightLimits};

// Deterministic 64-bit LCG, constants from Knuth's MMIX.
fn next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

#[test_case(1)]
#[test_case(42)]
#[test_case(987_654_321)]
fn random_operation_sequences_hold_weight_bounds(seed: u64) {
    let env = Env::default();
    let limits = WeightLimits {
        min: WEIGHT_PRECISION / 10,
        max: WEIGHT_PRECISION * 6 / 10,
    };
    let fixture = three_asset_basket(&env, 120, default_fees(), 0, limits);
    seed_equal(&env, &fixture, 100);

    let decimals = [6u32, 8, 18];
    let mut state = seed;
    for _ in 0..24 {
        let before = fixture.engine.query_composition();

        let op = next(&mut state) % 3;
        let index = (next(&mut state) % 3) as u32;
        let committed = match op {
            0 => {
                let amount = units(
                    1 + (next(&mut state) % 20) as i128,
                    decimals[index as usize],
                );
                fixture
                    .engine
                    .try_mint_single(&fixture.user, &index, &amount, &0)
                    .is_ok()
            }
            1 => {
                let output = (index + 1 + (next(&mut state) % 2) as u32) % 3;
                let amount = units(
                    1 + (next(&mut state) % 10) as i128,
                    decimals[index as usize],
                );
                fixture
                    .engine
                    .try_swap(&fixture.user, &index, &output, &amount, &0)
                    .is_ok()
            }
            _ => {
                let amount = units(1 + (next(&mut state) % 10) as i128, 18);
                fixture
                    .engine
                    .try_redeem_single(&fixture.user, &index, &amount, &0)
                    .is_ok()
            }
        };

        let after = fixture.engine.query_composition();
        if committed {
            // No committed operation may leave an active weight outside
            // its bounds.
            for entry in after.bassets.iter() {
                if entry.basset.status == BassetStatus::Normal {
                    assert!(
                        entry.weight >= limits.min && entry.weight <= limits.max,
                        "weight {} outside bounds after committed op",
                        entry.weight
                    );
                }
            }
        } else {
            // A rejected operation must leave the ledger untouched.
            assert_eq!(before, after);
        }
    }
}
