//! Liquidity Relayer Core Simulation.
//!
//! Demonstrates the full deferred-liquidity lifecycle including order
//! creation, oracle observation windows, tolerance-checked execution,
//! and the expiry withdrawal fallback.

use relayer_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const HOME: FactoryId = FactoryId(1);
const REFERENCE: FactoryId = FactoryId(2);
const TOKEN_A: TokenId = TokenId(2);
const TOKEN_B: TokenId = TokenId(3);

fn main() {
    println!("Liquidity Relayer Core Simulation");
    println!("Deferred Orders, TWAP Windows, Tolerance Gates\n");

    scenario_1_initial_provision();
    scenario_2_deferred_provision();
    scenario_3_reference_venue_pricing();
    scenario_4_deferred_removal();
    scenario_5_expiry_and_withdrawal();

    println!("\nAll simulations completed successfully.");
}

fn setup() -> (Relayer, AccountId) {
    let mut relayer = Relayer::new(RelayerConfig::default());
    let owner = relayer.owner();

    relayer.add_factory(HOME);
    relayer.add_factory(REFERENCE);
    relayer.create_pair(HOME, TOKEN_A, TOKEN_B);
    relayer.create_pair(REFERENCE, TOKEN_A, TOKEN_B);

    relayer.fund(owner, Asset::Token(TOKEN_A), dec!(1000));
    relayer.fund(owner, Asset::Token(TOKEN_B), dec!(4000));
    // the clock starts at wall time and only moves when the script says so
    relayer.set_time(Timestamp::now());

    (relayer, owner)
}

fn params(
    relayer: &Relayer,
    tolerance_bps: u32,
    min_a: Decimal,
    min_b: Decimal,
    factory: FactoryId,
    deadline_offset_secs: i64,
) -> OrderParams {
    OrderParams::new(
        TOKEN_A,
        TOKEN_B,
        Bps::new(tolerance_bps),
        min_a,
        min_b,
        600,
        Timestamp::from_secs(relayer.time().as_secs() + deadline_offset_secs),
        factory,
    )
}

/// Initial provision into an empty pool settles without an oracle.
fn scenario_1_initial_provision() {
    println!("Scenario 1: Initial Provision\n");

    let (mut relayer, owner) = setup();

    let p = params(&relayer, 0, dec!(0), dec!(0), HOME, 100_000);
    let creation = relayer
        .order_liquidity_provision(owner, p, dec!(1), dec!(4))
        .unwrap();

    println!("  Order {:?} created, executed immediately: {}", creation.order_id, creation.executed_immediately);

    let pair = relayer.get_pair(HOME, TOKEN_A, TOKEN_B).unwrap();
    println!("  Home pair reserves: ({}, {})", pair.reserve0, pair.reserve1);

    let shares = relayer.balance_of(
        Asset::PoolShares { factory: HOME, pair: pair.id },
        AccountId::ENGINE,
    );
    println!("  Pool shares in custody: {}\n", shares);
}

/// Provision deferred behind a two-sample observation window.
fn scenario_2_deferred_provision() {
    println!("Scenario 2: Deferred Provision\n");

    let (mut relayer, owner) = setup();
    seed_pool(&mut relayer, HOME, dec!(10), dec!(40));
    seed_pool(&mut relayer, REFERENCE, dec!(10), dec!(40));

    let p = params(&relayer, 100, dec!(1), dec!(1), HOME, 100_000);
    let creation = relayer
        .order_liquidity_provision(owner, p, dec!(1), dec!(4))
        .unwrap();
    println!("  Order {:?} created (pool at price 4, order priced 4/1)", creation.order_id);

    // too early: the sampling period has not elapsed
    relayer.advance_time(60);
    let err = relayer.update_oracle(creation.order_id).unwrap_err();
    println!("  Sample at +60s rejected: {}", err);

    relayer.advance_time(240);
    relayer.update_oracle(creation.order_id).unwrap();
    println!("  Second sample at +300s accepted");

    let result = relayer.execute_order(creation.order_id).unwrap();
    match result.proceeds {
        ExecutionProceeds::Provision { liquidity_minted } => {
            println!("  Executed: {} shares minted\n", liquidity_minted);
        }
        _ => unreachable!(),
    }
}

/// The TWAP venue and the liquidity venue are different factories.
fn scenario_3_reference_venue_pricing() {
    println!("Scenario 3: Reference Venue Pricing\n");

    let (mut relayer, owner) = setup();
    seed_pool(&mut relayer, HOME, dec!(10), dec!(40));
    // reference venue trades at a different price
    seed_pool(&mut relayer, REFERENCE, dec!(10), dec!(50));

    let p = params(&relayer, 200, dec!(1), dec!(1), REFERENCE, 100_000);
    let creation = relayer
        .order_liquidity_provision(owner, p, dec!(1), dec!(5))
        .unwrap();
    println!("  Order {:?} samples the reference venue (price 5)", creation.order_id);

    relayer.advance_time(300);
    relayer.update_oracle(creation.order_id).unwrap();

    let result = relayer.execute_order(creation.order_id).unwrap();
    println!("  Liquidity still lands on the home pair: {:?}", result.proceeds);

    let pair = relayer.get_pair(HOME, TOKEN_A, TOKEN_B).unwrap();
    println!("  Home pair reserves: ({}, {})\n", pair.reserve0, pair.reserve1);
}

/// Removal burns custodied shares once the oracle agrees with the pool.
fn scenario_4_deferred_removal() {
    println!("Scenario 4: Deferred Removal\n");

    let (mut relayer, owner) = setup();
    seed_pool(&mut relayer, REFERENCE, dec!(10), dec!(40));

    // provision first so the owner holds shares
    let p = params(&relayer, 0, dec!(0), dec!(0), HOME, 100_000);
    relayer
        .order_liquidity_provision(owner, p, dec!(2), dec!(8))
        .unwrap();
    let pair_id = relayer.get_pair(HOME, TOKEN_A, TOKEN_B).unwrap().id;
    let shares = Asset::PoolShares { factory: HOME, pair: pair_id };

    // shares sit in custody after immediate settlement; hand them to the owner
    let held = relayer.balance_of(shares, AccountId::ENGINE);
    relayer.fund(owner, shares, held);
    println!("  Owner holds {} pool shares", held);

    let p = params(&relayer, 100, dec!(0.5), dec!(2), HOME, 100_000);
    let creation = relayer
        .order_liquidity_removal(owner, p, dec!(1), dec!(0.9), dec!(3.6))
        .unwrap();

    relayer.advance_time(300);
    relayer.update_oracle(creation.order_id).unwrap();

    let result = relayer.execute_order(creation.order_id).unwrap();
    match result.proceeds {
        ExecutionProceeds::Removal { amount_a, amount_b } => {
            println!("  Burned 1 share for ({}, {})\n", amount_a, amount_b);
        }
        _ => unreachable!(),
    }
}

/// Price drift keeps an order out of tolerance until its deadline passes.
fn scenario_5_expiry_and_withdrawal() {
    println!("Scenario 5: Expiry and Withdrawal\n");

    let (mut relayer, owner) = setup();
    seed_pool(&mut relayer, HOME, dec!(10), dec!(40));
    seed_pool(&mut relayer, REFERENCE, dec!(10), dec!(40));

    let p = params(&relayer, 0, dec!(1), dec!(1), HOME, 600);
    let creation = relayer
        .order_liquidity_provision(owner, p, dec!(1), dec!(4.2))
        .unwrap();
    println!("  Order {:?} priced 4.2 against a pool at 4, tolerance 0", creation.order_id);

    relayer.advance_time(300);
    relayer.update_oracle(creation.order_id).unwrap();

    let err = relayer.execute_order(creation.order_id).unwrap_err();
    println!("  Execution rejected: {}", err);

    let deadline = relayer.get_order(creation.order_id).unwrap().deadline;
    relayer.set_time(Timestamp::from_secs(deadline.as_secs() + 1));
    let err = relayer.execute_order(creation.order_id).unwrap_err();
    println!("  Past deadline: {}", err);

    let a_before = relayer.balance_of(Asset::Token(TOKEN_A), owner);
    relayer.withdraw_expired_order(creation.order_id).unwrap();
    let a_after = relayer.balance_of(Asset::Token(TOKEN_A), owner);

    println!("  Withdrawn: owner recovered {} of token A", a_after - a_before);
    println!("  Order status: {:?}", relayer.get_order(creation.order_id).unwrap().status);
    println!("  Events generated: {}", relayer.events().len());
}

// seed a venue's pool directly, standing in for third-party liquidity
fn seed_pool(relayer: &mut Relayer, factory: FactoryId, amount0: Decimal, amount1: Decimal) {
    let now = relayer.time();
    relayer
        .get_pair_mut(factory, TOKEN_A, TOKEN_B)
        .unwrap()
        .mint(amount0, amount1, now)
        .unwrap();
}
