//! Token lifecycle tests
//!
//! Covers:
//! 1. Deployment validation and initial allocation
//! 2. Role management and delayed admin transfer
//! 3. Accrual queries against the live watermark
//! 4. Sequential minting across year boundaries and the plateau
//! 5. Burning by transfer to the token address
//! 6. Mint beneficiary changes

use std::sync::Arc;

use z_issuance::constants::*;
use z_token::*;

const DEPLOY: u64 = 1_722_542_400;
const Y: u64 = YEAR_SECONDS;
const ADMIN_DELAY: u64 = 259_200;
const INITIAL_SUPPLY: u128 = 369_000_000;

fn admin() -> Address {
    Address::repeat_byte(0x0a)
}

fn beneficiary() -> Address {
    Address::repeat_byte(0x0b)
}

fn random_acc() -> Address {
    Address::repeat_byte(0x0c)
}

fn params() -> TokenParams {
    TokenParams {
        name: "Z".to_string(),
        symbol: "Z".to_string(),
        admin: admin(),
        admin_delay: ADMIN_DELAY,
        minter: admin(),
        mint_beneficiary: beneficiary(),
        initial_supply: INITIAL_SUPPLY,
        inflation_rates: DEFAULT_INFLATION_RATES.to_vec(),
        final_inflation_rate: DEFAULT_FINAL_INFLATION_RATE,
    }
}

fn deploy_with(params: TokenParams) -> (ZToken, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(DEPLOY));
    let token = ZToken::new(params, clock.clone()).expect("deploy failed");
    (token, clock)
}

fn deploy() -> (ZToken, Arc<ManualClock>) {
    deploy_with(params())
}

fn tokens_for_year(year: u64) -> u128 {
    let rate = DEFAULT_INFLATION_RATES
        .get(year as usize)
        .copied()
        .unwrap_or(DEFAULT_FINAL_INFLATION_RATE);
    INITIAL_SUPPLY * TOKEN_UNIT * rate as u128 / BASIS_POINTS
}

fn tokens_per_period(year: u64, seconds: u64) -> u128 {
    seconds as u128 * tokens_for_year(year) / Y as u128
}

/// Mint at `at` and return what the beneficiary received
fn mint_at(token: &ZToken, clock: &ManualClock, at: u64) -> u128 {
    clock.set(at);
    let holder = token.mint_beneficiary();
    let before = token.balance_of(&holder);
    token.mint(&admin()).expect("mint failed");
    token.balance_of(&holder) - before
}

// ---- deployment -----------------------------------------------------------

#[test]
fn test_initial_supply_goes_to_beneficiary() {
    let (token, _) = deploy();

    assert_eq!(
        token.balance_of(&beneficiary()),
        INITIAL_SUPPLY * TOKEN_UNIT
    );
    assert_eq!(token.transfer_events().len(), 1);
}

#[test]
fn test_deploy_rejects_zero_supply() {
    let clock = Arc::new(ManualClock::new(DEPLOY));
    let result = ZToken::new(
        TokenParams {
            initial_supply: 0,
            ..params()
        },
        clock,
    );

    assert_eq!(
        result.unwrap_err(),
        TokenError::Issuance(IssuanceError::ZeroInitialSupply)
    );
}

#[test]
fn test_deploy_rejects_bad_inflation_arrays() {
    for rates in [vec![], (1..=12).collect::<Vec<u16>>()] {
        let clock = Arc::new(ManualClock::new(DEPLOY));
        let result = ZToken::new(
            TokenParams {
                inflation_rates: rates.clone(),
                ..params()
            },
            clock,
        );

        assert_eq!(
            result.unwrap_err(),
            TokenError::Issuance(IssuanceError::InvalidInflationArray(rates))
        );
    }
}

#[test]
fn test_deploy_rejects_zero_addresses() {
    let cases = [
        (
            TokenParams {
                admin: Address::ZERO,
                ..params()
            },
            TokenError::InvalidDefaultAdmin(Address::ZERO),
        ),
        (
            TokenParams {
                minter: Address::ZERO,
                ..params()
            },
            TokenError::ZeroAddressPassed,
        ),
        (
            TokenParams {
                mint_beneficiary: Address::ZERO,
                ..params()
            },
            TokenError::ZeroAddressPassed,
        ),
    ];

    for (params, expected) in cases {
        let clock = Arc::new(ManualClock::new(DEPLOY));
        assert_eq!(ZToken::new(params, clock).unwrap_err(), expected);
    }
}

#[test]
fn test_schedule_of_any_length() {
    let rates: Vec<u16> = (0..=20).collect();
    let (token, _) = deploy_with(TokenParams {
        inflation_rates: rates.clone(),
        ..params()
    });

    assert_eq!(
        token.current_inflation_rate(rates.len() as u64 + 2),
        DEFAULT_FINAL_INFLATION_RATE
    );
    assert_eq!(token.annual_inflation_rates()[3], rates[3]);
}

#[test]
fn test_roles_on_deployment() {
    let (token, _) = deploy();

    assert!(token.has_role(&Role::minter(), &admin()));
    assert!(token.has_role(&Role::DEFAULT_ADMIN, &admin()));

    for account in [beneficiary(), random_acc()] {
        assert!(!token.has_role(&Role::minter(), &account));
        assert!(!token.has_role(&Role::DEFAULT_ADMIN, &account));
    }
}

// ---- access control -------------------------------------------------------

#[test]
fn test_mint_requires_minter_role() {
    let (token, clock) = deploy();
    clock.advance(100);

    assert_eq!(
        token.mint(&beneficiary()).unwrap_err(),
        TokenError::Unauthorized {
            account: beneficiary(),
            role: Role::minter(),
        }
    );
    assert_eq!(token.last_mint_time(), DEPLOY);
}

#[test]
fn test_reassign_minter_role() {
    let (token, _) = deploy();
    let minter = Role::minter();

    token.grant_role(&admin(), minter, beneficiary()).unwrap();
    assert!(token.has_role(&minter, &admin()));
    assert!(token.has_role(&minter, &beneficiary()));

    token.revoke_role(&admin(), minter, &admin()).unwrap();
    assert!(!token.has_role(&minter, &admin()));

    token.grant_role(&admin(), minter, admin()).unwrap();
    assert!(token.has_role(&minter, &admin()));
}

#[test]
fn test_default_admin_transfer_round_trip() {
    let (token, clock) = deploy();

    let pending = token
        .begin_default_admin_transfer(&admin(), beneficiary())
        .unwrap();
    assert_eq!(pending.value, beneficiary());
    assert_eq!(pending.schedule, clock.now() + ADMIN_DELAY);

    clock.advance(ADMIN_DELAY + 1);
    token.accept_default_admin_transfer(&beneficiary()).unwrap();

    assert!(!token.has_role(&Role::DEFAULT_ADMIN, &admin()));
    assert_eq!(token.default_admin(), Some(beneficiary()));

    // And back again
    token
        .begin_default_admin_transfer(&beneficiary(), admin())
        .unwrap();
    clock.advance(ADMIN_DELAY + 1);
    token.accept_default_admin_transfer(&admin()).unwrap();

    assert_eq!(token.default_admin(), Some(admin()));
}

#[test]
fn test_change_admin_delay_then_transfer() {
    let (token, clock) = deploy();
    let new_delay = 71_231;

    token.change_default_admin_delay(&admin(), new_delay).unwrap();
    assert_eq!(token.default_admin_delay(), ADMIN_DELAY);

    clock.advance(ADMIN_DELAY - new_delay + 1);
    assert_eq!(token.default_admin_delay(), new_delay);

    token
        .begin_default_admin_transfer(&admin(), random_acc())
        .unwrap();
    clock.advance(new_delay + 1);
    token.accept_default_admin_transfer(&random_acc()).unwrap();

    assert_eq!(token.default_admin(), Some(random_acc()));
}

#[test]
fn test_cancel_admin_transfer() {
    let (token, clock) = deploy();

    token
        .begin_default_admin_transfer(&admin(), beneficiary())
        .unwrap();
    clock.advance(ADMIN_DELAY / 2);
    token.cancel_default_admin_transfer(&admin()).unwrap();

    assert_eq!(token.pending_default_admin(), None);
}

// ---- accrual queries ------------------------------------------------------

#[test]
fn test_calculate_before_watermark_fails() {
    let (token, clock) = deploy();
    mint_at(&token, &clock, DEPLOY + 1_000);
    let last_mint_time = token.last_mint_time();

    assert_eq!(
        token.calculate_mintable_tokens(last_mint_time - 1),
        Err(TokenError::Issuance(IssuanceError::InvalidTime {
            lower_bound: last_mint_time,
            actual: last_mint_time - 1,
        }))
    );
    assert!(token.calculate_mintable_tokens(last_mint_time).is_err());
}

#[test]
fn test_year_since_deploy_queries() {
    let (token, _) = deploy();

    assert_eq!(token.year_since_deploy(DEPLOY + Y * 2 + 3).unwrap(), 3);
    assert_eq!(token.year_since_deploy(DEPLOY + Y * 17 + 18_231).unwrap(), 18);
    assert_eq!(token.year_since_deploy(DEPLOY + 1).unwrap(), 1);
    assert_eq!(
        token.year_since_deploy(DEPLOY - 1),
        Err(TokenError::Issuance(IssuanceError::InvalidTime {
            lower_bound: DEPLOY,
            actual: DEPLOY - 1,
        }))
    );
}

#[test]
fn test_tokens_per_year_queries() {
    let (token, _) = deploy();
    let final_amount: u128 = 5_535_000_000_000_000_000_000_000;

    assert_eq!(token.tokens_per_year(3), token.base_supply() / 10_000 * 650);
    assert_eq!(
        token.tokens_per_year(DEFAULT_INFLATION_RATES.len() as u64 + 1),
        final_amount
    );
    assert_eq!(token.tokens_per_year(100), final_amount);
    assert_eq!(token.current_inflation_rate(7), DEFAULT_INFLATION_RATES[7]);
    assert_eq!(token.current_inflation_rate(100), DEFAULT_FINAL_INFLATION_RATE);
}

#[test]
fn test_queries_do_not_move_watermark() {
    let (token, _) = deploy();
    let at = DEPLOY + 5 * Y + 17;

    let first = token.calculate_mintable_tokens(at).unwrap();
    let second = token.calculate_mintable_tokens(at).unwrap();

    assert_eq!(first, second);
    assert_eq!(token.last_mint_time(), DEPLOY);
}

#[test]
fn test_breakdown_from_watermark() {
    let (token, clock) = deploy();
    mint_at(&token, &clock, DEPLOY + Y - 100);
    let at = DEPLOY + 3 * Y + 50;

    let breakdown = token.mintable_breakdown(at).unwrap();

    assert_eq!(breakdown.start_year, 1);
    assert_eq!(breakdown.end_year, 4);
    assert_eq!(breakdown.remainder, tokens_per_period(1, 100));
    assert_eq!(breakdown.full_years, tokens_for_year(2) + tokens_for_year(3));
    assert_eq!(breakdown.partial, tokens_per_period(4, 50));
    assert_eq!(
        breakdown.total().unwrap(),
        token.calculate_mintable_tokens(at).unwrap()
    );
}

// ---- minting --------------------------------------------------------------

#[test]
fn test_minting_scenarios_one_after_another() {
    let (token, clock) = deploy();
    let initial_total_supply = token.total_supply();

    // [1st year] middle of the first year
    let first = mint_at(&token, &clock, DEPLOY + Y / 2);
    assert_eq!(first, tokens_for_year(1) / 2);
    assert_eq!(token.last_mint_time(), DEPLOY + Y / 2);
    assert_eq!(token.total_supply(), initial_total_supply + first);

    // [3rd year] 2 years + 260826 sec after deploy
    let year3_period = 260_826;
    let second = mint_at(&token, &clock, DEPLOY + 2 * Y + year3_period);
    assert_eq!(
        second,
        tokens_for_year(1) * (Y / 2) as u128 / Y as u128
            + tokens_for_year(2)
            + tokens_for_year(3) * year3_period as u128 / Y as u128
    );
    assert_eq!(token.total_supply(), initial_total_supply + first + second);

    // [3rd + 4th year] close out year 3, then three mints in year 4
    let closeout = mint_at(&token, &clock, DEPLOY + 3 * Y);
    assert_eq!(closeout, tokens_per_period(3, Y - year3_period));

    let mut year4_elapsed = 0;
    for period in [100_000u64, 31_215, 9_776_132] {
        year4_elapsed += period;
        let minted = mint_at(&token, &clock, DEPLOY + 3 * Y + year4_elapsed);
        assert_eq!(minted, tokens_per_period(4, period), "period {}", period);
    }

    // [12th year] where the inflation plateaus
    let year12_period = 8_919_854;
    let minted = mint_at(&token, &clock, DEPLOY + 11 * Y + year12_period);
    let mut expected = tokens_per_period(4, Y - year4_elapsed);
    for year in 5..12 {
        expected += tokens_for_year(year);
    }
    expected += tokens_per_period(12, year12_period);
    assert_eq!(minted, expected);

    // [33rd year] during the plateau
    let year33_period = 31_545;
    let minted = mint_at(&token, &clock, DEPLOY + 32 * Y + year33_period);
    let expected = tokens_per_period(33, Y - year12_period)
        + tokens_for_year(13) * 20
        + tokens_per_period(33, year33_period);
    assert_eq!(minted, expected);
}

#[test]
fn test_minting_every_second() {
    let (token, clock) = deploy();

    for second in 1..13 {
        let minted = mint_at(&token, &clock, DEPLOY + second);
        assert_eq!(minted, tokens_per_period(1, 1), "second {}", second);
    }
}

#[test]
fn test_minting_once_per_year() {
    let (token, clock) = deploy();

    for year in 1..10u64 {
        let minted = mint_at(&token, &clock, DEPLOY + year * Y);
        assert_eq!(minted, tokens_for_year(year), "year {}", year);
    }
}

#[test]
fn test_burn_does_not_change_issuance() {
    let (token, clock) = deploy();

    let first = mint_at(&token, &clock, DEPLOY + Y / 2);
    assert_eq!(first, tokens_per_period(1, Y / 2));
    let supply_after_mint = token.total_supply();

    // Burn a third of it by sending it to the token itself
    let burned = first / 3;
    token
        .transfer(&beneficiary(), token.address(), burned)
        .unwrap();
    assert_eq!(token.total_supply(), supply_after_mint - burned);
    assert_eq!(token.base_supply(), INITIAL_SUPPLY * TOKEN_UNIT);

    let period = 31_545;
    let second = mint_at(&token, &clock, DEPLOY + Y / 2 + period);
    assert_eq!(second, tokens_per_period(1, period));
}

// ---- burn on transfer -----------------------------------------------------

#[test]
fn test_transfer_to_token_address_burns_with_two_events() {
    let (token, _) = deploy();
    let amount = 13_546_846_845u128;
    let balance_before = token.balance_of(&beneficiary());
    let supply_before = token.total_supply();

    token
        .transfer(&beneficiary(), token.address(), amount)
        .unwrap();

    assert_eq!(balance_before - token.balance_of(&beneficiary()), amount);
    assert_eq!(supply_before - token.total_supply(), amount);

    let events = token.transfer_events();
    let tail = &events[events.len() - 2..];
    assert_eq!(
        tail,
        &[
            TransferEvent {
                from: beneficiary(),
                to: token.address(),
                value: amount,
            },
            TransferEvent {
                from: beneficiary(),
                to: Address::ZERO,
                value: amount,
            },
        ]
    );

    assert_eq!(
        token.transfer(&beneficiary(), Address::ZERO, amount),
        Err(TokenError::InvalidReceiver(Address::ZERO))
    );
}

#[test]
fn test_regular_transfer_does_not_burn() {
    let (token, _) = deploy();
    let amount = 13_546_846_845u128;
    let supply_before = token.total_supply();

    token.transfer(&beneficiary(), random_acc(), amount).unwrap();

    assert_eq!(token.balance_of(&random_acc()), amount);
    assert_eq!(token.total_supply(), supply_before);
}

// ---- beneficiary ----------------------------------------------------------

#[test]
fn test_set_mint_beneficiary() {
    let (token, clock) = deploy();

    token.set_mint_beneficiary(&admin(), random_acc()).unwrap();
    assert_eq!(token.mint_beneficiary(), random_acc());

    let minted = mint_at(&token, &clock, DEPLOY + 1_000);
    assert_eq!(token.balance_of(&random_acc()), minted);
}

#[test]
fn test_set_mint_beneficiary_rejections() {
    let (token, _) = deploy();

    assert_eq!(
        token.set_mint_beneficiary(&random_acc(), random_acc()),
        Err(TokenError::Unauthorized {
            account: random_acc(),
            role: Role::DEFAULT_ADMIN,
        })
    );
    assert_eq!(
        token.set_mint_beneficiary(&admin(), Address::ZERO),
        Err(TokenError::ZeroAddressPassed)
    );
    assert_eq!(token.mint_beneficiary(), beneficiary());
}

#[test]
fn test_oversized_rate_fails_without_minting() {
    let (token, clock) = deploy_with(TokenParams {
        initial_supply: 10_000_000_000_000,
        inflation_rates: vec![0, u16::MAX],
        final_inflation_rate: u16::MAX,
        ..params()
    });
    let supply_before = token.total_supply();
    clock.set(DEPLOY + Y / 2);

    assert_eq!(
        token.calculate_mintable_tokens(DEPLOY + Y / 2),
        Err(TokenError::Issuance(IssuanceError::ArithmeticOverflow))
    );
    assert_eq!(
        token.mint(&admin()),
        Err(TokenError::Issuance(IssuanceError::ArithmeticOverflow))
    );
    assert_eq!(token.total_supply(), supply_before);
    assert_eq!(token.last_mint_time(), DEPLOY);
}

#[test]
fn test_event_history_stays_bounded() {
    let (token, clock) = deploy();
    let mints = DEFAULT_EVENT_CAPACITY as u64 + 500;
    for i in 1..=mints {
        mint_at(&token, &clock, DEPLOY + i);
    }

    let events = token.transfer_events();
    assert_eq!(events.len(), DEFAULT_EVENT_CAPACITY);
    assert_eq!(token.supply_stats().events_recorded, mints + 1);

    let taken = token.take_transfer_events();
    assert_eq!(taken, events);
    assert!(token.transfer_events().is_empty());
}

// ---- concurrency ----------------------------------------------------------

#[test]
fn test_concurrent_mints_credit_once() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (token, clock) = deploy();
    let token = Arc::new(token);
    clock.set(DEPLOY + Y);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let token = Arc::clone(&token);
            std::thread::spawn(move || token.mint(&admin()).unwrap().amount)
        })
        .collect();
    let total: u128 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // One thread wins the whole year, the rest see an up-to-date watermark
    assert_eq!(total, tokens_for_year(1));
    assert_eq!(token.last_mint_time(), DEPLOY + Y);
}
