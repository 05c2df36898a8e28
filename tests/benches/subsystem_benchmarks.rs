//! # Steel-Chain Subsystem Benchmarks
//!
//! Hot paths of the request cycle:
//!
//! | Subsystem | Path | Target |
//! |-----------|------|--------|
//! | sc-02 OTP Auth | Token verify on every authenticated request | < 50µs |
//! | sc-02 OTP Auth | Rate-limit admission + code check | < 10µs |
//! | sc-03 Stock Ledger | Dispatch → receive → sale posting | < 50µs per sale |
//! | sc-03 Stock Ledger | Integrity replay | linear in entries |
//! | sc-04 Rewards | Claim arithmetic | < 1µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sc_02_otp_auth::{admit, apply_attempt, generate_code, OtpConfig, OtpRecord, TokenConfig, TokenSigner};
use sc_03_stock_ledger::{
    AccountKey, DispatchRequest, EntryCause, Ledger, Party, Posting, SaleRequest, StockBook,
};
use sc_04_rewards::{RewardCalc, RewardConfig};
use shared_types::{
    DispatchId, PhoneKey, PhoneNumber, ProductId, Quantity, Role, UserId, UserStatus, DAY_MS,
    DAY_NUMBER_EPOCH_MS, MINUTE_MS,
};
use std::time::Duration;

const NOW: u64 = DAY_NUMBER_EPOCH_MS + 10 * DAY_MS;

// ============================================================================
// SC-02: Session tokens and OTP checks
// ============================================================================

fn bench_session_tokens(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-02-tokens");
    let signer = TokenSigner::new(&TokenConfig {
        secret: "bench-secret".into(),
        ttl_secs: 7 * 24 * 3600,
    });
    let user = UserId::new();
    let token = signer.issue(user, NOW).unwrap().token;

    group.bench_function("issue", |b| {
        b.iter(|| black_box(signer.issue(black_box(user), NOW).unwrap()))
    });
    group.bench_function("verify", |b| {
        b.iter(|| black_box(signer.decode(black_box(&token), NOW, true).unwrap()))
    });
    group.finish();
}

fn bench_otp_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-02-otp");
    let config = OtpConfig::default();
    let key = PhoneKey::new("91", &PhoneNumber::parse("9876543210").unwrap());
    let first = admit(&key, None, NOW, &config).unwrap();

    group.bench_function("admit_after_cooldown", |b| {
        b.iter(|| black_box(admit(&key, Some(&first), NOW + MINUTE_MS, &config)))
    });
    group.bench_function("generate_code", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| black_box(generate_code(&mut rng)))
    });
    group.bench_function("verify_code", |b| {
        b.iter(|| {
            let mut record = OtpRecord::new(key.clone(), "482913".into(), NOW, config.code_ttl_ms());
            black_box(apply_attempt(&mut record, black_box("482913"), NOW + 1_000, 5))
        })
    });
    group.finish();
}

// ============================================================================
// SC-03: Stock ledger
// ============================================================================

struct Parties {
    aso: Party,
    dealer: Party,
    barbender: Party,
}

fn party(role: Role) -> Party {
    Party {
        id: UserId::new(),
        name: format!("{role}"),
        role,
        status: UserStatus::Active,
        assigned_aso: None,
        owner_dealer: None,
    }
}

fn parties() -> Parties {
    let aso = party(Role::Aso);
    let mut dealer = party(Role::Dealer);
    dealer.assigned_aso = Some(aso.id);
    let mut barbender = party(Role::Barbender);
    barbender.owner_dealer = Some(dealer.id);
    Parties {
        aso,
        dealer,
        barbender,
    }
}

/// A book with one product and `kg` already received by the dealer.
fn stocked_book(p: &Parties, kg: u64) -> (StockBook, ProductId) {
    let mut book = StockBook::new();
    let seeded = book.catalog_mut().seed_samples(p.aso.id, NOW).unwrap();
    let product = seeded.created[0].id;
    let dispatch = book
        .dispatch(
            &p.aso,
            &p.dealer,
            DispatchRequest {
                dealer_id: p.dealer.id,
                product_id: product,
                quantity: Quantity::from_kg(kg),
                notes: None,
            },
            NOW,
        )
        .unwrap();
    book.receive(&p.dealer, dispatch.id, NOW).unwrap();
    (book, product)
}

fn bench_stock_movements(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-03-stock-ledger");
    group.measurement_time(Duration::from_secs(5));
    let p = parties();

    group.bench_function("dispatch_and_receive", |b| {
        let (mut book, product) = stocked_book(&p, 1);
        b.iter(|| {
            let dispatch = book
                .dispatch(
                    &p.aso,
                    &p.dealer,
                    DispatchRequest {
                        dealer_id: p.dealer.id,
                        product_id: product,
                        quantity: Quantity::from_kg(10),
                        notes: None,
                    },
                    NOW,
                )
                .unwrap();
            black_box(book.receive(&p.dealer, dispatch.id, NOW).unwrap())
        })
    });

    group.bench_function("sale", |b| {
        let (mut book, product) = stocked_book(&p, u64::MAX / 2_000_000);
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let request = SaleRequest {
                barbender_id: p.barbender.id,
                product_id: product,
                quantity: Quantity::from_kg(rng.gen_range(1..50)),
                notes: None,
            };
            black_box(book.sell(&p.dealer, &p.barbender, request, NOW).unwrap())
        })
    });

    group.finish();
}

fn bench_integrity_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-03-integrity");
    let users: Vec<UserId> = (0..50).map(|_| UserId::new()).collect();

    for entries in [1_000usize, 10_000, 50_000] {
        let mut ledger = Ledger::new();
        let mut rng = rand::thread_rng();
        for i in 0..entries {
            let user = users[i % users.len()];
            let qty = Quantity::from_kg(rng.gen_range(1..100));
            ledger
                .post(
                    &[Posting::credit(AccountKey::available(user), qty)],
                    EntryCause::Receipt {
                        dispatch: DispatchId::new(),
                    },
                    NOW,
                )
                .unwrap();
        }

        group.throughput(Throughput::Elements(entries as u64));
        group.bench_with_input(BenchmarkId::new("verify", entries), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.verify()))
        });
    }
    group.finish();
}

// ============================================================================
// SC-04: Reward arithmetic
// ============================================================================

fn bench_reward_calc(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-04-rewards");
    let config = RewardConfig::default();

    for total_kg in [250u64, 10_000, 1_000_000] {
        let total = Quantity::from_kg(total_kg);
        let claimed = Quantity::from_kg(total_kg / 2);
        group.bench_with_input(BenchmarkId::new("compute", total_kg), &total, |b, total| {
            b.iter(|| black_box(RewardCalc::compute(*total, claimed, &config)))
        });
    }
    group.finish();
}

criterion_group!(auth, bench_session_tokens, bench_otp_checks);
criterion_group!(ledger, bench_stock_movements, bench_integrity_replay);
criterion_group!(rewards, bench_reward_calc);
criterion_main!(auth, ledger, rewards);
