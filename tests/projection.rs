use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use studplan::{
    herd::{LSU_PER_HEIFER_Y1, MAX_HEAD_COUNT},
    project, try_project, BreakEven, Capacity, InputError, ProposalInput,
    Simulator,
};

fn random_input(rng: &mut ChaCha8Rng) -> ProposalInput {
    ProposalInput {
        total_farm_size_ha: rng.gen_range(0.0..10_000.0),
        conservation_percentage: rng.gen_range(0.0..100.0),
        lsu_per_hectare: rng.gen_range(0.0..0.5),
        foundation_cows: rng.gen_range(0..400) as f64,
        foundation_bulls: rng.gen_range(0..10) as f64,
        weaning_percentage: rng.gen_range(0.0..100.0),
        cow_replacement_rate: rng.gen_range(0.0..40.0),
        stud_bull_price: rng.gen_range(0.0..150_000.0),
        stud_heifer_price: rng.gen_range(0.0..80_000.0),
        weaner_price_per_kg: rng.gen_range(0.0..60.0),
        cull_cow_price: rng.gen_range(0.0..15_000.0),
        avg_weaning_weight_kg: rng.gen_range(150.0..300.0),
        monthly_labour_cost: rng.gen_range(0.0..60_000.0),
        infrastructure_budget: rng.gen_range(0.0..2_000_000.0),
        livestock_startup_cost: rng.gen_range(0.0..2_000_000.0),
        vet_cost_per_head: rng.gen_range(0.0..800.0),
        feed_cost_per_head: rng.gen_range(0.0..2_500.0),
    }
}

#[test]
fn reference_farm_capacity() {
    let input = ProposalInput {
        foundation_cows: 50.0,
        foundation_bulls: 3.0,
        weaning_percentage: 90.0,
        cow_replacement_rate: 15.0,
        total_farm_size_ha: 2000.0,
        conservation_percentage: 20.0,
        lsu_per_hectare: 0.17,
        ..ProposalInput::default()
    };
    let summary = project(&input);
    assert_eq!(summary.grazing_area_ha, 1600.0);
    assert_eq!(summary.conservation_area_ha, 400.0);
    assert!((summary.max_lsu - 272.0).abs() < 1e-9);
}

#[test]
fn reference_farm_projection() {
    let summary = project(&ProposalInput::default());
    let herd: Vec<u64> = summary.financials.iter().map(|y| y.herd_size).collect();
    assert_eq!(herd, vec![68, 81, 99, 120, 146, 178, 216, 263, 290, 265]);

    let net: Vec<f64> = summary.financials.iter().map(|y| y.net_cash_flow).collect();
    assert_eq!(
        net,
        vec![
            -1_425_840.0,
            -190_170.0,
            176_590.0,
            491_260.0,
            957_680.0,
            1_222_380.0,
            1_655_500.0,
            2_084_690.0,
            3_296_900.0,
            5_426_650.0,
        ]
    );
    assert_eq!(summary.break_even, BreakEven::Year(5));
    assert_eq!(summary.year10_profit, 5_426_650.0);
    assert_eq!(summary.total_income, 21_009_840.0);
    assert_eq!(summary.total_expenses, 7_314_200.0);
    assert_eq!(
        summary.financials[9].cumulative_cash_flow,
        summary.total_income - summary.total_expenses
    );
}

#[test]
fn empty_herd_only_pays_costs() {
    let input = ProposalInput {
        foundation_cows: 0.0,
        foundation_bulls: 0.0,
        ..ProposalInput::default()
    };
    let summary = project(&input);
    for year in &summary.financials {
        assert_eq!(year.income, 0.0);
        assert_eq!(year.herd_size, 0);
    }
    let labour = input.monthly_labour_cost * 12.0;
    assert_eq!(
        summary.financials[0].net_cash_flow,
        -(input.infrastructure_budget + input.livestock_startup_cost + labour)
    );
    assert_eq!(summary.financials[1].net_cash_flow, -labour);
    assert_eq!(summary.break_even, BreakEven::NotReached);
}

#[test]
fn costs_exceeding_income_never_break_even() {
    let input = ProposalInput {
        monthly_labour_cost: 1_000_000.0,
        ..ProposalInput::default()
    };
    let summary = project(&input);
    assert!(summary.financials.iter().all(|y| y.net_cash_flow < 0.0));
    assert_eq!(summary.break_even, BreakEven::NotReached);
    assert_eq!(summary.break_even.to_string(), "N/A");
}

#[test]
fn zero_capacity_retains_no_heifers() {
    let input = ProposalInput {
        lsu_per_hectare: 0.0,
        ..ProposalInput::default()
    };
    let capacity = Capacity::from_input(&input);
    assert_eq!(capacity.max_lsu, 0.0);

    let mut retained = Vec::new();
    Simulator::new(&input, capacity).run_with_hook(|_, detail| {
        retained.push((detail.flows.heifers_retained, detail.herd.heifers_y1));
    });
    assert_eq!(retained.len(), 10);
    assert!(retained.iter().all(|&(kept, y1)| kept == 0 && y1 == 0));
}

#[test]
fn stud_fraction_follows_schedule() {
    // A huge farm keeps headroom open, and a large cow herd keeps the
    // sellable pools big enough that flooring barely moves the ratio.
    let input = ProposalInput {
        total_farm_size_ha: 1_000_000.0,
        conservation_percentage: 0.0,
        lsu_per_hectare: 1.0,
        foundation_cows: 20_000.0,
        weaning_percentage: 100.0,
        cow_replacement_rate: 10.0,
        ..ProposalInput::default()
    };
    let capacity = Capacity::from_input(&input);
    let expected = [0.0, 0.0, 0.20, 0.30, 0.40, 0.40, 0.40, 0.40, 0.40, 0.40];
    let mut year = 0;
    Simulator::new(&input, capacity).run_with_hook(|_, detail| {
        let flows = detail.flows;
        let sellable = flows.male_calves;
        assert!(sellable > 1_000);
        let ratio = flows.stud_bulls_sold as f64 / sellable as f64;
        assert!(
            (ratio - expected[year]).abs() < 1e-3,
            "year {} ratio {ratio}",
            year + 1
        );
        year += 1;
    });
    assert_eq!(year, 10);
}

#[test]
fn heifer_sales_follow_schedule_without_capacity() {
    // With no grazing capacity every female calf is sellable.
    let input = ProposalInput {
        lsu_per_hectare: 0.0,
        foundation_cows: 20_000.0,
        weaning_percentage: 100.0,
        cow_replacement_rate: 10.0,
        ..ProposalInput::default()
    };
    let capacity = Capacity::from_input(&input);
    let expected = [0.0, 0.0, 0.20, 0.30, 0.40, 0.40, 0.40, 0.40, 0.40, 0.40];
    let mut year = 0;
    Simulator::new(&input, capacity).run_with_hook(|_, detail| {
        let flows = detail.flows;
        assert_eq!(flows.heifers_retained, 0);
        let sellable = flows.female_calves - flows.heifers_retained;
        assert!(sellable > 1_000);
        let ratio = flows.stud_heifers_sold as f64 / sellable as f64;
        assert!(
            (ratio - expected[year]).abs() < 1e-3,
            "year {} ratio {ratio}",
            year + 1
        );
        year += 1;
    });
    assert_eq!(year, 10);
}

#[test]
fn astronomical_herds_do_not_overflow() {
    let input = ProposalInput {
        foundation_cows: 1e20,
        cow_replacement_rate: 0.0,
        weaning_percentage: 0.0,
        ..ProposalInput::default()
    };
    let summary = try_project(&input).expect("finite input projects");
    assert_eq!(summary.financials.len(), 10);
    assert!(summary.financials.iter().all(|y| y.herd_size == MAX_HEAD_COUNT + 3));

    let summary = project(&ProposalInput {
        foundation_cows: 1e20,
        ..ProposalInput::default()
    });
    assert_eq!(summary.financials.len(), 10);
    assert!(summary.total_income.is_finite());
    assert!(summary.total_expenses.is_finite());
}

#[test]
fn retention_never_exceeds_headroom() {
    let input = ProposalInput {
        total_farm_size_ha: 500.0,
        ..ProposalInput::default()
    };
    let capacity = Capacity::from_input(&input);
    Simulator::new(&input, capacity).run_with_hook(|_, detail| {
        let herd = detail.herd;
        let occupied = herd.breeding_cows as f64 * 1.1
            + herd.bulls as f64 * 1.5
            + herd.heifers_y2 as f64 * 0.8;
        let space = (capacity.max_lsu - occupied).max(0.0);
        assert!(herd.heifers_y1 as f64 * LSU_PER_HEIFER_Y1 <= space + 1e-9);
    });
}

#[test]
fn randomized_inputs_hold_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_CA77);
    for _ in 0..200 {
        let input = random_input(&mut rng);
        let summary = project(&input);
        assert_eq!(summary.financials.len(), 10);

        let mut running = 0.0;
        for (index, year) in summary.financials.iter().enumerate() {
            assert_eq!(year.year as usize, index + 1);
            assert_eq!(year.net_cash_flow, year.income - year.expenses);
            running += year.net_cash_flow;
            assert_eq!(year.cumulative_cash_flow, running);
            assert!(year.income >= 0.0);
        }

        match summary.break_even {
            BreakEven::Year(y) => {
                let first = summary
                    .financials
                    .iter()
                    .find(|r| r.cumulative_cash_flow >= 0.0)
                    .map(|r| r.year);
                assert_eq!(Some(y), first);
            }
            BreakEven::NotReached => {
                assert!(summary.financials.iter().all(|r| r.cumulative_cash_flow < 0.0));
            }
        }

        // Same input, same output.
        assert_eq!(project(&input), summary);
    }
}

#[test]
fn out_of_range_percentages_degrade_gracefully() {
    let input = ProposalInput {
        conservation_percentage: 130.0,
        weaning_percentage: -20.0,
        cow_replacement_rate: 400.0,
        ..ProposalInput::default()
    };
    let summary = project(&input);
    assert!(summary.max_lsu < 0.0);
    assert_eq!(summary.financials.len(), 10);
    // Everything is culled in year one; the herd is just the bulls after that.
    assert_eq!(summary.financials[0].herd_size, 3);
    assert!(summary.financials[1..].iter().all(|y| y.herd_size == 3));
}

#[test]
fn non_finite_input_is_rejected_before_projection() {
    let input = ProposalInput {
        stud_bull_price: f64::NAN,
        ..ProposalInput::default()
    };
    match try_project(&input) {
        Err(InputError::NonFinite { field, .. }) => assert_eq!(field, "stud_bull_price"),
        Ok(_) => panic!("NaN input should be rejected"),
    }
    assert!(try_project(&ProposalInput::default()).is_ok());
}

#[test]
fn zeroed_input_is_all_zero() {
    let summary = project(&ProposalInput::zeroed());
    assert_eq!(summary.total_income, 0.0);
    assert_eq!(summary.total_expenses, 0.0);
    // Cumulative cash flow of zero counts as breaking even.
    assert_eq!(summary.break_even, BreakEven::Year(1));
}
