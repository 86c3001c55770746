//! Property-based tests over randomized instances.
//!
//! Solver outputs are replayed through the certificate checker, so every
//! property holds against the same judge an external caller would use.
//!
//! # Invariants tested
//!
//! - **Feasibility:** Tours from the label DP and both search drivers are
//!   elementary, on time, and depot-free.
//! - **Cost agreement:** The cost a solver reports matches the checker's
//!   independent replay.
//! - **Engine ordering:** Best-first search over all intervals never loses
//!   to the single-interval DP.
//! - **Pricing soundness:** Returned columns price strictly below zero
//!   against the duals that produced them.
//! - **Format stability:** Instances survive a JSON round trip unchanged.

use proptest::prelude::*;

use espptw::evaluation::check_tour;
use espptw::io::{instance_from_str, instance_to_string};
use espptw::labeling;
use espptw::models::{Instance, VisitInterval};
use espptw::pricing::{PricingEngine, PricingSolver};
use espptw::search::{best_first_search, greedy, BestFirstConfig, TourBranching};

type ClientSpec = (i64, i64, i64, i64, i64, i64, bool, u8);

fn build_instance(clients: Vec<ClientSpec>) -> Instance {
    let mut instance = Instance::new();
    let depot = VisitInterval::new(0, 0).expect("depot interval");
    instance
        .add_location(vec![depot], 0.0, 0.0, 0.0)
        .expect("depot");
    for (x, y, start, width, gap, width2, two_slots, reward) in clients {
        let first = VisitInterval::new(start, start + width).expect("first interval");
        let mut intervals = vec![first];
        if two_slots {
            let second_start = start + width + gap;
            let second = VisitInterval::new(second_start, second_start + width2)
                .expect("second interval");
            intervals.push(second);
        }
        instance
            .add_location(intervals, x as f64, y as f64, reward as f64)
            .expect("client");
    }
    instance
}

fn instance_strategy() -> impl Strategy<Value = Instance> {
    prop::collection::vec(
        (
            0i64..=100,
            0i64..=100,
            0i64..=1000,
            0i64..=100,
            1i64..=200,
            0i64..=100,
            any::<bool>(),
            0u8..=100,
        ),
        1..=6,
    )
    .prop_map(build_instance)
}

fn instance_with_duals() -> impl Strategy<Value = (Instance, Vec<f64>)> {
    instance_strategy().prop_flat_map(|instance| {
        let n = instance.len();
        let duals = prop::collection::vec(0.0f64..=100.0, n);
        (Just(instance), duals)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn labeling_tour_passes_the_checker(instance in instance_strategy()) {
        let tour = labeling::solve(&instance);
        let check = check_tour(&instance, tour.locations());
        prop_assert!(check.feasible, "infeasible tour {:?}: {:?}", tour.locations(), check);
        prop_assert!(
            (check.cost - tour.cost()).abs() < 1e-9,
            "replayed cost {} disagrees with reported cost {}",
            check.cost,
            tour.cost()
        );
    }

    #[test]
    fn greedy_dive_yields_a_feasible_tour(instance in instance_strategy()) {
        let mut scheme = TourBranching::new(&instance);
        let result = greedy(&mut scheme);
        let node = result.best.expect("a dive always reaches the depot");
        let tour = scheme.to_tour(node);
        let check = check_tour(&instance, tour.locations());
        prop_assert!(check.feasible, "infeasible tour {:?}: {:?}", tour.locations(), check);
        prop_assert!((check.cost - tour.cost()).abs() < 1e-9);
    }

    #[test]
    fn best_first_never_loses_to_labeling(instance in instance_strategy()) {
        let dp = labeling::solve(&instance);
        let mut scheme = TourBranching::new(&instance);
        let result = best_first_search(&mut scheme, &BestFirstConfig::default());
        prop_assert!(result.completed);
        let node = result.best.expect("the empty tour is always reachable");
        let tour = scheme.to_tour(node);
        let check = check_tour(&instance, tour.locations());
        prop_assert!(check.feasible, "infeasible tour {:?}: {:?}", tour.locations(), check);
        prop_assert!((check.cost - tour.cost()).abs() < 1e-9);
        prop_assert!(
            tour.cost() <= dp.cost() + 1e-9,
            "best-first cost {} exceeds labeling cost {}",
            tour.cost(),
            dp.cost()
        );
    }

    #[test]
    fn priced_columns_price_below_zero((instance, duals) in instance_with_duals()) {
        let solver = PricingSolver::new(&instance, PricingEngine::Labeling);
        let columns = solver.solve_pricing(&duals).expect("well-formed duals");
        prop_assert!(columns.len() <= 1);
        for column in &columns {
            let check = check_tour(&instance, column.tour().locations());
            prop_assert!(check.feasible, "infeasible column tour: {:?}", check);
            let dual_sum: f64 = column.row_indices().iter().map(|&row| duals[row]).sum();
            prop_assert!(
                column.objective() - dual_sum < 0.0,
                "column objective {} does not price below duals {}",
                column.objective(),
                dual_sum
            );
        }
    }

    #[test]
    fn instance_survives_a_json_round_trip(instance in instance_strategy()) {
        let encoded = instance_to_string(&instance).expect("encode");
        let decoded = instance_from_str(&encoded).expect("decode");
        prop_assert_eq!(decoded.len(), instance.len());
        for (a, b) in decoded.locations().iter().zip(instance.locations()) {
            prop_assert_eq!(a.x(), b.x());
            prop_assert_eq!(a.y(), b.y());
            prop_assert_eq!(a.reward(), b.reward());
            prop_assert_eq!(a.intervals(), b.intervals());
        }
        let before = labeling::solve(&instance);
        let after = labeling::solve(&decoded);
        prop_assert_eq!(before.locations(), after.locations());
        prop_assert_eq!(before.cost(), after.cost());
    }
}
