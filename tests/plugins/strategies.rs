use nfd_strategy_choice::core::name::Name;
use nfd_strategy_choice::core::strategy::NextHop;
use nfd_strategy_choice::plugins::{best_route, broadcast};
use nfd_strategy_choice::subsystems::STRATEGIES;

fn hops(costs: &[(u64, u64)]) -> Vec<NextHop> {
    costs
        .iter()
        .map(|&(face, cost)| NextHop { face, cost })
        .collect()
}

#[test]
fn test_best_route_picks_cheapest() {
    let strategy = best_route::create(best_route::STRATEGY_NAME.parse().unwrap());
    assert_eq!(strategy.select_nexthops(&hops(&[(1, 30), (2, 10), (3, 20)])), vec![2]);
    // Ties go to the first listed.
    assert_eq!(strategy.select_nexthops(&hops(&[(4, 5), (5, 5)])), vec![4]);
    assert!(strategy.select_nexthops(&[]).is_empty());
}

#[test]
fn test_broadcast_picks_every_face() {
    let strategy = broadcast::create(broadcast::STRATEGY_NAME.parse().unwrap());
    assert_eq!(
        strategy.select_nexthops(&hops(&[(1, 30), (2, 10), (3, 20)])),
        vec![1, 2, 3]
    );
}

#[test]
fn test_builtin_names_are_valid_and_distinct() {
    let mut names: Vec<Name> = STRATEGIES
        .iter()
        .map(|init| init.name.parse().unwrap())
        .collect();
    for (init, parsed) in STRATEGIES.iter().zip(&names) {
        assert_eq!((init.create)(parsed.clone()).name(), parsed);
        assert!(parsed.len() > 3, "{} should live under /localhost/nfd/strategy", parsed);
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), STRATEGIES.len());
}
