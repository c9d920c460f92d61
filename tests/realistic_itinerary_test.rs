//! Realistic itinerary tests using well-known sights in China.
//!
//! These validate the full pipeline with real-world coordinates, categories
//! and dwell times.

mod fixtures;

use std::collections::HashSet;

use chrono::NaiveDate;

use trip_planner::planner::{DayPlan, TripPlanner};
use trip_planner::sequence::SequenceStrategy;
use trip_planner::{PlannerOptions, Poi, TripRequest};

use fixtures::china_hotspots::{self, BEIJING_CENTRAL, BEIJING_OUTSKIRTS, SHANGHAI, XIAN};

fn city_of(poi: &Poi) -> &str {
    poi.id.split('_').next().unwrap_or_default().trim_end_matches('x')
}

fn cities(day: &DayPlan<Poi>) -> HashSet<&str> {
    day.pois().map(city_of).collect()
}

#[test]
fn test_three_city_trip_keeps_cities_apart() {
    let pois = china_hotspots::all_pois();
    let plan = TripPlanner::default()
        .optimize(&pois, &TripRequest::new(3))
        .expect("plan should succeed");

    let mut seen = HashSet::new();
    for day in &plan.days {
        let day_cities = cities(day);
        assert_eq!(day_cities.len(), 1, "day {} spans {:?}", day.day, day_cities);
        seen.extend(day_cities);
    }
    assert_eq!(seen, HashSet::from(["bj", "sh", "xa"]));

    let beijing = plan
        .days
        .iter()
        .find(|day| cities(day).contains("bj"))
        .expect("a Beijing day");
    assert_eq!(beijing.stops.len(), BEIJING_CENTRAL.len() + BEIJING_OUTSKIRTS.len());
    assert_eq!(beijing.strategy, SequenceStrategy::NearestNeighbor);
    assert!(beijing.time_exceeded, "seventeen sights do not fit one day");
}

#[test]
fn test_small_city_day_is_solved_exactly() {
    let pois = china_hotspots::pois("xa", XIAN);
    let plan = TripPlanner::default()
        .optimize(&pois, &TripRequest::new(1))
        .expect("plan should succeed");

    let day = &plan.days[0];
    assert_eq!(day.strategy, SequenceStrategy::Exact);
    assert_eq!(day.stops[0].poi.name, "Terracotta Army Museum");
    // The two eastern sights sit next to each other in the order.
    let names: Vec<&str> = day.pois().map(|poi| poi.name.as_str()).collect();
    assert_eq!(names[1], "Huaqing Palace");
}

#[test]
fn test_beijing_weekend_walking_trip() {
    let pois = china_hotspots::pois("bj", BEIJING_CENTRAL);
    let request = TripRequest::new(3)
        .mode("walking")
        .weekend(true)
        .starting_at("09:30")
        .on(NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date"));

    let plan = TripPlanner::default()
        .optimize(&pois, &request)
        .expect("plan should succeed");

    assert_eq!(plan.days.len(), 3);
    assert!(plan.days.iter().all(|day| !day.is_empty()));
    assert_eq!(plan.summary.total_cost, 0, "walking is free");
    assert_eq!(plan.days[2].date, NaiveDate::from_ymd_opt(2026, 10, 19));

    let edge_km: f64 = plan
        .days
        .iter()
        .flat_map(|day| day.routes.iter())
        .map(|edge| edge.distance_meters / 1000.0)
        .sum();
    assert!((edge_km - plan.summary.total_distance_km).abs() < 0.05);
}

#[test]
fn test_shanghai_transit_costs() {
    let pois = china_hotspots::pois("sh", SHANGHAI);
    let plan = TripPlanner::default()
        .optimize(&pois, &TripRequest::new(1).mode("transit"))
        .expect("plan should succeed");

    let day = &plan.days[0];
    assert_eq!(day.routes.len(), 3);
    for edge in &day.routes {
        // 3 base fare plus half a unit per km; every hop is well under 10 km.
        assert!(edge.cost >= 3 && edge.cost <= 8, "cost {}", edge.cost);
        // Weekday transit always waits 8 minutes.
        assert!(edge.duration_minutes >= 8);
    }
}

#[test]
fn test_two_opt_option_on_large_day() {
    let mut pois = china_hotspots::pois("bj", BEIJING_CENTRAL);
    pois.extend(china_hotspots::pois("bjx", BEIJING_OUTSKIRTS));

    let greedy = TripPlanner::default()
        .optimize(&pois, &TripRequest::new(1))
        .expect("plan should succeed");
    let polished = TripPlanner::new(PlannerOptions {
        two_opt: true,
        ..PlannerOptions::default()
    })
    .optimize(&pois, &TripRequest::new(1))
    .expect("plan should succeed");

    assert_eq!(polished.days[0].strategy, SequenceStrategy::NearestNeighborTwoOpt);
    assert_eq!(polished.days[0].stops[0].poi.id, "bj_1");
    assert!(polished.days[0].total_distance_km <= greedy.days[0].total_distance_km + 0.01);
}

#[test]
fn test_options_loaded_from_toml() {
    let options = PlannerOptions::from_toml_str(
        r#"
        parallel_days = false

        [cluster]
        seed = 2024
        restarts = 4

        [stay]
        default_minutes = 45
        "#,
    )
    .expect("options should parse");

    let pois = vec![Poi::new("x", 39.9, 116.4)];
    let plan = TripPlanner::new(options)
        .optimize(&pois, &TripRequest::new(1))
        .expect("plan should succeed");
    assert_eq!(plan.days[0].stops[0].stay_minutes, 45);
}
