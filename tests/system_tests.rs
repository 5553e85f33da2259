// System aggregator tests: three-way reduction, order independence, monotonicity, summary stats

mod common;

use common::*;
use statusboard::engine::{avg_response_time_ms, build_service_view, overall_status};
use statusboard::models::{ServiceDefinition, StatusKind, SystemView};

use StatusKind::{Degraded, Operational, Outage};

#[test]
fn overall_status_three_way_reduction() {
    assert_eq!(overall_status([Operational, Operational]), Operational);
    assert_eq!(overall_status([Operational, Degraded]), Degraded);
    assert_eq!(overall_status([Degraded, Outage]), Outage);
    assert_eq!(overall_status([Outage, Operational]), Outage);
}

#[test]
fn overall_status_of_no_services_is_operational() {
    assert_eq!(overall_status(Vec::<StatusKind>::new()), Operational);
}

#[test]
fn overall_status_is_order_independent() {
    let services = [Operational, Degraded, Operational, Outage];
    let mut reversed = services;
    reversed.reverse();
    assert_eq!(overall_status(services), overall_status(reversed));
    let mut rotated = services;
    rotated.rotate_left(1);
    assert_eq!(overall_status(services), overall_status(rotated));
}

#[test]
fn overall_status_is_monotonic_under_outage_replacement() {
    for a in StatusKind::ALL {
        for b in StatusKind::ALL {
            for c in StatusKind::ALL {
                let base = [a, b, c];
                let before = overall_status(base);
                for i in 0..base.len() {
                    let mut worse = base;
                    worse[i] = Outage;
                    assert!(
                        overall_status(worse) >= before,
                        "{:?} -> {:?}",
                        base,
                        worse
                    );
                }
                let mut more = base.to_vec();
                more.push(Outage);
                assert_eq!(overall_status(more), Outage);
            }
        }
    }
}

#[test]
fn system_view_reduces_current_statuses() {
    let define = |name: &str| ServiceDefinition {
        name: name.into(),
        description: String::new(),
    };
    let now = at(12, 0);
    let settings = utc_settings();
    let healthy = build_service_view(&define("api"), &[op(11, 0)], None, now, &settings);
    let slow = build_service_view(&define("web"), &[deg(11, 0)], None, now, &settings);
    let view = SystemView::new(vec![healthy.clone(), slow], now);
    assert_eq!(view.overall_status, Degraded);
    assert_eq!(view.services[0].name, "api");
    assert_eq!(view.generated_at, now);

    let never_checked = build_service_view(&define("db"), &[], None, now, &settings);
    let view = SystemView::new(vec![healthy, never_checked], now);
    assert_eq!(view.overall_status, Outage);
}

#[test]
fn avg_response_time_rounds_half_up() {
    assert_eq!(avg_response_time_ms([100, 800]), 450);
    assert_eq!(avg_response_time_ms([1, 2]), 2);
    assert_eq!(avg_response_time_ms([1, 1, 2]), 1);
    assert_eq!(avg_response_time_ms([u32::MAX, u32::MAX]), u32::MAX);
}

#[test]
fn avg_response_time_of_no_services_is_zero() {
    assert_eq!(avg_response_time_ms(Vec::<u32>::new()), 0);
}

#[test]
fn system_view_summary_counts() {
    let define = |name: &str| ServiceDefinition {
        name: name.into(),
        description: String::new(),
    };
    let now = at(12, 0);
    let settings = utc_settings();
    let healthy = build_service_view(&define("api"), &[op(11, 0)], None, now, &settings);
    let slow = build_service_view(&define("web"), &[deg(11, 0)], None, now, &settings);
    let view = SystemView::new(vec![healthy.clone(), slow], now);
    assert_eq!(view.operational_count, 1);
    assert_eq!(view.avg_response_time_ms, 450);

    // A never-checked service is an outage at 0 ms and still counts in the mean.
    let never_checked = build_service_view(&define("db"), &[], None, now, &settings);
    let view = SystemView::new(vec![healthy, never_checked], now);
    assert_eq!(view.operational_count, 1);
    assert_eq!(view.avg_response_time_ms, 50);

    let empty = SystemView::new(Vec::new(), now);
    assert_eq!(empty.operational_count, 0);
    assert_eq!(empty.avg_response_time_ms, 0);
    assert_eq!(empty.overall_status, Operational);
}
