// ABOUTME: Behavioral tests for the location typeahead
// Debounce coalescing, minimum query length, pagination and selection

use super::fixtures::{suggestion, wizard_through_kilometers, FakeMarketplace};
use pretty_assertions::assert_eq;
use sellcar::config::LocationConfig;
use sellcar::wizard::{LocationSearch, SearchEvent, SearchPhase, StepId};
use std::sync::Arc;
use std::time::Duration;

fn search(api: &Arc<FakeMarketplace>) -> LocationSearch {
    LocationSearch::new(api.clone(), LocationConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_issues_one_request() {
    let api = Arc::new(FakeMarketplace::new());
    let mut search = search(&api);

    search.on_input("Ra");
    tokio::time::sleep(Duration::from_millis(100)).await;
    search.on_input("Raj");
    tokio::time::sleep(Duration::from_millis(100)).await;
    search.on_input("Rajk");
    search.settle().await;

    assert_eq!(api.city_queries(), vec![("Rajk".to_string(), 1)]);
    assert_eq!(search.phase(), &SearchPhase::Results);
}

#[tokio::test(start_paused = true)]
async fn test_pagination_appends_and_stops_on_short_page() {
    let api = Arc::new(FakeMarketplace {
        location_total: 35,
        ..FakeMarketplace::new()
    });
    let mut search = search(&api);

    search.on_input("Rajkot");
    search.settle().await;
    assert_eq!(search.suggestions().len(), 20);
    assert!(search.has_more());

    // far from the bottom: nothing happens
    assert!(!search.on_scroll(0, 400, 2000));

    // within 40px of the bottom
    assert!(search.on_scroll(1570, 400, 2000));
    search.settle().await;

    assert_eq!(search.suggestions().len(), 35);
    assert!(!search.has_more());
    assert_eq!(search.page(), 2);
    assert!(!search.on_scroll(1570, 400, 2000));
    assert_eq!(
        api.city_queries(),
        vec![("Rajkot".to_string(), 1), ("Rajkot".to_string(), 2)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_next_page_appends_to_existing_rows() {
    let api = Arc::new(FakeMarketplace::new());
    let mut search = search(&api);
    search.on_input("Rajkot");
    let generation = search.generation();

    search.apply(SearchEvent::Finished {
        generation,
        page: 1,
        result: Ok((0..15).map(suggestion).collect()),
    });
    assert_eq!(search.suggestions().len(), 15);
    assert!(!search.has_more());

    search.apply(SearchEvent::Finished {
        generation,
        page: 2,
        result: Ok((15..35).map(suggestion).collect()),
    });
    assert_eq!(search.suggestions().len(), 35);
    assert!(search.has_more());
    assert_eq!(search.suggestions()[15].area_name.as_deref(), Some("Area 15"));
}

#[tokio::test(start_paused = true)]
async fn test_short_query_closes_panel_without_request() {
    let api = Arc::new(FakeMarketplace::new());
    let mut search = search(&api);

    search.on_input("Rajkot");
    search.settle().await;
    assert!(search.is_panel_open());

    search.on_input("Ra");
    assert!(!search.is_panel_open());
    assert!(search.suggestions().is_empty());
    assert_eq!(api.city_queries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_selected_location_advances_wizard() {
    let api = Arc::new(FakeMarketplace::new());
    let mut search = search(&api);
    let mut wizard = wizard_through_kilometers();

    search.on_input("Area");
    search.settle().await;
    let pick = search.select(2).unwrap();
    let transition = wizard.select_location(&pick).unwrap();

    assert_eq!(pick.value, "1002");
    assert_eq!(transition.advanced_to, Some(StepId::Price));
    assert_eq!(wizard.selections().label(StepId::Location), Some("Area 2, Rajkot, 360002"));
    assert_eq!(
        wizard.location_data().and_then(|d| d.pincode.as_deref()),
        Some("360002")
    );
}
