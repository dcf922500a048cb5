use std::time::Duration;

use busmap::{
    animator::AnimationState,
    geometry::{Error, RouteProvider},
    gtfs::{self, DirSource},
    repository::UNKNOWN_DESTINATION,
    session::{Session, Settings},
    shared::Coordinate,
};
use tokio::time::sleep;

/// Straight lines, but three-stop trips take five seconds to answer.
struct SlowForLongTrips;

impl RouteProvider for SlowForLongTrips {
    async fn directions(&self, path: &[Coordinate]) -> Result<Vec<Coordinate>, Error> {
        if path.len() >= 3 {
            sleep(Duration::from_secs(5)).await;
        }
        Ok(path.to_vec())
    }
}

fn source(name: &str) -> DirSource {
    DirSource::new(format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name))
}

async fn session() -> Session<Option<SlowForLongTrips>> {
    let session = Session::new(Settings::default(), None);
    session
        .reload(&source(""), &gtfs::Config::default())
        .await;
    session
}

// Lets the animation task pick up its commands.
async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn list_stops_by_zoom_test() {
    let session = session().await;
    assert_eq!(session.zoom(), 10.0);
    assert!(session.list_stops().is_empty());

    session.set_zoom(15.0);
    let stops: Vec<_> = session
        .list_stops()
        .into_iter()
        .map(|stop| stop.id)
        .collect();
    assert_eq!(stops.len(), 4);
    assert_eq!(&*stops[0], "S1");

    session.set_zoom(14.5);
    assert!(session.list_stops().is_empty());
}

#[tokio::test(start_paused = true)]
async fn popup_content_test() {
    let session = session().await;
    let popup = session.popup_content("S1").unwrap();
    assert_eq!(&*popup.name, "Rathaus West");
    assert_eq!(popup.departures.len(), 5);
    assert_eq!(&*popup.departures[0].arrival_time, "06:55:00");
    assert!(session.popup_content("missing").is_none());

    let popup = session.popup_content("S5").unwrap();
    assert!(popup.departures.is_empty());
}

#[tokio::test(start_paused = true)]
async fn select_trip_test() {
    let session = session().await;
    let selection = session.select_trip("T1").await;
    assert_eq!(selection.trip_id.as_deref(), Some("T1"));
    let stops: Vec<_> = session
        .selected_stops()
        .into_iter()
        .map(|stop| stop.stop_id)
        .collect();
    assert_eq!(stops.len(), 3);
    assert_eq!(&*stops[2], "S3");

    // Without road routing the stop path is drawn as is
    let path = session.selected_path();
    assert_eq!(path.len(), 3);
    assert_eq!(path[0], Coordinate::new(48.766, 11.426));

    settle().await;
    assert_eq!(session.animation_state(), AnimationState::Running);
    assert_eq!(session.animated_position(), Some(path[0]));

    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.animated_position(), Some(path[1]));
}

#[tokio::test(start_paused = true)]
async fn select_trip_from_stop_test() {
    let session = session().await;
    session.select_trip_from_stop("T1", "S2").await;
    settle().await;
    assert_eq!(session.animation().index, 1);
    assert_eq!(
        session.animated_position(),
        Some(Coordinate::new(48.78, 11.43))
    );

    // S2 is not on T2, the vehicle starts at the closest stop S1
    session.select_trip_from_stop("T2", "S2").await;
    settle().await;
    assert_eq!(session.animation().index, 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_trip_test() {
    let session = session().await;
    let selection = session.select_trip("missing").await;
    assert!(selection.path.is_empty());
    assert!(session.selected_path().is_empty());
    settle().await;
    assert_eq!(session.animation_state(), AnimationState::Finished);
    assert_eq!(session.animated_position(), None);
}

#[tokio::test(start_paused = true)]
async fn clear_selection_test() {
    let session = session().await;
    session.select_trip("T1").await;
    session.clear_selection().await;
    settle().await;
    assert!(session.selection().is_empty());
    assert!(session.selected_path().is_empty());
    assert_eq!(session.animation_state(), AnimationState::Idle);
    assert_eq!(session.animated_position(), None);
}

#[tokio::test(start_paused = true)]
async fn stale_route_is_discarded_test() {
    let session = Session::new(Settings::default(), Some(SlowForLongTrips));
    session
        .reload(&source(""), &gtfs::Config::default())
        .await;

    let (slow, fast) = tokio::join!(session.select_trip("T1"), async {
        sleep(Duration::from_secs(1)).await;
        session.select_trip("T2").await
    });
    assert_eq!(fast.trip_id.as_deref(), Some("T2"));
    // The late answer for T1 leaves the newer selection in place
    assert_eq!(slow.trip_id.as_deref(), Some("T2"));
    assert_eq!(session.selection().trip_id.as_deref(), Some("T2"));
    assert_eq!(session.selected_path().len(), 2);

    // T2 has two points, both ticked through by now
    settle().await;
    assert_eq!(session.animation_state(), AnimationState::Finished);
    assert_eq!(
        session.animated_position(),
        Some(session.selected_path()[1])
    );
}

#[tokio::test(start_paused = true)]
async fn reload_clears_selection_test() {
    let session = session().await;
    session.select_trip("T1").await;
    session
        .reload(&source(""), &gtfs::Config::default())
        .await;
    settle().await;
    assert!(session.selection().is_empty());
    assert_eq!(session.animation_state(), AnimationState::Idle);
}

#[tokio::test(start_paused = true)]
async fn partial_reload_test() {
    let session: Session<Option<SlowForLongTrips>> = Session::new(Settings::default(), None);
    session
        .reload(&source("broken"), &gtfs::Config::default())
        .await;
    session.set_zoom(16.0);
    assert_eq!(session.list_stops().len(), 4);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.headsign("T1"), UNKNOWN_DESTINATION);
    assert!(session.vehicles().is_empty());
}

#[tokio::test(start_paused = true)]
async fn snapshot_survives_reload_test() {
    let session = session().await;
    let before = session.snapshot();
    session
        .reload(&source("broken"), &gtfs::Config::default())
        .await;
    assert_eq!(before.headsign("T1"), "Klinikum");
    assert_eq!(session.snapshot().headsign("T1"), UNKNOWN_DESTINATION);
}

#[tokio::test(start_paused = true)]
async fn vehicle_markers_test() {
    let session = session().await;
    assert_eq!(session.vehicles().len(), 3);
    let markers = session.vehicle_markers();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].position, Coordinate::new(48.7665, 11.4257));
    assert_eq!(markers[0].popup.line_name, "10");
    assert_eq!(markers[1].popup.upcoming_stops[0].name, "Rathaus");
}

#[tokio::test(start_paused = true)]
async fn map_defaults_test() {
    let session = session().await;
    let defaults = session.map_defaults();
    assert_eq!(defaults.center, Coordinate::new(48.7665, 11.4257));
    assert_eq!(defaults.zoom, 10.0);
    assert_eq!(defaults.zoom_threshold, 15.0);
}
