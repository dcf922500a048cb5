use busmap::{
    gtfs::{self, DirSource, GtfsStop, GtfsStopTime, GtfsTrip},
    repository::{Repository, UNKNOWN_DESTINATION},
    shared::Coordinate,
};

fn stop(id: &str, lat: &str, lon: &str) -> GtfsStop {
    GtfsStop {
        stop_id: id.into(),
        stop_name: Some(format!("Stop {id}")),
        stop_lat: Some(lat.into()),
        stop_lon: Some(lon.into()),
    }
}

fn stop_time(trip_id: &str, stop_id: &str, sequence: &str, arrival: &str) -> GtfsStopTime {
    GtfsStopTime {
        trip_id: trip_id.into(),
        stop_id: stop_id.into(),
        stop_sequence: sequence.into(),
        arrival_time: Some(arrival.into()),
        departure_time: Some(arrival.into()),
    }
}

fn trip(id: &str, headsign: &str) -> GtfsTrip {
    GtfsTrip {
        trip_id: id.into(),
        trip_headsign: Some(headsign.into()),
    }
}

async fn fixture(name: &str) -> Repository {
    let source = DirSource::new(format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name));
    Repository::from_tables(gtfs::load_tables(&source, &gtfs::Config::default()).await)
}

#[tokio::test]
async fn duplicated_stop_last_row_wins_test() {
    let repository = fixture("").await;
    let stop = repository.stop_by_id("S1").unwrap();
    assert_eq!(&*stop.name, "Rathaus West");
    assert_eq!(stop.coordinate, Some(Coordinate::new(48.766, 11.426)));
    // The stop keeps its first position in the table
    assert_eq!(repository.stops[0].id.as_ref(), "S1");
    assert_eq!(repository.stops.len(), 5);
}

#[tokio::test]
async fn stop_lookup_test() {
    let repository = fixture("").await;
    assert!(repository.stop_by_id("missing").is_none());
    assert_eq!(repository.stop_by_id("S4").unwrap().coordinate, None);
    // Nameless stops are shown by id
    assert_eq!(&*repository.stop_by_id("S5").unwrap().name, "S5");

    let mapped: Vec<_> = repository.mapped_stops().map(|stop| &*stop.id).collect();
    assert_eq!(mapped, vec!["S1", "S2", "S3", "S5"]);
}

#[tokio::test]
async fn headsign_test() {
    let repository = fixture("").await;
    assert_eq!(repository.headsign("T1"), "Klinikum");
    assert_eq!(repository.headsign("T3"), UNKNOWN_DESTINATION);
    assert_eq!(repository.headsign("TX"), UNKNOWN_DESTINATION);
}

#[tokio::test]
async fn top_departures_test() {
    let repository = fixture("").await;
    let departures = repository.top_departures("S1", 5);
    let trips: Vec<_> = departures.iter().map(|d| &*d.trip_id).collect();
    // T1 and T3 share 08:00:00 and keep their table order
    assert_eq!(trips, vec!["T6", "T2", "T1", "T3", "TX"]);
    assert_eq!(&*departures[0].headsign, "Nordbahnhof");
    assert_eq!(&*departures[0].arrival_time, "06:55:00");
    assert_eq!(&*departures[3].headsign, UNKNOWN_DESTINATION);
    assert_eq!(&*departures[4].headsign, UNKNOWN_DESTINATION);

    // Past midnight sorts after the day, unreadable times sort last,
    // rows without a valid sequence are gone
    let all = repository.top_departures("S1", 100);
    let trips: Vec<_> = all.iter().map(|d| &*d.trip_id).collect();
    assert_eq!(trips, vec!["T6", "T2", "T1", "T3", "TX", "T5", "T7"]);

    assert!(repository.top_departures("S5", 5).is_empty());
    assert!(repository.top_departures("missing", 5).is_empty());
    assert!(repository.top_departures("S1", 0).is_empty());
}

#[tokio::test]
async fn path_for_fixture_test() {
    let repository = fixture("").await;
    let path = repository.path_for("T1");
    let stops: Vec<_> = path.iter().map(|stop| &*stop.stop_id).collect();
    assert_eq!(stops, vec!["S1", "S2", "S3"]);
    assert_eq!(&*path[1].arrival_time, "08:10:00");

    // S4 has no position and is left out
    let stops: Vec<_> = repository
        .path_for("T3")
        .into_iter()
        .map(|stop| stop.stop_id)
        .collect();
    assert_eq!(stops.len(), 1);
    assert_eq!(&*stops[0], "S1");

    assert!(repository.path_for("missing").is_empty());
}

#[test]
fn path_follows_sequence_test() {
    let repository = Repository::from_rows(
        vec![stop("A", "1", "1"), stop("B", "2", "2"), stop("C", "3", "3")],
        vec![
            stop_time("T", "B", "3", "08:20:00"),
            stop_time("T", "A", "1", "08:00:00"),
            stop_time("T", "C", "2", "08:10:00"),
        ],
        vec![trip("T", "Somewhere")],
    );
    let path = repository.path_for("T");
    let stops: Vec<_> = path.iter().map(|stop| &*stop.stop_id).collect();
    assert_eq!(stops, vec!["A", "C", "B"]);
    assert_eq!(
        repository.coordinates_for("T"),
        vec![
            Coordinate::new(1.0, 1.0),
            Coordinate::new(3.0, 3.0),
            Coordinate::new(2.0, 2.0),
        ]
    );
}

#[test]
fn single_stop_trip_test() {
    let repository = Repository::from_rows(
        vec![stop("S1", "48.7", "11.4")],
        vec![
            stop_time("T1", "S1", "1", "08:00:00"),
            stop_time("T1", "S1", "2", "08:05:00"),
            stop_time("T1", "S1", "3", "08:10:00"),
        ],
        vec![trip("T1", "Central")],
    );
    assert_eq!(repository.headsign("T1"), "Central");
    let path = repository.coordinates_for("T1");
    assert_eq!(path, vec![Coordinate::new(48.7, 11.4); 3]);
    assert_eq!(repository.top_departures("S1", 5).len(), 3);
}

#[test]
fn duplicated_trip_test() {
    let repository = Repository::from_rows(
        Vec::new(),
        Vec::new(),
        vec![trip("T1", "First"), trip("T1", "Second")],
    );
    assert_eq!(repository.trips.len(), 1);
    assert_eq!(repository.headsign("T1"), "Second");
}

#[tokio::test]
async fn partial_failure_test() {
    let repository = fixture("broken").await;
    assert_eq!(repository.mapped_stops().count(), 4);
    assert!(repository.trips.is_empty());
    for id in ["T1", "T2", "anything"] {
        assert_eq!(repository.headsign(id), UNKNOWN_DESTINATION);
    }
    let departures = repository.top_departures("S1", 5);
    assert_eq!(departures.len(), 1);
    assert_eq!(&*departures[0].headsign, UNKNOWN_DESTINATION);
    assert_eq!(repository.path_for("T1").len(), 2);
}

#[tokio::test]
async fn json_tables_test() {
    let source = DirSource::new(format!("{}/tests/data/json", env!("CARGO_MANIFEST_DIR")));
    let repository =
        Repository::from_tables(gtfs::load_tables(&source, &gtfs::Config::json()).await);
    let stops: Vec<_> = repository
        .path_for("T1")
        .into_iter()
        .map(|stop| stop.stop_id)
        .collect();
    assert_eq!(stops.len(), 2);
    assert_eq!(&*stops[0], "S1");
    assert_eq!(&*stops[1], "2");
    assert_eq!(repository.headsign("T1"), "Nordbahnhof");
}
