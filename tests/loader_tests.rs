use busmap::gtfs::{self, DataSource, DirSource, GtfsStop, GtfsStopTime, GtfsTrip};

fn data_dir(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[tokio::test]
async fn load_csv_tables_test() {
    let source = DirSource::new(data_dir(""));
    let tables = gtfs::load_tables(&source, &gtfs::Config::default()).await;

    let stops = tables.stops.unwrap();
    assert_eq!(stops.len(), 6);
    assert_eq!(stops[0].stop_id, "S1");
    assert_eq!(stops[0].stop_name.as_deref(), Some("Rathaus"));
    assert_eq!(stops[3].stop_lat, None);

    let trips = tables.trips.unwrap();
    assert_eq!(trips.len(), 4);
    assert_eq!(trips[2].trip_id, "T3");

    let stop_times = tables.stop_times.unwrap();
    assert_eq!(stop_times.len(), 12);
    assert_eq!(stop_times[1].stop_sequence, "3");
}

#[tokio::test]
async fn load_json_tables_test() {
    let source = DirSource::new(data_dir("json"));
    let config = gtfs::Config::json();

    let stops = gtfs::load_stops(&source, &config).await.unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].stop_lat.as_deref(), Some("48.765"));
    // Numbers become strings, nulls are dropped
    assert_eq!(stops[1].stop_id, "2");

    let stop_times = gtfs::load_stop_times(&source, &config).await.unwrap();
    assert_eq!(stop_times[0].stop_sequence, "2.0");
    assert_eq!(stop_times[0].stop_id, "2");

    let trips = gtfs::load_trips(&source, &config).await.unwrap();
    assert_eq!(trips[0].trip_headsign.as_deref(), Some("Nordbahnhof"));
}

#[tokio::test]
async fn missing_table_test() {
    let source = DirSource::new(data_dir("broken"));
    let tables = gtfs::load_tables(&source, &gtfs::Config::default()).await;
    assert!(tables.stops.is_ok());
    assert!(tables.stop_times.is_ok());
    match tables.trips {
        Err(gtfs::Error::FileNotFound(name)) => assert_eq!(name, "trips.txt"),
        other => panic!("expected a missing trips table, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_zip_test() {
    let source = DataSource::from_location(&data_dir("missing.zip"));
    assert!(matches!(source, DataSource::Zip(_)));
    let tables = gtfs::load_tables(&source, &gtfs::Config::default()).await;
    assert!(matches!(tables.stops, Err(gtfs::Error::Io(_))));
    assert!(tables.trips.is_err());
    assert!(tables.stop_times.is_err());
}

#[test]
fn data_source_from_location_test() {
    assert!(matches!(
        DataSource::from_location("https://example.org/gtfs/"),
        DataSource::Http(_)
    ));
    assert!(matches!(
        DataSource::from_location("/data/GTFS.ZIP"),
        DataSource::Zip(_)
    ));
    assert!(matches!(
        DataSource::from_location("./public"),
        DataSource::Dir(_)
    ));
}

#[test]
fn parse_csv_rows_test() {
    let csv = b"stop_id,stop_name,stop_lat,stop_lon\n S9 , Hbf ,48.1,11.2\nS10,Ost\n";
    let stops: Vec<GtfsStop> = gtfs::parse_rows("stops.txt", csv).unwrap();
    assert_eq!(stops[0].stop_id, "S9");
    assert_eq!(stops[0].stop_name.as_deref(), Some("Hbf"));
    // Short rows leave the trailing columns empty
    assert_eq!(stops[1].stop_lat, None);
}

#[test]
fn parse_rows_errors_test() {
    let result: Result<Vec<GtfsTrip>, _> = gtfs::parse_rows("trips.json", b"{ not json");
    assert!(matches!(result, Err(gtfs::Error::Json(_))));

    let result: Result<Vec<GtfsStopTime>, _> =
        gtfs::parse_rows("stop_times.txt", b"arrival_time\n08:00:00\n");
    assert!(matches!(result, Err(gtfs::Error::Csv(_))));
}
