use std::{cmp::Ordering, io::Write};

use hifitime::Epoch;

use skyplan::{
    catalogue::CatalogueError,
    schedule::{compare_altitudes, schedule_catalogue},
    site::I_LOFAR,
    track::compute_tracks,
    Catalogue, TimeGrid,
};

const CATALOGUE: &str = "\
,Name,RA,DEC
0,B0329+54,0.9259,0.9525
1,B0809+74,2.1392,1.3001
2,B1133+16,3.0336,0.2859
3,B1508+55,3.9853,0.9627
4,B1919+21,5.0539,0.3798
5,B2217+47,5.8633,0.8289
";

fn catalogue_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn grid() -> TimeGrid {
    TimeGrid::linspace(Epoch::from_gregorian_utc_hms(2024, 3, 5, 18, 0, 0), 31.0, 500).unwrap()
}

#[test]
fn schedule_partitions_the_grid_and_owners_are_highest() {
    let file = catalogue_file(CATALOGUE);
    let catalogue = Catalogue::from_csv(file.path()).unwrap();
    assert_eq!(catalogue.len(), 6);

    let grid = grid();
    let tracks = compute_tracks(&catalogue, &I_LOFAR, &grid, false);
    let schedule = schedule_catalogue(&catalogue, &tracks, &grid).unwrap();

    // Contiguous, non-overlapping and covering every sample.
    assert_eq!(schedule.first().start_index, 0);
    assert_eq!(schedule.last().end_index, grid.len());
    assert_eq!(schedule.last().end, grid.last());
    for pair in schedule.windows(2) {
        assert_eq!(pair[0].end_index, pair[1].start_index);
        assert_eq!(pair[0].end, pair[1].start);
        // Adjacent intervals never share an owner.
        assert_ne!(pair[0].owner, pair[1].owner);
    }

    for interval in &schedule {
        assert!(interval.num_samples() > 0);
        assert_eq!(interval.name, catalogue.sources()[interval.owner].name);
        assert_eq!(interval.start, grid.epochs()[interval.start_index]);
        for i in interval.start_index..interval.end_index {
            let owner_alt = tracks[interval.owner].alt_deg[i];
            for track in &tracks {
                assert_ne!(
                    compare_altitudes(track.alt_deg[i], owner_alt),
                    Ordering::Greater,
                    "sample {i}"
                );
            }
        }
    }
}

#[test]
fn schedule_lines_name_the_source_coordinates() {
    let file = catalogue_file(CATALOGUE);
    let catalogue = Catalogue::from_csv(file.path()).unwrap();
    let grid = grid();
    let tracks = compute_tracks(&catalogue, &I_LOFAR, &grid, false);
    let schedule = schedule_catalogue(&catalogue, &tracks, &grid).unwrap();

    let first = schedule.first();
    let line = first.format_line(&catalogue.sources()[first.owner]);
    assert!(line.starts_with("2024-03-05T18:00 - "), "{line}");
    assert!(line.ends_with(", 'J2000']"), "{line}");
    assert!(line.contains(&format!(" : {} [", first.name)), "{line}");
}

#[test]
fn single_source_catalogue() {
    let file = catalogue_file("Name,RA,DEC\nB0329+54,0.9259,0.9525\n");
    let catalogue = Catalogue::from_csv(file.path()).unwrap();
    let grid = grid();
    let tracks = compute_tracks(&catalogue, &I_LOFAR, &grid, false);
    let schedule = schedule_catalogue(&catalogue, &tracks, &grid).unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].start, grid.first());
    assert_eq!(schedule[0].end, grid.last());
}

#[test]
fn bad_catalogues() {
    let file = catalogue_file("Name,RA,DEC\n");
    assert!(matches!(
        Catalogue::from_csv(file.path()),
        Err(CatalogueError::Empty(_))
    ));

    let file = catalogue_file("Name,RA,DEC\nA,0.1,0.2\nB,north,0.3\n");
    match Catalogue::from_csv(file.path()) {
        Err(CatalogueError::Row { line, .. }) => assert_eq!(line, 3),
        r => panic!("unexpected {r:?}"),
    }

    assert!(matches!(
        Catalogue::from_csv("/nonexistent/catalogue.csv"),
        Err(CatalogueError::Read { .. })
    ));
}
