#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

pub const HEADER: &str = "id,vendor_id,pickup_datetime,dropoff_datetime,passenger_count,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,store_and_fwd_flag,trip_duration";

/// Raw rows covering clean, suspect and excluded trips.
pub const ROWS: [&str; 8] = [
    // clean, ~11.9 km/h
    "id2875421,2,2016-03-14 17:24:55,2016-03-14 17:32:30,1,-73.982154846191406,40.767936706542969,-73.964630126953125,40.765602111816406,N,455",
    // clean, ~10.0 km/h, Sunday after midnight
    "id2377394,1,2016-06-12 00:43:35,2016-06-12 00:54:38,1,-73.980415344238281,40.738563537597656,-73.999481201171875,40.731151580810547,N,663",
    // clean, ~10.6 km/h, long trip
    "id3858529,2,2016-01-19 11:35:24,2016-01-19 12:10:48,1,-73.979026794433594,40.763938903808594,-74.005332946777344,40.710086822509766,N,2124",
    // clean, ~12.4 km/h, 6 passengers
    "id3504673,2,2016-04-06 19:32:31,2016-04-06 19:39:40,6,-74.010040283203125,40.719970703125,-74.012268066406250,40.706718444824219,Y,429",
    // suspect: outside the service area
    "id0000001,1,2016-03-26 13:30:55,2016-03-26 13:38:10,1,-73.973052978515625,45.793209075927734,-73.972923278808594,40.782520294189453,N,435",
    // suspect: too short
    "id0000002,1,2016-01-30 22:01:40,2016-01-30 22:02:10,1,-73.982856750488281,40.742195129394531,-73.992080688476563,40.749183654785156,N,30",
    // excluded: missing id
    ",2,2016-02-27 12:51:46,2016-02-27 13:01:20,2,-73.98,40.75,-73.97,40.76,N,574",
    // excluded: bad coordinates
    "id0000003,2,2016-02-27 12:51:46,2016-02-27 13:01:20,2,abc,40.75,-73.97,40.76,N,574",
];

pub fn raw_csv(rows: &[&str]) -> String {
    let mut csv = String::from(HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv
}

pub fn raw_csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    file.write_all(raw_csv(rows).as_bytes())
        .expect("fixture should be written");
    file.flush().expect("fixture should be flushed");
    file
}
