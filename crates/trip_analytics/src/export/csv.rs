use trip_core::trip::TripRecord;

use crate::error::Result;

pub(crate) fn export_trips_csv_impl(trips: &[TripRecord], file: std::fs::File) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(file);
    for trip in trips {
        wtr.serialize(trip)?;
    }
    wtr.flush()?;
    Ok(())
}
