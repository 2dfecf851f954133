use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, StringArray, TimestampSecondArray, UInt32Array,
    UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use trip_core::trip::{StoreAndForward, TripRecord};

use crate::error::Result;

pub(crate) fn export_trips_parquet_impl(trips: &[TripRecord], file: std::fs::File) -> Result<()> {
    let batch = build_record_batch(trips)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(
    trips: &[TripRecord],
) -> std::result::Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    let arrays = build_arrays(trips);

    RecordBatch::try_new(schema, arrays)
}

fn timestamp_field(name: &'static str) -> Field {
    Field::new(name, DataType::Timestamp(TimeUnit::Second, None), false)
}

fn parquet_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("vendor_id", DataType::UInt8, false),
        timestamp_field("pickup_datetime"),
        timestamp_field("dropoff_datetime"),
        Field::new("passenger_count", DataType::UInt32, false),
        Field::new("pickup_longitude", DataType::Float64, false),
        Field::new("pickup_latitude", DataType::Float64, false),
        Field::new("dropoff_longitude", DataType::Float64, false),
        Field::new("dropoff_latitude", DataType::Float64, false),
        Field::new("store_and_fwd_flag", DataType::Utf8, false),
        Field::new("trip_duration", DataType::UInt32, false),
        Field::new("trip_distance", DataType::Float64, false),
        Field::new("average_speed", DataType::Float64, false),
        Field::new("hour_of_day", DataType::UInt8, false),
        Field::new("day_of_week", DataType::UInt8, false),
        Field::new("pickup_zone", DataType::UInt64, true),
        Field::new("is_suspect", DataType::Boolean, false),
        Field::new("suspect_reason", DataType::Utf8, true),
    ])
}

fn build_arrays(trips: &[TripRecord]) -> Vec<ArrayRef> {
    let f64_column = |get: fn(&TripRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(trips.iter().map(get).collect::<Vec<_>>()))
    };
    let u8_column = |get: fn(&TripRecord) -> u8| -> ArrayRef {
        Arc::new(UInt8Array::from(trips.iter().map(get).collect::<Vec<_>>()))
    };

    vec![
        Arc::new(StringArray::from(
            trips.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        )),
        u8_column(|t| t.vendor_id),
        Arc::new(TimestampSecondArray::from(
            trips
                .iter()
                .map(|t| t.pickup_datetime.and_utc().timestamp())
                .collect::<Vec<_>>(),
        )),
        Arc::new(TimestampSecondArray::from(
            trips
                .iter()
                .map(|t| t.dropoff_datetime.and_utc().timestamp())
                .collect::<Vec<_>>(),
        )),
        Arc::new(UInt32Array::from(
            trips.iter().map(|t| t.passenger_count).collect::<Vec<_>>(),
        )),
        f64_column(|t| t.pickup_longitude),
        f64_column(|t| t.pickup_latitude),
        f64_column(|t| t.dropoff_longitude),
        f64_column(|t| t.dropoff_latitude),
        Arc::new(StringArray::from(
            trips
                .iter()
                .map(|t| match t.store_and_fwd_flag {
                    StoreAndForward::Yes => "Y",
                    StoreAndForward::No => "N",
                })
                .collect::<Vec<_>>(),
        )),
        Arc::new(UInt32Array::from(
            trips.iter().map(|t| t.trip_duration).collect::<Vec<_>>(),
        )),
        f64_column(|t| t.trip_distance),
        f64_column(|t| t.average_speed),
        u8_column(|t| t.hour_of_day),
        u8_column(|t| t.day_of_week),
        Arc::new(UInt64Array::from(
            trips.iter().map(|t| t.pickup_zone).collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            trips.iter().map(|t| t.is_suspect).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            trips
                .iter()
                .map(|t| t.suspect_reason.map(|reason| reason.to_string()))
                .collect::<Vec<_>>(),
        )),
    ]
}
