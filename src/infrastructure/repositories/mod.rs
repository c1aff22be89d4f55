pub mod influx_measurement_repository;
pub mod measurement_repository;

pub use influx_measurement_repository::InfluxMeasurementRepository;
pub use measurement_repository::MeasurementRepository;
