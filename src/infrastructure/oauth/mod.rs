pub mod fitbit;

pub use fitbit::FitbitClient;
