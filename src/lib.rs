//! Rain and wet snow attenuation of terrestrial radio links, after ITU-R P.530 and P.838.

pub mod attenuation;
pub mod error;
pub mod units;
pub mod vars;

pub use attenuation::{
    attenuation_trace,
    rain::{RainAttenuation, RainParameters},
    snow::{SnowAttenuation, SnowParameters},
    table::{RainHeightBin, RainHeightTable},
    Attenuation, AttenuationConfig, LinkGeometry, Precipitation, WeatherModel,
};
pub use error::{AttenuationError, TableError};
pub use units::{Decibels, Hertz, Meters, Unit};
