pub mod rain;
pub mod snow;
pub mod table;

use crate::{
    error::{finite, AttenuationError, TableError},
    units::Decibels,
};
use log::trace;
use rayon::prelude::*;
use rain::{check_path, RainAttenuation, RainParameters};
use snow::{SnowAttenuation, SnowParameters};
use std::sync::Arc;
use table::RainHeightTable;

/* # links */

/// positions of both terminals at one instant
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinkGeometry {
    /// straight line distance between the terminals in m
    pub distance: f64,
    /// carrier frequency in Hz
    pub frequency: f64,
    /// transmitter height above sea level in m
    pub h_tx: f64,
    /// receiver height above sea level in m
    pub h_rx: f64,
}

impl LinkGeometry {
    pub fn validate(&self) -> Result<(), AttenuationError> {
        check_path(self.distance, self.frequency)?;
        finite("transmitter height", self.h_tx)?;
        finite("receiver height", self.h_rx)?;
        Ok(())
    }
}

/// anything able to tell the extra loss of a link
pub trait Attenuation {
    fn attenuation(&self, link: &LinkGeometry) -> Result<Decibels, AttenuationError>;
}

/* # weather */

/// which hydrometeors take part in the attenuation
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Precipitation {
    #[default]
    Rain,
    RainAndWetSnow,
}

impl From<bool> for Precipitation {
    /// `true` asks for combined rain and wet snow
    fn from(snow: bool) -> Self {
        if snow {
            Precipitation::RainAndWetSnow
        } else {
            Precipitation::Rain
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AttenuationConfig {
    pub rain: RainParameters,
    pub snow: SnowParameters,
    pub precipitation: Precipitation,
}

/// rain or rain with wet snow, chosen once from the configuration
#[derive(Debug, Clone)]
pub enum WeatherModel {
    Rain(RainAttenuation),
    RainAndWetSnow(SnowAttenuation),
}

impl WeatherModel {
    /// build the model, loading the bundled rain height table only when snow is asked for
    pub fn from_config(config: &AttenuationConfig) -> Result<Self, AttenuationError> {
        Self::with_table_source(config, RainHeightTable::itu)
    }

    /// build the model around a caller supplied rain height table
    pub fn with_table(
        config: &AttenuationConfig,
        table: Arc<RainHeightTable>,
    ) -> Result<Self, AttenuationError> {
        Self::with_table_source(config, || Ok(table))
    }

    /// build the model, calling `source` for the rain height table only when snow is asked for
    pub fn with_table_source<F>(
        config: &AttenuationConfig,
        source: F,
    ) -> Result<Self, AttenuationError>
    where
        F: FnOnce() -> Result<Arc<RainHeightTable>, TableError>,
    {
        let rain = RainAttenuation::new(config.rain)?;
        match config.precipitation {
            Precipitation::Rain => Ok(WeatherModel::Rain(rain)),
            Precipitation::RainAndWetSnow => Ok(WeatherModel::RainAndWetSnow(
                SnowAttenuation::new(rain, config.snow, source()?)?,
            )),
        }
    }

    pub fn precipitation(&self) -> Precipitation {
        match self {
            WeatherModel::Rain(_) => Precipitation::Rain,
            WeatherModel::RainAndWetSnow(_) => Precipitation::RainAndWetSnow,
        }
    }
}

impl Attenuation for WeatherModel {
    fn attenuation(&self, link: &LinkGeometry) -> Result<Decibels, AttenuationError> {
        match self {
            WeatherModel::Rain(model) => model.attenuation(link),
            WeatherModel::RainAndWetSnow(model) => model.attenuation(link),
        }
    }
}

/// evaluate a sequence of link geometries in parallel, keeping their order
///
/// geometries are checked in order beforehand, so an invalid trace reports its first invalid link
pub fn attenuation_trace<A: Attenuation + Sync>(
    model: &A,
    links: &[LinkGeometry],
) -> Result<Vec<Decibels>, AttenuationError> {
    trace!("evaluating attenuation over {} link geometries", links.len());
    links.iter().try_for_each(LinkGeometry::validate)?;
    links
        .par_iter()
        .map(|link| model.attenuation(link))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{units::Unit, vars::BIN_COUNT};
    use float_eq::assert_float_eq;
    const EPSILON: f64 = 0.0000_01;

    fn config(precipitation: Precipitation) -> AttenuationConfig {
        AttenuationConfig {
            rain: RainParameters {
                rain_rate: 50.0,
                k: 0.0101,
                alpha: 1.276,
            },
            snow: SnowParameters {
                altitude: 0.0,
                h0: 0.0,
            },
            precipitation,
        }
    }

    fn link(distance: f64) -> LinkGeometry {
        LinkGeometry {
            distance,
            frequency: 60e9,
            h_tx: 1.5,
            h_rx: 1.5,
        }
    }

    #[test]
    fn toggle() {
        assert_eq!(Precipitation::from(true), Precipitation::RainAndWetSnow);
        assert_eq!(Precipitation::from(false), Precipitation::Rain);
        assert_eq!(AttenuationConfig::default().precipitation, Precipitation::Rain);
    }

    #[test]
    fn weather_dispatch() {
        let rain = WeatherModel::from_config(&config(Precipitation::Rain)).unwrap();
        let snow = WeatherModel::from_config(&config(Precipitation::RainAndWetSnow)).unwrap();
        assert_eq!(rain.precipitation(), Precipitation::Rain);
        assert_eq!(snow.precipitation(), Precipitation::RainAndWetSnow);
        assert_float_eq!(
            rain.attenuation(&link(1000.0)).unwrap().release(),
            1.679047,
            abs <= EPSILON
        );
        assert_float_eq!(
            snow.attenuation(&link(1000.0)).unwrap().release(),
            2.023996,
            abs <= EPSILON
        );
    }

    #[test]
    fn custom_table() {
        // all the probability mass far below the link removes any attenuation
        let mut probabilities = [0.0; BIN_COUNT];
        probabilities[0] = 1.0;
        let table = Arc::new(RainHeightTable::from_probabilities(probabilities).unwrap());
        let model =
            WeatherModel::with_table(&config(Precipitation::RainAndWetSnow), table).unwrap();
        assert_float_eq!(
            model.attenuation(&link(1000.0)).unwrap().release(),
            0.0,
            abs <= EPSILON
        );
    }

    #[test]
    fn rain_ignores_table_source() {
        let missing = || RainHeightTable::from_path("static/no-such-table.txt").map(Arc::new);
        let rain = WeatherModel::with_table_source(&config(Precipitation::Rain), missing).unwrap();
        assert_float_eq!(
            rain.attenuation(&link(1000.0)).unwrap().release(),
            1.679047,
            abs <= EPSILON
        );
        assert!(matches!(
            WeatherModel::with_table_source(&config(Precipitation::RainAndWetSnow), missing),
            Err(AttenuationError::Table(TableError::Io(_)))
        ));

        let short = || "0 1.0\n".parse::<RainHeightTable>().map(Arc::new);
        assert!(WeatherModel::with_table_source(&config(Precipitation::Rain), short).is_ok());
        assert!(matches!(
            WeatherModel::with_table_source(&config(Precipitation::RainAndWetSnow), short),
            Err(AttenuationError::Table(TableError::RowCount { found: 1 }))
        ));
    }

    #[test]
    fn invalid_configuration() {
        let mut cfg = config(Precipitation::Rain);
        cfg.rain.rain_rate = -2.0;
        assert!(matches!(
            WeatherModel::from_config(&cfg),
            Err(AttenuationError::NegativeRainRate(_))
        ));
    }

    #[test]
    fn trace_keeps_order() {
        let model = WeatherModel::from_config(&config(Precipitation::RainAndWetSnow)).unwrap();
        let links = (0..64)
            .map(|j| link(250.0 * j as f64))
            .collect::<Vec<LinkGeometry>>();
        let trace = attenuation_trace(&model, &links).unwrap();
        assert_eq!(trace.len(), links.len());
        for (value, link) in trace.iter().zip(&links) {
            assert_float_eq!(
                value.release(),
                model.attenuation(link).unwrap().release(),
                abs <= EPSILON
            );
        }
    }

    #[test]
    fn trace_rejects_invalid_link() {
        let model = WeatherModel::from_config(&config(Precipitation::Rain)).unwrap();
        let mut links = vec![link(100.0), link(200.0), link(300.0)];
        links[1].frequency = 0.0;
        assert!(matches!(
            attenuation_trace(&model, &links),
            Err(AttenuationError::NonPositiveFrequency(_))
        ));
    }

    #[test]
    fn trace_reports_first_invalid_link() {
        let model = WeatherModel::from_config(&config(Precipitation::Rain)).unwrap();
        let mut links = (0..256)
            .map(|j| link(100.0 * j as f64))
            .collect::<Vec<LinkGeometry>>();
        links[3].distance = -1.0;
        for link in links.iter_mut().skip(4) {
            link.frequency = 0.0;
        }
        match attenuation_trace(&model, &links) {
            Err(AttenuationError::NegativeDistance(distance)) => {
                assert_float_eq!(distance, -1.0, abs <= EPSILON)
            },
            other => panic!("unexpected {:?}", other),
        }
    }
}
