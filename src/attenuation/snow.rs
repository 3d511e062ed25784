use crate::{
    attenuation::{
        rain::{check_path, RainAttenuation},
        table::RainHeightTable,
        Attenuation, LinkGeometry,
    },
    error::{finite, AttenuationError},
    units::{Decibels, Meters, Unit},
    vars::*,
};
use log::{debug, trace};
use std::sync::Arc;

/// site description needed to place the link relative to the melting layer
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SnowParameters {
    /// altitude of the site above sea level in m
    pub altitude: f64,
    /// mean annual 0C isotherm height above sea level in m
    pub h0: f64,
}

impl SnowParameters {
    pub fn validate(&self) -> Result<(), AttenuationError> {
        finite("altitude", self.altitude)?;
        finite("h0", self.h0)?;
        Ok(())
    }
}

/// attenuation caused by combined rain and wet snow, after ITU-R P.530-15
#[derive(Debug, Clone)]
pub struct SnowAttenuation {
    rain: RainAttenuation,
    params: SnowParameters,
    table: Arc<RainHeightTable>,
}

impl SnowAttenuation {
    pub fn new(
        rain: RainAttenuation,
        params: SnowParameters,
        table: Arc<RainHeightTable>,
    ) -> Result<Self, AttenuationError> {
        params.validate()?;
        Ok(Self {
            rain,
            params,
            table,
        })
    }

    /// use the bundled ITU-R rain height table
    pub fn itu(rain: RainAttenuation, params: SnowParameters) -> Result<Self, AttenuationError> {
        Self::new(rain, params, RainHeightTable::itu()?)
    }

    pub fn rain(&self) -> &RainAttenuation {
        &self.rain
    }

    pub fn params(&self) -> &SnowParameters {
        &self.params
    }

    pub fn table(&self) -> &RainHeightTable {
        &self.table
    }

    pub fn mean_annual_rain_height(&self) -> f64 {
        self.params.h0 + RAIN_HEIGHT_OFFSET
    }

    /// height of the centre of the path above sea level
    pub fn rain_height(&self, h_tx: f64, h_rx: f64, distance: f64) -> f64 {
        let h1 = h_tx + self.params.altitude;
        let h2 = h_rx + self.params.altitude;
        let dist = Meters::confine(distance).kilometers();
        0.5 * (h1 + h2) - dist.powi(2) / CURVATURE
    }

    /// strength of the wet snow contribution for a link `delta_height` above the rain height
    pub fn attenuation_multiplier(delta_height: f64) -> f64 {
        if delta_height > 0.0 {
            0.0
        } else if delta_height >= MELT_DEPTH {
            let melt = 4.0 * (1.0 - (delta_height / 70.0).exp()).powi(2);
            let spread = (1.0 - (-(delta_height / 600.0).powi(2)).exp()).powi(2);
            let denom = 1.0 + spread * (melt - 1.0);
            melt / denom
        } else {
            1.0
        }
    }

    /// integrate the multiplier over every rain height interval of the table
    pub fn snow_attenuation_factor(&self, mean_rain_height: f64, link_height: f64) -> f64 {
        self.table
            .bins()
            .iter()
            .enumerate()
            .map(|(j, bin)| {
                let rain_height = mean_rain_height + BIN_LOWEST + BIN_STEP * j as f64;
                Self::attenuation_multiplier(link_height - rain_height) * bin.probability
            })
            .sum::<f64>()
    }

    pub fn snow_attenuation(
        &self,
        distance: f64,
        frequency: f64,
        h_tx: f64,
        h_rx: f64,
    ) -> Result<f64, AttenuationError> {
        check_path(distance, frequency)?;
        finite("transmitter height", h_tx)?;
        finite("receiver height", h_rx)?;

        let link_height = self.rain_height(h_tx, h_rx, distance);
        let mean_rain_height = self.mean_annual_rain_height();
        let rain = self.rain.rain_attenuation(distance, frequency)?;

        if link_height <= mean_rain_height - SNOW_FREE_DEPTH {
            debug!("link at {} m is not affected by wet snow", link_height);
            Ok(rain)
        } else {
            let factor = self.snow_attenuation_factor(mean_rain_height, link_height);
            debug!(
                "link at {} m is affected by wet snow, factor {}",
                link_height, factor
            );
            trace!("rain {} dB, rain and snow {} dB", rain, rain * factor);
            Ok(rain * factor)
        }
    }
}

impl Attenuation for SnowAttenuation {
    fn attenuation(&self, link: &LinkGeometry) -> Result<Decibels, AttenuationError> {
        self.snow_attenuation(link.distance, link.frequency, link.h_tx, link.h_rx)
            .map(Decibels::confine)
    }
}
