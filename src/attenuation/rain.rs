use crate::{
    attenuation::{Attenuation, LinkGeometry},
    error::{finite, AttenuationError},
    units::{Decibels, Hertz, Meters, Unit},
    vars::*,
};
use log::trace;

/// rain intensity and the ITU-R P.838-3 regression coefficients
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RainParameters {
    /// rain intensity in mm/h
    pub rain_rate: f64,
    pub k: f64,
    pub alpha: f64,
}

impl RainParameters {
    pub fn validate(&self) -> Result<(), AttenuationError> {
        finite("rain rate", self.rain_rate)?;
        finite("k", self.k)?;
        finite("alpha", self.alpha)?;
        if self.rain_rate < 0.0 {
            return Err(AttenuationError::NegativeRainRate(self.rain_rate));
        }
        Ok(())
    }
}

/// attenuation caused by rain along a terrestrial link
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RainAttenuation {
    params: RainParameters,
}

/// limit the distance factor to its ITU-R P.530-17 maximum
fn distance_factor_clamp(denom: f64) -> f64 {
    if denom < FACTOR_THRESHOLD {
        FACTOR_MAX
    } else {
        denom.recip()
    }
}

impl RainAttenuation {
    pub fn new(params: RainParameters) -> Result<Self, AttenuationError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RainParameters {
        &self.params
    }

    /// specific attenuation in dB/km, zero whenever it does not rain (including 0^0)
    pub fn specific_attenuation(&self) -> f64 {
        if self.params.rain_rate == 0.0 {
            return 0.0;
        }
        self.params.k * self.params.rain_rate.powf(self.params.alpha)
    }

    /// correction for the inhomogeneity of rain along the path, `frequency` in Hz and `distance` in km
    pub fn distance_factor(&self, frequency: f64, distance: f64) -> Result<f64, AttenuationError> {
        check_path(distance, frequency)?;
        let RainParameters {
            rain_rate, alpha, ..
        } = self.params;
        let denom = 0.477
            * distance.powf(0.633)
            * rain_rate.powf(0.073 * alpha)
            * Hertz::confine(frequency).gigahertz().powf(0.123)
            - 10.579 * (1.0 - (-0.024 * distance).exp());
        Ok(distance_factor_clamp(denom))
    }

    /// path attenuation in dB for `distance` in m and `frequency` in Hz
    pub fn rain_attenuation(&self, distance: f64, frequency: f64) -> Result<f64, AttenuationError> {
        check_path(distance, frequency)?;
        let dist = Meters::confine(distance).kilometers();
        let factor = self.distance_factor(frequency, dist)?;
        let atten = self.specific_attenuation() * dist * factor;
        trace!(
            "rain attenuation over {} km: factor {} atten {} dB",
            dist,
            factor,
            atten
        );
        Ok(atten)
    }
}

/// reject geometries the regression formulas are undefined for
pub(crate) fn check_path(distance: f64, frequency: f64) -> Result<(), AttenuationError> {
    finite("distance", distance)?;
    finite("frequency", frequency)?;
    if distance < 0.0 {
        return Err(AttenuationError::NegativeDistance(distance));
    }
    if frequency <= 0.0 {
        return Err(AttenuationError::NonPositiveFrequency(frequency));
    }
    Ok(())
}

impl Attenuation for RainAttenuation {
    fn attenuation(&self, link: &LinkGeometry) -> Result<Decibels, AttenuationError> {
        self.rain_attenuation(link.distance, link.frequency)
            .map(Decibels::confine)
    }
}
