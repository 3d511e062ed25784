/* # attenuation */

/* ## rain */

pub const GIGA: f64 = 1e9; // hertz in a gigahertz
pub const KILO: f64 = 1e3; // meters in a kilometer
pub const FACTOR_THRESHOLD: f64 = 0.4; // smallest denominator taken as is
pub const FACTOR_MAX: f64 = 2.5; // distance factor ceiling, ITU-R P.530-17

/* ## snow */

pub const RAIN_HEIGHT_OFFSET: f64 = 360.0; // mean rain height above the 0C isotherm
pub const CURVATURE: f64 = 17.0; // earth curvature correction, km^2 per m
pub const SNOW_FREE_DEPTH: f64 = 3600.0; // below this depth under the rain height there is no wet snow
pub const MELT_DEPTH: f64 = -1200.0; // lower edge of the melting layer

/* ## rain height table */

pub const BIN_COUNT: usize = 49; // intervals of rain height variability
pub const BIN_STEP: f64 = 100.0; // width of a single interval
pub const BIN_LOWEST: f64 = -2400.0; // offset of the first interval from the mean rain height
pub const PROB_TOLERANCE: f64 = 1e-3; // accepted deviation of the probability sum from unity
