use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use hydrometeor::{
    attenuation_trace, AttenuationConfig, AttenuationError, LinkGeometry, Precipitation,
    RainHeightTable, RainParameters, SnowParameters, Unit, WeatherModel,
};
use log::info;
use std::sync::Arc;

fn number(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("VALUE")
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .help(help)
}

fn cli() -> Command {
    Command::new("hydrometeor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rain and wet snow attenuation of a terrestrial radio link")
        .color(ColorChoice::Auto)
        .next_help_heading("Weather")
        .arg(number("rain-rate", "Rain intensity in mm/h").default_value("0"))
        .arg(
            number("k", "Regression coefficient k")
                .short('k')
                .default_value("0"),
        )
        .arg(number("alpha", "Regression coefficient alpha").default_value("0"))
        .arg(number("altitude", "Altitude in meters above the sea level").default_value("0"))
        .arg(
            number("h0", "Mean annual 0C isotherm height above mean sea level")
                .default_value("0"),
        )
        .arg(
            Arg::new("snow")
                .long("snow")
                .action(ArgAction::SetTrue)
                .help("Compute the attenuation from combined rain and wet snow"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .value_name("FILE")
                .help("Rain height probability table, defaults to ITU-R P.530 Table 1"),
        )
        .next_help_heading("Link")
        .arg(number("frequency", "Carrier frequency in Hz").default_value("60e9"))
        .arg(number("h-tx", "Transmitter height in meters").default_value("0"))
        .arg(number("h-rx", "Receiver height in meters").default_value("0"))
        .arg(
            number("distance", "Distance between the terminals in meters")
                .short('d')
                .action(ArgAction::Append)
                .required(true),
        )
}

fn value(matches: &ArgMatches, name: &str) -> f64 {
    // every numeric argument carries a default or is required
    matches.get_one::<f64>(name).copied().unwrap_or_default()
}

fn main() -> Result<(), AttenuationError> {
    pretty_env_logger::init_timed();
    let matches = cli().get_matches();

    let config = AttenuationConfig {
        rain: RainParameters {
            rain_rate: value(&matches, "rain-rate"),
            k: value(&matches, "k"),
            alpha: value(&matches, "alpha"),
        },
        snow: SnowParameters {
            altitude: value(&matches, "altitude"),
            h0: value(&matches, "h0"),
        },
        precipitation: Precipitation::from(matches.get_flag("snow")),
    };
    info!("initialising {:?} model", config.precipitation);

    let model = match matches.get_one::<String>("table") {
        Some(path) => WeatherModel::with_table_source(&config, || {
            RainHeightTable::from_path(path).map(Arc::new)
        })?,
        None => WeatherModel::from_config(&config)?,
    };

    let links = matches
        .get_many::<f64>("distance")
        .into_iter()
        .flatten()
        .map(|&distance| LinkGeometry {
            distance,
            frequency: value(&matches, "frequency"),
            h_tx: value(&matches, "h-tx"),
            h_rx: value(&matches, "h-rx"),
        })
        .collect::<Vec<LinkGeometry>>();

    let trace = attenuation_trace(&model, &links)?;
    for (link, atten) in links.iter().zip(trace) {
        println!("{} {}", link.distance, atten.release());
    }
    info!("attenuation completed");
    Ok(())
}
