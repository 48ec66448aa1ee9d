use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geo::Point;
use std::path::PathBuf;

use trainbus_transit::prelude::*;

mod output;

use output::{print_catalog, print_connecting_routes, print_connecting_trips, print_nearby, print_stations};

#[derive(Parser, Debug)]
#[command(
    name = "gtfs-query",
    author,
    version,
    about = "Query a GTFS feed directory from the command line",
    long_about = "Loads stops.txt, routes.txt, trips.txt and stop_times.txt from a feed \
                  directory, builds the station and spatial indices, and answers one query.\n\n\
                  Station names match case-insensitively. An unknown name prints nothing."
)]
struct Args {
    /// GTFS feed directory
    #[arg(short, long, default_value = "gtfs")]
    feed: PathBuf,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stations within a radius of a point, nearest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in metres
        #[arg(short, long, default_value = "1000")]
        radius: f64,
    },

    /// Services (headsign and direction) calling at a station
    Through { station: String },

    /// Trips calling at the origin and later at the destination
    Trips { origin: String, destination: String },

    /// Routes connecting two stations in one direction
    Routes {
        origin: String,
        destination: String,
        direction: String,
    },

    /// Abbreviations of live departures from the origin that reach the destination
    Departures { origin: String, destination: String },

    /// Stations a trip calls at after the given stop id
    After { trip: String, stop: String },

    /// Every route with the stations of each direction
    Catalog,

    /// Every station with the routes serving it
    Stations,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if !args.feed.is_dir() {
        bail!("Feed directory does not exist: {}", args.feed.display());
    }
    let source = CsvFeedSource::from_dir(&args.feed);
    log::info!("Feed: {}", source.config().dir().display());

    let feed = source.load().context("Failed to load GTFS feed")?;
    let provider = StaticTransitProvider::from_feed(feed, AliasMap::bart());

    match args.command {
        Command::Nearby { lat, lon, radius } => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                bail!("Not a valid position: {lat}, {lon}");
            }
            if !radius.is_finite() || radius < 0.0 {
                bail!("Radius must be a non-negative number of metres, got {radius}");
            }
            print_nearby(&provider.stops_near(Point::new(lon, lat), radius));
        }
        Command::Through { station } => {
            for service in provider.trips_through_station(&station) {
                println!("{} (direction {})", service.headsign, service.direction);
            }
        }
        Command::Trips { origin, destination } => {
            print_connecting_trips(&provider.connecting_trips(&origin, &destination));
        }
        Command::Routes {
            origin,
            destination,
            direction,
        } => {
            let direction = DirectionId::new(direction);
            print_connecting_routes(&provider.connecting_routes(&origin, &destination, &direction));
        }
        Command::Departures { origin, destination } => {
            let filter = provider.connection_filter(&origin, &destination);
            if filter.is_empty() {
                log::info!("No trains from {origin} reach {destination}");
            }
            for abbreviation in filter.abbreviations() {
                println!("{abbreviation}");
            }
        }
        Command::After { trip, stop } => {
            for name in provider.stops_after(&trip, &stop) {
                println!("{name}");
            }
        }
        Command::Catalog => print_catalog(&provider.route_catalog()),
        Command::Stations => print_stations(&provider.station_routes()),
    }

    Ok(())
}
