use trainbus_transit::prelude::*;

const METRES_PER_MILE: f64 = 1609.34;

pub fn print_nearby(nearby: &[NearbyStop]) {
    for stop in nearby {
        let abbreviation = stop.stop.alias.as_deref().unwrap_or("-");
        println!(
            "{:<40} {:>6}  {:>8.0} m  {:>6.2} mi",
            stop.stop.name,
            abbreviation,
            stop.distance_m,
            stop.distance_m / METRES_PER_MILE
        );
    }
}

pub fn print_connecting_trips(trips: &[ConnectingTrip]) {
    for trip in trips {
        println!("{:<16} {} (direction {})", trip.trip_id.as_str(), trip.headsign, trip.direction);
    }
}

pub fn print_connecting_routes(routes: &[ConnectingRoute]) {
    for route in routes {
        println!(
            "{:<12} {:<12} {}",
            route.route.id.as_str(), route.route.short_name, route.route.long_name
        );
    }
}

pub fn print_catalog(catalog: &[RouteSummary]) {
    for summary in catalog {
        println!("{} {}", summary.route.short_name, summary.route.long_name);
        for direction in &summary.directions {
            println!("  direction {}: {}", direction.direction, direction.stop_names.join(" > "));
        }
    }
}

pub fn print_stations(stations: &[StationRoutes]) {
    for station in stations {
        println!("{}", station.name);
        for long_name in &station.route_long_names {
            println!("  {long_name}");
        }
    }
}
