use std::process::ExitCode;

use chrono::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cycling_portal::domain::{PortalError, RaceId, RiderId};
use cycling_portal::store::Portal;

/// Environment variable naming the portal file when no argument is given.
const PORTAL_FILE_VAR: &str = "CYCLING_PORTAL_FILE";

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cycling_portal=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let Some(path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(PORTAL_FILE_VAR).ok())
    else {
        eprintln!("usage: cycling-portal <portal.json>  (or set {PORTAL_FILE_VAR})");
        return ExitCode::FAILURE;
    };

    let portal = match Portal::load(&path) {
        Ok(portal) => portal,
        Err(e) => {
            error!(%path, "failed to load portal: {e}");
            return ExitCode::FAILURE;
        }
    };

    for race in portal.race_ids() {
        if let Err(e) = print_race(&portal, race) {
            error!(race = %race, "failed to classify race: {e}");
            return ExitCode::FAILURE;
        }
    }

    info!(races = portal.race_ids().len(), "report complete");
    ExitCode::SUCCESS
}

fn print_race(portal: &Portal, race: RaceId) -> Result<(), PortalError> {
    let details = portal.view_race_details(race)?;
    let standings = portal.classifier().race_standings(race)?;

    println!("{details}");
    if standings.is_empty() {
        println!("  no results yet");
        println!();
        return Ok(());
    }

    println!("  General classification");
    for (i, rider) in standings.riders.iter().enumerate() {
        println!(
            "  {:>3}. {:<30} {}",
            i + 1,
            rider_name(portal, *rider),
            format_duration(standings.times[i])
        );
    }

    print_points(
        "Points classification",
        portal,
        &standings.riders,
        &standings.points,
        &standings.points_order(),
    );
    print_points(
        "Mountain classification",
        portal,
        &standings.riders,
        &standings.mountain_points,
        &standings.mountain_order(),
    );
    println!();
    Ok(())
}

/// Print riders in `order` with their entry from `points`, which is
/// aligned with `riders`.
fn print_points(title: &str, portal: &Portal, riders: &[RiderId], points: &[u32], order: &[RiderId]) {
    println!("  {title}");
    for (place, rider) in order.iter().enumerate() {
        let Some(i) = riders.iter().position(|r| r == rider) else {
            continue;
        };
        println!(
            "  {:>3}. {:<30} {:>4} pts",
            place + 1,
            rider_name(portal, *rider),
            points[i]
        );
    }
}

fn rider_name(portal: &Portal, id: RiderId) -> String {
    portal
        .rider(id)
        .map(|r| r.name().to_string())
        .unwrap_or_else(|| format!("rider {id}"))
}

/// Format as `h:mm:ss`, with milliseconds when present.
fn format_duration(d: Duration) -> String {
    let total_ms = d.num_milliseconds();
    let (secs, ms) = (total_ms / 1000, total_ms % 1000);
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if ms == 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{h}:{m:02}:{s:02}.{ms:03}")
    }
}
