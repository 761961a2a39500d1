//! Plain-text rendering of a scan for the terminal.

use std::io::{self, Write};

use vaxscan_core::{DateWindow, PlaceResult, PostalCode, ScanReport};

const SEPARATOR: &str = "---------------------------";

/// Writes the pre-scan banner describing what is being searched.
pub(crate) fn render_banner(
    out: &mut impl Write,
    window: &DateWindow,
    days: u32,
    max_distance_km: u32,
    postal_code: &PostalCode,
) -> io::Result<()> {
    writeln!(
        out,
        "Looking for available appointments in the next {days} days (up to {})",
        window.end
    )?;
    writeln!(out, "Within {max_distance_km} km of postal code {postal_code}")
}

/// Writes every place with availability, then the summary and any failed
/// places. Returns the number of slots printed.
pub(crate) fn render(report: &ScanReport, out: &mut impl Write) -> io::Result<usize> {
    let mut printed = 0;
    for result in &report.results {
        printed += render_place(result, out)?;
    }

    if printed == 0 {
        writeln!(
            out,
            "\nWe didn't find any availabilities with the specified criteria, try again later, places open frequently"
        )?;
    } else {
        writeln!(out, "\n\nWe found {printed} availabilities !")?;
        writeln!(
            out,
            "Click on the provided link and fill up the forms quickly before these places get taken..."
        )?;
        writeln!(
            out,
            "Thanks to the Quebec government for not implementing a good reservation system..."
        )?;
    }

    if !report.failures.is_empty() {
        writeln!(
            out,
            "\n{} centre(s) could not be queried:",
            report.failures.len()
        )?;
        for f in &report.failures {
            writeln!(
                out,
                "    {}  ---  {:.2} km (establishment {}): {}",
                f.name, f.distance_km, f.establishment_id, f.reason
            )?;
        }
    }

    Ok(printed)
}

fn render_place(result: &PlaceResult, out: &mut impl Write) -> io::Result<usize> {
    if !result.has_availability() {
        return Ok(0);
    }

    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "{}  ---  {:.2} km", result.name, result.distance_km)?;
    writeln!(out, "{}", result.booking_url)?;

    let mut printed = 0;
    for day in &result.availabilities {
        writeln!(out, "    {}", day.date)?;
        for slot in &day.time_slots {
            writeln!(out, "        {}", slot.format("%H:%M"))?;
            printed += 1;
        }
    }
    Ok(printed)
}
