//! Console table rendering for the ranked office list.

use dmvscout_core::OfficeRecord;

const ADDRESS_WIDTH: usize = 50;

/// Renders the offices as a pipe-separated table, one row per office:
/// name, address, travel time, earliest available date, and date count.
///
/// The same string is printed to the console and used as the email body.
#[must_use]
pub(crate) fn render_table(offices: &[OfficeRecord]) -> String {
    let name_width = offices
        .iter()
        .map(|o| o.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    push_row(
        &mut out,
        name_width,
        "NAME",
        "ADDRESS",
        "DISTANCE",
        "EARLIEST",
        "AVAIL_DATES",
    );
    out.push_str(&format!(
        "{}|{}|{}|{}|{}\n",
        "-".repeat(name_width + 1),
        "-".repeat(ADDRESS_WIDTH + 2),
        "-".repeat(10),
        "-".repeat(13),
        "-".repeat(12),
    ));

    for office in offices {
        push_row(
            &mut out,
            name_width,
            &office.name,
            office.address.as_deref().unwrap_or(""),
            &format_travel(office.travel_secs),
            &format_earliest(office),
            &office.dates_available.len().to_string(),
        );
    }
    out
}

fn push_row(
    out: &mut String,
    name_width: usize,
    name: &str,
    address: &str,
    travel: &str,
    earliest: &str,
    count: &str,
) {
    let address: String = address.chars().take(ADDRESS_WIDTH).collect();
    out.push_str(&format!(
        "{name:<name_width$} | {address:<ADDRESS_WIDTH$} | {travel:<8} | {earliest:<11} | {count}\n"
    ));
}

/// Seconds to `HH:MM:SS`; `N/A` when no travel time was attached.
fn format_travel(travel_secs: Option<u64>) -> String {
    match travel_secs {
        Some(secs) => format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ),
        None => "N/A".to_owned(),
    }
}

/// Earliest available date as `%b %d %Y`; `N/A` when the office showed no
/// availability.
fn format_earliest(office: &OfficeRecord) -> String {
    office
        .earliest_date()
        .map_or_else(|| "N/A".to_owned(), |d| d.format("%b %d %Y").to_string())
}
