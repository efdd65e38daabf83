use chrono::{DateTime, Datelike, Utc};

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Render a timestamp as a French long date, e.g. `15 janvier 2024`.
///
/// The date is taken in UTC.
///
/// ```
/// use blog_api::util::format_date_fr;
/// use chrono::{TimeZone, Utc};
///
/// let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// assert_eq!(format_date_fr(&date), "15 janvier 2024");
/// ```
pub fn format_date_fr(date: &DateTime<Utc>) -> String {
    let month = MONTHS_FR[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}
