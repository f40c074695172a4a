use time::{
    error::{Parse, ParseFromDescription},
    format_description::FormatItem,
    macros::format_description,
    Date, PrimitiveDateTime, Time,
};

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
pub const DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(
    pub iso_datetime,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);

// `[year]` takes an optional sign; the wire form is four bare digits.
fn unsigned_year(text: &str) -> Result<(), Parse> {
    match text.as_bytes().first() {
        Some(b) if b.is_ascii_digit() => Ok(()),
        _ => Err(ParseFromDescription::InvalidComponent("year").into()),
    }
}

pub fn parse_date(text: &str) -> Result<Date, Parse> {
    unsigned_year(text)?;
    Date::parse(text, DATE_FORMAT)
}

/// Accepts a full `YYYY-MM-DD HH:MM:SS` stamp or a bare date meaning midnight.
pub fn parse_datetime_bound(text: &str) -> Result<PrimitiveDateTime, Parse> {
    unsigned_year(text)?;
    PrimitiveDateTime::parse(text, DATETIME_FORMAT)
        .or_else(|_| parse_date(text).map(|d| PrimitiveDateTime::new(d, Time::MIDNIGHT)))
}

/// Current UTC wall clock truncated to whole seconds, the resolution clients see.
pub fn now_utc() -> PrimitiveDateTime {
    let now = time::OffsetDateTime::now_utc();
    let now = now.replace_nanosecond(0).unwrap_or(now);
    PrimitiveDateTime::new(now.date(), now.time())
}
