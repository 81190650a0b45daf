use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use shared::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Start time of a bookable slot, labelled `HH:MM`.
///
/// Slots are minute-granular; seconds never appear. Ordering follows the
/// clock, so sorted collections list slots in booking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }

    fn minutes_from_midnight(self) -> i64 {
        i64::from(self.0.hour()) * 60 + i64::from(self.0.minute())
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotTime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| AppError::InvalidInput(format!("`{s}` is not a valid HH:MM time")))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Builds the slot grid for one service day.
///
/// Slots start at `open` and repeat every `duration_minutes`; a slot is only
/// included if it ends at or before `close`. The result is sorted and free of
/// duplicates by construction.
pub fn generate_slots(open: SlotTime, close: SlotTime, duration_minutes: u32) -> Vec<SlotTime> {
    if duration_minutes == 0 {
        return Vec::new();
    }
    let step = i64::from(duration_minutes);
    let open_minutes = open.minutes_from_midnight();
    let close_minutes = close.minutes_from_midnight();
    let mut slots = Vec::new();
    let mut offset = 0;
    while open_minutes + offset + step <= close_minutes {
        let (time, _) = open
            .time()
            .overflowing_add_signed(chrono::Duration::minutes(offset));
        slots.push(SlotTime(time));
        offset += step;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> SlotTime {
        s.parse().unwrap()
    }

    #[test]
    fn morning_window_yields_the_full_grid() {
        let slots = generate_slots(t("09:00"), t("13:00"), 15);
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first().copied(), Some(t("09:00")));
        assert_eq!(slots.last().copied(), Some(t("12:45")));
        assert!(slots.contains(&t("10:30")));
    }

    #[test]
    fn last_slot_must_end_by_close() {
        // 09:50 + 25min would end past 10:00, so the grid stops at 09:25.
        assert_eq!(
            generate_slots(t("09:00"), t("10:00"), 25),
            vec![t("09:00"), t("09:25")]
        );
        // A slot ending exactly at close is kept.
        assert_eq!(
            generate_slots(t("09:00"), t("10:00"), 30),
            vec![t("09:00"), t("09:30")]
        );
    }

    #[test]
    fn window_shorter_than_one_slot_yields_nothing() {
        assert!(generate_slots(t("10:00"), t("10:10"), 15).is_empty());
    }

    #[test]
    fn degenerate_windows_yield_nothing() {
        assert!(generate_slots(t("09:00"), t("09:00"), 15).is_empty());
        assert!(generate_slots(t("13:00"), t("09:00"), 15).is_empty());
        assert!(generate_slots(t("09:00"), t("13:00"), 0).is_empty());
    }

    #[test]
    fn labels_are_zero_padded() {
        assert_eq!(t("09:05").to_string(), "09:05");
        assert_eq!(SlotTime::from_hm(7, 0).unwrap().to_string(), "07:00");
    }

    #[test]
    fn parse_rejects_out_of_range_times() {
        assert!("25:00".parse::<SlotTime>().is_err());
        assert!("09:60".parse::<SlotTime>().is_err());
        assert!("morning".parse::<SlotTime>().is_err());
    }

    #[test]
    fn serde_uses_the_label_form() {
        let json = serde_json::to_string(&t("09:00")).unwrap();
        assert_eq!(json, r#""09:00""#);
        let back: SlotTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("09:00"));
    }
}
