//! Fixed weekly time grid. Slot 1 is the only 60-minute slot; all others are 50 minutes.

pub const DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
pub const SLOTS_PER_DAY: u32 = 13;

/// Slots 5, 6, 7 (1-indexed) make up the lunch window.
pub const LUNCH_SLOTS: [u32; 3] = [5, 6, 7];

/// `(start, end)` in 24h `HH:MM` for each 1-indexed slot.
pub const SLOT_WINDOWS: [(&str, &str); 13] = [
    ("08:00", "09:00"),
    ("09:00", "09:50"),
    ("09:50", "10:40"),
    ("10:40", "11:30"),
    ("11:30", "12:20"),
    ("12:20", "13:10"),
    ("13:10", "14:00"),
    ("14:00", "14:50"),
    ("14:50", "15:40"),
    ("15:40", "16:30"),
    ("16:30", "17:20"),
    ("17:20", "18:10"),
    ("18:10", "19:00"),
];

/// Formats a 1-indexed slot's window as `"HH:MM - HH:MM"`. Panics on out-of-range input, which would
/// indicate a bug in the reducer rather than a user-facing condition.
pub fn slot_time_range(slot: u32) -> String {
    let (start, end) = SLOT_WINDOWS[(slot - 1) as usize];
    format!("{start} - {end}")
}

pub fn is_lunch_slot(slot: u32) -> bool {
    LUNCH_SLOTS.contains(&slot)
}
