// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side identifier generation for records created offline.
//!
//! Message IDs are the creation time in milliseconds. PDF and queue item IDs
//! append a short random base-36 suffix so two files stored in the same
//! millisecond do not collide.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Length of the random suffix appended to PDF and queue item IDs.
pub const SUFFIX_LEN: usize = 9;

/// Generate a message ID from its creation time.
pub fn message_id(created_at: &DateTime<Utc>) -> String {
    created_at.timestamp_millis().to_string()
}

/// Generate a PDF ID: creation time in milliseconds followed by a random suffix.
pub fn pdf_id(created_at: &DateTime<Utc>) -> String {
    format!("{}{}", created_at.timestamp_millis(), random_suffix(SUFFIX_LEN))
}

/// Generate a sync queue item ID.
pub fn queue_item_id(created_at: &DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        created_at.timestamp_millis(),
        random_suffix(SUFFIX_LEN)
    )
}

/// Random lowercase base-36 string of the given length.
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect()
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
