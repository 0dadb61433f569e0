// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deciding which sender owns the export.
//!
//! The assembler only sees a predicate; these helpers build the usual ones.

use std::collections::BTreeSet;

use chatscribe_core::MessageRecord;
use tracing::debug;

/// Predicate telling whether a sender is the export's owner.
pub type OwnerPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Minimum digit count for phone-number matching.
const MIN_PHONE_DIGITS: usize = 4;

/// Owner is the sender whose name equals `user_name` exactly.
pub fn configured_owner(user_name: impl Into<String>) -> OwnerPredicate {
    let user_name = user_name.into();
    Box::new(move |sender: &str| sender == user_name)
}

/// Nobody is the owner; every authored message renders as `other`.
pub fn no_owner() -> OwnerPredicate {
    Box::new(|_: &str| false)
}

/// Infers the owner from the chat title.
///
/// The title (e.g. `WhatsApp Chat with Bob`) names the contact, i.e. the
/// *other* party. In a chat with exactly two senders, the one that is not
/// the contact is the owner. Group chats and unmatched titles have no owner.
pub fn detect_owner(
    chat_title: &str,
    title_prefix: &str,
    records: &[MessageRecord],
) -> OwnerPredicate {
    match detect_owner_name(chat_title, title_prefix, records) {
        Some(owner) => {
            debug!(owner = %owner, "detected export owner");
            configured_owner(owner)
        }
        None => no_owner(),
    }
}

/// Name-returning variant of [`detect_owner`].
pub fn detect_owner_name(
    chat_title: &str,
    title_prefix: &str,
    records: &[MessageRecord],
) -> Option<String> {
    let contact = chat_title
        .strip_prefix(title_prefix)
        .unwrap_or(chat_title)
        .trim();
    if contact.is_empty() {
        return None;
    }

    let senders: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.sender.as_deref())
        .collect();
    if senders.len() != 2 {
        return None;
    }

    let contact_sender = senders.iter().find(|s| matches_contact(contact, s))?;
    senders
        .iter()
        .find(|s| *s != contact_sender)
        .map(|s| s.to_string())
}

fn matches_contact(contact: &str, sender: &str) -> bool {
    let contact_lower = contact.to_lowercase();
    let sender_lower = sender.to_lowercase();
    if contact_lower.contains(&sender_lower) || sender_lower.contains(&contact_lower) {
        return true;
    }

    let contact_digits = digits(contact);
    let sender_digits = digits(sender);
    contact_digits.len() >= MIN_PHONE_DIGITS
        && sender_digits.len() >= MIN_PHONE_DIGITS
        && (contact_digits.contains(&sender_digits) || sender_digits.contains(&contact_digits))
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}
