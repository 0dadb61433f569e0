// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser behavior against the bundled locale tables.

use chatscribe_config::locale::bundled_locale;
use chatscribe_core::AttachmentKind;
use chatscribe_parser::{classify, parse, ExportParser, Line, Manifest, PatternTable};
use chrono::NaiveDate;
use proptest::prelude::*;

fn table(code: &str) -> PatternTable {
    let locale = bundled_locale(code).unwrap();
    PatternTable::new(
        &locale.patterns.attached_file,
        &locale.patterns.header_formats,
    )
    .unwrap()
}

fn manifest(names: &[&str]) -> Manifest {
    names.iter().copied().collect()
}

#[test]
fn single_attachment_message() {
    let records = parse(
        "3/1/24, 10:05 - Alice: IMG-01.jpg (file attached)",
        &manifest(&["IMG-01.jpg"]),
        &table("en"),
    );

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.sender.as_deref(), Some("Alice"));
    assert_eq!(
        record.timestamp,
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 5, 0)
            .unwrap()
    );
    let attachment = record.attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "IMG-01.jpg");
    assert_eq!(attachment.kind, AttachmentKind::Image);
    assert!(!attachment.missing);
    assert_eq!(record.body, vec!["IMG-01.jpg (file attached)"]);
}

#[test]
fn continuation_lines_are_appended() {
    let raw = "3/1/24, 10:05 - Alice: IMG-01.jpg (file attached)\nsee you there\n";
    let records = parse(raw, &manifest(&["IMG-01.jpg"]), &table("en"));

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].body,
        vec!["IMG-01.jpg (file attached)", "see you there"]
    );
}

#[test]
fn lines_before_first_header_are_discarded() {
    let raw = "garbage\nmore garbage\n3/1/24, 10:05 - Alice: hi\n";
    let outcome = ExportParser::new(&table("en")).parse(raw, &Manifest::new());
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.discarded_lines, 2);
}

#[test]
fn system_notice_has_no_sender() {
    let raw = "3/1/24, 09:00 - Messages and calls are end-to-end encrypted.\n\
               3/1/24, 09:01 - Bob: hello";
    let records = parse(raw, &Manifest::new(), &table("en"));
    assert_eq!(records.len(), 2);
    assert!(records[0].is_system());
    assert_eq!(records[1].sender.as_deref(), Some("Bob"));
}

#[test]
fn meridiem_and_crlf() {
    let raw = "\u{FEFF}12/31/23, 11:59 PM - Carol: late\r\n1/1/24, 12:00 AM - Carol: early\r\n";
    let records = parse(raw, &Manifest::new(), &table("en"));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].body, vec!["late"]);
    assert_eq!(
        records[0].timestamp,
        NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap()
    );
    assert_eq!(
        records[1].timestamp,
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
}

#[test]
fn ios_layout_with_seconds() {
    let raw = "[25/12/2023, 18:30:12] Dario: Buon Natale\n[25/12/2023, 18:31:00] Dario: \u{200E}<attached: 00000012-PHOTO.jpg>";
    let records = parse(raw, &manifest(&["00000012-PHOTO.jpg"]), &table("it"));
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].body, vec!["Buon Natale"]);
    let attachment = records[1].attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "00000012-PHOTO.jpg");
    assert!(!attachment.missing);
}

#[test]
fn italian_day_first_dates() {
    let raw = "13/02/24, 08:15 - Marco: PTT-20240213-WA0001.opus (file allegato)";
    let records = parse(raw, &Manifest::new(), &table("it"));
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].timestamp.date(),
        NaiveDate::from_ymd_opt(2024, 2, 13).unwrap()
    );
    let attachment = records[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.kind, AttachmentKind::Audio);
    assert!(attachment.missing);
}

#[test]
fn swapped_date_order_is_tolerated() {
    // Month-first locale, but 25 cannot be a month.
    let records = parse("25/12/23, 18:30 - Ann: hi", &Manifest::new(), &table("en"));
    assert_eq!(
        records[0].timestamp.date(),
        NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
    );
}

#[test]
fn impossible_date_is_a_continuation() {
    let raw = "3/1/24, 10:05 - Alice: hi\n31/31/24, 10:06 - Alice: nope";
    let records = parse(raw, &Manifest::new(), &table("en"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body.len(), 2);
}

#[test]
fn empty_header_text_is_retained() {
    let records = parse("3/1/24, 10:05 - Alice:", &Manifest::new(), &table("en"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body, vec![""]);
    assert!(records[0].attachment.is_none());
}

#[test]
fn attachment_name_with_spaces_resolves_against_manifest() {
    let records = parse(
        "3/1/24, 10:05 - Alice: Trip Plan.pdf (file attached)",
        &manifest(&["Trip Plan.pdf", "Plan.pdf.bak"]),
        &table("en"),
    );
    let attachment = records[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "Trip Plan.pdf");
    assert_eq!(attachment.kind, AttachmentKind::Document);
    assert!(!attachment.missing);
}

#[test]
fn unresolved_marker_keeps_last_token_as_missing() {
    let records = parse(
        "3/1/24, 10:05 - Alice: Trip Plan.pdf (file attached)",
        &Manifest::new(),
        &table("en"),
    );
    let attachment = records[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.filename, "Plan.pdf");
    assert!(attachment.missing);
}

#[test]
fn quoted_colon_in_system_notice_is_not_a_sender() {
    let raw = "3/1/24, 09:00 - Alice changed the subject to \"Trip: Rome\"\n\
               3/1/24, 09:01 - Bob: hello";
    let records = parse(raw, &Manifest::new(), &table("en"));
    assert_eq!(records.len(), 2);
    assert!(records[0].is_system());
    assert_eq!(
        records[0].body,
        vec!["Alice changed the subject to \"Trip: Rome\""]
    );
    assert_eq!(records[1].sender.as_deref(), Some("Bob"));
}

#[test]
fn first_attachment_wins() {
    let raw = "3/1/24, 10:05 - Alice: a.jpg (file attached)\nb.opus (file attached)";
    let records = parse(raw, &manifest(&["a.jpg", "b.opus"]), &table("en"));
    assert_eq!(records[0].attachment.as_ref().unwrap().filename, "a.jpg");
}

#[test]
fn classify_reports_state() {
    let table = table("en");
    assert!(matches!(classify(&table, "hello", false), Line::Unmatched("hello")));
    assert!(matches!(classify(&table, "hello", true), Line::Continuation("hello")));
    match classify(&table, "3/1/24, 10:05 - Alice: hi", false) {
        Line::Header(header) => {
            assert_eq!(header.sender, Some("Alice"));
            assert_eq!(header.text, "hi");
            assert_eq!(header.format, "android");
        }
        other => panic!("expected header, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn one_record_per_header(count in 1usize..40, extra in 0usize..4) {
        let mut raw = String::new();
        for i in 0..count {
            raw.push_str(&format!("3/1/24, 10:{:02} - User{}: message {}\n", i % 60, i, i));
            for j in 0..extra {
                raw.push_str(&format!("follow-up {j}\n"));
            }
        }
        let records = parse(&raw, &Manifest::new(), &table("en"));
        prop_assert_eq!(records.len(), count);
        for record in &records {
            prop_assert_eq!(record.body.len(), 1 + extra);
        }
    }

    #[test]
    fn never_panics_on_arbitrary_text(raw in "\\PC{0,200}") {
        let _ = parse(&raw, &Manifest::new(), &table("en"));
    }
}
