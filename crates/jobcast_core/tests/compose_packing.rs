use jobcast_core::{
    pack_entries, render_entry, Category, JobListing, MessageComposer, DEFAULT_FOOTER,
    DEFAULT_MESSAGE_LIMIT,
};
use pretty_assertions::assert_eq;

fn job(n: usize) -> JobListing {
    JobListing {
        title: format!("Engineer {n}"),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        link: format!("https://jobs.example.com/{n}"),
    }
}

#[test]
fn two_of_three_entries_fit_the_budget() {
    let header = "h".repeat(20);
    let entries = vec!["a".repeat(30), "b".repeat(30), "c".repeat(30)];
    let footer = "f".repeat(10);

    let message = pack_entries(header, entries, footer, 100);

    assert_eq!(message.entries, vec!["a".repeat(30), "b".repeat(30)]);
    assert_eq!(message.utf16_len(), 90);
    assert!(message.to_string().ends_with(&"f".repeat(10)));
}

#[test]
fn packing_stops_at_first_rejection() {
    let header = "h".repeat(10);
    let entries = vec!["a".repeat(30), "b".repeat(60), "c".repeat(5)];

    let message = pack_entries(header, entries, "f".repeat(10), 80);

    // "c" alone would fit, but nothing after a rejected entry is considered.
    assert_eq!(message.entries, vec!["a".repeat(30)]);
}

#[test]
fn accepted_entries_form_a_maximal_prefix() {
    let lengths = [17, 3, 42, 8, 25, 1, 60, 12, 9, 30];
    for limit in [0, 15, 40, 64, 100, 150, 220, 400] {
        let entries: Vec<String> = lengths.iter().map(|n| "x".repeat(*n)).collect();
        let message = pack_entries("H".repeat(12), entries.clone(), "F".repeat(7), limit);

        let accepted = message.entries.len();
        assert_eq!(message.entries[..], entries[..accepted], "limit {limit}");
        if 12 + 7 <= limit {
            assert!(message.utf16_len() <= limit, "limit {limit}");
        }
        if accepted < entries.len() {
            let projected = message.utf16_len() + entries[accepted].len();
            assert!(projected > limit, "limit {limit}: entry {accepted} would fit");
        }
    }
}

#[test]
fn header_and_footer_survive_zero_jobs() {
    let composer = MessageComposer::default();

    let message = composer.compose("Asha", Category::Backend, &[]);

    assert!(message.entries.is_empty());
    assert_eq!(
        message.to_string(),
        format!("👋 Hi Asha,\nHere are *BACKEND* jobs for you:\n\n{DEFAULT_FOOTER}")
    );
}

#[test]
fn header_and_footer_are_kept_when_they_alone_overflow() {
    let message = pack_entries("h".repeat(50), vec!["e".to_string()], "f".repeat(60), 100);

    assert!(message.entries.is_empty());
    assert_eq!(message.utf16_len(), 110);
}

#[test]
fn entries_have_fixed_field_layout() {
    let entry = render_entry(3, &job(7));

    assert_eq!(
        entry,
        "*3. Engineer 7*\n🏢 Acme\n📍 Remote\n🔗 https://jobs.example.com/7\n\n"
    );
}

#[test]
fn composed_message_respects_default_limit() {
    let jobs: Vec<JobListing> = (1..=10)
        .map(|n| JobListing {
            title: format!("Senior Staff Principal Frontend Platform Engineer {n} ").repeat(4),
            ..job(n)
        })
        .collect();
    let composer = MessageComposer::default();

    let message = composer.compose("Asha", Category::Frontend, &jobs);

    assert!(message.utf16_len() <= DEFAULT_MESSAGE_LIMIT);
    assert!(message.entry_count() > 0);
    assert!(message.entry_count() < jobs.len());
    assert!(message.entries[0].starts_with("*1. "));
    assert_eq!(message.to_string().encode_utf16().count(), message.utf16_len());
}

#[test]
fn emoji_count_as_two_units_against_the_limit() {
    let entry = render_entry(1, &job(1));

    assert_eq!(entry.encode_utf16().count(), entry.chars().count() + 3);
}

#[test]
fn rendered_message_never_exceeds_limit_in_utf16_units() {
    let jobs: Vec<JobListing> = (1..=10).map(job).collect();
    let bare = MessageComposer::default().compose("Asha", Category::Frontend, &[]);

    for limit in (100..=1600).step_by(5) {
        let message =
            MessageComposer::new(limit, DEFAULT_FOOTER).compose("Asha", Category::Frontend, &jobs);
        if bare.utf16_len() <= limit {
            let rendered = message.to_string();
            assert!(
                rendered.encode_utf16().count() <= limit,
                "limit {limit}: {} units",
                rendered.encode_utf16().count()
            );
        }
    }
}

#[test]
fn blank_recipient_name_falls_back_to_greeting() {
    let message = MessageComposer::new(500, "--").compose("  ", Category::Frontend, &[job(1)]);

    assert!(message.header.starts_with("👋 Hi there,"));
    assert_eq!(message.entry_count(), 1);
    assert!(message.to_string().starts_with(&message.header));
}
