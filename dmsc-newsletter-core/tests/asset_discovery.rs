use dmsc_newsletter_core::dropbox::{
    direct_download_url, newsletter_folder, select_newsletter_pdf, select_notes_doc, FolderEntry,
};

fn file(name: &str) -> FolderEntry {
    FolderEntry {
        tag: "file".to_string(),
        name: name.to_string(),
        path_lower: Some(format!("/newsletter/{}", name.to_lowercase())),
        size: Some(1024),
    }
}

#[test]
fn newsletter_folder_follows_fixed_pattern() {
    assert_eq!(
        newsletter_folder("March", 2026),
        "/Newsletter/Monthly Newsletters/2026 Newsletter/March"
    );
}

#[test]
fn discovery_picks_pdf_and_notes_from_mixed_listing() {
    let entries = vec![file("A_Web.pdf"), file("B.docx"), file("Ted_Notes.docx")];

    let pdf = select_newsletter_pdf(&entries).expect("PDF should be found");
    assert_eq!(pdf.name, "A_Web.pdf");

    let notes = select_notes_doc(&entries).expect("Notes doc should be found");
    assert_eq!(notes.name, "Ted_Notes.docx");
}

#[test]
fn notes_marker_matches_case_insensitively() {
    let entries = vec![file("TED_thoughts.docx")];
    assert!(select_notes_doc(&entries).is_some());
}

#[test]
fn notes_extension_must_match_exactly() {
    // The marker is case-insensitive but the extension is not.
    let entries = vec![file("Ted_Notes.pdf"), file("Ted_Notes.DOCX")];
    assert!(select_notes_doc(&entries).is_none());
}

#[test]
fn pdf_requires_the_web_suffix() {
    let entries = vec![file("DMSC_2025_Nov.pdf"), file("notes.docx")];
    assert!(select_newsletter_pdf(&entries).is_none());
}

#[test]
fn first_matching_entry_wins() {
    let entries = vec![
        file("DMSC_2025_Nov_Web.pdf"),
        file("DMSC_2025_Nov_v2_Web.pdf"),
    ];
    assert_eq!(
        select_newsletter_pdf(&entries).map(|e| e.name.as_str()),
        Some("DMSC_2025_Nov_Web.pdf")
    );
}

#[test]
fn share_url_is_normalized_to_direct_download_form() {
    assert_eq!(
        direct_download_url("https://www.dropbox.com/s/xyz?dl=0"),
        "https://dl.dropboxusercontent.com/s/xyz?dl=1"
    );
}

#[test]
fn direct_download_normalization_is_idempotent() {
    let once = direct_download_url("https://www.dropbox.com/s/xyz?dl=0");
    assert_eq!(direct_download_url(&once), once);
}
