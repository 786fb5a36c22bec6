use super::*;
use crate::navigator::Navigator;
use crate::sim::{test_policy, SimOffice, SimPage, SimSession};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

fn two_office_pages() -> Vec<SimPage> {
    vec![
        SimPage::new(vec![
            SimOffice::new("1. Eastside", "123 A St, CA", &["2024-05-01", "2024-05-03"]),
            SimOffice::new("2. Westside", "456 B Ave, CA", &[]),
        ]),
        SimPage::new(vec![SimOffice::new(
            "3. Northgate",
            "789 C Blvd, CA",
            &["2024-06-01"],
        )]),
    ]
}

#[test]
fn name_is_the_text_after_the_first_delimiter() {
    assert_eq!(name_from_card_title("1. Eastside"), "Eastside");
    assert_eq!(name_from_card_title("12. Santa Clara"), "Santa Clara");
}

#[test]
fn name_keeps_later_delimiters_intact() {
    assert_eq!(name_from_card_title("2. St. Helena"), "St. Helena");
}

#[test]
fn name_falls_back_to_the_whole_title_without_a_delimiter() {
    assert_eq!(name_from_card_title("  Fresno "), "Fresno");
}

#[tokio::test]
async fn office_names_reads_the_current_page_cards() {
    let mut nav = Navigator::new(SimSession::at_listing(two_office_pages()), test_policy());
    let names = office_names(&mut nav).await.expect("names readable");
    assert_eq!(names, ["Eastside", "Westside"]);
}

#[tokio::test]
async fn dates_for_office_restores_the_listing_page_afterwards() {
    let session = SimSession::at_listing(two_office_pages());
    let mut nav = Navigator::new(session, test_policy());
    nav.click_page_button(2).await.expect("page 2 exists");

    let dates = dates_for_office(&mut nav, 0, 2, "Northgate")
        .await
        .expect("dates readable");
    assert_eq!(dates, vec![date("2024-06-01")]);

    // The detail view bounced the session to page 1; the extractor must
    // have re-clicked page 2 before handing control back.
    let titles = nav
        .texts(crate::selectors::CARD_TITLES)
        .await
        .expect("titles readable");
    assert_eq!(titles, ["3. Northgate"]);
}

#[tokio::test]
async fn office_without_rendered_dates_yields_an_empty_set() {
    let mut nav = Navigator::new(SimSession::at_listing(two_office_pages()), test_policy());
    let dates = dates_for_office(&mut nav, 1, 1, "Westside")
        .await
        .expect("empty calendar is not an error");
    assert!(dates.is_empty());
}

#[tokio::test]
async fn staleness_during_one_office_read_is_retried_to_success() {
    let pages = vec![SimPage::new(vec![
        SimOffice::new("1. Eastside", "123 A St, CA", &["2024-05-01", "2024-05-03"])
            .with_stale_reads(2),
        SimOffice::new("2. Westside", "456 B Ave, CA", &["2024-05-07"]),
    ])];
    let session = SimSession::at_listing(pages);
    let probe = session.probe();
    let mut nav = Navigator::new(session, test_policy());

    let first = dates_for_office(&mut nav, 0, 1, "Eastside")
        .await
        .expect("recovers from staleness");
    assert_eq!(first, vec![date("2024-05-01"), date("2024-05-03")]);

    // Neighboring office is unaffected by the retries.
    let second = dates_for_office(&mut nav, 1, 1, "Westside")
        .await
        .expect("unaffected office reads cleanly");
    assert_eq!(second, vec![date("2024-05-07")]);

    // Two stale reads mean the office was selected three times in total.
    assert_eq!(probe.select_clicks(), 4);
}

#[tokio::test]
async fn bounded_stale_retries_surface_an_exhaustion_error() {
    let pages = vec![SimPage::new(vec![SimOffice::new(
        "1. Eastside",
        "123 A St, CA",
        &["2024-05-01"],
    )
    .with_stale_reads(10)])];
    let mut policy = test_policy();
    policy.stale_retry_attempts = Some(2);
    let mut nav = Navigator::new(SimSession::at_listing(pages), policy);

    let result = dates_for_office(&mut nav, 0, 1, "Eastside").await;
    assert!(
        matches!(
            &result,
            Err(ScrapeError::StaleRetriesExhausted { office, attempts: 2 }) if office == "Eastside"
        ),
        "expected StaleRetriesExhausted, got: {result:?}"
    );
}
