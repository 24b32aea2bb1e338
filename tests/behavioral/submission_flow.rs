// ABOUTME: Behavioral tests for the submission assembler against a fake marketplace
// Photo upload, draft merge, listing payload and success/rejection handling

use super::fixtures::{complete_wizard, wizard_through_kilometers, FakeMarketplace};
use pretty_assertions::assert_eq;
use sellcar::draft::{DraftStore, SellCarDraft};
use sellcar::submission::{SubmissionAssembler, SubmitError};
use sellcar::wizard::{LocationData, LocationPick, PhotoChoice};
use std::sync::Arc;
use tempfile::TempDir;

fn assembler(api: &Arc<FakeMarketplace>, dir: &TempDir) -> SubmissionAssembler {
    SubmissionAssembler::new(api.clone(), DraftStore::new(dir.path()))
}

#[tokio::test]
async fn test_full_flow_creates_listing() {
    let dir = TempDir::new().unwrap();
    let photo = dir.path().join("front.png");
    std::fs::write(&photo, b"png-bytes").unwrap();

    let api = Arc::new(FakeMarketplace::new());
    let assembler = assembler(&api, &dir);

    let mut wizard = complete_wizard(PhotoChoice::UploadNow);
    wizard.attach_photo(&photo);
    wizard.set_registration_number("gj 03 ab 1234").unwrap();

    let prepared = assembler.prepare(&mut wizard).await.unwrap();
    assert_eq!(prepared.draft.photo_keys, vec!["photo-1"]);
    assert!(prepared.query.contains("variantName=VXi"));

    let created = assembler.submit(&prepared.draft).await.unwrap();
    assert_eq!(created.code, 201);

    let listings = api.listings();
    assert_eq!(listings.len(), 1);
    let request = &listings[0];
    assert_eq!(request.registration_number, "GJ03AB1234");
    assert_eq!(request.brand_id, 5);
    assert_eq!(request.variant_id, 301);
    assert_eq!(request.manufacturing_year, 2019);
    assert_eq!(request.pincode_id, 77);
    assert_eq!(request.expected_price, 500_000);
    assert_eq!(request.fuel_type.as_deref(), Some("Petrol"));
    assert_eq!(request.transmission_type.as_deref(), Some("Manual"));
    assert_eq!(request.photo_keys, vec!["photo-1"]);

    assert!(assembler.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_prepare_merges_with_previous_draft() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeMarketplace::new());
    let assembler = assembler(&api, &dir);

    let mut previous = SellCarDraft::new();
    previous.photo_keys = vec!["earlier".into()];
    previous.photo_urls = vec!["https://cdn.example/earlier".into()];
    previous.registration_number = Some("MH12AB1234".into());
    assembler.store().save(&previous).unwrap();

    let mut wizard = complete_wizard(PhotoChoice::NeedHelp);
    let prepared = assembler.prepare(&mut wizard).await.unwrap();

    assert_eq!(prepared.draft.draft_id, previous.draft_id);
    assert_eq!(prepared.draft.photo_keys, vec!["earlier"]);
    assert_eq!(prepared.draft.registration_number.as_deref(), Some("MH12AB1234"));
    assert_eq!(prepared.draft.selections.len(), 9);
}

#[tokio::test]
async fn test_upload_failure_stops_before_listing() {
    let dir = TempDir::new().unwrap();
    let photo = dir.path().join("front.jpg");
    std::fs::write(&photo, b"jpeg-bytes").unwrap();

    let api = Arc::new(FakeMarketplace {
        fail_uploads: true,
        ..FakeMarketplace::new()
    });
    let assembler = assembler(&api, &dir);

    let mut wizard = complete_wizard(PhotoChoice::UploadNow);
    wizard.attach_photo(&photo);
    let err = assembler.prepare(&mut wizard).await.unwrap_err();

    assert!(matches!(err, SubmitError::Upload(_)));
    assert!(api.listings().is_empty());
    assert!(assembler.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_missing_photo_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeMarketplace::new());
    let assembler = assembler(&api, &dir);

    let mut wizard = complete_wizard(PhotoChoice::UploadNow);
    wizard.attach_photo(dir.path().join("missing.jpg"));
    let err = assembler.prepare(&mut wizard).await.unwrap_err();

    assert!(matches!(err, SubmitError::Photo { .. }));
}

#[tokio::test]
async fn test_non_201_response_is_rejected() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeMarketplace {
        listing_code: 409,
        ..FakeMarketplace::new()
    });
    let assembler = assembler(&api, &dir);

    let mut wizard = complete_wizard(PhotoChoice::NeedHelp);
    wizard.set_registration_number("GJ03AB1234").unwrap();
    let prepared = assembler.prepare(&mut wizard).await.unwrap();

    let err = assembler.submit(&prepared.draft).await.unwrap_err();
    match err {
        SubmitError::Rejected { code, message } => {
            assert_eq!(code, 409);
            assert_eq!(message, "Listing created");
        }
        other => panic!("unexpected error: {other}"),
    }
    // draft is kept for another attempt
    assert!(assembler.store().load().unwrap().is_some());
    assert_eq!(api.listings().len(), 1);
}

#[tokio::test]
async fn test_starting_over_does_not_inherit_previous_car() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeMarketplace::new());
    let assembler = assembler(&api, &dir);

    let mut previous = SellCarDraft::new();
    previous.photo_keys = vec!["other-car-photo".into()];
    previous.registration_number = Some("MH12AB1234".into());
    assembler.store().save(&previous).unwrap();

    let mut wizard = complete_wizard(PhotoChoice::NeedHelp);
    assembler.discard(&mut wizard).unwrap();

    let mut wizard = complete_wizard(PhotoChoice::NeedHelp);
    let prepared = assembler.prepare(&mut wizard).await.unwrap();

    assert!(prepared.draft.photo_keys.is_empty());
    assert_eq!(prepared.draft.registration_number, None);
    assert_ne!(prepared.draft.draft_id, previous.draft_id);
}

#[tokio::test]
async fn test_city_only_location_is_not_sent_as_pincode() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeMarketplace::new());
    let assembler = assembler(&api, &dir);

    let mut wizard = wizard_through_kilometers();
    wizard
        .select_location(&LocationPick {
            formatted: "Rajkot".into(),
            data: LocationData {
                formatted: "Rajkot".into(),
                city: Some("Rajkot".into()),
                pincode: Some("360001".into()),
                pincode_id: None,
                city_id: Some(9),
            },
            value: "9".into(),
        })
        .unwrap();
    wizard.set_price("₹5,00,000").unwrap();
    wizard.choose_photos(PhotoChoice::NeedHelp).unwrap();
    wizard.set_registration_number("GJ03AB1234").unwrap();

    let prepared = assembler.prepare(&mut wizard).await.unwrap();
    let err = assembler.submit(&prepared.draft).await.unwrap_err();

    assert!(matches!(err, SubmitError::MissingField(field) if field == "pincodeId"));
    assert!(api.listings().is_empty());
}
