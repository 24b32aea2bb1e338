// ABOUTME: Behavioral tests for the selection state machine
// Covers downstream invalidation, label/value parity, completion and navigation

use super::fixtures::{complete_wizard, wizard_through_kilometers};
use pretty_assertions::assert_eq;
use sellcar::wizard::{is_complete, PhotoChoice, Selections, SellWizard, StepId, WizardError};

fn assert_parity(wizard: &SellWizard) {
    let values: Vec<StepId> = wizard.selections().values().into_keys().collect();
    let labels: Vec<StepId> = wizard.selections().labels().into_keys().collect();
    assert_eq!(values, labels, "value and label keys must match");
}

#[test]
fn test_reselecting_year_keeps_only_brand_and_year() {
    let mut wizard = wizard_through_kilometers();
    assert_eq!(wizard.selections().len(), 6);

    wizard.select_option(StepId::Year, "2018", "2018").unwrap();

    let steps: Vec<StepId> = wizard.selections().steps().collect();
    assert_eq!(steps, vec![StepId::Brand, StepId::Year]);
    assert_eq!(wizard.selections().value(StepId::Year), Some("2018"));
    assert_eq!(wizard.current_step(), StepId::Model);
    assert!(wizard.variant_meta().is_none());
}

#[test]
fn test_label_value_parity_holds_after_every_transition() {
    let mut wizard = SellWizard::new();
    assert_parity(&wizard);

    let script = [
        (StepId::Brand, "5", "Maruti"),
        (StepId::Year, "2019", "2019"),
        (StepId::Model, "12", "Swift"),
        (StepId::Brand, "7", "Hyundai"),
        (StepId::Year, "2021", "2021"),
        (StepId::Model, "40", "Creta"),
        (StepId::Variant, "88", "SX"),
        (StepId::Model, "41", "Venue"),
    ];
    for (step, value, label) in script {
        wizard.select_option(step, value, label).unwrap();
        assert_parity(&wizard);
    }

    wizard.go_back();
    assert_parity(&wizard);
    wizard.reset();
    assert_parity(&wizard);
}

#[test]
fn test_completion_predicate() {
    let answered = |photos: &str| {
        Selections::from_values(StepId::all().iter().map(|step| {
            let value = if *step == StepId::Photos { photos } else { "1" };
            (*step, value)
        }))
    };

    let upload_now = answered("upload-now");
    assert!(!is_complete(&upload_now, 0));
    assert!(is_complete(&upload_now, 1));

    assert!(is_complete(&answered("need-help"), 0));

    let partial = Selections::from_values(
        StepId::all()
            .iter()
            .filter(|step| **step <= StepId::Location)
            .map(|step| (*step, "1")),
    );
    assert!(!is_complete(&partial, 3));
}

#[test]
fn test_completion_through_wizard() {
    let wizard = complete_wizard(PhotoChoice::NeedHelp);
    assert!(wizard.is_complete());

    let mut wizard = complete_wizard(PhotoChoice::UploadNow);
    assert!(!wizard.is_complete());
    wizard.attach_photo("/tmp/front.jpg");
    assert!(wizard.is_complete());
}

#[test]
fn test_steps_unlock_in_order() {
    let mut wizard = SellWizard::new();
    let enabled = |w: &SellWizard| {
        StepId::all()
            .iter()
            .filter(|s| w.is_step_enabled(**s))
            .count()
    };
    assert_eq!(enabled(&wizard), 1);

    wizard.select_option(StepId::Brand, "5", "Maruti").unwrap();
    assert_eq!(enabled(&wizard), 2);
    assert_eq!(
        wizard.go_to(StepId::Model),
        Err(WizardError::StepLocked(StepId::Model))
    );

    let complete = complete_wizard(PhotoChoice::NeedHelp);
    assert_eq!(enabled(&complete), StepId::total());
}

#[test]
fn test_blocking_message_for_variant_without_year_and_model() {
    let mut wizard = SellWizard::new();
    assert_eq!(
        wizard.blocking_message(StepId::Variant),
        Some("Pick brand and year to proceed")
    );
    wizard.select_option(StepId::Brand, "5", "Maruti").unwrap();
    wizard.select_option(StepId::Year, "2019", "2019").unwrap();
    assert_eq!(
        wizard.blocking_message(StepId::Variant),
        Some("Pick a model to proceed")
    );
}

#[test]
fn test_reset_returns_to_first_step() {
    let mut wizard = complete_wizard(PhotoChoice::UploadNow);
    wizard.attach_photo("/tmp/front.jpg");
    wizard.reset();

    assert_eq!(wizard.current_step(), StepId::Brand);
    assert!(wizard.selections().is_empty());
    assert!(wizard.location_data().is_none());
    assert_eq!(wizard.photo_count(), 0);
}
