//! The booking wizard driven end to end, through to the messaging handoff.

use std::sync::{Arc, Mutex};

use dm_app::SubmitBooking;
use dm_core::ports::MessageLauncherPort;
use dm_core::wizard::booking::{BookingStep, BookingWizard, ServiceType, TripType};

#[derive(Default)]
struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
}

impl MessageLauncherPort for RecordingLauncher {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[test]
fn hourly_inside_city_booking_reaches_the_messaging_app() {
    let mut wizard = BookingWizard::new();

    // Step 1: service selection
    assert!(!wizard.next(), "empty selection must not advance");
    wizard.form_mut().service_type = Some(ServiceType::Hourly);
    assert!(wizard.next());

    // Step 2: trip details (inside-city needs no destination)
    wizard.form_mut().trip_type = TripType::InsideCity;
    wizard.form_mut().pickup_location = "Koramangala".to_string();
    assert!(wizard.next());

    // Step 3: schedule
    wizard.form_mut().date = "2025-01-10".to_string();
    wizard.form_mut().time = "10:00".to_string();
    wizard.form_mut().duration = "4".to_string();
    wizard.form_mut().car_type = "sedan".to_string();
    assert!(wizard.next());

    // Step 4: contact info
    wizard.form_mut().customer_name = "Asha".to_string();
    wizard.form_mut().set_customer_phone("9876543210");
    assert_eq!(wizard.current_step(), BookingStep::ContactInfo);

    let launcher = Arc::new(RecordingLauncher::default());
    let submit = SubmitBooking::new(launcher.clone(), "919876543210");
    let url = submit.execute(&mut wizard).unwrap();
    assert!(wizard.is_submitted());

    let opened = launcher.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0], url);

    // Every booking field survives into the decoded message.
    let encoded = url.split("text=").nth(1).unwrap();
    let message = urlencoding::decode(encoded).unwrap();
    for expected in [
        "Service: Hourly / Acting Driver",
        "Trip Type: Inside City",
        "Pickup: Koramangala",
        "Date: 2025-01-10",
        "Time: 10:00",
        "Duration: 4",
        "Car Type: sedan",
        "Name: Asha",
        "Phone: 9876543210",
    ] {
        assert!(message.contains(expected), "missing line: {expected}");
    }
}

#[test]
fn back_navigation_round_trip_preserves_entries() {
    let mut wizard = BookingWizard::new();
    wizard.form_mut().service_type = Some(ServiceType::Outstation);
    wizard.next();
    wizard.form_mut().trip_type = TripType::Outstation;
    wizard.form_mut().pickup_location = "Chennai".to_string();
    wizard.form_mut().destination = "Pondicherry".to_string();
    wizard.next();

    // Round trip: go back two steps, come forward again.
    wizard.back();
    wizard.back();
    assert_eq!(wizard.current_step(), BookingStep::ServiceSelection);
    wizard.next();
    wizard.next();

    assert_eq!(wizard.form().pickup_location, "Chennai");
    assert_eq!(wizard.form().destination, "Pondicherry");
    assert_eq!(wizard.current_step(), BookingStep::Schedule);
}

#[test]
fn reset_after_submission_allows_booking_again() {
    let mut wizard = BookingWizard::new();
    wizard.form_mut().service_type = Some(ServiceType::Daily);
    wizard.next();
    wizard.form_mut().pickup_location = "Adyar".to_string();
    wizard.next();
    wizard.form_mut().date = "2025-02-01".to_string();
    wizard.form_mut().time = "08:30".to_string();
    wizard.form_mut().car_type = "suv".to_string();
    wizard.next();
    wizard.form_mut().customer_name = "Meena".to_string();
    wizard.form_mut().set_customer_phone("9000000000");

    let launcher = Arc::new(RecordingLauncher::default());
    let submit = SubmitBooking::new(launcher, "919876543210");
    submit.execute(&mut wizard).unwrap();

    wizard.reset();
    assert_eq!(wizard.current_step(), BookingStep::ServiceSelection);
    assert!(!wizard.is_submitted());
    assert!(wizard.form().pickup_location.is_empty());
}
