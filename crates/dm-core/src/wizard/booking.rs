//! Booking wizard
//!
//! Four steps: service selection, trip details, schedule, contact info.
//! Terminal submission produces the pre-filled message handed off to the
//! external messaging app; it never touches the hosted backend.

use serde::{Deserialize, Serialize};

use crate::errors::SessionError;
use crate::input::{digits_only, PHONE_LEN};
use crate::wizard::Stepper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Outstation,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Outstation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Hourly => "Hourly / Acting Driver",
            Self::Daily => "Daily / Full-Day Driver",
            Self::Weekly => "Weekly Driver",
            Self::Monthly => "Monthly Driver",
            Self::Outstation => "Outstation Driver",
        }
    }

    /// Hourly and daily packages ask for a duration on the schedule step.
    pub fn needs_duration(self) -> bool {
        matches!(self, Self::Hourly | Self::Daily)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Outstation => "outstation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    InsideCity,
    Outstation,
}

impl TripType {
    pub fn label(self) -> &'static str {
        match self {
            Self::InsideCity => "Inside City",
            Self::Outstation => "Outstation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    ServiceSelection,
    TripDetails,
    Schedule,
    ContactInfo,
}

impl BookingStep {
    pub fn title(self) -> &'static str {
        match self {
            Self::ServiceSelection => "Service Type",
            Self::TripDetails => "Trip Details",
            Self::Schedule => "Schedule",
            Self::ContactInfo => "Your Info",
        }
    }
}

const STEPS: [BookingStep; 4] = [
    BookingStep::ServiceSelection,
    BookingStep::TripDetails,
    BookingStep::Schedule,
    BookingStep::ContactInfo,
];

/// Field values entered across the booking steps.
///
/// Values persist across back/forward navigation; only `reset` clears them.
/// The phone field is kept behind a setter so it always holds at most ten
/// digits, filtered on every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm {
    pub service_type: Option<ServiceType>,
    pub trip_type: TripType,
    pub pickup_location: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub car_type: String,
    pub customer_name: String,
    customer_phone: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            service_type: None,
            trip_type: TripType::InsideCity,
            pickup_location: String::new(),
            destination: String::new(),
            date: String::new(),
            time: String::new(),
            duration: String::new(),
            car_type: String::new(),
            customer_name: String::new(),
            customer_phone: String::new(),
        }
    }
}

impl BookingForm {
    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn set_customer_phone(&mut self, raw: &str) {
        self.customer_phone = digits_only(raw, PHONE_LEN);
    }

    /// The pre-filled message sent through the messaging handoff.
    ///
    /// Empty optional fields (destination, duration) are omitted rather
    /// than rendered as blank lines.
    pub fn message(&self) -> String {
        let service = self
            .service_type
            .map(ServiceType::label)
            .unwrap_or_default();

        let mut lines = vec![
            "*New Booking Request*".to_string(),
            String::new(),
            format!("Service: {service}"),
            format!("Trip Type: {}", self.trip_type.label()),
            format!("Pickup: {}", self.pickup_location),
        ];
        if !self.destination.is_empty() {
            lines.push(format!("Destination: {}", self.destination));
        }
        lines.push(format!("Date: {}", self.date));
        lines.push(format!("Time: {}", self.time));
        if !self.duration.is_empty() {
            lines.push(format!("Duration: {}", self.duration));
        }
        lines.push(format!("Car Type: {}", self.car_type));
        lines.push(format!("Name: {}", self.customer_name));
        lines.push(format!("Phone: {}", self.customer_phone));
        lines.join("\n")
    }
}

/// The booking flow state machine.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    stepper: Stepper<BookingStep>,
    form: BookingForm,
    submitted: bool,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    pub fn new() -> Self {
        Self {
            stepper: Stepper::new(STEPS.to_vec()),
            form: BookingForm::default(),
            submitted: false,
        }
    }

    pub fn current_step(&self) -> BookingStep {
        self.stepper.current()
    }

    pub fn position(&self) -> (usize, usize) {
        self.stepper.position()
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookingForm {
        &mut self.form
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// The active step's validity predicate against current field values.
    pub fn can_proceed(&self) -> bool {
        let form = &self.form;
        match self.current_step() {
            BookingStep::ServiceSelection => form.service_type.is_some(),
            BookingStep::TripDetails => {
                !form.pickup_location.is_empty()
                    && (form.trip_type == TripType::InsideCity || !form.destination.is_empty())
            }
            BookingStep::Schedule => {
                !form.date.is_empty() && !form.time.is_empty() && !form.car_type.is_empty()
            }
            BookingStep::ContactInfo => {
                !form.customer_name.is_empty() && form.customer_phone.len() >= PHONE_LEN
            }
        }
    }

    /// Advance one step. Gated by the active step's predicate; no-op at
    /// the terminal step.
    pub fn next(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        self.stepper.advance()
    }

    /// Go back one step. Never gated; field values are retained.
    pub fn back(&mut self) -> bool {
        self.stepper.retreat()
    }

    /// Terminal submission: only from the last step with a passing
    /// predicate. Returns the message payload for the handoff and moves
    /// the wizard into its submitted display state.
    pub fn submit(&mut self) -> Result<String, SessionError> {
        if !self.stepper.is_last() {
            return Err(SessionError::Validation(
                "booking is not complete yet".to_string(),
            ));
        }
        if !self.can_proceed() {
            return Err(SessionError::Validation(
                "enter your name and a 10-digit phone number".to_string(),
            ));
        }
        self.submitted = true;
        Ok(self.form.message())
    }

    /// Back to the first step with cleared fields, e.g. "book another".
    pub fn reset(&mut self) {
        self.stepper.reset();
        self.form = BookingForm::default();
        self.submitted = false;
    }
}
