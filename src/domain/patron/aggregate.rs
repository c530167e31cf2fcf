//! Patron aggregate entity.
//!
//! A Patron is a person sitting on the foundation's board: their identity,
//! the office they hold, and the term during which they hold it.
//!
//! # Design Decisions
//!
//! - **Composition**: identity fields live in an embedded [`Person`]
//! - **Atomic construction**: every field is validated before the aggregate
//!   exists; the first failing field is reported
//! - **Guarded mutation**: setters re-validate and leave the aggregate
//!   untouched on failure
//! - **Renewal copies**: `renew` returns a new aggregate instead of mutating

use serde::{Deserialize, Serialize};

use super::{Charge, DateRange};
use crate::domain::foundation::{PatronId, Timestamp, ValidationError};
use crate::domain::person::{Email, Person, PersonName, Role};

/// Input for registering a new patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatron {
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub role: String,
    pub charge: String,
    pub renovation_date: Timestamp,
    pub ending_date: Timestamp,
}

/// Flat, wrapper-free view of a patron used by persistence and DTO mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatronPrimitives {
    pub id: Option<String>,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub role: String,
    pub charge: String,
    pub renovation_date: Timestamp,
    pub ending_date: Timestamp,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Patron aggregate.
///
/// # Invariants
///
/// - All value objects are valid at all times
/// - `renovation_date < ending_date`, at most ten calendar years apart
/// - `id` and audit stamps are only present once persisted
#[derive(Debug, Clone)]
pub struct Patron {
    id: Option<PatronId>,
    person: Person,
    charge: Charge,
    term: DateRange,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
}

impl Patron {
    /// Validates and assembles a not-yet-persisted patron.
    pub fn create(params: NewPatron) -> Result<Self, ValidationError> {
        let person = Person::new(
            &params.email,
            &params.given_name,
            &params.family_name,
            &params.role,
        )?;
        let charge = Charge::new(&params.charge)?;
        let term = DateRange::new(params.renovation_date, params.ending_date)?;

        Ok(Self {
            id: None,
            person,
            charge,
            term,
            created_at: None,
            updated_at: None,
        })
    }

    /// Rebuilds a patron from stored values, re-running all validation.
    pub fn from_primitives(data: PatronPrimitives) -> Result<Self, ValidationError> {
        let id = data.id.map(PatronId::new).transpose()?;
        let mut patron = Self::create(NewPatron {
            email: data.email,
            given_name: data.given_name,
            family_name: data.family_name,
            role: data.role,
            charge: data.charge,
            renovation_date: data.renovation_date,
            ending_date: data.ending_date,
        })?;
        patron.id = id;
        patron.created_at = data.created_at;
        patron.updated_at = data.updated_at;
        Ok(patron)
    }

    pub fn to_primitives(&self) -> PatronPrimitives {
        PatronPrimitives {
            id: self.id.as_ref().map(|id| id.as_str().to_string()),
            email: self.person.email.as_str().to_string(),
            given_name: self.person.given_name.as_str().to_string(),
            family_name: self.person.family_name.as_str().to_string(),
            role: self.person.role.as_str().to_string(),
            charge: self.charge.as_str().to_string(),
            renovation_date: self.term.start(),
            ending_date: self.term.end(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Attaches the identity and audit stamps assigned by storage.
    pub fn persisted(mut self, id: PatronId, created_at: Timestamp, updated_at: Timestamp) -> Self {
        self.id = Some(id);
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    // ════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════

    pub fn id(&self) -> Option<&PatronId> {
        self.id.as_ref()
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn email(&self) -> &Email {
        &self.person.email
    }

    pub fn given_name(&self) -> &PersonName {
        &self.person.given_name
    }

    pub fn family_name(&self) -> &PersonName {
        &self.person.family_name
    }

    pub fn role(&self) -> Role {
        self.person.role
    }

    pub fn charge(&self) -> &Charge {
        &self.charge
    }

    pub fn term(&self) -> &DateRange {
        &self.term
    }

    pub fn renovation_date(&self) -> Timestamp {
        self.term.start()
    }

    pub fn ending_date(&self) -> Timestamp {
        self.term.end()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    // ════════════════════════════════════════════════════════════════
    // Derived queries
    // ════════════════════════════════════════════════════════════════

    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.term.is_active_at(now)
    }

    /// True while the current term includes the present instant.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Timestamp::now())
    }

    pub fn can_be_renewed_at(&self, now: Timestamp) -> bool {
        now.is_after(&self.term.end())
    }

    /// A patron may be renewed once their term has ended.
    pub fn can_be_renewed(&self) -> bool {
        self.can_be_renewed_at(Timestamp::now())
    }

    pub fn abbreviation(&self) -> String {
        self.charge.abbreviation()
    }

    pub fn initials(&self) -> String {
        self.person.initials()
    }

    pub fn email_domain(&self) -> &str {
        self.person.email.domain()
    }

    // ════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════

    /// Starts a new term running from `now` until `new_ending_date`.
    ///
    /// # Errors
    ///
    /// - `BusinessRule` if the current term has not ended yet
    /// - any [`DateRange`] violation for the new term
    pub fn renew_at(
        &self,
        new_ending_date: Timestamp,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !self.can_be_renewed_at(now) {
            return Err(ValidationError::business_rule(
                "Patron cannot be renewed yet",
            ));
        }
        let term = DateRange::new(now, new_ending_date)?;
        Ok(Self {
            term,
            ..self.clone()
        })
    }

    pub fn renew(&self, new_ending_date: Timestamp) -> Result<Self, ValidationError> {
        self.renew_at(new_ending_date, Timestamp::now())
    }

    // ════════════════════════════════════════════════════════════════
    // Guarded setters
    // ════════════════════════════════════════════════════════════════

    pub fn set_email(&mut self, email: &str) -> Result<(), ValidationError> {
        self.person.email = Email::new(email)?;
        Ok(())
    }

    pub fn set_given_name(&mut self, given_name: &str) -> Result<(), ValidationError> {
        self.person.given_name = PersonName::for_field("given_name", given_name)?;
        Ok(())
    }

    pub fn set_family_name(&mut self, family_name: &str) -> Result<(), ValidationError> {
        self.person.family_name = PersonName::for_field("family_name", family_name)?;
        Ok(())
    }

    pub fn set_role(&mut self, role: &str) -> Result<(), ValidationError> {
        self.person.role = role.parse()?;
        Ok(())
    }

    pub fn set_charge(&mut self, charge: &str) -> Result<(), ValidationError> {
        self.charge = Charge::new(charge)?;
        Ok(())
    }

    /// Moves the start of the term; checked against the current ending date.
    pub fn set_renovation_date(&mut self, date: Timestamp) -> Result<(), ValidationError> {
        self.term = DateRange::new(date, self.term.end())?;
        Ok(())
    }

    /// Moves the end of the term; checked against the current renovation date.
    pub fn set_ending_date(&mut self, date: Timestamp) -> Result<(), ValidationError> {
        self.term = DateRange::new(self.term.start(), date)?;
        Ok(())
    }

    /// Replaces both dates at once.
    pub fn set_term(
        &mut self,
        renovation_date: Timestamp,
        ending_date: Timestamp,
    ) -> Result<(), ValidationError> {
        self.term = DateRange::new(renovation_date, ending_date)?;
        Ok(())
    }
}

/// Patrons are the same person when email and both names match; the id and
/// the term are ignored.
impl PartialEq for Patron {
    fn eq(&self, other: &Self) -> bool {
        self.person.email == other.person.email
            && self.person.given_name == other.person.given_name
            && self.person.family_name == other.person.family_name
    }
}

impl Eq for Patron {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    fn params() -> NewPatron {
        NewPatron {
            email: "  Anna.Puig@Fundacio.CAT ".to_string(),
            given_name: "anna".to_string(),
            family_name: "puig ferrer".to_string(),
            role: "patron".to_string(),
            charge: "vice president of finance".to_string(),
            renovation_date: at(2024, 1, 1),
            ending_date: at(2028, 1, 1),
        }
    }

    fn patron() -> Patron {
        Patron::create(params()).unwrap()
    }

    // ════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════

    #[test]
    fn create_normalizes_fields() {
        let p = patron().to_primitives();

        assert_eq!(p.id, None);
        assert_eq!(p.email, "anna.puig@fundacio.cat");
        assert_eq!(p.given_name, "Anna");
        assert_eq!(p.family_name, "Puig Ferrer");
        assert_eq!(p.role, "patron");
        assert_eq!(p.charge, "Vice President of Finance");
        assert_eq!(p.renovation_date, at(2024, 1, 1));
        assert_eq!(p.ending_date, at(2028, 1, 1));
    }

    #[test]
    fn create_rejects_first_invalid_field() {
        let mut bad = params();
        bad.family_name = "P".to_string();
        bad.charge = "x".to_string();

        let err = Patron::create(bad).unwrap_err();
        assert_eq!(err.field(), Some("family_name"));
    }

    #[test]
    fn create_rejects_inverted_dates() {
        let mut bad = params();
        bad.ending_date = at(2023, 1, 1);
        assert!(Patron::create(bad).is_err());
    }

    #[test]
    fn from_primitives_round_trips_with_id() {
        let original = patron().persisted(
            PatronId::new("507f1f77bcf86cd799439011").unwrap(),
            at(2024, 1, 2),
            at(2024, 1, 3),
        );
        let primitives = original.to_primitives();
        let rebuilt = Patron::from_primitives(primitives.clone()).unwrap();

        assert_eq!(rebuilt.to_primitives(), primitives);
    }

    #[test]
    fn from_primitives_rejects_bad_id() {
        let mut data = patron().to_primitives();
        data.id = Some("nope".to_string());
        assert!(Patron::from_primitives(data).is_err());
    }

    // ════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════

    #[test]
    fn derived_queries() {
        let p = patron();
        assert_eq!(p.abbreviation(), "VPF");
        assert_eq!(p.initials(), "APF");
        assert_eq!(p.email_domain(), "fundacio.cat");
        assert!(p.is_active_at(at(2025, 6, 1)));
        assert!(!p.is_active_at(at(2029, 1, 1)));
    }

    #[test]
    fn equality_ignores_id_and_term() {
        let a = patron().persisted(PatronId::generate(), at(2024, 1, 1), at(2024, 1, 1));
        let mut b = patron().persisted(PatronId::generate(), at(2024, 1, 1), at(2024, 1, 1));
        b.set_charge("Treasurer").unwrap();
        b.set_ending_date(at(2030, 1, 1)).unwrap();

        assert_eq!(a, b);

        b.set_given_name("Berta").unwrap();
        assert_ne!(a, b);
    }

    // ════════════════════════════════════════════════════════════════
    // Renewal
    // ════════════════════════════════════════════════════════════════

    #[test]
    fn renew_rejected_while_term_running() {
        let p = patron();
        let err = p.renew_at(at(2032, 1, 1), at(2027, 1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Patron cannot be renewed yet");
    }

    #[test]
    fn renew_rejected_on_the_ending_day() {
        let p = patron();
        assert!(!p.can_be_renewed_at(at(2028, 1, 1)));
        assert!(p.renew_at(at(2030, 1, 1), at(2028, 1, 1)).is_err());
    }

    #[test]
    fn renew_returns_new_instance() {
        let p = patron().persisted(PatronId::generate(), at(2024, 1, 1), at(2024, 1, 1));
        let now = at(2028, 2, 1);
        let renewed = p.renew_at(at(2032, 2, 1), now).unwrap();

        assert_eq!(renewed.renovation_date(), now);
        assert_eq!(renewed.ending_date(), at(2032, 2, 1));
        assert_eq!(renewed.id(), p.id());
        assert_eq!(renewed.charge(), p.charge());
        assert_eq!(p.renovation_date(), at(2024, 1, 1));
        assert_eq!(p.ending_date(), at(2028, 1, 1));
    }

    #[test]
    fn renew_with_wall_clock_after_expiry() {
        let mut p = patron();
        p.set_term(at(2010, 1, 1), at(2012, 1, 1)).unwrap();
        assert!(p.can_be_renewed());

        let end = Timestamp::now().add_days(365);
        let renewed = p.renew(end).unwrap();
        assert_eq!(renewed.ending_date(), end);
        assert!(renewed.is_active());
    }

    // ════════════════════════════════════════════════════════════════
    // Setters
    // ════════════════════════════════════════════════════════════════

    #[test]
    fn setters_revalidate_and_keep_state_on_failure() {
        let mut p = patron();

        assert!(p.set_charge("!").is_err());
        assert_eq!(p.charge().as_str(), "Vice President of Finance");

        assert!(p.set_email("not-an-email").is_err());
        assert_eq!(p.email().as_str(), "anna.puig@fundacio.cat");

        assert!(p.set_role("owner").is_err());
        assert_eq!(p.role(), Role::Patron);

        p.set_role("admin").unwrap();
        assert_eq!(p.role(), Role::Admin);
    }

    #[test]
    fn date_setters_check_sibling_date() {
        let mut p = patron();

        assert!(p.set_renovation_date(at(2028, 6, 1)).is_err());
        assert!(p.set_ending_date(at(2023, 6, 1)).is_err());
        assert_eq!(p.renovation_date(), at(2024, 1, 1));
        assert_eq!(p.ending_date(), at(2028, 1, 1));

        p.set_ending_date(at(2030, 1, 1)).unwrap();
        assert_eq!(p.ending_date(), at(2030, 1, 1));
    }

    #[test]
    fn set_term_moves_both_dates_together() {
        let mut p = patron();
        // Each date alone would be out of order against the other old value.
        p.set_term(at(2029, 1, 1), at(2031, 1, 1)).unwrap();
        assert_eq!(p.renovation_date(), at(2029, 1, 1));
        assert_eq!(p.ending_date(), at(2031, 1, 1));
    }

    proptest! {
        #[test]
        fn valid_inputs_round_trip(
            given in "[a-z]{2,15}",
            family in "[a-z]{2,15}",
            local in "[a-z0-9]{1,15}",
            days in 1i64..3650,
        ) {
            let start = at(2020, 1, 1);
            let patron = Patron::create(NewPatron {
                email: format!("{local}@example.org"),
                given_name: given.clone(),
                family_name: family.clone(),
                role: "admin".to_string(),
                charge: "Treasurer".to_string(),
                renovation_date: start,
                ending_date: start.add_days(days),
            }).unwrap();

            let p = patron.to_primitives();
            prop_assert_eq!(p.email, format!("{local}@example.org"));
            prop_assert_eq!(p.given_name.to_lowercase(), given);
            prop_assert_eq!(p.family_name.to_lowercase(), family);
            prop_assert_eq!(p.ending_date, start.add_days(days));
        }
    }
}
