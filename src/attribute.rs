//! Reported/display/target value containers for a single device property.

use chrono::{DateTime, Utc};

/// A read-only observed property.
///
/// All four fields are always present; a payload missing any of them is
/// rejected by the decoder rather than producing a partial attribute.
/// Prefer [`Attribute::display_value`] for presentation: the server may have
/// converted it from the raw `reported_value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<T> {
    reported_value: T,
    display_value: T,
    report_changed_time: DateTime<Utc>,
    report_received_time: DateTime<Utc>,
}

impl<T> Attribute<T> {
    pub fn new(
        reported_value: T,
        display_value: T,
        report_changed_time: DateTime<Utc>,
        report_received_time: DateTime<Utc>,
    ) -> Self {
        Attribute {
            reported_value,
            display_value,
            report_changed_time,
            report_received_time,
        }
    }

    pub fn reported_value(&self) -> &T {
        &self.reported_value
    }

    pub fn display_value(&self) -> &T {
        &self.display_value
    }

    pub fn report_changed_time(&self) -> DateTime<Utc> {
        self.report_changed_time
    }

    pub fn report_received_time(&self) -> DateTime<Utc> {
        self.report_received_time
    }
}

/// An [`Attribute`] that also records caller intent as an optional target.
///
/// Setting or clearing the target never touches the reported state. Both
/// operations return a new value; the original is left as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct SettableAttribute<T> {
    attribute: Attribute<T>,
    target_value: Option<T>,
}

impl<T> From<Attribute<T>> for SettableAttribute<T> {
    fn from(attribute: Attribute<T>) -> Self {
        SettableAttribute {
            attribute,
            target_value: None,
        }
    }
}

impl<T> SettableAttribute<T> {
    pub fn attribute(&self) -> &Attribute<T> {
        &self.attribute
    }

    pub fn reported_value(&self) -> &T {
        self.attribute.reported_value()
    }

    pub fn display_value(&self) -> &T {
        self.attribute.display_value()
    }

    pub fn report_changed_time(&self) -> DateTime<Utc> {
        self.attribute.report_changed_time()
    }

    pub fn report_received_time(&self) -> DateTime<Utc> {
        self.attribute.report_received_time()
    }

    pub fn target_value(&self) -> Option<&T> {
        self.target_value.as_ref()
    }

    pub fn has_target(&self) -> bool {
        self.target_value.is_some()
    }
}

impl<T: Clone> SettableAttribute<T> {
    pub fn with_target(&self, target: T) -> Self {
        SettableAttribute {
            attribute: self.attribute.clone(),
            target_value: Some(target),
        }
    }

    pub fn without_target(&self) -> Self {
        SettableAttribute {
            attribute: self.attribute.clone(),
            target_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> SettableAttribute<i64> {
        let t = Utc.with_ymd_and_hms(2020, 3, 4, 19, 13, 47).unwrap();
        Attribute::new(5, 6, t, t).into()
    }

    #[test]
    fn target_is_absent_initially() {
        let attr = sample();
        assert_eq!(attr.target_value(), None);
        assert!(!attr.has_target());
    }

    #[test]
    fn setting_target_leaves_reported_state_alone() {
        let original = sample();
        let targeted = original.with_target(9);

        assert_eq!(targeted.target_value(), Some(&9));
        assert_eq!(*targeted.reported_value(), 5);
        assert_eq!(*targeted.display_value(), 6);
        assert_eq!(original.target_value(), None);

        let cleared = targeted.without_target();
        assert_eq!(cleared, original);
    }
}
