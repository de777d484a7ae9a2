//! The fixed sample documents. Each builder is deterministic: the same call
//! produces the same rendering on every run.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{TimeZone as _, Utc};
use pg_jsondoc::{DocValue, Document, Number};

fn person_record(salary: &str, extended: bool) -> DocValue {
    let mut person = BTreeMap::new();
    person.insert("ID".to_string(), DocValue::Number(Number::new("12")));
    person.insert(
        "FirstName".to_string(),
        DocValue::String("Mary".to_string()),
    );
    person.insert("LastName".to_string(), DocValue::String("John".to_string()));
    person.insert(
        "creditScore".to_string(),
        DocValue::Array(vec![
            DocValue::Number(Number::new("700")),
            DocValue::Number(Number::new("250")),
            DocValue::Number(Number::new("340")),
        ]),
    );
    person.insert("age".to_string(), DocValue::Number(Number::new("25")));
    person.insert(
        "BirthDate".to_string(),
        DocValue::Timestamp(Utc.with_ymd_and_hms(1990, 2, 25, 19, 6, 39).unwrap()),
    );
    person.insert("salary".to_string(), DocValue::Number(Number::new(salary)));
    person.insert("Local".to_string(), DocValue::Bool(true));
    if extended {
        person.insert("BinData".to_string(), DocValue::Bytes(vec![0, 1, 2, 3, 4]));
        person.insert(
            "TravelTimePerDay".to_string(),
            DocValue::Duration(
                Duration::from_secs(5 * 3600 + 21 * 60)
                    + Duration::from_millis(10)
                    + Duration::from_nanos(20),
            ),
        );
    }
    let mut root = BTreeMap::new();
    root.insert("person".to_string(), DocValue::Object(person));
    DocValue::Object(root)
}

/// An array containing one person mapping.
pub fn person_array() -> Document {
    Document::Value(DocValue::Array(vec![person_record("4500.2351", false)]))
}

/// A person mapping with heterogeneous values, including a binary blob and
/// a duration.
pub fn person_map() -> Document {
    Document::Value(person_record("45.23", true))
}

/// A person document as literal JSON text, stored as-is.
pub fn person_text() -> Document {
    Document::Text(
        r#"{"person":{"BirthDate":"1999-02-03T00:00:00","ID":"12","JoinDate":"2020-11-24T12:34:56.123000Z","Name":"Alex","RandomString":"APKZYKSv2","age":"25","creditScore":["700","250","340"],"salary":"45.23"}}"#
            .to_string(),
    )
}
