//! Typed scalar extraction from a response fixture

use std::path::Path;

use chrono::{Datelike, Timelike};
use graphnav::application::load_response;
use graphnav::domain::{timestamp, Geometry, NodeView, Response, ScalarError};
use graphnav::util::testing;
use rstest::{fixture, rstest};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn clara() -> Response {
    load_response(Path::new("tests/resources/responses/clara.json"), None).expect("load fixture")
}

#[rstest]
fn given_typed_properties_when_extracting_then_returns_values(clara: Response) {
    let me = NodeView::from_root(&clara).attribute("me");

    assert_eq!(me.property("name").to_string_value(), "Clara");
    assert_eq!(me.property("age").to_int(), 27);
    assert!(me.property("verified").to_bool());
    assert_eq!(me.property("score").to_float(), 4.5);
    assert_eq!(me.property("avatar").to_bytes(), vec![0x00, 0x01, 0xfe]);
    assert_eq!(me.property("secret").to_password(), "s3cr3t");
    assert_eq!(me.property("manager").to_uid(), 4100);
    assert_eq!(me.property("nickname").to_string_value(), "Cla");
}

#[rstest]
fn given_encoded_timestamps_when_extracting_then_decodes_calendar_values(clara: Response) {
    let me = NodeView::from_root(&clara).attribute("me");

    let birthday = me.property("birthday").to_date();
    assert_eq!((birthday.year(), birthday.month(), birthday.day()), (1990, 5, 17));

    let login = me.property("last_login").to_datetime();
    assert_eq!((login.year(), login.hour(), login.minute()), (2017, 12, 30));
    assert_eq!(login.offset().local_minus_utc(), 0);
}

#[rstest]
fn given_malformed_timestamp_when_extracting_then_zero(clara: Response) {
    let broken = NodeView::from_root(&clara).attribute("me").property("broken_date");

    assert!(!broken.is_absent());
    assert!(timestamp::is_zero(&broken.to_date()));
    assert!(matches!(broken.as_date(), Err(ScalarError::Decode { .. })));
}

#[rstest]
fn given_geo_property_when_extracting_then_decodes_point(clara: Response) {
    let home = NodeView::from_root(&clara).attribute("me").property("home");

    match home.to_geometry() {
        Some(Geometry::Point(c)) => {
            assert!((c.x - -122.4194).abs() < 1e-9);
            assert!((c.y - 37.7749).abs() < 1e-9);
        }
        other => panic!("expected point, got {other:?}"),
    }
}

#[rstest]
#[case::string_as_int("name")]
#[case::bool_as_int("verified")]
#[case::password_as_int("secret")]
fn given_wrong_accessor_when_extracting_then_default(clara: Response, #[case] prop: &str) {
    let value = NodeView::from_root(&clara).attribute("me").property(prop);

    assert_eq!(value.to_int(), 0);
    assert!(matches!(value.as_int(), Err(ScalarError::Mismatch { expected: "int_val", .. })));
}

#[rstest]
fn given_missing_property_when_extracting_then_absent_and_default(clara: Response) {
    let missing = NodeView::from_root(&clara).attribute("me").property("email");

    assert!(missing.is_absent());
    assert_eq!(missing.to_string_value(), "");
    assert_eq!(missing.to_float(), 0.0);
    assert!(missing.to_geometry().is_none());
    assert_eq!(missing.as_str(), Err(ScalarError::Absent));
}
