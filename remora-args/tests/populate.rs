//! Behavior of the populate pass: key resolution, kind-directed coercion,
//! dotted descent, and the per-token report.

use std::sync::Arc;

use miette::Diagnostic;
use remora_args::{ConversionPolicy, Populator, TokenOutcome};
use remora_core::{EnumDescriptor, Kind, MessageDescriptor};

fn config() -> Arc<MessageDescriptor> {
    let level = EnumDescriptor::builder("Level")
        .value("OFF", 0)
        .value("WARN", 1)
        .value("DEBUG", 2)
        .build()
        .unwrap();
    let endpoint = MessageDescriptor::builder("Endpoint")
        .field("host", Kind::String)
        .field("port", Kind::UInt32)
        .build()
        .unwrap();
    MessageDescriptor::builder("Config")
        .field("name", Kind::String)
        .field("age", Kind::Int32)
        .field("flag", Kind::Bool)
        .field("level", Kind::Enum(level))
        .field("bind", Kind::Message(endpoint))
        .field("legacy", Kind::Group)
        .field("token", Kind::Bytes)
        .field("ratio", Kind::Float)
        .field("rate", Kind::Double)
        .field("offset", Kind::Int64)
        .field("quota", Kind::UInt64)
        .build()
        .unwrap()
}

#[test]
fn populates_scalars_in_token_order() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .populate(
            &mut message,
            &[
                "name=Alice",
                "age=-3",
                "ratio=0.5",
                "rate=2.25",
                "offset=-4000000000",
                "quota=5000000000",
            ],
        )
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.applied(), 6);
    assert_eq!(message.get_string("name"), "Alice");
    assert_eq!(message.get_int32("age"), -3);
    assert_eq!(message.get_float("ratio"), 0.5);
    assert_eq!(message.get_double("rate"), 2.25);
    assert_eq!(message.get_int64("offset"), -4_000_000_000);
    assert_eq!(message.get_uint64("quota"), 5_000_000_000);
}

#[test]
fn bool_accepts_true_and_one_and_writes_false_for_everything_else() {
    remora_testhelpers::setup();

    let schema = config();
    let flag = schema.index_of("flag").unwrap();

    for (value, expected) in [
        ("true", true),
        ("TRUE", true),
        ("True", true),
        ("1", true),
        ("false", false),
        ("0", false),
        ("nonsense", false),
        ("", false),
    ] {
        let mut message = schema.new_message();
        let token = format!("flag={value}");
        let report = Populator::new()
            .populate(&mut message, &[token.as_str()])
            .unwrap();

        // Even garbage assigns the field: the write is an explicit false.
        assert!(report.is_clean(), "{token} must apply");
        assert!(message.has(flag), "{token} must assign the field");
        assert_eq!(message.get_bool("flag"), expected, "{token}");
    }
}

#[test]
fn enum_values_fall_back_from_exact_name_to_foldings_to_tag_number() {
    remora_testhelpers::setup();

    let schema = config();

    for (value, expected) in [("DEBUG", 2), ("debug", 2), ("Debug", 2), ("1", 1), ("0", 0)] {
        let mut message = schema.new_message();
        let token = format!("level={value}");
        let report = Populator::new()
            .populate(&mut message, &[token.as_str()])
            .unwrap();

        assert!(report.is_clean(), "{token} must apply");
        assert_eq!(message.get_enum("level"), expected, "{token}");
    }
}

#[test]
fn enum_lowercase_declarations_match_uppercase_input() {
    remora_testhelpers::setup();

    let mode = EnumDescriptor::builder("Mode")
        .value("off", 0)
        .value("on", 1)
        .build()
        .unwrap();
    let schema = MessageDescriptor::builder("Switch")
        .field("mode", Kind::Enum(mode))
        .build()
        .unwrap();
    let mut message = schema.new_message();

    let report = Populator::new().populate(&mut message, &["mode=ON"]).unwrap();

    assert!(report.is_clean());
    assert_eq!(message.get_enum("mode"), 1);
    assert_eq!(message.enum_alias("mode", 1), Some("on"));
}

#[test]
fn unmatched_enum_values_keep_the_prior_value() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    assert!(message.set_enum("level", 2));

    let report = Populator::new()
        .populate(&mut message, &["level=SHOUT", "level=99"])
        .unwrap();

    assert_eq!(
        report.tokens()[0].outcome,
        TokenOutcome::EnumUnmatched,
        "undeclared name"
    );
    assert_eq!(
        report.tokens()[1].outcome,
        TokenOutcome::EnumUnmatched,
        "undeclared tag number"
    );
    assert_eq!(message.get_enum("level"), 2);
}

#[test]
fn case_insensitive_resolution_uses_folded_names() {
    remora_testhelpers::setup();

    let schema = config();

    let mut message = schema.new_message();
    let report = Populator::new()
        .case_insensitive(true)
        .populate(&mut message, &["NAME=Bob", "BIND.PORT=80"])
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(message.get_string("name"), "Bob");
    let bind = message
        .nested_message(schema.index_of("bind").unwrap())
        .unwrap();
    assert_eq!(bind.get_uint32("port"), 80);

    // The default populator matches exact names only.
    let mut message = schema.new_message();
    let report = Populator::new().populate(&mut message, &["NAME=Bob"]).unwrap();
    assert!(matches!(
        report.tokens()[0].outcome,
        TokenOutcome::UnknownField { .. }
    ));
    assert_eq!(message.get_string("name"), "");
}

#[test]
fn later_tokens_overwrite_earlier_ones() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .populate(&mut message, &["name=first", "name=second"])
        .unwrap();

    assert_eq!(report.applied(), 2);
    assert_eq!(message.get_string("name"), "second");
}

#[test]
fn tokens_without_a_key_value_shape_are_recorded_and_skipped() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .populate(&mut message, &["noequals", "=bar", "name=ok"])
        .unwrap();

    assert_eq!(report.tokens()[0].outcome, TokenOutcome::NotKeyValue);
    assert_eq!(report.tokens()[1].outcome, TokenOutcome::NotKeyValue);
    assert_eq!(report.applied(), 1);
    assert_eq!(report.skipped(), 2);
    assert!(!report.is_clean());
    assert_eq!(message.get_string("name"), "ok");
}

#[test]
fn empty_values_assign_empty_strings() {
    remora_testhelpers::setup();

    let schema = config();
    let mut message = schema.new_message();
    message.set_string("name", "previous");

    let report = Populator::new().populate(&mut message, &["name="]).unwrap();

    assert!(report.is_clean());
    assert!(message.has(schema.index_of("name").unwrap()));
    assert_eq!(message.get_string("name"), "");
}

#[test]
fn bytes_fields_store_the_raw_value_bytes() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .populate(&mut message, &["token=s3cr3t"])
        .unwrap();

    assert!(report.is_clean());
    let payload = message.value_by_name("token").unwrap();
    assert_eq!(payload.as_bytes().unwrap().as_ref(), b"s3cr3t");
}

#[test]
fn failed_conversions_abort_with_a_span_pointing_at_the_value() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let err = Populator::new()
        .populate(&mut message, &["name=ok", "age=abc"])
        .unwrap_err();

    assert_eq!(err.input(), "name=ok age=abc ");
    let span = err.inner().span;
    assert_eq!(&err.input()[span.start..span.start + span.len()], "abc");

    insta::assert_snapshot!(
        err.inner(),
        @"invalid int32 value for field `age': invalid digit found in string at 12..15"
    );
    insta::assert_snapshot!(err, @"could not populate the message from arguments");

    // The abort happened after `name=ok` was already applied.
    assert_eq!(message.get_string("name"), "ok");
}

#[test]
fn failed_conversions_carry_a_renderable_diagnostic() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let err = Populator::new()
        .populate(&mut message, &["quota=-1"])
        .unwrap_err();

    assert_eq!(err.severity(), Some(miette::Severity::Error));
    assert!(err.source_code().is_some());

    let labels: Vec<_> = err.labels().unwrap().collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].offset(), 6);
    assert_eq!(labels[0].len(), 2);
    assert_eq!(
        labels[0].label(),
        Some("invalid uint64 value for field `quota': invalid digit found in string")
    );
}

#[test]
fn empty_numeric_values_abort_with_an_empty_span() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let err = Populator::new().populate(&mut message, &["age="]).unwrap_err();

    let span = err.inner().span;
    assert!(span.is_empty());
    assert_eq!(span.start, 4);
    insta::assert_snapshot!(
        err.inner(),
        @"invalid int32 value for field `age': cannot parse integer from empty string at 4..4"
    );
}

#[test]
fn skip_policy_records_the_failure_and_continues() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .on_conversion_error(ConversionPolicy::Skip)
        .populate(&mut message, &["age=abc", "name=ok", "ratio=zero"])
        .unwrap();

    assert_eq!(
        report.tokens()[0].outcome,
        TokenOutcome::ConversionFailed {
            detail: "invalid digit found in string".to_owned(),
        }
    );
    assert_eq!(
        report.tokens()[2].outcome,
        TokenOutcome::ConversionFailed {
            detail: "invalid float literal".to_owned(),
        }
    );
    assert_eq!(report.applied(), 1);
    assert_eq!(report.skipped(), 2);
    assert_eq!(message.get_string("name"), "ok");
    assert_eq!(message.get_int32("age"), 0);
}

#[test]
fn dotted_paths_descend_and_construct_nested_messages() {
    remora_testhelpers::setup();

    let schema = config();
    let mut message = schema.new_message();
    let bind = schema.index_of("bind").unwrap();
    assert!(!message.has(bind));

    let report = Populator::new()
        .populate(&mut message, &["bind.host=db", "bind.port=5432"])
        .unwrap();

    assert!(report.is_clean());
    let nested = message.nested_message(bind).unwrap();
    assert_eq!(nested.get_string("host"), "db");
    assert_eq!(nested.get_uint32("port"), 5432);
}

#[test]
fn descent_constructs_nested_messages_even_when_the_leaf_misses() {
    remora_testhelpers::setup();

    let schema = config();
    let mut message = schema.new_message();

    let report = Populator::new()
        .populate(&mut message, &["bind.bogus=1"])
        .unwrap();

    assert_eq!(
        report.tokens()[0].outcome,
        TokenOutcome::UnknownField { suggestion: None }
    );
    // The interior segment resolved before the leaf missed, so the empty
    // nested instance stays behind.
    assert!(message.has(schema.index_of("bind").unwrap()));
}

#[test]
fn message_fields_need_a_dotted_path() {
    remora_testhelpers::setup();

    let schema = config();
    let mut message = schema.new_message();

    let report = Populator::new()
        .populate(&mut message, &["bind=somewhere"])
        .unwrap();

    assert_eq!(report.tokens()[0].outcome, TokenOutcome::MessageNeedsPath);
    assert!(!message.has(schema.index_of("bind").unwrap()));
}

#[test]
fn interior_segments_must_be_message_kind() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .populate(&mut message, &["name.inner=1"])
        .unwrap();

    assert_eq!(report.tokens()[0].outcome, TokenOutcome::NotAMessage);
}

#[test]
fn unknown_fields_suggest_the_closest_declared_name() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let report = Populator::new()
        .populate(&mut message, &["nme=x", "bind.prot=80", "unknown=1"])
        .unwrap();

    assert_eq!(
        report.tokens()[0].outcome,
        TokenOutcome::UnknownField {
            suggestion: Some("name".to_owned()),
        }
    );
    assert_eq!(
        report.tokens()[1].outcome,
        TokenOutcome::UnknownField {
            suggestion: Some("port".to_owned()),
        }
    );
    assert_eq!(
        report.tokens()[2].outcome,
        TokenOutcome::UnknownField { suggestion: None }
    );
    insta::assert_snapshot!(
        report.tokens()[0].outcome,
        @"unknown field (did you mean `name'?)"
    );
}

#[test]
fn group_fields_are_reported_and_skipped() {
    remora_testhelpers::setup();

    let schema = config();
    let mut message = schema.new_message();

    let report = Populator::new()
        .populate(&mut message, &["legacy=1"])
        .unwrap();

    assert_eq!(report.tokens()[0].outcome, TokenOutcome::GroupUnsupported);
    assert!(!message.has(schema.index_of("legacy").unwrap()));
}

#[test]
fn report_records_every_token_with_its_index_and_raw_text() {
    remora_testhelpers::setup();

    let mut message = config().new_message();
    let args = ["name=ok", "bogus", "flag=1"];
    let report = Populator::new().populate(&mut message, &args).unwrap();

    assert_eq!(report.tokens().len(), args.len());
    for (position, token) in report.tokens().iter().enumerate() {
        assert_eq!(token.index, position);
        assert_eq!(token.raw, args[position]);
    }
    assert_eq!(report.applied(), 2);
    assert_eq!(report.skipped(), 1);
}

#[test]
fn populated_messages_dump_their_fields_in_declaration_order() {
    remora_testhelpers::setup();

    let endpoint = MessageDescriptor::builder("Endpoint")
        .field("host", Kind::String)
        .field("port", Kind::UInt32)
        .build()
        .unwrap();
    let schema = MessageDescriptor::builder("Service")
        .field("name", Kind::String)
        .field("workers", Kind::UInt32)
        .field("bind", Kind::Message(endpoint))
        .build()
        .unwrap();
    let mut message = schema.new_message();

    let report = Populator::new()
        .populate(
            &mut message,
            &["name=gateway", "workers=4", "bind.host=0.0.0.0", "bind.port=443"],
        )
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(
        remora_pretty::dump(&message),
        "`name' = `gateway'\n\
         `workers' = `4'\n\
         [message] `bind'\n\
         \t`host' = `0.0.0.0'\n\
         \t`port' = `443'\n"
    );
}
