//! The exact text contract of the tab-indented dump.

use std::sync::Arc;

use bytes::Bytes;
use insta::assert_snapshot;
use remora_core::{EnumDescriptor, Kind, MessageDescriptor, Value};
use remora_pretty::{Dumper, dump, field_text};

fn telemetry() -> Arc<MessageDescriptor> {
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
    MessageDescriptor::builder("Telemetry")
        .field("enabled", Kind::Bool)
        .field("level", Kind::Enum(level))
        .field("sink", Kind::Message(endpoint))
        .field("legacy", Kind::Group)
        .build()
        .unwrap()
}

fn populated_telemetry() -> remora_core::DynamicMessage {
    let schema = telemetry();
    let mut message = schema.new_message();
    message.set_bool("enabled", true);
    message.set_enum("level", 2);
    let sink = message
        .nested_message_mut(schema.index_of("sink").unwrap())
        .unwrap();
    sink.set_string("host", "collector");
    sink.set_uint32("port", 4317);
    message
}

#[test]
fn dump_walks_declaration_order_and_indents_nested_messages() {
    remora_testhelpers::setup();

    assert_eq!(
        dump(&populated_telemetry()),
        "`enabled' = `true'\n\
         `level' = `Level.DEBUG'\n\
         [message] `sink'\n\
         \t`host' = `collector'\n\
         \t`port' = `4317'\n"
    );
}

#[test]
fn unset_fields_render_their_zero_values() {
    remora_testhelpers::setup();

    let schema = MessageDescriptor::builder("Zeros")
        .field("flag", Kind::Bool)
        .field("count", Kind::Int32)
        .field("offset", Kind::Int64)
        .field("port", Kind::UInt32)
        .field("quota", Kind::UInt64)
        .field("ratio", Kind::Float)
        .field("rate", Kind::Double)
        .field("name", Kind::String)
        .field("blob", Kind::Bytes)
        .build()
        .unwrap();

    assert_eq!(
        dump(&schema.new_message()),
        "`flag' = `false'\n\
         `count' = `0'\n\
         `offset' = `0'\n\
         `port' = `0'\n\
         `quota' = `0'\n\
         `ratio' = `0'\n\
         `rate' = `0'\n\
         `name' = `'\n\
         `blob' = `'\n"
    );
}

#[test]
fn unset_nested_message_dumps_as_an_empty_instance() {
    remora_testhelpers::setup();

    // Nothing set at all: the nested `sink` still shows its full layout, and
    // the group-kind `legacy` never appears.
    assert_eq!(
        dump(&telemetry().new_message()),
        "`enabled' = `false'\n\
         `level' = `Level.OFF'\n\
         [message] `sink'\n\
         \t`host' = `'\n\
         \t`port' = `0'\n"
    );
}

#[test]
fn enum_rendering_falls_back_to_the_bare_number() {
    remora_testhelpers::setup();

    // An enumeration with no zero value: unset renders `0`, not a name.
    let mode = EnumDescriptor::builder("Mode")
        .value("ACTIVE", 1)
        .build()
        .unwrap();
    let schema = MessageDescriptor::builder("Job")
        .field("mode", Kind::Enum(mode))
        .build()
        .unwrap();
    let mut message = schema.new_message();
    assert_eq!(dump(&message), "`mode' = `0'\n");

    message.set_enum("mode", 1);
    assert_eq!(dump(&message), "`mode' = `Mode.ACTIVE'\n");

    // A stored tag outside the declared set renders as its number. The slot
    // write path accepts any tag for an enum-kind field.
    message.set(0, Value::Enum(99)).unwrap();
    assert_eq!(dump(&message), "`mode' = `99'\n");
}

#[test]
fn bytes_fields_render_as_lossy_text() {
    remora_testhelpers::setup();

    let schema = MessageDescriptor::builder("Packet")
        .field("payload", Kind::Bytes)
        .build()
        .unwrap();
    let mut message = schema.new_message();
    message
        .set(0, Value::Bytes(Bytes::from_static(b"ok\xffok")))
        .unwrap();

    assert_eq!(dump(&message), "`payload' = `ok\u{fffd}ok'\n");
}

#[test]
fn initial_indent_prefixes_every_line() {
    remora_testhelpers::setup();

    let out = Dumper::new()
        .with_initial_indent(2)
        .dump(&populated_telemetry());
    assert_eq!(
        out,
        "\t\t`enabled' = `true'\n\
         \t\t`level' = `Level.DEBUG'\n\
         \t\t[message] `sink'\n\
         \t\t\t`host' = `collector'\n\
         \t\t\t`port' = `4317'\n"
    );
}

#[test]
fn max_depth_elides_deeper_levels() {
    remora_testhelpers::setup();

    let inner = MessageDescriptor::builder("Inner")
        .field("leaf", Kind::Int32)
        .build()
        .unwrap();
    let middle = MessageDescriptor::builder("Middle")
        .field("inner", Kind::Message(inner))
        .field("tag", Kind::Int32)
        .build()
        .unwrap();
    let outer = MessageDescriptor::builder("Outer")
        .field("name", Kind::String)
        .field("middle", Kind::Message(middle))
        .build()
        .unwrap();
    let mut message = outer.new_message();
    message.set_string("name", "x");

    // Depth 1: the middle level renders, the inner one is elided.
    assert_eq!(
        Dumper::new().with_max_depth(1).dump(&message),
        "`name' = `x'\n\
         [message] `middle'\n\
         \t[message] `inner'\n\
         \t\t...\n\
         \t`tag' = `0'\n"
    );

    // Depth 0: every nested message keeps its header line only.
    assert_eq!(
        Dumper::new().with_max_depth(0).dump(&message),
        "`name' = `x'\n\
         [message] `middle'\n\
         \t...\n"
    );

    // No limit: the whole tree renders.
    assert_eq!(
        dump(&message),
        "`name' = `x'\n\
         [message] `middle'\n\
         \t[message] `inner'\n\
         \t\t`leaf' = `0'\n\
         \t`tag' = `0'\n"
    );
}

#[test]
fn field_text_renders_single_fields() {
    remora_testhelpers::setup();

    let message = populated_telemetry();

    assert_snapshot!(field_text(&message, "enabled").unwrap(), @"true");
    assert_snapshot!(field_text(&message, "level").unwrap(), @"Level.DEBUG");
    assert_eq!(
        field_text(&message, "sink").unwrap(),
        "\t`host' = `collector'\n\t`port' = `4317'\n"
    );
}

#[test]
fn field_text_refuses_groups_and_unknown_names() {
    remora_testhelpers::setup();

    let message = populated_telemetry();

    assert_eq!(field_text(&message, "legacy"), None);
    assert_eq!(field_text(&message, "no_such_field"), None);
    // Lookup is exact-name, unlike key population.
    assert_eq!(field_text(&message, "Enabled"), None);
}

#[test]
fn field_text_shows_unset_nested_messages_as_empty_instances() {
    remora_testhelpers::setup();

    let message = telemetry().new_message();

    assert_eq!(
        field_text(&message, "sink").unwrap(),
        "\t`host' = `'\n\t`port' = `0'\n"
    );
    assert_snapshot!(field_text(&message, "level").unwrap(), @"Level.OFF");
}
