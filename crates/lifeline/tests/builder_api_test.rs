//! Integration tests for the DiagramBuilder API
//!
//! These tests verify that the public API works and is usable.

use lifeline::{DiagramBuilder, ThemeKind, config::AppConfig};

#[test]
fn test_builder_api_exists() {
    // Just verify the API compiles and can be constructed
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_parse_simple_diagram() {
    let source = "Alice->Bob: Hello\nBob-->Alice: Hi";

    let builder = DiagramBuilder::default();
    let result = builder.parse(source);
    assert!(
        result.is_ok(),
        "Should parse valid diagram: {:?}",
        result.err()
    );
}

#[test]
fn test_render_simple_diagram() {
    let source = "title: Greeting\nAlice->Bob: Hello";

    let builder = DiagramBuilder::default();
    let svg = builder
        .render_svg(source)
        .expect("Failed to render diagram");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("Greeting"), "Title text should appear");
    assert!(svg.contains("Alice"), "Actor name should appear");
}

#[test]
fn test_render_sketch_theme() {
    let mut config = AppConfig::default();
    config.style_mut().set_theme(ThemeKind::Sketch);

    let builder = DiagramBuilder::with_config(config);
    let svg = builder
        .render_svg("Alice->Bob: Hello")
        .expect("Failed to render diagram");

    assert!(svg.contains("<svg"));
}

#[test]
fn test_parse_error_carries_source() {
    let source = "Alice->: missing destination";

    let builder = DiagramBuilder::default();
    let err = builder.parse(source).expect_err("source is invalid");

    assert!(err.parse_error().is_some());
    assert_eq!(err.source_text(), Some(source));
}

#[test]
fn test_full_feature_diagram_renders() {
    let source = "\
title: Order flow
participant Shop as s
Customer->+s: place order
s-->>Customer: ack
s->s: validate
note right of s: check stock
s->*Courier: dispatch
s-->-Customer: done
destroy Courier
note over Customer, s: all wrapped up";

    let builder = DiagramBuilder::default();
    let svg = builder
        .render_svg(source)
        .expect("Failed to render diagram");

    assert!(svg.contains("Order flow"));
    assert!(svg.contains("Courier"));
    assert!(svg.contains("check stock"));
}

#[test]
fn test_layout_is_usable_directly() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse("Alice->Bob: Hello").expect("valid source");
    let layout = builder.layout(&diagram).expect("layout succeeds");

    assert_eq!(layout.actors().len(), 2);
    assert!(layout.size().width() > 0.0);
    assert!(layout.size().height() > 0.0);
}
