//! Property-based tests for the compiler and markup layer
//!
//! Coverage targets:
//! - Interpolation capture (compiler/classify.rs)
//! - Binding liveness for arbitrary values (compiler/binding.rs)
//! - Markup parse/serialize stability (dom/markup.rs, dom/document.rs)

use proptest::prelude::*;
use serde_json::json;
use std::rc::Rc;

use kvue::compiler::match_interpolation;
use kvue::{Compiler, Document, Instance};

prop_compose! {
    /// Instance keys: identifiers plus dotted paths (treated as opaque keys)
    fn arb_expression()(expr in r"[a-z_][a-z0-9_.]{0,12}") -> String {
        expr
    }
}

prop_compose! {
    /// Text that cannot itself form an interpolation
    fn arb_plain_text()(text in "[a-zA-Z0-9 ,.!?]{0,20}") -> String {
        text
    }
}

proptest! {
    #[test]
    fn interpolation_captures_inner_expression(
        prefix in arb_plain_text(),
        expr in arb_expression(),
        suffix in arb_plain_text(),
    ) {
        let text = format!("{prefix}{{{{{expr}}}}}{suffix}");
        prop_assert_eq!(match_interpolation(&text), Some(expr.as_str()));
    }

    #[test]
    fn text_without_braces_never_matches(text in "[^{}]{0,40}") {
        prop_assert_eq!(match_interpolation(&text), None);
    }

    #[test]
    fn k_text_tracks_any_string(values in prop::collection::vec(any::<String>(), 1..6)) {
        let document = Rc::new(Document::from_markup(
            r#"<div id="app"><p id="p" k-text="v"></p></div>"#,
        ));
        let vm = Instance::builder().data("v", "").build();
        let _compiler = Compiler::new("#app", Rc::clone(&document), Rc::clone(&vm)).unwrap();
        let p = document.query_selector("#p").unwrap().unwrap();

        for value in values {
            vm.set("v", json!(value));
            prop_assert_eq!(document.text_content(p), value);
        }
    }

    #[test]
    fn interpolation_tracks_any_integer(n in any::<i64>()) {
        let document = Rc::new(Document::from_markup(
            r#"<div id="app"><span id="s">{{n}}</span></div>"#,
        ));
        let vm = Instance::builder().data("n", 0).build();
        let _compiler = Compiler::new("#app", Rc::clone(&document), Rc::clone(&vm)).unwrap();

        vm.set("n", json!(n));
        let s = document.query_selector("#s").unwrap().unwrap();
        prop_assert_eq!(document.text_content(s), n.to_string());
    }

    #[test]
    fn model_input_round_trips_into_instance(text in "[ -~]{0,30}") {
        let document = Rc::new(Document::from_markup(
            r#"<div id="app"><input id="in" k-model="q"><b id="b">{{q}}</b></div>"#,
        ));
        let vm = Instance::builder().data("q", "").build();
        let _compiler = Compiler::new("#app", Rc::clone(&document), Rc::clone(&vm)).unwrap();

        let input = document.query_selector("#in").unwrap().unwrap();
        document.input_value(input, &text);
        prop_assert_eq!(vm.get("q"), json!(text.clone()));
        let b = document.query_selector("#b").unwrap().unwrap();
        prop_assert_eq!(document.text_content(b), text);
    }

    #[test]
    fn escaped_text_survives_reparse(text in "[ -~]{0,40}") {
        let document = Document::new();
        let root = document.root();
        let p = document.create_element("p");
        document.append_child(root, p);
        document.set_text_content(p, &text);

        let reparsed = Document::from_markup(&document.inner_html(root));
        let p2 = reparsed.query_selector("p").unwrap().unwrap();
        prop_assert_eq!(reparsed.text_content(p2), text);
    }

    #[test]
    fn parser_never_panics(markup in "[<>/a-z =\"'{}!-]{0,60}") {
        let document = Document::from_markup(&markup);
        let _ = document.inner_html(document.root());
    }
}
