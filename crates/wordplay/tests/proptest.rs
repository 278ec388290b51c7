//! Property-based tests for wordplay using proptest.

use proptest::prelude::*;
use wordplay::{render, Config, Context, Wordplay};

// ============================================================================
// Strategies
// ============================================================================

/// Text with no expression openers and no code delimiter.
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,;!?'\"|:<>}()\n-]{0,200}"
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,10}"
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Text without any `{` comes out exactly as it went in.
    #[test]
    fn plain_text_is_a_fixpoint(text in plain_text()) {
        let rendered = render(&text, &Context::new(), &Config::default()).unwrap();
        prop_assert_eq!(rendered.text(), text.as_str());
        prop_assert!(rendered.anchored_objects().is_empty());
        prop_assert!(rendered.meta_objects().is_empty());
    }

    /// An injected value replaces its expression verbatim.
    #[test]
    fn injection_inserts_value(
        name in identifier(),
        value in "[a-zA-Z ,.!]{1,30}",
        before in "[a-z ]{0,10}",
        after in "[a-z ]{0,10}",
    ) {
        let mut wordplay = Wordplay::new();
        wordplay.inject(name.clone(), value.clone());
        let template = format!("{before}{{> {name} }}{after}");
        let rendered = wordplay.process(&template).unwrap();
        prop_assert_eq!(rendered.text(), format!("{before}{value}{after}"));
    }

    /// A ternary shows exactly one of its branches.
    #[test]
    fn ternary_picks_one_branch(
        flag in any::<bool>(),
        yes in "[a-z]{1,10}",
        no in "[a-z]{1,10}",
    ) {
        let mut wordplay = Wordplay::new();
        wordplay.set_variable("f", flag);
        let rendered = wordplay.process(&format!("{{ f ? {yes} | {no} }}")).unwrap();
        let expected = if flag { &yes } else { &no };
        prop_assert_eq!(rendered.text(), expected.as_str());
    }

    /// An anchor's position is the char offset of its payload in the output.
    #[test]
    fn anchor_position_is_char_offset(
        prefix in "[a-zA-Zéüß .,]{0,30}",
        payload in "[a-z]{1,8}( [a-z]{1,8}){0,2}",
        suffix in "[a-z .]{0,20}",
    ) {
        let template = format!("{prefix}{{< k:v {payload} }}{suffix}");
        let rendered = render(&template, &Context::new(), &Config::default()).unwrap();

        prop_assert_eq!(rendered.text(), format!("{prefix}{payload}{suffix}"));
        let anchors = rendered.anchored_objects();
        prop_assert_eq!(anchors.len(), 1);
        prop_assert_eq!(anchors[0].text(), payload.as_str());
        prop_assert_eq!(anchors[0].position(), prefix.chars().count());
        let start: String = rendered.text().chars().skip(anchors[0].position()).collect();
        prop_assert!(start.starts_with(&payload));
    }

    /// Arbitrary input either renders or fails with an error, never panics.
    #[test]
    fn arbitrary_input_does_not_panic(text in "\\PC{0,200}") {
        let _ = render(&text, &Context::new(), &Config::default());
    }
}
